/*!
Error taxonomy.

One closed [`enum@Error`] covers every failure the engine can surface. Each
kind carries enough context to render a useful message (attribute name,
element brief, underlying platform code) and maps to exactly one wire code
via [`Error::code`].
*/

use crate::port::AXCode;
use crate::types::SubscriptionToken;

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
  #[error("accessibility API is disabled")]
  ApiDisabled,

  #[error("process is not trusted for accessibility access")]
  NotAuthorized,

  #[error("invalid command: {0}")]
  InvalidCommand(String),

  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  #[error("application not found: {0}")]
  ApplicationNotFound(String),

  #[error("element not found: {0}")]
  ElementNotFound(String),

  #[error("element reference is no longer valid ({0})")]
  InvalidElement(String),

  #[error("attribute {attribute} is not supported by {element}")]
  AttributeUnsupported { attribute: String, element: String },

  #[error("attribute {attribute} has no value on {element}")]
  AttributeNotReadable { attribute: String, element: String },

  #[error("attribute {attribute} is not settable on {element}")]
  AttributeNotSettable { attribute: String, element: String },

  #[error("value for attribute {attribute} has the wrong type: {detail}")]
  TypeMismatch { attribute: String, detail: String },

  #[error("action {action} is not supported by {element} (available: {available:?})")]
  ActionUnsupported { action: String, element: String, available: Vec<String> },

  #[error("action {action} failed on {element}: {code:?}")]
  ActionFailed { action: String, element: String, code: AXCode },

  #[error("observer setup failed: {detail}")]
  ObservationFailed { detail: String, code: Option<AXCode> },

  #[error("no subscription exists for token {0}")]
  TokenNotFound(SubscriptionToken),

  #[error("batch failed: {0}")]
  BatchOperationFailed(String),

  #[error("operation timed out")]
  Timeout,

  #[error("internal error: {0}")]
  Internal(String),
}

/// Result type for engine operations.
pub type AxResult<T> = Result<T, Error>;

impl Error {
  /// The wire string for this error kind.
  pub fn code(&self) -> &'static str {
    match self {
      Self::ApiDisabled => "api_disabled",
      Self::NotAuthorized => "permission_denied",
      Self::InvalidCommand(_) => "invalid_command",
      Self::InvalidParameter(_) | Self::TypeMismatch { .. } => "invalid_parameter",
      Self::ApplicationNotFound(_) => "application_not_found",
      Self::ElementNotFound(_) => "element_not_found",
      Self::InvalidElement(_) => "invalid_element",
      Self::AttributeUnsupported { .. } | Self::AttributeNotReadable { .. } => {
        "attribute_not_found"
      }
      Self::AttributeNotSettable { .. } | Self::ActionFailed { .. } => "action_failed",
      Self::ActionUnsupported { .. } => "action_not_supported",
      Self::ObservationFailed { .. } | Self::TokenNotFound(_) => "observation_failed",
      Self::BatchOperationFailed(_) => "batch_operation_failed",
      Self::Timeout => "timeout",
      Self::Internal(_) => "internal_error",
    }
  }

  /// Map a platform code from an attribute read into an error kind.
  ///
  /// Total over [`AXCode`]; `element` and `attribute` provide message
  /// context.
  pub fn from_attribute_code(code: AXCode, attribute: &str, element: &str) -> Self {
    match code {
      AXCode::ApiDisabled => Self::ApiDisabled,
      AXCode::NotAuthorized => Self::NotAuthorized,
      AXCode::AttributeUnsupported | AXCode::ParameterizedAttributeUnsupported => {
        Self::AttributeUnsupported { attribute: attribute.into(), element: element.into() }
      }
      AXCode::NoValue => {
        Self::AttributeNotReadable { attribute: attribute.into(), element: element.into() }
      }
      AXCode::InvalidUIElement => Self::InvalidElement(element.into()),
      AXCode::IllegalArgument => {
        Self::InvalidParameter(format!("illegal argument reading {attribute} on {element}"))
      }
      AXCode::ActionUnsupported => Self::ActionUnsupported {
        action: attribute.into(),
        element: element.into(),
        available: vec![],
      },
      AXCode::InvalidUIElementObserver
      | AXCode::NotificationUnsupported
      | AXCode::NotificationAlreadyRegistered
      | AXCode::NotificationNotRegistered => {
        Self::ObservationFailed { detail: format!("unexpected observer code on {element}"), code: Some(code) }
      }
      AXCode::CannotComplete | AXCode::Failure | AXCode::NotImplemented => {
        Self::Internal(format!("platform returned {code:?} reading {attribute} on {element}"))
      }
    }
  }

  /// Map a platform code from an action invocation into an error kind.
  pub fn from_action_code(code: AXCode, action: &str, element: &str) -> Self {
    match code {
      AXCode::ApiDisabled => Self::ApiDisabled,
      AXCode::NotAuthorized => Self::NotAuthorized,
      AXCode::ActionUnsupported => Self::ActionUnsupported {
        action: action.into(),
        element: element.into(),
        available: vec![],
      },
      AXCode::InvalidUIElement => Self::InvalidElement(element.into()),
      _ => Self::ActionFailed { action: action.into(), element: element.into(), code },
    }
  }

  /// Map a platform code from observer setup into an error kind.
  pub fn from_observer_code(code: AXCode, detail: impl Into<String>) -> Self {
    match code {
      AXCode::ApiDisabled => Self::ApiDisabled,
      AXCode::NotAuthorized => Self::NotAuthorized,
      _ => Self::ObservationFailed { detail: detail.into(), code: Some(code) },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_kind_has_a_stable_code() {
    assert_eq!(Error::ApiDisabled.code(), "api_disabled");
    assert_eq!(Error::NotAuthorized.code(), "permission_denied");
    assert_eq!(Error::InvalidCommand("x".into()).code(), "invalid_command");
    assert_eq!(Error::ApplicationNotFound("x".into()).code(), "application_not_found");
    assert_eq!(Error::ElementNotFound("x".into()).code(), "element_not_found");
    assert_eq!(Error::InvalidElement("x".into()).code(), "invalid_element");
    assert_eq!(Error::Timeout.code(), "timeout");
    assert_eq!(Error::Internal("x".into()).code(), "internal_error");
  }

  #[test]
  fn readable_and_supported_share_a_wire_code() {
    let unsupported =
      Error::AttributeUnsupported { attribute: "AXTitle".into(), element: "e".into() };
    let unreadable =
      Error::AttributeNotReadable { attribute: "AXTitle".into(), element: "e".into() };
    assert_eq!(unsupported.code(), "attribute_not_found");
    assert_eq!(unreadable.code(), "attribute_not_found");
  }

  #[test]
  fn attribute_code_mapping_is_total() {
    for code in AXCode::ALL {
      // Must not panic and must produce a taxonomized kind.
      let err = Error::from_attribute_code(*code, "AXValue", "elem");
      assert!(!err.code().is_empty());
    }
  }

  #[test]
  fn attribute_code_mapping_matches_table() {
    let err = Error::from_attribute_code(AXCode::AttributeUnsupported, "AXValue", "e");
    assert!(matches!(err, Error::AttributeUnsupported { .. }));

    let err = Error::from_attribute_code(AXCode::NoValue, "AXValue", "e");
    assert!(matches!(err, Error::AttributeNotReadable { .. }));

    let err = Error::from_attribute_code(AXCode::InvalidUIElement, "AXValue", "e");
    assert!(matches!(err, Error::InvalidElement(_)));

    let err = Error::from_attribute_code(AXCode::ApiDisabled, "AXValue", "e");
    assert!(matches!(err, Error::ApiDisabled));
  }

  #[test]
  fn action_code_mapping_matches_table() {
    let err = Error::from_action_code(AXCode::ActionUnsupported, "AXPress", "e");
    assert!(matches!(err, Error::ActionUnsupported { .. }));
    assert_eq!(err.code(), "action_not_supported");

    let err = Error::from_action_code(AXCode::CannotComplete, "AXPress", "e");
    assert!(matches!(err, Error::ActionFailed { .. }));
    assert_eq!(err.code(), "action_failed");
  }
}
