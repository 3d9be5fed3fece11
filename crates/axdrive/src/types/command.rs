/*!
Command and response envelopes.

Requests arrive as [`CommandEnvelope`]s: a caller-chosen `commandId` plus
one tagged [`Command`] variant. Every command produces exactly one
[`ResponseEnvelope`], either a success payload or a taxonomized error.

```
use axdrive::{Command, CommandEnvelope};

let json = r#"{"commandId":"c1","command":{"type":"getFocusedElement","appIdentifier":"focused"}}"#;
let envelope: CommandEnvelope = serde_json::from_str(json).unwrap();
assert!(matches!(envelope.command, Command::GetFocusedElement { .. }));
```
*/

use super::{AttributeValue, Error, Locator};
use serde::{Deserialize, Serialize};

/// A request: unique id plus the operation to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
  pub command_id: String,
  pub command: Command,
}

/// The closed command set.
///
/// Missing optional fields take the documented defaults; unknown fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
  /// Locate an element and return its snapshot.
  #[serde(rename_all = "camelCase")]
  Query {
    app_identifier: String,
    locator: Locator,
    #[serde(default)]
    max_depth: Option<usize>,
    /// Attributes to fetch; defaults to
    /// [`crate::ax::DEFAULT_QUERY_ATTRIBUTES`].
    #[serde(default)]
    attributes: Option<Vec<String>>,
    #[serde(default)]
    include_children_brief: bool,
  },

  /// Fetch a named attribute list from an element.
  #[serde(rename_all = "camelCase")]
  GetAttributes {
    app_identifier: String,
    locator: Locator,
    attributes: Vec<String>,
    #[serde(default)]
    max_depth: Option<usize>,
  },

  /// Recursive element tree down to a depth.
  #[serde(rename_all = "camelCase")]
  DescribeElement {
    app_identifier: String,
    locator: Locator,
    #[serde(default)]
    depth: Option<usize>,
    #[serde(default)]
    include_ignored: bool,
    #[serde(default)]
    max_depth: Option<usize>,
  },

  /// Collect textual content.
  #[serde(rename_all = "camelCase")]
  ExtractText {
    app_identifier: String,
    locator: Locator,
    #[serde(default)]
    include_children: Option<bool>,
    #[serde(default)]
    max_depth: Option<usize>,
  },

  /// Invoke a named action on an element.
  #[serde(rename_all = "camelCase")]
  PerformAction {
    app_identifier: String,
    locator: Locator,
    action: String,
    #[serde(default)]
    max_depth: Option<usize>,
  },

  /// Focus an element and write its value attribute.
  #[serde(rename_all = "camelCase")]
  SetFocusedValue {
    app_identifier: String,
    locator: Locator,
    value: String,
    #[serde(default)]
    max_depth: Option<usize>,
  },

  /// Hit-test screen coordinates.
  #[serde(rename_all = "camelCase")]
  GetElementAtPoint {
    #[serde(default)]
    app_identifier: Option<String>,
    x: f64,
    y: f64,
    #[serde(default)]
    attributes: Option<Vec<String>>,
  },

  /// Currently focused element of an app.
  #[serde(rename_all = "camelCase")]
  GetFocusedElement {
    app_identifier: String,
    #[serde(default)]
    attributes: Option<Vec<String>>,
  },

  /// Subscribe to a notification; events are forwarded to the engine's
  /// [`crate::EventSink`].
  #[serde(rename_all = "camelCase")]
  Observe {
    /// Absent means a global (process-agnostic) subscription.
    #[serde(default)]
    app_identifier: Option<String>,
    notification: String,
    /// Attributes included in forwarded event snapshots.
    #[serde(default)]
    attributes: Option<Vec<String>>,
  },

  /// Walk the tree, filter, and snapshot many elements.
  #[serde(rename_all = "camelCase")]
  CollectAll {
    app_identifier: String,
    #[serde(default)]
    locator: Option<Locator>,
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default)]
    max_results: Option<usize>,
    #[serde(default)]
    attributes: Option<Vec<String>>,
  },

  /// Run an ordered list of sub-commands. Nesting is forbidden.
  #[serde(rename_all = "camelCase")]
  Batch { commands: Vec<CommandEnvelope> },
}

impl Command {
  /// The wire tag, for logging.
  pub fn name(&self) -> &'static str {
    match self {
      Self::Query { .. } => "query",
      Self::GetAttributes { .. } => "getAttributes",
      Self::DescribeElement { .. } => "describeElement",
      Self::ExtractText { .. } => "extractText",
      Self::PerformAction { .. } => "performAction",
      Self::SetFocusedValue { .. } => "setFocusedValue",
      Self::GetElementAtPoint { .. } => "getElementAtPoint",
      Self::GetFocusedElement { .. } => "getFocusedElement",
      Self::Observe { .. } => "observe",
      Self::CollectAll { .. } => "collectAll",
      Self::Batch { .. } => "batch",
    }
  }
}

/// The error body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
  pub message: String,
  /// One of the closed wire codes (see [`Error::code`]).
  pub code: String,
}

/// A result: success with payload, or a taxonomized error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
  #[serde(rename_all = "camelCase")]
  Success { command_id: String, payload: serde_json::Value },
  #[serde(rename_all = "camelCase")]
  Error { command_id: String, error: ErrorBody },
}

impl ResponseEnvelope {
  /// A success envelope from any serializable payload.
  pub fn success<T: Serialize>(command_id: &str, payload: &T) -> Self {
    match serde_json::to_value(payload) {
      Ok(payload) => Self::Success { command_id: command_id.to_owned(), payload },
      Err(err) => Self::failure(command_id, &Error::Internal(format!("payload encoding: {err}"))),
    }
  }

  /// An error envelope carrying the error's message and wire code.
  pub fn failure(command_id: &str, error: &Error) -> Self {
    Self::Error {
      command_id: command_id.to_owned(),
      error: ErrorBody { message: error.to_string(), code: error.code().to_owned() },
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Success { .. })
  }

  /// The success payload, if any.
  pub fn payload(&self) -> Option<&serde_json::Value> {
    match self {
      Self::Success { payload, .. } => Some(payload),
      Self::Error { .. } => None,
    }
  }

  /// The error body, if any.
  pub fn error(&self) -> Option<&ErrorBody> {
    match self {
      Self::Error { error, .. } => Some(error),
      Self::Success { .. } => None,
    }
  }
}

// === Handler payload shapes ===

/// `getAttributes` success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributesPayload {
  pub attributes: std::collections::BTreeMap<String, AttributeValue>,
  pub element_description: String,
}

/// `extractText` success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPayload {
  pub text: String,
}

/// Generic `{message}` payload for action-like commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
  pub message: String,
}

/// `getElementAtPoint` miss payload: success with a null element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointMissPayload {
  pub message: String,
  pub element: Option<super::AXElementData>,
}

/// `collectAll` success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPayload {
  pub elements: Vec<super::AXElementData>,
  pub count: usize,
}

/// `batch` success payload: one entry per sub-command, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPayload {
  pub results: Vec<serde_json::Value>,
  /// Always null on success; failures surface as a top-level
  /// `batch_operation_failed` error instead.
  pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_tags_are_lower_camel_case() {
    let json = r#"{"commandId":"c1","command":{"type":"performAction","appIdentifier":"com.example","locator":{"criteria":[]},"action":"AXPress"}}"#;
    let envelope: CommandEnvelope = serde_json::from_str(json).expect("deserialize");
    assert_eq!(envelope.command.name(), "performAction");
  }

  #[test]
  fn optional_fields_take_defaults() {
    let json = r#"{"commandId":"c2","command":{"type":"query","appIdentifier":"focused","locator":{"criteria":[]}}}"#;
    let envelope: CommandEnvelope = serde_json::from_str(json).expect("deserialize");
    let Command::Query { max_depth, attributes, include_children_brief, .. } = envelope.command
    else {
      panic!("expected query");
    };
    assert_eq!(max_depth, None);
    assert_eq!(attributes, None);
    assert!(!include_children_brief);
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let json = r#"{"commandId":"c3","command":{"type":"extractText","appIdentifier":"a","locator":{"criteria":[]},"futureKnob":true}}"#;
    let envelope: CommandEnvelope = serde_json::from_str(json).expect("deserialize");
    assert_eq!(envelope.command.name(), "extractText");
  }

  #[test]
  fn success_envelope_shape() {
    let envelope = ResponseEnvelope::success("c4", &TextPayload { text: "hi".into() });
    let json = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(json["status"], "success");
    assert_eq!(json["commandId"], "c4");
    assert_eq!(json["payload"]["text"], "hi");
  }

  #[test]
  fn error_envelope_shape() {
    let envelope = ResponseEnvelope::failure("c5", &Error::ElementNotFound("no match".into()));
    let json = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], "element_not_found");
    assert!(json["error"]["message"].as_str().expect("message").contains("no match"));
  }
}
