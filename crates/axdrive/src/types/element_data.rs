/*!
Wire snapshots of elements.

[`AXElementData`] is the flat per-request snapshot most commands return;
[`AXElementDescription`] is the recursive form produced by
`describeElement`. Both are detached from any live element.
*/

use super::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A snapshot of one element for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AXElementData {
  /// Short single-line summary (role, pid, title, id).
  pub brief_description: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,

  /// Requested attributes. A key maps to [`AttributeValue::Null`] when the
  /// element lacks the attribute.
  pub attributes: BTreeMap<String, AttributeValue>,

  /// Every attribute name the element exposes.
  pub all_attribute_names: Vec<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub textual_content: Option<String>,

  /// Brief descriptions of direct children, when requested.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub children_briefs: Option<Vec<String>>,

  /// Stringified-format description (adds value and help to the brief).
  pub full_description: String,

  /// Ancestor chain, root first.
  pub path: Vec<String>,
}

/// A recursive element tree produced by `describeElement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AXElementDescription {
  pub brief_description: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,

  /// Empty for ignored-element stubs.
  #[serde(default)]
  pub attributes: BTreeMap<String, AttributeValue>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<AXElementDescription>,
}

/// Formatting modes for brief descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
  /// `"Role: R, PID: p, Title: 't', ID: 'id', DOMId: 'd'"` with absent
  /// parts omitted.
  #[default]
  Smart,
  /// Role only, or the handle's debug form when the role is unreadable.
  Raw,
  /// The element's direct textual content.
  TextContent,
  /// Smart plus value and help.
  Stringified,
}
