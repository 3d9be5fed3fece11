/*!
Attribute values.

[`AttributeValue`] is the closed, serializable sum every attribute read
collapses into. It is closed under recursive containment: lists and maps
only ever hold other `AttributeValue`s. On the wire each variant encodes
as the natural JSON form (`null`, boolean, number, string, array, object).
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed attribute value.
///
/// Produced by reading an attribute or decoding a command payload.
/// Geometry structs and ranges arrive as maps (`{x, y, width, height}`,
/// `{location, length}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
  /// Attribute exists but has no value, or was requested and absent.
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  List(Vec<AttributeValue>),
  /// Keys ordered for deterministic wire output.
  Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
  // === Type-specific accessors ===

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Int(i) => Some(*i),
      Self::Float(f) => Some(*f as i64),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Float(f) => Some(*f),
      Self::Int(i) => Some(*i as f64),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[AttributeValue]> {
    match self {
      Self::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&BTreeMap<String, AttributeValue>> {
    match self {
      Self::Map(entries) => Some(entries),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  /// Render the value as a display string.
  ///
  /// Scalars render naturally; lists and maps render as compact JSON.
  /// `Null` renders as the empty string. Used for criteria matching and
  /// computed names.
  pub fn display_string(&self) -> String {
    match self {
      Self::Null => String::new(),
      Self::Bool(b) => b.to_string(),
      Self::Int(i) => i.to_string(),
      Self::Float(f) => f.to_string(),
      Self::String(s) => s.clone(),
      Self::List(_) | Self::Map(_) => {
        serde_json::to_string(self).unwrap_or_else(|_| String::new())
      }
    }
  }

  /// Build a geometry map `{x, y}`.
  pub fn point(x: f64, y: f64) -> Self {
    let mut map = BTreeMap::new();
    map.insert("x".to_owned(), Self::Float(x));
    map.insert("y".to_owned(), Self::Float(y));
    Self::Map(map)
  }

  /// Build a geometry map `{width, height}`.
  pub fn size(width: f64, height: f64) -> Self {
    let mut map = BTreeMap::new();
    map.insert("width".to_owned(), Self::Float(width));
    map.insert("height".to_owned(), Self::Float(height));
    Self::Map(map)
  }

  /// Build a geometry map `{x, y, width, height}`.
  pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
    let mut map = BTreeMap::new();
    map.insert("x".to_owned(), Self::Float(x));
    map.insert("y".to_owned(), Self::Float(y));
    map.insert("width".to_owned(), Self::Float(width));
    map.insert("height".to_owned(), Self::Float(height));
    Self::Map(map)
  }

  /// Build a range map `{location, length}`.
  pub fn range(location: i64, length: i64) -> Self {
    let mut map = BTreeMap::new();
    map.insert("location".to_owned(), Self::Int(location));
    map.insert("length".to_owned(), Self::Int(length));
    Self::Map(map)
  }
}

// === From impls for ergonomic construction ===

impl From<String> for AttributeValue {
  fn from(s: String) -> Self {
    Self::String(s)
  }
}

impl From<&str> for AttributeValue {
  fn from(s: &str) -> Self {
    Self::String(s.to_owned())
  }
}

impl From<i64> for AttributeValue {
  fn from(i: i64) -> Self {
    Self::Int(i)
  }
}

impl From<f64> for AttributeValue {
  fn from(f: f64) -> Self {
    Self::Float(f)
  }
}

impl From<bool> for AttributeValue {
  fn from(b: bool) -> Self {
    Self::Bool(b)
  }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
  fn from(items: Vec<T>) -> Self {
    Self::List(items.into_iter().map(Into::into).collect())
  }
}
