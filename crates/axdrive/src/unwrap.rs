/*!
Native value unwrapping.

Collapses the heterogeneous [`RawValue`] forms a platform reports into
the closed [`AttributeValue`] sum. Containers recurse with a hard depth
cap and a cycle guard over container identities; overflow emits the
sentinel strings rather than failing the read.
*/

use crate::element::Element;
use crate::port::{ElemPort, RawValue};
use crate::types::{AttributeValue, ValueFormat};

/// Sentinel emitted when unwrapping exceeds the depth cap.
pub const MAX_DEPTH_SENTINEL: &str = "<max_depth_reached>";

/// Sentinel emitted when a container is its own ancestor.
pub const CIRCULAR_SENTINEL: &str = "<circular_reference>";

/// Convert a raw native value into an [`AttributeValue`].
///
/// `max_depth` bounds container nesting (see
/// [`crate::EngineConfig::max_unwrap_depth`]).
pub fn unwrap_value<E: ElemPort>(raw: &RawValue<E>, max_depth: usize) -> AttributeValue {
  let mut seen = Vec::new();
  go(raw, 0, max_depth, &mut seen)
}

fn go<E: ElemPort>(
  raw: &RawValue<E>,
  depth: usize,
  max_depth: usize,
  seen: &mut Vec<usize>,
) -> AttributeValue {
  match raw {
    RawValue::String(s) | RawValue::AttributedString(s) | RawValue::Opaque(s) => {
      AttributeValue::String(s.clone())
    }
    RawValue::Bool(b) => AttributeValue::Bool(*b),
    RawValue::Int(i) => AttributeValue::Int(*i),
    RawValue::Float(f) => {
      // Integer-valued numbers surface as ints regardless of native width.
      if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
        AttributeValue::Int(*f as i64)
      } else {
        AttributeValue::Float(*f)
      }
    }
    RawValue::Element(elem) => {
      AttributeValue::String(Element::new(elem.clone()).brief_description(ValueFormat::Smart))
    }
    RawValue::Point { x, y } => AttributeValue::point(*x, *y),
    RawValue::Size { width, height } => AttributeValue::size(*width, *height),
    RawValue::Rect { x, y, width, height } => AttributeValue::rect(*x, *y, *width, *height),
    RawValue::Range { location, length } => AttributeValue::range(*location, *length),
    RawValue::Array(items) => {
      if depth >= max_depth {
        return AttributeValue::String(MAX_DEPTH_SENTINEL.to_owned());
      }
      let identity = std::sync::Arc::as_ptr(items) as usize;
      if seen.contains(&identity) {
        return AttributeValue::String(CIRCULAR_SENTINEL.to_owned());
      }
      seen.push(identity);
      let snapshot = items.lock().clone();
      let unwrapped =
        snapshot.iter().map(|item| go(item, depth + 1, max_depth, seen)).collect();
      seen.pop();
      AttributeValue::List(unwrapped)
    }
    RawValue::Dict(entries) => {
      if depth >= max_depth {
        return AttributeValue::String(MAX_DEPTH_SENTINEL.to_owned());
      }
      let identity = std::sync::Arc::as_ptr(entries) as usize;
      if seen.contains(&identity) {
        return AttributeValue::String(CIRCULAR_SENTINEL.to_owned());
      }
      seen.push(identity);
      let snapshot = entries.lock().clone();
      let unwrapped = snapshot
        .iter()
        .map(|(key, value)| (key.clone(), go(value, depth + 1, max_depth, seen)))
        .collect();
      seen.pop();
      AttributeValue::Map(unwrapped)
    }
  }
}
