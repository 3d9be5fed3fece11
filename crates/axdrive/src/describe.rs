/*!
Snapshot builders.

Converts live element handles into the detached wire shapes: flat
[`AXElementData`] snapshots, recursive [`AXElementDescription`] trees,
and extracted text. All recursion here is depth-capped.
*/

use crate::ax;
use crate::config::EngineConfig;
use crate::element::Element;
use crate::port::ElemPort;
use crate::types::{AXElementData, AXElementDescription, AttributeValue, ValueFormat};
use std::collections::BTreeMap;

/// Suffix appended to the brief of elements skipped by `describe_tree`.
const IGNORED_SUFFIX: &str = " (Ignored)";

/// Build a flat snapshot of one element.
///
/// Every requested attribute gets a key; elements lacking one map it to
/// [`AttributeValue::Null`].
pub fn build_element_data<E: ElemPort>(
  elem: &Element<E>,
  attrs_to_fetch: &[String],
  include_children_brief: bool,
  config: &EngineConfig,
) -> AXElementData {
  let mut attributes = BTreeMap::new();
  for name in attrs_to_fetch {
    let value =
      elem.attribute_with_depth(name, config.max_unwrap_depth).unwrap_or(AttributeValue::Null);
    attributes.insert(name.clone(), value);
  }

  let children_briefs = if include_children_brief {
    Some(
      elem
        .children()
        .unwrap_or_default()
        .iter()
        .map(|child| child.brief_description(ValueFormat::Smart))
        .collect(),
    )
  } else {
    None
  };

  AXElementData {
    brief_description: elem.brief_description(ValueFormat::Smart),
    role: elem.role(),
    attributes,
    all_attribute_names: elem.attribute_names().unwrap_or_default(),
    textual_content: extract_text(elem, true, config.snapshot_text_depth, 0),
    children_briefs,
    full_description: elem.brief_description(ValueFormat::Stringified),
    path: elem.generate_path_segments_with_depth(None, config.max_path_depth),
  }
}

/// Recursively describe an element tree down to `depth`.
///
/// With `include_ignored` false, hidden elements become childless stubs
/// whose brief carries the ignored suffix; their subtrees are not
/// descended.
pub fn describe_tree<E: ElemPort>(
  elem: &Element<E>,
  depth: usize,
  include_ignored: bool,
  current_depth: usize,
  config: &EngineConfig,
) -> AXElementDescription {
  if !include_ignored && elem.is_hidden() == Some(true) {
    return AXElementDescription {
      brief_description: format!("{}{IGNORED_SUFFIX}", elem.brief_description(ValueFormat::Smart)),
      role: elem.role(),
      attributes: BTreeMap::new(),
      children: vec![],
    };
  }

  let mut attributes = BTreeMap::new();
  for name in ax::DEFAULT_DESCRIBE_ATTRIBUTES {
    if let Some(value) = elem.attribute_with_depth(name, config.max_unwrap_depth) {
      attributes.insert((*name).to_owned(), value);
    }
  }

  let children = if current_depth < depth {
    elem
      .children()
      .unwrap_or_default()
      .iter()
      .map(|child| describe_tree(child, depth, include_ignored, current_depth + 1, config))
      .collect()
  } else {
    vec![]
  };

  AXElementDescription {
    brief_description: elem.brief_description(ValueFormat::Smart),
    role: elem.role(),
    attributes,
    children,
  }
}

/// Collect textual content from an element.
///
/// Direct text is the first non-empty of title, value, description, and
/// placeholder. Child text joins with single spaces when
/// `include_children` holds and the depth budget allows. `None` when
/// nothing textual exists.
pub fn extract_text<E: ElemPort>(
  elem: &Element<E>,
  include_children: bool,
  max_depth: usize,
  current_depth: usize,
) -> Option<String> {
  let direct = elem.direct_text();

  let child_text = if include_children && current_depth < max_depth {
    let parts: Vec<String> = elem
      .children()
      .unwrap_or_default()
      .iter()
      .filter_map(|child| extract_text(child, include_children, max_depth, current_depth + 1))
      .filter(|t| !t.is_empty())
      .collect();
    if parts.is_empty() {
      None
    } else {
      Some(parts.join(" "))
    }
  } else {
    None
  };

  match (direct, child_text) {
    (Some(direct), Some(children)) => Some(format!("{direct} {children}")),
    (Some(direct), None) => Some(direct),
    (None, Some(children)) => Some(children),
    (None, None) => None,
  }
}
