/*!
The locator engine.

Resolves an application target plus a [`Locator`] to a single element:
the path hint narrows the traversal root step by step, then a bounded
depth-first search under the final root finds the first element
satisfying the criteria. Traversal order is deterministic: parent before
children, children in platform order.
*/

use crate::config::EngineConfig;
use crate::element::Element;
use crate::port::{AXPort, ElemPort};
use crate::resolver::resolve_app;
use crate::types::{AxResult, Criterion, Error, Locator, MatchMode, Pid, ValueFormat};

/// Resolve an app identifier and locator to one element.
///
/// Path-hint steps search strict descendants of the current root (each
/// step must descend); the final criteria search includes the root
/// itself. `max_depth` overrides the configured subtree depth.
pub fn find_element<P: AXPort>(
  port: &P,
  config: &EngineConfig,
  app_identifier: &str,
  locator: &Locator,
  max_depth: Option<usize>,
) -> AxResult<Element<P::Elem>> {
  let pid = resolve_app(port, app_identifier)
    .ok_or_else(|| Error::ApplicationNotFound(app_identifier.to_owned()))?;
  let root = Element::new(port.application_element(pid));
  find_under(config, &root, locator, max_depth)
}

/// [`find_element`] with an already-resolved root.
pub fn find_under<E: ElemPort>(
  config: &EngineConfig,
  root: &Element<E>,
  locator: &Locator,
  max_depth: Option<usize>,
) -> AxResult<Element<E>> {
  let debug = locator.debug_path_search;
  let mut current = root.clone();

  for (index, step) in locator.path_from_root.iter().enumerate() {
    let depth = step.max_depth_for_step.unwrap_or(config.path_step_depth);
    let compiled = compile_criteria(&step.criteria, step.match_mode);
    let found = search_children(&current, 1, depth, debug, &|elem| {
      criteria_match(elem, &compiled, step.match_all)
    });
    let Some(next) = found else {
      let diagnostic = format!(
        "path step {index} matched nothing under {} (criteria: {})",
        current.brief_description(ValueFormat::Smart),
        describe_criteria(&step.criteria),
      );
      log::debug!("{diagnostic}");
      return Err(Error::ElementNotFound(diagnostic));
    };
    current = next;
  }

  let depth = max_depth.unwrap_or(config.max_search_depth);
  let compiled = compile_criteria(&locator.criteria, None);
  let predicate = |elem: &Element<E>| {
    if !criteria_match(elem, &compiled, locator.match_all) {
      return false;
    }
    if let Some(action) = &locator.require_action {
      if !elem.is_action_supported(action) {
        return false;
      }
    }
    if let Some(fragment) = &locator.computed_name_contains {
      let name = elem.computed_name().unwrap_or_default();
      if !name.to_lowercase().contains(&fragment.to_lowercase()) {
        return false;
      }
    }
    true
  };

  let found = visit(&current, 0, depth, debug, &predicate);
  found.ok_or_else(|| {
    Error::ElementNotFound(format!(
      "no element matched under {} (criteria: {})",
      current.brief_description(ValueFormat::Smart),
      describe_criteria(&locator.criteria),
    ))
  })
}

/// Collect every element under `root` satisfying the locator, in
/// traversal order, up to `max_results`.
pub fn collect_elements<E: ElemPort>(
  config: &EngineConfig,
  root: &Element<E>,
  locator: &Locator,
  max_depth: Option<usize>,
  max_results: Option<usize>,
) -> Vec<Element<E>> {
  let depth = max_depth.unwrap_or(config.max_search_depth);
  let compiled = compile_criteria(&locator.criteria, None);
  let mut results = Vec::new();
  collect(
    root,
    0,
    depth,
    &|elem| {
      criteria_match(elem, &compiled, locator.match_all)
        && locator.require_action.as_ref().map_or(true, |a| elem.is_action_supported(a))
    },
    max_results,
    &mut results,
  );
  results
}

// === Traversal ===

fn visit<E: ElemPort>(
  elem: &Element<E>,
  depth: usize,
  max_depth: usize,
  debug: bool,
  predicate: &impl Fn(&Element<E>) -> bool,
) -> Option<Element<E>> {
  if predicate(elem) {
    trace_node(elem, depth, max_depth, debug, "matched");
    return Some(elem.clone());
  }
  trace_node(elem, depth, max_depth, debug, "no-match");
  search_children(elem, depth + 1, max_depth, debug, predicate)
}

fn search_children<E: ElemPort>(
  parent: &Element<E>,
  depth: usize,
  max_depth: usize,
  debug: bool,
  predicate: &impl Fn(&Element<E>) -> bool,
) -> Option<Element<E>> {
  if depth > max_depth {
    trace_node(parent, depth, max_depth, debug, "max-depth");
    return None;
  }
  for child in parent.children().unwrap_or_default() {
    if let Some(found) = visit(&child, depth, max_depth, debug, predicate) {
      return Some(found);
    }
  }
  None
}

fn collect<E: ElemPort>(
  elem: &Element<E>,
  depth: usize,
  max_depth: usize,
  predicate: &impl Fn(&Element<E>) -> bool,
  max_results: Option<usize>,
  results: &mut Vec<Element<E>>,
) {
  if max_results.is_some_and(|cap| results.len() >= cap) {
    return;
  }
  if predicate(elem) {
    results.push(elem.clone());
  }
  if depth >= max_depth {
    return;
  }
  for child in elem.children().unwrap_or_default() {
    collect(&child, depth + 1, max_depth, predicate, max_results, results);
  }
}

fn trace_node<E: ElemPort>(
  elem: &Element<E>,
  depth: usize,
  max_depth: usize,
  debug: bool,
  status: &str,
) {
  if !debug {
    return;
  }
  log::debug!(
    "search role={:?} title={:?} id={:?} depth={depth} max_depth={max_depth} status={status}",
    elem.role(),
    elem.title(),
    elem.identifier(),
  );
}

// === Criteria ===

struct CompiledCriterion<'a> {
  criterion: &'a Criterion,
  mode: MatchMode,
  regex: Option<regex::Regex>,
}

fn compile_criteria(
  criteria: &[Criterion],
  mode_override: Option<MatchMode>,
) -> Vec<CompiledCriterion<'_>> {
  criteria
    .iter()
    .map(|criterion| {
      let mut mode = mode_override.unwrap_or(criterion.match_mode);
      let mut regex = None;
      if mode == MatchMode::Regex {
        // Anchor the pattern; a partial match is never intended here.
        match regex::Regex::new(&format!("^(?:{})$", criterion.value)) {
          Ok(compiled) => regex = Some(compiled),
          Err(err) => {
            log::warn!(
              "Invalid regex '{}' for attribute {}; falling back to exact match: {err}",
              criterion.value,
              criterion.attribute
            );
            mode = MatchMode::Exact;
          }
        }
      }
      CompiledCriterion { criterion, mode, regex }
    })
    .collect()
}

fn criteria_match<E: ElemPort>(
  elem: &Element<E>,
  criteria: &[CompiledCriterion<'_>],
  match_all: bool,
) -> bool {
  if criteria.is_empty() {
    return true;
  }
  if match_all {
    criteria.iter().all(|c| criterion_matches(elem, c))
  } else {
    criteria.iter().any(|c| criterion_matches(elem, c))
  }
}

fn criterion_matches<E: ElemPort>(elem: &Element<E>, compiled: &CompiledCriterion<'_>) -> bool {
  let Some(actual) = elem.attribute(&compiled.criterion.attribute) else {
    return false;
  };
  let actual = actual.display_string();
  let expected = &compiled.criterion.value;
  match compiled.mode {
    MatchMode::Exact => actual == *expected,
    MatchMode::CaseInsensitiveExact => actual.to_lowercase() == expected.to_lowercase(),
    MatchMode::Contains => actual.contains(expected.as_str()),
    MatchMode::Regex => {
      compiled.regex.as_ref().is_some_and(|re| re.is_match(&actual))
    }
  }
}

fn describe_criteria(criteria: &[Criterion]) -> String {
  if criteria.is_empty() {
    return "<none>".to_owned();
  }
  criteria
    .iter()
    .map(|c| format!("{}={}", c.attribute, c.value))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Resolve the application root element for an identifier.
pub fn app_root<P: AXPort>(port: &P, app_identifier: &str) -> AxResult<(Pid, Element<P::Elem>)> {
  let pid = resolve_app(port, app_identifier)
    .ok_or_else(|| Error::ApplicationNotFound(app_identifier.to_owned()))?;
  Ok((pid, Element::new(port.application_element(pid))))
}
