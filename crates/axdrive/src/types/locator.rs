/*!
Locators: declarative "how to find an element" specifications.

A [`Locator`] carries ordered [`Criterion`]s, an optional path hint
([`PathStep`]s that narrow the traversal root before the final search),
and post-filters (`require_action`, `computed_name_contains`).
*/

use serde::{Deserialize, Serialize};

/// How a criterion's comparison value is matched against an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
  /// String equality.
  #[default]
  Exact,
  /// Substring.
  Contains,
  /// Anchored regular-expression match. Invalid patterns degrade to
  /// [`MatchMode::Exact`] with a warning.
  Regex,
  /// Lowercased equality.
  CaseInsensitiveExact,
}

/// One predicate on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
  /// Attribute name, e.g. `AXTitle`.
  pub attribute: String,
  /// Comparison value; attribute values are compared in display-string
  /// form.
  pub value: String,
  #[serde(default)]
  pub match_mode: MatchMode,
}

impl Criterion {
  /// An exact-match criterion.
  pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
    Self { attribute: attribute.into(), value: value.into(), match_mode: MatchMode::Exact }
  }
}

/// One hop inside a path hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
  pub criteria: Vec<Criterion>,
  /// When true, all criteria must match; when false, the first matching
  /// criterion accepts the element.
  #[serde(default = "default_true")]
  pub match_all: bool,
  /// Overrides every criterion's match mode for this step when set.
  #[serde(default)]
  pub match_mode: Option<MatchMode>,
  /// Depth budget for this step's descent. Defaults to
  /// [`crate::EngineConfig::path_step_depth`].
  #[serde(default)]
  pub max_depth_for_step: Option<usize>,
}

impl PathStep {
  /// A single-criterion step with defaults.
  pub fn new(criterion: Criterion) -> Self {
    Self { criteria: vec![criterion], match_all: true, match_mode: None, max_depth_for_step: None }
  }
}

/// How to find an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locator {
  /// When true (the default), all top-level criteria must match.
  #[serde(default = "default_true")]
  pub match_all: bool,

  /// Ordered criteria evaluated against every visited element.
  #[serde(default)]
  pub criteria: Vec<Criterion>,

  /// Ordered steps that narrow the traversal root before the criteria
  /// search.
  #[serde(default)]
  pub path_from_root: Vec<PathStep>,

  /// Require the found element to support this action.
  #[serde(default)]
  pub require_action: Option<String>,

  /// Require the element's computed name to contain this substring
  /// (case-insensitive).
  #[serde(default)]
  pub computed_name_contains: Option<String>,

  /// Emit one structured log line per visited node during the search.
  #[serde(default)]
  pub debug_path_search: bool,
}

impl Default for Locator {
  fn default() -> Self {
    Self {
      match_all: true,
      criteria: vec![],
      path_from_root: vec![],
      require_action: None,
      computed_name_contains: None,
      debug_path_search: false,
    }
  }
}

impl Locator {
  /// A locator with a single exact criterion.
  pub fn with_criterion(attribute: impl Into<String>, value: impl Into<String>) -> Self {
    Self { criteria: vec![Criterion::new(attribute, value)], ..Self::default() }
  }
}

const fn default_true() -> bool {
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn match_all_defaults_to_true_on_the_wire() {
    let locator: Locator =
      serde_json::from_str(r#"{"criteria":[{"attribute":"AXTitle","value":"OK"}]}"#)
        .expect("deserialize");
    assert!(locator.match_all);
    assert_eq!(locator.criteria.len(), 1);
    assert_eq!(locator.criteria[0].match_mode, MatchMode::Exact);
  }

  #[test]
  fn match_modes_travel_as_snake_case() {
    let json = r#"{"attribute":"AXTitle","value":"ok","matchMode":"case_insensitive_exact"}"#;
    let criterion: Criterion = serde_json::from_str(json).expect("deserialize");
    assert_eq!(criterion.match_mode, MatchMode::CaseInsensitiveExact);
  }

  #[test]
  fn path_steps_accept_per_step_depth() {
    let json = r#"{"criteria":[{"attribute":"AXRole","value":"AXWindow"}],"maxDepthForStep":2}"#;
    let step: PathStep = serde_json::from_str(json).expect("deserialize");
    assert_eq!(step.max_depth_for_step, Some(2));
    assert!(step.match_all);
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let json = r#"{"criteria":[],"futureField":1}"#;
    let locator: Locator = serde_json::from_str(json).expect("deserialize");
    assert!(locator.criteria.is_empty());
  }
}
