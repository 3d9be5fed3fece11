/*!
Engine configuration.

All values have sensible defaults. Create a custom config to override:

```
use axdrive::EngineConfig;

let config = EngineConfig { max_search_depth: 20, ..Default::default() };
assert_eq!(config.max_path_depth, 25);
```
*/

/// Depth caps and defaults for traversal and value conversion.
///
/// Every recursive walk in the engine is bounded by one of these fields.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
  /// Default depth for the final criteria search of a locator.
  /// Default: 10.
  pub max_search_depth: usize,

  /// Default depth for a single path-hint step without an explicit
  /// `maxDepthForStep`. Default: 3.
  pub path_step_depth: usize,

  /// Ancestor-chain cap for path generation. Default: 25.
  pub max_path_depth: usize,

  /// Recursion cap for native value unwrapping. Default: 50.
  pub max_unwrap_depth: usize,

  /// Depth for the textual-content field of element snapshots.
  /// Default: 1 (element plus direct children).
  pub snapshot_text_depth: usize,

  /// Depth cap for the generic text extractor. Default: 5.
  pub max_text_depth: usize,

  /// Default recursion depth for `describeElement`. Default: 3.
  pub describe_depth: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      max_search_depth: 10,
      path_step_depth: 3,
      max_path_depth: 25,
      max_unwrap_depth: 50,
      snapshot_text_depth: 1,
      max_text_depth: 5,
      describe_depth: 3,
    }
  }
}

impl EngineConfig {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }
}
