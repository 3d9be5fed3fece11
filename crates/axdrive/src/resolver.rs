/*!
Application resolution.

Maps an app identifier (`focused`, bundle id, localized name, bundle
path, or numeric pid) to a process id using the platform's running-app
enumeration. Strategies run in a fixed order; the first match wins.
*/

use crate::port::AXPort;
use crate::types::Pid;

/// Identifier meaning "the frontmost application".
pub const FOCUSED_APP: &str = "focused";

/// Resolve an application identifier to a pid.
///
/// Tried in order: the literal `focused`; bundle id; case-insensitive
/// localized name; bundle path; numeric pid. Terminated applications
/// never match. `None` logs a warning naming the identifier.
pub fn resolve_app<P: AXPort>(port: &P, identifier: &str) -> Option<Pid> {
  if identifier == FOCUSED_APP {
    let frontmost = port.frontmost_app().map(|app| app.pid);
    if frontmost.is_none() {
      log::warn!("No frontmost application while resolving '{identifier}'");
    }
    return frontmost;
  }

  let apps: Vec<_> =
    port.running_apps().into_iter().filter(|app| !app.terminated).collect();

  if let Some(app) = apps.iter().find(|app| app.bundle_id.as_deref() == Some(identifier)) {
    return Some(app.pid);
  }

  let lowered = identifier.to_lowercase();
  if let Some(app) = apps
    .iter()
    .find(|app| app.localized_name.as_ref().is_some_and(|n| n.to_lowercase() == lowered))
  {
    return Some(app.pid);
  }

  if let Some(bundle_id) = port.bundle_id_for_path(identifier) {
    if let Some(app) = apps.iter().find(|app| app.bundle_id.as_deref() == Some(&*bundle_id)) {
      return Some(app.pid);
    }
  }

  if let Ok(pid) = identifier.parse::<u32>() {
    if let Some(app) = apps.iter().find(|app| app.pid == Pid(pid)) {
      return Some(app.pid);
    }
  }

  log::warn!("Application not found for identifier '{identifier}'");
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::port::fake::{FakeApp, FakePort};

  fn port_with_apps() -> FakePort {
    let port = FakePort::new();
    port.add_app(FakeApp::new(100, "com.example.editor", "Editor").frontmost());
    port.add_app(FakeApp::new(200, "com.example.browser", "Browser").at_path("/Apps/Browser.app"));
    port.add_app(FakeApp::new(300, "com.example.gone", "Gone").terminated());
    port
  }

  #[test]
  fn focused_resolves_to_the_frontmost_app() {
    let port = port_with_apps();
    assert_eq!(resolve_app(&port, "focused"), Some(Pid(100)));
  }

  #[test]
  fn bundle_id_wins_over_name() {
    let port = FakePort::new();
    // An app whose *name* collides with another app's bundle id.
    port.add_app(FakeApp::new(1, "com.collision", "First"));
    port.add_app(FakeApp::new(2, "com.other", "com.collision"));
    assert_eq!(resolve_app(&port, "com.collision"), Some(Pid(1)));
  }

  #[test]
  fn names_match_case_insensitively() {
    let port = port_with_apps();
    assert_eq!(resolve_app(&port, "bRoWsEr"), Some(Pid(200)));
  }

  #[test]
  fn bundle_paths_resolve_through_their_bundle_id() {
    let port = port_with_apps();
    assert_eq!(resolve_app(&port, "/Apps/Browser.app"), Some(Pid(200)));
  }

  #[test]
  fn numeric_identifiers_resolve_to_live_pids_only() {
    let port = port_with_apps();
    assert_eq!(resolve_app(&port, "100"), Some(Pid(100)));
    assert_eq!(resolve_app(&port, "300"), None); // terminated
    assert_eq!(resolve_app(&port, "999"), None);
  }

  #[test]
  fn name_wins_over_numeric_parse() {
    let port = FakePort::new();
    port.add_app(FakeApp::new(7, "com.seven", "7000"));
    port.add_app(FakeApp::new(7000, "com.seven-thousand", "Other"));
    // "7000" matches the first app's localized name before pid lookup.
    assert_eq!(resolve_app(&port, "7000"), Some(Pid(7)));
  }
}
