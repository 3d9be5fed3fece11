/*!
In-memory [`AXPort`] backend.

Builds a scripted application/element tree with no platform dependency.
The engine's test suite runs entirely against this backend; it also
serves as the reference for what a native backend must do: attribute
reads honoring scripted error codes, hit-test tables, and observer
bookkeeping with exact add/remove/teardown counting.

```
use axdrive::port::fake::{FakeApp, FakePort};
use axdrive::port::{ElemPort, RawValue};

let port = FakePort::new();
let app = port.add_app(FakeApp::new(101, "com.example.editor", "Editor"));
let window = port.add_element(&app, "AXWindow", vec![("AXTitle", RawValue::from("Main"))]);
assert!(window.attribute("AXTitle").is_ok());
```
*/

use super::{AXCode, AXPort, ElemPort, ObserverCallback, ObserverPort, PermissionProbe, RawValue, RunningApp};
use crate::ax;
use crate::types::{AttributeValue, Pid};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Spec for one scripted application.
#[derive(Debug, Clone)]
pub struct FakeApp {
  pub pid: u32,
  pub bundle_id: String,
  pub name: String,
  pub frontmost: bool,
  pub terminated: bool,
  /// Bundle path registered for path-based resolution.
  pub path: Option<String>,
}

impl FakeApp {
  pub fn new(pid: u32, bundle_id: &str, name: &str) -> Self {
    Self {
      pid,
      bundle_id: bundle_id.to_owned(),
      name: name.to_owned(),
      frontmost: false,
      terminated: false,
      path: None,
    }
  }

  pub fn frontmost(mut self) -> Self {
    self.frontmost = true;
    self
  }

  pub fn terminated(mut self) -> Self {
    self.terminated = true;
    self
  }

  pub fn at_path(mut self, path: &str) -> Self {
    self.path = Some(path.to_owned());
    self
  }
}

/// Observer bookkeeping counts, for multiplex property tests.
#[derive(Debug, Clone, Default)]
pub struct FakeCounters {
  pub observers_created: usize,
  pub observers_dropped: usize,
  pub notifications_added: Vec<(Option<Pid>, String)>,
  pub notifications_removed: Vec<(Option<Pid>, String)>,
  pub run_loop_attached: usize,
  pub run_loop_detached: usize,
  /// Actions performed, as (element id, action name).
  pub actions_performed: Vec<(u64, String)>,
}

struct Node {
  pid: Option<Pid>,
  /// Stored attributes in insertion order (drives `attribute_names`).
  attrs: Vec<(String, RawValue<FakeElem>)>,
  param_attrs: Vec<String>,
  settable: HashSet<String>,
  actions: Vec<String>,
  attr_errors: HashMap<String, AXCode>,
  action_errors: HashMap<String, AXCode>,
  parent: Option<u64>,
  children: Vec<u64>,
  valid: bool,
}

struct ObserverRecord {
  callback: ObserverCallback<FakeElem>,
  notifications: HashSet<(u64, String)>,
  attached: bool,
}

struct FakeState {
  apps: Vec<FakeApp>,
  trusted: bool,
  nodes: HashMap<u64, Node>,
  app_roots: HashMap<Pid, u64>,
  focused: HashMap<Pid, u64>,
  hits: Vec<(f64, f64, u64)>,
  observers: HashMap<Option<Pid>, ObserverRecord>,
  counters: FakeCounters,
  next_id: u64,
}

const SYSTEM_WIDE_ID: u64 = 0;

/// The in-memory platform backend.
#[derive(Clone)]
pub struct FakePort {
  state: Arc<Mutex<FakeState>>,
}

impl Default for FakePort {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for FakePort {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FakePort").finish_non_exhaustive()
  }
}

impl FakePort {
  /// A trusted port with an empty tree.
  pub fn new() -> Self {
    let mut nodes = HashMap::new();
    nodes.insert(
      SYSTEM_WIDE_ID,
      Node {
        pid: None,
        attrs: vec![(ax::ATTR_ROLE.to_owned(), RawValue::String("AXSystemWide".to_owned()))],
        param_attrs: vec![],
        settable: HashSet::new(),
        actions: vec![],
        attr_errors: HashMap::new(),
        action_errors: HashMap::new(),
        parent: None,
        children: vec![],
        valid: true,
      },
    );
    Self {
      state: Arc::new(Mutex::new(FakeState {
        apps: vec![],
        trusted: true,
        nodes,
        app_roots: HashMap::new(),
        focused: HashMap::new(),
        hits: vec![],
        observers: HashMap::new(),
        counters: FakeCounters::default(),
        next_id: 1,
      })),
    }
  }

  fn elem(&self, id: u64) -> FakeElem {
    FakeElem { id, state: Arc::clone(&self.state) }
  }

  // === Tree building ===

  /// Register an application and create its root element.
  pub fn add_app(&self, app: FakeApp) -> FakeElem {
    let mut state = self.state.lock();
    let pid = Pid(app.pid);
    let id = state.next_id;
    state.next_id += 1;
    state.nodes.insert(
      id,
      Node {
        pid: Some(pid),
        attrs: vec![
          (ax::ATTR_ROLE.to_owned(), RawValue::String(ax::ROLE_APPLICATION.to_owned())),
          (ax::ATTR_TITLE.to_owned(), RawValue::String(app.name.clone())),
        ],
        param_attrs: vec![],
        settable: HashSet::new(),
        actions: vec![],
        attr_errors: HashMap::new(),
        action_errors: HashMap::new(),
        parent: None,
        children: vec![],
        valid: true,
      },
    );
    state.app_roots.insert(pid, id);
    state.apps.push(app);
    drop(state);
    self.elem(id)
  }

  /// Create an element under a parent. Attributes keep their insertion
  /// order; `AXRole` is stored first.
  pub fn add_element(
    &self,
    parent: &FakeElem,
    role: &str,
    attrs: Vec<(&str, RawValue<FakeElem>)>,
  ) -> FakeElem {
    let mut state = self.state.lock();
    let pid = state.nodes.get(&parent.id).and_then(|n| n.pid);
    let id = state.next_id;
    state.next_id += 1;
    let mut stored = vec![(ax::ATTR_ROLE.to_owned(), RawValue::String(role.to_owned()))];
    stored.extend(attrs.into_iter().map(|(name, value)| (name.to_owned(), value)));
    state.nodes.insert(
      id,
      Node {
        pid,
        attrs: stored,
        param_attrs: vec![],
        settable: HashSet::new(),
        actions: vec![],
        attr_errors: HashMap::new(),
        action_errors: HashMap::new(),
        parent: Some(parent.id),
        children: vec![],
        valid: true,
      },
    );
    if let Some(parent_node) = state.nodes.get_mut(&parent.id) {
      parent_node.children.push(id);
    }
    drop(state);
    self.elem(id)
  }

  // === Scripting ===

  pub fn set_trusted(&self, trusted: bool) {
    self.state.lock().trusted = trusted;
  }

  pub fn set_attr(&self, elem: &FakeElem, name: &str, value: RawValue<FakeElem>) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      if let Some(entry) = node.attrs.iter_mut().find(|(n, _)| n == name) {
        entry.1 = value;
      } else {
        node.attrs.push((name.to_owned(), value));
      }
    }
  }

  /// Script an error for reads of one attribute.
  pub fn set_attr_error(&self, elem: &FakeElem, name: &str, code: AXCode) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.attr_errors.insert(name.to_owned(), code);
    }
  }

  pub fn set_actions(&self, elem: &FakeElem, actions: &[&str]) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.actions = actions.iter().map(|a| (*a).to_owned()).collect();
    }
  }

  /// Script an error for one action.
  pub fn set_action_error(&self, elem: &FakeElem, action: &str, code: AXCode) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.action_errors.insert(action.to_owned(), code);
    }
  }

  /// Mark an attribute writable.
  pub fn set_settable(&self, elem: &FakeElem, name: &str) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.settable.insert(name.to_owned());
    }
  }

  pub fn set_param_attrs(&self, elem: &FakeElem, names: &[&str]) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.param_attrs = names.iter().map(|n| (*n).to_owned()).collect();
    }
  }

  /// Set the app-level focused element.
  pub fn set_focused(&self, pid: Pid, elem: &FakeElem) {
    self.state.lock().focused.insert(pid, elem.id);
  }

  /// Script a hit-test result at exact coordinates.
  pub fn set_hit(&self, x: f64, y: f64, elem: &FakeElem) {
    self.state.lock().hits.push((x, y, elem.id));
  }

  /// Invalidate an element, as if its process died.
  pub fn invalidate(&self, elem: &FakeElem) {
    let mut state = self.state.lock();
    if let Some(node) = state.nodes.get_mut(&elem.id) {
      node.valid = false;
    }
  }

  /// Snapshot the observer bookkeeping counters.
  pub fn counters(&self) -> FakeCounters {
    self.state.lock().counters.clone()
  }

  /// Fire a notification through the observer registered for `key`.
  ///
  /// Delivery requires an attached observer with at least one
  /// registration for the notification name (registration targets scope
  /// whole apps, as on the native side). The state lock is released
  /// before the callback runs.
  pub fn fire(
    &self,
    key: Option<Pid>,
    elem: &FakeElem,
    notification: &str,
    user_info: Option<&AttributeValue>,
  ) -> bool {
    let callback = {
      let state = self.state.lock();
      let Some(record) = state.observers.get(&key) else {
        return false;
      };
      if !record.attached || !record.notifications.iter().any(|(_, n)| n == notification) {
        return false;
      }
      Arc::clone(&record.callback)
    };
    callback(elem, notification, user_info);
    true
  }
}

impl PermissionProbe for FakePort {
  fn is_trusted(&self) -> bool {
    self.state.lock().trusted
  }

  fn prompt_for_trust(&self) -> bool {
    self.state.lock().trusted
  }
}

impl AXPort for FakePort {
  type Elem = FakeElem;
  type Observer = FakeObserver;

  fn running_apps(&self) -> Vec<RunningApp> {
    self
      .state
      .lock()
      .apps
      .iter()
      .map(|app| RunningApp {
        pid: Pid(app.pid),
        bundle_id: Some(app.bundle_id.clone()),
        localized_name: Some(app.name.clone()),
        frontmost: app.frontmost,
        terminated: app.terminated,
      })
      .collect()
  }

  fn frontmost_app(&self) -> Option<RunningApp> {
    self.running_apps().into_iter().find(|app| app.frontmost && !app.terminated)
  }

  fn bundle_id_for_path(&self, path: &str) -> Option<String> {
    let state = self.state.lock();
    state
      .apps
      .iter()
      .find(|app| app.path.as_deref() == Some(path))
      .map(|app| app.bundle_id.clone())
  }

  fn system_wide_element(&self) -> FakeElem {
    self.elem(SYSTEM_WIDE_ID)
  }

  fn application_element(&self, pid: Pid) -> FakeElem {
    let id = self.state.lock().app_roots.get(&pid).copied();
    // Unknown pids still produce a handle; every operation on it reports
    // an invalid element, matching the native API.
    self.elem(id.unwrap_or(u64::MAX))
  }

  fn element_at_point(&self, root: &FakeElem, x: f64, y: f64) -> Result<Option<FakeElem>, AXCode> {
    let state = self.state.lock();
    let root_pid = state.nodes.get(&root.id).and_then(|n| n.pid);
    let hit = state.hits.iter().find(|(hx, hy, id)| {
      *hx == x
        && *hy == y
        && match root_pid {
          Some(pid) => state.nodes.get(id).and_then(|n| n.pid) == Some(pid),
          None => true,
        }
    });
    Ok(hit.map(|(_, _, id)| FakeElem { id: *id, state: Arc::clone(&self.state) }))
  }

  fn create_observer(
    &self,
    pid: Option<Pid>,
    callback: ObserverCallback<FakeElem>,
  ) -> Result<FakeObserver, AXCode> {
    let mut state = self.state.lock();
    if let Some(p) = pid {
      if !state.app_roots.contains_key(&p) {
        return Err(AXCode::InvalidUIElement);
      }
    }
    state.observers.insert(
      pid,
      ObserverRecord { callback, notifications: HashSet::new(), attached: false },
    );
    state.counters.observers_created += 1;
    Ok(FakeObserver { key: pid, state: Arc::clone(&self.state) })
  }
}

/// Handle to one fake element.
#[derive(Clone)]
pub struct FakeElem {
  id: u64,
  state: Arc<Mutex<FakeState>>,
}

impl std::fmt::Debug for FakeElem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "FakeElem({})", self.id)
  }
}

impl FakeElem {
  fn with_node<T>(&self, f: impl FnOnce(&FakeState, &Node) -> T) -> Result<T, AXCode> {
    let state = self.state.lock();
    let node = state.nodes.get(&self.id).ok_or(AXCode::InvalidUIElement)?;
    if !node.valid {
      return Err(AXCode::InvalidUIElement);
    }
    Ok(f(&state, node))
  }

  fn make(&self, id: u64) -> FakeElem {
    FakeElem { id, state: Arc::clone(&self.state) }
  }
}

impl ElemPort for FakeElem {
  fn attribute(&self, name: &str) -> Result<RawValue<Self>, AXCode> {
    let computed = self.with_node(|state, node| {
      if let Some(code) = node.attr_errors.get(name) {
        return Err(*code);
      }
      match name {
        ax::ATTR_CHILDREN => Ok(Some(RawValue::array(
          node.children.iter().map(|id| RawValue::Element(self.make(*id))).collect(),
        ))),
        ax::ATTR_PARENT => match node.parent {
          Some(parent) => Ok(Some(RawValue::Element(self.make(parent)))),
          None => Err(AXCode::NoValue),
        },
        ax::ATTR_WINDOWS => {
          let windows: Vec<_> = node
            .children
            .iter()
            .filter(|id| {
              state.nodes.get(id).is_some_and(|child| {
                child.attrs.iter().any(|(n, v)| {
                  n == ax::ATTR_ROLE
                    && matches!(v, RawValue::String(role) if role == ax::ROLE_WINDOW)
                })
              })
            })
            .map(|id| RawValue::Element(self.make(*id)))
            .collect();
          if windows.is_empty() {
            Err(AXCode::NoValue)
          } else {
            Ok(Some(RawValue::array(windows)))
          }
        }
        ax::ATTR_FOCUSED_UI_ELEMENT => {
          let focused =
            node.pid.and_then(|pid| state.focused.get(&pid)).map(|id| self.make(*id));
          match focused {
            Some(elem) => Ok(Some(RawValue::Element(elem))),
            None => Err(AXCode::NoValue),
          }
        }
        _ => Ok(None),
      }
    })??;
    if let Some(value) = computed {
      return Ok(value);
    }
    self.with_node(|_, node| {
      node
        .attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
        .ok_or(AXCode::AttributeUnsupported)
    })?
  }

  fn parameterized_attribute(
    &self,
    name: &str,
    _parameter: &RawValue<Self>,
  ) -> Result<RawValue<Self>, AXCode> {
    self.with_node(|_, node| {
      if node.param_attrs.iter().any(|n| n == name) {
        Ok(RawValue::String(format!("<{name}>")))
      } else {
        Err(AXCode::ParameterizedAttributeUnsupported)
      }
    })?
  }

  fn set_attribute(&self, name: &str, value: RawValue<Self>) -> Result<(), AXCode> {
    let mut state = self.state.lock();
    let node = state.nodes.get_mut(&self.id).ok_or(AXCode::InvalidUIElement)?;
    if !node.valid {
      return Err(AXCode::InvalidUIElement);
    }
    if !node.settable.contains(name) {
      return Err(AXCode::IllegalArgument);
    }
    if let Some(entry) = node.attrs.iter_mut().find(|(n, _)| n == name) {
      entry.1 = value;
    } else {
      node.attrs.push((name.to_owned(), value));
    }
    Ok(())
  }

  fn is_attribute_settable(&self, name: &str) -> Result<bool, AXCode> {
    self.with_node(|_, node| node.settable.contains(name))
  }

  fn attribute_names(&self) -> Result<Vec<String>, AXCode> {
    self.with_node(|state, node| {
      let mut names: Vec<String> = node.attrs.iter().map(|(n, _)| n.clone()).collect();
      names.push(ax::ATTR_CHILDREN.to_owned());
      if node.parent.is_some() {
        names.push(ax::ATTR_PARENT.to_owned());
      }
      if node.pid.is_some_and(|pid| state.focused.contains_key(&pid)) && node.parent.is_none() {
        names.push(ax::ATTR_FOCUSED_UI_ELEMENT.to_owned());
      }
      names
    })
  }

  fn parameterized_attribute_names(&self) -> Result<Vec<String>, AXCode> {
    self.with_node(|_, node| node.param_attrs.clone())
  }

  fn actions(&self) -> Result<Vec<String>, AXCode> {
    self.with_node(|_, node| node.actions.clone())
  }

  fn perform_action(&self, name: &str) -> Result<(), AXCode> {
    let mut state = self.state.lock();
    let node = state.nodes.get(&self.id).ok_or(AXCode::InvalidUIElement)?;
    if !node.valid {
      return Err(AXCode::InvalidUIElement);
    }
    if let Some(code) = node.action_errors.get(name) {
      return Err(*code);
    }
    if !node.actions.iter().any(|a| a == name) {
      return Err(AXCode::ActionUnsupported);
    }
    let id = self.id;
    state.counters.actions_performed.push((id, name.to_owned()));
    Ok(())
  }

  fn pid(&self) -> Result<Pid, AXCode> {
    self.with_node(|_, node| node.pid.ok_or(AXCode::NoValue))?
  }

  fn identity(&self) -> u64 {
    self.id
  }

  fn is_same(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

/// Fake observer; dropping it counts as a native teardown.
pub struct FakeObserver {
  key: Option<Pid>,
  state: Arc<Mutex<FakeState>>,
}

impl std::fmt::Debug for FakeObserver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "FakeObserver({:?})", self.key)
  }
}

impl ObserverPort for FakeObserver {
  type Elem = FakeElem;

  fn add_notification(&self, target: &FakeElem, notification: &str) -> Result<(), AXCode> {
    let mut state = self.state.lock();
    let key = self.key;
    let Some(record) = state.observers.get_mut(&key) else {
      return Err(AXCode::InvalidUIElementObserver);
    };
    if !record.notifications.insert((target.id, notification.to_owned())) {
      return Err(AXCode::NotificationAlreadyRegistered);
    }
    state.counters.notifications_added.push((key, notification.to_owned()));
    Ok(())
  }

  fn remove_notification(&self, target: &FakeElem, notification: &str) -> Result<(), AXCode> {
    let mut state = self.state.lock();
    let key = self.key;
    let Some(record) = state.observers.get_mut(&key) else {
      return Err(AXCode::InvalidUIElementObserver);
    };
    if !record.notifications.remove(&(target.id, notification.to_owned())) {
      return Err(AXCode::NotificationNotRegistered);
    }
    state.counters.notifications_removed.push((key, notification.to_owned()));
    Ok(())
  }

  fn attach_run_loop(&self) {
    let mut state = self.state.lock();
    if let Some(record) = state.observers.get_mut(&self.key) {
      record.attached = true;
    }
    state.counters.run_loop_attached += 1;
  }

  fn detach_run_loop(&self) {
    let mut state = self.state.lock();
    if let Some(record) = state.observers.get_mut(&self.key) {
      record.attached = false;
    }
    state.counters.run_loop_detached += 1;
  }
}

impl Drop for FakeObserver {
  fn drop(&mut self) {
    let mut state = self.state.lock();
    state.observers.remove(&self.key);
    state.counters.observers_dropped += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attribute_reads_follow_the_script() {
    let port = FakePort::new();
    let app = port.add_app(FakeApp::new(7, "com.test", "Test"));
    let field = port.add_element(&app, ax::ROLE_TEXT_FIELD, vec![(ax::ATTR_TITLE, "Name".into())]);

    assert!(matches!(field.attribute(ax::ATTR_TITLE), Ok(RawValue::String(s)) if s == "Name"));
    assert_eq!(field.attribute("AXMissing").unwrap_err(), AXCode::AttributeUnsupported);

    port.set_attr_error(&field, ax::ATTR_VALUE, AXCode::NoValue);
    assert_eq!(field.attribute(ax::ATTR_VALUE).unwrap_err(), AXCode::NoValue);
  }

  #[test]
  fn children_and_parent_are_computed() {
    let port = FakePort::new();
    let app = port.add_app(FakeApp::new(7, "com.test", "Test"));
    let window = port.add_element(&app, ax::ROLE_WINDOW, vec![]);

    let Ok(RawValue::Array(children)) = app.attribute(ax::ATTR_CHILDREN) else {
      panic!("expected children array");
    };
    assert_eq!(children.lock().len(), 1);

    let Ok(RawValue::Element(parent)) = window.attribute(ax::ATTR_PARENT) else {
      panic!("expected parent element");
    };
    assert!(parent.is_same(&app));
  }

  #[test]
  fn invalidated_elements_report_invalid() {
    let port = FakePort::new();
    let app = port.add_app(FakeApp::new(7, "com.test", "Test"));
    let button = port.add_element(&app, ax::ROLE_BUTTON, vec![]);
    port.invalidate(&button);
    assert_eq!(button.attribute(ax::ATTR_ROLE).unwrap_err(), AXCode::InvalidUIElement);
    assert_eq!(button.perform_action(ax::ACTION_PRESS).unwrap_err(), AXCode::InvalidUIElement);
  }

  #[test]
  fn unwritable_attributes_refuse_writes() {
    let port = FakePort::new();
    let app = port.add_app(FakeApp::new(7, "com.test", "Test"));
    let field = port.add_element(&app, ax::ROLE_TEXT_FIELD, vec![(ax::ATTR_VALUE, "a".into())]);

    assert_eq!(
      field.set_attribute(ax::ATTR_VALUE, "b".into()).unwrap_err(),
      AXCode::IllegalArgument
    );
    port.set_settable(&field, ax::ATTR_VALUE);
    assert!(field.set_attribute(ax::ATTR_VALUE, "b".into()).is_ok());
    assert!(matches!(field.attribute(ax::ATTR_VALUE), Ok(RawValue::String(s)) if s == "b"));
  }

  #[test]
  fn hit_tests_are_scoped_to_the_root_pid() {
    let port = FakePort::new();
    let app_a = port.add_app(FakeApp::new(1, "com.a", "A"));
    let app_b = port.add_app(FakeApp::new(2, "com.b", "B"));
    let button = port.add_element(&app_a, ax::ROLE_BUTTON, vec![]);
    port.set_hit(10.0, 20.0, &button);

    let hit = port.element_at_point(&app_a, 10.0, 20.0).expect("hit test");
    assert!(hit.is_some_and(|e| e.is_same(&button)));
    let miss = port.element_at_point(&app_b, 10.0, 20.0).expect("hit test");
    assert!(miss.is_none());
    let system = port.element_at_point(&port.system_wide_element(), 10.0, 20.0).expect("hit");
    assert!(system.is_some());
  }

  #[test]
  fn observers_count_adds_removes_and_teardown() {
    let port = FakePort::new();
    let app = port.add_app(FakeApp::new(9, "com.test", "Test"));
    let pid = Pid(9);
    let fired: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&fired);
    let observer = port
      .create_observer(
        Some(pid),
        Arc::new(move |_, notification, _| sink.lock().push(notification.to_owned())),
      )
      .expect("create observer");
    observer.attach_run_loop();
    observer.add_notification(&app, ax::NOTIF_VALUE_CHANGED).expect("add");

    assert!(port.fire(Some(pid), &app, ax::NOTIF_VALUE_CHANGED, None));
    assert!(!port.fire(Some(pid), &app, ax::NOTIF_TITLE_CHANGED, None));
    assert_eq!(fired.lock().as_slice(), &[ax::NOTIF_VALUE_CHANGED.to_owned()]);

    observer.remove_notification(&app, ax::NOTIF_VALUE_CHANGED).expect("remove");
    drop(observer);

    let counters = port.counters();
    assert_eq!(counters.observers_created, 1);
    assert_eq!(counters.observers_dropped, 1);
    assert_eq!(counters.notifications_added.len(), 1);
    assert_eq!(counters.notifications_removed.len(), 1);
  }
}
