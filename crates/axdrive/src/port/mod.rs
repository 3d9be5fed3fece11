/*!
Platform abstraction traits.

The engine never touches a platform accessibility API directly; it
consumes the narrow capability defined here. A platform backend
implements [`AXPort`] (process-global operations), [`ElemPort`]
(per-element operations), and [`ObserverPort`] (notification delivery).
The in-memory backend used by the test suite lives in [`fake`].

# Executor contract

All engine state mutates on one coordinating executor. Implementations
must post observer callbacks onto that executor before invoking them; the
engine performs no additional hopping.
*/

pub mod fake;

use crate::types::{AttributeValue, Pid};
use parking_lot::Mutex;
use std::sync::Arc;

/// Platform error codes, as reported by the native AX surface.
///
/// [`crate::Error`] maps each code to exactly one taxonomy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AXCode {
  ApiDisabled,
  NotAuthorized,
  ActionUnsupported,
  AttributeUnsupported,
  ParameterizedAttributeUnsupported,
  CannotComplete,
  Failure,
  IllegalArgument,
  InvalidUIElement,
  InvalidUIElementObserver,
  NoValue,
  NotImplemented,
  NotificationAlreadyRegistered,
  NotificationNotRegistered,
  NotificationUnsupported,
}

impl AXCode {
  /// Every code, for totality checks over the error mapping.
  pub const ALL: &'static [Self] = &[
    Self::ApiDisabled,
    Self::NotAuthorized,
    Self::ActionUnsupported,
    Self::AttributeUnsupported,
    Self::ParameterizedAttributeUnsupported,
    Self::CannotComplete,
    Self::Failure,
    Self::IllegalArgument,
    Self::InvalidUIElement,
    Self::InvalidUIElementObserver,
    Self::NoValue,
    Self::NotImplemented,
    Self::NotificationAlreadyRegistered,
    Self::NotificationNotRegistered,
    Self::NotificationUnsupported,
  ];
}

/// A shared, mutable list node inside a [`RawValue`] tree.
///
/// Containers are reference-counted so backends can report the aliasing
/// (and, through interior mutability, the cycles) native object graphs
/// exhibit. The unwrapper detects revisits by pointer identity.
pub type SharedList<E> = Arc<Mutex<Vec<RawValue<E>>>>;

/// A shared, mutable dictionary node inside a [`RawValue`] tree.
/// Entries keep their native order.
pub type SharedDict<E> = Arc<Mutex<Vec<(String, RawValue<E>)>>>;

/// An opaque native value, as read from an attribute.
///
/// This is the heterogeneous form the platform reports;
/// [`crate::unwrap::unwrap_value`] collapses it into the closed
/// [`AttributeValue`] sum.
#[derive(Debug, Clone)]
pub enum RawValue<E> {
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  /// Attributed string; only the plain text survives unwrapping.
  AttributedString(String),
  /// A reference to another element.
  Element(E),
  Point { x: f64, y: f64 },
  Size { width: f64, height: f64 },
  Rect { x: f64, y: f64, width: f64, height: f64 },
  Range { location: i64, length: i64 },
  Array(SharedList<E>),
  Dict(SharedDict<E>),
  /// Anything else; carries the native debug form.
  Opaque(String),
}

impl<E> RawValue<E> {
  /// Build an array node.
  pub fn array(items: Vec<RawValue<E>>) -> Self {
    Self::Array(Arc::new(Mutex::new(items)))
  }

  /// Build a dictionary node.
  pub fn dict(entries: Vec<(String, RawValue<E>)>) -> Self {
    Self::Dict(Arc::new(Mutex::new(entries)))
  }
}

impl<E> From<&str> for RawValue<E> {
  fn from(s: &str) -> Self {
    Self::String(s.to_owned())
  }
}

/// A running application as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningApp {
  pub pid: Pid,
  pub bundle_id: Option<String>,
  pub localized_name: Option<String>,
  pub frontmost: bool,
  pub terminated: bool,
}

/// Trust probing, factored out of [`AXPort`] so permission watchers can
/// consume it alone.
pub trait PermissionProbe: Send + Sync {
  /// Whether this process is trusted for accessibility access.
  fn is_trusted(&self) -> bool;

  /// Prompt the user for trust; returns the post-prompt state.
  fn prompt_for_trust(&self) -> bool {
    self.is_trusted()
  }
}

/// Callback invoked by a platform observer: element, notification name,
/// optional user-info payload. Runs on the coordinating executor.
pub type ObserverCallback<E> = Arc<dyn Fn(&E, &str, Option<&AttributeValue>) + Send + Sync>;

/// Platform-global operations (not tied to a specific element).
pub trait AXPort: PermissionProbe + Send + Sync + 'static {
  /// Element handle type for this platform.
  type Elem: ElemPort;
  /// Observer type for this platform.
  type Observer: ObserverPort<Elem = Self::Elem>;

  /// Enumerate running applications, terminated ones included.
  fn running_apps(&self) -> Vec<RunningApp>;

  /// The frontmost application, if any.
  fn frontmost_app(&self) -> Option<RunningApp>;

  /// Read the bundle id of an application bundle on disk.
  fn bundle_id_for_path(&self, path: &str) -> Option<String>;

  /// The system-wide element (scope for global observations and
  /// unscoped hit tests).
  fn system_wide_element(&self) -> Self::Elem;

  /// The root application element for a process.
  fn application_element(&self, pid: Pid) -> Self::Elem;

  /// Hit-test a screen point under the given root. `Ok(None)` is a miss.
  fn element_at_point(&self, root: &Self::Elem, x: f64, y: f64)
    -> Result<Option<Self::Elem>, AXCode>;

  /// Create a notification observer. `None` targets the system-wide
  /// pseudo-process. The callback fires on the coordinating executor.
  fn create_observer(
    &self,
    pid: Option<Pid>,
    callback: ObserverCallback<Self::Elem>,
  ) -> Result<Self::Observer, AXCode>;
}

/// Per-element operations.
///
/// This is the opaque handle the engine holds onto. Clone is cheap
/// (reference-counted on the native side).
pub trait ElemPort: Clone + std::fmt::Debug + Send + Sync + 'static {
  /// Read a raw attribute value.
  fn attribute(&self, name: &str) -> Result<RawValue<Self>, AXCode>;

  /// Read a parameterized attribute value.
  fn parameterized_attribute(
    &self,
    name: &str,
    parameter: &RawValue<Self>,
  ) -> Result<RawValue<Self>, AXCode>;

  /// Write an attribute. Fails with the platform's refusal code.
  fn set_attribute(&self, name: &str, value: RawValue<Self>) -> Result<(), AXCode>;

  /// Whether an attribute accepts writes.
  fn is_attribute_settable(&self, name: &str) -> Result<bool, AXCode>;

  /// Every attribute name the element exposes.
  fn attribute_names(&self) -> Result<Vec<String>, AXCode>;

  /// Every parameterized attribute name the element exposes.
  fn parameterized_attribute_names(&self) -> Result<Vec<String>, AXCode>;

  /// Actions the element supports.
  fn actions(&self) -> Result<Vec<String>, AXCode>;

  /// Perform a named action.
  fn perform_action(&self, name: &str) -> Result<(), AXCode>;

  /// Owning process.
  fn pid(&self) -> Result<Pid, AXCode>;

  /// Stable identity hash for deduplication and cycle guards.
  fn identity(&self) -> u64;

  /// Whether two handles reference the same native element.
  fn is_same(&self, other: &Self) -> bool;
}

/// Observer for element notifications.
///
/// One observer exists per observed process; registrations are added and
/// removed per (target element, notification) pair.
pub trait ObserverPort: Send + Sync + 'static {
  /// Element handle type (must match `AXPort::Elem`).
  type Elem: ElemPort;

  /// Register a notification on a target element.
  fn add_notification(&self, target: &Self::Elem, notification: &str) -> Result<(), AXCode>;

  /// Remove a notification registration.
  fn remove_notification(&self, target: &Self::Elem, notification: &str) -> Result<(), AXCode>;

  /// Attach the observer's source to the coordinating executor's run
  /// loop.
  fn attach_run_loop(&self);

  /// Detach the observer's source; no callbacks fire afterwards.
  fn detach_run_loop(&self);
}
