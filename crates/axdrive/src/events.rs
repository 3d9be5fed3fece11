/*!
Event forwarding for observe commands.

The wire protocol cannot carry a callback, so `observe` subscriptions
forward their notifications to the engine's [`EventSink`]. The sink is
injected at engine construction; the default [`NoopEventSink`] drops
everything.
*/

use crate::types::{AXElementData, AttributeValue, Pid};

/// One forwarded notification.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
  /// Source process; `None` for events reaching a global subscription
  /// through the system-wide observer.
  pub pid: Option<Pid>,
  pub notification: String,
  /// Snapshot of the affected element, with the attributes the observe
  /// command requested.
  pub element: AXElementData,
  /// Platform user-info payload, when present.
  pub user_info: Option<AttributeValue>,
}

/// Receiver for notifications observed on behalf of wire clients.
pub trait EventSink: Send + Sync {
  fn notification(&self, event: NotificationEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
  fn notification(&self, _event: NotificationEvent) {}
}

/// Sink that buffers events in memory. Useful in tests and for pull-based
/// consumers.
#[derive(Debug, Default)]
pub struct BufferedEventSink {
  events: parking_lot::Mutex<Vec<NotificationEvent>>,
}

impl BufferedEventSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Drain all buffered events.
  pub fn take(&self) -> Vec<NotificationEvent> {
    std::mem::take(&mut *self.events.lock())
  }

  pub fn len(&self) -> usize {
    self.events.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.lock().is_empty()
  }
}

impl EventSink for BufferedEventSink {
  fn notification(&self, event: NotificationEvent) {
    self.events.lock().push(event);
  }
}
