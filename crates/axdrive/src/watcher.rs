/*!
Scoped notification watching.

[`NotificationWatcher`] binds exactly one subscription: it holds the
token and a weak reference to the center, and guarantees the
subscription dies with it. Dropping the watcher (or calling
[`NotificationWatcher::stop`]) unsubscribes; both paths are idempotent.
*/

use crate::element::Element;
use crate::observer::{CenterShared, NotificationHandler, ObserverCenter};
use crate::port::AXPort;
use crate::types::{AxResult, Error, Pid, SubscriptionToken};
use std::sync::Weak;

/// RAII handle to one live subscription.
pub struct NotificationWatcher<P: AXPort> {
  center: Weak<CenterShared<P>>,
  token: Option<SubscriptionToken>,
}

impl<P: AXPort> std::fmt::Debug for NotificationWatcher<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NotificationWatcher").field("token", &self.token).finish()
  }
}

impl<P: AXPort> NotificationWatcher<P> {
  /// Subscribe and wrap the token in a watcher.
  pub fn new(
    center: &ObserverCenter<P>,
    pid: Option<Pid>,
    element: Option<&Element<P::Elem>>,
    notification: &str,
    handler: NotificationHandler<P::Elem>,
  ) -> AxResult<Self> {
    let token = center.subscribe(pid, element, notification, handler)?;
    Ok(Self { center: center.downgrade(), token: Some(token) })
  }

  /// The wrapped token, while the watcher is live.
  pub fn token(&self) -> Option<SubscriptionToken> {
    self.token
  }

  /// Unsubscribe now. Safe to call more than once; a vanished center or
  /// already-removed token is not an error.
  pub fn stop(&mut self) -> AxResult<()> {
    let Some(token) = self.token.take() else {
      return Ok(());
    };
    let Some(center) = self.center.upgrade() else {
      return Ok(());
    };
    match center.unsubscribe(token) {
      Ok(()) | Err(Error::TokenNotFound(_)) => Ok(()),
      Err(err) => Err(err),
    }
  }
}

impl<P: AXPort> Drop for NotificationWatcher<P> {
  fn drop(&mut self) {
    let _ = self.stop();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ax;
  use crate::port::fake::{FakeApp, FakePort};
  use std::sync::Arc;

  #[test]
  fn dropping_the_watcher_unsubscribes() {
    let port = Arc::new(FakePort::new());
    port.add_app(FakeApp::new(5, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let handler: NotificationHandler<crate::port::fake::FakeElem> =
      Arc::new(|_, _, _, _| {});

    let watcher =
      NotificationWatcher::new(&center, Some(Pid(5)), None, ax::NOTIF_VALUE_CHANGED, handler)
        .expect("watch");
    assert!(center.is_registered(Some(Pid(5)), ax::NOTIF_VALUE_CHANGED));

    drop(watcher);
    assert!(!center.is_registered(Some(Pid(5)), ax::NOTIF_VALUE_CHANGED));
    assert_eq!(port.counters().observers_dropped, 1);
  }

  #[test]
  fn stop_is_idempotent() {
    let port = Arc::new(FakePort::new());
    port.add_app(FakeApp::new(5, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let handler: NotificationHandler<crate::port::fake::FakeElem> =
      Arc::new(|_, _, _, _| {});

    let mut watcher =
      NotificationWatcher::new(&center, Some(Pid(5)), None, ax::NOTIF_VALUE_CHANGED, handler)
        .expect("watch");
    watcher.stop().expect("first stop");
    watcher.stop().expect("second stop");
    assert!(watcher.token().is_none());
  }

  #[test]
  fn stop_tolerates_a_dropped_center() {
    let port = Arc::new(FakePort::new());
    port.add_app(FakeApp::new(5, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let handler: NotificationHandler<crate::port::fake::FakeElem> =
      Arc::new(|_, _, _, _| {});

    let mut watcher =
      NotificationWatcher::new(&center, Some(Pid(5)), None, ax::NOTIF_VALUE_CHANGED, handler)
        .expect("watch");
    drop(center);
    watcher.stop().expect("stop after center drop");
  }
}
