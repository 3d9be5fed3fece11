/*!
The notification observer center.

One mediator for all UI notification subscriptions. The center enforces
at most one native observer per process and at most one native
registration per (process, notification) key, however many handlers are
attached. Teardown is reference-counted: removing the last handler for a
key removes the native registration; removing the last registration on a
process detaches and drops its observer.

# Fan-out

When the platform fires a notification, the center invokes the
specific-key handlers (in subscription order), then the global-key
handlers (same order). A handler subscribed under both keys for one
notification fires twice per event; callers wanting otherwise must keep
their handlers idempotent.

All subscription state lives behind one mutex; the lock is released
before any handler runs.
*/

use crate::element::Element;
use crate::port::{AXPort, ObserverPort};
use crate::types::{AttributeValue, AxResult, Error, Pid, SubscriptionToken};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Handler invoked on notification delivery.
///
/// Receives the source pid (when resolvable), the notification name, the
/// affected element, and the platform user-info payload.
pub type NotificationHandler<E> =
  Arc<dyn Fn(Option<Pid>, &str, &Element<E>, Option<&AttributeValue>) + Send + Sync>;

/// Observer multiplex key. `pid = None` is the global scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
  pub pid: Option<Pid>,
  pub notification: String,
}

struct KeyEntry<E: crate::port::ElemPort> {
  /// Element the native registration targets.
  target: E,
  /// Handlers in subscription order.
  handlers: Vec<(SubscriptionToken, NotificationHandler<E>)>,
}

struct ObserverEntry<O> {
  observer: O,
  /// Live (pid, notification) keys registered through this observer.
  key_count: usize,
}

struct CenterState<P: AXPort> {
  next_token: u64,
  tokens: HashMap<SubscriptionToken, SubscriptionKey>,
  keys: HashMap<SubscriptionKey, KeyEntry<P::Elem>>,
  observers: HashMap<Option<Pid>, ObserverEntry<P::Observer>>,
}

pub(crate) struct CenterShared<P: AXPort> {
  port: Arc<P>,
  state: Mutex<CenterState<P>>,
}

/// The notification multiplexer. Cheap to clone; clones share state.
pub struct ObserverCenter<P: AXPort> {
  shared: Arc<CenterShared<P>>,
}

impl<P: AXPort> Clone for ObserverCenter<P> {
  fn clone(&self) -> Self {
    Self { shared: Arc::clone(&self.shared) }
  }
}

impl<P: AXPort> std::fmt::Debug for ObserverCenter<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ObserverCenter").finish_non_exhaustive()
  }
}

impl<P: AXPort> ObserverCenter<P> {
  pub fn new(port: Arc<P>) -> Self {
    Self {
      shared: Arc::new(CenterShared {
        port,
        state: Mutex::new(CenterState {
          next_token: 1,
          tokens: HashMap::new(),
          keys: HashMap::new(),
          observers: HashMap::new(),
        }),
      }),
    }
  }

  /// Subscribe a handler to a notification.
  ///
  /// `pid = None` subscribes globally (system-wide element scope).
  /// `element = None` with a pid targets the application element.
  /// Re-subscribing an existing (pid, notification) key only grows the
  /// handler list; no second native registration happens.
  pub fn subscribe(
    &self,
    pid: Option<Pid>,
    element: Option<&Element<P::Elem>>,
    notification: &str,
    handler: NotificationHandler<P::Elem>,
  ) -> AxResult<SubscriptionToken> {
    let mut guard = self.shared.state.lock();
    let state = &mut *guard;
    let key = SubscriptionKey { pid, notification: notification.to_owned() };

    let token = SubscriptionToken(state.next_token);

    if let Some(entry) = state.keys.get_mut(&key) {
      entry.handlers.push((token, handler));
      state.next_token += 1;
      state.tokens.insert(token, key);
      log::debug!("Subscribed handler {token} to existing key {notification} (pid {pid:?})");
      return Ok(token);
    }

    let observer_created = if state.observers.contains_key(&pid) {
      false
    } else {
      let weak = Arc::downgrade(&self.shared);
      let observer_pid = pid;
      let callback = Arc::new(
        move |elem: &P::Elem, notif: &str, info: Option<&AttributeValue>| {
          if let Some(shared) = weak.upgrade() {
            fan_out::<P>(&shared, observer_pid, elem, notif, info);
          }
        },
      );
      let observer = self.shared.port.create_observer(pid, callback).map_err(|code| {
        log::error!("Observer creation failed for pid {pid:?}: {code:?}");
        Error::from_observer_code(code, format!("creating observer for pid {pid:?}"))
      })?;
      observer.attach_run_loop();
      state.observers.insert(pid, ObserverEntry { observer, key_count: 0 });
      true
    };

    let target = match element {
      Some(elem) => elem.raw().clone(),
      None => match pid {
        Some(p) => self.shared.port.application_element(p),
        None => self.shared.port.system_wide_element(),
      },
    };

    let add_result = state
      .observers
      .get_mut(&pid)
      .map(|entry| entry.observer.add_notification(&target, notification));
    match add_result {
      None => return Err(Error::Internal(format!("observer entry missing for pid {pid:?}"))),
      Some(Err(code)) => {
        log::error!("Registration failed for {notification} on pid {pid:?}: {code:?}");
        if observer_created {
          if let Some(entry) = state.observers.remove(&pid) {
            entry.observer.detach_run_loop();
          }
        }
        return Err(Error::from_observer_code(
          code,
          format!("registering {notification} for pid {pid:?}"),
        ));
      }
      Some(Ok(())) => {
        if let Some(entry) = state.observers.get_mut(&pid) {
          entry.key_count += 1;
        }
      }
    }

    state.next_token += 1;
    state.tokens.insert(token, key.clone());
    state.keys.insert(key, KeyEntry { target, handlers: vec![(token, handler)] });
    log::info!("Observing {notification} (pid {pid:?}) as {token}");
    Ok(token)
  }

  /// Remove one subscription. Removing the last handler for a key tears
  /// down the native registration (and observer, when it was the last
  /// key).
  pub fn unsubscribe(&self, token: SubscriptionToken) -> AxResult<()> {
    self.shared.unsubscribe(token)
  }

  /// Drop every subscription for one process scope.
  pub fn remove_all_for(&self, pid: Option<Pid>) {
    let mut state = self.shared.state.lock();
    let tokens: Vec<(SubscriptionToken, SubscriptionKey)> = state
      .tokens
      .iter()
      .filter(|(_, key)| key.pid == pid)
      .map(|(token, key)| (*token, key.clone()))
      .collect();
    for (token, key) in tokens {
      state.tokens.remove(&token);
      remove_handler::<P>(&mut state, &key, token);
    }
  }

  /// Drop every subscription.
  pub fn remove_all(&self) {
    let mut state = self.shared.state.lock();
    let tokens: Vec<(SubscriptionToken, SubscriptionKey)> =
      state.tokens.iter().map(|(token, key)| (*token, key.clone())).collect();
    for (token, key) in tokens {
      state.tokens.remove(&token);
      remove_handler::<P>(&mut state, &key, token);
    }
  }

  /// Whether a native registration exists for the key.
  pub fn is_registered(&self, pid: Option<Pid>, notification: &str) -> bool {
    let state = self.shared.state.lock();
    state.keys.contains_key(&SubscriptionKey { pid, notification: notification.to_owned() })
  }

  /// Number of handlers attached to the key.
  pub fn handler_count(&self, pid: Option<Pid>, notification: &str) -> usize {
    let state = self.shared.state.lock();
    state
      .keys
      .get(&SubscriptionKey { pid, notification: notification.to_owned() })
      .map_or(0, |entry| entry.handlers.len())
  }

  pub(crate) fn downgrade(&self) -> Weak<CenterShared<P>> {
    Arc::downgrade(&self.shared)
  }
}

impl<P: AXPort> CenterShared<P> {
  pub(crate) fn unsubscribe(&self, token: SubscriptionToken) -> AxResult<()> {
    let mut state = self.state.lock();
    let key = state.tokens.remove(&token).ok_or(Error::TokenNotFound(token))?;
    remove_handler::<P>(&mut state, &key, token);
    log::debug!("Unsubscribed {token} from {} (pid {:?})", key.notification, key.pid);
    Ok(())
  }
}

/// Remove a handler from a key entry; tear down registration and
/// observer when the respective counts reach zero. Caller holds the
/// state lock and has already removed the token.
fn remove_handler<P: AXPort>(
  state: &mut CenterState<P>,
  key: &SubscriptionKey,
  token: SubscriptionToken,
) {
  let Some(entry) = state.keys.get_mut(key) else {
    return;
  };
  entry.handlers.retain(|(t, _)| *t != token);
  if !entry.handlers.is_empty() {
    return;
  }

  let Some(entry) = state.keys.remove(key) else {
    return;
  };
  if let Some(observer_entry) = state.observers.get_mut(&key.pid) {
    if let Err(code) = observer_entry.observer.remove_notification(&entry.target, &key.notification)
    {
      log::warn!("Deregistering {} on pid {:?} failed: {code:?}", key.notification, key.pid);
    }
    observer_entry.key_count = observer_entry.key_count.saturating_sub(1);
    if observer_entry.key_count == 0 {
      if let Some(removed) = state.observers.remove(&key.pid) {
        removed.observer.detach_run_loop();
        log::info!("Tearing down observer for pid {:?}", key.pid);
      }
    }
  }
}

/// Deliver one platform notification to the matching handler sets.
///
/// Collects specific-key then global-key handlers under the lock,
/// releases it, and invokes them in order.
fn fan_out<P: AXPort>(
  shared: &Arc<CenterShared<P>>,
  observer_pid: Option<Pid>,
  elem: &P::Elem,
  notification: &str,
  user_info: Option<&AttributeValue>,
) {
  let handlers: Vec<NotificationHandler<P::Elem>> = {
    let state = shared.state.lock();
    let mut list = Vec::new();
    let specific =
      SubscriptionKey { pid: observer_pid, notification: notification.to_owned() };
    if let Some(entry) = state.keys.get(&specific) {
      list.extend(entry.handlers.iter().map(|(_, h)| Arc::clone(h)));
    }
    if observer_pid.is_some() {
      let global = SubscriptionKey { pid: None, notification: notification.to_owned() };
      if let Some(entry) = state.keys.get(&global) {
        list.extend(entry.handlers.iter().map(|(_, h)| Arc::clone(h)));
      }
    }
    list
  };

  if handlers.is_empty() {
    return;
  }

  let element = Element::new(elem.clone());
  let event_pid = observer_pid.or_else(|| element.pid());
  log::debug!(
    "Delivering {notification} (pid {event_pid:?}) to {} handler(s)",
    handlers.len()
  );
  for handler in handlers {
    handler(event_pid, notification, &element, user_info);
  }
}

impl<P: AXPort> Drop for CenterShared<P> {
  fn drop(&mut self) {
    let state = self.state.get_mut();
    for (_, entry) in state.observers.drain() {
      entry.observer.detach_run_loop();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ax;
  use crate::port::fake::{FakeApp, FakePort};

  fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> NotificationHandler<crate::port::fake::FakeElem>) {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
    let log_for_factory = Arc::clone(&log);
    let factory = move |tag: &str| {
      let log = Arc::clone(&log_for_factory);
      let tag = tag.to_owned();
      let handler: NotificationHandler<crate::port::fake::FakeElem> =
        Arc::new(move |_pid, notification, _elem, _info| {
          log.lock().push(format!("{tag}:{notification}"));
        });
      handler
    };
    (log, factory)
  }

  #[test]
  fn one_native_registration_for_many_handlers() {
    let port = Arc::new(FakePort::new());
    let app = port.add_app(FakeApp::new(200, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let (_log, handler) = recorder();
    let pid = Pid(200);

    let tokens: Vec<_> = (0..3)
      .map(|i| {
        center
          .subscribe(Some(pid), None, ax::NOTIF_VALUE_CHANGED, handler(&format!("h{i}")))
          .expect("subscribe")
      })
      .collect();

    let counters = port.counters();
    assert_eq!(counters.observers_created, 1);
    assert_eq!(counters.notifications_added.len(), 1);
    assert_eq!(center.handler_count(Some(pid), ax::NOTIF_VALUE_CHANGED), 3);

    for token in tokens {
      center.unsubscribe(token).expect("unsubscribe");
    }
    let counters = port.counters();
    assert_eq!(counters.notifications_removed.len(), 1);
    assert_eq!(counters.observers_dropped, 1);
    assert!(!center.is_registered(Some(pid), ax::NOTIF_VALUE_CHANGED));
    drop(app);
  }

  #[test]
  fn fan_out_runs_in_subscription_order() {
    let port = Arc::new(FakePort::new());
    let app = port.add_app(FakeApp::new(200, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let (log, handler) = recorder();
    let pid = Pid(200);

    for i in 0..3 {
      center
        .subscribe(Some(pid), None, ax::NOTIF_VALUE_CHANGED, handler(&format!("h{i}")))
        .expect("subscribe");
    }
    assert!(port.fire(Some(pid), &app, ax::NOTIF_VALUE_CHANGED, None));
    assert_eq!(
      log.lock().as_slice(),
      &[
        "h0:AXValueChanged".to_owned(),
        "h1:AXValueChanged".to_owned(),
        "h2:AXValueChanged".to_owned()
      ]
    );
  }

  #[test]
  fn global_handlers_fire_after_specific_ones() {
    let port = Arc::new(FakePort::new());
    let app = port.add_app(FakeApp::new(200, "com.test", "Test"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let (log, handler) = recorder();
    let pid = Pid(200);

    center.subscribe(None, None, ax::NOTIF_VALUE_CHANGED, handler("global")).expect("subscribe");
    center
      .subscribe(Some(pid), None, ax::NOTIF_VALUE_CHANGED, handler("specific"))
      .expect("subscribe");

    assert!(port.fire(Some(pid), &app, ax::NOTIF_VALUE_CHANGED, None));
    assert_eq!(
      log.lock().as_slice(),
      &["specific:AXValueChanged".to_owned(), "global:AXValueChanged".to_owned()]
    );
  }

  #[test]
  fn global_only_events_fire_once() {
    let port = Arc::new(FakePort::new());
    let center = ObserverCenter::new(Arc::clone(&port));
    let (log, handler) = recorder();

    center.subscribe(None, None, ax::NOTIF_WINDOW_CREATED, handler("global")).expect("subscribe");
    let system = port.system_wide_element();
    assert!(port.fire(None, &system, ax::NOTIF_WINDOW_CREATED, None));
    assert_eq!(log.lock().len(), 1);
  }

  #[test]
  fn unsubscribing_an_unknown_token_errors() {
    let port = Arc::new(FakePort::new());
    let center = ObserverCenter::new(port);
    let err = center.unsubscribe(SubscriptionToken(99)).expect_err("unknown token");
    assert!(matches!(err, Error::TokenNotFound(_)));
    assert_eq!(err.code(), "observation_failed");
  }

  #[test]
  fn failed_observer_creation_records_nothing() {
    let port = Arc::new(FakePort::new());
    // No app registered for pid 999: observer creation fails.
    let center = ObserverCenter::new(Arc::clone(&port));
    let (_log, handler) = recorder();
    let err = center
      .subscribe(Some(Pid(999)), None, ax::NOTIF_VALUE_CHANGED, handler("h"))
      .expect_err("creation fails");
    assert!(matches!(err, Error::ObservationFailed { .. }));
    assert_eq!(center.handler_count(Some(Pid(999)), ax::NOTIF_VALUE_CHANGED), 0);
    assert_eq!(port.counters().observers_created, 0);
  }

  #[test]
  fn remove_all_for_scopes_to_one_pid() {
    let port = Arc::new(FakePort::new());
    port.add_app(FakeApp::new(1, "com.a", "A"));
    port.add_app(FakeApp::new(2, "com.b", "B"));
    let center = ObserverCenter::new(Arc::clone(&port));
    let (_log, handler) = recorder();

    center.subscribe(Some(Pid(1)), None, ax::NOTIF_VALUE_CHANGED, handler("a")).expect("sub");
    center.subscribe(Some(Pid(2)), None, ax::NOTIF_VALUE_CHANGED, handler("b")).expect("sub");

    center.remove_all_for(Some(Pid(1)));
    assert!(!center.is_registered(Some(Pid(1)), ax::NOTIF_VALUE_CHANGED));
    assert!(center.is_registered(Some(Pid(2)), ax::NOTIF_VALUE_CHANGED));

    center.remove_all();
    assert!(!center.is_registered(Some(Pid(2)), ax::NOTIF_VALUE_CHANGED));
    assert_eq!(port.counters().observers_dropped, 2);
  }
}
