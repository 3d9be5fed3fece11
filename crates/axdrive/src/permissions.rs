/*!
Permission-state watching.

Polls a [`PermissionProbe`] at a fixed interval and invokes a callback
when the trust state flips. Watching stops when the returned handle is
dropped.
*/

use crate::port::PermissionProbe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default poll interval for trust-state changes.
pub const DEFAULT_PERMISSION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running permission watcher. Polling stops when this is
/// dropped.
pub struct PermissionWatcher {
  stop_signal: Arc<AtomicBool>,
  thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PermissionWatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PermissionWatcher").finish_non_exhaustive()
  }
}

impl PermissionWatcher {
  /// Start polling `probe` every `interval`, invoking `on_change` with
  /// the new state whenever trust flips. The initial state is read
  /// before the first sleep and not reported.
  pub fn start<F>(probe: Arc<dyn PermissionProbe>, interval: Duration, on_change: F) -> Self
  where
    F: Fn(bool) + Send + 'static,
  {
    let stop_signal = Arc::new(AtomicBool::new(false));
    let stop = Arc::clone(&stop_signal);
    let thread = thread::spawn(move || {
      let mut last = probe.is_trusted();
      log::debug!("Permission watcher started (trusted: {last})");
      while !stop.load(Ordering::SeqCst) {
        thread::sleep(interval);
        if stop.load(Ordering::SeqCst) {
          break;
        }
        let current = probe.is_trusted();
        if current != last {
          log::info!("Accessibility trust changed: {last} -> {current}");
          last = current;
          on_change(current);
        }
      }
    });
    Self { stop_signal, thread: Some(thread) }
  }

  /// Stop polling without waiting for the thread to exit.
  pub fn stop(&self) {
    self.stop_signal.store(true, Ordering::SeqCst);
  }
}

impl Drop for PermissionWatcher {
  fn drop(&mut self) {
    self.stop();
    if let Some(thread) = self.thread.take() {
      drop(thread.join());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::port::fake::FakePort;
  use parking_lot::Mutex;

  #[test]
  fn reports_trust_flips() {
    let port = Arc::new(FakePort::new());
    let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&seen);

    let watcher = PermissionWatcher::start(
      Arc::clone(&port) as Arc<dyn PermissionProbe>,
      Duration::from_millis(5),
      move |state| sink.lock().push(state),
    );

    port.set_trusted(false);
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while seen.lock().is_empty() && std::time::Instant::now() < deadline {
      thread::sleep(Duration::from_millis(5));
    }
    drop(watcher);

    assert_eq!(seen.lock().first(), Some(&false));
  }

  #[test]
  fn dropping_stops_the_thread() {
    let port = Arc::new(FakePort::new());
    let watcher = PermissionWatcher::start(
      port as Arc<dyn PermissionProbe>,
      Duration::from_millis(5),
      |_| {},
    );
    drop(watcher); // joins without hanging
  }
}
