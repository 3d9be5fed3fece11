/*!
The command dispatcher.

[`Engine`] is the single synchronous entry point: it owns the port, the
engine configuration, the observer center, and the event sink, and routes
each [`CommandEnvelope`] to its handler. Every command produces exactly
one [`ResponseEnvelope`]; handlers never panic.
*/

use crate::config::EngineConfig;
use crate::events::{EventSink, NoopEventSink};
use crate::observer::ObserverCenter;
use crate::port::{AXPort, PermissionProbe};
use crate::types::{
  AxResult, BatchPayload, Command, CommandEnvelope, Error, ResponseEnvelope,
};
use std::sync::Arc;

/// The accessibility engine: dispatcher plus owned collaborators.
pub struct Engine<P: AXPort> {
  pub(crate) port: Arc<P>,
  pub(crate) config: EngineConfig,
  pub(crate) observers: ObserverCenter<P>,
  pub(crate) sink: Arc<dyn EventSink>,
}

impl<P: AXPort> std::fmt::Debug for Engine<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Engine").field("config", &self.config).finish_non_exhaustive()
  }
}

impl<P: AXPort> Engine<P> {
  /// An engine over the given port with defaults everywhere.
  pub fn new(port: P) -> Self {
    let port = Arc::new(port);
    let observers = ObserverCenter::new(Arc::clone(&port));
    Self { port, config: EngineConfig::default(), observers, sink: Arc::new(NoopEventSink) }
  }

  /// Replace the engine configuration.
  pub fn with_config(mut self, config: EngineConfig) -> Self {
    self.config = config;
    self
  }

  /// Replace the event sink `observe` subscriptions forward to.
  pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
    self.sink = sink;
    self
  }

  pub fn port(&self) -> &Arc<P> {
    &self.port
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// The notification multiplexer, for library callers subscribing with
  /// their own handlers.
  pub fn observers(&self) -> &ObserverCenter<P> {
    &self.observers
  }

  /// Run one command to completion.
  pub fn run(&self, envelope: &CommandEnvelope) -> ResponseEnvelope {
    log::info!("Handling {} command '{}'", envelope.command.name(), envelope.command_id);

    if !self.port.is_trusted() {
      log::warn!("Rejecting '{}': process not trusted for accessibility", envelope.command_id);
      return ResponseEnvelope::failure(&envelope.command_id, &Error::NotAuthorized);
    }

    match self.execute(&envelope.command, true) {
      Ok(payload) => {
        ResponseEnvelope::Success { command_id: envelope.command_id.clone(), payload }
      }
      Err(err) => {
        log::error!("Command '{}' failed: {err}", envelope.command_id);
        ResponseEnvelope::failure(&envelope.command_id, &err)
      }
    }
  }

  /// Run one command from its JSON encoding, producing encoded output.
  ///
  /// Envelope parse failures become `invalid_command` responses with an
  /// empty command id.
  pub fn run_json(&self, json: &str) -> String {
    let response = match serde_json::from_str::<CommandEnvelope>(json) {
      Ok(envelope) => self.run(&envelope),
      Err(err) => {
        log::warn!("Unparseable command envelope: {err}");
        ResponseEnvelope::failure("", &Error::InvalidCommand(format!("malformed envelope: {err}")))
      }
    };
    serde_json::to_string(&response).unwrap_or_else(|err| {
      // Responses are built from JSON-safe parts; reaching this means a
      // serializer bug, reported as a minimal literal envelope.
      log::error!("Response encoding failed: {err}");
      r#"{"status":"error","commandId":"","error":{"message":"response encoding failed","code":"internal_error"}}"#.to_owned()
    })
  }

  /// Tear down every observe-command subscription.
  pub fn remove_all_observers(&self) {
    self.observers.remove_all();
  }

  fn execute(&self, command: &Command, allow_batch: bool) -> AxResult<serde_json::Value> {
    match command {
      Command::Query { app_identifier, locator, max_depth, attributes, include_children_brief } => {
        self.handle_query(
          app_identifier,
          locator,
          *max_depth,
          attributes.as_ref(),
          *include_children_brief,
        )
      }
      Command::GetAttributes { app_identifier, locator, attributes, max_depth } => {
        self.handle_get_attributes(app_identifier, locator, attributes, *max_depth)
      }
      Command::DescribeElement { app_identifier, locator, depth, include_ignored, max_depth } => {
        self.handle_describe_element(
          app_identifier,
          locator,
          *depth,
          *include_ignored,
          *max_depth,
        )
      }
      Command::ExtractText { app_identifier, locator, include_children, max_depth } => {
        self.handle_extract_text(app_identifier, locator, *include_children, *max_depth)
      }
      Command::PerformAction { app_identifier, locator, action, max_depth } => {
        self.handle_perform_action(app_identifier, locator, action, *max_depth)
      }
      Command::SetFocusedValue { app_identifier, locator, value, max_depth } => {
        self.handle_set_focused_value(app_identifier, locator, value, *max_depth)
      }
      Command::GetElementAtPoint { app_identifier, x, y, attributes } => {
        self.handle_element_at_point(app_identifier.as_deref(), *x, *y, attributes.as_ref())
      }
      Command::GetFocusedElement { app_identifier, attributes } => {
        self.handle_get_focused_element(app_identifier, attributes.as_ref())
      }
      Command::Observe { app_identifier, notification, attributes } => {
        self.handle_observe(app_identifier.as_deref(), notification, attributes.as_ref())
      }
      Command::CollectAll { app_identifier, locator, max_depth, max_results, attributes } => {
        self.handle_collect_all(
          app_identifier,
          locator.as_ref(),
          *max_depth,
          *max_results,
          attributes.as_ref(),
        )
      }
      Command::Batch { commands } => {
        if !allow_batch {
          return Err(Error::InvalidCommand("nested batch commands are not allowed".to_owned()));
        }
        self.execute_batch(commands)
      }
    }
  }

  /// Run batch sub-commands in declared order.
  ///
  /// Successes are logged and aggregated; any failure fails the whole
  /// batch with a combined message naming each failed sub-command.
  fn execute_batch(&self, commands: &[CommandEnvelope]) -> AxResult<serde_json::Value> {
    let mut results = Vec::with_capacity(commands.len());
    let mut failures = Vec::new();

    for sub in commands {
      log::info!("Batch sub-command '{}' ({})", sub.command_id, sub.command.name());
      match self.execute(&sub.command, false) {
        Ok(payload) => {
          log::debug!("Batch sub-command '{}' succeeded", sub.command_id);
          results.push(payload);
        }
        Err(err) => {
          log::warn!("Batch sub-command '{}' failed: {err}", sub.command_id);
          failures.push(format!("'{}' ({}): {err}", sub.command_id, sub.command.name()));
        }
      }
    }

    if failures.is_empty() {
      serde_json::to_value(BatchPayload { results, errors: None })
        .map_err(|err| Error::Internal(format!("payload encoding: {err}")))
    } else {
      Err(Error::BatchOperationFailed(format!(
        "{} of {} sub-command(s) failed: {}",
        failures.len(),
        commands.len(),
        failures.join("; ")
      )))
    }
  }
}
