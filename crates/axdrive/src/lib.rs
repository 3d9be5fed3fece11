/*!
axdrive - accessibility tree automation engine.

An embeddable engine for driving a desktop platform's accessibility
tree: locating UI elements inside running applications, reading and
writing attributes, performing actions, and subscribing to UI
notifications. Front-ends submit self-describing command envelopes and
receive structured responses; the engine owns all interaction with the
platform, which it consumes through the narrow [`port::AXPort`]
capability.

```
use axdrive::port::fake::{FakeApp, FakePort};
use axdrive::Engine;

let port = FakePort::new();
port.add_app(FakeApp::new(42, "com.example.editor", "Editor").frontmost());

let engine = Engine::new(port);
let out = engine.run_json(
  r#"{"commandId":"c1","command":{"type":"getFocusedElement","appIdentifier":"focused"}}"#,
);
assert!(out.contains("\"commandId\":\"c1\""));
```
*/

pub mod ax;
mod config;
mod describe;
mod dispatch;
mod element;
mod events;
mod finder;
mod handlers;
mod observer;
mod permissions;
pub mod port;
mod resolver;
mod types;
mod unwrap;
mod watcher;

pub use config::EngineConfig;
pub use describe::{build_element_data, describe_tree, extract_text};
pub use dispatch::Engine;
pub use element::{Element, DEFAULT_PATH_DEPTH, DEFAULT_UNWRAP_DEPTH, PATH_DEPTH_SENTINEL};
pub use events::{BufferedEventSink, EventSink, NoopEventSink, NotificationEvent};
pub use finder::{collect_elements, find_element, find_under};
pub use observer::{NotificationHandler, ObserverCenter, SubscriptionKey};
pub use permissions::{PermissionWatcher, DEFAULT_PERMISSION_POLL_INTERVAL};
pub use resolver::{resolve_app, FOCUSED_APP};
pub use unwrap::{unwrap_value, CIRCULAR_SENTINEL, MAX_DEPTH_SENTINEL};
pub use watcher::NotificationWatcher;

pub use types::{
  AXElementData, AXElementDescription, AttributeValue, AttributesPayload, AxResult, BatchPayload,
  CollectionPayload, Command, CommandEnvelope, Criterion, Error, ErrorBody, Locator, MatchMode,
  MessagePayload, PathStep, Pid, PointMissPayload, ResponseEnvelope, SubscriptionToken,
  TextPayload, ValueFormat,
};
