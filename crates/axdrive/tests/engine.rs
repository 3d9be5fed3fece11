//! End-to-end command scenarios against the in-memory port.

use axdrive::ax;
use axdrive::port::fake::{FakeApp, FakeElem, FakePort};
use axdrive::port::RawValue;
use axdrive::{BufferedEventSink, Engine, Pid};
use std::sync::Arc;

fn run(engine: &Engine<FakePort>, json: &str) -> serde_json::Value {
  serde_json::from_str(&engine.run_json(json)).expect("response is json")
}

fn search_app() -> (Engine<FakePort>, FakeElem) {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(101, "com.example.search", "Search App").frontmost());
  let window =
    port.add_element(&app, ax::ROLE_WINDOW, vec![(ax::ATTR_TITLE, RawValue::from("Main"))]);
  let field = port.add_element(
    &window,
    ax::ROLE_TEXT_FIELD,
    vec![(ax::ATTR_TITLE, RawValue::from("Search")), (ax::ATTR_VALUE, RawValue::from("hello"))],
  );
  port.set_focused(Pid(101), &field);
  (Engine::new(port), field)
}

#[test]
fn focused_element_query() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{"commandId":"c1","command":{"type":"getFocusedElement","appIdentifier":"focused"}}"#,
  );

  assert_eq!(response["status"], "success");
  let payload = &response["payload"];
  assert_eq!(payload["role"], "AXTextField");
  assert_eq!(payload["briefDescription"], "Role: AXTextField, PID: 101, Title: 'Search'");
  assert!(payload["attributes"].is_object());
  assert!(payload["path"].is_array());
  // Path runs root-first: application, window, field.
  let path = payload["path"].as_array().expect("path");
  assert_eq!(path.len(), 3);
  assert!(path[0].as_str().expect("segment").contains("AXApplication"));
}

#[test]
fn path_hint_query_with_required_action() {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(7, "com.example.dialog", "Dialog"));
  let window =
    port.add_element(&app, ax::ROLE_WINDOW, vec![(ax::ATTR_TITLE, RawValue::from("Main"))]);
  let group = port.add_element(&window, ax::ROLE_GROUP, vec![]);
  let button =
    port.add_element(&group, ax::ROLE_BUTTON, vec![(ax::ATTR_TITLE, RawValue::from("OK"))]);
  port.set_actions(&button, &[ax::ACTION_PRESS]);
  let engine = Engine::new(port);

  let response = run(
    &engine,
    r#"{
      "commandId": "c2",
      "command": {
        "type": "query",
        "appIdentifier": "com.example.dialog",
        "maxDepth": 5,
        "locator": {
          "pathFromRoot": [
            {"criteria": [{"attribute": "AXTitle", "value": "Main"}], "maxDepthForStep": 2}
          ],
          "criteria": [{"attribute": "AXTitle", "value": "OK"}],
          "requireAction": "AXPress"
        }
      }
    }"#,
  );

  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["role"], "AXButton");
  assert_eq!(response["payload"]["attributes"]["AXTitle"], "OK");
}

#[test]
fn query_keys_requested_attributes_with_explicit_nulls() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "c3",
      "command": {
        "type": "query",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXRole", "value": "AXTextField"}]},
        "attributes": ["AXTitle", "AXValue", "AXHelp"]
      }
    }"#,
  );

  let attributes = response["payload"]["attributes"].as_object().expect("attributes");
  assert_eq!(attributes.len(), 3);
  assert_eq!(attributes["AXTitle"], "Search");
  assert_eq!(attributes["AXValue"], "hello");
  // The element lacks AXHelp; the requested key is present and null.
  assert!(attributes["AXHelp"].is_null());
}

#[test]
fn perform_action_on_unsupported_element() {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(8, "com.example.text", "Text"));
  port.add_element(&app, ax::ROLE_STATIC_TEXT, vec![(ax::ATTR_TITLE, RawValue::from("Label"))]);
  let engine = Engine::new(port);

  let response = run(
    &engine,
    r#"{
      "commandId": "c4",
      "command": {
        "type": "performAction",
        "appIdentifier": "com.example.text",
        "locator": {"criteria": [{"attribute": "AXRole", "value": "AXStaticText"}]},
        "action": "AXPress"
      }
    }"#,
  );

  assert_eq!(response["status"], "error");
  assert_eq!(response["error"]["code"], "action_not_supported");
  let message = response["error"]["message"].as_str().expect("message");
  assert!(message.contains("AXPress"));
  assert!(message.contains("[]"));
}

#[test]
fn set_focused_value_writes_the_value_attribute() {
  let (engine, field) = search_app();
  engine.port().set_settable(&field, ax::ATTR_VALUE);
  engine.port().set_settable(&field, ax::ATTR_FOCUSED);

  let response = run(
    &engine,
    r#"{
      "commandId": "c5",
      "command": {
        "type": "setFocusedValue",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXRole", "value": "AXTextField"}]},
        "value": "updated"
      }
    }"#,
  );

  assert_eq!(response["status"], "success");
  let check = run(
    &engine,
    r#"{
      "commandId": "c6",
      "command": {
        "type": "getAttributes",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXRole", "value": "AXTextField"}]},
        "attributes": ["AXValue", "AXFocused"]
      }
    }"#,
  );
  assert_eq!(check["payload"]["attributes"]["AXValue"], "updated");
  assert_eq!(check["payload"]["attributes"]["AXFocused"], true);
}

#[test]
fn batch_with_one_failure_reports_batch_operation_failed() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "b1",
      "command": {
        "type": "batch",
        "commands": [
          {
            "commandId": "sub-a",
            "command": {
              "type": "query",
              "appIdentifier": "com.example.search",
              "locator": {"criteria": [{"attribute": "AXTitle", "value": "Search"}]}
            }
          },
          {
            "commandId": "sub-b",
            "command": {
              "type": "performAction",
              "appIdentifier": "com.example.search",
              "locator": {"criteria": [{"attribute": "AXTitle", "value": "Missing"}]},
              "action": "AXPress"
            }
          }
        ]
      }
    }"#,
  );

  assert_eq!(response["status"], "error");
  assert_eq!(response["error"]["code"], "batch_operation_failed");
  let message = response["error"]["message"].as_str().expect("message");
  assert!(message.contains("sub-b"));
  assert!(message.contains("no element matched"));
  assert!(!message.contains("sub-a"));
}

#[test]
fn observe_multiplexes_through_the_event_sink() {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(200, "com.example.obs", "Obs"));
  let sink = Arc::new(BufferedEventSink::new());
  let engine =
    Engine::new(port.clone()).with_event_sink(Arc::clone(&sink) as Arc<dyn axdrive::EventSink>);

  for i in 0..3 {
    let response = run(
      &engine,
      &format!(
        r#"{{"commandId":"o{i}","command":{{"type":"observe","appIdentifier":"com.example.obs","notification":"AXValueChanged"}}}}"#,
      ),
    );
    assert_eq!(response["status"], "success");
  }

  let counters = port.counters();
  assert_eq!(counters.observers_created, 1);
  assert_eq!(counters.notifications_added.len(), 1);

  assert!(port.fire(Some(Pid(200)), &app, ax::NOTIF_VALUE_CHANGED, None));
  let events = sink.take();
  assert_eq!(events.len(), 3);
  assert!(events.iter().all(|e| e.notification == ax::NOTIF_VALUE_CHANGED));
  assert!(events.iter().all(|e| e.pid == Some(Pid(200))));

  engine.remove_all_observers();
  let counters = port.counters();
  assert_eq!(counters.notifications_removed.len(), 1);
  assert_eq!(counters.observers_dropped, 1);
}

#[test]
fn hit_test_miss_is_a_success_with_null_element() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "c7",
      "command": {
        "type": "getElementAtPoint",
        "appIdentifier": "com.example.search",
        "x": -1.0,
        "y": -1.0
      }
    }"#,
  );

  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["message"], "No UI element found at the specified point.");
  assert!(response["payload"]["element"].is_null());
}

#[test]
fn hit_test_returns_element_data_on_a_hit() {
  let (engine, field) = search_app();
  engine.port().set_hit(50.0, 60.0, &field);
  let response = run(
    &engine,
    r#"{
      "commandId": "c8",
      "command": {
        "type": "getElementAtPoint",
        "appIdentifier": "com.example.search",
        "x": 50.0,
        "y": 60.0
      }
    }"#,
  );
  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["role"], "AXTextField");
}

#[test]
fn describe_element_returns_a_tree() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "c9",
      "command": {
        "type": "describeElement",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXTitle", "value": "Main"}]},
        "depth": 2
      }
    }"#,
  );

  assert_eq!(response["status"], "success");
  let payload = &response["payload"];
  assert_eq!(payload["role"], "AXWindow");
  let children = payload["children"].as_array().expect("children");
  assert_eq!(children.len(), 1);
  assert_eq!(children[0]["role"], "AXTextField");
}

#[test]
fn extract_text_joins_direct_and_child_text() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "c10",
      "command": {
        "type": "extractText",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXTitle", "value": "Main"}]}
      }
    }"#,
  );
  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["text"], "Main Search");
}

#[test]
fn extract_text_defaults_to_the_generic_extractor_depth() {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(11, "com.example.report", "Report Viewer"));
  let window =
    port.add_element(&app, ax::ROLE_WINDOW, vec![(ax::ATTR_TITLE, RawValue::from("Report"))]);
  // Text sits two container levels below the located window.
  let outer = port.add_element(&window, ax::ROLE_GROUP, vec![]);
  let inner = port.add_element(&outer, ax::ROLE_GROUP, vec![]);
  port.add_element(
    &inner,
    ax::ROLE_STATIC_TEXT,
    vec![(ax::ATTR_VALUE, RawValue::from("buried"))],
  );
  let engine = Engine::new(port);

  // No maxDepth: the generic extractor default (5) reaches the text.
  let response = run(
    &engine,
    r#"{
      "commandId": "c14",
      "command": {
        "type": "extractText",
        "appIdentifier": "com.example.report",
        "locator": {"criteria": [{"attribute": "AXTitle", "value": "Report"}]}
      }
    }"#,
  );
  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["text"], "Report buried");

  // An explicit depth of 1 stops above it.
  let shallow = run(
    &engine,
    r#"{
      "commandId": "c15",
      "command": {
        "type": "extractText",
        "appIdentifier": "com.example.report",
        "locator": {"criteria": [{"attribute": "AXTitle", "value": "Report"}]},
        "maxDepth": 1
      }
    }"#,
  );
  assert_eq!(shallow["payload"]["text"], "Report");
}

#[test]
fn collect_all_snapshots_matching_elements() {
  let port = FakePort::new();
  let app = port.add_app(FakeApp::new(9, "com.example.list", "List"));
  let window = port.add_element(&app, ax::ROLE_WINDOW, vec![]);
  for title in ["One", "Two", "Three"] {
    port.add_element(&window, ax::ROLE_BUTTON, vec![(ax::ATTR_TITLE, RawValue::from(title))]);
  }
  let engine = Engine::new(port);

  let response = run(
    &engine,
    r#"{
      "commandId": "c11",
      "command": {
        "type": "collectAll",
        "appIdentifier": "com.example.list",
        "locator": {"criteria": [{"attribute": "AXRole", "value": "AXButton"}]}
      }
    }"#,
  );

  assert_eq!(response["status"], "success");
  assert_eq!(response["payload"]["count"], 3);
  let elements = response["payload"]["elements"].as_array().expect("elements");
  let titles: Vec<_> =
    elements.iter().map(|e| e["attributes"]["AXTitle"].as_str().expect("title")).collect();
  assert_eq!(titles, vec!["One", "Two", "Three"]);
}

#[test]
fn application_not_found_surfaces_the_identifier() {
  let (engine, _field) = search_app();
  let response = run(
    &engine,
    r#"{
      "commandId": "c12",
      "command": {
        "type": "query",
        "appIdentifier": "com.missing.app",
        "locator": {"criteria": []}
      }
    }"#,
  );
  assert_eq!(response["status"], "error");
  assert_eq!(response["error"]["code"], "application_not_found");
  assert!(response["error"]["message"].as_str().expect("message").contains("com.missing.app"));
}

#[test]
fn stale_elements_surface_invalid_element() {
  let (engine, field) = search_app();
  // An element that dies between location and read reports
  // InvalidUIElement on the read path.
  engine.port().set_attr_error(&field, ax::ATTR_VALUE, axdrive::port::AXCode::InvalidUIElement);
  let response = run(
    &engine,
    r#"{
      "commandId": "c13",
      "command": {
        "type": "getAttributes",
        "appIdentifier": "com.example.search",
        "locator": {"criteria": [{"attribute": "AXTitle", "value": "Search"}]},
        "attributes": ["AXValue"]
      }
    }"#,
  );
  assert_eq!(response["status"], "error");
  assert_eq!(response["error"]["code"], "invalid_element");
}
