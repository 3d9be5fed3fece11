/*!
Command handlers.

One method per command variant. Each handler locates its target through
the locator engine, operates through the element handle, and returns a
JSON payload; failures surface as exactly one taxonomized error.
*/

use crate::ax;
use crate::describe::{build_element_data, describe_tree, extract_text};
use crate::dispatch::Engine;
use crate::element::Element;
use crate::events::NotificationEvent;
use crate::finder::{app_root, collect_elements, find_element};
use crate::port::{AXCode, AXPort, ElemPort};
use crate::types::{
  AttributeValue, AttributesPayload, AxResult, CollectionPayload, Error, Locator, MessagePayload,
  PointMissPayload, TextPayload, ValueFormat,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serialize a handler payload, folding encoder failures into the
/// taxonomy.
fn to_payload<T: serde::Serialize>(payload: &T) -> AxResult<serde_json::Value> {
  serde_json::to_value(payload).map_err(|err| Error::Internal(format!("payload encoding: {err}")))
}

fn default_attributes(requested: Option<&Vec<String>>) -> Vec<String> {
  match requested {
    Some(names) => names.clone(),
    None => ax::DEFAULT_QUERY_ATTRIBUTES.iter().map(|n| (*n).to_owned()).collect(),
  }
}

impl<P: AXPort> Engine<P> {
  pub(crate) fn handle_query(
    &self,
    app_identifier: &str,
    locator: &Locator,
    max_depth: Option<usize>,
    attributes: Option<&Vec<String>>,
    include_children_brief: bool,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, max_depth)?;
    log::debug!("Query matched {}", elem.brief_description(ValueFormat::Smart));
    let data = build_element_data(
      &elem,
      &default_attributes(attributes),
      include_children_brief,
      &self.config,
    );
    to_payload(&data)
  }

  pub(crate) fn handle_get_attributes(
    &self,
    app_identifier: &str,
    locator: &Locator,
    attributes: &[String],
    max_depth: Option<usize>,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, max_depth)?;
    let brief = elem.brief_description(ValueFormat::Smart);

    let mut fetched = BTreeMap::new();
    for name in attributes {
      match elem.raw().attribute(name) {
        Ok(raw) => {
          fetched
            .insert(name.clone(), crate::unwrap::unwrap_value(&raw, self.config.max_unwrap_depth));
        }
        // Absence is data, not an error; harder failures are.
        Err(
          AXCode::AttributeUnsupported
          | AXCode::ParameterizedAttributeUnsupported
          | AXCode::NoValue,
        ) => {
          fetched.insert(name.clone(), AttributeValue::Null);
        }
        Err(code) => return Err(Error::from_attribute_code(code, name, &brief)),
      }
    }

    to_payload(&AttributesPayload { attributes: fetched, element_description: brief })
  }

  pub(crate) fn handle_describe_element(
    &self,
    app_identifier: &str,
    locator: &Locator,
    depth: Option<usize>,
    include_ignored: bool,
    max_depth: Option<usize>,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, max_depth)?;
    let tree = describe_tree(
      &elem,
      depth.unwrap_or(self.config.describe_depth),
      include_ignored,
      0,
      &self.config,
    );
    to_payload(&tree)
  }

  pub(crate) fn handle_extract_text(
    &self,
    app_identifier: &str,
    locator: &Locator,
    include_children: Option<bool>,
    max_depth: Option<usize>,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, None)?;
    let text = extract_text(
      &elem,
      include_children.unwrap_or(true),
      max_depth.unwrap_or(self.config.max_text_depth),
      0,
    )
    .unwrap_or_default();
    to_payload(&TextPayload { text })
  }

  pub(crate) fn handle_perform_action(
    &self,
    app_identifier: &str,
    locator: &Locator,
    action: &str,
    max_depth: Option<usize>,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, max_depth)?;
    let brief = elem.brief_description(ValueFormat::Smart);
    elem.perform_action(action)?;
    log::debug!("Performed {action} on {brief}");
    to_payload(&MessagePayload {
      message: format!("Successfully performed action '{action}' on {brief}."),
    })
  }

  pub(crate) fn handle_set_focused_value(
    &self,
    app_identifier: &str,
    locator: &Locator,
    value: &str,
    max_depth: Option<usize>,
  ) -> AxResult<serde_json::Value> {
    let elem = find_element(self.port.as_ref(), &self.config, app_identifier, locator, max_depth)?;
    let brief = elem.brief_description(ValueFormat::Smart);

    // Best-effort focus; some elements accept writes without it.
    if elem.set_value(ax::ATTR_FOCUSED, &AttributeValue::Bool(true)).is_err() {
      log::warn!("Could not focus {brief} before writing its value");
    }

    elem.set_value(ax::ATTR_VALUE, &AttributeValue::String(value.to_owned()))?;
    to_payload(&MessagePayload { message: format!("Successfully set value on {brief}.") })
  }

  pub(crate) fn handle_element_at_point(
    &self,
    app_identifier: Option<&str>,
    x: f64,
    y: f64,
    attributes: Option<&Vec<String>>,
  ) -> AxResult<serde_json::Value> {
    let root = match app_identifier {
      Some(identifier) => app_root(self.port.as_ref(), identifier)?.1,
      None => Element::new(self.port.system_wide_element()),
    };

    let hit = self
      .port
      .element_at_point(root.raw(), x, y)
      .map_err(|code| Error::from_attribute_code(code, "element-at-point", "hit test"))?;

    match hit {
      Some(raw) => {
        let elem = Element::new(raw);
        let data =
          build_element_data(&elem, &default_attributes(attributes), false, &self.config);
        to_payload(&data)
      }
      None => to_payload(&PointMissPayload {
        message: "No UI element found at the specified point.".to_owned(),
        element: None,
      }),
    }
  }

  pub(crate) fn handle_get_focused_element(
    &self,
    app_identifier: &str,
    attributes: Option<&Vec<String>>,
  ) -> AxResult<serde_json::Value> {
    let (pid, root) = app_root(self.port.as_ref(), app_identifier)?;
    match root.focused_ui_element() {
      Some(elem) => {
        log::debug!("Focused element of pid {pid}: {}", elem.brief_description(ValueFormat::Smart));
        let data =
          build_element_data(&elem, &default_attributes(attributes), false, &self.config);
        to_payload(&data)
      }
      None => to_payload(&MessagePayload {
        message: format!("No focused element in application {app_identifier}."),
      }),
    }
  }

  pub(crate) fn handle_observe(
    &self,
    app_identifier: Option<&str>,
    notification: &str,
    attributes: Option<&Vec<String>>,
  ) -> AxResult<serde_json::Value> {
    let pid = match app_identifier {
      Some(identifier) => Some(app_root(self.port.as_ref(), identifier)?.0),
      None => None,
    };

    let sink = Arc::clone(&self.sink);
    let config = self.config;
    let attrs = default_attributes(attributes);
    let handler = Arc::new(
      move |event_pid: Option<crate::types::Pid>,
            notif: &str,
            elem: &Element<P::Elem>,
            user_info: Option<&AttributeValue>| {
        let element = build_element_data(elem, &attrs, false, &config);
        sink.notification(NotificationEvent {
          pid: event_pid,
          notification: notif.to_owned(),
          element,
          user_info: user_info.cloned(),
        });
      },
    );

    let token = self.observers.subscribe(pid, None, notification, handler)?;
    to_payload(&MessagePayload {
      message: format!("Observing {notification} (subscription {token})."),
    })
  }

  pub(crate) fn handle_collect_all(
    &self,
    app_identifier: &str,
    locator: Option<&Locator>,
    max_depth: Option<usize>,
    max_results: Option<usize>,
    attributes: Option<&Vec<String>>,
  ) -> AxResult<serde_json::Value> {
    let (_, root) = app_root(self.port.as_ref(), app_identifier)?;
    let everything = Locator::default();
    let locator = locator.unwrap_or(&everything);
    let matches = collect_elements(&self.config, &root, locator, max_depth, max_results);
    log::debug!("collectAll matched {} element(s)", matches.len());

    let attrs = default_attributes(attributes);
    let elements: Vec<_> =
      matches.iter().map(|elem| build_element_data(elem, &attrs, false, &self.config)).collect();
    let count = elements.len();
    to_payload(&CollectionPayload { elements, count })
  }
}
