/*!
Element handles.

[`Element`] wraps a platform element handle and layers the typed
attribute surface on top: getters, setters, action invocation, traversal,
role predicates, brief descriptions, and path generation. Handles are
value-like; clone freely (the platform reference-counts the native side).
*/

use crate::ax;
use crate::port::{AXCode, ElemPort, RawValue};
use crate::types::{AttributeValue, AxResult, Error, Pid, ValueFormat};
use crate::unwrap::unwrap_value;

/// Default recursion cap for attribute unwrapping.
pub const DEFAULT_UNWRAP_DEPTH: usize = 50;

/// Default ancestor-chain cap for path generation.
pub const DEFAULT_PATH_DEPTH: usize = 25;

/// Sentinel segment inserted when path generation truncates.
pub const PATH_DEPTH_SENTINEL: &str = "<...max_depth_reached...>";

/// A live accessibility element.
#[derive(Debug, Clone)]
pub struct Element<E: ElemPort> {
  raw: E,
}

impl<E: ElemPort> Element<E> {
  pub fn new(raw: E) -> Self {
    Self { raw }
  }

  /// The underlying platform handle.
  pub fn raw(&self) -> &E {
    &self.raw
  }

  /// Whether two handles reference the same native element.
  pub fn is_same(&self, other: &Self) -> bool {
    self.raw.is_same(&other.raw)
  }

  // === Attribute access ===

  /// Read and unwrap an attribute. `None` on absence, read failure, or
  /// unreadable value.
  pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
    self.attribute_with_depth(name, DEFAULT_UNWRAP_DEPTH)
  }

  /// [`Element::attribute`] with an explicit unwrap depth cap.
  pub fn attribute_with_depth(&self, name: &str, max_depth: usize) -> Option<AttributeValue> {
    self.raw.attribute(name).ok().map(|raw| unwrap_value(&raw, max_depth))
  }

  /// Read an attribute, surfacing taxonomized errors instead of `None`.
  pub fn attribute_checked(&self, name: &str) -> AxResult<AttributeValue> {
    match self.raw.attribute(name) {
      Ok(raw) => Ok(unwrap_value(&raw, DEFAULT_UNWRAP_DEPTH)),
      Err(code) => {
        Err(Error::from_attribute_code(code, name, &self.brief_description(ValueFormat::Smart)))
      }
    }
  }

  /// Read an attribute as a string; `None` when absent or another type.
  pub fn string_attribute(&self, name: &str) -> Option<String> {
    match self.raw.attribute(name).ok()? {
      RawValue::String(s) | RawValue::AttributedString(s) => Some(s),
      _ => None,
    }
  }

  /// Read an attribute as a bool; `None` when absent or another type.
  pub fn bool_attribute(&self, name: &str) -> Option<bool> {
    match self.raw.attribute(name).ok()? {
      RawValue::Bool(b) => Some(b),
      _ => None,
    }
  }

  /// Write an attribute value.
  pub fn set_value(&self, name: &str, value: &AttributeValue) -> AxResult<()> {
    let raw = raw_from_value::<E>(name, value)?;
    self.raw.set_attribute(name, raw).map_err(|code| match code {
      AXCode::InvalidUIElement => {
        Error::InvalidElement(self.brief_description(ValueFormat::Smart))
      }
      _ => Error::AttributeNotSettable {
        attribute: name.to_owned(),
        element: self.brief_description(ValueFormat::Smart),
      },
    })
  }

  /// Read and unwrap a parameterized attribute.
  pub fn parameterized_attribute(
    &self,
    name: &str,
    parameter: &RawValue<E>,
  ) -> Option<AttributeValue> {
    self
      .raw
      .parameterized_attribute(name, parameter)
      .ok()
      .map(|raw| unwrap_value(&raw, DEFAULT_UNWRAP_DEPTH))
  }

  /// Every attribute name the element exposes.
  pub fn attribute_names(&self) -> Option<Vec<String>> {
    self.raw.attribute_names().ok()
  }

  /// Every parameterized attribute name the element exposes.
  pub fn parameterized_attribute_names(&self) -> Option<Vec<String>> {
    self.raw.parameterized_attribute_names().ok()
  }

  // === Typed getters ===

  pub fn role(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_ROLE)
  }

  pub fn subrole(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_SUBROLE)
  }

  pub fn title(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_TITLE)
  }

  pub fn description_text(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_DESCRIPTION)
  }

  pub fn identifier(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_IDENTIFIER)
  }

  pub fn dom_identifier(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_DOM_IDENTIFIER)
  }

  pub fn value(&self) -> Option<AttributeValue> {
    self.attribute(ax::ATTR_VALUE)
  }

  pub fn help(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_HELP)
  }

  pub fn placeholder(&self) -> Option<String> {
    self.string_attribute(ax::ATTR_PLACEHOLDER_VALUE)
  }

  pub fn pid(&self) -> Option<Pid> {
    self.raw.pid().ok()
  }

  pub fn is_enabled(&self) -> Option<bool> {
    self.bool_attribute(ax::ATTR_ENABLED)
  }

  pub fn is_focused(&self) -> Option<bool> {
    self.bool_attribute(ax::ATTR_FOCUSED)
  }

  pub fn is_hidden(&self) -> Option<bool> {
    self.bool_attribute(ax::ATTR_HIDDEN)
  }

  pub fn is_selected(&self) -> Option<bool> {
    self.bool_attribute(ax::ATTR_SELECTED)
  }

  /// The element's value in display-string form, when non-empty.
  pub fn value_string(&self) -> Option<String> {
    let value = self.value()?;
    let rendered = value.display_string();
    if rendered.is_empty() {
      None
    } else {
      Some(rendered)
    }
  }

  // === Traversal ===

  pub fn parent(&self) -> Option<Self> {
    match self.raw.attribute(ax::ATTR_PARENT).ok()? {
      RawValue::Element(parent) => Some(Self::new(parent)),
      _ => None,
    }
  }

  pub fn children(&self) -> Option<Vec<Self>> {
    self.element_list_attribute(ax::ATTR_CHILDREN)
  }

  pub fn windows(&self) -> Option<Vec<Self>> {
    self.element_list_attribute(ax::ATTR_WINDOWS)
  }

  pub fn focused_ui_element(&self) -> Option<Self> {
    match self.raw.attribute(ax::ATTR_FOCUSED_UI_ELEMENT).ok()? {
      RawValue::Element(elem) => Some(Self::new(elem)),
      _ => None,
    }
  }

  fn element_list_attribute(&self, name: &str) -> Option<Vec<Self>> {
    match self.raw.attribute(name).ok()? {
      RawValue::Array(items) => {
        let snapshot = items.lock().clone();
        Some(
          snapshot
            .into_iter()
            .filter_map(|item| match item {
              RawValue::Element(elem) => Some(Self::new(elem)),
              _ => None,
            })
            .collect(),
        )
      }
      _ => None,
    }
  }

  // === Actions ===

  pub fn supported_actions(&self) -> Option<Vec<String>> {
    self.raw.actions().ok()
  }

  pub fn is_action_supported(&self, name: &str) -> bool {
    self.supported_actions().is_some_and(|actions| actions.iter().any(|a| a == name))
  }

  /// Perform a named action, mapping platform refusals into the error
  /// taxonomy.
  pub fn perform_action(&self, name: &str) -> AxResult<()> {
    self.raw.perform_action(name).map_err(|code| {
      let mut err =
        Error::from_action_code(code, name, &self.brief_description(ValueFormat::Smart));
      if let Error::ActionUnsupported { available, .. } = &mut err {
        *available = self.supported_actions().unwrap_or_default();
      }
      err
    })
  }

  // === Descriptions ===

  /// Short single-line summary of the element.
  pub fn brief_description(&self, format: ValueFormat) -> String {
    match format {
      ValueFormat::Smart => self.smart_description(),
      ValueFormat::Raw => self.role().unwrap_or_else(|| format!("{:?}", self.raw)),
      ValueFormat::TextContent => self.direct_text().unwrap_or_default(),
      ValueFormat::Stringified => {
        let mut description = self.smart_description();
        if let Some(value) = self.value_string() {
          description.push_str(&format!(", Value: '{value}'"));
        }
        if let Some(help) = self.help().filter(|h| !h.is_empty()) {
          description.push_str(&format!(", Help: '{help}'"));
        }
        description
      }
    }
  }

  fn smart_description(&self) -> String {
    let mut parts = vec![format!("Role: {}", self.role().unwrap_or_else(|| "Unknown".into()))];
    if let Some(pid) = self.pid() {
      parts.push(format!("PID: {pid}"));
    }
    if let Some(title) = self.title().filter(|t| !t.is_empty()) {
      parts.push(format!("Title: '{title}'"));
    }
    if let Some(id) = self.identifier().filter(|i| !i.is_empty()) {
      parts.push(format!("ID: '{id}'"));
    }
    if let Some(dom_id) = self.dom_identifier().filter(|d| !d.is_empty()) {
      parts.push(format!("DOMId: '{dom_id}'"));
    }
    parts.join(", ")
  }

  /// First non-empty of title, value, description, placeholder.
  pub fn direct_text(&self) -> Option<String> {
    self
      .title()
      .filter(|t| !t.is_empty())
      .or_else(|| self.value_string())
      .or_else(|| self.description_text().filter(|d| !d.is_empty()))
      .or_else(|| self.placeholder().filter(|p| !p.is_empty()))
  }

  /// The element's computed name, for fuzzy matching.
  ///
  /// Precedence: title, value (truncated to 50 chars), identifier,
  /// description, help, placeholder; falls back to the role with the
  /// platform prefix stripped.
  pub fn computed_name(&self) -> Option<String> {
    let named = self
      .title()
      .filter(|t| !t.is_empty())
      .or_else(|| self.value_string().map(|v| truncate(&v, 50)))
      .or_else(|| self.identifier().filter(|i| !i.is_empty()))
      .or_else(|| self.description_text().filter(|d| !d.is_empty()))
      .or_else(|| self.help().filter(|h| !h.is_empty()))
      .or_else(|| self.placeholder().filter(|p| !p.is_empty()));
    named.or_else(|| self.role().map(|r| ax::strip_role_prefix(&r).to_owned()))
  }

  // === Paths ===

  /// Ancestor chain as brief descriptions, root first.
  pub fn generate_path_segments(&self, upto: Option<&Self>) -> Vec<String> {
    self.generate_path_segments_with_depth(upto, DEFAULT_PATH_DEPTH)
  }

  /// [`Element::generate_path_segments`] with an explicit depth cap.
  ///
  /// Walks the parent chain appending each element's smart brief,
  /// stopping at the application root, the given ancestor, or a pid
  /// discontinuity. The sentinel segment appears first iff the cap
  /// truncated the walk.
  pub fn generate_path_segments_with_depth(
    &self,
    upto: Option<&Self>,
    max_depth: usize,
  ) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = self.clone();
    let mut depth = 0;
    loop {
      if depth >= max_depth {
        segments.push(PATH_DEPTH_SENTINEL.to_owned());
        break;
      }
      segments.push(current.brief_description(ValueFormat::Smart));
      if upto.is_some_and(|stop| current.is_same(stop)) {
        break;
      }
      if current.role().as_deref() == Some(ax::ROLE_APPLICATION) {
        break;
      }
      let Some(parent) = current.parent() else {
        break;
      };
      // A pid discontinuity means the chain crossed into another
      // application's tree; the path ends at the boundary.
      if parent.pid() != current.pid() {
        break;
      }
      current = parent;
      depth += 1;
    }
    segments.reverse();
    segments
  }

  /// The path as a single string, segments joined root first.
  pub fn generate_path(&self, upto: Option<&Self>) -> String {
    self.generate_path_segments(upto).join(" / ")
  }

  /// Diagnostic dump: every attribute and parameterized attribute name
  /// with shallow values.
  pub fn dump(&self) -> String {
    let mut lines = vec![format!("Element {}", self.brief_description(ValueFormat::Smart))];
    for name in self.attribute_names().unwrap_or_default() {
      let rendered = self
        .attribute_with_depth(&name, 1)
        .map(|v| v.display_string())
        .unwrap_or_else(|| "<unreadable>".to_owned());
      lines.push(format!("  {name}: {rendered}"));
    }
    let params = self.parameterized_attribute_names().unwrap_or_default();
    if !params.is_empty() {
      lines.push(format!("  parameterized: {}", params.join(", ")));
    }
    lines.join("\n")
  }

  // === Role predicates ===

  fn has_role(&self, role: &str) -> bool {
    self.role().as_deref() == Some(role)
  }

  fn has_subrole(&self, subrole: &str) -> bool {
    self.subrole().as_deref() == Some(subrole)
  }

  pub fn is_application(&self) -> bool {
    self.has_role(ax::ROLE_APPLICATION)
  }

  pub fn is_window(&self) -> bool {
    self.has_role(ax::ROLE_WINDOW)
  }

  pub fn is_dialog(&self) -> bool {
    self.has_role(ax::ROLE_SHEET)
      || self.has_subrole(ax::SUBROLE_DIALOG)
      || self.has_subrole(ax::SUBROLE_SYSTEM_DIALOG)
  }

  pub fn is_standard_window(&self) -> bool {
    self.is_window() && self.has_subrole(ax::SUBROLE_STANDARD_WINDOW)
  }

  pub fn is_button(&self) -> bool {
    self.has_role(ax::ROLE_BUTTON)
  }

  pub fn is_text_field(&self) -> bool {
    self.has_role(ax::ROLE_TEXT_FIELD)
  }

  pub fn is_secure_text_field(&self) -> bool {
    self.has_role(ax::ROLE_SECURE_TEXT_FIELD) || self.has_subrole(ax::SUBROLE_SECURE_TEXT_FIELD)
  }

  pub fn is_search_field(&self) -> bool {
    self.has_subrole(ax::SUBROLE_SEARCH_FIELD)
  }

  pub fn is_text_area(&self) -> bool {
    self.has_role(ax::ROLE_TEXT_AREA)
  }

  pub fn is_static_text(&self) -> bool {
    self.has_role(ax::ROLE_STATIC_TEXT)
  }

  pub fn is_link(&self) -> bool {
    self.has_role(ax::ROLE_LINK)
  }

  pub fn is_menu(&self) -> bool {
    self.has_role(ax::ROLE_MENU)
  }

  pub fn is_menu_item(&self) -> bool {
    self.has_role(ax::ROLE_MENU_ITEM) || self.has_role(ax::ROLE_MENU_BAR_ITEM)
  }

  pub fn is_menu_bar(&self) -> bool {
    self.has_role(ax::ROLE_MENU_BAR)
  }

  pub fn is_table(&self) -> bool {
    self.has_role(ax::ROLE_TABLE) || self.has_role(ax::ROLE_OUTLINE)
  }

  pub fn is_row(&self) -> bool {
    self.has_role(ax::ROLE_ROW)
  }

  pub fn is_cell(&self) -> bool {
    self.has_role(ax::ROLE_CELL)
  }

  pub fn is_list(&self) -> bool {
    self.has_role(ax::ROLE_LIST)
  }

  pub fn is_scroll_area(&self) -> bool {
    self.has_role(ax::ROLE_SCROLL_AREA)
  }

  pub fn is_dock_item(&self) -> bool {
    self.has_role(ax::ROLE_DOCK_ITEM)
  }

  pub fn is_application_dock_item(&self) -> bool {
    self.is_dock_item() && self.has_subrole(ax::SUBROLE_APPLICATION_DOCK_ITEM)
  }

  pub fn is_folder_dock_item(&self) -> bool {
    self.is_dock_item() && self.has_subrole(ax::SUBROLE_FOLDER_DOCK_ITEM)
  }

  pub fn is_url_dock_item(&self) -> bool {
    self.is_dock_item() && self.has_subrole(ax::SUBROLE_URL_DOCK_ITEM)
  }

  /// Enabled plus an interactive role or support for the press action.
  pub fn is_interactive(&self) -> bool {
    if self.is_enabled() == Some(false) {
      return false;
    }
    let interactive_role =
      self.role().is_some_and(|role| ax::INTERACTIVE_ROLES.contains(&role.as_str()));
    interactive_role || self.is_action_supported(ax::ACTION_PRESS)
  }
}

fn truncate(s: &str, max_chars: usize) -> String {
  s.chars().take(max_chars).collect()
}

/// Convert an [`AttributeValue`] into the raw scalar the platform write
/// call accepts. Containers are rejected.
fn raw_from_value<E: ElemPort>(name: &str, value: &AttributeValue) -> AxResult<RawValue<E>> {
  match value {
    AttributeValue::Bool(b) => Ok(RawValue::Bool(*b)),
    AttributeValue::Int(i) => Ok(RawValue::Int(*i)),
    AttributeValue::Float(f) => Ok(RawValue::Float(*f)),
    AttributeValue::String(s) => Ok(RawValue::String(s.clone())),
    AttributeValue::Null | AttributeValue::List(_) | AttributeValue::Map(_) => {
      Err(Error::TypeMismatch {
        attribute: name.to_owned(),
        detail: "only scalar values can be written".to_owned(),
      })
    }
  }
}
