/*!
Accessibility name constants and taxonomies.

Role, attribute, action, and notification names as the platform reports
them. Everything here is a plain `AX*` string; semantic predicates over
roles live on [`crate::Element`].
*/

// === Roles ===

pub const ROLE_APPLICATION: &str = "AXApplication";
pub const ROLE_WINDOW: &str = "AXWindow";
pub const ROLE_SHEET: &str = "AXSheet";
pub const ROLE_GROUP: &str = "AXGroup";
pub const ROLE_SCROLL_AREA: &str = "AXScrollArea";
pub const ROLE_TOOLBAR: &str = "AXToolbar";
pub const ROLE_BUTTON: &str = "AXButton";
pub const ROLE_POP_UP_BUTTON: &str = "AXPopUpButton";
pub const ROLE_RADIO_BUTTON: &str = "AXRadioButton";
pub const ROLE_CHECK_BOX: &str = "AXCheckBox";
pub const ROLE_LINK: &str = "AXLink";
pub const ROLE_TEXT_FIELD: &str = "AXTextField";
pub const ROLE_SECURE_TEXT_FIELD: &str = "AXSecureTextField";
pub const ROLE_TEXT_AREA: &str = "AXTextArea";
pub const ROLE_STATIC_TEXT: &str = "AXStaticText";
pub const ROLE_MENU: &str = "AXMenu";
pub const ROLE_MENU_BAR: &str = "AXMenuBar";
pub const ROLE_MENU_ITEM: &str = "AXMenuItem";
pub const ROLE_MENU_BAR_ITEM: &str = "AXMenuBarItem";
pub const ROLE_TABLE: &str = "AXTable";
pub const ROLE_OUTLINE: &str = "AXOutline";
pub const ROLE_ROW: &str = "AXRow";
pub const ROLE_COLUMN: &str = "AXColumn";
pub const ROLE_CELL: &str = "AXCell";
pub const ROLE_LIST: &str = "AXList";
pub const ROLE_SLIDER: &str = "AXSlider";
pub const ROLE_IMAGE: &str = "AXImage";
pub const ROLE_DOCK_ITEM: &str = "AXDockItem";
pub const ROLE_COMBO_BOX: &str = "AXComboBox";
pub const ROLE_TAB_GROUP: &str = "AXTabGroup";

// === Subroles ===

pub const SUBROLE_STANDARD_WINDOW: &str = "AXStandardWindow";
pub const SUBROLE_DIALOG: &str = "AXDialog";
pub const SUBROLE_SYSTEM_DIALOG: &str = "AXSystemDialog";
pub const SUBROLE_SEARCH_FIELD: &str = "AXSearchField";
pub const SUBROLE_SECURE_TEXT_FIELD: &str = "AXSecureTextField";
pub const SUBROLE_APPLICATION_DOCK_ITEM: &str = "AXApplicationDockItem";
pub const SUBROLE_FOLDER_DOCK_ITEM: &str = "AXFolderDockItem";
pub const SUBROLE_URL_DOCK_ITEM: &str = "AXURLDockItem";

// === Attributes ===

pub const ATTR_ROLE: &str = "AXRole";
pub const ATTR_SUBROLE: &str = "AXSubrole";
pub const ATTR_ROLE_DESCRIPTION: &str = "AXRoleDescription";
pub const ATTR_TITLE: &str = "AXTitle";
pub const ATTR_DESCRIPTION: &str = "AXDescription";
pub const ATTR_VALUE: &str = "AXValue";
pub const ATTR_HELP: &str = "AXHelp";
pub const ATTR_IDENTIFIER: &str = "AXIdentifier";
pub const ATTR_DOM_IDENTIFIER: &str = "AXDOMIdentifier";
pub const ATTR_PLACEHOLDER_VALUE: &str = "AXPlaceholderValue";
pub const ATTR_ENABLED: &str = "AXEnabled";
pub const ATTR_FOCUSED: &str = "AXFocused";
pub const ATTR_HIDDEN: &str = "AXHidden";
pub const ATTR_SELECTED: &str = "AXSelected";
pub const ATTR_PARENT: &str = "AXParent";
pub const ATTR_CHILDREN: &str = "AXChildren";
pub const ATTR_WINDOWS: &str = "AXWindows";
pub const ATTR_MAIN_WINDOW: &str = "AXMainWindow";
pub const ATTR_FOCUSED_WINDOW: &str = "AXFocusedWindow";
pub const ATTR_FOCUSED_UI_ELEMENT: &str = "AXFocusedUIElement";
pub const ATTR_POSITION: &str = "AXPosition";
pub const ATTR_SIZE: &str = "AXSize";
pub const ATTR_SELECTED_TEXT: &str = "AXSelectedText";
pub const ATTR_SELECTED_TEXT_RANGE: &str = "AXSelectedTextRange";
pub const ATTR_NUMBER_OF_CHARACTERS: &str = "AXNumberOfCharacters";
pub const ATTR_URL: &str = "AXURL";

// === Actions ===

pub const ACTION_PRESS: &str = "AXPress";
pub const ACTION_INCREMENT: &str = "AXIncrement";
pub const ACTION_DECREMENT: &str = "AXDecrement";
pub const ACTION_CONFIRM: &str = "AXConfirm";
pub const ACTION_CANCEL: &str = "AXCancel";
pub const ACTION_SHOW_MENU: &str = "AXShowMenu";
pub const ACTION_PICK: &str = "AXPick";
pub const ACTION_RAISE: &str = "AXRaise";

// === Notifications ===

pub const NOTIF_VALUE_CHANGED: &str = "AXValueChanged";
pub const NOTIF_TITLE_CHANGED: &str = "AXTitleChanged";
pub const NOTIF_FOCUSED_UI_ELEMENT_CHANGED: &str = "AXFocusedUIElementChanged";
pub const NOTIF_FOCUSED_WINDOW_CHANGED: &str = "AXFocusedWindowChanged";
pub const NOTIF_WINDOW_CREATED: &str = "AXWindowCreated";
pub const NOTIF_WINDOW_MOVED: &str = "AXWindowMoved";
pub const NOTIF_WINDOW_RESIZED: &str = "AXWindowResized";
pub const NOTIF_ELEMENT_DESTROYED: &str = "AXUIElementDestroyed";
pub const NOTIF_SELECTED_TEXT_CHANGED: &str = "AXSelectedTextChanged";
pub const NOTIF_MENU_OPENED: &str = "AXMenuOpened";
pub const NOTIF_MENU_CLOSED: &str = "AXMenuClosed";

/// Attributes fetched for a `query` command when the caller does not name
/// any.
pub const DEFAULT_QUERY_ATTRIBUTES: &[&str] = &[
  ATTR_ROLE,
  ATTR_SUBROLE,
  ATTR_TITLE,
  ATTR_VALUE,
  ATTR_DESCRIPTION,
  ATTR_IDENTIFIER,
  ATTR_ENABLED,
  ATTR_FOCUSED,
  ATTR_POSITION,
  ATTR_SIZE,
];

/// Attributes fetched per node by `describeElement`.
///
/// The order is fixed but is not a compatibility surface; consumers must
/// treat the attribute map as unordered.
pub const DEFAULT_DESCRIBE_ATTRIBUTES: &[&str] = &[
  ATTR_ROLE,
  ATTR_SUBROLE,
  ATTR_TITLE,
  ATTR_VALUE,
  ATTR_DESCRIPTION,
  ATTR_HELP,
  ATTR_IDENTIFIER,
  ATTR_ENABLED,
  ATTR_FOCUSED,
  ATTR_HIDDEN,
];

/// Roles considered interactive for [`crate::Element::is_interactive`].
pub const INTERACTIVE_ROLES: &[&str] = &[
  ROLE_BUTTON,
  ROLE_POP_UP_BUTTON,
  ROLE_RADIO_BUTTON,
  ROLE_CHECK_BOX,
  ROLE_LINK,
  ROLE_TEXT_FIELD,
  ROLE_SECURE_TEXT_FIELD,
  ROLE_TEXT_AREA,
  ROLE_MENU_ITEM,
  ROLE_MENU_BAR_ITEM,
  ROLE_SLIDER,
  ROLE_COMBO_BOX,
  ROLE_CELL,
  ROLE_ROW,
  ROLE_DOCK_ITEM,
];

/// Strip the platform `AX` prefix from a role name.
///
/// `AXButton` → `Button`. Names without the prefix pass through.
pub fn strip_role_prefix(role: &str) -> &str {
  role.strip_prefix("AX").unwrap_or(role)
}
