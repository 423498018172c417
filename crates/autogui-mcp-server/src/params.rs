//! Tool parameter structs
//!
//! Field names are the wire contract. Values that need parsing (buttons,
//! keys, colours, regions) arrive as plain strings or lists so that a bad
//! value becomes an error envelope instead of a protocol-level rejection.

use autogui_core::{
    error::AutomationResult,
    model::{MouseButton, Region},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_button() -> String {
    "left".to_string()
}

fn default_clicks() -> i64 {
    1
}

fn default_confidence() -> f64 {
    0.9
}

fn default_display_seconds() -> f64 {
    5.0
}

fn default_alert_title() -> String {
    "Alert".to_string()
}

fn default_confirm_title() -> String {
    "Confirm".to_string()
}

fn default_prompt_title() -> String {
    "Prompt".to_string()
}

fn default_password_title() -> String {
    "Password".to_string()
}

fn default_mask() -> String {
    "*".to_string()
}

/// Parses the wire name of a mouse button
pub fn parse_button(name: &str) -> AutomationResult<MouseButton> {
    name.parse()
}

/// Clamps a repeat count into `0..=u32::MAX`; negative counts do nothing
pub fn repeat_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Parses an optional `[left, top, width, height]` list
pub fn parse_region(values: Option<&[i64]>) -> AutomationResult<Option<Region>> {
    values.map(Region::from_list).transpose()
}

// ========== Mouse ==========

/// Parameters for the move_mouse tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct MoveMouseParams {
    /// Target X coordinate
    pub x:        i32,
    /// Target Y coordinate
    pub y:        i32,
    /// Seconds the move should take (0 = instant)
    #[serde(default)]
    pub duration: f64,
}

/// Parameters for the move_mouse_relative tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct MoveRelativeParams {
    /// Horizontal offset in pixels (positive is right)
    pub dx:       i32,
    /// Vertical offset in pixels (positive is down)
    pub dy:       i32,
    /// Seconds the move should take (0 = instant)
    #[serde(default)]
    pub duration: f64,
}

/// Parameters for the click tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClickParams {
    /// X coordinate; current cursor X when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x:        Option<i32>,
    /// Y coordinate; current cursor Y when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y:        Option<i32>,
    /// Number of clicks; zero or negative clicks nothing
    #[serde(default = "default_clicks")]
    pub clicks:   i64,
    /// Seconds between clicks
    #[serde(default)]
    pub interval: f64,
    /// left, middle or right
    #[serde(default = "default_button")]
    pub button:   String,
}

/// Parameters for the double_click tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DoubleClickParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x:      Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y:      Option<i32>,
    /// left, middle or right
    #[serde(default = "default_button")]
    pub button: String,
}

/// Optional coordinates, for right_click
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct OptionalPointParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

/// Parameters for the drag_to tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DragToParams {
    /// Target X coordinate
    pub x:        i32,
    /// Target Y coordinate
    pub y:        i32,
    /// Seconds the drag should take (0 = instant)
    #[serde(default)]
    pub duration: f64,
    /// Button held during the drag: left, middle or right
    #[serde(default = "default_button")]
    pub button:   String,
}

/// Parameters for the drag_relative tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DragRelativeParams {
    pub dx:       i32,
    pub dy:       i32,
    #[serde(default)]
    pub duration: f64,
    /// Button held during the drag: left, middle or right
    #[serde(default = "default_button")]
    pub button:   String,
}

/// Parameters for the scroll tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ScrollParams {
    /// Wheel notches; positive scrolls up, negative scrolls down
    pub clicks: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x:      Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y:      Option<i32>,
}

// ========== Keyboard ==========

/// Parameters for the type_text tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct TypeTextParams {
    /// Text to type
    pub text:     String,
    /// Seconds between characters (0 = type in one burst)
    #[serde(default)]
    pub interval: f64,
}

/// A single key name, for press_key, key_down and key_up
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct KeyParams {
    /// Key name such as "enter", "esc", "f5", "ctrl" or a single character
    pub key: String,
}

/// Parameters for the hotkey tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct HotkeyParams {
    /// Keys pressed in order and released in reverse, e.g. ["ctrl", "c"]
    pub keys: Vec<String>,
}

// ========== Screen ==========

/// Parameters for the screenshot tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ScreenshotParams {
    /// File name to save under the screenshot directory; the image is
    /// returned inline as base64 PNG when omitted. Directory components are
    /// stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Area to capture as [left, top, width, height]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region:   Option<Vec<i64>>,
}

/// Parameters for locate_on_screen and locate_center_on_screen
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LocateParams {
    /// Path of the image to search for
    pub image_path: String,
    /// Area to search as [left, top, width, height]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region:     Option<Vec<i64>>,
    /// Match threshold in [0, 1]; only honoured when image matching is
    /// available
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// A screen coordinate, for get_pixel_color
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct PointParams {
    pub x: i32,
    pub y: i32,
}

/// Parameters for the pixel_matches_color tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct PixelMatchParams {
    pub x:         i32,
    pub y:         i32,
    /// Expected colour as "#RRGGBB" or "(r, g, b)"
    pub color:     String,
    /// Allowed difference per channel (0-255)
    #[serde(default)]
    pub tolerance: i64,
}

// ========== Windows ==========

/// Parameters for the get_windows_with_title tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct WindowTitleParams {
    /// Case-sensitive text to look for in window titles
    #[serde(alias = "fragment")]
    pub title_fragment: String,
}

// ========== Dialogs ==========

/// Parameters for the alert tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AlertParams {
    /// Text shown in the dialog
    pub message: String,
    #[serde(default = "default_alert_title")]
    pub title:   String,
}

/// Parameters for the confirm tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ConfirmParams {
    /// Text shown in the dialog
    pub message: String,
    #[serde(default = "default_confirm_title")]
    pub title:   String,
    /// Button labels (1 to 3); defaults to ["OK", "Cancel"]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Parameters for the prompt tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PromptParams {
    /// Text shown in the dialog
    pub message: String,
    #[serde(default = "default_prompt_title")]
    pub title:   String,
    /// Text pre-filled in the input field
    #[serde(default)]
    pub default: String,
}

/// Parameters for the password tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PasswordParams {
    /// Text shown in the dialog
    pub message: String,
    #[serde(default = "default_password_title")]
    pub title:   String,
    /// Mask character shown while typing
    #[serde(default = "default_mask")]
    pub mask:    String,
}

// ========== Utilities ==========

/// Parameters for the countdown tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct CountdownParams {
    /// Whole seconds to count down; zero or negative returns at once
    pub seconds: i64,
}

/// Parameters for the display_mouse_position tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DisplayPositionParams {
    /// Seconds to watch the cursor
    #[serde(default = "default_display_seconds")]
    pub seconds: f64,
}
