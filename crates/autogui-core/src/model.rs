//! Data models and type definitions for autogui
//!
//! This module defines the value types passed between the gateway, the
//! [`Automator`](crate::automation::Automator) and the backends:
//! - Screen geometry (points, regions, screen size)
//! - Mouse buttons and press/release directions
//! - Window metadata returned by window enumeration
//! - Platform detection and runtime capability flags

use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AutomationError, AutomationResult};

/// Display server detected for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayServer {
    /// No display detected (headless session)
    None,
    /// Wayland compositor (Linux)
    Wayland,
    /// X11 server (Linux)
    X11,
    /// Windows desktop
    Windows,
    /// macOS Quartz
    #[serde(rename = "macos")]
    MacOS,
}

impl DisplayServer {
    /// Returns the display server as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayServer::None => "none",
            DisplayServer::Wayland => "wayland",
            DisplayServer::X11 => "x11",
            DisplayServer::Windows => "windows",
            DisplayServer::MacOS => "macos",
        }
    }
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform information including OS and display server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformInfo {
    /// Operating system name (e.g., "linux", "windows", "macos")
    pub os:      String,
    /// Detected display server
    pub display: DisplayServer,
}

impl PlatformInfo {
    /// Creates a new PlatformInfo instance
    pub fn new(os: String, display: DisplayServer) -> Self {
        Self { os, display }
    }
}

/// Screen coordinate, origin top-left, y increasing downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offsets the point, saturating at the `i32` bounds
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangle in screen coordinates
///
/// On the wire a region is the list `[left, top, width, height]`; use
/// [`Region::from_list`] to validate that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    pub left:   i32,
    pub top:    i32,
    pub width:  u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Parses the `[left, top, width, height]` list form
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidRegion`] when the list does not have
    /// exactly four entries, when a value does not fit a screen coordinate, or
    /// when width/height is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use autogui_core::model::Region;
    ///
    /// let region = Region::from_list(&[10, 20, 300, 200]).unwrap();
    /// assert_eq!(region, Region::new(10, 20, 300, 200));
    ///
    /// assert!(Region::from_list(&[10, 20, 300]).is_err());
    /// assert!(Region::from_list(&[10, 20, -1, 200]).is_err());
    /// ```
    pub fn from_list(values: &[i64]) -> AutomationResult<Self> {
        let [left, top, width, height] = values else {
            return Err(AutomationError::InvalidRegion {
                reason: format!(
                    "expected [left, top, width, height], got {} value(s)",
                    values.len()
                ),
            });
        };

        let coord = |name: &str, v: i64| {
            i32::try_from(v).map_err(|_| AutomationError::InvalidRegion {
                reason: format!("{} {} is out of range", name, v),
            })
        };
        let extent = |name: &str, v: i64| {
            if v < 0 {
                return Err(AutomationError::InvalidRegion {
                    reason: format!("{} must be >= 0, got {}", name, v),
                });
            }
            u32::try_from(v).map_err(|_| AutomationError::InvalidRegion {
                reason: format!("{} {} is out of range", name, v),
            })
        };

        Ok(Self {
            left:   coord("left", *left)?,
            top:    coord("top", *top)?,
            width:  extent("width", *width)?,
            height: extent("height", *height)?,
        })
    }

    /// Returns the list form `[left, top, width, height]`
    pub fn to_list(&self) -> [i64; 4] {
        [
            self.left as i64,
            self.top as i64,
            self.width as i64,
            self.height as i64,
        ]
    }

    /// Centre point, using integer division
    pub fn center(&self) -> Point {
        Point::new(
            self.left + (self.width / 2) as i32,
            self.top + (self.height / 2) as i32,
        )
    }
}

/// Mouse button accepted by click and drag tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MouseButton {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "primary" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" | "secondary" => Ok(MouseButton::Right),
            other => Err(AutomationError::InvalidParameter {
                parameter: "button".to_string(),
                reason:    format!(
                    "unknown button '{}'; expected 'left', 'middle' or 'right'",
                    other
                ),
            }),
        }
    }
}

/// Press or release half of a button/key stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Press,
    Release,
}

/// Size of the primary display in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenSize {
    pub width:  u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The four corner points monitored by the failsafe
    pub fn corners(&self) -> [Point; 4] {
        let right = self.width.saturating_sub(1) as i32;
        let bottom = self.height.saturating_sub(1) as i32;
        [
            Point::new(0, 0),
            Point::new(right, 0),
            Point::new(0, bottom),
            Point::new(right, bottom),
        ]
    }
}

/// A visible top-level window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WindowInfo {
    /// Window title
    pub title:   String,
    /// X coordinate of the window's left edge
    pub left:    i32,
    /// Y coordinate of the window's top edge
    pub top:     i32,
    /// Width in pixels
    pub width:   u32,
    /// Height in pixels
    pub height:  u32,
    /// Whether the window currently has input focus
    pub focused: bool,
}

impl WindowInfo {
    pub fn new(title: impl Into<String>, bounds: Region, focused: bool) -> Self {
        Self {
            title: title.into(),
            left: bounds.left,
            top: bounds.top,
            width: bounds.width,
            height: bounds.height,
            focused,
        }
    }
}

/// Outcome of a modal confirm dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogChoice {
    /// The user clicked the button with this label
    Button(String),
    /// The dialog was closed without choosing
    Dismissed,
}

/// Runtime capability flags resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Capabilities {
    /// Whether `confidence` is honoured by image location
    pub confidence_matching: bool,
}

impl Capabilities {
    /// Capabilities compiled into this build
    pub fn detect() -> Self {
        Self {
            confidence_matching: cfg!(feature = "image-matching"),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}
