//! RGB colours and their textual forms
//!
//! Colours arrive from callers as `#RRGGBB` or `(r, g, b)` strings. Parsing is
//! lenient about whitespace and hex letter case but strict about length and
//! component range.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// An opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Whether every channel is within `tolerance` of `other`
    ///
    /// ```
    /// use autogui_core::color::Rgb;
    ///
    /// let red = Rgb::new(255, 0, 0);
    /// assert!(red.matches(Rgb::new(255, 0, 0), 0));
    /// assert!(!red.matches(Rgb::new(250, 0, 0), 0));
    /// assert!(red.matches(Rgb::new(245, 10, 0), 10));
    /// ```
    pub fn matches(&self, other: Rgb, tolerance: u8) -> bool {
        let close = |a: u8, b: u8| a.abs_diff(b) <= tolerance;
        close(self.r, other.r) && close(self.g, other.g) && close(self.b, other.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<image::Rgba<u8>> for Rgb {
    fn from(px: image::Rgba<u8>) -> Self {
        Self::new(px.0[0], px.0[1], px.0[2])
    }
}

impl FromStr for Rgb {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Parses `#RRGGBB` or `(r, g, b)`
///
/// # Errors
///
/// Returns [`AutomationError::InvalidColor`] describing the problem: wrong
/// hex length, non-hex digits, wrong tuple arity, non-integer or out of range
/// components, or an unrecognised format.
pub fn parse_color(input: &str) -> Result<Rgb, AutomationError> {
    let invalid = |reason: String| AutomationError::InvalidColor {
        input: input.to_string(),
        reason,
    };
    let text = input.trim();

    if let Some(hex) = text.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid("hex color must be in #RRGGBB format".to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| invalid(format!("'{}' is not a hex byte", &hex[i..i + 2])))
        };
        return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
    }

    if text.starts_with('(') {
        let inner = text.trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "RGB color must have 3 integer components, got {}",
                parts.len()
            )));
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let value: i64 = part
                .parse()
                .map_err(|_| invalid(format!("'{}' is not an integer", part)))?;
            *slot = u8::try_from(value)
                .map_err(|_| invalid(format!("component {} is outside 0-255", value)))?;
        }
        return Ok(Rgb::new(channels[0], channels[1], channels[2]));
    }

    Err(invalid(
        "invalid color format, use '#RRGGBB' or '(R, G, B)'".to_string(),
    ))
}
