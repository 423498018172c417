//! Key name parsing
//!
//! Tools accept keys by name (`"enter"`, `"ctrl"`, `"f5"`, `"a"`). This module
//! turns those names into a backend-neutral [`KeyCode`]; each backend maps the
//! code onto its own key type.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// Backend-neutral key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    CapsLock,
    Control,
    Shift,
    Alt,
    /// Windows / Command / Super key
    Meta,
    /// Function key `F1` ..= `F20`
    F(u8),
    /// A printable character
    Char(char),
}

impl KeyCode {
    /// Whether this key is a modifier usually held in a hotkey
    pub fn is_modifier(&self) -> bool {
        matches!(self, KeyCode::Control | KeyCode::Shift | KeyCode::Alt | KeyCode::Meta)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::F(n) => write!(f, "f{}", n),
            KeyCode::Char(c) => write!(f, "{}", c),
            other => write!(f, "{}", format!("{:?}", other).to_lowercase()),
        }
    }
}

impl FromStr for KeyCode {
    type Err = AutomationError;

    /// Parses a key name
    ///
    /// Names are case-insensitive except for single characters, which are
    /// taken verbatim so `"A"` types an upper-case letter.
    ///
    /// ```
    /// use autogui_core::keys::KeyCode;
    ///
    /// assert_eq!("Enter".parse::<KeyCode>().unwrap(), KeyCode::Enter);
    /// assert_eq!("ctrl".parse::<KeyCode>().unwrap(), KeyCode::Control);
    /// assert_eq!("f12".parse::<KeyCode>().unwrap(), KeyCode::F(12));
    /// assert_eq!("A".parse::<KeyCode>().unwrap(), KeyCode::Char('A'));
    /// assert!("hyper".parse::<KeyCode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(match c {
                '\n' | '\r' => KeyCode::Enter,
                '\t' => KeyCode::Tab,
                ' ' => KeyCode::Space,
                c => KeyCode::Char(c),
            });
        }

        let name = s.trim().to_ascii_lowercase();
        let code = match name.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "space" | "spacebar" => KeyCode::Space,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "capslock" => KeyCode::CapsLock,
            "ctrl" | "ctrlleft" | "ctrlright" | "control" => KeyCode::Control,
            "shift" | "shiftleft" | "shiftright" => KeyCode::Shift,
            "alt" | "altleft" | "altright" | "option" | "optionleft" | "optionright" => {
                KeyCode::Alt
            }
            "win" | "winleft" | "winright" | "command" | "cmd" | "super" | "meta" => KeyCode::Meta,
            other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n @ 1..=20) => KeyCode::F(n),
                _ => {
                    return Err(AutomationError::UnknownKey { key: s.to_string() });
                }
            },
        };
        Ok(code)
    }
}

/// Parses every key in `names`, failing on the first unknown one
pub fn parse_keys<S: AsRef<str>>(names: &[S]) -> Result<Vec<KeyCode>, AutomationError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}
