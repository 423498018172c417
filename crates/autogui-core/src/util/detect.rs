//! Session detection
//!
//! Reads the environment once at startup to report which OS and display
//! server the automation backend will talk to, and whether the X11 protocol
//! used for input injection and window queries is reachable from it.

use std::env;

use crate::model::{DisplayServer, PlatformInfo};

/// The graphical session as seen from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub platform:      PlatformInfo,
    /// `$DISPLAY` is set, natively or through XWayland
    pub x11_reachable: bool,
}

impl Session {
    /// A startup warning when input or window queries are likely to fail
    pub fn input_warning(&self) -> Option<&'static str> {
        match self.platform.display {
            DisplayServer::None => Some(
                "no graphical session detected; input injection and capture will fail",
            ),
            DisplayServer::Wayland if !self.x11_reachable => Some(
                "Wayland session without XWayland ($DISPLAY unset); input injection and \
                 window queries need an X11 connection",
            ),
            DisplayServer::Wayland => Some(
                "Wayland session: input and window queries go through XWayland and only \
                 see X11 clients",
            ),
            _ => None,
        }
    }
}

/// Detects the OS and display server of this process
///
/// ```
/// use autogui_core::util::detect::detect_platform;
///
/// let platform = detect_platform();
/// println!("Running on: {} with display: {}", platform.os, platform.display);
/// ```
pub fn detect_platform() -> PlatformInfo {
    detect_session().platform
}

/// Detects the session from the process environment
pub fn detect_session() -> Session {
    session_from(|key| env::var(key).ok())
}

fn session_from(lookup: impl Fn(&str) -> Option<String>) -> Session {
    let set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
    let x11_reachable = set("DISPLAY");

    let display = if cfg!(target_os = "windows") {
        DisplayServer::Windows
    } else if cfg!(target_os = "macos") {
        DisplayServer::MacOS
    } else if set("WAYLAND_DISPLAY") {
        DisplayServer::Wayland
    } else if x11_reachable {
        DisplayServer::X11
    } else {
        DisplayServer::None
    };

    Session {
        platform: PlatformInfo::new(env::consts::OS.to_string(), display),
        x11_reachable,
    }
}
