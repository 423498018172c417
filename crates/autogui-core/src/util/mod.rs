//! Utility modules for autogui

pub mod detect;
pub mod encode;
pub mod screenshot_files;
