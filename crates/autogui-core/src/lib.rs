//! autogui-core: Desktop automation primitives
//!
//! This library provides the automation layer behind the autogui MCP server:
//! mouse and keyboard injection, screen capture, image location, window
//! enumeration and modal dialogs. Platform access sits behind capability
//! traits so the same [`automation::Automator`] drives both the real desktop
//! and the in-memory [`backend::MockBackend`] used in tests.

pub mod automation;
pub mod backend;
pub mod capture;
pub mod color;
pub mod config;
pub mod error;
pub mod keys;
pub mod model;
pub mod util;
