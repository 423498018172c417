//! autogui-mcp-server: MCP server for desktop automation
//!
//! Thin protocol layer that wraps autogui-core with MCP tool routing, the
//! result envelope and command-line configuration.

pub mod config;
pub mod envelope;
pub mod mcp;
pub mod params;
