//! Command-line and environment configuration

use std::path::PathBuf;

use autogui_core::{
    config::{AutomationConfig, DEFAULT_SCREENSHOT_DIR},
    error::AutomationResult,
};
use clap::{ArgAction, Parser};

/// autogui-mcp: desktop automation over the Model Context Protocol (stdio)
#[derive(Debug, Clone, Parser)]
#[command(name = "autogui-mcp", version)]
#[command(about = "MCP server for mouse, keyboard, screen, window and dialog automation")]
pub struct Cli {
    /// Abort actions while the cursor sits in a screen corner
    #[arg(long, env = "AUTOGUI_FAILSAFE", default_value_t = true, action = ArgAction::Set)]
    pub failsafe: bool,

    /// Seconds to sleep after each mouse or keyboard action
    #[arg(long, env = "AUTOGUI_PAUSE", default_value_t = 0.1)]
    pub pause: f64,

    /// Directory that receives saved screenshots
    #[arg(long, env = "AUTOGUI_SCREENSHOT_DIR", default_value = DEFAULT_SCREENSHOT_DIR)]
    pub screenshot_dir: PathBuf,
}

impl Cli {
    /// Validates the flags and builds the shared automation settings
    ///
    /// # Errors
    ///
    /// Fails when `--pause` is negative or not finite.
    pub fn automation_config(&self) -> AutomationResult<AutomationConfig> {
        AutomationConfig::new(self.failsafe, self.pause, self.screenshot_dir.clone())
    }
}
