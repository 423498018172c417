//! Process-wide automation settings
//!
//! Built once at startup and shared read-only with every tool call.

use std::{path::PathBuf, time::Duration};

use crate::error::{AutomationError, AutomationResult};

/// Default pause slept after every mouse/keyboard action
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Default directory that receives named screenshots
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Immutable automation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationConfig {
    /// Abort actions while the cursor sits in a screen corner
    pub failsafe:       bool,
    /// Sleep after each completed action
    pub pause:          Duration,
    /// Directory for screenshots saved by file name
    pub screenshot_dir: PathBuf,
}

impl AutomationConfig {
    /// Builds a configuration, validating the pause given in seconds
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidParameter`] if `pause_secs` is
    /// negative, NaN or infinite.
    pub fn new(
        failsafe: bool,
        pause_secs: f64,
        screenshot_dir: impl Into<PathBuf>,
    ) -> AutomationResult<Self> {
        Ok(Self {
            failsafe,
            pause: seconds("pause", pause_secs)?,
            screenshot_dir: screenshot_dir.into(),
        })
    }

    /// Configuration without pauses, for tests and scripted use
    pub fn immediate() -> Self {
        Self {
            pause: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_failsafe(mut self, failsafe: bool) -> Self {
        self.failsafe = failsafe;
        self
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            failsafe:       true,
            pause:          DEFAULT_PAUSE,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
        }
    }
}

/// Converts a caller-supplied number of seconds into a [`Duration`]
///
/// # Errors
///
/// Rejects negative, NaN and infinite values, naming `parameter` in the error.
///
/// ```
/// use std::time::Duration;
///
/// use autogui_core::config::seconds;
///
/// assert_eq!(seconds("duration", 0.25).unwrap(), Duration::from_millis(250));
/// assert!(seconds("duration", -1.0).is_err());
/// ```
pub fn seconds(parameter: &str, value: f64) -> AutomationResult<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(AutomationError::invalid_parameter(
            parameter,
            format!("must be a non-negative number of seconds, got {}", value),
        ));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| AutomationError::invalid_parameter(parameter, e.to_string()))
}
