//! Error types for automation operations
//!
//! Every fallible operation in this crate returns [`AutomationResult`]. The
//! gateway never lets these errors escape as protocol faults: each one is
//! rendered into the `error` field of a tool envelope, and the
//! [`remediation_hint`](AutomationError::remediation_hint) is logged next to
//! it.

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Result type alias for automation operations
pub type AutomationResult<T> = Result<T, AutomationError>;

/// High-level error category for filtering and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed caller input
    InvalidInput,
    /// The failsafe corner aborted the action
    FailSafe,
    /// The OS rejected an input event or query
    BackendFailure,
    /// A backend or feature is not available on this host
    Unavailable,
    /// I/O or system error
    SystemError,
    /// Image decoding/encoding error
    ProcessingError,
}

/// Error type for automation operations
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    /// Pointer was found in a monitored screen corner
    #[error(
        "Fail-safe triggered: mouse is in a corner of the screen at {position}. To disable the \
         fail-safe, start the server with --failsafe false"
    )]
    FailSafeTriggered {
        /// Cursor position that triggered the abort
        position: Point,
    },

    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason:    String,
    },

    /// Colour string did not match `#RRGGBB` or `(r, g, b)`
    #[error("Invalid color '{input}': {reason}")]
    InvalidColor {
        /// The rejected colour text
        input:  String,
        /// What was wrong with it
        reason: String,
    },

    /// Region argument was not `[left, top, width, height]`
    #[error("Invalid region: {reason}")]
    InvalidRegion {
        /// What was wrong with it
        reason: String,
    },

    /// Key name is not recognised
    #[error("Unknown key name '{key}'")]
    UnknownKey {
        /// The rejected key name
        key: String,
    },

    /// The input library rejected a mouse or keyboard event
    #[error("Input injection failed during {action}: {reason}")]
    InputRejected {
        /// The action being performed (e.g. "move", "key press")
        action: String,
        /// Backend diagnostic
        reason: String,
    },

    /// Screen capture or pixel read failed
    #[error("Screen capture failed: {reason}")]
    CaptureFailed {
        /// Backend diagnostic
        reason: String,
    },

    /// Window enumeration failed
    #[error("Window query failed: {reason}")]
    WindowQueryFailed {
        /// Backend diagnostic
        reason: String,
    },

    /// A modal dialog could not be shown
    #[error("Dialog failed: {reason}")]
    DialogFailed {
        /// Backend diagnostic
        reason: String,
    },

    /// The needle image for a locate call could not be loaded
    #[error("Failed to load image '{path}': {reason}")]
    ImageLoadFailed {
        /// Path supplied by the caller
        path:   String,
        /// Decoder diagnostic
        reason: String,
    },

    /// Requested backend is not available
    #[error("Automation backend '{backend}' is not available: {reason}")]
    BackendNotAvailable {
        /// Backend name
        backend: String,
        /// Initialisation diagnostic
        reason:  String,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// A blocking backend task panicked or was cancelled
    #[error("Backend task failed: {reason}")]
    TaskFailed {
        /// Join error text
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AutomationError {
    /// Shorthand for [`AutomationError::InvalidParameter`]
    pub fn invalid_parameter(parameter: &str, reason: impl Into<String>) -> Self {
        AutomationError::InvalidParameter {
            parameter: parameter.to_string(),
            reason:    reason.into(),
        }
    }

    /// Shorthand for [`AutomationError::InputRejected`]
    pub fn input_rejected(action: &str, reason: impl ToString) -> Self {
        AutomationError::InputRejected {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            AutomationError::InvalidParameter { .. }
            | AutomationError::InvalidColor { .. }
            | AutomationError::InvalidRegion { .. }
            | AutomationError::UnknownKey { .. }
            | AutomationError::ImageLoadFailed { .. } => ErrorCategory::InvalidInput,
            AutomationError::FailSafeTriggered { .. } => ErrorCategory::FailSafe,
            AutomationError::InputRejected { .. }
            | AutomationError::CaptureFailed { .. }
            | AutomationError::WindowQueryFailed { .. }
            | AutomationError::DialogFailed { .. } => ErrorCategory::BackendFailure,
            AutomationError::BackendNotAvailable { .. } => ErrorCategory::Unavailable,
            AutomationError::TaskFailed { .. } | AutomationError::IoError(_) => {
                ErrorCategory::SystemError
            }
            AutomationError::EncodingFailed { .. } => ErrorCategory::ProcessingError,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use autogui_core::error::AutomationError;
    ///
    /// let error = AutomationError::UnknownKey {
    ///     key: "hyper".to_string(),
    /// };
    /// assert!(error.remediation_hint().contains("key names"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            AutomationError::FailSafeTriggered { .. } => {
                "Move the mouse away from the screen corner before retrying. The corner check \
                 exists so a runaway automation can be stopped by hand."
            }
            AutomationError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "button" => "Use 'left', 'middle' or 'right'.",
                "confidence" => "Confidence must be between 0.0 and 1.0.",
                "options" => "Provide between one and three button labels.",
                "filename" => "Provide a plain file name such as 'capture.png'.",
                _ => "Check the parameter value against the tool schema.",
            },
            AutomationError::InvalidColor { .. } => {
                "Use '#RRGGBB' (e.g. '#FF0000') or '(R, G, B)' (e.g. '(255, 0, 0)') with \
                 components between 0 and 255."
            }
            AutomationError::InvalidRegion { .. } => {
                "Provide the region as [left, top, width, height] with non-negative width and \
                 height, inside the primary screen."
            }
            AutomationError::UnknownKey { .. } => {
                "Use key names such as 'enter', 'esc', 'tab', 'space', 'ctrl', 'shift', 'alt', \
                 'win', 'f1'-'f20', arrow names ('left', 'up') or a single character."
            }
            AutomationError::InputRejected { .. } => {
                "The operating system rejected the input event. On Linux check that an X11 \
                 session is available (DISPLAY is set); on macOS grant Accessibility permission."
            }
            AutomationError::CaptureFailed { .. } => {
                "Screen capture failed. On macOS grant Screen Recording permission; on Linux make \
                 sure a display server is running."
            }
            AutomationError::WindowQueryFailed { .. } => {
                "Window enumeration failed. Wayland sessions restrict access to other windows; \
                 try an X11 session."
            }
            AutomationError::DialogFailed { .. } => {
                "The dialog could not be shown. On Linux install zenity or kdialog."
            }
            AutomationError::ImageLoadFailed { .. } => {
                "Check that the image path exists and points to a PNG, JPEG or BMP file."
            }
            AutomationError::BackendNotAvailable { .. } => {
                "No desktop session is reachable from this process. Run the server inside a \
                 graphical session."
            }
            AutomationError::EncodingFailed { .. } => {
                "Image encoding failed. Try saving with a .png extension."
            }
            AutomationError::TaskFailed { .. } => {
                "A backend call crashed. Retry the operation; if it persists, check the server \
                 log."
            }
            AutomationError::IoError(_) => {
                "An I/O error occurred. Check file permissions and disk space for the screenshot \
                 directory."
            }
        }
    }
}

impl From<tokio::task::JoinError> for AutomationError {
    fn from(e: tokio::task::JoinError) -> Self {
        AutomationError::TaskFailed {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failsafe_message_mentions_position() {
        let error = AutomationError::FailSafeTriggered {
            position: Point::new(0, 0),
        };
        let msg = error.to_string();
        assert!(msg.contains("fail-safe"));
        assert!(msg.contains("(0, 0)"));
        assert_eq!(error.category(), ErrorCategory::FailSafe);
    }

    #[test]
    fn test_invalid_color_display() {
        let error = AutomationError::InvalidColor {
            input:  "notacolor".to_string(),
            reason: "expected '#RRGGBB' or '(R, G, B)'".to_string(),
        };
        assert!(error.to_string().contains("notacolor"));
        assert_eq!(error.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_invalid_parameter_hints() {
        let error = AutomationError::invalid_parameter("confidence", "must be <= 1.0");
        assert!(error.remediation_hint().contains("0.0 and 1.0"));

        let error = AutomationError::invalid_parameter("something_else", "bad");
        assert!(error.remediation_hint().contains("schema"));
    }

    #[test]
    fn test_input_rejected_is_backend_failure() {
        let error = AutomationError::input_rejected("click", "no display");
        assert_eq!(error.to_string(), "Input injection failed during click: no display");
        assert_eq!(error.category(), ErrorCategory::BackendFailure);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: AutomationError = io.into();
        assert!(matches!(error, AutomationError::IoError(_)));
        assert_eq!(error.category(), ErrorCategory::SystemError);
    }

    #[test]
    fn test_every_variant_has_a_hint() {
        let errors = vec![
            AutomationError::FailSafeTriggered {
                position: Point::new(0, 0),
            },
            AutomationError::invalid_parameter("button", "bad"),
            AutomationError::InvalidRegion {
                reason: "x".into(),
            },
            AutomationError::UnknownKey { key: "x".into() },
            AutomationError::CaptureFailed { reason: "x".into() },
            AutomationError::WindowQueryFailed { reason: "x".into() },
            AutomationError::DialogFailed { reason: "x".into() },
            AutomationError::BackendNotAvailable {
                backend: "desktop".into(),
                reason:  "x".into(),
            },
            AutomationError::TaskFailed { reason: "x".into() },
        ];
        for error in errors {
            assert!(!error.remediation_hint().is_empty(), "{:?} has no hint", error);
        }
    }
}
