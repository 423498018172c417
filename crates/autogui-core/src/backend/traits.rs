//! Composable capability traits for automation backends
//!
//! Each trait covers one kind of desktop access so a backend can be assembled
//! from independent pieces (and tests can swap any of them):
//!
//! - [`PointerDevice`]: read and drive the mouse
//! - [`KeyboardDevice`]: synthesise key strokes and text
//! - [`ScreenSource`]: capture the primary display
//! - [`WindowEnumerator`]: list top-level windows
//! - [`DialogPresenter`]: show blocking modal dialogs
//!
//! Implementations perform exactly one primitive per call. Failsafe checks,
//! tweening and pauses live in [`Automator`](crate::automation::Automator).

use async_trait::async_trait;

use crate::{
    capture::ImageBuffer,
    color::Rgb,
    error::AutomationResult,
    keys::KeyCode,
    model::{DialogChoice, Direction, MouseButton, Point, Region, ScreenSize, WindowInfo},
};

/// Capability: read and drive the mouse pointer.
#[async_trait]
pub trait PointerDevice: Send + Sync {
    /// Current cursor position in screen coordinates.
    async fn position(&self) -> AutomationResult<Point>;

    /// Warps the cursor to `to` in a single step.
    async fn move_to(&self, to: Point) -> AutomationResult<()>;

    /// Presses or releases `button` at the current position.
    async fn button(&self, button: MouseButton, direction: Direction) -> AutomationResult<()>;

    /// Turns the vertical wheel by `clicks` notches; positive scrolls up.
    async fn scroll(&self, clicks: i32) -> AutomationResult<()>;
}

/// Capability: synthesise keyboard input.
#[async_trait]
pub trait KeyboardDevice: Send + Sync {
    /// Presses or releases a single key.
    async fn key(&self, key: KeyCode, direction: Direction) -> AutomationResult<()>;

    /// Types `text` as one burst of input.
    async fn text(&self, text: &str) -> AutomationResult<()>;
}

/// Capability: read the primary display.
#[async_trait]
pub trait ScreenSource: Send + Sync {
    /// Size of the primary display.
    async fn screen_size(&self) -> AutomationResult<ScreenSize>;

    /// Captures the primary display, cropped to `region` when given.
    ///
    /// The region is in screen coordinates and must lie on the display.
    async fn capture(&self, region: Option<Region>) -> AutomationResult<ImageBuffer>;

    /// Colour of a single screen pixel.
    async fn pixel(&self, at: Point) -> AutomationResult<Rgb>;
}

/// Capability: enumerate visible top-level windows.
#[async_trait]
pub trait WindowEnumerator: Send + Sync {
    /// Lists visible windows, front-most first where the platform reports
    /// stacking order.
    async fn list_windows(&self) -> AutomationResult<Vec<WindowInfo>>;

    /// Title of the window holding input focus, if any.
    async fn active_window_title(&self) -> AutomationResult<Option<String>>;
}

/// Capability: show blocking modal dialogs.
///
/// Every method returns only after the user dismissed the dialog.
#[async_trait]
pub trait DialogPresenter: Send + Sync {
    async fn alert(&self, title: &str, message: &str) -> AutomationResult<()>;

    /// Shows a message box with one button per entry of `options`.
    async fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[String],
    ) -> AutomationResult<DialogChoice>;

    /// Asks for a line of text; `None` when cancelled.
    async fn prompt(
        &self,
        title: &str,
        message: &str,
        default: &str,
    ) -> AutomationResult<Option<String>>;

    /// Asks for a secret with masked input; `None` when cancelled.
    async fn password(
        &self,
        title: &str,
        message: &str,
        mask: &str,
    ) -> AutomationResult<Option<String>>;
}
