//! Desktop backend driving the live session
//!
//! - Input goes through `enigo`. A fresh `Enigo` is created for every call
//!   inside `spawn_blocking`, since the handle is not `Send` on every
//!   platform. Keys are not released on drop so `key_down` outlives the call.
//! - Screen capture and window enumeration go through `xcap`. Only the
//!   primary monitor is captured.
//! - Alert and confirm dialogs use `rfd` message boxes; prompt and password
//!   use `tinyfiledialogs` input boxes.
//!
//! All OS calls are synchronous and run on the tokio blocking pool.

use async_trait::async_trait;
use enigo::{Axis, Button, Coordinate, Enigo, Key, Keyboard, Mouse, Settings};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::{debug, info};
use xcap::{Monitor, Window};

use super::{DialogPresenter, KeyboardDevice, PointerDevice, ScreenSource, WindowEnumerator};
use crate::{
    capture::ImageBuffer,
    color::Rgb,
    error::{AutomationError, AutomationResult},
    keys::KeyCode,
    model::{DialogChoice, Direction, MouseButton, Point, Region, ScreenSize, WindowInfo},
};

/// Runs a synchronous OS call on the blocking pool
async fn blocking<T, F>(f: F) -> AutomationResult<T>
where
    F: FnOnce() -> AutomationResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

fn open_enigo() -> AutomationResult<Enigo> {
    let settings = Settings {
        release_keys_when_dropped: false,
        ..Settings::default()
    };
    Enigo::new(&settings).map_err(|e| AutomationError::BackendNotAvailable {
        backend: "enigo".to_string(),
        reason:  e.to_string(),
    })
}

fn capture_failed(e: impl ToString) -> AutomationError {
    AutomationError::CaptureFailed {
        reason: e.to_string(),
    }
}

fn primary_monitor() -> AutomationResult<Monitor> {
    let monitors = Monitor::all().map_err(capture_failed)?;
    let index = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);
    monitors
        .into_iter()
        .nth(index)
        .ok_or_else(|| capture_failed("no monitor found"))
}

/// Captures the primary monitor, returning the image and its screen origin
fn capture_primary() -> AutomationResult<(ImageBuffer, Point)> {
    let monitor = primary_monitor()?;
    let origin = Point::new(
        monitor.x().map_err(capture_failed)?,
        monitor.y().map_err(capture_failed)?,
    );
    let image = monitor.capture_image().map_err(capture_failed)?;
    debug!(
        "Captured primary monitor {}x{} at {}",
        image.width(),
        image.height(),
        origin
    );
    Ok((ImageBuffer::from_rgba(image), origin))
}

fn enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Middle => Button::Middle,
        MouseButton::Right => Button::Right,
    }
}

fn enigo_direction(direction: Direction) -> enigo::Direction {
    match direction {
        Direction::Press => enigo::Direction::Press,
        Direction::Release => enigo::Direction::Release,
    }
}

fn enigo_key(key: KeyCode) -> AutomationResult<Key> {
    Ok(match key {
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::Control => Key::Control,
        KeyCode::Shift => Key::Shift,
        KeyCode::Alt => Key::Alt,
        KeyCode::Meta => Key::Meta,
        KeyCode::F(1) => Key::F1,
        KeyCode::F(2) => Key::F2,
        KeyCode::F(3) => Key::F3,
        KeyCode::F(4) => Key::F4,
        KeyCode::F(5) => Key::F5,
        KeyCode::F(6) => Key::F6,
        KeyCode::F(7) => Key::F7,
        KeyCode::F(8) => Key::F8,
        KeyCode::F(9) => Key::F9,
        KeyCode::F(10) => Key::F10,
        KeyCode::F(11) => Key::F11,
        KeyCode::F(12) => Key::F12,
        KeyCode::F(13) => Key::F13,
        KeyCode::F(14) => Key::F14,
        KeyCode::F(15) => Key::F15,
        KeyCode::F(16) => Key::F16,
        KeyCode::F(17) => Key::F17,
        KeyCode::F(18) => Key::F18,
        KeyCode::F(19) => Key::F19,
        KeyCode::F(20) => Key::F20,
        KeyCode::F(_) => {
            return Err(AutomationError::UnknownKey {
                key: key.to_string(),
            });
        }
        KeyCode::Char(c) => Key::Unicode(c),
    })
}

/// Backend for the live desktop session
#[derive(Debug)]
pub struct DesktopBackend {
    screen: ScreenSize,
}

impl DesktopBackend {
    /// Connects to the input and capture libraries
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::BackendNotAvailable`] when either library
    /// cannot reach the desktop session.
    pub fn new() -> AutomationResult<Self> {
        let enigo = open_enigo()?;
        let (width, height) =
            enigo
                .main_display()
                .map_err(|e| AutomationError::BackendNotAvailable {
                    backend: "enigo".to_string(),
                    reason:  e.to_string(),
                })?;

        let monitor = primary_monitor().map_err(|e| AutomationError::BackendNotAvailable {
            backend: "xcap".to_string(),
            reason:  e.to_string(),
        })?;

        info!(
            "Desktop backend ready: display {}x{}, primary monitor '{}'",
            width,
            height,
            monitor.name().unwrap_or_default()
        );

        Ok(Self {
            screen: ScreenSize::new(width.max(0) as u32, height.max(0) as u32),
        })
    }
}

#[async_trait]
impl PointerDevice for DesktopBackend {
    async fn position(&self) -> AutomationResult<Point> {
        blocking(|| {
            let (x, y) = open_enigo()?
                .location()
                .map_err(|e| AutomationError::input_rejected("cursor query", e))?;
            Ok(Point::new(x, y))
        })
        .await
    }

    async fn move_to(&self, to: Point) -> AutomationResult<()> {
        blocking(move || {
            open_enigo()?
                .move_mouse(to.x, to.y, Coordinate::Abs)
                .map_err(|e| AutomationError::input_rejected("move", e))
        })
        .await
    }

    async fn button(&self, button: MouseButton, direction: Direction) -> AutomationResult<()> {
        blocking(move || {
            open_enigo()?
                .button(enigo_button(button), enigo_direction(direction))
                .map_err(|e| AutomationError::input_rejected("mouse button", e))
        })
        .await
    }

    async fn scroll(&self, clicks: i32) -> AutomationResult<()> {
        // enigo scrolls down for positive lengths
        blocking(move || {
            open_enigo()?
                .scroll(clicks.saturating_neg(), Axis::Vertical)
                .map_err(|e| AutomationError::input_rejected("scroll", e))
        })
        .await
    }
}

#[async_trait]
impl KeyboardDevice for DesktopBackend {
    async fn key(&self, key: KeyCode, direction: Direction) -> AutomationResult<()> {
        let mapped = enigo_key(key)?;
        blocking(move || {
            open_enigo()?
                .key(mapped, enigo_direction(direction))
                .map_err(|e| AutomationError::input_rejected("key", e))
        })
        .await
    }

    async fn text(&self, text: &str) -> AutomationResult<()> {
        let text = text.to_string();
        blocking(move || {
            open_enigo()?
                .text(&text)
                .map_err(|e| AutomationError::input_rejected("type", e))
        })
        .await
    }
}

#[async_trait]
impl ScreenSource for DesktopBackend {
    async fn screen_size(&self) -> AutomationResult<ScreenSize> {
        Ok(self.screen)
    }

    async fn capture(&self, region: Option<Region>) -> AutomationResult<ImageBuffer> {
        blocking(move || {
            let (image, origin) = capture_primary()?;
            match region {
                Some(r) => {
                    image.crop(Region::new(r.left - origin.x, r.top - origin.y, r.width, r.height))
                }
                None => Ok(image),
            }
        })
        .await
    }

    async fn pixel(&self, at: Point) -> AutomationResult<Rgb> {
        blocking(move || {
            let (image, origin) = capture_primary()?;
            image
                .pixel(at.offset(-origin.x, -origin.y))
                .ok_or_else(|| {
                    capture_failed(format!("pixel {} is outside the primary screen", at))
                })
        })
        .await
    }
}

fn window_info(window: &Window) -> Result<WindowInfo, String> {
    let text = |e: &dyn std::fmt::Display| e.to_string();
    let bounds = Region::new(
        window.x().map_err(|e| text(&e))?,
        window.y().map_err(|e| text(&e))?,
        window.width().map_err(|e| text(&e))?,
        window.height().map_err(|e| text(&e))?,
    );
    let title = window.title().map_err(|e| text(&e))?;
    let focused = window.is_focused().map_err(|e| text(&e))?;
    Ok(WindowInfo::new(title, bounds, focused))
}

#[async_trait]
impl WindowEnumerator for DesktopBackend {
    async fn list_windows(&self) -> AutomationResult<Vec<WindowInfo>> {
        blocking(|| {
            let windows = Window::all().map_err(|e| AutomationError::WindowQueryFailed {
                reason: e.to_string(),
            })?;

            let mut infos = Vec::with_capacity(windows.len());
            for window in &windows {
                if window.is_minimized().unwrap_or(false) {
                    continue;
                }
                match window_info(window) {
                    Ok(info) => infos.push(info),
                    Err(e) => debug!("Skipping window without metadata: {}", e),
                }
            }
            debug!("Enumerated {} of {} windows", infos.len(), windows.len());
            Ok(infos)
        })
        .await
    }

    async fn active_window_title(&self) -> AutomationResult<Option<String>> {
        let windows = self.list_windows().await?;
        Ok(windows.into_iter().find(|w| w.focused).map(|w| w.title))
    }
}

fn message_box(title: String, message: String, buttons: MessageButtons) -> MessageDialog {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(message)
        .set_buttons(buttons)
}

/// Maps a message-box result back onto the caller's labels
///
/// Custom buttons report `Custom(label)`; `Cancel` means the window was
/// closed without a choice.
fn choice_from_result(result: MessageDialogResult, options: &[String]) -> DialogChoice {
    let label = |i: usize| options.get(i).cloned().map(DialogChoice::Button);
    match result {
        MessageDialogResult::Custom(label) => DialogChoice::Button(label),
        MessageDialogResult::Ok | MessageDialogResult::Yes => {
            label(0).unwrap_or(DialogChoice::Dismissed)
        }
        MessageDialogResult::No => label(1).unwrap_or(DialogChoice::Dismissed),
        MessageDialogResult::Cancel => DialogChoice::Dismissed,
    }
}

#[async_trait]
impl DialogPresenter for DesktopBackend {
    async fn alert(&self, title: &str, message: &str) -> AutomationResult<()> {
        let (title, message) = (title.to_string(), message.to_string());
        blocking(move || {
            message_box(title, message, MessageButtons::Ok).show();
            Ok(())
        })
        .await
    }

    async fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[String],
    ) -> AutomationResult<DialogChoice> {
        let buttons = match options {
            [a] => MessageButtons::OkCustom(a.clone()),
            [a, b] => MessageButtons::OkCancelCustom(a.clone(), b.clone()),
            [a, b, c] => MessageButtons::YesNoCancelCustom(a.clone(), b.clone(), c.clone()),
            _ => {
                return Err(AutomationError::DialogFailed {
                    reason: format!(
                        "message boxes support 1 to 3 buttons, got {}",
                        options.len()
                    ),
                });
            }
        };
        let (title, message) = (title.to_string(), message.to_string());
        let options = options.to_vec();
        blocking(move || {
            let result = message_box(title, message, buttons).show();
            Ok(choice_from_result(result, &options))
        })
        .await
    }

    async fn prompt(
        &self,
        title: &str,
        message: &str,
        default: &str,
    ) -> AutomationResult<Option<String>> {
        let (title, message, default) =
            (title.to_string(), message.to_string(), default.to_string());
        blocking(move || Ok(tinyfiledialogs::input_box(&title, &message, &default))).await
    }

    async fn password(
        &self,
        title: &str,
        message: &str,
        _mask: &str,
    ) -> AutomationResult<Option<String>> {
        let (title, message) = (title.to_string(), message.to_string());
        blocking(move || Ok(tinyfiledialogs::password_box(&title, &message))).await
    }
}
