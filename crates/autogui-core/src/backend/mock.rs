//! Mock automation backend for testing
//!
//! `MockBackend` implements every capability trait against in-memory state:
//!
//! - **Cursor:** a position clamped to the synthetic screen, like a real
//!   pointer
//! - **Screen:** a 1920x1080 test pattern unless replaced with
//!   [`with_screen`](MockBackend::with_screen)
//! - **Windows:** three predefined windows, Firefox focused
//! - **Input log:** every primitive is recorded as an [`InputEvent`]
//! - **Dialogs:** scripted answers, and a record of each dialog shown
//! - **Fault injection:** make one capability (or one key) fail
//! - **Configurable delay:** simulate slow backend calls
//!
//! # Examples
//!
//! ```
//! use autogui_core::{
//!     backend::{InputEvent, MockBackend, PointerDevice},
//!     model::Point,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = MockBackend::new();
//! backend.move_to(Point::new(10, 20)).await.unwrap();
//!
//! assert_eq!(backend.cursor(), Point::new(10, 20));
//! assert_eq!(backend.events(), vec![InputEvent::MoveTo(Point::new(10, 20))]);
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

use super::{DialogPresenter, KeyboardDevice, PointerDevice, ScreenSource, WindowEnumerator};
use crate::{
    capture::ImageBuffer,
    color::Rgb,
    error::{AutomationError, AutomationResult},
    keys::KeyCode,
    model::{DialogChoice, Direction, MouseButton, Point, Region, ScreenSize, WindowInfo},
};

/// A primitive recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    MoveTo(Point),
    Button(MouseButton, Direction),
    Scroll(i32),
    Key(KeyCode, Direction),
    Text(String),
}

/// A dialog the mock was asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShownDialog {
    Alert {
        title:   String,
        message: String,
    },
    Confirm {
        title:   String,
        message: String,
        options: Vec<String>,
    },
    Prompt {
        title:   String,
        message: String,
        default: String,
    },
    Password {
        title:   String,
        message: String,
        mask:    String,
    },
}

/// Which backend calls should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFault {
    /// Every pointer and keyboard primitive
    Input,
    /// Cursor moves only
    Move,
    /// Pressing this key
    KeyPress(KeyCode),
    /// Screen size, capture and pixel reads
    Capture,
    /// Window enumeration
    Windows,
    /// Every dialog
    Dialogs,
}

#[derive(Debug)]
struct MockState {
    cursor:         Point,
    screen:         ImageBuffer,
    windows:        Vec<WindowInfo>,
    events:         Vec<InputEvent>,
    held_keys:      Vec<KeyCode>,
    dialogs:        Vec<ShownDialog>,
    confirm_choice: Option<DialogChoice>,
    prompt_reply:   Option<Option<String>>,
    password_reply: Option<String>,
}

/// In-memory backend implementing every capability trait
#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<MockState>,
    delay: Option<Duration>,
    fault: Option<(MockFault, String)>,
}

impl MockBackend {
    pub const SCREEN_WIDTH: u32 = 1920;
    pub const SCREEN_HEIGHT: u32 = 1080;

    /// Creates a mock with a 1920x1080 screen and the cursor at its centre
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                cursor:         Point::new(
                    (Self::SCREEN_WIDTH / 2) as i32,
                    (Self::SCREEN_HEIGHT / 2) as i32,
                ),
                screen:         ImageBuffer::from_test_pattern(
                    Self::SCREEN_WIDTH,
                    Self::SCREEN_HEIGHT,
                ),
                windows:        Self::create_mock_windows(),
                events:         Vec::new(),
                held_keys:      Vec::new(),
                dialogs:        Vec::new(),
                confirm_choice: None,
                prompt_reply:   None,
                password_reply: None,
            }),
            delay: None,
            fault: None,
        }
    }

    /// Sets a delay applied before every backend call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes the calls selected by `fault` fail with `reason`
    pub fn with_fault(mut self, fault: MockFault, reason: impl Into<String>) -> Self {
        self.fault = Some((fault, reason.into()));
        self
    }

    /// Replaces the synthetic screen; the cursor is clamped onto it
    pub fn with_screen(self, screen: ImageBuffer) -> Self {
        {
            let mut state = self.state.lock();
            state.screen = screen;
            state.cursor = clamp(state.cursor, &state.screen);
        }
        self
    }

    pub fn with_windows(self, windows: Vec<WindowInfo>) -> Self {
        self.state.lock().windows = windows;
        self
    }

    pub fn with_cursor(self, at: Point) -> Self {
        self.set_cursor(at);
        self
    }

    /// Answer given by the next confirm dialogs; by default the first option
    pub fn with_confirm_choice(self, choice: DialogChoice) -> Self {
        self.state.lock().confirm_choice = Some(choice);
        self
    }

    /// Answer given by prompt dialogs; by default the prompt's default text
    pub fn with_prompt_reply(self, reply: Option<&str>) -> Self {
        self.state.lock().prompt_reply = Some(reply.map(str::to_string));
        self
    }

    /// Secret entered in password dialogs; by default they are cancelled
    pub fn with_password_reply(self, reply: &str) -> Self {
        self.state.lock().password_reply = Some(reply.to_string());
        self
    }

    /// Moves the cursor without recording an event, like a user would
    pub fn set_cursor(&self, at: Point) {
        let mut state = self.state.lock();
        state.cursor = clamp(at, &state.screen);
    }

    pub fn cursor(&self) -> Point {
        self.state.lock().cursor
    }

    /// Every primitive performed so far, oldest first
    pub fn events(&self) -> Vec<InputEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// Keys pressed and not yet released, in press order
    pub fn held_keys(&self) -> Vec<KeyCode> {
        self.state.lock().held_keys.clone()
    }

    /// Every dialog shown so far, oldest first
    pub fn dialogs(&self) -> Vec<ShownDialog> {
        self.state.lock().dialogs.clone()
    }

    fn create_mock_windows() -> Vec<WindowInfo> {
        vec![
            WindowInfo::new("Mozilla Firefox", Region::new(0, 0, 1280, 1024), true),
            WindowInfo::new("Visual Studio Code", Region::new(200, 100, 1600, 900), false),
            WindowInfo::new("Terminal - Alacritty", Region::new(640, 480, 800, 600), false),
        ]
    }

    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    fn check_fault(
        &self,
        hit: impl Fn(&MockFault) -> bool,
        error: impl Fn(String) -> AutomationError,
    ) -> AutomationResult<()> {
        match &self.fault {
            Some((fault, reason)) if hit(fault) => Err(error(reason.clone())),
            _ => Ok(()),
        }
    }

    fn check_input(
        &self,
        action: &str,
        extra: impl Fn(&MockFault) -> bool,
    ) -> AutomationResult<()> {
        self.check_fault(
            |f| *f == MockFault::Input || extra(f),
            |reason| AutomationError::input_rejected(action, reason),
        )
    }

    fn check_capture(&self) -> AutomationResult<()> {
        self.check_fault(
            |f| *f == MockFault::Capture,
            |reason| AutomationError::CaptureFailed { reason },
        )
    }

    fn check_dialogs(&self) -> AutomationResult<()> {
        self.check_fault(
            |f| *f == MockFault::Dialogs,
            |reason| AutomationError::DialogFailed { reason },
        )
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp(at: Point, screen: &ImageBuffer) -> Point {
    let max_x = screen.width().saturating_sub(1) as i32;
    let max_y = screen.height().saturating_sub(1) as i32;
    Point::new(at.x.clamp(0, max_x), at.y.clamp(0, max_y))
}

#[async_trait]
impl PointerDevice for MockBackend {
    async fn position(&self) -> AutomationResult<Point> {
        self.apply_delay().await;
        Ok(self.cursor())
    }

    async fn move_to(&self, to: Point) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_input("move", |f| *f == MockFault::Move)?;
        let mut state = self.state.lock();
        state.cursor = clamp(to, &state.screen);
        state.events.push(InputEvent::MoveTo(to));
        Ok(())
    }

    async fn button(&self, button: MouseButton, direction: Direction) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_input("mouse button", |_| false)?;
        self.state.lock().events.push(InputEvent::Button(button, direction));
        Ok(())
    }

    async fn scroll(&self, clicks: i32) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_input("scroll", |_| false)?;
        self.state.lock().events.push(InputEvent::Scroll(clicks));
        Ok(())
    }
}

#[async_trait]
impl KeyboardDevice for MockBackend {
    async fn key(&self, key: KeyCode, direction: Direction) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_input("key", |f| {
            direction == Direction::Press && *f == MockFault::KeyPress(key)
        })?;

        let mut state = self.state.lock();
        match direction {
            Direction::Press => {
                if !state.held_keys.contains(&key) {
                    state.held_keys.push(key);
                }
            }
            Direction::Release => state.held_keys.retain(|k| *k != key),
        }
        state.events.push(InputEvent::Key(key, direction));
        Ok(())
    }

    async fn text(&self, text: &str) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_input("type", |_| false)?;
        self.state.lock().events.push(InputEvent::Text(text.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ScreenSource for MockBackend {
    async fn screen_size(&self) -> AutomationResult<ScreenSize> {
        self.apply_delay().await;
        self.check_capture()?;
        let (width, height) = self.state.lock().screen.dimensions();
        Ok(ScreenSize::new(width, height))
    }

    async fn capture(&self, region: Option<Region>) -> AutomationResult<ImageBuffer> {
        self.apply_delay().await;
        self.check_capture()?;
        let state = self.state.lock();
        match region {
            Some(region) => state.screen.crop(region),
            None => Ok(state.screen.clone()),
        }
    }

    async fn pixel(&self, at: Point) -> AutomationResult<Rgb> {
        self.apply_delay().await;
        self.check_capture()?;
        let state = self.state.lock();
        state.screen.pixel(at).ok_or_else(|| AutomationError::CaptureFailed {
            reason: format!(
                "pixel {} is outside the screen ({}x{})",
                at,
                state.screen.width(),
                state.screen.height()
            ),
        })
    }
}

#[async_trait]
impl WindowEnumerator for MockBackend {
    async fn list_windows(&self) -> AutomationResult<Vec<WindowInfo>> {
        self.apply_delay().await;
        self.check_fault(
            |f| *f == MockFault::Windows,
            |reason| AutomationError::WindowQueryFailed { reason },
        )?;
        Ok(self.state.lock().windows.clone())
    }

    async fn active_window_title(&self) -> AutomationResult<Option<String>> {
        let windows = self.list_windows().await?;
        Ok(windows.into_iter().find(|w| w.focused).map(|w| w.title))
    }
}

#[async_trait]
impl DialogPresenter for MockBackend {
    async fn alert(&self, title: &str, message: &str) -> AutomationResult<()> {
        self.apply_delay().await;
        self.check_dialogs()?;
        self.state.lock().dialogs.push(ShownDialog::Alert {
            title:   title.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[String],
    ) -> AutomationResult<DialogChoice> {
        self.apply_delay().await;
        self.check_dialogs()?;
        let mut state = self.state.lock();
        state.dialogs.push(ShownDialog::Confirm {
            title:   title.to_string(),
            message: message.to_string(),
            options: options.to_vec(),
        });
        Ok(state.confirm_choice.clone().unwrap_or_else(|| match options.first() {
            Some(first) => DialogChoice::Button(first.clone()),
            None => DialogChoice::Dismissed,
        }))
    }

    async fn prompt(
        &self,
        title: &str,
        message: &str,
        default: &str,
    ) -> AutomationResult<Option<String>> {
        self.apply_delay().await;
        self.check_dialogs()?;
        let mut state = self.state.lock();
        state.dialogs.push(ShownDialog::Prompt {
            title:   title.to_string(),
            message: message.to_string(),
            default: default.to_string(),
        });
        Ok(state
            .prompt_reply
            .clone()
            .unwrap_or_else(|| Some(default.to_string())))
    }

    async fn password(
        &self,
        title: &str,
        message: &str,
        mask: &str,
    ) -> AutomationResult<Option<String>> {
        self.apply_delay().await;
        self.check_dialogs()?;
        let mut state = self.state.lock();
        state.dialogs.push(ShownDialog::Password {
            title:   title.to_string(),
            message: message.to_string(),
            mask:    mask.to_string(),
        });
        Ok(state.password_reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_new() {
        let backend = MockBackend::new();
        assert!(backend.delay.is_none());
        assert!(backend.fault.is_none());
        assert_eq!(backend.cursor(), Point::new(960, 540));
        assert!(backend.events().is_empty());
    }

    #[test]
    fn test_mock_windows_data() {
        let windows = MockBackend::create_mock_windows();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].title, "Mozilla Firefox");
        assert!(windows[0].focused);
        assert!(windows.iter().skip(1).all(|w| !w.focused));
    }

    #[test]
    fn test_set_cursor_clamps_to_screen() {
        let backend = MockBackend::new();
        backend.set_cursor(Point::new(-50, 5000));
        assert_eq!(backend.cursor(), Point::new(0, 1079));
        assert!(backend.events().is_empty());
    }

    #[tokio::test]
    async fn test_move_records_requested_point() {
        let backend = MockBackend::new();
        backend.move_to(Point::new(3000, 20)).await.unwrap();
        assert_eq!(backend.cursor(), Point::new(1919, 20));
        assert_eq!(backend.events(), vec![InputEvent::MoveTo(Point::new(3000, 20))]);
    }

    #[tokio::test]
    async fn test_key_tracking() {
        let backend = MockBackend::new();
        backend.key(KeyCode::Shift, Direction::Press).await.unwrap();
        backend.key(KeyCode::Char('a'), Direction::Press).await.unwrap();
        assert_eq!(backend.held_keys(), vec![KeyCode::Shift, KeyCode::Char('a')]);

        backend.key(KeyCode::Shift, Direction::Release).await.unwrap();
        assert_eq!(backend.held_keys(), vec![KeyCode::Char('a')]);
    }

    #[tokio::test]
    async fn test_input_fault() {
        let backend = MockBackend::new().with_fault(MockFault::Input, "no display");
        let err = backend.button(MouseButton::Left, Direction::Press).await.unwrap_err();
        assert!(matches!(err, AutomationError::InputRejected { .. }));
        assert!(err.to_string().contains("no display"));

        // Reads are not input primitives
        assert!(backend.position().await.is_ok());
    }

    #[tokio::test]
    async fn test_key_press_fault_is_specific() {
        let backend =
            MockBackend::new().with_fault(MockFault::KeyPress(KeyCode::Char('x')), "stuck");
        assert!(backend.key(KeyCode::Control, Direction::Press).await.is_ok());
        assert!(backend.key(KeyCode::Char('x'), Direction::Press).await.is_err());
        assert!(backend.key(KeyCode::Char('x'), Direction::Release).await.is_ok());
    }

    #[tokio::test]
    async fn test_capture_region_and_pixel() {
        let mut screen = ImageBuffer::solid(100, 100, Rgb::new(0, 0, 0));
        screen.paste(&ImageBuffer::solid(1, 1, Rgb::new(255, 0, 0)), Point::new(10, 10));
        let backend = MockBackend::new().with_screen(screen);

        assert_eq!(backend.pixel(Point::new(10, 10)).await.unwrap(), Rgb::new(255, 0, 0));
        assert!(backend.pixel(Point::new(100, 0)).await.is_err());

        let img = backend.capture(Some(Region::new(5, 5, 10, 20))).await.unwrap();
        assert_eq!(img.dimensions(), (10, 20));
        assert_eq!(backend.screen_size().await.unwrap(), ScreenSize::new(100, 100));
    }

    #[tokio::test]
    async fn test_active_window_title() {
        let backend = MockBackend::new();
        assert_eq!(
            backend.active_window_title().await.unwrap().as_deref(),
            Some("Mozilla Firefox")
        );

        let backend = MockBackend::new().with_windows(vec![]);
        assert_eq!(backend.active_window_title().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dialog_defaults() {
        let backend = MockBackend::new();
        let options = vec!["Yes".to_string(), "No".to_string()];

        let choice = backend.confirm("T", "M", &options).await.unwrap();
        assert_eq!(choice, DialogChoice::Button("Yes".to_string()));

        let text = backend.prompt("T", "M", "fallback").await.unwrap();
        assert_eq!(text.as_deref(), Some("fallback"));

        assert_eq!(backend.password("T", "M", "*").await.unwrap(), None);
        assert_eq!(backend.dialogs().len(), 3);
    }

    #[tokio::test]
    async fn test_scripted_dialogs() {
        let backend = MockBackend::new()
            .with_confirm_choice(DialogChoice::Dismissed)
            .with_prompt_reply(None)
            .with_password_reply("hunter2");

        let options = vec!["OK".to_string()];
        assert_eq!(backend.confirm("T", "M", &options).await.unwrap(), DialogChoice::Dismissed);
        assert_eq!(backend.prompt("T", "M", "d").await.unwrap(), None);
        assert_eq!(backend.password("T", "M", "*").await.unwrap().as_deref(), Some("hunter2"));
    }

    #[tokio::test]
    async fn test_with_delay() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(20));
        let start = std::time::Instant::now();
        backend.position().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
