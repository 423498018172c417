//! High-level automation operations
//!
//! [`Automator`] wraps an [`AutomationBackend`] and adds the behaviour shared
//! by every action:
//!
//! - **Failsafe:** when enabled, the cursor is read before each pressing or
//!   moving primitive (including every tween step); a cursor in a corner of
//!   the primary display aborts the call with
//!   [`AutomationError::FailSafeTriggered`]. Releases that finish a press made
//!   by the same call are never blocked, so no button or key is left down.
//! - **Pause:** after each completed mouse or keyboard action the configured
//!   pause is slept once.
//! - **Tweening:** timed moves follow the path planned by [`tween::Tween`].
//! - **Omitted coordinates:** a missing x or y is taken from the current
//!   cursor position.

pub mod failsafe;
pub mod tween;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::{
    backend::AutomationBackend,
    capture::{ImageBuffer, locate},
    color::Rgb,
    config::AutomationConfig,
    error::{AutomationError, AutomationResult},
    keys::KeyCode,
    model::{
        Capabilities, DialogChoice, Direction, MouseButton, Point, Region, ScreenSize, WindowInfo,
    },
    util::screenshot_files::ScreenshotStore,
};
use self::{failsafe::check_corners, tween::Tween};

/// Interval between cursor samples in [`Automator::display_mouse_position`]
pub const POSITION_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Most buttons a confirm dialog can show
pub const MAX_DIALOG_OPTIONS: usize = 3;

/// Applies failsafe, tweening and pauses on top of a backend
#[derive(Debug)]
pub struct Automator {
    backend:      AutomationBackend,
    config:       Arc<AutomationConfig>,
    capabilities: Capabilities,
    store:        ScreenshotStore,
}

impl Automator {
    pub fn new(
        backend: AutomationBackend,
        config: Arc<AutomationConfig>,
        capabilities: Capabilities,
    ) -> Self {
        let store = ScreenshotStore::new(config.screenshot_dir.clone());
        Self {
            backend,
            config,
            capabilities,
            store,
        }
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name
    }

    pub fn failsafe_enabled(&self) -> bool {
        self.config.failsafe
    }

    async fn guard(&self) -> AutomationResult<()> {
        if !self.config.failsafe {
            return Ok(());
        }
        let position = self.backend.pointer.position().await?;
        let screen = self.backend.screen.screen_size().await?;
        check_corners(position, screen)
    }

    async fn pause(&self) {
        if !self.config.pause.is_zero() {
            sleep(self.config.pause).await;
        }
    }

    async fn resolve(&self, x: Option<i32>, y: Option<i32>) -> AutomationResult<Point> {
        match (x, y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            (x, y) => {
                let current = self.backend.pointer.position().await?;
                Ok(Point::new(x.unwrap_or(current.x), y.unwrap_or(current.y)))
            }
        }
    }

    /// Walks the cursor to `target`, checking the failsafe before each step
    async fn travel(&self, target: Point, duration: Duration) -> AutomationResult<()> {
        let start = self.backend.pointer.position().await?;
        let tween = Tween::plan(start, target, duration);
        debug!(
            "Moving {} -> {} in {} step(s)",
            start,
            target,
            tween.point_count()
        );

        let last = tween.point_count() - 1;
        for (n, point) in tween.points().enumerate() {
            self.guard().await?;
            self.backend.pointer.move_to(point).await?;
            if (n as u64) < last {
                sleep(tween.step).await;
            }
        }
        Ok(())
    }

    /// Current cursor position
    pub async fn position(&self) -> AutomationResult<Point> {
        self.backend.pointer.position().await
    }

    /// Moves to `(x, y)`, filling a missing axis from the cursor
    pub async fn move_to(
        &self,
        x: Option<i32>,
        y: Option<i32>,
        duration: Duration,
    ) -> AutomationResult<Point> {
        let target = self.resolve(x, y).await?;
        self.travel(target, duration).await?;
        self.pause().await;
        Ok(target)
    }

    /// Moves by an offset from the current position
    pub async fn move_relative(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
    ) -> AutomationResult<Point> {
        let target = self.position().await?.offset(dx, dy);
        self.travel(target, duration).await?;
        self.pause().await;
        Ok(target)
    }

    /// Clicks `clicks` times at the target, or at the cursor when no
    /// coordinate is given
    pub async fn click(
        &self,
        x: Option<i32>,
        y: Option<i32>,
        clicks: u32,
        interval: Duration,
        button: MouseButton,
    ) -> AutomationResult<Point> {
        let target = self.resolve(x, y).await?;
        if x.is_some() || y.is_some() {
            self.travel(target, Duration::ZERO).await?;
        }

        for n in 0..clicks {
            if n > 0 && !interval.is_zero() {
                sleep(interval).await;
            }
            self.guard().await?;
            self.backend.pointer.button(button, Direction::Press).await?;
            self.backend.pointer.button(button, Direction::Release).await?;
        }

        self.pause().await;
        Ok(target)
    }

    /// Holds `button` from the current position to `target`
    ///
    /// The button is released even when the move fails.
    async fn drag(
        &self,
        target: Point,
        duration: Duration,
        button: MouseButton,
    ) -> AutomationResult<Point> {
        self.guard().await?;
        self.backend.pointer.button(button, Direction::Press).await?;

        let moved = self.travel(target, duration).await;
        let released = self.backend.pointer.button(button, Direction::Release).await;
        moved?;
        released?;

        self.pause().await;
        Ok(target)
    }

    pub async fn drag_to(
        &self,
        x: i32,
        y: i32,
        duration: Duration,
        button: MouseButton,
    ) -> AutomationResult<Point> {
        self.drag(Point::new(x, y), duration, button).await
    }

    pub async fn drag_relative(
        &self,
        dx: i32,
        dy: i32,
        duration: Duration,
        button: MouseButton,
    ) -> AutomationResult<Point> {
        let target = self.position().await?.offset(dx, dy);
        self.drag(target, duration, button).await
    }

    /// Scrolls the wheel `clicks` notches (positive is up), moving first when
    /// a coordinate is given
    pub async fn scroll(
        &self,
        clicks: i32,
        x: Option<i32>,
        y: Option<i32>,
    ) -> AutomationResult<Point> {
        let target = self.resolve(x, y).await?;
        if x.is_some() || y.is_some() {
            self.travel(target, Duration::ZERO).await?;
        }

        self.guard().await?;
        self.backend.pointer.scroll(clicks).await?;
        self.pause().await;
        Ok(target)
    }

    async fn tap(&self, key: KeyCode) -> AutomationResult<()> {
        self.guard().await?;
        self.backend.keyboard.key(key, Direction::Press).await?;
        self.backend.keyboard.key(key, Direction::Release).await
    }

    /// Types `text`; with a zero interval as one burst, otherwise one
    /// character at a time
    pub async fn type_text(&self, text: &str, interval: Duration) -> AutomationResult<()> {
        if interval.is_zero() {
            self.guard().await?;
            self.backend.keyboard.text(text).await?;
        } else {
            for (n, c) in text.chars().enumerate() {
                if n > 0 {
                    sleep(interval).await;
                }
                match c {
                    '\n' => self.tap(KeyCode::Enter).await?,
                    '\t' => self.tap(KeyCode::Tab).await?,
                    c => {
                        self.guard().await?;
                        let mut buf = [0u8; 4];
                        self.backend.keyboard.text(c.encode_utf8(&mut buf)).await?;
                    }
                }
            }
        }

        self.pause().await;
        Ok(())
    }

    /// Presses and releases one key
    pub async fn press_key(&self, key: KeyCode) -> AutomationResult<()> {
        self.tap(key).await?;
        self.pause().await;
        Ok(())
    }

    pub async fn key_down(&self, key: KeyCode) -> AutomationResult<()> {
        self.guard().await?;
        self.backend.keyboard.key(key, Direction::Press).await?;
        self.pause().await;
        Ok(())
    }

    pub async fn key_up(&self, key: KeyCode) -> AutomationResult<()> {
        self.guard().await?;
        self.backend.keyboard.key(key, Direction::Release).await?;
        self.pause().await;
        Ok(())
    }

    /// Presses `keys` in order and releases them in reverse
    ///
    /// Keys already pressed are released even when a later press fails.
    pub async fn hotkey(&self, keys: &[KeyCode]) -> AutomationResult<()> {
        if keys.is_empty() {
            return Err(AutomationError::invalid_parameter(
                "keys",
                "at least one key is required",
            ));
        }

        let mut pressed = Vec::with_capacity(keys.len());
        let mut outcome = Ok(());
        for key in keys {
            let step = async {
                self.guard().await?;
                self.backend.keyboard.key(*key, Direction::Press).await
            };
            if let Err(e) = step.await {
                outcome = Err(e);
                break;
            }
            pressed.push(*key);
        }

        for key in pressed.iter().rev() {
            let released = self.backend.keyboard.key(*key, Direction::Release).await;
            if outcome.is_ok() {
                outcome = released;
            }
        }

        outcome?;
        self.pause().await;
        Ok(())
    }

    pub async fn screen_size(&self) -> AutomationResult<ScreenSize> {
        self.backend.screen.screen_size().await
    }

    /// Captures the primary screen, optionally cropped
    pub async fn screenshot(&self, region: Option<Region>) -> AutomationResult<ImageBuffer> {
        self.backend.screen.capture(region).await
    }

    /// Captures and saves under the screenshot directory, returning the path
    pub async fn save_screenshot(
        &self,
        region: Option<Region>,
        filename: &str,
    ) -> AutomationResult<PathBuf> {
        // Reject unusable names before touching the screen
        self.store.resolve(filename)?;

        let image = self.screenshot(region).await?;
        let store = self.store.clone();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || store.save(&image, &filename)).await?
    }

    /// Searches the screen (or `region`) for the image at `path`
    ///
    /// `confidence` is only honoured when confidence matching is compiled in;
    /// otherwise the search is exact. Returns `None` when the image is absent.
    pub async fn locate(
        &self,
        path: &Path,
        region: Option<Region>,
        confidence: f64,
    ) -> AutomationResult<Option<Region>> {
        let confidence = locate::check_confidence(confidence)?;
        let threshold = self.capabilities.confidence_matching.then_some(confidence);

        let path = path.to_path_buf();
        let needle = tokio::task::spawn_blocking(move || locate::load_needle(&path)).await??;
        let haystack = self.screenshot(region).await?;
        let origin = region.map_or(Point::new(0, 0), |r| Point::new(r.left, r.top));

        let found = tokio::task::spawn_blocking(move || {
            locate::locate(&haystack, &needle, origin, threshold)
        })
        .await?;
        Ok(found)
    }

    pub async fn pixel(&self, at: Point) -> AutomationResult<Rgb> {
        self.backend.screen.pixel(at).await
    }

    /// Reads a pixel and compares it with `expected`
    pub async fn pixel_matches(
        &self,
        at: Point,
        expected: Rgb,
        tolerance: u8,
    ) -> AutomationResult<(Rgb, bool)> {
        let actual = self.pixel(at).await?;
        Ok((actual, actual.matches(expected, tolerance)))
    }

    pub async fn active_window_title(&self) -> AutomationResult<Option<String>> {
        self.backend.windows.active_window_title().await
    }

    pub async fn window_titles(&self) -> AutomationResult<Vec<String>> {
        let windows = self.backend.windows.list_windows().await?;
        Ok(windows.into_iter().map(|w| w.title).collect())
    }

    /// Windows whose title contains `fragment` (case-sensitive)
    ///
    /// An empty fragment matches nothing.
    pub async fn windows_with_title(&self, fragment: &str) -> AutomationResult<Vec<WindowInfo>> {
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        let windows = self.backend.windows.list_windows().await?;
        Ok(windows
            .into_iter()
            .filter(|w| w.title.contains(fragment))
            .collect())
    }

    pub async fn alert(&self, title: &str, message: &str) -> AutomationResult<()> {
        self.backend.dialogs.alert(title, message).await
    }

    /// Shows a message box with 1 to 3 buttons
    pub async fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[String],
    ) -> AutomationResult<DialogChoice> {
        if options.is_empty() || options.len() > MAX_DIALOG_OPTIONS {
            return Err(AutomationError::invalid_parameter(
                "options",
                format!(
                    "expected between 1 and {} button labels, got {}",
                    MAX_DIALOG_OPTIONS,
                    options.len()
                ),
            ));
        }
        self.backend.dialogs.confirm(title, message, options).await
    }

    pub async fn prompt(
        &self,
        title: &str,
        message: &str,
        default: &str,
    ) -> AutomationResult<Option<String>> {
        self.backend.dialogs.prompt(title, message, default).await
    }

    /// Asks for a secret; the caller decides what of it may be shown
    pub async fn password(
        &self,
        title: &str,
        message: &str,
        mask: &str,
    ) -> AutomationResult<Option<String>> {
        self.backend.dialogs.password(title, message, mask).await
    }

    /// Logs a countdown from `seconds`, one line per second
    pub async fn countdown(&self, seconds: u32) {
        for remaining in (1..=seconds).rev() {
            info!("Countdown: {}", remaining);
            sleep(Duration::from_secs(1)).await;
        }
        info!("Countdown finished");
    }

    /// Logs the cursor position whenever it changes during `duration`
    ///
    /// Returns the last sampled position.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidParameter`] for `seconds` when the
    /// deadline cannot be represented.
    pub async fn display_mouse_position(&self, duration: Duration) -> AutomationResult<Point> {
        let deadline = Instant::now().checked_add(duration).ok_or_else(|| {
            AutomationError::invalid_parameter("seconds", "duration is too long to schedule")
        })?;
        let mut last = self.position().await?;
        info!("Mouse position: {}", last);

        while Instant::now() < deadline {
            sleep(POSITION_SAMPLE_INTERVAL.min(deadline - Instant::now())).await;
            let current = self.position().await?;
            if current != last {
                info!("Mouse position: {}", current);
                last = current;
            }
        }
        Ok(last)
    }
}
