//! MCP service implementation with tool routing
//!
//! Every tool takes the automation lock for its whole duration, runs its body
//! against the [`Automator`] and turns the outcome into a [`ToolOutcome`]
//! envelope. Tool-level failures never surface as JSON-RPC errors.

use std::{path::Path, sync::Arc, time::Duration};

use autogui_core::{
    automation::Automator,
    backend::{AutomationBackend, MockBackend},
    color::parse_color,
    config::{AutomationConfig, seconds},
    error::AutomationError,
    keys::{KeyCode, parse_keys},
    model::{Capabilities, DialogChoice, MouseButton, Point},
    util::encode::encode_png_base64,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, ErrorData as McpError, Implementation, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{
    envelope::{ToolOutcome, ToolResult},
    params::{
        AlertParams, ClickParams, ConfirmParams, CountdownParams, DisplayPositionParams,
        DoubleClickParams, DragRelativeParams, DragToParams, HotkeyParams, KeyParams,
        LocateParams, MoveMouseParams, MoveRelativeParams, OptionalPointParams, PasswordParams,
        PixelMatchParams, PointParams, PromptParams, ScreenshotParams, ScrollParams,
        TypeTextParams, WindowTitleParams, parse_button, parse_region, repeat_count,
    },
};

/// Characters of typed text repeated in the type_text message
const TYPED_PREVIEW_CHARS: usize = 50;

const INSTRUCTIONS: &str = "Desktop automation: move and click the mouse, type and press keys, \
                            capture the screen, find images and pixel colours, query windows and \
                            show modal dialogs. Coordinates are screen pixels from the top-left \
                            of the primary display. Moving the cursor into a screen corner aborts \
                            actions while the failsafe is enabled. Every result is a JSON object \
                            with either a `message` or an `error` field.";

fn respond(tool: &str, result: ToolResult) -> Result<CallToolResult, McpError> {
    Ok(ToolOutcome::from_result(tool, result).into_call_result())
}

/// Automation MCP server
///
/// Exposes the mouse, keyboard, screen, window, dialog and utility tools.
/// Calls are serialized: each one holds the automation lock until it
/// returns, including blocking dialogs and countdowns.
#[derive(Clone)]
pub struct AutoguiMcpServer {
    tool_router: ToolRouter<Self>,
    automator:   Arc<Mutex<Automator>>,
}

#[tool_router]
impl AutoguiMcpServer {
    /// Creates a server driving `automator`
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use autogui_core::{
    ///     automation::Automator,
    ///     backend::{AutomationBackend, MockBackend},
    ///     config::AutomationConfig,
    ///     model::Capabilities,
    /// };
    /// use autogui_mcp_server::mcp::AutoguiMcpServer;
    ///
    /// let backend = AutomationBackend::from_mock(Arc::new(MockBackend::new()));
    /// let automator = Automator::new(
    ///     backend,
    ///     Arc::new(AutomationConfig::immediate()),
    ///     Capabilities::detect(),
    /// );
    /// let server = AutoguiMcpServer::new(automator);
    /// ```
    pub fn new(automator: Automator) -> Self {
        Self {
            tool_router: Self::tool_router(),
            automator:   Arc::new(Mutex::new(automator)),
        }
    }

    /// Creates a server over `mock` with the given settings
    pub fn with_mock(mock: Arc<MockBackend>, config: AutomationConfig) -> Self {
        let automator = Automator::new(
            AutomationBackend::from_mock(mock),
            Arc::new(config),
            Capabilities::detect(),
        );
        Self::new(automator)
    }

    /// Creates a server over a fresh [`MockBackend`] without pauses
    pub fn new_with_mock() -> Self {
        Self::with_mock(Arc::new(MockBackend::new()), AutomationConfig::immediate())
    }

    async fn lock(&self) -> MutexGuard<'_, Automator> {
        self.automator.lock().await
    }

    // ========== Mouse ==========

    #[tool(description = "Move the mouse to absolute screen coordinates, optionally over `duration` seconds")]
    pub async fn move_mouse(
        &self,
        Parameters(params): Parameters<MoveMouseParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("move_mouse {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let duration = seconds("duration", params.duration)?;
            let at = auto.move_to(Some(params.x), Some(params.y), duration).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Mouse moved to {}", at),
                json!({"x": at.x, "y": at.y, "duration": params.duration}),
            ))
        }
        .await;
        respond("move_mouse", result)
    }

    #[tool(description = "Move the mouse by an offset from its current position")]
    pub async fn move_mouse_relative(
        &self,
        Parameters(params): Parameters<MoveRelativeParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("move_mouse_relative {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let duration = seconds("duration", params.duration)?;
            let at = auto.move_relative(params.dx, params.dy, duration).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Mouse moved relative by ({}, {}) to {}", params.dx, params.dy, at),
                json!({
                    "dx": params.dx,
                    "dy": params.dy,
                    "x": at.x,
                    "y": at.y,
                    "duration": params.duration,
                }),
            ))
        }
        .await;
        respond("move_mouse_relative", result)
    }

    #[tool(description = "Click a mouse button, at (x, y) or at the cursor when omitted")]
    pub async fn click(
        &self,
        Parameters(params): Parameters<ClickParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("click {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let button = parse_button(&params.button)?;
            let interval = seconds("interval", params.interval)?;
            let clicks = repeat_count(params.clicks);
            let at = auto
                .click(params.x, params.y, clicks, interval, button)
                .await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Clicked {} button {} time(s) at {}", button, clicks, at),
                json!({
                    "x": at.x,
                    "y": at.y,
                    "clicks": clicks,
                    "interval": params.interval,
                    "button": button.as_str(),
                }),
            ))
        }
        .await;
        respond("click", result)
    }

    #[tool(description = "Double-click a mouse button, at (x, y) or at the cursor when omitted")]
    pub async fn double_click(
        &self,
        Parameters(params): Parameters<DoubleClickParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("double_click {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let button = parse_button(&params.button)?;
            let at = auto
                .click(params.x, params.y, 2, Duration::ZERO, button)
                .await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Double-clicked {} button at {}", button, at),
                json!({"x": at.x, "y": at.y, "button": button.as_str()}),
            ))
        }
        .await;
        respond("double_click", result)
    }

    #[tool(description = "Right-click at (x, y) or at the cursor when omitted")]
    pub async fn right_click(
        &self,
        Parameters(params): Parameters<OptionalPointParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("right_click {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let at = auto
                .click(params.x, params.y, 1, Duration::ZERO, MouseButton::Right)
                .await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Right-clicked at {}", at),
                json!({"x": at.x, "y": at.y}),
            ))
        }
        .await;
        respond("right_click", result)
    }

    #[tool(description = "Drag with a mouse button held from the cursor to (x, y)")]
    pub async fn drag_to(
        &self,
        Parameters(params): Parameters<DragToParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("drag_to {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let button = parse_button(&params.button)?;
            let duration = seconds("duration", params.duration)?;
            let at = auto.drag_to(params.x, params.y, duration, button).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Dragged to {}", at),
                json!({
                    "x": at.x,
                    "y": at.y,
                    "duration": params.duration,
                    "button": button.as_str(),
                }),
            ))
        }
        .await;
        respond("drag_to", result)
    }

    #[tool(description = "Drag with a mouse button held by an offset from the cursor")]
    pub async fn drag_relative(
        &self,
        Parameters(params): Parameters<DragRelativeParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("drag_relative {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let button = parse_button(&params.button)?;
            let duration = seconds("duration", params.duration)?;
            let at = auto
                .drag_relative(params.dx, params.dy, duration, button)
                .await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Dragged relative by ({}, {}) to {}", params.dx, params.dy, at),
                json!({
                    "dx": params.dx,
                    "dy": params.dy,
                    "x": at.x,
                    "y": at.y,
                    "duration": params.duration,
                    "button": button.as_str(),
                }),
            ))
        }
        .await;
        respond("drag_relative", result)
    }

    #[tool(description = "Scroll the mouse wheel; positive clicks scroll up, negative scroll down")]
    pub async fn scroll(
        &self,
        Parameters(params): Parameters<ScrollParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("scroll {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let at = auto.scroll(params.clicks, params.x, params.y).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Scrolled {} clicks at {}", params.clicks, at),
                json!({"clicks": params.clicks, "x": at.x, "y": at.y}),
            ))
        }
        .await;
        respond("scroll", result)
    }

    #[tool(description = "Get the current mouse position")]
    pub async fn get_mouse_position(&self) -> Result<CallToolResult, McpError> {
        let auto = self.lock().await;
        let result = async {
            let at = auto.position().await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Mouse position: {}", at),
                json!({"x": at.x, "y": at.y}),
            ))
        }
        .await;
        respond("get_mouse_position", result)
    }

    // ========== Keyboard ==========

    #[tool(description = "Type text, optionally waiting `interval` seconds between characters")]
    pub async fn type_text(
        &self,
        Parameters(params): Parameters<TypeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "type_text: {} character(s), interval {}",
            params.text.chars().count(),
            params.interval
        );
        let auto = self.lock().await;
        let result = async {
            let interval = seconds("interval", params.interval)?;
            auto.type_text(&params.text, interval).await?;

            let preview: String = params.text.chars().take(TYPED_PREVIEW_CHARS).collect();
            let message = if preview.len() < params.text.len() {
                format!("Typed text: {}...", preview)
            } else {
                format!("Typed text: {}", preview)
            };
            ToolResult::Ok(ToolOutcome::success(
                message,
                json!({"text": params.text, "interval": params.interval}),
            ))
        }
        .await;
        respond("type_text", result)
    }

    #[tool(description = "Press and release a key by name (e.g. enter, esc, f5, a)")]
    pub async fn press_key(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("press_key {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let key: KeyCode = params.key.parse()?;
            auto.press_key(key).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Pressed key: {}", params.key),
                json!({"key": params.key}),
            ))
        }
        .await;
        respond("press_key", result)
    }

    #[tool(description = "Hold a key down until key_up is called")]
    pub async fn key_down(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("key_down {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let key: KeyCode = params.key.parse()?;
            auto.key_down(key).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Key held down: {}", params.key),
                json!({"key": params.key}),
            ))
        }
        .await;
        respond("key_down", result)
    }

    #[tool(description = "Release a key held by key_down")]
    pub async fn key_up(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("key_up {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let key: KeyCode = params.key.parse()?;
            auto.key_up(key).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Key released: {}", params.key),
                json!({"key": params.key}),
            ))
        }
        .await;
        respond("key_up", result)
    }

    #[tool(description = "Press a key combination such as [\"ctrl\", \"c\"]; keys are released in reverse order")]
    pub async fn hotkey(
        &self,
        Parameters(params): Parameters<HotkeyParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("hotkey {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let keys = parse_keys(&params.keys)?;
            auto.hotkey(&keys).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Pressed hotkey: {}", params.keys.join("+")),
                json!({"keys": params.keys}),
            ))
        }
        .await;
        respond("hotkey", result)
    }

    // ========== Screen ==========

    #[tool(description = "Capture the screen or a [left, top, width, height] region. Without a filename the PNG is returned as base64; with one it is saved under the screenshot directory")]
    pub async fn screenshot(
        &self,
        Parameters(params): Parameters<ScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("screenshot filename={:?} region={:?}", params.filename, params.region);
        let auto = self.lock().await;
        let result = async {
            let region = parse_region(params.region.as_deref())?;
            let echoed = region.map(|r| r.to_list());

            match params.filename.as_deref() {
                Some(filename) => {
                    let path = auto.save_screenshot(region, filename).await?;
                    let path = path.display().to_string();
                    ToolResult::Ok(ToolOutcome::success(
                        format!("Screenshot saved to {}", path),
                        json!({"filename": path, "region": echoed}),
                    ))
                }
                None => {
                    let image = auto.screenshot(region).await?;
                    let (width, height) = image.dimensions();
                    let encoded =
                        tokio::task::spawn_blocking(move || encode_png_base64(&image)).await??;
                    ToolResult::Ok(ToolOutcome::success(
                        format!("Screenshot taken ({}x{})", width, height),
                        json!({
                            "image_base64": encoded,
                            "width": width,
                            "height": height,
                            "region": echoed,
                        }),
                    ))
                }
            }
        }
        .await;
        respond("screenshot", result)
    }

    #[tool(description = "Find an image on screen and return its bounding box, or found=false when absent")]
    pub async fn locate_on_screen(
        &self,
        Parameters(params): Parameters<LocateParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("locate_on_screen {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let region = parse_region(params.region.as_deref())?;
            let found = auto
                .locate(Path::new(&params.image_path), region, params.confidence)
                .await?;
            ToolResult::Ok(match found {
                Some(b) => ToolOutcome::success(
                    format!("Image found at ({}, {})", b.left, b.top),
                    json!({
                        "found": true,
                        "left": b.left,
                        "top": b.top,
                        "width": b.width,
                        "height": b.height,
                        "image_path": params.image_path,
                        "confidence": params.confidence,
                    }),
                ),
                None => ToolOutcome::success(
                    "Image not found on screen",
                    json!({"found": false, "image_path": params.image_path}),
                ),
            })
        }
        .await;
        respond("locate_on_screen", result)
    }

    #[tool(description = "Find an image on screen and return its centre point, or found=false when absent")]
    pub async fn locate_center_on_screen(
        &self,
        Parameters(params): Parameters<LocateParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("locate_center_on_screen {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let region = parse_region(params.region.as_deref())?;
            let found = auto
                .locate(Path::new(&params.image_path), region, params.confidence)
                .await?;
            ToolResult::Ok(match found.map(|b| b.center()) {
                Some(center) => ToolOutcome::success(
                    format!("Image centre at {}", center),
                    json!({
                        "found": true,
                        "x": center.x,
                        "y": center.y,
                        "image_path": params.image_path,
                        "confidence": params.confidence,
                    }),
                ),
                None => ToolOutcome::success(
                    "Image not found on screen",
                    json!({"found": false, "image_path": params.image_path}),
                ),
            })
        }
        .await;
        respond("locate_center_on_screen", result)
    }

    #[tool(description = "Get the RGB colour of the pixel at (x, y)")]
    pub async fn get_pixel_color(
        &self,
        Parameters(params): Parameters<PointParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("get_pixel_color {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let at = Point::new(params.x, params.y);
            let rgb = auto.pixel(at).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Pixel at {} is {}", at, rgb.to_hex()),
                json!({
                    "x": params.x,
                    "y": params.y,
                    "r": rgb.r,
                    "g": rgb.g,
                    "b": rgb.b,
                    "hex": rgb.to_hex(),
                }),
            ))
        }
        .await;
        respond("get_pixel_color", result)
    }

    #[tool(description = "Check whether the pixel at (x, y) matches a colour (\"#RRGGBB\" or \"(r, g, b)\") within a per-channel tolerance")]
    pub async fn pixel_matches_color(
        &self,
        Parameters(params): Parameters<PixelMatchParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("pixel_matches_color {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let tolerance = u8::try_from(params.tolerance).map_err(|_| {
                AutomationError::invalid_parameter(
                    "tolerance",
                    format!("must be between 0 and 255, got {}", params.tolerance),
                )
            })?;
            let expected = parse_color(&params.color)?;
            let at = Point::new(params.x, params.y);
            let (actual, matches) = auto.pixel_matches(at, expected, tolerance).await?;
            let verdict = if matches { "matches" } else { "does not match" };
            ToolResult::Ok(ToolOutcome::success(
                format!("Pixel at {} is {} and {} {}", at, actual.to_hex(), verdict, params.color),
                json!({
                    "x": params.x,
                    "y": params.y,
                    "color": params.color,
                    "tolerance": tolerance,
                    "matches": matches,
                    "actual": actual.to_hex(),
                }),
            ))
        }
        .await;
        respond("pixel_matches_color", result)
    }

    #[tool(description = "Get the primary screen width and height in pixels")]
    pub async fn get_screen_size(&self) -> Result<CallToolResult, McpError> {
        let auto = self.lock().await;
        let result = async {
            let size = auto.screen_size().await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Screen size: {}x{}", size.width, size.height),
                json!({"width": size.width, "height": size.height}),
            ))
        }
        .await;
        respond("get_screen_size", result)
    }

    // ========== Windows ==========

    #[tool(description = "Get the title of the focused window")]
    pub async fn get_active_window_title(&self) -> Result<CallToolResult, McpError> {
        let auto = self.lock().await;
        let result = async {
            let title = auto.active_window_title().await?;
            let message = match &title {
                Some(t) => format!("Active window: {}", t),
                None => "No active window".to_string(),
            };
            ToolResult::Ok(ToolOutcome::success(message, json!({"title": title})))
        }
        .await;
        respond("get_active_window_title", result)
    }

    #[tool(description = "List the titles of all visible windows")]
    pub async fn get_all_window_titles(&self) -> Result<CallToolResult, McpError> {
        let auto = self.lock().await;
        let result = async {
            let titles = auto.window_titles().await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Found {} window(s)", titles.len()),
                json!({"count": titles.len(), "titles": titles}),
            ))
        }
        .await;
        respond("get_all_window_titles", result)
    }

    #[tool(description = "Find windows whose title contains the given text (case-sensitive)")]
    pub async fn get_windows_with_title(
        &self,
        Parameters(params): Parameters<WindowTitleParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("get_windows_with_title {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let windows = auto.windows_with_title(&params.title_fragment).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!(
                    "Found {} window(s) matching '{}'",
                    windows.len(),
                    params.title_fragment
                ),
                json!({
                    "title_fragment": params.title_fragment,
                    "count": windows.len(),
                    "windows": windows,
                }),
            ))
        }
        .await;
        respond("get_windows_with_title", result)
    }

    // ========== Dialogs ==========

    #[tool(description = "Show a modal alert and wait for the user to dismiss it")]
    pub async fn alert(
        &self,
        Parameters(params): Parameters<AlertParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("alert title={:?}", params.title);
        let auto = self.lock().await;
        let result = async {
            auto.alert(&params.title, &params.message).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Alert shown: {}", params.message),
                json!({"title": params.title, "text": params.message, "result": "OK"}),
            ))
        }
        .await;
        respond("alert", result)
    }

    #[tool(description = "Show a modal dialog with 1 to 3 buttons (default OK/Cancel) and return the clicked label, or null if dismissed")]
    pub async fn confirm(
        &self,
        Parameters(params): Parameters<ConfirmParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("confirm title={:?} options={:?}", params.title, params.options);
        let auto = self.lock().await;
        let result = async {
            let options = params
                .options
                .clone()
                .unwrap_or_else(|| vec!["OK".to_string(), "Cancel".to_string()]);
            let choice = auto.confirm(&params.title, &params.message, &options).await?;
            let (selected, message) = match choice {
                DialogChoice::Button(label) => {
                    let message = format!("User selected: {}", label);
                    (Some(label), message)
                }
                DialogChoice::Dismissed => (None, "Dialog dismissed".to_string()),
            };
            ToolResult::Ok(ToolOutcome::success(
                message,
                json!({
                    "title": params.title,
                    "text": params.message,
                    "options": options,
                    "result": selected,
                }),
            ))
        }
        .await;
        respond("confirm", result)
    }

    #[tool(description = "Show a modal text input and return the entered text, or null if cancelled")]
    pub async fn prompt(
        &self,
        Parameters(params): Parameters<PromptParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("prompt title={:?}", params.title);
        let auto = self.lock().await;
        let result = async {
            let reply = auto
                .prompt(&params.title, &params.message, &params.default)
                .await?;
            let message = if reply.is_some() {
                "User entered text"
            } else {
                "Prompt cancelled"
            };
            ToolResult::Ok(ToolOutcome::success(
                message,
                json!({
                    "title": params.title,
                    "text": params.message,
                    "default": params.default,
                    "result": reply,
                }),
            ))
        }
        .await;
        respond("prompt", result)
    }

    #[tool(description = "Show a modal password input. The secret is never returned: result is \"[REDACTED]\" when something was entered, otherwise null")]
    pub async fn password(
        &self,
        Parameters(params): Parameters<PasswordParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("password title={:?}", params.title);
        let auto = self.lock().await;
        let result = async {
            let entered = auto
                .password(&params.title, &params.message, &params.mask)
                .await?
                .is_some_and(|secret| !secret.is_empty());
            let (redacted, message) = if entered {
                (Some("[REDACTED]"), "Password entered")
            } else {
                (None, "No password entered")
            };
            ToolResult::Ok(ToolOutcome::success(
                message,
                json!({
                    "title": params.title,
                    "text": params.message,
                    "mask": params.mask,
                    "result": redacted,
                }),
            ))
        }
        .await;
        respond("password", result)
    }

    // ========== Utilities ==========

    #[tool(description = "Count down the given number of seconds, logging each second, then return")]
    pub async fn countdown(
        &self,
        Parameters(params): Parameters<CountdownParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("countdown {:?}", params);
        let auto = self.lock().await;
        let seconds = repeat_count(params.seconds);
        auto.countdown(seconds).await;
        respond(
            "countdown",
            Ok(ToolOutcome::success(
                format!("Countdown completed for {} seconds", seconds),
                json!({"seconds": seconds}),
            )),
        )
    }

    #[tool(description = "Log the mouse position whenever it changes for the given seconds and return the last position")]
    pub async fn display_mouse_position(
        &self,
        Parameters(params): Parameters<DisplayPositionParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("display_mouse_position {:?}", params);
        let auto = self.lock().await;
        let result = async {
            let duration = seconds("seconds", params.seconds)?;
            let last = auto.display_mouse_position(duration).await?;
            ToolResult::Ok(ToolOutcome::success(
                format!("Mouse position displayed for {} seconds", params.seconds),
                json!({"seconds": params.seconds, "x": last.x, "y": last.y}),
            ))
        }
        .await;
        respond("display_mouse_position", result)
    }

    #[tool(description = "Report whether the corner failsafe is enabled")]
    pub async fn fail_safe_check(&self) -> Result<CallToolResult, McpError> {
        let auto = self.lock().await;
        let config = auto.config();
        let message = if config.failsafe {
            "Failsafe enabled"
        } else {
            "Failsafe disabled"
        };
        respond(
            "fail_safe_check",
            Ok(ToolOutcome::success(
                message,
                json!({
                    "enabled": config.failsafe,
                    "pause": config.pause.as_secs_f64(),
                }),
            )),
        )
    }
}

impl Default for AutoguiMcpServer {
    fn default() -> Self {
        Self::new_with_mock()
    }
}

#[tool_handler]
impl ServerHandler for AutoguiMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}
