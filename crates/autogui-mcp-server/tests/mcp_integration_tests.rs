//! Tool behaviour through the MCP server against MockBackend

mod common;

use std::fs;

use autogui_core::{
    backend::{InputEvent, MockBackend, ShownDialog},
    capture::ImageBuffer,
    color::Rgb,
    keys::KeyCode,
    model::{DialogChoice, Direction, MouseButton, Point},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use common::mcp_harness::{McpHarness, args, success};
use image::{Rgba, RgbaImage};
use serde_json::json;

const GRAY: Rgb = Rgb::new(128, 128, 128);

fn checkerboard(size: u32, a: [u8; 3], b: [u8; 3]) -> ImageBuffer {
    ImageBuffer::from_rgba(RgbaImage::from_fn(size, size, |x, y| {
        let [r, g, bl] = if (x + y) % 2 == 0 { a } else { b };
        Rgba([r, g, bl, 255])
    }))
}

// ========== Mouse ==========

#[tokio::test]
async fn test_move_mouse_moves_cursor() {
    let h = McpHarness::new();
    let value = success(h.server.move_mouse(args(json!({"x": 100, "y": 200}))).await);

    assert_eq!(value["x"], 100);
    assert_eq!(value["y"], 200);
    assert_eq!(value["message"], "Mouse moved to (100, 200)");
    assert_eq!(h.mock.cursor(), Point::new(100, 200));
}

#[tokio::test(start_paused = true)]
async fn test_move_mouse_with_duration_tweens() {
    let h = McpHarness::new();
    success(
        h.server
            .move_mouse(args(json!({"x": 1060, "y": 540, "duration": 0.5})))
            .await,
    );

    let moves = h
        .mock
        .events()
        .iter()
        .filter(|e| matches!(e, InputEvent::MoveTo(_)))
        .count();
    assert!(moves > 1, "timed move should take several steps");
    assert_eq!(h.mock.cursor(), Point::new(1060, 540));
}

#[tokio::test]
async fn test_move_mouse_relative_reports_new_position() {
    let h = McpHarness::with_mock(MockBackend::new().with_cursor(Point::new(100, 100)));
    let value = success(
        h.server
            .move_mouse_relative(args(json!({"dx": 25, "dy": -40})))
            .await,
    );

    assert_eq!(value["dx"], 25);
    assert_eq!(value["dy"], -40);
    assert_eq!(value["x"], 125);
    assert_eq!(value["y"], 60);
}

#[tokio::test]
async fn test_click_without_coordinates_clicks_in_place() {
    let h = McpHarness::new();
    let value = success(h.server.click(args(json!({}))).await);

    assert_eq!(value["x"], 960);
    assert_eq!(value["y"], 540);
    assert_eq!(value["clicks"], 1);
    assert_eq!(value["button"], "left");
    assert_eq!(
        h.mock.events(),
        vec![
            InputEvent::Button(MouseButton::Left, Direction::Press),
            InputEvent::Button(MouseButton::Left, Direction::Release),
        ]
    );
}

#[tokio::test]
async fn test_click_with_one_axis_keeps_the_other() {
    let h = McpHarness::new();
    let value = success(h.server.click(args(json!({"x": 300}))).await);

    assert_eq!(value["x"], 300);
    assert_eq!(value["y"], 540);
    assert_eq!(h.mock.events()[0], InputEvent::MoveTo(Point::new(300, 540)));
}

#[tokio::test]
async fn test_click_repeats_with_button() {
    let h = McpHarness::new();
    success(
        h.server
            .click(args(json!({"x": 10, "y": 10, "clicks": 3, "button": "middle"})))
            .await,
    );

    let presses = h
        .mock
        .events()
        .into_iter()
        .filter(|e| *e == InputEvent::Button(MouseButton::Middle, Direction::Press))
        .count();
    assert_eq!(presses, 3);
}

#[tokio::test]
async fn test_click_with_non_positive_count_does_nothing() {
    let h = McpHarness::new();
    for clicks in [0, -1] {
        let value = success(h.server.click(args(json!({"clicks": clicks}))).await);
        assert_eq!(value["clicks"], 0);
    }
    assert!(h.mock.events().is_empty());
}

#[tokio::test]
async fn test_double_and_right_click() {
    let h = McpHarness::new();
    let value = success(h.server.double_click(args(json!({"x": 50, "y": 60}))).await);
    assert_eq!(value["button"], "left");
    let buttons = h
        .mock
        .events()
        .into_iter()
        .filter(|e| matches!(e, InputEvent::Button(..)))
        .count();
    assert_eq!(buttons, 4);

    h.mock.clear_events();
    success(h.server.right_click(args(json!({}))).await);
    assert_eq!(
        h.mock.events(),
        vec![
            InputEvent::Button(MouseButton::Right, Direction::Press),
            InputEvent::Button(MouseButton::Right, Direction::Release),
        ]
    );
}

#[tokio::test]
async fn test_drag_holds_button_for_the_whole_move() {
    let h = McpHarness::with_mock(MockBackend::new().with_cursor(Point::new(100, 100)));
    let value = success(
        h.server
            .drag_relative(args(json!({"dx": 50, "dy": 0, "button": "right"})))
            .await,
    );
    assert_eq!(value["x"], 150);
    assert_eq!(value["y"], 100);

    let events = h.mock.events();
    assert_eq!(
        events.first(),
        Some(&InputEvent::Button(MouseButton::Right, Direction::Press))
    );
    assert_eq!(
        events.last(),
        Some(&InputEvent::Button(MouseButton::Right, Direction::Release))
    );
    assert_eq!(h.mock.cursor(), Point::new(150, 100));

    h.mock.clear_events();
    success(h.server.drag_to(args(json!({"x": 400, "y": 300}))).await);
    assert_eq!(h.mock.cursor(), Point::new(400, 300));
}

#[tokio::test]
async fn test_scroll_at_point() {
    let h = McpHarness::new();
    let value = success(
        h.server
            .scroll(args(json!({"clicks": -3, "x": 500, "y": 400})))
            .await,
    );

    assert_eq!(value["clicks"], -3);
    assert_eq!(
        h.mock.events(),
        vec![
            InputEvent::MoveTo(Point::new(500, 400)),
            InputEvent::Scroll(-3),
        ]
    );
}

#[tokio::test]
async fn test_failsafe_disabled_allows_corner() {
    let h = McpHarness::with_config(MockBackend::new().with_cursor(Point::new(0, 0)), |c| {
        c.with_failsafe(false)
    });
    success(h.server.move_mouse(args(json!({"x": 10, "y": 10}))).await);
    assert_eq!(h.mock.cursor(), Point::new(10, 10));
}

// ========== Keyboard ==========

#[tokio::test]
async fn test_type_text_bursts_and_previews() {
    let h = McpHarness::new();
    let text = "x".repeat(60);
    let value = success(h.server.type_text(args(json!({"text": text}))).await);

    assert_eq!(value["text"], text.as_str());
    assert_eq!(
        value["message"],
        format!("Typed text: {}...", "x".repeat(50)).as_str()
    );
    assert_eq!(h.mock.events(), vec![InputEvent::Text(text)]);

    let value = success(h.server.type_text(args(json!({"text": "short"}))).await);
    assert_eq!(value["message"], "Typed text: short");
}

#[tokio::test(start_paused = true)]
async fn test_type_text_with_interval_types_per_character() {
    let h = McpHarness::new();
    success(
        h.server
            .type_text(args(json!({"text": "a\nb", "interval": 0.05})))
            .await,
    );

    assert_eq!(
        h.mock.events(),
        vec![
            InputEvent::Text("a".to_string()),
            InputEvent::Key(KeyCode::Enter, Direction::Press),
            InputEvent::Key(KeyCode::Enter, Direction::Release),
            InputEvent::Text("b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_key_down_and_up() {
    let h = McpHarness::new();
    let value = success(h.server.key_down(args(json!({"key": "shift"}))).await);
    assert_eq!(value["message"], "Key held down: shift");
    assert_eq!(h.mock.held_keys(), vec![KeyCode::Shift]);

    success(h.server.key_up(args(json!({"key": "shift"}))).await);
    assert!(h.mock.held_keys().is_empty());

    let value = success(h.server.press_key(args(json!({"key": "enter"}))).await);
    assert_eq!(value["key"], "enter");
    assert!(h.mock.held_keys().is_empty());
}

#[tokio::test]
async fn test_hotkey_presses_in_order_releases_in_reverse() {
    let h = McpHarness::new();
    let value = success(h.server.hotkey(args(json!({"keys": ["ctrl", "shift", "t"]}))).await);

    assert_eq!(value["message"], "Pressed hotkey: ctrl+shift+t");
    assert_eq!(
        h.mock.events(),
        vec![
            InputEvent::Key(KeyCode::Control, Direction::Press),
            InputEvent::Key(KeyCode::Shift, Direction::Press),
            InputEvent::Key(KeyCode::Char('t'), Direction::Press),
            InputEvent::Key(KeyCode::Char('t'), Direction::Release),
            InputEvent::Key(KeyCode::Shift, Direction::Release),
            InputEvent::Key(KeyCode::Control, Direction::Release),
        ]
    );
}

// ========== Screen ==========

#[tokio::test]
async fn test_screenshot_inline_png() {
    let h = McpHarness::new();
    let value = success(h.server.screenshot(args(json!({}))).await);

    assert_eq!(value["width"], 1920);
    assert_eq!(value["height"], 1080);
    assert!(value["region"].is_null());

    let bytes = STANDARD
        .decode(value["image_base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1920, 1080));
}

#[tokio::test]
async fn test_screenshot_region_is_cropped_and_echoed() {
    let h = McpHarness::new();
    let value = success(
        h.server
            .screenshot(args(json!({"region": [10, 20, 100, 50]})))
            .await,
    );

    assert_eq!(value["width"], 100);
    assert_eq!(value["height"], 50);
    assert_eq!(value["region"], json!([10, 20, 100, 50]));
}

#[tokio::test]
async fn test_screenshot_filename_traversal_is_stripped() {
    let h = McpHarness::new();
    let value = success(
        h.server
            .screenshot(args(json!({"filename": "../../etc/passwd"})))
            .await,
    );

    let expected = h.screenshot_dir().join("passwd");
    assert_eq!(value["filename"], expected.display().to_string().as_str());
    assert!(expected.is_file());
    assert!(value.get("image_base64").is_none());

    // Unknown extension falls back to PNG bytes
    let bytes = fs::read(&expected).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[tokio::test]
async fn test_screenshot_format_follows_extension() {
    let h = McpHarness::new();
    success(
        h.server
            .screenshot(args(json!({"filename": "shot.jpg", "region": [0, 0, 64, 64]})))
            .await,
    );

    let bytes = fs::read(h.screenshot_dir().join("shot.jpg")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_screenshot_dir_is_created() {
    let h = McpHarness::new();
    let nested = h.screenshot_dir().join("nested").join("shots");
    let h = McpHarness::with_config(MockBackend::new(), |c| c.with_screenshot_dir(&nested));

    success(h.server.screenshot(args(json!({"filename": "a.png"}))).await);
    assert!(nested.join("a.png").is_file());
}

fn locate_fixture() -> (McpHarness, std::path::PathBuf) {
    let mut screen = ImageBuffer::solid(400, 300, GRAY);
    let patch = checkerboard(6, [255, 255, 255], [0, 0, 0]);
    screen.paste(&patch, Point::new(120, 80));

    let h = McpHarness::with_mock(MockBackend::new().with_screen(screen));
    let needle = h.screenshot_dir().join("needle.png");
    patch.inner().save(&needle).unwrap();
    (h, needle)
}

#[tokio::test]
async fn test_locate_on_screen_returns_absolute_box() {
    let (h, needle) = locate_fixture();
    let value = success(
        h.server
            .locate_on_screen(args(json!({
                "image_path": needle,
                "region": [100, 50, 200, 200],
            })))
            .await,
    );

    assert_eq!(value["found"], true);
    assert_eq!(value["left"], 120);
    assert_eq!(value["top"], 80);
    assert_eq!(value["width"], 6);
    assert_eq!(value["height"], 6);
}

#[tokio::test]
async fn test_locate_center_on_screen() {
    let (h, needle) = locate_fixture();
    let value = success(
        h.server
            .locate_center_on_screen(args(json!({"image_path": needle})))
            .await,
    );

    assert_eq!(value["found"], true);
    assert_eq!(value["x"], 123);
    assert_eq!(value["y"], 83);
}

#[tokio::test]
async fn test_locate_absent_image_is_not_an_error() {
    let (h, _) = locate_fixture();
    let absent = h.screenshot_dir().join("absent.png");
    checkerboard(6, [255, 0, 0], [0, 255, 0])
        .inner()
        .save(&absent)
        .unwrap();

    for result in [
        h.server
            .locate_on_screen(args(json!({"image_path": absent})))
            .await,
        h.server
            .locate_center_on_screen(args(json!({"image_path": absent})))
            .await,
    ] {
        let value = success(result);
        assert_eq!(value["found"], false);
        assert_eq!(value["message"], "Image not found on screen");
    }
}

#[tokio::test]
async fn test_get_pixel_color() {
    let mut screen = ImageBuffer::solid(100, 100, GRAY);
    screen.paste(&ImageBuffer::solid(5, 5, Rgb::new(255, 0, 0)), Point::new(10, 10));
    let h = McpHarness::with_mock(MockBackend::new().with_screen(screen));

    let value = success(h.server.get_pixel_color(args(json!({"x": 12, "y": 12}))).await);
    assert_eq!(value["r"], 255);
    assert_eq!(value["g"], 0);
    assert_eq!(value["b"], 0);
    assert_eq!(value["hex"], "#ff0000");
}

#[tokio::test]
async fn test_pixel_matches_color_tolerance() {
    let mut screen = ImageBuffer::solid(100, 100, GRAY);
    screen.paste(&ImageBuffer::solid(5, 5, Rgb::new(255, 0, 0)), Point::new(0, 0));
    screen.paste(&ImageBuffer::solid(5, 5, Rgb::new(247, 8, 3)), Point::new(50, 50));
    let h = McpHarness::with_mock(MockBackend::new().with_screen(screen));

    let check = |x: i32, y: i32, tolerance: i64| {
        h.server.pixel_matches_color(args(json!({
            "x": x,
            "y": y,
            "color": "#FF0000",
            "tolerance": tolerance,
        })))
    };

    assert_eq!(success(check(2, 2, 0).await)["matches"], true);
    assert_eq!(success(check(52, 52, 0).await)["matches"], false);
    assert_eq!(success(check(52, 52, 10).await)["matches"], true);
    assert_eq!(success(check(80, 80, 10).await)["matches"], false);

    let value = success(
        h.server
            .pixel_matches_color(args(json!({"x": 52, "y": 52, "color": " ( 247, 8, 3 ) "})))
            .await,
    );
    assert_eq!(value["matches"], true);
    assert_eq!(value["actual"], "#f70803");
}

#[tokio::test]
async fn test_get_screen_size() {
    let h = McpHarness::new();
    let value = success(h.server.get_screen_size().await);
    assert_eq!(value["width"], 1920);
    assert_eq!(value["height"], 1080);
}

// ========== Windows ==========

#[tokio::test]
async fn test_window_queries() {
    let h = McpHarness::new();

    let value = success(h.server.get_active_window_title().await);
    assert_eq!(value["title"], "Mozilla Firefox");

    let value = success(h.server.get_all_window_titles().await);
    assert_eq!(value["count"], 3);
    assert_eq!(value["titles"][2], "Terminal - Alacritty");

    let value = success(
        h.server
            .get_windows_with_title(args(json!({"title_fragment": "Code"})))
            .await,
    );
    assert_eq!(value["count"], 1);
    assert_eq!(value["windows"][0]["title"], "Visual Studio Code");
    assert_eq!(value["windows"][0]["left"], 200);
}

#[tokio::test]
async fn test_windows_with_title_empty_results() {
    let h = McpHarness::new();
    for fragment in ["", "firefox", "Notepad"] {
        let value = success(
            h.server
                .get_windows_with_title(args(json!({"title_fragment": fragment})))
                .await,
        );
        assert_eq!(value["windows"], json!([]), "fragment {:?}", fragment);
        assert_eq!(value["count"], 0);
    }
}

#[tokio::test]
async fn test_no_active_window_is_null() {
    let h = McpHarness::with_mock(MockBackend::new().with_windows(Vec::new()));
    let value = success(h.server.get_active_window_title().await);
    assert!(value["title"].is_null());
    assert_eq!(value["message"], "No active window");
}

// ========== Dialogs ==========

#[tokio::test]
async fn test_alert_is_shown() {
    let h = McpHarness::new();
    let value = success(h.server.alert(args(json!({"message": "Build finished"}))).await);

    assert_eq!(value["title"], "Alert");
    assert_eq!(value["result"], "OK");
    assert_eq!(
        h.mock.dialogs(),
        vec![ShownDialog::Alert {
            title:   "Alert".to_string(),
            message: "Build finished".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_confirm_defaults_and_choices() {
    let h = McpHarness::new();
    let value = success(h.server.confirm(args(json!({"message": "Proceed?"}))).await);
    assert_eq!(value["options"], json!(["OK", "Cancel"]));
    assert_eq!(value["result"], "OK");

    let h = McpHarness::with_mock(
        MockBackend::new().with_confirm_choice(DialogChoice::Button("No".to_string())),
    );
    let value = success(
        h.server
            .confirm(args(json!({"message": "Save?", "options": ["Yes", "No", "Later"]})))
            .await,
    );
    assert_eq!(value["result"], "No");
    assert_eq!(value["message"], "User selected: No");

    let h = McpHarness::with_mock(MockBackend::new().with_confirm_choice(DialogChoice::Dismissed));
    let value = success(h.server.confirm(args(json!({"message": "Proceed?"}))).await);
    assert!(value["result"].is_null());
}

#[tokio::test]
async fn test_prompt_returns_text_or_null() {
    let h = McpHarness::with_mock(MockBackend::new().with_prompt_reply(Some("report.pdf")));
    let value = success(
        h.server
            .prompt(args(json!({"message": "File name?", "default": "untitled"})))
            .await,
    );
    assert_eq!(value["result"], "report.pdf");
    assert_eq!(value["default"], "untitled");

    let h = McpHarness::with_mock(MockBackend::new().with_prompt_reply(None));
    let value = success(h.server.prompt(args(json!({"message": "File name?"}))).await);
    assert!(value["result"].is_null());
    assert_eq!(value["message"], "Prompt cancelled");
}

#[tokio::test]
async fn test_password_is_redacted() {
    let secret = "hunter2-correct-horse";
    let h = McpHarness::with_mock(MockBackend::new().with_password_reply(secret));
    let result = h
        .server
        .password(args(json!({"message": "Vault password"})))
        .await;

    let raw = result.as_ref().unwrap().content[0].as_text().unwrap().text.clone();
    assert!(!raw.contains(secret));

    let value = success(result);
    assert_eq!(value["result"], "[REDACTED]");
    assert_eq!(value["mask"], "*");
}

#[tokio::test]
async fn test_password_empty_or_cancelled_is_null() {
    let h = McpHarness::with_mock(MockBackend::new().with_password_reply(""));
    let value = success(h.server.password(args(json!({"message": "pw"}))).await);
    assert!(value["result"].is_null());

    let h = McpHarness::new();
    let value = success(h.server.password(args(json!({"message": "pw"}))).await);
    assert!(value["result"].is_null());
}

// ========== Utilities ==========

#[tokio::test(start_paused = true)]
async fn test_countdown_blocks_for_duration() {
    let h = McpHarness::new();
    let start = tokio::time::Instant::now();
    let value = success(h.server.countdown(args(json!({"seconds": 3}))).await);

    assert_eq!(value["seconds"], 3);
    assert!(start.elapsed() >= std::time::Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_negative_countdown_returns_at_once() {
    let h = McpHarness::new();
    let start = tokio::time::Instant::now();
    let value = success(h.server.countdown(args(json!({"seconds": -1}))).await);

    assert_eq!(value["seconds"], 0);
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_display_mouse_position_returns_last_position() {
    let h = McpHarness::with_mock(MockBackend::new().with_cursor(Point::new(42, 24)));
    let value = success(
        h.server
            .display_mouse_position(args(json!({"seconds": 0.3})))
            .await,
    );

    assert_eq!(value["x"], 42);
    assert_eq!(value["y"], 24);
    assert!(h.mock.events().is_empty(), "display is read-only");
}
