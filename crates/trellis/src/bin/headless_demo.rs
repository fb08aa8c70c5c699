//! # Headless Demo
//!
//! Builds a small scene, drives it from a scripted input thread through a
//! [`HeadlessWindow`], and logs what happens.
//!
//! ```text
//! cargo run --bin headless_demo -- [config.toml]
//! RUST_LOG=trellis_ui=trace cargo run --bin headless_demo
//! ```

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use trellis::ui::{
    default_pointer_press, Color, DrawCx, EventCx, Key, KeyEvent, MouseButton, Point, PointerEvent,
    Rect, Scene, Size, TextEvent, Widget,
};
use trellis::{AppConfig, AppResult, Application, HeadlessWindow, WindowHandle, WindowNotification};

/// Filled rectangle with a focus ring.
struct Panel {
    fill: Color,
}

impl Widget for Panel {
    fn name(&self) -> &'static str {
        "panel"
    }

    fn on_draw(&mut self, cx: &mut DrawCx<'_>) {
        let bounds = cx.bounds();
        let focused = cx.is_focused();
        let surface = cx.surface();
        surface.fill_rect(bounds, self.fill);
        if focused {
            surface.stroke_rect(bounds, Color::FOCUS_RING, 1.0);
        }
    }
}

/// Labelled button. A double click closes the demo.
struct Button {
    label: &'static str,
    hovered: bool,
}

impl Widget for Button {
    fn name(&self) -> &'static str {
        "button"
    }

    fn on_draw(&mut self, cx: &mut DrawCx<'_>) {
        let bounds = cx.bounds();
        let fill = if self.hovered { Color::hex(0x3A_4A_5A_FF) } else { Color::PANEL };
        let surface = cx.surface();
        surface.fill_rect(bounds, fill);
        surface.draw_text(self.label, bounds.origin() + Point::new(4.0, 4.0), Color::WHITE, 12.0);
    }

    fn on_pointer_press(&mut self, cx: &mut EventCx<'_>, event: &mut PointerEvent) {
        tracing::info!(label = self.label, clicks = event.click_count(), "button pressed");
        if event.click_count() >= 2 {
            cx.request_close();
        }
        default_pointer_press(cx, event);
    }

    fn on_hover_changed(&mut self, _cx: &mut EventCx<'_>, hovered: bool) {
        self.hovered = hovered;
    }
}

/// Single-line text field that echoes what it receives.
#[derive(Default)]
struct TextField {
    text: String,
}

impl Widget for TextField {
    fn name(&self) -> &'static str {
        "text_field"
    }

    fn on_draw(&mut self, cx: &mut DrawCx<'_>) {
        let bounds = cx.bounds();
        let surface = cx.surface();
        surface.fill_rect(bounds, Color::BLACK);
        surface.draw_text(&self.text, bounds.origin(), Color::WHITE, 12.0);
    }

    fn on_key_press(&mut self, _cx: &mut EventCx<'_>, event: &mut KeyEvent) {
        if event.key() == Key::Backspace {
            self.text.pop();
            event.stop_propagation();
        }
    }

    fn on_text_input(&mut self, _cx: &mut EventCx<'_>, event: &mut TextEvent) {
        self.text.push_str(event.text());
        tracing::info!(text = %self.text, "text field changed");
        event.stop_propagation();
    }

    fn on_focus_changed(&mut self, _cx: &mut EventCx<'_>, focused: bool) {
        tracing::info!(focused, "text field focus");
    }
}

fn build_scene(size: Size) -> AppResult<Scene> {
    let mut scene = Scene::with_root(
        Rect::from_origin_size(Point::ZERO, size),
        Box::new(Panel { fill: Color::hex(0x10_14_18_FF) }),
    )?;
    let root = scene.root();

    let toolbar = scene.insert(
        Rect::new(0.0, 0.0, size.width, 32.0),
        root,
        1,
        Box::new(Panel { fill: Color::PANEL }),
    )?;
    scene.insert(
        Rect::new(8.0, 4.0, 80.0, 24.0),
        Some(toolbar),
        0,
        Box::new(Button { label: "Quit", hovered: false }),
    )?;
    scene.insert(
        Rect::new(8.0, 48.0, 200.0, 24.0),
        root,
        0,
        Box::new(TextField::default()),
    )?;
    Ok(scene)
}

fn script(handle: &WindowHandle) {
    let pause = || thread::sleep(Duration::from_millis(20));

    handle.notify(WindowNotification::Created);
    pause();
    handle.send_input(PointerEvent::moved(Point::new(20.0, 12.0)));
    pause();

    // Focus the text field and type into it.
    handle.send_input(PointerEvent::press(Point::new(20.0, 56.0), MouseButton::Left));
    handle.send_input(PointerEvent::release(Point::new(20.0, 56.0), MouseButton::Left));
    for ch in ["h", "i", "!"] {
        handle.send_input(TextEvent::new(ch));
    }
    handle.send_input(KeyEvent::press(Key::Backspace));
    pause();

    handle.notify(WindowNotification::Resized(Size::new(800.0, 600.0)));
    pause();

    // Double click the quit button.
    for _ in 0..2 {
        handle.send_input(PointerEvent::press(Point::new(20.0, 12.0), MouseButton::Left));
        handle.send_input(PointerEvent::release(Point::new(20.0, 12.0), MouseButton::Left));
    }
}

fn run() -> AppResult<i32> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let size = Size::new(640.0, 480.0);
    let scene = build_scene(size)?;
    let (window, handle) = HeadlessWindow::new(size);
    let culling = config.culling;

    let mut app = Application::new(scene, window, config);
    app.on_window_event(|_, notification| {
        tracing::debug!(?notification, "subscriber saw window notification");
    });

    let driver = thread::spawn(move || script(&handle));
    let code = app.run(culling)?;
    if driver.join().is_err() {
        tracing::warn!("input script panicked");
    }

    let metrics = app.metrics();
    tracing::info!(
        frames = metrics.frame_count(),
        last_fps = metrics.fps(),
        presented = app.window().frames_presented(),
        "demo finished"
    );
    Ok(code)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match run() {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            tracing::error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
