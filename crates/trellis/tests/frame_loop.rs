//! # Frame Loop Tests
//!
//! End-to-end runs of an [`Application`] over a [`HeadlessWindow`]: input
//! goes in through the window handle, effects are observed on the scene,
//! the presented frames and the metrics.
//!
//! Run with: cargo test --package trellis --test frame_loop

use std::cell::RefCell;
use std::rc::Rc;

use trellis::ui::{
    default_pointer_press, Block, Color, DrawCx, EventCx, Key, KeyEvent, MouseButton, NodeId,
    Point, PointerEvent, Rect, RenderCommand, Scene, Size, TextEvent, Widget,
};
use trellis::{
    AppConfig, AppError, Application, HeadlessWindow, WindowHandle, WindowNotification,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records hooks and paints its bounds in its own color.
struct Recorder {
    name: &'static str,
    color: Color,
    log: Log,
}

impl Recorder {
    fn boxed(name: &'static str, color: Color, log: &Log) -> Box<dyn Widget> {
        Box::new(Self {
            name,
            color,
            log: Rc::clone(log),
        })
    }

    fn push(&self, what: impl std::fmt::Display) {
        self.log.borrow_mut().push(format!("{}:{what}", self.name));
    }
}

impl Widget for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_draw(&mut self, cx: &mut DrawCx<'_>) {
        let bounds = cx.bounds();
        cx.surface().fill_rect(bounds, self.color);
    }

    fn on_pointer_press(&mut self, cx: &mut EventCx<'_>, event: &mut PointerEvent) {
        self.push(format_args!("press{}", event.click_count()));
        default_pointer_press(cx, event);
    }

    fn on_key_press(&mut self, cx: &mut EventCx<'_>, event: &mut KeyEvent) {
        self.push("key");
        if event.key() == Key::Escape {
            cx.request_close();
            event.stop_propagation();
        }
    }

    fn on_text_input(&mut self, _cx: &mut EventCx<'_>, event: &mut TextEvent) {
        self.push(format_args!("text={}", event.text()));
        event.stop_propagation();
    }

    fn on_focus_changed(&mut self, _cx: &mut EventCx<'_>, focused: bool) {
        self.push(if focused { "focus+" } else { "focus-" });
    }
}

struct Fixture {
    app: Application<HeadlessWindow>,
    handle: WindowHandle,
    log: Log,
    a: NodeId,
    b: NodeId,
}

/// Root (0,0)-(200,200) with two overlapping children:
/// A at (0,0) 100x100 z=1 and B at (50,50) 100x100 z=2.
fn fixture(config: AppConfig) -> Fixture {
    let log = Log::default();
    let mut scene = Scene::with_root(Rect::new(0.0, 0.0, 200.0, 200.0), Box::new(Block)).unwrap();
    let root = scene.root();
    let a = scene
        .insert(Rect::new(0.0, 0.0, 100.0, 100.0), root, 1, Recorder::boxed("a", Color::BLACK, &log))
        .unwrap();
    let b = scene
        .insert(Rect::new(50.0, 50.0, 100.0, 100.0), root, 2, Recorder::boxed("b", Color::WHITE, &log))
        .unwrap();

    let (window, handle) = HeadlessWindow::new(Size::new(200.0, 200.0));
    let app = Application::new(scene, window, config);
    Fixture { app, handle, log, a, b }
}

fn unpaced() -> AppConfig {
    AppConfig {
        target_fps: 0,
        ..AppConfig::default()
    }
}

fn fill_colors(commands: &[RenderCommand]) -> Vec<Color> {
    commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::Rect { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn overlapping_nodes_paint_by_z_and_top_one_gets_the_click() {
    let mut f = fixture(unpaced());

    f.handle
        .send_input(PointerEvent::press(Point::new(75.0, 75.0), MouseButton::Left));
    f.app.run_frame(false).unwrap();

    assert_eq!(fill_colors(f.app.window().last_frame()), vec![Color::BLACK, Color::WHITE]);
    assert_eq!(f.app.scene().focus(), Some(f.b));
    assert_eq!(*f.log.borrow(), vec!["b:press1", "b:focus+"]);
}

#[test]
fn focus_moves_with_left_before_entered() {
    let mut f = fixture(unpaced());

    f.handle
        .send_input(PointerEvent::press(Point::new(10.0, 10.0), MouseButton::Left));
    f.handle
        .send_input(PointerEvent::press(Point::new(140.0, 140.0), MouseButton::Left));
    f.app.run_frame(false).unwrap();

    assert_eq!(
        *f.log.borrow(),
        vec!["a:press1", "a:focus+", "b:press1", "a:focus-", "b:focus+"]
    );
    assert_eq!(f.app.scene().focus(), Some(f.b));
}

#[test]
fn keyboard_goes_to_focus_and_escape_closes() {
    let mut f = fixture(unpaced());
    f.app.scene_mut().set_focus(Some(f.a)).unwrap();
    f.log.borrow_mut().clear();

    f.handle.send_input(TextEvent::new("x"));
    f.handle.send_input(KeyEvent::press(Key::Escape));

    assert_eq!(f.app.run(false).unwrap(), 0);
    assert_eq!(*f.log.borrow(), vec!["a:text=x", "a:key"]);
    assert_eq!(f.app.metrics().frame_count(), 1);
}

#[test]
fn events_beyond_the_per_frame_bound_wait() {
    let mut f = fixture(AppConfig {
        max_events_per_frame: 2,
        ..unpaced()
    });

    for i in 0..5u8 {
        f.handle
            .send_input(PointerEvent::moved(Point::new(f32::from(i), 0.0)));
    }

    let first = f.app.run_frame(false).unwrap();
    assert_eq!(first.events_dispatched, 2);
    assert_eq!(f.app.pending_events(), 3);

    f.app.run_frame(false).unwrap();
    f.app.run_frame(false).unwrap();
    assert_eq!(f.app.pending_events(), 0);
}

#[test]
fn double_click_is_counted() {
    let mut f = fixture(unpaced());

    for _ in 0..2 {
        f.handle
            .send_input(PointerEvent::press(Point::new(20.0, 20.0), MouseButton::Left));
        f.handle
            .send_input(PointerEvent::release(Point::new(20.0, 20.0), MouseButton::Left));
    }
    f.app.run_frame(false).unwrap();

    assert_eq!(*f.log.borrow(), vec!["a:press1", "a:focus+", "a:press2"]);
}

#[test]
fn window_close_ends_run_and_reaches_subscribers() {
    let mut f = fixture(unpaced());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    f.app
        .on_window_event(move |_, notification| sink.borrow_mut().push(notification));

    f.handle.notify(WindowNotification::Created);
    f.handle.notify(WindowNotification::Minimized);
    f.handle.close();

    assert_eq!(f.app.run(true).unwrap(), 0);
    assert_eq!(
        *seen.borrow(),
        vec![
            WindowNotification::Created,
            WindowNotification::Minimized,
            WindowNotification::Closed
        ]
    );
    assert_eq!(f.app.metrics().frame_count(), 1);
    assert_eq!(f.app.window().frames_presented(), 0);
}

#[test]
fn culling_does_not_change_visible_output() {
    let mut f = fixture(unpaced());
    let root = f.app.scene().root().unwrap();
    f.app
        .scene_mut()
        .insert_block(Rect::new(500.0, 500.0, 10.0, 10.0), Some(root), 0)
        .unwrap();

    let full = f.app.run_frame(false).unwrap();
    let full_fills = fill_colors(f.app.window().last_frame());
    let culled = f.app.run_frame(true).unwrap();
    let culled_fills = fill_colors(f.app.window().last_frame());

    assert_eq!(full_fills, culled_fills);
    assert_eq!(full.render.culled, 0);
    assert_eq!(culled.render.culled, 1);
    assert_eq!(full.render.visited, culled.render.visited + 1);
}

#[test]
fn pointer_dispatch_without_root_stops_the_loop() {
    let (window, handle) = HeadlessWindow::new(Size::new(10.0, 10.0));
    let mut app = Application::new(Scene::new(), window, unpaced());
    handle.send_input(PointerEvent::moved(Point::ZERO));

    let result = app.run(false);
    assert!(matches!(result, Err(AppError::Scene(_))));
}
