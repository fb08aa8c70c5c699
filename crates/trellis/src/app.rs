//! # Application Frame Loop
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. PRE-FRAME                                                        │
//! │    └─ Callbacks (timers, animation) with the frame delta            │
//! │                                                                     │
//! │ 2. EVENTS                                                           │
//! │    ├─ Drain the window: notifications to subscribers,               │
//! │    │  input to the pointer queue or the keyboard queue              │
//! │    └─ Dispatch up to N pointer events, then up to N keyboard events │
//! │                                                                     │
//! │ 3. RENDER                                                           │
//! │    ├─ Scene traversal into the command buffer                       │
//! │    └─ Present                                                       │
//! │                                                                     │
//! │ 4. END FRAME                                                        │
//! │    ├─ Record event phase, render phase, fps                         │
//! │    └─ Sleep out the remaining frame budget                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the calling thread. Other threads can only reach the
//! loop through a [`CloseHandle`], a [`MetricsHandle`] or the window's own
//! event channel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use trellis_ui::{CommandBuffer, InputEvent, InputState, Rect, Scene};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::metrics::{FrameStats, MetricsHandle};
use crate::window::{Window, WindowEvent, WindowNotification};

/// Longest delta handed to pre-frame callbacks, in seconds.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Per-frame callback, run before events are dispatched.
pub type PreFrameCallback = Box<dyn FnMut(&mut Scene, f32)>;

/// Subscriber to window lifecycle notifications.
pub type WindowEventCallback = Box<dyn FnMut(&mut Scene, WindowNotification)>;

/// Requests shutdown from anywhere, including other threads.
#[derive(Clone, Debug, Default)]
pub struct CloseHandle {
    requested: Arc<AtomicBool>,
}

impl CloseHandle {
    /// Asks the loop to stop after the current frame.
    #[inline]
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// True once a close was requested.
    #[inline]
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// Drives a [`Scene`] against a [`Window`].
pub struct Application<W: Window> {
    scene: Scene,
    window: W,
    config: AppConfig,
    input: InputState,
    buffer: CommandBuffer,
    pointer_queue: VecDeque<InputEvent>,
    key_queue: VecDeque<InputEvent>,
    pre_frame: Vec<PreFrameCallback>,
    window_subscribers: Vec<WindowEventCallback>,
    metrics: MetricsHandle,
    close: CloseHandle,
    started: Instant,
    last_frame_start: Instant,
    last_render_end: Option<Instant>,
    frame: u64,
}

impl<W: Window> Application<W> {
    /// Creates an application. Nothing runs until [`run`](Self::run) or
    /// [`run_frame`](Self::run_frame).
    #[must_use]
    pub fn new(scene: Scene, window: W, config: AppConfig) -> Self {
        let now = Instant::now();
        Self {
            scene,
            window,
            input: InputState::new(config.double_click.into()),
            buffer: CommandBuffer::new(),
            pointer_queue: VecDeque::with_capacity(64),
            key_queue: VecDeque::with_capacity(64),
            pre_frame: Vec::new(),
            window_subscribers: Vec::new(),
            metrics: MetricsHandle::new(config.slow_frame()),
            close: CloseHandle::default(),
            started: now,
            last_frame_start: now,
            last_render_end: None,
            frame: 0,
            config,
        }
    }

    /// Runs frames until the window closes or a close is requested.
    ///
    /// Returns the exit code, `0` for a normal close.
    ///
    /// # Errors
    ///
    /// Stops at the first scene, window or present error.
    pub fn run(&mut self, culling: bool) -> AppResult<i32> {
        tracing::info!(
            target_fps = self.config.target_fps,
            culling,
            "application started"
        );

        while self.should_continue() {
            let frame_start = Instant::now();
            self.run_frame(culling)?;
            self.pace(frame_start);
        }

        tracing::info!(frames = self.frame, "application stopped");
        self.metrics.totals().log_summary();
        Ok(0)
    }

    /// Runs a single frame without pacing.
    ///
    /// # Errors
    ///
    /// Returns scene errors from dispatch or render, and present failures.
    pub fn run_frame(&mut self, culling: bool) -> AppResult<FrameStats> {
        let t0 = Instant::now();
        let delta = t0
            .duration_since(self.last_frame_start)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        self.last_frame_start = t0;

        for callback in &mut self.pre_frame {
            callback(&mut self.scene, delta);
        }

        self.drain_window_events()?;
        let events_dispatched = self.dispatch_queued()?;
        if self.scene.take_close_request() {
            self.close.request();
        }

        let t1 = Instant::now();
        self.buffer.begin_frame();
        let render = self.scene.render(&mut self.buffer, culling)?;
        if self.window.is_alive() {
            if let Err(err) = self.window.present(self.buffer.commands()) {
                tracing::error!(frame = self.frame, %err, "present failed");
                return Err(err);
            }
        } else {
            tracing::debug!(frame = self.frame, "window closed, frame not presented");
        }
        let t2 = Instant::now();

        let fps = self
            .last_render_end
            .map(|previous| t2.duration_since(previous).as_secs_f64())
            .filter(|&seconds| seconds > 0.0)
            .map_or(0.0, |seconds| 1.0 / seconds);
        self.last_render_end = Some(t2);

        let stats = FrameStats {
            frame: self.frame,
            event_us: micros(t1 - t0),
            render_us: micros(t2 - t1),
            fps,
            events_dispatched,
            render,
        };
        self.metrics.record(stats);

        if t2 - t0 > self.config.slow_frame() {
            tracing::warn!(
                frame = self.frame,
                total_us = stats.total_us(),
                event_us = stats.event_us,
                render_us = stats.render_us,
                "frame exceeded budget"
            );
        }

        self.frame += 1;
        Ok(stats)
    }

    fn should_continue(&self) -> bool {
        self.window.is_alive() && !self.close.is_requested()
    }

    fn pace(&self, frame_start: Instant) {
        if let Some(budget) = self.config.frame_budget() {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }

    fn drain_window_events(&mut self) -> AppResult<()> {
        while let Some(event) = self.window.poll_event() {
            match event {
                WindowEvent::Input(mut input) => {
                    let now = self.started.elapsed().as_secs_f32();
                    self.input.observe(&mut input, now);
                    if input.is_pointer() {
                        self.pointer_queue.push_back(input);
                    } else {
                        self.key_queue.push_back(input);
                    }
                }
                WindowEvent::Notification(notification) => {
                    self.handle_notification(notification)?;
                }
            }
        }
        Ok(())
    }

    fn handle_notification(&mut self, notification: WindowNotification) -> AppResult<()> {
        tracing::info!(?notification, "window notification");
        match notification {
            WindowNotification::Resized(size) => {
                if let Some(root) = self.scene.root() {
                    let rect = self.scene.tree().rect(root)?;
                    self.scene
                        .tree_mut()
                        .set_rect(root, Rect::from_origin_size(rect.origin(), size))?;
                }
            }
            WindowNotification::Closed => self.close.request(),
            _ => {}
        }

        for subscriber in &mut self.window_subscribers {
            subscriber(&mut self.scene, notification);
        }
        Ok(())
    }

    fn dispatch_queued(&mut self) -> AppResult<usize> {
        let limit = self.config.max_events_per_frame.max(1);
        let mut dispatched = 0;
        for queue in [&mut self.pointer_queue, &mut self.key_queue] {
            for _ in 0..limit {
                let Some(mut event) = queue.pop_front() else {
                    break;
                };
                self.scene.dispatch(&mut event)?;
                dispatched += 1;
            }
        }
        Ok(dispatched)
    }

    /// Target frame rate from the configuration.
    #[must_use]
    pub const fn target_fps(&self) -> u32 {
        self.config.target_fps
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared view of frame timings.
    #[must_use]
    pub fn metrics(&self) -> MetricsHandle {
        self.metrics.clone()
    }

    /// A handle that stops the loop when triggered.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Stops the loop after the current frame.
    pub fn request_close(&self) {
        self.close.request();
    }

    /// Registers a callback run at the start of every frame with the time
    /// since the previous frame, in seconds.
    pub fn on_pre_frame(&mut self, callback: impl FnMut(&mut Scene, f32) + 'static) {
        self.pre_frame.push(Box::new(callback));
    }

    /// Registers a subscriber to window lifecycle notifications.
    pub fn on_window_event(
        &mut self,
        callback: impl FnMut(&mut Scene, WindowNotification) + 'static,
    ) {
        self.window_subscribers.push(Box::new(callback));
    }

    /// The scene being driven.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene being driven, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The window being driven.
    #[must_use]
    pub const fn window(&self) -> &W {
        &self.window
    }

    /// Pointer, button and key state as of the last drained event.
    #[must_use]
    pub const fn input(&self) -> &InputState {
        &self.input
    }

    /// Input events received but not dispatched yet.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.pointer_queue.len() + self.key_queue.len()
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
