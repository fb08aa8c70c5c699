//! # Windows
//!
//! The frame loop talks to its host window through [`Window`]: it polls
//! input and lifecycle events and hands over each frame's render commands.
//!
//! [`HeadlessWindow`] is the in-process implementation. It is fed through
//! a cloneable [`WindowHandle`], which may live on another thread.
//!
//! ```text
//! ┌──────────────┐  crossbeam  ┌────────────────┐  poll_event  ┌─────────────┐
//! │ WindowHandle │────────────>│ HeadlessWindow │─────────────>│ Application │
//! └──────────────┘             └────────────────┘<─────────────└─────────────┘
//!                                                   present
//! ```

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use trellis_ui::{InputEvent, Point, RenderCommand, Size};

use crate::error::AppResult;

/// Window lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowNotification {
    /// The window was created and is about to show its first frame.
    Created,
    /// The client area changed size.
    Resized(Size),
    /// The client area moved on screen.
    Moved(Point),
    /// The window was minimized.
    Minimized,
    /// The window was maximized.
    Maximized,
    /// The window was restored from minimized or maximized.
    Restored,
    /// The window was closed. No further frames will be presented.
    Closed,
}

/// Anything a window reports to the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// User input for the scene.
    Input(InputEvent),
    /// A lifecycle change.
    Notification(WindowNotification),
}

impl From<InputEvent> for WindowEvent {
    fn from(event: InputEvent) -> Self {
        Self::Input(event)
    }
}

impl From<WindowNotification> for WindowEvent {
    fn from(notification: WindowNotification) -> Self {
        Self::Notification(notification)
    }
}

/// A host window the frame loop can drive.
pub trait Window {
    /// False once the window is closed.
    fn is_alive(&self) -> bool;

    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<WindowEvent>;

    /// Top-left corner of the client area on screen.
    fn client_origin(&self) -> Point;

    /// Size of the client area.
    fn client_size(&self) -> Size;

    /// Shows one frame.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Present`](crate::AppError::Present) if the frame
    /// could not be shown.
    fn present(&mut self, commands: &[RenderCommand]) -> AppResult<()>;
}

/// Sends events into a [`HeadlessWindow`].
#[derive(Clone, Debug)]
pub struct WindowHandle {
    sender: Sender<WindowEvent>,
}

impl WindowHandle {
    /// Queues an input event. Returns `false` if the window is gone.
    #[inline]
    pub fn send_input(&self, event: impl Into<InputEvent>) -> bool {
        self.sender.send(WindowEvent::Input(event.into())).is_ok()
    }

    /// Queues a lifecycle notification. Returns `false` if the window is gone.
    #[inline]
    pub fn notify(&self, notification: WindowNotification) -> bool {
        self.sender.send(WindowEvent::Notification(notification)).is_ok()
    }

    /// Closes the window once queued events before it are consumed.
    #[inline]
    pub fn close(&self) -> bool {
        self.notify(WindowNotification::Closed)
    }
}

/// A window without a screen. Frames are kept for inspection.
#[derive(Debug)]
pub struct HeadlessWindow {
    receiver: Receiver<WindowEvent>,
    alive: bool,
    origin: Point,
    size: Size,
    frames_presented: u64,
    last_frame: Vec<RenderCommand>,
}

impl HeadlessWindow {
    /// Creates a window of the given client size and the handle feeding it.
    #[must_use]
    pub fn new(size: Size) -> (Self, WindowHandle) {
        let (sender, receiver) = unbounded();
        let window = Self {
            receiver,
            alive: true,
            origin: Point::ZERO,
            size,
            frames_presented: 0,
            last_frame: Vec::new(),
        };
        (window, WindowHandle { sender })
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Commands of the most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> &[RenderCommand] {
        &self.last_frame
    }
}

impl Window for HeadlessWindow {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        match self.receiver.try_recv() {
            Ok(event) => {
                if let WindowEvent::Notification(notification) = &event {
                    match *notification {
                        WindowNotification::Resized(size) => self.size = size,
                        WindowNotification::Moved(origin) => self.origin = origin,
                        WindowNotification::Closed => self.alive = false,
                        _ => {}
                    }
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.alive {
                    tracing::debug!("every window handle dropped, closing");
                    self.alive = false;
                }
                None
            }
        }
    }

    fn client_origin(&self) -> Point {
        self.origin
    }

    fn client_size(&self) -> Size {
        self.size
    }

    fn present(&mut self, commands: &[RenderCommand]) -> AppResult<()> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(commands);
        self.frames_presented += 1;
        Ok(())
    }
}
