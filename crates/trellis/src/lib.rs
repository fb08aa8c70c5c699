//! # TRELLIS
//!
//! Application runtime for [`trellis_ui`] scenes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────┐     ┌──────────────┐
//! │    Window    │────>│     Application      │────>│    Scene     │
//! │ (events in,  │     │  pre-frame, drain,   │     │  dispatch,   │
//! │  frames out) │<────│  dispatch, render    │<────│  render      │
//! └──────────────┘     └──────────┬───────────┘     └──────────────┘
//!                                 │
//!                       ┌─────────┴─────────┐
//!                       │  MetricsHandle    │
//!                       │  CloseHandle      │
//!                       └───────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `app`: Frame loop
//! - `config`: TOML configuration
//! - `error`: Runtime errors
//! - `metrics`: Frame timings
//! - `window`: Window trait and the headless implementation

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod window;

pub use trellis_ui as ui;

pub use app::{Application, CloseHandle, PreFrameCallback, WindowEventCallback};
pub use config::{AppConfig, DoubleClickConfig};
pub use error::{AppError, AppResult};
pub use metrics::{FrameStats, FrameStatsAccumulator, MetricsHandle};
pub use window::{HeadlessWindow, Window, WindowEvent, WindowHandle, WindowNotification};
