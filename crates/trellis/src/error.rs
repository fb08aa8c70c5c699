//! # Application Error Types
//!
//! All errors that can stop the frame loop or fail startup.

use std::path::PathBuf;

use thiserror::Error;
use trellis_ui::SceneError;

/// Errors that can occur in the application runtime.
#[derive(Error, Debug)]
pub enum AppError {
    /// A scene operation failed.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The configuration file is not valid TOML for [`AppConfig`](crate::AppConfig).
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The window could not present a frame.
    #[error("present failed: {0}")]
    Present(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
