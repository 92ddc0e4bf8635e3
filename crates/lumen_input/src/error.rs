//! # Input Error Types

use thiserror::Error;

use lumen_core::PoolError;

/// Error type a touch callback may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from touch dispatch.
#[derive(Error, Debug)]
pub enum TouchError {
    /// The registered callback failed. The event was recycled regardless.
    #[error("touch callback failed: {0}")]
    Callback(#[source] CallbackError),

    /// A platform event carried an action code outside `0..=4`.
    #[error("unknown touch action code {0}")]
    UnknownActionCode(i32),

    /// The event pool refused the request.
    #[error("touch event pool: {0}")]
    Pool(#[from] PoolError),
}

/// Errors handing a touch to another thread.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// The queue is full; the touch was dropped.
    #[error("touch handoff queue is full")]
    Full,

    /// The dispatcher side is gone.
    #[error("touch handoff queue is disconnected")]
    Disconnected,
}

/// Result type for touch dispatch.
pub type TouchResult<T> = Result<T, TouchError>;
