//! # Core Error Types
//!
//! All errors that can occur in the recycling kernel.

use thiserror::Error;

use crate::memory::PoolHandle;

/// Errors that can occur when handing objects back and forth with a pool.
///
/// Every variant except [`PoolError::CapacityReached`] is a contract
/// violation: the caller released something it did not own.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The handle was issued by a different pool.
    #[error("handle {handle:?} belongs to pool {owner}, not pool {pool}")]
    ForeignHandle {
        /// The offending handle.
        handle: PoolHandle,
        /// The pool that issued the handle.
        owner: u32,
        /// The pool the handle was presented to.
        pool: u32,
    },

    /// The handle refers to a slot that has since been recycled
    /// (double release or use after release).
    #[error("stale handle {0:?}: slot was already recycled")]
    StaleHandle(PoolHandle),

    /// The handle is already queued for deferred reclamation.
    #[error("handle {0:?} is already queued for reclamation")]
    AlreadyPending(PoolHandle),

    /// The pool was configured with an upper bound and it has been reached.
    #[error("pool capacity reached: {max} objects")]
    CapacityReached {
        /// Configured maximum.
        max: usize,
    },
}

impl PoolError {
    /// Returns true if this error indicates a programming error in the caller.
    #[inline]
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::CapacityReached { .. })
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text could not be parsed into the expected shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
