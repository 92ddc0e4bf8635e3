//! # LUMEN Core
//!
//! The recycling kernel of the LUMEN runtime:
//! - Frame loops running for hours
//! - Thousands of short-lived objects per frame
//! - Zero allocator traffic once warm
//!
//! ## Architecture Rules
//!
//! 1. **Objects are recycled, never dropped** - released objects are reset in place
//! 2. **Handles are checked** - a stale or foreign handle is an error, never a silent alias
//! 3. **Reclamation can wait** - deferred pools free objects at the tick boundary
//!
//! ## Example
//!
//! ```rust
//! use lumen_core::{ObjectPool, PoolConfig, Recyclable};
//!
//! #[derive(Default)]
//! struct Spark { life: f32 }
//!
//! impl Recyclable for Spark {
//!     fn on_recycle(&mut self) { self.life = 0.0; }
//! }
//!
//! let mut pool: ObjectPool<Spark> = ObjectPool::with_config(PoolConfig::with_capacity(256));
//! // 256 sparks pre-allocated, zero allocations while under that
//! # let _ = pool.acquire();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::PoolConfig;
pub use error::{ConfigError, ConfigResult, PoolError, PoolResult};
pub use memory::{DeferredPool, ObjectPool, PoolGuard, PoolHandle, Recyclable, SlotState};
