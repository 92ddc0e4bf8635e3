//! # Memory Management
//!
//! Object pools for allocation-free frames.
//!
//! ## Design Philosophy
//!
//! Memory is allocated while the pools warm up. After that:
//! - No heap allocations
//! - No deallocations (released objects are reset in place)
//! - Predictable, flat latency

mod deferred;
mod pool;
mod recycle;

pub use deferred::DeferredPool;
pub use pool::{ObjectPool, PoolGuard, PoolHandle, SlotState};
pub use recycle::Recyclable;
