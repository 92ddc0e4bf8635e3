//! # Deferred Pool
//!
//! A pool whose releases take effect at the next tick boundary.
//!
//! ```text
//! frame N:   obtain ──> fill ──> release (queued, still readable)
//!                                   │
//! frame N+1: advance(dt) ───────────┴──> handler(&mut item) ──> on_recycle ──> free list
//! ```
//!
//! Used when a released object's consumers must stay valid until the current
//! frame closes, or when work posted mid-frame has to run on the update pass.

use std::collections::VecDeque;
use std::convert::Infallible;

use crate::config::PoolConfig;
use crate::error::PoolResult;
use crate::memory::{ObjectPool, PoolHandle, Recyclable};

/// An object pool with tick-aligned reclamation.
///
/// Released objects are queued and drained in FIFO order by
/// [`DeferredPool::advance`] (or [`DeferredPool::advance_with`], which hands
/// each object to a handler first).
pub struct DeferredPool<T: Recyclable> {
    /// Backing pool.
    pool: ObjectPool<T>,
    /// Released handles, oldest first.
    queue: VecDeque<PoolHandle>,
    /// Total time fed through `advance`.
    elapsed: f32,
    /// Objects reclaimed so far.
    reclaimed: u64,
}

impl<T: Recyclable + Default> DeferredPool<T> {
    /// Creates an empty, unbounded deferred pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates a deferred pool from a sizing policy.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self::with_factory(config, T::default)
    }
}

impl<T: Recyclable + Default> Default for DeferredPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recyclable> DeferredPool<T> {
    /// Creates a deferred pool whose objects are built by `factory`.
    #[must_use]
    pub fn with_factory(config: PoolConfig, factory: fn() -> T) -> Self {
        let pool = ObjectPool::with_factory(config, factory);
        let queue = VecDeque::with_capacity(pool.capacity());
        Self {
            pool,
            queue,
            elapsed: 0.0,
            reclaimed: 0,
        }
    }

    /// Takes an object from the pool.
    ///
    /// # Errors
    ///
    /// See [`ObjectPool::acquire`].
    #[inline]
    pub fn obtain(&mut self) -> PoolResult<PoolHandle> {
        self.pool.acquire()
    }

    /// Queues an object for reclamation on the next [`DeferredPool::advance`].
    ///
    /// The object stays readable through [`DeferredPool::get`] until then.
    ///
    /// # Errors
    ///
    /// Contract violations: foreign, stale, or already-queued handles.
    pub fn release(&mut self, handle: PoolHandle) -> PoolResult<()> {
        self.pool.mark_pending(handle)?;
        self.queue.push_back(handle);
        Ok(())
    }

    /// Gets a reference to an object that is in use or queued.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.pool.get(handle)
    }

    /// Gets a mutable reference to an object that is in use or queued.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.pool.get_mut(handle)
    }

    /// Reclaims every object queued before this call, oldest first.
    ///
    /// Returns the number of objects reclaimed.
    pub fn advance(&mut self, delta_time: f32) -> usize {
        match self.advance_with(delta_time, |_| Ok::<(), Infallible>(())) {
            Ok(count) => count,
            Err(never) => match never {},
        }
    }

    /// Hands every queued object to `handler` in FIFO order, then reclaims it.
    ///
    /// Every queued object is reclaimed even when the handler fails; the first
    /// handler error is returned after the whole queue has drained.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `handler`.
    pub fn advance_with<E, F>(&mut self, delta_time: f32, mut handler: F) -> Result<usize, E>
    where
        F: FnMut(&mut T) -> Result<(), E>,
    {
        self.elapsed += delta_time;

        let due = self.queue.len();
        let mut first_error = None;
        let mut count = 0;
        for _ in 0..due {
            let Some(handle) = self.queue.pop_front() else {
                break;
            };
            if let Some(value) = self.pool.get_mut(handle) {
                if let Err(err) = handler(value) {
                    first_error.get_or_insert(err);
                }
            }
            if self.pool.reclaim_pending(handle).is_ok() {
                count += 1;
            }
        }
        self.reclaimed += count as u64;
        if count > 0 {
            tracing::trace!(pool = self.pool.id(), count, "deferred pool drained");
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }

    /// Reclaims every queued object without handing it to anyone.
    pub fn reset(&mut self) {
        while let Some(handle) = self.queue.pop_front() {
            if self.pool.reclaim_pending(handle).is_ok() {
                self.reclaimed += 1;
            }
        }
    }

    /// Returns the number of queued objects.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns the total time fed through `advance`.
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Returns the number of objects reclaimed since creation.
    #[inline]
    #[must_use]
    pub const fn reclaimed_count(&self) -> u64 {
        self.reclaimed
    }

    /// Read-only view of the backing pool.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> &ObjectPool<T> {
        &self.pool
    }

    /// The backing pool, for objects that bypass the queue.
    ///
    /// Queued handles stay protected: releasing one here fails with
    /// [`crate::PoolError::AlreadyPending`].
    #[inline]
    pub fn pool_mut(&mut self) -> &mut ObjectPool<T> {
        &mut self.pool
    }
}
