//! # Object Pool
//!
//! Growable pool of recyclable objects with generation-checked handles.
//!
//! Objects are never dropped while the pool lives: a released object is reset
//! in place and its slot goes back on the free list. Once the pool has grown
//! to the frame's working set, acquire and release are O(1) with zero heap
//! allocations.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::memory::Recyclable;

/// Source of unique pool ids, so handles cannot cross pools.
static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// Handle to an object owned by a pool.
///
/// A handle is:
/// - Tagged with the id of the pool that issued it
/// - An index into the pool's slots
/// - A generation counter, bumped on every release, for detecting stale handles
///
/// A slot whose generation reaches `u32::MAX` is retired instead of wrapping,
/// so no stale handle can ever alias a later occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Id of the issuing pool.
    pool: u32,
    /// Slot index.
    index: u32,
    /// Slot generation at the time of acquire.
    generation: u32,
}

impl PoolHandle {
    /// Returns the slot index. Two handles with the same index refer to the
    /// same underlying object, possibly in different lifetimes.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns the id of the pool that issued this handle.
    #[inline]
    #[must_use]
    pub const fn pool_id(self) -> u32 {
        self.pool
    }
}

/// Where a slot currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// On the free list.
    Free,
    /// Handed out to a consumer.
    InUse,
    /// Released, waiting for the next tick boundary to be reclaimed.
    Pending,
}

/// A single pooled object and its bookkeeping.
struct Slot<T> {
    value: T,
    generation: u32,
    state: SlotState,
}

/// A growable pool of recyclable objects.
///
/// The pool is good for anything created and dropped at frame rate:
/// input events, particles, small command objects.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread.
///
/// # Example
///
/// ```rust
/// use lumen_core::{ObjectPool, Recyclable};
///
/// #[derive(Default)]
/// struct Spark { life: f32 }
///
/// impl Recyclable for Spark {
///     fn on_recycle(&mut self) { self.life = 0.0; }
/// }
///
/// let mut pool: ObjectPool<Spark> = ObjectPool::new();
///
/// let handle = pool.acquire()?;
/// pool.get_mut(handle).unwrap().life = 1.0;
///
/// pool.release(handle)?;
/// assert!(pool.get(handle).is_none());
/// # Ok::<(), lumen_core::PoolError>(())
/// ```
pub struct ObjectPool<T: Recyclable> {
    /// Unique id stamped into every handle.
    id: u32,
    /// Object storage. Never shrinks.
    slots: Vec<Slot<T>>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Number of slots handed out.
    in_use: usize,
    /// Number of slots waiting for deferred reclamation.
    pending: usize,
    /// Highest `in_use + pending` ever observed.
    peak: usize,
    /// Sizing policy.
    config: PoolConfig,
    /// Creates new objects when the pool grows.
    factory: fn() -> T,
}

impl<T: Recyclable + Default> ObjectPool<T> {
    /// Creates an empty, unbounded pool that grows one object at a time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(PoolConfig::default(), T::default)
    }

    /// Creates a pool from a sizing policy, pre-allocating
    /// `config.initial_capacity` objects.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self::with_factory(config, T::default)
    }
}

impl<T: Recyclable + Default> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recyclable> ObjectPool<T> {
    /// Creates a pool whose objects are built by `factory`.
    ///
    /// A zero `growth` in the config is treated as 1.
    #[must_use]
    pub fn with_factory(config: PoolConfig, factory: fn() -> T) -> Self {
        let config = PoolConfig {
            growth: config.growth.max(1),
            ..config
        };
        let mut pool = Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free_list: Vec::new(),
            in_use: 0,
            pending: 0,
            peak: 0,
            config,
            factory,
        };
        let initial = match config.max_capacity {
            Some(max) => config.initial_capacity.min(max),
            None => config.initial_capacity,
        };
        pool.allocate_slots(initial);
        pool
    }

    /// Returns this pool's unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the sizing policy.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the number of objects the pool owns.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of objects currently handed out.
    #[inline]
    #[must_use]
    pub const fn in_use_count(&self) -> usize {
        self.in_use
    }

    /// Returns the number of released objects awaiting deferred reclamation.
    #[inline]
    #[must_use]
    pub const fn pending_count(&self) -> usize {
        self.pending
    }

    /// Returns the number of objects on the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Returns the largest number of objects ever out of the free list at once.
    #[inline]
    #[must_use]
    pub const fn peak_usage(&self) -> usize {
        self.peak
    }

    /// Takes an object off the free list, growing the pool if it is empty.
    ///
    /// This is **O(1)** with **zero heap allocations** once the pool is warm.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::CapacityReached`] only when a `max_capacity` was
    /// configured and every object is out. Unbounded pools never fail.
    pub fn acquire(&mut self) -> PoolResult<PoolHandle> {
        if self.free_list.is_empty() {
            self.grow()?;
        }
        let Some(index) = self.free_list.pop() else {
            return Err(PoolError::CapacityReached {
                max: self.slots.len(),
            });
        };

        let slot = &mut self.slots[index as usize];
        slot.state = SlotState::InUse;
        slot.value.on_obtain();
        self.in_use += 1;
        self.peak = self.peak.max(self.in_use + self.pending);

        Ok(PoolHandle {
            pool: self.id,
            index,
            generation: slot.generation,
        })
    }

    /// Acquires an object wrapped in a guard that releases it when dropped.
    ///
    /// # Errors
    ///
    /// Same as [`ObjectPool::acquire`].
    pub fn acquire_scoped(&mut self) -> PoolResult<PoolGuard<'_, T>> {
        let handle = self.acquire()?;
        Ok(PoolGuard { pool: self, handle })
    }

    /// Returns an object to the free list.
    ///
    /// The object's [`Recyclable::on_recycle`] runs before it becomes
    /// available again, and the handle (plus any copy of it) goes stale.
    ///
    /// # Errors
    ///
    /// Contract violations: [`PoolError::ForeignHandle`] for a handle issued by
    /// another pool, [`PoolError::StaleHandle`] for a double release, and
    /// [`PoolError::AlreadyPending`] for a handle queued for deferred
    /// reclamation.
    pub fn release(&mut self, handle: PoolHandle) -> PoolResult<()> {
        let index = self.validate(handle).map_err(violation)?;
        match self.slots[index].state {
            SlotState::InUse => {
                self.in_use -= 1;
                self.recycle_slot(index);
                Ok(())
            }
            SlotState::Pending => Err(violation(PoolError::AlreadyPending(handle))),
            SlotState::Free => Err(violation(PoolError::StaleHandle(handle))),
        }
    }

    /// Returns the state of the slot a handle refers to, or `None` if the
    /// handle is foreign or stale.
    #[must_use]
    pub fn state(&self, handle: PoolHandle) -> Option<SlotState> {
        let index = self.validate(handle).ok()?;
        Some(self.slots[index].state)
    }

    /// Returns true if the handle still refers to an object out of the free list.
    #[inline]
    #[must_use]
    pub fn is_live(&self, handle: PoolHandle) -> bool {
        matches!(self.state(handle), Some(SlotState::InUse | SlotState::Pending))
    }

    /// Gets a reference to a live object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let index = self.live_index(handle)?;
        Some(&self.slots[index].value)
    }

    /// Gets a mutable reference to a live object.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let index = self.live_index(handle)?;
        Some(&mut self.slots[index].value)
    }

    /// Recycles every object that is out of the free list, in use or pending.
    ///
    /// All outstanding handles go stale.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].state != SlotState::Free {
                self.recycle_slot(index);
            }
        }
        self.in_use = 0;
        self.pending = 0;
    }

    /// Moves an in-use object to the pending state.
    pub(crate) fn mark_pending(&mut self, handle: PoolHandle) -> PoolResult<()> {
        let index = self.validate(handle).map_err(violation)?;
        match self.slots[index].state {
            SlotState::InUse => {
                self.slots[index].state = SlotState::Pending;
                self.in_use -= 1;
                self.pending += 1;
                Ok(())
            }
            SlotState::Pending => Err(violation(PoolError::AlreadyPending(handle))),
            SlotState::Free => Err(violation(PoolError::StaleHandle(handle))),
        }
    }

    /// Recycles a pending object.
    pub(crate) fn reclaim_pending(&mut self, handle: PoolHandle) -> PoolResult<()> {
        let index = self.validate(handle).map_err(violation)?;
        if self.slots[index].state != SlotState::Pending {
            return Err(violation(PoolError::StaleHandle(handle)));
        }
        self.pending -= 1;
        self.recycle_slot(index);
        Ok(())
    }

    /// Checks pool id and generation, returning the slot index.
    fn validate(&self, handle: PoolHandle) -> PoolResult<usize> {
        if handle.pool != self.id {
            return Err(PoolError::ForeignHandle {
                handle,
                owner: handle.pool,
                pool: self.id,
            });
        }
        match self.slots.get(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation => Ok(handle.index as usize),
            _ => Err(PoolError::StaleHandle(handle)),
        }
    }

    fn live_index(&self, handle: PoolHandle) -> Option<usize> {
        let index = self.validate(handle).ok()?;
        (self.slots[index].state != SlotState::Free).then_some(index)
    }

    fn recycle_slot(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.value.on_recycle();
        slot.generation = slot.generation.saturating_add(1);
        slot.state = SlotState::Free;
        if slot.generation == u32::MAX {
            tracing::debug!(pool = self.id, slot = index, "slot generations exhausted, retired");
            return;
        }
        // Slot indices are bounded by u32 in allocate_slots.
        #[allow(clippy::cast_possible_truncation)]
        self.free_list.push(index as u32);
    }

    fn grow(&mut self) -> PoolResult<()> {
        let mut amount = self.config.growth;
        if let Some(max) = self.config.max_capacity {
            let room = max.saturating_sub(self.slots.len());
            if room == 0 {
                tracing::warn!(pool = self.id, max, "pool capacity reached");
                return Err(PoolError::CapacityReached { max });
            }
            amount = amount.min(room);
        }
        self.allocate_slots(amount);
        tracing::debug!(pool = self.id, capacity = self.slots.len(), "pool grew");
        Ok(())
    }

    fn allocate_slots(&mut self, amount: usize) {
        let start = self.slots.len();
        let end = start.saturating_add(amount).min(u32::MAX as usize);
        self.slots.reserve(end - start);
        self.free_list.reserve(end - start);
        for _ in start..end {
            self.slots.push(Slot {
                value: (self.factory)(),
                generation: 0,
                state: SlotState::Free,
            });
        }
        // Lowest index on top of the free list.
        #[allow(clippy::cast_possible_truncation)]
        self.free_list.extend((start..end).rev().map(|index| index as u32));
    }
}

fn violation(err: PoolError) -> PoolError {
    tracing::warn!(error = %err, "pool contract violation");
    err
}

/// An acquired object that goes back to its pool when the guard drops.
///
/// Recycling happens on every exit path, including early returns and `?`.
pub struct PoolGuard<'a, T: Recyclable> {
    pool: &'a mut ObjectPool<T>,
    handle: PoolHandle,
}

impl<T: Recyclable> PoolGuard<'_, T> {
    /// Returns the handle of the guarded object.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> PoolHandle {
        self.handle
    }
}

impl<T: Recyclable> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.pool.slots[self.handle.index()].value
    }
}

impl<T: Recyclable> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.pool.slots[self.handle.index()].value
    }
}

impl<T: Recyclable> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        // The guard holds the only borrow of the pool, so the handle is still in use.
        let _ = self.pool.release(self.handle);
    }
}
