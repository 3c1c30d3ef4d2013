#![deny(missing_docs)]
//! Fixed-capacity slot pools handing out move-only handles.
//!
//! A [`SlotPool`] owns a fixed array of reusable values. [`SlotPool::request`]
//! claims the first free slot, runs an initializer on it and returns a
//! [`Pooled`] handle. Dropping the handle calls [`Recycle::reset`] and makes the
//! slot claimable again. When every slot is held the pool answers `None`; the
//! pool never grows.
//!
//! Claims are a single compare-exchange per slot, so any number of threads may
//! request concurrently and the handle may be released from a different thread
//! than the one that claimed it.
//!
//! The `loom` feature swaps the claim flags and shared ownership for loom's
//! model-checked types; build with it only to run the model tests.

#[cfg(feature = "loom")]
use loom::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "loom")]
use loom::sync::Arc;
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
#[cfg(not(feature = "loom"))]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(feature = "loom"))]
use std::sync::Arc;

mod error;

pub use error::{PoolError, PoolResult};

/// Values that can live in a [`SlotPool`].
///
/// `Default` builds the idle value stored at construction; `reset` returns a
/// released value to an idle state while keeping any allocations it owns.
pub trait Recycle: Default + Send + 'static {
    /// Clears per-use state before the slot is handed out again.
    fn reset(&mut self);
}

struct Slot<T> {
    in_use: AtomicBool,
    value: UnsafeCell<T>,
}

struct Shared<T> {
    label: &'static str,
    slots: Box<[Slot<T>]>,
}

// SAFETY: a slot's value is only reachable through the single `Pooled` handle
// that won the `in_use` compare-exchange, so shared access to `Shared` never
// yields aliasing `&mut T`. Values move between threads with the handle, which
// requires `T: Send`.
unsafe impl<T: Send> Sync for Shared<T> {}

/// Fixed-capacity pool of reusable values.
pub struct SlotPool<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SlotPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Recycle> SlotPool<T> {
    /// Creates a pool with `capacity` idle slots.
    pub fn new(label: &'static str, capacity: usize) -> PoolResult<Self> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity { label });
        }
        let slots = (0..capacity)
            .map(|_| Slot {
                in_use: AtomicBool::new(false),
                value: UnsafeCell::new(T::default()),
            })
            .collect();
        Ok(Self {
            shared: Arc::new(Shared { label, slots }),
        })
    }

    /// Claims the first free slot and initializes it.
    ///
    /// Returns `None` when every slot is held.
    pub fn request(&self, init: impl FnOnce(&mut T)) -> Option<Pooled<T>> {
        let index = self.shared.slots.iter().position(|slot| {
            slot.in_use
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
        })?;
        // The handle exists before `init` runs so a panicking initializer
        // still releases the slot.
        let mut handle = Pooled {
            shared: Arc::clone(&self.shared),
            index,
            _marker: PhantomData,
        };
        init(&mut *handle);
        Some(handle)
    }

    /// Name the pool was created with.
    pub fn label(&self) -> &'static str {
        self.shared.label
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }

    /// Number of slots not currently held.
    pub fn available(&self) -> usize {
        self.shared
            .slots
            .iter()
            .filter(|slot| !slot.in_use.load(Ordering::Acquire))
            .count()
    }
}

impl<T> fmt::Debug for SlotPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("label", &self.shared.label)
            .field("capacity", &self.shared.slots.len())
            .finish()
    }
}

/// Exclusive handle to one claimed slot.
///
/// Move-only; dropping it resets the value and frees the slot.
pub struct Pooled<T: Recycle> {
    shared: Arc<Shared<T>>,
    index: usize,
    _marker: PhantomData<T>,
}

impl<T: Recycle> Pooled<T> {
    /// Index of the slot this handle holds.
    pub fn slot_index(&self) -> usize {
        self.index
    }

    /// Label of the owning pool.
    pub fn pool_label(&self) -> &'static str {
        self.shared.label
    }

    fn slot(&self) -> &Slot<T> {
        &self.shared.slots[self.index]
    }
}

impl<T: Recycle> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: this handle won the claim on `index` and is the only path to
        // the value until it drops.
        unsafe { &*self.slot().value.get() }
    }
}

impl<T: Recycle> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as in `deref`; `&mut self` rules out other borrows through
        // this handle.
        unsafe { &mut *self.slot().value.get() }
    }
}

impl<T: Recycle> Drop for Pooled<T> {
    fn drop(&mut self) {
        self.deref_mut().reset();
        self.slot().in_use.store(false, Ordering::Release);
    }
}

impl<T: Recycle + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("pool", &self.shared.label)
            .field("slot", &self.index)
            .field("value", &**self)
            .finish()
    }
}
