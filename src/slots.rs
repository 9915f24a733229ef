//! Shared result slots for the symmetric strategies.
//!
//! Each point index owns a nearest cell, a furthest cell and a lock. The cells are
//! stored as `f64` bit patterns in `AtomicU64`s so that they can be read without the
//! lock; every write happens with the index's lock held.
//!
//! A cell only ever moves towards a more extreme value (nearest down, furthest up),
//! so a stale unlocked read can only under-report how converged a slot is. That makes
//! the unlocked read safe to use as a filter: it may cause a needless lock, but it can
//! never hide an update that the locked comparison would have accepted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::ScanError;

#[derive(Debug)]
#[repr(transparent)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    #[inline]
    fn new(val: f64) -> Self {
        AtomicF64(AtomicU64::new(val.to_bits()))
    }

    #[inline]
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, val: f64) {
        self.0.store(val.to_bits(), Ordering::Relaxed)
    }

    #[inline]
    fn into_inner(self) -> f64 {
        f64::from_bits(self.0.into_inner())
    }
}

#[derive(Debug)]
pub(crate) struct Slots {
    nearest: Vec<AtomicF64>,
    furthest: Vec<AtomicF64>,
    locks: Vec<Mutex<()>>,
}

impl Slots {
    /// Allocates `len` slots seeded to `(+inf, -inf)`, each with its own lock.
    pub(crate) fn new(len: usize) -> Result<Self, ScanError> {
        let mut nearest = Vec::new();
        let mut furthest = Vec::new();
        let mut locks = Vec::new();
        nearest.try_reserve_exact(len)?;
        furthest.try_reserve_exact(len)?;
        locks.try_reserve_exact(len)?;

        nearest.extend((0..len).map(|_| AtomicF64::new(f64::INFINITY)));
        furthest.extend((0..len).map(|_| AtomicF64::new(f64::NEG_INFINITY)));
        locks.extend((0..len).map(|_| Mutex::new(())));

        Ok(Slots {
            nearest,
            furthest,
            locks,
        })
    }

    /// Takes `idx`'s lock and folds `near`/`far` into its slot.
    #[inline]
    pub(crate) fn merge_locked(&self, idx: usize, near: f64, far: f64) {
        // The guarded data is `()`, so a poisoned lock has nothing left inconsistent.
        let _guard = self.locks[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.improve(idx, near, far);
    }

    /// Reads `idx`'s slot without the lock, and only takes the lock if `near`/`far`
    /// look like they could improve it. The comparison is repeated under the lock.
    ///
    /// Returns whether the lock was taken.
    #[inline]
    pub(crate) fn merge_speculative(&self, idx: usize, near: f64, far: f64) -> bool {
        if near < self.nearest[idx].load() || far > self.furthest[idx].load() {
            self.merge_locked(idx, near, far);
            true
        } else {
            false
        }
    }

    #[inline]
    fn improve(&self, idx: usize, near: f64, far: f64) {
        if near < self.nearest[idx].load() {
            self.nearest[idx].store(near);
        }
        if far > self.furthest[idx].load() {
            self.furthest[idx].store(far);
        }
    }

    /// Releases the locks and hands back the plain nearest/furthest arrays.
    pub(crate) fn into_arrays(self) -> (Vec<f64>, Vec<f64>) {
        let Slots {
            nearest,
            furthest,
            locks,
        } = self;
        drop(locks);

        (
            nearest.into_iter().map(AtomicF64::into_inner).collect(),
            furthest.into_iter().map(AtomicF64::into_inner).collect(),
        )
    }
}
