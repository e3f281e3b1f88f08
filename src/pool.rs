//! Fixed-capacity object-pool recycling (§3 Pools, §4.7).
//!
//! All three pools the spec names — SlotBufferPool, StackFramePool,
//! RefHandlePool — follow the identical contract: preallocate `capacity`
//! elements up front, `obtain` linear-scans for the first one with
//! `use == 0`, flips it to in-use and hands out its index; `recycle` clears
//! the flag. Capacity never grows; exhaustion is reported rather than
//! silently reallocated, since the pools exist precisely to bound
//! per-call allocation.

use crate::errors::{RuntimeStackCause, RuntimeStackError};

/// An element a [`Pool`] can track occupancy for.
pub trait Pooled {
    fn in_use(&self) -> bool;
    fn set_in_use(&mut self, in_use: bool);
}

pub struct Pool<T> {
    elements: Vec<T>,
}

impl<T: Pooled> Pool<T> {
    pub fn new(capacity: usize, make: impl Fn() -> T) -> Pool<T> {
        Pool {
            elements: (0..capacity).map(|_| make()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Returns the index of the first free element, marking it in-use.
    pub fn obtain(&mut self) -> Result<usize, RuntimeStackError> {
        let capacity = self.elements.len();
        let slot = self
            .elements
            .iter()
            .position(|e| !e.in_use())
            .ok_or(RuntimeStackError(RuntimeStackCause::PoolExhausted(capacity)))?;
        self.elements[slot].set_in_use(true);
        Ok(slot)
    }

    pub fn get(&self, index: usize) -> &T {
        &self.elements[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.elements[index]
    }

    pub fn recycle(&mut self, index: usize) {
        self.elements[index].set_in_use(false);
    }

    pub fn free_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.in_use()).count()
    }
}

impl Pooled for crate::slot::SlotBuffer {
    fn in_use(&self) -> bool {
        self.in_use
    }

    fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }
}

impl Pooled for crate::frame::StackFrame {
    fn in_use(&self) -> bool {
        self.in_use
    }

    fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
        if !in_use {
            self.clear();
        }
    }
}

/// An opaque handle into the heap, recycled the same way slots and frames
/// are. The heap itself is an external collaborator (§1 Non-goals: no GC
/// here); this just tracks which handle slots are live.
#[derive(Debug, Default)]
pub struct RefHandle {
    pub target: u64,
    pub in_use: bool,
}

impl Pooled for RefHandle {
    fn in_use(&self) -> bool {
        self.in_use
    }

    fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }
}

pub type SlotBufferPool = Pool<crate::slot::SlotBuffer>;
pub type StackFramePool = Pool<crate::frame::StackFrame>;
pub type RefHandlePool = Pool<RefHandle>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::StackFrame;

    #[test]
    fn obtain_recycle_loop_leaves_the_same_free_set() {
        let mut pool: StackFramePool = Pool::new(4, || StackFrame::new(8, 8));
        let before = pool.free_count();
        for _ in 0..10 {
            let idx = pool.obtain().unwrap();
            pool.recycle(idx);
        }
        assert_eq!(pool.free_count(), before);
    }

    #[test]
    fn exhaustion_reports_pool_exhausted() {
        let mut pool: StackFramePool = Pool::new(1, || StackFrame::new(8, 8));
        let first = pool.obtain();
        assert!(first.is_ok());
        let second = pool.obtain();
        assert!(second.is_err());
    }

    #[test]
    fn recycling_a_frame_clears_its_pc() {
        let mut pool: StackFramePool = Pool::new(1, || StackFrame::new(8, 8));
        let idx = pool.obtain().unwrap();
        pool.get_mut(idx).bind(3);
        pool.recycle(idx);
        assert_eq!(pool.get(idx).pc, -1);
    }
}
