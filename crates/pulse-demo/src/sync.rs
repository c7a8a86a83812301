//! In-process shared value.
//!
//! Stands in for a collaboration container's shared mutable value: every replica
//! observes the latest write, and each write bumps a version. Transport, conflict
//! resolution and persistence belong to the real collaboration layer and are not
//! modeled here.

use std::cell::RefCell;
use std::rc::Rc;

struct Slot<T> {
    value: T,
    version: u64,
}

/// Handle to a shared value. Clones are replicas of the same value.
pub struct SharedValue<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self { slot: Rc::clone(&self.slot) }
    }
}

impl<T: Clone> SharedValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot { value: initial, version: 0 })),
        }
    }

    /// Another handle onto the same value, as a second client would hold.
    pub fn replica(&self) -> Self {
        self.clone()
    }

    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    pub fn set(&self, value: T) {
        let mut slot = self.slot.borrow_mut();
        slot.value = value;
        slot.version += 1;
    }

    /// Read-modify-write as a single version bump.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        let mut slot = self.slot.borrow_mut();
        f(&mut slot.value);
        slot.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }
}
