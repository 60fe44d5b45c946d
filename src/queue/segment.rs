//! Fixed-capacity circular buffer forming one link of a segment chain.

use std::ptr::NonNull;

/// One link of a segmented queue: a power-of-two ring of slots addressed
/// through a bitmask.
///
/// One slot is always left unoccupied so that full and empty are
/// distinguishable from the cursors alone: `top == bottom` means empty,
/// `(top + 1) & mask == bottom` means full. A segment of capacity N
/// therefore holds at most N - 1 items.
pub(crate) struct Segment<T> {
    slots: Box<[Option<T>]>,
    mask: usize,
    /// Write cursor: next slot a push occupies.
    top: usize,
    /// Read cursor: oldest occupied slot.
    bottom: usize,
    /// Link to the next (newer) segment. The owning queue allocates and
    /// frees chain nodes; a segment never frees its successor.
    pub(crate) next: Option<NonNull<Segment<T>>>,
}

impl<T> Segment<T> {
    /// `capacity` must be a power of two, at least 2.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two() && capacity >= 2);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            mask: capacity - 1,
            top: 0,
            bottom: 0,
            next: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.mask + 1
    }

    pub(crate) fn len(&self) -> usize {
        self.top.wrapping_sub(self.bottom) & self.mask
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.top == self.bottom
    }

    pub(crate) fn is_full(&self) -> bool {
        (self.top + 1) & self.mask == self.bottom
    }

    /// Caller must check `is_full` first; a full segment never accepts a push.
    pub(crate) fn push(&mut self, item: T) {
        debug_assert!(!self.is_full());
        self.slots[self.top] = Some(item);
        self.top = (self.top + 1) & self.mask;
    }

    /// Remove and return the oldest item, clearing its slot so drained
    /// values are not retained by the buffer.
    pub(crate) fn shift(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.bottom].take();
        debug_assert!(item.is_some());
        self.bottom = (self.bottom + 1) & self.mask;
        item
    }

    pub(crate) fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.bottom].as_ref()
        }
    }

    /// Halve the backing array, compacting live items to the front.
    ///
    /// Caller must ensure the occupancy fits the smaller ring with its one
    /// wasted slot, i.e. `len() < capacity() / 2`.
    pub(crate) fn shrink(&mut self) {
        let new_capacity = self.capacity() / 2;
        debug_assert!(new_capacity >= 2 && self.len() < new_capacity);
        let len = self.len();
        let mut slots: Box<[Option<T>]> = (0..new_capacity).map(|_| None).collect();
        for (i, slot) in slots.iter_mut().enumerate().take(len) {
            *slot = self.slots[(self.bottom + i) & self.mask].take();
        }
        self.slots = slots;
        self.mask = new_capacity - 1;
        self.bottom = 0;
        self.top = len;
    }
}
