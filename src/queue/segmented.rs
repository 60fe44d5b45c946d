//! Unbounded FIFO built from a chain of fixed-capacity ring segments.
//!
//! Pushes land in the newest segment (`head`) and allocate a fresh one on
//! overflow; shifts drain the oldest (`tail`) and free it once exhausted.
//! The chain keeps two structural invariants: whenever `head != tail` the
//! head holds at least one item, so emptiness is answered by looking at
//! the head alone, and every segment is reachable from `tail` via `next`
//! links with `head` as the last node.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::segment::Segment;

/// Default slot count for freshly allocated segments.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 2048;

/// Backing arrays at or below this size are never shrunk.
const SHRINK_CAPACITY_FLOOR: usize = 1024;

/// Unbounded FIFO over a linked chain of ring-buffer segments.
///
/// Single-threaded by design: no locks, no atomics. `push`, `shift` and
/// `peek` are O(1); segment allocation and release amortize across the
/// pushes that fill a segment.
pub struct SegmentedQueue<T> {
    /// Oldest segment, the read end. Start of the chain.
    tail: NonNull<Segment<T>>,
    /// Newest segment, the write end. Last node of the chain, reachable
    /// from `tail` via `next` links.
    head: NonNull<Segment<T>>,
    len: usize,
    segment_capacity: usize,
    _owns: PhantomData<Box<Segment<T>>>,
}

// SAFETY: the queue is the sole owner of every segment in its chain and
// hands out no pointers that outlive a borrow of the queue, so sending it
// to another thread moves that ownership wholesale.
unsafe impl<T: Send> Send for SegmentedQueue<T> {}

impl<T> SegmentedQueue<T> {
    /// Create a queue with [`DEFAULT_SEGMENT_CAPACITY`] slots per segment.
    pub fn new() -> Self {
        Self::with_segment_capacity(DEFAULT_SEGMENT_CAPACITY)
    }

    /// Create a queue whose segments hold `segment_capacity` slots.
    ///
    /// The value is clamped to a sane range and rounded up to a power of
    /// two; one slot per segment stays unoccupied, so segments of capacity
    /// N hold N - 1 items each.
    pub fn with_segment_capacity(segment_capacity: usize) -> Self {
        let capacity = segment_capacity.clamp(4, 1 << 20).next_power_of_two();
        let first = Self::alloc_segment(capacity);
        Self {
            tail: first,
            head: first,
            len: 0,
            segment_capacity: capacity,
            _owns: PhantomData,
        }
    }

    fn alloc_segment(capacity: usize) -> NonNull<Segment<T>> {
        NonNull::from(Box::leak(Box::new(Segment::new(capacity))))
    }

    /// Slots per freshly allocated segment.
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    fn head_ref(&self) -> &Segment<T> {
        // SAFETY: `head` always points to a live segment owned by this
        // queue; the shared borrow of `self` keeps it alive and unaliased.
        unsafe { self.head.as_ref() }
    }

    fn head_mut(&mut self) -> &mut Segment<T> {
        // SAFETY: as above, with `&mut self` granting exclusive access.
        unsafe { self.head.as_mut() }
    }

    fn tail_ref(&self) -> &Segment<T> {
        // SAFETY: `tail` always points to a live segment owned by this
        // queue; the shared borrow of `self` keeps it alive and unaliased.
        unsafe { self.tail.as_ref() }
    }

    fn tail_mut(&mut self) -> &mut Segment<T> {
        // SAFETY: as above, with `&mut self` granting exclusive access.
        unsafe { self.tail.as_mut() }
    }

    /// Append an item at the write end.
    ///
    /// When the head segment is full, a fresh segment is linked in and the
    /// item lands there in the same call, so a new head never sits empty.
    pub fn push(&mut self, item: T) {
        if self.head_ref().is_full() {
            let fresh = Self::alloc_segment(self.segment_capacity);
            self.head_mut().next = Some(fresh);
            self.head = fresh;
        }
        self.head_mut().push(item);
        self.len += 1;
    }

    /// Remove and return the oldest item, or `None` when the queue is
    /// empty.
    pub fn shift(&mut self) -> Option<T> {
        let item = self.tail_mut().shift()?;
        self.len -= 1;
        if self.tail_ref().is_empty() {
            if let Some(next) = self.tail_ref().next {
                // The drained tail is unlinked and freed. A tail with a
                // successor is never the head, so `head` stays valid.
                let old = self.tail;
                self.tail = next;
                // SAFETY: `old` came from `alloc_segment` and is no longer
                // reachable from the chain; this is its only owner.
                drop(unsafe { Box::from_raw(old.as_ptr()) });
            }
        }
        self.maybe_shrink_tail();
        Some(item)
    }

    /// Oldest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.tail_ref().peek()
    }

    /// Whether the queue holds no items.
    ///
    /// Only the head is consulted: a head distinct from the tail always
    /// holds at least one item, so an empty head implies an empty queue.
    pub fn is_empty(&self) -> bool {
        self.head_ref().is_empty()
    }

    /// Total queued items across all segments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of linked segments. O(segments); intended for diagnostics
    /// and tests, not hot paths.
    pub fn segment_count(&self) -> usize {
        let mut count = 1;
        let mut cursor = self.tail_ref();
        while let Some(next) = cursor.next {
            // SAFETY: chain links only ever point at live queue-owned
            // segments.
            cursor = unsafe { next.as_ref() };
            count += 1;
        }
        count
    }

    /// Drop every queued item and return to a single empty segment of the
    /// configured capacity.
    pub fn clear(&mut self) {
        self.release_chain();
        let fresh = Self::alloc_segment(self.segment_capacity);
        self.tail = fresh;
        self.head = fresh;
        self.len = 0;
    }

    /// Halve the tail's backing array when it has drained far below its
    /// capacity. Large bursts would otherwise pin their peak allocation
    /// for the queue's whole lifetime.
    fn maybe_shrink_tail(&mut self) {
        let tail = self.tail_mut();
        let capacity = tail.capacity();
        if capacity > SHRINK_CAPACITY_FLOOR && tail.len() <= capacity / 4 {
            tail.shrink();
        }
    }

    /// Free every segment in the chain, iteratively so that arbitrarily
    /// long chains cannot overflow the stack. Leaves `tail` and `head`
    /// dangling; callers must reinitialize them or drop `self`.
    fn release_chain(&mut self) {
        let mut cursor = Some(self.tail);
        while let Some(segment) = cursor {
            // SAFETY: every chain node came from `alloc_segment` and is
            // owned solely by this queue; each is freed exactly once here.
            let boxed = unsafe { Box::from_raw(segment.as_ptr()) };
            cursor = boxed.next;
        }
    }

    /// Structural self-check for debug assertions and tests: the chain
    /// ends at `head`, a head distinct from the tail is non-empty, and the
    /// cached length matches the per-segment sum.
    pub(crate) fn check_invariants(&self) -> bool {
        let mut total = 0;
        let mut cursor = self.tail_ref();
        loop {
            total += cursor.len();
            match cursor.next {
                // SAFETY: chain links only ever point at live queue-owned
                // segments.
                Some(next) => cursor = unsafe { next.as_ref() },
                None => break,
            }
        }
        let ends_at_head = std::ptr::eq(cursor, self.head.as_ptr());
        let head_nonempty_rule = self.tail == self.head || !self.head_ref().is_empty();
        ends_at_head && head_nonempty_rule && total == self.len
    }
}

impl<T> Drop for SegmentedQueue<T> {
    fn drop(&mut self) {
        self.release_chain();
    }
}

impl<T> Default for SegmentedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SegmentedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedQueue")
            .field("len", &self.len)
            .field("segments", &self.segment_count())
            .field("segment_capacity", &self.segment_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_links_a_new_segment() {
        let mut queue = SegmentedQueue::with_segment_capacity(4);
        for i in 0..3 {
            queue.push(i);
        }
        assert_eq!(queue.segment_count(), 1);
        queue.push(3);
        assert_eq!(queue.segment_count(), 2);
        assert!(queue.check_invariants());
    }

    #[test]
    fn drained_tail_is_released() {
        let mut queue = SegmentedQueue::with_segment_capacity(4);
        for i in 0..6 {
            queue.push(i);
        }
        assert_eq!(queue.segment_count(), 2);
        for _ in 0..3 {
            queue.shift();
        }
        // Third shift empties the old tail; the chain contracts.
        assert_eq!(queue.segment_count(), 1);
        assert!(queue.check_invariants());
    }

    #[test]
    fn invariants_hold_across_mixed_operations() {
        let mut queue = SegmentedQueue::with_segment_capacity(4);
        for round in 0..50 {
            queue.push(round * 2);
            queue.push(round * 2 + 1);
            queue.shift();
            assert!(queue.check_invariants());
        }
        while queue.shift().is_some() {
            assert!(queue.check_invariants());
        }
        assert!(queue.is_empty());
        assert_eq!(queue.segment_count(), 1);
    }

    #[test]
    fn clear_resets_to_one_empty_segment() {
        let mut queue = SegmentedQueue::with_segment_capacity(4);
        for i in 0..20 {
            queue.push(i);
        }
        assert!(queue.segment_count() > 1);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.segment_count(), 1);
        assert_eq!(queue.shift(), None);
        queue.push(99);
        assert_eq!(queue.shift(), Some(99));
        assert!(queue.check_invariants());
    }

    #[test]
    fn capacity_is_clamped_and_rounded() {
        let queue: SegmentedQueue<u8> = SegmentedQueue::with_segment_capacity(0);
        assert_eq!(queue.segment_capacity(), 4);
        let queue: SegmentedQueue<u8> = SegmentedQueue::with_segment_capacity(5);
        assert_eq!(queue.segment_capacity(), 8);
        let queue: SegmentedQueue<u8> = SegmentedQueue::with_segment_capacity(2048);
        assert_eq!(queue.segment_capacity(), 2048);
    }

    #[test]
    fn long_chain_drops_without_recursion() {
        let mut queue = SegmentedQueue::with_segment_capacity(4);
        // Thousands of segments; Drop must walk them iteratively.
        for i in 0..30_000 {
            queue.push(i);
        }
        assert!(queue.segment_count() > 9_000);
        drop(queue);
    }

    #[test]
    fn drained_large_segment_gives_memory_back() {
        let mut queue = SegmentedQueue::with_segment_capacity(4096);
        for i in 0..4000 {
            queue.push(i);
        }
        for i in 0..3900 {
            assert_eq!(queue.shift(), Some(i));
        }
        // Occupancy 100 out of 4096; the backing array must have shrunk.
        assert!(queue.tail_ref().capacity() < 4096);
        for i in 3900..4000 {
            assert_eq!(queue.shift(), Some(i));
        }
        assert!(queue.check_invariants());
    }
}
