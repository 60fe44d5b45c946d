//! Fuzz target for the segmented queue.
//!
//! Replays an arbitrary operation sequence against both the queue and a
//! `VecDeque` reference model; any divergence in contents, length or
//! emptiness is a bug, as is any panic.

#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tick_core::SegmentedQueue;

#[derive(Arbitrary, Debug)]
enum Op {
    Push(u16),
    Shift,
    Peek,
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Plan {
    capacity_exp: u8,
    ops: Vec<Op>,
}

fuzz_target!(|plan: Plan| {
    // Capacities 1..=128 before the queue's own clamp so the rounding
    // path gets exercised too.
    let capacity = 1usize << (plan.capacity_exp % 8);
    let mut queue = SegmentedQueue::with_segment_capacity(capacity);
    let mut model: VecDeque<u16> = VecDeque::new();

    for op in plan.ops {
        match op {
            Op::Push(value) => {
                queue.push(value);
                model.push_back(value);
            }
            Op::Shift => assert_eq!(queue.shift(), model.pop_front()),
            Op::Peek => assert_eq!(queue.peek(), model.front()),
            Op::Clear => {
                queue.clear();
                model.clear();
            }
        }
        assert_eq!(queue.len(), model.len());
        assert_eq!(queue.is_empty(), model.is_empty());
    }

    // Drain whatever is left and confirm full agreement.
    while let Some(expected) = model.pop_front() {
        assert_eq!(queue.shift(), Some(expected));
    }
    assert_eq!(queue.shift(), None);
});
