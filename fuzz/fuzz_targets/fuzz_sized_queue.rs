//! Fuzz target for the size-accounted queue.
//!
//! Arbitrary f64 sizes include NaN, infinities and negatives, so the
//! validation path is constantly exercised. Accepted records are mirrored
//! in a reference model; contents must agree and the running total must
//! stay non-negative and non-NaN.

#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tick_core::SizedQueue;

#[derive(Arbitrary, Debug)]
enum Op {
    Enqueue { value: u8, size: f64 },
    Dequeue,
    Peek,
    Reset,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut queue = SizedQueue::with_segment_capacity(8);
    let mut model: VecDeque<(u8, f64)> = VecDeque::new();

    for op in ops {
        match op {
            Op::Enqueue { value, size } => {
                let accepted = queue.enqueue(value, size).is_ok();
                let valid = size.is_finite() && size >= 0.0;
                assert_eq!(accepted, valid);
                if accepted {
                    model.push_back((value, size));
                }
            }
            Op::Dequeue => {
                let expected = model.pop_front().map(|(value, _)| value);
                assert_eq!(queue.dequeue(), expected);
            }
            Op::Peek => {
                let expected = model.front().map(|(value, _)| value);
                assert_eq!(queue.peek().copied(), expected);
            }
            Op::Reset => {
                queue.reset();
                model.clear();
            }
        }

        assert_eq!(queue.len(), model.len());
        assert_eq!(queue.is_empty(), model.is_empty());
        // Accepted sizes are finite and non-negative, so the running
        // total can saturate to +inf under extreme inputs but must never
        // be negative or NaN.
        let total = queue.total_size();
        assert!(total >= 0.0);
        assert!(!total.is_nan());
    }
});
