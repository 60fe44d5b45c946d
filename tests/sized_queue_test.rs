//! Integration tests for the size-accounted value queue.

use tick_core::{SizedQueue, SizedQueueError};

// =============================================================================
// FIFO and Size Accounting Tests
// =============================================================================

#[test]
fn values_come_back_in_order_with_a_running_total() {
    let mut queue = SizedQueue::new();
    queue.enqueue("a", 10.0).unwrap();
    queue.enqueue("b", 5.5).unwrap();
    queue.enqueue("c", 0.5).unwrap();
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.total_size(), 16.0);

    assert_eq!(queue.dequeue(), Some("a"));
    assert_eq!(queue.total_size(), 6.0);
    assert_eq!(queue.dequeue(), Some("b"));
    assert_eq!(queue.dequeue(), Some("c"));
    assert_eq!(queue.total_size(), 0.0);
    assert_eq!(queue.dequeue(), None);
    assert!(queue.is_empty());
}

#[test]
fn zero_sized_records_are_fine() {
    let mut queue = SizedQueue::new();
    queue.enqueue(1, 0.0).unwrap();
    queue.enqueue(2, 0.0).unwrap();
    assert_eq!(queue.total_size(), 0.0);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dequeue(), Some(1));
    assert_eq!(queue.total_size(), 0.0);
}

#[test]
fn negative_zero_counts_as_zero() {
    let mut queue = SizedQueue::new();
    queue.enqueue("x", -0.0).unwrap();
    assert_eq!(queue.total_size(), 0.0);
    assert_eq!(queue.dequeue(), Some("x"));
    assert_eq!(queue.total_size(), 0.0);
}

#[test]
fn peek_leaves_the_record_in_place() {
    let mut queue = SizedQueue::new();
    assert_eq!(queue.peek(), None);
    queue.enqueue("front", 2.0).unwrap();
    queue.enqueue("back", 3.0).unwrap();
    assert_eq!(queue.peek(), Some(&"front"));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.total_size(), 5.0);
}

// =============================================================================
// Size Validation Tests
// =============================================================================

#[test]
fn invalid_sizes_are_rejected_up_front() {
    let mut queue = SizedQueue::new();
    for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = queue.enqueue("value", bad);
        assert!(matches!(
            result,
            Err(SizedQueueError::InvalidSize { .. })
        ));
    }
    // Nothing was stored; the queue still works normally.
    assert!(queue.is_empty());
    assert_eq!(queue.total_size(), 0.0);
    queue.enqueue("value", 1.0).unwrap();
    assert_eq!(queue.len(), 1);
}

#[test]
fn invalid_size_error_reports_the_offending_value() {
    let mut queue: SizedQueue<&str> = SizedQueue::new();
    let error = queue.enqueue("v", -2.5).unwrap_err();
    assert!(error.to_string().contains("-2.5"));
    assert!(error.to_string().contains("invalid size"));
}

// =============================================================================
// Float Drift Tests
// =============================================================================

#[test]
fn total_never_goes_negative_from_float_drift() {
    // 0.3 + 0.6 sums to just under 0.9 in f64, so subtracting both sizes
    // back out lands a hair below zero without the clamp.
    let mut queue = SizedQueue::new();
    queue.enqueue("a", 0.3).unwrap();
    queue.enqueue("b", 0.6).unwrap();
    assert_eq!(queue.dequeue(), Some("a"));
    assert!(queue.total_size() > 0.0);
    assert_eq!(queue.dequeue(), Some("b"));
    assert_eq!(queue.total_size(), 0.0);
}

#[test]
fn drift_clamp_does_not_mask_real_sizes() {
    let mut queue = SizedQueue::new();
    for i in 0..100 {
        queue.enqueue(i, 0.1).unwrap();
    }
    for _ in 0..50 {
        queue.dequeue();
    }
    // Half the records remain; the total is still close to 5.0.
    assert!((queue.total_size() - 5.0).abs() < 1e-9);
}

// =============================================================================
// Reset Tests
// =============================================================================

#[test]
fn reset_discards_records_and_zeroes_the_total() {
    let mut queue = SizedQueue::new();
    for i in 0..20 {
        queue.enqueue(i, 1.5).unwrap();
    }
    assert_eq!(queue.total_size(), 30.0);
    queue.reset();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.total_size(), 0.0);
    assert_eq!(queue.peek(), None);

    queue.enqueue(99, 2.0).unwrap();
    assert_eq!(queue.dequeue(), Some(99));
}

#[test]
fn reset_on_an_empty_queue_is_harmless() {
    let mut queue: SizedQueue<u8> = SizedQueue::new();
    queue.reset();
    assert!(queue.is_empty());
    assert_eq!(queue.total_size(), 0.0);
}

// =============================================================================
// Backing Storage Tests
// =============================================================================

#[test]
fn records_roll_across_segments_like_any_other_item() {
    let mut queue = SizedQueue::with_segment_capacity(4);
    for i in 0..30 {
        queue.enqueue(i, 1.0).unwrap();
    }
    assert_eq!(queue.total_size(), 30.0);
    for i in 0..30 {
        assert_eq!(queue.dequeue(), Some(i));
    }
    assert_eq!(queue.total_size(), 0.0);
}
