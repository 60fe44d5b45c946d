//! Segmented queue push/shift throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tick_core::{SegmentedQueue, SizedQueue};

fn bench_push_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_then_drain");

    for (name, items) in [("small", 1_000u64), ("medium", 50_000), ("large", 500_000)] {
        group.throughput(Throughput::Elements(items));
        group.bench_with_input(BenchmarkId::new("items", name), &items, |b, &n| {
            b.iter(|| {
                let mut queue = SegmentedQueue::new();
                for i in 0..n {
                    queue.push(black_box(i));
                }
                while let Some(item) = queue.shift() {
                    black_box(item);
                }
            })
        });
    }

    group.finish();
}

fn bench_segment_rollover(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_rollover");

    // Tiny segments make every few pushes cross a boundary, isolating the
    // cost of the allocate-link-release path.
    for (name, capacity) in [("cap_8", 8usize), ("cap_64", 64), ("cap_2048", 2048)] {
        let items = 100_000u64;
        group.throughput(Throughput::Elements(items));
        group.bench_with_input(BenchmarkId::new("capacity", name), &capacity, |b, &cap| {
            b.iter(|| {
                let mut queue = SegmentedQueue::with_segment_capacity(cap);
                for i in 0..items {
                    queue.push(black_box(i));
                }
                while let Some(item) = queue.shift() {
                    black_box(item);
                }
            })
        });
    }

    group.finish();
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state");

    let items = 100_000u64;
    group.throughput(Throughput::Elements(items));
    group.bench_function("push_shift_interleaved", |b| {
        b.iter(|| {
            let mut queue = SegmentedQueue::new();
            // Keep a small working set so the same segment cycles.
            for i in 0..items {
                queue.push(black_box(i));
                if i % 4 == 3 {
                    for _ in 0..4 {
                        black_box(queue.shift());
                    }
                }
            }
            while let Some(item) = queue.shift() {
                black_box(item);
            }
        })
    });

    group.finish();
}

fn bench_sized_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("sized_queue");

    let items = 100_000u64;
    group.throughput(Throughput::Elements(items));
    group.bench_function("enqueue_dequeue", |b| {
        b.iter(|| {
            let mut queue = SizedQueue::new();
            for i in 0..items {
                queue
                    .enqueue(black_box(i), black_box((i % 16) as f64))
                    .unwrap();
            }
            while let Some(value) = queue.dequeue() {
                black_box(value);
            }
            black_box(queue.total_size());
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_push_then_drain,
    bench_segment_rollover,
    bench_steady_state,
    bench_sized_queue
);
criterion_main!(benches);
