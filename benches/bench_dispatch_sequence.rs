// benches/bench_dispatch_sequence.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use junction_signals::{DispatchSequence, JunctionType, LaneRing, SignalAllocator};
use std::time::Duration;

// Snapshots that exercise the insertion paths: all ties, strictly ascending
// counts (every lane goes to the front) and simultaneous emergencies.
fn scenarios() -> Vec<(&'static str, Vec<(i64, i64)>)> {
    vec![
        ("all_equal", vec![(5, 0), (5, 0), (5, 0), (5, 0)]),
        ("ascending", vec![(1, 0), (2, 0), (3, 0), (4, 0)]),
        ("two_emergencies", vec![(9, 0), (2, 1), (7, 0), (3, 1)]),
    ]
}

fn bench_dispatch_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_sequence");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(3));

    for (name, snapshot) in scenarios() {
        let mut ring = LaneRing::create(JunctionType::PlusJunction).expect("ring");
        for (idx, (count, emergency)) in snapshot.iter().enumerate() {
            ring.populate(idx as u32 + 1, *count, *emergency)
                .expect("valid snapshot");
        }
        // Priorities are only set once a cycle has run.
        SignalAllocator::default().run_cycle(&mut ring);

        group.bench_function(name, |b| {
            b.iter(|| black_box(DispatchSequence::from_ring(black_box(&ring))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch_sequence);
criterion_main!(benches);
