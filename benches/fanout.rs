use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use valuegroups::{GroupRegistry, ValueHandle};

fn make_registry(groups: usize, observers_per_group: usize) -> (GroupRegistry, ValueHandle, Rc<Cell<u64>>) {
    let registry = GroupRegistry::new();
    let handle = ValueHandle::new("bench.value");
    let hits = Rc::new(Cell::new(0u64));

    for g in 0..groups {
        let group = format!("group-{g}");
        registry.add_value(&handle, &group);
        for _ in 0..observers_per_group {
            let hits = Rc::clone(&hits);
            // Tokens are dropped on purpose; observers stay registered.
            let _ = registry.observe_changes(&group, move |_, _| hits.set(hits.get() + 1));
        }
    }

    (registry, handle, hits)
}

fn bench_value_changed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout/value_changed");

    for (groups, observers) in [(1, 1), (2, 16), (8, 64)] {
        let (registry, handle, hits) = make_registry(groups, observers);
        group.throughput(Throughput::Elements((groups * observers) as u64));
        group.bench_function(format!("{groups}x{observers}"), |b| {
            b.iter(|| registry.value_changed(black_box(&handle)));
        });
        black_box(hits.get());
    }

    group.finish();
}

fn bench_add_value(c: &mut Criterion) {
    c.bench_function("fanout/add_value_1k", |b| {
        b.iter(|| {
            let registry = GroupRegistry::new();
            for i in 0..1_000 {
                registry.add_value(&ValueHandle::new(format!("key-{i}")), "G");
            }
            black_box(registry.values_in_group("G").map(|v| v.len()))
        });
    });
}

criterion_group!(benches, bench_value_changed, bench_add_value);
criterion_main!(benches);
