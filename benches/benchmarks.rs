use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use std::hint::black_box;
use std::sync::Arc;

use tincan_connect::{
    connect, should_update, structurally_equal, view, Cycle, Mount, Store, WithStore,
};

#[derive(Clone, Serialize)]
struct State {
    counter: usize,
    name: String,
}

fn state_store() -> Store<State> {
    Store::new(State {
        counter: 0,
        name: "test".to_string(),
    })
}

fn binder_mount_benchmark(c: &mut Criterion) {
    let store = state_store();

    c.bench_function("binder_mount_unmount", |b| {
        b.iter(|| {
            let label = view(|p: &WithStore<(), State>| p.store.counter);
            let mount = Mount::new(connect(store.clone(), label).unwrap(), ());
            black_box(mount.unmount().unwrap());
        });
    });
}

fn suppressed_event_benchmark(c: &mut Criterion) {
    let store = state_store();
    let label = view(|p: &WithStore<(), State>| p.store.counter);
    let mut mount = Mount::new(connect(store.clone(), label).unwrap(), ());

    c.bench_function("suppressed_event", |b| {
        b.iter(|| {
            store.update("name", |_| {}).unwrap();
            black_box(mount.flush());
        });
    });
}

fn update_and_render_benchmark(c: &mut Criterion) {
    let store = state_store();
    let label = view(|p: &WithStore<(), State>| p.store.counter);
    let mut mount = Mount::new(connect(store.clone(), label).unwrap(), ());

    c.bench_function("update_and_render", |b| {
        let mut i = 1;
        b.iter(|| {
            store.update("counter", |state| state.counter = black_box(i)).unwrap();
            assert_eq!(mount.flush(), Cycle::Rendered);
            i += 1;
        });
    });
}

fn gate_benchmark(c: &mut Criterion) {
    let old = Arc::new(1_u64);
    let new = Arc::new(1_u64);
    let props = ("title".to_string(), 7_u32, Arc::new(vec![1, 2, 3]));

    c.bench_function("update_gate", |b| {
        b.iter(|| black_box(should_update(&old, &new, &props, &props)));
    });
}

fn structural_equality_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural_equality");

    for size in [1, 10, 100].iter() {
        let value = serde_json::json!({
            "items": (0..*size).map(|i| serde_json::json!({"id": i, "tags": ["a", "b"]})).collect::<Vec<_>>(),
        });
        let copy = value.clone();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(structurally_equal(&value, &copy)));
        });
    }
    group.finish();
}

fn fan_out_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("binder_fan_out");

    for binder_count in [1, 10, 100].iter() {
        let store = state_store();
        let mut mounts: Vec<_> = (0..*binder_count)
            .map(|_| {
                let label = view(|p: &WithStore<(), State>| p.store.counter);
                Mount::new(connect(store.clone(), label).unwrap(), ())
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(binder_count),
            binder_count,
            |b, _| {
                let mut i = 1;
                b.iter(|| {
                    store.update("counter", |state| state.counter = black_box(i)).unwrap();
                    for mount in mounts.iter_mut() {
                        black_box(mount.flush());
                    }
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    binder_mount_benchmark,
    suppressed_event_benchmark,
    update_and_render_benchmark,
    gate_benchmark,
    structural_equality_benchmark,
    fan_out_benchmark,
);
criterion_main!(benches);
