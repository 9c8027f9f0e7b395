use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;

use foodhub_kv::{KVStore, MemoryStore, RedbStore};

const DATE_PREFIX: &str = "meal:preference:2026-10-20:";

fn populate(store: &dyn KVStore, n: usize) {
    for i in 0..n {
        let key = format!("{DATE_PREFIX}CSE:{}:student_{:04}", i % 4 + 1, i);
        store.set(&key, br#"{"choice":"EGG"}"#).unwrap();
    }
    // Neighbouring day, must not show up in the scan.
    for i in 0..n {
        let key = format!("meal:preference:2026-10-21:CSE:1:student_{:04}", i);
        store.set(&key, br#"{"choice":"VEG"}"#).unwrap();
    }
}

fn bench_redb_upsert(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    c.bench_function("redb_upsert", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("{DATE_PREFIX}ECE:2:student_{}", i % 500);
            store.set(black_box(&key), black_box(br#"{"choice":"VEG"}"#)).unwrap();
            i += 1;
        });
    });
}

fn bench_redb_day_scan(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    populate(&store, 1000);

    c.bench_function("redb_day_scan_1000", |b| {
        b.iter(|| {
            let results = store.scan(black_box(DATE_PREFIX)).unwrap();
            assert_eq!(results.len(), 1000);
        });
    });
}

fn bench_memory_day_scan(c: &mut Criterion) {
    let store = MemoryStore::new();
    populate(&store, 1000);

    c.bench_function("memory_day_scan_1000", |b| {
        b.iter(|| {
            let results = store.scan(black_box(DATE_PREFIX)).unwrap();
            assert_eq!(results.len(), 1000);
        });
    });
}

criterion_group!(
    benches,
    bench_redb_upsert,
    bench_redb_day_scan,
    bench_memory_day_scan,
);
criterion_main!(benches);
