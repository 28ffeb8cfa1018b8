use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use shuffle_heap::TopHeap;
use shuffle_types::{Address, U256};

fn address(i: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[12..].copy_from_slice(&i.to_be_bytes());
    Address::from(bytes)
}

fn full_heap(capacity: usize) -> TopHeap {
    let mut heap = TopHeap::new(capacity);
    for i in 0..capacity as u64 {
        heap.insert_or_update(address(i), U256::from(1_000 + i * 7));
    }
    heap
}

fn bench_update_resident(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_update_resident");
    for capacity in [64usize, 512, 4096] {
        let mut heap = full_heap(capacity);
        let mut tick = 0u64;
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &cap| {
            b.iter(|| {
                tick += 1;
                let who = address(tick % cap as u64);
                heap.insert_or_update(black_box(who), black_box(U256::from(500 + tick % 10_000)));
            });
        });
    }
    group.finish();
}

fn bench_evict_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_evict_root");
    for capacity in [64usize, 512, 4096] {
        let mut heap = full_heap(capacity);
        let mut next = capacity as u64;
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.iter(|| {
                next += 1;
                heap.insert_or_update(black_box(address(next)), black_box(U256::from(next * 1_000)));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update_resident, bench_evict_root);
criterion_main!(benches);
