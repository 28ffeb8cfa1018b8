use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use shuffle_ledger::ShuffleToken;
use shuffle_types::{tokens, Address, TokenParams, U256};

fn holder(i: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[12..].copy_from_slice(&i.to_be_bytes());
    Address::from(bytes)
}

/// A token whose heap is full with `top_size` residents.
fn populated(top_size: usize) -> ShuffleToken {
    let owner = Address::repeat_byte(0xee);
    let params = TokenParams::default().with_top_size(top_size);
    let mut token = ShuffleToken::new(owner, &params).unwrap();
    token.init(owner, holder(0), tokens(1_000_000_000)).unwrap();
    for i in 1..=top_size as u64 {
        token.transfer(holder(0), holder(i), tokens(i)).unwrap();
    }
    token
}

fn bench_fee_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("fee_transfer");

    for top_size in [16, 512, 4096] {
        let token = populated(top_size);
        group.bench_with_input(BenchmarkId::new("resident_to_resident", top_size), &top_size, |b, _| {
            let mut token = token.clone();
            b.iter(|| {
                token
                    .transfer(holder(0), holder(1), black_box(U256::from(1_000u64)))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_predict_winner(c: &mut Criterion) {
    let token = populated(512);
    c.bench_function("predict_winner_512", |b| {
        b.iter(|| token.predict_winner(black_box(&holder(0)), black_box(tokens(4))))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let token = populated(512);
    c.bench_function("snapshot_512", |b| b.iter(|| black_box(token.snapshot().hash)));
}

criterion_group!(benches, bench_fee_transfer, bench_predict_winner, bench_snapshot);
criterion_main!(benches);
