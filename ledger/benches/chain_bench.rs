// Hashing, minting and validation benchmarks for the Pulse ledger.
//
// Covers single-block hash computation, sealing through `mint_next`, and
// full-chain validation at various lengths.

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pulse_ledger::{Chain, PendingBlock};

fn build_chain(len: usize) -> Chain {
    let start = Utc.timestamp_opt(1_760_000_000, 0).unwrap();
    let mut chain = Chain::new();
    let mut pending = PendingBlock::genesis_at(start, 60);
    for i in 0..len {
        pending = chain
            .mint_next_at(pending, start + Duration::seconds(i as i64 + 1))
            .unwrap();
        pending.set_payload(60 + (i as i64 % 40));
    }
    chain
}

fn bench_compute_hash(c: &mut Criterion) {
    let block = PendingBlock::genesis(72);

    c.bench_function("block/compute_hash", |b| {
        b.iter(|| block.compute_hash());
    });
}

fn bench_mint_next(c: &mut Criterion) {
    c.bench_function("chain/mint_next", |b| {
        b.iter_batched(
            || (Chain::new(), PendingBlock::genesis(72)),
            |(mut chain, pending)| chain.mint_next(pending).unwrap(),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/validate");

    for size in [10, 100, 1_000, 10_000] {
        let chain = build_chain(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &chain, |b, chain| {
            b.iter(|| chain.validate());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_hash, bench_mint_next, bench_validate);
criterion_main!(benches);
