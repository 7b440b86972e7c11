//! MintGate allowlist benchmarks using Criterion
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mintgate_allowlist::{verify, AllowlistHandle, AllowlistTree};
use mintgate_primitives::Address;

fn sample_addresses(count: usize) -> Vec<Address> {
    (1..=count as u64)
        .map(|i| {
            let mut bytes = [0u8; 20];
            bytes[12..].copy_from_slice(&i.to_be_bytes());
            Address::from_bytes(bytes).expect("non-zero address")
        })
        .collect()
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for size in [100usize, 1_000, 10_000, 100_000].iter() {
        let addresses = sample_addresses(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("addresses", size), size, |b, _| {
            b.iter(|| AllowlistTree::build(black_box(addresses.clone())))
        });
    }

    group.finish();
}

fn bench_prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("prove_membership");

    for size in [1_000usize, 100_000].iter() {
        let addresses = sample_addresses(*size);
        let tree = AllowlistTree::build(addresses.clone());
        let target = addresses[size / 2];

        group.bench_with_input(BenchmarkId::new("addresses", size), size, |b, _| {
            b.iter(|| tree.prove_membership(black_box(&target)).expect("member"))
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let addresses = sample_addresses(100_000);
    let tree = AllowlistTree::build(addresses.clone());
    let target = addresses[12_345];
    let proof = tree.prove_membership(&target).expect("member");
    let root = tree.root();

    c.bench_function("verify_proof_100k", |b| {
        b.iter(|| verify(black_box(&proof), black_box(&target), black_box(&root)))
    });
}

fn bench_handle_lookup(c: &mut Criterion) {
    let addresses = sample_addresses(10_000);
    let handle = AllowlistHandle::new(AllowlistTree::build(addresses.clone()));
    let target = addresses[777];

    c.bench_function("handle_membership_proof_10k", |b| {
        b.iter(|| handle.membership_proof(black_box(&target)))
    });
}

criterion_group!(
    benches,
    bench_tree_build,
    bench_prove,
    bench_verify,
    bench_handle_lookup
);
criterion_main!(benches);
