//! Benchmarks for the shortest covering window scan.
#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use windowmatch::covering_window::{
    shortest_covering_bytes, shortest_covering_substring, shortest_covering_window,
};

fn make_text(n: usize, alphabet: &[u8]) -> Vec<u8> {
    let mut x: u64 = 0x2545_F491_4F6C_DD1D;
    (0..n)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            alphabet[(x % alphabet.len() as u64) as usize]
        })
        .collect()
}

fn bench_covering_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("covering_window");
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let target = b"XYZZY";

    for &n in &[100_usize, 1_000, 10_000, 100_000, 1_000_000, 10_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        let source = make_text(n, alphabet);

        group.bench_with_input(BenchmarkId::new("byte_table", n), &source, |b, source| {
            b.iter(|| shortest_covering_bytes(black_box(source), black_box(target)));
        });
        group.bench_with_input(BenchmarkId::new("hash_table", n), &source, |b, source| {
            b.iter(|| shortest_covering_window(black_box(source.as_slice()), black_box(&target[..])));
        });
    }

    group.finish();
}

fn bench_covering_unicode(c: &mut Criterion) {
    let mut group = c.benchmark_group("covering_window_unicode");

    for &n in &[1_000_usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        let source: String = make_text(n, b"abcdef")
            .into_iter()
            .map(|b| if b == b'f' { 'é' } else { char::from(b) })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| shortest_covering_substring(black_box(source), black_box("éaéb")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_covering_window, bench_covering_unicode);
criterion_main!(benches);
