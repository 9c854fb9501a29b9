//! Benchmarks for tagdict dictionary operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tagdict::{Dict16, Dict32};

fn keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("tag:{:06}", i)).collect()
}

fn dictionary_benchmarks(c: &mut Criterion) {
    let keys = keys(10_000);

    c.bench_function("get_id_allocate_10k", |b| {
        b.iter_batched(
            Dict32::new,
            |dict| {
                for key in &keys {
                    black_box(dict.get_id(key).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });

    let dict = Dict32::new();
    dict.get_ids(&keys).unwrap();

    c.bench_function("get_id_hit", |b| {
        b.iter(|| black_box(dict.get_id(black_box("tag:004242")).unwrap()))
    });

    c.bench_function("get_key_hit", |b| {
        b.iter(|| black_box(dict.get_key(black_box(4242))))
    });

    c.bench_function("get_prefix_scan_10k", |b| {
        b.iter(|| black_box(dict.get_prefix(black_box("tag:0042"))))
    });
}

fn codec_benchmarks(c: &mut Criterion) {
    let dict = Dict16::new();
    dict.get_ids(&keys(10_000)).unwrap();
    let raw = dict.marshal();

    c.bench_function("marshal_10k", |b| b.iter(|| black_box(dict.marshal())));

    c.bench_function("unmarshal_10k", |b| {
        b.iter(|| black_box(Dict16::from_bytes(black_box(&raw)).unwrap()))
    });
}

criterion_group!(benches, dictionary_benchmarks, codec_benchmarks);
criterion_main!(benches);
