//! Throughput of the Huffman encoder and decoder on inputs with different
//! byte distributions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffcode::compression::frequency::FrequencyTable;
use huffcode::compression::huffman::HuffmanTree;
use huffcode::compression::{huffman_decode, huffman_encode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_test_data(size: usize, data_type: &str) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    match data_type {
        "uniform" => (0..size).map(|_| rng.gen()).collect(),
        "text" => {
            let alphabet = b"etaoin shrdlu cmfwyp vbgkqjxz ETAOIN.,";
            (0..size)
                .map(|i| alphabet[(i * 17 + rng.gen_range(0..5)) % alphabet.len()])
                .collect()
        }
        "skewed" => (0..size)
            .map(|_| if rng.gen_bool(0.95) { 0 } else { rng.gen() })
            .collect(),
        "constant" => vec![b'x'; size],
        _ => panic!("Unknown data type: {}", data_type),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_encode");

    for size in [1_000, 100_000, 1_000_000] {
        for data_type in ["uniform", "text", "skewed", "constant"] {
            let data = generate_test_data(size, data_type);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(data_type, size), &data, |b, data| {
                b.iter(|| huffman_encode(black_box(data)))
            });
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_decode");

    for size in [1_000, 100_000, 1_000_000] {
        for data_type in ["uniform", "text", "skewed", "constant"] {
            let packed = match huffman_encode(&generate_test_data(size, data_type)) {
                Ok(packed) => packed,
                Err(e) => panic!("encoding {data_type} failed: {e}"),
            };
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(data_type, size), &packed, |b, packed| {
                b.iter(|| huffman_decode(black_box(packed)))
            });
        }
    }

    group.finish();
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_tree");

    for data_type in ["uniform", "text", "skewed"] {
        let freqs = FrequencyTable::from_bytes(&generate_test_data(100_000, data_type));
        group.bench_with_input(BenchmarkId::from_parameter(data_type), &freqs, |b, freqs| {
            b.iter(|| {
                HuffmanTree::from_frequencies(black_box(freqs))
                    .map(|tree| tree.map(|t| t.code_table()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_tree_construction);
criterion_main!(benches);
