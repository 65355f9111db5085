use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use eth_tx_scanner::blockchain::wei_hex_to_ether;
use eth_tx_scanner::models::{Block, Transaction};

const TARGET: &str = "0x00000000000000000000000000000000000000aa";

fn create_test_block(tx_count: u64) -> Block {
    Block {
        number: "0x1312d00".to_string(),
        transactions: (0..tx_count)
            .map(|id| Transaction {
                hash: format!("0x{:064x}", id),
                from: if id % 50 == 0 { TARGET.to_string() } else { format!("0x{:040x}", id) },
                to: Some(format!("0x{:040x}", id + 1)),
                value: format!("0x{:x}", (id + 1) * 1_000_000_000_000_000),
                block_number: "0x1312d00".to_string(),
            })
            .collect(),
    }
}

fn bench_wei_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("wei_conversion");

    for value in ["0x0", "0xde0b6b3a7640000", "0xffffffffffffffffffff"] {
        group.bench_with_input(BenchmarkId::new("wei_hex_to_ether", value), value, |b, value| {
            b.iter(|| wei_hex_to_ether(black_box(value)))
        });
    }

    group.finish();
}

fn bench_address_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("address_filter");

    for size in [10u64, 150, 1000] {
        let block = create_test_block(size);
        group.bench_with_input(BenchmarkId::new("touches", size), &block, |b, block| {
            b.iter(|| {
                block
                    .transactions
                    .iter()
                    .filter(|tx| tx.touches(black_box(TARGET)))
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wei_conversion, bench_address_filter);
criterion_main!(benches);
