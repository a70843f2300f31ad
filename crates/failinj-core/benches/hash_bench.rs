use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use failinj_core::hash::{HASH_INIT, HashEntry, HashTable, fold};

fn benchmark_fingerprint_fold(c: &mut Criterion) {
    let depths: [usize; 3] = [8, 32, 128];
    let mut group = c.benchmark_group("fingerprint_fold");

    for depth in depths {
        let labels: Vec<String> = (0..depth)
            .map(|i| format!("frame_{i}+{:#x}", i * 0x40))
            .collect();
        let bytes: u64 = labels.iter().map(|l| l.len() as u64).sum();
        group.throughput(Throughput::Bytes(bytes));

        group.bench_with_input(BenchmarkId::new("stack_depth", depth), &labels, |b, labels| {
            b.iter(|| {
                let mut h = HASH_INIT;
                for label in labels {
                    h = fold(h, black_box(label.as_bytes()));
                }
                black_box(h)
            });
        });
    }

    group.finish();
}

fn benchmark_table_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_ops");

    group.bench_function("insert_pop_cycle", |b| {
        let mut table = HashTable::new();
        let mut key = 0x9E37_79B9_7F4A_7C15_u64;
        b.iter(|| {
            key = key.wrapping_mul(0x2545_F491_4F6C_DD1D).wrapping_add(1);
            table.insert(HashEntry::new(black_box(key), None));
            black_box(table.pop(key));
        });
    });

    group.bench_function("duplicate_probe", |b| {
        let mut table = HashTable::new();
        for k in 0..4096_u64 {
            table.insert(HashEntry::new(k.wrapping_mul(0x1000_0001), None));
        }
        b.iter(|| {
            let dup = table.insert(HashEntry::new(black_box(0x1000_0001), None));
            black_box(dup)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_fingerprint_fold, benchmark_table_ops);
criterion_main!(benches);
