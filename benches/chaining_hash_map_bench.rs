use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hashmap_primitives::ChainingHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("chaining_insert_10k", |b| {
        let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
        b.iter_batched(
            || (ChainingHashMap::<String, u64>::new(), keys.clone()),
            |(mut m, keys)| {
                // Starts at four buckets, so this covers every growth step.
                for (i, k) in keys.into_iter().enumerate() {
                    m.insert(k, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chaining_get_hit", |b| {
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        let m: ChainingHashMap<String, u64> = keys.iter().cloned().zip(0..).collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chaining_get_miss", |b| {
        let m: ChainingHashMap<String, u64> = lcg(11).take(10_000).map(key).zip(0..).collect();
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        })
    });
}

fn bench_insert_remove_churn(c: &mut Criterion) {
    c.bench_function("chaining_insert_remove_10k", |b| {
        let keys: Vec<_> = lcg(3).take(10_000).collect();
        b.iter_batched(
            ChainingHashMap::<u64, u64>::new,
            |mut m| {
                // Grows to the full set, then shrinks back down to one bucket.
                for &k in &keys {
                    m.insert(k, k);
                }
                for k in &keys {
                    m.remove(k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_insert_remove_churn
}
criterion_main!(benches);
