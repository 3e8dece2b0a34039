use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use scan_substrate::{ByteMap, CharMap};
use std::collections::HashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// Non-null code unit drawn from the LCG's high bits.
fn unit(x: u64) -> u16 {
    ((x >> 48) as u16).max(1)
}

fn bench_put_fresh_4k(c: &mut Criterion) {
    c.bench_function("char_map::put_fresh_4k", |b| {
        b.iter_batched(
            || CharMap::<u32>::new(0),
            |mut m| {
                for (i, x) in lcg(1).take(4_096).enumerate() {
                    m.put(unit(x), i as u32);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

// A lexer state typically has a handful of transitions over ASCII.
fn bench_transition_lookup(c: &mut Criterion) {
    let text: Vec<u8> = lcg(3)
        .take(10_000)
        .map(|x| b"abcdefghij0123456789 _"[(x >> 40) as usize % 22])
        .collect();

    c.bench_function("byte_map::transition_lookup_10k", |b| {
        let mut m = ByteMap::new(u32::MAX);
        for (state, byte) in (b'a'..=b'j').chain(b'0'..=b'9').enumerate() {
            m.put(byte, state as u32);
        }
        b.iter(|| {
            let mut acc = 0u32;
            for &byte in &text {
                acc = acc.wrapping_add(*m.get(byte));
            }
            black_box(acc)
        })
    });

    c.bench_function("std_hashmap::transition_lookup_10k", |b| {
        let mut m = HashMap::new();
        for (state, byte) in (b'a'..=b'j').chain(b'0'..=b'9').enumerate() {
            m.insert(byte, state as u32);
        }
        b.iter(|| {
            let mut acc = 0u32;
            for byte in &text {
                acc = acc.wrapping_add(*m.get(byte).unwrap_or(&u32::MAX));
            }
            black_box(acc)
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("char_map::get_miss_10k_on_4k", |b| {
        let mut m = CharMap::new(0u32);
        for (i, x) in lcg(11).take(4_096).enumerate() {
            m.put(unit(x), i as u32);
        }
        let queries: Vec<u16> = lcg(0xdead_beef).take(10_000).map(unit).collect();
        b.iter(|| {
            for &k in &queries {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_cursor_drain_4k(c: &mut Criterion) {
    c.bench_function("char_map::cursor_drain_4k", |b| {
        b.iter_batched(
            || {
                let mut m = CharMap::new(0u32);
                for (i, x) in lcg(99).take(4_096).enumerate() {
                    m.put(unit(x), i as u32);
                }
                m
            },
            |mut m| {
                let mut cursor = m.entries();
                while cursor.next(&m).is_ok() {
                    let _ = cursor.remove(&mut m);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_put_fresh_4k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_transition_lookup,
              bench_get_miss_10k,
              bench_cursor_drain_4k
}
criterion_main!(benches_insert, benches_ops);
