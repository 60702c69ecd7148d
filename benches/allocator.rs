//! Throughput benchmarks for reserve/commit/consume.
//!
//! Run with: cargo bench --bench allocator

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringslab::{CommitFlags, ReserveFlags, RingBuffer, RingBufferConfig};

const RECORD_COUNT: u64 = 200_000;

/// Reserve, write, commit, then immediately consume and confirm a fixed
/// record size, repeated `RECORD_COUNT` times against a buffer sized to
/// hold only a handful of records at once — the steady-state path with no
/// overwrite ever triggered.
fn bench_reserve_consume_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reserve_consume_cycle");

    for record_len in [16usize, 64, 256] {
        group.throughput(Throughput::Elements(RECORD_COUNT));
        group.bench_with_input(
            BenchmarkId::from_parameter(record_len),
            &record_len,
            |b, &record_len| {
                let node_size = RingBuffer::node_cost(record_len);
                let capacity = node_size * 8;
                let mut region = vec![0u8; RingBuffer::heap_cost() + capacity];

                b.iter(|| {
                    let mut rb =
                        RingBuffer::init(&mut region, RingBufferConfig::default()).unwrap();
                    for i in 0..RECORD_COUNT {
                        let token = rb.reserve(record_len, ReserveFlags::empty()).unwrap();
                        rb.payload_mut(&token).fill((i % 251) as u8);
                        rb.commit(token, CommitFlags::empty()).unwrap();

                        let (token, _lost) = rb.consume().unwrap();
                        black_box(rb.payload(&token));
                        rb.commit(token, CommitFlags::empty()).unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

/// Same cycle, but the buffer only has room for a fraction of the in-flight
/// records a burst would need, forcing every reserve down the overwrite
/// eviction path.
fn bench_overwrite_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("overwrite_eviction");
    group.throughput(Throughput::Elements(RECORD_COUNT));

    let record_len = 64usize;
    let node_size = RingBuffer::node_cost(record_len);
    let capacity = node_size * 3;
    let mut region = vec![0u8; RingBuffer::heap_cost() + capacity];

    group.bench_function("evict_every_reserve", |b| {
        b.iter(|| {
            let mut rb = RingBuffer::init(&mut region, RingBufferConfig::default()).unwrap();
            // Fill to capacity first so every subsequent reserve must evict.
            loop {
                match rb.reserve(record_len, ReserveFlags::empty()) {
                    Some(token) => rb.commit(token, CommitFlags::empty()).unwrap(),
                    None => break,
                }
            }
            for i in 0..RECORD_COUNT {
                let token = rb.reserve(record_len, ReserveFlags::OVERWRITE).unwrap();
                rb.payload_mut(&token).fill((i % 251) as u8);
                rb.commit(token, CommitFlags::empty()).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_reserve_consume_cycle, bench_overwrite_eviction);
criterion_main!(benches);
