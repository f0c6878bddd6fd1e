use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hopper::BoundedQueue;
use std::sync::Arc;
use std::thread;

const ITEM_VALUE: u64 = 42;
const ITEMS_PER_ITER: usize = 1_000;

/// Same-thread put/get round trips: the uncontended fast path.
fn bench_ping_pong(c: &mut Criterion) {
  let mut group = c.benchmark_group("ping_pong");
  group.throughput(Throughput::Elements(ITEMS_PER_ITER as u64));

  for capacity in [1usize, 16, 256] {
    group.bench_with_input(
      BenchmarkId::from_parameter(capacity),
      &capacity,
      |b, &capacity| {
        let queue = BoundedQueue::new(capacity);
        b.iter(|| {
          for _ in 0..ITEMS_PER_ITER {
            queue.put(ITEM_VALUE).unwrap();
            let _ = queue.get().unwrap();
          }
        });
      },
    );
  }
  group.finish();
}

/// One producer thread feeding one draining consumer: the contended path,
/// including parks and wakeups when the capacity is tight.
fn bench_spsc_transfer(c: &mut Criterion) {
  let mut group = c.benchmark_group("spsc_transfer");
  group.throughput(Throughput::Elements(ITEMS_PER_ITER as u64));

  for capacity in [1usize, 16, 256] {
    group.bench_with_input(
      BenchmarkId::from_parameter(capacity),
      &capacity,
      |b, &capacity| {
        b.iter(|| {
          let queue = Arc::new(BoundedQueue::new(capacity));
          let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
              for _ in 0..ITEMS_PER_ITER {
                queue.put(ITEM_VALUE).unwrap();
              }
            })
          };
          for _ in 0..ITEMS_PER_ITER {
            let _ = queue.get().unwrap();
          }
          producer.join().unwrap();
        });
      },
    );
  }
  group.finish();
}

criterion_group!(benches, bench_ping_pong, bench_spsc_transfer);
criterion_main!(benches);
