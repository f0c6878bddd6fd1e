mod common;
use common::*;

use hopper::{BoundedQueue, Consumer, Producer, SharedSink};

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Joins producers, shuts the queue down, then joins consumers: the
/// orchestration order that guarantees buffered items are drained.
fn drain_pipeline(
  queue: &BoundedQueue<String>,
  producers: Vec<hopper::ProducerHandle>,
  consumers: Vec<hopper::ConsumerHandle>,
) -> (u64, u64) {
  let mut produced = 0;
  for producer in producers {
    produced += producer.join().unwrap();
  }
  queue.shutdown();
  let mut consumed = 0;
  for consumer in consumers {
    consumed += consumer.join().unwrap();
  }
  (produced, consumed)
}

fn tagged_items(tag: &str, count: usize) -> Vec<String> {
  (0..count).map(|i| format!("{tag}-{i}")).collect()
}

#[test]
fn single_producer_single_consumer_preserves_order() {
  let queue = Arc::new(BoundedQueue::new(5));
  let sink = Arc::new(SharedSink::new());
  let source = tagged_items("item", ITEMS_LOW);

  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  let producer = Producer::new(Arc::clone(&queue)).spawn(source.clone());

  let (produced, consumed) = drain_pipeline(&queue, vec![producer], vec![consumer]);

  assert_eq!(produced, ITEMS_LOW as u64);
  assert_eq!(consumed, ITEMS_LOW as u64);
  assert_eq!(sink.snapshot(), source);
}

#[test]
fn no_loss_no_duplication_across_producers_and_consumers() {
  let queue = Arc::new(BoundedQueue::new(10));
  let sink = Arc::new(SharedSink::new());

  let consumers: Vec<_> = (0..2)
    .map(|i| {
      Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
        .with_name(format!("consumer-{i}"))
        .with_poll_timeout(POLL_TIMEOUT)
        .spawn()
    })
    .collect();

  let producers: Vec<_> = (0..2)
    .map(|i| {
      Producer::new(Arc::clone(&queue))
        .with_name(format!("producer-{i}"))
        .spawn(tagged_items(&format!("p{i}"), 50))
    })
    .collect();

  let (produced, consumed) = drain_pipeline(&queue, producers, consumers);
  assert_eq!(produced, 100);
  assert_eq!(consumed, 100);

  let collected = sink.snapshot();
  let unique: HashSet<_> = collected.iter().cloned().collect();
  assert_eq!(collected.len(), 100, "items were lost");
  assert_eq!(unique.len(), 100, "items were duplicated");
  for p in 0..2 {
    for i in 0..50 {
      assert!(unique.contains(&format!("p{p}-{i}")));
    }
  }
}

#[test]
fn capacity_one_transfers_everything() {
  let queue = Arc::new(BoundedQueue::new(1));
  let sink = Arc::new(SharedSink::new());
  let source = tagged_items("tiny", ITEMS_LOW);

  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  let producer = Producer::new(Arc::clone(&queue)).spawn(source.clone());

  drain_pipeline(&queue, vec![producer], vec![consumer]);
  assert_eq!(sink.snapshot(), source);
}

#[test]
fn large_capacity_transfers_everything() {
  let queue = Arc::new(BoundedQueue::new(1000));
  let sink = Arc::new(SharedSink::new());
  let source = tagged_items("bulk", ITEMS_HIGH);

  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  let producer = Producer::new(Arc::clone(&queue)).spawn(source.clone());

  drain_pipeline(&queue, vec![producer], vec![consumer]);
  assert_eq!(sink.snapshot(), source);
}

#[test]
fn shutdown_with_backlog_is_fully_drained() {
  let queue = Arc::new(BoundedQueue::new(10));
  let sink = Arc::new(SharedSink::new());

  // Fill the queue before any consumer exists, then shut down.
  for i in 0..10 {
    queue.put(format!("backlog-{i}")).unwrap();
  }
  queue.shutdown();

  // A consumer started after shutdown must still drain every item before
  // treating the shutdown as end of data.
  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  assert_eq!(consumer.join().unwrap(), 10);
  assert_eq!(sink.len(), 10);
}

#[test]
fn producer_stop_is_independent_of_queue_shutdown() {
  let queue = Arc::new(BoundedQueue::new(100));
  let sink = Arc::new(SharedSink::new());

  let stopped = Producer::new(Arc::clone(&queue))
    .with_name("stopped")
    .with_delay(Duration::from_millis(10))
    .spawn(tagged_items("slow", ITEMS_HIGH));
  thread::sleep(Duration::from_millis(100));
  stopped.stop();
  let partial = stopped.join().unwrap();
  assert!(partial < ITEMS_HIGH as u64, "stop signal was ignored");

  // The queue is still live: another producer and a consumer finish the run.
  assert!(!queue.is_shutdown());
  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  let producer = Producer::new(Arc::clone(&queue)).spawn(tagged_items("fresh", ITEMS_LOW));

  let (produced, consumed) = drain_pipeline(&queue, vec![producer], vec![consumer]);
  assert_eq!(produced, ITEMS_LOW as u64);
  assert_eq!(consumed, partial + ITEMS_LOW as u64);
}

#[test]
fn consumer_stop_leaves_items_for_others() {
  let queue = Arc::new(BoundedQueue::new(100));
  let sink = Arc::new(SharedSink::new());

  for item in tagged_items("queued", ITEMS_MEDIUM) {
    queue.put(item).unwrap();
  }

  let early = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_name("early")
    .with_poll_timeout(POLL_TIMEOUT)
    .with_delay(Duration::from_millis(5))
    .spawn();
  thread::sleep(Duration::from_millis(50));
  early.stop();
  let taken = early.join().unwrap();
  assert!(taken < ITEMS_MEDIUM as u64);
  assert!(!queue.is_shutdown());

  let finisher = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  queue.shutdown();
  let rest = finisher.join().unwrap();

  assert_eq!(taken + rest, ITEMS_MEDIUM as u64);
  assert_eq!(sink.len(), ITEMS_MEDIUM);
}

#[test]
fn producer_blocked_on_full_queue_is_released_by_shutdown() {
  let queue = Arc::new(BoundedQueue::new(1));
  let producer = Producer::new(Arc::clone(&queue)).spawn(tagged_items("stuck", ITEMS_LOW));

  // Let the producer fill the single slot and park on the next put.
  thread::sleep(Duration::from_millis(100));
  queue.shutdown();

  let produced = producer.join().unwrap();
  assert!(produced < ITEMS_LOW as u64);
  // The slot's item survives the shutdown.
  assert_eq!(queue.len(), 1);
}

#[test]
fn hooks_observe_every_item() {
  let queue = Arc::new(BoundedQueue::new(5));
  let sink = Arc::new(SharedSink::new());
  let seen_in = Arc::new(AtomicU64::new(0));
  let seen_out = Arc::new(AtomicU64::new(0));

  let consumer = {
    let seen_out = Arc::clone(&seen_out);
    Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
      .with_poll_timeout(POLL_TIMEOUT)
      .on_consume(move |_| {
        seen_out.fetch_add(1, Ordering::Relaxed);
      })
      .spawn()
  };
  let producer = {
    let seen_in = Arc::clone(&seen_in);
    Producer::new(Arc::clone(&queue))
      .on_produce(move |_| {
        seen_in.fetch_add(1, Ordering::Relaxed);
      })
      .spawn(tagged_items("hooked", ITEMS_LOW))
  };

  drain_pipeline(&queue, vec![producer], vec![consumer]);
  assert_eq!(seen_in.load(Ordering::Relaxed), ITEMS_LOW as u64);
  assert_eq!(seen_out.load(Ordering::Relaxed), ITEMS_LOW as u64);
}

#[test]
fn panicking_hook_surfaces_in_join_and_clears_running() {
  let queue = Arc::new(BoundedQueue::new(5));
  let producer = Producer::new(Arc::clone(&queue))
    .on_produce(|item: &String| {
      if item.ends_with("-3") {
        panic!("malformed item: {item}");
      }
    })
    .spawn(tagged_items("bad", ITEMS_LOW));

  thread::sleep(Duration::from_millis(200));
  assert!(!producer.is_running());
  assert!(producer.join().is_err());
  // Items before the fault made it into the queue; the counter is honest.
  assert_eq!(queue.len(), 3);
}

#[test]
fn handle_counters_track_progress() {
  let queue = Arc::new(BoundedQueue::new(5));
  let sink = Arc::new(SharedSink::<String>::new());

  let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
    .with_name("tracked")
    .with_poll_timeout(POLL_TIMEOUT)
    .spawn();
  assert_eq!(consumer.name(), "tracked");

  let producer = Producer::new(Arc::clone(&queue)).spawn(tagged_items("count", ITEMS_LOW));
  let produced = producer.join().unwrap();
  queue.shutdown();
  let consumed = consumer.join().unwrap();

  assert_eq!(produced, ITEMS_LOW as u64);
  assert_eq!(consumed, ITEMS_LOW as u64);

  let stats = queue.stats();
  assert_eq!(stats.added, ITEMS_LOW as u64);
  assert_eq!(stats.removed, ITEMS_LOW as u64);
}
