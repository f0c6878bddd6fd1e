// examples/pipeline.rs

use hopper::{BoundedQueue, Consumer, Producer, SharedSink};
use std::sync::Arc;
use std::time::Duration;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
    )
    .init();

  println!("--- Pipeline: single producer, single consumer ---");
  {
    let queue = Arc::new(BoundedQueue::new(5));
    let sink = Arc::new(SharedSink::new());
    let source: Vec<String> = (0..10).map(|i| format!("item-{i}")).collect();

    let consumer = Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
      .with_name("consumer-1")
      .on_consume(|item: &String| println!("  [consumer-1] consumed: {item}"))
      .spawn();
    let producer = Producer::new(Arc::clone(&queue))
      .with_name("producer-1")
      .on_produce(|item: &String| println!("  [producer-1] produced: {item}"))
      .spawn(source.clone());

    let produced = producer.join().unwrap();
    println!("producer finished, items produced: {produced}");

    // Shut down only after the producer is done, so nothing buffered is lost.
    queue.shutdown();
    let consumed = consumer.join().unwrap();
    println!("consumer finished, items consumed: {consumed}");

    let collected = sink.snapshot();
    println!("all items transferred in order: {}", collected == source);
  }

  println!("\n--- Pipeline: multiple producers, multiple consumers ---");
  {
    let queue = Arc::new(BoundedQueue::new(3));
    let sink = Arc::new(SharedSink::new());

    let consumers: Vec<_> = (0..3)
      .map(|i| {
        let name = format!("consumer-{i}");
        let tag = name.clone();
        Consumer::new(Arc::clone(&queue), Arc::clone(&sink))
          .with_name(name)
          .with_delay(Duration::from_millis(20))
          .on_consume(move |item: &String| println!("  [{tag}] consumed: {item}"))
          .spawn()
      })
      .collect();

    let producers: Vec<_> = (0..2)
      .map(|i| {
        let name = format!("producer-{i}");
        let tag = name.clone();
        let source: Vec<String> = (0..5).map(|j| format!("p{i}-item-{j}")).collect();
        Producer::new(Arc::clone(&queue))
          .with_name(name)
          .with_delay(Duration::from_millis(10))
          .on_produce(move |item: &String| println!("  [{tag}] produced: {item}"))
          .spawn(source)
      })
      .collect();

    let mut produced = 0;
    for producer in producers {
      produced += producer.join().unwrap();
    }
    queue.shutdown();

    let mut consumed = 0;
    for consumer in consumers {
      consumed += consumer.join().unwrap();
    }

    println!("total produced: {produced}, total consumed: {consumed}");
    println!("collected {} items: {:?}", sink.len(), sink.snapshot());
    println!("queue stats: {:?}", queue.stats());
    assert_eq!(produced, consumed);
  }
}
