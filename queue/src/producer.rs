// src/producer.rs

//! Producer task: pulls items from a source and feeds the shared queue.

use crate::error::PutError;
use crate::queue::BoundedQueue;
use crate::task::{RunningGuard, TaskState};

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type ItemHook<T> = Box<dyn Fn(&T) + Send>;

/// Configures and spawns a producer thread.
///
/// A producer consumes its source once, forward-only, blocking on
/// [`put`](BoundedQueue::put) whenever the queue is full. It stops on the
/// first of: source exhaustion, a [`stop`](ProducerHandle::stop) request,
/// or queue shutdown. A put rejected by shutdown terminates the loop without
/// consuming further source items.
pub struct Producer<T: Send + 'static> {
  queue: Arc<BoundedQueue<T>>,
  name: String,
  delay: Option<Duration>,
  on_produce: Option<ItemHook<T>>,
}

impl<T: Send + 'static> Producer<T> {
  pub fn new(queue: Arc<BoundedQueue<T>>) -> Self {
    Self {
      queue,
      name: "producer".to_owned(),
      delay: None,
      on_produce: None,
    }
  }

  /// Names the task; the name appears in stop events.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Sleeps `delay` after each successful put. A throughput throttle for
  /// demos and tests, not a correctness mechanism.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// Observation hook, invoked with each item right before it is handed to
  /// the queue. Runs on the producer thread; keep it cheap. The produced
  /// count only advances once the put succeeds.
  pub fn on_produce(mut self, hook: impl Fn(&T) + Send + 'static) -> Self {
    self.on_produce = Some(Box::new(hook));
    self
  }

  /// Spawns the producer thread over `source` and returns its handle.
  pub fn spawn<I>(self, source: I) -> ProducerHandle
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
  {
    let Producer {
      queue,
      name,
      delay,
      on_produce,
    } = self;
    let state = TaskState::new();
    let thread_state = Arc::clone(&state);
    let thread_name = name.clone();
    let iter = source.into_iter();
    let join =
      thread::spawn(move || run(&queue, iter, delay, on_produce, &thread_state, &thread_name));
    ProducerHandle { name, state, join }
  }
}

fn run<T: Send>(
  queue: &BoundedQueue<T>,
  source: impl Iterator<Item = T>,
  delay: Option<Duration>,
  on_produce: Option<ItemHook<T>>,
  state: &Arc<TaskState>,
  name: &str,
) -> u64 {
  let _running = RunningGuard::enter(state);
  let mut produced = 0u64;
  let mut reason = "source exhausted";

  for item in source {
    // Cooperative: the stop signal is observed once per iteration, never
    // mid-put.
    if state.stop_requested() {
      reason = "stop requested";
      break;
    }
    if let Some(hook) = &on_produce {
      hook(&item);
    }
    match queue.put(item) {
      Ok(()) => {}
      Err(PutError::Shutdown) => {
        reason = "queue shut down";
        break;
      }
    }
    produced += 1;
    state.record_processed();
    if let Some(delay) = delay {
      thread::sleep(delay);
    }
  }

  tracing::debug!(producer = name, produced, reason, "producer stopped");
  produced
}

/// Handle to a spawned producer thread.
pub struct ProducerHandle {
  name: String,
  state: Arc<TaskState>,
  join: JoinHandle<u64>,
}

impl ProducerHandle {
  /// Requests a cooperative stop, observed at the next loop iteration.
  ///
  /// This does not interrupt a put already blocked on a full queue; use
  /// [`BoundedQueue::shutdown`] to release blocked producers. The signal is
  /// independent of queue shutdown, so other tasks sharing the queue are
  /// unaffected.
  pub fn stop(&self) {
    self.state.request_stop();
  }

  /// Whether the producer loop is still executing.
  pub fn is_running(&self) -> bool {
    self.state.is_running()
  }

  /// Items successfully enqueued so far.
  pub fn items_produced(&self) -> u64 {
    self.state.processed()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Waits for the thread to finish and returns the final produced count.
  ///
  /// A panic in the source or hook surfaces here rather than being
  /// swallowed, so counters are never silently wrong.
  pub fn join(self) -> thread::Result<u64> {
    self.join.join()
  }
}
