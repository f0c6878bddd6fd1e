// src/consumer.rs

//! Consumer task: drains the shared queue into a sink.

use crate::error::GetErrorTimeout;
use crate::queue::BoundedQueue;
use crate::sink::Sink;
use crate::task::{RunningGuard, TaskState};

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default poll interval for [`Consumer`] get calls.
///
/// A liveness parameter, not a correctness one: small enough that a stop
/// request is noticed promptly on an idle queue, large enough to avoid
/// busy-waiting.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

type ItemHook<T> = Box<dyn Fn(&T) + Send>;

/// Configures and spawns a consumer thread.
///
/// A consumer polls the queue with a bounded timeout so it can re-check its
/// stop signal even when no traffic arrives. It stops on a
/// [`stop`](ConsumerHandle::stop) request or once the queue is shut down AND
/// fully drained; a shut-down queue with items still buffered is never
/// treated as end of data.
pub struct Consumer<T: Send + 'static, S: Sink<T> + 'static> {
  queue: Arc<BoundedQueue<T>>,
  sink: Arc<S>,
  name: String,
  poll_timeout: Duration,
  delay: Option<Duration>,
  on_consume: Option<ItemHook<T>>,
}

impl<T: Send + 'static, S: Sink<T> + 'static> Consumer<T, S> {
  pub fn new(queue: Arc<BoundedQueue<T>>, sink: Arc<S>) -> Self {
    Self {
      queue,
      sink,
      name: "consumer".to_owned(),
      poll_timeout: DEFAULT_POLL_TIMEOUT,
      delay: None,
      on_consume: None,
    }
  }

  /// Names the task; the name appears in stop events.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Overrides [`DEFAULT_POLL_TIMEOUT`] for this consumer's get calls.
  pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
    self.poll_timeout = poll_timeout;
    self
  }

  /// Sleeps `delay` after each consumed item. A throughput throttle for
  /// demos and tests, not a correctness mechanism.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// Observation hook, invoked with each item between the get and the sink
  /// append. Runs on the consumer thread; keep it cheap.
  pub fn on_consume(mut self, hook: impl Fn(&T) + Send + 'static) -> Self {
    self.on_consume = Some(Box::new(hook));
    self
  }

  /// Spawns the consumer thread and returns its handle.
  pub fn spawn(self) -> ConsumerHandle {
    let Consumer {
      queue,
      sink,
      name,
      poll_timeout,
      delay,
      on_consume,
    } = self;
    let state = TaskState::new();
    let thread_state = Arc::clone(&state);
    let thread_name = name.clone();
    let join = thread::spawn(move || {
      run(
        &queue,
        &*sink,
        poll_timeout,
        delay,
        on_consume,
        &thread_state,
        &thread_name,
      )
    });
    ConsumerHandle { name, state, join }
  }
}

fn run<T: Send, S: Sink<T>>(
  queue: &BoundedQueue<T>,
  sink: &S,
  poll_timeout: Duration,
  delay: Option<Duration>,
  on_consume: Option<ItemHook<T>>,
  state: &Arc<TaskState>,
  name: &str,
) -> u64 {
  let _running = RunningGuard::enter(state);
  let mut consumed = 0u64;
  let reason;

  loop {
    if state.stop_requested() {
      reason = "stop requested";
      break;
    }
    match queue.get_timeout(poll_timeout) {
      Ok(item) => {
        if let Some(hook) = &on_consume {
          hook(&item);
        }
        sink.append(item);
        consumed += 1;
        state.record_processed();
        if let Some(delay) = delay {
          thread::sleep(delay);
        }
      }
      // Idle poll: loop around and re-check the stop signal. Items may
      // still arrive, or may still be buffered behind a shutdown.
      Err(GetErrorTimeout::Timeout) => {}
      // Shut down AND drained: clean termination, not a fault.
      Err(GetErrorTimeout::Shutdown) => {
        reason = "queue shut down and drained";
        break;
      }
    }
  }

  tracing::debug!(consumer = name, consumed, reason, "consumer stopped");
  consumed
}

/// Handle to a spawned consumer thread.
pub struct ConsumerHandle {
  name: String,
  state: Arc<TaskState>,
  join: JoinHandle<u64>,
}

impl ConsumerHandle {
  /// Requests a cooperative stop, observed at the next loop iteration,
  /// after at most one poll interval. Independent of queue shutdown; other
  /// tasks sharing the queue are unaffected.
  pub fn stop(&self) {
    self.state.request_stop();
  }

  /// Whether the consumer loop is still executing.
  pub fn is_running(&self) -> bool {
    self.state.is_running()
  }

  /// Items appended to the sink so far.
  pub fn items_consumed(&self) -> u64 {
    self.state.processed()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Waits for the thread to finish and returns the final consumed count.
  ///
  /// A panic in the hook or sink surfaces here rather than being swallowed,
  /// so counters are never silently wrong.
  pub fn join(self) -> thread::Result<u64> {
    self.join.join()
  }
}
