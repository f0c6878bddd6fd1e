// src/task.rs

//! State shared between a running task thread and its handle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Flags and counters a handle reads while the task thread runs.
///
/// `stop` is the task's own cooperative cancellation signal, deliberately
/// independent of queue shutdown: a task must be stoppable without shutting
/// down a queue shared by other tasks.
#[derive(Debug, Default)]
pub(crate) struct TaskState {
  stop: AtomicBool,
  running: AtomicBool,
  processed: AtomicU64,
}

impl TaskState {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub(crate) fn request_stop(&self) {
    self.stop.store(true, Ordering::Release);
  }

  pub(crate) fn stop_requested(&self) -> bool {
    self.stop.load(Ordering::Acquire)
  }

  pub(crate) fn is_running(&self) -> bool {
    self.running.load(Ordering::Acquire)
  }

  pub(crate) fn processed(&self) -> u64 {
    self.processed.load(Ordering::Acquire)
  }

  pub(crate) fn record_processed(&self) {
    self.processed.fetch_add(1, Ordering::Release);
  }
}

/// Sets the running flag on creation and clears it on drop, so the flag is
/// accurate even when the task body panics in a source, hook, or sink.
pub(crate) struct RunningGuard {
  state: Arc<TaskState>,
}

impl RunningGuard {
  pub(crate) fn enter(state: &Arc<TaskState>) -> Self {
    state.running.store(true, Ordering::Release);
    Self {
      state: Arc::clone(state),
    }
  }
}

impl Drop for RunningGuard {
  fn drop(&mut self) {
    self.state.running.store(false, Ordering::Release);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn running_guard_clears_flag_on_panic() {
    let state = TaskState::new();
    let thread_state = Arc::clone(&state);
    let result = std::thread::spawn(move || {
      let _running = RunningGuard::enter(&thread_state);
      panic!("task body blew up");
    })
    .join();

    assert!(result.is_err());
    assert!(!state.is_running());
  }
}
