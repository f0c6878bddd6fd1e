// src/sink.rs

//! Append-only destinations for consumed items.

use parking_lot::Mutex;

/// An ordered, append-only destination a [`Consumer`](crate::Consumer)
/// writes into.
///
/// Implementations must serialize appends when shared across consumers.
/// Per-consumer append order follows consumption order; interleaving across
/// consumers is unspecified.
pub trait Sink<T>: Send + Sync {
  fn append(&self, item: T);
}

/// A thread-safe collector any number of consumers may write to.
///
/// Appends serialize behind the sink's own lock, independent of the queue's
/// exclusion domain; no lock is ever held across both.
pub struct SharedSink<T> {
  items: Mutex<Vec<T>>,
}

impl<T: Send> SharedSink<T> {
  pub fn new() -> Self {
    Self {
      items: Mutex::new(Vec::new()),
    }
  }

  /// Returns the number of items collected so far.
  pub fn len(&self) -> usize {
    self.items.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns an independent copy of everything collected so far. Mutating
  /// the returned vector does not affect the sink.
  pub fn snapshot(&self) -> Vec<T>
  where
    T: Clone,
  {
    self.items.lock().clone()
  }

  /// Removes all collected items.
  pub fn clear(&self) {
    self.items.lock().clear();
  }

  /// Consumes the sink, returning the collected items without copying.
  pub fn into_inner(self) -> Vec<T> {
    self.items.into_inner()
  }
}

impl<T: Send> Default for SharedSink<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Send> Sink<T> for SharedSink<T> {
  fn append(&self, item: T) {
    self.items.lock().push(item);
  }
}
