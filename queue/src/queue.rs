// src/queue.rs

//! The synchronized bounded FIFO at the heart of the pipeline.
//!
//! A single `parking_lot::Mutex` guards the buffer, the shutdown flag, and
//! the running counters; two condition variables derived from it, `not_full`
//! and `not_empty`, carry the wait/notify traffic, so a blocked producer is
//! only woken when space may exist and a blocked consumer only when an item
//! may exist. Every wait sits in a re-checked predicate loop: condition
//! variables are subject to spurious wakeups, multiple waiters can race for
//! the same slot, and shutdown can race a pending wait.
//!
//! Shutdown is a one-way latch. It rejects producers immediately but lets
//! consumers keep draining whatever is buffered; shutting down never
//! discards data.

use crate::error::{GetError, GetErrorTimeout, PutError, PutErrorTimeout, TryGetError, TryPutError};

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::time::{Duration, Instant};

/// Mutable queue state. Everything in here shares one exclusion domain.
struct Inner<T> {
  buffer: VecDeque<T>,
  shutdown: bool,
  added: u64,
  removed: u64,
  blocked_puts: u64,
  blocked_gets: u64,
}

/// A bounded, thread-safe blocking FIFO shared by any number of producer and
/// consumer threads.
///
/// Share it via `Arc`; the queue itself has no owning side. Items preserve
/// per-producer FIFO order end to end. Which consumer receives which item,
/// and how multiple producers' items interleave, is unspecified.
pub struct BoundedQueue<T> {
  inner: Mutex<Inner<T>>,
  not_full: Condvar,
  not_empty: Condvar,
  capacity: usize,
}

impl<T> BoundedQueue<T> {
  /// Creates a queue holding at most `capacity` items.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` is zero. Capacity is fixed for the lifetime of the
  /// queue; a single-slot queue (`capacity == 1`) degenerates to a blocking
  /// handoff and is fully supported.
  pub fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "capacity must be at least 1");
    Self {
      inner: Mutex::new(Inner {
        buffer: VecDeque::with_capacity(capacity),
        shutdown: false,
        added: 0,
        removed: 0,
        blocked_puts: 0,
        blocked_gets: 0,
      }),
      not_full: Condvar::new(),
      not_empty: Condvar::new(),
      capacity,
    }
  }

  /// Returns the fixed capacity of the queue.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Appends an item, blocking the calling thread while the queue is full.
  ///
  /// Wakes one waiting consumer on success. Fails only if the queue shuts
  /// down, whether the shutdown happened before the call or while waiting;
  /// after shutdown this returns immediately even when space is free.
  pub fn put(&self, item: T) -> Result<(), PutError> {
    let mut inner = self.inner.lock();
    let mut blocked = false;
    while inner.buffer.len() >= self.capacity && !inner.shutdown {
      if !blocked {
        inner.blocked_puts += 1;
        blocked = true;
      }
      self.not_full.wait(&mut inner);
    }
    if inner.shutdown {
      return Err(PutError::Shutdown);
    }
    self.push_locked(&mut inner, item);
    Ok(())
  }

  /// Like [`put`](Self::put), but waits at most `timeout`.
  ///
  /// The wait is deadline-based: however many times the thread is woken and
  /// the slot stolen by a rival producer, the total wait never exceeds
  /// `timeout`. A zero timeout makes this a non-blocking attempt. The item
  /// is returned inside the error on failure.
  pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutErrorTimeout<T>> {
    let deadline = Instant::now() + timeout;
    let mut inner = self.inner.lock();
    let mut blocked = false;
    while inner.buffer.len() >= self.capacity && !inner.shutdown {
      if !blocked {
        inner.blocked_puts += 1;
        blocked = true;
      }
      if self.not_full.wait_until(&mut inner, deadline).timed_out()
        && inner.buffer.len() >= self.capacity
        && !inner.shutdown
      {
        return Err(PutErrorTimeout::Timeout(item));
      }
    }
    if inner.shutdown {
      return Err(PutErrorTimeout::Shutdown(item));
    }
    self.push_locked(&mut inner, item);
    Ok(())
  }

  /// Non-blocking append attempt. The item is returned inside the error when
  /// the queue is full or shut down.
  pub fn try_put(&self, item: T) -> Result<(), TryPutError<T>> {
    let mut inner = self.inner.lock();
    if inner.shutdown {
      return Err(TryPutError::Shutdown(item));
    }
    if inner.buffer.len() >= self.capacity {
      return Err(TryPutError::Full(item));
    }
    self.push_locked(&mut inner, item);
    Ok(())
  }

  /// Removes and returns the oldest item, blocking while the queue is empty.
  ///
  /// Wakes one waiting producer on success. Fails only when the queue is
  /// shut down AND empty; a shut-down queue with items remaining still
  /// yields them, so buffered data is never lost to shutdown.
  pub fn get(&self) -> Result<T, GetError> {
    let mut inner = self.inner.lock();
    let mut blocked = false;
    while inner.buffer.is_empty() && !inner.shutdown {
      if !blocked {
        inner.blocked_gets += 1;
        blocked = true;
      }
      self.not_empty.wait(&mut inner);
    }
    // Empty here implies the shutdown latch: the wait loop only exits with
    // an item available or shutdown set.
    self.pop_locked(&mut inner).ok_or(GetError::Shutdown)
  }

  /// Like [`get`](Self::get), but waits at most `timeout`.
  ///
  /// Deadline-based, like [`put_timeout`](Self::put_timeout). A zero timeout
  /// makes this a non-blocking attempt. `Timeout` and `Shutdown` are
  /// distinct outcomes; only `Shutdown` means no more data will ever arrive.
  pub fn get_timeout(&self, timeout: Duration) -> Result<T, GetErrorTimeout> {
    let deadline = Instant::now() + timeout;
    let mut inner = self.inner.lock();
    let mut blocked = false;
    while inner.buffer.is_empty() && !inner.shutdown {
      if !blocked {
        inner.blocked_gets += 1;
        blocked = true;
      }
      if self.not_empty.wait_until(&mut inner, deadline).timed_out()
        && inner.buffer.is_empty()
        && !inner.shutdown
      {
        return Err(GetErrorTimeout::Timeout);
      }
    }
    self.pop_locked(&mut inner).ok_or(GetErrorTimeout::Shutdown)
  }

  /// Non-blocking removal attempt.
  pub fn try_get(&self) -> Result<T, TryGetError> {
    let mut inner = self.inner.lock();
    match self.pop_locked(&mut inner) {
      Some(item) => Ok(item),
      None if inner.shutdown => Err(TryGetError::Shutdown),
      None => Err(TryGetError::Empty),
    }
  }

  /// Returns the number of items currently buffered.
  #[inline]
  pub fn len(&self) -> usize {
    self.inner.lock().buffer.len()
  }

  /// Returns `true` if no items are buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the queue is at capacity.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.len() >= self.capacity
  }

  /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
  #[inline]
  pub fn is_shutdown(&self) -> bool {
    self.inner.lock().shutdown
  }

  /// Latches the shutdown flag and wakes every blocked producer and
  /// consumer. Idempotent.
  ///
  /// Buffered items survive: producers fail from here on, while consumers
  /// keep draining until the buffer is empty.
  pub fn shutdown(&self) {
    let mut inner = self.inner.lock();
    let first = !inner.shutdown;
    inner.shutdown = true;
    let remaining = inner.buffer.len();
    drop(inner);
    // Broadcast, not single-wake: every waiter must observe the latch.
    // Waking outside the lock lets released threads take it immediately.
    self.not_full.notify_all();
    self.not_empty.notify_all();
    if first {
      tracing::debug!(remaining, "queue shut down");
    }
  }

  /// Atomically discards all buffered items and wakes blocked producers,
  /// since space is now available. Leaves the shutdown flag untouched.
  ///
  /// Discarded items count as neither added nor removed; after a `clear`,
  /// [`QueueStats::len`] is the authoritative occupancy.
  pub fn clear(&self) {
    let mut inner = self.inner.lock();
    let discarded = inner.buffer.len();
    inner.buffer.clear();
    drop(inner);
    self.not_full.notify_all();
    if discarded > 0 {
      tracing::debug!(discarded, "queue cleared");
    }
  }

  /// Returns a consistent snapshot of the queue's counters, taken atomically
  /// under the same lock put/get use.
  pub fn stats(&self) -> QueueStats {
    let inner = self.inner.lock();
    QueueStats {
      added: inner.added,
      removed: inner.removed,
      blocked_puts: inner.blocked_puts,
      blocked_gets: inner.blocked_gets,
      len: inner.buffer.len(),
      capacity: self.capacity,
    }
  }

  /// Returns a guard that calls [`shutdown`](Self::shutdown) when dropped,
  /// guaranteeing shutdown on every exit path of the enclosing scope:
  /// normal return, early return, or panic.
  pub fn shutdown_guard(&self) -> ShutdownGuard<'_, T> {
    ShutdownGuard { queue: self }
  }

  fn push_locked(&self, inner: &mut MutexGuard<'_, Inner<T>>, item: T) {
    inner.buffer.push_back(item);
    inner.added += 1;
    self.not_empty.notify_one();
  }

  fn pop_locked(&self, inner: &mut MutexGuard<'_, Inner<T>>) -> Option<T> {
    let item = inner.buffer.pop_front()?;
    inner.removed += 1;
    self.not_full.notify_one();
    Some(item)
  }
}

impl<T> fmt::Debug for BoundedQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("BoundedQueue")
      .field("capacity", &self.capacity)
      .field("len", &inner.buffer.len())
      .field("shutdown", &inner.shutdown)
      .finish()
  }
}

/// A consistent point-in-time snapshot of a queue's counters.
///
/// `blocked_puts` and `blocked_gets` count calls that had to wait at least
/// once, not individual wakeups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
  /// Total items ever appended.
  pub added: u64,
  /// Total items ever removed by a get.
  pub removed: u64,
  /// Put calls that blocked before completing (or failing).
  pub blocked_puts: u64,
  /// Get calls that blocked before completing (or failing).
  pub blocked_gets: u64,
  /// Items buffered at snapshot time.
  pub len: usize,
  /// The queue's fixed capacity.
  pub capacity: usize,
}

/// RAII guard returned by [`BoundedQueue::shutdown_guard`].
///
/// Dereferences to the queue; shuts it down on drop. Since shutdown is
/// idempotent, calling it earlier by hand is fine.
#[must_use = "the queue shuts down when the guard is dropped"]
pub struct ShutdownGuard<'a, T> {
  queue: &'a BoundedQueue<T>,
}

impl<T> Deref for ShutdownGuard<'_, T> {
  type Target = BoundedQueue<T>;

  fn deref(&self) -> &Self::Target {
    self.queue
  }
}

impl<T> Drop for ShutdownGuard<'_, T> {
  fn drop(&mut self) {
    self.queue.shutdown();
  }
}
