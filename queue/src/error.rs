// src/error.rs

//! Errors returned by queue operations.
//!
//! Timeouts and shutdown are ordinary, expected outcomes that callers match
//! on; none of these is a fault, and nothing here is retried internally.

use core::fmt;

/// Error returned by blocking [`put`](crate::BoundedQueue::put) operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PutError {
  /// The queue has been shut down and accepts no further items.
  Shutdown,
}
impl std::error::Error for PutError {}
impl fmt::Display for PutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PutError::Shutdown => write!(f, "queue shut down"),
    }
  }
}

/// Error returned by [`put_timeout`](crate::BoundedQueue::put_timeout).
/// The item being sent is returned so the caller can retry.
#[derive(PartialEq, Eq, Clone)]
pub enum PutErrorTimeout<T> {
  /// The timeout elapsed before space became available.
  Timeout(T),
  /// The queue has been shut down and accepts no further items.
  Shutdown(T),
}

impl<T> PutErrorTimeout<T> {
  /// Consumes the error, returning the item that could not be enqueued.
  #[inline]
  pub fn into_inner(self) -> T {
    match self {
      PutErrorTimeout::Timeout(v) => v,
      PutErrorTimeout::Shutdown(v) => v,
    }
  }
}

impl<T> fmt::Debug for PutErrorTimeout<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PutErrorTimeout::Timeout(_) => write!(f, "PutErrorTimeout::Timeout(..)"),
      PutErrorTimeout::Shutdown(_) => write!(f, "PutErrorTimeout::Shutdown(..)"),
    }
  }
}

impl<T> fmt::Display for PutErrorTimeout<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PutErrorTimeout::Timeout(_) => write!(f, "put operation timed out"),
      PutErrorTimeout::Shutdown(_) => write!(f, "queue shut down"),
    }
  }
}

impl<T> std::error::Error for PutErrorTimeout<T> {}

/// Error returned by [`try_put`](crate::BoundedQueue::try_put) when the item
/// could not be enqueued immediately. The item is returned to the caller.
#[derive(PartialEq, Eq, Clone)]
pub enum TryPutError<T> {
  /// The queue is at capacity.
  Full(T),
  /// The queue has been shut down and accepts no further items.
  Shutdown(T),
}

impl<T> TryPutError<T> {
  /// Consumes the error, returning the item that could not be enqueued.
  #[inline]
  pub fn into_inner(self) -> T {
    match self {
      TryPutError::Full(v) => v,
      TryPutError::Shutdown(v) => v,
    }
  }
}

impl<T> fmt::Debug for TryPutError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPutError::Full(_) => write!(f, "TryPutError::Full(..)"),
      TryPutError::Shutdown(_) => write!(f, "TryPutError::Shutdown(..)"),
    }
  }
}

impl<T> fmt::Display for TryPutError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPutError::Full(_) => write!(f, "queue full"),
      TryPutError::Shutdown(_) => write!(f, "queue shut down"),
    }
  }
}

impl<T> std::error::Error for TryPutError<T> {}

/// Error returned by blocking [`get`](crate::BoundedQueue::get) operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GetError {
  /// The queue has been shut down and is fully drained.
  Shutdown,
}
impl std::error::Error for GetError {}
impl fmt::Display for GetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GetError::Shutdown => write!(f, "queue shut down and drained"),
    }
  }
}

/// Error returned by [`get_timeout`](crate::BoundedQueue::get_timeout).
///
/// `Timeout` and `Shutdown` are distinct on purpose: a shut-down queue with
/// items still buffered keeps yielding them, so only `Shutdown` means the
/// pipeline is over.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GetErrorTimeout {
  /// The timeout elapsed before an item became available.
  Timeout,
  /// The queue has been shut down and is fully drained.
  Shutdown,
}
impl std::error::Error for GetErrorTimeout {}
impl fmt::Display for GetErrorTimeout {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GetErrorTimeout::Timeout => write!(f, "get operation timed out"),
      GetErrorTimeout::Shutdown => write!(f, "queue shut down and drained"),
    }
  }
}

/// Error returned by [`try_get`](crate::BoundedQueue::try_get) when no item
/// could be taken immediately.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryGetError {
  /// The queue is empty but still live; more items may arrive.
  Empty,
  /// The queue has been shut down and is fully drained.
  Shutdown,
}
impl std::error::Error for TryGetError {}
impl fmt::Display for TryGetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryGetError::Empty => write!(f, "queue empty"),
      TryGetError::Shutdown => write!(f, "queue shut down and drained"),
    }
  }
}
