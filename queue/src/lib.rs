//! A bounded, thread-safe blocking queue for producer/consumer pipelines.
//!
//! The [`BoundedQueue`] blocks producers while full and consumers while empty,
//! and its cooperative [`shutdown`](BoundedQueue::shutdown) releases every
//! blocked party while preserving buffered items until they are drained.
//! [`Producer`] and [`Consumer`] run the two halves of a pipeline on their own
//! OS threads, each with an independent stop signal, and [`SharedSink`]
//! collects consumed items safely across any number of consumers.

pub mod consumer;
pub mod error;
pub mod producer;
pub mod queue;
pub mod sink;

mod task;

pub use consumer::{Consumer, ConsumerHandle};
pub use error::{GetError, GetErrorTimeout, PutError, PutErrorTimeout, TryGetError, TryPutError};
pub use producer::{Producer, ProducerHandle};
pub use queue::{BoundedQueue, QueueStats, ShutdownGuard};
pub use sink::{SharedSink, Sink};
