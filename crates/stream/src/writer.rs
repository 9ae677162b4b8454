//! Publishing side of a partition
//!
//! The writer is a thin, internally counted wrapper over a
//! [`PartitionPublisher`]. Writes block until the log acknowledges the
//! records. Batching tunables are carried here so a broker-backed publisher
//! can size its internal queue from them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::StreamError;
use crate::transport::{PartitionPublisher, Record};

/// Batching tunables handed to the underlying publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Records buffered before writes apply backpressure
    pub queue_capacity: usize,
    /// Records per flushed batch
    pub batch_size: usize,
    /// Flush deadline for a partial batch
    pub batch_timeout: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            batch_size: 20_000,
            batch_timeout: Duration::from_millis(100),
        }
    }
}

/// Counters maintained across the writer's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Successful write calls
    pub writes: u64,
    /// Records acknowledged by the log
    pub records: u64,
    /// Failed write calls
    pub errors: u64,
}

/// Writer bound to one topic.
pub struct StreamWriter<P: PartitionPublisher> {
    topic: String,
    publisher: Arc<P>,
    config: WriterConfig,
    writes: AtomicU64,
    records: AtomicU64,
    errors: AtomicU64,
    closed: AtomicBool,
}

impl<P: PartitionPublisher> StreamWriter<P> {
    pub fn new(topic: impl Into<String>, publisher: P) -> Self {
        Self::with_config(topic, publisher, WriterConfig::default())
    }

    pub fn with_config(topic: impl Into<String>, publisher: P, config: WriterConfig) -> Self {
        Self {
            topic: topic.into(),
            publisher: Arc::new(publisher),
            config,
            writes: AtomicU64::new(0),
            records: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Topic this writer publishes to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Batching tunables in effect.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Append records, returning once the log acknowledges them.
    pub async fn write(&self, records: Vec<Record>) -> Result<(), StreamError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StreamError::WriterClosed);
        }
        let count = records.len() as u64;
        match self.publisher.publish(records).await {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                self.records.fetch_add(count, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                Err(err.into())
            }
        }
    }

    /// Close the writer. Only the first call tears down the publisher;
    /// subsequent calls succeed without effect.
    pub async fn close(&self) -> Result<(), StreamError> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.publisher.close().await?;
        }
        Ok(())
    }

    /// Snapshot of the lifetime counters.
    pub fn stats(&self) -> WriterStats {
        WriterStats {
            writes: self.writes.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
