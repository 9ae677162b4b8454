//! Reconnect-capable reader over one partition
//!
//! `start` launches a single background pull loop that is the sole producer
//! into a capacity-1 delivery channel. Transient transport errors are retried
//! after a fixed backoff without terminating the loop; a fatal error or a
//! clean end-of-stream tears the reader down exactly once and closes the
//! channel, which is the only termination signal the consumer sees.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{StreamError, TransportError};
use crate::transport::{PartitionTransport, Record};

/// Fixed wait between retries of a transient read failure.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

// The delivery channel holds exactly one record: the pull loop cannot run
// ahead of the consumer by more than the one in-flight message.
const DELIVERY_CAPACITY: usize = 1;

/// Reader over a single partition of an ordered log.
pub struct StreamReader<T: PartitionTransport> {
    topic: String,
    transport: Arc<T>,
    sender: Option<mpsc::Sender<Record>>,
    receiver: Option<mpsc::Receiver<Record>>,
    closed: Arc<AtomicBool>,
    backoff: Duration,
}

impl<T: PartitionTransport> StreamReader<T> {
    /// Create a reader bound to `topic` with the default retry backoff.
    pub fn new(topic: impl Into<String>, transport: T) -> Self {
        Self::with_backoff(topic, transport, DEFAULT_RETRY_BACKOFF)
    }

    /// Create a reader with an explicit retry backoff.
    pub fn with_backoff(topic: impl Into<String>, transport: T, backoff: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(DELIVERY_CAPACITY);
        Self {
            topic: topic.into(),
            transport: Arc::new(transport),
            sender: Some(sender),
            receiver: Some(receiver),
            closed: Arc::new(AtomicBool::new(false)),
            backoff,
        }
    }

    /// Topic this reader is bound to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Position the next read.
    pub fn set_offset(&self, offset: i64) {
        self.transport.seek(offset);
    }

    /// Offset the next read will return.
    pub fn offset(&self) -> i64 {
        self.transport.position()
    }

    /// Take the receive side of the delivery channel.
    ///
    /// Returns `None` after the first call; there is exactly one consumer.
    pub fn messages(&mut self) -> Option<mpsc::Receiver<Record>> {
        self.receiver.take()
    }

    /// Record offsets as consumed by the underlying transport.
    pub async fn commit(&self, offsets: &[i64]) -> Result<(), StreamError> {
        Ok(self.transport.commit(offsets).await?)
    }

    /// Launch the background pull loop. A second call is a no-op.
    pub fn start(&mut self, cancel: CancellationToken) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        let topic = self.topic.clone();
        let transport = Arc::clone(&self.transport);
        let closed = Arc::clone(&self.closed);
        let backoff = self.backoff;
        tokio::spawn(async move {
            pull_loop(topic, transport, sender, closed, backoff, cancel).await;
        });
    }

    /// Tear down the reader.
    ///
    /// Safe to call concurrently with the pull loop and from multiple call
    /// sites; only the first invocation performs the underlying teardown and
    /// every caller observes success.
    pub async fn close(&self) -> Result<(), StreamError> {
        Ok(close_once(&*self.transport, &self.closed).await?)
    }
}

async fn close_once<T: PartitionTransport + ?Sized>(
    transport: &T,
    closed: &AtomicBool,
) -> Result<(), TransportError> {
    if closed
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        transport.close().await
    } else {
        Ok(())
    }
}

async fn pull_loop<T: PartitionTransport>(
    topic: String,
    transport: Arc<T>,
    sender: mpsc::Sender<Record>,
    closed: Arc<AtomicBool>,
    backoff: Duration,
    cancel: CancellationToken,
) {
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = transport.read() => result,
        };

        match result {
            Ok(record) => {
                // Blocks until the consumer drains the previous record.
                let delivered = tokio::select! {
                    _ = cancel.cancelled() => false,
                    sent = sender.send(record) => sent.is_ok(),
                };
                if !delivered {
                    break;
                }
            }
            Err(err) if err.is_transient() => {
                warn!(
                    topic = %topic,
                    error = %err,
                    "unable to read from partition, retrying after backoff"
                );
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = time::sleep(backoff) => {}
                }
            }
            Err(TransportError::EndOfStream) => {
                info!(topic = %topic, "stream ended, closing reader");
                break;
            }
            Err(err) => {
                error!(
                    topic = %topic,
                    error = %err,
                    "fatal read failure, closing reader"
                );
                break;
            }
        }
    }

    if let Err(err) = close_once(&*transport, &closed).await {
        warn!(topic = %topic, error = %err, "transport teardown failed");
    }
    // The sender drops here, which closes the delivery channel.
}
