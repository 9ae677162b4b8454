//! Transport seam over a single partition of an ordered log
//!
//! Implementations wrap the external log client and are internally
//! synchronized: every method takes `&self` and may be called concurrently
//! with an in-flight `read`.

use async_trait::async_trait;

use crate::error::TransportError;

/// Sentinel offset selecting the oldest retained record.
pub const OFFSET_EARLIEST: i64 = -2;

/// Sentinel offset selecting the next record to be produced.
pub const OFFSET_LATEST: i64 = -1;

/// One record of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Physical position within the partition; assigned by the log
    pub offset: i64,
    /// Optional partitioning key
    pub key: Vec<u8>,
    /// Opaque payload bytes
    pub payload: Vec<u8>,
}

impl Record {
    /// Build an outbound record from payload bytes; the log assigns the
    /// offset on append.
    pub fn from_payload(payload: Vec<u8>) -> Self {
        Self {
            offset: 0,
            key: Vec::new(),
            payload,
        }
    }
}

/// Consuming side of one partition.
#[async_trait]
pub trait PartitionTransport: Send + Sync + 'static {
    /// Block until the next record at the current position is available.
    async fn read(&self) -> Result<Record, TransportError>;

    /// Position the next read. Non-negative values are absolute offsets;
    /// [`OFFSET_EARLIEST`] and [`OFFSET_LATEST`] select the well-known
    /// starting points.
    fn seek(&self, offset: i64);

    /// Offset the next read will return.
    fn position(&self) -> i64;

    /// Record offsets as consumed. Offset durability is an external concern;
    /// implementations may discard this.
    async fn commit(&self, offsets: &[i64]) -> Result<(), TransportError> {
        let _ = offsets;
        Ok(())
    }

    /// Tear down the connection. Pending and subsequent reads fail.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Producing side of one partition.
#[async_trait]
pub trait PartitionPublisher: Send + Sync + 'static {
    /// Append records, returning once the log acknowledges them.
    async fn publish(&self, records: Vec<Record>) -> Result<(), TransportError>;

    /// Tear down the connection.
    async fn close(&self) -> Result<(), TransportError>;
}
