//! Partitioned log abstractions
//!
//! [`StreamReader`] pulls records from one partition of an ordered log through
//! a capacity-1 delivery channel: the consumer never has more than one record
//! in flight, which is the system's backpressure mechanism. [`StreamWriter`]
//! publishes records and exposes batching tunables and counters.
//!
//! The underlying log client sits behind the [`PartitionTransport`] /
//! [`PartitionPublisher`] seam; [`MemoryPartition`] is the in-process
//! implementation used by tests and the demo binary.

pub mod error;
pub mod memory;
pub mod reader;
pub mod transport;
pub mod writer;

pub use error::{StreamError, TransportError};
pub use memory::MemoryPartition;
pub use reader::StreamReader;
pub use transport::{PartitionPublisher, PartitionTransport, Record, OFFSET_EARLIEST, OFFSET_LATEST};
pub use writer::{StreamWriter, WriterConfig, WriterStats};
