//! In-process partition backed by a Vec
//!
//! Serves as the transport implementation for tests and the demo binary.
//! Clones share the same underlying log, so one handle can publish while
//! another consumes. Fault injection hooks let tests drive the reader's
//! retry and teardown paths.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::TransportError;
use crate::transport::{
    PartitionPublisher, PartitionTransport, Record, OFFSET_EARLIEST, OFFSET_LATEST,
};

#[derive(Default)]
struct State {
    log: Vec<Record>,
    next_read: i64,
    faults: VecDeque<TransportError>,
    tail_fault: Option<TransportError>,
    closed: bool,
    end_of_stream: bool,
    read_count: u64,
    close_calls: u64,
}

struct Shared {
    state: Mutex<State>,
    notify: Notify,
}

/// Shared in-memory partition.
#[derive(Clone)]
pub struct MemoryPartition {
    shared: Arc<Shared>,
}

impl Default for MemoryPartition {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPartition {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                notify: Notify::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a payload directly, returning its assigned offset.
    pub fn push(&self, payload: Vec<u8>) -> i64 {
        let mut state = self.lock();
        let offset = state.log.len() as i64;
        state.log.push(Record {
            offset,
            key: Vec::new(),
            payload,
        });
        drop(state);
        self.shared.notify.notify_waiters();
        offset
    }

    /// Queue a failure to be returned by the next read, ahead of any records.
    pub fn inject_fault(&self, fault: TransportError) {
        self.lock().faults.push_back(fault);
        self.shared.notify.notify_waiters();
    }

    /// Queue a failure to be returned once all current records are drained.
    pub fn inject_fault_after_records(&self, fault: TransportError) {
        self.lock().tail_fault = Some(fault);
        self.shared.notify.notify_waiters();
    }

    /// Mark the partition as complete; reads past the end return
    /// [`TransportError::EndOfStream`] instead of blocking.
    pub fn end_stream(&self) {
        self.lock().end_of_stream = true;
        self.shared.notify.notify_waiters();
    }

    /// Number of successful reads served so far.
    pub fn read_count(&self) -> u64 {
        self.lock().read_count
    }

    /// Number of times `close` has been called.
    pub fn close_calls(&self) -> u64 {
        self.lock().close_calls
    }

    /// Snapshot of the full log.
    pub fn records(&self) -> Vec<Record> {
        self.lock().log.clone()
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }
}

#[async_trait]
impl PartitionTransport for MemoryPartition {
    async fn read(&self) -> Result<Record, TransportError> {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            // Arm the waiter before inspecting state so a publish landing in
            // between is not lost.
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return Err(TransportError::Fatal("partition closed".into()));
                }
                if let Some(fault) = state.faults.pop_front() {
                    return Err(fault);
                }
                let index = state.next_read as usize;
                if index < state.log.len() {
                    let record = state.log[index].clone();
                    state.next_read += 1;
                    state.read_count += 1;
                    return Ok(record);
                }
                if let Some(fault) = state.tail_fault.take() {
                    return Err(fault);
                }
                if state.end_of_stream {
                    return Err(TransportError::EndOfStream);
                }
            }

            notified.await;
        }
    }

    fn seek(&self, offset: i64) {
        let mut state = self.lock();
        state.next_read = match offset {
            OFFSET_EARLIEST => 0,
            OFFSET_LATEST => state.log.len() as i64,
            absolute => absolute.max(0),
        };
    }

    fn position(&self) -> i64 {
        self.lock().next_read
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.closed = true;
        state.close_calls += 1;
        drop(state);
        self.shared.notify.notify_waiters();
        Ok(())
    }
}

#[async_trait]
impl PartitionPublisher for MemoryPartition {
    async fn publish(&self, records: Vec<Record>) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Fatal("partition closed".into()));
        }
        for mut record in records {
            record.offset = state.log.len() as i64;
            state.log.push(record);
        }
        drop(state);
        self.shared.notify.notify_waiters();
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        PartitionTransport::close(self).await
    }
}
