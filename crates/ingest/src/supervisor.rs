//! Supervision of per-market processors
//!
//! One processor task (plus its reader's pull-loop task) per market, all
//! under child tokens of a single shutdown token. Markets share nothing
//! mutable: a stalled or failed market never delays another.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stream::PartitionTransport;

use crate::processor::MarketEventProcessor;
use crate::record::RecordSink;

pub struct ProcessorSupervisor {
    cancel: CancellationToken,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl ProcessorSupervisor {
    /// Create a supervisor whose processors stop when `cancel` fires.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            tasks: Vec::new(),
        }
    }

    /// Launch `processor` on its own task.
    pub fn spawn<T, S>(&mut self, processor: MarketEventProcessor<T, S>)
    where
        T: PartitionTransport,
        S: RecordSink,
    {
        let market_id = processor.market().id.clone();
        let token = self.cancel.child_token();
        info!(market = %market_id, "starting market processor");
        let handle = tokio::spawn(processor.run(token));
        self.tasks.push((market_id, handle));
    }

    /// Number of processors launched.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every processor to stop.
    ///
    /// Does not trigger shutdown itself; cancel the token first (or let the
    /// streams end) or this waits indefinitely.
    pub async fn join(self) {
        for (market_id, handle) in self.tasks {
            if let Err(err) = handle.await {
                warn!(market = %market_id, error = %err, "processor task failed");
            } else {
                info!(market = %market_id, "processor task finished");
            }
        }
    }
}
