//! Processed-record shapes and the emission seam
//!
//! Every event a processor handles is turned into one of these records and
//! handed to a [`RecordSink`]. The field sets are part of the external
//! contract with downstream consumers; the transport behind the sink is not.

use std::sync::Mutex;

use common::{EventCode, OrderKind, OrderStatus, Side};
use tracing::info;

/// A fully converted trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    pub market: String,
    pub seq_id: u64,
    /// Decimal text at quote precision
    pub price: String,
    /// Decimal text at market precision
    pub volume: String,
    /// price × volume, decimal text at quote precision
    pub quote_volume: String,
    pub taker_side: Side,
    pub ask_id: u64,
    pub ask_owner_id: u64,
    pub bid_id: u64,
    pub bid_owner_id: u64,
}

/// A fully converted order status change or activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub market: String,
    pub seq_id: u64,
    pub id: u64,
    pub owner_id: u64,
    pub side: Side,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Whether this records a stop activation rather than a status change
    pub activated: bool,
    /// Decimal text at quote precision
    pub price: String,
    /// Decimal text at market precision
    pub amount: String,
    /// Decimal text; quote precision for a buy, market precision for a sell
    pub funds: String,
    /// Decimal text at market precision
    pub filled_amount: String,
    /// Decimal text at quote precision
    pub used_funds: String,
}

/// An engine-side order failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderErrorRecord {
    pub market: String,
    pub seq_id: u64,
    pub code: EventCode,
    pub order_id: u64,
}

/// One processed event, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedRecord {
    Trade(TradeRecord),
    Order(OrderRecord),
    OrderError(OrderErrorRecord),
}

impl ProcessedRecord {
    /// Market the record belongs to.
    pub fn market(&self) -> &str {
        match self {
            ProcessedRecord::Trade(trade) => &trade.market,
            ProcessedRecord::Order(order) => &order.market,
            ProcessedRecord::OrderError(err) => &err.market,
        }
    }
}

/// Destination for processed records.
///
/// Implementations must tolerate concurrent emission from multiple per-market
/// processors.
pub trait RecordSink: Send + Sync + 'static {
    fn emit(&self, record: ProcessedRecord);
}

/// Sink that emits each record as a structured log line.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn emit(&self, record: ProcessedRecord) {
        match record {
            ProcessedRecord::Trade(trade) => {
                info!(
                    market = %trade.market,
                    seq_id = trade.seq_id,
                    price = %trade.price,
                    volume = %trade.volume,
                    quote_volume = %trade.quote_volume,
                    taker_side = %trade.taker_side,
                    ask_id = trade.ask_id,
                    ask_owner_id = trade.ask_owner_id,
                    bid_id = trade.bid_id,
                    bid_owner_id = trade.bid_owner_id,
                    "trade"
                );
            }
            ProcessedRecord::Order(order) => {
                info!(
                    market = %order.market,
                    seq_id = order.seq_id,
                    order_id = order.id,
                    owner_id = order.owner_id,
                    side = %order.side,
                    kind = %order.kind,
                    status = %order.status,
                    activated = order.activated,
                    price = %order.price,
                    amount = %order.amount,
                    funds = %order.funds,
                    filled_amount = %order.filled_amount,
                    used_funds = %order.used_funds,
                    "order status"
                );
            }
            ProcessedRecord::OrderError(err) => {
                info!(
                    market = %err.market,
                    seq_id = err.seq_id,
                    code = %err.code,
                    order_id = err.order_id,
                    "order error"
                );
            }
        }
    }
}

/// Sink that collects records in memory; used by tests and the demo binary.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ProcessedRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<ProcessedRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: ProcessedRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}
