//! Per-market event processing
//!
//! One [`MarketEventProcessor`] runs per configured market. It owns the
//! [`StreamReader`] bound to that market's event topic, decodes each
//! envelope, converts fixed-point quantities to decimal text at the market's
//! precisions, and hands the result to a [`RecordSink`].
//!
//! A malformed envelope or an unknown payload variant is logged and skipped;
//! only cancellation or delivery-channel closure ends the loop. The processor
//! is terminal: once it reaches [`ProcessorState::Stopped`] nothing restarts
//! it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use codec::{from_fixed_point, scaled_multiply, CodecError};
use common::Market;
use protocol::wire::envelope::Payload;
use protocol::wire::{EventEnvelope, OrderErrorEvent, OrderStatusEvent, TradeEvent};
use protocol::{convert, DecodeError};
use stream::{PartitionTransport, Record, StreamReader, OFFSET_LATEST};

use crate::record::{OrderErrorRecord, OrderRecord, ProcessedRecord, RecordSink, TradeRecord};

/// Lifecycle of a processor, observable through [`MarketEventProcessor::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Created, reader not yet positioned
    Starting,
    /// Consuming from the delivery channel
    Running,
    /// Tearing the reader down after cancellation or stream end
    Draining,
    /// Terminal; no restart
    Stopped,
}

/// In-memory consumption cursor; discarded when the processor stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerCursor {
    /// Offset of the last record pulled off the channel
    pub delivered: Option<i64>,
    /// Offset of the last record handled without error
    pub processed: Option<i64>,
}

/// Failure handling a single delivered record. Always skipped, never fatal
/// to the loop.
#[derive(Debug, Error)]
enum ProcessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Topic a market's events are published on.
pub fn event_topic(market_id: &str) -> String {
    format!("events.{market_id}")
}

pub struct MarketEventProcessor<T: PartitionTransport, S: RecordSink> {
    market: Market,
    reader: StreamReader<T>,
    sink: Arc<S>,
    state: watch::Sender<ProcessorState>,
}

impl<T: PartitionTransport, S: RecordSink> MarketEventProcessor<T, S> {
    /// Create a processor for `market` over `transport`.
    pub fn new(market: Market, transport: T, sink: Arc<S>) -> Self {
        let reader = StreamReader::new(event_topic(&market.id), transport);
        let (state, _) = watch::channel(ProcessorState::Starting);
        Self {
            market,
            reader,
            sink,
            state,
        }
    }

    /// Watch the processor's lifecycle state.
    pub fn state(&self) -> watch::Receiver<ProcessorState> {
        self.state.subscribe()
    }

    /// Market this processor serves.
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Consume the market's event stream until cancellation or stream end.
    pub async fn run(mut self, cancel: CancellationToken) {
        self.reader.set_offset(OFFSET_LATEST);
        let Some(mut messages) = self.reader.messages() else {
            // Channel already taken; nothing to consume.
            self.state.send_replace(ProcessorState::Stopped);
            return;
        };
        self.reader.start(cancel.clone());
        self.state.send_replace(ProcessorState::Running);
        info!(market = %self.market.id, "processor running");

        let mut cursor = ConsumerCursor::default();
        let reason = loop {
            tokio::select! {
                _ = cancel.cancelled() => break "shutdown",
                delivery = messages.recv() => match delivery {
                    Some(record) => {
                        cursor.delivered = Some(record.offset);
                        match self.handle(&record) {
                            Ok(()) => cursor.processed = Some(record.offset),
                            Err(err) => warn!(
                                market = %self.market.id,
                                offset = record.offset,
                                error = %err,
                                "skipping unprocessable record"
                            ),
                        }
                    }
                    None => break "stream ended",
                },
            }
        };

        self.state.send_replace(ProcessorState::Draining);
        info!(
            market = %self.market.id,
            reason,
            last_processed = cursor.processed,
            last_delivered = cursor.delivered,
            "processor draining"
        );
        if let Err(err) = self.reader.close().await {
            warn!(market = %self.market.id, error = %err, "reader teardown failed");
        }
        self.state.send_replace(ProcessorState::Stopped);
        info!(market = %self.market.id, "processor stopped");
    }

    fn handle(&self, record: &Record) -> Result<(), ProcessError> {
        let envelope = protocol::decode_envelope(&record.payload)?;
        match envelope.payload.as_ref() {
            Some(Payload::Trade(trade)) => {
                let processed = self.convert_trade(&envelope, trade)?;
                self.sink.emit(ProcessedRecord::Trade(processed));
            }
            Some(Payload::OrderStatus(status)) => {
                let processed = self.convert_order(&envelope, status, false)?;
                self.sink.emit(ProcessedRecord::Order(processed));
            }
            Some(Payload::OrderActivation(status)) => {
                let processed = self.convert_order(&envelope, status, true)?;
                self.sink.emit(ProcessedRecord::Order(processed));
            }
            Some(Payload::OrderError(err)) => {
                self.sink
                    .emit(ProcessedRecord::OrderError(self.convert_error(&envelope, err)?));
            }
            None => {
                // Forward-compatibility: a variant this build does not know.
                warn!(
                    market = %self.market.id,
                    seq_id = envelope.seq_id,
                    "unhandled event variant, skipping"
                );
            }
        }
        Ok(())
    }

    fn convert_trade(
        &self,
        envelope: &EventEnvelope,
        trade: &TradeEvent,
    ) -> Result<TradeRecord, ProcessError> {
        let taker_side = convert::side_from_wire(trade.taker_side)?;
        let quote_volume = scaled_multiply(
            trade.price,
            self.market.quote_precision,
            trade.amount,
            self.market.market_precision,
            self.market.quote_precision,
        )?;
        Ok(TradeRecord {
            market: self.market.id.clone(),
            seq_id: envelope.seq_id,
            price: from_fixed_point(trade.price, self.market.quote_precision),
            volume: from_fixed_point(trade.amount, self.market.market_precision),
            quote_volume: from_fixed_point(quote_volume, self.market.quote_precision),
            taker_side,
            ask_id: trade.ask_id,
            ask_owner_id: trade.ask_owner_id,
            bid_id: trade.bid_id,
            bid_owner_id: trade.bid_owner_id,
        })
    }

    fn convert_order(
        &self,
        envelope: &EventEnvelope,
        status: &OrderStatusEvent,
        activated: bool,
    ) -> Result<OrderRecord, ProcessError> {
        let side = convert::side_from_wire(status.side)?;
        let kind = convert::order_kind_from_wire(status.kind)?;
        let order_status = convert::order_status_from_wire(status.status)?;
        // Funds denote what was locked: quote-denominated for a buy,
        // base-denominated for a sell.
        let funds_precision = if side.is_buy() {
            self.market.quote_precision
        } else {
            self.market.market_precision
        };
        Ok(OrderRecord {
            market: self.market.id.clone(),
            seq_id: envelope.seq_id,
            id: status.id,
            owner_id: status.owner_id,
            side,
            kind,
            status: order_status,
            activated,
            price: from_fixed_point(status.price, self.market.quote_precision),
            amount: from_fixed_point(status.amount, self.market.market_precision),
            funds: from_fixed_point(status.funds, funds_precision),
            filled_amount: from_fixed_point(status.filled_amount, self.market.market_precision),
            used_funds: from_fixed_point(status.used_funds, self.market.quote_precision),
        })
    }

    fn convert_error(
        &self,
        envelope: &EventEnvelope,
        err: &OrderErrorEvent,
    ) -> Result<OrderErrorRecord, ProcessError> {
        Ok(OrderErrorRecord {
            market: self.market.id.clone(),
            seq_id: envelope.seq_id,
            code: convert::event_code_from_wire(err.code)?,
            order_id: err.order_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemorySink;
    use common::{EventCode, OrderKind, OrderStatus, Side};
    use protocol::wire;
    use stream::MemoryPartition;

    fn btc_usd() -> Market {
        Market::new("BTC-USD", 8, 2)
    }

    fn trade_envelope(seq_id: u64, price: u64, amount: u64) -> Vec<u8> {
        protocol::encode_envelope(&EventEnvelope {
            seq_id,
            market: "BTC-USD".to_string(),
            payload: Some(Payload::Trade(TradeEvent {
                price,
                amount,
                taker_side: wire::Side::Sell as i32,
                ask_id: 1,
                ask_owner_id: 10,
                bid_id: 2,
                bid_owner_id: 20,
            })),
        })
    }

    fn status_envelope(seq_id: u64, side: wire::Side, funds: u64) -> Vec<u8> {
        protocol::encode_envelope(&EventEnvelope {
            seq_id,
            market: "BTC-USD".to_string(),
            payload: Some(Payload::OrderStatus(OrderStatusEvent {
                id: 5,
                owner_id: 9,
                side: side as i32,
                kind: wire::OrderKind::Limit as i32,
                status: wire::OrderStatus::PartiallyFilled as i32,
                price: 500000,
                amount: 100000000,
                funds,
                filled_amount: 50000000,
                used_funds: 250000,
            })),
        })
    }

    async fn wait_for(mut state: watch::Receiver<ProcessorState>, target: ProcessorState) {
        while *state.borrow() != target {
            state.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_trade_conversion_end_to_end() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        partition.push(trade_envelope(42, 500000, 100000000));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let records = sink.records();
        assert_eq!(records.len(), 1);
        match &records[0] {
            ProcessedRecord::Trade(trade) => {
                assert_eq!(trade.market, "BTC-USD");
                assert_eq!(trade.seq_id, 42);
                assert_eq!(trade.price, "5000.00");
                assert_eq!(trade.volume, "1.00000000");
                assert_eq!(trade.quote_volume, "5000.00");
                assert_eq!(trade.taker_side, Side::Sell);
                assert_eq!(trade.ask_id, 1);
                assert_eq!(trade.bid_owner_id, 20);
            }
            other => panic!("unexpected record: {other:?}"),
        }

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_funds_precision_follows_side() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        // Buy locks quote funds (2 places); sell locks base funds (8 places).
        partition.push(status_envelope(1, wire::Side::Buy, 500000));
        partition.push(status_envelope(2, wire::Side::Sell, 100000000));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let records = sink.records();
        assert_eq!(records.len(), 2);
        match (&records[0], &records[1]) {
            (ProcessedRecord::Order(buy), ProcessedRecord::Order(sell)) => {
                assert_eq!(buy.side, Side::Buy);
                assert_eq!(buy.funds, "5000.00");
                assert_eq!(buy.kind, OrderKind::Limit);
                assert_eq!(buy.status, OrderStatus::PartiallyFilled);
                assert_eq!(buy.filled_amount, "0.50000000");
                assert_eq!(buy.used_funds, "2500.00");
                assert!(!buy.activated);

                assert_eq!(sell.side, Side::Sell);
                assert_eq!(sell.funds, "1.00000000");
            }
            other => panic!("unexpected records: {other:?}"),
        }

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_sets_flag() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        partition.push(protocol::encode_envelope(&EventEnvelope {
            seq_id: 3,
            market: "BTC-USD".to_string(),
            payload: Some(Payload::OrderActivation(OrderStatusEvent {
                id: 5,
                owner_id: 9,
                side: wire::Side::Buy as i32,
                kind: wire::OrderKind::Limit as i32,
                status: wire::OrderStatus::Open as i32,
                price: 480000,
                amount: 100000000,
                funds: 480000,
                filled_amount: 0,
                used_funds: 0,
            })),
        }));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        match &sink.records()[..] {
            [ProcessedRecord::Order(order)] => {
                assert!(order.activated);
                assert_eq!(order.status, OrderStatus::Open);
            }
            other => panic!("unexpected records: {other:?}"),
        }

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_error_record() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        partition.push(protocol::encode_envelope(&EventEnvelope {
            seq_id: 9,
            market: "BTC-USD".to_string(),
            payload: Some(Payload::OrderError(OrderErrorEvent {
                code: wire::EventCode::InsufficientFunds as i32,
                order_id: 77,
            })),
        }));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        match &sink.records()[..] {
            [ProcessedRecord::OrderError(err)] => {
                assert_eq!(err.code, EventCode::InsufficientFunds);
                assert_eq!(err.order_id, 77);
                assert_eq!(err.seq_id, 9);
            }
            other => panic!("unexpected records: {other:?}"),
        }

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_and_unhandled_records_are_skipped() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        // Garbage bytes, then an unknown payload variant, then a real trade.
        partition.push(vec![0xff, 0xff, 0xff, 0xff]);
        partition.push(protocol::encode_envelope(&EventEnvelope {
            seq_id: 2,
            market: "BTC-USD".to_string(),
            payload: None,
        }));
        partition.push(trade_envelope(3, 100, 100000000));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        // The loop survived both bad records and processed the trade.
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_matches::assert_matches!(&records[0], ProcessedRecord::Trade(trade) if trade.seq_id == 3);
        assert_eq!(*state.borrow(), ProcessorState::Running);

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_reaches_stopped_and_halts_reads() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;

        let reads_at_stop = partition.read_count();
        partition.push(trade_envelope(1, 1, 1));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(partition.read_count(), reads_at_stop);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_end_drains_and_stops() {
        let partition = MemoryPartition::new();
        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        tokio::spawn(processor.run(CancellationToken::new()));
        wait_for(state.clone(), ProcessorState::Running).await;

        partition.push(trade_envelope(1, 500000, 100000000));
        partition.end_stream();
        wait_for(state, ProcessorState::Stopped).await;

        // The record published before the end was still processed.
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_at_latest_offset() {
        let partition = MemoryPartition::new();
        partition.push(trade_envelope(1, 1, 1));
        partition.push(trade_envelope(2, 1, 1));

        let sink = Arc::new(MemorySink::new());
        let processor = MarketEventProcessor::new(btc_usd(), partition.clone(), sink.clone());
        let state = processor.state();

        let cancel = CancellationToken::new();
        tokio::spawn(processor.run(cancel.clone()));
        wait_for(state.clone(), ProcessorState::Running).await;

        partition.push(trade_envelope(3, 500000, 100000000));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        // Only the record published after startup is seen.
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_matches::assert_matches!(&records[0], ProcessedRecord::Trade(trade) if trade.seq_id == 3);

        cancel.cancel();
        wait_for(state, ProcessorState::Stopped).await;
    }

    #[test]
    fn test_event_topic() {
        assert_eq!(event_topic("BTC-USD"), "events.BTC-USD");
    }
}
