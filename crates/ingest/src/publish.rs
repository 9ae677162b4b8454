//! Outbound order-command publishing
//!
//! The HTTP layer hands over validated decimal-text tuples; this module
//! converts them to fixed-point at the market's precisions, computes the
//! funds to lock, enforces the command invariant, and publishes the encoded
//! command on the market's command topic.
//!
//! Funds rules: a sell locks the base amount itself; a buy limit locks
//! price × amount at quote precision; a buy market order locks the stated
//! quote balance.

use thiserror::Error;

use codec::{scaled_multiply, to_fixed_point, CodecError};
use common::{CommandKind, Market, OrderKind, Side, StopKind};
use protocol::wire;
use stream::{PartitionPublisher, Record, StreamError, StreamWriter};

/// Topic a market's order commands are published on.
pub fn command_topic(market_id: &str) -> String {
    format!("orders.{market_id}")
}

/// Failure publishing an order or cancel command.
///
/// Conversion failures mean bad input; the caller should reject the request.
/// Stream failures mean the command was not published.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The assembled command failed its invariant check
    #[error("order command failed validation")]
    InvalidCommand,

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// A new-order request as supplied by the HTTP layer, amounts as decimal text.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub order_id: u64,
    pub owner_id: u64,
    pub side: Side,
    pub kind: OrderKind,
    pub stop: StopKind,
    /// Base amount, at market precision
    pub amount: String,
    /// Limit price, at quote precision; ignored for market orders
    pub price: String,
    /// Stop price, at quote precision; required when `stop` is set
    pub stop_price: String,
    /// Quote balance to spend; used only by a market buy
    pub funds: String,
}

/// A cancel request referencing a previously published order.
#[derive(Debug, Clone)]
pub struct CancelRequest {
    pub order_id: u64,
    pub owner_id: u64,
    pub side: Side,
    pub kind: OrderKind,
    pub stop: StopKind,
    /// Price of the resting order, at quote precision; required for a limit
    pub price: String,
    /// Stop price of the resting order, at quote precision
    pub stop_price: String,
}

/// Per-market gateway from validated requests to published commands.
pub struct OrderGateway<P: PartitionPublisher> {
    market: Market,
    writer: StreamWriter<P>,
}

impl<P: PartitionPublisher> OrderGateway<P> {
    pub fn new(market: Market, publisher: P) -> Self {
        let writer = StreamWriter::new(command_topic(&market.id), publisher);
        Self { market, writer }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Writer carrying this gateway's commands; exposed for stats.
    pub fn writer(&self) -> &StreamWriter<P> {
        &self.writer
    }

    /// Convert, validate, and publish a new order.
    pub async fn publish_order(
        &self,
        request: &OrderRequest,
    ) -> Result<wire::OrderCommand, PublishError> {
        let amount = to_fixed_point(&request.amount, self.market.market_precision)?;
        let price = match request.kind {
            OrderKind::Limit => to_fixed_point(&request.price, self.market.quote_precision)?,
            OrderKind::Market => 0,
        };
        let stop_price = match request.stop {
            StopKind::None => 0,
            StopKind::Stop => to_fixed_point(&request.stop_price, self.market.quote_precision)?,
        };
        let funds = match request.side {
            Side::Sell => amount,
            Side::Buy => match request.kind {
                OrderKind::Limit => scaled_multiply(
                    price,
                    self.market.quote_precision,
                    amount,
                    self.market.market_precision,
                    self.market.quote_precision,
                )?,
                OrderKind::Market => {
                    to_fixed_point(&request.funds, self.market.quote_precision)?
                }
            },
        };

        let command = wire::OrderCommand {
            id: request.order_id,
            market: self.market.id.clone(),
            owner_id: request.owner_id,
            side: wire::Side::from(request.side) as i32,
            kind: wire::OrderKind::from(request.kind) as i32,
            stop: wire::StopKind::from(request.stop) as i32,
            command: wire::CommandKind::from(CommandKind::New) as i32,
            price,
            amount,
            stop_price,
            funds,
        };
        self.publish(command).await
    }

    /// Convert, validate, and publish a cancel.
    pub async fn publish_cancel(
        &self,
        request: &CancelRequest,
    ) -> Result<wire::OrderCommand, PublishError> {
        let price = match request.kind {
            OrderKind::Limit => to_fixed_point(&request.price, self.market.quote_precision)?,
            OrderKind::Market => 0,
        };
        let stop_price = match request.stop {
            StopKind::None => 0,
            StopKind::Stop => to_fixed_point(&request.stop_price, self.market.quote_precision)?,
        };

        let command = wire::OrderCommand {
            id: request.order_id,
            market: self.market.id.clone(),
            owner_id: request.owner_id,
            side: wire::Side::from(request.side) as i32,
            kind: wire::OrderKind::from(request.kind) as i32,
            stop: wire::StopKind::from(request.stop) as i32,
            command: wire::CommandKind::from(CommandKind::Cancel) as i32,
            price,
            amount: 0,
            stop_price,
            funds: 0,
        };
        self.publish(command).await
    }

    async fn publish(
        &self,
        command: wire::OrderCommand,
    ) -> Result<wire::OrderCommand, PublishError> {
        if !command.valid() {
            return Err(PublishError::InvalidCommand);
        }
        let payload = protocol::encode_command(&command);
        self.writer
            .write(vec![Record::from_payload(payload)])
            .await?;
        Ok(command)
    }

    /// Close the underlying writer.
    pub async fn close(&self) -> Result<(), StreamError> {
        self.writer.close().await
    }
}
