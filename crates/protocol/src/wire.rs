//! Protobuf message and enum definitions
//!
//! Hand-written prost types; field tags are part of the external contract
//! with the matching engine and must not be renumbered.

/// Event stream record published by the matching engine.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventEnvelope {
    /// Engine-assigned sequence number, monotonic per market
    #[prost(uint64, tag = "1")]
    pub seq_id: u64,
    /// Market identifier the event belongs to
    #[prost(string, tag = "2")]
    pub market: ::prost::alloc::string::String,
    /// Exactly one payload variant; `None` for variants unknown to this build
    #[prost(oneof = "envelope::Payload", tags = "3, 4, 5, 6")]
    pub payload: ::core::option::Option<envelope::Payload>,
}

/// Payload variants for [`EventEnvelope`].
pub mod envelope {
    /// The tagged union carried by an event envelope
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        /// Two orders matched
        #[prost(message, tag = "3")]
        Trade(super::TradeEvent),
        /// An order changed status
        #[prost(message, tag = "4")]
        OrderStatus(super::OrderStatusEvent),
        /// A stop order was activated; same shape as a status change
        #[prost(message, tag = "5")]
        OrderActivation(super::OrderStatusEvent),
        /// The engine rejected or failed an order
        #[prost(message, tag = "6")]
        OrderError(super::OrderErrorEvent),
    }
}

/// A match between an ask and a bid.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TradeEvent {
    /// Execution price, fixed-point at quote precision
    #[prost(uint64, tag = "1")]
    pub price: u64,
    /// Executed amount, fixed-point at market precision
    #[prost(uint64, tag = "2")]
    pub amount: u64,
    /// Side of the aggressing order
    #[prost(enumeration = "Side", tag = "3")]
    pub taker_side: i32,
    #[prost(uint64, tag = "4")]
    pub ask_id: u64,
    #[prost(uint64, tag = "5")]
    pub ask_owner_id: u64,
    #[prost(uint64, tag = "6")]
    pub bid_id: u64,
    #[prost(uint64, tag = "7")]
    pub bid_owner_id: u64,
}

/// Status change or activation notice for a single order.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderStatusEvent {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub owner_id: u64,
    #[prost(enumeration = "Side", tag = "3")]
    pub side: i32,
    #[prost(enumeration = "OrderKind", tag = "4")]
    pub kind: i32,
    #[prost(enumeration = "OrderStatus", tag = "5")]
    pub status: i32,
    /// Fixed-point at quote precision
    #[prost(uint64, tag = "6")]
    pub price: u64,
    /// Fixed-point at market precision
    #[prost(uint64, tag = "7")]
    pub amount: u64,
    /// Locked funds; quote precision for a buy, market precision for a sell
    #[prost(uint64, tag = "8")]
    pub funds: u64,
    /// Fixed-point at market precision
    #[prost(uint64, tag = "9")]
    pub filled_amount: u64,
    /// Fixed-point at quote precision
    #[prost(uint64, tag = "10")]
    pub used_funds: u64,
}

/// Engine-side failure for a submitted order.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderErrorEvent {
    #[prost(enumeration = "EventCode", tag = "1")]
    pub code: i32,
    #[prost(uint64, tag = "2")]
    pub order_id: u64,
}

/// Order or cancel command published towards the matching engine.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderCommand {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub market: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub owner_id: u64,
    #[prost(enumeration = "Side", tag = "4")]
    pub side: i32,
    #[prost(enumeration = "OrderKind", tag = "5")]
    pub kind: i32,
    #[prost(enumeration = "StopKind", tag = "6")]
    pub stop: i32,
    #[prost(enumeration = "CommandKind", tag = "7")]
    pub command: i32,
    /// Fixed-point at quote precision
    #[prost(uint64, tag = "8")]
    pub price: u64,
    /// Fixed-point at market precision
    #[prost(uint64, tag = "9")]
    pub amount: u64,
    /// Fixed-point at quote precision
    #[prost(uint64, tag = "10")]
    pub stop_price: u64,
    /// Fixed-point at quote precision for a buy, market precision for a sell
    #[prost(uint64, tag = "11")]
    pub funds: u64,
}

impl OrderCommand {
    /// Check the command invariant enforced before publish.
    ///
    /// A zero id is always invalid; a stop order needs a stop price; a new
    /// limit order needs price and amount, a new market order needs funds and
    /// amount; a limit cancel needs a price. Unknown enum values fail the
    /// check.
    pub fn valid(&self) -> bool {
        if self.id == 0 {
            return false;
        }
        let Ok(kind) = OrderKind::try_from(self.kind) else {
            return false;
        };
        let Ok(stop) = StopKind::try_from(self.stop) else {
            return false;
        };
        let Ok(command) = CommandKind::try_from(self.command) else {
            return false;
        };

        if stop != StopKind::None && self.stop_price == 0 {
            return false;
        }
        match command {
            CommandKind::New => match kind {
                OrderKind::Limit => self.price != 0 && self.amount != 0,
                OrderKind::Market => self.funds != 0 && self.amount != 0,
            },
            CommandKind::Cancel => kind != OrderKind::Limit || self.price != 0,
        }
    }

    /// A market order drained of amount or funds counts as filled.
    pub fn filled(&self) -> bool {
        self.command == CommandKind::New as i32
            && self.kind == OrderKind::Market as i32
            && (self.amount == 0 || self.funds == 0)
    }
}

/// Order side on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

/// Order kind on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OrderKind {
    Limit = 0,
    Market = 1,
}

/// Stop-loss kind on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum StopKind {
    None = 0,
    Stop = 1,
}

/// Command kind on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CommandKind {
    New = 0,
    Cancel = 1,
}

/// Order status on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OrderStatus {
    Pending = 0,
    Open = 1,
    PartiallyFilled = 2,
    Filled = 3,
    Cancelled = 4,
}

/// Order error code on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EventCode {
    InvalidOrder = 0,
    InsufficientFunds = 1,
    OrderNotFound = 2,
    Internal = 3,
}
