//! Domain types shared across marketfeed crates
//!
//! Monetary quantities travel through the system as unsigned fixed-point
//! integers scaled by `10^precision`; the precision itself always comes from
//! the owning [`Market`].

use serde::{Deserialize, Serialize};

/// A configured trading market.
///
/// Immutable once loaded from configuration; per-market tasks share it by
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Market identifier (e.g., "BTC-USD")
    pub id: String,
    /// Decimal places of the base asset
    pub market_precision: u8,
    /// Decimal places of the quote asset
    pub quote_precision: u8,
    /// Base asset symbol (e.g., "BTC")
    #[serde(default)]
    pub market_coin_symbol: String,
    /// Quote asset symbol (e.g., "USD")
    #[serde(default)]
    pub quote_coin_symbol: String,
}

impl Market {
    /// Create a market with the given id and precisions
    pub fn new(id: impl Into<String>, market_precision: u8, quote_precision: u8) -> Self {
        Self {
            id: id.into(),
            market_precision,
            quote_precision,
            market_coin_symbol: String::new(),
            quote_coin_symbol: String::new(),
        }
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Returns true if this is a buy order
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Limit order - rests at the given price
    Limit,
    /// Market order - consumes the book with the given funds
    Market,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "limit"),
            OrderKind::Market => write!(f, "market"),
        }
    }
}

/// Stop-loss kind attached to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    /// Plain order, no stop behaviour
    #[default]
    None,
    /// Order activates when the stop price is crossed
    Stop,
}

impl std::fmt::Display for StopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopKind::None => write!(f, "none"),
            StopKind::Stop => write!(f, "stop"),
        }
    }
}

/// Command kind published towards the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Place a new order
    New,
    /// Cancel an existing order
    Cancel,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::New => write!(f, "new"),
            CommandKind::Cancel => write!(f, "cancel"),
        }
    }
}

/// Order status as reported by the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, nothing matched yet
    Pending,
    /// Resting on the book
    Open,
    /// Matched for part of its amount
    PartiallyFilled,
    /// Matched completely
    Filled,
    /// Removed from the book on request
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Open => write!(f, "open"),
            OrderStatus::PartiallyFilled => write!(f, "partially_filled"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Error code attached to an order error event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCode {
    /// The engine rejected the command outright
    InvalidOrder,
    /// The owner lacked the funds the command required
    InsufficientFunds,
    /// A cancel referenced an order the engine does not hold
    OrderNotFound,
    /// Engine-internal failure
    Internal,
}

impl std::fmt::Display for EventCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCode::InvalidOrder => write!(f, "invalid_order"),
            EventCode::InsufficientFunds => write!(f, "insufficient_funds"),
            EventCode::OrderNotFound => write!(f, "order_not_found"),
            EventCode::Internal => write!(f, "internal"),
        }
    }
}
