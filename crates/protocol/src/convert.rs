//! Wire enum ⇄ domain enum mappings
//!
//! Raw integer fields on decoded records go through these fallible mappings;
//! an out-of-range value is reported as [`DecodeError::UnknownEnum`] instead
//! of being silently defaulted.

use crate::error::DecodeError;
use crate::wire;

impl From<common::Side> for wire::Side {
    fn from(side: common::Side) -> Self {
        match side {
            common::Side::Buy => wire::Side::Buy,
            common::Side::Sell => wire::Side::Sell,
        }
    }
}

impl From<wire::Side> for common::Side {
    fn from(side: wire::Side) -> Self {
        match side {
            wire::Side::Buy => common::Side::Buy,
            wire::Side::Sell => common::Side::Sell,
        }
    }
}

impl From<common::OrderKind> for wire::OrderKind {
    fn from(kind: common::OrderKind) -> Self {
        match kind {
            common::OrderKind::Limit => wire::OrderKind::Limit,
            common::OrderKind::Market => wire::OrderKind::Market,
        }
    }
}

impl From<wire::OrderKind> for common::OrderKind {
    fn from(kind: wire::OrderKind) -> Self {
        match kind {
            wire::OrderKind::Limit => common::OrderKind::Limit,
            wire::OrderKind::Market => common::OrderKind::Market,
        }
    }
}

impl From<common::StopKind> for wire::StopKind {
    fn from(stop: common::StopKind) -> Self {
        match stop {
            common::StopKind::None => wire::StopKind::None,
            common::StopKind::Stop => wire::StopKind::Stop,
        }
    }
}

impl From<wire::StopKind> for common::StopKind {
    fn from(stop: wire::StopKind) -> Self {
        match stop {
            wire::StopKind::None => common::StopKind::None,
            wire::StopKind::Stop => common::StopKind::Stop,
        }
    }
}

impl From<common::CommandKind> for wire::CommandKind {
    fn from(command: common::CommandKind) -> Self {
        match command {
            common::CommandKind::New => wire::CommandKind::New,
            common::CommandKind::Cancel => wire::CommandKind::Cancel,
        }
    }
}

impl From<wire::OrderStatus> for common::OrderStatus {
    fn from(status: wire::OrderStatus) -> Self {
        match status {
            wire::OrderStatus::Pending => common::OrderStatus::Pending,
            wire::OrderStatus::Open => common::OrderStatus::Open,
            wire::OrderStatus::PartiallyFilled => common::OrderStatus::PartiallyFilled,
            wire::OrderStatus::Filled => common::OrderStatus::Filled,
            wire::OrderStatus::Cancelled => common::OrderStatus::Cancelled,
        }
    }
}

impl From<wire::EventCode> for common::EventCode {
    fn from(code: wire::EventCode) -> Self {
        match code {
            wire::EventCode::InvalidOrder => common::EventCode::InvalidOrder,
            wire::EventCode::InsufficientFunds => common::EventCode::InsufficientFunds,
            wire::EventCode::OrderNotFound => common::EventCode::OrderNotFound,
            wire::EventCode::Internal => common::EventCode::Internal,
        }
    }
}

/// Map a raw side field to the domain enum.
pub fn side_from_wire(value: i32) -> Result<common::Side, DecodeError> {
    wire::Side::try_from(value)
        .map(Into::into)
        .map_err(|_| DecodeError::UnknownEnum { field: "side", value })
}

/// Map a raw order kind field to the domain enum.
pub fn order_kind_from_wire(value: i32) -> Result<common::OrderKind, DecodeError> {
    wire::OrderKind::try_from(value)
        .map(Into::into)
        .map_err(|_| DecodeError::UnknownEnum { field: "kind", value })
}

/// Map a raw order status field to the domain enum.
pub fn order_status_from_wire(value: i32) -> Result<common::OrderStatus, DecodeError> {
    wire::OrderStatus::try_from(value)
        .map(Into::into)
        .map_err(|_| DecodeError::UnknownEnum {
            field: "status",
            value,
        })
}

/// Map a raw error code field to the domain enum.
pub fn event_code_from_wire(value: i32) -> Result<common::EventCode, DecodeError> {
    wire::EventCode::try_from(value)
        .map(Into::into)
        .map_err(|_| DecodeError::UnknownEnum { field: "code", value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_side_mapping() {
        assert_eq!(side_from_wire(0).unwrap(), common::Side::Buy);
        assert_eq!(side_from_wire(1).unwrap(), common::Side::Sell);
        assert_matches!(
            side_from_wire(99),
            Err(DecodeError::UnknownEnum { field: "side", value: 99 })
        );
    }

    #[test]
    fn test_wire_round_trip_side() {
        for side in [common::Side::Buy, common::Side::Sell] {
            let raw = wire::Side::from(side) as i32;
            assert_eq!(side_from_wire(raw).unwrap(), side);
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            order_status_from_wire(2).unwrap(),
            common::OrderStatus::PartiallyFilled
        );
        assert!(order_status_from_wire(-1).is_err());
    }
}
