//! Binary records exchanged with the matching engine
//!
//! The engine publishes tagged [`wire::EventEnvelope`] records on the
//! per-market event partition and consumes [`wire::OrderCommand`] records on
//! the per-market command partition. Both are protobuf-framed; enum fields
//! travel as raw integers and are mapped to the domain enums in [`convert`].

pub mod convert;
pub mod error;
pub mod wire;

pub use error::DecodeError;

use prost::Message;

/// Decode an event envelope from a partition record payload.
pub fn decode_envelope(bytes: &[u8]) -> Result<wire::EventEnvelope, DecodeError> {
    Ok(wire::EventEnvelope::decode(bytes)?)
}

/// Encode an event envelope into a partition record payload.
pub fn encode_envelope(envelope: &wire::EventEnvelope) -> Vec<u8> {
    envelope.encode_to_vec()
}

/// Encode an order command into a partition record payload.
pub fn encode_command(command: &wire::OrderCommand) -> Vec<u8> {
    command.encode_to_vec()
}

/// Decode an order command from a partition record payload.
pub fn decode_command(bytes: &[u8]) -> Result<wire::OrderCommand, DecodeError> {
    Ok(wire::OrderCommand::decode(bytes)?)
}
