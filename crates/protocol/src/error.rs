//! Decode failures for engine records

use thiserror::Error;

/// A record payload that could not be interpreted.
///
/// Decode failures terminate handling of the affected record only; the
/// consuming loop skips it and continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The protobuf framing itself is malformed
    #[error("malformed record: {0}")]
    Malformed(#[from] prost::DecodeError),

    /// An enum field carried a value this build does not know
    #[error("unknown {field} value {value}")]
    UnknownEnum {
        /// Field name for diagnostics
        field: &'static str,
        /// The raw wire value
        value: i32,
    },
}
