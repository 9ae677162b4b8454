//! Error taxonomy for fixed-point conversions

use thiserror::Error;

/// Errors surfaced by the fixed-point conversion primitives.
///
/// All of these abort the operation that triggered them; no partial results
/// are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The decimal text is not of the form `digits['.' digits]`
    #[error("invalid amount format")]
    InvalidAmountFormat,

    /// The scaled result does not fit the fixed-point integer width
    #[error("precision overflow")]
    PrecisionOverflow,

    /// Division by a zero-valued fixed-point amount
    #[error("division by zero")]
    DivisionByZero,
}
