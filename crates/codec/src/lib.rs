//! Fixed-point monetary conversions
//!
//! The matching engine trades in unsigned integers scaled by `10^precision`.
//! This crate converts between that representation and decimal text, and
//! performs multiply/divide across mismatched precisions in an exact decimal
//! domain. Floating point is never used for money.

pub mod error;
pub mod fixed_point;
pub mod scaled;

pub use error::CodecError;
pub use fixed_point::{from_fixed_point, to_fixed_point};
pub use scaled::{max, min, scaled_divide, scaled_multiply};
