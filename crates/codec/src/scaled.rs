//! Multiply/divide across mismatched fixed-point precisions
//!
//! Both operations run in rust_decimal's 96-bit decimal domain (28 significant
//! digits, the same width the trading engine's reference arithmetic uses) and
//! round half away from zero when narrowing to the output precision.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CodecError;

// Largest power of ten a Decimal mantissa can hold.
const MAX_SHIFT: u32 = 28;

fn pow10(exp: u32) -> Option<Decimal> {
    if exp > MAX_SHIFT {
        return None;
    }
    Some(Decimal::from_i128_with_scale(10i128.pow(exp), 0))
}

/// Divide `value` by `10^shift` (multiply for negative shifts) and round to
/// the nearest integer, half away from zero.
fn rescale_to_integer(value: Decimal, shift: i32) -> Result<u64, CodecError> {
    let adjusted = if shift >= 0 {
        let divisor = pow10(shift.unsigned_abs()).ok_or(CodecError::PrecisionOverflow)?;
        value
            .checked_div(divisor)
            .ok_or(CodecError::PrecisionOverflow)?
    } else {
        let factor = pow10(shift.unsigned_abs()).ok_or(CodecError::PrecisionOverflow)?;
        value
            .checked_mul(factor)
            .ok_or(CodecError::PrecisionOverflow)?
    };

    adjusted
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(CodecError::PrecisionOverflow)
}

/// Multiply two fixed-point amounts and rescale the product to `out_prec`.
///
/// `x` is scaled by `10^x_prec` and `y` by `10^y_prec`; the exact product is
/// rescaled from `x_prec + y_prec` to `out_prec` with round-to-nearest.
/// A result that does not fit the fixed-point width is
/// [`CodecError::PrecisionOverflow`], never a silent truncation.
pub fn scaled_multiply(
    x: u64,
    x_prec: u8,
    y: u64,
    y_prec: u8,
    out_prec: u8,
) -> Result<u64, CodecError> {
    let product = Decimal::from(x)
        .checked_mul(Decimal::from(y))
        .ok_or(CodecError::PrecisionOverflow)?;
    let shift = i32::from(x_prec) + i32::from(y_prec) - i32::from(out_prec);
    rescale_to_integer(product, shift)
}

/// Divide two fixed-point amounts and rescale the quotient to `out_prec`.
///
/// Returns [`CodecError::DivisionByZero`] when `y` is zero.
pub fn scaled_divide(
    x: u64,
    x_prec: u8,
    y: u64,
    y_prec: u8,
    out_prec: u8,
) -> Result<u64, CodecError> {
    if y == 0 {
        return Err(CodecError::DivisionByZero);
    }
    let quotient = Decimal::from(x)
        .checked_div(Decimal::from(y))
        .ok_or(CodecError::PrecisionOverflow)?;
    let shift = i32::from(x_prec) - i32::from(y_prec) - i32::from(out_prec);
    rescale_to_integer(quotient, shift)
}

/// Maximum of two raw fixed-point integers.
///
/// Only meaningful when both operands carry the same precision; comparing
/// across precisions is a caller error.
pub fn max(x: u64, y: u64) -> u64 {
    x.max(y)
}

/// Minimum of two raw fixed-point integers; same precision requirement as
/// [`max`].
pub fn min(x: u64, y: u64) -> u64 {
    x.min(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_matching_precisions() {
        // 5000.00 * 1.00000000 = 5000.00 at quote precision
        assert_eq!(scaled_multiply(500000, 2, 100000000, 8, 2), Ok(500000));
        // 2.50 * 4.00 = 10.00
        assert_eq!(scaled_multiply(250, 2, 400, 2, 2), Ok(1000));
    }

    #[test]
    fn test_multiply_mismatched_output_precision() {
        // 1.5 (prec 1) * 2.25 (prec 2) = 3.375 -> 3.3750 at prec 4
        assert_eq!(scaled_multiply(15, 1, 225, 2, 4), Ok(33750));
        // same product narrowed to prec 2 rounds 3.375 -> 3.38 (half away from zero)
        assert_eq!(scaled_multiply(15, 1, 225, 2, 2), Ok(338));
        // widening: 0.3 * 0.3 = 0.09 -> 900 at prec 4
        assert_eq!(scaled_multiply(3, 1, 3, 1, 4), Ok(900));
    }

    #[test]
    fn test_multiply_overflow_is_reported() {
        assert_eq!(
            scaled_multiply(u64::MAX, 0, u64::MAX, 0, 0),
            Err(CodecError::PrecisionOverflow)
        );
        // fits the decimal domain but not u64 after rescale
        assert_eq!(
            scaled_multiply(u64::MAX, 0, 100, 0, 0),
            Err(CodecError::PrecisionOverflow)
        );
    }

    #[test]
    fn test_divide_basic() {
        // 10.00 / 4.00 = 2.50
        assert_eq!(scaled_divide(1000, 2, 400, 2, 2), Ok(250));
        // 1.00000000 / 3.00 = 0.33333333 at market precision
        assert_eq!(scaled_divide(100000000, 8, 300, 2, 8), Ok(33333333));
        // mismatched output: 5000.00 / 2.00000000 = 2500.0 at prec 1
        assert_eq!(scaled_divide(500000, 2, 200000000, 8, 1), Ok(25000));
    }

    #[test]
    fn test_divide_rounds_to_nearest() {
        // 2.00 / 3.00 = 0.666... -> 0.67
        assert_eq!(scaled_divide(200, 2, 300, 2, 2), Ok(67));
        // 1.00 / 8.00 = 0.125 -> 0.13 (half away from zero)
        assert_eq!(scaled_divide(100, 2, 800, 2, 2), Ok(13));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(scaled_divide(100, 2, 0, 2, 2), Err(CodecError::DivisionByZero));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(max(3, 7), 7);
        assert_eq!(min(3, 7), 3);
        assert_eq!(max(5, 5), 5);
    }
}
