//! Decimal text ⇄ fixed-point integer conversions

use crate::error::CodecError;

/// Parse a decimal string into a fixed-point integer scaled by `10^precision`.
///
/// Accepts `digits['.' digits]`. Fractional digits beyond `precision` are
/// truncated, never rounded; missing fractional digits are padded with zeros.
/// A sign, a second decimal point, or any non-digit character is rejected with
/// [`CodecError::InvalidAmountFormat`]. A value that does not fit in a `u64`
/// at the target scale is [`CodecError::PrecisionOverflow`].
pub fn to_fixed_point(text: &str, precision: u8) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    let mut seen_digit = false;
    let mut frac_digits: Option<u32> = None;

    for byte in text.bytes() {
        match byte {
            b'.' if frac_digits.is_none() => frac_digits = Some(0),
            b'0'..=b'9' => {
                seen_digit = true;
                if let Some(count) = frac_digits {
                    if count >= u32::from(precision) {
                        continue;
                    }
                    frac_digits = Some(count + 1);
                }
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                    .ok_or(CodecError::PrecisionOverflow)?;
            }
            _ => return Err(CodecError::InvalidAmountFormat),
        }
    }

    if !seen_digit {
        return Err(CodecError::InvalidAmountFormat);
    }

    for _ in frac_digits.unwrap_or(0)..u32::from(precision) {
        value = value.checked_mul(10).ok_or(CodecError::PrecisionOverflow)?;
    }

    Ok(value)
}

/// Render a fixed-point integer as decimal text at the given precision.
///
/// The fractional part is zero-padded to exactly `precision` digits and the
/// integer part always keeps at least one digit (`5` at precision 2 renders as
/// `"0.05"`). Precision 0 renders with no separator.
pub fn from_fixed_point(value: u64, precision: u8) -> String {
    let digits = value.to_string();
    if precision == 0 {
        return digits;
    }

    let precision = usize::from(precision);
    if digits.len() <= precision {
        let mut out = String::with_capacity(precision + 2);
        out.push_str("0.");
        for _ in 0..(precision - digits.len()) {
            out.push('0');
        }
        out.push_str(&digits);
        out
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - precision);
        format!("{int_part}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_integer_only() {
        assert_eq!(to_fixed_point("12", 2), Ok(1200));
        assert_eq!(to_fixed_point("12", 0), Ok(12));
        assert_eq!(to_fixed_point("0", 4), Ok(0));
    }

    #[test]
    fn test_parse_pads_short_fraction() {
        assert_eq!(to_fixed_point("1.2", 4), Ok(12000));
        assert_eq!(to_fixed_point("0.5", 2), Ok(50));
        assert_eq!(to_fixed_point("3.", 2), Ok(300));
    }

    #[test]
    fn test_parse_truncates_excess_fraction() {
        // truncation, not rounding
        assert_eq!(to_fixed_point("1.239", 2), Ok(123));
        assert_eq!(to_fixed_point("0.999999", 0), Ok(0));
        assert_eq!(to_fixed_point("2.00001", 4), Ok(20000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(to_fixed_point("", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point(".", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point("-1", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point("+1", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point("1.2.3", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point("1e4", 2), Err(CodecError::InvalidAmountFormat));
        assert_eq!(to_fixed_point("12 ", 2), Err(CodecError::InvalidAmountFormat));
    }

    #[test]
    fn test_parse_overflow() {
        // u64::MAX is 18446744073709551615; one more digit must overflow
        assert_eq!(
            to_fixed_point("184467440737095516150", 0),
            Err(CodecError::PrecisionOverflow)
        );
        // padding to scale can overflow too
        assert_eq!(
            to_fixed_point("18446744073709551615", 2),
            Err(CodecError::PrecisionOverflow)
        );
    }

    #[test]
    fn test_render_zero_padding() {
        assert_eq!(from_fixed_point(5, 2), "0.05");
        assert_eq!(from_fixed_point(100, 2), "1.00");
        assert_eq!(from_fixed_point(0, 2), "0.00");
        assert_eq!(from_fixed_point(0, 0), "0");
    }

    #[test]
    fn test_render_splits_at_precision() {
        assert_eq!(from_fixed_point(123456, 4), "12.3456");
        assert_eq!(from_fixed_point(500000, 2), "5000.00");
        assert_eq!(from_fixed_point(100000000, 8), "1.00000000");
        assert_eq!(from_fixed_point(42, 0), "42");
    }

    proptest! {
        // Round trip: any canonical decimal string with at most `precision`
        // fractional digits survives parse + render unchanged.
        #[test]
        fn prop_round_trip(
            int_part in 0u64..1_000_000_000,
            frac in "[0-9]{0,8}",
            precision in 0u8..=8,
        ) {
            prop_assume!(frac.len() <= usize::from(precision));

            let mut padded = frac.clone();
            while padded.len() < usize::from(precision) {
                padded.push('0');
            }
            let canonical = if precision == 0 {
                int_part.to_string()
            } else {
                format!("{int_part}.{padded}")
            };

            let units = to_fixed_point(&canonical, precision).unwrap();
            prop_assert_eq!(from_fixed_point(units, precision), canonical);
        }
    }
}
