//! Numeric argument parsing shared by every handler.

use super::errors::NumericError;

/// Base of a numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

impl Radix {
    pub fn base(&self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

/// Parse `token` as an unsigned 32-bit number in the given base.
///
/// Every character must be a digit of that base: no sign, no `0x` prefix,
/// no whitespace. Digits are checked before conversion so that a malformed
/// token is always `Invalid` and only an overlong one is `OutOfRange`.
pub fn parse_number(token: &str, radix: Radix) -> Result<u32, NumericError> {
    let base = radix.base();
    if token.is_empty() || !token.chars().all(|c| c.is_digit(base)) {
        return Err(NumericError::Invalid {
            token: token.to_string(),
            radix: base,
        });
    }
    u32::from_str_radix(token, base).map_err(|_| NumericError::OutOfRange {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_bases() {
        assert_eq!(parse_number("42", Radix::Decimal), Ok(42));
        assert_eq!(parse_number("00400100", Radix::Hex), Ok(0x0040_0100));
        assert_eq!(parse_number("DeadBeef", Radix::Hex), Ok(0xDEAD_BEEF));
    }

    #[test]
    fn rejects_non_digits() {
        for (token, radix) in [
            ("12g4", Radix::Hex),
            ("0x10", Radix::Hex),
            ("-1", Radix::Decimal),
            ("1a", Radix::Decimal),
            ("+5", Radix::Decimal),
            ("", Radix::Hex),
        ] {
            assert!(
                matches!(parse_number(token, radix), Err(NumericError::Invalid { .. })),
                "{token} should be invalid"
            );
        }
    }

    #[test]
    fn overlong_values_are_out_of_range() {
        assert!(matches!(
            parse_number("1FFFFFFFF", Radix::Hex),
            Err(NumericError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_number("4294967296", Radix::Decimal),
            Err(NumericError::OutOfRange { .. })
        ));
        assert_eq!(parse_number("4294967295", Radix::Decimal), Ok(u32::MAX));
    }
}
