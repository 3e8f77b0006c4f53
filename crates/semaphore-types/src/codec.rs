use ethers::types::U256;
use thiserror::Error;

/// Decimal digits in 2^256 - 1.
pub const MAX_UINT256_DIGITS: usize = 78;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Must not be empty")]
    Empty,

    #[error("Must contain only decimal digits")]
    NotDecimal,

    #[error("Must not have leading zeros")]
    LeadingZero,

    #[error("Exceeds the uint256 range")]
    Overflow,

    #[error("Must start with 0x")]
    MissingPrefix,

    #[error("Must be 40 hex characters after 0x, got {0}")]
    AddressLength(usize),

    #[error("Must contain only hex characters")]
    NotHex,
}

/// Parses a canonical base-10 string into a `U256` without any lossy step.
pub fn parse_uint(input: &str) -> Result<U256, CodecError> {
    if input.is_empty() {
        return Err(CodecError::Empty);
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::NotDecimal);
    }
    if input.len() > 1 && input.starts_with('0') {
        return Err(CodecError::LeadingZero);
    }
    if input.len() > MAX_UINT256_DIGITS {
        return Err(CodecError::Overflow);
    }
    U256::from_dec_str(input).map_err(|_| CodecError::Overflow)
}

pub fn render_uint(value: &U256) -> String {
    value.to_string()
}

pub fn render_uints(values: &[U256]) -> Vec<String> {
    values.iter().map(render_uint).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_zero_and_small_values() {
        assert_eq!(parse_uint("0"), Ok(U256::zero()));
        assert_eq!(parse_uint("123"), Ok(U256::from(123u64)));
    }

    #[test]
    fn test_parse_max_uint256() {
        let max = U256::MAX.to_string();
        assert_eq!(max.len(), MAX_UINT256_DIGITS);
        assert_eq!(parse_uint(&max), Ok(U256::MAX));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(parse_uint(too_big), Err(CodecError::Overflow));
        assert_eq!(parse_uint(&"9".repeat(100)), Err(CodecError::Overflow));
    }

    #[test]
    fn test_parse_rejects_non_canonical_input() {
        assert_eq!(parse_uint(""), Err(CodecError::Empty));
        assert_eq!(parse_uint("-1"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint("+1"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint(" 1"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint("1.5"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint("1e18"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint("0x10"), Err(CodecError::NotDecimal));
        assert_eq!(parse_uint("007"), Err(CodecError::LeadingZero));
    }

    #[test]
    fn test_precision_beyond_f64() {
        let s = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        assert_eq!(render_uint(&parse_uint(s).unwrap()), s);
    }

    proptest! {
        #[test]
        fn prop_decimal_round_trip(s in "0|[1-9][0-9]{0,76}") {
            let parsed = parse_uint(&s).unwrap();
            prop_assert_eq!(render_uint(&parsed), s);
        }

        #[test]
        fn prop_full_range_round_trip(bytes in any::<[u8; 32]>()) {
            let value = U256::from_big_endian(&bytes);
            let rendered = render_uint(&value);
            prop_assert_eq!(parse_uint(&rendered).unwrap(), value);
        }
    }
}
