//! Conversions between what the user types and what the contract stores:
//! decimal amounts versus 18-decimal fixed-point integers, and short names
//! versus the contract's 32-byte string slot.

use alloy_primitives::{B256, U256};
use thiserror::Error;

pub const LEDGER_DECIMALS: usize = 18;
pub const SHORT_STRING_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },
    #[error("name is {len} bytes; the bank name slot holds at most 32")]
    StringTooLong { len: usize },
    #[error("stored name is not valid utf-8")]
    InvalidShortString,
}

/// Parses a non-negative decimal such as `"1.5"` into ledger units (x 10^18).
pub fn to_ledger_units(input: &str) -> Result<U256, CodecError> {
    let invalid = |reason| CodecError::InvalidAmount {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is empty"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("amount has no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("expected digits with an optional decimal point"));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > LEDGER_DECIMALS {
        return Err(invalid("more than 18 decimal places"));
    }

    let mut digits = String::with_capacity(whole.len() + LEDGER_DECIMALS);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(LEDGER_DECIMALS - fraction.len()));

    digits
        .parse::<U256>()
        .map_err(|_| invalid("amount does not fit in 256 bits"))
}

/// Formats ledger units as a decimal with at least one fractional digit.
pub fn to_display_units(value: U256) -> String {
    let digits = value.to_string();
    let padded = if digits.len() <= LEDGER_DECIMALS {
        format!("{digits:0>width$}", width = LEDGER_DECIMALS + 1)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - LEDGER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn encode_short_string(value: &str) -> Result<B256, CodecError> {
    let bytes = value.as_bytes();
    if bytes.len() > SHORT_STRING_CAPACITY {
        return Err(CodecError::StringTooLong { len: bytes.len() });
    }
    let mut slot = [0u8; SHORT_STRING_CAPACITY];
    slot[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(slot))
}

/// Reads the slot up to the first NUL byte; an all-zero slot is the empty name.
pub fn decode_short_string(slot: B256) -> Result<String, CodecError> {
    let bytes = slot.as_slice();
    let end = bytes
        .iter()
        .position(|byte| *byte == 0)
        .unwrap_or(bytes.len());
    String::from_utf8(bytes[..end].to_vec()).map_err(|_| CodecError::InvalidShortString)
}
