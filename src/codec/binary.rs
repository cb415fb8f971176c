//! Binary (COMP) integers and pointer keys, big-endian.

use crate::config::NumericValidation;
use crate::error::FieldValueError;
use crate::types::{Decimal, FieldFormat, FieldValue};

/// Sign-extends a big-endian two's-complement integer of up to 8 bytes.
pub(super) fn read_signed(bytes: &[u8]) -> i64 {
    let mut wide = [0u8; 8];
    let fill = if bytes.first().is_some_and(|&b| b & 0x80 != 0) {
        0xFF
    } else {
        0x00
    };
    let width = bytes.len().min(8);
    let pad = 8 - width;
    wide[..pad].fill(fill);
    wide[pad..].copy_from_slice(&bytes[bytes.len() - width..]);
    i64::from_be_bytes(wide)
}

/// `value` is already at the field's scale and digit count.
pub(super) fn encode(value: Decimal, out: &mut [u8]) {
    // at most 18 digits after truncation, so the cast is exact
    let wide = (value.digits() as i64).to_be_bytes();
    let width = out.len().min(8);
    out.copy_from_slice(&wide[8 - width..]);
}

pub(super) fn decode(bytes: &[u8], format: &FieldFormat) -> Result<FieldValue, FieldValueError> {
    let raw = read_signed(bytes);
    if format.decimal_digits() == 0 {
        Ok(FieldValue::Int(raw))
    } else {
        Ok(FieldValue::Decimal(Decimal::new(
            raw as i128,
            format.decimal_digits(),
        )))
    }
}

pub(super) fn is_numeric(bytes: &[u8], format: &FieldFormat, mode: NumericValidation) -> bool {
    match mode {
        NumericValidation::StrictMove => {
            let magnitude = read_signed(bytes).unsigned_abs();
            match 10u64.checked_pow(format.display_length() as u32) {
                Some(limit) => magnitude < limit,
                None => true,
            }
        }
        NumericValidation::Relaxed => true,
    }
}

pub(super) fn decode_pointer(bytes: &[u8]) -> Result<FieldValue, FieldValueError> {
    let key = bytes
        .iter()
        .rev()
        .take(4)
        .rev()
        .fold(0u32, |acc, &b| (acc << 8) | b as u32);
    Ok(FieldValue::Int(key as i64))
}

pub(super) fn encode_pointer(key: i64, out: &mut [u8]) -> Result<(), FieldValueError> {
    let key = u32::try_from(key).map_err(|_| FieldValueError::OutOfRange {
        value: key.to_string(),
        target: "record key",
    })?;
    out.fill(0);
    let bytes = key.to_be_bytes();
    let width = out.len().min(4);
    let start = out.len() - width;
    out[start..].copy_from_slice(&bytes[4 - width..]);
    Ok(())
}
