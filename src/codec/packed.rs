//! Packed decimal (BCD): two digits per byte, sign in the last nibble.
//!
//! ```text
//! +12345 in PIC S9(5) COMP-3:   12 34 5C
//! -12345 in PIC S9(5) COMP-3:   12 34 5D
//!  1234  in PIC 9(4)  COMP-3:   01 23 4F   (even digit count: leading pad nibble)
//! ```
//!
//! All-0x00 and all-0xFF are LOW-VALUES and HIGH-VALUES and are reported as
//! such before any digit is looked at.

use crate::config::{
    NumericValidation, HIGH_VALUE, LOW_VALUE, PACKED_SIGN_NEGATIVE, PACKED_SIGN_NEGATIVE_ALT,
    PACKED_SIGN_POSITIVE, PACKED_SIGN_UNSIGNED,
};
use crate::error::FieldValueError;
use crate::types::{Decimal, FieldFormat, FieldType, FieldValue};

pub fn is_low_values(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| b == LOW_VALUE)
}

pub fn is_high_values(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| b == HIGH_VALUE)
}

#[inline]
fn nibble(bytes: &[u8], index: usize) -> u8 {
    let byte = bytes[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

/// `value` is already at the field's scale and digit count.
pub(super) fn encode(value: Decimal, format: &FieldFormat, out: &mut [u8]) {
    let sign = match format.field_type() {
        FieldType::PackedSigned if value.is_negative() => PACKED_SIGN_NEGATIVE,
        FieldType::PackedSigned => PACKED_SIGN_POSITIVE,
        _ => PACKED_SIGN_UNSIGNED,
    };

    out.fill(0);
    let last = out.len() * 2 - 1;
    out[last / 2] |= sign;

    let mut magnitude = value.digits().unsigned_abs();
    for index in (0..last).rev() {
        if magnitude == 0 {
            break;
        }
        let digit = (magnitude % 10) as u8;
        magnitude /= 10;
        if index % 2 == 0 {
            out[index / 2] |= digit << 4;
        } else {
            out[index / 2] |= digit;
        }
    }
}

pub(super) fn decode(bytes: &[u8], format: &FieldFormat) -> Result<FieldValue, FieldValueError> {
    if is_low_values(bytes) {
        return Ok(FieldValue::LowValues);
    }
    if is_high_values(bytes) {
        return Ok(FieldValue::HighValues);
    }
    if bytes.is_empty() {
        return Ok(FieldValue::Decimal(Decimal::new(0, format.decimal_digits())));
    }

    let last = bytes.len() * 2 - 1;
    let mut magnitude: i128 = 0;
    for position in 0..last {
        let digit = nibble(bytes, position);
        if digit > 9 {
            return Err(FieldValueError::InvalidPackedDigit {
                nibble: digit,
                position,
            });
        }
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(digit as i128))
            .ok_or_else(|| FieldValueError::OutOfRange {
                value: format!("{} packed bytes", bytes.len()),
                target: "decimal",
            })?;
    }

    let sign = nibble(bytes, last);
    let negative = sign == PACKED_SIGN_NEGATIVE || sign == PACKED_SIGN_NEGATIVE_ALT;
    let digits = if negative { -magnitude } else { magnitude };
    Ok(FieldValue::Decimal(Decimal::new(digits, format.decimal_digits())))
}

pub(super) fn is_numeric(bytes: &[u8], format: &FieldFormat, mode: NumericValidation) -> bool {
    if bytes.is_empty() || is_low_values(bytes) || is_high_values(bytes) {
        return false;
    }
    let last = bytes.len() * 2 - 1;
    if (0..last).any(|i| nibble(bytes, i) > 9) {
        return false;
    }

    let sign = nibble(bytes, last);
    match mode {
        NumericValidation::StrictMove => match format.field_type() {
            FieldType::PackedSigned => matches!(
                sign,
                PACKED_SIGN_POSITIVE | PACKED_SIGN_NEGATIVE | PACKED_SIGN_UNSIGNED
            ),
            _ => sign == PACKED_SIGN_UNSIGNED,
        },
        NumericValidation::Relaxed => sign >= 0x0A,
    }
}
