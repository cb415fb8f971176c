//! Zoned (display) decimal: one ASCII digit per byte.
//!
//! Signed fields carry a separate trailing sign byte, `+` or `-`. When
//! decoding, one sign character is accepted anywhere in the field and blanks
//! read as zeros, which is how hand-edited and space-filled records look.

use crate::config::{NumericValidation, SPACE};
use crate::error::FieldValueError;
use crate::types::{Decimal, FieldFormat, FieldType, FieldValue};

fn is_sign(b: u8) -> bool {
    b == b'+' || b == b'-'
}

/// `value` is already at the field's scale and digit count.
pub(super) fn encode(value: Decimal, format: &FieldFormat, out: &mut [u8]) {
    let digits = format.display_length();
    let text = format!("{:0>width$}", value.digits().unsigned_abs(), width = digits);
    out[..digits].copy_from_slice(&text.as_bytes()[text.len() - digits..]);
    if format.field_type() == FieldType::ZonedSigned {
        out[digits] = if value.is_negative() { b'-' } else { b'+' };
    }
}

pub(super) fn decode(bytes: &[u8], format: &FieldFormat) -> Result<FieldValue, FieldValueError> {
    let not_numeric = || FieldValueError::NotNumeric {
        text: bytes.iter().map(|&b| b as char).collect(),
    };

    let mut negative = false;
    let mut seen_sign = false;
    let mut magnitude: i128 = 0;

    for &b in bytes {
        match b {
            b'0'..=b'9' | SPACE => {
                let digit = if b == SPACE { 0 } else { (b - b'0') as i128 };
                magnitude = magnitude
                    .checked_mul(10)
                    .and_then(|m| m.checked_add(digit))
                    .ok_or_else(not_numeric)?;
            }
            b'+' | b'-' if !seen_sign => {
                seen_sign = true;
                negative = b == b'-';
            }
            _ => return Err(not_numeric()),
        }
    }

    let digits = if negative { -magnitude } else { magnitude };
    Ok(FieldValue::Decimal(Decimal::new(digits, format.decimal_digits())))
}

pub(super) fn is_numeric(bytes: &[u8], format: &FieldFormat, mode: NumericValidation) -> bool {
    let signed = format.field_type() == FieldType::ZonedSigned;
    match mode {
        NumericValidation::StrictMove => {
            if !signed {
                return !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit);
            }
            let sign_count = bytes.iter().filter(|&&b| is_sign(b)).count();
            let sign_at_edge = bytes.first().is_some_and(|&b| is_sign(b))
                || bytes.last().is_some_and(|&b| is_sign(b));
            bytes.len() >= 2
                && sign_count == 1
                && sign_at_edge
                && bytes.iter().all(|&b| b.is_ascii_digit() || is_sign(b))
        }
        NumericValidation::Relaxed => {
            let sign_count = bytes.iter().filter(|&&b| is_sign(b)).count();
            sign_count <= 1
                && bytes
                    .iter()
                    .all(|&b| b.is_ascii_digit() || b == SPACE || is_sign(b))
        }
    }
}
