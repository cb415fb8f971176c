//! # Field Codec
//!
//! This module converts between a field's raw bytes and a [`FieldValue`],
//! dispatching on the field's [`FieldType`]. Every function here is pure: it
//! reads a byte slice or writes into one and touches no other state.
//!
//! ## Encodings
//!
//! | Type | Bytes | Decodes to |
//! |------|-------|------------|
//! | Text | Latin-1 characters | `Text` |
//! | ZonedUnsigned | ASCII digits | `Decimal` |
//! | ZonedSigned | ASCII digits + trailing `+`/`-` | `Decimal` |
//! | PackedUnsigned | BCD nibbles + sign `F` | `Decimal` / sentinels |
//! | PackedSigned | BCD nibbles + sign `C`/`D` | `Decimal` / sentinels |
//! | BinaryShort/Int/Long | big-endian two's complement | `Int` (or `Decimal` if scaled) |
//! | Float / Double | big-endian IEEE-754 | `Float` |
//! | ReferencePointer | big-endian u32 record key | `Int` |
//!
//! ## MOVE Semantics
//!
//! Encoding follows what a COBOL MOVE does to a numeric receiver:
//!
//! 1. The source is brought to the field's scale. Extra fractional digits are
//!    truncated; float sources are rounded half away from zero.
//! 2. High-order digits beyond the declared digit count are dropped.
//! 3. Unsigned receivers store the absolute value.
//!
//! Any finite source fits after step 2, however large. NaN and infinities are
//! rejected with `OutOfRange`.
//!
//! `LowValues` and `HighValues` are accepted by every encoding and fill the
//! field with `0x00` / `0xFF`.
//!
//! Encoders leave `out` untouched when they return an error.
//!
//! ## Numeric Validity
//!
//! [`is_numeric`] answers "would this field decode to a number" under one of
//! the two [`NumericValidation`] rule sets. The rule sets disagree on purpose;
//! see `config` for the difference.
//!
//! ## Module Organization
//!
//! - `text`: Latin-1 text and justification
//! - `zoned`: display digits with separate sign
//! - `packed`: BCD with sign nibble and sentinels
//! - `binary`: COMP integers and pointer keys
//! - `float`: single and double IEEE-754

mod binary;
mod float;
mod packed;
mod text;
mod zoned;


use crate::config::{NumericValidation, HIGH_VALUE, LOW_VALUE};
use crate::error::FieldValueError;
use crate::types::{Decimal, FieldFormat, FieldType, FieldValue};

pub use packed::{is_high_values, is_low_values};

/// Decodes a field's bytes.
pub fn decode(bytes: &[u8], format: &FieldFormat) -> Result<FieldValue, FieldValueError> {
    match format.field_type() {
        FieldType::Text => Ok(text::decode(bytes)),
        FieldType::ZonedUnsigned | FieldType::ZonedSigned => zoned::decode(bytes, format),
        FieldType::PackedUnsigned | FieldType::PackedSigned => packed::decode(bytes, format),
        FieldType::BinaryShort | FieldType::BinaryInt | FieldType::BinaryLong => {
            binary::decode(bytes, format)
        }
        FieldType::Float | FieldType::Double => float::decode(bytes),
        FieldType::ReferencePointer => binary::decode_pointer(bytes),
    }
}

/// Encodes `value` into `out`, which must be exactly the field's byte length.
pub fn encode(
    value: &FieldValue,
    format: &FieldFormat,
    out: &mut [u8],
) -> Result<(), FieldValueError> {
    match value {
        FieldValue::LowValues => {
            out.fill(LOW_VALUE);
            return Ok(());
        }
        FieldValue::HighValues => {
            out.fill(HIGH_VALUE);
            return Ok(());
        }
        _ => {}
    }

    match format.field_type() {
        FieldType::Text => {
            text::encode(&value.display_string(), format.justification(), out);
            Ok(())
        }
        FieldType::ZonedUnsigned | FieldType::ZonedSigned => {
            let scaled = to_scaled(value, format)?;
            zoned::encode(scaled, format, out);
            Ok(())
        }
        FieldType::PackedUnsigned | FieldType::PackedSigned => {
            let scaled = to_scaled(value, format)?;
            packed::encode(scaled, format, out);
            Ok(())
        }
        FieldType::BinaryShort | FieldType::BinaryInt | FieldType::BinaryLong => {
            let scaled = to_scaled(value, format)?;
            binary::encode(scaled, out);
            Ok(())
        }
        FieldType::Float | FieldType::Double => {
            let number = value.to_f64()?;
            float::encode(number, out);
            Ok(())
        }
        FieldType::ReferencePointer => {
            let key = value.to_i64()?;
            binary::encode_pointer(key, out)
        }
    }
}

/// Tests whether the bytes hold a valid number for the field under `mode`.
pub fn is_numeric(bytes: &[u8], format: &FieldFormat, mode: NumericValidation) -> bool {
    match format.field_type() {
        FieldType::Text => text::is_numeric(bytes, mode),
        FieldType::ZonedUnsigned | FieldType::ZonedSigned => zoned::is_numeric(bytes, format, mode),
        FieldType::PackedUnsigned | FieldType::PackedSigned => {
            packed::is_numeric(bytes, format, mode)
        }
        FieldType::BinaryShort | FieldType::BinaryInt | FieldType::BinaryLong => {
            binary::is_numeric(bytes, format, mode)
        }
        FieldType::Float | FieldType::Double => float::is_numeric(bytes),
        FieldType::ReferencePointer => true,
    }
}

/// Writes the declaration-time default image of a field.
pub fn write_default(format: &FieldFormat, out: &mut [u8]) {
    match format.field_type() {
        FieldType::Text => text::write_default(out),
        FieldType::ZonedUnsigned | FieldType::ZonedSigned => zoned::encode(Decimal::ZERO, format, out),
        FieldType::PackedUnsigned | FieldType::PackedSigned => {
            packed::encode(Decimal::ZERO, format, out)
        }
        FieldType::BinaryShort
        | FieldType::BinaryInt
        | FieldType::BinaryLong
        | FieldType::Float
        | FieldType::Double
        | FieldType::ReferencePointer => out.fill(LOW_VALUE),
    }
}

/// Brings a value to the field's scale and digit count (steps 1-3 of a MOVE).
/// The result's scale equals the field's `decimal_digits`.
///
/// High-order integer digits are dropped before the value is widened to the
/// field's scale, so no finite source ever overflows.
fn to_scaled(value: &FieldValue, format: &FieldFormat) -> Result<Decimal, FieldValueError> {
    let scale = format.decimal_digits();
    let integer_digits = format.display_length().saturating_sub(scale as usize);
    let scaled = match value {
        FieldValue::Float(f) => {
            let reduced = f % 10f64.powi(integer_digits as i32);
            Decimal::from_f64(reduced, scale).ok_or_else(|| FieldValueError::OutOfRange {
                value: f.to_string(),
                target: format.field_type().name(),
            })?
        }
        other => {
            let decimal = other.to_decimal()?.truncate_integer_digits(integer_digits);
            decimal
                .rescale(scale)
                .ok_or_else(|| FieldValueError::OutOfRange {
                    value: decimal.to_string(),
                    target: format.field_type().name(),
                })?
        }
    };

    let truncated = scaled.truncate_digits(format.display_length());
    if format.field_type().is_signed() {
        Ok(truncated)
    } else {
        Ok(truncated.abs())
    }
}
