//! # Decoded Field Values
//!
//! This module provides `FieldValue`, the generalized value a field decodes to
//! and is assigned from, and the `FromFieldValue` conversions behind
//! `decoded_value::<T>()`.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Produced by |
//! |---------|-----------|-------------|
//! | Int | i64 | binary fields without scale, pointers |
//! | Decimal | Decimal | zoned, packed, scaled binary |
//! | Float | f64 | single and double float |
//! | Text | String | text fields |
//! | Bool | bool | assignment only (stored as 1 / 0) |
//! | LowValues | - | packed field holding all 0x00 |
//! | HighValues | - | packed field holding all 0xFF |
//!
//! ## Conversion Rules
//!
//! - Text converts to a number only if its trimmed content parses as a decimal.
//! - Decimal converts to an integer by truncating toward zero.
//! - A value is "true" when it equals 1; everything else, including text that
//!   is not numeric, is false.
//! - LowValues and HighValues never convert to a number.

use super::Decimal;
use crate::error::FieldValueError;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Decimal(Decimal),
    Float(f64),
    Text(String),
    Bool(bool),
    LowValues,
    HighValues,
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "integer",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::Bool(_) => "boolean",
            FieldValue::LowValues => "LOW-VALUES",
            FieldValue::HighValues => "HIGH-VALUES",
        }
    }

    pub fn to_decimal(&self) -> Result<Decimal, FieldValueError> {
        match self {
            FieldValue::Int(i) => Ok(Decimal::from(*i)),
            FieldValue::Decimal(d) => Ok(*d),
            FieldValue::Float(f) => {
                if !f.is_finite() {
                    return Err(FieldValueError::Incompatible {
                        from: "non-finite float",
                        to: "decimal",
                    });
                }
                // Display yields the shortest text that round-trips the float.
                let text = f.to_string();
                Decimal::parse(&text).ok_or(FieldValueError::OutOfRange {
                    value: text,
                    target: "decimal",
                })
            }
            FieldValue::Text(s) => s.parse(),
            FieldValue::Bool(b) => Ok(if *b { Decimal::ONE } else { Decimal::ZERO }),
            FieldValue::LowValues => Err(FieldValueError::LowValues),
            FieldValue::HighValues => Err(FieldValueError::HighValues),
        }
    }

    /// Integer value, truncating any fraction.
    pub fn to_i64(&self) -> Result<i64, FieldValueError> {
        if let FieldValue::Int(i) = self {
            return Ok(*i);
        }
        let decimal = self.to_decimal()?;
        decimal.to_i64().ok_or_else(|| FieldValueError::OutOfRange {
            value: decimal.to_string(),
            target: "i64",
        })
    }

    pub fn to_f64(&self) -> Result<f64, FieldValueError> {
        match self {
            FieldValue::Float(f) => Ok(*f),
            FieldValue::Int(i) => Ok(*i as f64),
            other => Ok(other.to_decimal()?.to_f64()),
        }
    }

    /// True when the value equals 1.
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            other => other
                .to_decimal()
                .map(|d| d == Decimal::ONE)
                .unwrap_or(false),
        }
    }

    /// Formats the value the way a MOVE to a text field would.
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            FieldValue::LowValues => "LOW-VALUES".to_string(),
            FieldValue::HighValues => "HIGH-VALUES".to_string(),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// Types a decoded field value can be converted into.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError>;
}

impl FromFieldValue for FieldValue {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        Ok(value)
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        value.to_i64()
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        let wide = value.to_i64()?;
        i32::try_from(wide).map_err(|_| FieldValueError::OutOfRange {
            value: wide.to_string(),
            target: "i32",
        })
    }
}

impl FromFieldValue for Decimal {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        value.to_decimal()
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        value.to_f64()
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => Ok(other.display_string()),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue) -> Result<Self, FieldValueError> {
        Ok(value.as_flag())
    }
}
