//! # Field Formats
//!
//! `FieldFormat` pairs a [`FieldType`] with the declaration metadata the codec
//! needs: display length (characters for text, digits for numerics), implied
//! decimal scale and justification.
//!
//! ## Byte Length Rules
//!
//! | Type | Byte length |
//! |------|-------------|
//! | Text | display length |
//! | ZonedUnsigned | digits |
//! | ZonedSigned | digits + 1 (separate trailing sign) |
//! | PackedUnsigned, PackedSigned | digits / 2 + 1 |
//! | BinaryShort / BinaryInt / BinaryLong | 2 / 4 / 8 |
//! | Float / Double | 4 / 8 |
//! | ReferencePointer | 4 |
//!
//! `validate` rejects declarations whose display length cannot be stored
//! by the encoding, for example a 19-digit binary field.

use super::{FieldType, Justification};
use crate::config::{MAX_DECIMAL_DIGITS, ZONED_SIGN_SIZE};
use crate::error::StructureError;

/// Codec-relevant description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldFormat {
    field_type: FieldType,
    display_length: usize,
    decimal_digits: u8,
    justification: Justification,
}

impl FieldFormat {
    pub fn new(field_type: FieldType, display_length: usize) -> Self {
        Self {
            field_type,
            display_length,
            decimal_digits: 0,
            justification: Justification::Left,
        }
    }

    pub fn with_scale(mut self, decimal_digits: u8) -> Self {
        self.decimal_digits = decimal_digits;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Characters for text fields, digits for numeric fields.
    pub fn display_length(&self) -> usize {
        self.display_length
    }

    pub fn decimal_digits(&self) -> u8 {
        self.decimal_digits
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    /// Number of bytes the field occupies in its buffer.
    pub fn byte_length(&self) -> usize {
        match self.field_type {
            FieldType::Text | FieldType::ZonedUnsigned => self.display_length,
            FieldType::ZonedSigned => self.display_length + ZONED_SIGN_SIZE,
            FieldType::PackedUnsigned | FieldType::PackedSigned => self.display_length / 2 + 1,
            FieldType::BinaryShort
            | FieldType::BinaryInt
            | FieldType::BinaryLong
            | FieldType::Float
            | FieldType::Double
            | FieldType::ReferencePointer => self.field_type.fixed_size().unwrap_or_default(),
        }
    }

    /// Checks the declaration and returns the byte length.
    pub fn validate(&self, name: &str) -> Result<usize, StructureError> {
        let invalid = |reason: &'static str| StructureError::InvalidFieldLength {
            name: name.to_string(),
            field_type: self.field_type,
            display_length: self.display_length,
            reason,
        };

        match self.field_type {
            FieldType::Text => {
                if self.display_length == 0 {
                    return Err(invalid("text fields need at least one byte"));
                }
            }
            FieldType::ZonedUnsigned
            | FieldType::ZonedSigned
            | FieldType::PackedUnsigned
            | FieldType::PackedSigned => {
                if self.display_length == 0 {
                    return Err(invalid("decimal fields need at least one digit"));
                }
                if self.display_length > MAX_DECIMAL_DIGITS {
                    return Err(invalid("digit count exceeds the decimal digit limit"));
                }
            }
            FieldType::BinaryShort | FieldType::BinaryInt | FieldType::BinaryLong => {
                let limit = self.field_type.binary_digit_limit().unwrap_or_default();
                if self.display_length == 0 {
                    return Err(invalid("binary fields need at least one digit"));
                }
                if self.display_length > limit {
                    return Err(invalid("digit count does not fit the binary width"));
                }
            }
            FieldType::Float | FieldType::Double | FieldType::ReferencePointer => {}
        }

        if self.field_type.supports_scale() && self.decimal_digits as usize > self.display_length
        {
            return Err(invalid("scale exceeds the declared digit count"));
        }

        Ok(self.byte_length())
    }
}
