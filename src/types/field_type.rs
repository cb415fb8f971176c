//! # Field Encodings
//!
//! This module provides the canonical `FieldType` enum: one variant per byte
//! encoding a field may use. The enum is metadata-free; digit counts, scale
//! and justification live in [`FieldFormat`](super::FieldFormat).
//!
//! ## Type Categories
//!
//! | Category | Types | Byte Length |
//! |----------|-------|-------------|
//! | **Text** | Text | display length |
//! | **Zoned** | ZonedUnsigned, ZonedSigned | digits (+1 trailing sign) |
//! | **Packed** | PackedUnsigned, PackedSigned | digits / 2 + 1 |
//! | **Binary** | BinaryShort, BinaryInt, BinaryLong | 2, 4, 8 |
//! | **Float** | Float, Double | 4, 8 |
//! | **Pointer** | ReferencePointer | 4 |
//!
//! ## Discriminant Values
//!
//! Discriminants are grouped by category:
//! - 0: text
//! - 10-11: zoned decimal
//! - 20-21: packed decimal
//! - 30-32: binary
//! - 40-41: floating point
//! - 50: pointer
//!
//! ## Usage
//!
//! ```ignore
//! use copybook::types::FieldType;
//!
//! let ft = FieldType::binary_for_digits(7).unwrap();
//! assert_eq!(ft, FieldType::BinaryInt);
//! assert_eq!(ft.fixed_size(), Some(4));
//! ```

use crate::config::{BINARY_INT_DIGITS, BINARY_LONG_DIGITS, BINARY_SHORT_DIGITS, POINTER_SIZE};

/// Byte encoding of a field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text = 0,

    ZonedUnsigned = 10,
    ZonedSigned = 11,

    PackedUnsigned = 20,
    PackedSigned = 21,

    BinaryShort = 30,
    BinaryInt = 31,
    BinaryLong = 32,

    Float = 40,
    Double = 41,

    ReferencePointer = 50,
}

/// Alignment of text moved into a field shorter or longer than the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justification {
    #[default]
    Left,
    Right,
}

impl FieldType {
    /// Returns the byte size for encodings whose size does not depend on the
    /// declared digit count.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldType::BinaryShort => Some(2),
            FieldType::BinaryInt => Some(4),
            FieldType::BinaryLong => Some(8),
            FieldType::Float => Some(4),
            FieldType::Double => Some(8),
            FieldType::ReferencePointer => Some(POINTER_SIZE),
            FieldType::Text
            | FieldType::ZonedUnsigned
            | FieldType::ZonedSigned
            | FieldType::PackedUnsigned
            | FieldType::PackedSigned => None,
        }
    }

    /// Picks the narrowest binary width that holds `digits` decimal digits.
    pub fn binary_for_digits(digits: usize) -> Option<FieldType> {
        match digits {
            0 => None,
            d if d <= BINARY_SHORT_DIGITS => Some(FieldType::BinaryShort),
            d if d <= BINARY_INT_DIGITS => Some(FieldType::BinaryInt),
            d if d <= BINARY_LONG_DIGITS => Some(FieldType::BinaryLong),
            _ => None,
        }
    }

    /// Largest digit count a binary width may declare.
    pub fn binary_digit_limit(&self) -> Option<usize> {
        match self {
            FieldType::BinaryShort => Some(BINARY_SHORT_DIGITS),
            FieldType::BinaryInt => Some(BINARY_INT_DIGITS),
            FieldType::BinaryLong => Some(BINARY_LONG_DIGITS),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldType::Text)
    }

    pub fn is_zoned(&self) -> bool {
        matches!(self, FieldType::ZonedUnsigned | FieldType::ZonedSigned)
    }

    pub fn is_packed(&self) -> bool {
        matches!(self, FieldType::PackedUnsigned | FieldType::PackedSigned)
    }

    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            FieldType::BinaryShort | FieldType::BinaryInt | FieldType::BinaryLong
        )
    }

    /// Returns true if the encoding stores a sign.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            FieldType::ZonedSigned
                | FieldType::PackedSigned
                | FieldType::BinaryShort
                | FieldType::BinaryInt
                | FieldType::BinaryLong
                | FieldType::Float
                | FieldType::Double
        )
    }

    /// Returns true if the declared digit count carries an implied scale.
    pub fn supports_scale(&self) -> bool {
        self.is_zoned() || self.is_packed() || self.is_binary()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::ZonedUnsigned => "unsigned zoned decimal",
            FieldType::ZonedSigned => "signed zoned decimal",
            FieldType::PackedUnsigned => "unsigned packed decimal",
            FieldType::PackedSigned => "signed packed decimal",
            FieldType::BinaryShort => "2-byte binary",
            FieldType::BinaryInt => "4-byte binary",
            FieldType::BinaryLong => "8-byte binary",
            FieldType::Float => "single float",
            FieldType::Double => "double float",
            FieldType::ReferencePointer => "pointer",
        }
    }
}

impl TryFrom<u8> for FieldType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FieldType::Text),
            10 => Ok(FieldType::ZonedUnsigned),
            11 => Ok(FieldType::ZonedSigned),
            20 => Ok(FieldType::PackedUnsigned),
            21 => Ok(FieldType::PackedSigned),
            30 => Ok(FieldType::BinaryShort),
            31 => Ok(FieldType::BinaryInt),
            32 => Ok(FieldType::BinaryLong),
            40 => Ok(FieldType::Float),
            41 => Ok(FieldType::Double),
            50 => Ok(FieldType::ReferencePointer),
            other => Err(other),
        }
    }
}
