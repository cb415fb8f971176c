//! # Field Type System
//!
//! This module provides the types shared by the codec, the layout builder and
//! the record accessors.
//!
//! ## Module Structure
//!
//! - `field_type`: `FieldType` encoding discriminant and `Justification`
//! - `format`: `FieldFormat`, the codec-relevant part of a field declaration
//! - `decimal`: `Decimal` fixed-point value
//! - `value`: `FieldValue` and the `FromFieldValue` conversions
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `FieldType` | Byte encoding of a field |
//! | `FieldFormat` | Encoding + digits + scale + justification |
//! | `Decimal` | Scaled integer for zoned and packed values |
//! | `FieldValue` | Decoded value (integer, decimal, float, text, ...) |
//!
//! ## Usage
//!
//! ```ignore
//! use copybook::types::{Decimal, FieldFormat, FieldType, FieldValue};
//!
//! let format = FieldFormat::new(FieldType::PackedSigned, 7).with_scale(2);
//! assert_eq!(format.byte_length(), 4);
//!
//! let value = FieldValue::from(Decimal::new(12345, 2));
//! assert_eq!(value.display_string(), "123.45");
//! ```

mod decimal;
mod field_type;
mod format;
mod value;

pub use decimal::Decimal;
pub use field_type::{FieldType, Justification};
pub use format::FieldFormat;
pub use value::{FieldValue, FromFieldValue};
