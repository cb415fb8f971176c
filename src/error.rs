//! Error types for record layouts and field values.
//!
//! Two families exist and they never mix:
//!
//! - [`StructureError`]: the shape of a record is wrong. Raised while a
//!   `StructureDefinition` or `StructureCloner` runs and never retried.
//! - [`FieldValueError`]: a field's bytes cannot be read as, or written from,
//!   the requested value. Tolerant accessors (`as_int`, `as_safe_int`, ...)
//!   swallow these locally and substitute a default.
//!
//! Out-of-bounds buffer access is a broken precondition, not an error value,
//! and panics.

use crate::types::FieldType;
use thiserror::Error;

/// Errors raised while building or cloning a record structure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    /// A redefinition names an element that is not a declared sibling.
    #[error("'{name}' redefines unknown element '{target}' in '{parent}'")]
    UnknownRedefineTarget {
        name: String,
        target: String,
        parent: String,
    },

    /// Declared length is inconsistent with the field's encoding.
    #[error("invalid length for {field_type:?} field '{name}' (display length {display_length}): {reason}")]
    InvalidFieldLength {
        name: String,
        field_type: FieldType,
        display_length: usize,
        reason: &'static str,
    },

    /// A traversal met an element kind it cannot replay.
    #[error("unrecognized element type for '{name}': expected {expected}, found {found}")]
    UnrecognizedElementType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Two non-FILLER siblings share a name.
    #[error("duplicate element name '{name}' in '{parent}'")]
    DuplicateName { name: String, parent: String },

    /// An element would end past the record's buffer.
    #[error("'{name}' ends at byte {end}, past the record length {capacity}")]
    RedefinitionOverflow {
        name: String,
        end: usize,
        capacity: usize,
    },

    /// An OCCURS table with zero occurrences.
    #[error("array '{name}' must have at least one occurrence")]
    EmptyArray { name: String },

    /// A named element is not declared where it was looked up.
    #[error("element '{name}' not found")]
    UnknownElement { name: String },

    /// A field-only operation was applied to a group or array.
    #[error("element '{name}' is not a field")]
    NotAField { name: String },

    /// The declared initial value cannot be encoded into the field.
    #[error("invalid initial value for '{name}': {source}")]
    InvalidInitialValue {
        name: String,
        #[source]
        source: FieldValueError,
    },

    /// The splice target cannot receive new content.
    #[error("invalid insertion point '{name}': {reason}")]
    InvalidInsertionPoint { name: String, reason: &'static str },
}

/// Errors raised while converting between field bytes and values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldValueError {
    #[error("element '{name}' not found")]
    UnknownElement { name: String },

    #[error("element '{name}' is not a field")]
    NotAField { name: String },

    /// Text that should hold a number does not.
    #[error("'{text}' is not a numeric value")]
    NotNumeric { text: String },

    /// The requested type cannot be produced from this value.
    #[error("cannot convert {from} to {to}")]
    Incompatible {
        from: &'static str,
        to: &'static str,
    },

    #[error("invalid packed decimal digit nibble {nibble:#x} at digit {position}")]
    InvalidPackedDigit { nibble: u8, position: usize },

    /// The field holds the all-0x00 sentinel.
    #[error("field holds LOW-VALUES")]
    LowValues,

    /// The field holds the all-0xFF sentinel.
    #[error("field holds HIGH-VALUES")]
    HighValues,

    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("pointer is null")]
    NullPointer,

    #[error("pointer key {key} does not reference a registered record")]
    DanglingPointer { key: u32 },
}
