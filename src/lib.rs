//! # copybook - COBOL Record Layouts for Rust
//!
//! copybook describes fixed-length records the way a COBOL copybook does:
//! hierarchical groups of fields at fixed byte offsets, redefinitions that
//! give the same bytes a second shape, and OCCURS tables. Records are read and
//! written in place, so a byte image produced by a mainframe program can be
//! decoded field by field and edited without re-serializing the record.
//!
//! ## Quick Start
//!
//! ```ignore
//! use copybook::{Decimal, FieldSpec, Record};
//!
//! let mut customer = Record::define("CUSTOMER", |def| {
//!     def.create_new_field(FieldSpec::zoned("ID", 6))?;
//!     def.create_new_field(FieldSpec::text("NAME", 20))?;
//!     def.create_new_field(FieldSpec::signed_packed("BALANCE", 9).scale(2))?;
//!     Ok(())
//! })?;
//!
//! customer.assign("ID", 1042)?;
//! customer.assign("BALANCE", Decimal::new(-1999, 2))?;
//! assert_eq!(customer.field("ID")?.as_int(), 1042);
//! assert_eq!(&customer.as_bytes()[..6], b"001042");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   StructureDefinition / Cloner       │  declare, rebuild, splice
//! ├─────────────────────────────────────┤
//! │   Layout (Arc, immutable)            │  offsets, names, initial image
//! ├─────────────────────────────────────┤
//! │   Record / ElementRef / FieldRef     │  typed access, aliasing
//! ├─────────────────────────────────────┤
//! │   Codec                              │  text, zoned, packed, binary, float
//! ├─────────────────────────────────────┤
//! │   Buffer (shared bytes)              │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Field Encodings
//!
//! | COBOL | `FieldType` | Bytes |
//! |-------|-------------|-------|
//! | `PIC X(n)` | `Text` | n, Latin-1 |
//! | `PIC 9(n)` | `ZonedUnsigned` | n ASCII digits |
//! | `PIC S9(n) SIGN TRAILING SEPARATE` | `ZonedSigned` | n digits + `+`/`-` |
//! | `PIC S9(n) COMP-3` | `PackedSigned` / `PackedUnsigned` | n/2 + 1, BCD + sign nibble |
//! | `PIC S9(n) COMP` | `BinaryShort` / `BinaryInt` / `BinaryLong` | 2 / 4 / 8, big-endian |
//! | `COMP-1` / `COMP-2` | `Float` / `Double` | 4 / 8, IEEE-754 big-endian |
//! | `USAGE POINTER` | `ReferencePointer` | 4, registry key |
//!
//! ## Module Overview
//!
//! - [`buffer`]: shared byte storage behind records
//! - [`codec`]: per-type encode, decode and validity checks
//! - [`config`]: constants and `NumericValidation`
//! - [`error`]: `StructureError` and `FieldValueError`
//! - [`layout`]: `StructureDefinition`, `Layout`, `StructureCloner`
//! - [`record`]: `Record`, element and field handles, `RegistryContext`
//! - [`types`]: `FieldType`, `FieldFormat`, `FieldValue`, `Decimal`

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod record;
pub mod types;

pub use buffer::Buffer;
pub use config::NumericValidation;
pub use error::{FieldValueError, StructureError};
pub use layout::{
    CheckField, ElementFlags, ElementId, ElementKind, FieldSpec, Layout, StructureCloner,
    StructureDefinition,
};
pub use record::{
    ElementMut, ElementRef, FieldMut, FieldRef, Record, RecordKey, RegistryContext,
};
pub use types::{Decimal, FieldFormat, FieldType, FieldValue, Justification};
