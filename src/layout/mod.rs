//! # Record Layouts
//!
//! This module describes the shape of a record: which named elements exist,
//! where each one sits in the record's bytes, and how each field is encoded.
//!
//! ## Architecture
//!
//! ```text
//! StructureDefinition ──build──> Layout (frozen, Arc-shared)
//!         ^                         │
//!         │ replay                  │ laid over a Buffer
//! StructureCloner <──────────── Record
//! ```
//!
//! A layout is an arena of [`Element`]s in declaration order. `ElementId::ROOT`
//! is the record itself; every other element has a parent id. Element kinds
//! form a closed set:
//!
//! | Kind | Length | Children |
//! |------|--------|----------|
//! | `Field` | from its `FieldFormat` | none |
//! | `Group` | sum of non-redefinition children | ordered, unique names |
//! | `FieldArray` | `count * stride` | items `NAME[0]..NAME[count-1]` |
//! | `GroupArray` | `count * stride` | group items, copies of item 0 |
//!
//! ## Invariants
//!
//! - Elements of one group are placed in declaration order; a redefinition
//!   takes its target's offset and adds nothing to the group's length.
//! - Array item `i` occupies `[offset + i * stride, offset + (i + 1) * stride)`.
//! - Every element ends within the record.
//! - Sibling names are unique, except `FILLER`, which is never indexed.
//!
//! ## Module Organization
//!
//! - `element`: `ElementId`, `Element`, `ElementKind`, `FieldDef`, `ElementFlags`
//! - `tree`: `Layout`, the frozen arena with its name index and initial image
//! - `definition`: `StructureDefinition` builder and `FieldSpec`
//! - `check`: `CheckField` conditions
//! - `cloner`: `StructureCloner`, rebuild with splice-insertion

mod check;
mod cloner;
mod definition;
mod element;
mod tree;

#[cfg(test)]
mod tests;

pub use check::CheckField;
pub use cloner::StructureCloner;
pub use definition::{FieldSpec, StructureDefinition};
pub use element::{Element, ElementFlags, ElementId, ElementKind, FieldDef};
pub use tree::Layout;
