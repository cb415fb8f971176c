//! # Records
//!
//! A `Record` is a finalized [`Layout`] laid over a [`Buffer`]. The layout is
//! shared and immutable; the record adds the bytes and the runtime aliasing
//! state.
//!
//! ## Element Access
//!
//! | Handle | Obtained from | Purpose |
//! |--------|---------------|---------|
//! | `ElementRef` | `root`, `structural_element_by_name` | navigate, read bytes |
//! | `ElementMut` | `element_mut`, `root_mut` | write bytes, reset, re-point |
//! | `FieldRef` | `field`, `ElementRef::as_field` | decode values, run checks |
//! | `FieldMut` | `field_mut` | assign values |
//!
//! Name lookup is global: `structural_element_by_name("CITY")` finds the first
//! element named `CITY` in declaration order at any depth. Qualified access
//! goes through `child` and `item`:
//!
//! ```ignore
//! let city = record
//!     .structural_element_by_name("ADDRESSES")
//!     .and_then(|a| a.item(1))
//!     .and_then(|a| a.child("CITY"));
//! ```
//!
//! ## Aliasing
//!
//! Two mechanisms make bytes visible through more than one element:
//!
//! - **Redefinition** is declared in the layout: two elements share an offset.
//! - **Buffer references** (`SET ADDRESS OF`) are chosen at runtime:
//!   `set_buffer_reference` re-points a record, group or field at another
//!   element's bytes, possibly in another record's buffer.
//!
//! An element's effective location is resolved by walking up to the nearest
//! re-pointed ancestor (or the element itself):
//!
//! ```text
//! location(e) = binding(a).base + (e.offset - a.offset)   nearest bound ancestor a
//!             = e.offset in the record's own buffer        no bound ancestor
//! ```
//!
//! ## Copies
//!
//! - `share()` returns a second record over the same bytes and bindings.
//! - `duplicate()` returns an independent record holding a copy of the bytes
//!   this record currently sees.
//!
//! ## Module Organization
//!
//! - `element_ref`: `ElementRef` / `ElementMut`
//! - `field`: `FieldRef` / `FieldMut` typed accessors
//! - `registry`: `RegistryContext` for pointer fields

mod element_ref;
mod field;
mod registry;


pub use element_ref::{ElementMut, ElementRef};
pub use field::{FieldMut, FieldRef};
pub use registry::{RecordKey, RegistryContext};

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use crate::buffer::Buffer;
use crate::config::SPACE;
use crate::error::{FieldValueError, StructureError};
use crate::layout::{ElementId, Layout, StructureDefinition};
use crate::types::FieldValue;

/// Runtime re-pointing of one element.
struct Binding {
    buffer: Buffer,
    base: usize,
}

impl Binding {
    fn share(&self) -> Binding {
        Binding {
            buffer: self.buffer.share(),
            base: self.base,
        }
    }
}

pub struct Record {
    layout: Arc<Layout>,
    buffer: Buffer,
    bindings: HashMap<ElementId, Binding>,
}

impl Record {
    /// Declares and builds a record (`01` level).
    pub fn define<F>(name: impl Into<String>, build: F) -> Result<Record, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let layout = StructureDefinition::new_record(name, build)?;
        Ok(Record::new(Arc::new(layout)))
    }

    /// A record holding its layout's initial image in a buffer of its own.
    pub fn new(layout: Arc<Layout>) -> Self {
        let buffer = Buffer::from_bytes(layout.initial_image().to_vec());
        Self {
            layout,
            buffer,
            bindings: HashMap::new(),
        }
    }

    /// A record laid over `buffer` starting at `base`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is too short for the layout.
    pub fn over(layout: Arc<Layout>, buffer: &Buffer, base: usize) -> Self {
        assert!(
            base + layout.len() <= buffer.len(),
            "record '{}' of {} bytes does not fit at offset {} of a {}-byte buffer",
            layout.name(),
            layout.len(),
            base,
            buffer.len()
        );
        let mut bindings = HashMap::new();
        if base != 0 {
            bindings.insert(
                ElementId::ROOT,
                Binding {
                    buffer: buffer.share(),
                    base,
                },
            );
        }
        Self {
            layout,
            buffer: buffer.share(),
            bindings,
        }
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn name(&self) -> &str {
        self.layout.name()
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn root(&self) -> ElementRef<'_> {
        ElementRef::new(self, ElementId::ROOT)
    }

    pub fn root_mut(&mut self) -> ElementMut<'_> {
        ElementMut::new(self, ElementId::ROOT)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this record's layout.
    pub fn element(&self, id: ElementId) -> ElementRef<'_> {
        assert!(id.index() < self.layout.element_count(), "unknown element id {:?}", id);
        ElementRef::new(self, id)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this record's layout.
    pub fn element_mut(&mut self, id: ElementId) -> ElementMut<'_> {
        assert!(id.index() < self.layout.element_count(), "unknown element id {:?}", id);
        ElementMut::new(self, id)
    }

    /// First element named `name` in declaration order, at any depth.
    pub fn structural_element_by_name(&self, name: &str) -> Option<ElementRef<'_>> {
        self.layout.find(name).map(|id| ElementRef::new(self, id))
    }

    pub fn structural_element_by_name_mut(&mut self, name: &str) -> Option<ElementMut<'_>> {
        let id = self.layout.find(name)?;
        Some(ElementMut::new(self, id))
    }

    pub fn contains_structural_element(&self, name: &str) -> bool {
        self.layout.contains(name)
    }

    pub fn field(&self, name: &str) -> Result<FieldRef<'_>, FieldValueError> {
        self.structural_element_by_name(name)
            .ok_or_else(|| FieldValueError::UnknownElement {
                name: name.to_string(),
            })?
            .as_field()
            .ok_or_else(|| FieldValueError::NotAField {
                name: name.to_string(),
            })
    }

    pub fn field_mut(&mut self, name: &str) -> Result<FieldMut<'_>, FieldValueError> {
        let id = self
            .layout
            .find(name)
            .ok_or_else(|| FieldValueError::UnknownElement {
                name: name.to_string(),
            })?;
        ElementMut::new(self, id)
            .into_field()
            .ok_or_else(|| FieldValueError::NotAField {
                name: name.to_string(),
            })
    }

    /// Decoded value of the field named `name`.
    pub fn value(&self, name: &str) -> Result<FieldValue, FieldValueError> {
        self.field(name)?.value()
    }

    /// Assigns to the field named `name` with MOVE semantics.
    pub fn assign(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FieldValueError> {
        self.field_mut(name)?.assign(value)
    }

    /// Evaluates the check `check` attached to the field named `field`.
    pub fn check(&self, field: &str, check: &str) -> Result<bool, FieldValueError> {
        self.field(field)?
            .check(check)
            .ok_or_else(|| FieldValueError::UnknownElement {
                name: format!("{}.{}", field, check),
            })
    }

    /// The whole record's bytes.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.root().bytes()
    }

    /// Group MOVE into the whole record: short input is padded with spaces,
    /// long input truncated.
    pub fn assign_bytes(&mut self, bytes: &[u8]) {
        self.root_mut().assign_bytes(bytes);
    }

    /// Restores the declaration-time bytes.
    pub fn reset_to_initial_value(&mut self) {
        self.reset_element(ElementId::ROOT);
    }

    /// Re-points the whole record at `target`'s bytes (`SET ADDRESS OF`).
    ///
    /// # Panics
    ///
    /// Panics if `target` is shorter than this record.
    pub fn set_buffer_reference(&mut self, target: &ElementRef<'_>) {
        self.root_mut().set_buffer_reference(target);
    }

    /// A second record over the same bytes.
    pub fn share(&self) -> Record {
        Record {
            layout: Arc::clone(&self.layout),
            buffer: self.buffer.share(),
            bindings: self
                .bindings
                .iter()
                .map(|(&id, binding)| (id, binding.share()))
                .collect(),
        }
    }

    /// An independent record holding a copy of what this record sees.
    pub fn duplicate(&self) -> Record {
        let copy = Record::new(Arc::clone(&self.layout));
        copy.buffer.write(0, &self.as_bytes());

        let mut bound: Vec<ElementId> = self
            .bindings
            .keys()
            .copied()
            .filter(|&id| id != ElementId::ROOT)
            .collect();
        bound.sort_unstable();
        for id in bound {
            let offset = self.layout.element(id).offset();
            copy.buffer.write(offset, &self.element(id).bytes());
        }
        copy
    }

    /// Buffer and offset an element's bytes currently live at.
    pub(crate) fn location(&self, id: ElementId) -> (&Buffer, usize) {
        let element = self.layout.element(id);
        if !self.bindings.is_empty() {
            let mut current = Some(id);
            while let Some(cur) = current {
                if let Some(binding) = self.bindings.get(&cur) {
                    let anchor = self.layout.element(cur).offset();
                    return (&binding.buffer, binding.base + (element.offset() - anchor));
                }
                current = self.layout.element(cur).parent();
            }
        }
        (&self.buffer, element.offset())
    }

    pub(crate) fn write_padded(&self, id: ElementId, bytes: &[u8]) {
        let len = self.layout.element(id).len();
        let (buffer, offset) = self.location(id);
        buffer.update(offset, len, |out| {
            let n = bytes.len().min(len);
            out[..n].copy_from_slice(&bytes[..n]);
            out[n..].fill(SPACE);
        });
    }

    pub(crate) fn reset_element(&self, id: ElementId) {
        let image = self.layout.initial_image();
        let restore = |target: ElementId| {
            let element = self.layout.element(target);
            let (buffer, offset) = self.location(target);
            buffer.write(offset, &image[element.offset()..element.end()]);
        };

        restore(id);
        for &bound in self.bindings.keys() {
            if bound != id && self.layout.is_within(bound, id) {
                restore(bound);
            }
        }
    }

    pub(crate) fn bind(&mut self, id: ElementId, buffer: Buffer, base: usize) {
        let layout = Arc::clone(&self.layout);
        self.bindings.retain(|&bound, _| !layout.is_within(bound, id));
        debug!(
            record = layout.name(),
            element = %layout.path(id),
            base,
            "buffer reference re-pointed"
        );
        self.bindings.insert(id, Binding { buffer, base });
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (buffer, base) = self.location(ElementId::ROOT);
        f.debug_struct("Record")
            .field("name", &self.name())
            .field("len", &self.len())
            .field("buffer", buffer)
            .field("base", &base)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}
