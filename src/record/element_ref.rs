//! Element handles bound to a record.

use super::{FieldMut, FieldRef, Record};
use crate::layout::{Element, ElementFlags, ElementId, ElementKind};

/// Read access to one element of a record.
#[derive(Clone, Copy)]
pub struct ElementRef<'r> {
    record: &'r Record,
    id: ElementId,
}

impl<'r> ElementRef<'r> {
    pub(crate) fn new(record: &'r Record, id: ElementId) -> Self {
        Self { record, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn record(&self) -> &'r Record {
        self.record
    }

    pub fn element(&self) -> &'r Element {
        self.record.layout().element(self.id)
    }

    pub fn name(&self) -> &'r str {
        self.element().name()
    }

    /// Declared offset within the record.
    pub fn offset(&self) -> usize {
        self.element().offset()
    }

    pub fn len(&self) -> usize {
        self.element().len()
    }

    pub fn is_empty(&self) -> bool {
        self.element().is_empty()
    }

    pub fn flags(&self) -> ElementFlags {
        self.element().flags()
    }

    /// Dotted path from the record, e.g. `CUSTOMER.PHONES[1].AREA`.
    pub fn path(&self) -> String {
        self.record.layout().path(self.id)
    }

    pub fn parent(&self) -> Option<ElementRef<'r>> {
        self.element()
            .parent()
            .map(|id| ElementRef::new(self.record, id))
    }

    /// Group children or array items, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'r>> + 'r {
        let record = self.record;
        self.element()
            .children()
            .iter()
            .map(move |&id| ElementRef::new(record, id))
    }

    /// Direct child named `name`.
    pub fn child(&self, name: &str) -> Option<ElementRef<'r>> {
        self.record
            .layout()
            .child(self.id, name)
            .map(|id| ElementRef::new(self.record, id))
    }

    /// Array item `index` (0-based); `None` for non-arrays.
    pub fn item(&self, index: usize) -> Option<ElementRef<'r>> {
        match self.element().kind() {
            ElementKind::FieldArray { items, .. } | ElementKind::GroupArray { items, .. } => items
                .get(index)
                .map(|&id| ElementRef::new(self.record, id)),
            ElementKind::Field(_) | ElementKind::Group { .. } => None,
        }
    }

    /// Current bytes, read through any buffer reference.
    pub fn bytes(&self) -> Vec<u8> {
        let (buffer, offset) = self.record.location(self.id);
        buffer.read(offset, self.len())
    }

    pub fn as_field(&self) -> Option<FieldRef<'r>> {
        self.element()
            .field_def()
            .map(|def| FieldRef::new(*self, def))
    }

    /// True if both handles denote the same element of the same layout.
    pub fn same_element(&self, other: &ElementRef<'_>) -> bool {
        self.id == other.id && std::sync::Arc::ptr_eq(self.record.layout(), other.record.layout())
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("path", &self.path())
            .field("offset", &self.offset())
            .field("len", &self.len())
            .finish()
    }
}

/// Write access to one element of a record.
pub struct ElementMut<'r> {
    record: &'r mut Record,
    id: ElementId,
}

impl<'r> ElementMut<'r> {
    pub(crate) fn new(record: &'r mut Record, id: ElementId) -> Self {
        Self { record, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn view(&self) -> ElementRef<'_> {
        ElementRef::new(self.record, self.id)
    }

    pub fn into_field(self) -> Option<FieldMut<'r>> {
        if self.record.layout().element(self.id).is_field() {
            Some(FieldMut::new(self.record, self.id))
        } else {
            None
        }
    }

    /// Group MOVE: short input is padded with spaces, long input truncated.
    pub fn assign_bytes(&mut self, bytes: &[u8]) {
        self.record.write_padded(self.id, bytes);
    }

    /// Fills the element with one byte, e.g. LOW-VALUES.
    pub fn fill(&mut self, byte: u8) {
        let len = self.record.layout().element(self.id).len();
        let (buffer, offset) = self.record.location(self.id);
        buffer.fill(offset, len, byte);
    }

    /// Restores the declaration-time bytes of this element and everything
    /// below it.
    pub fn reset(&mut self) {
        self.record.reset_element(self.id);
    }

    /// Re-points this element (and its descendants) at `target`'s bytes.
    ///
    /// # Panics
    ///
    /// Panics if `target` is shorter than this element.
    pub fn set_buffer_reference(&mut self, target: &ElementRef<'_>) {
        let len = self.record.layout().element(self.id).len();
        assert!(
            target.len() >= len,
            "cannot point '{}' ({} bytes) at '{}' ({} bytes)",
            self.record.layout().path(self.id),
            len,
            target.path(),
            target.len()
        );
        let (buffer, base) = target.record().location(target.id());
        let buffer = buffer.share();
        self.record.bind(self.id, buffer, base);
    }
}
