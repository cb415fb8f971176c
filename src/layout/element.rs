//! Element arena entries.
//!
//! Every element of a record, at any depth, is one `Element` in the layout's
//! arena, addressed by `ElementId`. Parent/child links are ids, never
//! references, so aliasing elements (redefinitions) are simply two entries
//! with the same offset.

use super::CheckField;
use crate::types::{FieldFormat, FieldValue};

/// Index of an element in its layout's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// The record itself.
    pub const ROOT: ElementId = ElementId(0);

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        ElementId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementFlags {
    /// Unnamed padding; not addressable by name.
    pub filler: bool,
    /// Placed over a sibling's bytes instead of after it.
    pub redefinition: bool,
    /// Lies inside a redefinition's subtree.
    pub child_of_redefinition: bool,
}

impl ElementFlags {
    /// True if the element's bytes belong to some other element.
    pub fn is_alias(&self) -> bool {
        self.redefinition || self.child_of_redefinition
    }
}

/// Declaration of a leaf field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) format: FieldFormat,
    pub(crate) checks: Vec<CheckField>,
    pub(crate) initial: Option<FieldValue>,
}

impl FieldDef {
    pub fn format(&self) -> &FieldFormat {
        &self.format
    }

    pub fn checks(&self) -> &[CheckField] {
        &self.checks
    }

    /// Declared initial value, if any.
    pub fn initial(&self) -> Option<&FieldValue> {
        self.initial.as_ref()
    }
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Field(FieldDef),
    Group { children: Vec<ElementId> },
    /// Consecutive copies of one field; `items` are `Field` elements.
    FieldArray { items: Vec<ElementId>, stride: usize },
    /// Consecutive copies of one group; `items` are `Group` elements.
    GroupArray { items: Vec<ElementId>, stride: usize },
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Field(_) => "field",
            ElementKind::Group { .. } => "group",
            ElementKind::FieldArray { .. } => "field array",
            ElementKind::GroupArray { .. } => "group array",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) offset: usize,
    pub(crate) length: usize,
    pub(crate) flags: ElementFlags,
    pub(crate) parent: Option<ElementId>,
    pub(crate) redefines: Option<ElementId>,
    pub(crate) kind: ElementKind,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset from the start of the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// The sibling this element redefines, for redefinition roots.
    pub fn redefines(&self) -> Option<ElementId> {
        self.redefines
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn field_def(&self) -> Option<&FieldDef> {
        match &self.kind {
            ElementKind::Field(def) => Some(def),
            _ => None,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, ElementKind::Field(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::FieldArray { .. } | ElementKind::GroupArray { .. }
        )
    }

    /// Group children or array items; empty for fields.
    pub fn children(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Field(_) => &[],
            ElementKind::Group { children } => children,
            ElementKind::FieldArray { items, .. } | ElementKind::GroupArray { items, .. } => items,
        }
    }
}
