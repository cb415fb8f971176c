//! # Structure Definition
//!
//! `StructureDefinition` builds a record layout in one pass, in declaration
//! order. Every builder call places its element at the current parent's
//! cursor and advances the cursor by the element's length; a redefinition is
//! placed at its target's offset and leaves the cursor alone.
//!
//! ## Placement
//!
//! ```text
//! 01 CUSTOMER.                         offset  len
//!    05 ID          PIC 9(4).            0      4
//!    05 NAME        PIC X(10).           4     10
//!    05 NAME-PARTS  REDEFINES NAME.      4     10   cursor stays at 14
//!       10 FIRST    PIC X(5).            4      5
//!       10 LAST     PIC X(5).            9      5
//!    05 PHONES      OCCURS 2.           14     16   stride 8
//!       10 AREA     PIC 9(3).           14      3   PHONES[1].AREA at 22
//!       10 NUMBER   PIC 9(5).           17      5
//! ```
//!
//! Group arrays are declared once: the closure builds instance 0, and
//! instances `1..count` are copies shifted by `i * stride`. Items are named
//! `BASE[i]`, 0-based.
//!
//! ## Usage
//!
//! ```ignore
//! let layout = StructureDefinition::new_record("CUSTOMER", |def| {
//!     def.create_new_field(FieldSpec::zoned("ID", 4))?;
//!     def.create_new_field(FieldSpec::text("NAME", 10))?;
//!     def.new_group_redefine("NAME-PARTS", "NAME", |def| {
//!         def.create_new_field(FieldSpec::text("FIRST", 5))?;
//!         def.create_new_field(FieldSpec::text("LAST", 5))?;
//!         Ok(())
//!     })?;
//!     def.create_new_group_array("PHONES", 2, |def| {
//!         def.create_new_field(FieldSpec::zoned("AREA", 3))?;
//!         def.create_new_field(FieldSpec::zoned("NUMBER", 5))?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//! assert_eq!(layout.len(), 30);
//! ```
//!
//! ## Errors
//!
//! Declaration errors are returned from the builder call that caused them and
//! abort the whole definition. The finished layout is checked once more: every
//! element, redefinitions included, must end within the record.

use std::ops::Range;

use tracing::{trace, warn};

use super::{CheckField, Element, ElementFlags, ElementId, ElementKind, FieldDef, Layout};
use crate::config::FILLER_NAME;
use crate::error::StructureError;
use crate::types::{FieldFormat, FieldType, FieldValue, Justification};

/// Declaration of one field, passed to `create_new_field`.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    format: FieldFormat,
    redefines: Option<String>,
    initial: Option<FieldValue>,
    checks: Vec<CheckField>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, format: FieldFormat) -> Self {
        Self {
            name: name.into(),
            format,
            redefines: None,
            initial: None,
            checks: Vec::new(),
        }
    }

    /// `PIC X(len)`
    pub fn text(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, FieldFormat::new(FieldType::Text, len))
    }

    /// `PIC 9(digits)`
    pub fn zoned(name: impl Into<String>, digits: usize) -> Self {
        Self::new(name, FieldFormat::new(FieldType::ZonedUnsigned, digits))
    }

    /// `PIC S9(digits) SIGN TRAILING SEPARATE`
    pub fn signed_zoned(name: impl Into<String>, digits: usize) -> Self {
        Self::new(name, FieldFormat::new(FieldType::ZonedSigned, digits))
    }

    /// `PIC 9(digits) COMP-3`
    pub fn packed(name: impl Into<String>, digits: usize) -> Self {
        Self::new(name, FieldFormat::new(FieldType::PackedUnsigned, digits))
    }

    /// `PIC S9(digits) COMP-3`
    pub fn signed_packed(name: impl Into<String>, digits: usize) -> Self {
        Self::new(name, FieldFormat::new(FieldType::PackedSigned, digits))
    }

    /// `PIC S9(digits) COMP`; the width follows from the digit count.
    pub fn binary(name: impl Into<String>, digits: usize) -> Self {
        let field_type = FieldType::binary_for_digits(digits).unwrap_or(FieldType::BinaryLong);
        Self::new(name, FieldFormat::new(field_type, digits))
    }

    /// `COMP-1`
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldFormat::new(FieldType::Float, 0))
    }

    /// `COMP-2`
    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, FieldFormat::new(FieldType::Double, 0))
    }

    /// `USAGE POINTER`
    pub fn pointer(name: impl Into<String>) -> Self {
        Self::new(name, FieldFormat::new(FieldType::ReferencePointer, 0))
    }

    /// Unnamed `PIC X(len)` padding.
    pub fn filler(len: usize) -> Self {
        Self::text(FILLER_NAME, len)
    }

    /// Implied decimal places (`V99`).
    pub fn scale(mut self, decimal_digits: u8) -> Self {
        self.format = self.format.with_scale(decimal_digits);
        self
    }

    pub fn justify_right(mut self) -> Self {
        self.format = self.format.with_justification(Justification::Right);
        self
    }

    pub fn redefines(mut self, target: impl Into<String>) -> Self {
        self.redefines = Some(target.into());
        self
    }

    /// `VALUE` clause.
    pub fn initial(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial = Some(value.into());
        self
    }

    pub fn check(mut self, check: CheckField) -> Self {
        self.checks.push(check);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &FieldFormat {
        &self.format
    }

    /// Rebuilds the declaration of an existing field.
    pub(crate) fn from_def(name: &str, def: &FieldDef, redefines: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            format: def.format,
            redefines: redefines.map(str::to_string),
            initial: def.initial.clone(),
            checks: def.checks.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    parent: ElementId,
    cursor: usize,
    in_redefinition: bool,
}

/// One-pass builder for a record layout.
pub struct StructureDefinition {
    elements: Vec<Element>,
    current: Scope,
}

impl StructureDefinition {
    /// Builds a record named `name`; `build` declares its top-level elements.
    pub fn new_record<F>(name: impl Into<String>, build: F) -> Result<Layout, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let root = Element {
            name: name.into(),
            offset: 0,
            length: 0,
            flags: ElementFlags::default(),
            parent: None,
            redefines: None,
            kind: ElementKind::Group {
                children: Vec::new(),
            },
        };
        let mut def = StructureDefinition {
            elements: vec![root],
            current: Scope {
                parent: ElementId::ROOT,
                cursor: 0,
                in_redefinition: false,
            },
        };
        build(&mut def)?;
        def.elements[0].length = def.current.cursor;
        Layout::build(def.elements)
    }

    /// Declares a group; `build` declares its children.
    pub fn new_group<F>(&mut self, name: impl Into<String>, build: F) -> Result<ElementId, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let name = name.into();
        self.check_unique(&name)?;
        let offset = self.current.cursor;
        let in_redefinition = self.current.in_redefinition;
        let id = self.push(Element {
            flags: ElementFlags {
                filler: name == FILLER_NAME,
                redefinition: false,
                child_of_redefinition: in_redefinition,
            },
            name,
            offset,
            length: 0,
            parent: Some(self.current.parent),
            redefines: None,
            kind: ElementKind::Group {
                children: Vec::new(),
            },
        });

        let end = self.nested(
            Scope {
                parent: id,
                cursor: offset,
                in_redefinition,
            },
            build,
        )?;
        self.elements[id.index()].length = end - offset;
        self.current.cursor = end;
        Ok(id)
    }

    /// Declares a group over the bytes of the sibling named `target`.
    pub fn new_group_redefine<F>(
        &mut self,
        name: impl Into<String>,
        target: &str,
        build: F,
    ) -> Result<ElementId, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let name = name.into();
        self.check_unique(&name)?;
        let target_id = self.resolve_redefine(&name, target)?;
        let offset = self.elements[target_id.index()].offset;
        trace!(field = %name, redefines = target, offset, "redefinition placed");

        let id = self.push(Element {
            flags: ElementFlags {
                filler: name == FILLER_NAME,
                redefinition: true,
                child_of_redefinition: self.current.in_redefinition,
            },
            name,
            offset,
            length: 0,
            parent: Some(self.current.parent),
            redefines: Some(target_id),
            kind: ElementKind::Group {
                children: Vec::new(),
            },
        });

        let end = self.nested(
            Scope {
                parent: id,
                cursor: offset,
                in_redefinition: true,
            },
            build,
        )?;
        self.elements[id.index()].length = end - offset;
        Ok(id)
    }

    pub fn create_new_field(&mut self, spec: FieldSpec) -> Result<ElementId, StructureError> {
        let FieldSpec {
            name,
            format,
            redefines,
            initial,
            checks,
        } = spec;
        let length = format.validate(&name)?;
        self.check_unique(&name)?;
        let (offset, flags, target) = self.place(&name, redefines.as_deref())?;
        let initial = Self::accept_initial(&name, flags, initial);

        let id = self.push(Element {
            name,
            offset,
            length,
            flags,
            parent: Some(self.current.parent),
            redefines: target,
            kind: ElementKind::Field(FieldDef {
                format,
                checks,
                initial,
            }),
        });
        if !flags.redefinition {
            self.current.cursor += length;
        }
        Ok(id)
    }

    /// Declares `count` consecutive copies of a field (`OCCURS count`).
    pub fn create_new_field_array(
        &mut self,
        spec: FieldSpec,
        count: usize,
    ) -> Result<ElementId, StructureError> {
        let FieldSpec {
            name,
            format,
            redefines,
            initial,
            checks,
        } = spec;
        if count == 0 {
            return Err(StructureError::EmptyArray { name });
        }
        let stride = format.validate(&name)?;
        self.check_unique(&name)?;
        let (offset, flags, target) = self.place(&name, redefines.as_deref())?;
        let initial = Self::accept_initial(&name, flags, initial);

        let array = self.push(Element {
            name: name.clone(),
            offset,
            length: count * stride,
            flags,
            parent: Some(self.current.parent),
            redefines: target,
            kind: ElementKind::FieldArray {
                items: Vec::new(),
                stride,
            },
        });

        let item_flags = ElementFlags {
            filler: flags.filler,
            redefinition: false,
            child_of_redefinition: flags.is_alias(),
        };
        let items: Vec<ElementId> = (0..count)
            .map(|i| {
                self.alloc(Element {
                    name: format!("{}[{}]", name, i),
                    offset: offset + i * stride,
                    length: stride,
                    flags: item_flags,
                    parent: Some(array),
                    redefines: None,
                    kind: ElementKind::Field(FieldDef {
                        format,
                        checks: checks.clone(),
                        initial: initial.clone(),
                    }),
                })
            })
            .collect();

        if let ElementKind::FieldArray { items: slot, .. } = &mut self.elements[array.index()].kind {
            *slot = items;
        }
        if !flags.redefinition {
            self.current.cursor += count * stride;
        }
        Ok(array)
    }

    /// Declares `count` consecutive copies of a group; `build` declares the
    /// children of one instance.
    pub fn create_new_group_array<F>(
        &mut self,
        name: impl Into<String>,
        count: usize,
        build: F,
    ) -> Result<ElementId, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let name = name.into();
        if count == 0 {
            return Err(StructureError::EmptyArray { name });
        }
        self.check_unique(&name)?;
        let offset = self.current.cursor;
        let in_redefinition = self.current.in_redefinition;
        let flags = ElementFlags {
            filler: name == FILLER_NAME,
            redefinition: false,
            child_of_redefinition: in_redefinition,
        };

        let array = self.push(Element {
            name: name.clone(),
            offset,
            length: 0,
            flags,
            parent: Some(self.current.parent),
            redefines: None,
            kind: ElementKind::GroupArray {
                items: Vec::new(),
                stride: 0,
            },
        });
        let template = self.alloc(Element {
            name: format!("{}[0]", name),
            offset,
            length: 0,
            flags,
            parent: Some(array),
            redefines: None,
            kind: ElementKind::Group {
                children: Vec::new(),
            },
        });

        let end = self.nested(
            Scope {
                parent: template,
                cursor: offset,
                in_redefinition,
            },
            build,
        )?;
        let stride = end - offset;
        self.elements[template.index()].length = stride;

        let subtree = template.index()..self.elements.len();
        let mut items = Vec::with_capacity(count);
        items.push(template);
        for i in 1..count {
            let copy = self.copy_subtree(subtree.clone(), i * stride, format!("{}[{}]", name, i));
            items.push(copy);
        }

        let element = &mut self.elements[array.index()];
        element.length = count * stride;
        element.kind = ElementKind::GroupArray { items, stride };
        self.current.cursor = offset + count * stride;
        Ok(array)
    }

    /// Attaches a condition to the field named `field_name` among the current
    /// group's children. On a field array it applies to every item.
    pub fn create_new_check_field(
        &mut self,
        field_name: &str,
        check: CheckField,
    ) -> Result<(), StructureError> {
        let id = self
            .elements[self.current.parent.index()]
            .children()
            .iter()
            .rev()
            .copied()
            .find(|&id| {
                let element = &self.elements[id.index()];
                element.name == field_name && !element.flags.filler
            })
            .ok_or_else(|| StructureError::UnknownElement {
                name: field_name.to_string(),
            })?;

        let targets: Vec<ElementId> = match &self.elements[id.index()].kind {
            ElementKind::Field(_) => vec![id],
            ElementKind::FieldArray { items, .. } => items.clone(),
            ElementKind::Group { .. } | ElementKind::GroupArray { .. } => {
                return Err(StructureError::NotAField {
                    name: field_name.to_string(),
                })
            }
        };
        for target in targets {
            if let ElementKind::Field(def) = &mut self.elements[target.index()].kind {
                def.checks.push(check.clone());
            }
        }
        Ok(())
    }

    /// Offset the next non-redefinition element of the current group gets.
    pub fn current_offset(&self) -> usize {
        self.current.cursor
    }

    fn nested<F>(&mut self, scope: Scope, build: F) -> Result<usize, StructureError>
    where
        F: FnOnce(&mut StructureDefinition) -> Result<(), StructureError>,
    {
        let outer = std::mem::replace(&mut self.current, scope);
        let result = build(self);
        let inner = std::mem::replace(&mut self.current, outer);
        result.map(|()| inner.cursor)
    }

    fn alloc(&mut self, element: Element) -> ElementId {
        let id = ElementId::from_index(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Allocates an element and appends it to the current group's children.
    fn push(&mut self, element: Element) -> ElementId {
        let id = self.alloc(element);
        if let ElementKind::Group { children } = &mut self.elements[self.current.parent.index()].kind {
            children.push(id);
        }
        id
    }

    fn parent_name(&self) -> String {
        self.elements[self.current.parent.index()].name.clone()
    }

    fn check_unique(&self, name: &str) -> Result<(), StructureError> {
        if name == FILLER_NAME {
            return Ok(());
        }
        let taken = self.elements[self.current.parent.index()]
            .children()
            .iter()
            .any(|&id| self.elements[id.index()].name == name);
        if taken {
            return Err(StructureError::DuplicateName {
                name: name.to_string(),
                parent: self.parent_name(),
            });
        }
        Ok(())
    }

    fn resolve_redefine(&self, name: &str, target: &str) -> Result<ElementId, StructureError> {
        self.elements[self.current.parent.index()]
            .children()
            .iter()
            .copied()
            .find(|&id| {
                let element = &self.elements[id.index()];
                element.name == target && !element.flags.filler
            })
            .ok_or_else(|| StructureError::UnknownRedefineTarget {
                name: name.to_string(),
                target: target.to_string(),
                parent: self.parent_name(),
            })
    }

    /// Offset, flags and redefinition target for a new leaf or field array.
    fn place(
        &self,
        name: &str,
        redefines: Option<&str>,
    ) -> Result<(usize, ElementFlags, Option<ElementId>), StructureError> {
        let mut flags = ElementFlags {
            filler: name == FILLER_NAME,
            redefinition: false,
            child_of_redefinition: self.current.in_redefinition,
        };
        match redefines {
            None => Ok((self.current.cursor, flags, None)),
            Some(target) => {
                let target_id = self.resolve_redefine(name, target)?;
                let offset = self.elements[target_id.index()].offset;
                flags.redefinition = true;
                trace!(field = name, redefines = target, offset, "redefinition placed");
                Ok((offset, flags, Some(target_id)))
            }
        }
    }

    fn accept_initial(
        name: &str,
        flags: ElementFlags,
        initial: Option<FieldValue>,
    ) -> Option<FieldValue> {
        if flags.is_alias() && initial.is_some() {
            warn!(field = name, "initial value on a redefinition ignored");
            return None;
        }
        initial
    }

    /// Copies the arena range `subtree` (one complete subtree), shifted by
    /// `shift` bytes, and returns the copy's root.
    fn copy_subtree(&mut self, subtree: Range<usize>, shift: usize, name: String) -> ElementId {
        let Range { start, end } = subtree;
        let base = self.elements.len();
        let remap = |id: ElementId| {
            if (start..end).contains(&id.index()) {
                ElementId::from_index(base + id.index() - start)
            } else {
                id
            }
        };

        for index in start..end {
            let mut copy = self.elements[index].clone();
            copy.offset += shift;
            copy.parent = copy.parent.map(remap);
            copy.redefines = copy.redefines.map(remap);
            match &mut copy.kind {
                ElementKind::Field(_) => {}
                ElementKind::Group { children: ids }
                | ElementKind::FieldArray { items: ids, .. }
                | ElementKind::GroupArray { items: ids, .. } => {
                    for id in ids.iter_mut() {
                        *id = remap(*id);
                    }
                }
            }
            if index == start {
                copy.name = name.clone();
            }
            self.elements.push(copy);
        }
        ElementId::from_index(base)
    }
}
