//! # Structure Cloner
//!
//! A finalized layout never changes shape. To add elements to a record, the
//! cloner replays the source record's declarations into a new
//! `StructureDefinition`, optionally splicing in the elements of a fragment
//! record, and copies the current values across.
//!
//! ## Replay
//!
//! | Source element | Replayed as |
//! |----------------|-------------|
//! | Field | `create_new_field` (same format, checks, initial value) |
//! | Group | `new_group`, children recursively |
//! | Redefining group / field | `new_group_redefine` / `FieldSpec::redefines`, keyed by the target's name |
//! | Field array | `create_new_field_array` from item 0 |
//! | Group array | `create_new_group_array`, children of item 0 |
//!
//! Children of a redefinition are replayed inside the redefining group, so
//! they keep their position relative to it.
//!
//! ## Splice
//!
//! With `with_new_content(&fragment, Some(parent))`, the fragment's root is
//! replayed as a trailing nested group of `parent`, after `parent`'s own
//! children; with `None` it is appended to the record root. Elements declared
//! before the insertion point keep their offsets; elements after it (when
//! `parent` is not the last group) move by the fragment's length.
//!
//! ## Values
//!
//! Old and new trees are walked in parallel and every non-redefinition field's
//! bytes are copied, which covers every byte of the record exactly once. The
//! fragment's fields are copied into the spliced group the same way.

use std::sync::Arc;

use tracing::debug;

use super::{ElementId, ElementKind, FieldSpec, Layout, StructureDefinition};
use crate::error::StructureError;
use crate::record::{ElementRef, Record};

pub struct StructureCloner<'a> {
    source: &'a Record,
    fragment: Option<&'a Record>,
    insertion_point: Option<ElementRef<'a>>,
}

impl<'a> StructureCloner<'a> {
    pub fn new(source: &'a Record) -> Self {
        Self {
            source,
            fragment: None,
            insertion_point: None,
        }
    }

    /// Splices `fragment` into the clone under `parent` (a group of the
    /// source record), or under the record root when `parent` is `None`.
    pub fn with_new_content(mut self, fragment: &'a Record, parent: Option<ElementRef<'a>>) -> Self {
        self.fragment = Some(fragment);
        self.insertion_point = parent;
        self
    }

    pub fn clone_record(&self) -> Result<Record, StructureError> {
        let source_layout = self.source.layout();
        let target = self.insertion_target()?;
        debug!(
            record = self.source.name(),
            splice = self.fragment.map(Record::name),
            "structure clone started"
        );

        let mut spliced = false;
        let layout = StructureDefinition::new_record(self.source.name(), |def| {
            self.replay_children(def, self.source, ElementId::ROOT, target, &mut spliced)
        })?;

        if let Some(parent) = target {
            if !spliced {
                return Err(StructureError::InvalidInsertionPoint {
                    name: source_layout.path(parent),
                    reason: "the element is not reached by the replay (array instance other than the first)",
                });
            }
        }

        let mut clone = Record::new(Arc::new(layout));
        copy_values(self.source, ElementId::ROOT, &mut clone, ElementId::ROOT);
        if let Some(fragment) = self.fragment {
            let parent = target.unwrap_or(ElementId::ROOT);
            let spliced_group = self.spliced_group(clone.layout(), parent)?;
            copy_values(fragment, ElementId::ROOT, &mut clone, spliced_group);
            debug!(
                record = clone.name(),
                fragment = fragment.name(),
                at = %clone.layout().path(spliced_group),
                "new content spliced"
            );
        }
        Ok(clone)
    }

    /// Validates the insertion point; `Some(ROOT)` when splicing at the root.
    fn insertion_target(&self) -> Result<Option<ElementId>, StructureError> {
        if self.fragment.is_none() {
            return Ok(None);
        }
        let Some(parent) = self.insertion_point else {
            return Ok(Some(ElementId::ROOT));
        };
        if !Arc::ptr_eq(parent.record().layout(), self.source.layout()) {
            return Err(StructureError::InvalidInsertionPoint {
                name: parent.path(),
                reason: "the element belongs to another record",
            });
        }
        if !parent.element().is_group() {
            return Err(StructureError::InvalidInsertionPoint {
                name: parent.path(),
                reason: "only groups can receive new content",
            });
        }
        Ok(Some(parent.id()))
    }

    fn replay_children(
        &self,
        def: &mut StructureDefinition,
        record: &Record,
        parent: ElementId,
        target: Option<ElementId>,
        spliced: &mut bool,
    ) -> Result<(), StructureError> {
        let layout = record.layout();
        for &child in layout.element(parent).children() {
            self.replay(def, record, child, target, spliced)?;
        }

        // `target` is only set while replaying the source record
        if target == Some(parent) {
            if let Some(fragment) = self.fragment {
                def.new_group(fragment.name(), |def| {
                    self.replay_children(def, fragment, ElementId::ROOT, None, &mut false)
                })?;
                *spliced = true;
            }
        }
        Ok(())
    }

    fn replay(
        &self,
        def: &mut StructureDefinition,
        record: &Record,
        id: ElementId,
        target: Option<ElementId>,
        spliced: &mut bool,
    ) -> Result<(), StructureError> {
        let layout = record.layout();
        let element = layout.element(id);
        let redefines = element
            .redefines()
            .map(|target_id| layout.element(target_id).name());

        match element.kind() {
            ElementKind::Field(field) => {
                def.create_new_field(FieldSpec::from_def(element.name(), field, redefines))?;
            }
            ElementKind::Group { .. } => {
                let build = |def: &mut StructureDefinition| {
                    self.replay_children(def, record, id, target, spliced)
                };
                match redefines {
                    Some(redefined) => def.new_group_redefine(element.name(), redefined, build)?,
                    None => def.new_group(element.name(), build)?,
                };
            }
            ElementKind::FieldArray { items, .. } => {
                let first = first_item(layout, element.name(), items)?;
                let ElementKind::Field(field) = layout.element(first).kind() else {
                    return Err(unrecognized(layout, element.name(), "field", first));
                };
                let spec = FieldSpec::from_def(element.name(), field, redefines);
                def.create_new_field_array(spec, items.len())?;
            }
            ElementKind::GroupArray { items, .. } => {
                let first = first_item(layout, element.name(), items)?;
                if !layout.element(first).is_group() {
                    return Err(unrecognized(layout, element.name(), "group", first));
                }
                def.create_new_group_array(element.name(), items.len(), |def| {
                    self.replay_children(def, record, first, target, spliced)
                })?;
            }
        }
        Ok(())
    }

    /// The group the fragment was replayed into: the last child of `parent`
    /// in the clone, or of its first instance when `parent` lies in an array.
    fn spliced_group(&self, clone: &Layout, parent: ElementId) -> Result<ElementId, StructureError> {
        let source = self.source.layout();
        let path = clone_path(source, parent);
        let mut current = ElementId::ROOT;
        for step in path {
            current = match step {
                Step::Child(index) => clone.element(current).children()[index],
                Step::FirstItem => clone.element(current).children()[0],
            };
        }
        clone
            .element(current)
            .children()
            .last()
            .copied()
            .ok_or_else(|| StructureError::InvalidInsertionPoint {
                name: source.path(parent),
                reason: "the spliced group is missing from the clone",
            })
    }
}

enum Step {
    Child(usize),
    FirstItem,
}

/// Position of `id` in the source tree as child indices from the root. Array
/// items map to the first item, which is the one the replay declares.
fn clone_path(layout: &Layout, id: ElementId) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut current = id;
    while let Some(parent) = layout.element(current).parent() {
        let parent_element = layout.element(parent);
        if parent_element.is_array() {
            steps.push(Step::FirstItem);
        } else {
            let index = parent_element
                .children()
                .iter()
                .position(|&c| c == current)
                .unwrap_or_default();
            steps.push(Step::Child(index));
        }
        current = parent;
    }
    steps.reverse();
    steps
}

fn first_item(layout: &Layout, name: &str, items: &[ElementId]) -> Result<ElementId, StructureError> {
    items.first().copied().ok_or_else(|| StructureError::EmptyArray {
        name: layout_name(layout, name),
    })
}

fn layout_name(layout: &Layout, name: &str) -> String {
    format!("{}.{}", layout.name(), name)
}

fn unrecognized(layout: &Layout, name: &str, expected: &'static str, found: ElementId) -> StructureError {
    StructureError::UnrecognizedElementType {
        name: layout_name(layout, name),
        expected,
        found: layout.element(found).kind().name(),
    }
}

/// Copies field bytes from `src` under `from` to `dst` under `to`, walking
/// both trees in parallel. Redefinitions are skipped: their bytes are copied
/// through the elements they redefine.
fn copy_values(src: &Record, from: ElementId, dst: &mut Record, to: ElementId) {
    let src_layout = Arc::clone(src.layout());
    let dst_layout = Arc::clone(dst.layout());

    let source = src_layout.element(from);
    if source.flags().redefinition {
        return;
    }
    match source.kind() {
        ElementKind::Field(_) => {
            let bytes = src.element(from).bytes();
            dst.element_mut(to).assign_bytes(&bytes);
        }
        ElementKind::Group { .. }
        | ElementKind::FieldArray { .. }
        | ElementKind::GroupArray { .. } => {
            let pairs = source
                .children()
                .iter()
                .zip(dst_layout.element(to).children().iter());
            for (&s, &d) in pairs {
                copy_values(src, s, dst, d);
            }
        }
    }
}
