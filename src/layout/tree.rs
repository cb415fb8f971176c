//! Finalized record layout.
//!
//! A `Layout` is the frozen result of a `StructureDefinition`: the element
//! arena in declaration (preorder) order, a name index over it, and the
//! declaration-time byte image. Nothing in it changes after construction;
//! records share it through an `Arc`.

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::debug;

use super::{Element, ElementId, ElementKind};
use crate::codec;
use crate::config::SPACE;
use crate::error::StructureError;

pub struct Layout {
    elements: Vec<Element>,
    names: HashMap<String, SmallVec<[ElementId; 2]>>,
    initial_image: Vec<u8>,
}

impl Layout {
    /// Freezes an element arena. `elements[0]` is the record root.
    pub(crate) fn build(elements: Vec<Element>) -> Result<Self, StructureError> {
        let capacity = elements.first().map(Element::len).unwrap_or(0);

        for element in &elements {
            if element.end() > capacity {
                return Err(StructureError::RedefinitionOverflow {
                    name: element.name.clone(),
                    end: element.end(),
                    capacity,
                });
            }
        }

        let mut names: HashMap<String, SmallVec<[ElementId; 2]>> = HashMap::new();
        for (index, element) in elements.iter().enumerate().skip(1) {
            if !element.flags.filler {
                names
                    .entry(element.name.clone())
                    .or_default()
                    .push(ElementId::from_index(index));
            }
        }

        let mut initial_image = vec![SPACE; capacity];
        for element in &elements {
            if element.flags.is_alias() {
                continue;
            }
            if let ElementKind::Field(def) = &element.kind {
                let out = &mut initial_image[element.offset..element.end()];
                codec::write_default(&def.format, out);
                if let Some(value) = &def.initial {
                    codec::encode(value, &def.format, out).map_err(|source| {
                        StructureError::InvalidInitialValue {
                            name: element.name.clone(),
                            source,
                        }
                    })?;
                }
            }
        }

        let layout = Self {
            elements,
            names,
            initial_image,
        };
        debug!(
            record = layout.name(),
            length = layout.len(),
            elements = layout.element_count(),
            "record layout finalized"
        );
        Ok(layout)
    }

    pub fn name(&self) -> &str {
        self.root().name()
    }

    /// Record length in bytes.
    pub fn len(&self) -> usize {
        self.root().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn root(&self) -> &Element {
        &self.elements[0]
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this layout.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// All elements in declaration order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId::from_index(i), e))
    }

    /// First element with `name` in declaration order, at any depth.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).and_then(|ids| ids.first().copied())
    }

    /// Every element with `name`, in declaration order.
    pub fn find_all(&self, name: &str) -> &[ElementId] {
        self.names.get(name).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Direct child of `parent` named `name`.
    pub fn child(&self, parent: ElementId, name: &str) -> Option<ElementId> {
        self.element(parent)
            .children()
            .iter()
            .copied()
            .find(|&id| self.element(id).name == name && !self.element(id).flags.filler)
    }

    /// True if `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.element(cur).parent;
        }
        false
    }

    /// Dotted path from the root, e.g. `CUSTOMER.PHONES[1].AREA`. Array
    /// items stand in for their array.
    pub fn path(&self, id: ElementId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            parts.push(self.element(cur).name.as_str());
            current = self.element(cur).parent;
            if let Some(parent) = current {
                if self.element(parent).is_array() {
                    current = self.element(parent).parent;
                }
            }
        }
        parts.reverse();
        parts.join(".")
    }

    /// Declaration-time bytes of the whole record.
    pub fn initial_image(&self) -> &[u8] {
        &self.initial_image
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("name", &self.name())
            .field("len", &self.len())
            .field("elements", &self.elements.len())
            .finish()
    }
}
