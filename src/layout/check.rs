//! # Check Fields
//!
//! A `CheckField` is a named condition attached to a field (a COBOL level-88
//! entry). The predicate runs against the field's live bytes every time it is
//! evaluated; nothing is cached.
//!
//! | Constructor | Holds when |
//! |-------------|------------|
//! | `new` | the custom predicate returns true |
//! | `between` | `low <= value <= high` |
//! | `exclusive_between` | `low < value < high` |
//! | `one_of` | the value equals one of the listed values |
//! | `char_range` | every character of the field lies in `low..=high` |
//!
//! Numeric checks are false when the field does not decode to a number.

use std::fmt;
use std::sync::Arc;

use crate::record::FieldRef;
use crate::types::{Decimal, FieldValue};

type Predicate = dyn Fn(&FieldRef<'_>) -> bool + Send + Sync;

#[derive(Clone)]
pub struct CheckField {
    name: String,
    predicate: Arc<Predicate>,
}

impl CheckField {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&FieldRef<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn between(name: impl Into<String>, low: impl Into<Decimal>, high: impl Into<Decimal>) -> Self {
        let (low, high) = (low.into(), high.into());
        Self::new(name, move |field| {
            field
                .as_decimal()
                .map(|v| low <= v && v <= high)
                .unwrap_or(false)
        })
    }

    pub fn exclusive_between(
        name: impl Into<String>,
        low: impl Into<Decimal>,
        high: impl Into<Decimal>,
    ) -> Self {
        let (low, high) = (low.into(), high.into());
        Self::new(name, move |field| {
            field
                .as_decimal()
                .map(|v| low < v && v < high)
                .unwrap_or(false)
        })
    }

    /// Numeric fields compare by value, text fields by text with trailing
    /// spaces ignored.
    pub fn one_of<V: Into<FieldValue>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        Self::new(name, move |field| {
            if field.format().field_type().is_numeric() {
                let Ok(current) = field.as_decimal() else {
                    return false;
                };
                values
                    .iter()
                    .any(|v| v.to_decimal().map(|d| d == current).unwrap_or(false))
            } else {
                let current = field.as_text();
                let current = current.trim_end_matches(' ');
                values
                    .iter()
                    .any(|v| v.display_string().trim_end_matches(' ') == current)
            }
        })
    }

    pub fn char_range(name: impl Into<String>, low: char, high: char) -> Self {
        Self::new(name, move |field| {
            field.as_text().chars().all(|c| (low..=high).contains(&c))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, field: &FieldRef<'_>) -> bool {
        (self.predicate)(field)
    }
}

impl fmt::Debug for CheckField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckField")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
