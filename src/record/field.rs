//! # Typed Field Access
//!
//! `FieldRef` decodes a field's live bytes on every call; `FieldMut` encodes
//! values into them. Nothing is cached, so a field always reflects writes made
//! through redefinitions, shared records or buffer references.
//!
//! ## Strict and Tolerant Accessors
//!
//! | Accessor | Returns | On conversion error |
//! |----------|---------|---------------------|
//! | `value` | `Result<FieldValue>` | error |
//! | `decoded_value::<T>` | `Result<T>` | error |
//! | `try_as_int` | `Result<i32>` | error (also on overflow) |
//! | `as_decimal` / `as_f64` | `Result<_>` | error |
//! | `as_int` | `i32` | 0 (also on overflow) |
//! | `as_safe_int` | `i64` | 0; overflow saturates |
//! | `as_decimal_or_default` | `Decimal` | 0 |
//! | `as_bool` | `bool` | false |
//!
//! The tolerant accessors exist for MOVE-style code that treats unreadable
//! numbers as zero; they log the swallowed error at trace level.

use tracing::trace;

use super::{ElementRef, Record, RecordKey, RegistryContext};
use crate::codec;
use crate::config::{NumericValidation, NULL_RECORD_KEY};
use crate::error::FieldValueError;
use crate::layout::{CheckField, ElementId, FieldDef};
use crate::types::{Decimal, FieldFormat, FieldType, FieldValue, FromFieldValue};

/// Read access to one field of a record.
#[derive(Clone, Copy)]
pub struct FieldRef<'r> {
    element: ElementRef<'r>,
    def: &'r FieldDef,
}

impl<'r> FieldRef<'r> {
    pub(crate) fn new(element: ElementRef<'r>, def: &'r FieldDef) -> Self {
        Self { element, def }
    }

    pub fn element(&self) -> ElementRef<'r> {
        self.element
    }

    pub fn name(&self) -> &'r str {
        self.element.name()
    }

    pub fn format(&self) -> &'r FieldFormat {
        self.def.format()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.element.bytes()
    }

    fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let (buffer, offset) = self.element.record().location(self.element.id());
        buffer.with_range(offset, self.element.len(), f)
    }

    pub fn value(&self) -> Result<FieldValue, FieldValueError> {
        let format = self.def.format();
        self.with_bytes(|bytes| codec::decode(bytes, format))
    }

    pub fn decoded_value<T: FromFieldValue>(&self) -> Result<T, FieldValueError> {
        T::from_field_value(self.value()?)
    }

    pub fn try_as_int(&self) -> Result<i32, FieldValueError> {
        self.decoded_value::<i32>()
    }

    /// Integer value; 0 when the field cannot be read as an `i32`.
    pub fn as_int(&self) -> i32 {
        self.try_as_int().unwrap_or_else(|error| self.swallowed(error))
    }

    /// Integer value, saturating at the `i64` bounds; 0 when the field is not
    /// numeric.
    pub fn as_safe_int(&self) -> i64 {
        let wide = self.value().and_then(|value| match value {
            FieldValue::Int(i) => Ok(i),
            FieldValue::Float(f) if f.is_finite() => Ok(f as i64),
            other => other
                .to_decimal()
                .map(|d| d.trunc().clamp(i64::MIN as i128, i64::MAX as i128) as i64),
        });
        wide.unwrap_or_else(|error| self.swallowed(error))
    }

    pub fn as_decimal(&self) -> Result<Decimal, FieldValueError> {
        self.value()?.to_decimal()
    }

    pub fn as_decimal_or_default(&self) -> Decimal {
        self.as_decimal().unwrap_or_else(|error| self.swallowed(error))
    }

    pub fn as_f64(&self) -> Result<f64, FieldValueError> {
        self.value()?.to_f64()
    }

    /// The raw bytes as Latin-1 text, whatever the field's type.
    pub fn as_text(&self) -> String {
        self.with_bytes(|bytes| bytes.iter().map(|&b| b as char).collect())
    }

    /// The decoded value as text; the raw text if it does not decode.
    pub fn display_string(&self) -> String {
        self.value()
            .map(|value| value.display_string())
            .unwrap_or_else(|_| self.as_text())
    }

    /// True when the field's value equals 1.
    pub fn as_bool(&self) -> bool {
        self.value().map(|value| value.as_flag()).unwrap_or(false)
    }

    pub fn is_numeric_value(&self, mode: NumericValidation) -> bool {
        let format = self.def.format();
        self.with_bytes(|bytes| codec::is_numeric(bytes, format, mode))
    }

    pub fn is_low_values(&self) -> bool {
        self.with_bytes(codec::is_low_values)
    }

    pub fn is_high_values(&self) -> bool {
        self.with_bytes(codec::is_high_values)
    }

    pub fn checks(&self) -> &'r [CheckField] {
        self.def.checks()
    }

    /// Evaluates the attached check named `name`.
    pub fn check(&self, name: &str) -> Option<bool> {
        self.def
            .checks()
            .iter()
            .find(|check| check.name() == name)
            .map(|check| check.evaluate(self))
    }

    /// Follows a pointer field to the record it addresses.
    pub fn resolve_pointer(&self, ctx: &RegistryContext) -> Result<Record, FieldValueError> {
        let field_type = self.def.format().field_type();
        if field_type != FieldType::ReferencePointer {
            return Err(FieldValueError::Incompatible {
                from: field_type.name(),
                to: "record pointer",
            });
        }
        let key = self.value()?.to_i64()?;
        let key = u32::try_from(key).unwrap_or(NULL_RECORD_KEY);
        ctx.resolve(key)
    }

    fn swallowed<T: Default>(&self, error: FieldValueError) -> T {
        trace!(field = self.name(), %error, "conversion error replaced by default");
        T::default()
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("path", &self.element.path())
            .field("type", &self.def.format().field_type())
            .field("bytes", &self.bytes())
            .finish()
    }
}

/// Write access to one field of a record.
pub struct FieldMut<'r> {
    record: &'r mut Record,
    id: ElementId,
}

impl<'r> FieldMut<'r> {
    pub(crate) fn new(record: &'r mut Record, id: ElementId) -> Self {
        Self { record, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    fn format(&self) -> FieldFormat {
        match self.record.layout().element(self.id).field_def() {
            Some(def) => *def.format(),
            None => unreachable!("FieldMut is only created for fields"),
        }
    }

    pub fn view(&self) -> FieldRef<'_> {
        let element = ElementRef::new(self.record, self.id);
        match element.as_field() {
            Some(field) => field,
            None => unreachable!("FieldMut is only created for fields"),
        }
    }

    /// Assigns with MOVE semantics. On error the field is left unchanged.
    pub fn assign(&mut self, value: impl Into<FieldValue>) -> Result<(), FieldValueError> {
        let value = value.into();
        let format = self.format();
        let len = self.record.layout().element(self.id).len();
        let (buffer, offset) = self.record.location(self.id);
        buffer.update(offset, len, |bytes| codec::encode(&value, &format, bytes))
    }

    /// Raw byte MOVE: short input is padded with spaces, long input truncated.
    pub fn assign_bytes(&mut self, bytes: &[u8]) {
        self.record.write_padded(self.id, bytes);
    }

    pub fn reset_to_initial_value(&mut self) {
        self.record.reset_element(self.id);
    }

    /// Stores `target`'s record key in this pointer field
    /// (`SET ptr TO ADDRESS OF target`).
    pub fn set_address_of(
        &mut self,
        ctx: &mut RegistryContext,
        target: &Record,
    ) -> Result<RecordKey, FieldValueError> {
        let field_type = self.format().field_type();
        if field_type != FieldType::ReferencePointer {
            return Err(FieldValueError::Incompatible {
                from: "record pointer",
                to: field_type.name(),
            });
        }
        let key = ctx.address_of(target);
        self.assign(FieldValue::Int(key.get() as i64))?;
        Ok(key)
    }

    /// Stores the null key.
    pub fn set_null(&mut self) -> Result<(), FieldValueError> {
        self.assign(FieldValue::Int(NULL_RECORD_KEY as i64))
    }
}
