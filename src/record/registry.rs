//! # Record Registry
//!
//! Pointer fields (`USAGE POINTER`) hold a 4-byte key instead of a machine
//! address. `RegistryContext` maps keys to the records they stand for.
//!
//! ## Keys
//!
//! - Keys are assigned on first `address_of` and start at 1; 0 is the null
//!   pointer.
//! - A record's identity is (buffer, offset, layout): `share()`d handles of a
//!   record get the same key, `duplicate()`s get a new one.
//! - The context holds a handle on each registered buffer, so a key stays
//!   resolvable until it is released.
//!
//! There is no process-wide registry; callers create a context and pass it to
//! `set_address_of` / `resolve_pointer`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut ctx = RegistryContext::new();
//! holder.field_mut("PTR")?.set_address_of(&mut ctx, &customer)?;
//!
//! let mut target = holder.field("PTR")?.resolve_pointer(&ctx)?;
//! target.assign("ID", 7)?;               // writes into customer's buffer
//! ```

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use super::Record;
use crate::buffer::Buffer;
use crate::config::NULL_RECORD_KEY;
use crate::error::FieldValueError;
use crate::layout::{ElementId, Layout};

/// Key stored in a pointer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(u32);

impl RecordKey {
    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Identity {
    buffer: usize,
    base: usize,
    layout: usize,
}

struct Entry {
    layout: Arc<Layout>,
    buffer: Buffer,
    base: usize,
}

pub struct RegistryContext {
    next_key: u32,
    entries: HashMap<u32, Entry>,
    keys: HashMap<Identity, u32>,
}

impl Default for RegistryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryContext {
    pub fn new() -> Self {
        Self {
            next_key: NULL_RECORD_KEY + 1,
            entries: HashMap::new(),
            keys: HashMap::new(),
        }
    }

    fn identity(record: &Record) -> Identity {
        let (buffer, base) = record.location(ElementId::ROOT);
        Identity {
            buffer: buffer.id(),
            base,
            layout: Arc::as_ptr(record.layout()) as usize,
        }
    }

    /// Returns the record's key, assigning one on first use.
    pub fn address_of(&mut self, record: &Record) -> RecordKey {
        let identity = Self::identity(record);
        if let Some(&key) = self.keys.get(&identity) {
            return RecordKey(key);
        }

        let key = self.next_key;
        self.next_key = key
            .checked_add(1)
            .unwrap_or_else(|| panic!("record key space exhausted"));
        let (buffer, base) = record.location(ElementId::ROOT);
        self.entries.insert(
            key,
            Entry {
                layout: Arc::clone(record.layout()),
                buffer: buffer.share(),
                base,
            },
        );
        self.keys.insert(identity, key);
        debug!(record = record.name(), key, "record key assigned");
        RecordKey(key)
    }

    /// The record's key if it has been assigned one.
    pub fn key_of(&self, record: &Record) -> Option<RecordKey> {
        self.keys.get(&Self::identity(record)).map(|&key| RecordKey(key))
    }

    /// A record aliasing the one registered under `key`.
    pub fn resolve(&self, key: u32) -> Result<Record, FieldValueError> {
        if key == NULL_RECORD_KEY {
            return Err(FieldValueError::NullPointer);
        }
        let entry = self
            .entries
            .get(&key)
            .ok_or(FieldValueError::DanglingPointer { key })?;
        Ok(Record::over(Arc::clone(&entry.layout), &entry.buffer, entry.base))
    }

    /// Forgets a key. Pointer fields still holding it become dangling.
    pub fn release(&mut self, key: RecordKey) -> bool {
        match self.entries.remove(&key.0) {
            Some(_) => {
                self.keys.retain(|_, &mut k| k != key.0);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
