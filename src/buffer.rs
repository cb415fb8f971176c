//! # Record Buffer
//!
//! `Buffer` is the contiguous byte arena a record's elements are laid over.
//! Elements never hold pointers into it; they carry `(offset, length)` and go
//! through the bounds-checked accessors below.
//!
//! ## Sharing
//!
//! A `Buffer` is a handle. `share()` returns a second handle onto the same
//! bytes, which is how a record aliases memory it does not own:
//!
//! ```text
//! Record A ──┐
//!            ├──> [ bytes ... ]   (one allocation)
//! Record B ──┘    B.share() of A, or a SET ADDRESS OF re-point
//! ```
//!
//! `snapshot()` copies the bytes out; `Record::duplicate` builds on it to make
//! an independent record.
//!
//! ## Bounds
//!
//! Every access asserts `offset + count <= len`. A violation is a broken
//! precondition of the caller (a layout that does not fit its buffer) and
//! panics; it is never reported as an error value.
//!
//! ## Thread Safety
//!
//! Handles are `!Send`. One record instance is owned and mutated by one
//! control flow at a time.
//!
//! ## Usage
//!
//! ```ignore
//! let buffer = Buffer::new(8);
//! buffer.write(2, b"AB");
//! assert_eq!(buffer.read(2, 2), b"AB");
//!
//! let alias = buffer.share();
//! alias.fill(0, 2, b'*');
//! assert_eq!(buffer.read(0, 4), b"**AB");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::LOW_VALUE;

/// Shared, fixed-length byte arena.
pub struct Buffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl Buffer {
    /// Creates a buffer of `len` bytes, all LOW-VALUES.
    pub fn new(len: usize) -> Self {
        Self::from_bytes(vec![LOW_VALUE; len])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Rc::new(RefCell::new(bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn check_range(&self, offset: usize, count: usize, len: usize) {
        assert!(
            offset.checked_add(count).is_some_and(|end| end <= len),
            "buffer access [{}, {}+{}) out of bounds for length {}",
            offset,
            offset,
            count,
            len
        );
    }

    /// Copies `count` bytes starting at `offset`.
    pub fn read(&self, offset: usize, count: usize) -> Vec<u8> {
        self.with_range(offset, count, |bytes| bytes.to_vec())
    }

    /// Copies `out.len()` bytes starting at `offset` into `out`.
    pub fn read_into(&self, offset: usize, out: &mut [u8]) {
        self.with_range(offset, out.len(), |bytes| out.copy_from_slice(bytes));
    }

    /// Runs `f` over a borrowed byte range without copying.
    ///
    /// `f` must not write to this buffer (or any handle sharing it).
    pub fn with_range<R>(&self, offset: usize, count: usize, f: impl FnOnce(&[u8]) -> R) -> R {
        let bytes = self.bytes.borrow();
        self.check_range(offset, count, bytes.len());
        f(&bytes[offset..offset + count])
    }

    pub fn write(&self, offset: usize, data: &[u8]) {
        self.update(offset, data.len(), |bytes| bytes.copy_from_slice(data));
    }

    pub fn fill(&self, offset: usize, count: usize, byte: u8) {
        self.update(offset, count, |bytes| bytes.fill(byte));
    }

    /// Runs `f` over a mutable byte range.
    ///
    /// `f` must not touch this buffer (or any handle sharing it).
    pub fn update<R>(&self, offset: usize, count: usize, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut bytes = self.bytes.borrow_mut();
        let len = bytes.len();
        self.check_range(offset, count, len);
        f(&mut bytes[offset..offset + count])
    }

    /// Returns another handle onto the same bytes.
    pub fn share(&self) -> Buffer {
        Buffer {
            bytes: Rc::clone(&self.bytes),
        }
    }

    pub fn is_shared_with(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Copies the whole buffer out.
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    /// Identity of the underlying allocation; equal for shared handles.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.bytes) as *const () as usize
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("len", &self.len())
            .finish()
    }
}
