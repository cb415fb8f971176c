//! # Record Layout Constants
//!
//! This module centralizes the numeric limits and fill bytes used by the
//! layout builder and the field codec. Constants that depend on each other are
//! co-located and guarded by compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! MAX_DECIMAL_DIGITS (31)
//!       │
//!       ├─> zoned and packed fields: 1..=31 digits
//!       │     31 digits fit an i128 accumulator with room to rescale
//!       │
//!       └─> MAX_PACKED_BYTES (derived: 31 / 2 + 1 = 16)
//!
//! MAX_BINARY_DIGITS (18)
//!       │
//!       ├─> BINARY_SHORT_DIGITS (4)  -> 2 bytes
//!       ├─> BINARY_INT_DIGITS (9)    -> 4 bytes
//!       └─> BINARY_LONG_DIGITS (18)  -> 8 bytes
//!             a digit count above 18 has no binary width
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `MAX_DECIMAL_DIGITS <= 38` (i128 holds 38 decimal digits)
//! 2. `BINARY_LONG_DIGITS == MAX_BINARY_DIGITS` (widest width covers the limit)
//! 3. `10^BINARY_*_DIGITS - 1` fits the signed integer of that width

// ============================================================================
// DECIMAL DIGIT LIMITS
// ============================================================================

/// Largest digit count accepted for zoned and packed decimal fields.
pub const MAX_DECIMAL_DIGITS: usize = 31;

/// Largest byte length of a packed decimal field.
pub const MAX_PACKED_BYTES: usize = MAX_DECIMAL_DIGITS / 2 + 1;

/// Largest digit count a binary (COMP) field may declare.
pub const MAX_BINARY_DIGITS: usize = 18;

/// Digit limit of a 2-byte binary field.
pub const BINARY_SHORT_DIGITS: usize = 4;

/// Digit limit of a 4-byte binary field.
pub const BINARY_INT_DIGITS: usize = 9;

/// Digit limit of an 8-byte binary field.
pub const BINARY_LONG_DIGITS: usize = 18;

const _: () = assert!(
    MAX_DECIMAL_DIGITS <= 38,
    "MAX_DECIMAL_DIGITS must fit the i128 decimal accumulator"
);

const _: () = assert!(
    BINARY_LONG_DIGITS == MAX_BINARY_DIGITS,
    "the widest binary width must cover MAX_BINARY_DIGITS"
);

const _: () = assert!(10i64.pow(BINARY_SHORT_DIGITS as u32) - 1 <= i16::MAX as i64);
const _: () = assert!(10i64.pow(BINARY_INT_DIGITS as u32) - 1 <= i32::MAX as i64);
const _: () = assert!((10i128.pow(BINARY_LONG_DIGITS as u32) - 1) <= i64::MAX as i128);

// ============================================================================
// FILL BYTES AND SIGNS
// ============================================================================

/// Fill byte for text fields and FILLER.
pub const SPACE: u8 = b' ';

/// LOW-VALUES fill byte.
pub const LOW_VALUE: u8 = 0x00;

/// HIGH-VALUES fill byte.
pub const HIGH_VALUE: u8 = 0xFF;

/// Packed decimal sign nibble written for non-negative signed values.
pub const PACKED_SIGN_POSITIVE: u8 = 0x0C;

/// Packed decimal sign nibble written for negative signed values.
pub const PACKED_SIGN_NEGATIVE: u8 = 0x0D;

/// Packed decimal sign nibble written for unsigned fields.
pub const PACKED_SIGN_UNSIGNED: u8 = 0x0F;

/// Alternate negative sign nibble accepted when decoding.
pub const PACKED_SIGN_NEGATIVE_ALT: u8 = 0x0B;

/// Width of the separate trailing sign of a signed zoned field.
pub const ZONED_SIGN_SIZE: usize = 1;

// ============================================================================
// POINTERS
// ============================================================================

/// Byte width of a `ReferencePointer` field.
pub const POINTER_SIZE: usize = 4;

/// Key stored in a pointer field that references nothing.
pub const NULL_RECORD_KEY: u32 = 0;

// ============================================================================
// NAMING
// ============================================================================

/// Name given to FILLER elements.
pub const FILLER_NAME: &str = "FILLER";
