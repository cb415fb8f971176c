//! # Layout and Codec Configuration
//!
//! This module centralizes configuration for the crate: the numeric limits in
//! [`constants`] and the runtime-selectable numeric validation mode.
//!
//! ## Numeric Validation Modes
//!
//! Whether a field "is numeric" depends on the rules in force. Two rule sets
//! exist and both are kept; callers pick one explicitly per check instead of
//! relying on a process-wide directive:
//!
//! | Mode | Behaviour |
//! |------|-----------|
//! | `StrictMove` | Bytes must be exactly what a COBOL MOVE would have written |
//! | `Relaxed` | Spaces read as zeros, signs may sit anywhere, any packed sign nibble |
//!
//! The same bytes can be numeric under `Relaxed` and not under `StrictMove`,
//! e.g. the zoned text `"  12"` or a packed field ending in sign nibble `0xA`.
//!
//! ## Module Organization
//!
//! - [`constants`]: digit limits, fill bytes, sign nibbles, pointer width

pub mod constants;
pub use constants::*;

/// Rule set used by [`crate::codec::is_numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumericValidation {
    /// Accept only the exact images a COBOL MOVE produces.
    #[default]
    StrictMove,
    /// Accept blank-filled digits, floating signs and any packed sign nibble.
    Relaxed,
}

