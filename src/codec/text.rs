//! Latin-1 text fields.
//!
//! Bytes map one-to-one onto chars U+0000..=U+00FF, so any byte content
//! decodes and re-encodes unchanged. Characters above U+00FF encode as `?`.

use crate::config::{NumericValidation, SPACE};
use crate::types::{Decimal, FieldValue, Justification};

const UNMAPPABLE: u8 = b'?';

pub(super) fn decode(bytes: &[u8]) -> FieldValue {
    FieldValue::Text(bytes.iter().map(|&b| b as char).collect())
}

/// Left justification pads and truncates on the right, right justification on
/// the left.
pub(super) fn encode(text: &str, justification: Justification, out: &mut [u8]) {
    let encoded: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(UNMAPPABLE))
        .collect();

    out.fill(SPACE);
    let width = out.len();
    match justification {
        Justification::Left => {
            let n = encoded.len().min(width);
            out[..n].copy_from_slice(&encoded[..n]);
        }
        Justification::Right => {
            if encoded.len() >= width {
                out.copy_from_slice(&encoded[encoded.len() - width..]);
            } else {
                out[width - encoded.len()..].copy_from_slice(&encoded);
            }
        }
    }
}

pub(super) fn write_default(out: &mut [u8]) {
    out.fill(SPACE);
}

pub(super) fn is_numeric(bytes: &[u8], mode: NumericValidation) -> bool {
    match mode {
        NumericValidation::StrictMove => !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit),
        NumericValidation::Relaxed => std::str::from_utf8(bytes)
            .ok()
            .and_then(Decimal::parse)
            .is_some(),
    }
}
