//! Single (4-byte) and double (8-byte) big-endian IEEE-754.

use crate::error::FieldValueError;
use crate::types::FieldValue;

fn read(bytes: &[u8]) -> Option<f64> {
    match bytes.len() {
        4 => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            Some(f32::from_be_bytes(raw) as f64)
        }
        8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            Some(f64::from_be_bytes(raw))
        }
        _ => None,
    }
}

pub(super) fn encode(value: f64, out: &mut [u8]) {
    match out.len() {
        4 => out.copy_from_slice(&(value as f32).to_be_bytes()),
        8 => out.copy_from_slice(&value.to_be_bytes()),
        len => panic!("float fields are 4 or 8 bytes, got {}", len),
    }
}

pub(super) fn decode(bytes: &[u8]) -> Result<FieldValue, FieldValueError> {
    read(bytes)
        .map(FieldValue::Float)
        .ok_or(FieldValueError::Incompatible {
            from: "odd-sized bytes",
            to: "float",
        })
}

pub(super) fn is_numeric(bytes: &[u8]) -> bool {
    read(bytes).is_some_and(f64::is_finite)
}
