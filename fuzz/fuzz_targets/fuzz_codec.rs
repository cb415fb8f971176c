//! Fuzz testing for the field codec.
//!
//! Feeds arbitrary bytes to every decoder and validity check, then re-encodes
//! whatever decoded. Nothing may panic, and text fields must give back the
//! bytes they were read from.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use copybook::codec;
use copybook::{FieldFormat, FieldType, FieldValue, Justification, NumericValidation};

#[derive(Debug, Arbitrary)]
struct CodecInput {
    field_type: FuzzFieldType,
    digits: u8,
    scale: u8,
    right_justified: bool,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzFieldType {
    Text,
    ZonedUnsigned,
    ZonedSigned,
    PackedUnsigned,
    PackedSigned,
    BinaryShort,
    BinaryInt,
    BinaryLong,
    Float,
    Double,
    ReferencePointer,
}

impl From<FuzzFieldType> for FieldType {
    fn from(t: FuzzFieldType) -> Self {
        match t {
            FuzzFieldType::Text => FieldType::Text,
            FuzzFieldType::ZonedUnsigned => FieldType::ZonedUnsigned,
            FuzzFieldType::ZonedSigned => FieldType::ZonedSigned,
            FuzzFieldType::PackedUnsigned => FieldType::PackedUnsigned,
            FuzzFieldType::PackedSigned => FieldType::PackedSigned,
            FuzzFieldType::BinaryShort => FieldType::BinaryShort,
            FuzzFieldType::BinaryInt => FieldType::BinaryInt,
            FuzzFieldType::BinaryLong => FieldType::BinaryLong,
            FuzzFieldType::Float => FieldType::Float,
            FuzzFieldType::Double => FieldType::Double,
            FuzzFieldType::ReferencePointer => FieldType::ReferencePointer,
        }
    }
}

fuzz_target!(|input: CodecInput| {
    let justification = if input.right_justified {
        Justification::Right
    } else {
        Justification::Left
    };
    let format = FieldFormat::new(input.field_type.into(), input.digits as usize % 40)
        .with_scale(input.scale % 20)
        .with_justification(justification);
    if format.validate("FUZZ").is_err() {
        return;
    }

    let mut bytes = input.data;
    bytes.resize(format.byte_length(), b' ');

    let _ = codec::is_numeric(&bytes, &format, NumericValidation::StrictMove);
    let _ = codec::is_numeric(&bytes, &format, NumericValidation::Relaxed);
    let _ = codec::is_low_values(&bytes);
    let _ = codec::is_high_values(&bytes);

    let Ok(value) = codec::decode(&bytes, &format) else {
        return;
    };

    let mut out = vec![0u8; bytes.len()];
    let encoded = codec::encode(&value, &format, &mut out);

    if format.field_type() == FieldType::Text {
        assert!(encoded.is_ok());
        if let FieldValue::Text(_) = value {
            if justification == Justification::Left {
                assert_eq!(out, bytes, "text bytes must survive decode and encode");
            }
        }
    }
});
