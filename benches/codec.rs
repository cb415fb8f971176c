//! Codec benchmarks for copybook
//!
//! These benchmarks measure encode, decode and validity checks for each field
//! encoding, which every record access goes through.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box as hint_black_box;

use copybook::codec;
use copybook::{Decimal, FieldFormat, FieldType, FieldValue, NumericValidation};

fn formats() -> Vec<(&'static str, FieldFormat)> {
    vec![
        ("zoned_9", FieldFormat::new(FieldType::ZonedSigned, 9).with_scale(2)),
        ("packed_9", FieldFormat::new(FieldType::PackedSigned, 9).with_scale(2)),
        ("packed_31", FieldFormat::new(FieldType::PackedSigned, 31).with_scale(2)),
        ("binary_int", FieldFormat::new(FieldType::BinaryInt, 9)),
        ("binary_long", FieldFormat::new(FieldType::BinaryLong, 18).with_scale(2)),
        ("double", FieldFormat::new(FieldType::Double, 0)),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let value = FieldValue::Decimal(Decimal::new(-123_456_789, 2));

    for (name, format) in formats() {
        let mut out = vec![0u8; format.byte_length()];
        group.bench_with_input(BenchmarkId::from_parameter(name), &format, |b, format| {
            b.iter(|| {
                let result = codec::encode(black_box(&value), format, &mut out);
                hint_black_box(result)
            });
        });
    }

    group.bench_function("text_20", |b| {
        let format = FieldFormat::new(FieldType::Text, 20);
        let value = FieldValue::Text("CUSTOMER NAME".to_string());
        let mut out = vec![0u8; 20];
        b.iter(|| hint_black_box(codec::encode(black_box(&value), &format, &mut out)));
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let value = FieldValue::Decimal(Decimal::new(-123_456_789, 2));

    for (name, format) in formats() {
        let mut bytes = vec![0u8; format.byte_length()];
        if codec::encode(&value, &format, &mut bytes).is_err() {
            continue;
        }
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| hint_black_box(codec::decode(black_box(bytes), &format)));
        });
    }

    group.finish();
}

fn bench_is_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_numeric");
    let zoned = FieldFormat::new(FieldType::ZonedUnsigned, 12);
    let packed = FieldFormat::new(FieldType::PackedSigned, 15);
    let packed_bytes = [0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x5C];

    for mode in [NumericValidation::StrictMove, NumericValidation::Relaxed] {
        let label = format!("{:?}", mode);
        group.bench_with_input(BenchmarkId::new("zoned_12", &label), &mode, |b, &mode| {
            b.iter(|| hint_black_box(codec::is_numeric(black_box(b"000012345678"), &zoned, mode)));
        });
        group.bench_with_input(BenchmarkId::new("packed_15", &label), &mode, |b, &mode| {
            b.iter(|| hint_black_box(codec::is_numeric(black_box(&packed_bytes), &packed, mode)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_is_numeric);
criterion_main!(benches);
