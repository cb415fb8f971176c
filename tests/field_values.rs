//! # Field Value Tests
//!
//! Field encodings seen through whole records: the zoned/packed overlay, the
//! LOW-VALUES / HIGH-VALUES sentinels, check fields, buffer references and
//! pointer fields resolved through a `RegistryContext`.
//!
//! ## Usage
//!
//! ```sh
//! cargo test --test field_values
//! ```

use copybook::{
    CheckField, Decimal, FieldSpec, FieldValue, FieldValueError, NumericValidation, Record,
    RegistryContext,
};

// ============================================================================
// ZONED / PACKED OVERLAY
// ============================================================================

fn overlay() -> eyre::Result<Record> {
    let record = Record::define("OVERLAY", |def| {
        def.create_new_field(FieldSpec::zoned("A", 5).scale(2))?;
        def.create_new_field(FieldSpec::signed_packed("B", 9).redefines("A"))?;
        Ok(())
    })?;
    Ok(record)
}

#[test]
fn packed_view_decodes_the_zoned_bytes() -> eyre::Result<()> {
    let mut record = overlay()?;
    assert_eq!(record.len(), 5);

    record.assign("A", Decimal::new(12345, 2))?;
    assert_eq!(record.value("A")?, FieldValue::Decimal(Decimal::new(12345, 2)));
    assert_eq!(record.field("A")?.display_string(), "123.45");

    let b = record.field("B")?;
    assert_eq!(b.bytes(), b"12345");
    assert_eq!(b.value()?, FieldValue::Decimal(Decimal::new(313_233_343, 0)));
    assert!(!b.is_numeric_value(NumericValidation::StrictMove));
    assert!(!b.is_numeric_value(NumericValidation::Relaxed));
    Ok(())
}

#[test]
fn zoned_view_sees_packed_writes() -> eyre::Result<()> {
    let mut record = overlay()?;

    record.assign("B", -1_234_567)?;
    assert_eq!(record.field("A")?.bytes(), vec![0x00, 0x12, 0x34, 0x56, 0x7D]);
    assert!(matches!(
        record.value("A"),
        Err(FieldValueError::NotNumeric { .. })
    ));
    assert_eq!(record.field("A")?.as_int(), 0);
    assert_eq!(record.field("B")?.as_safe_int(), -1_234_567);
    Ok(())
}

#[test]
fn move_truncates_to_the_declared_picture() -> eyre::Result<()> {
    let mut record = overlay()?;

    record.assign("A", Decimal::new(9_876_543, 3))?;
    assert_eq!(record.field("A")?.bytes(), b"87654");

    record.assign("A", -12)?;
    assert_eq!(record.field("A")?.bytes(), b"01200");

    record.assign("A", 1e40)?;
    assert_eq!(record.field("A")?.bytes(), b"75200");
    Ok(())
}

// ============================================================================
// SENTINELS
// ============================================================================

#[test]
fn packed_sentinels_are_not_zero() -> eyre::Result<()> {
    let mut record = Record::define("R", |def| {
        def.create_new_field(FieldSpec::signed_packed("AMT", 7).scale(2))?;
        def.create_new_field(FieldSpec::packed("CNT", 3))?;
        Ok(())
    })?;

    record.assign("AMT", FieldValue::LowValues)?;
    record.assign("CNT", FieldValue::HighValues)?;

    let amt = record.field("AMT")?;
    assert!(amt.is_low_values());
    assert!(!amt.is_high_values());
    assert_eq!(amt.value()?, FieldValue::LowValues);
    assert_eq!(amt.as_decimal(), Err(FieldValueError::LowValues));
    assert!(!amt.is_numeric_value(NumericValidation::Relaxed));

    let cnt = record.field("CNT")?;
    assert!(cnt.is_high_values());
    assert_eq!(cnt.value()?, FieldValue::HighValues);
    assert_eq!(cnt.as_int(), 0);

    record.assign("AMT", 0)?;
    let amt = record.field("AMT")?;
    assert!(!amt.is_low_values());
    assert_eq!(amt.value()?, FieldValue::Decimal(Decimal::new(0, 2)));
    Ok(())
}

#[test]
fn invalid_packed_digit_is_reported() -> eyre::Result<()> {
    let mut record = Record::define("R", |def| {
        def.create_new_field(FieldSpec::signed_packed("AMT", 3))?;
        Ok(())
    })?;

    record.field_mut("AMT")?.assign_bytes(&[0x1A, 0x3C]);
    assert_eq!(
        record.value("AMT"),
        Err(FieldValueError::InvalidPackedDigit {
            nibble: 0xA,
            position: 1
        })
    );
    assert_eq!(record.field("AMT")?.as_decimal_or_default(), Decimal::ZERO);
    Ok(())
}

// ============================================================================
// BINARY AND FLOAT FIELDS
// ============================================================================

#[test]
fn binary_and_float_fields_are_big_endian() -> eyre::Result<()> {
    let mut record = Record::define("R", |def| {
        def.create_new_field(FieldSpec::binary("S", 4))?;
        def.create_new_field(FieldSpec::binary("L", 18).scale(2))?;
        def.create_new_field(FieldSpec::float("F"))?;
        Ok(())
    })?;

    record.assign("S", -2)?;
    record.assign("L", Decimal::new(-150, 2))?;
    record.assign("F", 1.0)?;

    assert_eq!(record.field("S")?.bytes(), vec![0xFF, 0xFE]);
    assert_eq!(record.value("S")?, FieldValue::Int(-2));
    assert_eq!(record.value("L")?, FieldValue::Decimal(Decimal::new(-150, 2)));
    assert_eq!(record.field("F")?.bytes(), vec![0x3F, 0x80, 0x00, 0x00]);
    assert_eq!(record.field("F")?.as_f64()?, 1.0);
    assert_eq!(record.len(), 14);
    Ok(())
}

// ============================================================================
// CHECK FIELDS
// ============================================================================

#[test]
fn check_fields_follow_live_data() -> eyre::Result<()> {
    let mut record = Record::define("EMPLOYEE", |def| {
        def.create_new_field(FieldSpec::text("GRADE", 1))?;
        def.create_new_check_field("GRADE", CheckField::char_range("LETTER", 'A', 'F'))?;
        def.create_new_field(FieldSpec::text("DEPT", 4))?;
        def.create_new_check_field("DEPT", CheckField::one_of("KNOWN", ["SALE", "IT"]))?;
        def.create_new_field(FieldSpec::zoned("AGE", 3))?;
        def.create_new_check_field("AGE", CheckField::between("ADULT", 18, 130))?;
        def.create_new_check_field("AGE", CheckField::exclusive_between("TEEN", 12, 20))?;
        Ok(())
    })?;

    record.assign("GRADE", "C")?;
    record.assign("DEPT", "IT")?;
    record.assign("AGE", 19)?;
    assert!(record.check("GRADE", "LETTER")?);
    assert!(record.check("DEPT", "KNOWN")?);
    assert!(record.check("AGE", "ADULT")?);
    assert!(record.check("AGE", "TEEN")?);

    record.assign("GRADE", "Z")?;
    record.assign("DEPT", "HR")?;
    record.assign("AGE", 20)?;
    assert!(!record.check("GRADE", "LETTER")?);
    assert!(!record.check("DEPT", "KNOWN")?);
    assert!(record.check("AGE", "ADULT")?);
    assert!(!record.check("AGE", "TEEN")?);

    let names: Vec<&str> = record.field("AGE")?.checks().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["ADULT", "TEEN"]);
    Ok(())
}

// ============================================================================
// BUFFER REFERENCES AND POINTERS
// ============================================================================

fn linkage() -> eyre::Result<Record> {
    let record = Record::define("LINKAGE", |def| {
        def.create_new_field(FieldSpec::text("CODE", 3))?;
        def.create_new_field(FieldSpec::zoned("AMOUNT", 5))?;
        Ok(())
    })?;
    Ok(record)
}

#[test]
fn set_address_of_aliases_another_record() -> eyre::Result<()> {
    let mut working = Record::define("WORKING", |def| {
        def.create_new_field(FieldSpec::text("PREFIX", 2))?;
        def.new_group("AREA", |def| {
            def.create_new_field(FieldSpec::text("TAG", 3))?;
            def.create_new_field(FieldSpec::zoned("VALUE", 5))?;
            Ok(())
        })?;
        Ok(())
    })?;
    working.assign("TAG", "ABC")?;
    working.assign("VALUE", 250)?;

    let mut view = linkage()?;
    let area = working.structural_element_by_name("AREA").expect("area");
    view.set_buffer_reference(&area);

    assert_eq!(view.field("CODE")?.as_text(), "ABC");
    assert_eq!(view.field("AMOUNT")?.as_int(), 250);

    view.assign("AMOUNT", 300)?;
    assert_eq!(working.field("VALUE")?.as_int(), 300);
    assert_eq!(&working.as_bytes()[2..], b"ABC00300");
    Ok(())
}

#[test]
fn pointer_fields_resolve_through_the_registry() -> eyre::Result<()> {
    let mut ctx = RegistryContext::new();
    let target = linkage()?;
    let mut holder = Record::define("HOLDER", |def| {
        def.create_new_field(FieldSpec::pointer("NEXT"))?;
        Ok(())
    })?;

    let key = holder.field_mut("NEXT")?.set_address_of(&mut ctx, &target)?;
    assert_eq!(ctx.key_of(&target), Some(key));

    let mut resolved = holder.field("NEXT")?.resolve_pointer(&ctx)?;
    resolved.assign("CODE", "XYZ")?;
    assert_eq!(target.field("CODE")?.as_text(), "XYZ");

    ctx.release(key);
    assert_eq!(
        holder.field("NEXT")?.resolve_pointer(&ctx).err(),
        Some(FieldValueError::DanglingPointer { key: key.get() })
    );
    Ok(())
}
