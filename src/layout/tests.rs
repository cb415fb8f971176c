//! Tests for record layouts and the structure cloner

use super::*;
use crate::error::StructureError;
use crate::record::Record;
use crate::types::{Decimal, FieldType, FieldValue};

fn customer() -> Layout {
    StructureDefinition::new_record("CUSTOMER", |def| {
        def.create_new_field(FieldSpec::zoned("ID", 4))?;
        def.create_new_field(FieldSpec::text("NAME", 10))?;
        def.new_group_redefine("NAME-PARTS", "NAME", |def| {
            def.create_new_field(FieldSpec::text("FIRST", 5))?;
            def.create_new_field(FieldSpec::text("LAST", 5))?;
            Ok(())
        })?;
        def.create_new_group_array("PHONES", 2, |def| {
            def.create_new_field(FieldSpec::zoned("AREA", 3))?;
            def.create_new_field(FieldSpec::zoned("NUMBER", 5))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap()
}

fn offset_of(layout: &Layout, name: &str) -> usize {
    layout.element(layout.find(name).unwrap()).offset()
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn fields_are_placed_in_declaration_order() {
    let layout = customer();

    assert_eq!(layout.name(), "CUSTOMER");
    assert_eq!(layout.len(), 30);
    assert_eq!(offset_of(&layout, "ID"), 0);
    assert_eq!(offset_of(&layout, "NAME"), 4);
    assert_eq!(offset_of(&layout, "PHONES"), 14);
}

#[test]
fn redefinition_shares_the_target_offset() {
    let layout = customer();

    let parts = layout.find("NAME-PARTS").unwrap();
    let element = layout.element(parts);
    assert_eq!(element.offset(), 4);
    assert_eq!(element.len(), 10);
    assert!(element.flags().redefinition);
    assert_eq!(element.redefines(), layout.find("NAME"));

    assert_eq!(offset_of(&layout, "FIRST"), 4);
    assert_eq!(offset_of(&layout, "LAST"), 9);
    assert!(layout.element(layout.find("LAST").unwrap()).flags().child_of_redefinition);
}

#[test]
fn redefinition_does_not_advance_the_cursor() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 6))?;
        def.create_new_field(FieldSpec::zoned("B", 4).redefines("A"))?;
        assert_eq!(def.current_offset(), 6);
        def.create_new_field(FieldSpec::text("C", 2))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(offset_of(&layout, "B"), 0);
    assert_eq!(offset_of(&layout, "C"), 6);
    assert_eq!(layout.len(), 8);
}

#[test]
fn group_array_items_repeat_at_the_stride() {
    let layout = customer();

    let phones = layout.element(layout.find("PHONES").unwrap());
    let ElementKind::GroupArray { items, stride } = phones.kind() else {
        panic!("PHONES should be a group array");
    };
    assert_eq!(*stride, 8);
    assert_eq!(items.len(), 2);
    assert_eq!(phones.len(), 16);

    let second = layout.element(items[1]);
    assert_eq!(second.name(), "PHONES[1]");
    assert_eq!(second.offset(), 22);

    let area = layout.child(items[1], "AREA").unwrap();
    let number = layout.child(items[1], "NUMBER").unwrap();
    assert_eq!(layout.element(area).offset(), 22);
    assert_eq!(layout.element(number).offset(), 25);
    assert_eq!(layout.element(area).parent(), Some(items[1]));
    assert_eq!(layout.path(number), "CUSTOMER.PHONES[1].NUMBER");
}

#[test]
fn field_array_items_are_named_by_index() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field_array(FieldSpec::signed_packed("AMT", 5).scale(2), 3)?;
        Ok(())
    })
    .unwrap();

    let array = layout.element(layout.find("AMT").unwrap());
    assert!(array.is_array());
    assert_eq!(array.len(), 9);

    let third = layout.find("AMT[2]").unwrap();
    assert_eq!(layout.element(third).offset(), 6);
    let def = layout.element(third).field_def().unwrap();
    assert_eq!(def.format().field_type(), FieldType::PackedSigned);
    assert_eq!(def.format().decimal_digits(), 2);
}

#[test]
fn find_all_lists_every_instance_in_declaration_order() {
    let layout = customer();

    let areas = layout.find_all("AREA");
    assert_eq!(areas.len(), 2);
    assert_eq!(layout.find("AREA"), Some(areas[0]));
    assert!(layout.element(areas[0]).offset() < layout.element(areas[1]).offset());
    assert!(layout.find_all("MISSING").is_empty());
}

#[test]
fn elements_are_stored_in_preorder() {
    let layout = customer();

    let names: Vec<&str> = layout.iter().map(|(_, e)| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "CUSTOMER", "ID", "NAME", "NAME-PARTS", "FIRST", "LAST", "PHONES", "PHONES[0]",
            "AREA", "NUMBER", "PHONES[1]", "AREA", "NUMBER",
        ]
    );
    assert_eq!(layout.element_count(), 13);
}

#[test]
fn same_declarations_give_identical_layouts() {
    let a = customer();
    let b = customer();

    let shape = |layout: &Layout| -> Vec<(String, usize, usize)> {
        layout
            .iter()
            .map(|(id, e)| (layout.path(id), e.offset(), e.len()))
            .collect()
    };
    assert_eq!(shape(&a), shape(&b));
    assert_eq!(a.initial_image(), b.initial_image());
}

#[test]
fn filler_is_placed_but_not_indexed() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::filler(3))?;
        def.create_new_field(FieldSpec::text("A", 2))?;
        def.create_new_field(FieldSpec::filler(1))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(layout.len(), 6);
    assert_eq!(offset_of(&layout, "A"), 3);
    assert!(!layout.contains("FILLER"));
    assert!(layout.child(ElementId::ROOT, "FILLER").is_none());
    assert_eq!(layout.root().children().len(), 3);
}

#[test]
fn is_within_follows_parent_links() {
    let layout = customer();
    let phones = layout.find("PHONES").unwrap();
    let area = layout.find_all("AREA")[1];
    let id = layout.find("ID").unwrap();

    assert!(layout.is_within(area, phones));
    assert!(layout.is_within(area, ElementId::ROOT));
    assert!(layout.is_within(phones, phones));
    assert!(!layout.is_within(id, phones));
}

// ============================================================================
// INITIAL IMAGE
// ============================================================================

#[test]
fn initial_image_holds_type_defaults() {
    let layout = customer();

    let mut expected = b"0000".to_vec();
    expected.extend_from_slice(&[b' '; 10]);
    expected.extend_from_slice(b"0000000000000000");
    assert_eq!(layout.initial_image(), expected.as_slice());
}

#[test]
fn initial_values_are_encoded_into_the_image() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("CODE", 4).initial("AB"))?;
        def.create_new_field(FieldSpec::signed_zoned("QTY", 3).initial(-7))?;
        def.create_new_field(FieldSpec::binary("N", 4).initial(258))?;
        def.create_new_field(FieldSpec::text("FLAG", 1).initial(FieldValue::HighValues))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        layout.initial_image(),
        &[b'A', b'B', b' ', b' ', b'0', b'0', b'7', b'-', 0x01, 0x02, 0xFF]
    );
}

#[test]
fn initial_value_on_a_redefinition_is_ignored() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 4).initial("WXYZ"))?;
        def.create_new_field(FieldSpec::zoned("B", 4).redefines("A").initial(1234))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(layout.initial_image(), b"WXYZ");
    let b = layout.element(layout.find("B").unwrap());
    assert!(b.field_def().unwrap().initial().is_none());
}

#[test]
fn initial_values_repeat_across_field_array_items() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field_array(FieldSpec::zoned("N", 2).initial(5), 3)?;
        Ok(())
    })
    .unwrap();

    assert_eq!(layout.initial_image(), b"050505");
}

// ============================================================================
// DECLARATION ERRORS
// ============================================================================

#[test]
fn unknown_redefine_target_is_rejected() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 4))?;
        def.create_new_field(FieldSpec::text("B", 4).redefines("NOPE"))?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(
        err,
        StructureError::UnknownRedefineTarget {
            name: "B".to_string(),
            target: "NOPE".to_string(),
            parent: "R".to_string(),
        }
    );
}

#[test]
fn redefine_target_must_be_a_sibling() {
    let err = StructureDefinition::new_record("R", |def| {
        def.new_group("G", |def| {
            def.create_new_field(FieldSpec::text("A", 4))?;
            Ok(())
        })?;
        def.new_group_redefine("H", "A", |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, StructureError::UnknownRedefineTarget { .. }));
}

#[test]
fn duplicate_sibling_names_are_rejected() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 1))?;
        def.create_new_field(FieldSpec::zoned("A", 1))?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(
        err,
        StructureError::DuplicateName {
            name: "A".to_string(),
            parent: "R".to_string(),
        }
    );
}

#[test]
fn same_name_in_different_groups_is_allowed() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.new_group("HOME", |def| {
            def.create_new_field(FieldSpec::text("CITY", 8))?;
            Ok(())
        })?;
        def.new_group("WORK", |def| {
            def.create_new_field(FieldSpec::text("CITY", 8))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let work = layout.find("WORK").unwrap();
    let city = layout.child(work, "CITY").unwrap();
    assert_eq!(layout.element(city).offset(), 8);
    assert_eq!(layout.find_all("CITY").len(), 2);
}

#[test]
fn empty_arrays_are_rejected() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field_array(FieldSpec::text("A", 1), 0)?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(err, StructureError::EmptyArray { name: "A".to_string() });

    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_group_array("G", 0, |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(err, StructureError::EmptyArray { name: "G".to_string() });
}

#[test]
fn redefinition_past_the_record_end_overflows() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 4))?;
        def.create_new_field(FieldSpec::text("B", 6).redefines("A"))?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(
        err,
        StructureError::RedefinitionOverflow {
            name: "B".to_string(),
            end: 6,
            capacity: 4,
        }
    );
}

#[test]
fn longer_redefinition_within_the_record_is_accepted() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 4))?;
        def.create_new_field(FieldSpec::text("B", 6).redefines("A"))?;
        def.create_new_field(FieldSpec::text("C", 4))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(layout.len(), 8);
}

#[test]
fn field_lengths_are_validated() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::text("A", 0))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, StructureError::InvalidFieldLength { .. }));

    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::binary("B", 19))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(
        err,
        StructureError::InvalidFieldLength { display_length: 19, .. }
    ));
}

#[test]
fn unencodable_initial_value_is_rejected() {
    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::zoned("N", 3).initial("ABC"))?;
        Ok(())
    })
    .unwrap_err();

    let StructureError::InvalidInitialValue { name, .. } = err else {
        panic!("expected InvalidInitialValue, got {:?}", err);
    };
    assert_eq!(name, "N");
}

// ============================================================================
// CHECK FIELDS
// ============================================================================

#[test]
fn check_fields_attach_to_fields_and_array_items() {
    let layout = StructureDefinition::new_record("R", |def| {
        def.create_new_field(FieldSpec::zoned("STATUS", 1))?;
        def.create_new_check_field("STATUS", CheckField::one_of("ACTIVE", [1, 2]))?;
        def.create_new_field_array(FieldSpec::zoned("N", 2), 2)?;
        def.create_new_check_field("N", CheckField::between("SMALL", 0, 9))?;
        Ok(())
    })
    .unwrap();

    let status = layout.element(layout.find("STATUS").unwrap());
    assert_eq!(status.field_def().unwrap().checks()[0].name(), "ACTIVE");

    for name in ["N[0]", "N[1]"] {
        let item = layout.element(layout.find(name).unwrap());
        assert_eq!(item.field_def().unwrap().checks().len(), 1);
    }
}

#[test]
fn check_on_a_group_is_not_a_field() {
    let err = StructureDefinition::new_record("R", |def| {
        def.new_group("G", |def| {
            def.create_new_field(FieldSpec::text("A", 1))?;
            Ok(())
        })?;
        def.create_new_check_field("G", CheckField::char_range("UPPER", 'A', 'Z'))?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(err, StructureError::NotAField { name: "G".to_string() });

    let err = StructureDefinition::new_record("R", |def| {
        def.create_new_check_field("MISSING", CheckField::char_range("UPPER", 'A', 'Z'))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, StructureError::UnknownElement { .. }));
}

// ============================================================================
// STRUCTURE CLONER
// ============================================================================

fn filled_customer() -> Record {
    let mut record = Record::new(std::sync::Arc::new(customer()));
    record.assign("ID", 42).unwrap();
    record.assign("NAME", "ADA LOVEL").unwrap();
    let phones = record.layout().find("PHONES").unwrap();
    let second = record.element(phones).item(1).unwrap().child("AREA").unwrap().id();
    record.element_mut(second).into_field().unwrap().assign(555).unwrap();
    record
}

fn note() -> Record {
    let mut record = Record::define("EXTRA", |def| {
        def.create_new_field(FieldSpec::text("NOTE", 5))?;
        Ok(())
    })
    .unwrap();
    record.assign("NOTE", "HELLO").unwrap();
    record
}

#[test]
fn clone_reproduces_layout_and_bytes() {
    let source = filled_customer();
    let clone = StructureCloner::new(&source).clone_record().unwrap();

    let shape = |layout: &Layout| -> Vec<(String, usize, usize, bool)> {
        layout
            .iter()
            .map(|(id, e)| (layout.path(id), e.offset(), e.len(), e.flags().redefinition))
            .collect()
    };
    assert_eq!(shape(clone.layout()), shape(source.layout()));
    assert_eq!(clone.as_bytes(), source.as_bytes());
    assert_eq!(clone.layout().initial_image(), source.layout().initial_image());
    assert!(!clone.root().same_element(&source.root()));
}

#[test]
fn clone_is_independent_of_the_source() {
    let mut source = filled_customer();
    let clone = StructureCloner::new(&source).clone_record().unwrap();

    source.assign("ID", 7).unwrap();
    assert_eq!(clone.field("ID").unwrap().as_int(), 42);
}

#[test]
fn clone_keeps_checks_and_initial_values() {
    let mut source = Record::define("R", |def| {
        def.create_new_field(FieldSpec::zoned("STATUS", 1).initial(1))?;
        def.create_new_check_field("STATUS", CheckField::one_of("OPEN", [1]))?;
        Ok(())
    })
    .unwrap();
    source.assign("STATUS", 2).unwrap();

    let mut clone = StructureCloner::new(&source).clone_record().unwrap();
    assert_eq!(clone.check("STATUS", "OPEN"), Ok(false));
    clone.reset_to_initial_value();
    assert_eq!(clone.check("STATUS", "OPEN"), Ok(true));
}

#[test]
fn splice_at_the_root_appends_the_fragment() {
    let source = filled_customer();
    let fragment = note();
    let clone = StructureCloner::new(&source)
        .with_new_content(&fragment, None)
        .clone_record()
        .unwrap();

    assert_eq!(clone.len(), 35);
    let extra = clone.structural_element_by_name("EXTRA").unwrap();
    assert_eq!(extra.offset(), 30);
    assert_eq!(extra.parent().unwrap().id(), ElementId::ROOT);
    assert_eq!(clone.field("NOTE").unwrap().as_text(), "HELLO");
    assert_eq!(&clone.as_bytes()[..30], source.as_bytes().as_slice());
}

#[test]
fn splice_into_the_last_group_keeps_earlier_offsets() {
    let mut source = Record::define("R", |def| {
        def.create_new_field(FieldSpec::zoned("ID", 4))?;
        def.new_group("ADDR", |def| {
            def.create_new_field(FieldSpec::text("CITY", 6))?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
    source.assign("ID", 9).unwrap();
    source.assign("CITY", "PARIS").unwrap();
    let fragment = note();

    let addr = source.structural_element_by_name("ADDR").unwrap();
    let clone = StructureCloner::new(&source)
        .with_new_content(&fragment, Some(addr))
        .clone_record()
        .unwrap();

    assert_eq!(clone.len(), 15);
    let addr = clone.structural_element_by_name("ADDR").unwrap();
    assert_eq!(addr.len(), 11);
    let extra = addr.child("EXTRA").unwrap();
    assert_eq!(extra.offset(), 10);
    assert_eq!(clone.layout().path(clone.layout().find("NOTE").unwrap()), "R.ADDR.EXTRA.NOTE");

    assert_eq!(clone.field("ID").unwrap().as_int(), 9);
    assert_eq!(clone.field("CITY").unwrap().as_text(), "PARIS ");
    assert_eq!(clone.field("NOTE").unwrap().as_text(), "HELLO");
}

#[test]
fn splice_into_a_group_array_extends_every_item() {
    let source = filled_customer();
    let fragment = note();
    let first = source
        .structural_element_by_name("PHONES")
        .and_then(|phones| phones.item(0))
        .unwrap();

    let clone = StructureCloner::new(&source)
        .with_new_content(&fragment, Some(first))
        .clone_record()
        .unwrap();

    assert_eq!(clone.len(), 40);
    let phones = clone.structural_element_by_name("PHONES").unwrap();
    let ElementKind::GroupArray { stride, .. } = phones.element().kind() else {
        panic!("PHONES should be a group array");
    };
    assert_eq!(*stride, 13);

    let second = phones.item(1).unwrap();
    assert_eq!(second.child("AREA").unwrap().as_field().unwrap().as_int(), 555);
    assert!(second.child("EXTRA").is_some());

    let first_note = phones.item(0).and_then(|p| p.child("EXTRA")).and_then(|e| e.child("NOTE"));
    assert_eq!(first_note.unwrap().as_field().unwrap().as_text(), "HELLO");
}

#[test]
fn splice_requires_a_group_of_the_source() {
    let source = filled_customer();
    let fragment = note();

    let id = source.structural_element_by_name("ID").unwrap();
    let err = StructureCloner::new(&source)
        .with_new_content(&fragment, Some(id))
        .clone_record()
        .unwrap_err();
    assert!(matches!(err, StructureError::InvalidInsertionPoint { .. }));

    let other = filled_customer();
    let foreign = other.structural_element_by_name("NAME-PARTS").unwrap();
    let err = StructureCloner::new(&source)
        .with_new_content(&fragment, Some(foreign))
        .clone_record()
        .unwrap_err();
    assert!(matches!(err, StructureError::InvalidInsertionPoint { .. }));
}

#[test]
fn splice_into_a_later_array_instance_is_rejected() {
    let source = filled_customer();
    let fragment = note();
    let second = source
        .structural_element_by_name("PHONES")
        .and_then(|phones| phones.item(1))
        .unwrap();

    let err = StructureCloner::new(&source)
        .with_new_content(&fragment, Some(second))
        .clone_record()
        .unwrap_err();

    let StructureError::InvalidInsertionPoint { name, .. } = err else {
        panic!("expected InvalidInsertionPoint, got {:?}", err);
    };
    assert_eq!(name, "CUSTOMER.PHONES[1]");
}

#[test]
fn initial_image_reads_back_through_a_record() {
    let record = Record::new(std::sync::Arc::new(customer()));

    assert_eq!(
        record.value("ID").unwrap(),
        FieldValue::Decimal(Decimal::ZERO)
    );
    assert_eq!(record.field("NAME").unwrap().as_text(), " ".repeat(10));
}
