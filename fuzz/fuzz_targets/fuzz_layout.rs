//! Fuzz testing for layout construction and cloning.
//!
//! Builds records from arbitrary declaration sequences, fills them with
//! arbitrary bytes and reads every field back. A record that builds must
//! clone to an identical byte image.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use copybook::{FieldSpec, Record, StructureCloner, StructureDefinition, StructureError};

#[derive(Debug, Arbitrary)]
struct LayoutInput {
    declarations: Vec<Declaration>,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum Declaration {
    Text(u8),
    Zoned(u8),
    Packed(u8),
    Binary(u8),
    Double,
    Filler(u8),
    RedefinePrevious(u8),
    FieldArray(u8, u8),
    GroupArray(u8, Vec<Declaration>),
    Group(Vec<Declaration>),
}

fn declare(
    def: &mut StructureDefinition,
    declarations: &[Declaration],
    depth: usize,
) -> Result<(), StructureError> {
    let mut previous: Option<String> = None;
    for (i, declaration) in declarations.iter().enumerate() {
        let name = format!("E{}-{}", depth, i);
        match declaration {
            Declaration::Text(n) => {
                def.create_new_field(FieldSpec::text(&name, *n as usize % 16))?;
            }
            Declaration::Zoned(n) => {
                def.create_new_field(FieldSpec::signed_zoned(&name, *n as usize % 20))?;
            }
            Declaration::Packed(n) => {
                def.create_new_field(FieldSpec::signed_packed(&name, *n as usize % 20))?;
            }
            Declaration::Binary(n) => {
                def.create_new_field(FieldSpec::binary(&name, *n as usize % 20))?;
            }
            Declaration::Double => {
                def.create_new_field(FieldSpec::double(&name))?;
            }
            Declaration::Filler(n) => {
                def.create_new_field(FieldSpec::filler(*n as usize % 8))?;
                continue;
            }
            Declaration::RedefinePrevious(n) => {
                let Some(target) = previous.as_deref() else {
                    continue;
                };
                def.create_new_field(FieldSpec::text(&name, *n as usize % 16).redefines(target))?;
                continue;
            }
            Declaration::FieldArray(n, count) => {
                def.create_new_field_array(
                    FieldSpec::zoned(&name, *n as usize % 10),
                    *count as usize % 6,
                )?;
            }
            Declaration::GroupArray(count, children) => {
                if depth >= 3 {
                    continue;
                }
                def.create_new_group_array(&name, *count as usize % 4, |def| {
                    declare(def, children, depth + 1)
                })?;
            }
            Declaration::Group(children) => {
                if depth >= 3 {
                    continue;
                }
                def.new_group(&name, |def| declare(def, children, depth + 1))?;
            }
        }
        previous = Some(name);
    }
    Ok(())
}

fuzz_target!(|input: LayoutInput| {
    let Ok(mut record) = Record::define("FUZZ", |def| declare(def, &input.declarations, 0)) else {
        return;
    };

    record.assign_bytes(&input.data);
    let layout = std::sync::Arc::clone(record.layout());
    for (id, element) in layout.iter() {
        assert!(element.end() <= record.len());
        if let Some(field) = record.element(id).as_field() {
            let _ = field.value();
            let _ = field.as_safe_int();
            let _ = field.display_string();
        }
    }

    let clone = StructureCloner::new(&record)
        .clone_record()
        .expect("a built record must clone");
    assert_eq!(clone.as_bytes(), record.as_bytes());
});
