use common::buffer::RecordBuffer;
use common::err::{LResult, LoaderError};
use common::value::Value;

use crate::codec::{ascii_int, ascii_real, sjis_text};
use crate::layout::{FieldCodec, RecordLayout, RepeatMode, ResolvedField};
use crate::parser::parsed_record::ParsedRecord;

/// Run one layout over one buffer.
///
/// Extraction is total: every declared field yields a value (possibly
/// NULL / empty) for any buffer at least as long as the layout. A layout
/// with an ExpandRows block yields one record per occupied slot, anything
/// else yields exactly one.
pub fn parse_with_layout(
    layout: &RecordLayout,
    buffer: &RecordBuffer,
    table: &str,
) -> LResult<Vec<ParsedRecord>> {
    let bytes = buffer.bytes();
    if bytes.len() < layout.record_len() {
        return Err(LoaderError::BufferTooShort {
            kind: layout.kind().tag().to_string(),
            expected: layout.record_len(),
            actual: bytes.len(),
        });
    }

    let mut base = ParsedRecord::new(table);
    for field in layout.fields() {
        base.insert(field.name.clone(), extract(bytes, field, 0));
    }
    for repeat in layout.repeats() {
        if repeat.mode != RepeatMode::Flatten {
            continue;
        }
        for i in 0..repeat.count {
            let slot = repeat.offset + i * repeat.stride;
            for field in &repeat.fields {
                base.insert(format!("{}{}", field.name, i + 1), extract(bytes, field, slot));
            }
        }
    }

    let expand = match layout.expand_repeat() {
        None => return Ok(vec![base]),
        Some(expand) => expand,
    };

    let mut rows = Vec::new();
    for i in 0..expand.count {
        let slot = expand.offset + i * expand.stride;
        // The first sub-field is the combinatorial key; an empty key
        // marks a vacant slot.
        let key = extract(bytes, &expand.fields[0], slot);
        if is_vacant(&key) {
            continue;
        }
        let mut row = base.clone();
        for field in &expand.fields {
            row.insert(field.name.clone(), extract(bytes, field, slot));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn extract(bytes: &[u8], field: &ResolvedField, base: usize) -> Value {
    let offset = base + field.offset;
    match field.codec {
        FieldCodec::Int => Value::from(ascii_int(bytes, offset, field.len)),
        FieldCodec::Real { scale } => Value::from(ascii_real(bytes, offset, field.len, scale)),
        FieldCodec::Text => Value::Text(sjis_text(bytes, offset, field.len)),
    }
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k_type::RecordKind;
    use crate::layout::FieldDef;

    fn buffer(bytes: &[u8]) -> RecordBuffer {
        RecordBuffer::new(bytes.to_vec(), "test.dat")
    }

    #[test]
    fn short_buffer_is_rejected() {
        let layout = RecordLayout::builder(RecordKind::Ra).text("A", 4).build();
        let err = parse_with_layout(&layout, &buffer(b"AB"), "T").unwrap_err();
        assert!(matches!(err, LoaderError::BufferTooShort { expected: 4, actual: 2, .. }));
    }

    #[test]
    fn longer_buffer_is_fine() {
        let layout = RecordLayout::builder(RecordKind::Ra).int("A", 2).build();
        let rows = parse_with_layout(&layout, &buffer(b"42 trailing junk"), "T").unwrap();
        assert_eq!(rows[0].get("A"), Some(&Value::Int(42)));
    }

    #[test]
    fn every_declared_field_yields_a_value() {
        let layout = RecordLayout::builder(RecordKind::Ra)
            .int("N", 2)
            .text("S", 3)
            .real("R", 4, 1)
            .build();
        let rows = parse_with_layout(&layout, &buffer(b"  ABC0035"), "T").unwrap();
        let row = &rows[0];
        assert_eq!(row.get("N"), Some(&Value::Null));
        assert_eq!(row.get("S"), Some(&Value::Text("ABC".to_string())));
        assert_eq!(row.get("R"), Some(&Value::Real(3.5)));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn expand_skips_vacant_slots() {
        let layout = RecordLayout::builder(RecordKind::O2)
            .int("Race", 1)
            .expand(
                3,
                &[FieldDef::text("Kumi", 2), FieldDef::real("Odds", 4, 1)],
            )
            .build();
        // slots: "01"/"0012", vacant, "02"/"0078"
        let data = b"9010012      020078";
        let rows = parse_with_layout(&layout, &buffer(&data[..]), "T").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Kumi"), Some(&Value::Text("01".to_string())));
        assert_eq!(rows[0].get("Odds"), Some(&Value::Real(1.2)));
        assert_eq!(rows[1].get("Kumi"), Some(&Value::Text("02".to_string())));
        assert_eq!(rows[1].get("Race"), Some(&Value::Int(9)));
    }

    #[test]
    fn flatten_suffixes_every_slot() {
        let layout = RecordLayout::builder(RecordKind::Hr)
            .flatten(2, &[FieldDef::int("Pay", 3)])
            .build();
        let rows = parse_with_layout(&layout, &buffer(b"100200"), "T").unwrap();
        assert_eq!(rows[0].get("Pay1"), Some(&Value::Int(100)));
        assert_eq!(rows[0].get("Pay2"), Some(&Value::Int(200)));
    }
}
