use std::collections::HashMap;

use avro_csv_schema::{ByteBuffer, Value};

use crate::types::{Field, Schema, TypeDecl};

/// One decoded row, keyed by field name.
///
/// A missing key and an explicit [`Value::Null`] mean the same thing to the
/// projector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decodes one record body from `bb`, reading fields in schema order.
    /// On failure the message names the field that could not be read.
    pub fn decode_bb(schema: &Schema, bb: &mut ByteBuffer) -> Result<Record, String> {
        let mut record = Record::new();
        for field in &schema.fields {
            let value = decode_field_bb(field, bb)?;
            record.insert(field.name.as_str(), value);
        }
        Ok(record)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Decodes a single field. Union values are prefixed with the index of the
/// branch that was written.
pub fn decode_field_bb(field: &Field, bb: &mut ByteBuffer) -> Result<Value, String> {
    let primitive = match &field.decl {
        TypeDecl::Primitive(p) => *p,
        TypeDecl::Union(branches) => {
            let index = bb
                .read_var_long()
                .map_err(|_| format!("truncated union index for field {}", field.name))?;
            usize::try_from(index)
                .ok()
                .and_then(|i| branches.get(i).copied())
                .ok_or_else(|| {
                    format!(
                        "union index {} out of range for field {} ({} branches)",
                        index,
                        field.name,
                        branches.len()
                    )
                })?
        }
    };

    Value::decode_bb(primitive, bb)
        .map_err(|_| format!("invalid {} value for field {}", primitive, field.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    fn schema() -> Schema {
        parse_schema(
            br#"{"type":"record","name":"R","fields":[
                {"name":"id","type":["long"]},
                {"name":"note","type":["null","string"]},
                {"name":"ok","type":"boolean"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_fields_in_schema_order() {
        let schema = schema();
        let mut bb = ByteBuffer::new(&[0, 2, 2, 4, 104, 105, 1]);
        let record = Record::decode_bb(&schema, &mut bb).unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("id"), Some(&Value::Long(1)));
        assert_eq!(record.get("note"), Some(&Value::String("hi".to_owned())));
        assert_eq!(record.get("ok"), Some(&Value::Boolean(true)));
        assert!(bb.is_empty());
    }

    #[test]
    fn decodes_null_branch() {
        let schema = schema();
        let mut bb = ByteBuffer::new(&[0, 4, 0, 0]);
        let record = Record::decode_bb(&schema, &mut bb).unwrap();
        assert_eq!(record.get("note"), Some(&Value::Null));
        assert_eq!(record.get("ok"), Some(&Value::Boolean(false)));
    }

    #[test]
    fn reports_bad_input() {
        let schema = schema();

        let err = Record::decode_bb(&schema, &mut ByteBuffer::new(&[0, 2, 4])).unwrap_err();
        assert_eq!(err, "union index 2 out of range for field note (2 branches)");

        let err = Record::decode_bb(&schema, &mut ByteBuffer::new(&[0, 2, 0, 9])).unwrap_err();
        assert_eq!(err, "invalid boolean value for field ok");

        let err = Record::decode_bb(&schema, &mut ByteBuffer::new(&[0])).unwrap_err();
        assert_eq!(err, "invalid long value for field id");

        let err = Record::decode_bb(&schema, &mut ByteBuffer::new(&[])).unwrap_err();
        assert_eq!(err, "truncated union index for field id");

        let err = Record::decode_bb(&schema, &mut ByteBuffer::new(&[0, 2, 1])).unwrap_err();
        assert_eq!(err, "union index -1 out of range for field note (2 branches)");
    }

    #[test]
    fn collects_from_pairs() {
        let record: Record = vec![("a", Value::Long(1)), ("b", Value::Null)].into_iter().collect();
        assert_eq!(record.get("a"), Some(&Value::Long(1)));
        assert_eq!(record.get("c"), None);
    }
}
