use avro_csv_schema::{Primitive, Value};

use crate::{
    error::ExportError,
    record::Record,
    types::{Field, Schema},
    utils::format_double,
};

/// Renders one record as text values, one per schema field in declaration
/// order. The record's own key order never matters.
pub fn project(record: &Record, schema: &Schema) -> Result<Vec<String>, ExportError> {
    schema
        .fields
        .iter()
        .map(|field| project_field(field, record.get(&field.name)))
        .collect()
}

/// Renders a single field. Null and absent values are always `""`, whatever
/// the field's type.
pub fn project_field(field: &Field, value: Option<&Value>) -> Result<String, ExportError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(value) => value,
    };

    let expected = field.effective.primitive;
    let mismatch = || ExportError::TypeMismatch {
        field: field.name.clone(),
        expected,
        found: value.primitive(),
    };

    match expected {
        Primitive::String => match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(mismatch()),
        },
        Primitive::Boolean => match value {
            Value::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_owned()),
            _ => Err(mismatch()),
        },
        Primitive::Long => match value {
            Value::Long(n) => Ok(n.to_string()),
            _ => Err(mismatch()),
        },
        Primitive::Double => match value {
            Value::Double(d) => Ok(format_double(*d)),
            _ => Err(mismatch()),
        },
        Primitive::Null | Primitive::Int | Primitive::Float | Primitive::Bytes => {
            Err(ExportError::UnknownType(expected.name().to_owned()))
        }
    }
}
