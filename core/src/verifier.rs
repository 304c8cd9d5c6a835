use crate::{
    types::Schema,
    utils::quote,
    error::ExportError,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NAME:      Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref FULL_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// Returns `Ok(())` if verification passed, or `Err(ExportError::SchemaError(_))` otherwise.
///
/// Only names are checked here. Field types are already resolved by the
/// parser. Columns are looked up by field name, so each name may appear once.
pub fn verify_schema(schema: &Schema) -> Result<(), ExportError> {
    if !FULL_NAME.is_match(&schema.name) {
        return Err(ExportError::SchemaError(format!(
            "The record name {} is invalid",
            quote(&schema.name)
        )));
    }

    if let Some(ns) = schema.namespace.as_deref() {
        if !ns.is_empty() && !FULL_NAME.is_match(ns) {
            return Err(ExportError::SchemaError(format!(
                "The namespace {} is invalid",
                quote(ns)
            )));
        }
    }

    let mut defined = HashSet::new();
    for field in &schema.fields {
        if !NAME.is_match(&field.name) {
            return Err(ExportError::SchemaError(format!(
                "The field name {} is invalid",
                quote(&field.name)
            )));
        }
        if !defined.insert(field.name.as_str()) {
            return Err(ExportError::SchemaError(format!(
                "The field {} is defined twice",
                quote(&field.name)
            )));
        }
    }

    Ok(())
}
