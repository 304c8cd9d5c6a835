//! avro-csv
//!
//! This crate provides the public entry points for turning Avro container
//! files into CSV.
//!
//! - `export` / `export_file` (re-exported from core)
//! - Helpers for converting in-memory buffers and inspecting schemas

pub use avro_csv_core::{
    export, export_file, export_reader, parse_schema, project, ContainerReader, ExportError,
    ExportOptions, ExportSummary, Record,
};
pub use avro_csv_schema::{Primitive, Value};

use std::io::Read;

use avro_csv_core::diagnostics::Silent;

/// Convert a container buffer into CSV text, aborting on the first error.
pub fn convert_to_csv(buffer: &[u8], options: &ExportOptions) -> Result<String, ExportError> {
    let mut out = Vec::new();
    export(buffer, &mut out, Silent, options)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Decode the schema embedded in a container into a pretty-printed JSON
/// string. Only the header is read.
pub fn schema_to_json<R: Read>(input: R) -> Result<String, ExportError> {
    let reader = ContainerReader::new(input)?;
    serde_json::to_string_pretty(reader.schema()).map_err(ExportError::SchemaRender)
}

pub mod diagnostics {
    pub use avro_csv_core::diagnostics::{
        Diagnostics, Event, RecordingDiagnostics, Silent, TracingDiagnostics,
    };
}

pub mod error {
    pub use avro_csv_core::error::ExportError;
}

pub mod schema {
    pub use avro_csv_core::types::{Field, FieldType, Schema, TypeDecl};
}
