use std::path::PathBuf;

use avro_csv_schema::Primitive;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("unable to read avro file: {0}")]
    Container(String),

    #[error("Schema parse error: {0}")]
    SchemaJson(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("unable to render schema: {0}")]
    SchemaRender(serde_json::Error),

    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(char),

    #[error("unable to read row {index}: {msg}")]
    Decode {
        index: u64,
        msg:   String,
    },

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("field \"{field}\" expected {expected} but found {found}")]
    TypeMismatch {
        field:    String,
        expected: Primitive,
        found:    Primitive,
    },
}

impl ExportError {
    /// Whether this error came from rendering a single row, as opposed to
    /// reading the file. Only these may be skipped.
    pub fn is_projection(&self) -> bool {
        matches!(
            self,
            ExportError::UnknownType(_) | ExportError::TypeMismatch { .. }
        )
    }
}
