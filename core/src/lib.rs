//! avro-csv-core
//!
//! This crate implements:
//!  1) A parser + verifier for the JSON schema embedded in Avro container files,
//!  2) A pull-based, streaming container reader (header, blocks, `null`,
//!     `deflate`, `snappy` and `zstandard` codecs),
//!  3) The row projector that renders each record as text in schema order,
//!  4) A small CSV writer and the `export` pipeline that ties them together,
//!  5) Error types (`ExportError`) and the `Diagnostics` progress sink.

pub mod error;
pub mod types;
pub mod utils;
pub mod parser;
pub mod verifier;
pub mod record;
pub mod container;
pub mod projector;
pub mod csv;
pub mod diagnostics;
pub mod export;

pub use container::ContainerReader;
pub use error::ExportError;
pub use export::{export, export_file, export_reader, ExportOptions, ExportSummary};
pub use parser::parse_schema;
pub use projector::project;
pub use record::Record;
