use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::{
    container::ContainerReader,
    csv::CsvWriter,
    diagnostics::{Diagnostics, Event},
    error::ExportError,
    projector::project,
    types::Schema,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Column separator for the output.
    pub delimiter:    char,
    /// Report rows that fail to project and carry on, instead of aborting.
    /// Errors reading the file itself are always fatal.
    pub skip_invalid: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            delimiter:    ',',
            skip_invalid: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows_written: u64,
    pub rows_skipped: u64,
}

/// Reads the container at `path` and writes it to `out` as delimited text.
/// The file is streamed, one block at a time.
pub fn export_file<W, D>(
    path: &Path,
    out: W,
    mut diagnostics: D,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError>
where
    W: Write,
    D: Diagnostics,
{
    diagnostics.event(Event::Reading { path });
    let file = File::open(path).map_err(|source| ExportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    export_reader(file, out, diagnostics, options)
}

/// Writes an in-memory container to `out`. See [`export_reader`].
pub fn export<W, D>(
    data: &[u8],
    out: W,
    diagnostics: D,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError>
where
    W: Write,
    D: Diagnostics,
{
    export_reader(data, out, diagnostics, options)
}

/// Writes the container read from `input` to `out`: a header line of field
/// names, then one line per record, flushed as it goes.
///
/// The first error ends the run. Lines already written stay written.
pub fn export_reader<R, W, D>(
    input: R,
    out: W,
    mut diagnostics: D,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError>
where
    R: Read,
    W: Write,
    D: Diagnostics,
{
    let mut writer = CsvWriter::with_delimiter(out, options.delimiter)?;
    let mut reader = ContainerReader::new(input)?;
    diagnostics.event(Event::LoadingSchema);
    describe_schema(reader.schema(), &mut diagnostics);

    writer.write_record(&reader.schema().column_names())?;

    let mut summary = ExportSummary::default();
    while let Some(record) = reader.next_record()? {
        match project(&record, reader.schema()) {
            Ok(values) => {
                writer.write_record(&values)?;
                summary.rows_written += 1;
            }
            Err(e) if options.skip_invalid && e.is_projection() => {
                diagnostics.event(Event::RowSkipped {
                    index: reader.records_read() - 1,
                    error: &e,
                });
                summary.rows_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    diagnostics.event(Event::Finished {
        rows:    summary.rows_written,
        skipped: summary.rows_skipped,
    });
    Ok(summary)
}

fn describe_schema<D: Diagnostics>(schema: &Schema, diagnostics: &mut D) {
    diagnostics.event(Event::Resource {
        name:      &schema.name,
        namespace: schema.namespace.as_deref(),
    });
    for field in &schema.fields {
        diagnostics.event(Event::Column {
            name:  &field.name,
            types: field.decl.type_names().join(", "),
        });
    }
}
