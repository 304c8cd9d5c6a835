use std::io::{self, Write};

use crate::error::ExportError;

/// Minimal delimited-text writer.
///
/// A field is wrapped in double quotes (inner quotes doubled) only when it
/// contains the delimiter, a quote, `\r` or `\n`, starts with whitespace, or
/// is exactly `\.`. The empty string is written bare. Every record ends in
/// `\n` and is flushed before `write_record` returns.
pub struct CsvWriter<W: Write> {
    inner:     W,
    delimiter: char,
}

/// Whether `c` can separate fields without making the output ambiguous.
pub fn is_valid_delimiter(c: char) -> bool {
    !matches!(c, '\0' | '"' | '\r' | '\n' | char::REPLACEMENT_CHARACTER)
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> CsvWriter<W> {
        CsvWriter { inner, delimiter: ',' }
    }

    pub fn with_delimiter(inner: W, delimiter: char) -> Result<CsvWriter<W>, ExportError> {
        if !is_valid_delimiter(delimiter) {
            return Err(ExportError::InvalidDelimiter(delimiter));
        }
        Ok(CsvWriter { inner, delimiter })
    }

    pub fn write_record<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            let field = field.as_ref();
            if self.needs_quotes(field) {
                line.push('"');
                line.push_str(&field.replace('"', "\"\""));
                line.push('"');
            } else {
                line.push_str(field);
            }
        }
        line.push('\n');

        self.inner.write_all(line.as_bytes())?;
        self.inner.flush()
    }

    fn needs_quotes(&self, field: &str) -> bool {
        if field.is_empty() {
            return false;
        }
        if field == r"\." {
            return true;
        }
        if field.chars().next().is_some_and(char::is_whitespace) {
            return true;
        }
        field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\r' || c == '\n')
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
