//! Progress reporting for an export run.
//!
//! The export pipeline never logs directly. It hands [`Event`]s to whatever
//! [`Diagnostics`] sink the caller passes in, so the core can be driven and
//! tested without a global subscriber.

use std::fmt;
use std::path::Path;

use crate::error::ExportError;

/// Target used for every tracing event emitted by [`TracingDiagnostics`].
pub const TARGET: &str = "avro_csv";

#[derive(Debug)]
pub enum Event<'a> {
    Reading { path: &'a Path },
    LoadingSchema,
    Resource { name: &'a str, namespace: Option<&'a str> },
    Column { name: &'a str, types: String },
    RowSkipped { index: u64, error: &'a ExportError },
    Finished { rows: u64, skipped: u64 },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::Reading { path } => write!(f, "reading {}", path.display()),
            Event::LoadingSchema => write!(f, "loading schema"),
            Event::Resource { name, .. } => write!(f, "resource name: {}", name),
            Event::Column { name, types } => write!(f, "  - {} ({})", name, types),
            Event::RowSkipped { index, error } => write!(f, "skipping row {}: {}", index, error),
            Event::Finished { rows, skipped } => {
                write!(f, "exported {} rows ({} skipped)", rows, skipped)
            }
        }
    }
}

pub trait Diagnostics {
    fn event(&mut self, event: Event<'_>);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn event(&mut self, event: Event<'_>) {
        (**self).event(event)
    }
}

/// Forwards events to `tracing`. Skipped rows are warnings, everything else
/// is informational.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn event(&mut self, event: Event<'_>) {
        match &event {
            Event::Reading { path } => {
                tracing::info!(target: TARGET, event = "reading", path = %path.display(), "{}", event)
            }
            Event::LoadingSchema => tracing::info!(target: TARGET, event = "loading_schema", "{}", event),
            Event::Resource { name, namespace } => tracing::info!(
                target: TARGET,
                event = "resource",
                name = %name,
                namespace = namespace.unwrap_or_default(),
                "{}",
                event
            ),
            Event::Column { name, types } => {
                tracing::info!(target: TARGET, event = "column", field = %name, types = %types, "{}", event)
            }
            Event::RowSkipped { index, .. } => {
                tracing::warn!(target: TARGET, event = "row_skipped", row = index, "{}", event)
            }
            Event::Finished { rows, skipped } => tracing::info!(
                target: TARGET,
                event = "finished",
                rows = rows,
                skipped = skipped,
                "{}",
                event
            ),
        }
    }
}

/// Keeps the rendered text of every event, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub lines: Vec<String>,
}

impl Diagnostics for RecordingDiagnostics {
    fn event(&mut self, event: Event<'_>) {
        self.lines.push(event.to_string());
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Diagnostics for Silent {
    fn event(&mut self, _event: Event<'_>) {}
}
