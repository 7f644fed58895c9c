//! Export collaborators: a CSV sale summary and a full-state JSON dump.
//!
//! Exports never touch the session; a failure is returned to the caller to
//! report and the session carries on.

pub mod state_json;
pub mod summary;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use forge_core::{Catalog, ExportRecord};
use thiserror::Error;

pub use state_json::{read_state, write_state};
pub use summary::{HEADER, SummaryRow, summary_rows, summary_to_string, write_summary};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `forge-resumen-<millis>.csv`
    Summary,
    /// `forge-estado-<millis>.json`
    State,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "resumen" | "summary" => Some(Self::Summary),
            "json" | "estado" | "state" => Some(Self::State),
            _ => None,
        }
    }

    /// File name for a record, stamped with its timestamp in milliseconds.
    pub fn file_name(
        &self,
        record: &ExportRecord,
    ) -> String {
        let millis = record.timestamp.timestamp_millis();
        match self {
            Self::Summary => format!("forge-resumen-{millis}.csv"),
            Self::State => format!("forge-estado-{millis}.json"),
        }
    }
}

/// Writes `record` into `dir` in the chosen format and returns the new
/// file's path.
pub fn export_to_dir(
    dir: &Path,
    format: ExportFormat,
    catalog: &Catalog,
    record: &ExportRecord,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format.file_name(record));

    write_new_file(&path, |writer| match format {
        ExportFormat::Summary => write_summary(&summary_rows(catalog, &record.state), writer),
        ExportFormat::State => write_state(record, writer),
    })?;

    tracing::info!(path = %path.display(), ?format, "export written");
    Ok(path)
}

/// Creates `path` and fills it with `write`. A file that could not be
/// written completely is removed again.
fn write_new_file<F>(
    path: &Path,
    write: F,
) -> Result<(), ExportError>
where
    F: FnOnce(BufWriter<File>) -> Result<(), ExportError>,
{
    let writer = BufWriter::new(File::create(path)?);

    write(writer).inspect_err(|error| {
        tracing::warn!(path = %path.display(), %error, "export failed, removing partial file");
        if let Err(remove_error) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove_error, "could not remove partial export");
        }
    })
}
