//! CSV reading
//!
//! Turns raw delimited text into a header row and an ordered sequence of
//! string rows. No semantic knowledge of fields lives here.

use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A parsed CSV file: one header row plus data rows, all cells trimmed
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse raw CSV text
    ///
    /// Quoted cells (including embedded commas and newlines) are handled,
    /// rows may be ragged, and every cell is trimmed. Input without a
    /// usable header row is an error; callers must not proceed to mapping
    /// with an empty header set.
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|source| IngestError::Malformed { row: 1, source })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(IngestError::EmptyCsv);
        }

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|source| IngestError::Malformed {
                // +2 for the header line and 1-indexing
                row: idx + 2,
                source,
            })?;
            rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read and parse a CSV file from disk
    pub fn read(path: &Path) -> Result<Self, IngestError> {
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

/// Errors that can occur while reading CSV input
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV input has no header row")]
    EmptyCsv,

    #[error("CSV parse error at row {row}: {source}")]
    Malformed { row: usize, source: csv::Error },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
