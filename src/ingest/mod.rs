//! CSV ingest pipeline: parsing, header mapping, row materialization

pub mod mapping;
pub mod materialize;
pub mod reader;
pub mod suggest;

pub use mapping::{
    infer_mapping, validate_required, HeaderMapping, MappingError, MappingOutcome,
};
pub use materialize::{materialize, CandidateRecord};
pub use reader::{CsvTable, IngestError};
pub use suggest::{CommandSuggester, Suggest, SuggestRequest, SuggestResponse};

use clap::ValueEnum;

/// Where a batch of candidate records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportSource {
    CsvUpload,
    Migration,
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportSource::CsvUpload => write!(f, "csv-upload"),
            ImportSource::Migration => write!(f, "migration"),
        }
    }
}
