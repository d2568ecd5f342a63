use std::io;

use thiserror::Error;

use crate::ingest::Advisory;

/// Why a single spreadsheet could not be ingested.
///
/// These never abort a run; the aggregator turns them into `FileWarning`s.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("period token '{token}' is not a month number")]
    InvalidPeriodToken { token: String },
    #[error("failed to open workbook: {reason}")]
    Open { reason: String },
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },
}

/// Errors surfaced by configuration, export and dashboard construction.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("no data: {0}")]
    NoData(Advisory),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
