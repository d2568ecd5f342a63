// Ingestion of a folder of monthly exports into one `UnifiedTable`.
//
// Each file goes through period resolution, loading, schema reconciliation
// and numeric coercion. A failure in any step skips that file only; the run
// always produces either a non-empty table or an explicit `Advisory`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::coerce::coerce_batch;
use crate::config::PipelineConfig;
use crate::error::{DashboardError, LoadError};
use crate::loader::load_raw_batch;
use crate::period::{resolve_period, Period};
use crate::reconcile::reconcile;
use crate::types::{CoercedBatch, Record, UnifiedTable};

/// Why an ingestion produced no table. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    MissingDirectory { path: PathBuf },
    NoSpreadsheets { path: PathBuf },
    NothingLoaded { path: PathBuf, attempted: usize },
    NoRows { path: PathBuf },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MissingDirectory { path } => {
                write!(f, "folder '{}' not found", path.display())
            }
            Advisory::NoSpreadsheets { path } => {
                write!(f, "no .xls or .xlsx files found in '{}'", path.display())
            }
            Advisory::NothingLoaded { path, attempted } => write!(
                f,
                "{} spreadsheet(s) found in '{}', but none could be loaded",
                attempted,
                path.display()
            ),
            Advisory::NoRows { path } => {
                write!(f, "spreadsheets in '{}' contain no employee rows", path.display())
            }
        }
    }
}

/// A file that was skipped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct FileWarning {
    pub file_name: String,
    pub error: LoadError,
}

impl fmt::Display for FileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error processing {}: {}", self.file_name, self.error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Loaded(UnifiedTable),
    Empty(Advisory),
}

/// Result of one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingestion {
    pub outcome: IngestOutcome,
    pub warnings: Vec<FileWarning>,
    pub files_found: usize,
    pub files_loaded: usize,
}

impl Ingestion {
    /// The table, or the advisory explaining why there is none.
    pub fn table(&self) -> Result<&UnifiedTable, DashboardError> {
        match &self.outcome {
            IngestOutcome::Loaded(table) => Ok(table),
            IngestOutcome::Empty(advisory) => Err(DashboardError::NoData(advisory.clone())),
        }
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        match &self.outcome {
            IngestOutcome::Loaded(_) => None,
            IngestOutcome::Empty(advisory) => Some(advisory),
        }
    }

    fn empty(advisory: Advisory) -> Self {
        warn!(%advisory, "ingestion produced no data");
        Self {
            outcome: IngestOutcome::Empty(advisory),
            warnings: Vec::new(),
            files_found: 0,
            files_loaded: 0,
        }
    }
}

/// Spreadsheet files directly inside `dir`, sorted by file name.
pub fn discover_spreadsheets(dir: &Path, config: &PipelineConfig) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| config.is_spreadsheet(n))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Turn a coerced batch into records stamped with `period`.
///
/// Column positions follow the manifest's field order.
pub fn records_from_batch(batch: &CoercedBatch, period: &Period) -> Vec<Record> {
    let text = |col: usize, row: usize| batch.text[col].values[row].clone();
    let num = |col: usize, row: usize| batch.numeric[col].values[row];
    (0..batch.rows)
        .map(|row| Record {
            company_name: text(0, row),
            sex: text(1, row),
            employee_name: text(2, row),
            role: text(3, row),
            employee_type: text(4, row),
            ot70_saturday: num(0, row),
            ot70_weekday: num(1, row),
            ot100: num(2, row),
            paid_rest: num(3, row),
            production: num(4, row),
            production_reflex: num(5, row),
            net_remuneration: num(6, row),
            advance_payment: num(7, row),
            period_number: period.number,
            period_label: period.label.clone(),
        })
        .collect()
}

/// Run the per-file pipeline for one export.
pub fn ingest_file(path: &Path, config: &PipelineConfig) -> Result<Vec<Record>, LoadError> {
    let period = resolve_period(&file_name_of(path), config)?;
    let raw = load_raw_batch(path)?;
    let reconciled = reconcile(raw, &config.manifest, &config.text_sentinel);
    let coerced = coerce_batch(reconciled);
    Ok(records_from_batch(&coerced, &period))
}

/// Ingest every spreadsheet in `dir`.
pub fn ingest_directory(dir: &Path, config: &PipelineConfig) -> Ingestion {
    if !dir.is_dir() {
        return Ingestion::empty(Advisory::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    let files = match discover_spreadsheets(dir, config) {
        Ok(files) => files,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to list folder");
            return Ingestion::empty(Advisory::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
    };
    if files.is_empty() {
        return Ingestion::empty(Advisory::NoSpreadsheets {
            path: dir.to_path_buf(),
        });
    }

    let results: Vec<Result<Vec<Record>, LoadError>> = if config.parallel {
        files.par_iter().map(|p| ingest_file(p, config)).collect()
    } else {
        files.iter().map(|p| ingest_file(p, config)).collect()
    };

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    let mut files_loaded = 0usize;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(records) => {
                files_loaded += 1;
                rows.extend(records);
            }
            Err(error) => {
                let file_name = file_name_of(path);
                warn!(file = %file_name, %error, "skipping file");
                warnings.push(FileWarning { file_name, error });
            }
        }
    }

    info!(
        dir = %dir.display(),
        found = files.len(),
        loaded = files_loaded,
        rows = rows.len(),
        "ingestion finished"
    );

    let outcome = if files_loaded == 0 {
        IngestOutcome::Empty(Advisory::NothingLoaded {
            path: dir.to_path_buf(),
            attempted: files.len(),
        })
    } else {
        match UnifiedTable::from_rows(rows) {
            Some(table) => IngestOutcome::Loaded(table),
            None => IngestOutcome::Empty(Advisory::NoRows {
                path: dir.to_path_buf(),
            }),
        }
    };
    if let IngestOutcome::Empty(advisory) = &outcome {
        warn!(%advisory, "ingestion produced no data");
    }

    Ingestion {
        outcome,
        warnings,
        files_found: files.len(),
        files_loaded,
    }
}
