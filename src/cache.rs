// Memoized ingestion.
//
// Re-reading every workbook on each filter change is wasteful, so the last
// ingestion is kept together with a fingerprint of the folder it came from.
// The fingerprint covers the recognized file names, their sizes and their
// modification times; any change to those triggers a fresh ingestion.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::ingest::{discover_spreadsheets, ingest_directory, Ingestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Hex SHA-256 over the folder's spreadsheet listing.
pub fn directory_fingerprint(dir: &Path, config: &PipelineConfig) -> String {
    let mut hasher = Sha256::new();
    match discover_spreadsheets(dir, config) {
        Ok(files) => {
            for path in files {
                hasher.update(path.to_string_lossy().as_bytes());
                match fs::metadata(&path) {
                    Ok(meta) => {
                        hasher.update(meta.len().to_le_bytes());
                        let modified = meta
                            .modified()
                            .ok()
                            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                            .map(|d| d.as_nanos())
                            .unwrap_or_default();
                        hasher.update(modified.to_le_bytes());
                    }
                    Err(_) => hasher.update(b"unreadable"),
                }
                hasher.update([0u8]);
            }
        }
        Err(_) => hasher.update(b"missing"),
    }
    format!("{:x}", hasher.finalize())
}

#[derive(Debug)]
struct CacheEntry {
    dir: PathBuf,
    fingerprint: String,
    ingestion: Arc<Ingestion>,
}

/// Holds the most recent ingestion for one pipeline configuration.
#[derive(Debug)]
pub struct IngestCache {
    config: PipelineConfig,
    entry: Option<CacheEntry>,
}

impl IngestCache {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            entry: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Return the cached ingestion of `dir` if the folder is unchanged,
    /// otherwise ingest it again.
    pub fn get_or_ingest(&mut self, dir: &Path) -> (Arc<Ingestion>, CacheStatus) {
        let fingerprint = directory_fingerprint(dir, &self.config);
        if let Some(entry) = &self.entry {
            if entry.dir == dir && entry.fingerprint == fingerprint {
                debug!(dir = %dir.display(), "ingestion cache hit");
                return (Arc::clone(&entry.ingestion), CacheStatus::Hit);
            }
        }
        debug!(dir = %dir.display(), "ingestion cache miss");
        let ingestion = Arc::new(ingest_directory(dir, &self.config));
        self.entry = Some(CacheEntry {
            dir: dir.to_path_buf(),
            fingerprint,
            ingestion: Arc::clone(&ingestion),
        });
        (ingestion, CacheStatus::Miss)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
