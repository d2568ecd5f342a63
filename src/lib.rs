// Library half of the workforce dashboard.
//
// The pipeline runs one way: a folder of monthly payroll spreadsheets is
// ingested into a `UnifiedTable`, a `Selection` narrows it to a
// `FilteredView`, ratios are attached, and `reports` turns the result into
// the aggregates the dashboard shows.
pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod output;
pub mod period;
pub mod ratios;
pub mod reconcile;
pub mod reports;
pub mod types;
pub mod util;

pub use cache::{CacheStatus, IngestCache};
pub use config::{ColumnManifest, PipelineConfig};
pub use error::{DashboardError, LoadError};
pub use filter::{Selection, SiteSelection};
pub use ingest::{ingest_directory, Advisory, FileWarning, IngestOutcome, Ingestion};
pub use reports::Dashboard;
pub use types::{Record, UnifiedTable};
