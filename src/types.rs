use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::util::format_optional;

/// A spreadsheet cell as read from the workbook, before any cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Dates as `YYYY-MM-DD` (with the time when it is not midnight);
    /// durations as their serial value.
    DateTime(String),
    /// Spreadsheet error values such as `#DIV/0!`.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    pub name: String,
    pub values: Vec<T>,
}

impl<T> Column<T> {
    pub fn new(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// The first worksheet of one file, column by column, headers as found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBatch {
    pub rows: usize,
    pub columns: Vec<Column<RawCell>>,
}

/// A batch restricted/extended to exactly the canonical columns.
///
/// Text cells are already cleaned; numeric cells still await coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledBatch {
    pub rows: usize,
    pub text: Vec<Column<String>>,
    pub numeric: Vec<Column<RawCell>>,
}

/// A reconciled batch whose numeric columns hold plain floats.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedBatch {
    pub rows: usize,
    pub text: Vec<Column<String>>,
    pub numeric: Vec<Column<f64>>,
}

impl ReconciledBatch {
    pub fn column_names(&self) -> Vec<&str> {
        self.text
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.numeric.iter().map(|c| c.name.as_str()))
            .collect()
    }
}

impl CoercedBatch {
    pub fn column_names(&self) -> Vec<&str> {
        self.text
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.numeric.iter().map(|c| c.name.as_str()))
            .collect()
    }
}

/// One employee observed in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub company_name: String,
    pub sex: String,
    pub employee_name: String,
    pub role: String,
    pub employee_type: String,
    pub ot70_saturday: f64,
    pub ot70_weekday: f64,
    pub ot100: f64,
    pub paid_rest: f64,
    pub production: f64,
    pub production_reflex: f64,
    pub net_remuneration: f64,
    pub advance_payment: f64,
    pub period_number: u32,
    pub period_label: String,
}

impl Record {
    /// Net remuneration left after the advance; the shared ratio denominator.
    pub fn base(&self) -> f64 {
        self.net_remuneration - self.advance_payment
    }

    pub fn production_total(&self) -> f64 {
        self.production + self.production_reflex
    }

    pub fn overtime_total(&self) -> f64 {
        self.ot70_saturday + self.ot70_weekday + self.ot100 + self.paid_rest
    }
}

/// Every record from every successfully ingested file.
///
/// Only constructed with at least one row; an empty ingestion is reported
/// through `IngestOutcome::Empty` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedTable {
    rows: Vec<Record>,
}

impl UnifiedTable {
    pub(crate) fn from_rows(rows: Vec<Record>) -> Option<Self> {
        if rows.is_empty() {
            None
        } else {
            Some(Self { rows })
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn display_weight(v: &Option<f64>) -> String {
    format_optional(*v, 4)
}

/// Unique employees per (period, type), over the whole table.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct PeriodHeadcountRow {
    #[serde(rename = "MonthNumber")]
    #[tabled(rename = "MonthNumber")]
    pub period_number: u32,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub period_label: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub employee_type: String,
    #[serde(rename = "Headcount")]
    #[tabled(rename = "Headcount")]
    pub headcount: usize,
}

/// Unique employees per category (sex or type), over the filtered view.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CategoryHeadcountRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Headcount")]
    #[tabled(rename = "Headcount")]
    pub headcount: usize,
}

/// Mean of one ratio per work site, over the filtered view.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SiteWeightRow {
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub company_name: String,
    #[serde(rename = "MeanWeight")]
    #[tabled(rename = "MeanWeight", display_with = "display_weight")]
    pub mean_weight: Option<f64>,
    #[serde(rename = "Rows")]
    #[tabled(rename = "Rows")]
    pub rows: usize,
    #[serde(rename = "UndefinedRows")]
    #[tabled(rename = "UndefinedRows")]
    pub undefined_rows: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryStats {
    pub generated_at: DateTime<Utc>,
    pub files_found: usize,
    pub files_loaded: usize,
    pub skipped_files: Vec<String>,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub unique_employees: usize,
    pub total_sites: usize,
    pub total_periods: usize,
    pub undefined_ratio_rows: usize,
    pub avg_production_weight: Option<f64>,
    pub avg_overtime_weight: Option<f64>,
}
