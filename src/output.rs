use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;
use crate::reports::Dashboard;
use crate::types::SummaryStats;

pub const HEADCOUNT_BY_PERIOD_FILE: &str = "report1_headcount_by_period.csv";
pub const HEADCOUNT_BY_SEX_FILE: &str = "report2_headcount_by_sex.csv";
pub const HEADCOUNT_BY_TYPE_FILE: &str = "report3_headcount_by_type.csv";
pub const PRODUCTION_WEIGHT_FILE: &str = "report4_production_weight_by_site.csv";
pub const OVERTIME_WEIGHT_FILE: &str = "report5_overtime_weight_by_site.csv";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

/// Write the five dashboard reports and the summary into `dir`.
///
/// Returns the paths written, in report order.
pub fn export_dashboard(
    dir: &Path,
    dashboard: &Dashboard,
    summary: &SummaryStats,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let paths = [
        HEADCOUNT_BY_PERIOD_FILE,
        HEADCOUNT_BY_SEX_FILE,
        HEADCOUNT_BY_TYPE_FILE,
        PRODUCTION_WEIGHT_FILE,
        OVERTIME_WEIGHT_FILE,
        SUMMARY_FILE,
    ]
    .map(|name| dir.join(name));

    write_csv(&paths[0], &dashboard.headcount_by_period)?;
    write_csv(&paths[1], &dashboard.headcount_by_sex)?;
    write_csv(&paths[2], &dashboard.headcount_by_type)?;
    write_csv(&paths[3], &dashboard.production_weight_by_site)?;
    write_csv(&paths[4], &dashboard.overtime_weight_by_site)?;
    write_json(&paths[5], summary)?;
    Ok(paths.to_vec())
}

/// Render up to `max_rows` rows as a markdown table.
pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table_rows(rows, max_rows));
}
