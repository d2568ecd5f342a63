use std::collections::{BTreeMap, HashSet};

use chrono::Utc;

use crate::filter::{self, FilteredView, Selection};
use crate::ingest::Ingestion;
use crate::ratios::{rate, RatedView, Ratios};
use crate::types::{
    CategoryHeadcountRow, PeriodHeadcountRow, Record, SiteWeightRow, SummaryStats, UnifiedTable,
};
use crate::util::mean_defined;

/// Unique employee names per (period number, period label, type).
///
/// Computed over the unfiltered table: the monthly trend always shows every
/// period regardless of the period filter.
pub fn headcount_by_period(table: &UnifiedTable) -> Vec<PeriodHeadcountRow> {
    let mut map: BTreeMap<(u32, &str, &str), HashSet<&str>> = BTreeMap::new();
    for r in table.rows() {
        map.entry((r.period_number, r.period_label.as_str(), r.employee_type.as_str()))
            .or_default()
            .insert(r.employee_name.as_str());
    }
    map.into_iter()
        .map(|((period_number, label, employee_type), names)| PeriodHeadcountRow {
            period_number,
            period_label: label.to_string(),
            employee_type: employee_type.to_string(),
            headcount: names.len(),
        })
        .collect()
}

fn headcount_by<F>(rows: &[Record], key: F) -> Vec<CategoryHeadcountRow>
where
    F: Fn(&Record) -> &str,
{
    let mut map: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for r in rows {
        map.entry(key(r)).or_default().insert(r.employee_name.as_str());
    }
    map.into_iter()
        .map(|(group, names)| CategoryHeadcountRow {
            group: group.to_string(),
            headcount: names.len(),
        })
        .collect()
}

pub fn headcount_by_sex(view: &FilteredView) -> Vec<CategoryHeadcountRow> {
    headcount_by(view.rows(), |r| r.sex.as_str())
}

pub fn headcount_by_type(view: &FilteredView) -> Vec<CategoryHeadcountRow> {
    headcount_by(view.rows(), |r| r.employee_type.as_str())
}

fn weight_by_site<F>(rated: &RatedView, pick: F) -> Vec<SiteWeightRow>
where
    F: Fn(&Ratios) -> Option<f64>,
{
    let mut map: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for row in rated.rows() {
        map.entry(row.record.company_name.as_str())
            .or_default()
            .push(pick(&row.ratios));
    }
    map.into_iter()
        .map(|(site, weights)| SiteWeightRow {
            company_name: site.to_string(),
            rows: weights.len(),
            undefined_rows: weights.iter().filter(|w| w.is_none()).count(),
            mean_weight: mean_defined(weights),
        })
        .collect()
}

/// Mean production weight per site; undefined ratios are left out.
pub fn production_weight_by_site(rated: &RatedView) -> Vec<SiteWeightRow> {
    weight_by_site(rated, |r| r.production_weight)
}

/// Mean overtime weight per site; undefined ratios are left out.
pub fn overtime_weight_by_site(rated: &RatedView) -> Vec<SiteWeightRow> {
    weight_by_site(rated, |r| r.overtime_weight)
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub selection: Selection,
    pub rated: RatedView,
    pub headcount_by_period: Vec<PeriodHeadcountRow>,
    pub headcount_by_sex: Vec<CategoryHeadcountRow>,
    pub headcount_by_type: Vec<CategoryHeadcountRow>,
    pub production_weight_by_site: Vec<SiteWeightRow>,
    pub overtime_weight_by_site: Vec<SiteWeightRow>,
}

impl Dashboard {
    /// Filter, rate and aggregate. Safe to call again on every selection
    /// change; the table is never modified.
    pub fn build(table: &UnifiedTable, selection: &Selection) -> Self {
        let view = filter::apply(table, selection);
        let headcount_by_sex = headcount_by_sex(&view);
        let headcount_by_type = headcount_by_type(&view);
        let rated = rate(view);
        Self {
            selection: selection.clone(),
            headcount_by_period: headcount_by_period(table),
            headcount_by_sex,
            headcount_by_type,
            production_weight_by_site: production_weight_by_site(&rated),
            overtime_weight_by_site: overtime_weight_by_site(&rated),
            rated,
        }
    }
}

pub fn generate_summary(
    ingestion: &Ingestion,
    table: &UnifiedTable,
    dashboard: &Dashboard,
) -> SummaryStats {
    let rated = dashboard.rated.rows();
    let employees: HashSet<&str> = table.rows().iter().map(|r| r.employee_name.as_str()).collect();
    SummaryStats {
        generated_at: Utc::now(),
        files_found: ingestion.files_found,
        files_loaded: ingestion.files_loaded,
        skipped_files: ingestion
            .warnings
            .iter()
            .map(|w| w.file_name.clone())
            .collect(),
        total_rows: table.len(),
        filtered_rows: rated.len(),
        unique_employees: employees.len(),
        total_sites: filter::available_sites(table).len(),
        total_periods: filter::available_periods(table).len(),
        undefined_ratio_rows: rated.iter().filter(|r| r.ratios.is_undefined()).count(),
        avg_production_weight: mean_defined(rated.iter().map(|r| r.ratios.production_weight)),
        avg_overtime_weight: mean_defined(rated.iter().map(|r| r.ratios.overtime_weight)),
    }
}
