// Production and overtime weights.
//
// Both ratios share the denominator `net_remuneration - advance_payment`.
// A zero denominator leaves the ratio undefined (`None`), which keeps it out
// of later means instead of counting as zero. Values are neither clamped
// nor rounded.

use serde::Serialize;

use crate::filter::FilteredView;
use crate::types::Record;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Ratios {
    pub production_weight: Option<f64>,
    pub overtime_weight: Option<f64>,
}

impl Ratios {
    pub fn is_undefined(&self) -> bool {
        self.production_weight.is_none() && self.overtime_weight.is_none()
    }
}

pub fn compute_ratios(record: &Record) -> Ratios {
    let base = record.base();
    if base == 0.0 {
        return Ratios::default();
    }
    Ratios {
        production_weight: Some(record.production_total() / base),
        overtime_weight: Some(record.overtime_total() / base),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatedRecord {
    pub record: Record,
    pub ratios: Ratios,
}

/// A filtered view with ratios attached to every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatedView {
    rows: Vec<RatedRecord>,
}

impl RatedView {
    pub fn rows(&self) -> &[RatedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Attach ratios to each row of `view`.
pub fn rate(view: FilteredView) -> RatedView {
    let rows = view
        .into_rows()
        .into_iter()
        .map(|record| {
            let ratios = compute_ratios(&record);
            RatedRecord { record, ratios }
        })
        .collect();
    RatedView { rows }
}
