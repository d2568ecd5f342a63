// Schema reconciliation.
//
// Exports are produced independently each month and drift in which columns
// they carry. Every batch is mapped onto the canonical manifest so that all
// batches share one column set before they are concatenated.

use std::collections::HashMap;

use tracing::debug;

use crate::config::ColumnManifest;
use crate::types::{Column, RawBatch, RawCell, ReconciledBatch};
use crate::util::float_to_text;

/// Turn a raw cell into cleaned text; null-like cells become the sentinel.
pub fn cell_to_text(cell: &RawCell, sentinel: &str) -> String {
    match cell {
        RawCell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                sentinel.to_string()
            } else {
                trimmed.to_string()
            }
        }
        RawCell::Int(i) => i.to_string(),
        RawCell::Float(f) if f.is_finite() => float_to_text(*f),
        RawCell::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        RawCell::DateTime(s) => s.clone(),
        RawCell::Float(_) | RawCell::Empty | RawCell::Error => sentinel.to_string(),
    }
}

/// Restrict and extend `raw` to exactly the manifest's columns.
///
/// Absent text columns are filled with `sentinel`, absent numeric columns
/// with zero. Columns outside the manifest are dropped. When a header is
/// repeated, the first occurrence wins.
pub fn reconcile(raw: RawBatch, manifest: &ColumnManifest, sentinel: &str) -> ReconciledBatch {
    let rows = raw.rows;
    let mut slots: Vec<Option<Column<RawCell>>> = raw.columns.into_iter().map(Some).collect();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for (idx, col) in slots.iter().enumerate() {
        if let Some(col) = col {
            by_name.entry(col.name.clone()).or_insert(idx);
        }
    }
    let mut take = |name: &str| -> Option<Column<RawCell>> {
        by_name
            .get(name)
            .and_then(|idx| slots.get_mut(*idx))
            .and_then(Option::take)
    };

    let text = manifest
        .text_headers()
        .into_iter()
        .map(|name| match take(name) {
            Some(col) => {
                let values = col
                    .values
                    .iter()
                    .map(|cell| cell_to_text(cell, sentinel))
                    .collect();
                Column::new(name, values)
            }
            None => {
                debug!(column = name, "synthesizing absent text column");
                Column::new(name, vec![sentinel.to_string(); rows])
            }
        })
        .collect();

    let numeric = manifest
        .numeric_headers()
        .into_iter()
        .map(|name| match take(name) {
            Some(col) => Column::new(name, col.values),
            None => {
                debug!(column = name, "synthesizing absent numeric column");
                Column::new(name, vec![RawCell::Int(0); rows])
            }
        })
        .collect();

    ReconciledBatch {
        rows,
        text,
        numeric,
    }
}
