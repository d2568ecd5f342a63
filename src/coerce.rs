// Numeric coercion for payroll columns.
//
// Any cell that is not a usable number becomes `0.0`. A malformed payroll
// cell must neither abort ingestion nor drop the employee's row.

use crate::types::{CoercedBatch, Column, RawCell, ReconciledBatch};
use crate::util::parse_f64_strict;

/// Convert one cell to a float; never fails, never yields NaN.
pub fn coerce_cell(cell: &RawCell) -> f64 {
    match cell {
        RawCell::Int(i) => *i as f64,
        RawCell::Float(f) if f.is_finite() => *f,
        RawCell::Text(s) => parse_f64_strict(s).unwrap_or(0.0),
        RawCell::Bool(true) => 1.0,
        RawCell::Float(_)
        | RawCell::Bool(false)
        | RawCell::Empty
        | RawCell::DateTime(_)
        | RawCell::Error => 0.0,
    }
}

pub fn coerce_column(column: Column<RawCell>) -> Column<f64> {
    let values = column.values.iter().map(coerce_cell).collect();
    Column::new(column.name, values)
}

/// Coerce every numeric column of a reconciled batch.
pub fn coerce_batch(batch: ReconciledBatch) -> CoercedBatch {
    CoercedBatch {
        rows: batch.rows,
        text: batch.text,
        numeric: batch.numeric.into_iter().map(coerce_column).collect(),
    }
}
