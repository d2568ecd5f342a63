// Spreadsheet loading.
//
// Reads the first worksheet of an `.xls`/`.xlsx` export into a `RawBatch`.
// No cleaning happens here; header text is kept exactly as exported.
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, ExcelDateTime, Range, Reader, Xls, Xlsx};
use chrono::NaiveTime;
use tracing::debug;

use crate::error::LoadError;
use crate::types::{Column, RawBatch, RawCell};
use crate::util::float_to_text;

/// Render a date cell as a calendar date instead of its Excel serial.
fn datetime_text(dt: &ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(at) if !dt.is_duration() => {
            if at.time() == NaiveTime::MIN {
                at.format("%Y-%m-%d").to_string()
            } else {
                at.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
        _ => float_to_text(dt.as_f64()),
    }
}

pub fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::DateTime(datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::DateTime(s.clone()),
        Data::Error(_) => RawCell::Error,
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Build a column-wise batch from sheet rows; the first row is the header.
///
/// Rows with no non-empty cell are dropped. Short rows are padded with
/// empty cells; cells beyond the header width are ignored.
pub fn batch_from_rows<'a, I>(mut rows: I) -> RawBatch
where
    I: Iterator<Item = &'a [Data]>,
{
    let Some(header_row) = rows.next() else {
        return RawBatch::default();
    };
    let mut columns: Vec<Column<RawCell>> = header_row
        .iter()
        .map(|c| Column::new(header_text(c), Vec::new()))
        .collect();

    let mut count = 0usize;
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        for (idx, col) in columns.iter_mut().enumerate() {
            let cell = row.get(idx).map(to_raw_cell).unwrap_or(RawCell::Empty);
            col.values.push(cell);
        }
        count += 1;
    }

    RawBatch {
        rows: count,
        columns,
    }
}

fn first_sheet<RS, R>(workbook: &mut R) -> Result<Range<Data>, LoadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoWorksheet)?;
    workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Sheet {
            sheet: sheet.clone(),
            reason: e.to_string(),
        })
}

type OpenSheet = fn(&Path) -> Result<Range<Data>, LoadError>;

fn open_first_sheet<R>(path: &Path) -> Result<Range<Data>, LoadError>
where
    R: Reader<BufReader<File>>,
    R::Error: Display,
{
    let mut workbook: R = open_workbook(path).map_err(|e: R::Error| LoadError::Open {
        reason: e.to_string(),
    })?;
    first_sheet::<BufReader<File>, R>(&mut workbook)
}

/// Load the first worksheet of a workbook.
///
/// The reader is picked from the extension, case-insensitively. Exports are
/// often saved with the wrong extension, so when that reader cannot open the
/// file the other format is tried before giving up.
pub fn load_raw_batch(path: &Path) -> Result<RawBatch, LoadError> {
    let is_xls = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xls"));

    let xls: OpenSheet = open_first_sheet::<Xls<BufReader<File>>>;
    let xlsx: OpenSheet = open_first_sheet::<Xlsx<BufReader<File>>>;
    let (first, second) = if is_xls { (xls, xlsx) } else { (xlsx, xls) };

    let range = match first(path) {
        Err(LoadError::Open { reason }) => {
            debug!(path = %path.display(), %reason, "retrying with the other workbook format");
            match second(path) {
                Err(LoadError::Open { .. }) => return Err(LoadError::Open { reason }),
                other => other?,
            }
        }
        other => other?,
    };

    Ok(batch_from_rows(range.rows()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn header_row_names_the_columns() {
        let rows = vec![
            vec![s("Nome da Empresa"), s("PRODUÇÃO")],
            vec![s("Obra A"), Data::Float(100.0)],
            vec![s("Obra B"), Data::Int(3)],
        ];
        let batch = batch_from_rows(rows.iter().map(|r| r.as_slice()));
        assert_eq!(batch.rows, 2);
        assert_eq!(batch.columns[0].name, "Nome da Empresa");
        assert_eq!(batch.columns[1].values, vec![RawCell::Float(100.0), RawCell::Int(3)]);
    }

    #[test]
    fn blank_rows_are_dropped_and_short_rows_padded() {
        let rows = vec![
            vec![s("Sexo"), s("TIPO")],
            vec![Data::Empty, Data::Empty],
            vec![s("F")],
            vec![Data::Empty, s("Direct"), s("ignored")],
        ];
        let batch = batch_from_rows(rows.iter().map(|r| r.as_slice()));
        assert_eq!(batch.rows, 2);
        assert_eq!(batch.columns[0].values, vec![RawCell::Text("F".into()), RawCell::Empty]);
        assert_eq!(
            batch.columns[1].values,
            vec![RawCell::Empty, RawCell::Text("Direct".into())]
        );
    }

    #[test]
    fn empty_sheet_yields_empty_batch() {
        let rows: Vec<Vec<Data>> = Vec::new();
        let batch = batch_from_rows(rows.iter().map(|r| r.as_slice()));
        assert_eq!(batch, RawBatch::default());
    }

    #[test]
    fn date_cells_render_as_calendar_dates() {
        use calamine::ExcelDateTimeType;

        let date = ExcelDateTime::new(45322.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            to_raw_cell(&Data::DateTime(date)),
            RawCell::DateTime("2024-01-31".into())
        );
        let with_time = ExcelDateTime::new(45322.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            to_raw_cell(&Data::DateTime(with_time)),
            RawCell::DateTime("2024-01-31 12:00:00".into())
        );
    }

    #[test]
    fn xlsx_content_behind_xls_extension_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01.Janeiro.xls");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Nome da Empresa").unwrap();
        sheet.write_string(1, 0, "Obra A").unwrap();
        workbook.save(&path).unwrap();

        let batch = load_raw_batch(&path).unwrap();
        assert_eq!(batch.rows, 1);
        assert_eq!(batch.columns[0].values, vec![RawCell::Text("Obra A".into())]);
    }

    #[test]
    fn unreadable_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01.Janeiro.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        assert!(matches!(load_raw_batch(&path), Err(LoadError::Open { .. })));
    }
}
