#![allow(dead_code)]

use std::path::Path;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

pub const COMPANY: &str = "Nome da Empresa";
pub const SEX: &str = "Sexo";
pub const NAME: &str = "Nome do funcionário";
pub const ROLE: &str = "Função";
pub const TYPE: &str = "TIPO";
pub const PRODUCTION: &str = "PRODUÇÃO";
pub const REFLEX: &str = "REFLEXO S/ PRODUÇÃO";
pub const NET: &str = "Remuneração Líquida";
pub const ADVANCE: &str = "Adiantamento 2";
pub const OT100: &str = "Hora Extra 100% (Qtde)";

#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Num(f64),
    Flag(bool),
    Date(u16, u8, u8),
    Blank,
}

#[allow(unused_imports)]
pub use Cell::{Blank, Date, Flag, Num, Text};

/// Write a single-sheet workbook with a header row followed by `rows`.
pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                Cell::Num(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                Cell::Flag(b) => {
                    sheet.write_boolean(r, col, *b).unwrap();
                }
                Cell::Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                    sheet.write_datetime_with_format(r, col, &date, &date_format).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Headcount-only export: site, name, type.
pub fn write_headcount(path: &Path, site: &'static str, people: &[(&'static str, &'static str)]) {
    let rows: Vec<Vec<Cell>> = people
        .iter()
        .map(|(name, kind)| vec![Text(site), Text(name), Text(kind)])
        .collect();
    write_workbook(path, &[COMPANY, NAME, TYPE], &rows);
}
