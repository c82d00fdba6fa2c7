use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};

/// A single spreadsheet cell, reduced to the shapes the converter cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(value) => value.is_nan(),
            Self::Text(value) => value.trim().is_empty(),
            Self::Bool(_) => false,
        }
    }

    /// Trimmed string form. Integral numbers lose their fractional part.
    pub fn render(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(value) if value.is_nan() => String::new(),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.trim().to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }

    /// Best-effort integer coercion: parse as a float, truncate toward zero.
    pub fn as_int(&self) -> Option<i64> {
        let value = match self {
            Self::Empty => return None,
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Bool(flag) => f64::from(u8::from(*flag)),
        };
        if !value.is_finite() || value.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(value.trunc() as i64)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(value) => Self::Number(*value as f64),
            Data::Float(value) => Self::Number(*value),
            Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
                Self::text(value)
            }
            Data::Bool(value) => Self::Bool(*value),
            Data::DateTime(value) => Self::Number(value.as_f64()),
            Data::Error(_) | Data::Empty => Self::Empty,
        }
    }
}

/// Header row plus data rows of one worksheet.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&Cell::Empty)
    }

    fn from_rows(mut rows: impl Iterator<Item = Vec<Cell>>) -> Self {
        let headers = rows
            .next()
            .map(|cells| cells.iter().map(Cell::render).collect())
            .unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }
}

pub fn load_sheet(path: &Path, sheet_name: Option<&str>) -> Result<Sheet> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        load_csv(path)
    } else {
        load_workbook(path, sheet_name)
    }
}

fn load_workbook(path: &Path, sheet_name: Option<&str>) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let range = match sheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .with_context(|| format!("failed to read sheet '{name}' in {}", path.display()))?,
        None => workbook
            .worksheet_range_at(0)
            .with_context(|| format!("workbook has no sheets: {}", path.display()))?
            .with_context(|| format!("failed to read first sheet in {}", path.display()))?,
    };

    Ok(Sheet::from_rows(
        range.rows().map(|row| row.iter().map(Cell::from).collect()),
    ))
}

fn load_csv(path: &Path) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open csv: {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to read csv row {} in {}", index + 1, path.display()))?;
        rows.push(record.iter().map(Cell::text).collect::<Vec<_>>());
    }

    Ok(Sheet::from_rows(rows.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_drops_fraction_of_integral_numbers() {
        assert_eq!(Cell::Number(4.0).render(), "4");
        assert_eq!(Cell::Number(4.5).render(), "4.5");
        assert_eq!(Cell::text("  S1 ").render(), "S1");
        assert_eq!(Cell::Empty.render(), "");
    }

    #[test]
    fn as_int_truncates_and_rejects_garbage() {
        assert_eq!(Cell::text("3.9").as_int(), Some(3));
        assert_eq!(Cell::Number(-2.5).as_int(), Some(-2));
        assert_eq!(Cell::text("n/a").as_int(), None);
        assert_eq!(Cell::Number(f64::NAN).as_int(), None);
        assert_eq!(Cell::Empty.as_int(), None);
    }

    #[test]
    fn load_csv_reads_header_and_ragged_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("design.csv");
        std::fs::write(&path, "Session,City\nS1, City 2\nS2\n").expect("write csv");

        let sheet = load_sheet(&path, None).expect("load");
        assert_eq!(sheet.headers, vec!["Session", "City"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(0, 1), &Cell::Text("City 2".to_string()));
        assert_eq!(sheet.cell(1, 1), &Cell::Empty);
    }

    fn write_two_sheet_workbook(path: &Path) {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let design = workbook.add_worksheet().set_name("Design").expect("name");
        design.write_string(0, 0, "City").expect("header");
        design.write_string(0, 1, "Trial").expect("header");
        design.write_number(1, 0, 4.0).expect("city");
        design.write_number(1, 1, 4.0).expect("trial");

        let practice = workbook.add_worksheet().set_name("Practice").expect("name");
        practice.write_string(0, 0, "City").expect("header");
        practice.write_string(1, 0, "City 7").expect("city");

        workbook.save(path).expect("save workbook");
    }

    #[test]
    fn load_workbook_reads_first_sheet_by_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("design.xlsx");
        write_two_sheet_workbook(&path);

        let sheet = load_sheet(&path, None).expect("load");
        assert_eq!(sheet.headers, vec!["City", "Trial"]);
        assert_eq!(sheet.cell(0, 0), &Cell::Number(4.0));
        assert_eq!(crate::convert::city::canon_city(sheet.cell(0, 0)), "City4");
        assert_eq!(sheet.cell(0, 1).as_int(), Some(4));
    }

    #[test]
    fn load_workbook_selects_named_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("design.xlsx");
        write_two_sheet_workbook(&path);

        let sheet = load_sheet(&path, Some("Practice")).expect("load");
        assert_eq!(sheet.headers, vec!["City"]);
        assert_eq!(sheet.cell(0, 0), &Cell::Text("City 7".to_string()));

        assert!(load_sheet(&path, Some("Missing")).is_err());
    }
}
