// ==========================================
// Appliance Registry - Sheet reader
// ==========================================
// Supports: Excel (.xlsx/.xlsm/.xls via calamine) / CSV (single sheet
// named after the file stem)
// Output: rows keyed by trimmed header, each carrying its sheet row
// number (header = row 1); fully blank rows are dropped
// ==========================================

use crate::domain::import::{RawRow, SheetRow};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Sheets};
use chrono::NaiveTime;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw cell grid of one sheet; each line carries its 1-based sheet row
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub lines: Vec<(usize, Vec<Option<String>>)>,
}

// ==========================================
// WorkbookSource Trait
// ==========================================
pub trait WorkbookSource {
    fn sheet_names(&self) -> Vec<String>;

    /// Grid of `sheet_name`; the name is known to exist
    fn sheet_grid(&mut self, sheet_name: &str) -> ImportResult<SheetGrid>;
}

// ==========================================
// Excel source
// ==========================================
pub struct ExcelWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet_grid(&mut self, sheet_name: &str) -> ImportResult<SheetGrid> {
        let range = self.sheets.worksheet_range(sheet_name)?;
        // the range starts at the first used cell, not necessarily A1
        let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);

        let lines = range
            .rows()
            .enumerate()
            .map(|(idx, cells)| (first_row + idx, cells.iter().map(cell_text).collect()))
            .collect();
        Ok(SheetGrid { lines })
    }
}

/// Cell → display text (None for empty/error cells)
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => non_empty(s),
        // 12.0 renders as "12"
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) if dt.is_duration() => Some(dt.as_f64().to_string()),
        Data::DateTime(dt) => excel_date_text(dt),
        other => non_empty(&other.to_string()),
    }
}

/// Largest serial Excel accepts (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Date cell → DD/MM/YYYY (ISO date-time when a time part is present)
///
/// calamine applies the workbook's 1900/1904 date system; serials outside
/// Excel's range are passed through as plain numbers
fn excel_date_text(dt: &ExcelDateTime) -> Option<String> {
    let serial = dt.as_f64();
    if !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return Some(serial.to_string());
    }
    let datetime = dt.as_datetime()?;
    if datetime.time() == NaiveTime::MIN {
        Some(datetime.format("%d/%m/%Y").to_string())
    } else {
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ==========================================
// CSV source
// ==========================================
pub struct CsvWorkbook {
    name: String,
    grid: SheetGrid,
}

impl CsvWorkbook {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string());

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut lines = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map_or(idx + 1, |pos| pos.line() as usize);
            lines.push((line, record.iter().map(non_empty).collect()));
        }

        Ok(Self {
            name,
            grid: SheetGrid { lines },
        })
    }
}

impl WorkbookSource for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn sheet_grid(&mut self, _sheet_name: &str) -> ImportResult<SheetGrid> {
        Ok(self.grid.clone())
    }
}

// ==========================================
// In-memory source
// ==========================================
/// Workbook assembled in code (rows given as text; "" = empty cell)
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, SheetGrid)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet; the first row is the header row
    pub fn with_sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let lines = rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| (idx + 1, cells.iter().map(|c| non_empty(c)).collect()))
            .collect();
        self.sheets.push((name.to_string(), SheetGrid { lines }));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet_grid(&mut self, sheet_name: &str) -> ImportResult<SheetGrid> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| ImportError::SheetNotFound(sheet_name.to_string()))
    }
}

// ==========================================
// Workbook - format-independent reader
// ==========================================
pub struct Workbook {
    source: Box<dyn WorkbookSource>,
}

impl Workbook {
    /// Opens a workbook, picking the source by file extension
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Self> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Self::from_source(CsvWorkbook::open(path)?)),
            "xlsx" | "xlsm" | "xls" => Ok(Self::from_source(ExcelWorkbook::open(path)?)),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    pub fn from_source<S: WorkbookSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.source.sheet_names()
    }

    pub fn has_sheet(&self, sheet_name: &str) -> bool {
        self.sheet_names().iter().any(|name| name == sheet_name)
    }

    /// Reads the data rows of a sheet (first sheet when `sheet_name` is None)
    ///
    /// # Errors
    /// - SheetNotFound: the named sheet does not exist
    pub fn read_rows(&mut self, sheet_name: Option<&str>) -> ImportResult<Vec<SheetRow>> {
        let names = self.sheet_names();
        let resolved = match sheet_name {
            Some(name) if names.iter().any(|n| n == name) => name.to_string(),
            Some(name) => return Err(ImportError::SheetNotFound(name.to_string())),
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?,
        };

        let grid = self.source.sheet_grid(&resolved)?;
        Ok(rows_from_grid(grid))
    }
}

/// Header line → keys; following lines → rows
fn rows_from_grid(grid: SheetGrid) -> Vec<SheetRow> {
    let mut lines = grid.lines.into_iter();
    let headers: Vec<Option<String>> = match lines.next() {
        Some((_, cells)) => cells
            .into_iter()
            .map(|cell| cell.and_then(|h| non_empty(h.trim_start_matches('\u{feff}'))))
            .collect(),
        None => return Vec::new(),
    };

    lines
        .filter_map(|(row_number, cells)| {
            let mut values = RawRow::new();
            for (idx, header) in headers.iter().enumerate() {
                if let Some(header) = header {
                    let cell = cells.get(idx).cloned().flatten();
                    // duplicate headers: first column wins
                    values.entry(header.clone()).or_insert(cell);
                }
            }
            if values.values().all(Option::is_none) {
                None
            } else {
                Some(SheetRow::new(row_number, values))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn value<'a>(row: &'a SheetRow, key: &str) -> Option<&'a str> {
        row.values.get(key).and_then(|v| v.as_deref())
    }

    #[test]
    fn test_csv_rows_keep_sheet_row_numbers() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, " fuelId ,fuelName").unwrap();
        writeln!(file, "FUEL001,Briquettes").unwrap();
        writeln!(file, ",").unwrap();
        writeln!(file, "FUEL002,  ").unwrap();
        file.flush().unwrap();

        let mut workbook = Workbook::open(file.path()).unwrap();
        assert_eq!(workbook.sheet_names().len(), 1);

        let rows = workbook.read_rows(None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(value(&rows[0], "fuelId"), Some("FUEL001"));
        assert_eq!(rows[1].row_number, 4);
        assert_eq!(value(&rows[1], "fuelName"), None);
    }

    #[test]
    fn test_unknown_sheet_is_reported() {
        let mut workbook = Workbook::from_source(
            MemoryWorkbook::new().with_sheet("Fuels", &[&["fuelId"], &["F1"]]),
        );
        let err = workbook.read_rows(Some("Appliances")).unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(ref name) if name == "Appliances"));
        assert_eq!(workbook.read_rows(Some("Fuels")).unwrap().len(), 1);
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let mut workbook =
            Workbook::from_source(MemoryWorkbook::new().with_sheet("Users", &[&["userId", "email"]]));
        assert!(workbook.read_rows(Some("Users")).unwrap().is_empty());
    }

    #[test]
    fn test_short_rows_yield_missing_cells() {
        let mut workbook = Workbook::from_source(
            MemoryWorkbook::new().with_sheet("Users", &[&["userId", "email", "city"], &["U1"]]),
        );
        let rows = workbook.read_rows(None).unwrap();
        assert_eq!(value(&rows[0], "userId"), Some("U1"));
        assert_eq!(rows[0].values.get("city"), Some(&None));
    }

    #[test]
    fn test_unsupported_and_missing_files() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            Workbook::open(file.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Workbook::open("/nonexistent/registry.xlsx"),
            Err(ImportError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(cell_text(&Data::Float(12.0)), Some("12".to_string()));
        assert_eq!(cell_text(&Data::Float(8.5)), Some("8.5".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("TRUE".to_string()));
        assert_eq!(cell_text(&Data::String("  ".to_string())), None);
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_date_cells_follow_workbook_date_system() {
        for name in ["dates-1900.xlsx", "dates-1904.xlsx"] {
            let mut workbook = Workbook::open(fixture(name)).unwrap();
            let rows = workbook.read_rows(Some("Appliances")).unwrap();
            assert_eq!(value(&rows[0], "Manual Date"), Some("01/07/2024"), "{}", name);
            assert_eq!(
                value(&rows[0], "Published Date"),
                Some("2024-07-01T12:00:00"),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_out_of_range_serials_stay_numeric() {
        let huge = ExcelDateTime::new(1e300, calamine::ExcelDateTimeType::DateTime, false);
        assert_eq!(excel_date_text(&huge), Some(1e300_f64.to_string()));
        let negative = ExcelDateTime::new(-5.0, calamine::ExcelDateTimeType::DateTime, false);
        assert_eq!(excel_date_text(&negative), Some("-5".to_string()));
    }

    #[test]
    fn test_early_1900_serials() {
        // serial 1 is 1900-01-01; serials below 60 precede Excel's phantom 1900-02-29
        let first = ExcelDateTime::new(1.0, calamine::ExcelDateTimeType::DateTime, false);
        assert_eq!(excel_date_text(&first), Some("01/01/1900".to_string()));
        let march = ExcelDateTime::new(61.0, calamine::ExcelDateTimeType::DateTime, false);
        assert_eq!(excel_date_text(&march), Some("01/03/1900".to_string()));
    }
}
