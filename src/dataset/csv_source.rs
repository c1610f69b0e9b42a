//! CSV-backed table source.
//!
//! Reads a CSV file with the `csv` crate and validates it against the
//! fixed session schema. Header order does not matter and extra columns
//! are ignored.

use super::{Dataset, TableSource};
use crate::error::{PipelineError, SchemaError};
use crate::models::{Column, Record};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a [`CsvSource`] finds its tables.
#[derive(Debug, Clone)]
enum Location {
    /// Every table name resolves to this file.
    File(PathBuf),
    /// Table `name` resolves to `<dir>/<name>.csv`.
    Directory(PathBuf),
}

/// Loads tables from CSV files on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    location: Location,
}

impl CsvSource {
    /// Serve every table from a single CSV file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
        }
    }

    /// Serve tables from `<dir>/<name>.csv`.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::Directory(dir.into()),
        }
    }

    /// Path the named table is read from.
    pub fn path_for(&self, name: &str) -> PathBuf {
        match &self.location {
            Location::File(path) => path.clone(),
            Location::Directory(dir) => dir.join(format!("{}.csv", name)),
        }
    }
}

impl TableSource for CsvSource {
    fn load_table(&self, name: &str) -> Result<Dataset, PipelineError> {
        let path = self.path_for(name);
        info!("Loading table `{}` from {}", name, path.display());

        let file = File::open(&path).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        let records = parse_records(file)?;

        Ok(Dataset::new(name, path.display().to_string(), records))
    }
}

/// Parse session records from CSV data.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<Record>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| row_error(e, 0))?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(SchemaError::EmptyHeader.into());
    }
    let layout = ColumnLayout::resolve(&headers)?;
    debug!("Resolved column layout: {:?}", layout);

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| row_error(e, i + 1))?;
        records.push(layout.parse_row(&row, i + 1)?);
    }

    debug!("Parsed {} records", records.len());
    Ok(records)
}

/// Classify a reader error. Shape and encoding problems in a row are
/// schema errors; anything else is left as a CSV read failure.
fn row_error(err: csv::Error, row: usize) -> PipelineError {
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8 in field {}", err.field() + 1),
        _ => return PipelineError::Csv(err),
    };
    SchemaError::MalformedRow { row, reason }.into()
}

/// Header index of every schema column.
#[derive(Debug)]
struct ColumnLayout {
    indices: [usize; 9],
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SchemaError> {
        let mut indices = [0usize; 9];
        let mut missing = Vec::new();

        for (slot, column) in indices.iter_mut().zip(Column::ALL) {
            match headers.iter().position(|h| h == column.name()) {
                Some(index) => *slot = index,
                None => missing.push(column.name().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }

    fn cell<'r>(&self, row: &'r csv::StringRecord, column: Column) -> &'r str {
        let slot = Column::ALL
            .iter()
            .position(|c| *c == column)
            .unwrap_or_default();
        row.get(self.indices[slot]).unwrap_or("")
    }

    fn parse_row(&self, row: &csv::StringRecord, line: usize) -> Result<Record, SchemaError> {
        let cell = |column: Column| Cell {
            raw: self.cell(row, column),
            row: line,
            column: column.name(),
        };

        Ok(Record {
            hours_coding: cell(Column::HoursCoding).non_negative()?,
            commits: cell(Column::Commits).count()?,
            bugs_reported: cell(Column::BugsReported).count()?,
            ai_usage_hours: cell(Column::AiUsageHours).optional_non_negative()?,
            task_success: cell(Column::TaskSuccess).flag()?,
            cognitive_load: cell(Column::CognitiveLoad).number()?,
            coffee_intake_mg: cell(Column::CoffeeIntakeMg).number()?,
            distractions: cell(Column::Distractions).number()?,
            sleep_hours: cell(Column::SleepHours).number()?,
        })
    }
}

/// A single raw cell with enough context to report a bad value.
struct Cell<'a> {
    raw: &'a str,
    row: usize,
    column: &'static str,
}

impl Cell<'_> {
    fn invalid(&self, expected: &'static str) -> SchemaError {
        SchemaError::InvalidValue {
            row: self.row,
            column: self.column,
            value: self.raw.to_string(),
            expected,
        }
    }

    fn is_null(&self) -> bool {
        self.raw.is_empty()
            || ["na", "nan", "null", "none"]
                .iter()
                .any(|n| self.raw.eq_ignore_ascii_case(n))
    }

    fn number(&self) -> Result<f64, SchemaError> {
        self.raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid("a number"))
    }

    fn non_negative(&self) -> Result<f64, SchemaError> {
        self.raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| self.invalid("a non-negative number"))
    }

    fn optional_non_negative(&self) -> Result<Option<f64>, SchemaError> {
        if self.is_null() {
            return Ok(None);
        }
        self.non_negative().map(Some)
    }

    fn count(&self) -> Result<u32, SchemaError> {
        if let Ok(v) = self.raw.parse::<u32>() {
            return Ok(v);
        }
        // Integral floats such as "7.0" come out of spreadsheet exports.
        match self.raw.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) => Ok(v as u32),
            _ => Err(self.invalid("a non-negative integer")),
        }
    }

    fn flag(&self) -> Result<bool, SchemaError> {
        match self.raw.to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" => Ok(false),
            _ => Err(self.invalid("0 or 1")),
        }
    }
}

/// Check that a path looks like a CSV file we can read.
pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "hours_coding,coffee_intake_mg,distractions,sleep_hours,commits,bugs_reported,ai_usage_hours,cognitive_load,task_success";

    fn parse(body: &str) -> Result<Vec<Record>, PipelineError> {
        parse_records(format!("{}\n{}", HEADER, body).as_bytes())
    }

    #[test]
    fn test_parse_valid_rows() {
        let records = parse("5.99,600,1,5.8,2,1,0.71,5.4,1\n4.5,200,3,7.2,7.0,0,,3.1,0\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hours_coding, 5.99);
        assert_eq!(records[0].commits, 2);
        assert_eq!(records[0].ai_usage_hours, Some(0.71));
        assert!(records[0].task_success);
        assert_eq!(records[1].commits, 7);
        assert_eq!(records[1].ai_usage_hours, None);
        assert!(!records[1].task_success);
    }

    #[test]
    fn test_header_order_and_extra_columns() {
        let data = "task_success,commits,developer,bugs_reported,ai_usage_hours,hours_coding,cognitive_load,coffee_intake_mg,distractions,sleep_hours\n1,8,alice,0,1.5,6,4,300,2,7\n";
        let records = parse_records(data.as_bytes()).unwrap();

        assert_eq!(records[0].commits, 8);
        assert_eq!(records[0].ai_usage_hours, Some(1.5));
        assert_eq!(records[0].sleep_hours, 7.0);
    }

    #[test]
    fn test_missing_columns() {
        let data = "hours_coding,commits\n1,2\n";
        let err = parse_records(data.as_bytes()).unwrap_err();

        match err {
            PipelineError::Configuration(SchemaError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), 7);
                assert!(missing.contains(&"task_success".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_cell_reports_row_and_column() {
        let err = parse("5,600,1,5.8,2,1,0.7,5.4,1\n5,600,1,5.8,lots,1,0.7,5.4,1\n").unwrap_err();

        match err {
            PipelineError::Configuration(SchemaError::InvalidValue { row, column, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "commits");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_flag_and_negative_hours() {
        assert!(parse("5,600,1,5.8,2,1,0.7,5.4,yes\n").is_err());
        assert!(parse("-1,600,1,5.8,2,1,0.7,5.4,1\n").is_err());
        assert!(parse("5,600,1,5.8,2,1,-0.5,5.4,1\n").is_err());
        assert!(parse("5,600,1,5.8,2.5,1,0.5,5.4,1\n").is_err());
    }

    #[test]
    fn test_null_usage_markers() {
        let records = parse("5,600,1,5.8,2,1,NA,5.4,1\n5,600,1,5.8,2,1,null,5.4,true\n").unwrap();
        assert!(records.iter().all(|r| r.ai_usage_hours.is_none()));
        assert!(records[1].task_success);
    }

    #[test]
    fn test_ragged_row_is_schema_error() {
        let err = parse("5,600,1,5.8,2,1,0.7,5.4,1\n5,600,1,5.8,2\n").unwrap_err();

        assert!(err.is_configuration());
        match err {
            PipelineError::Configuration(SchemaError::MalformedRow { row, reason }) => {
                assert_eq!(row, 2);
                assert_eq!(reason, "expected 9 fields, found 5");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_cell_is_schema_error() {
        let mut data = format!("{}\n5,600,1,5.8,2,1,0.7,5.4,", HEADER).into_bytes();
        data.extend_from_slice(&[0xff, b'\n']);

        let err = parse_records(data.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(SchemaError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        let err = parse_records("".as_bytes()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_header_only_yields_empty_dataset() {
        let records = parse("").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_table_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("sessions.csv")).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "6,400,2,7,8,0,1.5,4,1").unwrap();

        let source = CsvSource::directory(dir.path());
        let dataset = source.load_table("sessions").unwrap();

        assert_eq!(dataset.name(), "sessions");
        assert_eq!(dataset.len(), 1);
        assert!(matches!(
            source.load_table("missing"),
            Err(PipelineError::Io { .. })
        ));
    }

    #[test]
    fn test_is_csv_path() {
        assert!(is_csv_path(Path::new("data/ai_dev.csv")));
        assert!(is_csv_path(Path::new("DATA.CSV")));
        assert!(!is_csv_path(Path::new("data.json")));
    }
}
