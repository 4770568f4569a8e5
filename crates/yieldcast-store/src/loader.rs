//! CSV loader for the historical yield dataset.
//!
//! Expected header columns (any order, extra columns ignored):
//!
//! | Column                          | Field         | Required |
//! |---------------------------------|---------------|----------|
//! | `Area`                          | `area`        | yes      |
//! | `Item`                          | `crop`        | yes      |
//! | `hg/ha_yield`                   | `yield_hg_ha` | yes      |
//! | `Year`                          | `year`        | no       |
//! | `average_rain_fall_mm_per_year` | `rainfall`    | no       |
//! | `pesticides_tonnes`             | `pesticides`  | no       |
//! | `avg_temp`                      | `temperature` | no       |
//!
//! A row is skipped when a required field is blank or any present numeric
//! field fails to parse. Blank or absent optional fields take their value
//! from [`FieldDefaults`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use yieldcast_core::{FieldDefaults, ObservationRecord, YieldError, YieldResult, normalize_label};

use crate::record_store::{DataSource, RecordStore};

pub const COL_AREA: &str = "Area";
pub const COL_ITEM: &str = "Item";
pub const COL_YEAR: &str = "Year";
pub const COL_RAINFALL: &str = "average_rain_fall_mm_per_year";
pub const COL_PESTICIDES: &str = "pesticides_tonnes";
pub const COL_TEMPERATURE: &str = "avg_temp";
pub const COL_YIELD: &str = "hg/ha_yield";

/// Outcome of a load: the store plus row accounting.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub store: RecordStore,
    /// Data rows examined (blank lines excluded).
    pub rows_seen: usize,
    /// Data rows dropped as malformed.
    pub rows_skipped: usize,
}

/// Why a single row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// A required field is absent or blank.
    MissingRequired(&'static str),
    /// A present field could not be coerced to its type.
    Unparseable { column: &'static str, value: String },
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    area: usize,
    item: usize,
    yield_hg_ha: usize,
    year: Option<usize>,
    rainfall: Option<usize>,
    pesticides: Option<usize>,
    temperature: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> YieldResult<Self> {
        let columns: Vec<String> = parse_csv_line(header.trim_start_matches('\u{feff}'))
            .into_iter()
            .map(|c| c.trim().to_owned())
            .collect();
        let find_col = |name: &str| columns.iter().position(|c| c == name);
        let require = |name: &str| {
            find_col(name).ok_or_else(|| YieldError::MissingColumn {
                column: name.to_owned(),
            })
        };

        Ok(Self {
            area: require(COL_AREA)?,
            item: require(COL_ITEM)?,
            yield_hg_ha: require(COL_YIELD)?,
            year: find_col(COL_YEAR),
            rainfall: find_col(COL_RAINFALL),
            pesticides: find_col(COL_PESTICIDES),
            temperature: find_col(COL_TEMPERATURE),
        })
    }
}

/// Read and parse the CSV file at `path`.
///
/// # Errors
///
/// Returns [`YieldError::SourceUnavailable`] if the file cannot be read, and
/// [`YieldError::EmptySource`] / [`YieldError::MissingColumn`] if the header
/// is unusable. Malformed data rows are skipped, not reported as errors.
#[instrument(name = "yieldcast::load", skip(defaults), fields(path = %path.display()))]
pub fn load_csv_path(path: &Path, defaults: &FieldDefaults) -> YieldResult<LoadReport> {
    let text = std::fs::read_to_string(path).map_err(|source| YieldError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_csv(
        &text,
        defaults,
        path,
        DataSource::File {
            path: path.to_path_buf(),
        },
    )?;
    info!(
        record_count = report.store.len(),
        rows_skipped = report.rows_skipped,
        areas = report.store.all_areas().len(),
        crops = report.store.all_crops().len(),
        "loaded historical data"
    );
    Ok(report)
}

/// Parse CSV text already in memory.
///
/// # Errors
///
/// Same header errors as [`load_csv_path`].
pub fn load_csv_str(text: &str, defaults: &FieldDefaults) -> YieldResult<LoadReport> {
    parse_csv(text, defaults, Path::new("<inline>"), DataSource::InMemory)
}

fn parse_csv(
    text: &str,
    defaults: &FieldDefaults,
    origin: &Path,
    source: DataSource,
) -> YieldResult<LoadReport> {
    let mut lines = text.lines();
    let header = lines
        .by_ref()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| YieldError::EmptySource {
            path: PathBuf::from(origin),
        })?;
    let columns = ColumnMap::from_header(header)?;

    let mut records = Vec::new();
    let mut rows_seen = 0;
    let mut rows_skipped = 0;

    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows_seen += 1;
        let fields = parse_csv_line(line);
        match parse_row(&fields, &columns, defaults) {
            Ok(record) => records.push(record),
            Err(reason) => {
                rows_skipped += 1;
                debug!(line = line_no + 2, ?reason, "skipping malformed row");
            }
        }
    }

    Ok(LoadReport {
        store: RecordStore::from_records(records, source),
        rows_seen,
        rows_skipped,
    })
}

/// Coerce one split row into a record.
///
/// # Errors
///
/// Returns the [`RowRejection`] describing the first problem found.
fn parse_row(
    fields: &[String],
    columns: &ColumnMap,
    defaults: &FieldDefaults,
) -> Result<ObservationRecord, RowRejection> {
    let cell = |idx: Option<usize>| {
        idx.and_then(|i| fields.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    };

    let area = cell(Some(columns.area)).ok_or(RowRejection::MissingRequired(COL_AREA))?;
    let item = cell(Some(columns.item)).ok_or(RowRejection::MissingRequired(COL_ITEM))?;
    let raw_yield =
        cell(Some(columns.yield_hg_ha)).ok_or(RowRejection::MissingRequired(COL_YIELD))?;

    Ok(ObservationRecord {
        area: normalize_label(area),
        crop: normalize_label(item),
        year: parse_year(cell(columns.year), defaults.year)?,
        rainfall: parse_non_negative(cell(columns.rainfall), COL_RAINFALL, defaults.rainfall)?,
        pesticides: parse_non_negative(
            cell(columns.pesticides),
            COL_PESTICIDES,
            defaults.pesticides,
        )?,
        temperature: parse_finite(
            cell(columns.temperature),
            COL_TEMPERATURE,
            defaults.temperature,
        )?,
        yield_hg_ha: parse_non_negative(Some(raw_yield), COL_YIELD, defaults.yield_hg_ha)?,
    })
}

/// A year that is not a plain digit string takes the default rather than
/// rejecting the row.
fn parse_year(value: Option<&str>, default: i32) -> Result<i32, RowRejection> {
    match value {
        Some(v) if v.bytes().all(|b| b.is_ascii_digit()) => {
            v.parse::<i32>().map_err(|_| RowRejection::Unparseable {
                column: COL_YEAR,
                value: v.to_owned(),
            })
        }
        _ => Ok(default),
    }
}

fn parse_finite(
    value: Option<&str>,
    column: &'static str,
    default: f64,
) -> Result<f64, RowRejection> {
    let Some(v) = value else {
        return Ok(default);
    };
    match v.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(RowRejection::Unparseable {
            column,
            value: v.to_owned(),
        }),
    }
}

fn parse_non_negative(
    value: Option<&str>,
    column: &'static str,
    default: f64,
) -> Result<f64, RowRejection> {
    let parsed = parse_finite(value, column, default)?;
    if parsed < 0.0 {
        return Err(RowRejection::Unparseable {
            column,
            value: value.unwrap_or_default().to_owned(),
        });
    }
    Ok(parsed)
}

/// Split one CSV line, honoring double-quoted fields and `""` escapes.
#[must_use]
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
