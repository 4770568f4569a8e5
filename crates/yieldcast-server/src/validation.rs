//! Request decoding and validation for `POST /api/predict`.
//!
//! Validation happens here, before a query reaches the engine. The engine
//! assumes a well-formed query and never re-checks these bounds.

use serde::Deserialize;
use yieldcast_core::{InputBounds, YieldError, YieldQuery, YieldResult, normalize_label};
use yieldcast_store::RecordStore;

/// Number of known values quoted back when an area or crop is rejected.
pub const AVAILABLE_PREVIEW_LEN: usize = 10;

const DEFAULT_YEAR: i32 = 2024;
const DEFAULT_RAINFALL: f64 = 1000.0;
const DEFAULT_PESTICIDES: f64 = 100.0;
const DEFAULT_TEMPERATURE: f64 = 20.0;

/// A JSON number, or a string holding one (`"2020"`, `" 1200.5 "`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view: numbers truncate toward zero, strings must be integral.
    fn as_i64(&self) -> Option<i64> {
        match self {
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for NumericField {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Body of `POST /api/predict`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub year: Option<NumericField>,
    #[serde(default)]
    pub rainfall: Option<NumericField>,
    #[serde(default)]
    pub pesticides: Option<NumericField>,
    #[serde(default)]
    pub temperature: Option<NumericField>,
}

/// Decode and check `request` against the store's known labels and `bounds`.
///
/// Numbers are decoded first. Checks then run in a fixed order (area, crop,
/// year, rainfall, pesticides, temperature) and the first failure is returned.
///
/// # Errors
///
/// - `YieldError::InvalidQuery` for unparseable, non-finite or out-of-range numbers.
/// - `YieldError::UnknownCategory` for an area or crop absent from `store`.
pub fn validate_request(
    request: &PredictRequest,
    store: &RecordStore,
    bounds: &InputBounds,
) -> YieldResult<YieldQuery> {
    let area = normalize_label(request.area.as_deref().unwrap_or_default());
    let crop = normalize_label(request.item.as_deref().unwrap_or_default());
    let year = integer_field("year", request.year.as_ref(), DEFAULT_YEAR)?;
    let rainfall = float_field("rainfall", request.rainfall.as_ref(), DEFAULT_RAINFALL)?;
    let pesticides = float_field("pesticides", request.pesticides.as_ref(), DEFAULT_PESTICIDES)?;
    let temperature = float_field(
        "temperature",
        request.temperature.as_ref(),
        DEFAULT_TEMPERATURE,
    )?;

    if !store.contains_area(&area) {
        return Err(unknown("Area", area, store.all_areas()));
    }
    if !store.contains_crop(&crop) {
        return Err(unknown("Crop", crop, store.all_crops()));
    }

    let year = i32::try_from(year)
        .ok()
        .filter(|y| bounds.year.contains(*y))
        .ok_or_else(|| {
            out_of_range(
                "year",
                year,
                format!(
                    "Year must be between {} and {}",
                    bounds.year.min, bounds.year.max
                ),
            )
        })?;
    if !bounds.rainfall.contains(rainfall) {
        return Err(out_of_range(
            "rainfall",
            rainfall,
            format!(
                "Rainfall must be between {} and {} mm",
                bounds.rainfall.min, bounds.rainfall.max
            ),
        ));
    }
    if !bounds.pesticides.contains(pesticides) {
        return Err(out_of_range(
            "pesticides",
            pesticides,
            format!(
                "Pesticides must be between {} and {} tonnes",
                bounds.pesticides.min, bounds.pesticides.max
            ),
        ));
    }
    if !bounds.temperature.contains(temperature) {
        return Err(out_of_range(
            "temperature",
            temperature,
            format!(
                "Temperature must be between {} and {}°C",
                bounds.temperature.min, bounds.temperature.max
            ),
        ));
    }

    Ok(YieldQuery::new(
        &area,
        &crop,
        year,
        rainfall,
        pesticides,
        temperature,
    ))
}

fn integer_field(field: &str, value: Option<&NumericField>, default: i32) -> YieldResult<i64> {
    value.map_or(Ok(i64::from(default)), |v| {
        v.as_i64().ok_or_else(|| not_a_number(field, v))
    })
}

fn float_field(field: &str, value: Option<&NumericField>, default: f64) -> YieldResult<f64> {
    let Some(v) = value else {
        return Ok(default);
    };
    v.as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| not_a_number(field, v))
}

fn not_a_number(field: &str, value: &NumericField) -> YieldError {
    let shown = match value {
        NumericField::Number(n) => n.to_string(),
        NumericField::Text(s) => s.clone(),
    };
    YieldError::InvalidQuery {
        field: field.to_owned(),
        reason: format!("{} must be a finite number, got \"{shown}\"", capitalize(field)),
        value: shown,
    }
}

fn out_of_range(field: &str, value: impl ToString, reason: String) -> YieldError {
    YieldError::InvalidQuery {
        field: field.to_owned(),
        value: value.to_string(),
        reason,
    }
}

fn unknown(kind: &'static str, value: String, known: &[String]) -> YieldError {
    let preview: Vec<String> = known
        .iter()
        .take(AVAILABLE_PREVIEW_LEN)
        .map(|label| format!("'{label}'"))
        .collect();
    YieldError::UnknownCategory {
        kind,
        value,
        available: format!("[{}]...", preview.join(", ")),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
