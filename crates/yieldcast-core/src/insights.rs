//! Advisory text for a prediction.
//!
//! A pure mapping from fixed thresholds to canned strings. The output order is
//! always rainfall, temperature, pesticides, yield level.

use crate::types::YieldQuery;

const LOW_RAINFALL_MM: f64 = 500.0;
const HIGH_RAINFALL_MM: f64 = 2000.0;
const LOW_TEMPERATURE_C: f64 = 10.0;
const HIGH_TEMPERATURE_C: f64 = 35.0;
const LOW_PESTICIDES_T: f64 = 50.0;
const HIGH_PESTICIDES_T: f64 = 1000.0;
const EXCELLENT_YIELD: f64 = 100_000.0;
const GOOD_YIELD: f64 = 50_000.0;

/// Generate the four advisory strings for `query` and its `estimate`.
#[must_use]
pub fn generate_insights(query: &YieldQuery, estimate: f64) -> Vec<String> {
    vec![
        rainfall_insight(query.rainfall).to_owned(),
        temperature_insight(query.temperature).to_owned(),
        pesticide_insight(query.pesticides).to_owned(),
        yield_insight(estimate).to_owned(),
    ]
}

fn rainfall_insight(rainfall: f64) -> &'static str {
    if rainfall < LOW_RAINFALL_MM {
        "Low rainfall detected. Consider irrigation systems for optimal yield."
    } else if rainfall > HIGH_RAINFALL_MM {
        "High rainfall detected. Ensure proper drainage to prevent waterlogging."
    } else {
        "Rainfall levels are optimal for crop growth."
    }
}

fn temperature_insight(temperature: f64) -> &'static str {
    if temperature < LOW_TEMPERATURE_C {
        "Low temperature may slow crop growth. Consider greenhouse farming."
    } else if temperature > HIGH_TEMPERATURE_C {
        "High temperature detected. Ensure adequate irrigation and shade."
    } else {
        "Temperature is within optimal range for crop cultivation."
    }
}

fn pesticide_insight(pesticides: f64) -> &'static str {
    if pesticides < LOW_PESTICIDES_T {
        "Low pesticide usage. Monitor for pest infestations."
    } else if pesticides > HIGH_PESTICIDES_T {
        "High pesticide usage. Consider integrated pest management."
    } else {
        "Pesticide levels are balanced for crop protection."
    }
}

fn yield_insight(estimate: f64) -> &'static str {
    if estimate > EXCELLENT_YIELD {
        "Excellent yield potential! Maintain current practices."
    } else if estimate > GOOD_YIELD {
        "Good yield expected. Minor optimizations could improve results."
    } else {
        "Yield can be improved. Consider soil testing and nutrient management."
    }
}
