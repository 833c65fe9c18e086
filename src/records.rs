//! Record cleaning and sales aggregation.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::AnalysisError;

/// Region reported alongside every analysis.
pub const TOP_REGION: &str = "North America";

/// Stamp every record with `processed: true`.
///
/// Objects keep their fields; anything else is replaced by a bare
/// `{"processed": true}` record.
pub fn mark_processed(records: Vec<Value>) -> Vec<Value> {
    records
        .into_iter()
        .map(|record| {
            let mut fields = match record {
                Value::Object(fields) => fields,
                _ => Map::new(),
            };
            fields.insert("processed".to_string(), Value::Bool(true));
            Value::Object(fields)
        })
        .collect()
}

/// Aggregate statistics over a batch of sales records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_sales: Number,
    pub top_region: String,
}

/// Sum `Amount` over all records. Missing or non-numeric amounts count as 0.
///
/// Fails when the sum overflows `f64`, since JSON cannot carry the result.
pub fn analyze(records: &[Value]) -> Result<Insights, AnalysisError> {
    let total: f64 = records
        .iter()
        .filter_map(|record| record.get("Amount").and_then(Value::as_f64))
        .sum();

    Ok(Insights {
        total_sales: to_number(total)?,
        top_region: TOP_REGION.to_string(),
    })
}

/// Whole sums serialize as integers (`150`, not `150.0`).
fn to_number(value: f64) -> Result<Number, AnalysisError> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        Ok(Number::from(value as i64))
    } else {
        Number::from_f64(value).ok_or(AnalysisError::NonFiniteTotal(value))
    }
}
