//! Strict input validation
//!
//! 入力JSONの検証。検知処理に入る前に構造エラーを確定させる。

use crate::error::{Error, Result};
use crate::telemetry::types::TelemetryRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;

const NUMERIC_FIELDS: [&str; 4] = [
    "irradiance_wm_squared",
    "pv_module_temperature_c",
    "active_power_effective_kw",
    "five_min_pr_percent",
];

/// Parse a JSON payload into telemetry records.
///
/// The payload must be a JSON array of objects, each carrying a parsable
/// `datetime` and the four numeric columns. Any structural defect aborts the
/// whole call with [`Error::MalformedInput`] before any detector runs.
pub fn parse_records(payload: &str) -> Result<Vec<TelemetryRecord>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::MalformedInput(format!("unparsable JSON: {e}")))?;
    records_from_value(&value)
}

/// Validate an already-parsed JSON value.
pub fn records_from_value(value: &Value) -> Result<Vec<TelemetryRecord>> {
    let rows = value
        .as_array()
        .ok_or_else(|| Error::MalformedInput("expected a JSON array of records".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            Error::MalformedInput(format!("record {i}: expected a JSON object"))
        })?;

        let datetime = obj
            .get("datetime")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed_field(i, "datetime"))?;
        let datetime: DateTime<Utc> = datetime
            .parse()
            .map_err(|_| Error::MalformedInput(format!("record {i}: unparsable datetime '{datetime}'")))?;

        let mut nums = [0.0f64; 4];
        for (slot, field) in nums.iter_mut().zip(NUMERIC_FIELDS) {
            let v = obj
                .get(field)
                .and_then(Value::as_f64)
                .ok_or_else(|| Error::malformed_field(i, field))?;
            if !v.is_finite() {
                return Err(Error::MalformedInput(format!(
                    "record {i}: non-finite value in '{field}'"
                )));
            }
            *slot = v;
        }

        records.push(TelemetryRecord {
            datetime,
            irradiance_wm_squared: nums[0],
            pv_module_temperature_c: nums[1],
            active_power_effective_kw: nums[2],
            five_min_pr_percent: nums[3],
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(power: &str) -> String {
        format!(
            r#"{{
                "datetime": "2025-05-29T06:00:00Z",
                "irradiance_wm_squared": 14.5,
                "pv_module_temperature_c": 24.05,
                {power}
                "five_min_pr_percent": 67.65
            }}"#
        )
    }

    #[test]
    fn test_parses_valid_array() {
        let payload = format!("[{}]", sample_row(r#""active_power_effective_kw": 9.72,"#));
        let records = parse_records(&payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].active_power_effective_kw, 9.72);
    }

    #[test]
    fn test_missing_power_field_is_fatal() {
        let payload = format!("[{}]", sample_row(""));
        let err = parse_records(&payload).unwrap_err();
        match err {
            Error::MalformedInput(msg) => {
                assert!(msg.contains("active_power_effective_kw"), "{msg}");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_is_fatal() {
        let payload = format!("[{}]", sample_row(r#""active_power_effective_kw": "n/a","#));
        assert!(matches!(
            parse_records(&payload),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_non_array_payload_is_fatal() {
        assert!(matches!(
            parse_records("{}"),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            parse_records("not json"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_bad_datetime_is_fatal() {
        let payload = r#"[{
            "datetime": "yesterday",
            "irradiance_wm_squared": 1.0,
            "pv_module_temperature_c": 1.0,
            "active_power_effective_kw": 1.0,
            "five_min_pr_percent": 1.0
        }]"#;
        assert!(matches!(
            parse_records(payload),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_records("[]").unwrap().is_empty());
    }
}
