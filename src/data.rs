//! Input data model and validation.
//!
//! The public API accepts chart data as loose JSON; [`validate`] checks it
//! against the shape the requested chart type expects and converts it into a
//! typed [`ChartData`]. Every failure names the offending field, so callers
//! can point users at the exact input element.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::ChartDataError;
use crate::plan::Color;
use crate::style::ChartType;

/// One or more named series of equal length.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Single(Vec<f64>),
    /// Named series in input order.
    Multi(Vec<(String, Vec<f64>)>),
}

impl SeriesData {
    pub fn series_count(&self) -> usize {
        match self {
            SeriesData::Single(_) => 1,
            SeriesData::Multi(s) => s.len(),
        }
    }

    /// Iterate series as `(optional name, values)` pairs.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Option<&str>, &[f64])> + '_> {
        match self {
            SeriesData::Single(v) => Box::new(std::iter::once((None, v.as_slice()))),
            SeriesData::Multi(s) => {
                Box::new(s.iter().map(|(name, v)| (Some(name.as_str()), v.as_slice())))
            }
        }
    }
}

/// Horizontal domain of a line chart.
#[derive(Debug, Clone, PartialEq)]
pub enum LineDomain {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl LineDomain {
    pub fn len(&self) -> usize {
        match self {
            LineDomain::Numeric(v) => v.len(),
            LineDomain::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validated, typed chart input.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bar {
        labels: Vec<String>,
        series: SeriesData,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        /// Per-slice color overrides; `None` uses the theme palette.
        colors: Option<Vec<Color>>,
        subtitle: Option<String>,
        center_title: Option<String>,
    },
    Line {
        x: LineDomain,
        series: SeriesData,
    },
    Timeseries {
        dates: Vec<NaiveDateTime>,
        series: SeriesData,
        upper: Option<Vec<f64>>,
        lower: Option<Vec<f64>>,
    },
    Rose {
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

/// Validate raw JSON input against `chart_type` and convert it.
pub fn validate(chart_type: ChartType, data: &Value) -> Result<ChartData, ChartDataError> {
    let obj = data
        .as_object()
        .ok_or_else(|| ChartDataError::new("(root)", "chart data must be a JSON object"))?;
    match chart_type {
        ChartType::Bar => {
            let labels = string_seq(require(obj, "labels")?, "labels")?;
            let series = series_field(obj, labels.len(), "labels")?;
            Ok(ChartData::Bar { labels, series })
        }
        ChartType::Pie => {
            let labels = string_seq(require(obj, "labels")?, "labels")?;
            let values = numeric_seq(require(obj, "values")?, "values")?;
            check_len(values.len(), labels.len(), "values", "labels")?;
            check_non_negative_sum(&values, "values")?;
            let colors = match obj.get("colors") {
                Some(v) => Some(color_seq(v, values.len())?),
                None => None,
            };
            let subtitle = optional_string(obj, "subtitle")?;
            let center_title = optional_string(obj, "center_title")?;
            Ok(ChartData::Pie {
                labels,
                values,
                colors,
                subtitle,
                center_title,
            })
        }
        ChartType::Line => {
            let x = if let Some(v) = obj.get("labels") {
                LineDomain::Categorical(string_seq(v, "labels")?)
            } else if let Some(v) = obj.get("x") {
                LineDomain::Numeric(numeric_seq(v, "x")?)
            } else {
                return Err(ChartDataError::new(
                    "x",
                    "line chart requires an 'x' or 'labels' field",
                ));
            };
            if x.is_empty() {
                return Err(ChartDataError::new("x", "cannot be empty"));
            }
            let series = series_or_y(obj, x.len())?;
            Ok(ChartData::Line { x, series })
        }
        ChartType::Timeseries => {
            let dates = date_seq(require(obj, "dates")?)?;
            let series = series_field(obj, dates.len(), "dates")?;
            let upper = match obj.get("upper") {
                Some(v) => {
                    let vals = numeric_seq(v, "upper")?;
                    check_len(vals.len(), dates.len(), "upper", "dates")?;
                    Some(vals)
                }
                None => None,
            };
            let lower = match obj.get("lower") {
                Some(v) => {
                    let vals = numeric_seq(v, "lower")?;
                    check_len(vals.len(), dates.len(), "lower", "dates")?;
                    Some(vals)
                }
                None => None,
            };
            Ok(ChartData::Timeseries {
                dates,
                series,
                upper,
                lower,
            })
        }
        ChartType::Rose => {
            let labels = string_seq(require(obj, "labels")?, "labels")?;
            let values = numeric_seq(require(obj, "values")?, "values")?;
            check_len(values.len(), labels.len(), "values", "labels")?;
            check_non_negative_sum(&values, "values")?;
            Ok(ChartData::Rose { labels, values })
        }
    }
}

fn require<'a>(
    obj: &'a serde_json::Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ChartDataError> {
    obj.get(field)
        .ok_or_else(|| ChartDataError::new(field, "required field is missing"))
}

fn check_len(got: usize, want: usize, field: &str, against: &str) -> Result<(), ChartDataError> {
    if got != want {
        return Err(ChartDataError::new(
            field,
            format!("length ({got}) must match '{against}' length ({want})"),
        ));
    }
    Ok(())
}

/// Non-negative entries summing to a positive total, so angular layout can
/// divide by the sum without guarding.
fn check_non_negative_sum(values: &[f64], field: &str) -> Result<(), ChartDataError> {
    for (i, v) in values.iter().enumerate() {
        if *v < 0.0 {
            return Err(ChartDataError::new(
                format!("{field}[{i}]"),
                "must be non-negative",
            ));
        }
    }
    if values.iter().sum::<f64>() <= 0.0 {
        return Err(ChartDataError::new(field, "must sum to a positive total"));
    }
    Ok(())
}

fn numeric_seq(value: &Value, field: &str) -> Result<Vec<f64>, ChartDataError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ChartDataError::new(field, "must be an array"))?;
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        let n = v
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ChartDataError::new(format!("{field}[{i}]"), "must be numeric"))?;
        out.push(n);
    }
    Ok(out)
}

fn string_seq(value: &Value, field: &str) -> Result<Vec<String>, ChartDataError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ChartDataError::new(field, "must be an array"))?;
    if arr.is_empty() {
        return Err(ChartDataError::new(field, "cannot be empty"));
    }
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        match v {
            Value::String(s) => out.push(s.clone()),
            // Numeric labels are common in hand-written input; stringify them.
            Value::Number(n) => out.push(n.to_string()),
            _ => {
                return Err(ChartDataError::new(
                    format!("{field}[{i}]"),
                    "must be a string",
                ));
            }
        }
    }
    Ok(out)
}

fn color_seq(value: &Value, want_len: usize) -> Result<Vec<Color>, ChartDataError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ChartDataError::new("colors", "must be an array"))?;
    check_len(arr.len(), want_len, "colors", "values")?;
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        let s = v
            .as_str()
            .ok_or_else(|| ChartDataError::new(format!("colors[{i}]"), "must be a string"))?;
        let color = Color::from_hex(s).ok_or_else(|| {
            ChartDataError::new(
                format!("colors[{i}]"),
                format!("'{s}' is not a '#RRGGBB' color"),
            )
        })?;
        out.push(color);
    }
    Ok(out)
}

fn optional_string(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ChartDataError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ChartDataError::new(field, "must be a string")),
    }
}

/// `values` (single) or `series` (multi), validated against `domain_len`.
fn series_field(
    obj: &serde_json::Map<String, Value>,
    domain_len: usize,
    domain_field: &str,
) -> Result<SeriesData, ChartDataError> {
    if let Some(v) = obj.get("values") {
        let vals = numeric_seq(v, "values")?;
        check_len(vals.len(), domain_len, "values", domain_field)?;
        return Ok(SeriesData::Single(vals));
    }
    if let Some(v) = obj.get("series") {
        return multi_series(v, domain_len, domain_field);
    }
    Err(ChartDataError::new(
        "values",
        "requires either a 'values' or 'series' field",
    ))
}

/// Line charts call the single-series field `y` instead of `values`.
fn series_or_y(
    obj: &serde_json::Map<String, Value>,
    domain_len: usize,
) -> Result<SeriesData, ChartDataError> {
    if let Some(v) = obj.get("y") {
        let vals = numeric_seq(v, "y")?;
        check_len(vals.len(), domain_len, "y", "x")?;
        return Ok(SeriesData::Single(vals));
    }
    if let Some(v) = obj.get("series") {
        return multi_series(v, domain_len, "x");
    }
    Err(ChartDataError::new(
        "y",
        "requires either a 'y' or 'series' field",
    ))
}

fn multi_series(
    value: &Value,
    domain_len: usize,
    domain_field: &str,
) -> Result<SeriesData, ChartDataError> {
    // serde_json preserves key order, so series keep their input ordering
    // through stacking and legends.
    let map = value
        .as_object()
        .ok_or_else(|| ChartDataError::new("series", "must be an object"))?;
    if map.is_empty() {
        return Err(ChartDataError::new("series", "cannot be empty"));
    }
    let mut out = Vec::with_capacity(map.len());
    for (name, v) in map {
        let field = format!("series['{name}']");
        let vals = numeric_seq(v, &field)?;
        check_len(vals.len(), domain_len, &field, domain_field)?;
        out.push((name.clone(), vals));
    }
    Ok(SeriesData::Multi(out))
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse one date entry: a string in a handful of common formats, or a
/// numeric Unix timestamp in seconds.
fn parse_date(value: &Value, field: &str) -> Result<NaiveDateTime, ChartDataError> {
    if let Some(s) = value.as_str() {
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                    return Ok(dt);
                }
            }
        }
        return Err(ChartDataError::new(
            field,
            format!("'{s}' is not a recognized date"),
        ));
    }
    if let Some(ts) = value.as_i64() {
        if let Some(dt) = chrono::DateTime::from_timestamp(ts, 0) {
            return Ok(dt.naive_utc());
        }
    }
    Err(ChartDataError::new(
        field,
        "must be a date string or Unix timestamp",
    ))
}

fn date_seq(value: &Value) -> Result<Vec<NaiveDateTime>, ChartDataError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ChartDataError::new("dates", "must be an array"))?;
    if arr.is_empty() {
        return Err(ChartDataError::new("dates", "cannot be empty"));
    }
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        out.push(parse_date(v, &format!("dates[{i}]"))?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bar_single_series_is_accepted() {
        let data = json!({"labels": ["a", "b"], "values": [1.0, 2.5]});
        match validate(ChartType::Bar, &data).unwrap() {
            ChartData::Bar { labels, series } => {
                assert_eq!(labels, vec!["a", "b"]);
                assert_eq!(series, SeriesData::Single(vec![1.0, 2.5]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bar_series_preserve_input_order() {
        let data = json!({
            "labels": ["q1", "q2"],
            "series": {"zulu": [1, 2], "alpha": [3, 4], "mike": [5, 6]}
        });
        match validate(ChartType::Bar, &data).unwrap() {
            ChartData::Bar {
                series: SeriesData::Multi(series),
                ..
            } => {
                let names: Vec<&str> = series.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, vec!["zulu", "alpha", "mike"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_names_both_fields() {
        let data = json!({"labels": ["a", "b", "c"], "values": [1, 2]});
        let err = validate(ChartType::Bar, &data).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("values"), "{msg}");
        assert!(msg.contains("(2)"), "{msg}");
        assert!(msg.contains("labels"), "{msg}");
        assert!(msg.contains("(3)"), "{msg}");
    }

    #[test]
    fn non_numeric_entry_is_pinpointed() {
        let data = json!({"labels": ["a", "b"], "values": [1, "two"]});
        let err = validate(ChartType::Bar, &data).unwrap_err();
        assert_eq!(err.field, "values[1]");
        assert!(err.reason.contains("numeric"));
    }

    #[test]
    fn null_value_is_rejected_as_non_numeric() {
        let data = json!({"labels": ["a"], "values": [Value::Null]});
        let err = validate(ChartType::Bar, &data).unwrap_err();
        assert_eq!(err.field, "values[0]");
    }

    #[test]
    fn pie_rejects_negative_and_zero_sum() {
        let neg = json!({"labels": ["a", "b"], "values": [5, -1]});
        let err = validate(ChartType::Pie, &neg).unwrap_err();
        assert_eq!(err.field, "values[1]");

        let zeros = json!({"labels": ["a", "b"], "values": [0, 0]});
        let err = validate(ChartType::Pie, &zeros).unwrap_err();
        assert!(err.reason.contains("positive"));
    }

    #[test]
    fn pie_optional_fields_are_parsed() {
        let data = json!({
            "labels": ["a", "b"],
            "values": [1, 2],
            "colors": ["#FF0000", "#00FF00"],
            "center_title": "Total",
            "subtitle": "2026"
        });
        match validate(ChartType::Pie, &data).unwrap() {
            ChartData::Pie {
                colors,
                subtitle,
                center_title,
                ..
            } => {
                assert_eq!(
                    colors,
                    Some(vec![Color::rgb(255, 0, 0), Color::rgb(0, 255, 0)])
                );
                assert_eq!(subtitle.as_deref(), Some("2026"));
                assert_eq!(center_title.as_deref(), Some("Total"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pie_bad_color_is_pinpointed() {
        let data = json!({"labels": ["a"], "values": [1], "colors": ["red"]});
        let err = validate(ChartType::Pie, &data).unwrap_err();
        assert_eq!(err.field, "colors[0]");
    }

    #[test]
    fn pie_gap_labels_are_allowed() {
        let data = json!({"labels": ["a", ""], "values": [3, 1]});
        assert!(validate(ChartType::Pie, &data).is_ok());
    }

    #[test]
    fn line_accepts_numeric_x_or_labels() {
        let numeric = json!({"x": [1, 2, 3], "y": [4, 5, 6]});
        match validate(ChartType::Line, &numeric).unwrap() {
            ChartData::Line {
                x: LineDomain::Numeric(x),
                ..
            } => assert_eq!(x, vec![1.0, 2.0, 3.0]),
            other => panic!("unexpected {other:?}"),
        }
        let labeled = json!({"labels": ["jan", "feb"], "y": [1, 2]});
        match validate(ChartType::Line, &labeled).unwrap() {
            ChartData::Line {
                x: LineDomain::Categorical(labels),
                ..
            } => assert_eq!(labels, vec!["jan", "feb"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn line_without_domain_fails() {
        let data = json!({"y": [1, 2]});
        let err = validate(ChartType::Line, &data).unwrap_err();
        assert_eq!(err.field, "x");
    }

    #[test]
    fn timeseries_parses_common_date_formats() {
        let data = json!({
            "dates": ["2026-01-01", "2026/01/02", "03-01-2026", "2026-01-04 12:30:00"],
            "values": [1, 2, 3, 4]
        });
        match validate(ChartType::Timeseries, &data).unwrap() {
            ChartData::Timeseries { dates, .. } => {
                assert_eq!(dates.len(), 4);
                assert_eq!(dates[0].format("%Y-%m-%d").to_string(), "2026-01-01");
                assert_eq!(dates[2].format("%Y-%m-%d").to_string(), "2026-01-03");
                assert_eq!(dates[3].format("%H:%M").to_string(), "12:30");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn timeseries_accepts_unix_timestamps() {
        let data = json!({"dates": [1_767_225_600, 1_767_312_000], "values": [1, 2]});
        match validate(ChartType::Timeseries, &data).unwrap() {
            ChartData::Timeseries { dates, .. } => {
                assert_eq!(dates[0].format("%Y-%m-%d").to_string(), "2026-01-01");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn timeseries_bad_date_is_pinpointed() {
        let data = json!({"dates": ["2026-01-01", "not a date"], "values": [1, 2]});
        let err = validate(ChartType::Timeseries, &data).unwrap_err();
        assert_eq!(err.field, "dates[1]");
    }

    #[test]
    fn timeseries_band_lengths_are_checked() {
        let data = json!({
            "dates": ["2026-01-01", "2026-01-02"],
            "values": [1, 2],
            "upper": [3]
        });
        let err = validate(ChartType::Timeseries, &data).unwrap_err();
        assert_eq!(err.field, "upper");
    }

    #[test]
    fn rose_requires_positive_sum() {
        let good = json!({"labels": ["n", "e"], "values": [3, 4]});
        assert!(validate(ChartType::Rose, &good).is_ok());
        let bad = json!({"labels": ["n"], "values": [-2]});
        assert!(validate(ChartType::Rose, &bad).is_err());
    }

    #[test]
    fn root_must_be_an_object() {
        let err = validate(ChartType::Bar, &json!([1, 2])).unwrap_err();
        assert_eq!(err.field, "(root)");
    }
}
