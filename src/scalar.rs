// Cell values and the formatting rules that turn them into display strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Rendered in place of missing values.
pub const NULL_STRING: &str = "<NULL>";

/// A single cell of a result set.
///
/// The set of variants is closed on purpose: every formatting decision is an
/// exhaustive match over this enum rather than a runtime type probe.
/// Deserialization never guesses at temporal strings; a JSON string stays a
/// `String` and only becomes a date through the column-type mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Temporal(DateTime<Utc>),
}

impl Scalar {
    /// Numeric view of the cell. Anything that is not a number is `None`;
    /// metric sums treat that as a zero contribution.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Column type as reported by the host's query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    String,
    Temporal,
    Boolean,
}

pub type NumberFormatter = Box<dyn Fn(f64) -> String>;
pub type TimeFormatter = Box<dyn Fn(&DateTime<Utc>) -> String>;

/// Injected formatting collaborators plus the null sentinel.
///
/// The exact formatting grammar belongs to whoever builds the closures; the
/// defaults here are plain decimal rendering and RFC 3339.
pub struct Formatters {
    pub null_string: String,
    pub number: Option<NumberFormatter>,
    pub time: Option<TimeFormatter>,
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            null_string: NULL_STRING.to_string(),
            number: None,
            time: None,
        }
    }
}

/// A time formatter applying a chrono strftime pattern, e.g. `"%Y-%m-%d"`.
pub fn strftime_formatter(pattern: &str) -> TimeFormatter {
    let pattern = pattern.to_string();
    Box::new(move |dt: &DateTime<Utc>| dt.format(&pattern).to_string())
}

/// A number formatter with a fixed count of decimal digits.
pub fn precision_formatter(digits: usize) -> NumberFormatter {
    Box::new(move |n: f64| format!("{n:.digits$}"))
}

/// Format one cell for display.
///
/// Total over all inputs: missing and null cells render as the sentinel,
/// numeric cells in temporal columns are read as epoch milliseconds, and
/// strings in temporal columns that don't parse stay as-is.
pub fn format_scalar(value: &Scalar, coltype: Option<ColumnType>, fmt: &Formatters) -> String {
    match value {
        Scalar::Null => fmt.null_string.clone(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number(n) => {
            if coltype == Some(ColumnType::Temporal) {
                if let Some(dt) = DateTime::from_timestamp_millis(*n as i64) {
                    return format_time(&dt, fmt);
                }
            }
            match &fmt.number {
                Some(f) => f(*n),
                None => n.to_string(),
            }
        }
        Scalar::String(s) => {
            if coltype == Some(ColumnType::Temporal) {
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return format_time(&dt.with_timezone(&Utc), fmt);
                }
            }
            s.clone()
        }
        Scalar::Temporal(dt) => format_time(dt, fmt),
    }
}

fn format_time(dt: &DateTime<Utc>, fmt: &Formatters) -> String {
    match &fmt.time {
        Some(f) => f(dt),
        None => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
