use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{StatementSchema, DATE_KEY};

/// Inclusive numeric bounds for one filterable field.
///
/// Used both as the derived extremes of the loaded record set and as the
/// user-adjustable active filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Sort direction for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction. At most one column sorts at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }

    /// Initial ordering after a successful fetch: newest period first.
    pub fn date_descending() -> Self {
        Self {
            key: Some(DATE_KEY.to_string()),
            direction: SortDirection::Descending,
        }
    }

    /// Header-click transition: a new column sorts ascending, repeat clicks
    /// on the same column flip the direction. There is no way back to
    /// unsorted short of a data reset.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Ascending;
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::unsorted()
    }
}

/// One period's reported figures for a symbol, validated at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRecord {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub date_epoch_ms: i64,
    values: HashMap<String, f64>,
}

/// Why a raw record was rejected during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no date field")]
    MissingDate,
    #[error("unparsable date '{0}'")]
    UnparsableDate(String),
    #[error("missing field '{0}'")]
    MissingField(String),
    #[error("field '{0}' is not numeric")]
    NonNumericField(String),
}

impl StatementRecord {
    /// Build a validated record from one raw envelope entry.
    ///
    /// Rejects records with an unparsable date or a missing/non-numeric
    /// schema field rather than letting NaN leak into range derivation.
    pub fn ingest(schema: &StatementSchema, raw: &Value) -> Result<Self, IngestError> {
        let object = raw.as_object().ok_or(IngestError::NotAnObject)?;

        let date_raw = object
            .get(DATE_KEY)
            .and_then(Value::as_str)
            .ok_or(IngestError::MissingDate)?;
        let date = parse_statement_date(date_raw)
            .ok_or_else(|| IngestError::UnparsableDate(date_raw.to_string()))?;

        let mut values = HashMap::new();
        for spec in schema.fields.iter().filter(|spec| spec.key != DATE_KEY) {
            let value = object
                .get(spec.key)
                .ok_or_else(|| IngestError::MissingField(spec.key.to_string()))?;
            let number = value
                .as_f64()
                .filter(|n| n.is_finite())
                .ok_or_else(|| IngestError::NonNumericField(spec.key.to_string()))?;
            values.insert(spec.key.to_string(), number);
        }

        let id = object.get("id").and_then(Value::as_i64);

        Ok(Self {
            id,
            date,
            date_epoch_ms: epoch_ms(date),
            values,
        })
    }

    /// Numeric value for a field key; the date key yields its epoch instant.
    pub fn value(&self, key: &str) -> Option<f64> {
        if key == DATE_KEY {
            Some(self.date_epoch_ms as f64)
        } else {
            self.values.get(key).copied()
        }
    }

    /// Assemble a record directly, bypassing wire ingestion.
    pub fn from_parts(id: Option<i64>, date: NaiveDate, values: HashMap<String, f64>) -> Self {
        Self {
            id,
            date,
            date_epoch_ms: epoch_ms(date),
            values,
        }
    }
}

/// Midnight UTC of the given date, in epoch milliseconds.
fn epoch_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Lenient date parsing applied uniformly to all records.
fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Wire envelope returned by every statement endpoint: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct StatementEnvelope {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

impl StatementEnvelope {
    /// The raw entries; absent or null `data` reads as an empty set.
    pub fn into_data(self) -> Vec<Value> {
        self.data.unwrap_or_default()
    }
}

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            api_base: std::env::var("STATEMENT_API_BASE")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}
