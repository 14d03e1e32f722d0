use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Canonical wire format for `DATETIME` values (`yyyy-MM-dd'T'HH:mm:ss'Z'`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Canonical wire format for `DATE` values (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed classification of filterable fields. Decides which parser is used
/// for a raw value and which operations are legal against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticType {
    String,
    Number,
    Date,
    DateTime,
}

impl SemanticType {
    pub const ALL: [SemanticType; 4] = [
        SemanticType::String,
        SemanticType::Number,
        SemanticType::Date,
        SemanticType::DateTime,
    ];
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SemanticType::String => "String",
            SemanticType::Number => "Number",
            SemanticType::Date => "Date",
            SemanticType::DateTime => "DateTime",
        })
    }
}

/// A raw filter value after coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    String(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl TypedValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            TypedValue::String(_) => SemanticType::String,
            TypedValue::Number(_) => SemanticType::Number,
            TypedValue::Date(_) => SemanticType::Date,
            TypedValue::DateTime(_) => SemanticType::DateTime,
        }
    }

    /// Reformat into the canonical raw form accepted by the coercer.
    pub fn canonical(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Number(n) => n.to_string(),
            TypedValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            TypedValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
