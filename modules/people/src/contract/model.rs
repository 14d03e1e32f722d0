use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Person as seen by other modules and printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub civil_status: i32,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub last_name: String,
    pub civil_status: i32,
    pub birth_date: NaiveDate,
}
