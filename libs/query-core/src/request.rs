use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::operator::Operation;

pub const MAX_FIELD_LEN: usize = 255;

/// One `(field, value, operation)` constraint as submitted by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub field: String,
    pub value: String,
    #[serde(default)]
    pub operation: Operation,
}

impl FilterRequest {
    pub fn new(field: impl Into<String>, value: impl Into<String>, operation: Operation) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operation,
        }
    }

    /// Structural checks only; type/operator compatibility is the compiler's job.
    pub fn validate(&self) -> CompileResult<()> {
        if self.field.trim().is_empty() {
            return Err(CompileError::invalid_request("field", "must not be empty"));
        }
        if self.field.chars().count() > MAX_FIELD_LEN {
            return Err(CompileError::invalid_request(
                "field",
                format!("must be at most {MAX_FIELD_LEN} characters"),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CompileError::invalid_request(
                "sortDirection",
                format!("expected ASC or DESC, got '{other}'"),
            )),
        }
    }
}

/// Page, sort and filter parameters of a list request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDataRequest {
    #[serde(default)]
    pub page: u64,
    pub size: u64,
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
    #[serde(default)]
    pub sort_fields: Option<Vec<String>>,
    #[serde(default)]
    pub filters: Option<Vec<FilterRequest>>,
}

impl PageDataRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort_direction: None,
            sort_fields: None,
            filters: None,
        }
    }

    pub fn with_sort(mut self, direction: SortDirection, fields: &[&str]) -> Self {
        self.sort_direction = Some(direction);
        self.sort_fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_filter(mut self, filter: FilterRequest) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    pub fn filters(&self) -> &[FilterRequest] {
        self.filters.as_deref().unwrap_or_default()
    }

    pub fn sort_fields(&self) -> &[String] {
        self.sort_fields.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> CompileResult<()> {
        if self.size == 0 {
            return Err(CompileError::invalid_request("size", "must be at least 1"));
        }
        for sort_field in self.sort_fields() {
            if sort_field.trim().is_empty() {
                return Err(CompileError::invalid_request(
                    "sortFields",
                    "must not contain empty names",
                ));
            }
        }
        self.filters().iter().try_for_each(FilterRequest::validate)
    }
}
