use query_core::{CompileError, QueryError};
use thiserror::Error;

use crate::contract::error::PeopleError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] CompileError),

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<QueryError> for DomainError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Compile(c) => Self::InvalidQuery(c),
            QueryError::DataAccess(message) => Self::Database { message },
        }
    }
}

impl From<DomainError> for PeopleError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidQuery(c) => PeopleError::validation(c.to_string()),
            DomainError::Validation { field, message } => {
                PeopleError::validation(format!("{field}: {message}"))
            }
            DomainError::Database { .. } => PeopleError::internal(),
        }
    }
}
