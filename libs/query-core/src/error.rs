use thiserror::Error;

use crate::operator::Operation;
use crate::semantic::SemanticType;

/// Client-facing validation failures raised before any query runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value '{raw}' for {target} field '{field}'")]
    Coercion {
        field: String,
        raw: String,
        target: SemanticType,
    },

    #[error("{semantic_type} type doesn't allow like operations.")]
    UnsupportedOperator {
        semantic_type: SemanticType,
        operation: Operation,
    },

    #[error("sort direction is required when sort fields are given")]
    MissingDirection,

    #[error("invalid request: {field}: {message}")]
    InvalidRequest { field: String, message: String },
}

impl CompileError {
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField(field.into())
    }

    pub fn coercion(field: impl Into<String>, raw: impl Into<String>, target: SemanticType) -> Self {
        Self::Coercion {
            field: field.into(),
            raw: raw.into(),
            target,
        }
    }

    pub fn unsupported_operator(semantic_type: SemanticType, operation: Operation) -> Self {
        Self::UnsupportedOperator {
            semantic_type,
            operation,
        }
    }

    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Failure of a compile-and-execute cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Opaque executor failure. The loose path relies on this to report
    /// unknown columns and type mismatches.
    #[error("data access error: {0}")]
    DataAccess(String),
}

impl QueryError {
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Compile(_))
    }
}
