use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::predicate::{Comparison, PredicateFragment};
use crate::semantic::{SemanticType, TypedValue};

/// Filter operation requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Eq,
    Ne,
    Gt,
    /// Greater than or equal.
    Get,
    Lt,
    /// Less than or equal.
    Let,
    StartsWith,
    EndsWith,
    #[default]
    Contains,
}

impl Operation {
    pub const COMPARISONS: [Operation; 6] = [
        Operation::Eq,
        Operation::Ne,
        Operation::Gt,
        Operation::Get,
        Operation::Lt,
        Operation::Let,
    ];

    pub const LIKES: [Operation; 3] = [
        Operation::StartsWith,
        Operation::EndsWith,
        Operation::Contains,
    ];

    /// Lenient name lookup. Unknown names map to [`Operation::Contains`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQ" | "=" => Operation::Eq,
            "NE" | "!=" | "<>" => Operation::Ne,
            "GT" | ">" => Operation::Gt,
            "GET" | "GE" | ">=" | "≥" => Operation::Get,
            "LT" | "<" => Operation::Lt,
            "LET" | "LE" | "<=" | "≤" => Operation::Let,
            "STARTS_WITH" | "STARTSWITH" => Operation::StartsWith,
            "ENDS_WITH" | "ENDSWITH" => Operation::EndsWith,
            _ => Operation::Contains,
        }
    }

    pub fn is_like(self) -> bool {
        matches!(
            self,
            Operation::StartsWith | Operation::EndsWith | Operation::Contains
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Eq => "EQ",
            Operation::Ne => "NE",
            Operation::Gt => "GT",
            Operation::Get => "GET",
            Operation::Lt => "LT",
            Operation::Let => "LET",
            Operation::StartsWith => "STARTS_WITH",
            Operation::EndsWith => "ENDS_WITH",
            Operation::Contains => "CONTAINS",
        })
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Operation::parse_lenient)
            .unwrap_or_default())
    }
}

/* ---------- operator table ---------- */

/// Whether `op` is legal against a field of type `ty`.
pub fn supports(ty: SemanticType, op: Operation) -> bool {
    !op.is_like() || ty == SemanticType::String
}

/// Realize `op` as a predicate fragment over `field`.
///
/// `value` must already be coerced to `ty`.
pub fn realize(
    ty: SemanticType,
    op: Operation,
    field: &str,
    value: TypedValue,
) -> CompileResult<PredicateFragment> {
    if !supports(ty, op) {
        return Err(CompileError::unsupported_operator(ty, op));
    }
    Ok(realize_unchecked(op, field, value))
}

/// Realization without the legality check. The loose path calls this after
/// settling on a type that supports `op`.
pub(crate) fn realize_unchecked(op: Operation, field: &str, value: TypedValue) -> PredicateFragment {
    PredicateFragment {
        field: field.to_string(),
        comparison: Comparison::from(op),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_are_legal_for_every_type() {
        for ty in SemanticType::ALL {
            for op in Operation::COMPARISONS {
                assert!(supports(ty, op), "{ty} {op}");
            }
        }
    }

    #[test]
    fn likes_are_string_only() {
        for op in Operation::LIKES {
            assert!(supports(SemanticType::String, op));
            for ty in [
                SemanticType::Number,
                SemanticType::Date,
                SemanticType::DateTime,
            ] {
                assert!(!supports(ty, op), "{ty} {op}");
            }
        }
    }

    #[test]
    fn unsupported_message() {
        let err = realize(
            SemanticType::Number,
            Operation::StartsWith,
            "civilStatus",
            TypedValue::Number(1.0),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Number type doesn't allow like operations.");
    }

    #[test]
    fn realize_string_shapes() {
        let f = realize(
            SemanticType::String,
            Operation::EndsWith,
            "lastName",
            TypedValue::String("son".into()),
        )
        .unwrap();
        assert_eq!(f.comparison, Comparison::Like(crate::predicate::LikeShape::Suffix));
        assert_eq!(f.like_pattern().as_deref(), Some("%son"));
    }

    #[test]
    fn lenient_names() {
        assert_eq!(Operation::parse_lenient("like"), Operation::Contains);
        assert_eq!(Operation::parse_lenient("≥"), Operation::Get);
        assert_eq!(Operation::parse_lenient("le"), Operation::Let);
        assert_eq!(Operation::parse_lenient("starts_with"), Operation::StartsWith);
        assert_eq!(Operation::parse_lenient("bogus"), Operation::Contains);
    }

    #[test]
    fn deserialize_null_and_unknown_as_contains() {
        let op: Operation = serde_json::from_str("null").unwrap();
        assert_eq!(op, Operation::Contains);
        let op: Operation = serde_json::from_str("\"REGEX\"").unwrap();
        assert_eq!(op, Operation::Contains);
        let op: Operation = serde_json::from_str("\"GET\"").unwrap();
        assert_eq!(op, Operation::Get);
    }
}
