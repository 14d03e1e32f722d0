//! Raw string → [`TypedValue`] coercion.
//!
//! Targeted coercion parses exactly the format of the declared type and fails
//! with a [`CompileError::Coercion`]. Best-effort coercion walks an ordered
//! list of parsers and falls back to a string, so it never fails.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{CompileError, CompileResult};
use crate::semantic::{SemanticType, TypedValue, DATETIME_FORMAT, DATE_FORMAT};

type ParseFn = fn(&str) -> Option<TypedValue>;

/// Attempt order for best-effort coercion. DateTime is tried before Date so a
/// value satisfying both resolves deterministically.
const BEST_EFFORT_ORDER: [(SemanticType, ParseFn); 2] = [
    (SemanticType::DateTime, parse_datetime),
    (SemanticType::Date, parse_date),
];

fn parse_datetime(raw: &str) -> Option<TypedValue> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .ok()
        .map(|dt| TypedValue::DateTime(dt.and_utc()))
}

fn parse_date(raw: &str) -> Option<TypedValue> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(TypedValue::Date)
}

fn parse_number(raw: &str) -> Option<TypedValue> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(TypedValue::Number)
}

/// Parse `raw` with the canonical parser of `target`.
pub fn coerce(field: &str, raw: &str, target: SemanticType) -> CompileResult<TypedValue> {
    let parsed = match target {
        SemanticType::String => Some(TypedValue::String(raw.to_string())),
        SemanticType::Number => parse_number(raw),
        SemanticType::Date => parse_date(raw),
        SemanticType::DateTime => parse_datetime(raw),
    };
    parsed.ok_or_else(|| CompileError::coercion(field, raw, target))
}

/// Parse `raw` without knowing the declared type: DateTime, then Date, then String.
pub fn coerce_best_effort(raw: &str) -> (TypedValue, SemanticType) {
    BEST_EFFORT_ORDER
        .iter()
        .find_map(|(ty, parse)| parse(raw).map(|v| (v, *ty)))
        .unwrap_or_else(|| (TypedValue::String(raw.to_string()), SemanticType::String))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn number_accepts_surrounding_whitespace() {
        assert_eq!(
            coerce("age", " 42 ", SemanticType::Number).unwrap(),
            TypedValue::Number(42.0)
        );
    }

    #[test]
    fn number_rejects_non_finite() {
        assert!(coerce("age", "NaN", SemanticType::Number).is_err());
        assert!(coerce("age", "inf", SemanticType::Number).is_err());
    }

    #[test]
    fn coercion_error_carries_context() {
        let err = coerce("civilStatus", "ABC", SemanticType::Number).unwrap_err();
        assert_eq!(
            err,
            CompileError::Coercion {
                field: "civilStatus".into(),
                raw: "ABC".into(),
                target: SemanticType::Number,
            }
        );
    }

    #[test]
    fn date_requires_exact_pattern() {
        assert!(coerce("born", "2020-01-31", SemanticType::Date).is_ok());
        assert!(coerce("born", "31/01/2020", SemanticType::Date).is_err());
        assert!(coerce("born", "2020-02-30", SemanticType::Date).is_err());
    }

    #[test]
    fn datetime_requires_zulu_suffix() {
        let v = coerce("at", "2021-05-06T07:08:09Z", SemanticType::DateTime).unwrap();
        assert_eq!(
            v,
            TypedValue::DateTime(Utc.with_ymd_and_hms(2021, 5, 6, 7, 8, 9).unwrap())
        );
        assert!(coerce("at", "2021-05-06T07:08:09", SemanticType::DateTime).is_err());
        assert!(coerce("at", "2021-05-06T07:08:09+02:00", SemanticType::DateTime).is_err());
    }

    #[test]
    fn best_effort_order() {
        let (v, ty) = coerce_best_effort("2021-05-06T07:08:09Z");
        assert_eq!(ty, SemanticType::DateTime);
        assert!(matches!(v, TypedValue::DateTime(_)));

        let (v, ty) = coerce_best_effort("2021-05-06");
        assert_eq!(ty, SemanticType::Date);
        assert!(matches!(v, TypedValue::Date(_)));

        // numbers are never inferred
        let (v, ty) = coerce_best_effort("42");
        assert_eq!(ty, SemanticType::String);
        assert_eq!(v, TypedValue::String("42".into()));

        let (_, ty) = coerce_best_effort("");
        assert_eq!(ty, SemanticType::String);
    }
}
