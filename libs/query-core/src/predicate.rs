//! Filter list → [`Predicate`] compilers.
//!
//! Both builders share [`crate::operator`] as the single operator table; they
//! differ in where type mismatches are detected.

use tracing::{debug, warn};

use crate::coerce::{coerce, coerce_best_effort};
use crate::error::CompileResult;
use crate::operator::{realize, realize_unchecked, supports, Operation};
use crate::request::FilterRequest;
use crate::schema::FieldTypeResolver;
use crate::semantic::{SemanticType, TypedValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeShape {
    Prefix,
    Suffix,
    Substring,
}

impl LikeShape {
    /// LIKE pattern around `raw`, with `%`, `_` and `\` escaped by `\`.
    pub fn pattern(self, raw: &str) -> String {
        let s = like_escape(raw);
        match self {
            LikeShape::Prefix => format!("{s}%"),
            LikeShape::Suffix => format!("%{s}"),
            LikeShape::Substring => format!("%{s}%"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like(LikeShape),
}

/// One realized `field <cmp> value` constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct PredicateFragment {
    pub field: String,
    pub comparison: Comparison,
    pub value: TypedValue,
}

impl PredicateFragment {
    pub fn like_pattern(&self) -> Option<String> {
        match self.comparison {
            Comparison::Like(shape) => Some(shape.pattern(&self.value.canonical())),
            _ => None,
        }
    }
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// Flat conjunction of fragments. `True` matches every row.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Predicate {
    #[default]
    True,
    Fragment(PredicateFragment),
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Logical AND with `True` as identity on both sides.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (a, b) => Predicate::And(Box::new(a), Box::new(b)),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Fragments in left-to-right order.
    pub fn fragments(&self) -> Vec<&PredicateFragment> {
        fn walk<'a>(p: &'a Predicate, out: &mut Vec<&'a PredicateFragment>) {
            match p {
                Predicate::True => {}
                Predicate::Fragment(f) => out.push(f),
                Predicate::And(a, b) => {
                    walk(a, out);
                    walk(b, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

/// AND-fold fragments left to right.
pub fn compose(fragments: impl IntoIterator<Item = PredicateFragment>) -> Predicate {
    fragments
        .into_iter()
        .fold(Predicate::True, |acc, f| acc.and(Predicate::Fragment(f)))
}

/* ---------- strict path ---------- */

/// Schema-aware compilation. Fails on the first unknown field, malformed
/// value or illegal operation; nothing is returned on failure.
pub fn compile_strict<R>(resolver: &R, filters: &[FilterRequest]) -> CompileResult<Predicate>
where
    R: FieldTypeResolver + ?Sized,
{
    let fragments = filters
        .iter()
        .map(|f| {
            let ty = resolver.resolve(&f.field)?;
            let value = coerce(&f.field, &f.value, ty)?;
            let fragment = realize(ty, f.operation, &f.field, value)?;
            debug!(field = %f.field, semantic_type = %ty, operation = %f.operation, "compiled strict filter");
            Ok(fragment)
        })
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(compose(fragments))
}

/* ---------- loose path ---------- */

/// Best-effort compilation without schema access. Never fails: mismatches
/// with the real column type are left to the executor.
pub fn compile_loose(filters: &[FilterRequest]) -> Predicate {
    compose(filters.iter().map(|f| {
        let (value, inferred) = coerce_best_effort(&f.value);
        let (value, ty) = if supports(inferred, f.operation) {
            (value, inferred)
        } else {
            warn!(
                field = %f.field,
                inferred = %inferred,
                operation = %f.operation,
                "operation not allowed for inferred type, comparing as string"
            );
            (TypedValue::String(f.value.clone()), SemanticType::String)
        };
        debug!(field = %f.field, semantic_type = %ty, operation = %f.operation, "compiled loose filter");
        realize_unchecked(f.operation, &f.field, value)
    }))
}

impl From<Operation> for Comparison {
    fn from(op: Operation) -> Self {
        use Operation as O;
        match op {
            O::Eq => Comparison::Eq,
            O::Ne => Comparison::Ne,
            O::Gt => Comparison::Gt,
            O::Get => Comparison::Ge,
            O::Lt => Comparison::Lt,
            O::Let => Comparison::Le,
            O::StartsWith => Comparison::Like(LikeShape::Prefix),
            O::EndsWith => Comparison::Like(LikeShape::Suffix),
            O::Contains => Comparison::Like(LikeShape::Substring),
        }
    }
}
