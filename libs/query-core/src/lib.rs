//! Backend-agnostic filter/sort/page request compiler.
//!
//! Callers submit untyped `(field, value, operation)` triples plus page/sort
//! parameters. Two entry points turn them into a [`Predicate`] and a
//! [`PageRequest`]:
//!
//! - [`compile_strict_request`] resolves each field's declared type and
//!   rejects unknown fields, malformed values and illegal operations up front.
//! - [`compile_loose_request`] guesses value types (DateTime, Date, String)
//!   and leaves mismatches to the executor.
//!
//! Translating the result to SQL belongs to the executor crate.

pub mod coerce;
pub mod error;
pub mod operator;
pub mod page;
pub mod predicate;
pub mod request;
pub mod schema;
pub mod semantic;

pub use coerce::{coerce, coerce_best_effort};
pub use error::{CompileError, CompileResult, QueryError};
pub use operator::{realize, supports, Operation};
pub use page::{Page, PageInfo, PageLimits, PageRequest, PageRequestBuilder, SortOrder};
pub use predicate::{
    compile_loose, compile_strict, compose, Comparison, LikeShape, Predicate, PredicateFragment,
};
pub use request::{FilterRequest, PageDataRequest, SortDirection};
pub use schema::{EntitySchema, FieldTypeResolver, SchemaRegistry};
pub use semantic::{SemanticType, TypedValue};

/// Predicate and page directive ready for an executor.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    pub page: PageRequest,
}

/// Validate and compile `req` on the strict path.
pub fn compile_strict_request<R>(
    resolver: &R,
    req: &PageDataRequest,
    limits: PageLimits,
) -> CompileResult<CompiledQuery>
where
    R: FieldTypeResolver + ?Sized,
{
    req.validate()?;
    let predicate = compile_strict(resolver, req.filters())?;
    let page = PageRequestBuilder::new(resolver.identity_field())
        .with_limits(limits)
        .from_request(req)?;
    Ok(CompiledQuery { predicate, page })
}

/// Validate and compile `req` on the loose path. Only structural problems and
/// a missing sort direction are reported here.
pub fn compile_loose_request(
    identity_field: &str,
    req: &PageDataRequest,
    limits: PageLimits,
) -> CompileResult<CompiledQuery> {
    req.validate()?;
    let predicate = compile_loose(req.filters());
    let page = PageRequestBuilder::new(identity_field)
        .with_limits(limits)
        .from_request(req)?;
    Ok(CompiledQuery { predicate, page })
}
