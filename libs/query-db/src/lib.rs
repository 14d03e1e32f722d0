//! SeaORM executor binding for `query_core`.
//!
//! Turns compiled predicates and page directives into `sea_orm::Select`
//! filters, orderings and offset pages.
//!
//! # Features
//! - `sqlite` (default), `pg`: enable the matching SeaORM/SQLx backend
//! - `integration`: Postgres tests via testcontainers
//!
//! # Example
//! ```rust,ignore
//! use query_db::{paginate_strict, FieldMap};
//! use query_core::{PageDataRequest, PageLimits};
//!
//! let fmap = FieldMap::<person::Entity>::from_entity();
//! let page = paginate_strict(
//!     person::Entity::find(),
//!     &conn,
//!     &PageDataRequest::new(0, 20),
//!     &fmap,
//!     PageLimits::default(),
//!     |m| m,
//! )
//! .await?;
//! ```

pub mod filter;

pub use filter::{
    api_name, column_name, paginate_loose, paginate_strict, predicate_to_condition,
    predicate_to_condition_loose, semantic_type_of, Field, FieldMap, FilterQueryExt,
};
