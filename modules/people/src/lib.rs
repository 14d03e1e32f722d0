//! People directory: the reference consumer of `query_core` / `query_db`.
//!
//! Lists `Person` rows through either the strict (schema-checked) or the
//! loose (executor-checked) filter path.

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client, error, model};

// === INTERNAL MODULES ===
// Exposed for wiring in binaries and for tests. Prefer the `contract` API.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
