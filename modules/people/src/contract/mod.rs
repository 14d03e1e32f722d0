pub mod client;
pub mod error;
pub mod model;

pub use client::PeopleApi;
pub use error::PeopleError;
pub use model::{NewPerson, Person};
