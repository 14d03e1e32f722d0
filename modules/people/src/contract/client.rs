use async_trait::async_trait;
use query_core::{Page, PageDataRequest};

use crate::contract::{
    error::PeopleError,
    model::{NewPerson, Person},
};

/// Public API of the people module
#[async_trait]
pub trait PeopleApi: Send + Sync {
    /// List with every field checked against the person schema before querying.
    async fn list_people(&self, req: PageDataRequest) -> Result<Page<Person>, PeopleError>;

    /// List with inferred value types; the database reports what does not fit.
    async fn list_people_loose(&self, req: PageDataRequest) -> Result<Page<Person>, PeopleError>;

    async fn create_person(&self, new_person: NewPerson) -> Result<Person, PeopleError>;
}
