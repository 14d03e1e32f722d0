use async_trait::async_trait;
use query_core::{Page, PageDataRequest, PageLimits, QueryError};

use crate::contract::model::{NewPerson, Person};

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait PeopleRepository: Send + Sync {
    async fn insert(&self, p: NewPerson) -> anyhow::Result<Person>;

    async fn count(&self) -> anyhow::Result<u64>;

    /// Compile against the person schema, then query. Compile errors come
    /// back before the database is touched.
    async fn list_page_strict(
        &self,
        req: &PageDataRequest,
        limits: PageLimits,
    ) -> Result<Page<Person>, QueryError>;

    async fn list_page_loose(
        &self,
        req: &PageDataRequest,
        limits: PageLimits,
    ) -> Result<Page<Person>, QueryError>;
}
