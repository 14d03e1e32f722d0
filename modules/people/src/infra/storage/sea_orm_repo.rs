//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction.

use anyhow::Context;
use chrono::Utc;
use query_core::{Page, PageDataRequest, PageLimits, QueryError};
use query_db::{paginate_loose, paginate_strict, FieldMap};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, Set};
use tracing::instrument;

use crate::contract::model::{NewPerson, Person};
use crate::domain::repo::PeopleRepository;
use crate::infra::storage::entity::{ActiveModel as PersonAM, Entity as PersonEntity};

/// SeaORM repository impl.
/// The field map is derived from the entity once and reused for every query.
pub struct SeaOrmPeopleRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    fields: FieldMap<PersonEntity>,
}

impl<C> SeaOrmPeopleRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            fields: FieldMap::from_entity(),
        }
    }
}

#[async_trait::async_trait]
impl<C> PeopleRepository for SeaOrmPeopleRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, p: NewPerson) -> anyhow::Result<Person> {
        let m = PersonAM {
            id: NotSet,
            name: Set(p.name),
            last_name: Set(p.last_name),
            civil_status: Set(p.civil_status),
            birth_date: Set(p.birth_date),
            created_at: Set(Utc::now()),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        Ok(saved.into())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        PersonEntity::find()
            .count(&self.conn)
            .await
            .context("count failed")
    }

    #[instrument(name = "people.repo.list_page_strict", skip_all)]
    async fn list_page_strict(
        &self,
        req: &PageDataRequest,
        limits: PageLimits,
    ) -> Result<Page<Person>, QueryError> {
        paginate_strict(
            PersonEntity::find(),
            &self.conn,
            req,
            &self.fields,
            limits,
            Person::from,
        )
        .await
    }

    #[instrument(name = "people.repo.list_page_loose", skip_all)]
    async fn list_page_loose(
        &self,
        req: &PageDataRequest,
        limits: PageLimits,
    ) -> Result<Page<Person>, QueryError> {
        paginate_loose(PersonEntity::find(), &self.conn, req, limits, Person::from).await
    }
}
