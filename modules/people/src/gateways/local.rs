use async_trait::async_trait;
use query_core::{Page, PageDataRequest};
use std::sync::Arc;

use crate::contract::{
    client::PeopleApi,
    error::PeopleError,
    model::{NewPerson, Person},
};
use crate::domain::service::Service;

/// In-process `PeopleApi` that delegates to the domain service.
pub struct PeopleLocalClient {
    service: Arc<Service>,
}

impl PeopleLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PeopleApi for PeopleLocalClient {
    async fn list_people(&self, req: PageDataRequest) -> Result<Page<Person>, PeopleError> {
        self.service.list_people(req).await.map_err(Into::into)
    }

    async fn list_people_loose(&self, req: PageDataRequest) -> Result<Page<Person>, PeopleError> {
        self.service.list_people_loose(req).await.map_err(Into::into)
    }

    async fn create_person(&self, new_person: NewPerson) -> Result<Person, PeopleError> {
        self.service
            .create_person(new_person)
            .await
            .map_err(Into::into)
    }
}
