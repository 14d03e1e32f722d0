use std::sync::Arc;

use chrono::NaiveDate;
use query_core::{Page, PageDataRequest};
use tracing::{debug, info, instrument, warn};

use crate::config::PeopleConfig;
use crate::contract::model::{NewPerson, Person};
use crate::domain::error::DomainError;
use crate::domain::repo::PeopleRepository;

const MAX_NAME_LENGTH: usize = 255;

/// Domain service for listing and registering people.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn PeopleRepository>,
    config: PeopleConfig,
}

impl Service {
    pub fn new(repo: Arc<dyn PeopleRepository>, config: PeopleConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(
        name = "people.service.list_people",
        skip(self, req),
        fields(filters = req.filters().len(), page = req.page, size = req.size)
    )]
    pub async fn list_people(&self, req: PageDataRequest) -> Result<Page<Person>, DomainError> {
        debug!("Listing people on the strict path");
        let page = self
            .repo
            .list_page_strict(&req, self.config.limits())
            .await
            .inspect_err(|e| debug!(error = %e, "strict listing rejected"))?;
        debug!("Successfully listed {} people", page.items.len());
        Ok(page)
    }

    #[instrument(
        name = "people.service.list_people_loose",
        skip(self, req),
        fields(filters = req.filters().len(), page = req.page, size = req.size)
    )]
    pub async fn list_people_loose(
        &self,
        req: PageDataRequest,
    ) -> Result<Page<Person>, DomainError> {
        debug!("Listing people on the loose path");
        let page = self
            .repo
            .list_page_loose(&req, self.config.limits())
            .await
            .inspect_err(|e| warn!(error = %e, "loose listing failed"))?;
        debug!("Successfully listed {} people", page.items.len());
        Ok(page)
    }

    #[instrument(
        name = "people.service.create_person",
        skip(self),
        fields(name = %new_person.name, last_name = %new_person.last_name)
    )]
    pub async fn create_person(&self, new_person: NewPerson) -> Result<Person, DomainError> {
        info!("Creating new person");
        validate_name("name", &new_person.name)?;
        validate_name("lastName", &new_person.last_name)?;

        let person = self
            .repo
            .insert(new_person)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("Successfully created person with id={}", person.id);
        Ok(person)
    }

    /// Insert the demo rows unless the table already has data.
    /// Returns how many rows were inserted.
    #[instrument(name = "people.service.seed_demo", skip(self))]
    pub async fn seed_demo(&self) -> Result<usize, DomainError> {
        let existing = self
            .repo
            .count()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if existing > 0 {
            info!(existing, "people table already populated, skipping seed");
            return Ok(0);
        }

        let rows = demo_people();
        let n = rows.len();
        for p in rows {
            self.create_person(p).await?;
        }
        info!(inserted = n, "seeded demo people");
        Ok(n)
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(
            field,
            format!("must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Five rows covering substring, prefix and date filters.
pub fn demo_people() -> Vec<NewPerson> {
    [
        ("Ana", "Surname 10", 1, (1990, 1, 1)),
        ("Bruno", "Lastname 11", 2, (1985, 6, 15)),
        ("Ana", "Lastname 2", 1, (2001, 3, 9)),
        ("Carla", "Lastname 3", 3, (1979, 12, 31)),
        ("Diego", "Other", 2, (1995, 5, 5)),
    ]
    .into_iter()
    .filter_map(|(name, last_name, civil_status, (y, m, d))| {
        Some(NewPerson {
            name: name.to_string(),
            last_name: last_name.to_string(),
            civil_status,
            birth_date: NaiveDate::from_ymd_opt(y, m, d)?,
        })
    })
    .collect()
}
