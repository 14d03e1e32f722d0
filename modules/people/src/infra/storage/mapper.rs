use crate::contract::model::Person;
use crate::infra::storage::entity::Model as PersonEntity;

impl From<PersonEntity> for Person {
    fn from(e: PersonEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            last_name: e.last_name,
            civil_status: e.civil_status,
            birth_date: e.birth_date,
            created_at: e.created_at,
        }
    }
}
