use super::{ServiceError, ServiceResult};
use crate::domain::{EntityId, Person};
use crate::repo::{PersonFilter, PersonRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PersonModel {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

impl From<Person> for PersonModel {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            phone_number: person.phone_number,
            email: person.email,
            date_of_birth: person.date_of_birth,
        }
    }
}

pub struct PersonService<P: PersonRepository> {
    people: P,
}

impl<P: PersonRepository> PersonService<P> {
    pub fn new(people: P) -> Self {
        Self { people }
    }

    pub fn add(&self, request: &PersonRequest) -> ServiceResult<EntityId> {
        validate_names(request)?;

        let id = self.people.add(&to_entity(0, request))?;
        debug!("Added person {}: {} {}", id, request.first_name, request.last_name);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<PersonModel> {
        self.people
            .get(id)?
            .map(PersonModel::from)
            .ok_or_else(|| ServiceError::NotFound(format!("person {id} not found")))
    }

    pub fn list(&self, filter: &PersonFilter) -> ServiceResult<Vec<PersonModel>> {
        Ok(self
            .people
            .filter(filter)?
            .into_iter()
            .map(PersonModel::from)
            .collect())
    }

    /// Replaces every mutable field of the person.
    pub fn update(&self, id: EntityId, request: &PersonRequest) -> ServiceResult<EntityId> {
        validate_names(request)?;

        if self.people.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("person {id} not found")));
        }

        self.people.update(&to_entity(id, request))?;
        debug!("Updated person: {}", id);
        Ok(id)
    }

    pub fn remove(&self, id: EntityId) -> ServiceResult<EntityId> {
        if self.people.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("person {id} not found")));
        }

        self.people.remove(id)?;
        debug!("Removed person: {}", id);
        Ok(id)
    }
}

fn to_entity(id: EntityId, request: &PersonRequest) -> Person {
    Person {
        id,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        phone_number: request.phone_number.clone(),
        email: request.email.clone(),
        date_of_birth: request.date_of_birth,
    }
}

fn validate_names(request: &PersonRequest) -> ServiceResult<()> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "a first and last name are required".to_string(),
        ));
    }

    Ok(())
}
