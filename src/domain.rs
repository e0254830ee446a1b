use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Database-assigned identifier shared by all entities.
pub type EntityId = i64;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

// Room names are unique, the store enforces this alongside the service check
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: EntityId,
    pub person_id: EntityId,
    pub room_id: EntityId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
