//! Entity stores over the relational database.
//!
//! Each entity gets a repository trait extending the generic [`Repository`]
//! CRUD surface, plus a SQLite implementation borrowing the connection. SQL
//! stays inside this module; callers never see rows or statements.

pub mod booking;
pub mod person;
pub mod room;

pub use booking::{BookingRepository, SqliteBookingRepository};
pub use person::{PersonFilter, PersonRepository, SqlitePersonRepository};
pub use room::{RoomRepository, SqliteRoomRepository};

use crate::domain::EntityId;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: EntityId },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

/// Generic CRUD accessor implemented by every entity store.
///
/// Mutations persist on return; there is no separate flush step.
pub trait Repository {
    type Entity;

    /// Inserts the entity (its `id` field is ignored) and returns the
    /// database-assigned id.
    fn add(&self, entity: &Self::Entity) -> RepoResult<EntityId>;
    fn update(&self, entity: &Self::Entity) -> RepoResult<()>;
    fn remove(&self, id: EntityId) -> RepoResult<()>;
    fn get(&self, id: EntityId) -> RepoResult<Option<Self::Entity>>;
    fn list(&self) -> RepoResult<Vec<Self::Entity>>;
}

// Timestamps are stored as epoch milliseconds.
pub(crate) fn timestamp_to_db(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn timestamp_from_db(column: &'static str, value: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
