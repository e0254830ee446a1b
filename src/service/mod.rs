//! Domain services: validate input, enforce business rules, and translate
//! entities into the wire models handed back to the controllers.
//!
//! Every operation returns a [`ServiceResult`]; the API layer maps the error
//! variants 1:1 onto HTTP statuses.

pub mod booking;
pub mod person;
pub mod room;

pub use booking::{BookingModel, BookingRequest, BookingService};
pub use person::{PersonModel, PersonRequest, PersonService};
pub use room::{RemoveRoomOptions, RoomModel, RoomRequest, RoomService};

use crate::repo::RepoError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Rejected input: bad dates, missing fields. Maps to 400.
    #[error("{0}")]
    InvalidInput(String),
    /// No entity behind the given id. Maps to 404.
    #[error("{0}")]
    NotFound(String),
    /// Business-rule conflict such as a duplicate room name. Maps to 422.
    #[error("{0}")]
    Conflict(String),
    /// Unexpected failure; callers get a generic message. Maps to 500.
    #[error("{0}")]
    Internal(String),
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} {id} not found"))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}
