use super::{ServiceError, ServiceResult};
use crate::domain::{Booking, EntityId};
use crate::repo::BookingRepository;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub person_id: EntityId,
    pub room_id: EntityId,
    #[serde(deserialize_with = "parse_rfc3339")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "parse_rfc3339")]
    pub end_time: DateTime<Utc>,
}

pub(crate) fn parse_rfc3339<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map_err(serde::de::Error::custom)
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct BookingModel {
    pub id: EntityId,
    pub person_id: EntityId,
    pub room_id: EntityId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<Booking> for BookingModel {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            person_id: booking.person_id,
            room_id: booking.room_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
        }
    }
}

pub struct BookingService<B: BookingRepository> {
    bookings: B,
}

impl<B: BookingRepository> BookingService<B> {
    pub fn new(bookings: B) -> Self {
        Self { bookings }
    }

    /// Books a room for a person. Rejects inverted date ranges and bookings
    /// longer than one hour; overlap with existing bookings is only checked
    /// by the availability query, not here.
    pub fn book(&self, request: &BookingRequest) -> ServiceResult<EntityId> {
        validate_times(request)?;

        let booking = Booking {
            id: 0,
            person_id: request.person_id,
            room_id: request.room_id,
            start_time: request.start_time,
            end_time: request.end_time,
        };

        let id = self.bookings.add(&booking)?;
        debug!("Added booking: {:?}", booking);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<BookingModel> {
        self.bookings
            .get(id)?
            .map(BookingModel::from)
            .ok_or_else(|| ServiceError::NotFound(format!("booking {id} not found")))
    }

    pub fn list(&self) -> ServiceResult<Vec<BookingModel>> {
        Ok(self
            .bookings
            .list()?
            .into_iter()
            .map(BookingModel::from)
            .collect())
    }

    /// Replaces every mutable field of the booking, under the same rules as
    /// [`Self::book`].
    pub fn update(&self, id: EntityId, request: &BookingRequest) -> ServiceResult<EntityId> {
        validate_times(request)?;

        if self.bookings.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("booking {id} not found")));
        }

        let booking = Booking {
            id,
            person_id: request.person_id,
            room_id: request.room_id,
            start_time: request.start_time,
            end_time: request.end_time,
        };

        self.bookings.update(&booking)?;
        debug!("Updated booking: {:?}", booking);
        Ok(id)
    }

    pub fn remove(&self, id: EntityId) -> ServiceResult<EntityId> {
        if self.bookings.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("booking {id} not found")));
        }

        self.bookings.remove(id)?;
        debug!("Removed booking: {}", id);
        Ok(id)
    }
}

fn validate_times(request: &BookingRequest) -> ServiceResult<()> {
    if request.start_time > request.end_time {
        return Err(ServiceError::InvalidInput(
            "start time is after end time".to_string(),
        ));
    }

    if request.end_time - request.start_time > Duration::hours(1) {
        return Err(ServiceError::InvalidInput(
            "booking duration is longer than allowed: one hour at most".to_string(),
        ));
    }

    Ok(())
}
