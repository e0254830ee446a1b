use super::{ServiceError, ServiceResult};
use crate::domain::{Booking, EntityId, Room};
use crate::repo::{BookingRepository, RoomRepository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct RoomRequest {
    pub name: String,
}

/// What to do with a room's bookings when the room is removed. Without the
/// flag they are deleted along with the room.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveRoomOptions {
    #[serde(default)]
    pub move_bookings: bool,
    pub new_room_id: Option<EntityId>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RoomModel {
    pub id: EntityId,
    pub name: String,
}

impl From<Room> for RoomModel {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
        }
    }
}

pub struct RoomService<R: RoomRepository, B: BookingRepository> {
    rooms: R,
    bookings: B,
}

impl<R: RoomRepository, B: BookingRepository> RoomService<R, B> {
    pub fn new(rooms: R, bookings: B) -> Self {
        Self { rooms, bookings }
    }

    pub fn add(&self, request: &RoomRequest) -> ServiceResult<EntityId> {
        let name = valid_name(request)?;
        self.reject_duplicate_name(name, None)?;

        let id = self.rooms.add(&Room {
            id: 0,
            name: name.to_string(),
        })?;
        debug!("Added room {}: {}", id, name);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<RoomModel> {
        self.rooms
            .get(id)?
            .map(RoomModel::from)
            .ok_or_else(|| ServiceError::NotFound(format!("room {id} not found")))
    }

    /// All rooms, optionally narrowed to names starting with `name_prefix`.
    pub fn list(&self, name_prefix: Option<&str>) -> ServiceResult<Vec<RoomModel>> {
        Ok(self
            .rooms
            .list_matching(name_prefix)?
            .into_iter()
            .map(RoomModel::from)
            .collect())
    }

    /// Rooms free for the whole [start, end) window. A room with a booking
    /// ending exactly at `start` (or starting exactly at `end`) is free.
    pub fn available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        name_prefix: Option<&str>,
    ) -> ServiceResult<Vec<RoomModel>> {
        Ok(self
            .rooms
            .available_between(start, end, name_prefix)?
            .into_iter()
            .map(RoomModel::from)
            .collect())
    }

    pub fn update(&self, id: EntityId, request: &RoomRequest) -> ServiceResult<EntityId> {
        let name = valid_name(request)?;

        if self.rooms.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("room {id} not found")));
        }

        self.reject_duplicate_name(name, Some(id))?;

        self.rooms.update(&Room {
            id,
            name: name.to_string(),
        })?;
        debug!("Updated room {}: {}", id, name);
        Ok(id)
    }

    /// Removes a room. With `move_bookings` set, its bookings are first
    /// cloned onto `new_room_id` (same person and times); otherwise they are
    /// deleted together with the room.
    pub fn remove(&self, id: EntityId, options: &RemoveRoomOptions) -> ServiceResult<EntityId> {
        if self.rooms.get(id)?.is_none() {
            return Err(ServiceError::NotFound(format!("room {id} not found")));
        }

        if options.move_bookings {
            let new_room_id = options.new_room_id.ok_or_else(|| {
                ServiceError::InvalidInput(
                    "a target room is required when moving bookings".to_string(),
                )
            })?;

            for booking in self.bookings.for_room(id)? {
                self.bookings.add(&Booking {
                    id: 0,
                    person_id: booking.person_id,
                    room_id: new_room_id,
                    start_time: booking.start_time,
                    end_time: booking.end_time,
                })?;
            }
            debug!("Moved bookings from room {} to room {}", id, new_room_id);
        }

        self.rooms.remove(id)?;
        debug!("Removed room: {}", id);
        Ok(id)
    }

    /// Applies [`Self::remove`] to each room in turn. Rooms that fail to be
    /// removed are logged and skipped, the rest still go.
    pub fn remove_many(
        &self,
        room_ids: &[EntityId],
        options: &RemoveRoomOptions,
    ) -> ServiceResult<Vec<EntityId>> {
        for &room_id in room_ids {
            if let Err(e) = self.remove(room_id, options) {
                error!("Error removing room {}: {}", room_id, e);
            }
        }

        Ok(room_ids.to_vec())
    }

    fn reject_duplicate_name(&self, name: &str, own_id: Option<EntityId>) -> ServiceResult<()> {
        if let Some(existing) = self.rooms.find_by_name(name)? {
            if Some(existing.id) != own_id {
                return Err(ServiceError::Conflict(format!(
                    "a room named `{name}` already exists"
                )));
            }
        }

        Ok(())
    }
}

fn valid_name(request: &RoomRequest) -> ServiceResult<&str> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "a room name is required".to_string(),
        ));
    }

    Ok(name)
}
