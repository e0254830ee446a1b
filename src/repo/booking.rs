use super::{timestamp_from_db, timestamp_to_db, RepoError, RepoResult, Repository};
use crate::domain::{Booking, EntityId};
use rusqlite::{params, Connection, Row};

const BOOKING_SELECT_SQL: &str = "SELECT
    id,
    person_id,
    room_id,
    start_time,
    end_time
FROM bookings";

pub trait BookingRepository: Repository<Entity = Booking> {
    /// All bookings held by one room, oldest start first.
    fn for_room(&self, room_id: EntityId) -> RepoResult<Vec<Booking>>;
}

pub struct SqliteBookingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Repository for SqliteBookingRepository<'_> {
    type Entity = Booking;

    fn add(&self, booking: &Booking) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO bookings (person_id, room_id, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                booking.person_id,
                booking.room_id,
                timestamp_to_db(booking.start_time),
                timestamp_to_db(booking.end_time),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, booking: &Booking) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE bookings
             SET person_id = ?1, room_id = ?2, start_time = ?3, end_time = ?4
             WHERE id = ?5;",
            params![
                booking.person_id,
                booking.room_id,
                timestamp_to_db(booking.start_time),
                timestamp_to_db(booking.end_time),
                booking.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "booking",
                id: booking.id,
            });
        }

        Ok(())
    }

    fn remove(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM bookings WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "booking",
                id,
            });
        }

        Ok(())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Booking>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKING_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_booking_row(row)?));
        }

        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Booking>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKING_SELECT_SQL} ORDER BY start_time, id;"))?;

        let mut rows = stmt.query([])?;
        let mut bookings = Vec::new();

        while let Some(row) = rows.next()? {
            bookings.push(parse_booking_row(row)?);
        }

        Ok(bookings)
    }
}

impl BookingRepository for SqliteBookingRepository<'_> {
    fn for_room(&self, room_id: EntityId) -> RepoResult<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOKING_SELECT_SQL} WHERE room_id = ?1 ORDER BY start_time, id;"
        ))?;

        let mut rows = stmt.query(params![room_id])?;
        let mut bookings = Vec::new();

        while let Some(row) = rows.next()? {
            bookings.push(parse_booking_row(row)?);
        }

        Ok(bookings)
    }
}

fn parse_booking_row(row: &Row<'_>) -> RepoResult<Booking> {
    Ok(Booking {
        id: row.get("id")?,
        person_id: row.get("person_id")?,
        room_id: row.get("room_id")?,
        start_time: timestamp_from_db("bookings.start_time", row.get("start_time")?)?,
        end_time: timestamp_from_db("bookings.end_time", row.get("end_time")?)?,
    })
}
