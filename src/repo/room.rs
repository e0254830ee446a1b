use super::{timestamp_to_db, RepoError, RepoResult, Repository};
use crate::domain::{EntityId, Room};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub trait RoomRepository: Repository<Entity = Room> {
    /// Exact name lookup, used for the uniqueness check.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Room>>;

    /// All rooms, optionally narrowed to names starting with `name_prefix`.
    fn list_matching(&self, name_prefix: Option<&str>) -> RepoResult<Vec<Room>>;

    /// Rooms with no booking overlapping the [start, end) window, optionally
    /// narrowed by name prefix. A booking overlaps when it occupies any
    /// instant of the window; touching edges do not count.
    fn available_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        name_prefix: Option<&str>,
    ) -> RepoResult<Vec<Room>>;
}

pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Repository for SqliteRoomRepository<'_> {
    type Entity = Room;

    fn add(&self, room: &Room) -> RepoResult<EntityId> {
        self.conn
            .execute("INSERT INTO rooms (name) VALUES (?1);", params![room.name])?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, room: &Room) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE rooms SET name = ?1 WHERE id = ?2;",
            params![room.name, room.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "room",
                id: room.id,
            });
        }

        Ok(())
    }

    fn remove(&self, id: EntityId) -> RepoResult<()> {
        // Bookings on the room go with it, see the schema's ON DELETE CASCADE
        let changed = self
            .conn
            .execute("DELETE FROM rooms WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "room", id });
        }

        Ok(())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM rooms WHERE id = ?1;")?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_room_row(row)?));
        }

        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Room>> {
        self.list_matching(None)
    }
}

impl RoomRepository for SqliteRoomRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM rooms WHERE name = ?1;")?;

        let mut rows = stmt.query(params![name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_room_row(row)?));
        }

        Ok(None)
    }

    fn list_matching(&self, name_prefix: Option<&str>) -> RepoResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM rooms
             WHERE ?1 IS NULL OR name LIKE ?1 || '%'
             ORDER BY name;",
        )?;

        let mut rows = stmt.query(params![name_prefix])?;
        let mut rooms = Vec::new();

        while let Some(row) = rows.next()? {
            rooms.push(parse_room_row(row)?);
        }

        Ok(rooms)
    }

    fn available_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        name_prefix: Option<&str>,
    ) -> RepoResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM rooms
             WHERE (?1 IS NULL OR name LIKE ?1 || '%')
               AND NOT EXISTS (
                   SELECT 1 FROM bookings
                   WHERE bookings.room_id = rooms.id
                     AND bookings.start_time < ?3
                     AND bookings.end_time > ?2
               )
             ORDER BY name;",
        )?;

        let mut rows = stmt.query(params![
            name_prefix,
            timestamp_to_db(start),
            timestamp_to_db(end)
        ])?;
        let mut rooms = Vec::new();

        while let Some(row) = rows.next()? {
            rooms.push(parse_room_row(row)?);
        }

        Ok(rooms)
    }
}

fn parse_room_row(row: &Row<'_>) -> RepoResult<Room> {
    Ok(Room {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
