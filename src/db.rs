use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS people (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    phone_number  TEXT NOT NULL,
    email         TEXT NOT NULL,
    date_of_birth TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS bookings (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id  INTEGER NOT NULL REFERENCES people (id) ON DELETE CASCADE,
    room_id    INTEGER NOT NULL REFERENCES rooms (id) ON DELETE CASCADE,
    start_time INTEGER NOT NULL,
    end_time   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookings_room ON bookings (room_id, start_time);
";

/// Opens the database file and prepares it for use.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    info!("Opening database at: {}", path.display());

    let conn = Connection::open(path)
        .with_context(|| format!("opening database at {}", path.display()))?;
    bootstrap(&conn)?;
    Ok(conn)
}

/// In-memory database with the same schema, used by the test suites.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("opening in-memory database")?;
    bootstrap(&conn)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> Result<()> {
    // Cascade deletes rely on foreign keys being enforced
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .context("enabling foreign keys")?;
    conn.busy_timeout(Duration::from_secs(5))
        .context("setting busy timeout")?;
    conn.execute_batch(SCHEMA).context("applying schema")?;
    Ok(())
}
