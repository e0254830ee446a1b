use super::{RepoError, RepoResult, Repository};
use crate::domain::{EntityId, Person};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Deserialize;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    phone_number,
    email,
    date_of_birth
FROM people";

/// Optional filters for listing people. String filters match by prefix,
/// the rest match exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

pub trait PersonRepository: Repository<Entity = Person> {
    fn filter(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>>;
}

pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Repository for SqlitePersonRepository<'_> {
    type Entity = Person;

    fn add(&self, person: &Person) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO people (first_name, last_name, phone_number, email, date_of_birth)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                person.first_name,
                person.last_name,
                person.phone_number,
                person.email,
                person.date_of_birth.to_string(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE people
             SET first_name = ?1, last_name = ?2, phone_number = ?3, email = ?4, date_of_birth = ?5
             WHERE id = ?6;",
            params![
                person.first_name,
                person.last_name,
                person.phone_number,
                person.email,
                person.date_of_birth.to_string(),
                person.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "person",
                id: person.id,
            });
        }

        Ok(())
    }

    fn remove(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM people WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "person",
                id,
            });
        }

        Ok(())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Person>> {
        self.filter(&PersonFilter::default())
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn filter(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>> {
        let mut sql = format!("{PERSON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(first_name) = &filter.first_name {
            sql.push_str(" AND first_name LIKE ? || '%'");
            bind_values.push(Value::Text(first_name.clone()));
        }

        if let Some(last_name) = &filter.last_name {
            sql.push_str(" AND last_name LIKE ? || '%'");
            bind_values.push(Value::Text(last_name.clone()));
        }

        if let Some(phone_number) = &filter.phone_number {
            sql.push_str(" AND phone_number = ?");
            bind_values.push(Value::Text(phone_number.clone()));
        }

        if let Some(email) = &filter.email {
            sql.push_str(" AND email = ?");
            bind_values.push(Value::Text(email.clone()));
        }

        if let Some(date_of_birth) = filter.date_of_birth {
            sql.push_str(" AND date_of_birth = ?");
            bind_values.push(Value::Text(date_of_birth.to_string()));
        }

        sql.push_str(" ORDER BY last_name, first_name, id;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let date_text: String = row.get("date_of_birth")?;
    let date_of_birth = date_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in people.date_of_birth"
        ))
    })?;

    Ok(Person {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone_number: row.get("phone_number")?,
        email: row.get("email")?,
        date_of_birth,
    })
}
