//! SQLite-backed [`PersonStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::migrations;
use super::{data_dir, PersonStore};
use crate::error::StoreError;
use crate::person::{NewPerson, OwnerId, Person, PersonUpdate, ReminderFrequency};

const SELECT_COLUMNS: &str = "id, owner_id, name, description, relationship, photo_url, birthdate,
     tags, reminder_frequency, last_interaction_date, next_reminder_date, created_at, updated_at";

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_instant(id: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRow {
            id: id.to_string(),
            message: format!("bad timestamp '{raw}': {e}"),
        })
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Raw column values, decoded outside of rusqlite's row callback.
struct PersonRow {
    id: String,
    owner_id: String,
    name: String,
    description: String,
    relationship: String,
    photo_url: Option<String>,
    birthdate: Option<String>,
    tags: String,
    reminder_frequency: Option<String>,
    last_interaction_date: Option<String>,
    next_reminder_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PersonRow {
    fn read(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            relationship: row.get(4)?,
            photo_url: row.get(5)?,
            birthdate: row.get(6)?,
            tags: row.get(7)?,
            reminder_frequency: row.get(8)?,
            last_interaction_date: row.get(9)?,
            next_reminder_date: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_person(self) -> Result<Person, StoreError> {
        let id = self.id;
        let corrupt = |message: String| StoreError::CorruptRow {
            id: id.clone(),
            message,
        };

        let owner_id = OwnerId::new(&self.owner_id).map_err(|e| corrupt(e.to_string()))?;
        let birthdate = self
            .birthdate
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|e| corrupt(format!("bad birthdate '{raw}': {e}")))
            })
            .transpose()?;
        let tags: Vec<String> =
            serde_json::from_str(&self.tags).map_err(|e| corrupt(format!("bad tags: {e}")))?;
        let reminder_frequency = self
            .reminder_frequency
            .map(|raw| raw.parse::<ReminderFrequency>().map_err(|e| corrupt(e.to_string())))
            .transpose()?;
        let last_interaction_date = self
            .last_interaction_date
            .map(|raw| parse_instant(&id, &raw))
            .transpose()?;
        let next_reminder_date = self
            .next_reminder_date
            .map(|raw| parse_instant(&id, &raw))
            .transpose()?;
        let created_at = parse_instant(&id, &self.created_at)?;
        let updated_at = parse_instant(&id, &self.updated_at)?;

        Ok(Person {
            id,
            owner_id,
            name: self.name,
            description: self.description,
            relationship: self.relationship,
            photo_url: self.photo_url,
            birthdate,
            tags,
            reminder_frequency,
            last_interaction_date,
            next_reminder_date,
            created_at,
            updated_at,
        })
    }
}

/// SQLite database for person records.
pub struct PeopleDb {
    conn: Connection,
}

impl PeopleDb {
    /// Open the database at `<data_dir>/kindred.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, crate::error::CoreError> {
        let path = data_dir()?.join("kindred.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened people database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Fetch by id with no owner check; callers decide what a mismatch means.
    fn find(&self, id: &str) -> Result<Option<Person>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM people WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id], PersonRow::read)
            .optional()?;
        row.map(PersonRow::into_person).transpose()
    }

    fn find_owned(&self, owner: &OwnerId, id: &str) -> Result<Person, StoreError> {
        let person = self
            .find(id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if &person.owner_id != owner {
            tracing::warn!(person_id = id, owner = %owner, "rejected cross-owner access");
            return Err(StoreError::NotAuthorized { id: id.to_string() });
        }
        Ok(person)
    }

    fn query_people(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, PersonRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(PersonRow::into_person).collect()
    }

    fn write(&self, person: &Person) -> Result<(), StoreError> {
        let tags = serde_json::to_string(&person.tags).map_err(|e| StoreError::CorruptRow {
            id: person.id.clone(),
            message: e.to_string(),
        })?;
        self.conn.execute(
            "INSERT OR REPLACE INTO people (
                id, owner_id, name, description, relationship, photo_url, birthdate, tags,
                reminder_frequency, last_interaction_date, next_reminder_date, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                person.id,
                person.owner_id.as_str(),
                person.name,
                person.description,
                person.relationship,
                person.photo_url,
                person.birthdate.as_ref().map(format_date),
                tags,
                person.reminder_frequency.map(ReminderFrequency::as_str),
                person.last_interaction_date.as_ref().map(format_instant),
                person.next_reminder_date.as_ref().map(format_instant),
                format_instant(&person.created_at),
                format_instant(&person.updated_at),
            ],
        )?;
        Ok(())
    }
}

impl PersonStore for PeopleDb {
    fn list(&self, owner: &OwnerId) -> Result<Vec<Person>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM people
             WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        );
        self.query_people(&sql, params![owner.as_str()])
    }

    fn get(&self, owner: &OwnerId, id: &str) -> Result<Person, StoreError> {
        self.find_owned(owner, id)
    }

    fn create(&self, owner: &OwnerId, input: NewPerson, now: DateTime<Utc>) -> Result<Person, StoreError> {
        let person = input.into_person(owner, Uuid::new_v4().to_string(), now)?;
        self.write(&person)?;
        tracing::info!(person_id = %person.id, owner = %owner, "created person");
        Ok(person)
    }

    fn update(
        &self,
        owner: &OwnerId,
        id: &str,
        update: PersonUpdate,
        now: DateTime<Utc>,
    ) -> Result<Person, StoreError> {
        let mut person = self.find_owned(owner, id)?;
        person.apply(update, now)?;
        self.write(&person)?;
        tracing::info!(person_id = id, owner = %owner, "updated person");
        Ok(person)
    }

    fn delete(&self, owner: &OwnerId, id: &str) -> Result<(), StoreError> {
        self.find_owned(owner, id)?;
        self.conn.execute("DELETE FROM people WHERE id = ?1", params![id])?;
        tracing::info!(person_id = id, owner = %owner, "deleted person");
        Ok(())
    }

    fn due_reminders(&self, owner: &OwnerId, now: DateTime<Utc>) -> Result<Vec<Person>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM people
             WHERE owner_id = ?1
               AND next_reminder_date IS NOT NULL
               AND next_reminder_date <= ?2
             ORDER BY next_reminder_date ASC"
        );
        let cutoff = format_instant(&now);
        self.query_people(&sql, params![owner.as_str(), cutoff])
    }
}
