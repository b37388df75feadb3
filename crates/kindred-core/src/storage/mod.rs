mod config;
pub mod migrations;
pub mod people_db;

pub use config::{Config, DisplayConfig, LogConfig, ProfileConfig};
pub use people_db::PeopleDb;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{ConfigError, StoreError};
use crate::person::{NewPerson, OwnerId, Person, PersonUpdate};

/// Owner-scoped persistence for person records.
///
/// Every operation takes the owner explicitly. Implementations must refuse
/// to read or modify records that belong to someone else.
pub trait PersonStore {
    /// All of the owner's people, newest first.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Person>, StoreError>;

    fn get(&self, owner: &OwnerId, id: &str) -> Result<Person, StoreError>;

    /// Validate and insert a new record with `created_at = updated_at = now`.
    fn create(&self, owner: &OwnerId, input: NewPerson, now: DateTime<Utc>)
        -> Result<Person, StoreError>;

    /// Merge a partial update and return the stored result.
    fn update(
        &self,
        owner: &OwnerId,
        id: &str,
        update: PersonUpdate,
        now: DateTime<Utc>,
    ) -> Result<Person, StoreError>;

    fn delete(&self, owner: &OwnerId, id: &str) -> Result<(), StoreError>;

    /// People whose `next_reminder_date` is at or before `now`, soonest first.
    fn due_reminders(&self, owner: &OwnerId, now: DateTime<Utc>) -> Result<Vec<Person>, StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `KINDRED_DATA_DIR` wins when set. Otherwise `~/.config/kindred`, or
/// `~/.config/kindred-dev` with `KINDRED_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("KINDRED_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("KINDRED_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("kindred-dev")
            } else {
                base_dir.join("kindred")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
