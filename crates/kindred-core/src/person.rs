//! Person records and boundary validation.
//!
//! Everything the scheduler reads is checked here, at construction time:
//! required text fields, reminder frequency membership and date syntax.
//! Once a [`Person`] exists it is well-formed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of the user that owns a set of person records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Build an owner id, rejecting blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required { field: "user id" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often the user wants to check in with someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReminderFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderFrequency::Daily => "daily",
            ReminderFrequency::Weekly => "weekly",
            ReminderFrequency::Monthly => "monthly",
            ReminderFrequency::Yearly => "yearly",
        }
    }

    /// Parse form input where a blank value means "no reminder".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ValidationError> {
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            raw.parse().map(Some)
        }
    }
}

impl FromStr for ReminderFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ReminderFrequency::Daily),
            "weekly" => Ok(ReminderFrequency::Weekly),
            "monthly" => Ok(ReminderFrequency::Monthly),
            "yearly" => Ok(ReminderFrequency::Yearly),
            _ => Err(ValidationError::InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked person, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: String,
    pub relationship: String,
    pub photo_url: Option<String>,
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub last_interaction_date: Option<DateTime<Utc>>,
    pub next_reminder_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Merge a partial update into this record and bump `updated_at`.
    ///
    /// The update is validated first; on error the record is untouched.
    pub fn apply(&mut self, update: PersonUpdate, now: DateTime<Utc>) -> Result<(), ValidationError> {
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(relationship) = update.relationship {
            self.relationship = relationship.trim().to_string();
        }
        if let Some(photo_url) = update.photo_url {
            self.photo_url = photo_url;
        }
        if let Some(birthdate) = update.birthdate {
            self.birthdate = birthdate;
        }
        if let Some(tags) = update.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(frequency) = update.reminder_frequency {
            self.reminder_frequency = frequency;
        }
        if let Some(last) = update.last_interaction_date {
            self.last_interaction_date = last;
        }
        if let Some(next) = update.next_reminder_date {
            self.next_reminder_date = next;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Input for creating a person. Store-managed fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub description: String,
    pub relationship: String,
    pub photo_url: Option<String>,
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reminder_frequency: Option<ReminderFrequency>,
    pub last_interaction_date: Option<DateTime<Utc>>,
    pub next_reminder_date: Option<DateTime<Utc>>,
}

impl NewPerson {
    /// Check the required text fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("relationship", &self.relationship)?;
        require("description", &self.description)?;
        Ok(())
    }

    /// Validate and turn into a stored record.
    pub fn into_person(
        self,
        owner: &OwnerId,
        id: String,
        now: DateTime<Utc>,
    ) -> Result<Person, ValidationError> {
        self.validate()?;
        Ok(Person {
            id,
            owner_id: owner.clone(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            relationship: self.relationship.trim().to_string(),
            photo_url: self.photo_url,
            birthdate: self.birthdate,
            tags: dedup_tags(self.tags),
            reminder_frequency: self.reminder_frequency,
            last_interaction_date: self.last_interaction_date,
            next_reminder_date: self.next_reminder_date,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub relationship: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
    pub reminder_frequency: Option<Option<ReminderFrequency>>,
    pub last_interaction_date: Option<Option<DateTime<Utc>>>,
    pub next_reminder_date: Option<Option<DateTime<Utc>>>,
}

impl PersonUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(relationship) = &self.relationship {
            require("relationship", relationship)?;
        }
        if let Some(description) = &self.description {
            require("description", description)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Split comma-separated tag input.
///
/// Entries are trimmed, blanks dropped, and repeats removed keeping the
/// first occurrence.
pub fn parse_tags(raw: &str) -> Vec<String> {
    dedup_tags(raw.split(',').map(str::to_string).collect())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Parse an RFC 3339 timestamp, or a bare date taken as midnight UTC.
pub fn parse_instant(field: &'static str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw_trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw_trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_date(field, raw_trimmed).map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}
