//! Person management commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use kindred_core::person::{parse_date, parse_instant};
use kindred_core::{
    facets, parse_tags, NewPerson, PeopleDb, Person, PersonFilter, PersonStore, PersonUpdate,
    ReminderFrequency, ValidationError,
};

use super::Context;

#[derive(Subcommand)]
pub enum PersonAction {
    /// Start tracking someone
    Add {
        /// Display name
        name: String,
        /// Relationship label (e.g. friend, family)
        #[arg(long)]
        relationship: String,
        /// Short description
        #[arg(long)]
        description: String,
        /// Birthdate as YYYY-MM-DD
        #[arg(long)]
        birthdate: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Check-in cadence: daily, weekly, monthly or yearly
        #[arg(long)]
        frequency: Option<String>,
        /// Anchor for the next check-in (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        next_reminder: Option<String>,
        /// When you last spoke (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        last_interaction: Option<String>,
        /// Link to a profile photo
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// List people, optionally filtered
    List {
        /// Case-insensitive search over name and description
        #[arg(long)]
        search: Option<String>,
        /// Exact relationship
        #[arg(long)]
        relationship: Option<String>,
        /// Exact tag
        #[arg(long)]
        tag: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one person as JSON
    Get {
        /// Person ID
        id: String,
    },
    /// Update a person; pass an empty value to clear an optional field
    Update {
        /// Person ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        relationship: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        birthdate: Option<String>,
        /// Comma-separated tags (replaces existing)
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        next_reminder: Option<String>,
        #[arg(long)]
        last_interaction: Option<String>,
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// Stop tracking someone
    Delete {
        /// Person ID
        id: String,
    },
    /// Distinct relationships and tags, for building filters
    Facets,
}

/// Empty input clears the field.
fn clearable<T>(
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> Result<Option<Option<T>>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(Some(None)),
        Some(s) => parse(&s).map(|v| Some(Some(v))),
    }
}

fn optional<T>(
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    clearable(raw, parse).map(Option::flatten)
}

fn birthdate(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_date("birthdate", raw)
}

fn next_reminder(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_instant("next_reminder", raw)
}

fn last_interaction(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_instant("last_interaction", raw)
}

fn frequency(raw: &str) -> Result<ReminderFrequency, ValidationError> {
    raw.parse()
}

fn summary_line(person: &Person) -> String {
    let mut line = format!("{}  {} ({})", person.id, person.name, person.relationship);
    if !person.tags.is_empty() {
        line.push_str(&format!(" [{}]", person.tags.join(", ")));
    }
    if let Some(freq) = person.reminder_frequency {
        line.push_str(&format!(" every {}", match freq {
            ReminderFrequency::Daily => "day",
            ReminderFrequency::Weekly => "week",
            ReminderFrequency::Monthly => "month",
            ReminderFrequency::Yearly => "year",
        }));
    }
    line
}

pub fn run(action: PersonAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let owner = ctx.owner()?;
    let db = PeopleDb::open()?;

    match action {
        PersonAction::Add {
            name,
            relationship,
            description,
            birthdate: birth,
            tags,
            frequency: freq,
            next_reminder: next,
            last_interaction: last,
            photo_url,
        } => {
            let input = NewPerson {
                name,
                description,
                relationship,
                photo_url: photo_url.filter(|u| !u.trim().is_empty()),
                birthdate: optional(birth, birthdate)?,
                tags: tags.as_deref().map(parse_tags).unwrap_or_default(),
                reminder_frequency: optional(freq, frequency)?,
                last_interaction_date: optional(last, last_interaction)?,
                next_reminder_date: optional(next, next_reminder)?,
            };
            let person = db.create(&owner, input, Utc::now())?;
            println!("Person created: {}", person.id);
            println!("{}", serde_json::to_string_pretty(&person)?);
        }
        PersonAction::List {
            search,
            relationship,
            tag,
            json,
        } => {
            let people = db.list(&owner)?;
            let filter = PersonFilter {
                search,
                relationship,
                tag,
            };
            let matched = filter.apply(&people);
            tracing::debug!(total = people.len(), matched = matched.len(), "listed people");
            if json {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            } else if matched.is_empty() {
                println!("No people found");
            } else {
                for person in matched {
                    println!("{}", summary_line(person));
                }
            }
        }
        PersonAction::Get { id } => {
            let person = db.get(&owner, &id)?;
            println!("{}", serde_json::to_string_pretty(&person)?);
        }
        PersonAction::Update {
            id,
            name,
            relationship,
            description,
            birthdate: birth,
            tags,
            frequency: freq,
            next_reminder: next,
            last_interaction: last,
            photo_url,
        } => {
            let update = PersonUpdate {
                name,
                description,
                relationship,
                photo_url: clearable(photo_url, |s| Ok(s.trim().to_string()))?,
                birthdate: clearable(birth, birthdate)?,
                tags: tags.as_deref().map(parse_tags),
                reminder_frequency: clearable(freq, frequency)?,
                last_interaction_date: clearable(last, last_interaction)?,
                next_reminder_date: clearable(next, next_reminder)?,
            };
            if update.is_empty() {
                return Err("nothing to update".into());
            }
            let person = db.update(&owner, &id, update, Utc::now())?;
            println!("Person updated: {}", person.id);
            println!("{}", serde_json::to_string_pretty(&person)?);
        }
        PersonAction::Delete { id } => {
            db.delete(&owner, &id)?;
            println!("Person deleted: {id}");
        }
        PersonAction::Facets => {
            let people = db.list(&owner)?;
            println!("{}", serde_json::to_string_pretty(&facets(&people))?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearable_distinguishes_absent_blank_and_value() {
        assert_eq!(clearable(None, frequency).unwrap(), None);
        assert_eq!(clearable(Some(" ".into()), frequency).unwrap(), Some(None));
        assert_eq!(
            clearable(Some("weekly".into()), frequency).unwrap(),
            Some(Some(ReminderFrequency::Weekly))
        );
        assert!(clearable(Some("hourly".into()), frequency).is_err());
    }

    #[test]
    fn optional_flattens_blank() {
        assert_eq!(optional(Some(String::new()), birthdate).unwrap(), None);
        assert_eq!(
            optional(Some("1990-06-01".into()), birthdate).unwrap(),
            NaiveDate::from_ymd_opt(1990, 6, 1)
        );
    }
}
