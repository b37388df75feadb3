//! Next-action scheduling.
//!
//! Derives the upcoming birthdays and check-ins for a snapshot of people.
//! This module is pure: no I/O, no clock reads, no logging. The caller
//! passes `now` and gets back a freshly built, date-ordered list.
//!
//! ## Date rules
//!
//! All dates are evaluated at day precision in UTC.
//!
//! - **Birthday**: the birth month/day in the current year, or next year
//!   if that day started before `now`. Once midnight UTC has passed, a
//!   birthday falling today is reported for next year.
//! - **Check-in**: exactly one frequency step after the anchor
//!   (`next_reminder_date`, or today when unset). There is no catch-up:
//!   a long-overdue anchor produces a due date that is still in the past.
//!
//! Feb 29 in a common year lands on March 1, both for birthdays and for
//! yearly check-ins. Monthly check-ins clamp to the end of the month.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::{Person, ReminderFrequency};

/// Kind of upcoming action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Birthday,
    CheckIn,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Birthday => "birthday",
            ActionType::CheckIn => "check_in",
        }
    }
}

/// A derived, display-ready action. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub person_id: String,
    pub person_name: String,
    pub action_type: ActionType,
    pub due_date: NaiveDate,
    pub description: String,
}

impl NextAction {
    fn birthday(person: &Person, due_date: NaiveDate) -> Self {
        Self {
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            action_type: ActionType::Birthday,
            due_date,
            description: format!("{}'s birthday", person.name),
        }
    }

    fn check_in(person: &Person, due_date: NaiveDate) -> Self {
        Self {
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            action_type: ActionType::CheckIn,
            due_date,
            description: format!("Check in with {}", person.name),
        }
    }

    /// Key for list rendering. Actions have no identity across runs, so
    /// the position in the current list is part of the key.
    pub fn display_key(&self, position: usize) -> String {
        format!("{}-{}-{}", self.person_id, self.action_type.as_str(), position)
    }
}

/// Compute every upcoming action for `people`, ordered by due date.
///
/// Each person yields a birthday action if they have a birthdate and a
/// check-in action if they have a reminder frequency, in that order.
/// Equal due dates keep generation order.
pub fn compute_next_actions(people: &[Person], now: DateTime<Utc>) -> Vec<NextAction> {
    let today = now.date_naive();
    let mut actions = Vec::with_capacity(people.len() * 2);

    for person in people {
        if let Some(birthdate) = person.birthdate {
            actions.push(NextAction::birthday(person, next_birthday(birthdate, now)));
        }
        if let Some(frequency) = person.reminder_frequency {
            let anchor = person
                .next_reminder_date
                .map(|dt| dt.date_naive())
                .unwrap_or(today);
            actions.push(NextAction::check_in(person, step(anchor, frequency)));
        }
    }

    // sort_by_key is stable
    actions.sort_by_key(|a| a.due_date);
    actions
}

/// Next occurrence of `birthdate`'s month/day whose start of day (UTC)
/// is not before `now`.
pub fn next_birthday(birthdate: NaiveDate, now: DateTime<Utc>) -> NaiveDate {
    let year = now.year();
    let candidate = same_day_in_year(birthdate, year);
    if start_of_day(candidate) < now {
        same_day_in_year(birthdate, year.saturating_add(1))
    } else {
        candidate
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `date`'s month/day in `year`; Feb 29 falls on March 1 in common years.
fn same_day_in_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(NaiveDate::MAX)
}

/// Advance `anchor` by exactly one `frequency` period.
///
/// Month steps clamp to the last day of the target month
/// (Jan 31 + 1 month = Feb 28/29). Year steps from Feb 29 land on March 1
/// in common years. Saturates at the calendar's upper bound.
pub fn step(anchor: NaiveDate, frequency: ReminderFrequency) -> NaiveDate {
    let next = match frequency {
        ReminderFrequency::Daily => anchor.checked_add_days(Days::new(1)),
        ReminderFrequency::Weekly => anchor.checked_add_days(Days::new(7)),
        ReminderFrequency::Monthly => anchor.checked_add_months(Months::new(1)),
        ReminderFrequency::Yearly => {
            return anchor
                .year()
                .checked_add(1)
                .map_or(NaiveDate::MAX, |year| same_day_in_year(anchor, year));
        }
    };
    next.unwrap_or(NaiveDate::MAX)
}
