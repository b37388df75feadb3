pub mod actions;
pub mod config;
pub mod person;
pub mod reminders;

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, Utc};
use kindred_core::person::parse_instant;
use kindred_core::{Clock, Config, FixedClock, OwnerId, SystemClock};

/// State shared by every command.
pub struct Context {
    user: Option<String>,
    pub config: Config,
}

impl Context {
    pub fn new(user: Option<String>, config: Config) -> Self {
        Self { user, config }
    }

    /// Owner from `--user`, then `KINDRED_USER`, then `profile.user_id`.
    pub fn owner(&self) -> Result<OwnerId, Box<dyn std::error::Error>> {
        let raw = self
            .user
            .clone()
            .or_else(|| std::env::var("KINDRED_USER").ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| self.config.profile.user_id.clone())
            .ok_or("no user id: pass --user, set KINDRED_USER, or set profile.user_id")?;
        Ok(OwnerId::new(raw)?)
    }

    /// Render a date with `display.date_format`, falling back to ISO
    /// format if the pattern is invalid or asks for fields a date lacks.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.config.display.date_format)).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}

/// Resolve `--now`, defaulting to the system clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let clock: Box<dyn Clock> = match now {
        Some(raw) => Box::new(FixedClock(parse_instant("now", raw)?)),
        None => Box::new(SystemClock),
    };
    Ok(clock.now())
}
