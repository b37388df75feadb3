//! # Kindred Core Library
//!
//! Core logic for Kindred, a personal relationship manager. Users track the
//! people who matter to them (family, friends, contacts) along with
//! birthdates and a check-in cadence, and Kindred derives the list of
//! upcoming actions from those records.
//!
//! The CLI binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Person model**: validated records and partial updates
//! - **Actions**: pure next-action scheduler over a snapshot of people
//! - **Filter**: gallery-style search and facet extraction
//! - **Storage**: owner-scoped SQLite person store and TOML configuration
//!
//! ## Key Components
//!
//! - [`compute_next_actions`]: the scheduler
//! - [`PersonStore`]: owner-scoped persistence seam
//! - [`PeopleDb`]: SQLite implementation of [`PersonStore`]
//! - [`Config`]: application configuration management

pub mod actions;
pub mod clock;
pub mod error;
pub mod filter;
pub mod person;
pub mod storage;

pub use actions::{compute_next_actions, ActionType, NextAction};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use filter::{facets, Facets, PersonFilter};
pub use person::{parse_tags, NewPerson, OwnerId, Person, PersonUpdate, ReminderFrequency};
pub use storage::{Config, PeopleDb, PersonStore};
