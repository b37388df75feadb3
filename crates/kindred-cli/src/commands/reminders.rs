//! Reminder queries for CLI.

use clap::Subcommand;
use kindred_core::{PeopleDb, PersonStore};

use super::{resolve_now, Context};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// People whose next reminder date has arrived
    Due {
        /// Print JSON
        #[arg(long)]
        json: bool,
        /// Evaluate as of this instant instead of now
        #[arg(long)]
        now: Option<String>,
    },
}

pub fn run(action: ReminderAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let owner = ctx.owner()?;
    let db = PeopleDb::open()?;

    match action {
        ReminderAction::Due { json, now } => {
            let now = resolve_now(now.as_deref())?;
            let due = db.due_reminders(&owner, now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&due)?);
            } else if due.is_empty() {
                println!("No reminders due");
            } else {
                for person in &due {
                    let when = person
                        .next_reminder_date
                        .map(|dt| ctx.format_date(dt.date_naive()))
                        .unwrap_or_default();
                    println!("{when}  {}  {}", person.name, person.id);
                }
            }
        }
    }
    Ok(())
}
