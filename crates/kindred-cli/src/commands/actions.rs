//! Upcoming actions command.

use clap::Args;
use kindred_core::{compute_next_actions, ActionType, NextAction, PeopleDb, PersonStore};

use super::{resolve_now, Context};

#[derive(Args)]
pub struct ActionsArgs {
    /// Print JSON
    #[arg(long)]
    json: bool,
    /// Show at most N actions (overrides display.upcoming_limit; 0 shows all)
    #[arg(long)]
    limit: Option<u32>,
    /// Evaluate as of this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    now: Option<String>,
}

fn truncate(mut actions: Vec<NextAction>, limit: u32) -> Vec<NextAction> {
    if limit > 0 {
        actions.truncate(limit as usize);
    }
    actions
}

fn label(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::Birthday => "birthday",
        ActionType::CheckIn => "check-in",
    }
}

pub fn run(args: ActionsArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let owner = ctx.owner()?;
    let now = resolve_now(args.now.as_deref())?;
    let db = PeopleDb::open()?;

    let people = db.list(&owner)?;
    let limit = args.limit.unwrap_or(ctx.config.display.upcoming_limit);
    let actions = truncate(compute_next_actions(&people, now), limit);
    tracing::debug!(people = people.len(), actions = actions.len(), "computed next actions");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    if actions.is_empty() {
        println!("No upcoming actions");
        return Ok(());
    }
    for action in &actions {
        println!(
            "{}  {:<8}  {}",
            ctx.format_date(action.due_date),
            label(action.action_type),
            action.description
        );
    }
    Ok(())
}
