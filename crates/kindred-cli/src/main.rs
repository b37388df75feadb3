use clap::{Parser, Subcommand};
use kindred_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kindred", version, about = "Kindred CLI: keep track of the people who matter")]
struct Cli {
    /// User id to act as (falls back to KINDRED_USER, then profile.user_id)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tracked people
    Person {
        #[command(subcommand)]
        action: commands::person::PersonAction,
    },
    /// Show upcoming birthdays and check-ins
    Actions(commands::actions::ActionsArgs),
    /// Reminder queries
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("KINDRED_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = load_error {
        tracing::warn!("using default configuration: {e}");
    }

    let ctx = commands::Context::new(cli.user, config);
    let result = match cli.command {
        Commands::Person { action } => commands::person::run(action, &ctx),
        Commands::Actions(args) => commands::actions::run(args, &ctx),
        Commands::Reminders { action } => commands::reminders::run(action, &ctx),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
