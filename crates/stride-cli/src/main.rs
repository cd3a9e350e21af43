use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stride", version, about = "Stride habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Log completed units against a habit
    Log {
        /// Habit ID
        habit_id: String,
        /// Completed units
        units: f64,
        /// Timestamp to log at (RFC3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Goal ladder management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Progress report for one habit
    Progress {
        /// Habit ID
        habit_id: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Onboarding: rank candidates and stagger their start dates
    Onboard {
        #[command(subcommand)]
        action: commands::onboard::OnboardAction,
    },
    /// Per-habit statistics
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Log {
            habit_id,
            units,
            at,
        } => commands::log::run(&habit_id, units, at.as_deref()),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Progress { habit_id, json } => commands::progress::run(&habit_id, json),
        Commands::Onboard { action } => commands::onboard::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
