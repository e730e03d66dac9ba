mod commands;
mod render;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(about = "Staff operations toolkit: task board, staff directory, shift calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the task board
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show the month calendar with roster indicators
    Calendar {
        /// Month to display (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Simulated tap sequence on day cells, e.g. "10,5" for a range or
        /// "7x2" for a quick double tap
        #[arg(short, long)]
        taps: Option<String>,
    },
    /// List the staff directory
    Staff,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List {
        /// Filter by status (pending, in-progress, completed)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Add a task
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Staff member to assign the task to
        #[arg(short, long)]
        assign: Option<String>,
    },
    /// Mark a task in progress
    Start { id: String },
    /// Mark a task completed
    Done { id: String },
    /// Remove a task
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tasks { command } => match command {
            TaskCommands::List { status } => commands::tasks::list(status.as_deref()).await,
            TaskCommands::Add {
                title,
                description,
                priority,
                assign,
            } => commands::tasks::add(title, description, &priority, assign).await,
            TaskCommands::Start { id } => commands::tasks::set_status(&id, "in-progress").await,
            TaskCommands::Done { id } => commands::tasks::set_status(&id, "completed").await,
            TaskCommands::Remove { id } => commands::tasks::remove(&id).await,
        },
        Commands::Calendar { month, taps } => {
            commands::calendar::run(month.as_deref(), taps.as_deref())
        }
        Commands::Staff => commands::staff::run(),
    }
}
