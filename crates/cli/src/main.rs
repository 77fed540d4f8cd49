mod commands;
mod interactive;
mod paths;
mod settings;

use clap::{Parser, Subcommand};
use commands::DatabaseArgs;
use stele_core::MigrationError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stele")]
#[command(version, about = "Deterministic SQL schema migrations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations, oldest first
    Up {
        /// Glob pattern bounding how far the run proceeds
        limit_pattern: Option<String>,

        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Roll back applied migrations, newest first
    Down {
        /// Glob pattern bounding how far the rollback proceeds
        limit_pattern: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Show the applied/pending state of every discovered migration
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Create the migrations directory and the ledger table
    Init {
        /// Directory to initialize (defaults to the current directory)
        path: Option<std::path::PathBuf>,

        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Create an up/down migration script pair
    Create {
        /// Migration name (lowercase letters, digits and dashes)
        name: String,
    },

    /// Delete a migration's up/down script files
    Remove {
        /// Migration name to remove
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let outcome: Result<(), MigrationError> = match cli.command {
        Commands::Up {
            limit_pattern,
            database,
        } => commands::up::run(limit_pattern.as_deref(), &database).await,
        Commands::Down {
            limit_pattern,
            yes,
            database,
        } => commands::down::run(limit_pattern.as_deref(), yes, &database).await,
        Commands::Status { json, database } => commands::status::run(json, &database).await,
        Commands::Init { path, database } => commands::init::run(path.as_deref(), &database).await,
        Commands::Create { name } => commands::create::run(&name),
        Commands::Remove { name, yes } => commands::remove::run(&name, yes),
    };

    if let Err(err) = outcome {
        eprintln!("{}", console::style(format!("{err}")).red());
        std::process::exit(1);
    }
}
