//! worker-ledger: CLI for license-gated worker records

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use worker_ledger::config::Paths;
use worker_ledger::service::{Session, WorkerService};

mod commands;

use commands::prompt::StdinKeyProvider;

/// Environment variable holding the tracing filter
const LOG_ENV: &str = "WORKER_LEDGER_LOG";

#[derive(Parser)]
#[command(name = "worker-ledger")]
#[command(about = "Manage worker records behind a license key", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the license pool and worker files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// File holding the activated license key
    #[arg(long, global = true)]
    license_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the license pool if it does not exist yet
    Init,

    /// Show whether this installation is activated
    Status,

    /// Enter a license key
    Activate {
        /// License key (XXXXX-XXXXX-XXXXX-XXXXX)
        key: String,
    },

    /// Print keys from the license pool
    Issue {
        /// Number of keys to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Create a worker file (truncates an existing one)
    Create {
        /// Worker file name
        dataset: String,
    },

    /// Add a worker with zero attendance
    Add {
        /// Worker file name
        dataset: String,

        /// Worker name
        name: String,

        /// Salary
        salary: String,
    },

    /// Mark attendance for every worker with the given name
    Mark {
        /// Worker file name
        dataset: String,

        /// Worker name
        name: String,
    },

    /// Show the workers in a file
    View {
        /// Worker file name
        dataset: String,

        /// Output format: raw, table or json (default: raw)
        #[arg(long, short, default_value = "raw")]
        format: String,
    },

    /// Delete a worker file
    Delete {
        /// Worker file name
        dataset: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List worker files
    List,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let defaults = Paths::default();
    let paths = Paths::new(
        cli.data_dir.unwrap_or(defaults.data_dir),
        cli.license_file.unwrap_or(defaults.activation_file),
    );

    let mut service = WorkerService::new(paths, StdinKeyProvider);
    let mut session = Session::new();

    // `init` reports on pool creation itself; everything else creates it silently
    if !matches!(cli.command, Commands::Init) {
        service
            .ensure_license_pool()
            .context("Failed to prepare license pool")?;
    }

    match cli.command {
        Commands::Init => {
            commands::license::init(&service)?;
        }

        Commands::Status => {
            commands::license::status(&service)?;
        }

        Commands::Activate { key } => {
            commands::license::activate(&service, &mut session, &key)?;
        }

        Commands::Issue { count } => {
            commands::license::issue(&service, count)?;
        }

        Commands::Create { dataset } => {
            commands::dataset::create(&mut service, &mut session, &dataset)?;
        }

        Commands::Add {
            dataset,
            name,
            salary,
        } => {
            commands::dataset::add(&mut service, &mut session, &dataset, &name, &salary)?;
        }

        Commands::Mark { dataset, name } => {
            commands::dataset::mark(&mut service, &mut session, &dataset, &name)?;
        }

        Commands::View { dataset, format } => {
            let format = commands::view::ViewFormat::from_str(&format)
                .context("Invalid format. Use 'raw', 'table' or 'json'")?;
            if let Some(output) =
                commands::view::execute(&mut service, &mut session, &dataset, format)?
            {
                println!("{}", output);
            }
        }

        Commands::Delete { dataset, yes } => {
            commands::dataset::delete(&mut service, &mut session, &dataset, yes)?;
        }

        Commands::List => {
            let output = commands::dataset::list(&service)?;
            println!("{}", output);
        }
    }

    Ok(())
}
