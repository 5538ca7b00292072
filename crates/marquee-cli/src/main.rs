use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "An arcade front-end with animated scrolling menus")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.config/marquee/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the front-end in the terminal
    Run {
        /// Layout name under <data_dir>/layouts
        #[arg(short, long)]
        layout: Option<String>,
        /// Collection shown first
        #[arg(short = 'C', long)]
        collection: Option<String>,
    },
    /// List the items of a collection
    List {
        /// Collection name (default: the configured start collection)
        collection: Option<String>,
        /// Only items of this playlist
        #[arg(short, long)]
        playlist: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Load a layout and report what it builds
    CheckLayout {
        /// Layout name (default: the configured layout)
        name: Option<String>,
    },
}

/// `RUST_LOG` wins over the configured level. The frame loop owns the
/// terminal, so `run` logs to a file.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let command = cli.command.unwrap_or(Commands::Run {
        layout: None,
        collection: None,
    });
    init_logging(&config, matches!(command, Commands::Run { .. }))?;

    match command {
        Commands::Run { layout, collection } => {
            commands::run::run(&config, layout.as_deref(), collection.as_deref()).await
        }
        Commands::List {
            collection,
            playlist,
            json,
        } => commands::list::run(&config, collection.as_deref(), playlist.as_deref(), json),
        Commands::CheckLayout { name } => commands::check_layout::run(&config, name.as_deref()),
    }
}
