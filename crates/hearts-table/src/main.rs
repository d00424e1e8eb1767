use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use hearts_core::AppInfo;
use hearts_table::config::{PacingConfig, TableConfig};
use hearts_table::console::{run_autopilot, run_interactive};
use hearts_table::logging::init_logging;
use hearts_table::table::Table;

/// Hearts for one human against three automated seats.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-table",
    author,
    version,
    about = "Play Hearts in the terminal against three automated seats"
)]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed for dealing and automated play.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Let a policy play the human seat too.
    #[arg(long)]
    autopilot: bool,

    /// Skip the pauses before automated moves and trick collection.
    #[arg(long)]
    fast: bool,

    /// Number of deals to play in autopilot mode.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    deals: usize,

    /// Print the table as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if cli.autopilot {
        config.autopilot = true;
    }

    if cli.fast {
        config.pacing = PacingConfig::INSTANT;
    }

    config.validate()?;

    let logging_guard = init_logging(&config.logging)?;
    if let Some(path) = logging_guard.log_path() {
        eprintln!("Structured log: {}", path.display());
    }

    let mut table = Table::from_config(&config).context("opening the table")?;
    println!("{} {}", AppInfo::name(), AppInfo::version());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if config.autopilot {
        run_autopilot(&mut table, cli.deals.max(1), &mut out, cli.json)
    } else {
        run_interactive(&mut table, io::stdin().lock(), &mut out, cli.json)
    }
}
