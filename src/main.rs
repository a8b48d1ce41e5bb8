//! Command-line entry point for SmartRank
//!
//! Replays a match history through the rating engine and prints either the
//! rated matches or the rating trajectories of selected competitors.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use smartrank::config::AppConfig;
use smartrank::rating::{InMemoryRatingStore, MatchPointCalculator, RatingEngine};
use smartrank::replay::{rating_trajectory, read_match_records, replay_matches, RatedMatch};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// SmartRank - Glicko-2 based ratings for badminton singles
#[derive(Parser)]
#[command(
    name = "smartrank",
    version,
    about = "Rate badminton singles matches with an adjusted Glicko-2 engine",
    long_about = "SmartRank replays a match history in order, updating each competitor's \
                 Glicko-2 rating and adding outsider, event grade and round bonuses as well \
                 as retirement and walkover penalties."
)]
struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        global = true,
        help = "Validate configuration and exit without rating any match"
    )]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate every match and write one JSON line per match with the new means.
    Replay(ReplayArgs),
    /// Print the rating trajectory of one or more competitors.
    Trajectory(TrajectoryArgs),
}

#[derive(Args)]
struct ReplayArgs {
    /// Match history, as JSON lines or a JSON array.
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct TrajectoryArgs {
    /// Match history, as JSON lines or a JSON array.
    #[arg(short, long)]
    input: PathBuf,

    /// Competitor ids to report.
    #[arg(short, long = "player", required = true, num_args = 1..)]
    players: Vec<String>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment and apply CLI overrides
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &cli.log_level {
        config.service.log_level = log_level.clone();
    }

    if cli.debug {
        config.service.log_level = "debug".to_string();
    }

    smartrank::config::validate_config(&config)?;
    Ok(config)
}

fn build_calculator(config: &AppConfig) -> Result<MatchPointCalculator> {
    let engine = RatingEngine::new(config.rating.clone())?;
    let store = Arc::new(InMemoryRatingStore::new(engine.default_rating()));
    MatchPointCalculator::new(engine, config.adjustments.clone(), store)
}

fn replay_file(config: &AppConfig, input: &Path) -> Result<Vec<RatedMatch>> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open match history {}", input.display()))?;
    let records = read_match_records(BufReader::new(file))?;
    info!("Loaded {} matches from {}", records.len(), input.display());

    let calculator = build_calculator(config)?;
    replay_matches(&calculator, &records)
}

fn run_replay(config: &AppConfig, args: ReplayArgs) -> Result<()> {
    let rated = replay_file(config, &args.input)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for rated_match in &rated {
        serde_json::to_writer(&mut writer, rated_match)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(())
}

fn run_trajectory(config: &AppConfig, args: TrajectoryArgs) -> Result<()> {
    let rated = replay_file(config, &args.input)?;

    let mut report = serde_json::Map::new();
    for player_id in &args.players {
        let trajectory = rating_trajectory(&rated, player_id);
        if trajectory.is_empty() {
            warn!("No match found for player {}", player_id);
        }
        report.insert(player_id.clone(), serde_json::to_value(trajectory)?);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if cli.dry_run {
        info!("Configuration validation successful");
        info!(
            "tau={} epsilon={} default rating {}/{}/{}",
            config.rating.tau,
            config.rating.epsilon,
            config.rating.default_mean,
            config.rating.default_deviation,
            config.rating.default_volatility
        );
        return Ok(());
    }

    match cli.command {
        Commands::Replay(args) => run_replay(&config, args),
        Commands::Trajectory(args) => run_trajectory(&config, args),
    }
}
