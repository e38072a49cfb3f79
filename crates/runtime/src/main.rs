//! Headless match runner.
//!
//! Plays a match from the content directory with built-in programs, writes
//! the log, and verifies recorded logs by replaying them.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use arena_content::ContentFactory;
use arena_core::{Replayer, Team};
use arena_runtime::{
    FileMatchLog, IdleProvider, MatchRunner, ProviderRegistry, RunnerConfig, Skirmisher,
    StreamSink, read_log,
};

/// Headless referee for arena matches
#[derive(Parser)]
#[command(name = "arena", version)]
struct Cli {
    /// Content directory holding config.toml and maps/
    #[arg(short, long, value_name = "DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one match and record its log
    Run(RunArgs),
    /// Replay a recorded log and print its digests
    Verify {
        /// Match log written by `run --out`
        #[arg(value_name = "LOG")]
        log: PathBuf,
    },
    /// List the maps in the content directory
    Maps,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Map name (file stem under maps/)
    #[arg(short, long)]
    map: String,

    /// Override the map's seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the round limit
    #[arg(long)]
    max_rounds: Option<u32>,

    #[arg(long, value_enum, default_value = "skirmisher")]
    team_a: Program,

    #[arg(long, value_enum, default_value = "skirmisher")]
    team_b: Program,

    /// Write the log to this file (refuses to overwrite)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Stream the log to stdout instead
    #[arg(long, value_enum)]
    stream: Option<StreamFormatArg>,

    /// Per-turn wall-clock limit in milliseconds
    #[arg(long)]
    turn_timeout_ms: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Program {
    /// Does nothing
    Idle,
    /// Spawns soldiers and chases the closest enemy
    Skirmisher,
}

#[derive(Clone, Copy, ValueEnum)]
enum StreamFormatArg {
    Bincode,
    Jsonl,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let factory = ContentFactory::new(&cli.data_dir);

    match cli.command {
        Command::Run(args) => run(&factory, args).await,
        Command::Verify { log } => verify(&factory, &log),
        Command::Maps => {
            for name in factory.map_names()? {
                println!("{name}");
            }
            Ok(())
        }
    }
}

async fn run(factory: &ContentFactory, args: RunArgs) -> Result<()> {
    let mut setup = factory.load_setup(&args.map)?;
    if let Some(seed) = args.seed {
        setup.seed = seed;
    }
    if let Some(max_rounds) = args.max_rounds {
        setup.config.max_rounds = max_rounds;
    }

    let mut providers = ProviderRegistry::new();
    for (team, program) in [(Team::A, args.team_a), (Team::B, args.team_b)] {
        match program {
            Program::Idle => providers.register(team, IdleProvider),
            Program::Skirmisher => providers.register(team, Skirmisher),
        }
    }

    let config = RunnerConfig {
        turn_timeout: args.turn_timeout_ms.map(Duration::from_millis),
        ..RunnerConfig::default()
    };
    let builder = MatchRunner::builder()
        .config(config)
        .setup(setup)
        .providers(providers);

    let builder = match (args.out, args.stream) {
        (Some(_), Some(_)) => bail!("--out and --stream are mutually exclusive"),
        (Some(path), None) => builder.sink(
            FileMatchLog::create(&path)
                .with_context(|| format!("Failed to create match log {}", path.display()))?,
        ),
        (None, Some(StreamFormatArg::Bincode)) => builder.sink(StreamSink::bincode(io::stdout())),
        (None, Some(StreamFormatArg::Jsonl)) => builder.sink(StreamSink::json_lines(io::stdout())),
        (None, None) => builder,
    };

    let report = builder.build().await?.run().await?;
    eprintln!(
        "winner: {} ({}) after {} rounds, state digest {}",
        report.outcome.winner,
        report.outcome.factor,
        report.rounds_played,
        report.state_digest()
    );
    Ok(())
}

fn verify(factory: &ContentFactory, path: &Path) -> Result<()> {
    let log = read_log(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut setup = factory.load_setup(&log.header.map.name)?;
    setup.seed = log.header.seed;
    let state = Replayer::replay(&setup, &log)?;

    println!("rounds: {}", log.rounds.len());
    println!("signals: {}", log.signal_count());
    println!("log digest: {}", hex::encode(log.digest()));
    println!("state digest: {}", hex::encode(state.digest()));
    match &log.footer {
        Some(footer) => println!("winner: {} ({})", footer.winner, footer.factor),
        None => println!("match unfinished"),
    }
    Ok(())
}
