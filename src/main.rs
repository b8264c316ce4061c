//! Mini-Checkers: 6x6 checkers against an alpha-beta engine.
//!
//! ## Usage
//!
//! - `mini-checkers` - Start the text protocol on stdin/stdout
//! - `mini-checkers play --human white` - Same, starting a game right away
//! - `mini-checkers selfplay --games 10` - Engine against a random mover
//! - `mini-checkers demo` - One engine move from the opening

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mini_checkers::board::Color;
use mini_checkers::config::EngineConfig;
use mini_checkers::game::GameState;
use mini_checkers::playout::play_match;
use mini_checkers::protocol::ProtocolEngine;
use mini_checkers::search::SearchEngine;

/// Mini-Checkers: 6x6 checkers with an alpha-beta engine
#[derive(Parser)]
#[command(name = "mini-checkers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine parameters as JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base cutoff depth
    #[arg(long, global = true)]
    cutoff: Option<u32>,

    /// Search time ceiling in seconds
    #[arg(long, global = true)]
    time_limit: Option<f64>,

    /// Pause after each searched move, in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Log filter, e.g. `debug` or `mini_checkers::search=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read protocol commands from stdin
    Play {
        /// Start a game with the human playing this color
        #[arg(long)]
        human: Option<Color>,
    },
    /// Play the engine against a random mover
    Selfplay {
        #[arg(long, default_value_t = 10)]
        games: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Show one engine move from the opening position
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Play { human }) => run_protocol(config, human),
        None => run_protocol(config, None),
        Some(Commands::Selfplay { games, seed }) => {
            run_selfplay(config, games, seed);
            Ok(())
        }
        Some(Commands::Demo) => {
            run_demo(config);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays a clean protocol channel.
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading engine config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(cutoff) = cli.cutoff {
        config.base_cutoff = cutoff;
    }
    if let Some(secs) = cli.time_limit {
        config.time_ceiling_ms = (secs * 1000.0) as u64;
    }
    if let Some(delay) = cli.delay {
        config.move_delay_ms = delay;
    }
    Ok(config)
}

fn run_protocol(config: EngineConfig, human: Option<Color>) -> Result<()> {
    let mut engine = ProtocolEngine::new(config);
    if let Some(human) = human {
        let color = human.to_string().to_lowercase();
        engine.execute("new", &[color.as_str()]);
    }
    engine.run().context("protocol I/O failed")
}

fn run_selfplay(config: EngineConfig, games: u32, seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut engine = SearchEngine::new(config);
    let (mut won, mut lost, mut unfinished) = (0, 0, 0);

    for game in 0..games {
        let engine_color = if game % 2 == 0 { Color::Black } else { Color::White };
        engine.reset();
        let winner = play_match(&mut engine, engine_color, &mut rng);
        match winner {
            Some(c) if c == engine_color => won += 1,
            Some(_) => lost += 1,
            None => unfinished += 1,
        }
        println!(
            "game {}: engine {engine_color}, winner {}",
            game + 1,
            winner.map_or_else(|| "none".to_string(), |c| c.to_string())
        );
    }
    println!("engine won {won}, lost {lost}, unfinished {unfinished}");
}

fn run_demo(config: EngineConfig) {
    println!("Mini-Checkers: 6x6 checkers, alpha-beta engine\n");
    let mut state = GameState::new(Color::White);
    println!("{state}");

    let mut engine = SearchEngine::new(config);
    println!("Searching to depth {}...", engine.cutoff_depth());
    let Some(outcome) = engine.choose_move(&state) else {
        println!("No move available");
        return;
    };
    state.play(&outcome.best);

    let stats = &outcome.stats;
    println!("Engine plays {} ({:?})", outcome.best, outcome.termination);
    println!(
        "Nodes: {}, depth reached: {}, prunes max/min: {}/{}, time: {:.2}s",
        stats.nodes,
        stats.max_depth,
        stats.max_pruned,
        stats.min_pruned,
        stats.elapsed.as_secs_f64()
    );
    println!("Next cutoff depth: {}\n", engine.cutoff_depth());
    println!("{state}");
}
