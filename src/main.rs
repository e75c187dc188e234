//! Ninuki-Rust: a Monte Carlo Ninuki engine.
//!
//! ## Usage
//!
//! - `ninuki-rust` - Play a demo game against itself
//! - `ninuki-rust gtp` - Start GTP server for GUI integration
//! - `ninuki-rust demo` - Play a demo game against itself
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ninuki_rust::board::{Board, Color};
use ninuki_rust::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, N_SIMS_RANDOM, N_SIMS_RULE_BASED, max_game_len};
use ninuki_rust::error::EngineError;
use ninuki_rust::gtp::GtpEngine;
use ninuki_rust::player::Player;
use ninuki_rust::playout::RolloutConfig;
use ninuki_rust::policy::Policy;

/// Ninuki-Rust: a Monte Carlo Ninuki engine
#[derive(Parser)]
#[command(name = "ninuki-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp(EngineArgs),
    /// Play one game of the engine against itself
    Demo(EngineArgs),
}

#[derive(Args, Clone, Debug)]
struct EngineArgs {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
    size: usize,

    /// Simulation policy: random or rule_based
    #[arg(long, default_value_t = Policy::Random)]
    policy: Policy,

    /// Rollouts per candidate with the random policy
    #[arg(long, default_value_t = N_SIMS_RANDOM)]
    sims_random: usize,

    /// Rollouts per candidate with the rule-based policy
    #[arg(long, default_value_t = N_SIMS_RULE_BASED)]
    sims_rule: usize,

    /// Plies after which a rollout is abandoned as undecided
    #[arg(long)]
    max_plies: Option<usize>,

    /// Time limit per move, in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seed for reproducible play
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        let err = EngineError::BoardSize {
            size,
            min: MIN_SIZE,
            max: MAX_SIZE,
        };
        return Err(err.to_string());
    }
    Ok(size)
}

impl Default for EngineArgs {
    fn default() -> Self {
        EngineArgs {
            size: DEFAULT_SIZE,
            policy: Policy::Random,
            sims_random: N_SIMS_RANDOM,
            sims_rule: N_SIMS_RULE_BASED,
            max_plies: None,
            time_limit: None,
            seed: None,
        }
    }
}

impl EngineArgs {
    fn player(&self) -> Player {
        let config = RolloutConfig {
            random_sims: self.sims_random,
            rule_sims: self.sims_rule,
            max_plies: self.max_plies,
            time_limit: self
                .time_limit
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
        };
        let mut player = match self.seed {
            Some(seed) => Player::with_seed(config, seed),
            None => Player::new(config),
        };
        player.set_policy(self.policy);
        player
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp(args)) => {
            info!(size = args.size, policy = %args.policy, "starting GTP server");
            let mut engine = GtpEngine::with_player(args.size, args.player());
            engine.run()?;
        }
        Some(Commands::Demo(args)) => run_demo(&args),
        None => run_demo(&EngineArgs::default()),
    }
    Ok(())
}

fn run_demo(args: &EngineArgs) {
    println!("Ninuki-Rust: Monte Carlo Ninuki engine\n");
    println!("Board {0}x{0}, policy {1}\n", args.size, args.policy);

    let mut board = Board::new(args.size);
    let mut player = args.player();
    let mut color = Color::Black;

    for ply in 1..=max_game_len(args.size) {
        let result = board.end_of_game();
        if result.is_over() {
            break;
        }
        let mv = player.get_move(&board, color);
        board.play_move(mv, color);
        println!("{ply:3}. {color} {}", board.geometry().format_point(mv));
        color = color.opponent();
    }

    println!("\n{board}");
    println!(
        "Captures: black {}, white {}",
        board.get_captures(Color::Black),
        board.get_captures(Color::White)
    );
    match board.end_of_game().winner() {
        Some(winner) => println!("Winner: {winner}"),
        None => println!("Result: {:?}", board.end_of_game()),
    }
}
