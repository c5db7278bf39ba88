//! Bench command - random playouts to measure engine throughput
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_playouts(), report_results()
//! - Level 3: random_playout()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexreach_core::{Coord, Game, Player, RuleSet};

use crate::rules_args::RulesArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchArgs {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Number of playouts
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Random seed (random if not specified)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum moves per playout
    #[arg(long, default_value = "500")]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of one playout
#[derive(Clone, Copy, Debug)]
struct Playout {
    moves: usize,
    finished: bool,
    winner: Option<Player>,
    margin: i64,
}

/// Aggregated playout statistics
#[derive(Clone, Debug, Default, serde::Serialize)]
struct BenchResults {
    rules: String,
    games: usize,
    finished: usize,
    total_moves: usize,
    #[serde(skip)]
    total_time: Duration,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    total_margin: i64,
}

impl BenchResults {
    fn record(&mut self, playout: Playout) {
        self.games += 1;
        self.total_moves += playout.moves;
        self.total_margin += playout.margin;
        if playout.finished {
            self.finished += 1;
        }
        match playout.winner {
            Some(Player::White) => self.white_wins += 1,
            Some(Player::Black) => self.black_wins += 1,
            None => self.draws += 1,
        }
    }

    fn moves_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.total_moves as f64 / secs
        } else {
            0.0
        }
    }

    fn avg_moves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }

    fn avg_margin(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_margin as f64 / self.games as f64
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run bench command
///
/// This function reads like a table of contents:
/// 1. Resolve rules and seed the RNG
/// 2. Play random games to the end (or the move cap)
/// 3. Report throughput and outcomes
pub fn run(args: BenchArgs) -> Result<()> {
    let rules = args.rules.resolve()?;
    tracing::info!(
        "Starting bench: {} playouts, {} rules, max {} moves",
        args.games,
        rules.name,
        args.max_moves
    );

    let mut rng = create_rng(args.seed);
    let results = run_playouts(&rules, args.games, args.max_moves, &mut rng);

    report_results(&results, args.json)?;
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_playouts(rules: &RuleSet, games: usize, max_moves: usize, rng: &mut ChaCha8Rng) -> BenchResults {
    let mut results = BenchResults {
        rules: rules.name.clone(),
        ..Default::default()
    };

    let start = Instant::now();
    for i in 0..games {
        let playout = random_playout(rules, max_moves, rng);
        tracing::debug!(
            "Playout {}: {} moves, finished={}, margin {:+}",
            i + 1,
            playout.moves,
            playout.finished,
            playout.margin
        );
        results.record(playout);
    }
    results.total_time = start.elapsed();

    results
}

fn report_results(results: &BenchResults, json: bool) -> Result<()> {
    if json {
        print_json_results(results)?;
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play uniformly random legal moves until the game ends or hits the cap
fn random_playout(rules: &RuleSet, max_moves: usize, rng: &mut ChaCha8Rng) -> Playout {
    let mut game = Game::new(rules.clone());

    while !game.is_over() && game.moves().len() < max_moves {
        let legal: Vec<Coord> = game.legal_moves().iter().collect();
        let Some(&coord) = legal.choose(rng) else {
            break;
        };
        if let Err(e) = game.play(coord) {
            // Every listed move is playable, so this points at an engine bug
            tracing::warn!("Legal move {} rejected: {}", coord, e);
            break;
        }
    }

    let score = game.score();
    Playout {
        moves: game.moves().len(),
        finished: game.is_over(),
        winner: score.winner(),
        margin: score.margin(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

fn print_json_results(results: &BenchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        results: &'a BenchResults,
        total_time_ms: u64,
        moves_per_second: f64,
        avg_moves: f64,
        avg_margin: f64,
    }

    let output = JsonOutput {
        results,
        total_time_ms: results.total_time.as_millis() as u64,
        moves_per_second: results.moves_per_second(),
        avg_moves: results.avg_moves(),
        avg_margin: results.avg_margin(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(results: &BenchResults) {
    println!("\n=== HEXREACH Bench Results ({} rules) ===", results.rules);
    println!(
        "Playouts:     {} ({} finished)",
        results.games, results.finished
    );
    println!("Total time:   {}", format_duration(results.total_time));
    println!("Moves:        {} ({:.1} per game)", results.total_moves, results.avg_moves());
    println!("Moves/sec:    {:.0}", results.moves_per_second());
    println!(
        "Outcomes:     White {}  Black {}  Draw {}",
        results.white_wins, results.black_wins, results.draws
    );
    println!("Avg margin:   {:+.1} (Black minus White)", results.avg_margin());
}

// ============================================================================
// TESTS
// ============================================================================
