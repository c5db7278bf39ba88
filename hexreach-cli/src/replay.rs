//! Replay command - rebuild a saved game and report the outcome
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: replay_record(), report_outcome()
//! - Level 3: summarize()
//! - Level 4: formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hexreach_core::{AreaScore, Game, GameRecord, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Game record JSON file
    #[arg(long, value_name = "FILE")]
    pub record: PathBuf,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a replayed game
#[derive(Clone, Debug, Serialize)]
struct Outcome {
    rules: String,
    moves: usize,
    to_move: Player,
    over: bool,
    fingerprint: String,
    board: Vec<String>,
    score: AreaScore,
    winner: Option<Player>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
///
/// 1. Load the record
/// 2. Replay every move through the rules
/// 3. Report the final position and score
pub fn run(args: ReplayArgs) -> Result<()> {
    let record = GameRecord::load(&args.record)?;
    tracing::info!(
        "Replaying {} moves under {} rules",
        record.moves.len(),
        record.rules.name
    );

    let game = replay_record(&record)
        .with_context(|| format!("Invalid game record: {}", args.record.display()))?;

    report_outcome(&summarize(&game), args.json)?;
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn replay_record(record: &GameRecord) -> Result<Game> {
    let game = Game::from_record(record)?;
    if game.is_over() {
        tracing::info!("Record ends in a finished game");
    } else {
        tracing::info!("Record ends mid-game, {} to move", game.to_move());
    }
    Ok(game)
}

fn report_outcome(outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print!("{}", format_text(outcome));
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn summarize(game: &Game) -> Outcome {
    let board = game.board();
    let score = game.score();
    Outcome {
        rules: game.rules().name.clone(),
        moves: game.moves().len(),
        to_move: game.to_move(),
        over: game.is_over(),
        fingerprint: board.fingerprint().to_string(),
        board: board.to_rows(),
        winner: score.winner(),
        score,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_text(outcome: &Outcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== Replay ({} rules) ===\n", outcome.rules));
    for row in &outcome.board {
        out.push_str(row);
        out.push('\n');
    }
    out.push_str(&format!("Moves: {}\n", outcome.moves));
    if outcome.over {
        out.push_str("Status: game over\n");
    } else {
        out.push_str(&format!("Status: {} to move\n", outcome.to_move));
    }
    out.push_str(&format!("Fingerprint: {}\n", outcome.fingerprint));
    out.push_str(&format!(
        "Score: White {}  Black {}  (margin {:+})\n",
        outcome.score.white_total,
        outcome.score.black_total,
        outcome.score.margin()
    ));
    let result = match outcome.winner {
        Some(player) => format!("{} wins", player),
        None => "Draw".to_string(),
    };
    out.push_str(&format!("Result: {}\n", result));
    out
}

// ============================================================================
// TESTS
// ============================================================================
