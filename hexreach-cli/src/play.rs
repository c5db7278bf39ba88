//! Play command - interactive game at the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_session()
//! - Level 3: execute() - one command against the game
//! - Level 4: parse_command(), formatting

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hexreach_core::{Coord, Game, Player};

use crate::rules_args::RulesArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Write the game record as JSON on exit
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

/// One line of user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Place { row: i32, col: i32 },
    Undo,
    Redo,
    Moves,
    Score,
    Board,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  <row> <col>   place a stone (e.g. 8 5)
  undo / redo   take back or replay a move
  moves         list legal placements
  score         show the area score
  board         show the board
  help          show this text
  quit          leave the game";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve the rule set
/// 2. Run the session on stdin/stdout
/// 3. Save the record if asked
pub fn run(args: PlayArgs) -> Result<()> {
    let rules = args.rules.resolve()?;
    tracing::info!(
        "Starting game: {} ({}, {}, superko={})",
        rules.name,
        rules.size,
        rules.policy,
        rules.superko
    );

    let mut game = Game::new(rules);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut game, stdin.lock(), stdout.lock())?;

    if let Some(path) = &args.save {
        game.record().save(path)?;
        tracing::info!("Saved game record to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read commands until quit, end of input, or game over
fn run_session<R: BufRead, W: Write>(game: &mut Game, input: R, mut out: W) -> Result<()> {
    writeln!(out, "{}", HELP)?;
    print_position(game, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(game, command, &mut out)?,
            Err(msg) => writeln!(out, "{}", msg)?,
        }

        if game.is_over() {
            print_final(game, &mut out)?;
            break;
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn execute<W: Write>(game: &mut Game, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Place { row, col } => {
            let player = game.to_move();
            if !game.rules().size.is_in_bounds(row, col) {
                writeln!(out, "Not a legal move: ({}, {}) is off the board", row, col)?;
                return Ok(());
            }
            let coord = Coord::new(row as u8, col as u8);
            match game.play(coord) {
                Ok(_) => {
                    tracing::debug!("{} played {}", player, coord);
                    print_position(game, out)?;
                }
                Err(e) => writeln!(out, "Not a legal move: {}", e)?,
            }
        }
        Command::Undo => match game.undo() {
            Some(mv) => {
                writeln!(out, "Took back {} at {}", mv.player, mv.coord)?;
                print_position(game, out)?;
            }
            None => writeln!(out, "Nothing to undo")?,
        },
        Command::Redo => match game.redo() {
            Some(Ok(mv)) => {
                writeln!(out, "Replayed {} at {}", mv.player, mv.coord)?;
                print_position(game, out)?;
            }
            Some(Err(e)) => writeln!(out, "Cannot redo: {}", e)?,
            None => writeln!(out, "Nothing to redo")?,
        },
        Command::Moves => {
            let legal: Vec<String> = game.legal_moves().iter().map(|c| c.to_string()).collect();
            writeln!(out, "{} legal moves: {}", legal.len(), legal.join(" "))?;
        }
        Command::Score => print_score(game, out)?,
        Command::Board => print_position(game, out)?,
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    match line.to_ascii_lowercase().as_str() {
        "undo" | "u" => return Ok(Command::Undo),
        "redo" | "r" => return Ok(Command::Redo),
        "moves" | "m" => return Ok(Command::Moves),
        "score" | "s" => return Ok(Command::Score),
        "board" | "b" => return Ok(Command::Board),
        "help" | "h" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    if let [row, col] = parts.as_slice() {
        if let (Ok(row), Ok(col)) = (row.parse::<i32>(), col.parse::<i32>()) {
            return Ok(Command::Place { row, col });
        }
    }

    Err(format!("Unknown command: {} (type help)", line))
}

fn print_position<W: Write>(game: &Game, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", game.board())?;
    writeln!(out, "{} to move ({} legal)", game.to_move(), game.legal_moves().count())
}

fn print_score<W: Write>(game: &Game, out: &mut W) -> io::Result<()> {
    let score = game.score();
    writeln!(
        out,
        "White {} ({} stones + {} territory)  Black {} ({} stones + {} territory)",
        score.white_total,
        score.white_stones,
        score.white_territory,
        score.black_total,
        score.black_stones,
        score.black_territory
    )
}

fn print_final<W: Write>(game: &Game, out: &mut W) -> io::Result<()> {
    writeln!(out, "Game over after {} moves", game.moves().len())?;
    print_score(game, out)?;
    match game.score().winner() {
        Some(Player::White) => writeln!(out, "White wins"),
        Some(Player::Black) => writeln!(out, "Black wins"),
        None => writeln!(out, "Draw"),
    }
}

// ============================================================================
// TESTS
// ============================================================================
