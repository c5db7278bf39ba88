//! HEXREACH Core - Rules engine
//!
//! This crate provides the rules for HEXREACH, a two-player connection game
//! on a flat-top offset hex grid:
//! - Board geometry (8x8 or 10x10, two fixed bases)
//! - Reachability from a base under two traversal rules
//! - Capture by disconnection, legality, terminal test, area scoring
//! - Stone placement with positional superko
//! - Game sessions with undo/redo and exportable move records
//!
//! All rule functions are pure: they take a board and return a new board or
//! a derived value.

pub mod board;
pub mod reach;
pub mod rules;
pub mod score;
pub mod history;
pub mod game;
pub mod ruleset;

// Re-exports for convenient access
pub use board::{Board, BoardParseError, BoardSize, Cell, Coord, Fingerprint, Player};
pub use reach::{reachable_from_base, CellMask, Traversal};
pub use rules::{dead_stones, is_legal, legal_moves, no_legal_moves_for_either, resolve_captures, LegalityPolicy};
pub use score::{area_score, AreaScore};
pub use history::PositionHistory;
pub use game::{place_stone, Game, GameRecord, MoveRecord, PlacementError, RecordError};
pub use ruleset::RuleSet;
