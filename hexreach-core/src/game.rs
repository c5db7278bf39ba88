//! Move application and game sessions

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord, Player};
use crate::history::PositionHistory;
use crate::reach::CellMask;
use crate::rules::{
    dead_stones, is_legal, legal_moves, no_legal_moves_for_either, simulate_placement,
    LegalityPolicy,
};
use crate::ruleset::RuleSet;
use crate::score::{area_score, AreaScore};

// ============================================================================
// PLACEMENT
// ============================================================================

/// Why a placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("{0} is off the board")]
    OutOfBounds(Coord),

    #[error("{0} is not empty")]
    Occupied(Coord),

    #[error("a stone at {0} would not stay connected")]
    Illegal(Coord),

    #[error("a stone at {0} would repeat an earlier position")]
    Repetition(Coord),
}

/// Place a stone and resolve captures, returning the new board.
///
/// With a history supplied, a result already in it is refused. The input
/// board is never touched.
pub fn place_stone(
    board: &Board,
    player: Player,
    coord: Coord,
    policy: LegalityPolicy,
    forbidden: Option<&PositionHistory>,
) -> Result<Board, PlacementError> {
    if !board.size().is_in_bounds(coord.row as i32, coord.col as i32) {
        return Err(PlacementError::OutOfBounds(coord));
    }
    if board.get(coord) != Cell::Empty {
        return Err(PlacementError::Occupied(coord));
    }
    // Checked without the history so repetition can be reported on its own
    if !is_legal(board, player, coord, policy, None) {
        return Err(PlacementError::Illegal(coord));
    }

    let resolved = simulate_placement(board, player, coord);

    if let Some(history) = forbidden {
        if history.contains(&resolved.fingerprint()) {
            return Err(PlacementError::Repetition(coord));
        }
    }

    Ok(resolved)
}

// ============================================================================
// GAME SESSION
// ============================================================================

/// One accepted placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    pub coord: Coord,
}

/// Exportable move list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub rules: RuleSet,
    pub moves: Vec<MoveRecord>,
}

impl GameRecord {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game record: {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game record: {}", path.display()))?;
        Ok(record)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write game record: {}", path.display()))?;
        Ok(())
    }
}

/// Failure while replaying a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("move {index}: {player} played {coord} but {expected} was to move")]
    OutOfTurn {
        index: usize,
        player: Player,
        coord: Coord,
        expected: Player,
    },

    #[error("move {index}: {player} at {coord} rejected: {source}")]
    Rejected {
        index: usize,
        player: Player,
        coord: Coord,
        #[source]
        source: PlacementError,
    },
}

/// A game in progress: board stack, move list and seen positions.
///
/// Black moves first. After each move the opponent takes the turn if they
/// have a legal placement, otherwise the mover goes again; the game is over
/// when neither side can place.
#[derive(Clone, Debug)]
pub struct Game {
    rules: RuleSet,
    /// Initial board followed by the board after each move
    boards: Vec<Board>,
    moves: Vec<MoveRecord>,
    history: PositionHistory,
    /// Undone moves, most recent last
    redo: Vec<MoveRecord>,
    to_move: Player,
    over: bool,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(rules: RuleSet) -> Self {
        let initial = Board::new(rules.size);
        let history = PositionHistory::new(&initial);
        Self {
            rules,
            boards: vec![initial],
            moves: Vec::new(),
            history,
            redo: Vec::new(),
            to_move: Player::Black,
            over: false,
        }
    }

    /// Replay a record move by move
    pub fn from_record(record: &GameRecord) -> Result<Self, RecordError> {
        let mut game = Self::new(record.rules.clone());
        for (index, mv) in record.moves.iter().enumerate() {
            if mv.player != game.to_move {
                return Err(RecordError::OutOfTurn {
                    index,
                    player: mv.player,
                    coord: mv.coord,
                    expected: game.to_move,
                });
            }
            game.play(mv.coord).map_err(|source| RecordError::Rejected {
                index,
                player: mv.player,
                coord: mv.coord,
                source,
            })?;
        }
        Ok(game)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Current board
    pub fn board(&self) -> &Board {
        // The stack always holds the initial board
        &self.boards[self.boards.len() - 1]
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.moves.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// History to check repetition against, if the rules ask for it
    pub fn forbidden(&self) -> Option<&PositionHistory> {
        if self.rules.superko {
            Some(&self.history)
        } else {
            None
        }
    }

    /// Legal placements for the player to move
    pub fn legal_moves(&self) -> CellMask {
        legal_moves(self.board(), self.to_move, self.rules.policy, self.forbidden())
    }

    pub fn score(&self) -> AreaScore {
        area_score(self.board())
    }

    /// Export the move list
    pub fn record(&self) -> GameRecord {
        GameRecord {
            rules: self.rules.clone(),
            moves: self.moves.clone(),
        }
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Place a stone for the player to move
    pub fn play(&mut self, coord: Coord) -> Result<&Board, PlacementError> {
        self.apply(coord)?;
        self.redo.clear();
        Ok(self.board())
    }

    /// Take back the last move
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let mv = self.moves.pop()?;
        self.boards.pop();
        self.history.pop();
        self.to_move = mv.player;
        self.over = false;
        self.redo.push(mv);
        tracing::debug!("Undid {} at {}", mv.player, mv.coord);
        Some(mv)
    }

    /// Replay the most recently undone move
    pub fn redo(&mut self) -> Option<Result<MoveRecord, PlacementError>> {
        let mv = self.redo.pop()?;
        Some(self.apply(mv.coord).map(|_| mv))
    }

    fn apply(&mut self, coord: Coord) -> Result<(), PlacementError> {
        let player = self.to_move;
        let board = self.board();

        let next = match place_stone(board, player, coord, self.rules.policy, self.forbidden()) {
            Ok(next) => next,
            Err(e) => {
                tracing::debug!("Rejected {} at {}: {}", player, coord, e);
                return Err(e);
            }
        };

        let captured = dead_stones(&board.with_stone(coord, player)).len();
        if captured > 0 {
            tracing::debug!("{} at {} captured {} stone(s)", player, coord, captured);
        }

        self.history.push(next.fingerprint());
        self.boards.push(next);
        self.moves.push(MoveRecord { player, coord });
        self.advance_turn(player);
        Ok(())
    }

    fn advance_turn(&mut self, mover: Player) {
        let policy = self.rules.policy;
        let forbidden = self.forbidden();
        let board = self.board();

        let opponent = mover.opponent();
        if legal_moves(board, opponent, policy, forbidden).any() {
            self.to_move = opponent;
        } else if legal_moves(board, mover, policy, forbidden).any() {
            tracing::debug!("{} has no legal move, {} moves again", opponent, mover);
            self.to_move = mover;
        } else {
            debug_assert!(no_legal_moves_for_either(board, policy, forbidden));
            self.to_move = opponent;
            self.over = true;
            tracing::debug!("Game over after {} moves", self.moves.len());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
