//! Legality and capture rules
//!
//! Everything here is derived from reachability on a board value:
//! - capture resolution removes every stone cut off from its own base
//! - a move is legal if the placed stone would still stand after resolution
//! - the game is over once neither side has a legal move

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord, Player};
use crate::history::PositionHistory;
use crate::reach::{reachable_from_base, CellMask, Traversal};

/// How legality of an empty cell is decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalityPolicy {
    /// The cell must already be connected to the player's base
    Strict,
    /// The placement is simulated, and legal if the stone survives capture
    /// resolution
    Permissive,
}

impl Default for LegalityPolicy {
    fn default() -> Self {
        LegalityPolicy::Permissive
    }
}

impl fmt::Display for LegalityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegalityPolicy::Strict => f.write_str("strict"),
            LegalityPolicy::Permissive => f.write_str("permissive"),
        }
    }
}

impl FromStr for LegalityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(LegalityPolicy::Strict),
            "permissive" => Ok(LegalityPolicy::Permissive),
            other => Err(format!("unknown legality policy: {other} (expected strict or permissive)")),
        }
    }
}

// ============================================================================
// CAPTURE RESOLUTION
// ============================================================================

/// Stones of either color with no path of own stones/empties to their base.
///
/// Both colors are judged against the same board.
pub fn dead_stones(board: &Board) -> Vec<Coord> {
    let white = reachable_from_base(board, Player::White, Traversal::StonesAndEmpties);
    let black = reachable_from_base(board, Player::Black, Traversal::StonesAndEmpties);

    board
        .cells()
        .filter(|&(coord, cell)| match cell.stone_owner() {
            Some(Player::White) => !white.get(coord),
            Some(Player::Black) => !black.get(coord),
            None => false,
        })
        .map(|(coord, _)| coord)
        .collect()
}

/// Board with every disconnected stone removed, both colors at once
pub fn resolve_captures(board: &Board) -> Board {
    let mut resolved = board.clone();
    for coord in dead_stones(board) {
        resolved.clear_stone(coord);
    }
    resolved
}

/// Place a stone on an empty cell and resolve captures, no legality checks
pub(crate) fn simulate_placement(board: &Board, player: Player, coord: Coord) -> Board {
    resolve_captures(&board.with_stone(coord, player))
}

// ============================================================================
// LEGALITY
// ============================================================================

/// Whether `player` may place a stone at `coord`.
///
/// With a history supplied the placement is always simulated and a result
/// already in the history is illegal.
pub fn is_legal(
    board: &Board,
    player: Player,
    coord: Coord,
    policy: LegalityPolicy,
    forbidden: Option<&PositionHistory>,
) -> bool {
    if !board.size().contains(coord) || board.get(coord) != Cell::Empty {
        return false;
    }
    let connected = reachable_from_base(board, player, Traversal::StonesAndEmpties).get(coord);
    legal_given_connection(board, player, coord, connected, policy, forbidden)
}

/// Mask of every legal placement for `player`
pub fn legal_moves(
    board: &Board,
    player: Player,
    policy: LegalityPolicy,
    forbidden: Option<&PositionHistory>,
) -> CellMask {
    let connected = reachable_from_base(board, player, Traversal::StonesAndEmpties);
    let mut legal = CellMask::new(board.size());

    for (coord, cell) in board.cells() {
        if cell != Cell::Empty {
            continue;
        }
        if legal_given_connection(board, player, coord, connected.get(coord), policy, forbidden) {
            legal.set(coord);
        }
    }

    legal
}

/// Terminal test: neither side has a legal placement
pub fn no_legal_moves_for_either(
    board: &Board,
    policy: LegalityPolicy,
    forbidden: Option<&PositionHistory>,
) -> bool {
    [Player::White, Player::Black]
        .into_iter()
        .all(|player| !legal_moves(board, player, policy, forbidden).any())
}

fn legal_given_connection(
    board: &Board,
    player: Player,
    coord: Coord,
    connected: bool,
    policy: LegalityPolicy,
    forbidden: Option<&PositionHistory>,
) -> bool {
    let simulate = match policy {
        LegalityPolicy::Strict => connected && forbidden.is_some(),
        LegalityPolicy::Permissive => !connected || forbidden.is_some(),
    };
    if !simulate {
        return connected;
    }

    let resolved = simulate_placement(board, player, coord);
    if resolved.get(coord) != Cell::stone(player) {
        return false;
    }
    match forbidden {
        Some(history) => !history.contains(&resolved.fingerprint()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn ten(rows: &[&str]) -> Board {
        Board::from_rows(BoardSize::Ten, rows).unwrap()
    }

    #[test]
    fn test_enclosed_line_is_captured() {
        let board = ten(&[
            "bw..W.....",
            "bw........",
            "bw........",
            "ww........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            ".....B....",
        ]);
        let resolved = resolve_captures(&board);
        for row in 0..3 {
            assert_eq!(resolved.get(Coord::new(row, 0)), Cell::Empty);
            assert_eq!(resolved.get(Coord::new(row, 1)), Cell::WhiteStone);
        }
        assert_eq!(resolved.get(Coord::new(3, 0)), Cell::WhiteStone);
        assert_eq!(resolved.get(Coord::new(3, 1)), Cell::WhiteStone);
        assert_eq!(resolved.stone_count(Player::White), 5);
        assert_eq!(resolved.stone_count(Player::Black), 0);
    }

    #[test]
    fn test_resolution_is_simultaneous() {
        // The black row cuts off both white stones at the bottom left. Those
        // white stones in turn enclose the black corner stone. Judged on the
        // same board, all three are dead; removing the white stones first
        // would wrongly free the corner.
        let board = ten(&[
            "....W.....",
            "bbbbbbbbbb",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "w.........",
            "bw...B....",
        ]);
        let resolved = resolve_captures(&board);
        assert_eq!(resolved.get(Coord::new(8, 0)), Cell::Empty);
        assert_eq!(resolved.get(Coord::new(9, 1)), Cell::Empty);
        assert_eq!(resolved.get(Coord::new(9, 0)), Cell::Empty);
        assert_eq!(resolved.stone_count(Player::Black), 10);

        // What sequential evaluation would have produced instead
        let mut white_first = board.clone();
        white_first.clear_stone(Coord::new(8, 0));
        white_first.clear_stone(Coord::new(9, 1));
        assert_eq!(resolve_captures(&white_first).get(Coord::new(9, 0)), Cell::BlackStone);
    }

    #[test]
    fn test_resolution_idempotent() {
        let board = ten(&[
            "....W.....",
            "bbbbbbbbbb",
            "..w.......",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "w.........",
            "bw...B....",
        ]);
        let once = resolve_captures(&board);
        assert_eq!(resolve_captures(&once), once);
        assert!(dead_stones(&once).is_empty());
    }

    #[test]
    fn test_initial_legal_moves() {
        let board = Board::new(BoardSize::Ten);
        let black = legal_moves(&board, Player::Black, LegalityPolicy::Permissive, None);
        // Every empty cell is connected on an empty board
        assert_eq!(black.count(), 98);
        assert!(black.get(Coord::new(8, 5)));
        assert!(!black.get(Coord::new(9, 5)));
        assert!(!black.get(Coord::new(0, 4)));
    }

    #[test]
    fn test_cut_off_cell_is_illegal() {
        // The white wall leaves the black base one empty pocket cell of its
        // own; everything beyond the wall belongs to nobody black can reach.
        let board = Board::from_rows(
            BoardSize::Eight,
            &[
                "...W....",
                "........",
                "........",
                "........",
                "..wwww..",
                "..w..w..",
                "..w..w..",
                "..w.Bw..",
            ],
        )
        .unwrap();
        for policy in [LegalityPolicy::Strict, LegalityPolicy::Permissive] {
            let black = legal_moves(&board, Player::Black, policy, None);
            let legal: Vec<_> = black.iter().collect();
            assert_eq!(
                legal,
                vec![
                    Coord::new(5, 3),
                    Coord::new(5, 4),
                    Coord::new(6, 3),
                    Coord::new(6, 4),
                    Coord::new(7, 3),
                ],
                "policy {policy}"
            );
            assert!(!is_legal(&board, Player::Black, Coord::new(0, 0), policy, None));
        }
    }

    #[test]
    fn test_policies_agree_without_history() {
        let board = ten(&[
            "....W.....",
            "bbbbbbbbbb",
            "..w.......",
            "..........",
            "...www....",
            "...w.w....",
            "...www....",
            "..........",
            "w.........",
            "bw...B....",
        ]);
        for player in [Player::White, Player::Black] {
            assert_eq!(
                legal_moves(&board, player, LegalityPolicy::Strict, None),
                legal_moves(&board, player, LegalityPolicy::Permissive, None),
            );
        }
    }

    #[test]
    fn test_history_forbids_repeated_result() {
        let board = Board::new(BoardSize::Ten);
        let target = Coord::new(8, 5);
        let result = simulate_placement(&board, Player::Black, target);
        let history: PositionHistory = [board.fingerprint(), result.fingerprint()].into_iter().collect();

        for policy in [LegalityPolicy::Strict, LegalityPolicy::Permissive] {
            assert!(is_legal(&board, Player::Black, target, policy, None));
            assert!(!is_legal(&board, Player::Black, target, policy, Some(&history)));
            let mask = legal_moves(&board, Player::Black, policy, Some(&history));
            assert!(!mask.get(target));
            assert_eq!(mask.count(), 97);
        }
    }

    #[test]
    fn test_terminal_when_nothing_empty() {
        let board = Board::from_rows(
            BoardSize::Eight,
            &[
                "wwwWwwww",
                "wwwwwwww",
                "wwwwwwww",
                "wwwwwwww",
                "bbbbbbbb",
                "bbbbbbbb",
                "bbbbbbbb",
                "bbbbBbbb",
            ],
        )
        .unwrap();
        assert!(no_legal_moves_for_either(&board, LegalityPolicy::Permissive, None));
        assert!(!no_legal_moves_for_either(&Board::new(BoardSize::Eight), LegalityPolicy::Strict, None));
    }

    /// Arbitrary stone scatter, not necessarily reachable in play
    fn random_board(size: BoardSize, rng: &mut ChaCha8Rng) -> Board {
        let mut board = Board::new(size);
        for coord in size.coords() {
            match rng.gen_range(0..5) {
                0 => board = board.with_stone(coord, Player::White),
                1 => board = board.with_stone(coord, Player::Black),
                _ => {}
            }
        }
        board
    }

    #[test]
    fn test_random_boards() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for i in 0..60 {
            let size = if i % 2 == 0 { BoardSize::Eight } else { BoardSize::Ten };
            let board = random_board(size, &mut rng);

            let once = resolve_captures(&board);
            assert_eq!(resolve_captures(&once), once);

            let dead = dead_stones(&board);
            for (coord, cell) in board.cells() {
                let expected = if dead.contains(&coord) { Cell::Empty } else { cell };
                assert_eq!(once.get(coord), expected);
            }

            for player in [Player::White, Player::Black] {
                let strict = legal_moves(&board, player, LegalityPolicy::Strict, None);
                let permissive = legal_moves(&board, player, LegalityPolicy::Permissive, None);
                assert_eq!(strict, permissive);
                for coord in permissive.iter() {
                    let next = simulate_placement(&board, player, coord);
                    assert_eq!(next.get(coord), Cell::stone(player));
                }
            }
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("strict".parse::<LegalityPolicy>(), Ok(LegalityPolicy::Strict));
        assert_eq!("Permissive".parse::<LegalityPolicy>(), Ok(LegalityPolicy::Permissive));
        assert!("loose".parse::<LegalityPolicy>().is_err());
    }
}
