//! Area scoring

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Player};
use crate::reach::{reachable_from_base, Traversal};

/// Stones plus territory per player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaScore {
    pub white_total: usize,
    pub black_total: usize,
    pub white_stones: usize,
    pub black_stones: usize,
    pub white_territory: usize,
    pub black_territory: usize,
}

impl AreaScore {
    pub fn total(&self, player: Player) -> usize {
        match player {
            Player::White => self.white_total,
            Player::Black => self.black_total,
        }
    }

    /// Black's total minus White's total
    pub fn margin(&self) -> i64 {
        self.black_total as i64 - self.white_total as i64
    }

    /// Player with the larger total, `None` on a tie
    pub fn winner(&self) -> Option<Player> {
        match self.margin() {
            m if m > 0 => Some(Player::Black),
            m if m < 0 => Some(Player::White),
            _ => None,
        }
    }
}

/// Score a board.
///
/// Territory is every empty cell that one base reaches through empty cells
/// and the other does not. Bases count for nobody.
pub fn area_score(board: &Board) -> AreaScore {
    let white_reach = reachable_from_base(board, Player::White, Traversal::EmptiesOnly);
    let black_reach = reachable_from_base(board, Player::Black, Traversal::EmptiesOnly);

    let mut score = AreaScore::default();
    for (coord, cell) in board.cells() {
        match cell {
            Cell::WhiteStone => score.white_stones += 1,
            Cell::BlackStone => score.black_stones += 1,
            Cell::Empty => match (white_reach.get(coord), black_reach.get(coord)) {
                (true, false) => score.white_territory += 1,
                (false, true) => score.black_territory += 1,
                _ => {}
            },
            Cell::WhiteBase | Cell::BlackBase => {}
        }
    }

    score.white_total = score.white_stones + score.white_territory;
    score.black_total = score.black_stones + score.black_territory;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    #[test]
    fn test_initial_board_is_shared() {
        let score = area_score(&Board::new(BoardSize::Ten));
        assert_eq!(score, AreaScore::default());
        assert_eq!(score.winner(), None);
    }

    #[test]
    fn test_walled_regions_become_territory() {
        // Black walls off the bottom two rows around its base; everything
        // else is open to White only.
        let board = Board::from_rows(
            BoardSize::Eight,
            &[
                "...W....",
                "........",
                "........",
                "........",
                "........",
                "bbbbbbbb",
                "........",
                "....B...",
            ],
        )
        .unwrap();
        let score = area_score(&board);
        assert_eq!(score.black_stones, 8);
        assert_eq!(score.black_territory, 15);
        assert_eq!(score.white_stones, 0);
        assert_eq!(score.white_territory, 39);
        assert_eq!(score.black_total, 23);
        assert_eq!(score.white_total, 39);
        assert_eq!(score.winner(), Some(Player::White));
        assert_eq!(score.margin(), -16);
    }

    #[test]
    fn test_own_stones_block_own_territory() {
        // A black stone ring around an empty cell: the cell is no one's
        let board = Board::from_rows(
            BoardSize::Eight,
            &[
                "...W....",
                "........",
                "....b...",
                "...b.b..",
                "...bbb..",
                "........",
                "........",
                "....B...",
            ],
        )
        .unwrap();
        let score = area_score(&board);
        assert_eq!(score.black_stones, 6);
        assert_eq!(score.white_territory + score.black_territory, 0);
    }
}
