//! Reachability from a player's base

use std::collections::VecDeque;

use crate::board::{Board, BoardSize, Cell, Coord, Player};

/// Which cells a search may step onto
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Empty cells, the player's own stones and own base
    StonesAndEmpties,
    /// Empty cells only
    EmptiesOnly,
}

impl Traversal {
    fn allows(self, cell: Cell, player: Player) -> bool {
        match self {
            Traversal::StonesAndEmpties => {
                cell == Cell::Empty || cell == Cell::stone(player) || cell == Cell::base(player)
            }
            Traversal::EmptiesOnly => cell == Cell::Empty,
        }
    }
}

/// Boolean grid over the board's cells
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellMask {
    size: BoardSize,
    bits: Vec<bool>,
}

impl CellMask {
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            bits: vec![false; size.cell_count()],
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn get(&self, coord: Coord) -> bool {
        self.size.contains(coord) && self.bits[self.size.index(coord)]
    }

    pub(crate) fn set(&mut self, coord: Coord) {
        let idx = self.size.index(coord);
        self.bits[idx] = true;
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn any(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    /// Coordinates marked true, row-major
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.size
            .coords()
            .zip(self.bits.iter())
            .filter_map(|(coord, &b)| if b { Some(coord) } else { None })
    }
}

/// Breadth-first search from the player's base.
///
/// The base is always part of the result. Every other cell is included iff
/// a chain of neighbors allowed by `traversal` links it to the base.
pub fn reachable_from_base(board: &Board, player: Player, traversal: Traversal) -> CellMask {
    let size = board.size();
    let start = board.base(player);
    let mut visited = CellMask::new(size);
    let mut queue = VecDeque::with_capacity(size.cell_count());

    visited.set(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in size.neighbors(current) {
            if visited.get(next) || !traversal.allows(board.get(next), player) {
                continue;
            }
            visited.set(next);
            queue.push_back(next);
        }
    }

    visited
}
