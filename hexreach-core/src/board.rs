//! Board geometry for the flat-top offset hex grid
//!
//! Coordinates are (row, col) on a rectangular grid. Columns are flat-top
//! hexes with every even column shifted half a cell down, so the neighbor
//! set depends on the parity of the column.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// LAYOUT
// ============================================================================

/// Neighbor offsets (d_row, d_col) for cells in an even column
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const EVEN_COL_DIRECTIONS: [(i8, i8); 6] = [
    (-1, 0), // N
    (0, 1),  // NE
    (1, 1),  // SE
    (1, 0),  // S
    (1, -1), // SW
    (0, -1), // NW
];

/// Neighbor offsets (d_row, d_col) for cells in an odd column
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const ODD_COL_DIRECTIONS: [(i8, i8); 6] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // SE
    (1, 0),   // S
    (0, -1),  // SW
    (-1, -1), // NW
];

/// The two supported board layouts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BoardSize {
    /// 8x8, White base at (0,3), Black base at (7,4)
    Eight,
    /// 10x10, White base at (0,4), Black base at (9,5)
    Ten,
}

impl BoardSize {
    pub const fn rows(self) -> u8 {
        match self {
            BoardSize::Eight => 8,
            BoardSize::Ten => 10,
        }
    }

    pub const fn cols(self) -> u8 {
        self.rows()
    }

    /// Number of cells on the board
    pub const fn cell_count(self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    /// Fixed base coordinate for a player
    pub const fn base(self, player: Player) -> Coord {
        match (self, player) {
            (BoardSize::Eight, Player::White) => Coord::new(0, 3),
            (BoardSize::Eight, Player::Black) => Coord::new(7, 4),
            (BoardSize::Ten, Player::White) => Coord::new(0, 4),
            (BoardSize::Ten, Player::Black) => Coord::new(9, 5),
        }
    }

    /// Side length as accepted on the command line and in rule files
    pub fn from_side(side: u8) -> Option<Self> {
        match side {
            8 => Some(BoardSize::Eight),
            10 => Some(BoardSize::Ten),
            _ => None,
        }
    }

    /// Check if a (possibly negative) coordinate lies on the board
    pub fn is_in_bounds(self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && row < self.rows() as i32 && col < self.cols() as i32
    }

    /// On-board neighbors of a cell, in N, NE, SE, S, SW, NW order
    pub fn neighbors(self, coord: Coord) -> impl Iterator<Item = Coord> {
        let table = if coord.col % 2 == 0 {
            &EVEN_COL_DIRECTIONS
        } else {
            &ODD_COL_DIRECTIONS
        };
        table.iter().filter_map(move |&(dr, dc)| {
            let row = coord.row as i32 + dr as i32;
            let col = coord.col as i32 + dc as i32;
            if self.is_in_bounds(row, col) {
                Some(Coord::new(row as u8, col as u8))
            } else {
                None
            }
        })
    }

    /// All coordinates in row-major order
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }

    pub(crate) fn index(self, coord: Coord) -> usize {
        coord.row as usize * self.cols() as usize + coord.col as usize
    }

    pub(crate) fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows() && coord.col < self.cols()
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize::Ten
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = String;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        Self::from_side(side).ok_or_else(|| format!("unsupported board size {side} (expected 8 or 10)"))
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> u8 {
        size.rows()
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows(), self.cols())
    }
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("White"),
            Player::Black => f.write_str("Black"),
        }
    }
}

/// Grid coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Content of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    WhiteStone,
    BlackStone,
    WhiteBase,
    BlackBase,
}

impl Cell {
    pub fn stone(player: Player) -> Self {
        match player {
            Player::White => Cell::WhiteStone,
            Player::Black => Cell::BlackStone,
        }
    }

    pub fn base(player: Player) -> Self {
        match player {
            Player::White => Cell::WhiteBase,
            Player::Black => Cell::BlackBase,
        }
    }

    /// Owner of a stone, `None` for empties and bases
    pub fn stone_owner(self) -> Option<Player> {
        match self {
            Cell::WhiteStone => Some(Player::White),
            Cell::BlackStone => Some(Player::Black),
            Cell::Empty | Cell::WhiteBase | Cell::BlackBase => None,
        }
    }

    /// Text symbol used by fingerprints and the grid text form
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::WhiteStone => 'w',
            Cell::BlackStone => 'b',
            Cell::WhiteBase => 'W',
            Cell::BlackBase => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Cell::Empty),
            'w' => Some(Cell::WhiteStone),
            'b' => Some(Cell::BlackStone),
            'W' => Some(Cell::WhiteBase),
            'B' => Some(Cell::BlackBase),
            _ => None,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Errors from parsing the grid text form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: expected {expected} cells, found {found}")]
    ColumnCount { row: usize, expected: usize, found: usize },

    #[error("row {row}, col {col}: unknown cell symbol {symbol:?}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },

    #[error("base cell misplaced at {0}")]
    MisplacedBase(Coord),

    #[error("{0} base missing")]
    MissingBase(Player),
}

/// Canonical encoding of a board's cells, row by row
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board value (clone to change)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

/// Serialized form: the grid text rows, validated on the way in
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    size: BoardSize,
    rows: Vec<String>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = BoardParseError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let rows: Vec<&str> = repr.rows.iter().map(String::as_str).collect();
        Board::from_rows(repr.size, &rows)
    }
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        BoardRepr {
            size: board.size,
            rows: board.to_rows(),
        }
    }
}

impl Board {
    /// Empty board with both bases in place
    pub fn new(size: BoardSize) -> Self {
        let mut cells = vec![Cell::Empty; size.cell_count()];
        for player in [Player::White, Player::Black] {
            cells[size.index(size.base(player))] = Cell::base(player);
        }
        Self { size, cells }
    }

    /// Parse the grid text form (one line per row, one symbol per cell).
    /// Whitespace inside a row is ignored.
    pub fn from_rows(size: BoardSize, rows: &[&str]) -> Result<Self, BoardParseError> {
        if rows.len() != size.rows() as usize {
            return Err(BoardParseError::RowCount {
                expected: size.rows() as usize,
                found: rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(size.cell_count());
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size.cols() as usize {
                return Err(BoardParseError::ColumnCount {
                    row,
                    expected: size.cols() as usize,
                    found: symbols.len(),
                });
            }
            for (col, &symbol) in symbols.iter().enumerate() {
                let cell = Cell::from_symbol(symbol)
                    .ok_or(BoardParseError::UnknownSymbol { row, col, symbol })?;
                cells.push(cell);
            }
        }

        let board = Self { size, cells };
        for coord in size.coords() {
            let cell = board.get(coord);
            let misplaced = match cell {
                Cell::WhiteBase => coord != size.base(Player::White),
                Cell::BlackBase => coord != size.base(Player::Black),
                _ => false,
            };
            if misplaced {
                return Err(BoardParseError::MisplacedBase(coord));
            }
        }
        for player in [Player::White, Player::Black] {
            if board.get(size.base(player)) != Cell::base(player) {
                return Err(BoardParseError::MissingBase(player));
            }
        }

        Ok(board)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Cell at coordinate. Off-board coordinates read as `Empty`.
    pub fn get(&self, coord: Coord) -> Cell {
        if self.size.contains(coord) {
            self.cells[self.size.index(coord)]
        } else {
            Cell::Empty
        }
    }

    /// Base coordinate of a player on this board
    pub fn base(&self, player: Player) -> Coord {
        self.size.base(player)
    }

    /// Iterate (coord, cell) in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.size.coords().zip(self.cells.iter().copied())
    }

    /// Number of stones a player has on the board
    pub fn stone_count(&self, player: Player) -> usize {
        let stone = Cell::stone(player);
        self.cells.iter().filter(|&&c| c == stone).count()
    }

    /// Copy of this board with a stone placed. Bases are never overwritten.
    pub(crate) fn with_stone(&self, coord: Coord, player: Player) -> Self {
        let mut next = self.clone();
        let idx = self.size.index(coord);
        if next.cells[idx] == Cell::Empty {
            next.cells[idx] = Cell::stone(player);
        }
        next
    }

    /// Clear a stone in place (bases are left alone)
    pub(crate) fn clear_stone(&mut self, coord: Coord) {
        let idx = self.size.index(coord);
        if self.cells[idx].stone_owner().is_some() {
            self.cells[idx] = Cell::Empty;
        }
    }

    /// Canonical row-by-row encoding of every cell
    pub fn fingerprint(&self) -> Fingerprint {
        let cols = self.size.cols() as usize;
        let mut out = String::with_capacity(self.cells.len() + self.size.rows() as usize);
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % cols == 0 {
                out.push('/');
            }
            out.push(cell.symbol());
        }
        Fingerprint(out)
    }

    /// Grid text form, one string per row
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size.cols() as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size.cols() {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for (row, line) in self.to_rows().iter().enumerate() {
            write!(f, "{:>2} ", row)?;
            for symbol in line.chars() {
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let size = BoardSize::Ten;
        assert!(size.is_in_bounds(0, 0));
        assert!(size.is_in_bounds(9, 9));
        assert!(!size.is_in_bounds(-1, 0));
        assert!(!size.is_in_bounds(0, 10));
        assert!(!BoardSize::Eight.is_in_bounds(8, 0));
    }

    #[test]
    fn test_neighbors_by_parity() {
        let size = BoardSize::Ten;
        // Even column: side neighbors are on the same row and the row below
        let even: Vec<_> = size.neighbors(Coord::new(4, 4)).collect();
        assert_eq!(
            even,
            vec![
                Coord::new(3, 4),
                Coord::new(4, 5),
                Coord::new(5, 5),
                Coord::new(5, 4),
                Coord::new(5, 3),
                Coord::new(4, 3),
            ]
        );
        // Odd column: side neighbors are on the row above and the same row
        let odd: Vec<_> = size.neighbors(Coord::new(4, 5)).collect();
        assert_eq!(
            odd,
            vec![
                Coord::new(3, 5),
                Coord::new(3, 6),
                Coord::new(4, 6),
                Coord::new(5, 5),
                Coord::new(4, 4),
                Coord::new(3, 4),
            ]
        );
    }

    #[test]
    fn test_neighbors_clipped_at_edges() {
        let size = BoardSize::Ten;
        assert_eq!(size.neighbors(Coord::new(0, 0)).count(), 3);
        assert_eq!(size.neighbors(Coord::new(9, 5)).count(), 5);
        assert_eq!(size.neighbors(Coord::new(0, 4)).count(), 5);
    }

    #[test]
    fn test_neighbors_symmetric() {
        for size in [BoardSize::Eight, BoardSize::Ten] {
            for a in size.coords() {
                for b in size.neighbors(a) {
                    assert!(
                        size.neighbors(b).any(|c| c == a),
                        "{} lists {} but not the reverse",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_layout_point_symmetric() {
        for size in [BoardSize::Eight, BoardSize::Ten] {
            let last_row = size.rows() - 1;
            let last_col = size.cols() - 1;
            let white = size.base(Player::White);
            let black = size.base(Player::Black);
            assert_eq!(black, Coord::new(last_row - white.row, last_col - white.col));

            // Rotating a neighbor pair by 180 degrees keeps it a neighbor pair
            for a in size.coords() {
                let ra = Coord::new(last_row - a.row, last_col - a.col);
                for b in size.neighbors(a) {
                    let rb = Coord::new(last_row - b.row, last_col - b.col);
                    assert!(size.neighbors(ra).any(|c| c == rb));
                }
            }
        }
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new(BoardSize::Ten);
        assert_eq!(board.get(Coord::new(0, 4)), Cell::WhiteBase);
        assert_eq!(board.get(Coord::new(9, 5)), Cell::BlackBase);
        assert_eq!(board.cells().filter(|(_, c)| *c == Cell::Empty).count(), 98);
        assert_eq!(board.stone_count(Player::White), 0);
    }

    #[test]
    fn test_fingerprint_distinguishes_single_cell() {
        let board = Board::new(BoardSize::Eight);
        let other = board.with_stone(Coord::new(3, 3), Player::Black);
        assert_ne!(board.fingerprint(), other.fingerprint());
        assert_eq!(board.fingerprint(), Board::new(BoardSize::Eight).fingerprint());
    }

    #[test]
    fn test_text_form_round_trip() {
        let board = Board::new(BoardSize::Ten)
            .with_stone(Coord::new(8, 5), Player::Black)
            .with_stone(Coord::new(1, 4), Player::White);
        let rows = board.to_rows();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let parsed = Board::from_rows(BoardSize::Ten, &refs).unwrap();
        assert_eq!(parsed, board);
        assert_eq!(parsed.fingerprint(), board.fingerprint());
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        let err = Board::from_rows(BoardSize::Eight, &["........"]).unwrap_err();
        assert_eq!(err, BoardParseError::RowCount { expected: 8, found: 1 });

        let mut rows = vec!["...W....", "........", "........", "........"];
        rows.extend(["........", "........", "........", "....B..x"]);
        let err = Board::from_rows(BoardSize::Eight, &rows).unwrap_err();
        assert!(matches!(err, BoardParseError::UnknownSymbol { row: 7, col: 7, symbol: 'x' }));

        let mut rows = vec!["W.......", "........", "........", "........"];
        rows.extend(["........", "........", "........", "....B..."]);
        let err = Board::from_rows(BoardSize::Eight, &rows).unwrap_err();
        assert_eq!(err, BoardParseError::MisplacedBase(Coord::new(0, 0)));
    }

    #[test]
    fn test_json_uses_text_rows() {
        let board = Board::new(BoardSize::Eight).with_stone(Coord::new(6, 4), Player::Black);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"size\":8"));
        assert!(json.contains("\"....b...\""));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        let bad = r#"{"size": 8, "rows": ["...W...."]}"#;
        assert!(serde_json::from_str::<Board>(bad).is_err());
    }

    #[test]
    fn test_bases_never_overwritten() {
        let board = Board::new(BoardSize::Ten);
        let same = board.with_stone(Coord::new(0, 4), Player::Black);
        assert_eq!(same, board);
        let mut cleared = board.clone();
        cleared.clear_stone(Coord::new(9, 5));
        assert_eq!(cleared, board);
    }
}
