use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// One of the two sides of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Human,
    Robot,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Robot,
            Player::Robot => Player::Human,
        }
    }

    /// Piece type placed by this player.
    #[inline]
    pub fn piece(self) -> CellValue {
        match self {
            Player::Human => CellValue::HumanPiece,
            Player::Robot => CellValue::RobotPiece,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Human => f.write_str("human"),
            Player::Robot => f.write_str("robot"),
        }
    }
}

/// Classified content of one board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    HumanPiece,
    RobotPiece,
}

impl CellValue {
    /// Player owning the piece in this cell, if any.
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            CellValue::Empty => None,
            CellValue::HumanPiece => Some(Player::Human),
            CellValue::RobotPiece => Some(Player::Robot),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == CellValue::Empty
    }

    fn symbol(self) -> char {
        match self {
            CellValue::Empty => '.',
            CellValue::HumanPiece => 'H',
            CellValue::RobotPiece => 'R',
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("unexpected board symbol {0:?} (expected H, R, '.' or '_')")]
    InvalidSymbol(char),
    #[error("expected {CELL_COUNT} cells, got {0}")]
    WrongCellCount(usize),
}

/// Classified state of all nine cells at one instant.
///
/// Cells are stored row-major in the human's viewing orientation: index
/// `3 * row + col`, row 0 being the row farthest from the human.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    cells: [CellValue; CELL_COUNT],
}

impl BoardSnapshot {
    pub const EMPTY: BoardSnapshot = BoardSnapshot {
        cells: [CellValue::Empty; CELL_COUNT],
    };

    pub fn from_cells(cells: [CellValue; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Build a snapshot from a grid already expressed in the human's
    /// orientation.
    pub fn from_grid(grid: [[CellValue; 3]; 3]) -> Self {
        let mut cells = [CellValue::Empty; CELL_COUNT];
        for (row, values) in grid.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                cells[3 * row + col] = *value;
            }
        }
        Self { cells }
    }

    /// Build a snapshot from a grid in camera order.
    ///
    /// The camera faces the human across the board, so camera cell
    /// `(r, c)` is stored at `(2 - r, 2 - c)`.
    pub fn from_camera_grid(grid: [[CellValue; 3]; 3]) -> Self {
        Self::from_grid(grid).point_reflected()
    }

    /// 180° point reflection of the cell indexing. Applying it twice is the
    /// identity.
    pub fn point_reflected(&self) -> Self {
        let mut cells = self.cells;
        cells.reverse();
        Self { cells }
    }

    #[inline]
    pub fn cells(&self) -> &[CellValue; CELL_COUNT] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: usize) -> CellValue {
        self.cells[index]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> CellValue {
        self.cells[3 * row + col]
    }

    /// Copy of this snapshot with `value` written at `index`.
    pub fn with_cell(&self, index: usize, value: CellValue) -> Self {
        let mut cells = self.cells;
        cells[index] = value;
        Self { cells }
    }

    pub fn count(&self, value: CellValue) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    pub fn piece_count(&self) -> usize {
        CELL_COUNT - self.count(CellValue::Empty)
    }

    /// True when no piece is on the board.
    pub fn is_clear(&self) -> bool {
        self.piece_count() == 0
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&CellValue::Empty)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                f.write_str("|")?;
            }
            for col in 0..3 {
                write!(f, "{}", self.get(row, col).symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for BoardSnapshot {
    type Err = ParseBoardError;

    /// Parse `H`, `R` and `.`/`_` symbols row-major; whitespace and `|` are
    /// ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(CELL_COUNT);
        for ch in s.chars() {
            let value = match ch {
                'H' | 'h' => CellValue::HumanPiece,
                'R' | 'r' => CellValue::RobotPiece,
                '.' | '_' => CellValue::Empty,
                c if c.is_whitespace() || c == '|' || c == ',' => continue,
                c => return Err(ParseBoardError::InvalidSymbol(c)),
            };
            values.push(value);
        }
        let cells: [CellValue; CELL_COUNT] = values
            .try_into()
            .map_err(|v: Vec<CellValue>| ParseBoardError::WrongCellCount(v.len()))?;
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> BoardSnapshot {
        s.parse().expect("valid board literal")
    }

    #[test]
    fn camera_grid_is_point_reflected() {
        let mut grid = [[CellValue::Empty; 3]; 3];
        grid[0][0] = CellValue::HumanPiece;
        grid[0][1] = CellValue::RobotPiece;
        let snap = BoardSnapshot::from_camera_grid(grid);
        assert_eq!(snap.get(2, 2), CellValue::HumanPiece);
        assert_eq!(snap.get(2, 1), CellValue::RobotPiece);
        assert_eq!(snap.piece_count(), 2);
    }

    #[test]
    fn reflection_is_an_involution() {
        for literal in ["HR.|.R.|..H", "RRR|...|...", "H.R|RH.|..R", "...|...|..."] {
            let b = board(literal);
            assert_eq!(b.point_reflected().point_reflected(), b);
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let b = board("H R . / . . R / H . .".replace('/', "").as_str());
        assert_eq!(b.to_string(), "HR.|..R|H..");
        assert_eq!(board(&b.to_string()), b);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            "HRX......".parse::<BoardSnapshot>(),
            Err(ParseBoardError::InvalidSymbol('X'))
        );
        assert_eq!(
            "HR".parse::<BoardSnapshot>(),
            Err(ParseBoardError::WrongCellCount(2))
        );
    }

    #[test]
    fn counts_and_emptiness() {
        let b = board("HR.|.R.|..H");
        assert_eq!(b.count(CellValue::HumanPiece), 2);
        assert_eq!(b.count(CellValue::RobotPiece), 2);
        assert_eq!(b.empty_cells().collect::<Vec<_>>(), vec![2, 3, 5, 6, 7]);
        assert!(!b.is_full());
        assert!(BoardSnapshot::EMPTY.is_clear());
    }

    #[test]
    fn serializes_as_named_cells() {
        let b = BoardSnapshot::EMPTY.with_cell(4, CellValue::RobotPiece);
        let json = serde_json::to_string(&b).expect("serialize");
        assert!(json.contains("robot_piece"));
        let back: BoardSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);
    }
}
