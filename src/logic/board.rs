use serde::{Deserialize, Serialize};
use std::fmt;

/// A mark on the board. `X` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }
}

/// Square grid of cells. Empty cells are `None`.
///
/// The board is plain data: engines never mutate a caller's board, they
/// clone it and work on the clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    grid: Vec<Option<Player>>,
}

impl Board {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            grid: vec![None; size * size],
        }
    }

    /// Parses a board from row strings using `.` for empty and `X`/`O`
    /// for marks. Rows must all have the same length. Intended for tests
    /// and diagnostics.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut board = Self::new(size);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "row {r} length != board size");
            for (c, ch) in row.chars().enumerate() {
                board.grid[r * size + c] = match ch {
                    'X' | 'x' => Some(Player::X),
                    'O' | 'o' => Some(Player::O),
                    _ => None,
                };
            }
        }
        board
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        self.grid[row * self.size + col]
    }

    pub fn place(&mut self, row: usize, col: usize, player: Player) {
        self.grid[row * self.size + col] = Some(player);
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) {
        self.grid[row * self.size + col] = None;
    }

    /// True when no mark has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.iter().all(Option::is_none)
    }

    /// Number of marks on the board.
    #[must_use]
    pub fn stones(&self) -> usize {
        self.grid.iter().filter(|c| c.is_some()).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..self.size {
            write!(f, "{:2} ", c)?;
        }
        writeln!(f)?;
        for r in 0..self.size {
            write!(f, "{:2} ", r)?;
            for c in 0..self.size {
                let ch = self.get(r, c).map_or('.', Player::symbol);
                write!(f, "{ch}  ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
