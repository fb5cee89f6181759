//! Flat row-major N×N board.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Cell, Mark};

/// Errors raised when building or mutating a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid board size: expected {expected} cells, got {actual}")]
    InvalidBoardSize { expected: usize, actual: usize },

    #[error("Board size must be positive")]
    ZeroSize,

    #[error("Board size {0} is too large")]
    TooLarge(usize),

    #[error("{0} cells do not form a square board")]
    NotSquare(usize),

    #[error("Invalid win length {win_length} for a {size}x{size} board")]
    InvalidWinLength { win_length: usize, size: usize },

    #[error("No win length configured for a {0}x{0} board")]
    UnsupportedSize(usize),

    #[error("Win length table has no entries")]
    EmptyWinLengthTable,

    #[error("Invalid board cell: {0:?}")]
    InvalidCell(char),

    #[error("Invalid mark: {0:?}")]
    InvalidMark(String),

    #[error("Cell {0} is out of bounds")]
    OutOfBounds(usize),

    #[error("Cell {0} is already occupied")]
    Occupied(usize),
}

/// An N×N grid of cells. The size is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::ZeroSize);
        }
        let num_cells = size
            .checked_mul(size)
            .ok_or(BoardError::TooLarge(size))?;
        Ok(Self {
            size,
            cells: vec![None; num_cells],
        })
    }

    /// Wrap existing cells, checking that there are exactly `size²` of them.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::ZeroSize);
        }
        // An unrepresentable N² can never match a real cell count
        let expected = size.checked_mul(size).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(BoardError::InvalidBoardSize {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (N²).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a flat index, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    #[inline]
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Indices of empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.is_none().then_some(i))
            .collect()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Some(mark)).count()
    }

    /// Place a mark on an empty cell.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), BoardError> {
        match self.cells.get_mut(index) {
            None => Err(BoardError::OutOfBounds(index)),
            Some(Some(_)) => Err(BoardError::Occupied(index)),
            Some(cell) => {
                *cell = Some(mark);
                Ok(())
            }
        }
    }

    /// Copy of this board with one extra mark.
    pub fn with_mark(&self, index: usize, mark: Mark) -> Result<Board, BoardError> {
        let mut next = self.clone();
        next.place(index, mark)?;
        Ok(next)
    }

    /// Index of the centre cell `(N/2, N/2)`, rounding down on even boards.
    pub fn center(&self) -> usize {
        let mid = self.size / 2;
        self.index(mid, mid)
    }

    /// Corner indices: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [usize; 4] {
        let n = self.size;
        [0, n - 1, n * (n - 1), n * n - 1]
    }

    /// The board turned by 180 degrees.
    pub fn rotated_180(&self) -> Board {
        Board {
            size: self.size,
            cells: self.cells.iter().rev().copied().collect(),
        }
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse `X`, `O` and `.`/`_`/`-` (empty). Whitespace, `/` and `|` are
    /// separators and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .map(|c| match c {
                '.' | '_' | '-' => Ok(None),
                _ => Mark::from_symbol(c)
                    .map(Some)
                    .ok_or(BoardError::InvalidCell(c)),
            })
            .collect::<Result<Vec<Cell>, _>>()?;

        let size = (1..=cells.len())
            .take_while(|n| n * n <= cells.len())
            .last()
            .unwrap_or(0);
        if size == 0 || size * size != cells.len() {
            return Err(BoardError::NotSquare(cells.len()));
        }

        Board::from_cells(size, cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                let c = cell.map_or('.', Mark::symbol);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
