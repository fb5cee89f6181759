//! Board and rules for k-in-a-row games.
//!
//! Two players alternately place their marks on an N×N grid. A player wins
//! by placing K consecutive marks in a row, column, or diagonal, where K is
//! derived from N through a [`WinLengthTable`].
//!
//! # Usage
//!
//! ```rust
//! use games_nrow::{find_winner, Board, Mark, WinLength};
//!
//! let board: Board = "XXX/OO./...".parse().unwrap();
//! let win_length = WinLength::for_size(board.size()).unwrap();
//!
//! assert_eq!(find_winner(&board, win_length), Some(Mark::X));
//! ```

mod board;
mod rules;
mod win_length;

use std::fmt;
use std::str::FromStr;

pub use board::{Board, BoardError};
pub use rules::{
    completes_line, find_winner, is_full, lines, near_win_count, status, GameStatus, Line,
};
pub use win_length::{WinLength, WinLengthTable};

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other player's mark.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Parse a single board character (case-insensitive).
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'X' | 'x' => Some(Mark::X),
            'O' | 'o' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Mark {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Mark::from_symbol(c).ok_or_else(|| BoardError::InvalidMark(s.to_string()))
            }
            _ => Err(BoardError::InvalidMark(s.to_string())),
        }
    }
}

/// Contents of a single board square. `None` is an empty cell.
pub type Cell = Option<Mark>;

#[cfg(test)]
mod tests;
