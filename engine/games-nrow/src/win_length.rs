//! Win length (K) and the board-size table it is derived from.

use crate::BoardError;

/// Number of consecutive marks needed to win. Always `2 <= K <= N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinLength(usize);

impl WinLength {
    pub const MIN: usize = 2;

    /// Validate `win_length` against a board of side `board_size`.
    pub fn new(win_length: usize, board_size: usize) -> Result<Self, BoardError> {
        if win_length < Self::MIN || win_length > board_size {
            return Err(BoardError::InvalidWinLength {
                win_length,
                size: board_size,
            });
        }
        Ok(Self(win_length))
    }

    /// Look up K for a board size in the default table.
    pub fn for_size(board_size: usize) -> Result<Self, BoardError> {
        WinLengthTable::default().lookup(board_size)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Board size → win length mapping.
///
/// Lookup picks the entry with the largest size not exceeding the board
/// size, so the last entry covers every larger board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinLengthTable {
    /// Sorted by board size
    entries: Vec<(usize, usize)>,
}

impl WinLengthTable {
    /// `(board size, win length)` pairs used when nothing is configured.
    pub const DEFAULT_ENTRIES: &'static [(usize, usize)] = &[(3, 3), (4, 3), (5, 4), (6, 5)];

    pub fn new(entries: impl IntoIterator<Item = (usize, usize)>) -> Result<Self, BoardError> {
        let mut entries: Vec<(usize, usize)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(BoardError::EmptyWinLengthTable);
        }
        for &(size, win_length) in &entries {
            WinLength::new(win_length, size)?;
        }
        entries.sort_by_key(|&(size, _)| size);
        entries.dedup_by_key(|&mut (size, _)| size);
        Ok(Self { entries })
    }

    pub fn lookup(&self, board_size: usize) -> Result<WinLength, BoardError> {
        let &(_, win_length) = self
            .entries
            .iter()
            .rev()
            .find(|&&(size, _)| size <= board_size)
            .ok_or(BoardError::UnsupportedSize(board_size))?;
        WinLength::new(win_length, board_size)
    }

    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }
}

impl Default for WinLengthTable {
    fn default() -> Self {
        Self {
            entries: Self::DEFAULT_ENTRIES.to_vec(),
        }
    }
}
