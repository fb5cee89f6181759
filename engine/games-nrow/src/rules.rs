//! Win, draw and near-win detection for arbitrary N and K.

use crate::{Board, Cell, Mark, WinLength};

/// A window of `len` consecutive cells starting at `(row, col)` and
/// stepping by `(d_row, d_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub row: usize,
    pub col: usize,
    pub d_row: isize,
    pub d_col: isize,
    pub len: usize,
}

impl Line {
    /// Flat indices covered by this window on a board of side `size`.
    pub fn cells(self, size: usize) -> impl Iterator<Item = usize> {
        (0..self.len as isize).map(move |i| {
            let row = (self.row as isize + self.d_row * i) as usize;
            let col = (self.col as isize + self.d_col * i) as usize;
            row * size + col
        })
    }
}

/// Every length-K window on an N×N board.
///
/// Order: rows, then columns, then for each diagonal origin the
/// down-right window followed by the down-left window.
pub fn lines(size: usize, win_length: WinLength) -> impl Iterator<Item = Line> {
    let len = win_length.get();
    let span = (size + 1).saturating_sub(len);

    let rows = (0..size).flat_map(move |row| {
        (0..span).map(move |col| Line {
            row,
            col,
            d_row: 0,
            d_col: 1,
            len,
        })
    });
    let cols = (0..size).flat_map(move |col| {
        (0..span).map(move |row| Line {
            row,
            col,
            d_row: 1,
            d_col: 0,
            len,
        })
    });
    let diagonals = (0..span).flat_map(move |row| {
        (0..span).flat_map(move |col| {
            [
                Line {
                    row,
                    col,
                    d_row: 1,
                    d_col: 1,
                    len,
                },
                Line {
                    row,
                    col: col + len - 1,
                    d_row: 1,
                    d_col: -1,
                    len,
                },
            ]
        })
    });

    rows.chain(cols).chain(diagonals)
}

/// Mark filling the whole window, if any.
fn line_owner(cells: &[Cell], size: usize, line: Line) -> Option<Mark> {
    let mut indices = line.cells(size);
    let first = cells[indices.next()?]?;
    indices.all(|i| cells[i] == Some(first)).then_some(first)
}

/// Mark owning the first fully matching window in scan order.
pub fn find_winner(board: &Board, win_length: WinLength) -> Option<Mark> {
    let size = board.size();
    lines(size, win_length).find_map(|line| line_owner(board.cells(), size, line))
}

#[inline]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(Option::is_some)
}

/// Windows holding exactly K−1 of `mark` and one empty cell.
///
/// A heuristic for unfinished positions; not a win test.
pub fn near_win_count(board: &Board, mark: Mark, win_length: WinLength) -> usize {
    let size = board.size();
    let cells = board.cells();
    let needed = win_length.get() - 1;

    lines(size, win_length)
        .filter(|line| {
            let (mut own, mut empty) = (0, 0);
            for i in line.cells(size) {
                match cells[i] {
                    Some(m) if m == mark => own += 1,
                    None => empty += 1,
                    Some(_) => return false,
                }
            }
            own == needed && empty == 1
        })
        .count()
}

/// Whether placing `mark` on the empty cell `index` makes a run of at
/// least K through it.
///
/// Matches `find_winner` after the placement whenever the board had no
/// winner before it.
pub fn completes_line(board: &Board, index: usize, mark: Mark, win_length: WinLength) -> bool {
    if !board.is_empty_at(index) {
        return false;
    }

    let size = board.size() as isize;
    let (row, col) = board.coords(index);
    let (row, col) = (row as isize, col as isize);
    let owned = |r: isize, c: isize| {
        r >= 0 && r < size && c >= 0 && c < size && board.cells()[(r * size + c) as usize] == Some(mark)
    };
    let run = |dr: isize, dc: isize| {
        (1..)
            .take_while(|&step| owned(row + dr * step, col + dc * step))
            .count()
    };

    [(0, 1), (1, 0), (1, 1), (1, -1)]
        .into_iter()
        .any(|(dr, dc)| 1 + run(dr, dc) + run(-dr, -dc) >= win_length.get())
}

/// Overall state of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

pub fn status(board: &Board, win_length: WinLength) -> GameStatus {
    match find_winner(board, win_length) {
        Some(mark) => GameStatus::Won(mark),
        None if is_full(board) => GameStatus::Draw,
        None => GameStatus::InProgress,
    }
}
