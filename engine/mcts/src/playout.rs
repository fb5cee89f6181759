//! Playout policies for the simulation phase.
//!
//! A playout plays alternating moves from a leaf until the game ends or a
//! depth cap is hit. [`simulate`] owns the rules shared by every policy
//! (terminal check, one-ply win, depth cap, near-win scoring); a
//! [`PlayoutPolicy`] only picks the next move.

use std::cmp::Reverse;

use games_nrow::{
    completes_line, find_winner, is_full, near_win_count, Board, BoardError, Mark, WinLength,
};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Errors that can occur during a playout.
#[derive(Debug, Error)]
pub enum PlayoutError {
    #[error("Playout policy was given no candidate moves")]
    NoCandidates,

    #[error("Playout policy chose occupied or out-of-range cell {0}")]
    IllegalMove(usize),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),
}

/// Move selection for one ply of a playout.
///
/// Implementations must be thread-safe (Send + Sync) so a decider can be
/// shared.
pub trait PlayoutPolicy: Send + Sync {
    /// Pick one of `legal` for `mover`. `legal` is non-empty and in
    /// row-major order.
    fn choose_move(
        &self,
        board: &Board,
        mover: Mark,
        win_length: WinLength,
        legal: &[usize],
        rng: &mut ChaCha20Rng,
    ) -> Result<usize, PlayoutError>;
}

/// Uniformly random playouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicy;

impl UniformPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PlayoutPolicy for UniformPolicy {
    fn choose_move(
        &self,
        _board: &Board,
        _mover: Mark,
        _win_length: WinLength,
        legal: &[usize],
        rng: &mut ChaCha20Rng,
    ) -> Result<usize, PlayoutError> {
        legal.choose(rng).copied().ok_or(PlayoutError::NoCandidates)
    }
}

/// Heuristic-biased playouts.
///
/// With probability `heuristic_probability` every legal move is scored
/// (block bonus plus centre proximity) and one of the `top_moves` best is
/// picked uniformly; otherwise any legal move is picked uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicPolicy {
    pub heuristic_probability: f64,
    pub top_moves: usize,
    /// Added when the opponent would complete a line on the cell.
    pub block_bonus: i32,
    /// Centre bonus is `max(0, center_radius - manhattan distance)`.
    pub center_radius: i32,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            heuristic_probability: 0.8,
            top_moves: 3,
            block_bonus: 5,
            center_radius: 3,
        }
    }
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of playing `index` for `mover`.
    pub fn score_move(&self, board: &Board, index: usize, mover: Mark, win_length: WinLength) -> i32 {
        let mut score = 0;
        if completes_line(board, index, mover.opponent(), win_length) {
            score += self.block_bonus;
        }

        let (row, col) = board.coords(index);
        let (center_row, center_col) = board.coords(board.center());
        let distance = row.abs_diff(center_row) + col.abs_diff(center_col);
        score + (self.center_radius - distance as i32).max(0)
    }
}

impl PlayoutPolicy for HeuristicPolicy {
    fn choose_move(
        &self,
        board: &Board,
        mover: Mark,
        win_length: WinLength,
        legal: &[usize],
        rng: &mut ChaCha20Rng,
    ) -> Result<usize, PlayoutError> {
        if legal.is_empty() {
            return Err(PlayoutError::NoCandidates);
        }

        if rng.gen::<f64>() >= self.heuristic_probability {
            return legal.choose(rng).copied().ok_or(PlayoutError::NoCandidates);
        }

        let mut scored: Vec<(usize, i32)> = legal
            .iter()
            .map(|&m| (m, self.score_move(board, m, mover, win_length)))
            .collect();
        // Stable: equal scores keep row-major order
        scored.sort_by_key(|&(_, score)| Reverse(score));
        scored.truncate(self.top_moves.max(1));

        scored
            .choose(rng)
            .map(|&(m, _)| m)
            .ok_or(PlayoutError::NoCandidates)
    }
}

/// Weight of one near-win line in the depth-capped evaluation.
pub const NEAR_WIN_WEIGHT: f64 = 0.1;
pub const NEAR_WIN_CAP: f64 = 0.7;

/// Heuristic strength of `mark` in an unfinished position.
pub fn near_win_score(board: &Board, mark: Mark, win_length: WinLength) -> f64 {
    (near_win_count(board, mark, win_length) as f64 * NEAR_WIN_WEIGHT).min(NEAR_WIN_CAP)
}

/// Result of a single playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playout {
    /// `None` is a draw, including a tie on near-win scores.
    pub winner: Option<Mark>,
    pub plies: usize,
    pub reached_depth_cap: bool,
}

/// Play out from `board` with `to_move` on move, for at most `max_depth`
/// plies.
pub fn simulate<P: PlayoutPolicy + ?Sized>(
    policy: &P,
    board: &Board,
    to_move: Mark,
    win_length: WinLength,
    max_depth: usize,
    rng: &mut ChaCha20Rng,
) -> Result<Playout, PlayoutError> {
    let mut board = board.clone();
    let mut mover = to_move;

    for plies in 0..max_depth {
        let winner = find_winner(&board, win_length);
        if winner.is_some() || is_full(&board) {
            return Ok(Playout {
                winner,
                plies,
                reached_depth_cap: false,
            });
        }

        let legal = board.empty_cells();
        if let Some(&winning) = legal
            .iter()
            .find(|&&m| completes_line(&board, m, mover, win_length))
        {
            board.place(winning, mover)?;
            return Ok(Playout {
                winner: Some(mover),
                plies: plies + 1,
                reached_depth_cap: false,
            });
        }

        let choice = policy.choose_move(&board, mover, win_length, &legal, rng)?;
        if !board.is_empty_at(choice) {
            return Err(PlayoutError::IllegalMove(choice));
        }
        board.place(choice, mover)?;
        mover = mover.opponent();
    }

    // The last ply may have ended the game
    if let Some(winner) = find_winner(&board, win_length) {
        return Ok(Playout {
            winner: Some(winner),
            plies: max_depth,
            reached_depth_cap: false,
        });
    }
    if is_full(&board) {
        return Ok(Playout {
            winner: None,
            plies: max_depth,
            reached_depth_cap: false,
        });
    }

    let x = near_win_score(&board, Mark::X, win_length);
    let o = near_win_score(&board, Mark::O, win_length);
    let winner = if x > o {
        Some(Mark::X)
    } else if o > x {
        Some(Mark::O)
    } else {
        None
    };

    Ok(Playout {
        winner,
        plies: max_depth,
        reached_depth_cap: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn k(win_length: usize, size: usize) -> WinLength {
        WinLength::new(win_length, size).unwrap()
    }

    /// Always plays the first legal cell.
    struct FirstLegal;

    impl PlayoutPolicy for FirstLegal {
        fn choose_move(
            &self,
            _board: &Board,
            _mover: Mark,
            _win_length: WinLength,
            legal: &[usize],
            _rng: &mut ChaCha20Rng,
        ) -> Result<usize, PlayoutError> {
            legal.first().copied().ok_or(PlayoutError::NoCandidates)
        }
    }

    /// Returns a cell that is already taken.
    struct Cheater;

    impl PlayoutPolicy for Cheater {
        fn choose_move(
            &self,
            _board: &Board,
            _mover: Mark,
            _win_length: WinLength,
            _legal: &[usize],
            _rng: &mut ChaCha20Rng,
        ) -> Result<usize, PlayoutError> {
            Ok(0)
        }
    }

    #[test]
    fn test_score_move_center_bonus() {
        let policy = HeuristicPolicy::new();
        let b = Board::new(5).unwrap();
        let k4 = k(4, 5);

        assert_eq!(policy.score_move(&b, b.center(), Mark::X, k4), 3);
        assert_eq!(policy.score_move(&b, b.index(2, 3), Mark::X, k4), 2);
        assert_eq!(policy.score_move(&b, b.index(1, 1), Mark::X, k4), 1);
        assert_eq!(policy.score_move(&b, 0, Mark::X, k4), 0);
    }

    #[test]
    fn test_score_move_block_bonus() {
        let policy = HeuristicPolicy::new();
        // O threatens cell 2; cell 2 is one step from the centre diagonally (distance 2)
        let b = board("OO./X../...");
        assert_eq!(policy.score_move(&b, 2, Mark::X, k(3, 3)), 5 + 1);
        // Same cell is not a block for O
        assert_eq!(policy.score_move(&b, 2, Mark::O, k(3, 3)), 1);
    }

    #[test]
    fn test_heuristic_policy_blocks_deterministically() {
        let policy = HeuristicPolicy {
            heuristic_probability: 1.0,
            top_moves: 1,
            ..HeuristicPolicy::default()
        };
        let b = board("OO./X../...");
        let legal = b.empty_cells();

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..50 {
            let m = policy
                .choose_move(&b, Mark::X, k(3, 3), &legal, &mut rng)
                .unwrap();
            assert_eq!(m, 2);
        }
    }

    #[test]
    fn test_heuristic_policy_top_moves() {
        let policy = HeuristicPolicy {
            heuristic_probability: 1.0,
            ..HeuristicPolicy::default()
        };
        let b = Board::new(3).unwrap();
        let legal = b.empty_cells();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        // Centre scores 3, edges 2, corners 1: top three are 4, 1, 3
        for _ in 0..200 {
            let m = policy
                .choose_move(&b, Mark::X, k(3, 3), &legal, &mut rng)
                .unwrap();
            assert!([4, 1, 3].contains(&m), "unexpected move {m}");
        }
    }

    #[test]
    fn test_heuristic_policy_random_branch() {
        let policy = HeuristicPolicy {
            heuristic_probability: 0.0,
            ..HeuristicPolicy::default()
        };
        let b = Board::new(3).unwrap();
        let legal = b.empty_cells();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let mut seen = [false; 9];
        for _ in 0..500 {
            let m = policy
                .choose_move(&b, Mark::X, k(3, 3), &legal, &mut rng)
                .unwrap();
            seen[m] = true;
        }
        assert!(seen.iter().all(|&s| s), "random branch should reach every cell");
    }

    #[test]
    fn test_policies_reject_empty_candidates() {
        let b = board("XOX/XOO/OXX");
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(matches!(
            UniformPolicy.choose_move(&b, Mark::X, k(3, 3), &[], &mut rng),
            Err(PlayoutError::NoCandidates)
        ));
        assert!(matches!(
            HeuristicPolicy::new().choose_move(&b, Mark::X, k(3, 3), &[], &mut rng),
            Err(PlayoutError::NoCandidates)
        ));
    }

    #[test]
    fn test_near_win_score_is_capped() {
        let k3 = k(3, 3);
        assert_eq!(near_win_score(&Board::new(3).unwrap(), Mark::X, k3), 0.0);
        assert!((near_win_score(&board("XX./X../..."), Mark::X, k3) - 0.2).abs() < 1e-9);

        // Many open pairs on a large board hit the cap
        let b = board("X.X.X.X/......./X.X.X.X/......./X.X.X.X/......./.......");
        assert!(near_win_count(&b, Mark::X, k(3, 7)) > 7);
        assert_eq!(near_win_score(&b, Mark::X, k(3, 7)), NEAR_WIN_CAP);
    }

    #[test]
    fn test_simulate_terminal_board() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let won = simulate(&FirstLegal, &board("XXX/OO./..."), Mark::O, k(3, 3), 9, &mut rng).unwrap();
        assert_eq!(won.winner, Some(Mark::X));
        assert_eq!(won.plies, 0);

        let drawn = simulate(&FirstLegal, &board("XOX/XOO/OXX"), Mark::O, k(3, 3), 9, &mut rng).unwrap();
        assert_eq!(drawn.winner, None);
        assert!(!drawn.reached_depth_cap);
    }

    #[test]
    fn test_simulate_takes_immediate_win() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        // FirstLegal would play 2 anyway for X; use O to move where the win is at 5
        let result = simulate(&FirstLegal, &board("XX./OO./X.."), Mark::O, k(3, 3), 9, &mut rng).unwrap();
        assert_eq!(result.winner, Some(Mark::O));
        assert_eq!(result.plies, 1);
    }

    #[test]
    fn test_simulate_runs_policy_moves() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        // FirstLegal: X 0, O 1, X 2, O 3, X 4 ... X wins on the 0-4-8 diagonal
        let result = simulate(&FirstLegal, &Board::new(3).unwrap(), Mark::X, k(3, 3), 9, &mut rng).unwrap();
        assert_eq!(result.winner, Some(Mark::X));
        assert!(!result.reached_depth_cap);
    }

    #[test]
    fn test_simulate_depth_cap_uses_near_win_scores() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let b = board("X..../...../...../...../.....");
        // Zero plies: X has no near-wins with K=4, so it is a draw
        let result = simulate(&FirstLegal, &b, Mark::O, k(4, 5), 0, &mut rng).unwrap();
        assert!(result.reached_depth_cap);
        assert_eq!(result.winner, None);

        let b = board("XXX../...../O..../O..../.....");
        let result = simulate(&FirstLegal, &b, Mark::O, k(4, 5), 0, &mut rng).unwrap();
        assert!(result.reached_depth_cap);
        assert_eq!(result.winner, Some(Mark::X));
    }

    #[test]
    fn test_simulate_rejects_illegal_policy_move() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let result = simulate(&Cheater, &board("X../.../..."), Mark::O, k(3, 3), 9, &mut rng);
        assert!(matches!(result, Err(PlayoutError::IllegalMove(0))));
    }

    #[test]
    fn test_simulate_is_deterministic_for_seed() {
        let policy = HeuristicPolicy::new();
        let b = Board::new(5).unwrap();
        let run = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            (0..20)
                .map(|_| simulate(&policy, &b, Mark::X, k(4, 5), 25, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
