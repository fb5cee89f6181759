//! MCTS configuration parameters and board-size schedules.

use std::str::FromStr;
use std::time::Duration;

/// Iteration budget per board size. Sizes not listed use [`DEFAULT_ITERATIONS`].
pub const ITERATIONS_BY_SIZE: &[(usize, u32)] = &[(3, 2000), (4, 3000), (5, 4000), (6, 8000)];

pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Boards of at least this size run a reduced share of their iterations.
const ITERATION_SCALE_FROM_SIZE: usize = 4;
const ITERATION_SCALE: f64 = 0.9;

/// Iteration budget a caller should request for a board size.
pub fn default_iterations(size: usize) -> u32 {
    ITERATIONS_BY_SIZE
        .iter()
        .find(|&&(n, _)| n == size)
        .map_or(DEFAULT_ITERATIONS, |&(_, iterations)| iterations)
}

/// Upper bound on iterations actually run for a board size.
pub fn size_scaled_iterations(size: usize) -> u32 {
    let base = default_iterations(size);
    if size >= ITERATION_SCALE_FROM_SIZE {
        (base as f64 * ITERATION_SCALE).floor() as u32
    } else {
        base
    }
}

/// Wall-clock budget for one search.
pub fn time_budget_for_size(size: usize) -> Duration {
    let millis = match size {
        0..=3 => 2000,
        4 => 2500,
        5 => 3000,
        _ => 3500,
    };
    Duration::from_millis(millis)
}

/// UCT exploration constant `c`.
pub fn exploration_for_size(size: usize) -> f64 {
    match size {
        0..=3 => 1.414,
        4 => 1.5,
        _ => 1.6,
    }
}

/// How backpropagation folds a playout outcome into a node's accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ValueUpdate {
    /// `value_sum += outcome`; the mean stays within `[0, 1]`.
    #[default]
    RunningMean,

    /// `value = (1 - rate) * value + rate * outcome * visits`.
    ///
    /// Kept for parity with older engines. The accumulator grows with the
    /// visit count instead of averaging.
    LegacyExponential { learning_rate: f64 },
}

impl ValueUpdate {
    pub const LEGACY_LEARNING_RATE: f64 = 0.1;

    pub fn legacy() -> Self {
        Self::LegacyExponential {
            learning_rate: Self::LEGACY_LEARNING_RATE,
        }
    }

    /// New accumulator value. `visits` already includes this update.
    #[inline]
    pub fn apply(self, accumulator: f64, visits: u32, outcome: f64) -> f64 {
        match self {
            ValueUpdate::RunningMean => accumulator + outcome,
            ValueUpdate::LegacyExponential { learning_rate } => {
                (1.0 - learning_rate) * accumulator + learning_rate * outcome * visits as f64
            }
        }
    }
}

impl FromStr for ValueUpdate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running_mean" => Ok(ValueUpdate::RunningMean),
            "legacy_exponential" => Ok(ValueUpdate::legacy()),
            other => Err(format!(
                "unknown value update '{other}', expected running_mean or legacy_exponential"
            )),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant `c` in the UCT formula.
    pub exploration: f64,

    /// Maximum number of select/expand/playout/backpropagate iterations.
    pub max_iterations: u32,

    /// Wall-clock budget, checked between iterations.
    pub time_budget: Duration,

    /// Playout depth cap; the effective cap is `min(this, N²)`.
    pub max_playout_depth: usize,

    pub value_update: ValueUpdate,

    /// Final move choice scores children by `mean + ln(visits) / divisor`.
    pub visit_bonus_divisor: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self::for_board_size(3)
    }
}

impl MctsConfig {
    pub const MAX_PLAYOUT_DEPTH: usize = 30;
    pub const VISIT_BONUS_DIVISOR: f64 = 10.0;

    /// Size-scaled exploration, iteration cap and time budget.
    pub fn for_board_size(size: usize) -> Self {
        Self {
            exploration: exploration_for_size(size),
            max_iterations: size_scaled_iterations(size),
            time_budget: time_budget_for_size(size),
            max_playout_depth: Self::MAX_PLAYOUT_DEPTH,
            value_update: ValueUpdate::RunningMean,
            visit_bonus_divisor: Self::VISIT_BONUS_DIVISOR,
        }
    }

    /// Create a fast config for testing. The time budget is generous so that
    /// the iteration cap decides when to stop.
    pub fn for_testing() -> Self {
        Self::for_board_size(3)
            .with_iterations(200)
            .with_time_budget(Duration::from_secs(30))
    }

    /// Builder pattern: set the iteration cap.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Builder pattern: set the playout depth cap.
    pub fn with_playout_depth(mut self, depth: usize) -> Self {
        self.max_playout_depth = depth;
        self
    }

    /// Builder pattern: set the value update rule.
    pub fn with_value_update(mut self, update: ValueUpdate) -> Self {
        self.value_update = update;
        self
    }

    /// Builder pattern: set the final-selection visit divisor.
    pub fn with_visit_bonus_divisor(mut self, divisor: f64) -> Self {
        self.visit_bonus_divisor = divisor;
        self
    }

    /// Check that the tuning values give meaningful scores.
    pub fn validate(&self) -> Result<(), String> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(format!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }
        if !self.visit_bonus_divisor.is_finite() || self.visit_bonus_divisor <= 0.0 {
            return Err(format!(
                "visit_bonus_divisor must be positive, got {}",
                self.visit_bonus_divisor
            ));
        }
        if let ValueUpdate::LegacyExponential { learning_rate } = self.value_update {
            if !(learning_rate > 0.0 && learning_rate <= 1.0) {
                return Err(format!(
                    "learning_rate must be in (0, 1], got {learning_rate}"
                ));
            }
        }
        Ok(())
    }

    /// Effective playout depth on a board of side `size`.
    pub fn playout_depth(&self, size: usize) -> usize {
        self.max_playout_depth.min(size.saturating_mul(size))
    }
}
