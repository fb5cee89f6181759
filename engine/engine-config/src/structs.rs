//! Configuration struct definitions.

use crate::defaults;
use serde::Deserialize;

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_win_lengths() -> Vec<(usize, usize)> {
    defaults::win_lengths().to_vec()
}
fn d_value_update() -> String {
    defaults::value_update().into()
}
fn d_learning_rate() -> f64 {
    defaults::learning_rate()
}
fn d_heuristic_probability() -> f64 {
    defaults::heuristic_probability()
}
fn d_top_moves() -> usize {
    defaults::top_moves()
}
fn d_block_bonus() -> i32 {
    defaults::block_bonus()
}
fn d_center_radius() -> i32 {
    defaults::center_radius()
}
fn d_max_playout_depth() -> usize {
    defaults::max_playout_depth()
}
fn d_visit_bonus_divisor() -> f64 {
    defaults::visit_bonus_divisor()
}

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Game rules
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RulesConfig {
    /// `[board size, win length]` pairs
    #[serde(default = "d_win_lengths")]
    pub win_lengths: Vec<(usize, usize)>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            win_lengths: defaults::win_lengths().to_vec(),
        }
    }
}

/// Move search tuning.
///
/// `exploration`, `time_budget_ms` and `iterations` replace the
/// board-size tables when set.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_value_update")]
    pub value_update: String,
    #[serde(default = "d_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "d_heuristic_probability")]
    pub heuristic_probability: f64,
    #[serde(default = "d_top_moves")]
    pub top_moves: usize,
    #[serde(default = "d_block_bonus")]
    pub block_bonus: i32,
    #[serde(default = "d_center_radius")]
    pub center_radius: i32,
    #[serde(default = "d_max_playout_depth")]
    pub max_playout_depth: usize,
    #[serde(default = "d_visit_bonus_divisor")]
    pub visit_bonus_divisor: f64,
    #[serde(default)]
    pub exploration: Option<f64>,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    #[serde(default)]
    pub iterations: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            value_update: defaults::value_update().into(),
            learning_rate: defaults::learning_rate(),
            heuristic_probability: defaults::heuristic_probability(),
            top_moves: defaults::top_moves(),
            block_bonus: defaults::block_bonus(),
            center_radius: defaults::center_radius(),
            max_playout_depth: defaults::max_playout_depth(),
            visit_bonus_divisor: defaults::visit_bonus_divisor(),
            exploration: None,
            time_budget_ms: None,
            iterations: None,
        }
    }
}
