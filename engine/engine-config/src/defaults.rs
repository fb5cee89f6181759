//! Default configuration values loaded from config.defaults.toml.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    rules: RulesDefaults,
    search: SearchDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct RulesDefaults {
    win_lengths: Vec<(usize, usize)>,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    value_update: String,
    learning_rate: f64,
    heuristic_probability: f64,
    top_moves: usize,
    block_bonus: i32,
    center_radius: i32,
    max_playout_depth: usize,
    visit_bonus_divisor: f64,
}

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Rules
pub fn win_lengths() -> &'static [(usize, usize)] {
    &DEFAULTS.rules.win_lengths
}

// Search
pub fn value_update() -> &'static str {
    &DEFAULTS.search.value_update
}
pub fn learning_rate() -> f64 {
    DEFAULTS.search.learning_rate
}
pub fn heuristic_probability() -> f64 {
    DEFAULTS.search.heuristic_probability
}
pub fn top_moves() -> usize {
    DEFAULTS.search.top_moves
}
pub fn block_bonus() -> i32 {
    DEFAULTS.search.block_bonus
}
pub fn center_radius() -> i32 {
    DEFAULTS.search.center_radius
}
pub fn max_playout_depth() -> usize {
    DEFAULTS.search.max_playout_depth
}
pub fn visit_bonus_divisor() -> f64 {
    DEFAULTS.search.visit_bonus_divisor
}
