//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the NROW_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("NROW_CONFIG") {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from NROW_CONFIG: {}", path.display());
            return load_from_path(path);
        }
        warn!(
            "NROW_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path, falling back to defaults when
/// the file cannot be read or parsed.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Parse a TOML value literal such as `[[3, 3], [4, 3]]`.
fn parse_toml_value<T: DeserializeOwned>(raw: &str) -> Option<T> {
    #[derive(Deserialize)]
    struct Wrapper<T> {
        value: T,
    }

    toml::from_str::<Wrapper<T>>(&format!("value = {raw}"))
        .map(|w| w.value)
        .map_err(|e| warn!("Ignoring unparsable override {:?}: {}", raw, e))
        .ok()
}

macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
    // Structured field written as a TOML literal
    ($config:expr, $section:ident . $field:ident, $key:expr, toml) => {
        if let Some(v) = std::env::var($key).ok().and_then(|s| parse_toml_value(&s)) {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: NROW_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "NROW_COMMON_LOG_LEVEL");

    // Rules
    env_override!(config, rules.win_lengths, "NROW_RULES_WIN_LENGTHS", toml);

    // Search
    env_override!(config, search.value_update, "NROW_SEARCH_VALUE_UPDATE");
    env_override!(
        config,
        search.learning_rate,
        "NROW_SEARCH_LEARNING_RATE",
        parse
    );
    env_override!(
        config,
        search.heuristic_probability,
        "NROW_SEARCH_HEURISTIC_PROBABILITY",
        parse
    );
    env_override!(config, search.top_moves, "NROW_SEARCH_TOP_MOVES", parse);
    env_override!(config, search.block_bonus, "NROW_SEARCH_BLOCK_BONUS", parse);
    env_override!(
        config,
        search.center_radius,
        "NROW_SEARCH_CENTER_RADIUS",
        parse
    );
    env_override!(
        config,
        search.max_playout_depth,
        "NROW_SEARCH_MAX_PLAYOUT_DEPTH",
        parse
    );
    env_override!(
        config,
        search.visit_bonus_divisor,
        "NROW_SEARCH_VISIT_BONUS_DIVISOR",
        parse
    );
    env_override!(
        config,
        search.exploration,
        "NROW_SEARCH_EXPLORATION",
        optional_parse
    );
    env_override!(
        config,
        search.time_budget_ms,
        "NROW_SEARCH_TIME_BUDGET_MS",
        optional_parse
    );
    env_override!(
        config,
        search.iterations,
        "NROW_SEARCH_ITERATIONS",
        optional_parse
    );

    config
}
