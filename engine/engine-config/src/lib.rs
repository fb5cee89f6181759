//! Centralized configuration loading from config.toml.
//!
//! Settings are resolved with the following priority (highest to lowest):
//! 1. Environment variables (`NROW_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (`config.defaults.toml`, embedded at compile time)
//!
//! ```text
//! NROW_<SECTION>_<KEY>=value
//!
//! Examples:
//!     NROW_COMMON_LOG_LEVEL=debug
//!     NROW_SEARCH_VALUE_UPDATE=legacy_exponential
//!     NROW_SEARCH_TIME_BUDGET_MS=500
//!     NROW_RULES_WIN_LENGTHS="[[3, 3], [7, 5]]"
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
