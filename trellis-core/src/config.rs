//! Runtime Configuration
//!
//! Process-wide settings for the reactive runtime. Defaults are sensible for
//! applications; tests and embedders can load overrides from JSON.
//!
//! ```rust,ignore
//! let config = Config::from_json(r#"{ "max_reaction_reruns": 8 }"#)?;
//! trellis_core::set_config(config);
//! ```

use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings consulted by the reactive runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many extra passes a reaction may make when it is re-triggered
    /// while already running (for example by writing a signal it reads).
    pub max_reaction_reruns: usize,

    /// Log a warning when a reaction is created with no owner to dispose it.
    pub warn_detached_reactions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_reaction_reruns: 64,
            warn_detached_reactions: true,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

fn global() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default()))
}

/// Get a snapshot of the current settings.
pub fn config() -> Config {
    global().read().clone()
}

/// Replace the current settings.
pub fn set_config(config: Config) {
    *global().write() = config;
}
