//! Process-wide hydration settings.
//!
//! Settings are read when a schema is built: codecs capture the values they
//! need, so install configuration before the first entity kind is used.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::datetime;
use crate::error::CastResult;

static CONFIG: OnceLock<HydrationConfig> = OnceLock::new();

/// Tunables for the value codecs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationConfig {
    /// Date/time strings that mean "no value" and cast to `null`.
    #[serde(default = "default_sentinels")]
    pub datetime_sentinels: Vec<String>,
    /// Typed date/times at or before this Unix timestamp count as sentinels.
    #[serde(default = "default_sentinel_max_timestamp")]
    pub sentinel_max_timestamp: i64,
    /// Whether full date-time output carries the `.uuuuuu` fraction.
    #[serde(default = "default_microseconds")]
    pub datetime_microseconds: bool,
}

fn default_sentinels() -> Vec<String> {
    [
        datetime::DEFAULT_TIMESTAMP,
        datetime::DEFAULT_TIMESTAMP_MICRO,
        datetime::DEFAULT_DATETIME,
        datetime::DEFAULT_DATETIME_MICRO,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

const fn default_sentinel_max_timestamp() -> i64 {
    1
}

const fn default_microseconds() -> bool {
    true
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            datetime_sentinels: default_sentinels(),
            sentinel_max_timestamp: default_sentinel_max_timestamp(),
            datetime_microseconds: default_microseconds(),
        }
    }
}

impl HydrationConfig {
    /// Parses settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> CastResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads settings from a TOML file.
    pub fn load_from(path: &Path) -> CastResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reads settings from a TOML file, falling back to defaults with a
    /// warning when the file is missing or malformed.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "No hydration config found, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load hydration config, using defaults");
                Self::default()
            }
        }
    }

    /// True when `text` is one of the configured sentinel strings.
    #[must_use]
    pub fn is_sentinel(&self, text: &str) -> bool {
        self.datetime_sentinels.iter().any(|s| s == text)
    }
}

/// Installs the process-wide settings.
///
/// Returns `false` (and keeps the existing settings) when settings were
/// already installed or already read by a schema build.
pub fn install(config: HydrationConfig) -> bool {
    let installed = CONFIG.set(config).is_ok();
    if !installed {
        warn!("Hydration config already initialized, ignoring install");
    }
    installed
}

/// Returns the installed settings, or the defaults.
pub fn current() -> &'static HydrationConfig {
    CONFIG.get_or_init(HydrationConfig::default)
}
