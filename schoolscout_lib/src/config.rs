//! Runtime settings and credentials.
//!
//! Settings come from an optional TOML file, then environment overrides. The
//! API key is read once from the environment and handed to the API client.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ScoutError;
use crate::filter::{FilterConfig, DEFAULT_SALARY_CUTOFF, DEFAULT_SAT_CUTOFF};

/// Settings file picked up from the working directory when present.
pub const SETTINGS_FILE: &str = "schoolscout.toml";

/// Environment variable holding the Scorecard API key.
pub const API_KEY_VAR: &str = "SCORECARD_API_KEY";

/// Tunables for a run. Every field has a default, so a partial file is fine.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub per_page: u32,
    pub cache_dir: PathBuf,
    pub salary_cutoff: f64,
    pub sat_cutoff: f64,
    pub exclude_online_only: bool,
    pub require_main_campus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: scorecard_api::DEFAULT_BASE_URL.to_string(),
            per_page: scorecard_api::DEFAULT_PER_PAGE,
            cache_dir: PathBuf::from("cache"),
            salary_cutoff: DEFAULT_SALARY_CUTOFF,
            sat_cutoff: DEFAULT_SAT_CUTOFF,
            exclude_online_only: true,
            require_main_campus: true,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from [`SETTINGS_FILE`] if it exists,
    /// then applies environment overrides.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ScoutError> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(SETTINGS_FILE).exists() => Self::from_file(Path::new(SETTINGS_FILE))?,
            None => Self::default(),
        };
        Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ScoutError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
            .map_err(|e| ScoutError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ScoutError> {
        toml::from_str(contents).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Applies `SCHOOLSCOUT_*` overrides from `lookup`. Unparseable values are
    /// ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("SCORECARD_BASE_URL") {
            self.base_url = url;
        }
        if let Some(dir) = lookup("SCHOOLSCOUT_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(per_page) = parse_env(&lookup, "SCHOOLSCOUT_PER_PAGE") {
            self.per_page = per_page;
        }
        if let Some(cutoff) = parse_env(&lookup, "SCHOOLSCOUT_SALARY_CUTOFF") {
            self.salary_cutoff = cutoff;
        }
        if let Some(cutoff) = parse_env(&lookup, "SCHOOLSCOUT_SAT_CUTOFF") {
            self.sat_cutoff = cutoff;
        }
        self
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            salary_cutoff: self.salary_cutoff,
            sat_cutoff: self.sat_cutoff,
            exclude_online_only: self.exclude_online_only,
            require_main_campus: self.require_main_campus,
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse {:?}", key, raw);
            None
        }
    }
}

/// Scorecard API key. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: &str) -> Result<Self, ScoutError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ScoutError::Config("API key is empty".to_string()));
        }
        Ok(Self(key.to_string()))
    }

    /// Reads the key from [`API_KEY_VAR`].
    pub fn from_env() -> Result<Self, ScoutError> {
        let key = std::env::var(API_KEY_VAR)
            .map_err(|_| ScoutError::Config(format!("{} is not set", API_KEY_VAR)))?;
        Self::new(&key)
    }

    /// Reads the key as the whole contents of a file.
    pub fn from_file(path: &Path) -> Result<Self, ScoutError> {
        let key = std::fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::new(&key)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
