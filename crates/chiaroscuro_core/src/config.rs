//! Board configuration.
//!
//! # Responsibility
//! - Hold layout metrics used by connector geometry.
//! - Hold undo depth, autosave cadence and the durable blob key.
//! - Load overrides from an optional TOML file.
//!
//! # Invariants
//! - Every field has a default; a missing file yields `BoardConfig::default()`.
//! - A loaded config is validated before it is returned.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default key of the durable snapshot blob.
pub const DEFAULT_STORAGE_KEY: &str = "chiaroscuro-data";
pub const DEFAULT_UNDO_DEPTH: usize = 50;
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Layout metrics of the board frame, in board units (pixels in a GUI host).
///
/// The plot column spans `[0, plot_width)`, the divider spans
/// `[plot_width, plot_width + divider_width)`, and the subtext column starts
/// right after the divider. All three share the same vertical origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub plot_width: f64,
    pub divider_width: f64,
    pub note_width: f64,
    pub note_padding: f64,
    pub line_height: f64,
    /// Characters that fit on one wrapped line of note text.
    pub chars_per_line: usize,
    /// Minimum visible text rows of an empty note.
    pub min_lines: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            plot_width: 600.0,
            divider_width: 40.0,
            note_width: 200.0,
            note_padding: 8.0,
            line_height: 18.0,
            chars_per_line: 26,
            min_lines: 2,
        }
    }
}

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub layout: LayoutConfig,
    /// Maximum number of deletions kept for undo.
    pub undo_depth: usize,
    pub autosave_interval_secs: u64,
    /// Key of the durable blob holding the latest snapshot.
    pub storage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses and validates a TOML config document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads config from `path`, falling back to defaults when it is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_depth == 0 {
            return Err(ConfigError::Invalid("undo_depth must be > 0".to_string()));
        }
        if self.autosave_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "autosave_interval_secs must be > 0".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be blank".to_string(),
            ));
        }
        let layout = &self.layout;
        for (name, value) in [
            ("layout.plot_width", layout.plot_width),
            ("layout.divider_width", layout.divider_width),
            ("layout.note_width", layout.note_width),
            ("layout.line_height", layout.line_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0")));
            }
        }
        if !(layout.note_padding.is_finite() && layout.note_padding >= 0.0) {
            return Err(ConfigError::Invalid(
                "layout.note_padding must be >= 0".to_string(),
            ));
        }
        if layout.chars_per_line == 0 {
            return Err(ConfigError::Invalid(
                "layout.chars_per_line must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
