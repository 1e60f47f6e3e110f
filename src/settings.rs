//! Persisted settings for fetchbar.
//!
//! Reads and writes `~/.fetchbar/settings.toml`. Each field is independent
//! and updates happen through read-modify-write helpers so the file is the
//! single source of truth between accesses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Timer period used when no interval is stored or the stored value is
/// zero or negative.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 60;

/// The three persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL to fetch. Stored verbatim, never validated at save time.
    pub fetch_url: Option<String>,
    /// Refresh interval in seconds. Stored as entered, may be non-positive.
    pub refresh_interval: Option<i64>,
    /// Whether the app is registered as a login item.
    pub launch_at_login: bool,
}

impl Settings {
    /// The configured URL, treating empty or whitespace-only strings as unset.
    pub fn url(&self) -> Option<&str> {
        self.fetch_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The timer period in seconds: the stored value when positive,
    /// otherwise [`DEFAULT_REFRESH_INTERVAL`].
    pub fn effective_interval(&self) -> u64 {
        match self.refresh_interval {
            Some(secs) if secs > 0 => secs as u64,
            _ => DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Parse settings from a TOML string.
    ///
    /// Missing fields use their defaults due to `#[serde(default)]`.
    pub fn from_toml(toml_str: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(toml_str)?;
        Ok(settings)
    }
}

/// Parse user input from the refresh-interval prompt.
///
/// Returns the entered integer (surrounding whitespace allowed), or `None`
/// when the input is not a plain integer — in which case settings and timer
/// must stay unchanged.
pub fn parse_interval_input(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// File-backed settings store with an explicit path so tests can point it
/// at a temporary directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location: `~/.fetchbar/settings.toml`.
    pub fn at_default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::new(home.join(".fetchbar").join("settings.toml")))
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk.
    ///
    /// - Missing file returns defaults.
    /// - Unreadable file or invalid TOML logs a warning and returns defaults.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => Settings::from_toml(&contents).unwrap_or_else(|e| {
                eprintln!(
                    "[fetchbar] Warning: Invalid TOML in {}: {}, using default settings",
                    self.path.display(),
                    e
                );
                Settings::default()
            }),
            Err(e) => {
                eprintln!(
                    "[fetchbar] Warning: Could not read {}: {}, using default settings",
                    self.path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    /// Write settings atomically (temp file + rename).
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let toml_str = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        let temp_path = self.path.with_extension("toml.tmp");

        fs::write(&temp_path, &toml_str)
            .with_context(|| format!("Failed to write temp file: {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename temp file to {:?}", self.path))?;

        Ok(())
    }

    /// Persist a new fetch URL verbatim.
    pub fn set_url(&self, url: &str) -> Result<Settings> {
        let mut settings = self.load();
        settings.fetch_url = Some(url.to_string());
        self.save(&settings)?;
        Ok(settings)
    }

    /// Persist a new refresh interval as entered.
    pub fn set_refresh_interval(&self, secs: i64) -> Result<Settings> {
        let mut settings = self.load();
        settings.refresh_interval = Some(secs);
        self.save(&settings)?;
        Ok(settings)
    }

    /// Persist the launch-at-login flag.
    pub fn set_launch_at_login(&self, enabled: bool) -> Result<Settings> {
        let mut settings = self.load();
        settings.launch_at_login = enabled;
        self.save(&settings)?;
        Ok(settings)
    }
}
