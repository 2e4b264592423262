use crate::report::{DiskSpaceReportBuilder, DEFAULT_PLACEHOLDER, DEFAULT_TIMESTAMP_FORMAT};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `general.data_file`.
pub const ENV_DATA_FILE: &str = "INVTOP_DATA_FILE";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "INVTOP_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// JSON export of the DiskSpace table. Empty = not configured.
    pub data_file: String,
    /// Computer shown on startup, or "All Computers".
    pub default_selection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Color theme: default, dracula, gruvbox, nord
    pub theme: String,
    /// chrono format string for the "last updated" label
    pub timestamp_format: String,
    /// Shown where a value is not applicable (zero-sized drive, multi-machine timestamp)
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "invtop=debug"
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file:         String::new(),
            default_selection: crate::models::disk::ALL_COMPUTERS.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme:            "default".into(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.into(),
            placeholder:      DEFAULT_PLACEHOLDER.into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load the user config, apply environment overrides. Never fails:
    /// falls back to defaults (and writes them on first run).
    pub fn load() -> Self {
        let mut cfg = match Self::config_path().map(|p| try_load(&p)) {
            Some(Ok(c)) => c,
            _ => {
                // Write defaults on first run (best-effort)
                let _ = try_write_defaults();
                Config::default()
            }
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("invtop").join("invtop.toml"))
    }

    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(v) = lookup(ENV_DATA_FILE).filter(|v| !v.trim().is_empty()) {
            self.general.data_file = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.logging.level = v.trim().to_string();
        }
    }

    pub fn data_file(&self) -> Option<PathBuf> {
        let p = self.general.data_file.trim();
        if p.is_empty() { None } else { Some(PathBuf::from(p)) }
    }

    pub fn report_builder(&self) -> DiskSpaceReportBuilder {
        DiskSpaceReportBuilder::new(
            self.display.placeholder.clone(),
            self.display.timestamp_format.clone(),
        )
    }
}

fn try_load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&text)?;
    Ok(cfg)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# invtop configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invtop.toml");
        fs::write(&path, "[general]\ndata_file = \"/srv/inv/disk.json\"\n").unwrap();

        let cfg = try_load(&path).unwrap();
        assert_eq!(cfg.data_file(), Some(PathBuf::from("/srv/inv/disk.json")));
        assert_eq!(cfg.general.default_selection, "All Computers");
        assert_eq!(cfg.display.timestamp_format, "%d/%m-%Y %H:%M:%S");
        assert_eq!(cfg.display.placeholder, "N/A");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invtop.toml");
        fs::write(&path, "[general\n").unwrap();
        assert!(try_load(&path).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg: Config = toml::from_str(&text).unwrap();
        assert_eq!(cfg.display.theme, "default");
        assert!(cfg.data_file().is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.apply_env(|k| match k {
            ENV_DATA_FILE => Some(" /tmp/disk.json ".into()),
            ENV_LOG_LEVEL => Some("debug".into()),
            _             => None,
        });
        assert_eq!(cfg.data_file(), Some(PathBuf::from("/tmp/disk.json")));
        assert_eq!(cfg.logging.level, "debug");

        let mut cfg = Config::default();
        cfg.apply_env(|_| Some("   ".into()));
        assert!(cfg.data_file().is_none());
        assert_eq!(cfg.logging.level, "info");
    }
}
