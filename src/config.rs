use crate::catalog::DEFAULT_HEADER_MARKERS;
use crate::normalize::DEFAULT_PROTECTED_MARKERS;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "scan-relocate.toml";
pub const ENV_PREFIX: &str = "SCAN_RELOCATE";

/// Main configuration structure for scan-relocate
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanRelocateConfig {
    /// Reference table location and format
    pub table: TableConfig,
    /// Code normalization rules
    pub normalization: NormalizationConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Operator display settings
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableConfig {
    /// Path of the semicolon-separated reference table
    pub path: PathBuf,
    /// Field delimiter, a single ASCII character
    pub delimiter: String,
    /// Case-insensitive fragments that mark header rows in the source column
    pub header_markers: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("locations.csv"),
            delimiter: ";".to_string(),
            header_markers: DEFAULT_HEADER_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Collapse a doubled leading letter (`AA-1...` to `A-1...`)
    pub collapse_doubled_prefix: bool,
    /// Codes containing any of these are never rewritten
    pub protected_markers: Vec<String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            collapse_doubled_prefix: true,
            protected_markers: DEFAULT_PROTECTED_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, overridden by RUST_LOG
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of completed moves listed by `:history` and in the summary
    pub recent_history: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { recent_history: 5 }
    }
}

impl ScanRelocateConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration file (`scan-relocate.toml` in the working directory)
    /// 3. Environment variables (`SCAN_RELOCATE__TABLE__PATH`, ...)
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`load`](Self::load) but reads `path` instead of the default
    /// file; an explicit path must exist.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(path, environment())
    }

    fn load_layers(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }

        builder = builder.add_source(env);

        let config = builder.build().context("Failed to read configuration")?;
        let scan_config: ScanRelocateConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(scan_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists; `true` when one was loaded
    pub fn load_env_file() -> Result<bool> {
        if !Path::new(".env").exists() {
            return Ok(false);
        }
        dotenvy::dotenv()?;
        Ok(true)
    }
}

/// `SCAN_RELOCATE__SECTION__KEY` variables. List settings take
/// comma-separated values.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("normalization.protected_markers")
        .with_list_parse_key("table.header_markers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ScanRelocateConfig::default();

        assert_eq!(config.table.path, PathBuf::from("locations.csv"));
        assert_eq!(config.table.delimiter, ";");
        assert!(config.normalization.collapse_doubled_prefix);
        assert_eq!(config.normalization.protected_markers.len(), 3);
        assert_eq!(config.display.recent_history, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[table]\npath = \"moves.csv\"\n\n[normalization]\ncollapse_doubled_prefix = false\n",
        )
        .unwrap();

        let config = ScanRelocateConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.table.path, PathBuf::from("moves.csv"));
        assert_eq!(config.table.delimiter, ";");
        assert!(!config.normalization.collapse_doubled_prefix);
        assert_eq!(config.observability.log_level, "warn");
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = ScanRelocateConfig::default();
        config.display.recent_history = 12;
        config.normalization.protected_markers = vec!["QUAI".to_string()];

        config.save_to_file(&path).unwrap();
        let loaded = ScanRelocateConfig::load_from(Some(&path)).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_list_settings_from_environment() {
        let vars = [
            ("SCAN_RELOCATE__NORMALIZATION__PROTECTED_MARKERS", "QUAI,DELTA"),
            ("SCAN_RELOCATE__TABLE__HEADER_MARKERS", "ancien"),
            ("SCAN_RELOCATE__DISPLAY__RECENT_HISTORY", "8"),
        ];
        let env = environment().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));

        let config = ScanRelocateConfig::load_layers(None, env).unwrap();

        assert_eq!(
            config.normalization.protected_markers,
            vec!["QUAI".to_string(), "DELTA".to_string()]
        );
        assert_eq!(config.table.header_markers, vec!["ancien".to_string()]);
        assert_eq!(config.display.recent_history, 8);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ScanRelocateConfig::load_from(Some(&dir.path().join("absent.toml")));

        assert!(result.is_err());
    }
}
