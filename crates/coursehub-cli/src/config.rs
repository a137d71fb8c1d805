//! Configuration file management for coursehub.
//!
//! Provides a TOML-based config file at `~/.config/coursehub/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use coursehub_data::ReferenceTables;

/// Environment variable naming the dataset directory.
pub const DATA_DIR_ENV: &str = "COURSEHUB_DATA_DIR";

/// Environment variable naming the default output format.
pub const FORMAT_ENV: &str = "COURSEHUB_FORMAT";

// -----------------------------------------------------------------------
// Output format
// -----------------------------------------------------------------------

/// How command output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(OutputFormatParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`OutputFormat`] string.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid output format: {:?} (expected text or json)", self.0)
    }
}

impl std::error::Error for OutputFormatParseError {}

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataSection {
    /// Directory holding the three dataset files. Embedded data when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the coursehub config directory.
///
/// Always `$XDG_CONFIG_HOME/coursehub` or `~/.config/coursehub`, never the
/// platform directory `dirs::config_dir()` reports on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("coursehub");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("coursehub")
}

/// Return the path to the coursehub config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` means the embedded datasets.
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl AppConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `COURSEHUB_DATA_DIR` > `data.dir` > embedded
    /// - Format: `cli_format` > `COURSEHUB_FORMAT` > `output.format` > text
    pub fn resolve(cli_data_dir: Option<&Path>, cli_format: Option<OutputFormat>) -> Result<Self> {
        let file_config = load_config().ok();

        let data_dir = if let Some(dir) = cli_data_dir {
            Some(dir.to_path_buf())
        } else if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            Some(PathBuf::from(dir))
        } else if let Some(ref cfg) = file_config {
            cfg.data.dir.clone()
        } else {
            None
        };

        let format = if let Some(format) = cli_format {
            format
        } else if let Ok(raw) = std::env::var(FORMAT_ENV) {
            raw.parse::<OutputFormat>()
                .with_context(|| format!("{FORMAT_ENV} env var is not a valid format"))?
        } else if let Some(ref cfg) = file_config {
            cfg.output.format
        } else {
            OutputFormat::default()
        };

        Ok(Self { data_dir, format })
    }

    /// Load the reference datasets this configuration points at.
    pub fn load_reference(&self) -> Result<ReferenceTables> {
        match &self.data_dir {
            Some(dir) => ReferenceTables::from_dir(dir)
                .with_context(|| format!("failed to load datasets from {}", dir.display())),
            None => Ok(ReferenceTables::embedded()),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_data::ReferenceData;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point the config lookup at an empty temp dir and clear the coursehub
    /// env vars, run `f`, then restore everything.
    fn with_isolated_env<T>(f: impl FnOnce(&Path) -> T) -> T {
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        let orig_data = std::env::var(DATA_DIR_ENV).ok();
        let orig_format = std::env::var(FORMAT_ENV).ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        unsafe { std::env::remove_var(FORMAT_ENV) };

        let out = f(tmp.path());

        for (key, value) in [
            ("XDG_CONFIG_HOME", orig_xdg),
            (DATA_DIR_ENV, orig_data),
            (FORMAT_ENV, orig_format),
        ] {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
        out
    }

    #[test]
    fn output_format_round_trips_through_str() {
        for format in [OutputFormat::Text, OutputFormat::Json] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let loaded = with_isolated_env(|_| {
            let original = ConfigFile {
                data: DataSection {
                    dir: Some(PathBuf::from("/srv/coursehub/data")),
                },
                output: OutputSection {
                    format: OutputFormat::Json,
                },
            };
            save_config(&original)?;
            load_config()
        })
        .unwrap();

        assert_eq!(loaded.data.dir, Some(PathBuf::from("/srv/coursehub/data")));
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.data.dir.is_none());
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        let config = with_isolated_env(|_| AppConfig::resolve(None, None)).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let config = with_isolated_env(|_| {
            unsafe { std::env::set_var(DATA_DIR_ENV, "/from/env") };
            unsafe { std::env::set_var(FORMAT_ENV, "text") };
            AppConfig::resolve(Some(Path::new("/from/cli")), Some(OutputFormat::Json))
        })
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let config = with_isolated_env(|_| {
            save_config(&ConfigFile {
                data: DataSection {
                    dir: Some(PathBuf::from("/from/file")),
                },
                output: OutputSection {
                    format: OutputFormat::Text,
                },
            })?;
            unsafe { std::env::set_var(DATA_DIR_ENV, "/from/env") };
            unsafe { std::env::set_var(FORMAT_ENV, "json") };
            AppConfig::resolve(None, None)
        })
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn resolve_falls_back_to_config_file() {
        let _lock = lock_env();
        let config = with_isolated_env(|_| {
            save_config(&ConfigFile {
                data: DataSection {
                    dir: Some(PathBuf::from("/from/file")),
                },
                output: OutputSection {
                    format: OutputFormat::Json,
                },
            })?;
            AppConfig::resolve(None, None)
        })
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/from/file")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn resolve_rejects_bad_format_env() {
        let _lock = lock_env();
        let result = with_isolated_env(|_| {
            unsafe { std::env::set_var(FORMAT_ENV, "xml") };
            AppConfig::resolve(None, None)
        });
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains(FORMAT_ENV), "unexpected error: {msg}");
    }

    #[test]
    fn load_reference_reads_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        coursehub_test_utils::write_fixture_dir(tmp.path());
        let config = AppConfig {
            data_dir: Some(tmp.path().to_path_buf()),
            format: OutputFormat::Text,
        };
        let tables = config.load_reference().unwrap();
        assert_eq!(
            tables.core_requirements().len(),
            coursehub_test_utils::FIXTURE_CORE_COUNT
        );
    }

    #[test]
    fn load_reference_reports_missing_dir() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/definitely/not/here")),
            format: OutputFormat::Text,
        };
        let msg = format!("{:#}", config.load_reference().unwrap_err());
        assert!(msg.contains("/definitely/not/here"), "unexpected error: {msg}");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("coursehub/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
