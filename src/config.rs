//! Build configuration from `photostatic.toml`.
//!
//! The config file lives at the content root and is entirely optional —
//! stock defaults build a correct site. CLI flags override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "photostatic.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse {CONFIG_FILENAME}: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Maximum number of parallel asset workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub jobs: Option<usize>,
    /// Default to fast mode (single symlinked native-width variant).
    pub fast: bool,
}

impl BuildConfig {
    /// Load `photostatic.toml` from the content root; defaults if absent.
    pub fn load(content_dir: &Path) -> Result<Self, ConfigError> {
        let path = content_dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&text)?)
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &BuildConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.jobs.map(|n| n.min(cores).max(1)).unwrap_or(cores)
}

/// A documented stock config, printed by `photostatic gen-config`.
pub fn stock_config_toml() -> String {
    "\
# photostatic configuration. All values are optional.

# Maximum number of parallel asset workers.
# Defaults to the number of CPU cores; larger values are clamped down.
#jobs = 4

# Fast mode: skip srcset re-encoding, symlink one native-width variant.
# For quick iteration only; published sites should build without it.
#fast = false
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = BuildConfig::load(tmp.path()).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "jobs = 2\nfast = true\n").unwrap();
        let config = BuildConfig::load(tmp.path()).unwrap();
        assert_eq!(config.jobs, Some(2));
        assert!(config.fast);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "job = 2\n").unwrap();
        assert!(matches!(
            BuildConfig::load(tmp.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let config = BuildConfig {
            jobs: Some(usize::MAX),
            fast: false,
        };
        let cores = std::thread::available_parallelism().unwrap().get();
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_constrains_down() {
        let config = BuildConfig {
            jobs: Some(1),
            fast: false,
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn stock_config_parses_as_defaults() {
        let uncommented = stock_config_toml()
            .lines()
            .map(|l| l.strip_prefix('#').filter(|s| s.contains('=')).unwrap_or(l))
            .collect::<Vec<_>>()
            .join("\n");
        let config: BuildConfig = toml::from_str(&uncommented).unwrap();
        assert_eq!(config.jobs, Some(4));
        assert!(!config.fast);
    }
}
