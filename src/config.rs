//
//  config.rs
//  filedb
//
//  Created by the filedb team
//

//! Configuration file support (`filedb.toml`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::codec::Format;
use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "filedb.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDbConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where and how records are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base directory of the store.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Serialization format of record files.
    #[serde(default)]
    pub format: Format,
    /// Readers take the collection lock in shared mode.
    #[serde(default)]
    pub consistent_reads: bool,
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            format: Format::default(),
            consistent_reads: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LogConfig {
    /// Parsed log level.
    pub fn level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|_| Error::Config(format!("unknown log level '{}'", self.level)))
    }
}

impl FileDbConfig {
    /// Load config from a TOML file. A missing file yields the defaults;
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Config(format!("{}: {}", path.display(), e))),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.log.level()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = FileDbConfig::load(&dir.path().join("filedb.toml")).unwrap();
        assert_eq!(config.store.dir, PathBuf::from("./data"));
        assert_eq!(config.store.format, Format::Json);
        assert!(!config.store.consistent_reads);
        assert_eq!(config.log.level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filedb.toml");
        std::fs::write(&path, "[store]\nformat = \"yaml\"\n\n[log]\nlevel = \"debug\"\n").unwrap();

        let config = FileDbConfig::load(&path).unwrap();
        assert_eq!(config.store.format, Format::Yaml);
        assert_eq!(config.store.dir, PathBuf::from("./data"));
        assert_eq!(config.log.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filedb.toml");

        std::fs::write(&path, "[store\n").unwrap();
        assert!(matches!(FileDbConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "[log]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(FileDbConfig::load(&path), Err(Error::Config(_))));
    }
}
