//
//  options.rs
//  filedb
//
//  Created by the filedb team
//

//! Construction options for [`Storage`](super::Storage).

use tracing::{Dispatch, Level};

use crate::config::FileDbConfig;
use crate::error::Result;

/// Options accepted by [`Storage::open`](super::Storage::open).
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Where diagnostics go. Defaults to a console logger at INFO.
    pub logger: Option<Dispatch>,
    /// Take the collection lock in shared mode for `read` and `read_all`.
    pub consistent_reads: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send diagnostics to `logger` instead of the default console logger.
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Serialize readers against writers of the same collection.
    pub fn with_consistent_reads(mut self, enabled: bool) -> Self {
        self.consistent_reads = enabled;
        self
    }

    /// Build options from a loaded configuration file.
    pub fn from_config(config: &FileDbConfig) -> Result<Self> {
        Ok(Self {
            logger: Some(console_logger(config.log.level()?)),
            consistent_reads: config.store.consistent_reads,
        })
    }
}

/// A plain console logger filtered at `level`.
pub fn console_logger(level: Level) -> Dispatch {
    Dispatch::new(tracing_subscriber::fmt().with_max_level(level).finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = Options::new().with_consistent_reads(true);
        assert!(options.consistent_reads);
        assert!(options.logger.is_none());

        let options = options.with_logger(console_logger(Level::DEBUG));
        assert!(options.logger.is_some());
    }

    #[test]
    fn test_from_config() {
        let mut config = FileDbConfig::default();
        config.store.consistent_reads = true;
        let options = Options::from_config(&config).unwrap();
        assert!(options.consistent_reads);
        assert!(options.logger.is_some());

        config.log.level = "chatty".to_string();
        assert!(Options::from_config(&config).is_err());
    }
}
