//! Server configuration from `rowi.toml` and command-line flags.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section.rs   # [serve] [content] [watch] [live] [git] [history]
//! ├── error.rs     # ConfigError
//! └── mod.rs       # WikiConfig (this file)
//! ```
//!
//! The file is optional. Flags given on the command line win over the
//! file, which wins over the built-in defaults.

mod error;
mod section;

pub use error::ConfigError;
pub use section::{
    ContentConfig, GitConfig, HistoryConfig, LiveConfig, ServeConfig, WatchConfig,
};

use crate::{cli::Cli, log, utils::path::normalize_path};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rowi.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Absolute path to the config file, if one was read (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub live: LiveConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl WikiConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.is_file() {
            let mut config = Self::from_path(&cli.config)?;
            config.config_path = Some(normalize_path(&cli.config));
            config
        } else {
            crate::debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.apply_cli(cli);
        config.content.docroot = Self::expand_docroot(&config.content.docroot);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("config"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Overlay command-line flags onto the file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(listen) = cli.listen {
            self.serve.listen = listen;
        }
        if let Some(prefix) = &cli.prefix {
            self.serve.prefix = prefix.clone();
        }
        if let Some(port) = cli.ws_port {
            self.serve.ws_port = port;
        }
        if let Some(docroot) = &cli.docroot {
            self.content.docroot = docroot.clone();
        }
        if cli.no_watch {
            self.watch.enable = false;
        }
    }

    /// Expand `~` and make the docroot absolute.
    fn expand_docroot(path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::tilde(&raw);
        normalize_path(Path::new(expanded.as_ref()))
    }

    /// Check value ranges the rest of the server relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.serve.prefix;
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ConfigError::invalid("serve.prefix", "must start with `/`"));
        }
        if prefix.ends_with('/') {
            return Err(ConfigError::invalid(
                "serve.prefix",
                "must not end with `/` (use \"\" for the root)",
            ));
        }

        for (field, value) in [
            ("watch.tick_ms", self.watch.tick_ms),
            ("watch.quiet_ms", self.watch.quiet_ms),
            ("live.heartbeat_ms", self.live.heartbeat_ms),
            ("live.probe_timeout_ms", self.live.probe_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }

        if self.history.per_page == 0 {
            return Err(ConfigError::invalid("history.per_page", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Parse a config snippet for tests.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> WikiConfig {
    let (parsed, ignored) = WikiConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
