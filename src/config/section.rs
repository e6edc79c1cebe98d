//! Configuration sections of `rowi.toml`.
//!
//! ```toml
//! [serve]
//! listen = "0.0.0.0:8000"   # HTTP address
//! prefix = ""               # mount every route under this path
//! ws_port = 35729           # live-update listener, retried upward when busy
//!
//! [content]
//! docroot = "~/notes/wiki"
//!
//! [watch]
//! enable = true
//! tick_ms = 5000            # how often pending changes are checked
//! quiet_ms = 100            # a burst ends after this much silence
//!
//! [live]
//! heartbeat_ms = 2000
//! probe_timeout_ms = 100
//!
//! [git]
//! program = "/usr/bin/git"
//!
//! [history]
//! per_page = 10
//! ```

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// `[serve]` HTTP and live-update listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServeConfig {
    pub listen: SocketAddr,
    pub prefix: String,
    pub ws_port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
            prefix: String::new(),
            ws_port: 35729,
        }
    }
}

/// `[content]` where the documents live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub docroot: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            docroot: PathBuf::from("./wiki"),
        }
    }
}

/// `[watch]` change detection timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    pub enable: bool,
    pub tick_ms: u64,
    pub quiet_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            tick_ms: 5000,
            quiet_ms: 100,
        }
    }
}

impl WatchConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn quiet(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

/// `[live]` session liveness probing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LiveConfig {
    pub heartbeat_ms: u64,
    pub probe_timeout_ms: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: 2000,
            probe_timeout_ms: 100,
        }
    }
}

impl LiveConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// `[git]` version-control tool location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    /// Explicit binary; looked up on `PATH` when unset.
    pub program: Option<PathBuf>,
}

impl GitConfig {
    /// The binary to spawn for git commands.
    pub fn program(&self) -> PathBuf {
        self.program
            .clone()
            .or_else(|| which::which("git").ok())
            .unwrap_or_else(|| PathBuf::from("git"))
    }
}

/// `[history]` commit browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub per_page: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { per_page: 10 }
    }
}
