//! Configuration data model.
//!
//! Every section deserializes with defaults so a partial (or empty)
//! `termino.toml` is always valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dispatch::RunMode;
use crate::locator::InstallKind;

/// Default loopback address the daemon listens on.
pub const DEFAULT_DAEMON_ADDRESS: &str = "127.0.0.1:47310";
/// Default per-request timeout for forwarding commands to the daemon.
pub const DEFAULT_DAEMON_TIMEOUT_SECS: u64 = 10;
/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: SettingsConfig,
    pub run: RunConfig,
    pub daemon: DaemonConfig,
    pub log: LogConfig,
    pub display: DisplayConfig,
}

/// Which settings document to operate on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub install: InstallKind,
    /// Explicit document path; also the last candidate when probing.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub mode: RunMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// `host:port` the daemon binds and clients connect to.
    pub address: String,
    pub timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_DAEMON_ADDRESS.to_string(),
            timeout_secs: DEFAULT_DAEMON_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `termino=debug`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Where the loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given with `--config`.
    Explicit(PathBuf),
    /// `./termino.toml`.
    Local,
    /// `$XDG_CONFIG_HOME/termino/termino.toml`.
    Global(PathBuf),
    /// No file found.
    BuiltInDefaults,
}

/// Config plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}
