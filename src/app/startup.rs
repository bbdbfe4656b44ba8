//! Config overrides, logging and collaborator construction.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use termino::config::{Config, DEFAULT_LOG_FILTER};
use termino::dispatch::{Dispatcher, InProcessExecutor, RunMode, TcpRemoteExecutor};
use termino::error::TerminoError;
use termino::locator::{InstallFlavor, InstallKind, SettingsLocator};
use termino::store::FileSettingsStore;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

/// Environment variable holding a `tracing` filter; wins over `[log].filter`.
const LOG_ENV: &str = "TERMINO_LOG";

/// Apply CLI flags on top of file and environment config.
pub(crate) fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(mode) = args.mode {
        config.run.mode = mode;
    }
    if let Some(path) = &args.settings {
        config.settings.path = Some(path.clone());
        if args.install.is_none() {
            config.settings.install = InstallKind::Explicit;
        }
    }
    if let Some(install) = args.install {
        config.settings.install = install;
    }
    if args.no_color {
        config.display.color = false;
    }
}

/// Send `tracing` output to stderr, filtered by `TERMINO_LOG` or config.
pub(crate) fn init_tracing(config_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Locate the settings document the config points at.
pub(crate) fn settings_path(config: &Config) -> Result<PathBuf, TerminoError> {
    let flavor = InstallFlavor::from_kind(config.settings.install, config.settings.path.as_deref())?;
    SettingsLocator::from_env(config.settings.path.clone()).locate(&flavor)
}

/// Dispatcher for the configured run mode.
pub(crate) fn build_dispatcher(config: &Config) -> Result<Dispatcher, TerminoError> {
    match config.run.mode {
        RunMode::InProcess => {
            let path = settings_path(config)?;
            Ok(Dispatcher::in_process(InProcessExecutor::new(
                path,
                Arc::new(FileSettingsStore),
            )))
        }
        RunMode::OutOfProcess => Ok(Dispatcher::out_of_process(Arc::new(
            TcpRemoteExecutor::new(
                config.daemon.address.clone(),
                Duration::from_secs(config.daemon.timeout_secs),
            ),
        ))),
    }
}
