//! Environment overrides.
//!
//! `TERMINO_*` variables override whatever the config file said; CLI flags
//! are applied later by the binary and win over both.

use std::path::PathBuf;

use crate::dispatch::RunMode;
use crate::error::ConfigError;
use crate::locator::InstallKind;

use super::Config;

pub(super) fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(path) = non_empty(env_lookup, "TERMINO_SETTINGS_PATH") {
        config.settings.path = Some(PathBuf::from(path));
    }
    if let Some(install) = non_empty(env_lookup, "TERMINO_INSTALL") {
        config.settings.install = parse_kebab::<InstallKind>("TERMINO_INSTALL", &install)?;
    }
    if let Some(mode) = non_empty(env_lookup, "TERMINO_RUN_MODE") {
        config.run.mode = parse_kebab::<RunMode>("TERMINO_RUN_MODE", &mode)?;
    }
    if let Some(address) = non_empty(env_lookup, "TERMINO_DAEMON_ADDR") {
        config.daemon.address = address;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse an enum the same way it is spelled in `termino.toml`.
fn parse_kebab<T: serde::de::DeserializeOwned>(name: &str, value: &str) -> Result<T, ConfigError> {
    let normalized = value.to_ascii_lowercase().replace('_', "-");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| ConfigError::Invalid(format!("invalid {name} value `{value}`")))
}
