//! Configuration loading from `termino.toml` and environment variables.
//!
//! Precedence (highest wins):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables (`TERMINO_SETTINGS_PATH`, `TERMINO_INSTALL`,
//!    `TERMINO_RUN_MODE`, `TERMINO_DAEMON_ADDR`)
//! 3. TOML file given with `--config`
//! 4. `./termino.toml`
//! 5. `$XDG_CONFIG_HOME/termino/termino.toml` (or the platform equivalent)
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod env;
mod sources;
mod types;

pub use types::{
    Config, ConfigSource, DaemonConfig, DisplayConfig, LoadedConfig, LogConfig, RunConfig,
    SettingsConfig, DEFAULT_DAEMON_ADDRESS, DEFAULT_DAEMON_TIMEOUT_SECS, DEFAULT_LOG_FILTER,
};

/// Load configuration from disk and environment.
pub fn load_config(path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        dirs::config_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) =
        sources::read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    env::apply_env_overrides(&mut config, &env_lookup)?;
    if config.daemon.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "daemon.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RunMode;
    use crate::locator::InstallKind;
    use std::collections::HashMap;

    fn files(entries: &[(&str, &str)]) -> impl Fn(&Path) -> Result<String, std::io::Error> {
        let map = entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect::<HashMap<_, _>>();
        move |path: &Path| {
            map.get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn root() -> Option<PathBuf> {
        Some(PathBuf::from("/home/u/.config"))
    }

    #[test]
    fn empty_sources_use_defaults() {
        let loaded = load_config_from_sources(None, files(&[]), no_env, root).expect("defaults");
        assert_eq!(loaded.source, ConfigSource::BuiltInDefaults);
        assert_eq!(loaded.config, Config::default());
        assert_eq!(loaded.config.settings.install, InstallKind::Probe);
        assert_eq!(loaded.config.run.mode, RunMode::InProcess);
        assert_eq!(loaded.config.daemon.address, DEFAULT_DAEMON_ADDRESS);
    }

    #[test]
    fn local_file_beats_global_file() {
        let loaded = load_config_from_sources(
            None,
            files(&[
                ("termino.toml", "[run]\nmode = \"out-of-process\"\n"),
                ("/home/u/.config/termino/termino.toml", "[run]\nmode = \"in-process\"\n"),
            ]),
            no_env,
            root,
        )
        .expect("load");
        assert_eq!(loaded.source, ConfigSource::Local);
        assert_eq!(loaded.config.run.mode, RunMode::OutOfProcess);
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let loaded = load_config_from_sources(
            None,
            files(&[(
                "/home/u/.config/termino/termino.toml",
                "[settings]\ninstall = \"preview\"\n[display]\ncolor = false\n",
            )]),
            no_env,
            root,
        )
        .expect("load");
        assert_eq!(
            loaded.source,
            ConfigSource::Global(PathBuf::from("/home/u/.config/termino/termino.toml"))
        );
        assert_eq!(loaded.config.settings.install, InstallKind::Preview);
        assert!(!loaded.config.display.color);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from_sources(
            Some(Path::new("/nope/termino.toml")),
            files(&[]),
            no_env,
            root,
        )
        .expect_err("missing explicit file");
        assert!(err.to_string().starts_with("io:"), "got: {err}");
    }

    #[test]
    fn env_overrides_file_values() {
        let env = |name: &str| match name {
            "TERMINO_RUN_MODE" => Some("OUT_OF_PROCESS".to_string()),
            "TERMINO_SETTINGS_PATH" => Some("/tmp/settings.json".to_string()),
            "TERMINO_INSTALL" => Some("explicit".to_string()),
            "TERMINO_DAEMON_ADDR" => Some("127.0.0.1:9000".to_string()),
            _ => None,
        };
        let loaded = load_config_from_sources(
            None,
            files(&[("termino.toml", "[run]\nmode = \"in-process\"\n")]),
            env,
            root,
        )
        .expect("load");
        assert_eq!(loaded.config.run.mode, RunMode::OutOfProcess);
        assert_eq!(loaded.config.settings.install, InstallKind::Explicit);
        assert_eq!(
            loaded.config.settings.path,
            Some(PathBuf::from("/tmp/settings.json"))
        );
        assert_eq!(loaded.config.daemon.address, "127.0.0.1:9000");
    }

    #[test]
    fn invalid_env_value_is_reported() {
        let env = |name: &str| (name == "TERMINO_RUN_MODE").then(|| "sideways".to_string());
        let err = load_config_from_sources(None, files(&[]), env, root).expect_err("bad mode");
        assert_eq!(err.to_string(), "invalid config: invalid TERMINO_RUN_MODE value `sideways`");
    }

    #[test]
    fn unknown_keys_and_zero_timeout_are_rejected() {
        let err = load_config_from_sources(
            None,
            files(&[("termino.toml", "[run]\nspeed = 3\n")]),
            no_env,
            root,
        )
        .expect_err("unknown key");
        assert!(err.to_string().starts_with("toml:"), "got: {err}");

        let err = load_config_from_sources(
            None,
            files(&[("termino.toml", "[daemon]\ntimeout_secs = 0\n")]),
            no_env,
            root,
        )
        .expect_err("zero timeout");
        assert!(err.to_string().contains("timeout_secs"));
    }
}
