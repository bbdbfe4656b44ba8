//! Where Windows Terminal keeps `settings.json` for each kind of install.
//!
//! Paths follow <https://learn.microsoft.com/en-us/windows/terminal/install>.
//! The locator is a plain value so callers (and tests) decide which local app
//! data directory and hint path it works from.

use crate::error::{NotFound, TerminoError, ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STABLE_PACKAGE: &str = "Microsoft.WindowsTerminal_8wekyb3d8bbwe";
const PREVIEW_PACKAGE: &str = "Microsoft.WindowsTerminalPreview_8wekyb3d8bbwe";

/// Kind of Windows Terminal installation, as named in config and on the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InstallKind {
    Stable,
    Preview,
    Unpackaged,
    /// Use the configured path verbatim.
    Explicit,
    /// Try stable, preview, unpackaged, then the configured path.
    #[default]
    Probe,
}

/// Resolved install flavor with its explicit path where needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallFlavor {
    Stable,
    Preview,
    Unpackaged,
    Explicit(PathBuf),
    Probe,
}

impl InstallFlavor {
    /// Combine a configured kind with an optional path.
    ///
    /// A path given together with `Stable`/`Preview`/`Unpackaged` is ignored;
    /// `Probe` uses it as its last candidate via the locator's hint.
    pub fn from_kind(kind: InstallKind, path: Option<&Path>) -> Result<Self, ValidationError> {
        Ok(match kind {
            InstallKind::Stable => Self::Stable,
            InstallKind::Preview => Self::Preview,
            InstallKind::Unpackaged => Self::Unpackaged,
            InstallKind::Probe => Self::Probe,
            InstallKind::Explicit => match path {
                Some(path) => Self::Explicit(path.to_path_buf()),
                None => {
                    return Err(ValidationError::new(
                        "settings",
                        "",
                        ValidationErrorKind::MissingOption,
                    ))
                }
            },
        })
    }
}

/// Resolves settings file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLocator {
    local_app_data: Option<PathBuf>,
    hint: Option<PathBuf>,
}

impl SettingsLocator {
    pub fn new(local_app_data: Option<PathBuf>, hint: Option<PathBuf>) -> Self {
        Self {
            local_app_data,
            hint,
        }
    }

    /// Locator for this machine: `%LOCALAPPDATA%`, else the platform's local
    /// data directory.
    pub fn from_env(hint: Option<PathBuf>) -> Self {
        let local_app_data = std::env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .or_else(dirs::data_local_dir);
        Self::new(local_app_data, hint)
    }

    /// Path a flavor points at, without checking that it exists.
    ///
    /// `Probe` has no single path; use [`SettingsLocator::locate`].
    pub fn candidate(&self, flavor: &InstallFlavor) -> Option<PathBuf> {
        let base = self.local_app_data.as_deref();
        match flavor {
            InstallFlavor::Stable => base.map(|b| packaged_path(b, STABLE_PACKAGE)),
            InstallFlavor::Preview => base.map(|b| packaged_path(b, PREVIEW_PACKAGE)),
            InstallFlavor::Unpackaged => base.map(|b| {
                b.join("Microsoft")
                    .join("Windows Terminal")
                    .join("settings.json")
            }),
            InstallFlavor::Explicit(path) => Some(path.clone()),
            InstallFlavor::Probe => None,
        }
    }

    /// Resolve `flavor` to a path that exists on disk.
    pub fn locate(&self, flavor: &InstallFlavor) -> Result<PathBuf, TerminoError> {
        self.locate_with(flavor, Path::exists)
    }

    /// [`SettingsLocator::locate`] with an injectable existence check.
    pub fn locate_with<F>(&self, flavor: &InstallFlavor, exists: F) -> Result<PathBuf, TerminoError>
    where
        F: Fn(&Path) -> bool,
    {
        let candidates = match flavor {
            InstallFlavor::Probe => {
                let mut ordered = [
                    InstallFlavor::Stable,
                    InstallFlavor::Preview,
                    InstallFlavor::Unpackaged,
                ]
                .iter()
                .filter_map(|f| self.candidate(f))
                .collect::<Vec<_>>();
                ordered.extend(self.hint.clone());
                ordered
            }
            other => self.candidate(other).into_iter().collect(),
        };

        if let Some(found) = candidates.iter().find(|path| exists(path)) {
            return Ok(found.clone());
        }
        let tried = if candidates.is_empty() {
            "no candidate paths; LOCALAPPDATA is not set".to_string()
        } else {
            candidates
                .iter()
                .map(|p| format!("`{}`", p.display()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        Err(NotFound::Installation(tried).into())
    }
}

fn packaged_path(base: &Path, package: &str) -> PathBuf {
    base.join("Packages")
        .join(package)
        .join("LocalState")
        .join("settings.json")
}
