//! Reading and writing settings documents.
//!
//! Every read hands back a [`Revision`] fingerprint of the bytes it saw so the
//! executor can tell when somebody else rewrote the file in the meantime.

use crate::error::{NotFound, TerminoError};
use crate::model::SettingsModel;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// SHA-256 of a document's raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A parsed document plus the revision it was parsed from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub model: SettingsModel,
    pub revision: Revision,
}

pub trait SettingsReader: Send + Sync {
    /// Load and parse the document at `path`.
    fn read(&self, path: &Path) -> Result<LoadedSettings, TerminoError>;

    /// Fingerprint of what is stored right now; `None` if nothing is.
    fn revision(&self, path: &Path) -> Result<Option<Revision>, TerminoError>;
}

pub trait SettingsWriter: Send + Sync {
    /// Persist `model` and return the revision that was written.
    fn write(&self, path: &Path, model: &SettingsModel) -> Result<Revision, TerminoError>;
}

/// Anything that can both read and write documents.
pub trait SettingsStore: SettingsReader + SettingsWriter {}

impl<T: SettingsReader + SettingsWriter> SettingsStore for T {}

fn parse_loaded(text: &str) -> Result<LoadedSettings, TerminoError> {
    Ok(LoadedSettings {
        model: SettingsModel::from_json_str(text)?,
        revision: Revision::of(text.as_bytes()),
    })
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Store backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSettingsStore;

impl SettingsReader for FileSettingsStore {
    fn read(&self, path: &Path) -> Result<LoadedSettings, TerminoError> {
        let text = fs::read_to_string(path).map_err(|e| missing_or_io(path, e))?;
        debug!(path = %path.display(), bytes = text.len(), "read settings");
        parse_loaded(&text)
    }

    fn revision(&self, path: &Path) -> Result<Option<Revision>, TerminoError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(Revision::of(&bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsWriter for FileSettingsStore {
    fn write(&self, path: &Path, model: &SettingsModel) -> Result<Revision, TerminoError> {
        let text = model.to_json_string()?;
        // Write a sibling temp file first so a crash never leaves a
        // truncated settings file behind.
        let tmp_path = temp_path_for(path);
        let replaced = write_synced(&tmp_path, text.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, path));
        if let Err(e) = replaced {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = text.len(), "wrote settings");
        Ok(Revision::of(text.as_bytes()))
    }
}

/// Data must be on disk before the rename can make it visible.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "settings.json".into());
    name.push(".termino.tmp");
    path.with_file_name(name)
}

fn missing_or_io(path: &Path, e: std::io::Error) -> TerminoError {
    if e.kind() == std::io::ErrorKind::NotFound {
        NotFound::SettingsFile(path.display().to_string()).into()
    } else {
        e.into()
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store that keeps documents in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    documents: Mutex<HashMap<PathBuf, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw document text at `path`, replacing whatever was there.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
    }

    /// Raw text currently stored at `path`.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

impl SettingsReader for MemorySettingsStore {
    fn read(&self, path: &Path) -> Result<LoadedSettings, TerminoError> {
        let text = self
            .contents(path)
            .ok_or_else(|| NotFound::SettingsFile(path.display().to_string()))?;
        parse_loaded(&text)
    }

    fn revision(&self, path: &Path) -> Result<Option<Revision>, TerminoError> {
        Ok(self.contents(path).map(|text| Revision::of(text.as_bytes())))
    }
}

impl SettingsWriter for MemorySettingsStore {
    fn write(&self, path: &Path, model: &SettingsModel) -> Result<Revision, TerminoError> {
        let text = model.to_json_string()?;
        let revision = Revision::of(text.as_bytes());
        self.insert(path, text);
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::model::ColorField;
    use crate::testsupport::{TestTempDir, SAMPLE_SETTINGS};

    #[test]
    fn revision_is_sha256_hex() {
        assert_eq!(
            Revision::of(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn file_store_round_trips_without_changes() {
        let dir = TestTempDir::new("store-roundtrip");
        let path = dir.write_text("settings.json", SAMPLE_SETTINGS);
        let store = FileSettingsStore;

        let loaded = store.read(&path).expect("read");
        let written = store.write(&path, &loaded.model).expect("write");
        assert_eq!(written, loaded.revision);
        assert_eq!(fs::read_to_string(&path).expect("reread"), SAMPLE_SETTINGS);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn failed_replace_keeps_original_and_removes_temp_file() {
        let dir = TestTempDir::new("store-failed-replace");
        let path = dir.write_text("settings.json", SAMPLE_SETTINGS);
        let mut loaded = FileSettingsStore.read(&path).expect("read");
        loaded
            .model
            .profile_mut(0)
            .expect("profile")
            .set_color(ColorField::TabColor, Some(Color::rgb(1, 2, 3)));

        // The temp file cannot be created where a directory already sits.
        let tmp_path = temp_path_for(&path);
        fs::create_dir(&tmp_path).expect("block temp path");
        assert!(FileSettingsStore.write(&path, &loaded.model).is_err());
        assert_eq!(fs::read_to_string(&path).expect("reread"), SAMPLE_SETTINGS);
        fs::remove_dir(&tmp_path).expect("unblock temp path");

        // The rename cannot replace a directory; the synced temp file is cleaned up.
        let target = dir.child("as-dir.json");
        fs::create_dir(&target).expect("dir target");
        assert!(FileSettingsStore.write(&target, &loaded.model).is_err());
        assert!(!temp_path_for(&target).exists());
        assert!(target.is_dir());
    }

    #[test]
    fn file_store_missing_file_is_not_found() {
        let dir = TestTempDir::new("store-missing");
        let err = FileSettingsStore
            .read(&dir.child("settings.json"))
            .expect_err("missing");
        assert!(matches!(err, TerminoError::NotFound(NotFound::SettingsFile(_))));
        assert_eq!(
            FileSettingsStore
                .revision(&dir.child("settings.json"))
                .expect("revision"),
            None
        );
    }

    #[test]
    fn file_store_bad_json_is_parse_error() {
        let dir = TestTempDir::new("store-bad");
        let path = dir.write_text("settings.json", "{ not json");
        let err = FileSettingsStore.read(&path).expect_err("bad json");
        assert!(matches!(err, TerminoError::Parse(_)));
    }

    #[test]
    fn memory_store_tracks_revisions() {
        let store = MemorySettingsStore::new();
        let path = Path::new("mem/settings.json");
        store.insert(path, SAMPLE_SETTINGS);
        let loaded = store.read(path).expect("read");
        assert_eq!(store.revision(path).expect("rev"), Some(loaded.revision.clone()));

        store.insert(path, "{}");
        assert_ne!(store.revision(path).expect("rev"), Some(loaded.revision));
    }
}
