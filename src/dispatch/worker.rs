//! In-process execution against one settings document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::Completion;
use crate::command::Command;
use crate::error::{TerminoError, ValidationError, ValidationErrorKind};
use crate::history::{CommandExecution, UndoStack};
use crate::store::{LoadedSettings, SettingsStore};
use crate::transform;

/// Applies commands to the document at `path` and keeps their undo history.
///
/// The document is read on first use and then kept in memory; every applied
/// command is written back straight away. Before each write the on-disk
/// revision is compared with the last one seen, so edits made by anyone else
/// surface as [`TerminoError::Concurrency`] instead of being overwritten.
pub struct InProcessExecutor {
    path: PathBuf,
    store: Arc<dyn SettingsStore>,
    current: Option<LoadedSettings>,
    history: UndoStack,
}

impl InProcessExecutor {
    pub fn new(path: impl Into<PathBuf>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            path: path.into(),
            store,
            current: None,
            history: UndoStack::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Run one command to completion.
    pub fn execute(&mut self, command: &Command) -> Result<Completion, TerminoError> {
        if let Command::Undo { count, .. } = command {
            return self.undo(*count);
        }
        let inverse = self.commit(command)?;
        let execution = CommandExecution::new(command.clone(), inverse);
        let executed_at = execution.executed_at();
        self.history.push(execution);
        Ok(Completion::Applied { executed_at })
    }

    /// Reverse up to `count` executions, persisting after each one.
    ///
    /// An empty history is not an error. If reversing one execution fails it
    /// and everything older stay on the stack.
    fn undo(&mut self, count: usize) -> Result<Completion, TerminoError> {
        if count == 0 {
            return Err(ValidationError::new("undo", "0", ValidationErrorKind::InvalidCount).into());
        }
        let mut pending = self.history.take(count).into_iter();
        let mut undone = 0;
        while let Some(execution) = pending.next() {
            if let Err(err) = self.commit(execution.inverse()) {
                let rest = std::iter::once(execution).chain(pending).collect::<Vec<_>>();
                for execution in rest.into_iter().rev() {
                    self.history.push(execution);
                }
                return Err(err);
            }
            debug!(command = %execution.command(), "undone");
            undone += 1;
        }
        if undone == 0 {
            info!("undo requested with empty history");
        }
        Ok(Completion::Undone {
            requested: count,
            undone,
        })
    }

    /// Apply, check for outside edits, write. Returns the inverse.
    fn commit(&mut self, command: &Command) -> Result<Command, TerminoError> {
        let loaded = match self.current.take() {
            Some(loaded) => loaded,
            None => self.store.read(&self.path)?,
        };
        match self.apply_and_write(&loaded, command) {
            Ok((next, inverse)) => {
                self.current = Some(next);
                Ok(inverse)
            }
            Err(err) => {
                self.current = Some(loaded);
                Err(err)
            }
        }
    }

    fn apply_and_write(
        &self,
        loaded: &LoadedSettings,
        command: &Command,
    ) -> Result<(LoadedSettings, Command), TerminoError> {
        let applied = transform::apply(&loaded.model, command)?;
        match self.store.revision(&self.path)? {
            Some(on_disk) if on_disk == loaded.revision => {}
            Some(_) => {
                return Err(TerminoError::Concurrency(format!(
                    "`{}` was modified by another program",
                    self.path.display()
                )))
            }
            None => {
                return Err(TerminoError::Concurrency(format!(
                    "`{}` was removed by another program",
                    self.path.display()
                )))
            }
        }
        let revision = self.store.write(&self.path, &applied.model)?;
        debug!(path = %self.path.display(), command = %command, "persisted");
        Ok((
            LoadedSettings {
                model: applied.model,
                revision,
            },
            applied.inverse,
        ))
    }
}
