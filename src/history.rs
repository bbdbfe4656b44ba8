//! Undo history for commands applied in this process.

use crate::command::Command;
use crate::error::TerminoError;
use chrono::{DateTime, Utc};

/// A command that was applied, when, and how to reverse it.
///
/// Created only at the moment a command is applied successfully and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandExecution {
    command: Command,
    inverse: Command,
    executed_at: DateTime<Utc>,
}

impl CommandExecution {
    pub(crate) fn new(command: Command, inverse: Command) -> Self {
        Self {
            command,
            inverse,
            executed_at: Utc::now(),
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Command computed at apply time that reverses this execution.
    pub fn inverse(&self) -> &Command {
        &self.inverse
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }
}

/// LIFO stack of executions; the top is the most recent undoable command.
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<CommandExecution>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, execution: CommandExecution) {
        self.entries.push(execution);
    }

    /// Remove the most recent execution.
    pub fn pop(&mut self) -> Result<CommandExecution, TerminoError> {
        self.entries.pop().ok_or(TerminoError::EmptyStack)
    }

    /// Remove every execution, most recent first.
    pub fn pop_all(&mut self) -> Vec<CommandExecution> {
        let mut all = std::mem::take(&mut self.entries);
        all.reverse();
        all
    }

    /// Take up to `count` executions off the top, most recent first.
    ///
    /// Reads the whole stack once and pushes back what was not taken.
    pub fn take(&mut self, count: usize) -> Vec<CommandExecution> {
        let mut taken = self.pop_all();
        let remainder = taken.split_off(count.min(taken.len()));
        for execution in remainder.into_iter().rev() {
            self.push(execution);
        }
        taken
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Executions from most recent to oldest, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &CommandExecution> {
        self.entries.iter().rev()
    }
}
