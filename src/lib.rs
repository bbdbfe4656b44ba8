//! Termino: reversible, queued edits to Windows Terminal settings.
//!
//! Every change is a [`command::Command`]. [`transform::apply`] applies one
//! to a [`model::SettingsModel`] and hands back the command that reverses it;
//! [`dispatch::Dispatcher`] queues commands and runs them one at a time,
//! either against the local `settings.json` (recording an
//! [`history::UndoStack`]) or by forwarding them to a `termino daemon`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use termino::color::Color;
//! use termino::command::{Command, CommandInfo};
//! use termino::dispatch::{Dispatcher, InProcessExecutor};
//! use termino::model::{ColorField, ProfileSelector};
//! use termino::store::FileSettingsStore;
//!
//! # async fn example() -> Result<(), termino::error::TerminoError> {
//! let executor = InProcessExecutor::new("settings.json", Arc::new(FileSettingsStore));
//! let dispatcher = Dispatcher::in_process(executor);
//! let red = Color::parse("tabColor", "red")?;
//! let ticket = dispatcher.submit(Command::set_color(
//!     ColorField::TabColor,
//!     CommandInfo::new("tabColor", "Sets the tab color"),
//!     ProfileSelector::Default,
//!     Some(red),
//! ));
//! ticket.outcome().await?;
//! dispatcher.submit(Command::undo(1)?).outcome().await?;
//! dispatcher.close().await;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod command;
pub mod config;
pub mod daemon;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod locator;
pub mod model;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod transform;
pub mod ui;
