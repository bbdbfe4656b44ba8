//! Binary-local application orchestration.
//!
//! `main.rs` only parses arguments; this module wires config, logging, the
//! dispatcher and the renderer together and hosts one handler per
//! sub-command.

pub(crate) mod commands;
pub(crate) mod entry;
pub(crate) mod startup;
