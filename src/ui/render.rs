//! Rendering contract consumed by the command handlers.

use crate::color::Color;

use super::Renderer;

/// Injectable rendering interface.
///
/// `Renderer` is the terminal implementation; tests substitute a recording
/// sink so handlers can be checked without touching stdout or stderr.
pub trait RenderSink: Send + Sync {
    /// Heading for one profile in `get` output (stdout).
    fn section(&self, title: &str);
    /// One plain key/value row (stdout).
    fn field(&self, key: &str, value: &str);
    /// One color row with a swatch; `None` renders as unset (stdout).
    fn color_field(&self, key: &str, color: Option<Color>);
    /// Progress/result line for a command (stderr).
    fn activity(&self, text: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

impl RenderSink for Renderer {
    fn section(&self, title: &str) {
        self.section(title);
    }

    fn field(&self, key: &str, value: &str) {
        self.field(key, value);
    }

    fn color_field(&self, key: &str, color: Option<Color>) {
        self.color_field(key, color);
    }

    fn activity(&self, text: &str) {
        self.activity(text);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }
}
