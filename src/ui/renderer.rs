//! Crossterm-backed terminal renderer.

use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;

const INDENT: &str = "  ";
const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const GLYPH_BULLET: &str = "•";
const SWATCH: &str = "    ";
const UNSET: &str = "(unset)";

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn section(&self, title: &str) {
        if self.color {
            println!("{} {}", GLYPH_BULLET.with(TermColor::DarkGrey), title.bold());
        } else {
            println!("{title}:");
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            println!(
                "{INDENT}{} {value}",
                format!("{key}:").with(TermColor::DarkCyan)
            );
        } else {
            println!("{}", plain_field(key, value));
        }
    }

    pub fn color_field(&self, key: &str, color: Option<Color>) {
        match (self.color, color) {
            (true, Some(color)) => println!(
                "{INDENT}{} {} {color}",
                format!("{key}:").with(TermColor::DarkCyan),
                SWATCH.on(term_color(color))
            ),
            (true, None) => println!(
                "{INDENT}{} {}",
                format!("{key}:").with(TermColor::DarkCyan),
                UNSET.with(TermColor::DarkGrey)
            ),
            (false, _) => println!("{}", plain_color_field(key, color)),
        }
    }

    /// Status line on stderr.
    pub fn activity(&self, text: &str) {
        if self.color {
            eprintln!("{} {}", GLYPH_BULLET.with(TermColor::DarkGrey), text.with(TermColor::Grey));
        } else {
            eprintln!("{text}");
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(TermColor::Yellow).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(TermColor::Red).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }
}

fn plain_field(key: &str, value: &str) -> String {
    format!("{INDENT}{key}: {value}")
}

fn plain_color_field(key: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => plain_field(key, &color.to_hex()),
        None => plain_field(key, UNSET),
    }
}
