//! Reversible mutation commands.
//!
//! Every mutation termino can perform is one variant of [`Command`]. The enum
//! doubles as the daemon wire format (internally tagged JSON, `"kind"` picks
//! the variant):
//!
//! ```json
//! {"kind":"set-tab-color","info":{"name":"tabColor","description":"Sets the tab color"},
//!  "selector":{"by":"by-name","value":"PowerShell"},"color":"#FF0000"}
//! {"kind":"undo","info":{"name":"undo","description":"..."},"count":2}
//! ```

use crate::color::Color;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::model::{ColorField, ProfileSelector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    /// Symbolic identifier, usually the originating option name.
    pub name: String,
    pub description: String,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One reversible mutation intent.
///
/// Set-color variants carry `Option<Color>`: `None` removes the key from the
/// profile, which is how the inverse of setting a previously absent color
/// restores the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Command {
    SetTabColor {
        info: CommandInfo,
        selector: ProfileSelector,
        color: Option<Color>,
    },
    SetForegroundColor {
        info: CommandInfo,
        selector: ProfileSelector,
        color: Option<Color>,
    },
    SetBackgroundColor {
        info: CommandInfo,
        selector: ProfileSelector,
        color: Option<Color>,
    },
    Undo {
        info: CommandInfo,
        count: usize,
    },
    /// Children run in order as one unit and unwind in reverse.
    Composite {
        info: CommandInfo,
        children: Vec<Command>,
    },
}

pub const UNDO_DESCRIPTION: &str =
    "Undoes the previous N commands. If N is not specified, only the most recent command is undone.";

impl Command {
    /// Build the set-color variant for `field`.
    pub fn set_color(
        field: ColorField,
        info: CommandInfo,
        selector: ProfileSelector,
        color: Option<Color>,
    ) -> Self {
        match field {
            ColorField::TabColor => Self::SetTabColor {
                info,
                selector,
                color,
            },
            ColorField::Foreground => Self::SetForegroundColor {
                info,
                selector,
                color,
            },
            ColorField::Background => Self::SetBackgroundColor {
                info,
                selector,
                color,
            },
        }
    }

    /// Undo the last `count` commands; `count` must be at least one.
    pub fn undo(count: usize) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::new(
                "undo",
                count.to_string(),
                ValidationErrorKind::InvalidCount,
            ));
        }
        Ok(Self::Undo {
            info: CommandInfo::new("undo", UNDO_DESCRIPTION),
            count,
        })
    }

    pub fn composite(info: CommandInfo, children: Vec<Command>) -> Self {
        Self::Composite { info, children }
    }

    pub fn info(&self) -> &CommandInfo {
        match self {
            Self::SetTabColor { info, .. }
            | Self::SetForegroundColor { info, .. }
            | Self::SetBackgroundColor { info, .. }
            | Self::Undo { info, .. }
            | Self::Composite { info, .. } => info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn description(&self) -> &str {
        &self.info().description
    }

    /// Everything except `Undo` itself lands on the undo stack.
    pub fn undoable(&self) -> bool {
        !matches!(self, Self::Undo { .. })
    }

    /// Field, selector and color of a set-color variant.
    pub fn as_set_color(&self) -> Option<(ColorField, &ProfileSelector, Option<Color>)> {
        match self {
            Self::SetTabColor {
                selector, color, ..
            } => Some((ColorField::TabColor, selector, *color)),
            Self::SetForegroundColor {
                selector, color, ..
            } => Some((ColorField::Foreground, selector, *color)),
            Self::SetBackgroundColor {
                selector, color, ..
            } => Some((ColorField::Background, selector, *color)),
            Self::Undo { .. } | Self::Composite { .. } => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((field, selector, color)) = self.as_set_color() {
            return match color {
                Some(color) => write!(f, "set {field} of {selector} to {color}"),
                None => write!(f, "clear {field} of {selector}"),
            };
        }
        match self {
            Self::Undo { count, .. } if *count == 1 => write!(f, "undo 1 command"),
            Self::Undo { count, .. } => write!(f, "undo {count} commands"),
            Self::Composite { children, .. } => {
                let parts = children.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", parts.join(", "))
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Producer helpers
// ---------------------------------------------------------------------------

/// Raw, unvalidated color options from one `set` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRequest {
    pub tab_color: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// Help text for each color option; also used as command descriptions.
pub fn option_description(field: ColorField) -> &'static str {
    match field {
        ColorField::TabColor => "Sets the tab color",
        ColorField::Background => "Sets the background color of the window or pane",
        ColorField::Foreground => "Sets foreground color of the window or pane",
    }
}

impl ColorRequest {
    /// Requested options in submission order: tab color, background, foreground.
    fn entries(&self) -> impl Iterator<Item = (ColorField, &str)> {
        [
            (ColorField::TabColor, self.tab_color.as_deref()),
            (ColorField::Background, self.background.as_deref()),
            (ColorField::Foreground, self.foreground.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, raw)| raw.map(|raw| (field, raw)))
    }

    /// Validate each option independently.
    ///
    /// Fails only when no option was given at all; otherwise every option
    /// yields its own command or its own validation error so one bad color
    /// does not sink its siblings.
    pub fn into_commands(
        &self,
        selector: &ProfileSelector,
    ) -> Result<Vec<Result<Command, ValidationError>>, ValidationError> {
        let commands = self
            .entries()
            .map(|(field, raw)| {
                let color = Color::parse(field.key(), raw)?;
                Ok(Command::set_color(
                    field,
                    CommandInfo::new(field.key(), option_description(field)),
                    selector.clone(),
                    Some(color),
                ))
            })
            .collect::<Vec<_>>();
        if commands.is_empty() {
            return Err(ValidationError::new(
                "set",
                "",
                ValidationErrorKind::MissingOption,
            ));
        }
        Ok(commands)
    }
}
