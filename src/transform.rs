//! Applying commands to a settings model.
//!
//! [`apply`] is pure: it never touches the input model and returns the new
//! model together with the command that reverses the change.

use crate::color::Color;
use crate::command::{Command, CommandInfo};
use crate::error::{NotFound, TerminoError, ValidationError, ValidationErrorKind};
use crate::model::{ColorField, ProfileSelector, SettingsModel};

/// Result of a successful [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub model: SettingsModel,
    /// Applying this to `model` gives back the original model.
    pub inverse: Command,
}

/// Apply `command` to `model`.
///
/// `Undo` is rejected: it works on history, not on the document.
pub fn apply(model: &SettingsModel, command: &Command) -> Result<Applied, TerminoError> {
    let mut next = model.clone();
    let inverse = apply_in_place(&mut next, command)?;
    Ok(Applied {
        model: next,
        inverse,
    })
}

/// Mutate `model`, returning the inverse. On error `model` may be partially
/// changed; [`apply`] only ever calls this on a scratch copy.
fn apply_in_place(model: &mut SettingsModel, command: &Command) -> Result<Command, TerminoError> {
    match command {
        Command::SetTabColor {
            info,
            selector,
            color,
        } => set_color(model, ColorField::TabColor, info, selector, *color),
        Command::SetForegroundColor {
            info,
            selector,
            color,
        } => set_color(model, ColorField::Foreground, info, selector, *color),
        Command::SetBackgroundColor {
            info,
            selector,
            color,
        } => set_color(model, ColorField::Background, info, selector, *color),
        Command::Composite { info, children } => {
            let mut inverses = Vec::with_capacity(children.len());
            for child in children {
                inverses.push(apply_in_place(model, child)?);
            }
            inverses.reverse();
            Ok(Command::composite(info.clone(), inverses))
        }
        Command::Undo { count, .. } => Err(ValidationError::new(
            command.name(),
            count.to_string(),
            ValidationErrorKind::NotTransformable,
        )
        .into()),
    }
}

fn set_color(
    model: &mut SettingsModel,
    field: ColorField,
    info: &CommandInfo,
    selector: &ProfileSelector,
    color: Option<Color>,
) -> Result<Command, TerminoError> {
    let position = selector.resolve(model)?;
    let profile = model
        .profile_mut(position)
        .ok_or_else(|| NotFound::Profile(selector.to_string()))?;
    let prior = profile.set_color(field, color);
    Ok(Command::set_color(field, info.clone(), selector.clone(), prior))
}
