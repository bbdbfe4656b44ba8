//! In-memory model of a Windows Terminal settings document.
//!
//! The model only interprets what termino mutates: each profile's name, GUID
//! and three color slots. Everything else (global keys, `profiles.defaults`,
//! schemes, actions, unknown profile keys) is carried through untouched so a
//! read followed by a write reproduces the document.

mod document;
mod selector;

pub use document::{DocumentStyle, LineEnding};
pub use selector::ProfileSelector;

use crate::color::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the color slots a command can change on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorField {
    TabColor,
    Foreground,
    Background,
}

impl ColorField {
    pub const ALL: [ColorField; 3] = [Self::TabColor, Self::Foreground, Self::Background];

    /// JSON key inside a profile object.
    pub fn key(self) -> &'static str {
        match self {
            Self::TabColor => "tabColor",
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ColorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single profile entry.
///
/// `source` is the profile object exactly as it was read. Color slots are
/// mirrored into typed fields; anything not understood stays only in `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    name: Option<String>,
    guid: Option<String>,
    pub tab_color: Option<Color>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    source: Map<String, Value>,
}

impl Profile {
    /// Build a profile from its JSON object.
    pub fn from_object(source: Map<String, Value>) -> Self {
        let text = |key: &str| source.get(key).and_then(Value::as_str).map(str::to_string);
        let color = |field: ColorField| stored_color(&source, field);
        Self {
            name: text("name"),
            guid: text("guid"),
            tab_color: color(ColorField::TabColor),
            foreground: color(ColorField::Foreground),
            background: color(ColorField::Background),
            source,
        }
    }

    /// `name` as read; renaming is not a supported edit.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    /// Current value of a color slot.
    pub fn color(&self, field: ColorField) -> Option<Color> {
        match field {
            ColorField::TabColor => self.tab_color,
            ColorField::Foreground => self.foreground,
            ColorField::Background => self.background,
        }
    }

    /// Replace a color slot, returning the previous value.
    pub fn set_color(&mut self, field: ColorField, color: Option<Color>) -> Option<Color> {
        let slot = match field {
            ColorField::TabColor => &mut self.tab_color,
            ColorField::Foreground => &mut self.foreground,
            ColorField::Background => &mut self.background,
        };
        std::mem::replace(slot, color)
    }

    /// Keys of the profile object that the model does not interpret.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.source
            .keys()
            .map(String::as_str)
            .filter(|key| !matches!(*key, "name" | "guid" | "tabColor" | "foreground" | "background"))
    }

    /// Render back to a JSON object.
    ///
    /// Untouched colors keep their original spelling; changed ones are written
    /// in canonical hex and cleared ones are dropped.
    pub fn to_object(&self) -> Map<String, Value> {
        let mut out = self.source.clone();
        for field in ColorField::ALL {
            let current = self.color(field);
            if current == stored_color(&self.source, field) {
                continue;
            }
            match current {
                Some(color) => {
                    out.insert(field.key().to_string(), Value::String(color.to_hex()));
                }
                None => {
                    out = out.into_iter().filter(|(key, _)| key != field.key()).collect();
                }
            }
        }
        out
    }

    /// Short label used in listings and log lines.
    pub fn label(&self) -> String {
        match (&self.name, &self.guid) {
            (Some(name), _) => name.clone(),
            (None, Some(guid)) => guid.clone(),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

/// Color stored under `field` in a raw profile object, if it parses as one.
fn stored_color(source: &Map<String, Value>, field: ColorField) -> Option<Color> {
    source
        .get(field.key())
        .and_then(Value::as_str)
        .and_then(|text| Color::parse(field.key(), text).ok())
}

/// Where the profile list lives in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProfilesLayout {
    /// `"profiles": { "defaults": {..}, "list": [..] }`
    Object,
    /// `"profiles": [..]`
    Array,
    /// No `profiles` key at all.
    Missing,
}

/// Parsed settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsModel {
    profiles: Vec<Profile>,
    default_profile: Option<String>,
    root: Map<String, Value>,
    layout: ProfilesLayout,
    style: DocumentStyle,
}

impl SettingsModel {
    /// All profiles in document order; the index is the profile's position.
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, position: usize) -> Option<&Profile> {
        self.profiles.get(position)
    }

    pub fn profile_mut(&mut self, position: usize) -> Option<&mut Profile> {
        self.profiles.get_mut(position)
    }

    /// GUID named by the top-level `defaultProfile` key.
    pub fn default_profile(&self) -> Option<&str> {
        self.default_profile.as_deref()
    }

    /// Top-level keys the model does not interpret.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.root
            .keys()
            .map(String::as_str)
            .filter(|key| !matches!(*key, "profiles" | "defaultProfile"))
    }

    pub fn style(&self) -> &DocumentStyle {
        &self.style
    }
}
