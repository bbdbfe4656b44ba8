//! Conversion between raw document text and [`SettingsModel`].

use super::{Profile, ProfilesLayout, SettingsModel};
use crate::error::TerminoError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Indentation used when the document gives no hint (Windows Terminal's own).
const DEFAULT_INDENT: &str = "    ";

/// Line break used throughout a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

/// Formatting conventions detected on read and reused on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStyle {
    pub indent: String,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            line_ending: LineEnding::Lf,
            trailing_newline: true,
        }
    }
}

impl DocumentStyle {
    fn detect(text: &str) -> Self {
        let indent = text
            .lines()
            .skip(1)
            .map(|line| {
                let body = line.trim_start_matches([' ', '\t']);
                &line[..line.len() - body.len()]
            })
            .find(|prefix| !prefix.is_empty())
            .unwrap_or(DEFAULT_INDENT)
            .to_string();
        // The first line break decides; JSON strings cannot hold a raw one.
        let line_ending = match text.find('\n') {
            Some(at) if text[..at].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };
        Self {
            indent,
            line_ending,
            trailing_newline: text.ends_with('\n'),
        }
    }
}

impl SettingsModel {
    /// Parse a settings document.
    pub fn from_json_str(text: &str) -> Result<Self, TerminoError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TerminoError::Parse(e.to_string()))?;
        let Value::Object(root) = value else {
            return Err(TerminoError::Parse(
                "top-level value must be an object".to_string(),
            ));
        };

        let (layout, raw_profiles) = match root.get("profiles") {
            None => (ProfilesLayout::Missing, Vec::new()),
            Some(Value::Array(list)) => (ProfilesLayout::Array, list.clone()),
            Some(Value::Object(group)) => match group.get("list") {
                None => (ProfilesLayout::Object, Vec::new()),
                Some(Value::Array(list)) => (ProfilesLayout::Object, list.clone()),
                Some(_) => {
                    return Err(TerminoError::Parse(
                        "`profiles.list` must be an array".to_string(),
                    ))
                }
            },
            Some(_) => {
                return Err(TerminoError::Parse(
                    "`profiles` must be an object or an array".to_string(),
                ))
            }
        };

        let mut profiles = Vec::with_capacity(raw_profiles.len());
        for (position, entry) in raw_profiles.into_iter().enumerate() {
            let Value::Object(object) = entry else {
                return Err(TerminoError::Parse(format!(
                    "profile at position {position} is not an object"
                )));
            };
            profiles.push(Profile::from_object(object));
        }

        let default_profile = root
            .get("defaultProfile")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            profiles,
            default_profile,
            root,
            layout,
            style: DocumentStyle::detect(text),
        })
    }

    /// Assemble the full document value.
    pub fn to_value(&self) -> Value {
        let mut root = self.root.clone();
        let list = Value::Array(
            self.profiles
                .iter()
                .map(|profile| Value::Object(profile.to_object()))
                .collect(),
        );
        match self.layout {
            ProfilesLayout::Array => {
                root.insert("profiles".to_string(), list);
            }
            ProfilesLayout::Object => {
                let mut group = match root.get("profiles") {
                    Some(Value::Object(group)) => group.clone(),
                    _ => Map::new(),
                };
                // An object without `list` stays that way when nothing was listed.
                if group.contains_key("list") || !self.profiles.is_empty() {
                    group.insert("list".to_string(), list);
                }
                root.insert("profiles".to_string(), Value::Object(group));
            }
            ProfilesLayout::Missing => {}
        }
        Value::Object(root)
    }

    /// Serialize using the detected document style.
    pub fn to_json_string(&self) -> Result<String, TerminoError> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.style.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.to_value()
            .serialize(&mut serializer)
            .map_err(|e| TerminoError::Parse(format!("failed to serialize settings: {e}")))?;
        let mut text = String::from_utf8(out)
            .map_err(|e| TerminoError::Parse(format!("serialized settings are not UTF-8: {e}")))?;
        if self.style.trailing_newline {
            text.push('\n');
        }
        if self.style.line_ending == LineEnding::CrLf {
            text = text.replace('\n', "\r\n");
        }
        Ok(text)
    }
}
