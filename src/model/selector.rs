//! Profile selectors and their resolution against a model.

use super::SettingsModel;
use crate::error::{NotFound, TerminoError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference to exactly one profile entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "by", content = "value")]
pub enum ProfileSelector {
    ByName(String),
    ByGuid(String),
    ByPosition(usize),
    /// The profile named by top-level `defaultProfile`, else the first one.
    Default,
}

impl ProfileSelector {
    /// Resolve to a profile position in `model`.
    pub fn resolve(&self, model: &SettingsModel) -> Result<usize, TerminoError> {
        match self {
            Self::ByPosition(position) => {
                if *position < model.profiles().len() {
                    Ok(*position)
                } else {
                    Err(NotFound::Profile(self.to_string()).into())
                }
            }
            Self::ByName(name) => self.unique(
                model
                    .profiles()
                    .iter()
                    .enumerate()
                    .filter(|(_, profile)| profile.name() == Some(name.as_str()))
                    .map(|(position, _)| position),
            ),
            Self::ByGuid(guid) => self.unique(positions_with_guid(model, guid)),
            Self::Default => match model.default_profile() {
                Some(guid) => self.unique(positions_with_guid(model, guid)),
                None if model.profiles().is_empty() => {
                    Err(NotFound::Profile(self.to_string()).into())
                }
                None => Ok(0),
            },
        }
    }

    fn unique(&self, mut matches: impl Iterator<Item = usize>) -> Result<usize, TerminoError> {
        let Some(first) = matches.next() else {
            return Err(NotFound::Profile(self.to_string()).into());
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(TerminoError::AmbiguousSelector {
                selector: self.to_string(),
                matches: extra + 1,
            });
        }
        Ok(first)
    }
}

fn positions_with_guid<'a>(
    model: &'a SettingsModel,
    guid: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    let wanted = normalize_guid(guid);
    model
        .profiles()
        .iter()
        .enumerate()
        .filter(move |(_, profile)| {
            profile
                .guid()
                .is_some_and(|candidate| normalize_guid(candidate) == wanted)
        })
        .map(|(position, _)| position)
}

/// GUIDs compare without braces and case.
fn normalize_guid(guid: &str) -> String {
    guid.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_lowercase()
}

/// True for `8-4-4-4-12` hex groups, with or without braces.
fn looks_like_guid(text: &str) -> bool {
    let bare = normalize_guid(text);
    let groups = bare.split('-').collect::<Vec<_>>();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

impl fmt::Display for ProfileSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "name `{name}`"),
            Self::ByGuid(guid) => write!(f, "guid `{guid}`"),
            Self::ByPosition(position) => write!(f, "position {position}"),
            Self::Default => write!(f, "the default profile"),
        }
    }
}

impl FromStr for ProfileSelector {
    type Err = String;

    /// `name:X`, `guid:X` and `index:N` are explicit; otherwise digits mean a
    /// position, GUID-shaped text a GUID, and anything else a name.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        if text.is_empty() {
            return Err("profile selector cannot be empty".to_string());
        }
        if let Some(name) = text.strip_prefix("name:") {
            return Ok(Self::ByName(name.to_string()));
        }
        if let Some(guid) = text.strip_prefix("guid:") {
            return Ok(Self::ByGuid(guid.trim().to_string()));
        }
        if let Some(index) = text.strip_prefix("index:") {
            return index
                .trim()
                .parse::<usize>()
                .map(Self::ByPosition)
                .map_err(|_| format!("invalid profile index `{index}`"));
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<usize>()
                .map(Self::ByPosition)
                .map_err(|_| format!("invalid profile index `{text}`"));
        }
        if looks_like_guid(text) {
            return Ok(Self::ByGuid(text.to_string()));
        }
        Ok(Self::ByName(text.to_string()))
    }
}
