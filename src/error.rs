//! Unified error types for termino.

use std::fmt;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// What exactly was wrong with a user-supplied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Nothing (or only whitespace) was supplied.
    EmptyInput,
    /// Looked like `#RRGGBB` but the digits were wrong.
    MalformedHex,
    /// Not a color name from the named-color table.
    UnknownName,
    /// A sub-command needs at least one option and got none.
    MissingOption,
    /// Undo count must be at least one.
    InvalidCount,
    /// The command cannot be applied to a settings model directly.
    NotTransformable,
}

/// A rejected option value, carrying the option name and the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub option: String,
    pub raw: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(option: impl Into<String>, raw: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            option: option.into(),
            raw: raw.into(),
            kind,
        }
    }
}

/// Human wording for the color options the CLI knows about.
fn option_label(option: &str) -> Option<&'static str> {
    match option {
        "tabColor" => Some("tab color"),
        "background" => Some("background color"),
        "foreground" => Some("foreground color"),
        _ => None,
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = option_label(&self.option);
        match (self.kind, label) {
            (ValidationErrorKind::EmptyInput, _) => {
                write!(f, "{}: Color was not specified", self.option)
            }
            (ValidationErrorKind::MalformedHex, Some(label)) => write!(
                f,
                "{}: The {label} '{}' appears to be a hexadecimal specification, but there are invalid digits.",
                self.option, self.raw
            ),
            (ValidationErrorKind::UnknownName, Some(label)) => write!(
                f,
                "{}: Cannot set an unknown color named '{}' as the {label}",
                self.option, self.raw
            ),
            (ValidationErrorKind::MalformedHex, None) => write!(
                f,
                "{}: '{}' appears to be a hexadecimal specification, but there are invalid digits.",
                self.option, self.raw
            ),
            (ValidationErrorKind::UnknownName, None) => {
                write!(f, "{}: unknown color name '{}'", self.option, self.raw)
            }
            (ValidationErrorKind::MissingOption, _) => {
                write!(f, "{}: At least one option must be supplied", self.option)
            }
            (ValidationErrorKind::InvalidCount, _) => write!(
                f,
                "{}: '{}' is not a valid count (expected an integer of at least 1)",
                self.option, self.raw
            ),
            (ValidationErrorKind::NotTransformable, _) => write!(
                f,
                "{}: '{}' operates on history and cannot be applied to settings directly",
                self.option, self.raw
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// NotFound
// ---------------------------------------------------------------------------

/// Something that was looked up and did not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// The settings document at this path does not exist.
    SettingsFile(String),
    /// No installation flavor produced an existing settings file.
    Installation(String),
    /// The selector matched no profile.
    Profile(String),
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SettingsFile(path) => write!(f, "settings file `{path}` does not exist"),
            Self::Installation(tried) => {
                write!(f, "no Windows Terminal settings file found (tried {tried})")
            }
            Self::Profile(selector) => write!(f, "no profile matches {selector}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing termino's own configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// TerminoError - top-level
// ---------------------------------------------------------------------------

/// Top-level error type for command execution.
#[derive(Debug)]
pub enum TerminoError {
    Validation(ValidationError),
    NotFound(NotFound),
    /// The selector matched more than one profile.
    AmbiguousSelector { selector: String, matches: usize },
    /// The settings document is not well-formed.
    Parse(String),
    /// Undo requested with nothing recorded.
    EmptyStack,
    /// The document changed on disk since it was read.
    Concurrency(String),
    Io(std::io::Error),
    Config(ConfigError),
    /// The daemon could not be reached or spoke garbage.
    Transport(String),
    /// The daemon reported a failure while executing the command.
    Remote(String),
    /// The command was never run because an earlier command halted the queue.
    Aborted(String),
}

impl TerminoError {
    /// True when the rest of the queued work must not run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Concurrency(_))
    }

    /// Short stable tag used on the daemon wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not-found",
            Self::AmbiguousSelector { .. } => "ambiguous-selector",
            Self::Parse(_) => "parse",
            Self::EmptyStack => "empty-stack",
            Self::Concurrency(_) => "concurrency",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Transport(_) => "transport",
            Self::Remote(_) => "remote",
            Self::Aborted(_) => "aborted",
        }
    }
}

impl fmt::Display for TerminoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::NotFound(e) => write!(f, "{e}"),
            Self::AmbiguousSelector { selector, matches } => {
                write!(f, "{selector} is ambiguous: it matches {matches} profiles")
            }
            Self::Parse(msg) => write!(f, "settings file is not valid JSON: {msg}"),
            Self::EmptyStack => write!(f, "nothing to undo"),
            Self::Concurrency(msg) => write!(f, "settings file changed underneath us: {msg}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(msg) => write!(f, "daemon transport: {msg}"),
            Self::Remote(msg) => write!(f, "daemon: {msg}"),
            Self::Aborted(msg) => write!(f, "not run: {msg}"),
        }
    }
}

impl std::error::Error for TerminoError {}

impl From<ValidationError> for TerminoError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<NotFound> for TerminoError {
    fn from(e: NotFound) -> Self {
        Self::NotFound(e)
    }
}

impl From<ConfigError> for TerminoError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for TerminoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
