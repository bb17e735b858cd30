//! Client-facing error taxonomy.
//!
//! Every failure that reaches a client falls into one of three classes.
//! The class decides how its text is rendered on the wire and which HTTP
//! status the synchronous endpoint uses.

use serde::{Deserialize, Serialize};

/// Prefix applied to internal failures on the wire.
pub const INTERNAL_ERROR_PREFIX: &str = "Internal error: ";

/// Class of a client-visible failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Missing or undecodable input. Surfaced verbatim.
    Input,
    /// The oracle's path failed verification. Surfaced verbatim.
    Validation,
    /// Anything else. Surfaced with [`INTERNAL_ERROR_PREFIX`].
    Internal,
}

impl ErrorClass {
    /// Render `message` the way clients see it for this class.
    pub fn render(self, message: impl std::fmt::Display) -> String {
        match self {
            Self::Input | Self::Validation => message.to_string(),
            Self::Internal => format!("{}{}", INTERNAL_ERROR_PREFIX, message),
        }
    }

    /// Stable lowercase name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that know their client-facing class.
pub trait Classify: std::error::Error {
    /// The class of this error.
    fn class(&self) -> ErrorClass;

    /// The text a client receives for this error.
    fn client_message(&self) -> String {
        self.class().render(self)
    }
}
