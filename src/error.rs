// Error handling for uri-params

use std::fmt;

use crate::validation::Mode;

/// A supplied parameter value that does not fit the template's contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The template never mentions this parameter
    UnknownParameter { name: String },
    /// A boolean or null where the mode only allows strings and numbers
    InvalidSingleValue {
        name: String,
        kind: &'static str,
        mode: Mode,
    },
    /// A single value for an exploded parameter
    ScalarNotAllowed { name: String, kind: &'static str },
    /// A list or map for a parameter that takes a single value
    CompositeNotAllowed { name: String, kind: &'static str },
    /// A list item or map entry that is not a single value
    InvalidItem {
        name: String,
        kind: &'static str,
        mode: Mode,
    },
}

impl ValueError {
    pub fn name(&self) -> &str {
        match self {
            ValueError::UnknownParameter { name }
            | ValueError::InvalidSingleValue { name, .. }
            | ValueError::ScalarNotAllowed { name, .. }
            | ValueError::CompositeNotAllowed { name, .. }
            | ValueError::InvalidItem { name, .. } => name,
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::UnknownParameter { name } => {
                write!(f, "Unknown parameter '{}': not used by the template", name)
            }
            ValueError::InvalidSingleValue { name, kind, mode } => write!(
                f,
                "Invalid value for '{}': {} is not allowed in {} mode",
                name, kind, mode
            ),
            ValueError::ScalarNotAllowed { name, kind } => write!(
                f,
                "Invalid value for '{}': expected a list or map, found {}",
                name, kind
            ),
            ValueError::CompositeNotAllowed { name, kind } => write!(
                f,
                "Invalid value for '{}': expected a single value, found {}",
                name, kind
            ),
            ValueError::InvalidItem { name, kind, mode } => write!(
                f,
                "Invalid value for '{}': {} items are not allowed in {} mode",
                name, kind, mode
            ),
        }
    }
}

impl std::error::Error for ValueError {}
