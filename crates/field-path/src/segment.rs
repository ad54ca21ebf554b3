use std::{fmt, sync::LazyLock};

use regex::Regex;

static FIELD_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("failed to compile field name regex")
});

/// A single component of a [`FieldPath`](crate::FieldPath).
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// A named field, like `LoggingEnabled`.
    Field(String),

    /// One hop into an element of a list-of-struct or map-of-struct field.
    /// Renders as an empty segment.
    Element,
}

impl Segment {
    /// Returns the field name, or [`None`] for the element wildcard.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Element => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element)
    }

    pub(crate) fn is_valid_field_name(name: &str) -> bool {
        FIELD_NAME_REGEX.is_match(name)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Element => Ok(()),
        }
    }
}
