use std::{fmt, str::FromStr};

use snafu::{Snafu, ensure};

use crate::Segment;

#[cfg(feature = "serde")]
mod serde;

const SEPARATOR: char = '.';

/// Error variants which can be encountered when creating a new [`FieldPath`]
/// from unparsed input.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseFieldPathError {
    #[snafu(display("field path must not be empty"))]
    Empty,

    #[snafu(display("field path must not start with an element wildcard"))]
    LeadingWildcard,

    #[snafu(display("field path must not end with an element wildcard"))]
    TrailingWildcard,

    #[snafu(display("field path must not contain consecutive element wildcards"))]
    RepeatedWildcard,

    #[snafu(display("invalid field name {name:?} at segment {index}"))]
    InvalidFieldName { name: String, index: usize },
}

/// A canonical, validated path to a field of a resource, relative to its Spec
/// or Status root.
///
/// The path must follow these rules:
///
/// - must contain at least one field name
/// - must start and end with a field name
/// - must not contain two element wildcards in a row
/// - and every field name must be a valid identifier
///
/// Paths never contain element indices. A field nested inside a repeated
/// structure is addressed through the element wildcard instead, so that one
/// path covers the field in every element.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldPath(Vec<Segment>);

impl FromStr for FieldPath {
    type Err = ParseFieldPathError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        ensure!(!input.is_empty(), EmptySnafu);

        let mut segments = Vec::new();

        for (index, part) in input.split(SEPARATOR).enumerate() {
            if part.is_empty() {
                ensure!(index != 0, LeadingWildcardSnafu);
                ensure!(
                    !segments.last().is_some_and(Segment::is_element),
                    RepeatedWildcardSnafu
                );

                segments.push(Segment::Element);
                continue;
            }

            ensure!(
                Segment::is_valid_field_name(part),
                InvalidFieldNameSnafu { name: part, index }
            );

            segments.push(Segment::Field(part.to_owned()));
        }

        ensure!(
            !segments.last().is_some_and(Segment::is_element),
            TrailingWildcardSnafu
        );

        Ok(Self(segments))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEPARATOR}")?;
            }

            write!(f, "{segment}")?;
        }

        Ok(())
    }
}

impl FieldPath {
    /// Creates a single-segment path for a field directly below the root.
    pub fn new(name: &str) -> Result<Self, ParseFieldPathError> {
        ensure!(!name.is_empty(), EmptySnafu);
        ensure!(
            Segment::is_valid_field_name(name),
            InvalidFieldNameSnafu { name, index: 0usize }
        );

        Ok(Self(vec![Segment::Field(name.to_owned())]))
    }

    /// Returns the path of the member `name` of the struct at `self`.
    pub fn child(&self, name: &str) -> Result<Self, ParseFieldPathError> {
        self.extend_with(false, name)
    }

    /// Returns the path of the member `name` of every element of the repeated
    /// struct at `self`, like `Users..Password` for `Users`.
    pub fn element_child(&self, name: &str) -> Result<Self, ParseFieldPathError> {
        self.extend_with(true, name)
    }

    fn extend_with(&self, element: bool, name: &str) -> Result<Self, ParseFieldPathError> {
        let index = self.0.len() + usize::from(element);

        ensure!(
            Segment::is_valid_field_name(name),
            InvalidFieldNameSnafu { name, index }
        );

        let mut segments = self.0.clone();
        if element {
            segments.push(Segment::Element);
        }
        segments.push(Segment::Field(name.to_owned()));

        Ok(Self(segments))
    }

    /// The name of the field this path points to.
    pub fn name(&self) -> &str {
        // Construction guarantees that the last segment is a field name.
        self.0.last().and_then(Segment::as_field).unwrap_or_default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns the path of the enclosing field. For a member of a repeated
    /// struct this is the repeated field itself, the wildcard is dropped
    /// together with the member name.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            return None;
        }

        let mut segments = self.0[..self.0.len() - 1].to_vec();
        if segments.last().is_some_and(Segment::is_element) {
            segments.pop();
        }

        Some(Self(segments))
    }

    /// Iterates over all enclosing paths, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = FieldPath> {
        std::iter::successors(self.parent(), Self::parent)
    }

    /// Returns `true` if `self` lies strictly below `other`.
    pub fn is_descendant_of(&self, other: &FieldPath) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }

    pub fn has_wildcard(&self) -> bool {
        self.0.iter().any(Segment::is_element)
    }

    /// The number of field names in this path.
    pub fn depth(&self) -> usize {
        self.0.iter().filter(|s| !s.is_element()).count()
    }
}
