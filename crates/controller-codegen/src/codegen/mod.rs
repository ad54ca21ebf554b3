//! Generators turning a [`Crd`](crate::Crd) into source code fragments for the
//! controller assembly stage.

use field_path::FieldPath;
use snafu::Snafu;

use crate::model::TypeKind;

mod compare;

pub use compare::*;

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

/// Precondition violations detected while generating code. A validated
/// resource model never triggers any of these, so every variant indicates a
/// defect in the code that produced the model.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum GenerationError {
    #[snafu(display(
        "internal error: struct field {path} of resource {resource:?} has no children"
    ))]
    ChildlessStruct { resource: String, path: FieldPath },

    #[snafu(display(
        "internal error: {kind} field {path} of resource {resource:?} must not have children"
    ))]
    UnexpectedChildren {
        resource: String,
        path: FieldPath,
        kind: TypeKind,
    },

    #[snafu(display(
        "internal error: field {path} of resource {resource:?} references a child missing from the field index"
    ))]
    MissingChild { resource: String, path: FieldPath },

    /// The field itself is unknown, so it is reported by its position below
    /// `root`. Trees built by a
    /// [`FieldTreeBuilder`](crate::model::FieldTreeBuilder) always index
    /// their top-level fields.
    #[snafu(display(
        "internal error: top-level field #{position} below {root:?} of resource {resource:?} is missing from the field index"
    ))]
    MissingRoot {
        resource: String,
        root: String,
        position: usize,
    },
}

const INDENT: char = '\t';

/// Accumulates indented statement lines.
#[derive(Debug, Default)]
pub(crate) struct Lines(String);

impl Lines {
    pub(crate) fn push(&mut self, indent: usize, statement: &str) {
        self.0.extend(std::iter::repeat_n(INDENT, indent));
        self.0.push_str(statement);
        self.0.push('\n');
    }

    /// Appends already indented lines.
    pub(crate) fn append(&mut self, lines: &str) {
        self.0.push_str(lines);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_string(self) -> String {
        self.0
    }
}
