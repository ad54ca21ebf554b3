use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The value type of a scalar field, list element or map value.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
}

/// Classifies a [`Field`](crate::model::Field). Every field has exactly one
/// kind, which selects the comparison strategy used for it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TypeKind {
    /// A nullable single value.
    OptionalScalar(ScalarKind),

    /// An optional pointer to a struct. The only kind with children.
    NestedStruct,

    ListOfScalar(ScalarKind),
    ListOfStruct,
    MapStringToString,
    MapOfStruct,
    ByteSequence,
}

impl TypeKind {
    pub fn is_struct(self) -> bool {
        matches!(self, Self::NestedStruct)
    }

    /// Returns `true` if an absent value is distinguishable from an empty one
    /// and the field must be guarded before it is dereferenced.
    pub fn is_nilable(self) -> bool {
        matches!(
            self,
            Self::OptionalScalar(_) | Self::NestedStruct | Self::MapStringToString
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TypeKind::OptionalScalar(ScalarKind::String), "optional-scalar")]
    #[case(TypeKind::NestedStruct, "nested-struct")]
    #[case(TypeKind::ListOfScalar(ScalarKind::Integer), "list-of-scalar")]
    #[case(TypeKind::MapStringToString, "map-string-to-string")]
    #[case(TypeKind::ByteSequence, "byte-sequence")]
    fn display(#[case] kind: TypeKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[rstest]
    #[case(TypeKind::OptionalScalar(ScalarKind::Boolean), true)]
    #[case(TypeKind::NestedStruct, true)]
    #[case(TypeKind::MapStringToString, true)]
    #[case(TypeKind::ListOfScalar(ScalarKind::String), false)]
    #[case(TypeKind::ListOfStruct, false)]
    #[case(TypeKind::MapOfStruct, false)]
    #[case(TypeKind::ByteSequence, false)]
    fn nilable(#[case] kind: TypeKind, #[case] expected: bool) {
        assert_eq!(kind.is_nilable(), expected);
    }
}
