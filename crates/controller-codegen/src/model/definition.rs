//! Serializable description of a materialized resource schema. This is the
//! form in which the shape source hands over the fields of a resource, before
//! they are indexed into a [`FieldTree`](crate::model::FieldTree).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ScalarKind;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceDefinition {
    /// The resource (kind) name, like `Bucket`.
    pub name: String,

    #[serde(default)]
    pub spec: Vec<FieldDefinition>,

    #[serde(default)]
    pub status: Vec<FieldDefinition>,

    /// Named struct shapes which can be referenced by struct fields and
    /// struct elements instead of listing the members inline.
    #[serde(default)]
    pub shapes: BTreeMap<String, Vec<FieldDefinition>>,
}

impl ResourceDefinition {
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(flatten)]
    pub shape: FieldShape,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldShape {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Bytes,
    Struct(StructShape),
    List { element: ElementShape },
    Map { value: MapValueShape },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementShape {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Struct(StructShape),
}

/// Map keys are always strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MapValueShape {
    String,
    Struct(StructShape),
}

/// The members of a struct, either listed inline or taken from a named shape.
/// Exactly one of the two must be provided.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StructShape {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<FieldDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

impl StructShape {
    pub fn inline(members: Vec<FieldDefinition>) -> Self {
        Self {
            members,
            shape: None,
        }
    }

    pub fn reference(shape: impl Into<String>) -> Self {
        Self {
            members: Vec::new(),
            shape: Some(shape.into()),
        }
    }
}

impl From<ScalarKind> for FieldShape {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Integer => Self::Integer,
            ScalarKind::Float => Self::Float,
            ScalarKind::Boolean => Self::Boolean,
            ScalarKind::Timestamp => Self::Timestamp,
        }
    }
}

impl From<ScalarKind> for ElementShape {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Integer => Self::Integer,
            ScalarKind::Float => Self::Float,
            ScalarKind::Boolean => Self::Boolean,
            ScalarKind::Timestamp => Self::Timestamp,
        }
    }
}

impl FieldDefinition {
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, kind.into())
    }

    pub fn bytes(name: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Bytes)
    }

    pub fn structure(name: impl Into<String>, members: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldShape::Struct(StructShape::inline(members)))
    }

    /// A struct field whose members come from the named shape.
    pub fn shape_ref(name: impl Into<String>, shape: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Struct(StructShape::reference(shape)))
    }

    pub fn list_of(name: impl Into<String>, element: ScalarKind) -> Self {
        Self::new(name, FieldShape::List {
            element: element.into(),
        })
    }

    pub fn list_of_struct(name: impl Into<String>, members: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldShape::List {
            element: ElementShape::Struct(StructShape::inline(members)),
        })
    }

    pub fn map_of_strings(name: impl Into<String>) -> Self {
        Self::new(name, FieldShape::Map {
            value: MapValueShape::String,
        })
    }

    pub fn map_of_struct(name: impl Into<String>, members: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldShape::Map {
            value: MapValueShape::Struct(StructShape::inline(members)),
        })
    }

    fn new(name: impl Into<String>, shape: FieldShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}
