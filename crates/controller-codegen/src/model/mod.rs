//! The field model: an immutable, indexed tree of the typed fields of one
//! resource root (Spec or Status).
//!
//! Trees are built once from [`FieldDefinition`]s through a
//! [`FieldTreeBuilder`], which is also the only place where [`FieldConfig`]
//! overrides can be attached. Every field is addressable by its canonical
//! [`FieldPath`], members of repeated structs included (`Users..Password`).

use std::collections::BTreeMap;

use field_path::{FieldPath, ParseFieldPathError};
use indexmap::IndexMap;
use snafu::{OptionExt, ResultExt, Snafu, ensure};

mod definition;
mod kind;

pub use definition::*;
pub use kind::*;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// Errors encountered while building the field model of a resource. All of
/// them are fatal for that resource.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum BuildError {
    #[snafu(display("override {path} of resource {resource:?} does not match any field"))]
    DanglingOverride { resource: String, path: FieldPath },

    #[snafu(display("field {path} of resource {resource:?} cannot be both ignored and secret"))]
    ConflictingOverride { resource: String, path: FieldPath },

    #[snafu(display(
        "field {path} of resource {resource:?} references unknown shape {shape:?}"
    ))]
    UnresolvedShape {
        resource: String,
        path: FieldPath,
        shape: String,
    },

    #[snafu(display(
        "field {path} of resource {resource:?} references shape {shape:?} recursively"
    ))]
    RecursiveShape {
        resource: String,
        path: FieldPath,
        shape: String,
    },

    #[snafu(display("struct field {path} of resource {resource:?} has no members"))]
    EmptyStruct { resource: String, path: FieldPath },

    #[snafu(display(
        "struct field {path} of resource {resource:?} must either list members or reference a shape"
    ))]
    AmbiguousStruct { resource: String, path: FieldPath },

    #[snafu(display("field {path} of resource {resource:?} is defined more than once"))]
    DuplicateField { resource: String, path: FieldPath },

    #[snafu(display("invalid field name in resource {resource:?}"))]
    InvalidFieldName {
        source: ParseFieldPathError,
        resource: String,
    },
}

/// Per-field overrides supplied by the user.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct FieldConfig {
    /// Excludes the field and all of its descendants from generated
    /// comparisons.
    pub ignore: bool,

    /// The value must never appear in cleartext in generated diagnostics.
    pub is_secret: bool,
}

impl FieldConfig {
    pub fn ignored() -> Self {
        Self {
            ignore: true,
            is_secret: false,
        }
    }

    pub fn secret() -> Self {
        Self {
            ignore: false,
            is_secret: true,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            ignore: self.ignore || other.ignore,
            is_secret: self.is_secret || other.is_secret,
        }
    }
}

/// Handle to a [`Field`] inside the [`FieldTree`] it was created by.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    path: FieldPath,
    kind: TypeKind,
    children: Vec<FieldId>,
    element_members: Vec<FieldId>,
    config: Option<FieldConfig>,
}

impl Field {
    fn new(path: FieldPath, kind: TypeKind) -> Self {
        Self {
            path,
            kind,
            children: Vec::new(),
            element_members: Vec::new(),
            config: None,
        }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The members of a [`TypeKind::NestedStruct`] field, in definition order.
    /// Empty for every other kind.
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    /// The members of each element of a list-of-struct or map-of-struct
    /// field. These are never children in the tree sense, they only exist so
    /// that overrides can address them.
    pub fn element_members(&self) -> &[FieldId] {
        &self.element_members
    }

    pub fn config(&self) -> Option<&FieldConfig> {
        self.config.as_ref()
    }

    pub fn is_ignored(&self) -> bool {
        self.config.is_some_and(|c| c.ignore)
    }

    pub fn is_secret(&self) -> bool {
        self.config.is_some_and(|c| c.is_secret)
    }
}

/// The fields below one resource root, indexed by canonical path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTree {
    fields: IndexMap<FieldPath, Field>,
    roots: Vec<FieldId>,
}

impl FieldTree {
    pub fn resolve(&self, path: &FieldPath) -> Option<&Field> {
        self.fields.get(path)
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.get_index(id.0).map(|(_, field)| field)
    }

    /// The top-level fields, in definition order.
    pub fn roots(&self) -> &[FieldId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the field at `path` or any of its ancestors is
    /// ignored.
    pub fn is_ignored(&self, path: &FieldPath) -> bool {
        std::iter::once(path.clone())
            .chain(path.ancestors())
            .any(|p| self.resolve(&p).is_some_and(Field::is_ignored))
    }
}

/// Builds a [`FieldTree`] and attaches overrides to it. Once built, the tree
/// cannot be changed anymore.
#[derive(Debug)]
pub struct FieldTreeBuilder {
    resource: String,
    tree: FieldTree,
}

impl FieldTreeBuilder {
    /// Indexes `definitions` of `resource`. Struct members referencing a named
    /// shape are looked up in `shapes`.
    pub fn new(
        resource: impl Into<String>,
        definitions: &[FieldDefinition],
        shapes: &BTreeMap<String, Vec<FieldDefinition>>,
    ) -> Result<Self> {
        let resource = resource.into();

        let mut loader = Loader {
            resource: &resource,
            shapes,
            visiting: Vec::new(),
            fields: IndexMap::new(),
        };

        let roots = definitions
            .iter()
            .map(|definition| {
                let path = FieldPath::new(&definition.name).context(InvalidFieldNameSnafu {
                    resource: loader.resource,
                })?;
                loader.insert_field(path, &definition.shape)
            })
            .collect::<Result<Vec<_>>>()?;

        let tree = FieldTree {
            fields: loader.fields,
            roots,
        };

        Ok(Self { resource, tree })
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.tree.fields.contains_key(path)
    }

    /// Attaches `config` to the field at exactly `path`. Configs attached to
    /// the same field more than once are merged.
    pub fn attach_override(&mut self, path: &FieldPath, config: FieldConfig) -> Result<()> {
        let field = self
            .tree
            .fields
            .get_mut(path)
            .context(DanglingOverrideSnafu {
                resource: &self.resource,
                path: path.clone(),
            })?;

        let merged = field.config.unwrap_or_default().merge(config);
        ensure!(
            !(merged.ignore && merged.is_secret),
            ConflictingOverrideSnafu {
                resource: &self.resource,
                path: path.clone(),
            }
        );

        tracing::debug!(
            resource = %self.resource,
            %path,
            ignore = merged.ignore,
            is_secret = merged.is_secret,
            "attached field override"
        );

        field.config = Some(merged);
        Ok(())
    }

    pub fn build(self) -> FieldTree {
        self.tree
    }
}

struct Loader<'a> {
    resource: &'a str,
    shapes: &'a BTreeMap<String, Vec<FieldDefinition>>,
    visiting: Vec<&'a str>,
    fields: IndexMap<FieldPath, Field>,
}

impl<'a> Loader<'a> {
    fn insert_field(&mut self, path: FieldPath, shape: &'a FieldShape) -> Result<FieldId> {
        ensure!(
            !self.fields.contains_key(&path),
            DuplicateFieldSnafu {
                resource: self.resource,
                path,
            }
        );

        let kind = match shape {
            FieldShape::String => TypeKind::OptionalScalar(ScalarKind::String),
            FieldShape::Integer => TypeKind::OptionalScalar(ScalarKind::Integer),
            FieldShape::Float => TypeKind::OptionalScalar(ScalarKind::Float),
            FieldShape::Boolean => TypeKind::OptionalScalar(ScalarKind::Boolean),
            FieldShape::Timestamp => TypeKind::OptionalScalar(ScalarKind::Timestamp),
            FieldShape::Bytes => TypeKind::ByteSequence,
            FieldShape::Struct(_) => TypeKind::NestedStruct,
            FieldShape::List { element } => match element {
                ElementShape::String => TypeKind::ListOfScalar(ScalarKind::String),
                ElementShape::Integer => TypeKind::ListOfScalar(ScalarKind::Integer),
                ElementShape::Float => TypeKind::ListOfScalar(ScalarKind::Float),
                ElementShape::Boolean => TypeKind::ListOfScalar(ScalarKind::Boolean),
                ElementShape::Timestamp => TypeKind::ListOfScalar(ScalarKind::Timestamp),
                ElementShape::Struct(_) => TypeKind::ListOfStruct,
            },
            FieldShape::Map { value } => match value {
                MapValueShape::String => TypeKind::MapStringToString,
                MapValueShape::Struct(_) => TypeKind::MapOfStruct,
            },
        };

        let (index, _) = self
            .fields
            .insert_full(path.clone(), Field::new(path.clone(), kind));

        match shape {
            FieldShape::Struct(members) => {
                let children = self.insert_members(&path, false, members)?;
                self.fields[index].children = children;
            }
            FieldShape::List {
                element: ElementShape::Struct(members),
            }
            | FieldShape::Map {
                value: MapValueShape::Struct(members),
            } => {
                let element_members = self.insert_members(&path, true, members)?;
                self.fields[index].element_members = element_members;
            }
            _ => {}
        }

        Ok(FieldId(index))
    }

    fn insert_members(
        &mut self,
        path: &FieldPath,
        element: bool,
        shape: &'a StructShape,
    ) -> Result<Vec<FieldId>> {
        let shapes = self.shapes;

        let (members, shape_name) = match &shape.shape {
            Some(name) => {
                ensure!(
                    shape.members.is_empty(),
                    AmbiguousStructSnafu {
                        resource: self.resource,
                        path: path.clone(),
                    }
                );
                ensure!(
                    !self.visiting.contains(&name.as_str()),
                    RecursiveShapeSnafu {
                        resource: self.resource,
                        path: path.clone(),
                        shape: name,
                    }
                );

                let members = shapes.get(name).context(UnresolvedShapeSnafu {
                    resource: self.resource,
                    path: path.clone(),
                    shape: name,
                })?;

                (members, Some(name.as_str()))
            }
            None => (&shape.members, None),
        };

        ensure!(
            !members.is_empty(),
            EmptyStructSnafu {
                resource: self.resource,
                path: path.clone(),
            }
        );

        if let Some(name) = shape_name {
            self.visiting.push(name);
        }

        let mut ids = Vec::with_capacity(members.len());
        for member in members {
            let member_path = if element {
                path.element_child(&member.name)
            } else {
                path.child(&member.name)
            }
            .context(InvalidFieldNameSnafu {
                resource: self.resource,
            })?;

            ids.push(self.insert_field(member_path, &member.shape)?);
        }

        if shape_name.is_some() {
            self.visiting.pop();
        }

        Ok(ids)
    }
}
