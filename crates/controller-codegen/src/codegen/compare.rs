use snafu::{OptionExt, ensure};
use tracing::{Level, instrument};

use crate::{
    Crd,
    codegen::{
        ChildlessStructSnafu, Lines, MissingChildSnafu, MissingRootSnafu, Result,
        UnexpectedChildrenSnafu,
    },
    config::FlavorConfig,
    model::{Field, FieldId, FieldTree, ScalarKind, TypeKind},
};

/// How the two operands of a field are compared once both are known to be
/// present. Whether a presence guard is emitted around the check is decided by
/// [`TypeKind::is_nilable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// Inequality of the dereferenced values.
    Deref,

    /// The timestamp `Equal` method.
    Timestamp,

    /// Recursion into the struct members.
    Members,

    /// A single equality check over the whole value.
    Whole(Equality),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Equality {
    StringMap,
    StringSlice,
    Bytes,
    Deep,
}

impl Strategy {
    fn of(kind: TypeKind) -> Self {
        match kind {
            TypeKind::OptionalScalar(ScalarKind::Timestamp) => Self::Timestamp,
            TypeKind::OptionalScalar(_) => Self::Deref,
            TypeKind::NestedStruct => Self::Members,
            TypeKind::MapStringToString => Self::Whole(Equality::StringMap),
            TypeKind::ListOfScalar(ScalarKind::String) => Self::Whole(Equality::StringSlice),
            TypeKind::ByteSequence => Self::Whole(Equality::Bytes),
            TypeKind::ListOfScalar(_) | TypeKind::ListOfStruct | TypeKind::MapOfStruct => {
                Self::Whole(Equality::Deep)
            }
        }
    }
}

impl Equality {
    fn differs(self, a: &str, b: &str) -> String {
        match self {
            Self::StringMap => format!("!ackcompare.MapStringStringPEqual({a}, {b})"),
            Self::StringSlice => format!("!ackcompare.SliceStringPEqual({a}, {b})"),
            Self::Bytes => format!("!bytes.Equal({a}, {b})"),
            Self::Deep => format!("!reflect.DeepEqual({a}, {b})"),
        }
    }
}

/// Generates statements detecting differences between the Spec fields of two
/// instances of `crd`.
///
/// The returned fragment is meant to be inserted verbatim into a function
/// body in which `left` and `right` are bound to the two instances and
/// `delta` is an initialized difference collector with an
/// `Add(path, a, b)` method. Statements start at `indent` tab stops and the
/// fragment starts with an empty line.
///
/// Struct members are visited in ascending order of their names and ignored
/// fields are skipped together with their descendants. A struct whose
/// members are all skipped produces no statements at all. The output is
/// fully determined by the arguments.
///
/// ```
/// use controller_codegen::{
///     Crd, codegen::compare_resource, config::FlavorConfig,
///     model::{FieldDefinition, ResourceDefinition, ScalarKind},
/// };
///
/// let definition = ResourceDefinition {
///     name: "Queue".to_owned(),
///     spec: vec![FieldDefinition::scalar("QueueName", ScalarKind::String)],
///     status: vec![],
///     shapes: Default::default(),
/// };
/// let crd = Crd::try_new(&definition, None, FlavorConfig::ack())
///     .expect("resource model must build");
///
/// let fragment = compare_resource(&FlavorConfig::ack(), &crd, "delta", "a.ko", "b.ko", 1)
///     .expect("fragment must generate");
/// assert!(fragment.contains(r#"delta.Add("Spec.QueueName", a.ko.Spec.QueueName, b.ko.Spec.QueueName)"#));
/// ```
#[instrument(
    level = Level::DEBUG,
    skip_all,
    fields(resource = %crd.name(), prefix = %flavor.spec_prefix())
)]
pub fn compare_resource(
    flavor: &FlavorConfig,
    crd: &Crd,
    delta: &str,
    left: &str,
    right: &str,
    indent: usize,
) -> Result<String> {
    let comparator = Comparator::new(crd.name(), crd.spec(), flavor.spec_prefix(), delta, left, right);

    let mut out = Lines::default();
    out.append("\n");

    if let Some(statements) = comparator.compare_roots(indent)? {
        out.append(&statements);
    }

    Ok(out.into_string())
}

/// Walks one field tree, depth-first and leaves first.
struct Comparator<'a> {
    resource: &'a str,
    tree: &'a FieldTree,
    delta: &'a str,

    /// Access expressions of the two roots, like `a.ko.Spec`.
    left_root: String,
    right_root: String,

    /// Root of the recorded difference paths, like `Spec`.
    path_root: &'a str,
}

impl<'a> Comparator<'a> {
    fn new(
        resource: &'a str,
        tree: &'a FieldTree,
        prefix: &'a str,
        delta: &'a str,
        left: &str,
        right: &str,
    ) -> Self {
        Self {
            resource,
            tree,
            delta,
            left_root: format!("{left}{prefix}"),
            right_root: format!("{right}{prefix}"),
            path_root: prefix.trim_start_matches('.'),
        }
    }

    fn compare_roots(&self, indent: usize) -> Result<Option<String>> {
        let fields = self
            .tree
            .roots()
            .iter()
            .enumerate()
            .map(|(position, id)| {
                self.tree.get(*id).context(MissingRootSnafu {
                    resource: self.resource,
                    root: self.path_root,
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.compare_fields(fields, indent)
    }

    fn compare_children(&self, parent: &Field, indent: usize) -> Result<Option<String>> {
        let fields = parent
            .children()
            .iter()
            .map(|id| self.child(parent, *id))
            .collect::<Result<Vec<_>>>()?;

        self.compare_fields(fields, indent)
    }

    fn child(&self, parent: &Field, id: FieldId) -> Result<&'a Field> {
        self.tree.get(id).context(MissingChildSnafu {
            resource: self.resource,
            path: parent.path().clone(),
        })
    }

    /// Returns [`None`] if none of `fields` produced a statement.
    fn compare_fields(&self, mut fields: Vec<&Field>, indent: usize) -> Result<Option<String>> {
        fields.sort_by(|l, r| l.name().cmp(r.name()));

        let mut lines = Lines::default();
        for field in fields {
            if field.is_ignored() {
                tracing::debug!(path = %field.path(), "skipping ignored field");
                continue;
            }

            if let Some(statements) = self.compare_field(field, indent)? {
                lines.append(&statements);
            }
        }

        Ok((!lines.is_empty()).then(|| lines.into_string()))
    }

    fn compare_field(&self, field: &Field, indent: usize) -> Result<Option<String>> {
        let kind = field.kind();
        ensure!(
            kind.is_struct() || field.children().is_empty(),
            UnexpectedChildrenSnafu {
                resource: self.resource,
                path: field.path().clone(),
                kind,
            }
        );

        tracing::trace!(
            path = %field.path(),
            %kind,
            secret = field.is_secret(),
            "comparing field"
        );

        let a = format!("{}.{}", self.left_root, field.path());
        let b = format!("{}.{}", self.right_root, field.path());
        let path = self.record_path(field);

        let guarded = kind.is_nilable();
        let check_indent = if guarded { indent + 1 } else { indent };

        let mut check = Lines::default();
        match Strategy::of(kind) {
            Strategy::Deref => {
                let condition = format!("*{a} != *{b}");
                self.record_if(&mut check, check_indent, &condition, &path, &a, &b);
            }
            Strategy::Timestamp => {
                let condition = format!("!{a}.Equal({b})");
                self.record_if(&mut check, check_indent, &condition, &path, &a, &b);
            }
            Strategy::Whole(equality) => {
                let condition = equality.differs(&a, &b);
                self.record_if(&mut check, check_indent, &condition, &path, &a, &b);
            }
            Strategy::Members => {
                ensure!(
                    !field.children().is_empty(),
                    ChildlessStructSnafu {
                        resource: self.resource,
                        path: field.path().clone(),
                    }
                );

                match self.compare_children(field, check_indent)? {
                    Some(members) => check.append(&members),
                    None => {
                        tracing::debug!(
                            path = %field.path(),
                            "omitting struct guard, all members are ignored"
                        );
                        return Ok(None);
                    }
                }
            }
        }

        if !guarded {
            return Ok(Some(check.into_string()));
        }

        let mut lines = Lines::default();
        self.guarded(&mut lines, indent, &path, &a, &b, &check.into_string());

        Ok(Some(lines.into_string()))
    }

    /// The path a difference in `field` is recorded under. Flavors without a
    /// root prefix record the bare field path.
    fn record_path(&self, field: &Field) -> String {
        if self.path_root.is_empty() {
            field.path().to_string()
        } else {
            format!("{}.{}", self.path_root, field.path())
        }
    }

    /// Emits the presence-mismatch guard around `inner`, which is only
    /// reached when both operands are present.
    fn guarded(&self, lines: &mut Lines, indent: usize, path: &str, a: &str, b: &str, inner: &str) {
        lines.push(indent, &format!("if ackcompare.HasNilDifference({a}, {b}) {{"));
        lines.push(indent + 1, &self.record(path, a, b));
        lines.push(indent, &format!("}} else if {a} != nil && {b} != nil {{"));
        lines.append(inner);
        lines.push(indent, "}");
    }

    fn record_if(
        &self,
        lines: &mut Lines,
        indent: usize,
        condition: &str,
        path: &str,
        a: &str,
        b: &str,
    ) {
        lines.push(indent, &format!("if {condition} {{"));
        lines.push(indent + 1, &self.record(path, a, b));
        lines.push(indent, "}");
    }

    fn record(&self, path: &str, a: &str, b: &str) -> String {
        format!("{delta}.Add(\"{path}\", {a}, {b})", delta = self.delta)
    }
}
