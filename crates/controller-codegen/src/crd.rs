use field_path::FieldPath;

use crate::{
    config::{FlavorConfig, GeneratorConfig, ResourceConfig},
    model::{BuildError, Field, FieldTree, FieldTreeBuilder, ResourceDefinition, Result},
};

/// The resource model: the Spec and Status field trees of one resource
/// together with the flavor it is generated for.
///
/// A [`Crd`] is built once per generation run from a validated definition
/// and the user overrides, and is read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crd {
    name: String,
    spec: FieldTree,
    status: FieldTree,
    flavor: FlavorConfig,
}

impl Crd {
    /// Builds the field trees of `definition` and attaches `overrides`.
    ///
    /// Every override path must match a field in either the Spec or the
    /// Status tree. Paths found in both trees are attached to both.
    pub fn try_new(
        definition: &ResourceDefinition,
        overrides: Option<&ResourceConfig>,
        flavor: FlavorConfig,
    ) -> Result<Self> {
        let name = definition.name.clone();

        let mut spec = FieldTreeBuilder::new(&name, &definition.spec, &definition.shapes)?;
        let mut status = FieldTreeBuilder::new(&name, &definition.status, &definition.shapes)?;

        for (path, config) in overrides.into_iter().flat_map(ResourceConfig::overrides) {
            let in_spec = spec.contains(path);
            let in_status = status.contains(path);

            if !in_spec && !in_status {
                return Err(BuildError::DanglingOverride {
                    resource: name,
                    path: path.clone(),
                });
            }

            if in_spec {
                spec.attach_override(path, config)?;
            }
            if in_status {
                status.attach_override(path, config)?;
            }
        }

        let spec = spec.build();
        let status = status.build();

        tracing::debug!(
            resource = %name,
            spec_fields = spec.len(),
            status_fields = status.len(),
            "built resource model"
        );

        Ok(Self {
            name,
            spec,
            status,
            flavor,
        })
    }

    /// Builds the resource model with the overrides and flavor selected in
    /// `config`.
    pub fn from_config(definition: &ResourceDefinition, config: &GeneratorConfig) -> Result<Self> {
        Self::try_new(definition, config.resource(&definition.name), config.flavor())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &FieldTree {
        &self.spec
    }

    pub fn status(&self) -> &FieldTree {
        &self.status
    }

    /// The flavor this resource was configured with.
    pub fn config(&self) -> &FlavorConfig {
        &self.flavor
    }

    /// Resolves `path` against the Spec tree first and the Status tree
    /// second.
    pub fn resolve(&self, path: &FieldPath) -> Option<&Field> {
        self.spec.resolve(path).or_else(|| self.status.resolve(path))
    }

    pub fn is_ignored(&self, path: &FieldPath) -> bool {
        self.spec.is_ignored(path) || self.status.is_ignored(path)
    }

    pub fn is_secret(&self, path: &FieldPath) -> bool {
        self.resolve(path).is_some_and(Field::is_secret)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use indoc::indoc;

    use super::*;

    fn path(input: &str) -> FieldPath {
        FieldPath::from_str(input).expect("field path must be valid")
    }

    fn broker() -> ResourceDefinition {
        ResourceDefinition::from_yaml_str(indoc! {"
            name: Broker
            shapes:
              User:
                - name: Username
                  type: string
                - name: Password
                  type: string
            spec:
              - name: BrokerName
                type: string
              - name: Users
                type: list
                element:
                  type: struct
                  shape: User
            status:
              - name: BrokerState
                type: string
              - name: BrokerName
                type: string
        "})
        .expect("definition must parse")
    }

    #[test]
    fn attach_overrides() {
        let config = GeneratorConfig::from_yaml_str(indoc! {"
            flavor: crossplane
            resources:
              Broker:
                ignore:
                  - BrokerState
                secret:
                  - Users..Password
        "})
        .expect("config must parse");

        let crd = Crd::from_config(&broker(), &config).expect("resource model must build");

        assert_eq!(crd.name(), "Broker");
        assert_eq!(crd.config(), &FlavorConfig::crossplane());
        assert!(crd.is_secret(&path("Users..Password")));
        assert!(!crd.is_secret(&path("Users..Username")));
        assert!(crd.is_ignored(&path("BrokerState")));
        assert!(crd.spec().resolve(&path("BrokerState")).is_none());
        assert!(crd.status().resolve(&path("BrokerState")).is_some());
    }

    #[test]
    fn attach_to_both_roots() {
        let overrides = ResourceConfig {
            ignore: vec![path("BrokerName")],
            secret: vec![],
        };

        let crd = Crd::try_new(&broker(), Some(&overrides), FlavorConfig::default())
            .expect("resource model must build");

        assert!(crd.spec().is_ignored(&path("BrokerName")));
        assert!(crd.status().is_ignored(&path("BrokerName")));
    }

    #[test]
    fn without_overrides() {
        let crd = Crd::try_new(&broker(), None, FlavorConfig::default())
            .expect("resource model must build");

        assert_eq!(crd.spec().len(), 4);
        assert_eq!(crd.status().len(), 2);
        assert!(crd.spec().iter().all(|field| field.config().is_none()));
    }

    #[test]
    fn dangling_override() {
        let overrides = ResourceConfig {
            ignore: vec![],
            secret: vec![path("Users..Token")],
        };

        let err = Crd::try_new(&broker(), Some(&overrides), FlavorConfig::default())
            .expect_err("override must dangle");

        assert_eq!(err, BuildError::DanglingOverride {
            resource: "Broker".into(),
            path: path("Users..Token"),
        });
        assert_eq!(
            err.to_string(),
            "override Users..Token of resource \"Broker\" does not match any field"
        );
    }

    #[test]
    fn conflicting_override() {
        let overrides = ResourceConfig {
            ignore: vec![path("Users..Password")],
            secret: vec![path("Users..Password")],
        };

        let err = Crd::try_new(&broker(), Some(&overrides), FlavorConfig::default())
            .expect_err("overrides must conflict");

        assert_eq!(err, BuildError::ConflictingOverride {
            resource: "Broker".into(),
            path: path("Users..Password"),
        });
    }
}
