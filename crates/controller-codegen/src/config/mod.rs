//! User supplied generator configuration: which flavor to generate for and
//! which fields of each resource are ignored or secret.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use field_path::FieldPath;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::model::FieldConfig;

mod flavor;

pub use flavor::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read generator config from {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse generator config from {path:?}"))]
    ParseFile {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse generator config"))]
    ParseYaml { source: serde_yaml::Error },
}

/// Selects a built-in flavor by name or provides a complete custom one.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlavorSelection {
    Named(FlavorName),
    Custom(FlavorConfig),
}

impl Default for FlavorSelection {
    fn default() -> Self {
        Self::Named(FlavorName::default())
    }
}

impl From<FlavorSelection> for FlavorConfig {
    fn from(selection: FlavorSelection) -> Self {
        match selection {
            FlavorSelection::Named(name) => name.into(),
            FlavorSelection::Custom(config) => config,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub flavor: FlavorSelection,

    /// Overrides keyed by resource name.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl GeneratorConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context(ParseYamlSnafu)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        serde_yaml::from_str(&contents).context(ParseFileSnafu { path })
    }

    /// Returns a fresh [`FlavorConfig`] for the selected flavor.
    pub fn flavor(&self) -> FlavorConfig {
        self.flavor.clone().into()
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.get(name)
    }
}

/// The ignore and secret paths of one resource. Paths are relative to the
/// Spec or Status root and may contain element wildcards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub ignore: Vec<FieldPath>,

    #[serde(default)]
    pub secret: Vec<FieldPath>,
}

impl ResourceConfig {
    /// Returns `true` if `path` or one of its ancestors is ignored.
    pub fn is_ignored(&self, path: &FieldPath) -> bool {
        self.ignore
            .iter()
            .any(|ignored| ignored == path || path.is_descendant_of(ignored))
    }

    pub fn is_secret(&self, path: &FieldPath) -> bool {
        self.secret.contains(path)
    }

    /// All overrides as they get attached to the field model, ignored paths
    /// first.
    pub fn overrides(&self) -> impl Iterator<Item = (&FieldPath, FieldConfig)> {
        let ignored = self.ignore.iter().map(|path| (path, FieldConfig::ignored()));
        let secret = self.secret.iter().map(|path| (path, FieldConfig::secret()));

        ignored.chain(secret)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, str::FromStr};

    use indoc::indoc;

    use super::*;

    fn path(input: &str) -> FieldPath {
        FieldPath::from_str(input).expect("field path must be valid")
    }

    #[test]
    fn parse_named_flavor() {
        let config = GeneratorConfig::from_yaml_str(indoc! {"
            flavor: crossplane
            resources:
              Bucket:
                ignore:
                  - ACL
              Broker:
                secret:
                  - Users..Password
        "})
        .expect("config must parse");

        assert_eq!(config.flavor(), FlavorConfig::crossplane());

        let bucket = config.resource("Bucket").expect("Bucket must be configured");
        assert!(bucket.is_ignored(&path("ACL")));
        assert!(bucket.secret.is_empty());

        let broker = config.resource("Broker").expect("Broker must be configured");
        assert!(broker.is_secret(&path("Users..Password")));
        assert!(!broker.is_secret(&path("Users")));

        assert!(config.resource("Function").is_none());
    }

    #[test]
    fn parse_custom_flavor() {
        let config = GeneratorConfig::from_yaml_str(indoc! {"
            flavor:
              prefix:
                spec_field: .Spec.Parameters
                status_field: .Status.Observed
              include_ack_metadata: false
              set_many_output_not_found_err_return: return nil
        "})
        .expect("config must parse");

        let flavor = config.flavor();
        assert_eq!(flavor.spec_prefix(), ".Spec.Parameters");
        assert_eq!(flavor.status_prefix(), ".Status.Observed");
        assert_eq!(flavor.not_found_err_return(), "return nil");
        assert!(config.resources.is_empty());
    }

    #[test]
    fn empty_config_defaults_to_ack() {
        let config = GeneratorConfig::from_yaml_str("{}").expect("config must parse");
        assert_eq!(config.flavor(), FlavorConfig::ack());
    }

    #[test]
    fn reject_invalid_paths() {
        let result = GeneratorConfig::from_yaml_str(indoc! {"
            resources:
              Bucket:
                ignore:
                  - Logging...Target
        "});

        assert!(matches!(result, Err(Error::ParseYaml { .. })));
    }

    #[test]
    fn ignore_covers_descendants() {
        let config = ResourceConfig {
            ignore: vec![path("Logging")],
            secret: vec![],
        };

        assert!(config.is_ignored(&path("Logging")));
        assert!(config.is_ignored(&path("Logging.LoggingEnabled.TargetBucket")));
        assert!(!config.is_ignored(&path("LoggingLevel")));
    }

    #[test]
    fn overrides_in_order() {
        let config = ResourceConfig {
            ignore: vec![path("ACL")],
            secret: vec![path("Users..Password")],
        };

        let overrides: Vec<_> = config.overrides().collect();
        assert_eq!(overrides, vec![
            (&path("ACL"), FieldConfig::ignored()),
            (&path("Users..Password"), FieldConfig::secret()),
        ]);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file must be created");
        file.write_all(b"flavor: ack\nresources:\n  Bucket:\n    ignore: [ACL]\n")
            .expect("config must be written");

        let config = GeneratorConfig::from_file(file.path()).expect("config must load");
        assert_eq!(config.resources.len(), 1);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let result = GeneratorConfig::from_file(dir.path().join("generator.yaml"));

        assert!(matches!(result, Err(Error::ReadFile { .. })));
    }
}
