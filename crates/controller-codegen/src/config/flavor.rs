use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Textual prefixes prepended to root-relative access expressions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrefixConfig {
    /// Prefix of the Spec root, like `.Spec` or `.Spec.ForProvider`.
    pub spec_field: String,

    /// Prefix of the Status root, like `.Status` or `.Status.AtProvider`.
    pub status_field: String,
}

/// A named bundle of generation parameters targeting one controller
/// convention.
///
/// Flavors only change prefixes and pass-through snippets, never the
/// traversal, exclusion or comparison strategy of a generator. Every
/// constructor returns an independent value, so one process can render the
/// same field model under several flavors.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlavorConfig {
    pub prefix: PrefixConfig,

    /// Whether generated resources carry controller metadata. Consumed by
    /// other generators.
    pub include_ack_metadata: bool,

    /// Statement returned by generated read-many code when no matching item
    /// is found. Consumed by other generators.
    pub set_many_output_not_found_err_return: String,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self::ack()
    }
}

impl FlavorConfig {
    /// Spec and Status fields live directly below the resource roots.
    pub fn ack() -> Self {
        Self {
            prefix: PrefixConfig {
                spec_field: ".Spec".to_owned(),
                status_field: ".Status".to_owned(),
            },
            include_ack_metadata: true,
            set_many_output_not_found_err_return: "return nil, ackerr.NotFound".to_owned(),
        }
    }

    /// Spec and Status fields are nested below provider-specific sub-objects.
    pub fn crossplane() -> Self {
        Self {
            prefix: PrefixConfig {
                spec_field: ".Spec.ForProvider".to_owned(),
                status_field: ".Status.AtProvider".to_owned(),
            },
            include_ack_metadata: false,
            set_many_output_not_found_err_return: "return cr".to_owned(),
        }
    }

    pub fn with_spec_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix.spec_field = prefix.into();
        self
    }

    pub fn spec_prefix(&self) -> &str {
        &self.prefix.spec_field
    }

    pub fn status_prefix(&self) -> &str {
        &self.prefix.status_field
    }

    pub fn include_metadata(&self) -> bool {
        self.include_ack_metadata
    }

    pub fn not_found_err_return(&self) -> &str {
        &self.set_many_output_not_found_err_return
    }
}

/// The built-in flavors.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Display, EnumIter, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlavorName {
    #[default]
    Ack,
    Crossplane,
}

impl From<FlavorName> for FlavorConfig {
    fn from(name: FlavorName) -> Self {
        match name {
            FlavorName::Ack => Self::ack(),
            FlavorName::Crossplane => Self::crossplane(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn default_is_ack() {
        let flavor = FlavorConfig::default();

        assert_eq!(flavor.spec_prefix(), ".Spec");
        assert_eq!(flavor.status_prefix(), ".Status");
        assert!(flavor.include_metadata());
        assert_eq!(flavor.not_found_err_return(), "return nil, ackerr.NotFound");
    }

    #[test]
    fn crossplane() {
        let flavor = FlavorConfig::crossplane();

        assert_eq!(flavor.spec_prefix(), ".Spec.ForProvider");
        assert_eq!(flavor.status_prefix(), ".Status.AtProvider");
        assert!(!flavor.include_metadata());
        assert_eq!(flavor.not_found_err_return(), "return cr");
    }

    #[test]
    fn flavors_are_independent_values() {
        let custom = FlavorConfig::default().with_spec_prefix(".Spec.Custom");

        assert_eq!(custom.spec_prefix(), ".Spec.Custom");
        assert_eq!(FlavorConfig::default().spec_prefix(), ".Spec");
    }

    #[test]
    fn names_round_trip() {
        for name in FlavorName::iter() {
            let parsed = FlavorName::from_str(&name.to_string()).expect("flavor name must parse");
            assert_eq!(parsed, name);
        }

        assert!(FlavorName::from_str("terraform").is_err());
    }
}
