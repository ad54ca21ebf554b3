use std::str::FromStr;

use serde::{Deserialize, Serialize, de::Visitor};

use crate::FieldPath;

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FieldPathVisitor;

        impl Visitor<'_> for FieldPathVisitor {
            type Value = FieldPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a valid dot-separated field path")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                FieldPath::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(FieldPathVisitor)
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
