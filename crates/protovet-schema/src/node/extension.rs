use crate::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-level rule set.
pub const RULES: &str = "validate.rules";

/// Message-level switch that turns every check off.
pub const DISABLED: &str = "validate.disabled";

/// Message-level switch that suppresses validator generation entirely.
pub const IGNORED: &str = "validate.ignored";

/// Message-level prefix for error-construction methods.
pub const ERROR_BASE: &str = "validate.error_base";

/// Oneof-level rules.
pub const ONEOF: &str = "validate.oneof";

///
/// Extensions
/// opaque extension payloads attached to a descriptor, keyed by extension name
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, Value>);

impl Extensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Decode the payload stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SchemaError> {
        self.0
            .get(key)
            .map(|value| T::deserialize(value).map_err(|e| SchemaError::malformed(key, e)))
            .transpose()
    }

    // flag
    // absent boolean extensions read as false
    pub fn flag(&self, key: &str) -> Result<bool, SchemaError> {
        Ok(self.get::<bool>(key)?.unwrap_or(false))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
