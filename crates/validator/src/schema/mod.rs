//! Declarative schemas
//!
//! A [`Schema`] maps field keys to ordered lists of [`Rule`]s. Both orders
//! matter: fields are visited in insertion (document) order, and each field's
//! rules run in list order.
//!
//! Schemas are plain data and round-trip through serde:
//!
//! ```
//! use vigil_validator::schema::{Rule, Schema};
//!
//! let schema = Schema::from_json_str(r#"{
//!     "age":  [{"sanitizer": "to_int"}, {"validator": "min", "min": 18}],
//!     "name": [{"validator": "required"}]
//! }"#).unwrap();
//!
//! assert_eq!(schema.keys().collect::<Vec<_>>(), ["age", "name"]);
//! assert_eq!(schema.get("age").unwrap()[1], Rule::validator("min").with_option("min", 18));
//! ```

mod group;
mod rule;

pub use group::Groups;
pub use rule::Rule;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Errors raised while loading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The JSON document does not describe a schema.
    #[error("invalid JSON schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML document does not describe a schema.
    #[cfg(feature = "yaml")]
    #[error("invalid YAML schema document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Mapping from field key to its ordered rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, Vec<Rule>>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends rules to a field, adding the field at the end if it is new.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, key: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.entry(key.into()).or_default().extend(rules);
        self
    }

    /// Replaces a field's rules, returning the previous ones.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, rules: Vec<Rule>) -> Option<Vec<Rule>> {
        self.fields.insert(key.into(), rules)
    }

    /// Rules for a field.
    pub fn get(&self, key: &str) -> Option<&[Rule]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    /// Iterates over fields and their rules in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields
            .iter()
            .map(|(key, rules)| (key.as_str(), rules.as_slice()))
    }

    /// Field keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a schema from a JSON document.
    pub fn from_json_str(document: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Converts an already-parsed JSON value into a schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parses a schema from a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(document: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(document)?)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Rule>)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Rule>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, rules)| (key.into(), rules))
                .collect(),
        }
    }
}
