//! A single schema entry

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::Groups;

/// One entry in a field's rule list.
///
/// A rule names a sanitizer, a validator, or both; the sanitizer pass only
/// looks at `sanitizer` and the validator pass only looks at `validator`.
/// Every other key of the document is kept as an option and handed to the
/// function through the rule.
///
/// # Examples
///
/// ```
/// use vigil_validator::schema::Rule;
///
/// let rule: Rule = serde_json::from_str(r#"{"validator": "min", "min": 18, "groups": "adult"}"#).unwrap();
/// assert_eq!(rule.validator_name(), Some("min"));
/// assert_eq!(rule.option_as::<u32>("min"), Some(18));
/// assert!(rule.groups().contains("adult"));
///
/// let built = Rule::validator("min").with_option("min", 18).in_groups("adult");
/// assert_eq!(built, rule);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sanitizer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator: Option<String>,

    #[serde(default, skip_serializing_if = "Groups::is_empty")]
    groups: Groups,

    #[serde(flatten)]
    options: Map<String, Value>,
}

impl Rule {
    /// Creates a rule applying the named sanitizer.
    pub fn sanitizer(name: impl Into<String>) -> Self {
        Self {
            sanitizer: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a rule applying the named validator.
    pub fn validator(name: impl Into<String>) -> Self {
        Self {
            validator: Some(name.into()),
            ..Self::default()
        }
    }

    /// Restricts the rule to the given groups.
    #[must_use = "builder methods must be chained or built"]
    pub fn in_groups(mut self, groups: impl Into<Groups>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Adds an option passed through to the rule's function.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Name of the sanitizer, if any. An empty name counts as none.
    pub fn sanitizer_name(&self) -> Option<&str> {
        self.sanitizer.as_deref().filter(|name| !name.is_empty())
    }

    /// Name of the validator, if any. An empty name counts as none.
    pub fn validator_name(&self) -> Option<&str> {
        self.validator.as_deref().filter(|name| !name.is_empty())
    }

    /// Groups the rule is restricted to.
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// All extra options.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Looks up a single option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Looks up a single option and deserializes it.
    ///
    /// Returns `None` when the option is missing or has the wrong shape.
    pub fn option_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.option(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
