//! Group labels and the rule-selection predicate

use serde::{Deserialize, Serialize};

/// An ordered list of group labels.
///
/// Used both for the filter a run is created with and for the labels a rule
/// is tagged with. `None`, a missing key and an empty list all mean "no groups".
/// A single label is accepted wherever a list is.
///
/// # Examples
///
/// ```
/// use vigil_validator::schema::Groups;
///
/// let run: Groups = "admin".into();
/// assert!(run.admits(&Groups::from(["admin", "owner"])));
/// assert!(run.admits(&Groups::new()));
/// assert!(!Groups::new().admits(&Groups::from("admin")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "GroupsRepr", into = "Vec<String>")]
pub struct Groups(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupsRepr {
    One(String),
    Many(Vec<String>),
    Nothing,
}

impl From<GroupsRepr> for Groups {
    fn from(repr: GroupsRepr) -> Self {
        match repr {
            GroupsRepr::One(label) => Self(vec![label]),
            GroupsRepr::Many(labels) => Self(labels),
            GroupsRepr::Nothing => Self::new(),
        }
    }
}

impl Groups {
    /// Creates an empty group list.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns true when no labels are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `label` is one of the labels.
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|g| g == label)
    }

    /// Iterates over the labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Decides whether a rule tagged with `rule_groups` applies under this filter.
    ///
    /// | filter    | rule groups | applies                     |
    /// |-----------|-------------|-----------------------------|
    /// | empty     | empty       | yes                         |
    /// | non-empty | empty       | yes                         |
    /// | non-empty | non-empty   | iff the two lists intersect |
    /// | empty     | non-empty   | no                          |
    ///
    /// Ungrouped rules always apply. Grouped rules only apply once the run
    /// opts into one of their groups.
    pub fn admits(&self, rule_groups: &Groups) -> bool {
        if rule_groups.is_empty() {
            return true;
        }
        self.iter().any(|label| rule_groups.contains(label))
    }
}

impl From<Groups> for Vec<String> {
    fn from(groups: Groups) -> Self {
        groups.0
    }
}

impl From<&str> for Groups {
    fn from(label: &str) -> Self {
        Self(vec![label.to_owned()])
    }
}

impl From<String> for Groups {
    fn from(label: String) -> Self {
        Self(vec![label])
    }
}

impl From<Vec<String>> for Groups {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

impl From<Vec<&str>> for Groups {
    fn from(labels: Vec<&str>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<&[&str]> for Groups {
    fn from(labels: &[&str]) -> Self {
        labels.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Groups {
    fn from(labels: [&str; N]) -> Self {
        labels.into_iter().collect()
    }
}

impl<T: Into<Groups>> From<Option<T>> for Groups {
    fn from(groups: Option<T>) -> Self {
        groups.map(Into::into).unwrap_or_default()
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
