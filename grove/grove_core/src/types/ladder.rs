//! Rank ladders.

use serde::{Deserialize, Serialize};

/// An ordered promotion path through a subset of groups.
///
/// `groups[0]` is the lowest rank. A group may sit on any number of ladders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    pub name: String,
    pub groups: Vec<String>,
}

impl Ladder {
    /// Create a ladder from its name and ascending group names.
    pub fn new<I, S>(name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether `group_name` sits anywhere on this ladder.
    pub fn contains(&self, group_name: &str) -> bool {
        self.position_of(group_name).is_some()
    }

    /// The last rung holding `group_name`, compared case-insensitively.
    pub fn position_of(&self, group_name: &str) -> Option<usize> {
        self.groups
            .iter()
            .rposition(|g| g.eq_ignore_ascii_case(group_name))
    }

    /// The group name one rung above `group_name`.
    pub fn above(&self, group_name: &str) -> Option<&str> {
        let position = self.position_of(group_name)?;
        self.groups.get(position + 1).map(String::as_str)
    }

    /// The group name one rung below `group_name`.
    pub fn below(&self, group_name: &str) -> Option<&str> {
        let position = self.position_of(group_name)?;
        let lower = position.checked_sub(1)?;
        self.groups.get(lower).map(String::as_str)
    }
}
