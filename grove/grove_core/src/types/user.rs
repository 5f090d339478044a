//! Per-identity permission records.

use serde::{Deserialize, Serialize};

use crate::id::IdentityId;

/// An identity's group memberships and personal overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Filled from the key the user was stored under.
    #[serde(skip)]
    pub id: IdentityId,

    pub prefix: String,

    pub suffix: String,

    /// Names of the groups this identity belongs to.
    pub groups: Vec<String>,

    /// Identity-level extra capabilities.
    #[serde(alias = "permissions")]
    pub allow: Vec<String>,

    /// Identity-level revocations.
    #[serde(alias = "deny_permissions")]
    pub deny: Vec<String>,
}

impl User {
    /// Create a user with no overrides and the given memberships.
    pub fn new<I, S>(id: IdentityId, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            groups: groups.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Whether the identity is a member of `group_name`, ignoring case.
    pub fn is_member_of(&self, group_name: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group_name))
    }
}
