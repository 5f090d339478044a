//! Capability resolution.
//!
//! [`GraphResolver`] flattens a set of groups; [`IdentityResolver`] layers
//! a user's own overrides and the deny-wins rule on top.

mod graph;
mod identity;

pub use graph::{expand_wildcards, GraphResolver};
pub use identity::IdentityResolver;

use std::collections::HashSet;

/// Flattened, deduplicated allow and deny lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedCapabilities {
    /// Granted capability strings.
    pub allow: Vec<String>,

    /// Denied capability strings.
    pub deny: Vec<String>,
}

impl ResolvedCapabilities {
    /// Whether `capability` is in the allow list.
    pub fn allows(&self, capability: &str) -> bool {
        self.allow.iter().any(|c| c == capability)
    }

    /// Whether `capability` is in the deny list.
    pub fn denies(&self, capability: &str) -> bool {
        self.deny.iter().any(|c| c == capability)
    }

    /// Drop every allowed entry that is also denied.
    pub(crate) fn apply_denials(&mut self) {
        let denied: HashSet<&str> = self.deny.iter().map(String::as_str).collect();
        self.allow.retain(|c| !denied.contains(c.as_str()));
    }
}
