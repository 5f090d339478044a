//! A snapshot of the declarative groups and ladders.
//!
//! Every resolution works against one snapshot so that a reload half-way
//! through a recomputation cannot mix old and new definitions.

use grove_core::error::{ConfigError, StoreError};
use grove_core::{DeclarativeStore, Group, Ladder};

/// Groups (ascending rank) and ladders, as declared.
#[derive(Clone, Debug, Default)]
pub struct Definitions {
    groups: Vec<Group>,
    ladders: Vec<Ladder>,
}

impl Definitions {
    /// Create a snapshot from already-loaded groups and ladders.
    pub fn new(groups: Vec<Group>, ladders: Vec<Ladder>) -> Self {
        Self { groups, ladders }
    }

    /// Read a fresh snapshot from `store`.
    pub fn load(store: &dyn DeclarativeStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load_groups()?, store.load_ladders()?))
    }

    /// All groups, lowest rank first.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All ladders, in declaration order.
    pub fn ladders(&self) -> &[Ladder] {
        &self.ladders
    }

    /// Look a group up by name, ignoring case.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.is_named(name))
    }

    /// Look a ladder up by name, ignoring case.
    pub fn ladder(&self, name: &str) -> Option<&Ladder> {
        self.ladders.iter().find(|l| l.is_named(name))
    }

    /// The groups behind `names`. Unknown names are skipped.
    pub fn groups_named<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Group> {
        names
            .iter()
            .filter_map(|name| self.group(name.as_ref()))
            .collect()
    }

    /// The default group for a new identity in `context`.
    ///
    /// A group whose `default` names the context wins over the global
    /// default; among equals the first declared wins.
    pub fn default_group(&self, context: &str) -> Result<&Group, ConfigError> {
        self.groups
            .iter()
            .find(|g| g.is_default_for(context))
            .or_else(|| self.groups.iter().find(|g| g.is_global_default()))
            .ok_or_else(|| ConfigError::DefaultGroupMissing {
                context: context.to_string(),
            })
    }

    /// Every group that is a default somewhere: globally, or for one of
    /// the `contexts` the host knows about.
    pub fn all_defaults(&self, contexts: &[String]) -> Vec<&Group> {
        self.groups
            .iter()
            .filter(|g| g.is_global_default() || contexts.iter().any(|c| g.is_default_for(c)))
            .collect()
    }
}

/// Keep the groups relevant in `context`, preserving order.
pub fn relevant_in<'a, I>(groups: I, context: &str) -> Vec<&'a Group>
where
    I: IntoIterator<Item = &'a Group>,
{
    groups.into_iter().filter(|g| g.applies_in(context)).collect()
}
