//! Identity resolution.

use grove_core::error::ConfigError;
use grove_core::types::distinct;
use grove_core::{DeclarativeStore, Group, IdentityId, User, WILDCARD};
use tracing::debug;

use super::{GraphResolver, ResolvedCapabilities};
use crate::definitions::{relevant_in, Definitions};
use crate::rank::RankResolver;

/// Resolves users and their effective capabilities against one snapshot
/// of the definitions.
pub struct IdentityResolver<'a> {
    definitions: &'a Definitions,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(definitions: &'a Definitions) -> Self {
        Self { definitions }
    }

    /// Pick the user record for `id` in `context`.
    ///
    /// A persisted record is returned as-is. Otherwise a user holding only
    /// the context's default group is synthesized; it is not persisted.
    pub fn resolve(
        &self,
        id: IdentityId,
        persisted: Option<User>,
        context: &str,
    ) -> Result<User, ConfigError> {
        if let Some(user) = persisted {
            return Ok(user);
        }

        let default = self.definitions.default_group(context)?;
        debug!("Synthesized user {} in default group {}", id, default.name);
        Ok(User::new(id, [default.name.clone()]))
    }

    /// Load the record for `id` from `store`, or synthesize one.
    pub fn load(
        &self,
        store: &dyn DeclarativeStore,
        id: IdentityId,
        context: &str,
    ) -> grove_core::Result<User> {
        let persisted = store.load_user(&id)?;
        Ok(self.resolve(id, persisted, context)?)
    }

    /// The user's groups that apply in `context`, in membership order.
    pub fn relevant_groups(&self, user: &User, context: &str) -> Vec<&'a Group> {
        relevant_in(self.definitions.groups_named(&user.groups), context)
    }

    /// The user's highest-ranked group among those relevant in `context`.
    pub fn highest_group(&self, user: &User, context: &str) -> Option<&'a Group> {
        RankResolver::new(self.definitions).highest_ranked(&self.relevant_groups(user, context))
    }

    /// The capabilities `user` ends up with in `context`.
    ///
    /// # Arguments
    ///
    /// * `user` - The resolved user.
    /// * `context` - The context the user is in.
    /// * `universe` - Every registered capability string.
    ///
    /// # Returns
    ///
    /// The final allow list, with a bare wildcard replaced by the whole
    /// universe and every denied entry removed, and the deny list it was
    /// filtered with.
    pub fn effective(
        &self,
        user: &User,
        context: &str,
        universe: &[String],
    ) -> ResolvedCapabilities {
        let groups = self.relevant_groups(user, context);
        let resolved = GraphResolver::new(self.definitions, universe).resolve(&groups, context);

        let deny = distinct(user.deny.iter().cloned().chain(resolved.deny));

        let mut allow: Vec<String> = user.allow.iter().cloned().chain(resolved.allow).collect();
        if allow.iter().any(|c| c == WILDCARD) {
            allow.retain(|c| c != WILDCARD);
            allow.extend(universe.iter().cloned());
        }

        let mut effective = ResolvedCapabilities {
            allow: distinct(allow),
            deny,
        };
        effective.apply_denials();
        effective
    }
}
