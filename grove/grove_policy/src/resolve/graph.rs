//! Group graph resolution.

use std::collections::HashSet;

use grove_core::types::distinct;
use grove_core::{Group, SEGMENT_SEPARATOR, WILDCARD};

use super::ResolvedCapabilities;
use crate::definitions::Definitions;

/// Flattens groups and everything they inherit into allow/deny lists.
///
/// The resolver does no context filtering of its own: callers pass only
/// the groups relevant in the context. Inherited groups are followed
/// regardless of their own `contexts`.
pub struct GraphResolver<'a> {
    /// Where inherited group names are looked up.
    definitions: &'a Definitions,

    /// Registered capability strings, used for wildcard expansion.
    universe: &'a [String],
}

impl<'a> GraphResolver<'a> {
    /// Create a resolver over `definitions`, expanding against `universe`.
    pub fn new(definitions: &'a Definitions, universe: &'a [String]) -> Self {
        Self {
            definitions,
            universe,
        }
    }

    /// Resolve `groups` in `context`.
    ///
    /// # Arguments
    ///
    /// * `groups` - The groups to flatten, already filtered to the context.
    /// * `context` - The context whose overrides apply.
    ///
    /// # Returns
    ///
    /// The deduplicated allow and deny lists, with trailing wildcards
    /// expanded. Allow entries are not yet filtered by the deny list.
    pub fn resolve(&self, groups: &[&Group], context: &str) -> ResolvedCapabilities {
        let mut visited = HashSet::new();
        let mut allow = Vec::new();
        let mut deny = Vec::new();

        self.collect(groups, context, &mut visited, &mut allow, &mut deny);

        ResolvedCapabilities {
            allow: expand_wildcards(allow, self.universe),
            deny: expand_wildcards(deny, self.universe),
        }
    }

    /// Gather own entries first, then inherited ones, depth first.
    ///
    /// A group name is entered at most once per resolution, so inheritance
    /// cycles terminate and diamonds are not walked twice.
    fn collect(
        &self,
        groups: &[&Group],
        context: &str,
        visited: &mut HashSet<String>,
        allow: &mut Vec<String>,
        deny: &mut Vec<String>,
    ) {
        let fresh: Vec<&Group> = groups
            .iter()
            .copied()
            .filter(|g| visited.insert(g.name.to_ascii_lowercase()))
            .collect();

        for group in &fresh {
            allow.extend(group.allow_for(context));
            deny.extend(group.deny_for(context));
        }

        for group in &fresh {
            let inherited = self.definitions.groups_named(&group.inherit);
            self.collect(&inherited, context, visited, allow, deny);
        }
    }
}

/// Add the registered descendants of every trailing-wildcard entry.
///
/// `"ns.*"` pulls in every capability starting with `"ns."` and is itself
/// kept. The bare wildcard is left untouched; identity resolution swaps it
/// for the whole universe. The result is deduplicated, and expanding it
/// again adds nothing.
pub fn expand_wildcards(entries: Vec<String>, universe: &[String]) -> Vec<String> {
    let prefixes: Vec<String> = entries
        .iter()
        .filter_map(|entry| descendant_prefix(entry).map(str::to_string))
        .collect();

    let mut expanded = entries;
    for prefix in &prefixes {
        expanded.extend(
            universe
                .iter()
                .filter(|capability| capability.starts_with(prefix.as_str()))
                .cloned(),
        );
    }

    distinct(expanded)
}

/// `"ns.*"` -> `"ns."`. `None` for the bare wildcard, plain entries and a
/// `*` that is not a whole segment, such as `"ns*"`.
fn descendant_prefix(entry: &str) -> Option<&str> {
    if entry == WILDCARD {
        return None;
    }
    let stem = entry.strip_suffix(WILDCARD)?;
    if stem.ends_with(SEGMENT_SEPARATOR) {
        Some(stem)
    } else {
        None
    }
}
