//! Permission groups.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

use super::distinct;
use crate::GLOBAL_DEFAULT;

/// Changes to a group's contribution while the subject is in one context.
///
/// Empty strings mean "no override". The lists are unioned with the
/// group's own lists, never substituted for them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOverride {
    pub prefix: String,
    pub suffix: String,
    #[serde(alias = "permissions")]
    pub allow: Vec<String>,
    #[serde(alias = "deny_permissions")]
    pub deny: Vec<String>,
}

/// A named bundle of capability grants and denials.
///
/// Two groups are equal when their names match case-insensitively,
/// whatever their other fields hold.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Group name. Filled from the key the group was declared under.
    #[serde(skip)]
    pub name: String,

    /// `"true"` for the global default, a context name for a
    /// context-specific default, anything else for a regular group.
    #[serde(deserialize_with = "text_or_flag")]
    pub default: String,

    pub prefix: String,

    pub suffix: String,

    /// Names of groups whose capabilities this group inherits.
    pub inherit: Vec<String>,

    /// Contexts this group applies in. Empty means everywhere.
    #[serde(alias = "worlds")]
    pub contexts: Vec<String>,

    #[serde(alias = "permissions")]
    pub allow: Vec<String>,

    #[serde(alias = "deny_permissions")]
    pub deny: Vec<String>,

    /// Overrides keyed by context name.
    #[serde(rename = "overrides", alias = "world_overrides")]
    pub context_overrides: HashMap<String, ContextOverride>,
}

impl Group {
    /// Create an empty group with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_allow<I, S>(mut self, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = allow.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deny<I, S>(mut self, deny: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny = deny.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inherit<I, S>(mut self, inherit: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherit = inherit.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override(mut self, context: impl Into<String>, over: ContextOverride) -> Self {
        self.context_overrides.insert(context.into(), over);
        self
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this group is relevant in `context`.
    pub fn applies_in(&self, context: &str) -> bool {
        self.contexts.is_empty() || self.contexts.iter().any(|c| c == context)
    }

    /// Whether this group is the default group specific to `context`.
    pub fn is_default_for(&self, context: &str) -> bool {
        self.default.eq_ignore_ascii_case(context)
    }

    /// Whether this group is the default group in every context.
    pub fn is_global_default(&self) -> bool {
        self.default.eq_ignore_ascii_case(GLOBAL_DEFAULT)
    }

    /// The prefix members show in `context`.
    pub fn prefix_for(&self, context: &str) -> &str {
        match self.context_overrides.get(context) {
            Some(over) if !over.prefix.is_empty() => &over.prefix,
            _ => &self.prefix,
        }
    }

    /// The suffix members show in `context`.
    pub fn suffix_for(&self, context: &str) -> &str {
        match self.context_overrides.get(context) {
            Some(over) if !over.suffix.is_empty() => &over.suffix,
            _ => &self.suffix,
        }
    }

    /// Granted capabilities in `context`, without inheritance.
    pub fn allow_for(&self, context: &str) -> Vec<String> {
        match self.context_overrides.get(context) {
            Some(over) => distinct(over.allow.iter().chain(&self.allow).cloned()),
            None => self.allow.clone(),
        }
    }

    /// Denied capabilities in `context`, without inheritance.
    pub fn deny_for(&self, context: &str) -> Vec<String> {
        match self.context_overrides.get(context) {
            Some(over) => distinct(over.deny.iter().chain(&self.deny).cloned()),
            None => self.deny.clone(),
        }
    }
}

/// Accept `default: true` as well as `default: "true"`.
fn text_or_flag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Flag(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Flag(flag) => flag.to_string(),
    })
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Group {}

impl Hash for Group {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn nether_override() -> ContextOverride {
        ContextOverride {
            prefix: "[N]".to_string(),
            suffix: String::new(),
            allow: vec!["nether.build".to_string(), "chat.talk".to_string()],
            deny: vec!["chat.shout".to_string()],
        }
    }

    #[test]
    fn test_equality_ignores_case_and_fields() {
        let a = Group::new("Admin").with_prefix("[A]");
        let b = Group::new("admin").with_allow(["x.y"]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_applies_in() {
        let everywhere = Group::new("g");
        assert!(everywhere.applies_in("world"));

        let scoped = Group::new("g").with_contexts(["world"]);
        assert!(scoped.applies_in("world"));
        assert!(!scoped.applies_in("nether"));
    }

    #[test]
    fn test_default_markers() {
        let global = Group::new("g").with_default("TRUE");
        assert!(global.is_global_default());
        assert!(!global.is_default_for("world"));

        let local = Group::new("g").with_default("World");
        assert!(local.is_default_for("world"));
        assert!(!local.is_global_default());
    }

    #[test]
    fn test_override_affixes() {
        let group = Group::new("g")
            .with_prefix("[G]")
            .with_suffix("!")
            .with_override("nether", nether_override());

        assert_eq!(group.prefix_for("nether"), "[N]");
        // Empty override suffix falls back to the base value
        assert_eq!(group.suffix_for("nether"), "!");
        assert_eq!(group.prefix_for("world"), "[G]");
    }

    #[test]
    fn test_override_lists_are_unioned() {
        let group = Group::new("g")
            .with_allow(["chat.talk", "home.set"])
            .with_deny(["tp.other"])
            .with_override("nether", nether_override());

        assert_eq!(
            group.allow_for("nether"),
            vec!["nether.build", "chat.talk", "home.set"]
        );
        assert_eq!(group.deny_for("nether"), vec!["chat.shout", "tp.other"]);
        assert_eq!(group.allow_for("world"), vec!["chat.talk", "home.set"]);
        assert_eq!(group.deny_for("world"), vec!["tp.other"]);
    }
}
