//! Engine configuration.
//!
//! Configuration is supplied by the host, read once and handed to the
//! runtime by value. Every key is optional; missing keys take the defaults
//! listed on [`GroveConfig`].

use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// How an identity's own prefix/suffix interacts with its group's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum AffixMode {
    /// A non-empty identity value replaces the group value.
    #[default]
    Override,

    /// The identity value is prepended to the group value.
    Combine,
}

impl AffixMode {
    /// Parse a mode name. Unrecognized names fall back to [`AffixMode::Override`].
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_uppercase().as_str() {
            "COMBINE" => Self::Combine,
            _ => Self::Override,
        }
    }
}

impl From<String> for AffixMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for AffixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "OVERRIDE"),
            Self::Combine => write!(f, "COMBINE"),
        }
    }
}

/// Host-supplied configuration for the permissions engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroveConfig {
    /// Persist every identity the first time it joins.
    #[serde(rename = "save_all_players")]
    pub save_all: bool,

    /// Replace the chat-visible name with the composed name.
    pub chat_formatting: bool,

    /// Replace the context-listing name with the composed name.
    #[serde(rename = "tab_list_formatting")]
    pub list_formatting: bool,

    /// Only replace listing names for members of [`GroveConfig::list_groups`].
    #[serde(rename = "tab_list_restrict_groups")]
    pub list_restricted: bool,

    /// Groups whose members may have their listing name replaced.
    #[serde(rename = "tab_list_groups")]
    pub list_groups: Vec<String>,

    #[serde(rename = "user_prefix_mode")]
    pub prefix_mode: AffixMode,

    #[serde(rename = "user_suffix_mode")]
    pub suffix_mode: AffixMode,

    pub space_after_prefix: bool,

    pub space_before_suffix: bool,
}

impl Default for GroveConfig {
    fn default() -> Self {
        Self {
            save_all: true,
            chat_formatting: true,
            list_formatting: true,
            list_restricted: false,
            list_groups: Vec::new(),
            prefix_mode: AffixMode::Override,
            suffix_mode: AffixMode::Override,
            space_after_prefix: true,
            space_before_suffix: true,
        }
    }
}

impl GroveConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Whether the listing name of a member of `group_name` may be replaced.
    pub fn list_formatting_applies_to(&self, group_name: &str) -> bool {
        if !self.list_formatting {
            return false;
        }
        !self.list_restricted
            || self
                .list_groups
                .iter()
                .any(|g| g.eq_ignore_ascii_case(group_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_mode_parse_is_case_insensitive() {
        assert_eq!(AffixMode::parse("combine"), AffixMode::Combine);
        assert_eq!(AffixMode::parse("Combine"), AffixMode::Combine);
        assert_eq!(AffixMode::parse("OVERRIDE"), AffixMode::Override);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_override() {
        assert_eq!(AffixMode::parse("merge"), AffixMode::Override);
        assert_eq!(AffixMode::parse(""), AffixMode::Override);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = GroveConfig::from_toml_str("").unwrap();
        assert_eq!(config, GroveConfig::default());
        assert!(config.save_all);
        assert!(config.space_after_prefix);
    }

    #[test]
    fn test_toml_overrides() {
        let config = GroveConfig::from_toml_str(
            r#"
            save_all_players = false
            user_prefix_mode = "combine"
            user_suffix_mode = "bogus"
            tab_list_restrict_groups = true
            tab_list_groups = ["Admin"]
            "#,
        )
        .unwrap();

        assert!(!config.save_all);
        assert_eq!(config.prefix_mode, AffixMode::Combine);
        assert_eq!(config.suffix_mode, AffixMode::Override);
        assert!(config.list_restricted);
        assert_eq!(config.list_groups, vec!["Admin".to_string()]);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let result = GroveConfig::from_toml_str("save_all_players = [");
        assert_matches!(result, Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_list_formatting_restriction() {
        let mut config = GroveConfig::default();
        assert!(config.list_formatting_applies_to("anyone"));

        config.list_restricted = true;
        config.list_groups = vec!["admin".to_string()];
        assert!(config.list_formatting_applies_to("Admin"));
        assert!(!config.list_formatting_applies_to("member"));

        config.list_formatting = false;
        assert!(!config.list_formatting_applies_to("admin"));
    }
}
