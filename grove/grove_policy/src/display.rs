//! Display name composition.

use grove_core::{AffixMode, Group, GroveConfig, User};

/// Character introducing a colour code in declarative affixes.
const ALT_COLOUR_CHAR: char = '&';

/// Character the host renders colour codes with.
const COLOUR_CHAR: char = '§';

const COLOUR_CODES: &str = "0123456789abcdefklmnorx";

/// A composed name and where the host should show it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayName {
    pub prefix: String,
    pub suffix: String,

    /// `prefix + base name + suffix`, colour codes translated.
    pub name: String,

    /// Replace the chat-visible name.
    pub apply_to_chat: bool,

    /// Replace the context-listing name.
    pub apply_to_list: bool,
}

/// Combines user and group affixes according to the configured modes.
pub struct DisplayComposer<'a> {
    config: &'a GroveConfig,
}

impl<'a> DisplayComposer<'a> {
    pub fn new(config: &'a GroveConfig) -> Self {
        Self { config }
    }

    /// The prefix for `user` in `group`, with the trailing space if enabled.
    pub fn compose_prefix(&self, user: &User, group: &Group, context: &str) -> String {
        let mut prefix = merge(self.config.prefix_mode, &user.prefix, group.prefix_for(context));
        if self.config.space_after_prefix {
            prefix.push(' ');
        }
        prefix
    }

    /// The suffix for `user` in `group`, with the leading space if enabled.
    pub fn compose_suffix(&self, user: &User, group: &Group, context: &str) -> String {
        let suffix = merge(self.config.suffix_mode, &user.suffix, group.suffix_for(context));
        if self.config.space_before_suffix {
            format!(" {suffix}")
        } else {
            suffix
        }
    }

    /// Compose the full decorated name of `user`.
    ///
    /// `group` is the user's highest-ranked group in `context` and
    /// `base_name` the undecorated name the host knows the identity by.
    pub fn compose(
        &self,
        user: &User,
        group: &Group,
        context: &str,
        base_name: &str,
    ) -> DisplayName {
        let prefix = self.compose_prefix(user, group, context);
        let suffix = self.compose_suffix(user, group, context);
        let name = colourise(&format!("{prefix}{base_name}{suffix}"));

        DisplayName {
            prefix,
            suffix,
            name,
            apply_to_chat: self.config.chat_formatting,
            apply_to_list: self.config.list_formatting_applies_to(&group.name),
        }
    }
}

fn merge(mode: AffixMode, identity_value: &str, group_value: &str) -> String {
    match mode {
        AffixMode::Combine => format!("{identity_value}{group_value}"),
        AffixMode::Override if identity_value.is_empty() => group_value.to_string(),
        AffixMode::Override => identity_value.to_string(),
    }
}

/// Translate `&`-prefixed colour codes into the host's colour character.
///
/// Only recognised codes are translated; any other `&` is left alone.
pub fn colourise(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == ALT_COLOUR_CHAR && is_colour_code(*next) => {
                out.push(COLOUR_CHAR);
                out.push(next.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}

fn is_colour_code(c: char) -> bool {
    COLOUR_CODES.contains(c.to_ascii_lowercase())
}
