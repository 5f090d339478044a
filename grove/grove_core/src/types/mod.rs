//! Declarative records the engine resolves over.
//!
//! These are immutable inputs as far as resolution is concerned; only the
//! group-assignment commands write back, and they do so through a
//! [`DeclarativeStore`](crate::traits::DeclarativeStore).

mod group;
mod ladder;
mod user;

pub use group::{ContextOverride, Group};
pub use ladder::Ladder;
pub use user::User;

use std::collections::HashSet;

/// Remove duplicates, keeping the first occurrence of each entry.
pub fn distinct<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
