//! # Grove Policy
//!
//! `grove_policy` turns declarative groups, ladders and users into
//! resolved results:
//!
//! 1. **Group graph resolution**: flattening inheritance into allow/deny
//!    lists for a context, expanding trailing wildcards against the host's
//!    registered capabilities.
//!
//! 2. **Identity resolution**: loading or synthesizing a user and merging
//!    its own overrides with its groups, deny taking precedence.
//!
//! 3. **Rank ladders**: picking an identity's highest-ranked group and the
//!    promotion/demotion target on a ladder.
//!
//! 4. **Display composition**: building the decorated name from the user's
//!    and group's prefix/suffix.
//!
//! Nothing in this crate mutates the declarative data it resolves over.

pub mod definitions;
pub mod display;
pub mod rank;
pub mod resolve;
pub mod store;

pub use definitions::{relevant_in, Definitions};
pub use display::{colourise, DisplayComposer, DisplayName};
pub use rank::RankResolver;
pub use resolve::{expand_wildcards, GraphResolver, IdentityResolver, ResolvedCapabilities};
pub use store::InMemoryStore;
