//! # Grove Core
//!
//! `grove_core` holds the vocabulary shared by every Grove crate: the
//! declarative group/ladder/user records, identifiers, the error hierarchy,
//! the engine configuration, and the traits through which the host
//! application supplies data and enforces results.
//!
//! Key concepts:
//!
//! 1. **Group**: A named bundle of capability grants and denials, with
//!    inheritance and per-context overrides.
//!
//! 2. **Ladder**: An ordered subset of groups defining a promotion path.
//!
//! 3. **User**: An identity's group memberships plus personal overrides.
//!
//! 4. **Collaborators**: The store, capability universe, context directory
//!    and identity host the engine consumes but never owns.

pub mod config;
pub mod error;
pub mod id;
pub mod traits;
pub mod types;

pub use config::{AffixMode, GroveConfig};
pub use error::{ConfigError, Error, RuntimeError, StoreError};
pub use id::IdentityId;
pub use traits::{Attachment, CapabilityUniverse, ContextDirectory, DeclarativeStore, IdentityHost};
pub use types::{ContextOverride, Group, Ladder, User};

/// Result type used across Grove crates.
pub type Result<T, E = error::Error> = std::result::Result<T, E>;

/// The wildcard character. Standalone it means "every registered capability";
/// as the last segment it means "this node and all its descendants".
pub const WILDCARD: &str = "*";

/// Separator between capability segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Value of [`Group::default`] marking a group as the default in every context.
pub const GLOBAL_DEFAULT: &str = "true";
