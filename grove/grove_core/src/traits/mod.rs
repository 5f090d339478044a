//! Interfaces to the host application.
//!
//! The engine owns no I/O. Everything it reads (declarative data, the
//! registered capability strings, the list of contexts, which identities
//! are online) and everything it writes (persisted users, granted
//! capabilities, display names) goes through these traits.

pub mod host;
pub mod store;

pub use host::{Attachment, CapabilityUniverse, ContextDirectory, IdentityHost};
pub use store::DeclarativeStore;
