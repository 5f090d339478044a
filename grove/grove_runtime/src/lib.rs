//! # Grove Runtime
//!
//! `grove_runtime` applies resolved results to live identities. It owns:
//!
//! 1. **The worker lane**: one dedicated thread that runs every
//!    recomputation and teardown in submission order.
//!
//! 2. **The attachment manager**: the identity to attachment table and the
//!    `start`/`stop` lifecycle around the lane.
//!
//! 3. **Host-facing entry points**: join/leave/context-change handlers, the
//!    group management command router, and the startup report.

pub mod attachment;
pub mod command;
pub mod handlers;
pub mod startup;
mod worker;

use std::sync::Arc;

use grove_core::{CapabilityUniverse, ContextDirectory, DeclarativeStore, IdentityHost};

pub use attachment::AttachmentManager;
pub use command::{route, CommandKind, CommandOutcome, CommandRejection};
pub use handlers::{on_context_change, on_join, on_leave};
pub use startup::StartupReport;

/// The host collaborators the runtime works against.
#[derive(Clone)]
pub struct Environment {
    pub store: Arc<dyn DeclarativeStore>,
    pub host: Arc<dyn IdentityHost>,
    pub universe: Arc<dyn CapabilityUniverse>,
    pub contexts: Arc<dyn ContextDirectory>,
}

impl Environment {
    pub fn new(
        store: Arc<dyn DeclarativeStore>,
        host: Arc<dyn IdentityHost>,
        universe: Arc<dyn CapabilityUniverse>,
        contexts: Arc<dyn ContextDirectory>,
    ) -> Self {
        Self {
            store,
            host,
            universe,
            contexts,
        }
    }
}
