//! Host event handlers.
//!
//! The host calls these from the thread that drives the
//! [`AttachmentManager`].

use tracing::{debug, warn};

use grove_core::error::{Error, RuntimeError};
use grove_core::IdentityId;
use grove_policy::{Definitions, IdentityResolver};

use crate::attachment::AttachmentManager;

/// An identity came online.
///
/// Attaches to it and, when `save_all_players` is set, persists its
/// resolved record so that first-time identities get one. An identity
/// that cannot be resolved or saved is logged and skipped.
pub fn on_join(manager: &mut AttachmentManager, id: IdentityId) -> grove_core::Result<()> {
    manager.attach(id)?;

    if !manager.config().save_all {
        return Ok(());
    }

    let env = manager.environment();
    let Some(context) = env.host.context_of(&id) else {
        debug!("Identity {} joined without a context, not saving", id);
        return Ok(());
    };

    let definitions = Definitions::load(env.store.as_ref())?;
    match IdentityResolver::new(&definitions).load(env.store.as_ref(), id, &context) {
        Ok(user) => {
            if let Err(e) = env.store.save_user(&user) {
                warn!("Could not save identity {}: {}", id, e);
            }
        }
        Err(Error::Config(e)) => warn!("Could not resolve identity {}: {}", id, e),
        Err(e) => return Err(e),
    }

    Ok(())
}

/// An identity went offline, quit or was removed by the host.
pub fn on_leave(manager: &mut AttachmentManager, id: &IdentityId) -> Result<bool, RuntimeError> {
    manager.detach(id)
}

/// An identity moved to another context; reapply everything for it.
pub fn on_context_change(
    manager: &mut AttachmentManager,
    id: IdentityId,
) -> Result<bool, RuntimeError> {
    manager.attach(id)
}
