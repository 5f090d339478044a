//! Host-side collaborator traits.

use std::sync::Arc;

use crate::id::IdentityId;

/// The full set of concrete capability strings the host knows about.
pub trait CapabilityUniverse: Send + Sync {
    /// Every registered capability string at query time.
    fn all_capabilities(&self) -> Vec<String>;
}

/// Enumerates the contexts (worlds) the host currently has.
pub trait ContextDirectory: Send + Sync {
    fn all_contexts(&self) -> Vec<String>;
}

/// A host-side handle through which granted capabilities are enforced.
///
/// The runtime only mutates an attachment from its worker lane, and only
/// on behalf of the identity that owns it.
pub trait Attachment: Send + Sync {
    /// Grant `capability` to the owner.
    fn grant(&self, capability: &str);

    /// Remove a previous grant of `capability`.
    fn revoke(&self, capability: &str);

    /// Everything currently granted through this attachment.
    fn granted(&self) -> Vec<String>;

    /// Detach from the owner. The handle is not used afterwards.
    fn release(&self);

    /// Revoke every current grant.
    fn clear(&self) {
        for capability in self.granted() {
            self.revoke(&capability);
        }
    }
}

/// The live identities of the host application.
pub trait IdentityHost: Send + Sync {
    /// Create a new attachment for `identity`, or `None` if it is offline.
    fn create_attachment(&self, identity: &IdentityId) -> Option<Arc<dyn Attachment>>;

    /// The context `identity` is currently in.
    fn context_of(&self, identity: &IdentityId) -> Option<String>;

    /// The undecorated name of `identity`.
    fn name_of(&self, identity: &IdentityId) -> Option<String>;

    /// Look an online identity up by its exact name.
    fn find_identity(&self, name: &str) -> Option<IdentityId>;

    /// Every identity currently online.
    fn online_identities(&self) -> Vec<IdentityId>;

    /// Replace the chat-visible name of `identity`.
    fn set_display_name(&self, identity: &IdentityId, name: &str);

    /// Replace the context-listing name of `identity`.
    fn set_list_name(&self, identity: &IdentityId, name: &str);

    /// Called after the granted set of `identity` changed.
    fn refresh_commands(&self, _identity: &IdentityId) {}
}
