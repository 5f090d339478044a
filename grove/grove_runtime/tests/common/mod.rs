//! Test doubles for the host side of the runtime.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use grove_core::{
    Attachment, CapabilityUniverse, ContextDirectory, GroveConfig, IdentityHost, IdentityId,
};
use grove_policy::InMemoryStore;
use grove_runtime::{AttachmentManager, Environment};

pub const SERVER: &str = r#"
groups:
  member:
    default: "true"
    prefix: "&7[Member]"
    allow: [chat.talk, "home.*"]
    deny: [home.other]
  builder:
    default: creative
    contexts: [creative]
    prefix: "[Builder]"
    allow: [build.fly]
  mod:
    inherit: [member]
    prefix: "[Mod]"
    allow: [kick.use]
  admin:
    inherit: [mod]
    prefix: "[Admin]"
    allow: ["*"]
    deny: [server.stop]
ladders:
  staff: [member, mod, admin]
"#;

pub const UNIVERSE: &[&str] = &[
    "chat.talk",
    "home.set",
    "home.other",
    "kick.use",
    "build.fly",
    "server.stop",
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Records grants in a set and remembers whether it was released.
#[derive(Default)]
pub struct MockAttachment {
    granted: Mutex<BTreeSet<String>>,
    released: AtomicBool,
}

impl MockAttachment {
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.granted.lock().clone()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Attachment for MockAttachment {
    fn grant(&self, capability: &str) {
        self.granted.lock().insert(capability.to_string());
    }

    fn revoke(&self, capability: &str) {
        self.granted.lock().remove(capability);
    }

    fn granted(&self) -> Vec<String> {
        self.granted.lock().iter().cloned().collect()
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

struct Online {
    name: String,
    context: String,
}

/// A host with a mutable set of online identities.
#[derive(Default)]
pub struct MockHost {
    online: Mutex<HashMap<IdentityId, Online>>,
    attachments: Mutex<HashMap<IdentityId, Arc<MockAttachment>>>,
    display_names: Mutex<HashMap<IdentityId, String>>,
    list_names: Mutex<HashMap<IdentityId, String>>,
    refreshes: AtomicUsize,
}

impl MockHost {
    /// Bring a new identity online in `context`.
    pub fn join(&self, name: &str, context: &str) -> IdentityId {
        let id = IdentityId::new();
        self.online.lock().insert(
            id,
            Online {
                name: name.to_string(),
                context: context.to_string(),
            },
        );
        id
    }

    pub fn move_to(&self, id: &IdentityId, context: &str) {
        if let Some(online) = self.online.lock().get_mut(id) {
            online.context = context.to_string();
        }
    }

    pub fn leave(&self, id: &IdentityId) {
        self.online.lock().remove(id);
    }

    /// The most recent attachment created for `id`.
    pub fn attachment_of(&self, id: &IdentityId) -> Option<Arc<MockAttachment>> {
        self.attachments.lock().get(id).cloned()
    }

    /// What `id` is currently granted through its latest attachment.
    pub fn granted(&self, id: &IdentityId) -> BTreeSet<String> {
        self.attachment_of(id)
            .map(|attachment| attachment.snapshot())
            .unwrap_or_default()
    }

    pub fn display_name(&self, id: &IdentityId) -> Option<String> {
        self.display_names.lock().get(id).cloned()
    }

    pub fn list_name(&self, id: &IdentityId) -> Option<String> {
        self.list_names.lock().get(id).cloned()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl IdentityHost for MockHost {
    fn create_attachment(&self, identity: &IdentityId) -> Option<Arc<dyn Attachment>> {
        if !self.online.lock().contains_key(identity) {
            return None;
        }
        let attachment = Arc::new(MockAttachment::default());
        self.attachments.lock().insert(*identity, attachment.clone());
        Some(attachment)
    }

    fn context_of(&self, identity: &IdentityId) -> Option<String> {
        self.online.lock().get(identity).map(|o| o.context.clone())
    }

    fn name_of(&self, identity: &IdentityId) -> Option<String> {
        self.online.lock().get(identity).map(|o| o.name.clone())
    }

    fn find_identity(&self, name: &str) -> Option<IdentityId> {
        self.online
            .lock()
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(id, _)| *id)
    }

    fn online_identities(&self) -> Vec<IdentityId> {
        self.online.lock().keys().copied().collect()
    }

    fn set_display_name(&self, identity: &IdentityId, name: &str) {
        self.display_names.lock().insert(*identity, name.to_string());
    }

    fn set_list_name(&self, identity: &IdentityId, name: &str) {
        self.list_names.lock().insert(*identity, name.to_string());
    }

    fn refresh_commands(&self, _identity: &IdentityId) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct StaticUniverse(pub Vec<String>);

impl CapabilityUniverse for StaticUniverse {
    fn all_capabilities(&self) -> Vec<String> {
        self.0.clone()
    }
}

pub struct StaticContexts(pub Vec<String>);

impl ContextDirectory for StaticContexts {
    fn all_contexts(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// A stopped manager over `yaml` plus handles on its collaborators.
pub struct Harness {
    pub store: InMemoryStore,
    pub host: Arc<MockHost>,
    pub manager: AttachmentManager,
}

pub fn harness_with(yaml: &str, config: GroveConfig) -> Harness {
    init_tracing();

    let store = InMemoryStore::from_yaml(yaml).unwrap();
    let host = Arc::new(MockHost::default());
    let env = Environment::new(
        Arc::new(store.clone()),
        host.clone(),
        Arc::new(StaticUniverse(UNIVERSE.iter().map(|s| s.to_string()).collect())),
        Arc::new(StaticContexts(vec!["world".to_string(), "creative".to_string()])),
    );

    Harness {
        store,
        host,
        manager: AttachmentManager::new(env, config),
    }
}

pub fn harness() -> Harness {
    harness_with(SERVER, GroveConfig::default())
}
