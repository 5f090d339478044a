//! In-memory declarative store.
//!
//! Holds groups, ladders and users in memory. It can be seeded from a YAML
//! document laid out as:
//!
//! ```yaml
//! groups:
//!   member:
//!     default: "true"
//!     allow: [chat.talk]
//!     overrides:
//!       nether:
//!         prefix: "[N]"
//!         allow: [nether.portal]
//!         deny: [home.set]
//!   admin:
//!     inherit: [member]
//!     allow: ["*"]
//! ladders:
//!   staff: [member, admin]
//! users:
//!   0b5f0c0e-7c3a-4a59-9d59-6f3b3c8c2b1e:
//!     groups: [admin]
//! ```
//!
//! Groups keep the order they are declared in, which is their rank. The
//! `overrides` map is keyed by context name; each entry may set `prefix`,
//! `suffix`, `allow` and `deny`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use grove_core::error::StoreError;
use grove_core::{DeclarativeStore, Group, IdentityId, Ladder, User};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    groups: Mapping,
    ladders: Mapping,
    users: Mapping,
}

/// A [`DeclarativeStore`] kept entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    /// Groups in declaration order.
    groups: Arc<RwLock<Vec<Group>>>,

    /// Ladders in declaration order.
    ladders: Arc<RwLock<Vec<Ladder>>>,

    users: Arc<DashMap<IdentityId, User>>,

    /// When set, every write fails with [`StoreError::WriteFailed`].
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `groups` and `ladders` and no users.
    pub fn with_definitions(groups: Vec<Group>, ladders: Vec<Ladder>) -> Self {
        let store = Self::new();
        store.replace_definitions(groups, ladders);
        store
    }

    /// Parse a store from a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, StoreError> {
        let document: Document =
            serde_yaml::from_str(text).map_err(|e| StoreError::Parse(e.to_string()))?;

        let mut groups = Vec::with_capacity(document.groups.len());
        for (key, value) in document.groups {
            let name = key_name(&key)?;
            let mut group = match value {
                Value::Null => Group::default(),
                value => serde_yaml::from_value::<Group>(value)
                    .map_err(|e| StoreError::Parse(format!("group '{}': {}", name, e)))?,
            };
            group.name = name;
            groups.push(group);
        }

        let mut ladders = Vec::with_capacity(document.ladders.len());
        for (key, value) in document.ladders {
            let name = key_name(&key)?;
            let members = serde_yaml::from_value::<Vec<String>>(value)
                .map_err(|e| StoreError::Parse(format!("ladder '{}': {}", name, e)))?;
            ladders.push(Ladder::new(name, members));
        }

        let store = Self::with_definitions(groups, ladders);
        for (key, value) in document.users {
            let raw = key_name(&key)?;
            let id: IdentityId = raw
                .parse()
                .map_err(|e| StoreError::Parse(format!("user '{}': {}", raw, e)))?;
            let mut user = match value {
                Value::Null => User::default(),
                value => serde_yaml::from_value::<User>(value)
                    .map_err(|e| StoreError::Parse(format!("user '{}': {}", raw, e)))?,
            };
            user.id = id;
            store.users.insert(id, user);
        }

        Ok(store)
    }

    /// Swap in new groups and ladders, keeping users.
    pub fn replace_definitions(&self, groups: Vec<Group>, ladders: Vec<Ladder>) {
        *self.groups.write() = groups;
        *self.ladders.write() = ladders;
    }

    /// Store `user` directly, bypassing the write switch.
    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Make every following write fail, or succeed again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every persisted user, in no particular order.
    pub fn users(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            warn!("Rejecting write to in-memory store");
            return Err(StoreError::WriteFailed("store is read-only".to_string()));
        }
        Ok(())
    }
}

fn key_name(key: &Value) -> Result<String, StoreError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(StoreError::Parse(format!("unsupported key: {:?}", other))),
    }
}

impl DeclarativeStore for InMemoryStore {
    fn load_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.groups.read().clone())
    }

    fn load_ladders(&self) -> Result<Vec<Ladder>, StoreError> {
        Ok(self.ladders.read().clone())
    }

    fn load_user(&self, id: &IdentityId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.check_writable()?;
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    fn set_user_groups(&self, id: &IdentityId, groups: &[String]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.users
            .entry(*id)
            .or_insert_with(|| User::new(*id, Vec::<String>::new()))
            .groups = groups.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const DOCUMENT: &str = r#"
groups:
  member:
    default: true
    prefix: "&7"
    permissions: [chat.talk]
  builder:
    worlds: [creative]
    overrides:
      creative:
        prefix: "[B]"
        deny: [build.tnt]
  admin:
    inherit: [member]
    allow: ["*"]
  ghost:
ladders:
  staff: [member, admin]
users:
  0b5f0c0e-7c3a-4a59-9d59-6f3b3c8c2b1e:
    prefix: "[Me]"
    groups: [admin]
"#;

    #[test]
    fn test_from_yaml_keeps_declaration_order() {
        let store = InMemoryStore::from_yaml(DOCUMENT).unwrap();
        let names: Vec<_> = store
            .load_groups()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["member", "builder", "admin", "ghost"]);
    }

    #[test]
    fn test_from_yaml_reads_fields_and_aliases() {
        let store = InMemoryStore::from_yaml(DOCUMENT).unwrap();
        let groups = store.load_groups().unwrap();

        assert!(groups[0].is_global_default());
        assert_eq!(groups[0].allow, vec!["chat.talk"]);
        assert_eq!(groups[1].contexts, vec!["creative"]);
        assert_eq!(groups[1].prefix_for("creative"), "[B]");
        assert_eq!(groups[1].deny_for("creative"), vec!["build.tnt"]);
        assert_eq!(groups[2].inherit, vec!["member"]);

        let ladders = store.load_ladders().unwrap();
        assert_eq!(ladders, vec![Ladder::new("staff", ["member", "admin"])]);
    }

    #[test]
    fn test_from_yaml_reads_users() {
        let store = InMemoryStore::from_yaml(DOCUMENT).unwrap();
        let id: IdentityId = "0b5f0c0e-7c3a-4a59-9d59-6f3b3c8c2b1e".parse().unwrap();

        let user = store.load_user(&id).unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.prefix, "[Me]");
        assert_eq!(store.user_group_names(&id).unwrap(), vec!["admin"]);
    }

    #[test]
    fn test_from_yaml_rejects_bad_documents() {
        assert_matches!(InMemoryStore::from_yaml("groups: ["), Err(StoreError::Parse(_)));
        assert_matches!(
            InMemoryStore::from_yaml("users:\n  not-a-uuid:\n    groups: []\n"),
            Err(StoreError::Parse(_))
        );
        assert_matches!(
            InMemoryStore::from_yaml("ladders:\n  staff: 12\n"),
            Err(StoreError::Parse(_))
        );
    }

    #[test]
    fn test_set_user_groups_creates_record() {
        let store = InMemoryStore::new();
        let id = IdentityId::new();
        assert!(store.load_user(&id).unwrap().is_none());

        store.set_user_groups(&id, &["mod".to_string()]).unwrap();
        let user = store.load_user(&id).unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.groups, vec!["mod"]);
    }

    #[test]
    fn test_failed_writes_leave_data_untouched() {
        let store = InMemoryStore::new();
        let user = User::new(IdentityId::new(), ["member"]);
        store.insert_user(user.clone());
        store.set_fail_writes(true);

        assert_matches!(
            store.set_user_groups(&user.id, &["admin".to_string()]),
            Err(StoreError::WriteFailed(_))
        );
        assert_matches!(store.save_user(&user), Err(StoreError::WriteFailed(_)));
        assert_eq!(store.user_group_names(&user.id).unwrap(), vec!["member"]);

        store.set_fail_writes(false);
        store.set_user_groups(&user.id, &["admin".to_string()]).unwrap();
        assert_eq!(store.user_group_names(&user.id).unwrap(), vec!["admin"]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryStore::new();
        let other = store.clone();
        other.replace_definitions(vec![Group::new("member")], Vec::new());

        assert_eq!(store.load_groups().unwrap().len(), 1);
        assert_eq!(store.users().len(), 0);
    }
}
