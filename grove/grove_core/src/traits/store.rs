//! Declarative store trait.

use crate::error::StoreError;
use crate::id::IdentityId;
use crate::types::{Group, Ladder, User};

/// Read/write access to the declarative permission data.
///
/// Groups are returned in declaration order, which doubles as ascending
/// rank order. Implementations must be `Send + Sync` because the runtime
/// reads the store from its worker lane.
///
/// # Examples
///
/// ```
/// use grove_core::{DeclarativeStore, Group, IdentityId, Ladder, User};
/// use grove_core::error::StoreError;
///
/// struct Fixed;
///
/// impl DeclarativeStore for Fixed {
///     fn load_groups(&self) -> Result<Vec<Group>, StoreError> {
///         Ok(vec![Group::new("default").with_default("true")])
///     }
///
///     fn load_ladders(&self) -> Result<Vec<Ladder>, StoreError> {
///         Ok(Vec::new())
///     }
///
///     fn load_user(&self, _id: &IdentityId) -> Result<Option<User>, StoreError> {
///         Ok(None)
///     }
///
///     fn save_user(&self, _user: &User) -> Result<(), StoreError> {
///         Err(StoreError::WriteFailed("read-only".into()))
///     }
///
///     fn set_user_groups(&self, _id: &IdentityId, _groups: &[String]) -> Result<(), StoreError> {
///         Err(StoreError::WriteFailed("read-only".into()))
///     }
/// }
///
/// assert_eq!(Fixed.load_groups().unwrap().len(), 1);
/// assert!(Fixed.user_group_names(&IdentityId::new()).unwrap().is_empty());
/// ```
pub trait DeclarativeStore: Send + Sync {
    /// All defined groups, in declaration order.
    fn load_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// All defined ladders, in declaration order.
    fn load_ladders(&self) -> Result<Vec<Ladder>, StoreError>;

    /// The persisted record for `id`, if one exists.
    fn load_user(&self, id: &IdentityId) -> Result<Option<User>, StoreError>;

    /// Persist `user`, replacing any previous record with the same id.
    fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// Overwrite the persisted group names of `id`, creating the record
    /// if it does not exist yet.
    fn set_user_groups(&self, id: &IdentityId, groups: &[String]) -> Result<(), StoreError>;

    /// Group names persisted for `id`. Empty when nothing is persisted.
    fn user_group_names(&self, id: &IdentityId) -> Result<Vec<String>, StoreError> {
        Ok(self.load_user(id)?.map(|user| user.groups).unwrap_or_default())
    }
}
