//! Port for user persistence: CRUD plus the user finder queries.

use async_trait::async_trait;

use crate::domain::{Mail, Profile, User, UserName};

use super::{EntityStore, EntityStoreError};

/// Unique constraint guarding [`User::user_name`].
pub const USER_NAME_CONSTRAINT: &str = "users_user_name_key";

/// Unique constraint guarding [`User::mail`].
pub const USER_MAIL_CONSTRAINT: &str = "users_mail_key";

/// User store: the generic CRUD contract plus explicit finders.
///
/// Name and mail lookups are case-sensitive exact matches. Both keys are
/// unique, so a lookup yields at most one user.
#[async_trait]
pub trait UserStore: EntityStore<User> {
    /// Fetch the user with this login name.
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, EntityStoreError>;

    /// Fetch the user with this mail address.
    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<User>, EntityStoreError>;

    /// Every user at `profile`, identifier ascending.
    async fn find_by_profile(&self, profile: Profile) -> Result<Vec<User>, EntityStoreError>;
}
