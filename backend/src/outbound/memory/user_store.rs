//! In-memory `UserStore` adapter.

use async_trait::async_trait;

use crate::domain::ports::{EntityStoreError, USER_MAIL_CONSTRAINT, USER_NAME_CONSTRAINT, UserStore};
use crate::domain::{Mail, Profile, User, UserName};

use super::store::{InMemoryStore, UniqueKey};

/// In-process user store enforcing the same unique keys as the `users` table.
pub type InMemoryUserStore = InMemoryStore<User>;

fn user_name_key(user: &User) -> &str {
    user.user_name().as_str()
}

fn mail_key(user: &User) -> &str {
    user.mail().as_str()
}

static USER_KEYS: [UniqueKey<User>; 2] = [
    UniqueKey {
        constraint: USER_NAME_CONSTRAINT,
        key: user_name_key,
    },
    UniqueKey {
        constraint: USER_MAIL_CONSTRAINT,
        key: mail_key,
    },
];

impl InMemoryStore<User> {
    /// Create an empty user store.
    pub fn new() -> Self {
        Self::with_unique_keys(&USER_KEYS)
    }
}

impl Default for InMemoryStore<User> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStore<User> {
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, EntityStoreError> {
        Ok(self.select_first(|user| user.user_name() == user_name))
    }

    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<User>, EntityStoreError> {
        Ok(self.select_first(|user| user.mail() == mail))
    }

    async fn find_by_profile(&self, profile: Profile) -> Result<Vec<User>, EntityStoreError> {
        Ok(self.select_where(|user| user.profile() == profile))
    }
}

#[cfg(test)]
mod tests;
