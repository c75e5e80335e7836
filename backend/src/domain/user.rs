//! User account model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, define_entity_id};
use super::mail::{Mail, MailValidationError};

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was zero or negative.
    #[error("user id must be a positive integer, got {value}")]
    NonPositiveId {
        /// Rejected raw value.
        value: i64,
    },
    /// User name was empty or whitespace.
    #[error("user name must not be empty")]
    EmptyUserName,
    /// User name exceeded [`USER_NAME_MAX`] characters.
    #[error("user name must be at most {max} characters")]
    UserNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// User name contained characters outside the allowed set.
    #[error("user name may only contain letters, digits, '.', '_' or '-'")]
    UserNameInvalidCharacters,
    /// Mail address failed validation.
    #[error(transparent)]
    Mail(#[from] MailValidationError),
}

define_entity_id! {
    /// Server-assigned user identifier.
    UserId, UserValidationError
}

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 64;

static USER_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn user_name_regex() -> &'static Regex {
    USER_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9._-]+$")
            .unwrap_or_else(|error| panic!("user name regex failed to compile: {error}"))
    })
}

/// Login name, unique among users and matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(user_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(user_name.into())
    }

    fn from_owned(user_name: String) -> Result<Self, UserValidationError> {
        if user_name.trim().is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        if user_name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::UserNameTooLong {
                max: USER_NAME_MAX,
            });
        }
        if !user_name_regex().is_match(&user_name) {
            return Err(UserValidationError::UserNameInvalidCharacters);
        }
        Ok(Self(user_name))
    }

    /// Borrow the login name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role or permission level. The persistence layer does not interpret it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Profile(i16);

impl Profile {
    /// Wrap a raw profile level.
    pub const fn new(level: i16) -> Self {
        Self(level)
    }

    /// Raw profile level.
    pub const fn get(self) -> i16 {
        self.0
    }
}

impl From<i16> for Profile {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered account.
///
/// ## Invariants
/// - `id` is `None` until the first save and never changes afterwards.
/// - `user_name` and `mail` are unique among users; stores reject
///   collisions at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<UserId>,
    user_name: UserName,
    mail: Mail,
    profile: Profile,
}

impl User {
    /// Build an unsaved user from validated components.
    pub fn new(user_name: UserName, mail: Mail, profile: Profile) -> Self {
        Self {
            id: None,
            user_name,
            mail,
            profile,
        }
    }

    /// Fallible constructor validating every component.
    pub fn try_from_parts(
        user_name: impl Into<String>,
        mail: impl Into<String>,
        profile: i16,
    ) -> Result<Self, UserValidationError> {
        let user_name = UserName::new(user_name)?;
        let mail = Mail::new(mail)?;
        Ok(Self::new(user_name, mail, Profile::new(profile)))
    }

    /// Server-assigned identifier, `None` before the first save.
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Login name.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Contact mail address.
    pub fn mail(&self) -> &Mail {
        &self.mail
    }

    /// Role or permission level.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Replace the login name.
    #[must_use]
    pub fn with_user_name(mut self, user_name: UserName) -> Self {
        self.user_name = user_name;
        self
    }

    /// Replace the mail address.
    #[must_use]
    pub fn with_mail(mut self, mail: Mail) -> Self {
        self.mail = mail;
        self
    }

    /// Replace the profile level.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "user";

    fn id(&self) -> Option<UserId> {
        self.id
    }

    fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }
}
