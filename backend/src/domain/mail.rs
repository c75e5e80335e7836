//! Mail address value object shared by users and customers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum stored length of a mail address.
pub const MAIL_MAX: usize = 254;

/// Validation errors returned by [`Mail::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailValidationError {
    /// Input was empty or whitespace.
    #[error("mail must not be empty")]
    Empty,
    /// Input exceeded [`MAIL_MAX`] characters.
    #[error("mail must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Input is not shaped like `local@domain`.
    #[error("mail must contain a single '@' between a local part and a domain")]
    Malformed,
}

/// Mail address, compared and stored exactly as given.
///
/// ## Invariants
/// - At most [`MAIL_MAX`] characters, no whitespace.
/// - Exactly one `@` with non-empty text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mail(String);

impl Mail {
    /// Validate and construct a [`Mail`].
    pub fn new(mail: impl Into<String>) -> Result<Self, MailValidationError> {
        Self::from_owned(mail.into())
    }

    fn from_owned(mail: String) -> Result<Self, MailValidationError> {
        if mail.trim().is_empty() {
            return Err(MailValidationError::Empty);
        }
        if mail.chars().count() > MAIL_MAX {
            return Err(MailValidationError::TooLong { max: MAIL_MAX });
        }
        if mail.chars().any(char::is_whitespace) {
            return Err(MailValidationError::Malformed);
        }

        let mut parts = mail.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !well_formed {
            return Err(MailValidationError::Malformed);
        }

        Ok(Self(mail))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Mail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Mail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Mail> for String {
    fn from(value: Mail) -> Self {
        value.0
    }
}

impl TryFrom<String> for Mail {
    type Error = MailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
