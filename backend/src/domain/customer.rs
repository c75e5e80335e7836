//! Customer model and its reduced projection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, define_entity_id};
use super::mail::{Mail, MailValidationError};

/// Validation errors returned by the customer constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerValidationError {
    /// Identifier was zero or negative.
    #[error("customer id must be a positive integer, got {value}")]
    NonPositiveId {
        /// Rejected raw value.
        value: i64,
    },
    /// Name was empty or whitespace.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`PERSON_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Mail address failed validation.
    #[error(transparent)]
    Mail(#[from] MailValidationError),
}

define_entity_id! {
    /// Server-assigned customer identifier.
    CustomerId, CustomerValidationError
}

/// Maximum allowed length for a first or last name.
pub const PERSON_NAME_MAX: usize = 100;

/// First or last name of a customer; not unique.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, CustomerValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, CustomerValidationError> {
        if name.trim().is_empty() {
            return Err(CustomerValidationError::EmptyName);
        }
        if name.chars().count() > PERSON_NAME_MAX {
            return Err(CustomerValidationError::NameTooLong {
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = CustomerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Onboarded customer.
///
/// ## Invariants
/// - `id` is `None` until the first save and never changes afterwards.
/// - `mail` is unique among customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<CustomerId>,
    name: PersonName,
    last_name: PersonName,
    mail: Mail,
}

impl Customer {
    /// Build an unsaved customer from validated components.
    pub fn new(name: PersonName, last_name: PersonName, mail: Mail) -> Self {
        Self {
            id: None,
            name,
            last_name,
            mail,
        }
    }

    /// Fallible constructor validating every component.
    pub fn try_from_parts(
        name: impl Into<String>,
        last_name: impl Into<String>,
        mail: impl Into<String>,
    ) -> Result<Self, CustomerValidationError> {
        Ok(Self::new(
            PersonName::new(name)?,
            PersonName::new(last_name)?,
            Mail::new(mail)?,
        ))
    }

    /// Server-assigned identifier, `None` before the first save.
    pub fn id(&self) -> Option<CustomerId> {
        self.id
    }

    /// First name.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Contact mail address.
    pub fn mail(&self) -> &Mail {
        &self.mail
    }

    /// Replace the first name.
    #[must_use]
    pub fn with_name(mut self, name: PersonName) -> Self {
        self.name = name;
        self
    }

    /// Replace the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: PersonName) -> Self {
        self.last_name = last_name;
        self
    }

    /// Replace the mail address.
    #[must_use]
    pub fn with_mail(mut self, mail: Mail) -> Self {
        self.mail = mail;
        self
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    const KIND: &'static str = "customer";

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Read-only projection of a stored customer.
///
/// Produced per query and never persisted, so the identifier is always
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedCustomer {
    id: CustomerId,
    name: PersonName,
    last_name: PersonName,
    mail: Mail,
}

impl ReducedCustomer {
    /// Assemble a projection from already-validated columns.
    pub fn new(id: CustomerId, name: PersonName, last_name: PersonName, mail: Mail) -> Self {
        Self {
            id,
            name,
            last_name,
            mail,
        }
    }

    /// Project a stored customer; `None` for drafts without an identifier.
    pub fn from_customer(customer: &Customer) -> Option<Self> {
        customer.id.map(|id| {
            Self::new(
                id,
                customer.name.clone(),
                customer.last_name.clone(),
                customer.mail.clone(),
            )
        })
    }

    /// Customer identifier.
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// First name.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Contact mail address.
    pub fn mail(&self) -> &Mail {
        &self.mail
    }
}
