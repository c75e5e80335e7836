//! Internal Diesel row structs.
//!
//! Never exposed to the domain. Audit timestamps are maintained by the
//! database and the adapters, so no row struct reads them.

use diesel::prelude::*;

use crate::domain::{Customer, User};

use super::schema::{customers, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub user_name: String,
    pub mail: String,
    pub profile: i16,
}

/// Values inserted for a new user; `id` comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_name: &'a str,
    pub mail: &'a str,
    pub profile: i16,
}

/// Columns rewritten when a stored user is saved again.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub user_name: &'a str,
    pub mail: &'a str,
    pub profile: i16,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            user_name: user.user_name().as_str(),
            mail: user.mail().as_str(),
            profile: user.profile().get(),
        }
    }
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            user_name: user.user_name().as_str(),
            mail: user.mail().as_str(),
            profile: user.profile().get(),
        }
    }
}

/// Row read from `customers`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub mail: String,
}

/// Reduced customer projection.
///
/// Selects the same four columns as [`CustomerRow`] but is kept separate so
/// the projection query can grow or shrink independently of the full row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReducedCustomerRow {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub mail: String,
}

/// Values inserted for a new customer.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub mail: &'a str,
}

/// Columns rewritten when a stored customer is saved again.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerUpdate<'a> {
    pub name: &'a str,
    pub last_name: &'a str,
    pub mail: &'a str,
}

impl<'a> From<&'a Customer> for NewCustomerRow<'a> {
    fn from(customer: &'a Customer) -> Self {
        Self {
            name: customer.name().as_str(),
            last_name: customer.last_name().as_str(),
            mail: customer.mail().as_str(),
        }
    }
}

impl<'a> From<&'a Customer> for CustomerUpdate<'a> {
    fn from(customer: &'a Customer) -> Self {
        Self {
            name: customer.name().as_str(),
            last_name: customer.last_name().as_str(),
            mail: customer.mail().as_str(),
        }
    }
}
