//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed entities stored by the persistence ports.
//! Value objects validate on construction and on deserialisation, so stores
//! only ever see well-formed data.
//!
//! Public surface:
//! - `User`, `UserId`, `UserName`, `Profile`: registered accounts.
//! - `Customer`, `CustomerId`, `PersonName`, `ReducedCustomer`: customers
//!   and their read-only projection.
//! - `Mail`: mail address shared by both aggregates.
//! - `Entity`, `EntityId`: identity contract consumed by the generic store.
//! - `Page`, `PageRequest`: offset paging over identifier-ordered listings.

pub mod customer;
mod entity;
pub mod mail;
pub mod paging;
pub mod ports;
pub mod user;

pub use self::customer::{
    Customer, CustomerId, CustomerValidationError, PERSON_NAME_MAX, PersonName, ReducedCustomer,
};
pub use self::entity::{Entity, EntityId};
pub use self::mail::{MAIL_MAX, Mail, MailValidationError};
pub use self::paging::{MAX_PAGE_SIZE, Page, PageRequest, PageRequestError};
pub use self::user::{Profile, USER_NAME_MAX, User, UserId, UserName, UserValidationError};
