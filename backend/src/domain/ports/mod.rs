//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_store;
mod entity_store;
mod user_store;

pub use customer_store::{CUSTOMER_MAIL_CONSTRAINT, CustomerStore};
pub use entity_store::{EntityStore, EntityStoreError};
pub use user_store::{USER_MAIL_CONSTRAINT, USER_NAME_CONSTRAINT, UserStore};
