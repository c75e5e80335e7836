//! Port for customer persistence: CRUD, finders and the reduced projection.

use async_trait::async_trait;

use crate::domain::{Customer, Mail, Page, PageRequest, PersonName, ReducedCustomer};

use super::{EntityStore, EntityStoreError};

/// Unique constraint guarding [`Customer::mail`].
pub const CUSTOMER_MAIL_CONSTRAINT: &str = "customers_mail_key";

/// Customer store: the generic CRUD contract plus explicit finders.
#[async_trait]
pub trait CustomerStore: EntityStore<Customer> {
    /// Customers with exactly this first name, identifier ascending.
    async fn find_by_name(&self, name: &PersonName) -> Result<Vec<Customer>, EntityStoreError>;

    /// Customers with exactly this last name, identifier ascending.
    async fn find_by_last_name(
        &self,
        last_name: &PersonName,
    ) -> Result<Vec<Customer>, EntityStoreError>;

    /// Fetch the customer with this mail address.
    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<Customer>, EntityStoreError>;

    /// Every customer in the reduced shape, identifier ascending.
    ///
    /// Adapters push the projection into the storage query instead of
    /// loading full entities and trimming them.
    async fn find_all_projected(&self) -> Result<Vec<ReducedCustomer>, EntityStoreError>;

    /// One page of the reduced listing, identifier ascending.
    ///
    /// The total is counted in the same transaction as the slice. Pages past
    /// the end are empty.
    async fn find_page_projected(
        &self,
        request: PageRequest,
    ) -> Result<Page<ReducedCustomer>, EntityStoreError>;
}
