//! In-memory `CustomerStore` adapter.

use async_trait::async_trait;

use crate::domain::ports::{CUSTOMER_MAIL_CONSTRAINT, CustomerStore, EntityStoreError};
use crate::domain::{Customer, CustomerId, Mail, Page, PageRequest, PersonName, ReducedCustomer};

use super::store::{InMemoryStore, UniqueKey};

/// In-process customer store enforcing the `customers` unique keys.
pub type InMemoryCustomerStore = InMemoryStore<Customer>;

fn mail_key(customer: &Customer) -> &str {
    customer.mail().as_str()
}

static CUSTOMER_KEYS: [UniqueKey<Customer>; 1] = [UniqueKey {
    constraint: CUSTOMER_MAIL_CONSTRAINT,
    key: mail_key,
}];

fn reduce(id: CustomerId, customer: &Customer) -> ReducedCustomer {
    ReducedCustomer::new(
        id,
        customer.name().clone(),
        customer.last_name().clone(),
        customer.mail().clone(),
    )
}

impl InMemoryStore<Customer> {
    /// Create an empty customer store.
    pub fn new() -> Self {
        Self::with_unique_keys(&CUSTOMER_KEYS)
    }
}

impl Default for InMemoryStore<Customer> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore<Customer> {
    async fn find_by_name(&self, name: &PersonName) -> Result<Vec<Customer>, EntityStoreError> {
        Ok(self.select_where(|customer| customer.name() == name))
    }

    async fn find_by_last_name(
        &self,
        last_name: &PersonName,
    ) -> Result<Vec<Customer>, EntityStoreError> {
        Ok(self.select_where(|customer| customer.last_name() == last_name))
    }

    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<Customer>, EntityStoreError> {
        Ok(self.select_first(|customer| customer.mail() == mail))
    }

    async fn find_all_projected(&self) -> Result<Vec<ReducedCustomer>, EntityStoreError> {
        // Project under the read lock so only the four columns are copied out.
        Ok(self.project(reduce))
    }

    async fn find_page_projected(
        &self,
        request: PageRequest,
    ) -> Result<Page<ReducedCustomer>, EntityStoreError> {
        Ok(self.project_page(request, reduce))
    }
}
