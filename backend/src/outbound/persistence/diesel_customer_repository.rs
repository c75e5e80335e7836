//! PostgreSQL-backed `CustomerStore` adapter.

use async_trait::async_trait;
use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;

use crate::domain::ports::{CustomerStore, EntityStore, EntityStoreError};
use crate::domain::{
    Customer, CustomerId, CustomerValidationError, Entity, Mail, Page, PageRequest, PersonName,
    ReducedCustomer,
};

use super::diesel_helpers::{
    collect_rows, invalid_row, map_diesel_error, map_pool_error, page_window, row_count,
};
use super::models::{CustomerRow, CustomerUpdate, NewCustomerRow, ReducedCustomerRow};
use super::pool::DbPool;
use super::schema::customers;

/// Diesel implementation of [`CustomerStore`] over the `customers` table.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, CustomerValidationError> {
    let id = CustomerId::new(row.id)?;
    let customer = Customer::new(
        PersonName::new(row.name)?,
        PersonName::new(row.last_name)?,
        Mail::new(row.mail)?,
    );
    Ok(customer.with_id(id))
}

fn rows_to_customers(rows: Vec<CustomerRow>) -> Result<Vec<Customer>, EntityStoreError> {
    collect_rows(Customer::KIND, rows, row_to_customer)
}

fn row_to_reduced(row: ReducedCustomerRow) -> Result<ReducedCustomer, CustomerValidationError> {
    Ok(ReducedCustomer::new(
        CustomerId::new(row.id)?,
        PersonName::new(row.name)?,
        PersonName::new(row.last_name)?,
        Mail::new(row.mail)?,
    ))
}

/// Insert a draft or update a stored customer, returning the written row.
async fn write_customer(
    conn: &mut AsyncPgConnection,
    customer: &Customer,
) -> Result<CustomerRow, EntityStoreError> {
    match customer.id() {
        None => diesel::insert_into(customers::table)
            .values(&NewCustomerRow::from(customer))
            .returning(CustomerRow::as_returning())
            .get_result(conn)
            .await
            .map_err(map_diesel_error),
        Some(id) => diesel::update(customers::table.find(id.get()))
            .set((&CustomerUpdate::from(customer), customers::updated_at.eq(now)))
            .returning(CustomerRow::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| EntityStoreError::stale::<Customer>(id)),
    }
}

#[async_trait]
impl EntityStore<Customer> for DieselCustomerRepository {
    async fn save(&self, customer: Customer) -> Result<Customer, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = write_customer(&mut conn, &customer).await?;
        debug!(customer_id = row.id, "customer saved");
        row_to_customer(row).map_err(|err| invalid_row(Customer::KIND, err))
    }

    async fn save_all(&self, customers: Vec<Customer>) -> Result<Vec<Customer>, EntityStoreError> {
        if customers.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, EntityStoreError, _>(|conn| {
                async move {
                    let mut rows = Vec::with_capacity(customers.len());
                    for customer in &customers {
                        rows.push(write_customer(conn, customer).await?);
                    }
                    Ok(rows)
                }
                .scope_boxed()
            })
            .await?;

        debug!(saved = rows.len(), "customer batch saved");
        rows_to_customers(rows)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = customers::table
            .find(id.get())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_customer)
            .transpose()
            .map_err(|err| invalid_row(Customer::KIND, err))
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(customers::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(customer_id = id.get(), deleted, "customer delete executed");
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[CustomerId]) -> Result<(), EntityStoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let deleted = diesel::delete(customers::table.filter(customers::id.eq_any(raw_ids)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(requested = ids.len(), deleted, "customer batch delete executed");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = customers::table
            .select(CustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_customers(rows)
    }

    async fn find_all_by_id(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, EntityStoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<CustomerRow> = customers::table
            .filter(customers::id.eq_any(raw_ids))
            .select(CustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_customers(rows)
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Customer>, EntityStoreError> {
        let (limit, offset) = page_window(request)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, rows) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = customers::table.count().get_result(conn).await?;
                    let rows: Vec<CustomerRow> = customers::table
                        .select(CustomerRow::as_select())
                        .order_by(customers::id.asc())
                        .limit(limit)
                        .offset(offset)
                        .load(conn)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(rows_to_customers(rows)?, request, row_count(total)))
    }

    async fn count(&self) -> Result<u64, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = customers::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_count(total))
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(customers::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl CustomerStore for DieselCustomerRepository {
    async fn find_by_name(&self, name: &PersonName) -> Result<Vec<Customer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = customers::table
            .filter(customers::name.eq(name.as_str()))
            .select(CustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_customers(rows)
    }

    async fn find_by_last_name(
        &self,
        last_name: &PersonName,
    ) -> Result<Vec<Customer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = customers::table
            .filter(customers::last_name.eq(last_name.as_str()))
            .select(CustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_customers(rows)
    }

    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<Customer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = customers::table
            .filter(customers::mail.eq(mail.as_str()))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_customer)
            .transpose()
            .map_err(|err| invalid_row(Customer::KIND, err))
    }

    async fn find_all_projected(&self) -> Result<Vec<ReducedCustomer>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReducedCustomerRow> = customers::table
            .select(ReducedCustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(Customer::KIND, rows, row_to_reduced)
    }

    async fn find_page_projected(
        &self,
        request: PageRequest,
    ) -> Result<Page<ReducedCustomer>, EntityStoreError> {
        let (limit, offset) = page_window(request)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, rows) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = customers::table.count().get_result(conn).await?;
                    let rows: Vec<ReducedCustomerRow> = customers::table
                        .select(ReducedCustomerRow::as_select())
                        .order_by(customers::id.asc())
                        .limit(limit)
                        .offset(offset)
                        .load(conn)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let items = collect_rows(Customer::KIND, rows, row_to_reduced)?;
        Ok(Page::new(items, request, row_count(total)))
    }
}
