//! Generic CRUD port shared by every entity store.
//!
//! [`EntityStore`] is the contract each adapter implements once per entity
//! type. "Not found" is never an error: lookups return `None` or an empty
//! list, and deleting a missing identifier succeeds. Every multi-row read is
//! ordered by identifier ascending.

use async_trait::async_trait;

use crate::domain::{Entity, Page, PageRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entity store adapters.
    pub enum EntityStoreError {
        /// A write would break a uniqueness rule.
        ConstraintViolation { constraint: String, message: String } =>
            "constraint {constraint} violated: {message}",
        /// The backend could not be reached or timed out.
        StorageUnavailable { message: String } =>
            "storage unavailable: {message}",
        /// An update targeted an identifier with no stored record.
        StaleIdentity { entity: String, id: String } =>
            "{entity} {id} is not stored",
        /// The backend rejected the query or returned unusable data.
        Query { message: String } =>
            "storage query failed: {message}",
    }
}

impl EntityStoreError {
    /// Build a [`EntityStoreError::StaleIdentity`] for the given entity type.
    pub fn stale<T: Entity>(id: T::Id) -> Self {
        Self::stale_identity(T::KIND, id.to_string())
    }
}

/// CRUD contract for one entity type.
///
/// Each call is one logical transaction against the backend. Adapters do not
/// retry; callers decide whether a [`EntityStoreError::StorageUnavailable`]
/// is worth another attempt.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Insert `entity` when it has no identifier, otherwise update the stored
    /// record with the same identifier.
    ///
    /// Returns the persisted entity, carrying the generated identifier after
    /// an insert.
    ///
    /// # Errors
    ///
    /// - [`EntityStoreError::ConstraintViolation`] when a unique field collides
    ///   with another record.
    /// - [`EntityStoreError::StaleIdentity`] when updating an identifier that
    ///   is not stored.
    async fn save(&self, entity: T) -> Result<T, EntityStoreError>;

    /// Save every entity in order as one unit.
    ///
    /// Either all writes apply or none do. The result lists the persisted
    /// entities in input order. Uniqueness is checked against earlier
    /// entities of the same batch as well as stored records.
    ///
    /// # Errors
    ///
    /// The first error [`EntityStore::save`] would report for any entity.
    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>, EntityStoreError>;

    /// Fetch the record with `id`, or `None` when absent.
    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, EntityStoreError>;

    /// Delete the record with `id`. Missing identifiers are ignored.
    async fn delete_by_id(&self, id: T::Id) -> Result<(), EntityStoreError>;

    /// Delete every record whose identifier appears in `ids`.
    ///
    /// Missing identifiers are ignored, so repeating the call is a no-op.
    async fn delete_all_by_id(&self, ids: &[T::Id]) -> Result<(), EntityStoreError>;

    /// Every stored record.
    async fn find_all(&self) -> Result<Vec<T>, EntityStoreError>;

    /// Stored records whose identifier appears in `ids`.
    ///
    /// Unknown identifiers are skipped and duplicates collapse.
    async fn find_all_by_id(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError>;

    /// One page of the identifier-ordered listing. Pages past the end are
    /// empty.
    async fn find_page(&self, request: PageRequest) -> Result<Page<T>, EntityStoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, EntityStoreError>;

    /// Whether a record with `id` is stored.
    async fn exists_by_id(&self, id: T::Id) -> Result<bool, EntityStoreError>;
}
