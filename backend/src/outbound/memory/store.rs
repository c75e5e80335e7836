//! Generic lock-protected table implementing [`EntityStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{EntityStore, EntityStoreError};
use crate::domain::{Entity, EntityId, Page, PageRequest};

/// Unique index enforced on every write, named after its PostgreSQL twin.
pub(crate) struct UniqueKey<T> {
    pub(crate) constraint: &'static str,
    pub(crate) key: fn(&T) -> &str,
}

impl<T> fmt::Debug for UniqueKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueKey")
            .field("constraint", &self.constraint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    last_id: i64,
}

impl<T: Entity> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            last_id: self.last_id,
        }
    }
}

/// In-process store for one entity type.
///
/// Rows live in a `BTreeMap` keyed by identifier, so every listing is
/// identifier ascending. Writes hold the lock across the uniqueness check and
/// the insert. Clones share the same table.
#[derive(Debug)]
pub struct InMemoryStore<T: Entity> {
    table: Arc<RwLock<Table<T>>>,
    unique_keys: &'static [UniqueKey<T>],
}

impl<T: Entity> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            unique_keys: self.unique_keys,
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    pub(crate) fn with_unique_keys(unique_keys: &'static [UniqueKey<T>]) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            })),
            unique_keys,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Table<T>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table<T>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_unique(&self, table: &Table<T>, entity: &T) -> Result<(), EntityStoreError> {
        for unique in self.unique_keys {
            let value = (unique.key)(entity);
            let collides = table
                .rows
                .values()
                .any(|other| other.id() != entity.id() && (unique.key)(other) == value);
            if collides {
                debug!(
                    entity = T::KIND,
                    constraint = unique.constraint,
                    "unique constraint rejected write"
                );
                return Err(EntityStoreError::constraint_violation(
                    unique.constraint,
                    format!("duplicate key value ({value}) already stored"),
                ));
            }
        }
        Ok(())
    }

    fn save_into(&self, table: &mut Table<T>, entity: T) -> Result<T, EntityStoreError> {
        if let Some(id) = entity.id() {
            if !table.rows.contains_key(&id) {
                return Err(EntityStoreError::stale::<T>(id));
            }
            self.check_unique(table, &entity)?;
            table.rows.insert(id, entity.clone());
            return Ok(entity);
        }

        self.check_unique(table, &entity)?;
        let id = table
            .last_id
            .checked_add(1)
            .and_then(T::Id::from_raw)
            .ok_or_else(|| {
                EntityStoreError::query(format!("{} identifier sequence exhausted", T::KIND))
            })?;
        table.last_id = id.raw();
        let stored = entity.with_id(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    /// Apply the whole batch to a staged copy and swap it in on success.
    fn save_batch(&self, entities: Vec<T>) -> Result<Vec<T>, EntityStoreError> {
        let mut table = self.write();
        let mut staged = table.clone();
        let saved = entities
            .into_iter()
            .map(|entity| self.save_into(&mut staged, entity))
            .collect::<Result<Vec<_>, _>>()?;
        *table = staged;
        Ok(saved)
    }

    /// Rows matching `predicate`, identifier ascending.
    pub(crate) fn select_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.read()
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// First row matching `predicate` in identifier order.
    pub(crate) fn select_first(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.read().rows.values().find(|row| predicate(row)).cloned()
    }

    /// One page of rows mapped through `project`, identifier ascending.
    pub(crate) fn project_page<P>(
        &self,
        request: PageRequest,
        project: impl Fn(T::Id, &T) -> P,
    ) -> Page<P> {
        let table = self.read();
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let items = table
            .rows
            .iter()
            .skip(skip)
            .take(take)
            .map(|(id, row)| project(*id, row))
            .collect();
        Page::new(items, request, table.rows.len() as u64)
    }

    /// Every row mapped through `project`, identifier ascending.
    pub(crate) fn project<P>(&self, project: impl Fn(T::Id, &T) -> P) -> Vec<P> {
        self.read()
            .rows
            .iter()
            .map(|(id, row)| project(*id, row))
            .collect()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn save(&self, entity: T) -> Result<T, EntityStoreError> {
        let mut table = self.write();
        self.save_into(&mut table, entity)
    }

    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>, EntityStoreError> {
        self.save_batch(entities)
    }

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, EntityStoreError> {
        Ok(self.read().rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: T::Id) -> Result<(), EntityStoreError> {
        self.write().rows.remove(&id);
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[T::Id]) -> Result<(), EntityStoreError> {
        let mut table = self.write();
        for id in ids {
            table.rows.remove(id);
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<T>, EntityStoreError> {
        Ok(self.read().rows.values().cloned().collect())
    }

    async fn find_all_by_id(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError> {
        let wanted: BTreeSet<T::Id> = ids.iter().copied().collect();
        let table = self.read();
        Ok(wanted
            .into_iter()
            .filter_map(|id| table.rows.get(&id).cloned())
            .collect())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<T>, EntityStoreError> {
        Ok(self.project_page(request, |_, row| row.clone()))
    }

    async fn count(&self) -> Result<u64, EntityStoreError> {
        Ok(self.read().rows.len() as u64)
    }

    async fn exists_by_id(&self, id: T::Id) -> Result<bool, EntityStoreError> {
        Ok(self.read().rows.contains_key(&id))
    }
}
