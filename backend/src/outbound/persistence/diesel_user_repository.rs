//! PostgreSQL-backed `UserStore` adapter.

use async_trait::async_trait;
use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;

use crate::domain::ports::{EntityStore, EntityStoreError, UserStore};
use crate::domain::{
    Entity, Mail, Page, PageRequest, Profile, User, UserId, UserName, UserValidationError,
};

use super::diesel_helpers::{
    collect_rows, invalid_row, map_diesel_error, map_pool_error, page_window, row_count,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserStore`] over the `users` table.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserValidationError> {
    let id = UserId::new(row.id)?;
    let user = User::new(
        UserName::new(row.user_name)?,
        Mail::new(row.mail)?,
        Profile::new(row.profile),
    );
    Ok(user.with_id(id))
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, EntityStoreError> {
    collect_rows(User::KIND, rows, row_to_user)
}

/// Insert a draft or update a stored user, returning the written row.
async fn write_user(
    conn: &mut AsyncPgConnection,
    user: &User,
) -> Result<UserRow, EntityStoreError> {
    match user.id() {
        None => diesel::insert_into(users::table)
            .values(&NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(conn)
            .await
            .map_err(map_diesel_error),
        Some(id) => diesel::update(users::table.find(id.get()))
            .set((&UserUpdate::from(user), users::updated_at.eq(now)))
            .returning(UserRow::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| EntityStoreError::stale::<User>(id)),
    }
}

#[async_trait]
impl EntityStore<User> for DieselUserRepository {
    async fn save(&self, user: User) -> Result<User, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = write_user(&mut conn, &user).await?;
        debug!(user_id = row.id, "user saved");
        row_to_user(row).map_err(|err| invalid_row(User::KIND, err))
    }

    async fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, EntityStoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction::<_, EntityStoreError, _>(|conn| {
                async move {
                    let mut rows = Vec::with_capacity(users.len());
                    for user in &users {
                        rows.push(write_user(conn, user).await?);
                    }
                    Ok(rows)
                }
                .scope_boxed()
            })
            .await?;

        debug!(saved = rows.len(), "user batch saved");
        rows_to_users(rows)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user)
            .transpose()
            .map_err(|err| invalid_row(User::KIND, err))
    }

    async fn delete_by_id(&self, id: UserId) -> Result<(), EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(user_id = id.get(), deleted, "user delete executed");
        Ok(())
    }

    async fn delete_all_by_id(&self, ids: &[UserId]) -> Result<(), EntityStoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let deleted = diesel::delete(users::table.filter(users::id.eq_any(raw_ids)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(requested = ids.len(), deleted, "user batch delete executed");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn find_all_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, EntityStoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw_ids))
            .select(UserRow::as_select())
            .order_by(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<User>, EntityStoreError> {
        let (limit, offset) = page_window(request)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, rows) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = users::table.count().get_result(conn).await?;
                    let rows: Vec<UserRow> = users::table
                        .select(UserRow::as_select())
                        .order_by(users::id.asc())
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

        Ok(Page::new(rows_to_users(rows)?, request, row_count(total)))
    }

    async fn count(&self) -> Result<u64, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_count(total))
    }

    async fn exists_by_id(&self, id: UserId) -> Result<bool, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(users::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl UserStore for DieselUserRepository {
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::user_name.eq(user_name.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user)
            .transpose()
            .map_err(|err| invalid_row(User::KIND, err))
    }

    async fn find_by_mail(&self, mail: &Mail) -> Result<Option<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::mail.eq(mail.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user)
            .transpose()
            .map_err(|err| invalid_row(User::KIND, err))
    }

    async fn find_by_profile(&self, profile: Profile) -> Result<Vec<User>, EntityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::profile.eq(profile.get()))
            .select(UserRow::as_select())
            .order_by(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(id: i64, user_name: &str, mail: &str) -> UserRow {
        UserRow {
            id,
            user_name: user_name.to_owned(),
            mail: mail.to_owned(),
            profile: 3,
        }
    }

    #[rstest]
    fn row_converts_to_identified_user() {
        let user = row_to_user(row(7, "alice", "a@x.com")).expect("valid row");

        assert_eq!(user.id().map(UserId::get), Some(7));
        assert_eq!(user.user_name().as_str(), "alice");
        assert_eq!(user.mail().as_str(), "a@x.com");
        assert_eq!(user.profile(), Profile::new(3));
    }

    #[rstest]
    #[case::zero_id(row(0, "alice", "a@x.com"))]
    #[case::bad_name(row(1, "alice smith", "a@x.com"))]
    #[case::bad_mail(row(1, "alice", "not-a-mail"))]
    fn invalid_rows_are_rejected(#[case] row: UserRow) {
        assert!(row_to_user(row).is_err());
    }

    #[rstest]
    fn invalid_row_in_listing_is_a_query_error() {
        let err = rows_to_users(vec![row(1, "alice", "a@x.com"), row(2, "", "b@x.com")])
            .expect_err("empty user name");

        assert!(err.is_query());
        assert!(err.to_string().contains("stored user row is invalid"));
    }
}
