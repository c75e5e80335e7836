//! Error mapping and row conversion shared by the Diesel store adapters.

use std::fmt::Display;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::PageRequest;
use crate::domain::ports::EntityStoreError;

use super::pool::PoolError;

/// Server messages for cancelled statements, terminated sessions and
/// connection-class SQLSTATEs. `diesel-async` reports these as `Unknown`
/// without the code, so the message is all that is left to classify.
const UNAVAILABLE_MESSAGES: [&str; 7] = [
    "canceling statement due to",
    "terminating connection",
    "the database system is",
    "too many clients",
    "connection to client lost",
    "could not connect",
    "server closed the connection",
];

fn is_unavailable_message(message: &str) -> bool {
    let message = message.to_lowercase();
    UNAVAILABLE_MESSAGES
        .iter()
        .any(|fragment| message.contains(fragment))
}

/// Fold pool failures into `StorageUnavailable`.
pub(crate) fn map_pool_error(error: PoolError) -> EntityStoreError {
    EntityStoreError::storage_unavailable(error.into_message())
}

/// Map Diesel failures into store errors.
///
/// Unique violations keep the PostgreSQL constraint name so callers can tell
/// which candidate key collided. Lost connections, statement timeouts and
/// server shutdowns become `StorageUnavailable`.
pub(crate) fn map_diesel_error(error: DieselError) -> EntityStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            EntityStoreError::constraint_violation(
                info.constraint_name().unwrap_or("unknown"),
                info.message(),
            )
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            info,
        ) => EntityStoreError::storage_unavailable(info.message()),
        DieselError::DatabaseError(_, info) if is_unavailable_message(info.message()) => {
            EntityStoreError::storage_unavailable(info.message())
        }
        DieselError::DatabaseError(_, info) => EntityStoreError::query(info.message()),
        DieselError::NotFound => EntityStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => EntityStoreError::query("database query error"),
        other => EntityStoreError::query(other.to_string()),
    }
}

impl From<DieselError> for EntityStoreError {
    fn from(error: DieselError) -> Self {
        map_diesel_error(error)
    }
}

/// Convert stored rows into domain values, failing on the first invalid row.
pub(crate) fn collect_rows<R, T, E>(
    kind: &'static str,
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, E>,
) -> Result<Vec<T>, EntityStoreError>
where
    E: Display,
{
    rows.into_iter()
        .map(|row| convert(row).map_err(|err| invalid_row(kind, err)))
        .collect()
}

/// A stored row that no longer satisfies the domain validation rules.
pub(crate) fn invalid_row(kind: &'static str, error: impl Display) -> EntityStoreError {
    warn!(entity = kind, %error, "stored row failed validation");
    EntityStoreError::query(format!("stored {kind} row is invalid: {error}"))
}

/// `COUNT(*)` result as an unsigned total.
pub(crate) fn row_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// `LIMIT` and `OFFSET` for a page request.
pub(crate) fn page_window(request: PageRequest) -> Result<(i64, i64), EntityStoreError> {
    let offset = i64::try_from(request.offset())
        .map_err(|_| EntityStoreError::query("page offset out of range"))?;
    Ok((i64::from(request.size()), offset))
}
