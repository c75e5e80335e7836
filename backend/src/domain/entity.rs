//! Identity contract shared by every persisted aggregate.
//!
//! Stores are generic over [`Entity`]: an entity either carries a
//! server-assigned identifier (it has been persisted) or it does not (it is a
//! draft waiting for its first save).

use std::fmt;
use std::hash::Hash;

/// Server-assigned identifier backed by a positive 64-bit sequence value.
pub trait EntityId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Wrap a raw sequence value, returning `None` when it is not positive.
    fn from_raw(raw: i64) -> Option<Self>;

    /// Raw sequence value as stored by the backend.
    fn raw(self) -> i64;
}

/// Aggregate that can be stored by an [`EntityStore`](crate::domain::ports::EntityStore).
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    /// Identifier type assigned on first save.
    type Id: EntityId;

    /// Lower-case entity name used in logs and error messages.
    const KIND: &'static str;

    /// Identifier, or `None` for drafts that were never saved.
    fn id(&self) -> Option<Self::Id>;

    /// Return the entity with `id` assigned.
    #[must_use]
    fn with_id(self, id: Self::Id) -> Self;
}

/// Declare a positive `i64` identifier newtype for an entity.
macro_rules! define_entity_id {
    (
        $(#[$outer:meta])*
        $name:ident, $error:ident
    ) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: i64) -> Result<Self, $error> {
                if raw > 0 {
                    Ok(Self(raw))
                } else {
                    Err($error::NonPositiveId { value: raw })
                }
            }

            /// Raw identifier value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl $crate::domain::EntityId for $name {
            fn from_raw(raw: i64) -> Option<Self> {
                Self::new(raw).ok()
            }

            fn raw(self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = $error;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use define_entity_id;
