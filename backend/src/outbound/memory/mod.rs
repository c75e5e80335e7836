//! In-process store adapters.
//!
//! These adapters honour the same contract as the PostgreSQL ones: unique
//! keys are checked on every write (and reported with the same constraint
//! names), identifiers come from a per-store sequence and every listing is
//! identifier ascending. Nothing survives a process restart.
//!
//! # Example
//!
//! ```
//! use accounts::domain::User;
//! use accounts::domain::ports::{EntityStore, UserStore};
//! use accounts::outbound::memory::InMemoryUserStore;
//!
//! # tokio_test();
//! # fn tokio_test() {
//! let rt = tokio::runtime::Runtime::new().expect("runtime");
//! rt.block_on(async {
//!     let store = InMemoryUserStore::new();
//!     let alice = User::try_from_parts("alice", "a@x.com", 1).expect("valid user");
//!     let saved = store.save(alice).await.expect("saved");
//!     assert!(saved.id().is_some());
//! });
//! # }
//! ```

mod customer_store;
mod store;
mod user_store;

pub use customer_store::InMemoryCustomerStore;
pub use store::InMemoryStore;
pub use user_store::InMemoryUserStore;
