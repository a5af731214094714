//! `greenerp-infra` — persistence.
//!
//! Storage sits behind small async traits with two backends: an in-memory
//! store for tests/dev and a Postgres store for real deployments. Both commit
//! "order + lines" and "status change + stock increments" as single units.

pub mod schema;
pub mod store;

pub use store::{
    ItemStore, LineWithItem, OrderStore, OrderWithLines, StoreError, Stores, SupplierStore,
    UserStore,
};
pub use store::memory::MemoryStore;
pub use store::postgres::PostgresStore;
