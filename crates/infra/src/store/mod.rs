//! Store traits and the backend bundle.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use greenerp_auth::User;
use greenerp_catalog::Item;
use greenerp_core::{ItemId, OrderId, SupplierId, UserId};
use greenerp_purchasing::{Order, OrderLine, OrderStatus};
use greenerp_suppliers::Supplier;

pub mod memory;
pub mod postgres;

/// Storage-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or already-exists constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row disappeared between read and write.
    #[error("row not found")]
    Missing,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the initial user set. Rejected with [`StoreError::Conflict`]
    /// when any user already exists — seeding never wipes or duplicates
    /// credentials. The existence check and the inserts are one unit.
    async fn seed(&self, users: Vec<User>) -> Result<(), StoreError>;

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item. Duplicate SKU is a [`StoreError::Conflict`].
    async fn insert(&self, item: Item) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Overwrite an existing item row.
    async fn update(&self, item: Item) -> Result<(), StoreError>;

    /// Hard delete. Returns `false` when no row matched. Order lines
    /// referencing the item keep their `item_id` (documented integrity gap).
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn insert(&self, supplier: Supplier) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Supplier>, StoreError>;

    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError>;

    async fn update(&self, supplier: Supplier) -> Result<(), StoreError>;

    /// Hard delete. Orders referencing the supplier keep their
    /// `supplier_id` and reads degrade to a null display name.
    async fn delete(&self, id: SupplierId) -> Result<bool, StoreError>;
}

/// An order line joined with its item's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct LineWithItem {
    pub line: OrderLine,
    /// `None` when the item row was deleted after the order was placed.
    pub item_name: Option<String>,
}

/// An order joined with its supplier's display name and its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithLines {
    pub order: Order,
    pub supplier_name: Option<String>,
    pub lines: Vec<LineWithItem>,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order and its lines as one unit.
    async fn insert(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<OrderWithLines>, StoreError>;

    async fn get(&self, id: OrderId) -> Result<Option<OrderWithLines>, StoreError>;

    /// Write the new status and apply the given stock increments as one
    /// unit. `restock` is empty for every transition that carries no stock
    /// effect; increments target items that still exist (deleted items are
    /// skipped, matching the read-side degradation).
    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        restock: &[(ItemId, i64)],
    ) -> Result<(), StoreError>;
}

/// The store handles threaded through request handlers (explicit dependency
/// injection; no ambient database singleton).
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub suppliers: Arc<dyn SupplierStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    /// In-memory backend (tests/dev).
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            users: store.clone(),
            items: store.clone(),
            suppliers: store.clone(),
            orders: store,
        }
    }

    /// Postgres backend over a shared connection pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PostgresStore::new(pool));
        Self {
            users: store.clone(),
            items: store.clone(),
            suppliers: store.clone(),
            orders: store,
        }
    }
}
