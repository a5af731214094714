//! In-memory backend.
//!
//! Intended for tests/dev. One `RwLock` over the whole state makes every
//! store operation trivially atomic; not optimized for performance.

use std::sync::RwLock;

use async_trait::async_trait;

use greenerp_auth::User;
use greenerp_catalog::Item;
use greenerp_core::{ItemId, OrderId, SupplierId, UserId};
use greenerp_purchasing::{Order, OrderLine, OrderStatus};
use greenerp_suppliers::Supplier;

use super::{
    ItemStore, LineWithItem, OrderStore, OrderWithLines, StoreError, SupplierStore, UserStore,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    items: Vec<Item>,
    suppliers: Vec<Supplier>,
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn join_order(state: &State, order: &Order) -> OrderWithLines {
    let supplier_name = state
        .suppliers
        .iter()
        .find(|s| s.id == order.supplier_id)
        .map(|s| s.name.clone());

    let lines = state
        .lines
        .iter()
        .filter(|l| l.order_id == order.id)
        .map(|l| LineWithItem {
            line: l.clone(),
            item_name: state
                .items
                .iter()
                .find(|i| i.id == l.item_id)
                .map(|i| i.name.clone()),
        })
        .collect();

    OrderWithLines {
        order: order.clone(),
        supplier_name,
        lines,
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn seed(&self, users: Vec<User>) -> Result<(), StoreError> {
        let mut state = self.write();
        if !state.users.is_empty() {
            return Err(StoreError::Conflict("users already initialized".to_string()));
        }
        state.users = users;
        Ok(())
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.username == username).cloned())
    }

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.write();
        if state.items.iter().any(|i| i.sku == item.sku) {
            return Err(StoreError::Conflict(format!("sku '{}' already exists", item.sku)));
        }
        state.items.push(item);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read().items.clone())
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.read().items.iter().find(|i| i.id == id).cloned())
    }

    async fn update(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.write();
        match state.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(StoreError::Missing),
        }
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let mut state = self.write();
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        Ok(state.items.len() < before)
    }
}

#[async_trait]
impl SupplierStore for MemoryStore {
    async fn insert(&self, supplier: Supplier) -> Result<(), StoreError> {
        self.write().suppliers.push(supplier);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Supplier>, StoreError> {
        Ok(self.read().suppliers.clone())
    }

    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError> {
        Ok(self.read().suppliers.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, supplier: Supplier) -> Result<(), StoreError> {
        let mut state = self.write();
        match state.suppliers.iter_mut().find(|s| s.id == supplier.id) {
            Some(slot) => {
                *slot = supplier;
                Ok(())
            }
            None => Err(StoreError::Missing),
        }
    }

    async fn delete(&self, id: SupplierId) -> Result<bool, StoreError> {
        let mut state = self.write();
        let before = state.suppliers.len();
        state.suppliers.retain(|s| s.id != id);
        Ok(state.suppliers.len() < before)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), StoreError> {
        let mut state = self.write();
        state.orders.push(order);
        state.lines.extend(lines);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OrderWithLines>, StoreError> {
        let state = self.read();
        Ok(state.orders.iter().map(|o| join_order(&state, o)).collect())
    }

    async fn get(&self, id: OrderId) -> Result<Option<OrderWithLines>, StoreError> {
        let state = self.read();
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| join_order(&state, o)))
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        restock: &[(ItemId, i64)],
    ) -> Result<(), StoreError> {
        let mut state = self.write();

        let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
            return Err(StoreError::Missing);
        };
        order.status = status;

        for (item_id, quantity) in restock {
            if let Some(item) = state.items.iter_mut().find(|i| i.id == *item_id) {
                item.stock += quantity;
            }
        }

        Ok(())
    }
}
