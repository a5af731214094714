//! Postgres backend.
//!
//! Runtime-bound queries with manual row mapping. The two multi-row writes
//! (order + lines, status + restock) run inside transactions so a failure
//! between statements leaves no partial state.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use greenerp_auth::{Role, User};
use greenerp_catalog::Item;
use greenerp_core::{ItemId, OrderId, OrderLineId, SupplierId, UserId};
use greenerp_purchasing::{Order, OrderLine, OrderStatus};
use greenerp_suppliers::Supplier;

use super::{
    ItemStore, LineWithItem, OrderStore, OrderWithLines, StoreError, SupplierStore, UserStore,
};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unique_conflict(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(format!("{what} already exists"));
        }
    }
    StoreError::Database(e)
}

fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role: Role = role
        .parse()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_item(row: &PgRow) -> Result<Item, sqlx::Error> {
    Ok(Item {
        id: ItemId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        category: row.try_get("category")?,
        unit: row.try_get("unit")?,
        stock: row.try_get("stock")?,
        reorder_level: row.try_get("reorder_level")?,
        co2_per_unit: row.try_get("co2_per_unit")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_supplier(row: &PgRow) -> Result<Supplier, sqlx::Error> {
    Ok(Supplier {
        id: SupplierId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        contact_email: row.try_get("contact_email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        sustainability_score: row.try_get("sustainability_score")?,
        certifications: row.try_get("certifications")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_order(row: &PgRow) -> Result<Order, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Order {
        id: OrderId::from_uuid(row.try_get("id")?),
        supplier_id: SupplierId::from_uuid(row.try_get("supplier_id")?),
        created_by: UserId::from_uuid(row.try_get("created_by")?),
        status: OrderStatus::from(status),
        order_date: row.try_get("order_date")?,
        total_amount: row.try_get("total_amount")?,
        total_co2: row.try_get("total_co2")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_line(row: &PgRow) -> Result<LineWithItem, sqlx::Error> {
    Ok(LineWithItem {
        line: OrderLine {
            id: OrderLineId::from_uuid(row.try_get("id")?),
            order_id: OrderId::from_uuid(row.try_get("order_id")?),
            item_id: ItemId::from_uuid(row.try_get("item_id")?),
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
            line_co2: row.try_get("line_co2")?,
        },
        item_name: row.try_get("item_name")?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn seed(&self, users: Vec<User>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users) AS seeded")
            .fetch_one(&mut *tx)
            .await?;
        let seeded: bool = row.try_get("seeded")?;
        if seeded {
            return Err(StoreError::Conflict("users already initialized".to_string()));
        }

        for user in &users {
            sqlx::query(
                r#"
                INSERT INTO users (id, username, password_hash, role, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user.id.as_uuid())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_conflict(e, "username"))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)).transpose()?)
    }

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)).transpose()?)
    }
}

const ITEM_COLUMNS: &str =
    "id, name, sku, category, unit, stock, reorder_level, co2_per_unit, is_active, created_at";

#[async_trait]
impl ItemStore for PostgresStore {
    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO items
              (id, name, sku, category, unit, stock, reorder_level, co2_per_unit, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.sku)
        .bind(&item.category)
        .bind(&item.unit)
        .bind(item.stock)
        .bind(item.reorder_level)
        .bind(item.co2_per_unit)
        .bind(item.is_active)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_conflict(e, "sku"))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(row_to_item)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| row_to_item(&r)).transpose()?)
    }

    async fn update(&self, item: Item) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $2, category = $3, unit = $4, stock = $5,
                reorder_level = $6, co2_per_unit = $7, is_active = $8
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.unit)
        .bind(item.stock)
        .bind(item.reorder_level)
        .bind(item.co2_per_unit)
        .bind(item.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const SUPPLIER_COLUMNS: &str =
    "id, name, contact_email, phone, address, sustainability_score, certifications, created_at";

#[async_trait]
impl SupplierStore for PostgresStore {
    async fn insert(&self, supplier: Supplier) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO suppliers
              (id, name, contact_email, phone, address, sustainability_score, certifications, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(supplier.id.as_uuid())
        .bind(&supplier.name)
        .bind(&supplier.contact_email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.sustainability_score)
        .bind(&supplier.certifications)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Supplier>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(row_to_supplier)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_supplier(&r)).transpose()?)
    }

    async fn update(&self, supplier: Supplier) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $2, contact_email = $3, phone = $4, address = $5,
                sustainability_score = $6, certifications = $7
            WHERE id = $1
            "#,
        )
        .bind(supplier.id.as_uuid())
        .bind(&supplier.name)
        .bind(&supplier.contact_email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.sustainability_score)
        .bind(&supplier.certifications)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }
        Ok(())
    }

    async fn delete(&self, id: SupplierId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.supplier_id, o.created_by, o.status, o.order_date,
           o.total_amount, o.total_co2, o.created_at,
           s.name AS supplier_name
    FROM purchase_orders o
    LEFT JOIN suppliers s ON s.id = o.supplier_id
"#;

const LINE_SELECT: &str = r#"
    SELECT l.id, l.order_id, l.item_id, l.quantity, l.unit_price, l.line_co2,
           i.name AS item_name
    FROM purchase_order_lines l
    LEFT JOIN items i ON i.id = l.item_id
    WHERE l.order_id = ANY($1)
    ORDER BY l.id
"#;

impl PostgresStore {
    async fn lines_for(&self, order_ids: &[Uuid]) -> Result<Vec<LineWithItem>, StoreError> {
        let rows = sqlx::query(LINE_SELECT)
            .bind(order_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(row_to_line)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO purchase_orders
              (id, supplier_id, created_by, status, order_date, total_amount, total_co2, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.supplier_id.as_uuid())
        .bind(order.created_by.as_uuid())
        .bind(order.status.as_str())
        .bind(order.order_date)
        .bind(order.total_amount)
        .bind(order.total_co2)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO purchase_order_lines
                  (id, order_id, item_id, quantity, unit_price, line_co2)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(line.id.as_uuid())
            .bind(line.order_id.as_uuid())
            .bind(line.item_id.as_uuid())
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_co2)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OrderWithLines>, StoreError> {
        let rows = sqlx::query(&format!("{ORDER_SELECT} ORDER BY o.created_at, o.id"))
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(OrderWithLines {
                order: row_to_order(row)?,
                supplier_name: row.try_get("supplier_name")?,
                lines: Vec::new(),
            });
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| *o.order.id.as_uuid()).collect();
        for line in self.lines_for(&ids).await? {
            if let Some(order) = orders.iter_mut().find(|o| o.order.id == line.line.order_id) {
                order.lines.push(line);
            }
        }

        Ok(orders)
    }

    async fn get(&self, id: OrderId) -> Result<Option<OrderWithLines>, StoreError> {
        let Some(row) = sqlx::query(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let lines = self.lines_for(&[*id.as_uuid()]).await?;

        Ok(Some(OrderWithLines {
            order: row_to_order(&row)?,
            supplier_name: row.try_get("supplier_name")?,
            lines,
        }))
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        restock: &[(ItemId, i64)],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE purchase_orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }

        for (item_id, quantity) in restock {
            sqlx::query("UPDATE items SET stock = stock + $2 WHERE id = $1")
                .bind(item_id.as_uuid())
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
