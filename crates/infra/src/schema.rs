//! Schema bootstrap.
//!
//! Idempotent DDL applied at startup. Order lines cascade with their order;
//! there is intentionally no foreign key from lines to items nor from orders
//! to suppliers — deleting referenced rows is allowed and reads degrade to
//! null display names.

use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id            UUID PRIMARY KEY,
        name          TEXT NOT NULL,
        sku           TEXT NOT NULL UNIQUE,
        category      TEXT NOT NULL DEFAULT '',
        unit          TEXT NOT NULL DEFAULT '',
        stock         BIGINT NOT NULL DEFAULT 0,
        reorder_level BIGINT NOT NULL DEFAULT 10,
        co2_per_unit  DOUBLE PRECISION NOT NULL DEFAULT 0,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS suppliers (
        id                   UUID PRIMARY KEY,
        name                 TEXT NOT NULL,
        contact_email        TEXT,
        phone                TEXT,
        address              TEXT,
        sustainability_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        certifications       TEXT,
        created_at           TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS purchase_orders (
        id           UUID PRIMARY KEY,
        supplier_id  UUID NOT NULL,
        created_by   UUID NOT NULL,
        status       TEXT NOT NULL,
        order_date   TIMESTAMPTZ NOT NULL,
        total_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
        total_co2    DOUBLE PRECISION NOT NULL DEFAULT 0,
        created_at   TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS purchase_order_lines (
        id         UUID PRIMARY KEY,
        order_id   UUID NOT NULL REFERENCES purchase_orders(id) ON DELETE CASCADE,
        item_id    UUID NOT NULL,
        quantity   BIGINT NOT NULL,
        unit_price DOUBLE PRECISION NOT NULL,
        line_co2   DOUBLE PRECISION NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_order_lines_order ON purchase_order_lines (order_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_lines_item ON purchase_order_lines (item_id)",
];

/// Create all tables if they don't exist.
pub async fn init(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("schema bootstrap complete");
    Ok(())
}
