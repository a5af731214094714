use serde::Deserialize;
use serde_json::json;

use greenerp_catalog::NewItem;
use greenerp_core::{ItemId, SupplierId};
use greenerp_infra::OrderWithLines;
use greenerp_purchasing::OrderStatus;
use greenerp_suppliers::NewSupplier;

use crate::context::CurrentUser;

// -------------------------
// Request DTOs
// -------------------------
//
// Required string fields default to "" rather than failing deserialization,
// so a missing field surfaces as the domain's validation error (400) instead
// of an extractor rejection. Optional fields carry the documented defaults.

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_reorder_level")]
    pub reorder_level: i64,
    #[serde(default)]
    pub co2_per_unit: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_reorder_level() -> i64 {
    10
}

fn default_true() -> bool {
    true
}

impl CreateItemRequest {
    pub fn into_new(self) -> NewItem {
        NewItem {
            name: self.name,
            sku: self.sku,
            category: self.category,
            unit: self.unit,
            stock: self.stock,
            reorder_level: self.reorder_level,
            co2_per_unit: self.co2_per_unit,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    #[serde(default)]
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub sustainability_score: f64,
    pub certifications: Option<String>,
}

impl CreateSupplierRequest {
    pub fn into_new(self) -> NewSupplier {
        NewSupplier {
            name: self.name,
            contact_email: self.contact_email,
            phone: self.phone,
            address: self.address,
            sustainability_score: self.sustainability_score,
            certifications: self.certifications,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub item_id: ItemId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Public view of the authenticated user (never includes the password hash).
pub fn current_user_to_json(user: &CurrentUser) -> serde_json::Value {
    json!({
        "id": user.user_id(),
        "username": user.username(),
        "role": user.role(),
        "created_at": user.created_at(),
    })
}

pub fn order_to_json(order: &OrderWithLines) -> serde_json::Value {
    let items: Vec<serde_json::Value> = order
        .lines
        .iter()
        .map(|line| {
            json!({
                "id": line.line.id,
                "order_id": line.line.order_id,
                "item_id": line.line.item_id,
                "item_name": line.item_name,
                "quantity": line.line.quantity,
                "unit_price": line.line.unit_price,
                "line_co2": line.line.line_co2,
                "line_total": line.line.quantity as f64 * line.line.unit_price,
            })
        })
        .collect();

    json!({
        "id": order.order.id,
        "supplier_id": order.order.supplier_id,
        "supplier_name": order.supplier_name,
        "created_by": order.order.created_by,
        "status": order.order.status,
        "order_date": order.order.order_date,
        "total_amount": order.order.total_amount,
        "total_co2": order.order.total_co2,
        "items": items,
        "created_at": order.order.created_at,
    })
}
