use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use greenerp_auth::Operation;
use greenerp_core::OrderId;
use greenerp_purchasing::{
    LineRequest, Order, OrderStatus, StockEffect, co2_lookup, price_lines, stock_effect,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).put(update_order))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stores.orders.list().await {
        Ok(orders) => {
            let items: Vec<serde_json::Value> = orders.iter().map(dto::order_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `POST /api/purchase-orders`
///
/// Lines referencing unknown items are skipped, not rejected; totals
/// accumulate over the resolvable lines only. The order and its lines are
/// persisted as one unit.
pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::OrderWrite) {
        return resp;
    }

    let Some(supplier_id) = body.supplier_id else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "supplier_id and items are required",
        );
    };

    let requests: Vec<LineRequest> = body
        .items
        .iter()
        .map(|line| LineRequest {
            item_id: line.item_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        })
        .collect();

    let catalog = match services.stores.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };

    let priced = match price_lines(&requests, co2_lookup(&catalog)) {
        Ok(priced) => priced,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if !priced.skipped.is_empty() {
        tracing::warn!(
            skipped = priced.skipped.len(),
            "order lines referenced unknown items and were skipped"
        );
    }

    let status = body.status.unwrap_or(OrderStatus::Draft);
    let (order, lines) = Order::create(supplier_id, user.user_id(), status, priced, Utc::now());
    let order_id = order.id;

    if let Err(e) = services.stores.orders.insert(order, lines).await {
        return errors::store_error_to_response(e);
    }

    match services.stores.orders.get(order_id).await {
        Ok(Some(stored)) => (StatusCode::CREATED, Json(dto::order_to_json(&stored))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.stores.orders.get(id).await {
        Ok(Some(order)) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `PUT /api/purchase-orders/:id`
///
/// Status is the only mutable field. Entering `received` increments each
/// line item's stock exactly once; the status write and the increments
/// commit together.
pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::OrderWrite) {
        return resp;
    }

    let id: OrderId = match id.parse() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    let current = match services.stores.orders.get(id).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let new_status = body.status.unwrap_or_else(|| current.order.status.clone());

    let restock = match stock_effect(&current.order.status, &new_status) {
        StockEffect::ReceiveLines => {
            let lines: Vec<_> = current.lines.iter().map(|l| l.line.clone()).collect();
            Order::restock_plan(&lines)
        }
        StockEffect::None => Vec::new(),
    };

    if !restock.is_empty() {
        tracing::info!(order_id = %id, lines = restock.len(), "order received; incrementing stock");
    }

    if let Err(e) = services.stores.orders.set_status(id, new_status, &restock).await {
        return errors::store_error_to_response(e);
    }

    match services.stores.orders.get(id).await {
        Ok(Some(order)) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
