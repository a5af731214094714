use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use greenerp_auth::Operation;
use greenerp_core::SupplierId;
use greenerp_infra::OrderWithLines;
use greenerp_purchasing::{Order, OrderLine};

use crate::app::services::AppServices;
use crate::app::errors;
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/emissions-by-item", get(emissions_by_item))
        .route("/emissions-by-supplier", get(emissions_by_supplier))
        .route("/ai-recommendations", get(ai_recommendations))
}

fn split_orders(fetched: Vec<OrderWithLines>) -> (Vec<Order>, Vec<OrderLine>, HashMap<SupplierId, String>) {
    let mut orders = Vec::with_capacity(fetched.len());
    let mut lines = Vec::new();
    let mut supplier_names = HashMap::new();

    for entry in fetched {
        if let Some(name) = entry.supplier_name {
            supplier_names.insert(entry.order.supplier_id, name);
        }
        lines.extend(entry.lines.into_iter().map(|l| l.line));
        orders.push(entry.order);
    }

    (orders, lines, supplier_names)
}

pub async fn emissions_by_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::ReportRead) {
        return resp;
    }

    let items = match services.stores.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };
    let fetched = match services.stores.orders.list().await {
        Ok(orders) => orders,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (_, lines, _) = split_orders(fetched);

    let report = greenerp_reports::emissions_by_item(&items, &lines);
    (StatusCode::OK, Json(serde_json::json!({ "items": report }))).into_response()
}

pub async fn emissions_by_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::ReportRead) {
        return resp;
    }

    let fetched = match services.stores.orders.list().await {
        Ok(orders) => orders,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (orders, _, supplier_names) = split_orders(fetched);

    let report = greenerp_reports::emissions_by_supplier(&orders, |id| {
        supplier_names.get(&id).cloned()
    });
    (StatusCode::OK, Json(serde_json::json!({ "items": report }))).into_response()
}

pub async fn ai_recommendations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::ReportRead) {
        return resp;
    }

    let fetched = match services.stores.orders.list().await {
        Ok(orders) => orders,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (orders, _, supplier_names) = split_orders(fetched);

    let report = greenerp_reports::recommendations(&orders, |id| supplier_names.get(&id).cloned());
    (StatusCode::OK, Json(report)).into_response()
}
