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
use greenerp_core::SupplierId;
use greenerp_suppliers::{Supplier, SupplierPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stores.suppliers.list().await {
        Ok(suppliers) => (
            StatusCode::OK,
            Json(serde_json::json!({ "items": suppliers })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateSupplierRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::SupplierWrite) {
        return resp;
    }

    let supplier = match Supplier::create(body.into_new(), Utc::now()) {
        Ok(supplier) => supplier,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stores.suppliers.insert(supplier.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(supplier)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid supplier id");
        }
    };

    match services.stores.suppliers.get(id).await {
        Ok(Some(supplier)) => (StatusCode::OK, Json(supplier)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "supplier not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(patch): Json<SupplierPatch>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::SupplierWrite) {
        return resp;
    }

    let id: SupplierId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid supplier id");
        }
    };

    let mut supplier = match services.stores.suppliers.get(id).await {
        Ok(Some(supplier)) => supplier,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "supplier not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    supplier.apply_patch(patch);

    match services.stores.suppliers.update(supplier.clone()).await {
        Ok(()) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::SupplierDelete) {
        return resp;
    }

    let id: SupplierId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid supplier id");
        }
    };

    match services.stores.suppliers.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "supplier deleted" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "supplier not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
