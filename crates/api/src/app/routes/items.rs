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
use greenerp_catalog::{Item, ItemPatch};
use greenerp_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stores.items.list().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::CatalogWrite) {
        return resp;
    }

    let item = match Item::create(body.into_new(), Utc::now()) {
        Ok(item) => item,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stores.items.insert(item.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services.stores.items.get(id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::CatalogWrite) {
        return resp;
    }

    let id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let mut item = match services.stores.items.get(id).await {
        Ok(Some(item)) => item,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    item.apply_patch(patch);

    match services.stores.items.update(item.clone()).await {
        Ok(()) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&user, Operation::CatalogDelete) {
        return resp;
    }

    let id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services.stores.items.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "item deleted" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
