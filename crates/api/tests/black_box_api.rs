use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use greenerp_auth::TokenService;
use greenerp_infra::Stores;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the production router over the in-memory backend and bind it to
    /// an ephemeral port.
    async fn spawn() -> Self {
        let tokens = Arc::new(TokenService::new(b"test-secret"));
        let app = greenerp_api::app::build_app(Stores::in_memory(), tokens);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn seed_users(client: &reqwest::Client, base_url: &str) {
    let res = client
        .post(format!("{base_url}/api/auth/init-users"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn login(client: &reqwest::Client, base_url: &str, username: &str, password: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login failed for {username}");
    let body: serde_json::Value = res.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_item(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    sku: &str,
    co2_per_unit: f64,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/api/items"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "sku": sku, "co2_per_unit": co2_per_unit }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_supplier(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/api/suppliers"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn get_item(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    id: &str,
) -> serde_json::Value {
    let res = client
        .get(format!("{base_url}/api/items/{id}"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn ping_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/ping", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/items", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/items", srv.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_roundtrip_resolves_the_same_user() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["role"], "admin");
    let token = body["access_token"].as_str().unwrap();

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["username"], "admin");
    assert_eq!(me["role"], "admin");
    assert!(me["id"].is_string());
    assert!(me["created_at"].is_string());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;

    let wrong_password = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "admin", "password": "nope" }))
        .send()
        .await
        .unwrap();
    let unknown_user = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "ghost", "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn login_with_missing_fields_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeding_twice_conflicts_and_keeps_existing_users() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;

    let res = client
        .post(format!("{}/api/auth/init-users", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // First seeding is untouched.
    login(&client, &srv.base_url, "admin", "admin123").await;
}

#[tokio::test]
async fn role_matrix_is_enforced() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;

    let proc = login(&client, &srv.base_url, "proc_mgr", "proc123").await;
    let sust = login(&client, &srv.base_url, "sust_mgr", "sust123").await;

    // Sustainability manager cannot mutate anything.
    for (path, body) in [
        ("/api/items", json!({ "name": "x", "sku": "S-1" })),
        ("/api/suppliers", json!({ "name": "x" })),
        ("/api/purchase-orders", json!({ "supplier_id": null, "items": [] })),
    ] {
        let res = client
            .post(format!("{}{path}", srv.base_url))
            .bearer_auth(&sust)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "expected 403 on {path}");
    }

    // Procurement manager cannot read reports; sustainability manager can.
    for path in [
        "/api/reports/emissions-by-item",
        "/api/reports/emissions-by-supplier",
        "/api/reports/ai-recommendations",
    ] {
        let res = client
            .get(format!("{}{path}", srv.base_url))
            .bearer_auth(&proc)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "expected 403 on {path}");

        let res = client
            .get(format!("{}{path}", srv.base_url))
            .bearer_auth(&sust)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "expected 200 on {path}");
    }

    // Procurement manager may mutate; plain reads are open to any role.
    create_item(&client, &srv.base_url, &proc, "Widget", "WID-1", 0.0).await;
    let res = client
        .get(format!("{}/api/items", srv.base_url))
        .bearer_auth(&sust)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn item_partial_update_keeps_absent_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;

    let res = client
        .post(format!("{}/api/items", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "Recycled Paper",
            "sku": "PAP-001",
            "category": "office",
            "unit": "ream",
            "reorder_level": 20,
            "co2_per_unit": 1.5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/items/{id}", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "stock": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let updated = get_item(&client, &srv.base_url, &admin, id).await;
    assert_eq!(updated["stock"], 50);
    assert_eq!(updated["name"], "Recycled Paper");
    assert_eq!(updated["sku"], "PAP-001");
    assert_eq!(updated["category"], "office");
    assert_eq!(updated["unit"], "ream");
    assert_eq!(updated["reorder_level"], 20);
    assert_eq!(updated["co2_per_unit"], 1.5);
    assert_eq!(updated["is_active"], true);
}

#[tokio::test]
async fn item_crud_edges() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;
    let proc = login(&client, &srv.base_url, "proc_mgr", "proc123").await;

    // Missing SKU is a validation error.
    let res = client
        .post(format!("{}/api/items", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "name": "No Sku" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let created = create_item(&client, &srv.base_url, &admin, "Widget", "WID-1", 0.0).await;
    let id = created["id"].as_str().unwrap();

    // Duplicate SKU conflicts.
    let res = client
        .post(format!("{}/api/items", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Widget Again", "sku": "WID-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Deletion is admin-only.
    let res = client
        .delete(format!("{}/api/items/{id}", srv.base_url))
        .bearer_auth(&proc)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/items/{id}", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/items/{id}", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Malformed id is a 400, not a 404.
    let res = client
        .get(format!("{}/api/items/not-a-uuid", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_totals_and_silent_line_skip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;

    let a = create_item(&client, &srv.base_url, &admin, "Steel", "ST-1", 2.0).await;
    let b = create_item(&client, &srv.base_url, &admin, "Paper", "PA-1", 1.0).await;
    let supplier = create_supplier(&client, &srv.base_url, &admin, "EcoSupply").await;

    // One line references an item that does not exist: skipped, not an error.
    let ghost = "00000000-0000-0000-0000-000000000000";
    let res = client
        .post(format!("{}/api/purchase-orders", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({
            "supplier_id": supplier["id"],
            "items": [
                { "item_id": a["id"], "quantity": 3, "unit_price": 10.0 },
                { "item_id": b["id"], "quantity": 2, "unit_price": 5.0 },
                { "item_id": ghost, "quantity": 99, "unit_price": 1000.0 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();

    assert_eq!(order["total_amount"], 40.0);
    assert_eq!(order["total_co2"], 8.0);
    assert_eq!(order["status"], "draft");
    assert_eq!(order["supplier_name"], "EcoSupply");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["line_co2"], 6.0);
    assert_eq!(order["items"][0]["line_total"], 30.0);
    assert_eq!(order["items"][1]["line_co2"], 2.0);
}

#[tokio::test]
async fn order_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;
    let supplier = create_supplier(&client, &srv.base_url, &admin, "EcoSupply").await;

    // No supplier.
    let res = client
        .post(format!("{}/api/purchase-orders", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "items": [{ "item_id": "00000000-0000-0000-0000-000000000000" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // No lines.
    let res = client
        .post(format!("{}/api/purchase-orders", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "supplier_id": supplier["id"], "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receiving_restocks_exactly_once() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;

    let a = create_item(&client, &srv.base_url, &admin, "Steel", "ST-1", 2.0).await;
    let b = create_item(&client, &srv.base_url, &admin, "Paper", "PA-1", 1.0).await;
    let supplier = create_supplier(&client, &srv.base_url, &admin, "EcoSupply").await;

    let res = client
        .post(format!("{}/api/purchase-orders", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({
            "supplier_id": supplier["id"],
            "items": [
                { "item_id": a["id"], "quantity": 3, "unit_price": 10.0 },
                { "item_id": b["id"], "quantity": 2, "unit_price": 5.0 },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap();

    let set_status = |status: &'static str| {
        let client = &client;
        let base = &srv.base_url;
        let admin = &admin;
        async move {
            let res = client
                .put(format!("{base}/api/purchase-orders/{order_id}"))
                .bearer_auth(admin)
                .json(&json!({ "status": status }))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            let body: serde_json::Value = res.json().await.unwrap();
            assert_eq!(body["status"], status);
        }
    };

    // First receipt increments stock by the line quantities.
    set_status("received").await;
    let item_a = get_item(&client, &srv.base_url, &admin, a["id"].as_str().unwrap()).await;
    let item_b = get_item(&client, &srv.base_url, &admin, b["id"].as_str().unwrap()).await;
    assert_eq!(item_a["stock"], 3);
    assert_eq!(item_b["stock"], 2);

    // Receiving again is idempotent.
    set_status("received").await;
    let item_a = get_item(&client, &srv.base_url, &admin, a["id"].as_str().unwrap()).await;
    assert_eq!(item_a["stock"], 3);

    // Leaving `received` never decrements.
    set_status("draft").await;
    let item_a = get_item(&client, &srv.base_url, &admin, a["id"].as_str().unwrap()).await;
    let item_b = get_item(&client, &srv.base_url, &admin, b["id"].as_str().unwrap()).await;
    assert_eq!(item_a["stock"], 3);
    assert_eq!(item_b["stock"], 2);

    // And a fresh receipt after leaving increments again (one-way guard is
    // per-transition, not per-order-lifetime).
    set_status("received").await;
    let item_a = get_item(&client, &srv.base_url, &admin, a["id"].as_str().unwrap()).await;
    assert_eq!(item_a["stock"], 6);
}

#[tokio::test]
async fn deleting_a_referenced_supplier_degrades_reads() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_users(&client, &srv.base_url).await;
    let admin = login(&client, &srv.base_url, "admin", "admin123").await;

    let item = create_item(&client, &srv.base_url, &admin, "Steel", "ST-1", 2.0).await;
    let supplier = create_supplier(&client, &srv.base_url, &admin, "EcoSupply").await;

    let res = client
        .post(format!("{}/api/purchase-orders", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({
            "supplier_id": supplier["id"],
            "items": [{ "item_id": item["id"], "quantity": 1, "unit_price": 1.0 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap();

    // Deleting the referenced supplier is allowed.
    let res = client
        .delete(format!("{}/api/suppliers/{}", srv.base_url, supplier["id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The order still reads; the display name degrades to null.
    let res = client
        .get(format!("{}/api/purchase-orders/{order_id}", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert!(fetched["supplier_name"].is_null());
}
