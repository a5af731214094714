use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use greenerp_auth::TokenService;
use greenerp_infra::Stores;

#[tokio::main]
async fn main() {
    greenerp_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let tokens = Arc::new(TokenService::new(jwt_secret.as_bytes()));

    let stores = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("failed to connect to database");
            greenerp_infra::schema::init(&pool)
                .await
                .expect("failed to initialize schema");
            Stores::postgres(pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Stores::in_memory()
        }
    };

    let app = greenerp_api::app::build_app(stores, tokens);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
