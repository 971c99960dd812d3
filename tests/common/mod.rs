#![allow(dead_code)]

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{body::Body, http::Request, response::Response, Router};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use diora_backend::{config::AppConfig, routes::build_router, AppState};

/// Nothing listens on port 1, so every connection attempt fails fast
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Connect to TEST_DATABASE_URL and migrate. `None` when the variable is unset.
pub async fn setup_test_db() -> Option<DatabaseConnection> {
    let database_url = env::var("TEST_DATABASE_URL").ok()?;
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations on test database");
    Some(db)
}

/// Config whose chain and community endpoints are unreachable
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        "SUPPLY_RPC_URL" | "BLOCKCHAIN_RPC_URL" => Some(UNREACHABLE_URL.to_string()),
        "COMMUNITY_API_BASE_URL" => Some(format!("{}/api", UNREACHABLE_URL)),
        _ => None,
    })
    .expect("test config")
}

pub fn app_with_db(db: DatabaseConnection) -> Router {
    build_router(AppState::new(db, test_config()))
}

/// Router without a database, for paths that fail before any query
pub fn offline_app() -> Router {
    app_with_db(DatabaseConnection::Disconnected)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// A 66-char transaction hash unlikely to collide across test runs
pub fn unique_tx_hash() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("0x{:064x}", nanos)
}

/// A lowercase 42-char wallet address
pub fn wallet(n: u64) -> String {
    format!("0x{:040x}", n)
}
