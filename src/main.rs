use axum::{middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use orgchart_api::config;
use orgchart_api::database::DatabaseManager;
use orgchart_api::handlers::structure::{departments, employees};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting orgchart API in {:?} mode", config.environment);

    if let Err(e) = DatabaseManager::migrate().await {
        panic!("failed to run migrations: {}", e);
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("orgchart API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Structure API (token required)
        .merge(structure_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn structure_routes() -> Router {
    use axum::routing::put;

    Router::new()
        .route(
            "/api/structure/departments",
            get(departments::departments_list).post(departments::department_create),
        )
        .route(
            "/api/structure/departments/:id",
            put(departments::department_update).delete(departments::department_delete),
        )
        .route("/api/structure/employees", get(employees::employees_list))
        .layer(middleware::from_fn(
            orgchart_api::middleware::auth::identity_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "ok": true,
        "name": "orgchart-api",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "departments": "/api/structure/departments[/:id] (token required)",
            "employees": "/api/structure/employees (token required)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "ok": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "ok": false,
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
