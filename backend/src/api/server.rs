//! HTTP server for the custsync API.
//!
//! Every request re-reads the configured files on tokio's blocking pool;
//! nothing is cached between requests.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                                 |
//! |--------|-------------------|---------------------------------------------|
//! | GET    | `/health`         | Health check                                |
//! | GET    | `/api/customers`  | Parsed customers as a JSON array            |
//! | GET    | `/api/purchases`  | Purchases grouped by customer id            |
//! | POST   | `/api/send`       | Run the pipeline and relay the API response |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use super::types::SendResponse;
use crate::client::ApiClient;
use crate::config::Settings;
use crate::error::{ServerError, ServerResult};
use crate::models::{Customer, PurchaseIndex};
use crate::transform::pipeline::{load_customers, load_purchases, run, run_blocking, SendOptions};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub client: ApiClient,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            client: ApiClient::new(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/customers", get(get_customers))
        .route("/api/purchases", get(get_purchases))
        .route("/api/send", post(send_data))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(addr: SocketAddr, settings: Settings) -> ServerResult<()> {
    info!(
        %addr,
        customers = %settings.customers_file.display(),
        purchases = %settings.purchases_file.display(),
        api_url = %settings.api_url,
        "Starting server"
    );

    let app = router(AppState::new(settings));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("custsync server running on http://{}", addr);
    println!("   GET  /api/customers - Parsed customers");
    println!("   GET  /api/purchases - Purchases by customer");
    println!("   POST /api/send      - Format and send to the API");
    println!("   GET  /health        - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "custsync",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "customers": "GET /api/customers",
            "purchases": "GET /api/purchases",
            "send": "POST /api/send"
        }
    }))
}

async fn get_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ServerError> {
    let path = state.settings.customers_file.clone();
    let customers = run_blocking(move || load_customers(&path)).await.map_err(|e| {
        error!("Failed to load customers: {}", e);
        e
    })?;
    Ok(Json(customers))
}

async fn get_purchases(State(state): State<AppState>) -> Result<Json<PurchaseIndex>, ServerError> {
    let path = state.settings.purchases_file.clone();
    let purchases = run_blocking(move || load_purchases(&path)).await.map_err(|e| {
        error!("Failed to load purchases: {}", e);
        e
    })?;
    Ok(Json(purchases))
}

/// Run the pipeline and answer with the remote status code.
async fn send_data(State(state): State<AppState>) -> Result<(StatusCode, Json<SendResponse>), ServerError> {
    let options = SendOptions::from_settings(&state.settings);
    let report = run(&state.client, &options).await.map_err(|e| {
        error!("Send failed: {}", e);
        e
    })?;

    let status = StatusCode::from_u16(report.transmission.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(SendResponse::from(report.transmission))))
}
