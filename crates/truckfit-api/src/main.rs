use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use truckfit_core::{
    fit_items_in_truck, render_svg, Catalog, FitResult, LoadState, PackerError, Quote,
    SelectedItem, TruckSize,
};

mod config;

use config::ApiConfig;

/// Shared, read-only server state. Loads travel with each request.
struct AppState {
    catalog: Catalog,
}

#[derive(Debug, Deserialize)]
struct FitRequest {
    items: Vec<SelectedItem>,
    truck_size: TruckSize,
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    #[serde(default)]
    load: LoadState,
    item_id: String,
}

#[derive(Debug, Deserialize)]
struct RemoveItemRequest {
    load: LoadState,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct QuoteRequest {
    load: LoadState,
    distance_km: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting truckfit API");

    let config = ApiConfig::from_env();
    let catalog = load_catalog(&config)?;
    info!("Catalog ready with {} items", catalog.items().len());

    let app = app(catalog);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:{}/api/health", addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}

fn load_catalog(config: &ApiConfig) -> anyhow::Result<Catalog> {
    let Some(path) = &config.catalog_path else {
        return Ok(Catalog::furniture());
    };

    info!("Loading catalog from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let catalog = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Catalog::from_yaml(&content)?,
        _ => Catalog::from_json(&content)?,
    };
    Ok(catalog)
}

fn app(catalog: Catalog) -> Router {
    let state = Arc::new(AppState { catalog });

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/catalog", get(list_catalog))
        .route("/api/fit", post(fit))
        .route("/api/load/add", post(add_item))
        .route("/api/load/remove", post(remove_item))
        .route("/api/load/reset", post(reset_load))
        .route("/api/quote", post(quote))
        .route("/api/generate/svg", post(generate_svg))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "truckfit-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}

/// Single packing attempt at a fixed truck size
async fn fit(Json(request): Json<FitRequest>) -> Json<FitResult> {
    info!(
        "Fitting {} items into truck {}",
        request.items.len(),
        request.truck_size
    );

    Json(fit_items_in_truck(&request.items, request.truck_size))
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<LoadState>, AppError> {
    let item = state.catalog.require(&request.item_id)?;
    let load = request.load.add_item(item)?;

    info!(
        "Added '{}': {} items in truck {}",
        request.item_id,
        load.items.len(),
        load.truck_size
    );

    Ok(Json(load))
}

async fn remove_item(Json(request): Json<RemoveItemRequest>) -> Result<Json<LoadState>, AppError> {
    let load = request.load.remove_item(request.index)?;

    info!(
        "Removed item #{}: {} items in truck {}",
        request.index,
        load.items.len(),
        load.truck_size
    );

    Ok(Json(load))
}

async fn reset_load() -> Json<LoadState> {
    Json(LoadState::new())
}

async fn quote(Json(request): Json<QuoteRequest>) -> Json<Quote> {
    Json(request.load.quote(request.distance_km))
}

/// Generate SVG visualization
async fn generate_svg(Json(load): Json<LoadState>) -> Result<Response, AppError> {
    info!("Generating SVG for truck {}", load.truck_size);

    let svg = render_svg(&load).map_err(anyhow::Error::from)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Application error type
struct AppError(anyhow::Error);

impl From<PackerError> for AppError {
    fn from(err: PackerError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<PackerError>() {
            Some(PackerError::CapacityExceeded { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(PackerError::UnknownItem(_)) => StatusCode::NOT_FOUND,
            Some(PackerError::MalformedShape(_)) | Some(PackerError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        (
            self.status(),
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
