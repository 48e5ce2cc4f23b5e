//! HTTP API
//!
//! ## Endpoints
//! - `POST /api/predict` — Predict survival for one passenger (JSON)
//! - `GET  /health` — Health check
//!
//! Request bodies are validated by the JSON extractor; a body with missing
//! required fields or wrong types never reaches the predictor.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::features::FeatureRow;
use crate::predict::Predictor;
use crate::{PassengerRecord, PredictionResult, Result, ServerConfig};

/// Build the application router around a loaded predictor
pub fn router(predictor: Predictor) -> Router {
    Router::new()
        .route("/api/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .with_state(predictor)
}

/// Start the HTTP server.
///
/// Blocks until the server shuts down.
pub async fn serve(config: &ServerConfig, predictor: Predictor) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Serving predictions on http://{}", addr);

    axum::serve(listener, router(predictor)).await?;
    Ok(())
}

/// `POST /api/predict`
async fn predict_handler(
    State(predictor): State<Predictor>,
    Json(passenger): Json<PassengerRecord>,
) -> Json<PredictionResult> {
    Json(predictor.predict(&passenger))
}

/// `GET /health`
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "features": FeatureRow::DIM,
    }))
}
