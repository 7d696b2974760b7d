//! JSON endpoints serving the loaded model directly.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::predictor::{HealthStatus, PredictInput, Predictor};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: String,
    pub probability: f64,
}

/// Request envelope of the Seldon-style prediction endpoint
#[derive(Debug, Deserialize)]
pub struct SeldonRequest {
    pub data: SeldonData,
}

#[derive(Debug, Deserialize)]
pub struct SeldonData {
    pub ndarray: PredictInput,
}

pub fn router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/api/v1.0/predictions", post(seldon_predict))
        .with_state(predictor)
}

async fn health(State(predictor): State<Arc<Predictor>>) -> impl IntoResponse {
    match predictor.health() {
        Ok(status) => (StatusCode::OK, Json(status)),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable",
                model_loaded: false,
            }),
        ),
    }
}

async fn predict(
    State(predictor): State<Arc<Predictor>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let prediction = predictor.predict(&request.text)?;
    info!(
        "Predicted {} ({:.3}) for {} bytes of text",
        prediction.sentiment,
        prediction.confidence,
        request.text.len()
    );
    Ok(Json(PredictResponse {
        prediction: prediction.sentiment.to_string(),
        probability: prediction.confidence,
    }))
}

async fn seldon_predict(
    State(predictor): State<Arc<Predictor>>,
    Json(request): Json<SeldonRequest>,
) -> Result<Json<Value>, ApiError> {
    let prediction = predictor.predict_input(request.data.ndarray)?;
    Ok(Json(json!({
        "data": {
            "names": ["sentiment", "confidence"],
            "ndarray": [[prediction.sentiment.as_str(), prediction.confidence]],
        }
    })))
}
