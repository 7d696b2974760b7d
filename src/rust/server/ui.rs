//! Browser front end that forwards text to the inference backend.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::{error, info};
use minijinja::Environment;
use serde::Deserialize;
use serde_json::json;

use super::backend::{AnalysisResult, AnalyzeError, BackendClient};
use super::pages;

pub struct UiState {
    pub client: BackendClient,
    pub templates: Environment<'static>,
}

impl UiState {
    pub fn new(client: BackendClient) -> Result<Self, minijinja::Error> {
        Ok(Self {
            client,
            templates: pages::environment()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
}

pub fn router(state: Arc<UiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
}

async fn index(State(state): State<Arc<UiState>>) -> Response {
    render(&state, StatusCode::OK, "", None, None)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "sentiment-analyzer-ui" }))
}

async fn analyze(State(state): State<Arc<UiState>>, Form(form): Form<AnalyzeForm>) -> Response {
    if form.text.trim().is_empty() {
        let message = AnalyzeError::EmptyInput.to_string();
        return render(&state, StatusCode::OK, "", None, Some(&message));
    }

    info!("Analyzing text: {}...", form.text.chars().take(50).collect::<String>());
    match state.client.analyze(&form.text).await {
        Ok(result) => render(&state, StatusCode::OK, &form.text, Some(&result), None),
        Err(err) => {
            error!("Error during analysis: {}", err);
            let message = format!("Error analyzing sentiment: {}", err);
            render(&state, err.status_code(), &form.text, None, Some(&message))
        }
    }
}

fn render(
    state: &UiState,
    status: StatusCode,
    input_text: &str,
    result: Option<&AnalysisResult>,
    message: Option<&str>,
) -> Response {
    match pages::render_index(&state.templates, input_text, result, message) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!("Failed to render page: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
