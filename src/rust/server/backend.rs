use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use axum::http::StatusCode;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::{json, Value};

use crate::data::Sentiment;

/// How the UI talks to the inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendProtocol {
    /// `POST /predict` with `{"text": ...}`
    Direct,
    /// `POST /api/v1.0/predictions` with a `{"data": {"ndarray": [[...]]}}` envelope
    Seldon,
}

impl BackendProtocol {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Direct => "/predict",
            Self::Seldon => "/api/v1.0/predictions",
        }
    }

    fn request_body(&self, text: &str) -> Value {
        match self {
            Self::Direct => json!({ "text": text }),
            Self::Seldon => json!({ "data": { "ndarray": [[text]] } }),
        }
    }

    /// Extracts `(label, confidence)` from a backend response body.
    fn parse_response(&self, body: &Value) -> Option<(String, f64)> {
        match self {
            Self::Direct => Some((
                body.get("prediction")?.as_str()?.to_string(),
                body.get("probability")?.as_f64()?,
            )),
            Self::Seldon => {
                let row = body.get("data")?.get("ndarray")?.get(0)?;
                Some((row.get(0)?.as_str()?.to_string(), row.get(1)?.as_f64()?))
            }
        }
    }
}

impl FromStr for BackendProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "seldon" => Ok(Self::Seldon),
            other => Err(format!("Unknown backend protocol '{}'", other)),
        }
    }
}

impl fmt::Display for BackendProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Seldon => f.write_str("seldon"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Please enter some text to analyze.")]
    EmptyInput,
    #[error("Cannot connect to inference backend at {url}: {reason}")]
    BackendUnavailable { url: String, reason: String },
    #[error("Inference backend returned {status}: {message}")]
    BackendStatus { status: StatusCode, message: String },
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// Status code of the page rendered for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput => StatusCode::OK,
            Self::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::BackendStatus { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP client for the inference backend. Requests are bounded by a timeout and never retried.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    protocol: BackendProtocol,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        protocol: BackendProtocol,
        timeout: Duration,
    ) -> Result<Self, AnalyzeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzeError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            protocol,
        })
    }

    pub fn protocol(&self) -> BackendProtocol {
        self.protocol
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.protocol.path())
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        if text.trim().is_empty() {
            return Err(AnalyzeError::EmptyInput);
        }

        let url = self.endpoint();
        let body = self.protocol.request_body(text);
        debug!("POST {} {}", url, body);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach backend at {}: {}", url, e);
                if e.is_connect() || e.is_timeout() || e.is_request() {
                    unavailable(&url, &e)
                } else {
                    AnalyzeError::Internal(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Backend returned {}: {}", status, message);
            let status = StatusCode::from_u16(status.as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(AnalyzeError::BackendStatus { status, message });
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!("Failed to read backend response: {}", e);
            // A body that stalls past the timeout is an unreachable backend
            if e.is_timeout() {
                unavailable(&url, &e)
            } else {
                AnalyzeError::Internal(format!("Malformed backend response: {}", e))
            }
        })?;
        debug!("Backend response: {}", payload);

        let (label, confidence) = self.protocol.parse_response(&payload).ok_or_else(|| {
            AnalyzeError::Internal(format!("Malformed backend response: {}", payload))
        })?;
        let sentiment: Sentiment = label
            .parse()
            .map_err(|_| AnalyzeError::Internal(format!("Unknown sentiment label '{}'", label)))?;

        info!("Prediction: {} ({:.3})", sentiment, confidence);
        Ok(AnalysisResult {
            sentiment,
            confidence,
            text: text.to_string(),
        })
    }
}

fn unavailable(url: &str, e: &reqwest::Error) -> AnalyzeError {
    AnalyzeError::BackendUnavailable {
        url: url.to_string(),
        reason: e.to_string(),
    }
}
