use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use sentiment_pipeline::server::{BackendClient, BackendProtocol, UiState};
use sentiment_pipeline::{generate, model_server, train, ui, Predictor, TrainingConfig};

/// Starts `app` on an ephemeral local port and returns its base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

/// A backend that counts calls and always answers with `reply`.
fn canned_backend(calls: Arc<AtomicUsize>, status: StatusCode, reply: Value) -> Router {
    let handler = move |State(calls): State<Arc<AtomicUsize>>| {
        let reply = reply.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (status, Json(reply))
        }
    };
    Router::new()
        .route("/predict", post(handler.clone()))
        .route("/api/v1.0/predictions", post(handler))
        .with_state(calls)
}

fn ui_app(base_url: &str, protocol: BackendProtocol, timeout: Duration) -> Router {
    let client = BackendClient::new(base_url, protocol, timeout).unwrap();
    ui::router(Arc::new(UiState::new(client).unwrap()))
}

fn analyze_request(form: &str) -> Request<Body> {
    Request::post("/analyze")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_empty_text_never_reaches_backend() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = canned_backend(
        Arc::clone(&calls),
        StatusCode::OK,
        json!({ "prediction": "positive", "probability": 0.9 }),
    );
    let url = spawn_backend(backend).await;

    for form in ["text=", "text=+++", ""] {
        let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
        let (status, html) = send(app, analyze_request(form)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Please enter some text"), "{}", html);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_and_health() {
    let app = ui_app("http://127.0.0.1:9", BackendProtocol::Direct, Duration::from_secs(1));
    let (status, html) = send(app.clone(), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Sentiment Analyzer"));

    let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "status": "healthy", "service": "sentiment-analyzer-ui" }));
}

#[tokio::test]
async fn test_direct_backend_result_is_rendered() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = canned_backend(
        Arc::clone(&calls),
        StatusCode::OK,
        json!({ "prediction": "neutral", "probability": 0.75 }),
    );
    let url = spawn_backend(backend).await;

    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
    let (status, html) = send(app, analyze_request("text=It+is+fine")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="neutral">neutral<"#), "{}", html);
    assert!(html.contains("75.0%") || html.contains("75%"), "{}", html);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_seldon_protocol_against_real_model_server() {
    let outcome = train(
        &generate(150, 42),
        &TrainingConfig {
            max_iter: 300,
            ..TrainingConfig::default()
        },
    )
    .unwrap();
    let backend = model_server::router(Arc::new(Predictor::with_model(outcome.model)));
    let url = spawn_backend(backend).await;

    let app = ui_app(&url, BackendProtocol::Seldon, Duration::from_secs(5));
    let (status, html) = send(
        app,
        analyze_request("text=Terrible+laptop.+Complete+waste+of+money."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="negative">negative<"#), "{}", html);
}

#[tokio::test]
async fn test_unloaded_backend_status_is_passed_through() {
    let url = spawn_backend(model_server::router(Arc::new(Predictor::new()))).await;
    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
    let (status, html) = send(app, analyze_request("text=amazing%21")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(html.contains("Error analyzing sentiment"));
}

#[tokio::test]
async fn test_backend_error_status_is_passed_through() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = canned_backend(
        Arc::clone(&calls),
        StatusCode::BAD_GATEWAY,
        json!({ "detail": "upstream broke" }),
    );
    let url = spawn_backend(backend).await;

    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
    let (status, _) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_backend_is_service_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let app = ui_app(
        &format!("http://{}", address),
        BackendProtocol::Direct,
        Duration::from_secs(2),
    );
    let (status, html) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(html.contains("Cannot connect"));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "prediction": "positive", "probability": 1.0 }))
        }),
    );
    let url = spawn_backend(backend).await;

    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_millis(200));
    let (status, _) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_backend_stalling_mid_body_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        // Headers and the first body byte arrive, the rest never does
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let app = ui_app(
        &format!("http://{}", address),
        BackendProtocol::Direct,
        Duration::from_millis(300),
    );
    let (status, html) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(html.contains("Cannot connect"), "{}", html);
}

#[tokio::test]
async fn test_malformed_backend_response_is_internal_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = canned_backend(
        Arc::clone(&calls),
        StatusCode::OK,
        json!({ "prediction": "ecstatic", "probability": 0.9 }),
    );
    let url = spawn_backend(backend).await;
    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
    let (status, _) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let garbage = Router::new().route("/predict", post(|| async { "not json" }));
    let url = spawn_backend(garbage).await;
    let app = ui_app(&url, BackendProtocol::Direct, Duration::from_secs(5));
    let (status, _) = send(app, analyze_request("text=hello")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_ui_health_does_not_need_backend() {
    let app = ui_app("http://127.0.0.1:9", BackendProtocol::Seldon, Duration::from_secs(1));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
