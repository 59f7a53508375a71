use agrosarthi_rust::{
    catalog::Catalog,
    chat::ChatProxy,
    config::{ChatConfig, LlmConfig},
    model::{ModelKind, ModelRegistry, Predictor},
    prediction::PredictionService,
    server::{self, AppState},
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

use super::mocks::MockLlmClient;

/// Builds the application router around the given predictors and LLM mock
pub fn create_test_app(
    predictors: Vec<(ModelKind, Arc<dyn Predictor>)>,
    llm: Arc<MockLlmClient>,
) -> Router {
    let registry = predictors
        .into_iter()
        .fold(ModelRegistry::empty(), |registry, (kind, predictor)| {
            registry.with_predictor(kind, predictor)
        });

    let catalog = Catalog::bundled().expect("bundled catalog must load");
    let chat = ChatProxy::new(llm, &LlmConfig::default(), ChatConfig::default());

    server::router(AppState {
        predictions: PredictionService::new(Arc::new(catalog), Arc::new(registry)),
        chat: Arc::new(chat),
    })
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a file into the temp directory and return its path
pub async fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).await.unwrap();
    path.to_string_lossy().to_string()
}

/// One-stump regressor over `n_features` inputs: feature 0 <= 10 gives
/// `low`, anything above gives `high`
pub fn stump_artifact(n_features: usize, low: f64, high: f64) -> String {
    serde_json::json!({
        "format_version": 1,
        "aggregation": "sum",
        "n_features": n_features,
        "base_score": 0.0,
        "trees": [{
            "nodes": [
                {"feature": 0, "threshold": 10.0, "left": 1, "right": 2},
                {"value": low},
                {"value": high}
            ]
        }]
    })
    .to_string()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8081
  logs:
    level: "debug"
  cors_origins:
    - "http://localhost:5500"

models:
  crop: "model/crop_model.json"
  price: "https://storage.example.com/price_model.json"

llm:
  base_url: "http://localhost:9999/v1"
  api_key: "test-api-key"
  model: "gemini-2.0-flash"
  temperature: 0.2

chat:
  max_query_chars: 500
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: "not-a-number"
"#;
