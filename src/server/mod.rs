mod extract;
pub mod handlers;
mod types;

pub use handlers::AppState;

use crate::{
    Error, Result,
    catalog::Catalog,
    chat::ChatProxy,
    config::Config,
    llm::OpenAiClient,
    model::ModelRegistry,
    prediction::PredictionService,
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

impl AppState {
    /// Loads the catalog and every configured model, then wires the chat
    /// proxy. Model failures leave their slot empty instead of aborting.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref()).await?;
        let models = ModelRegistry::load(&config.models).await;

        if config.llm.api_key.is_empty() {
            warn!("No LLM API key configured; /query requests will fail upstream");
        }
        let client = OpenAiClient::new(config.llm.clone());
        let chat = ChatProxy::new(Arc::new(client), &config.llm, config.chat.clone());

        Ok(Self {
            predictions: PredictionService::new(Arc::new(catalog), Arc::new(models)),
            chat: Arc::new(chat),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::categories))
        .route("/predict-crop", post(handlers::predict_crop))
        .route("/predict-price", post(handlers::predict_price))
        .route("/predict-yield", post(handlers::predict_yield))
        .route("/query", post(handlers::query))
        .with_state(state)
}

/// Credentialed CORS cannot use a wildcard origin, so `*` is a config error.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.iter().any(|origin| origin.trim() == "*") {
        return Err(Error::config(
            "server.cors_origins cannot contain '*'; list the allowed origins explicitly",
        ));
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

pub async fn run(config: Config) -> Result<()> {
    let cors = cors_layer(&config.server.cors_origins)?;
    let state = AppState::initialize(&config).await?;

    let app = router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
