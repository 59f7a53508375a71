use super::extract::JsonBody;
use super::types::{CatalogResponse, HealthResponse, WelcomeResponse};
use crate::{
    Result,
    chat::{ChatProxy, QueryRequest, QueryResponse},
    prediction::{
        CropRecommendation, CropRecommendationRequest, PredictionService, PriceEstimate,
        PriceEstimationRequest, YieldEstimate, YieldEstimationRequest,
    },
};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::info;

/// Everything a handler may touch. Built once before the listener binds
/// and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub predictions: PredictionService,
    pub chat: Arc<ChatProxy>,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Agrosarthi API",
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        models: state.predictions.models().status(),
    })
}

pub async fn categories(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = state.predictions.catalog();
    Json(CatalogResponse {
        version: catalog.version,
        tables: catalog
            .tables()
            .into_iter()
            .map(|table| (table.name().to_string(), table.entries().to_vec()))
            .collect(),
    })
}

pub async fn predict_crop(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CropRecommendationRequest>,
) -> Result<Json<CropRecommendation>> {
    info!("Received crop recommendation request");
    let result = state.predictions.recommend_crop(&request)?;
    Ok(Json(result))
}

pub async fn predict_price(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PriceEstimationRequest>,
) -> Result<Json<PriceEstimate>> {
    info!("Received price estimation request");
    let result = state.predictions.estimate_price(&request)?;
    Ok(Json(result))
}

pub async fn predict_yield(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<YieldEstimationRequest>,
) -> Result<Json<YieldEstimate>> {
    info!("Received yield estimation request");
    let result = state.predictions.estimate_yield(&request)?;
    Ok(Json(result))
}

pub async fn query(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let response = state.chat.answer(&request.query).await?;
    Ok(Json(QueryResponse { response }))
}
