use crate::model::ModelStatus;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
    pub models: ModelStatus,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub version: u32,
    pub tables: BTreeMap<String, Vec<String>>,
}
