use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CropRecommendationRequest {
    #[validate(range(min = 0.0, max = 140.0, message = "must be between 0 and 140"))]
    pub nitrogen: f64,
    #[validate(range(min = 0.0, max = 140.0, message = "must be between 0 and 140"))]
    pub phosphorus: f64,
    #[validate(range(min = 0.0, max = 200.0, message = "must be between 0 and 200"))]
    pub potassium: f64,
    #[validate(range(min = 0.0, max = 14.0, message = "must be between 0 and 14"))]
    pub ph: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub humidity: f64,
    #[validate(range(min = 0.0, max = 300.0, message = "must be between 0 and 300"))]
    pub rainfall: f64,
    #[validate(range(min = 0.0, max = 50.0, message = "must be between 0 and 50"))]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub recommended_crop: String,
}

/// Indices into the price tables. `month` is 1-based, everything else
/// is a 0-based table position.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PriceEstimationRequest {
    pub district: i64,
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: i64,
    pub market: i64,
    pub commodity: i64,
    pub variety: i64,
    pub agri_season: i64,
    pub climate_season: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub district: String,
    pub month: String,
    pub market: String,
    pub commodity: String,
    pub variety: String,
    pub agri_season: String,
    pub climate_season: String,
    pub predicted_price: f64,
}

/// A categorical field given either as a table index or as the exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Index(i64),
    Name(String),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct YieldEstimationRequest {
    pub state: CategoryRef,
    pub district: CategoryRef,
    pub commodity: CategoryRef,
    pub season: CategoryRef,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub area_hectare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimate {
    pub state: String,
    pub district: String,
    pub commodity: String,
    pub season: String,
    pub area_hectare: f64,
    pub predicted_yield_ton_ha: f64,
}
