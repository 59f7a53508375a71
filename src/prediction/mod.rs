//! Request validation, feature assembly and result resolution for the
//! three tabular models.

mod types;

pub use types::*;

use crate::{
    Result,
    catalog::{Catalog, CategoryTable},
    model::{ModelKind, ModelRegistry},
    validation,
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PredictionService {
    catalog: Arc<Catalog>,
    models: Arc<ModelRegistry>,
}

impl PredictionService {
    pub fn new(catalog: Arc<Catalog>, models: Arc<ModelRegistry>) -> Self {
        Self { catalog, models }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn recommend_crop(&self, request: &CropRecommendationRequest) -> Result<CropRecommendation> {
        validation::check(request)?;

        // Column order of the training frame: N, P, K, temperature, humidity, pH, rainfall.
        let features = [
            request.nitrogen,
            request.phosphorus,
            request.potassium,
            request.temperature,
            request.humidity,
            request.ph,
            request.rainfall,
        ];

        let label = self.models.predict(ModelKind::Crop, &features)?;
        let recommended_crop = self.catalog.crop_name(label).to_string();
        info!("Crop model label {} -> {}", label, recommended_crop);

        Ok(CropRecommendation { recommended_crop })
    }

    pub fn estimate_price(&self, request: &PriceEstimationRequest) -> Result<PriceEstimate> {
        validation::check(request)?;

        let catalog = &self.catalog;
        let (district, district_name) = catalog.districts.resolve_index("district", request.district)?;
        let (month, month_name) = catalog.months.resolve_index("month", request.month - 1)?;
        let (market, market_name) = catalog.markets.resolve_index("market", request.market)?;
        let (commodity, commodity_name) =
            catalog.commodities.resolve_index("commodity", request.commodity)?;
        let (variety, variety_name) = catalog.varieties.resolve_index("variety", request.variety)?;
        let (agri_season, agri_season_name) =
            catalog.agri_seasons.resolve_index("agri_season", request.agri_season)?;
        let (climate_season, climate_season_name) = catalog
            .climate_seasons
            .resolve_index("climate_season", request.climate_season)?;

        let features = [
            district as f64,
            month as f64,
            market as f64,
            commodity as f64,
            variety as f64,
            agri_season as f64,
            climate_season as f64,
        ];
        debug!("Price features: {:?}", features);

        let predicted_price = self.models.predict(ModelKind::Price, &features)?;
        info!(
            "Estimated price {:.2} for {} at {}",
            predicted_price, commodity_name, market_name
        );

        Ok(PriceEstimate {
            district: district_name.to_string(),
            month: month_name.to_string(),
            market: market_name.to_string(),
            commodity: commodity_name.to_string(),
            variety: variety_name.to_string(),
            agri_season: agri_season_name.to_string(),
            climate_season: climate_season_name.to_string(),
            predicted_price,
        })
    }

    pub fn estimate_yield(&self, request: &YieldEstimationRequest) -> Result<YieldEstimate> {
        validation::check(request)?;

        let catalog = &self.catalog;
        let (state, state_name) = resolve(&catalog.yield_states, "state", &request.state)?;
        let (district, district_name) =
            resolve(&catalog.yield_districts, "district", &request.district)?;
        let (commodity, commodity_name) =
            resolve(&catalog.yield_commodities, "commodity", &request.commodity)?;
        let (season, season_name) = resolve(&catalog.yield_seasons, "season", &request.season)?;

        let features = [
            state as f64,
            district as f64,
            commodity as f64,
            season as f64,
            request.area_hectare,
        ];
        debug!("Yield features: {:?}", features);

        let predicted_yield_ton_ha = self.models.predict(ModelKind::Yield, &features)?;
        info!(
            "Estimated yield {:.3} t/ha for {} in {}",
            predicted_yield_ton_ha, commodity_name, district_name
        );

        Ok(YieldEstimate {
            state: state_name.to_string(),
            district: district_name.to_string(),
            commodity: commodity_name.to_string(),
            season: season_name.to_string(),
            area_hectare: request.area_hectare,
            predicted_yield_ton_ha,
        })
    }
}

fn resolve<'a>(table: &'a CategoryTable, field: &str, value: &CategoryRef) -> Result<(usize, &'a str)> {
    match value {
        CategoryRef::Index(index) => table.resolve_index(field, *index),
        CategoryRef::Name(name) => table.resolve_name(field, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, model::Predictor};
    use std::sync::Mutex;

    /// Records the last feature vector and answers with a fixed value.
    struct Recording {
        value: f64,
        seen: Mutex<Vec<f64>>,
    }

    impl Predictor for Recording {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            *self.seen.lock().unwrap() = features.to_vec();
            Ok(self.value)
        }
    }

    fn recording(value: f64) -> Arc<Recording> {
        Arc::new(Recording {
            value,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn service(kind: ModelKind, predictor: Arc<Recording>) -> PredictionService {
        PredictionService::new(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(ModelRegistry::empty().with_predictor(kind, predictor)),
        )
    }

    fn crop_request() -> CropRecommendationRequest {
        CropRecommendationRequest {
            nitrogen: 90.0,
            phosphorus: 40.0,
            potassium: 41.0,
            ph: 6.5,
            humidity: 80.0,
            rainfall: 200.0,
            temperature: 25.0,
        }
    }

    #[test]
    fn test_crop_features_follow_training_columns() {
        let model = recording(36.0);
        let service = service(ModelKind::Crop, model.clone());

        let result = service.recommend_crop(&crop_request()).unwrap();

        assert_eq!(result.recommended_crop, "rice");
        assert_eq!(
            *model.seen.lock().unwrap(),
            vec![90.0, 40.0, 41.0, 25.0, 80.0, 6.5, 200.0]
        );
    }

    #[test]
    fn test_crop_out_of_set_label_is_unknown() {
        let service = service(ModelKind::Crop, recording(99.0));
        let result = service.recommend_crop(&crop_request()).unwrap();
        assert_eq!(result.recommended_crop, "Unknown");
    }

    #[test]
    fn test_price_month_is_shifted_and_names_resolved() {
        let model = recording(2500.0);
        let service = service(ModelKind::Price, model.clone());
        let request = PriceEstimationRequest {
            district: 22,
            month: 1,
            market: 0,
            commodity: 53,
            variety: 28,
            agri_season: 1,
            climate_season: 3,
        };

        let estimate = service.estimate_price(&request).unwrap();

        assert_eq!(estimate.district, "Pune");
        assert_eq!(estimate.month, "January");
        assert_eq!(estimate.commodity, "Onion");
        assert_eq!(estimate.variety, "Local");
        assert_eq!(estimate.agri_season, "Rabi");
        assert_eq!(estimate.climate_season, "Winter");
        assert_eq!(estimate.predicted_price, 2500.0);
        assert_eq!(
            *model.seen.lock().unwrap(),
            vec![22.0, 0.0, 0.0, 53.0, 28.0, 1.0, 3.0]
        );
    }

    #[test]
    fn test_invalid_request_never_reaches_model() {
        let model = recording(1.0);
        let service = service(ModelKind::Price, model.clone());
        let request = PriceEstimationRequest {
            district: 0,
            month: 1,
            market: 0,
            commodity: 0,
            variety: 0,
            agri_season: 0,
            climate_season: 4,
        };

        let err = service.estimate_price(&request).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "climate_season"));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_yield_accepts_names_and_indices() {
        let model = recording(3.2);
        let service = service(ModelKind::Yield, model.clone());
        let request = YieldEstimationRequest {
            state: CategoryRef::Name("Maharashtra".to_string()),
            district: CategoryRef::Index(24),
            commodity: CategoryRef::Name("Wheat".to_string()),
            season: CategoryRef::Name("Rabi".to_string()),
            area_hectare: 2.5,
        };

        let estimate = service.estimate_yield(&request).unwrap();

        assert_eq!(estimate.district, "Pune");
        assert_eq!(estimate.commodity, "Wheat");
        assert_eq!(estimate.predicted_yield_ton_ha, 3.2);
        assert_eq!(*model.seen.lock().unwrap(), vec![0.0, 24.0, 105.0, 1.0, 2.5]);
    }

    #[test]
    fn test_yield_unknown_name_is_rejected() {
        let service = service(ModelKind::Yield, recording(1.0));
        let request = YieldEstimationRequest {
            state: CategoryRef::Name("Gujarat".to_string()),
            district: CategoryRef::Index(0),
            commodity: CategoryRef::Index(0),
            season: CategoryRef::Index(0),
            area_hectare: 1.0,
        };
        let err = service.estimate_yield(&request).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for 'state': unknown state 'Gujarat'");
    }
}
