use super::{ModelSource, Predictor, load};
use crate::{Error, Result, config::ModelsConfig};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Crop,
    Price,
    Yield,
}

impl ModelKind {
    /// Width of the feature vector each model was trained on.
    pub fn feature_count(self) -> usize {
        match self {
            Self::Crop => 7,
            Self::Price => 7,
            Self::Yield => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Price => "price",
            Self::Yield => "yield",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelStatus {
    pub crop: bool,
    pub price: bool,
    #[serde(rename = "yield")]
    pub yield_model: bool,
}

/// The three predictor slots. Filled once at start-up and read-only after.
#[derive(Default, Clone)]
pub struct ModelRegistry {
    crop: Option<Arc<dyn Predictor>>,
    price: Option<Arc<dyn Predictor>>,
    yield_model: Option<Arc<dyn Predictor>>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every configured slot. A failed or unconfigured slot stays
    /// empty; requests for it fail with `ModelUnavailable`.
    pub async fn load(config: &ModelsConfig) -> Self {
        let mut registry = Self::empty();

        for (kind, location) in [
            (ModelKind::Crop, &config.crop),
            (ModelKind::Price, &config.price),
            (ModelKind::Yield, &config.yield_model),
        ] {
            let Some(location) = location else {
                warn!("No artifact configured for the {} model", kind);
                continue;
            };

            let source = ModelSource::parse(location);
            match Self::load_slot(kind, &source).await {
                Ok(predictor) => {
                    info!("Loaded {} model from {}", kind, source);
                    registry.set(kind, predictor);
                }
                Err(e) => {
                    warn!("Error loading {} model from {}: {}", kind, source, e);
                }
            }
        }

        registry
    }

    async fn load_slot(kind: ModelKind, source: &ModelSource) -> Result<Arc<dyn Predictor>> {
        let predictor = load(source).await?;
        if let Some(count) = predictor.feature_count() {
            if count != kind.feature_count() {
                return Err(Error::model_load(format!(
                    "artifact expects {} features, the {} model takes {}",
                    count,
                    kind,
                    kind.feature_count()
                )));
            }
        }
        Ok(predictor)
    }

    pub fn with_predictor(mut self, kind: ModelKind, predictor: Arc<dyn Predictor>) -> Self {
        self.set(kind, predictor);
        self
    }

    fn set(&mut self, kind: ModelKind, predictor: Arc<dyn Predictor>) {
        *self.slot_mut(kind) = Some(predictor);
    }

    fn slot(&self, kind: ModelKind) -> Option<&Arc<dyn Predictor>> {
        match kind {
            ModelKind::Crop => self.crop.as_ref(),
            ModelKind::Price => self.price.as_ref(),
            ModelKind::Yield => self.yield_model.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ModelKind) -> &mut Option<Arc<dyn Predictor>> {
        match kind {
            ModelKind::Crop => &mut self.crop,
            ModelKind::Price => &mut self.price,
            ModelKind::Yield => &mut self.yield_model,
        }
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            crop: self.is_loaded(ModelKind::Crop),
            price: self.is_loaded(ModelKind::Price),
            yield_model: self.is_loaded(ModelKind::Yield),
        }
    }

    pub fn predict(&self, kind: ModelKind, features: &[f64]) -> Result<f64> {
        let predictor = self
            .slot(kind)
            .ok_or_else(|| Error::model_unavailable(kind.as_str()))?;

        let value = predictor.predict(features)?;
        if !value.is_finite() {
            return Err(Error::prediction(format!(
                "{} model returned a non-finite value",
                kind
            )));
        }
        Ok(value)
    }
}
