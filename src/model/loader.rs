use super::{Predictor, TreeEnsemble};
use crate::{Error, Result};
use std::{fmt, path::PathBuf, sync::Arc};
use tracing::debug;

/// Location of a serialized predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local(PathBuf),
    Remote(String),
}

impl ModelSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Remote(location.to_string())
        } else {
            Self::Local(PathBuf::from(location))
        }
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::Local(path) => tokio::fs::read(path).await.map_err(|e| {
                Error::model_load(format!("failed to read {}: {}", path.display(), e))
            }),
            Self::Remote(url) => {
                let response = reqwest::get(url).await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Fetches and deserializes a predictor artifact.
pub async fn load(source: &ModelSource) -> Result<Arc<dyn Predictor>> {
    debug!("Fetching model artifact from {}", source);

    let bytes = source.fetch().await?;
    let model = TreeEnsemble::from_slice(&bytes)?;

    debug!(
        "Loaded ensemble with {} trees over {} features",
        model.trees.len(),
        model.n_features
    );
    Ok(Arc::new(model))
}
