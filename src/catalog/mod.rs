//! Category lookup tables shared by the price and yield models and the
//! crop label set.
//!
//! All tables come from one versioned JSON asset. The copy bundled at build
//! time is used unless `catalog_path` points elsewhere.

mod table;

pub use table::CategoryTable;

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

const BUNDLED_CATALOG: &str = include_str!("../../assets/categories.json");

/// Label returned when the crop model emits a class with no table entry.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    tables: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub version: u32,
    pub districts: CategoryTable,
    pub months: CategoryTable,
    pub markets: CategoryTable,
    pub commodities: CategoryTable,
    pub varieties: CategoryTable,
    pub agri_seasons: CategoryTable,
    pub climate_seasons: CategoryTable,
    pub yield_states: CategoryTable,
    pub yield_districts: CategoryTable,
    pub yield_commodities: CategoryTable,
    pub yield_seasons: CategoryTable,
    pub crops: CategoryTable,
}

impl Catalog {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub async fn load(path: Option<&str>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                debug!("Loading category tables from: {}", path);
                let raw = tokio::fs::read_to_string(path).await?;
                Self::from_json(&raw)?
            }
            None => Self::bundled()?,
        };

        info!(
            "Category tables loaded (version {}, {} tables)",
            catalog.version,
            catalog.tables().len()
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let CatalogFile { version, mut tables } = serde_json::from_str(raw)?;

        let mut take = |name: &str| -> Result<CategoryTable> {
            let entries = tables
                .remove(name)
                .ok_or_else(|| Error::catalog(format!("missing table '{}'", name)))?;
            CategoryTable::new(name, entries)
        };

        Ok(Self {
            version,
            districts: take("districts")?,
            months: take("months")?,
            markets: take("markets")?,
            commodities: take("commodities")?,
            varieties: take("varieties")?,
            agri_seasons: take("agri_seasons")?,
            climate_seasons: take("climate_seasons")?,
            yield_states: take("yield_states")?,
            yield_districts: take("yield_districts")?,
            yield_commodities: take("yield_commodities")?,
            yield_seasons: take("yield_seasons")?,
            crops: take("crops")?,
        })
    }

    pub fn tables(&self) -> Vec<&CategoryTable> {
        vec![
            &self.districts,
            &self.months,
            &self.markets,
            &self.commodities,
            &self.varieties,
            &self.agri_seasons,
            &self.climate_seasons,
            &self.yield_states,
            &self.yield_districts,
            &self.yield_commodities,
            &self.yield_seasons,
            &self.crops,
        ]
    }

    /// Maps a crop-model class label to its name, or [`UNKNOWN_CATEGORY`].
    pub fn crop_name(&self, label: f64) -> &str {
        if !label.is_finite() || label < 0.0 {
            return UNKNOWN_CATEGORY;
        }
        self.crops
            .get(label.round() as usize)
            .unwrap_or(UNKNOWN_CATEGORY)
    }
}
