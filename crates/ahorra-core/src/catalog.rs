//! Offer catalogs.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::models::offer::EnergyOffer;

/// Source of the offers a bill is compared against.
pub trait OfferCatalog {
    /// Offers eligible for comparison, in catalog order.
    fn active_offers(&self) -> Result<Vec<EnergyOffer>>;
}

/// Catalog stored as a JSON array of offers.
#[derive(Debug, Clone)]
pub struct JsonOfferCatalog {
    path: PathBuf,
}

impl JsonOfferCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a JSON offer list and keep the active offers.
    pub fn parse(json: &str) -> std::result::Result<Vec<EnergyOffer>, serde_json::Error> {
        let offers: Vec<EnergyOffer> = serde_json::from_str(json)?;
        Ok(offers.into_iter().filter(|offer| offer.active).collect())
    }
}

impl OfferCatalog for JsonOfferCatalog {
    fn active_offers(&self) -> Result<Vec<EnergyOffer>> {
        let path = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let offers = Self::parse(&content).map_err(|source| CatalogError::Parse { path, source })?;

        debug!("Loaded {} active offers from {}", offers.len(), self.path.display());
        Ok(offers)
    }
}

impl OfferCatalog for [EnergyOffer] {
    fn active_offers(&self) -> Result<Vec<EnergyOffer>> {
        Ok(self.to_vec())
    }
}

impl OfferCatalog for Vec<EnergyOffer> {
    fn active_offers(&self) -> Result<Vec<EnergyOffer>> {
        Ok(self.clone())
    }
}
