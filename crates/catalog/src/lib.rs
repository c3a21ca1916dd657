use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use globalbot_core::catalog::{by_region, regions, top_rated};
use globalbot_core::{normalize_catalog, DestinationRecord, NormalizedDestination};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

const BUNDLED_DESTINATIONS: &str = include_str!("../data/destinations.json");

pub trait CatalogSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<DestinationRecord>>;
}

/// Seed destinations compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogSource for BundledCatalog {
    fn describe(&self) -> String {
        "bundled".to_string()
    }

    fn load(&self) -> Result<Vec<DestinationRecord>> {
        serde_json::from_str(BUNDLED_DESTINATIONS)
            .context("bundled destinations are not valid JSON")
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileCatalog {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<DestinationRecord>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading catalog file: {}", self.path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing catalog file: {}", self.path.display()))
    }
}

/// Bundled seed unless a path is given.
pub fn source_for(path: Option<&Path>) -> Box<dyn CatalogSource> {
    match path {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(BundledCatalog),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub source: String,
    pub records_seen: usize,
    pub destinations: Vec<NormalizedDestination>,
    pub skipped: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn build(source: impl Into<String>, records: &[DestinationRecord]) -> Self {
        let (destinations, skipped) = normalize_catalog(records);

        Self {
            source: source.into(),
            records_seen: records.len(),
            destinations,
            skipped: skipped.iter().map(ToString::to_string).collect(),
            loaded_at: Utc::now(),
        }
    }

    pub fn regions(&self) -> Vec<String> {
        regions(&self.destinations)
    }

    pub fn filtered(&self, region: Option<&str>) -> Vec<NormalizedDestination> {
        match region {
            Some(region) => by_region(&self.destinations, region)
                .into_iter()
                .cloned()
                .collect(),
            None => self.destinations.clone(),
        }
    }

    /// Highest rated first, optionally within one region.
    pub fn ranked(&self, region: Option<&str>) -> Vec<NormalizedDestination> {
        top_rated(&self.filtered(region))
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Holds the current normalized catalog. Readers clone the `Arc`; reloads
/// build a new snapshot before swapping it in.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn from_records(source: impl Into<String>, records: &[DestinationRecord]) -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::build(source, records))),
        }
    }

    pub fn from_source(source: &dyn CatalogSource) -> Result<Self> {
        let store = Self::from_records(source.describe(), &[]);
        store.reload(source)?;
        Ok(store)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_source(&BundledCatalog)
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    pub fn reload(&self, source: &dyn CatalogSource) -> Result<Arc<CatalogSnapshot>> {
        let records = source.load()?;
        let snapshot = Arc::new(CatalogSnapshot::build(source.describe(), &records));

        info!(
            source = %snapshot.source,
            destinations = snapshot.destinations.len(),
            skipped = snapshot.skipped.len(),
            "catalog loaded"
        );

        *self.current.write() = snapshot.clone();
        Ok(snapshot)
    }
}
