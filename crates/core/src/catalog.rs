use std::cmp::Ordering;

use tracing::warn;

use crate::error::CatalogError;
use crate::models::{DestinationRecord, NormalizedDestination};

/// A name that is missing or only whitespace is rejected; an empty key would
/// match every query.
pub fn normalize_record(
    index: usize,
    record: &DestinationRecord,
) -> Result<NormalizedDestination, CatalogError> {
    let name = match record.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        Some(_) => {
            return Err(CatalogError::InvalidRecord {
                index,
                reason: "name is blank".to_string(),
            })
        }
        None => {
            return Err(CatalogError::InvalidRecord {
                index,
                reason: "name is missing".to_string(),
            })
        }
    };

    Ok(NormalizedDestination {
        id: record.id,
        key: name.to_lowercase(),
        name,
        region: record.region.clone(),
        best_time: record.best_time.clone(),
        avg_cost: record.avg_cost.clone(),
        highlights: record.highlights.clone().unwrap_or_default(),
        attractions: record.attractions.clone().unwrap_or_default(),
        rating: record.rating,
        reviews: record.reviews,
    })
}

/// Normalizes every usable record, keeping catalog order. Records without a
/// name are skipped and returned alongside the result.
pub fn normalize_catalog(
    records: &[DestinationRecord],
) -> (Vec<NormalizedDestination>, Vec<CatalogError>) {
    let mut normalized = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(index, record) {
            Ok(destination) => normalized.push(destination),
            Err(err) => {
                warn!(index, error = %err, "skipping destination record");
                skipped.push(err);
            }
        }
    }

    (normalized, skipped)
}

pub fn try_normalize_catalog(
    records: &[DestinationRecord],
) -> Result<Vec<NormalizedDestination>, CatalogError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

pub fn regions(catalog: &[NormalizedDestination]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for destination in catalog {
        if !seen.iter().any(|region| region == &destination.region) {
            seen.push(destination.region.clone());
        }
    }
    seen
}

pub fn by_region<'a>(
    catalog: &'a [NormalizedDestination],
    region: &str,
) -> Vec<&'a NormalizedDestination> {
    catalog
        .iter()
        .filter(|destination| destination.region == region)
        .collect()
}

pub fn find_by_id(catalog: &[NormalizedDestination], id: u32) -> Option<&NormalizedDestination> {
    catalog.iter().find(|destination| destination.id == Some(id))
}

/// Highest rated first; ties keep catalog order. The input is left untouched.
pub fn top_rated(catalog: &[NormalizedDestination]) -> Vec<&NormalizedDestination> {
    let mut ranked = catalog.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    ranked
}
