pub mod builder;
mod config;
pub mod manual;
pub mod ranking;
mod registry;
mod strategy;

use log::{debug, info, warn};

use std::collections::HashSet;

pub use crate::config::*;
pub use crate::ranking::*;
pub use crate::registry::*;
pub use crate::strategy::*;

/// Joins the tables of the requested bands into one record per region.
///
/// Arguments:
/// * `registry` the tables to join
/// * `region_filter` the regions to report, in the order they should be reported.
/// If absent or empty, all the regions seen in any requested band are reported, in
/// order of first appearance (bands in the requested order, then table order).
/// * `bands` the columns of the records, in order
/// * `rules` decides what happens to a filtered region that no table knows about
///
/// A region that is missing from a band table gets a quantum of 0 for that band.
pub fn merge(
    registry: &DatasetRegistry,
    region_filter: Option<&[String]>,
    bands: &[String],
    rules: &AnalysisRules,
) -> Result<Vec<UnifiedRegionRecord>, SpectrumError> {
    info!(
        "merge: bands: {:?}, region filter: {:?}, rules: {:?}",
        bands, region_filter, rules
    );

    // Validate all the bands before doing any work.
    let mut columns: Vec<(&str, &[RegionAllocation])> = Vec::new();
    for b in bands.iter() {
        let table = registry.get_band_table(b)?;
        if columns.iter().any(|(b2, _)| *b2 == b.as_str()) {
            debug!("merge: band {} requested twice, keeping the first", b);
            continue;
        }
        columns.push((b.as_str(), table));
    }

    let regions: Vec<String> = match region_filter {
        Some(filter) if !filter.is_empty() => {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut res: Vec<String> = Vec::new();
            for r in filter.iter() {
                if !seen.insert(r.as_str()) {
                    continue;
                }
                if !registry.contains_region(r) {
                    match rules.region_policy {
                        RegionPolicy::Strict => {
                            return Err(SpectrumError::UnknownRegion(r.clone()));
                        }
                        RegionPolicy::ZeroFill => {
                            warn!(
                                "merge: region {:?} is not in any band table, filling with zeros",
                                r
                            );
                        }
                    }
                }
                res.push(r.clone());
            }
            res
        }
        _ => {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut res: Vec<String> = Vec::new();
            for (_, table) in columns.iter() {
                for a in table.iter() {
                    if seen.insert(a.region.as_str()) {
                        res.push(a.region.clone());
                    }
                }
            }
            res
        }
    };

    let records: Vec<UnifiedRegionRecord> = regions
        .into_iter()
        .map(|region| {
            let quantums: Vec<(String, f64)> = columns
                .iter()
                .map(|(band, table)| {
                    let q = table
                        .iter()
                        .find(|a| a.region == region)
                        .map(|a| a.quantum_mhz)
                        .unwrap_or(0.0);
                    (band.to_string(), q)
                })
                .collect();
            UnifiedRegionRecord { region, quantums }
        })
        .collect();
    debug!("merge: {} records", records.len());
    Ok(records)
}

/// Scores every record with the given weights.
///
/// The score is the weighted sum of the quantums. Under
/// [`Normalization::MeanOfTerms`] it is divided by the number of non-zero
/// weights (a score of 0 if there are none).
///
/// A weighted band that is not a column of a record counts as 0, unless the
/// rules reject unknown bands.
pub fn score(
    records: &[UnifiedRegionRecord],
    weights: &ScoreWeights,
    rules: &AnalysisRules,
) -> Result<Vec<ScoredRegion>, SpectrumError> {
    info!(
        "score: {} records with weights {:?} ({:?})",
        records.len(),
        weights.name,
        weights.normalization
    );
    let divisor = match weights.normalization {
        Normalization::WeightedSum => 1.0,
        Normalization::MeanOfTerms => weights.active_terms() as f64,
    };

    let mut res: Vec<ScoredRegion> = Vec::with_capacity(records.len());
    for r in records.iter() {
        let mut sum = 0.0;
        let mut contributions: Vec<(String, f64)> = Vec::with_capacity(weights.weights.len());
        for (band, w) in weights.weights.iter() {
            let q = match (r.get(band), rules.unknown_band_policy) {
                (Some(q), _) => q,
                (None, UnknownBandPolicy::TreatAsZero) => 0.0,
                (None, UnknownBandPolicy::Reject) => {
                    return Err(SpectrumError::UnknownBand(band.clone()));
                }
            };
            sum += w * q;
            contributions.push((band.clone(), q));
        }
        let score = if divisor > 0.0 { sum / divisor } else { 0.0 };
        res.push(ScoredRegion {
            region: r.region.clone(),
            score,
            contributions,
        });
    }
    Ok(res)
}

/// Computes the opportunity matrix: the three axis scores of each region
/// and their mean.
pub fn opportunity_scores(
    records: &[UnifiedRegionRecord],
    model: &OpportunityModel,
    rules: &AnalysisRules,
) -> Result<Vec<OpportunityScore>, SpectrumError> {
    let coverage = score(records, &model.coverage, rules)?;
    let capacity = score(records, &model.capacity, rules)?;
    let future = score(records, &model.future, rules)?;
    let res: Vec<OpportunityScore> = coverage
        .into_iter()
        .zip(capacity)
        .zip(future)
        .map(|((cov, cap), fut)| OpportunityScore {
            total: (cov.score + cap.score + fut.score) / 3.0,
            region: cov.region,
            coverage: cov.score,
            capacity: cap.score,
            future: fut.score,
        })
        .collect();
    debug!("opportunity_scores: {:?}", res);
    Ok(res)
}

/// The total quantum of every band of the registry, by increasing frequency.
pub fn band_totals(registry: &DatasetRegistry) -> Vec<(String, f64)> {
    registry
        .tables
        .iter()
        .map(|t| {
            (
                t.band.id.clone(),
                t.allocations.iter().map(|a| a.quantum_mhz).sum(),
            )
        })
        .collect()
}
