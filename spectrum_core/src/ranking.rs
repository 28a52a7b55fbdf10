//! Ranking and aggregation over scored regions.
//!
//! None of these functions returns NaN: a zero total gives zero shares and
//! an empty selection gives `None`.

use log::debug;

use crate::config::*;

/// The `n` best regions, by decreasing score.
///
/// The sort is stable: regions with the same score keep their input order.
/// Asking for more regions than available returns all of them.
pub fn top_n(results: &[ScoredRegion], n: usize) -> Vec<ScoredRegion> {
    let mut sorted: Vec<ScoredRegion> = results.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

/// The share of each value in the total, in percent.
///
/// All shares are 0 when the total is 0.
pub fn share_percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        debug!("share_percentages: zero total over {} values", values.len());
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| 100.0 * v / total).collect()
}

pub fn percentage_share(results: &[ScoredRegion]) -> Vec<RegionShare> {
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    results
        .iter()
        .zip(share_percentages(&scores))
        .map(|(r, percent)| RegionShare {
            region: r.region.clone(),
            score: r.score,
            percent,
        })
        .collect()
}

pub fn distribution_summary(values: &[f64]) -> DistributionSummary {
    let nonzero: Vec<f64> = values.iter().cloned().filter(|v| *v != 0.0).collect();
    let total: f64 = values.iter().sum();
    let mean_of_nonzero = if nonzero.is_empty() {
        None
    } else {
        Some(nonzero.iter().sum::<f64>() / nonzero.len() as f64)
    };
    DistributionSummary {
        count_nonzero: nonzero.len(),
        mean_of_nonzero,
        total,
    }
}

/// The `q`-quantile of the values, interpolating linearly between the two
/// closest ranks.
///
/// Returns `None` for an empty input or a `q` outside of `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// The regions whose total opportunity score is strictly above the
/// `q`-quantile of all the totals, in input order.
pub fn above_quantile(scores: &[OpportunityScore], q: f64) -> Vec<OpportunityScore> {
    let totals: Vec<f64> = scores.iter().map(|s| s.total).collect();
    match quantile(&totals, q) {
        Some(threshold) => {
            debug!("above_quantile: threshold for q={}: {}", q, threshold);
            scores
                .iter()
                .filter(|s| s.total > threshold)
                .cloned()
                .collect()
        }
        None => vec![],
    }
}

/// The lowest and the highest score.
pub fn score_range(results: &[ScoredRegion]) -> Option<(f64, f64)> {
    results.iter().map(|r| r.score).fold(None, |acc, s| match acc {
        None => Some((s, s)),
        Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
    })
}
