// The dashboard views. Each view turns the registry into a JSON document
// for the charting layer.

use log::{debug, warn};

use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;
use spectrum_core::*;

use crate::args::Args;
use crate::dashboard::*;

const DEFAULT_BAND_TOP: usize = 10;
const DEFAULT_OPPORTUNITY_TOP: usize = 5;
const DEFAULT_STRATEGY_TOP: usize = 10;
const HIGH_PRIORITY_QUANTILE: f64 = 0.75;
const MMWAVE_FLOOR_MHZ: u32 = 24_000;

#[derive(PartialEq, Debug, Clone)]
pub enum View {
    Summary,
    Band { band: String, top: usize },
    Compare {
        regions: Vec<String>,
        bands: Vec<String>,
    },
    Opportunities { top: usize },
    Strategy { strategy: Strategy, top: usize },
}

impl View {
    pub fn from_args(args: &Args) -> DashboardResult<View> {
        let res = match args.view.as_deref().unwrap_or("summary") {
            "summary" => View::Summary,
            "band" => View::Band {
                band: match args.band.clone() {
                    Some(b) => b,
                    None => whatever!("The band view requires a --band"),
                },
                top: args.top.unwrap_or(DEFAULT_BAND_TOP),
            },
            "compare" => View::Compare {
                regions: args.regions.clone().unwrap_or_default(),
                bands: args.bands.clone().unwrap_or_default(),
            },
            "opportunities" => View::Opportunities {
                top: args.top.unwrap_or(DEFAULT_OPPORTUNITY_TOP),
            },
            "strategy" => {
                let name = args.strategy.as_deref().unwrap_or("balanced");
                let strategy: Strategy = match name.parse() {
                    Ok(s) => s,
                    Err(msg) => whatever!("{} (expected one of: {})", msg, strategy_names()),
                };
                View::Strategy {
                    strategy,
                    top: args.top.unwrap_or(DEFAULT_STRATEGY_TOP),
                }
            }
            x => whatever!(
                "Unknown view {:?} (expected summary, band, compare, opportunities or strategy)",
                x
            ),
        };
        Ok(res)
    }
}

fn strategy_names() -> String {
    Strategy::ALL
        .iter()
        .map(|s| s.name())
        .collect::<Vec<&str>>()
        .join(", ")
}

pub fn render(
    registry: &DatasetRegistry,
    view: &View,
    rules: &AnalysisRules,
) -> DashboardResult<JSValue> {
    match view {
        View::Summary => Ok(summary_js(registry)),
        View::Band { band, top } => band_js(registry, band, *top, rules),
        View::Compare { regions, bands } => compare_js(registry, regions, bands, rules),
        View::Opportunities { top } => opportunities_js(registry, *top, rules),
        View::Strategy { strategy, top } => strategy_js(registry, *strategy, *top, rules),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn scored_to_json(scores: &[ScoredRegion]) -> Vec<JSValue> {
    scores
        .iter()
        .map(|s| json!({"region": s.region, "score": s.score}))
        .collect()
}

fn distribution_to_json(d: &DistributionSummary) -> JSValue {
    json!({
        "totalMhz": d.total,
        "regionsWithSpectrum": d.count_nonzero,
        // null when no region holds this band
        "averageMhz": d.mean_of_nonzero,
    })
}

// The bands of the registry among the wanted ones. The missing ones are left to
// the scoring rules: zero, or an error in strict mode.
fn available_bands(registry: &DatasetRegistry, wanted: &[String]) -> Vec<String> {
    wanted
        .iter()
        .filter(|b| {
            let present = registry.band(b).is_ok();
            if !present {
                warn!("Band {} is not in the dataset", b);
            }
            present
        })
        .cloned()
        .collect()
}

fn summary_js(registry: &DatasetRegistry) -> JSValue {
    let totals = band_totals(registry);
    let values: Vec<f64> = totals.iter().map(|(_, t)| *t).collect();
    let shares = share_percentages(&values);
    let bands: Vec<JSValue> = registry
        .bands()
        .iter()
        .zip(totals.iter())
        .zip(shares.iter())
        .map(|((band, (_, total)), share)| {
            json!({
                "band": band.id,
                "label": band.label(),
                "totalMhz": total,
                "sharePercent": round2(*share),
            })
        })
        .collect();
    json!({
        "view": "summary",
        "dataset": registry.version(),
        "coverageAreas": registry.regions().len(),
        "bands": bands,
    })
}

fn band_js(
    registry: &DatasetRegistry,
    band_id: &str,
    top: usize,
    rules: &AnalysisRules,
) -> DashboardResult<JSValue> {
    let band = registry.band(band_id).context(AnalysisSnafu {})?;
    let table = registry.get_band_table(band_id).context(AnalysisSnafu {})?;

    let allocations: Vec<JSValue> = table
        .iter()
        .map(|a| json!({"region": a.region, "blocks": a.block_count, "quantumMhz": a.quantum_mhz}))
        .collect();
    let values: Vec<f64> = table.iter().map(|a| a.quantum_mhz).collect();
    let distribution = distribution_summary(&values);

    let columns = vec![band.id.clone()];
    let records = merge(registry, None, &columns, rules).context(AnalysisSnafu {})?;
    let scores = score(&records, &ScoreWeights::uniform(band_id, &columns), rules)
        .context(AnalysisSnafu {})?;
    let best = top_n(&scores, top);
    debug!("band_js: top {}: {:?}", top, best);

    Ok(json!({
        "view": "band",
        "band": band.id,
        "label": band.label(),
        "ceilingMhz": band.ceiling_mhz,
        "allocations": allocations,
        "summary": distribution_to_json(&distribution),
        "top": scored_to_json(&best),
    }))
}

fn compare_js(
    registry: &DatasetRegistry,
    regions: &[String],
    bands: &[String],
    rules: &AnalysisRules,
) -> DashboardResult<JSValue> {
    // Without explicit bands, every band is a column but the millimetre wave
    // bands are left out of the totals.
    let (columns, total_bands): (Vec<String>, Vec<String>) = if bands.is_empty() {
        let low_mid: Vec<String> = registry
            .bands()
            .iter()
            .filter(|b| b.frequency_mhz < MMWAVE_FLOOR_MHZ)
            .map(|b| b.id.clone())
            .collect();
        (registry.band_ids(), low_mid)
    } else {
        let mut unique: Vec<String> = Vec::new();
        for b in bands.iter() {
            if !unique.contains(b) {
                unique.push(b.clone());
            }
        }
        (unique.clone(), unique)
    };
    let records = merge(registry, Some(regions), &columns, rules).context(AnalysisSnafu {})?;
    let totals = score(&records, &ScoreWeights::uniform("total", &total_bands), rules)
        .context(AnalysisSnafu {})?;
    let shares = percentage_share(&totals);

    let rows: Vec<JSValue> = records
        .iter()
        .zip(shares.iter())
        .map(|(r, share)| {
            let quantums: Vec<JSValue> = r
                .quantums
                .iter()
                .map(|(b, q)| json!({"band": b, "quantumMhz": q}))
                .collect();
            json!({
                "region": r.region,
                "quantums": quantums,
                "totalMhz": share.score,
                "marketSharePercent": round2(share.percent),
            })
        })
        .collect();

    Ok(json!({
        "view": "compare",
        "bands": columns,
        "totalBands": total_bands,
        "regions": rows,
    }))
}

fn opportunities_js(
    registry: &DatasetRegistry,
    top: usize,
    rules: &AnalysisRules,
) -> DashboardResult<JSValue> {
    let model = OpportunityModel::default();
    let columns = available_bands(registry, &model.bands());
    let records = merge(registry, None, &columns, rules).context(AnalysisSnafu {})?;
    let opportunities = opportunity_scores(&records, &model, rules).context(AnalysisSnafu {})?;

    let axis = |f: fn(&OpportunityScore) -> f64| -> Vec<ScoredRegion> {
        let scores: Vec<ScoredRegion> = opportunities
            .iter()
            .map(|o| ScoredRegion {
                region: o.region.clone(),
                score: f(o),
                contributions: vec![],
            })
            .collect();
        top_n(&scores, top)
    };
    let top_coverage = axis(|o| o.coverage);
    let top_capacity = axis(|o| o.capacity);

    let high_priority: Vec<String> = above_quantile(&opportunities, HIGH_PRIORITY_QUANTILE)
        .into_iter()
        .map(|o| o.region)
        .collect();

    let matrix: Vec<JSValue> = opportunities
        .iter()
        .map(|o| {
            json!({
                "region": o.region,
                "coverage": o.coverage,
                "capacity": o.capacity,
                "future": o.future,
                "total": o.total,
            })
        })
        .collect();

    Ok(json!({
        "view": "opportunities",
        "matrix": matrix,
        "topCoverage": scored_to_json(&top_coverage),
        "topCapacity": scored_to_json(&top_capacity),
        "highPriority": high_priority,
    }))
}

fn strategy_js(
    registry: &DatasetRegistry,
    strategy: Strategy,
    top: usize,
    rules: &AnalysisRules,
) -> DashboardResult<JSValue> {
    let weights = strategy.weights();
    let columns = available_bands(registry, &weights.bands());
    let records = merge(registry, None, &columns, rules).context(AnalysisSnafu {})?;
    let scores = score(&records, &weights, rules).context(AnalysisSnafu {})?;
    let best = top_n(&scores, top);
    let range = score_range(&scores);

    let weights_js: Vec<JSValue> = weights
        .weights
        .iter()
        .map(|(b, w)| json!({"band": b, "weight": w}))
        .collect();

    Ok(json!({
        "view": "strategy",
        "strategy": strategy.name(),
        "weights": weights_js,
        "top": scored_to_json(&best),
        "topRegion": top_n(&scores, 1).first().map(|s| s.region.clone()),
        "scoreRange": range.map(|(lo, hi)| json!({"min": lo, "max": hi})),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::dataset_reader::builtin_registry;
    use clap::Parser;

    fn args(xs: &[&str]) -> Args {
        let mut v = vec!["specauction"];
        v.extend_from_slice(xs);
        Args::try_parse_from(v).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn render_args(xs: &[&str]) -> DashboardResult<JSValue> {
        let reg = builtin_registry()?;
        let view = View::from_args(&args(xs))?;
        render(&reg, &view, &AnalysisRules::DEFAULT_RULES)
    }

    #[test]
    fn parse_views() {
        assert_eq!(View::from_args(&args(&[])).unwrap(), View::Summary);
        assert_eq!(
            View::from_args(&args(&["--view", "band", "--band", "900MHz"])).unwrap(),
            View::Band {
                band: "900MHz".to_string(),
                top: 10
            }
        );
        assert_eq!(
            View::from_args(&args(&[
                "--view",
                "compare",
                "--regions",
                "Delhi",
                "--regions",
                "Kerala"
            ]))
            .unwrap(),
            View::Compare {
                regions: vec!["Delhi".to_string(), "Kerala".to_string()],
                bands: vec![],
            }
        );
        assert_eq!(
            View::from_args(&args(&["--view", "strategy", "--strategy", "future-ready", "--top", "3"]))
                .unwrap(),
            View::Strategy {
                strategy: Strategy::FutureReady,
                top: 3
            }
        );
    }

    #[test]
    fn parse_view_errors() {
        assert!(View::from_args(&args(&["--view", "band"])).is_err());
        assert!(View::from_args(&args(&["--view", "heatmap"])).is_err());
        assert!(View::from_args(&args(&["--view", "strategy", "--strategy", "yolo"])).is_err());
    }

    #[test]
    fn summary_totals() {
        let js = render_args(&[]).unwrap();
        assert_eq!(js["dataset"], "2023-24");
        assert_eq!(js["coverageAreas"], 22);
        let bands = js["bands"].as_array().unwrap();
        assert_eq!(bands.len(), 8);
        assert_eq!(bands[0]["band"], "800MHz");
        assert!(approx(bands[0]["totalMhz"].as_f64().unwrap(), 118.75));
        assert_eq!(bands[7]["label"], "26 GHz");
        assert!(approx(bands[7]["totalMhz"].as_f64().unwrap(), 8700.0));
        let share_sum: f64 = bands
            .iter()
            .map(|b| b["sharePercent"].as_f64().unwrap())
            .sum();
        assert!((share_sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn band_view_high_frequency() {
        let js = render_args(&["--view", "band", "--band", "2300MHz", "--top", "3"]).unwrap();
        assert_eq!(js["summary"]["regionsWithSpectrum"], 6);
        assert!(approx(js["summary"]["averageMhz"].as_f64().unwrap(), 10.0));
        assert_eq!(js["allocations"].as_array().unwrap().len(), 22);
        assert_eq!(js["allocations"][0]["blocks"], JSValue::Null);
        let top = js["top"].as_array().unwrap();
        assert_eq!(top.len(), 3);
        // Ties keep the table order.
        assert_eq!(top[0]["region"], "Andhra Pradesh");
        assert_eq!(top[1]["region"], "Delhi");
    }

    #[test]
    fn band_view_unknown_band() {
        let res = render_args(&["--view", "band", "--band", "700MHz"]);
        assert!(matches!(res, Err(DashboardError::Analysis { .. })));
    }

    #[test]
    fn compare_scenario() {
        let js = render_args(&[
            "--view",
            "compare",
            "--regions",
            "Delhi",
            "--regions",
            "Kerala",
            "--bands",
            "900MHz",
            "--bands",
            "1800MHz",
        ])
        .unwrap();
        let rows = js["regions"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["region"], "Delhi");
        assert!(approx(rows[0]["quantums"][1]["quantumMhz"].as_f64().unwrap(), 11.0));
        assert!(approx(rows[1]["totalMhz"].as_f64().unwrap(), 26.8));
        // 11.8 / 38.6 and 26.8 / 38.6
        assert_eq!(rows[0]["marketSharePercent"], 30.57);
        assert_eq!(rows[1]["marketSharePercent"], 69.43);
    }

    #[test]
    fn compare_unknown_region_zero_filled() {
        let js = render_args(&["--view", "compare", "--regions", "Goa"]).unwrap();
        let rows = js["regions"].as_array().unwrap();
        assert_eq!(rows[0]["totalMhz"], 0.0);
        assert_eq!(rows[0]["marketSharePercent"], 0.0);

        let reg = builtin_registry().unwrap();
        let view = View::from_args(&args(&["--view", "compare", "--regions", "Goa"])).unwrap();
        let res = render(&reg, &view, &AnalysisRules::STRICT_RULES);
        assert!(matches!(res, Err(DashboardError::Analysis { .. })));
    }

    #[test]
    fn strategy_conservative() {
        let js = render_args(&["--view", "strategy", "--strategy", "conservative"]).unwrap();
        assert_eq!(js["topRegion"], "Bihar");
        assert!(approx(js["top"][0]["score"].as_f64().unwrap(), 10.9));
        assert_eq!(js["top"].as_array().unwrap().len(), 10);
        assert!(approx(js["scoreRange"]["max"].as_f64().unwrap(), 10.9));
    }

    #[test]
    fn compare_default_totals_leave_out_mmwave() {
        let js = render_args(&["--view", "compare", "--regions", "Delhi,Kerala"]).unwrap();
        assert_eq!(js["bands"].as_array().unwrap().len(), 8);
        let total_bands = js["totalBands"].as_array().unwrap();
        assert_eq!(total_bands.len(), 7);
        assert!(!total_bands.contains(&json!("26GHz")));
        let rows = js["regions"].as_array().unwrap();
        // The 26 GHz column is still shown.
        assert!(approx(rows[0]["quantums"][7]["quantumMhz"].as_f64().unwrap(), 450.0));
        // Delhi: 6.25 + 0.8 + 11 + 10 + 10 + 0 + 50, without the 450 MHz of 26 GHz.
        assert!(approx(rows[0]["totalMhz"].as_f64().unwrap(), 88.05));

        // Asked explicitly, 26 GHz counts.
        let js = render_args(&["--view", "compare", "--regions", "Delhi", "--bands", "26GHz"])
            .unwrap();
        assert!(approx(js["regions"][0]["totalMhz"].as_f64().unwrap(), 450.0));

        // A band given twice is counted once.
        let js = render_args(&["--view", "compare", "--regions", "Delhi", "--bands", "900MHz,900MHz"])
            .unwrap();
        assert!(approx(js["regions"][0]["totalMhz"].as_f64().unwrap(), 0.8));
    }

    #[test]
    fn strategy_top_region_ignores_top() {
        let js = render_args(&["--view", "strategy", "--strategy", "conservative", "--top", "0"])
            .unwrap();
        assert_eq!(js["top"].as_array().unwrap().len(), 0);
        assert_eq!(js["topRegion"], "Bihar");
        assert!(approx(js["scoreRange"]["max"].as_f64().unwrap(), 10.9));
    }

    #[test]
    fn opportunities_matrix() {
        let js = render_args(&["--view", "opportunities"]).unwrap();
        let matrix = js["matrix"].as_array().unwrap();
        assert_eq!(matrix.len(), 22);
        assert_eq!(js["topCoverage"].as_array().unwrap().len(), 5);
        // Bihar: (10 + 11.8) / 2
        assert_eq!(js["topCoverage"][0]["region"], "Bihar");
        assert!(approx(js["topCoverage"][0]["score"].as_f64().unwrap(), 10.9));
        let high = js["highPriority"].as_array().unwrap();
        assert!(!high.is_empty() && high.len() < 22);
    }
}
