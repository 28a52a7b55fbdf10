// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A licensed frequency band, such as `900MHz` or `26GHz`.
///
/// The identifier is kept verbatim. The frequency is parsed from it and is
/// used to order the bands of a registry.
#[derive(PartialEq, Debug, Clone)]
pub struct Band {
    pub id: String,
    pub frequency_mhz: u32,
    /// The largest quantum that can physically be allocated in this band, if known.
    pub ceiling_mhz: Option<f64>,
}

impl Band {
    /// Parses a band identifier of the form `<number><unit>` where the unit is
    /// `MHz` or `GHz` (case-insensitive, optional space). Decimal values are
    /// accepted for GHz (`3.5GHz`).
    pub fn parse(id: &str) -> Result<Band, SpectrumError> {
        let trimmed = id.trim();
        let lower = trimmed.to_lowercase();
        let (number, factor) = if let Some(n) = lower.strip_suffix("ghz") {
            (n, 1000.0)
        } else if let Some(n) = lower.strip_suffix("mhz") {
            (n, 1.0)
        } else {
            return Err(SpectrumError::InvalidBand(id.to_string()));
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| SpectrumError::InvalidBand(id.to_string()))?;
        let mhz = (value * factor).round();
        if !mhz.is_finite() || mhz <= 0.0 || mhz > u32::MAX as f64 {
            return Err(SpectrumError::InvalidBand(id.to_string()));
        }
        Ok(Band {
            id: trimmed.to_string(),
            frequency_mhz: mhz as u32,
            ceiling_mhz: None,
        })
    }

    /// Human readable label: `900 MHz`, `26 GHz`.
    pub fn label(&self) -> String {
        if self.frequency_mhz >= 10_000 && self.frequency_mhz % 1000 == 0 {
            format!("{} GHz", self.frequency_mhz / 1000)
        } else {
            format!("{} MHz", self.frequency_mhz)
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The allocation of one band in one region.
#[derive(PartialEq, Debug, Clone)]
pub struct RegionAllocation {
    pub region: String,
    pub band: String,
    /// Number of auctioned blocks. The high frequency tables only publish
    /// the quantum, in which case this is `None`.
    pub block_count: Option<u32>,
    pub quantum_mhz: f64,
}

// ******** Output data structures *********

/// One region with a quantum for each requested band, in the requested order.
#[derive(PartialEq, Debug, Clone)]
pub struct UnifiedRegionRecord {
    pub region: String,
    pub quantums: Vec<(String, f64)>,
}

impl UnifiedRegionRecord {
    /// The quantum for this band, or `None` if the band is not one of the
    /// columns of this record.
    pub fn get(&self, band: &str) -> Option<f64> {
        self.quantums
            .iter()
            .find(|(b, _)| b == band)
            .map(|(_, q)| *q)
    }

    /// The quantum for this band, 0 if absent.
    pub fn quantum(&self, band: &str) -> f64 {
        self.get(band).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.quantums.iter().map(|(_, q)| q).sum()
    }
}

/// A region with its composite score and the band values that went into it.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoredRegion {
    pub region: String,
    pub score: f64,
    pub contributions: Vec<(String, f64)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RegionShare {
    pub region: String,
    pub score: f64,
    pub percent: f64,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct DistributionSummary {
    pub count_nonzero: usize,
    /// `None` when there is no non-zero value to average.
    pub mean_of_nonzero: Option<f64>,
    pub total: f64,
}

/// Scores of the opportunity matrix for one region.
#[derive(PartialEq, Debug, Clone)]
pub struct OpportunityScore {
    pub region: String,
    pub coverage: f64,
    pub capacity: f64,
    pub future: f64,
    pub total: f64,
}

/// Errors raised by the analysis. None of them is fatal: each one describes
/// why a single request could not be served.
#[derive(PartialEq, Debug, Clone)]
pub enum SpectrumError {
    /// The band identifier is malformed or is not registered.
    InvalidBand(String),
    /// A filtered region is not present in any band table (strict mode only).
    UnknownRegion(String),
    /// A weighted band is not a column of the records (strict mode only).
    UnknownBand(String),
    InvalidQuantum {
        region: String,
        band: String,
        quantum_mhz: f64,
    },
    InvalidWeight {
        band: String,
        weight: f64,
    },
    DuplicateAllocation {
        region: String,
        band: String,
    },
    EmptyRegion {
        band: String,
    },
}

impl Error for SpectrumError {}

impl Display for SpectrumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumError::InvalidBand(b) => write!(f, "invalid or unregistered band {:?}", b),
            SpectrumError::UnknownRegion(r) => write!(f, "unknown region {:?}", r),
            SpectrumError::UnknownBand(b) => write!(f, "band {:?} is not part of the records", b),
            SpectrumError::InvalidQuantum {
                region,
                band,
                quantum_mhz,
            } => write!(
                f,
                "invalid quantum {} MHz for region {:?} in band {:?}",
                quantum_mhz, region, band
            ),
            SpectrumError::InvalidWeight { band, weight } => {
                write!(f, "invalid weight {} for band {:?}", weight, band)
            }
            SpectrumError::DuplicateAllocation { region, band } => write!(
                f,
                "region {:?} is allocated more than once in band {:?}",
                region, band
            ),
            SpectrumError::EmptyRegion { band } => {
                write!(f, "empty region name in band {:?}", band)
            }
        }
    }
}

// ********* Configuration **********

/// How a weighted sum is turned into a score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Normalization {
    /// The plain weighted sum.
    WeightedSum,
    /// The weighted sum divided by the number of non-zero weights.
    MeanOfTerms,
}

/// What to do with a filtered region that no band table knows about.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RegionPolicy {
    ZeroFill,
    Strict,
}

/// What to do with a weighted band that is not a column of the records.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnknownBandPolicy {
    TreatAsZero,
    Reject,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    pub region_policy: RegionPolicy,
    pub unknown_band_policy: UnknownBandPolicy,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        region_policy: RegionPolicy::ZeroFill,
        unknown_band_policy: UnknownBandPolicy::TreatAsZero,
    };

    pub const STRICT_RULES: AnalysisRules = AnalysisRules {
        region_policy: RegionPolicy::Strict,
        unknown_band_policy: UnknownBandPolicy::Reject,
    };
}

/// A named weighting of bands.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreWeights {
    pub name: String,
    pub weights: Vec<(String, f64)>,
    pub normalization: Normalization,
}

impl ScoreWeights {
    /// Weights must be finite and non-negative, and a band may only be
    /// weighted once.
    pub fn new(
        name: &str,
        weights: &[(&str, f64)],
        normalization: Normalization,
    ) -> Result<ScoreWeights, SpectrumError> {
        for (idx, (band, weight)) in weights.iter().enumerate() {
            let repeated = weights[..idx].iter().any(|(b, _)| b == band);
            if !weight.is_finite() || *weight < 0.0 || repeated {
                return Err(SpectrumError::InvalidWeight {
                    band: band.to_string(),
                    weight: *weight,
                });
            }
        }
        Ok(ScoreWeights {
            name: name.to_string(),
            weights: weights.iter().map(|(b, w)| (b.to_string(), *w)).collect(),
            normalization,
        })
    }

    /// Weight 1 for every band, summed. Scoring with it gives the total
    /// quantum held by a region over these bands.
    pub fn uniform(name: &str, bands: &[String]) -> ScoreWeights {
        ScoreWeights {
            name: name.to_string(),
            weights: bands.iter().map(|b| (b.clone(), 1.0)).collect(),
            normalization: Normalization::WeightedSum,
        }
    }

    pub fn bands(&self) -> Vec<String> {
        self.weights.iter().map(|(b, _)| b.clone()).collect()
    }

    /// The number of terms that actually contribute to the score.
    pub fn active_terms(&self) -> usize {
        self.weights.iter().filter(|(_, w)| *w != 0.0).count()
    }
}
