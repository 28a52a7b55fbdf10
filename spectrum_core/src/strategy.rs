use std::fmt::Display;
use std::str::FromStr;

use crate::config::*;

/// The built-in investment strategies.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Strategy {
    /// Low bands, coverage and rural penetration.
    Conservative,
    /// All traditional bands.
    Balanced,
    /// 5G deployment and urban capacity.
    Aggressive,
    /// 5G advanced services.
    FutureReady,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Conservative,
        Strategy::Balanced,
        Strategy::Aggressive,
        Strategy::FutureReady,
    ];

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    pub fn weights(&self) -> ScoreWeights {
        let (name, weights) = self.entry();
        ScoreWeights {
            name: name.to_string(),
            weights: weights.iter().map(|(b, w)| (b.to_string(), *w)).collect(),
            normalization: Normalization::WeightedSum,
        }
    }

    // The name and the weights of each strategy.
    fn entry(&self) -> (&'static str, &'static [(&'static str, f64)]) {
        match self {
            Strategy::Conservative => ("conservative", &[("800MHz", 0.5), ("900MHz", 0.5)]),
            Strategy::Balanced => (
                "balanced",
                &[("800MHz", 0.3), ("900MHz", 0.3), ("1800MHz", 0.4)],
            ),
            Strategy::Aggressive => ("aggressive", &[("1800MHz", 0.4), ("3300MHz", 0.6)]),
            Strategy::FutureReady => ("future-ready", &[("3300MHz", 0.4), ("26GHz", 0.6)]),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    /// Accepts the strategy names and a few common spellings (`Future-Ready`,
    /// `future_ready`, `futureready`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        Strategy::ALL
            .iter()
            .find(|st| st.name().replace('-', "") == norm)
            .copied()
            .ok_or_else(|| format!("unknown strategy {:?}", s))
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The three axes of the opportunity matrix. The total score of a region is
/// the mean of the three axis scores.
#[derive(PartialEq, Debug, Clone)]
pub struct OpportunityModel {
    pub coverage: ScoreWeights,
    pub capacity: ScoreWeights,
    pub future: ScoreWeights,
}

impl Default for OpportunityModel {
    /// Coverage averages 800 and 900 MHz. Capacity averages 1800 MHz with a
    /// tenth of 3300 MHz. Future readiness is a hundredth of 26 GHz.
    fn default() -> Self {
        let mk = |name: &str, weights: &[(&str, f64)]| ScoreWeights {
            name: name.to_string(),
            weights: weights.iter().map(|(b, w)| (b.to_string(), *w)).collect(),
            normalization: Normalization::MeanOfTerms,
        };
        OpportunityModel {
            coverage: mk("coverage", &[("800MHz", 1.0), ("900MHz", 1.0)]),
            capacity: mk("capacity", &[("1800MHz", 1.0), ("3300MHz", 0.1)]),
            future: mk("future", &[("26GHz", 0.01)]),
        }
    }
}

impl OpportunityModel {
    /// All the bands any axis needs, without duplicates.
    pub fn bands(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for sw in [&self.coverage, &self.capacity, &self.future] {
            for b in sw.bands() {
                if !res.contains(&b) {
                    res.push(b);
                }
            }
        }
        res
    }
}
