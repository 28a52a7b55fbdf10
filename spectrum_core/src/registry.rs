use std::collections::HashSet;

use crate::config::*;

/// The allocations of one band, in publication order.
#[derive(PartialEq, Debug, Clone)]
pub struct BandTable {
    pub band: Band,
    pub allocations: Vec<RegionAllocation>,
}

/// Immutable set of band tables for one auction.
///
/// A registry is built once with [`crate::builder::RegistryBuilder`], which
/// checks the invariants on the data, and is then shared by reference with
/// every analysis.
#[derive(PartialEq, Debug, Clone)]
pub struct DatasetRegistry {
    pub(crate) version: Option<String>,
    // Sorted by increasing frequency.
    pub(crate) tables: Vec<BandTable>,
}

impl DatasetRegistry {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The registered bands, by increasing frequency.
    pub fn bands(&self) -> Vec<&Band> {
        self.tables.iter().map(|t| &t.band).collect()
    }

    pub fn band_ids(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.band.id.clone()).collect()
    }

    pub fn band(&self, band_id: &str) -> Result<&Band, SpectrumError> {
        self.table(band_id).map(|t| &t.band)
    }

    /// The allocation table of a band, in publication order.
    pub fn get_band_table(&self, band_id: &str) -> Result<&[RegionAllocation], SpectrumError> {
        self.table(band_id).map(|t| t.allocations.as_slice())
    }

    /// All the region names, in order of first appearance when walking the
    /// bands by increasing frequency.
    pub fn regions(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut res: Vec<String> = Vec::new();
        for t in self.tables.iter() {
            for a in t.allocations.iter() {
                if seen.insert(a.region.as_str()) {
                    res.push(a.region.clone());
                }
            }
        }
        res
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.tables
            .iter()
            .any(|t| t.allocations.iter().any(|a| a.region == region))
    }

    fn table(&self, band_id: &str) -> Result<&BandTable, SpectrumError> {
        self.tables
            .iter()
            .find(|t| t.band.id == band_id)
            .ok_or_else(|| SpectrumError::InvalidBand(band_id.to_string()))
    }
}
