use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use spectrum_core::builder::RegistryBuilder;
use std::collections::BTreeMap;

/// The 2023-24 auction tables.
pub const BUILTIN_DATASET: &str = include_str!("../../data/auction_2023_24.json");

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub region: String,
    #[serde(default)]
    pub blocks: Option<u32>,
    pub quantum_mhz: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub version: String,
    #[serde(default)]
    pub ceilings: BTreeMap<String, f64>,
    pub bands: BTreeMap<String, Vec<AllocationEntry>>,
}

pub fn read_dataset(path: &str) -> DashboardResult<DatasetRegistry> {
    info!("Attempting to read dataset file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_dataset(contents.as_str())
}

pub fn parse_dataset(contents: &str) -> DashboardResult<DatasetRegistry> {
    let ds: DatasetFile = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    build_registry(&ds)
}

pub fn builtin_registry() -> DashboardResult<DatasetRegistry> {
    parse_dataset(BUILTIN_DATASET)
}

pub fn build_registry(ds: &DatasetFile) -> DashboardResult<DatasetRegistry> {
    debug!(
        "build_registry: version {:?}, bands: {:?}",
        ds.version,
        ds.bands.keys().collect::<Vec<_>>()
    );
    for band in ds.ceilings.keys() {
        if !ds.bands.contains_key(band) {
            warn!("Ignoring the ceiling of band {}: no allocation table", band);
        }
    }

    let mut builder = RegistryBuilder::new().version(ds.version.as_str());
    for band in ds.bands.keys() {
        builder = builder
            .band(band, ds.ceilings.get(band).cloned())
            .context(InvalidDatasetSnafu {})?;
    }
    for (band, entries) in ds.bands.iter() {
        for e in entries.iter() {
            builder
                .add_allocation(band, e.region.as_str(), e.blocks, e.quantum_mhz)
                .context(InvalidDatasetSnafu {})?;
        }
    }
    builder.build().context(InvalidDatasetSnafu {})
}
