use std::collections::HashSet;

use log::debug;

pub use crate::config::*;
use crate::registry::{BandTable, DatasetRegistry};

/// A builder for assembling a dataset registry.
///
/// All the checks on the data happen here, so that a built registry can be
/// trusted by the analysis functions.
///
/// ```
/// pub use spectrum_core::builder::RegistryBuilder;
/// # use spectrum_core::SpectrumError;
///
/// let mut builder = RegistryBuilder::new()
///     .version("2023-24")
///     .band("900MHz", Some(35.0))?
///     .band("1800MHz", None)?;
///
/// builder.add_allocation("900MHz", "Delhi", Some(4), 0.8)?;
/// builder.add_allocation("1800MHz", "Delhi", Some(55), 11.0)?;
///
/// let registry = builder.build()?;
/// assert_eq!(registry.get_band_table("900MHz")?.len(), 1);
///
/// # Ok::<(), SpectrumError>(())
/// ```
pub struct RegistryBuilder {
    pub(crate) _version: Option<String>,
    pub(crate) _tables: Vec<BandTable>,
    _seen: HashSet<(String, String)>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> RegistryBuilder {
        RegistryBuilder {
            _version: None,
            _tables: Vec::new(),
            _seen: HashSet::new(),
        }
    }

    pub fn version(self, version: &str) -> RegistryBuilder {
        RegistryBuilder {
            _version: Some(version.to_string()),
            ..self
        }
    }

    /// Registers a band. Registering the same band twice only updates its ceiling,
    /// which must still hold for the allocations already added.
    pub fn band(
        mut self,
        band_id: &str,
        ceiling_mhz: Option<f64>,
    ) -> Result<RegistryBuilder, SpectrumError> {
        let mut band = Band::parse(band_id)?;
        if let Some(c) = ceiling_mhz {
            if !c.is_finite() || c < 0.0 {
                return Err(SpectrumError::InvalidQuantum {
                    region: "<ceiling>".to_string(),
                    band: band.id,
                    quantum_mhz: c,
                });
            }
        }
        band.ceiling_mhz = ceiling_mhz;
        if let Some(t) = self._tables.iter_mut().find(|t| t.band.id == band.id) {
            if let Some(c) = ceiling_mhz {
                if let Some(a) = t.allocations.iter().find(|a| a.quantum_mhz > c) {
                    return Err(SpectrumError::InvalidQuantum {
                        region: a.region.clone(),
                        band: band.id,
                        quantum_mhz: a.quantum_mhz,
                    });
                }
            }
            t.band.ceiling_mhz = ceiling_mhz;
        } else if self
            ._tables
            .iter()
            .any(|t| t.band.frequency_mhz == band.frequency_mhz)
        {
            // Two spellings of the same band, e.g. `900MHz` and `900 MHz`.
            return Err(SpectrumError::InvalidBand(band_id.to_string()));
        } else {
            self._tables.push(BandTable {
                band,
                allocations: Vec::new(),
            });
        }
        Ok(self)
    }

    /// Adds the allocation of a region in a registered band.
    ///
    /// The quantum must be finite, non-negative and within the ceiling of
    /// the band. A region may only appear once per band.
    pub fn add_allocation(
        &mut self,
        band_id: &str,
        region: &str,
        block_count: Option<u32>,
        quantum_mhz: f64,
    ) -> Result<(), SpectrumError> {
        let table = self
            ._tables
            .iter_mut()
            .find(|t| t.band.id == band_id.trim())
            .ok_or_else(|| SpectrumError::InvalidBand(band_id.to_string()))?;
        let band = table.band.id.clone();

        let region = region.trim();
        if region.is_empty() {
            return Err(SpectrumError::EmptyRegion { band });
        }

        let over_ceiling = table
            .band
            .ceiling_mhz
            .map(|c| quantum_mhz > c)
            .unwrap_or(false);
        if !quantum_mhz.is_finite() || quantum_mhz < 0.0 || over_ceiling {
            return Err(SpectrumError::InvalidQuantum {
                region: region.to_string(),
                band,
                quantum_mhz,
            });
        }

        if !self._seen.insert((band.clone(), region.to_string())) {
            return Err(SpectrumError::DuplicateAllocation {
                region: region.to_string(),
                band,
            });
        }

        table.allocations.push(RegionAllocation {
            region: region.to_string(),
            band,
            block_count,
            quantum_mhz,
        });
        Ok(())
    }

    pub fn build(self) -> Result<DatasetRegistry, SpectrumError> {
        let mut tables = self._tables;
        tables.sort_by_key(|t| t.band.frequency_mhz);
        for t in tables.iter() {
            debug!(
                "build: band {} ({} MHz): {} allocations",
                t.band.id,
                t.band.frequency_mhz,
                t.allocations.len()
            );
        }
        Ok(DatasetRegistry {
            version: self._version,
            tables,
        })
    }
}
