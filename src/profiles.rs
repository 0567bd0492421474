//! Profile archive loader: building load and PV generation, one row per step.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::DataError;

/// One archive row as stored on disk.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(rename = "loadProfile2")]
    load: f64,
    #[serde(rename = "pvProfile2")]
    pv: f64,
}

/// Building load and PV generation sequences of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    building_load: Vec<f64>,
    pv_generation: Vec<f64>,
}

impl ProfileSet {
    /// Builds a profile set from in-memory sequences.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the sequences are empty, differ in length, or
    /// contain non-finite values.
    pub fn new(building_load: Vec<f64>, pv_generation: Vec<f64>) -> Result<Self, DataError> {
        if building_load.is_empty() || pv_generation.is_empty() {
            return Err(DataError::Empty);
        }
        if building_load.len() != pv_generation.len() {
            return Err(DataError::LengthMismatch {
                load: building_load.len(),
                pv: pv_generation.len(),
            });
        }
        check_finite("loadProfile2", &building_load)?;
        check_finite("pvProfile2", &pv_generation)?;
        Ok(Self {
            building_load,
            pv_generation,
        })
    }

    /// Reads the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if the file is missing or malformed.
    pub fn from_csv_path(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profiles = Self::from_reader(io::BufReader::new(file))?;
        info!(path = %path.display(), n_samples = profiles.len(), "loaded profiles");
        Ok(profiles)
    }

    /// Reads an archive with a `loadProfile2,pvProfile2` header from any reader.
    ///
    /// # Errors
    ///
    /// Returns `DataError` if a row is malformed or a value is not finite.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut building_load = Vec::new();
        let mut pv_generation = Vec::new();
        for row in rdr.deserialize::<ProfileRow>() {
            let row = row?;
            building_load.push(row.load);
            pv_generation.push(row.pv);
        }
        Self::new(building_load, pv_generation)
    }

    pub fn building_load(&self) -> &[f64] {
        &self.building_load
    }

    pub fn pv_generation(&self) -> &[f64] {
        &self.pv_generation
    }

    /// Number of samples in each sequence.
    pub fn len(&self) -> usize {
        self.building_load.len()
    }

    pub fn is_empty(&self) -> bool {
        self.building_load.is_empty()
    }
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), DataError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DataError::NonFinite { field, index }),
        None => Ok(()),
    }
}
