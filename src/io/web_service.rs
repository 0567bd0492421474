//! Web-service payload: the solver inputs packed into one JSON document.
//!
//! Shape:
//! `{"GlobalParameters": {}, "Inputs": {"config": [{"xml_file_header": ..}],
//! "forecast": [{"forecast_header": ..}], "measure": [{"measure_header": ..}]}}`.
//! The header values are strings: the flattened configuration document and
//! the JSON text of the row records.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::OutputError;
use crate::forecast::Forecasts;
use crate::manager::EnergyManager;
use crate::measure::Measures;
use crate::table::DATETIME_FORMAT;

/// Top-level payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebServiceInput {
    #[serde(rename = "GlobalParameters")]
    pub global_parameters: GlobalParameters,
    #[serde(rename = "Inputs")]
    pub inputs: Inputs,
}

/// Always empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalParameters {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub config: Vec<ConfigHeader>,
    pub forecast: Vec<ForecastHeader>,
    pub measure: Vec<MeasureHeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigHeader {
    pub xml_file_header: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHeader {
    pub forecast_header: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureHeader {
    pub measure_header: String,
}

/// One forecast row as sent to the service; PV is positive for generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub energy_hub_building_power: f64,
    pub energy_hub_pv_power: f64,
    pub contract_tou_buy: f64,
    pub contract_tou_sell: f64,
    pub datetime: String,
}

/// The measures row as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub energy_hub_battery_soc: f64,
    pub contract_offpeak_threshold: f64,
    pub contract_midpeak_threshold: f64,
    pub contract_onpeak_threshold: f64,
    pub contract_non_coincidental_threshold: f64,
    pub datetime: String,
}

/// Row records of the forecast table, PV sign flipped back to generation-positive.
pub fn forecast_records(forecasts: &Forecasts) -> Vec<ForecastRecord> {
    forecasts
        .index()
        .iter()
        .enumerate()
        .map(|(i, t)| ForecastRecord {
            energy_hub_building_power: forecasts.building_power()[i],
            // `0.0 - x` keeps zero rows at +0.0
            energy_hub_pv_power: 0.0 - forecasts.pv_power()[i],
            contract_tou_buy: forecasts.buy_price()[i],
            contract_tou_sell: forecasts.sell_price()[i],
            datetime: t.format(DATETIME_FORMAT).to_string(),
        })
        .collect()
}

pub fn measure_records(measures: &Measures) -> Vec<MeasureRecord> {
    vec![MeasureRecord {
        energy_hub_battery_soc: measures.battery_soc,
        contract_offpeak_threshold: measures.offpeak_threshold,
        contract_midpeak_threshold: measures.midpeak_threshold,
        contract_onpeak_threshold: measures.onpeak_threshold,
        contract_non_coincidental_threshold: measures.non_coincidental_threshold,
        datetime: measures.instant.format(DATETIME_FORMAT).to_string(),
    }]
}

/// Removes line breaks and tabs so the document fits on one line.
pub fn flatten_document(document: &str) -> String {
    document
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

impl WebServiceInput {
    /// Packs the configuration document and both input tables.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Json` if a record cannot be serialized.
    pub fn new(
        manager: &EnergyManager,
        measures: &Measures,
        forecasts: &Forecasts,
    ) -> Result<Self, OutputError> {
        Ok(Self {
            global_parameters: GlobalParameters::default(),
            inputs: Inputs {
                config: vec![ConfigHeader {
                    xml_file_header: flatten_document(manager.document()),
                }],
                forecast: vec![ForecastHeader {
                    forecast_header: serde_json::to_string(&forecast_records(forecasts))?,
                }],
                measure: vec![MeasureHeader {
                    measure_header: serde_json::to_string(&measure_records(measures))?,
                }],
            },
        })
    }
}

/// Writes the payload as JSON to any writer.
///
/// # Errors
///
/// Returns `OutputError::Json` if serialization or writing fails.
pub fn write_json(input: &WebServiceInput, writer: impl Write) -> Result<(), OutputError> {
    serde_json::to_writer(writer, input)?;
    Ok(())
}

/// Builds the payload and writes it to `path`, creating parent directories.
///
/// # Errors
///
/// Returns `OutputError` if the file cannot be created or written.
pub fn export_json(
    path: &Path,
    manager: &EnergyManager,
    measures: &Measures,
    forecasts: &Forecasts,
) -> Result<(), OutputError> {
    let input = WebServiceInput::new(manager, measures, forecasts)?;
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    let mut buf = io::BufWriter::new(file);
    write_json(&input, &mut buf)?;
    buf.flush().map_err(io_error)?;

    info!(path = %path.display(), rows = forecasts.len(), "wrote web service input");
    Ok(())
}
