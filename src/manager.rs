//! Energy-manager context: the loaded configuration document plus the
//! contract control model filled in before each solve.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{BatteryConfig, ControlParams, EnergyManagerConfig, GridConfig};
use crate::error::{ConfigError, ConfigErrors};
use crate::forecast::Forecasts;

/// Contract control model: the tariff as seen by the solver.
///
/// Prices are stored per step, i.e. the hourly buy price scaled by
/// `sample_period / 3600`.
#[derive(Debug, Clone, Default)]
pub struct ContractModel {
    tou_price_buy: Vec<f64>,
}

impl ContractModel {
    /// Per-step buy prices of the last loaded horizon.
    pub fn tou_price_buy(&self) -> &[f64] {
        &self.tou_price_buy
    }

    /// Replaces the tariff with the buy prices of `forecasts`.
    pub fn load_tou_prices(&mut self, forecasts: &Forecasts, control: &ControlParams) {
        let per_step = control.dt_hours();
        self.tou_price_buy = forecasts.buy_price().iter().map(|p| p * per_step).collect();
    }
}

/// Initialized solver context.
///
/// Created once per run from the configuration document and handed to the
/// solver adapter.
#[derive(Debug, Clone)]
pub struct EnergyManager {
    config: EnergyManagerConfig,
    document: String,
    contract: ContractModel,
}

impl EnergyManager {
    /// Loads and validates the configuration document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if the file cannot be read, is not valid TOML,
    /// or fails validation.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigErrors> {
        let document = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let manager = Self::from_toml_str(document)?;
        info!(
            path = %path.display(),
            sample_period = manager.control_params().sample_period,
            nbr_time_step = manager.control_params().nbr_time_step,
            "loaded energy manager configuration"
        );
        Ok(manager)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if the document is not valid TOML or fails validation.
    pub fn from_toml_str(document: impl Into<String>) -> Result<Self, ConfigErrors> {
        let document = document.into();
        let config = EnergyManagerConfig::from_toml_str(&document)?;
        ConfigErrors::check(config.validate())?;
        Ok(Self {
            config,
            document,
            contract: ContractModel::default(),
        })
    }

    /// Builds a context from an already-parsed configuration.
    ///
    /// The document text is regenerated from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if `config` fails validation.
    pub fn from_config(config: EnergyManagerConfig) -> Result<Self, ConfigErrors> {
        ConfigErrors::check(config.validate())?;
        let c = &config.control_params;
        let b = &config.battery;
        let document = format!(
            "[control_params]\nsample_period = {}\nnbr_time_step = {}\n\n\
             [battery]\ncapacity_kwh = {:?}\nmax_charge_kw = {:?}\nmax_discharge_kw = {:?}\n\
             eta_charge = {:?}\neta_discharge = {:?}\nsoc_min = {:?}\nsoc_max = {:?}\n\n\
             [grid]\nallow_export = {}\n",
            c.sample_period,
            c.nbr_time_step,
            b.capacity_kwh,
            b.max_charge_kw,
            b.max_discharge_kw,
            b.eta_charge,
            b.eta_discharge,
            b.soc_min,
            b.soc_max,
            config.grid.allow_export,
        );
        Ok(Self {
            config,
            document,
            contract: ContractModel::default(),
        })
    }

    pub fn control_params(&self) -> &ControlParams {
        &self.config.control_params
    }

    pub fn battery(&self) -> &BatteryConfig {
        &self.config.battery
    }

    pub fn grid(&self) -> &GridConfig {
        &self.config.grid
    }

    /// Raw configuration document as read from disk.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn contract(&self) -> &ContractModel {
        &self.contract
    }

    pub(crate) fn contract_mut(&mut self) -> &mut ContractModel {
        &mut self.contract
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "[control_params]\nsample_period = 900\nnbr_time_step = 4\n";

    #[test]
    fn keeps_raw_document() {
        let manager = EnergyManager::from_toml_str(DOCUMENT).ok();
        assert_eq!(manager.as_ref().map(EnergyManager::document), Some(DOCUMENT));
        assert_eq!(
            manager.as_ref().map(|m| m.control_params().nbr_time_step),
            Some(4)
        );
    }

    #[test]
    fn rejects_invalid_document() {
        let result = EnergyManager::from_toml_str("[control_params]\nsample_period = 0\n");
        let errors = result.err();
        assert!(
            errors
                .as_ref()
                .is_some_and(|e| e.contains_field("control_params.sample_period"))
        );
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = EnergyManager::from_toml_file(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err_and(|e| e.contains_field("config")));
    }

    #[test]
    fn regenerated_document_round_trips() {
        let mut config = EnergyManagerConfig::default();
        config.control_params.nbr_time_step = 48;
        config.grid.allow_export = false;
        let manager = EnergyManager::from_config(config).ok();
        let reparsed = manager
            .as_ref()
            .and_then(|m| EnergyManager::from_toml_str(m.document()).ok());
        assert_eq!(
            reparsed.as_ref().map(|m| m.control_params().nbr_time_step),
            Some(48)
        );
        assert_eq!(reparsed.as_ref().map(|m| m.grid().allow_export), Some(false));
    }

    #[test]
    fn contract_model_is_empty_until_loaded() {
        let manager = EnergyManager::from_toml_str(DOCUMENT).ok();
        assert_eq!(
            manager.as_ref().map(|m| m.contract().tou_price_buy().len()),
            Some(0)
        );
    }
}
