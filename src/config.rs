//! TOML-based configuration: the energy-manager document and the scenario
//! policy constants.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigErrors};

/// Energy-manager configuration document.
///
/// Describes the managed system (battery, grid connection) and the control
/// parameters of the solver. All sections have defaults matching the microapp
/// demonstration system.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyManagerConfig {
    /// Sampling period and horizon.
    #[serde(default)]
    pub control_params: ControlParams,
    /// Energy-hub battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Grid connection policy.
    #[serde(default)]
    pub grid: GridConfig,
}

/// Solver timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlParams {
    /// Seconds per step (must be > 0).
    pub sample_period: u32,
    /// Horizon length in steps (must be > 0).
    pub nbr_time_step: usize,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            sample_period: 900,
            nbr_time_step: 96,
        }
    }
}

impl ControlParams {
    /// Duration of one step in hours.
    pub fn dt_hours(&self) -> f64 {
        f64::from(self.sample_period) / 3600.0
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Maximum charging power (kW).
    pub max_charge_kw: f64,
    /// Maximum discharging power (kW).
    pub max_discharge_kw: f64,
    /// Charge efficiency (0.0–1.0].
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0].
    pub eta_discharge: f64,
    /// Lowest allowed state of charge (fraction).
    pub soc_min: f64,
    /// Highest allowed state of charge (fraction).
    pub soc_max: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 400.0,
            max_charge_kw: 100.0,
            max_discharge_kw: 100.0,
            eta_charge: 0.95,
            eta_discharge: 0.95,
            soc_min: 0.0,
            soc_max: 1.0,
        }
    }
}

/// Grid connection policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Whether surplus PV may be exported. If not, PV is curtailed.
    pub allow_export: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { allow_export: true }
    }
}

impl EnergyManagerConfig {
    /// Parses the document from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigErrors> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()).into())
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the document is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let c = &self.control_params;

        if c.sample_period == 0 {
            errors.push(ConfigError::new("control_params.sample_period", "must be > 0"));
        }
        if c.nbr_time_step == 0 {
            errors.push(ConfigError::new("control_params.nbr_time_step", "must be > 0"));
        }

        let bat = &self.battery;
        if !(bat.capacity_kwh > 0.0) {
            errors.push(ConfigError::new("battery.capacity_kwh", "must be > 0"));
        }
        if !(bat.max_charge_kw >= 0.0) {
            errors.push(ConfigError::new("battery.max_charge_kw", "must be >= 0"));
        }
        if !(bat.max_discharge_kw >= 0.0) {
            errors.push(ConfigError::new("battery.max_discharge_kw", "must be >= 0"));
        }
        if !(bat.eta_charge > 0.0 && bat.eta_charge <= 1.0) {
            errors.push(ConfigError::new("battery.eta_charge", "must be in (0.0, 1.0]"));
        }
        if !(bat.eta_discharge > 0.0 && bat.eta_discharge <= 1.0) {
            errors.push(ConfigError::new("battery.eta_discharge", "must be in (0.0, 1.0]"));
        }
        if !(0.0..=1.0).contains(&bat.soc_min) {
            errors.push(ConfigError::new("battery.soc_min", "must be in [0.0, 1.0]"));
        }
        if !(0.0..=1.0).contains(&bat.soc_max) {
            errors.push(ConfigError::new("battery.soc_max", "must be in [0.0, 1.0]"));
        }
        if bat.soc_min > bat.soc_max {
            errors.push(ConfigError::new("battery.soc_min", "must be <= battery.soc_max"));
        }

        errors
    }
}

/// Scenario policy constants applied by the scenario builder.
///
/// Every field defaults to the microapp demonstration values, so an empty
/// document (or no document at all) reproduces the reference scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Decision instant and first row of every table, e.g. `"2018-04-01T00:00:00"`.
    pub reference_instant: NaiveDateTime,
    /// Initial values of the measures row.
    pub measures: MeasuresConfig,
    /// PV forecast transformation.
    pub pv: PvConfig,
    /// Time-of-use tariff.
    pub tariff: TariffConfig,
}

/// Initial values of the single measures row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeasuresConfig {
    /// Battery state of charge at the decision instant (fraction).
    pub battery_soc: f64,
    /// Demand already reached in the off-peak tier (kW).
    pub offpeak_threshold: f64,
    /// Demand already reached in the mid-peak tier (kW).
    pub midpeak_threshold: f64,
    /// Demand already reached in the on-peak tier (kW).
    pub onpeak_threshold: f64,
    /// Non-coincidental demand limit (kW).
    pub non_coincidental_threshold: f64,
}

impl Default for MeasuresConfig {
    fn default() -> Self {
        Self {
            battery_soc: 0.0,
            offpeak_threshold: 0.0,
            midpeak_threshold: 0.0,
            onpeak_threshold: 0.0,
            non_coincidental_threshold: 220.0,
        }
    }
}

/// PV forecast transformation: `pv[i] = scale * profile[i - delay_steps]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvConfig {
    /// Multiplier applied to the raw profile; negative means generation.
    pub scale: f64,
    /// Injection delay in steps; the first `delay_steps` rows are zero.
    pub delay_steps: usize,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            scale: -0.75,
            delay_steps: 8,
        }
    }
}

/// Time-of-use tariff: a repeating sequence of fixed-rate blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Buy-price blocks in chronological order.
    pub blocks: Vec<TariffBlock>,
    /// Flat sell price.
    pub sell_price: f64,
}

/// One block of the buy-price schedule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffBlock {
    /// Block duration in minutes.
    pub minutes: u32,
    /// Price per kWh during the block.
    pub rate: f64,
}

impl TariffBlock {
    pub const fn new(minutes: u32, rate: f64) -> Self {
        Self { minutes, rate }
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            blocks: vec![
                TariffBlock::new(300, 0.02),
                TariffBlock::new(480, 0.025),
                TariffBlock::new(120, 0.030),
                TariffBlock::new(360, 0.025),
                TariffBlock::new(180, 0.02),
            ],
            sell_price: 0.0,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            reference_instant: microapp_reference_instant(),
            measures: MeasuresConfig::default(),
            pv: PvConfig::default(),
            tariff: TariffConfig::default(),
        }
    }
}

/// 2018-04-01 00:00:00, the first row of the demonstration tables.
fn microapp_reference_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 4, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl ScenarioConfig {
    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigErrors> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigErrors> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()).into())
    }

    /// Validates the constants against the solver's control parameters.
    ///
    /// Tariff blocks must cover a whole number of steps.
    pub fn validate(&self, control: &ControlParams) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let m = &self.measures;
        if !(0.0..=1.0).contains(&m.battery_soc) {
            errors.push(ConfigError::new("measures.battery_soc", "must be in [0.0, 1.0]"));
        }
        for (field, value) in [
            ("measures.offpeak_threshold", m.offpeak_threshold),
            ("measures.midpeak_threshold", m.midpeak_threshold),
            ("measures.onpeak_threshold", m.onpeak_threshold),
            ("measures.non_coincidental_threshold", m.non_coincidental_threshold),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(ConfigError::new(field, "must be a finite value >= 0"));
            }
        }

        if !self.pv.scale.is_finite() {
            errors.push(ConfigError::new("pv.scale", "must be finite"));
        }

        let t = &self.tariff;
        if t.blocks.is_empty() {
            errors.push(ConfigError::new("tariff.blocks", "must not be empty"));
        }
        let period_s = u64::from(control.sample_period);
        for (i, block) in t.blocks.iter().enumerate() {
            let block_s = u64::from(block.minutes) * 60;
            if block.minutes == 0 {
                errors.push(ConfigError::new(format!("tariff.blocks[{i}].minutes"), "must be > 0"));
            } else if period_s > 0 && block_s % period_s != 0 {
                errors.push(ConfigError::new(
                    format!("tariff.blocks[{i}].minutes"),
                    format!("{block_s}s is not a multiple of the {period_s}s sample period"),
                ));
            }
            if !block.rate.is_finite() {
                errors.push(ConfigError::new(format!("tariff.blocks[{i}].rate"), "must be finite"));
            }
        }
        if !t.sell_price.is_finite() {
            errors.push(ConfigError::new("tariff.sell_price", "must be finite"));
        }

        errors
    }
}
