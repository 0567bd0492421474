use crate::config::BatteryConfig;

/// Energy-hub battery storage model used to derive feasible setpoints.
///
/// Maintains its state of charge (SOC) and enforces power limits, SOC bounds
/// and efficiency losses when given power setpoints.
///
/// # Power Flow Convention (Grid)
/// - Positive power: Charging (consuming power from the grid / building bus)
/// - Negative power: Discharging (supplying power)
#[derive(Debug, Clone)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// State of charge as a fraction (0.0 to 1.0).
    pub soc: f64,

    /// Maximum charge power in kilowatts (positive value).
    pub max_charge_kw: f64,

    /// Maximum discharge power in kilowatts (positive value).
    pub max_discharge_kw: f64,

    /// Charging efficiency (0..1.0].
    pub eta_c: f64,

    /// Discharging efficiency (0..1.0].
    pub eta_d: f64,

    soc_min: f64,
    soc_max: f64,

    /// Duration of one timestep in hours.
    dt_hours: f64,
}

impl Battery {
    /// Creates a battery from validated configuration at the given initial SOC.
    ///
    /// An initial SOC outside `[soc_min, soc_max]` is kept as is; the battery
    /// then only moves back towards the allowed band.
    pub fn new(config: &BatteryConfig, soc: f64, dt_hours: f64) -> Self {
        Self {
            capacity_kwh: config.capacity_kwh,
            soc,
            max_charge_kw: config.max_charge_kw,
            max_discharge_kw: config.max_discharge_kw,
            eta_c: config.eta_charge,
            eta_d: config.eta_discharge,
            soc_min: config.soc_min,
            soc_max: config.soc_max,
            dt_hours,
        }
    }

    /// Largest charging power the battery can absorb this step (kW).
    pub fn charge_headroom_kw(&self) -> f64 {
        let max_kwh_this_step = (self.soc_max - self.soc) * self.capacity_kwh / self.eta_c;
        (max_kwh_this_step / self.dt_hours)
            .max(0.0)
            .min(self.max_charge_kw)
    }

    /// Largest discharging power the battery can deliver this step (kW, positive).
    pub fn discharge_headroom_kw(&self) -> f64 {
        let max_kwh_this_step = (self.soc - self.soc_min) * self.capacity_kwh * self.eta_d;
        (max_kwh_this_step / self.dt_hours)
            .max(0.0)
            .min(self.max_discharge_kw)
    }

    /// Applies a setpoint for one step and returns the actual power.
    ///
    /// Enforces charge/discharge power limits, SOC bounds, and efficiency losses.
    pub fn apply(&mut self, setpoint_kw: f64) -> f64 {
        if setpoint_kw > 0.0 {
            let actual_kw = setpoint_kw.min(self.charge_headroom_kw());
            if actual_kw > 0.0 {
                let stored = (actual_kw * self.dt_hours * self.eta_c) / self.capacity_kwh;
                self.soc = (self.soc + stored).min(self.soc_max);
            }
            actual_kw
        } else if setpoint_kw < 0.0 {
            let actual_abs_kw = (-setpoint_kw).min(self.discharge_headroom_kw());
            if actual_abs_kw > 0.0 {
                let drawn = (actual_abs_kw * self.dt_hours) / (self.capacity_kwh * self.eta_d);
                self.soc = (self.soc - drawn).max(self.soc_min);
            }
            -actual_abs_kw
        } else {
            0.0
        }
    }
}
