//! Measures table: system state at the decision instant.

use chrono::NaiveDateTime;

use crate::config::MeasuresConfig;

/// Single-row measurement record.
#[derive(Debug, Clone, PartialEq)]
pub struct Measures {
    /// Instant of the only row.
    pub instant: NaiveDateTime,
    /// Battery state of charge (fraction of capacity).
    pub battery_soc: f64,
    /// Demand reached so far in the off-peak tier (kW).
    pub offpeak_threshold: f64,
    /// Demand reached so far in the mid-peak tier (kW).
    pub midpeak_threshold: f64,
    /// Demand reached so far in the on-peak tier (kW).
    pub onpeak_threshold: f64,
    /// Non-coincidental demand limit (kW).
    pub non_coincidental_threshold: f64,
}

impl Measures {
    /// Initializes the row at `instant` from the configured literals.
    pub fn new(instant: NaiveDateTime, initial: &MeasuresConfig) -> Self {
        Self {
            instant,
            battery_soc: initial.battery_soc,
            offpeak_threshold: initial.offpeak_threshold,
            midpeak_threshold: initial.midpeak_threshold,
            onpeak_threshold: initial.onpeak_threshold,
            non_coincidental_threshold: initial.non_coincidental_threshold,
        }
    }

    /// Row count; always one.
    pub fn len(&self) -> usize {
        1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
