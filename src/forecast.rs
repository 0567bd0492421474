//! Forecasts table: building load, PV production and tariff per step.

use crate::error::DataError;
use crate::table::TimeIndex;

/// Column names as exchanged with the solver and the web service.
pub mod columns {
    pub const BUILDING_POWER: &str = "energy_hub_building_power";
    pub const PV_POWER: &str = "energy_hub_pv_power";
    pub const TOU_BUY: &str = "contract_tou_buy";
    pub const TOU_SELL: &str = "contract_tou_sell";
}

/// Multi-row forecast table over the solver horizon.
///
/// Every column holds exactly one finite value per index row.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecasts {
    index: TimeIndex,
    building_power: Vec<f64>,
    pv_power: Vec<f64>,
    buy_price: Vec<f64>,
    sell_price: Vec<f64>,
}

impl Forecasts {
    /// Assembles a table, checking that every column fills the index.
    ///
    /// # Errors
    ///
    /// Returns `DataError` on a column length mismatch or a non-finite value.
    pub fn new(
        index: TimeIndex,
        building_power: Vec<f64>,
        pv_power: Vec<f64>,
        buy_price: Vec<f64>,
        sell_price: Vec<f64>,
    ) -> Result<Self, DataError> {
        for (column, values) in [
            (columns::BUILDING_POWER, &building_power),
            (columns::PV_POWER, &pv_power),
            (columns::TOU_BUY, &buy_price),
            (columns::TOU_SELL, &sell_price),
        ] {
            if values.len() != index.len() {
                return Err(DataError::ColumnLength {
                    column,
                    len: values.len(),
                    rows: index.len(),
                });
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFinite {
                    field: column,
                    index: i,
                });
            }
        }
        Ok(Self {
            index,
            building_power,
            pv_power,
            buy_price,
            sell_price,
        })
    }

    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Building power draw (kW, positive = consumption).
    pub fn building_power(&self) -> &[f64] {
        &self.building_power
    }

    /// PV power (kW, negative = generation).
    pub fn pv_power(&self) -> &[f64] {
        &self.pv_power
    }

    /// Buy price per kWh.
    pub fn buy_price(&self) -> &[f64] {
        &self.buy_price
    }

    /// Sell price per kWh.
    pub fn sell_price(&self) -> &[f64] {
        &self.sell_price
    }
}
