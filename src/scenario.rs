//! Scenario builder: derives the measures and forecasts tables from the
//! loaded profiles, the solver context and the scenario policy constants.

use tracing::debug;

use crate::config::ScenarioConfig;
use crate::error::{ConfigErrors, DataError, Error};
use crate::forecast::Forecasts;
use crate::manager::EnergyManager;
use crate::measure::Measures;
use crate::profiles::ProfileSet;
use crate::table::TimeIndex;
use crate::tariff::TouSchedule;

/// Solver inputs for one decision instant.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub measures: Measures,
    pub forecasts: Forecasts,
}

/// Builds the measures row and the forecast table.
///
/// # Errors
///
/// Returns `Error::Config` if the scenario constants do not fit the control
/// parameters, and `Error::Data` if the profiles are shorter than the horizon.
pub fn build_scenario(
    manager: &EnergyManager,
    profiles: &ProfileSet,
    cfg: &ScenarioConfig,
) -> Result<Scenario, Error> {
    let control = manager.control_params();
    ConfigErrors::check(cfg.validate(control))?;

    let horizon = control.nbr_time_step;
    if profiles.len() < horizon {
        return Err(DataError::TooShort {
            field: "loadProfile2",
            len: profiles.len(),
            horizon,
        }
        .into());
    }

    let measures = Measures::new(cfg.reference_instant, &cfg.measures);

    let index = TimeIndex::new(cfg.reference_instant, control.sample_period, horizon);
    let building_power = profiles.building_load()[..horizon].to_vec();
    let pv_power = delay_and_scale(
        profiles.pv_generation(),
        cfg.pv.scale,
        cfg.pv.delay_steps,
        horizon,
    );
    let buy_price =
        TouSchedule::from_blocks(&cfg.tariff.blocks, control.sample_period).expand(horizon);
    let sell_price = vec![cfg.tariff.sell_price; horizon];

    let forecasts = Forecasts::new(index, building_power, pv_power, buy_price, sell_price)?;
    debug!(
        start = %index.start(),
        rows = forecasts.len(),
        pv_delay_steps = cfg.pv.delay_steps,
        "built forecasts"
    );

    Ok(Scenario {
        measures,
        forecasts,
    })
}

/// Scales `profile` and delays it by `delay` steps, zero-filling the head.
///
/// The result has exactly `horizon` values: `out[i] = scale * profile[i - delay]`
/// for `i >= delay`, and `0.0` before.
pub fn delay_and_scale(profile: &[f64], scale: f64, delay: usize, horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|i| {
            i.checked_sub(delay)
                .and_then(|j| profile.get(j))
                .map_or(0.0, |v| scale * v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn manager(nbr_time_step: usize) -> EnergyManager {
        let doc = format!("[control_params]\nsample_period = 900\nnbr_time_step = {nbr_time_step}\n");
        EnergyManager::from_toml_str(doc).unwrap_or_else(|e| panic!("valid config: {e}"))
    }

    fn profiles(n: usize) -> ProfileSet {
        let load = (0..n).map(|i| 100.0 + i as f64).collect();
        let pv = (0..n).map(|i| i as f64).collect();
        ProfileSet::new(load, pv).unwrap_or_else(|e| panic!("valid profiles: {e}"))
    }

    #[test]
    fn delay_zero_fills_head() {
        let out = delay_and_scale(&[1.0, 2.0, 3.0, 4.0], -0.5, 2, 4);
        assert_eq!(out, vec![0.0, 0.0, -0.5, -1.0]);
    }

    #[test]
    fn delay_longer_than_horizon_is_all_zero() {
        let out = delay_and_scale(&[1.0, 2.0], -1.0, 5, 3);
        assert_eq!(out, vec![0.0; 3]);
    }

    #[test]
    fn measures_use_literal_defaults() {
        let s = build_scenario(&manager(96), &profiles(96), &ScenarioConfig::default());
        let m = s.map(|s| s.measures).ok();
        assert_eq!(m.as_ref().map(|m| m.battery_soc), Some(0.0));
        assert_eq!(m.as_ref().map(|m| m.offpeak_threshold), Some(0.0));
        assert_eq!(m.as_ref().map(|m| m.midpeak_threshold), Some(0.0));
        assert_eq!(m.as_ref().map(|m| m.onpeak_threshold), Some(0.0));
        assert_eq!(m.as_ref().map(|m| m.non_coincidental_threshold), Some(220.0));
    }

    #[test]
    fn extra_profile_samples_are_ignored() {
        let s = build_scenario(&manager(96), &profiles(120), &ScenarioConfig::default());
        let f = s.map(|s| s.forecasts).ok();
        assert_eq!(f.as_ref().map(Forecasts::len), Some(96));
        assert_eq!(f.as_ref().map(|f| f.building_power()[95]), Some(195.0));
    }

    #[test]
    fn short_profiles_rejected() {
        let s = build_scenario(&manager(96), &profiles(95), &ScenarioConfig::default());
        assert!(matches!(
            s,
            Err(Error::Data(DataError::TooShort {
                len: 95,
                horizon: 96,
                ..
            }))
        ));
    }

    #[test]
    fn pv_scaled_and_delayed() {
        let s = build_scenario(&manager(96), &profiles(96), &ScenarioConfig::default());
        let f = s.map(|s| s.forecasts).ok();
        let pv = f.as_ref().map(|f| f.pv_power().to_vec()).unwrap_or_default();
        assert_eq!(pv.len(), 96);
        assert!(pv[..8].iter().all(|&v| v == 0.0));
        for (i, v) in pv.iter().enumerate().skip(8) {
            assert_relative_eq!(*v, -0.75 * (i - 8) as f64);
        }
    }

    #[test]
    fn two_day_horizon_repeats_tariff() {
        let s = build_scenario(&manager(192), &profiles(192), &ScenarioConfig::default());
        let f = s.map(|s| s.forecasts).ok();
        let buy = f.as_ref().map(|f| f.buy_price().to_vec()).unwrap_or_default();
        assert_eq!(buy.len(), 192);
        assert_eq!(&buy[..96], &buy[96..]);
    }

    #[test]
    fn invalid_constants_rejected_before_building() {
        let mut cfg = ScenarioConfig::default();
        cfg.tariff.blocks.clear();
        let s = build_scenario(&manager(96), &profiles(96), &cfg);
        assert!(matches!(s, Err(Error::Config(_))));
    }
}
