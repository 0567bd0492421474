//! Time-of-use buy-price schedule expanded to per-step prices.

use tracing::debug;

use crate::config::TariffBlock;

/// Tiered buy-price schedule.
///
/// The schedule is a sequence of fixed-rate blocks. Expanding it over a
/// horizon repeats the sequence cyclically when it is shorter than the
/// horizon and truncates it when it is longer.
#[derive(Debug, Clone, PartialEq)]
pub struct TouSchedule {
    per_step: Vec<f64>,
}

impl TouSchedule {
    /// Lays out `blocks` on a grid of `sample_period`-second steps.
    ///
    /// Each block covers `minutes * 60 / sample_period` steps; a remainder is
    /// dropped, so callers validate divisibility first.
    pub fn from_blocks(blocks: &[TariffBlock], sample_period: u32) -> Self {
        let period_s = u64::from(sample_period.max(1));
        let per_step = blocks
            .iter()
            .flat_map(|b| {
                let steps = usize::try_from(u64::from(b.minutes) * 60 / period_s).unwrap_or(0);
                std::iter::repeat_n(b.rate, steps)
            })
            .collect();
        Self { per_step }
    }

    /// Number of steps covered by one pass through the schedule.
    pub fn cycle_len(&self) -> usize {
        self.per_step.len()
    }

    /// Per-step prices for the first `horizon` steps.
    ///
    /// An empty schedule yields zero prices.
    pub fn expand(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }

        if self.per_step.is_empty() {
            return vec![0.0; horizon];
        }

        if self.per_step.len() < horizon {
            debug!(
                cycle_len = self.per_step.len(),
                horizon, "tariff schedule shorter than horizon, repeating"
            );
        }

        self.per_step.iter().copied().cycle().take(horizon).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TariffConfig;

    #[test]
    fn default_schedule_covers_one_day_of_quarter_hours() {
        let schedule = TouSchedule::from_blocks(&TariffConfig::default().blocks, 900);
        assert_eq!(schedule.cycle_len(), 96);
    }

    #[test]
    fn default_schedule_at_hourly_steps() {
        let schedule = TouSchedule::from_blocks(&TariffConfig::default().blocks, 3600);
        let prices = schedule.expand(24);
        assert_eq!(&prices[..5], &[0.02; 5]);
        assert_eq!(&prices[5..13], &[0.025; 8]);
        assert_eq!(&prices[13..15], &[0.030; 2]);
        assert_eq!(&prices[15..21], &[0.025; 6]);
        assert_eq!(&prices[21..], &[0.02; 3]);
    }

    #[test]
    fn shorter_schedule_repeats() {
        let blocks = [TariffBlock::new(30, 1.0), TariffBlock::new(15, 2.0)];
        let schedule = TouSchedule::from_blocks(&blocks, 900);
        assert_eq!(schedule.expand(7), vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn longer_schedule_truncates() {
        let schedule = TouSchedule::from_blocks(&TariffConfig::default().blocks, 900);
        let prices = schedule.expand(10);
        assert_eq!(prices, vec![0.02; 10]);
    }

    #[test]
    fn empty_schedule_is_free() {
        let schedule = TouSchedule::from_blocks(&[], 900);
        assert_eq!(schedule.expand(3), vec![0.0; 3]);
        assert!(schedule.expand(0).is_empty());
    }
}
