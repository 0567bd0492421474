//! Fixed-frequency time index shared by the measures, forecasts and setpoints tables.

use chrono::{NaiveDateTime, TimeDelta};

/// Format used for every timestamp leaving the program.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Regularly spaced sequence of instants.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ems_microapp::table::TimeIndex;
///
/// let start = NaiveDate::from_ymd_opt(2018, 4, 1)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .unwrap_or_default();
/// let index = TimeIndex::new(start, 900, 96);
/// assert_eq!(index.len(), 96);
/// assert_eq!(index.last().map(|t| t.to_string()), Some("2018-04-01 23:45:00".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIndex {
    start: NaiveDateTime,
    step: TimeDelta,
    len: usize,
}

impl TimeIndex {
    /// Creates an index of `len` instants starting at `start`, `step_seconds` apart.
    pub fn new(start: NaiveDateTime, step_seconds: u32, len: usize) -> Self {
        Self {
            start,
            step: TimeDelta::seconds(i64::from(step_seconds)),
            len,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Instant of row `i`, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<NaiveDateTime> {
        if i >= self.len {
            return None;
        }
        let offset = i32::try_from(i).ok()?;
        self.step
            .checked_mul(offset)
            .and_then(|d| self.start.checked_add_signed(d))
    }

    pub fn last(&self) -> Option<NaiveDateTime> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterates over every instant in order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).map_while(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn instant(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 4, 1)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap_or_default()
    }

    #[test]
    fn quarter_hour_day() {
        let index = TimeIndex::new(instant(0, 0), 900, 96);
        assert_eq!(index.get(0), Some(instant(0, 0)));
        assert_eq!(index.get(1), Some(instant(0, 15)));
        assert_eq!(index.last(), Some(instant(23, 45)));
        assert_eq!(index.get(96), None);
        assert_eq!(index.iter().count(), 96);
    }

    #[test]
    fn single_row() {
        let index = TimeIndex::new(instant(6, 0), 900, 1);
        assert_eq!(index.last(), Some(instant(6, 0)));
    }

    #[test]
    fn empty_index_has_no_last() {
        let index = TimeIndex::new(instant(0, 0), 900, 0);
        assert!(index.is_empty());
        assert_eq!(index.last(), None);
    }

    #[test]
    fn formatted_timestamps() {
        let index = TimeIndex::new(instant(0, 0), 3600, 2);
        let stamps: Vec<String> = index
            .iter()
            .map(|t| t.format(DATETIME_FORMAT).to_string())
            .collect();
        assert_eq!(stamps, vec!["2018-04-01T00:00:00", "2018-04-01T01:00:00"]);
    }
}
