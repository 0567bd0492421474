//! CSV export for solver setpoints.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::error::OutputError;
use crate::solver::Setpoints;
use crate::table::DATETIME_FORMAT;

/// Column header of the setpoints CSV.
const HEADER: &str = "datetime,grid_kw,pv_kw,battery_kw,battery_soc";

/// Exports setpoints to a CSV file at the given path, creating parent
/// directories.
///
/// # Errors
///
/// Returns `OutputError` if file creation or writing fails.
pub fn export_setpoints_csv(setpoints: &Setpoints, path: &Path) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    write_setpoints_csv(setpoints, io::BufWriter::new(file))?;

    info!(path = %path.display(), rows = setpoints.len(), "wrote setpoints");
    Ok(())
}

/// Writes setpoints as CSV to any writer.
///
/// One row per step; produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns `OutputError::Csv` if writing fails.
pub fn write_setpoints_csv(setpoints: &Setpoints, writer: impl Write) -> Result<(), OutputError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, t) in setpoints.index().iter().enumerate() {
        wtr.write_record(&[
            t.format(DATETIME_FORMAT).to_string(),
            format!("{:.4}", setpoints.grid_power()[i]),
            format!("{:.4}", setpoints.pv_power_produced()[i]),
            format!("{:.4}", setpoints.battery_power()[i]),
            format!("{:.4}", setpoints.battery_soc()[i]),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::table::TimeIndex;

    fn setpoints(n: usize) -> Setpoints {
        Setpoints::new(
            TimeIndex::new(NaiveDateTime::default(), 900, n),
            vec![120.5; n],
            vec![-3.25; n],
            vec![-10.0; n],
            vec![0.42; n],
        )
        .unwrap_or_else(|e| panic!("valid setpoints: {e}"))
    }

    fn render(setpoints: &Setpoints) -> String {
        let mut buf = Vec::new();
        write_setpoints_csv(setpoints, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_columns() {
        let output = render(&setpoints(1));
        assert_eq!(output.lines().next(), Some(HEADER));
    }

    #[test]
    fn row_count_matches_step_count() {
        let output = render(&setpoints(96));
        // 1 header + 96 data rows
        assert_eq!(output.lines().count(), 97);
    }

    #[test]
    fn rows_carry_timestamps_and_values() {
        let output = render(&setpoints(2));
        let second = output.lines().nth(2).unwrap_or("");
        assert_eq!(second, "1970-01-01T00:15:00,120.5000,-3.2500,-10.0000,0.4200");
    }

    #[test]
    fn round_trip_parseable() {
        let output = render(&setpoints(3));
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(5));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            for i in 1..5 {
                let val = rec.as_ref().and_then(|r| r[i].parse::<f64>().ok());
                assert!(val.is_some(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn export_creates_parent_directories() {
        let dir = tempfile::tempdir().ok();
        let path = dir.as_ref().map(|d| d.path().join("out/nested/setpoints.csv"));
        let path = path.unwrap_or_default();
        assert!(export_setpoints_csv(&setpoints(4), &path).is_ok());
        let written = fs::read_to_string(&path).unwrap_or_default();
        assert_eq!(written.lines().count(), 5);
    }
}
