//! Error taxonomy: configuration, data, solver and output failures.

use std::fmt;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Top-level error returned by the load → build → solve → present pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigErrors),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"control_params.sample_period"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field error found while loading or validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    /// Returns `Ok(())` if `errors` is empty.
    ///
    /// # Errors
    ///
    /// Wraps a non-empty list into `ConfigErrors`.
    pub fn check(errors: Vec<ConfigError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    /// Whether any error points at `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Profile archive and scenario construction failures.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed profile archive: {0}")]
    Csv(#[from] csv::Error),
    #[error("profile archive is empty")]
    Empty,
    #[error("{field}[{index}] is not a finite number")]
    NonFinite { field: &'static str, index: usize },
    #[error("loadProfile2 has {load} samples but pvProfile2 has {pv}")]
    LengthMismatch { load: usize, pv: usize },
    #[error("{field} has {len} samples, horizon needs {horizon}")]
    TooShort {
        field: &'static str,
        len: usize,
        horizon: usize,
    },
    #[error("column {column} has {len} values for {rows} rows")]
    ColumnLength {
        column: &'static str,
        len: usize,
        rows: usize,
    },
}

/// Solver adapter and solver failures.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("measures are at {actual}, solve instant is {expected}")]
    MeasuresInstant {
        expected: NaiveDateTime,
        actual: NaiveDateTime,
    },
    #[error("forecasts start at {actual}, solve instant is {expected}")]
    ForecastStart {
        expected: NaiveDateTime,
        actual: NaiveDateTime,
    },
    #[error("forecasts have {actual} rows, horizon is {expected}")]
    Horizon { expected: usize, actual: usize },
    #[error("forecasts are spaced {actual_s}s apart, sample period is {expected_s}s")]
    Spacing { expected_s: i64, actual_s: i64 },
    #[error("setpoints do not match the forecast index: {0}")]
    Postcondition(String),
    #[error("problem is infeasible: {0}")]
    Infeasible(String),
}

/// Presentation layer failures.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("terminal failure: {0}")]
    Terminal(#[source] io::Error),
    #[error("plot mode is unavailable: built without the `plot` feature")]
    PlotUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_join_with_semicolons() {
        let errors = ConfigErrors(vec![
            ConfigError::new("a", "must be > 0"),
            ConfigError::new("b", "must be set"),
        ]);
        assert_eq!(errors.to_string(), "a — must be > 0; b — must be set");
        assert!(errors.contains_field("b"));
        assert!(!errors.contains_field("c"));
    }

    #[test]
    fn check_accepts_empty_list() {
        assert!(ConfigErrors::check(Vec::new()).is_ok());
        assert!(ConfigErrors::check(vec![ConfigError::new("x", "bad")]).is_err());
    }

    #[test]
    fn top_level_error_names_the_kind() {
        let e = Error::from(SolverError::Horizon {
            expected: 96,
            actual: 95,
        });
        assert_eq!(
            e.to_string(),
            "solver error: forecasts have 95 rows, horizon is 96"
        );
    }
}
