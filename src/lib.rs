//! Energy-manager microgrid demonstration.
//!
//! Builds one horizon of solver inputs from recorded load and PV profiles,
//! solves the control problem once through the [`solver::Solver`] boundary,
//! and presents the setpoints as a terminal chart and a web-service payload.

pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod forecast;
/// Setpoints CSV and web-service JSON outputs.
pub mod io;
pub mod manager;
pub mod measure;
pub mod pipeline;
pub mod plot;
pub mod profiles;
pub mod scenario;
pub mod solver;
pub mod summary;
pub mod table;
pub mod tariff;

pub use error::Error;
