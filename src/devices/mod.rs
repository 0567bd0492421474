//! Device models used by the built-in solver.

/// Energy-hub battery storage model.
pub mod battery;

pub use battery::Battery;
