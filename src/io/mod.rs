//! File outputs: setpoints CSV and the web-service JSON payload.

pub mod export;
pub mod web_service;
