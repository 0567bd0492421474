//! Colors and axis scaling for the setpoint chart.

use ratatui::style::Color;

pub const GRID_COLOR: Color = Color::Cyan;
pub const BUILDING_COLOR: Color = Color::White;
pub const PV_COLOR: Color = Color::Yellow;
pub const BATTERY_COLOR: Color = Color::Green;
pub const NET_LOAD_COLOR: Color = Color::Magenta;
pub const SOC_COLOR: Color = Color::Green;
pub const PRICE_COLOR: Color = Color::LightRed;
/// Threshold and zero reference lines.
pub const REFERENCE_COLOR: Color = Color::DarkGray;
pub const FOOTER_FG: Color = Color::DarkGray;

/// Computes Y-axis bounds over every series with 10% padding.
pub fn auto_bounds_y<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (min, max) = series
        .into_iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
