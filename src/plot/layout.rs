//! Chart layout: four stacked rows sharing the step axis.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use super::series::PlotSeries;
use super::style;

/// Smallest terminal height that fits all four rows.
pub const MIN_HEIGHT: u16 = 20;

/// Splits `area` into the four chart rows, heights 2:1:1:1.
fn rows(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(2, 5), // power flows
            Constraint::Ratio(1, 5), // net load vs threshold
            Constraint::Ratio(1, 5), // SOC
            Constraint::Ratio(1, 5), // price
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Renders the full frame.
pub fn render(frame: &mut Frame, series: &PlotSeries) {
    if frame.area().height < MIN_HEIGHT {
        render_too_small(frame);
        return;
    }
    let [power, net, soc, price] = rows(frame.area());

    render_power(frame, series, power);
    render_net_load(frame, series, net);
    render_soc(frame, series, soc);
    render_price(frame, series, price);
}

fn line<'a>(name: &'a str, data: &'a [(f64, f64)], color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn reference(data: &[(f64, f64)]) -> Dataset<'_> {
    Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(style::REFERENCE_COLOR))
        .data(data)
}

fn chart<'a>(
    title: &'a str,
    unit: &'a str,
    datasets: Vec<Dataset<'a>>,
    y_bounds: [f64; 2],
    series: &PlotSeries,
) -> Chart<'a> {
    Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, series.x_max()])
                .labels(vec![series.first_label.clone(), series.last_label.clone()]),
        )
        .y_axis(
            Axis::default()
                .title(unit)
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        )
}

/// Grid, building, PV and battery power with threshold and zero lines.
fn render_power(frame: &mut Frame, series: &PlotSeries, area: Rect) {
    let threshold = series.hline(series.threshold_kw);
    let zero = series.hline(0.0);
    let y_bounds = style::auto_bounds_y([
        &series.grid[..],
        &series.building[..],
        &series.pv[..],
        &series.battery[..],
        &threshold[..],
    ]);

    let datasets = vec![
        line("Grid", &series.grid, style::GRID_COLOR),
        line("Building", &series.building, style::BUILDING_COLOR),
        line("PV", &series.pv, style::PV_COLOR),
        line("Battery", &series.battery, style::BATTERY_COLOR),
        reference(&threshold).name("Threshold"),
        reference(&zero),
    ];
    let title = " Power flows (q/Esc to quit) ";
    frame.render_widget(chart(title, "kW", datasets, y_bounds, series), area);
}

fn render_net_load(frame: &mut Frame, series: &PlotSeries, area: Rect) {
    let threshold = series.hline(series.threshold_kw);
    let zero = series.hline(0.0);
    let y_bounds = style::auto_bounds_y([&series.net_load[..], &threshold[..], &zero[..]]);
    let datasets = vec![
        line("Building + PV", &series.net_load, style::NET_LOAD_COLOR),
        reference(&threshold).name("Threshold"),
        reference(&zero),
    ];
    frame.render_widget(
        chart(" Net load ", "kW", datasets, y_bounds, series),
        area,
    );
}

fn render_soc(frame: &mut Frame, series: &PlotSeries, area: Rect) {
    let datasets = vec![line("SOC", &series.soc, style::SOC_COLOR)];
    frame.render_widget(
        chart(" Battery SOC ", "%", datasets, [0.0, 100.0], series),
        area,
    );
}

fn render_price(frame: &mut Frame, series: &PlotSeries, area: Rect) {
    let y_bounds = style::auto_bounds_y([&series.buy_price[..]]);
    let datasets = vec![line("Buy", &series.buy_price, style::PRICE_COLOR)];
    frame.render_widget(
        chart(" Buy price ", "$/kWh", datasets, y_bounds, series),
        area,
    );
}

/// One-line key hint, drawn when the terminal is too small for the charts.
fn render_too_small(frame: &mut Frame) {
    let hint = Paragraph::new(Line::from(Span::styled(
        " terminal too small  q:Quit",
        Style::default()
            .fg(style::FOOTER_FG)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(hint, frame.area());
}
