use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::error::Result;
use crate::fmt::grouped;
use crate::render::Renderer;
use crate::view::{ChartView, TableView};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_STYLE: Style = Style::new().fg(Color::Rgb(255, 200, 162));
pub const REFUND_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// One colour per chart segment, cycled when there are more categories.
pub const SEGMENT_COLORS: &[Color] = &[
    Color::Rgb(255, 99, 132),
    Color::Rgb(54, 162, 235),
    Color::Rgb(255, 206, 86),
    Color::Rgb(75, 192, 192),
    Color::Rgb(153, 102, 255),
    Color::Rgb(255, 159, 64),
];

pub fn segment_color(idx: usize) -> Color {
    SEGMENT_COLORS[idx % SEGMENT_COLORS.len()]
}

/// Grouped amount as a styled span. Negative amounts (refunds) are green.
pub fn amount_span(amount: f64) -> Span<'static> {
    let style = if amount < 0.0 { REFUND_STYLE } else { AMOUNT_STYLE };
    Span::styled(grouped(amount), style)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Retained-mode target for the dashboard: keeps the latest view models so
/// each frame can be drawn from them.
#[derive(Default)]
pub struct Canvas {
    table: Option<TableView>,
    chart: Option<ChartView>,
    live_charts: usize,
    generation: u64,
}

/// Handle to the chart currently held by a `Canvas`.
#[derive(Debug)]
pub struct CanvasChart(u64);

impl Canvas {
    pub fn table(&self) -> Option<&TableView> {
        self.table.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartView> {
        self.chart.as_ref()
    }

    #[cfg(test)]
    pub fn live_charts(&self) -> usize {
        self.live_charts
    }
}

impl Renderer for Canvas {
    type Chart = CanvasChart;

    fn draw_table(&mut self, table: &TableView) -> Result<()> {
        self.table = Some(table.clone());
        Ok(())
    }

    fn draw_chart(&mut self, chart: &ChartView) -> Result<CanvasChart> {
        self.generation += 1;
        self.live_charts += 1;
        self.chart = Some(chart.clone());
        Ok(CanvasChart(self.generation))
    }

    fn release_chart(&mut self, chart: CanvasChart) {
        if chart.0 == self.generation {
            self.chart = None;
        }
        self.live_charts = self.live_charts.saturating_sub(1);
    }
}
