//! Plotters-powered forecast chart widget for Ratatui.
//!
//! Plots wind speed against minutes ahead: the current reading at 0 and each
//! forecast horizon the producer wrote. Rendered into the Ratatui buffer with
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ForecastHorizon, WindRecord};

/// A render-only chart description; series and bounds are computed up front.
pub struct ForecastChart<'a> {
    /// `(minutes ahead, speed m/s)` points, in horizon order.
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Speed series from a record: `(0, speed)` then each horizon present.
pub fn speed_series(record: &WindRecord) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(4);
    if let Some(speed) = record.speed() {
        out.push((0.0, speed));
    }
    for f in record.forecasts() {
        if let Some(speed) = f.speed {
            out.push((f64::from(f.horizon.minutes()), speed));
        }
    }
    out
}

/// Chart bounds: x spans every horizon, y starts at zero with headroom.
pub fn chart_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let x_max = f64::from(ForecastHorizon::FifteenMin.minutes());
    let y_max = points
        .iter()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.2 } else { 1.0 };
    ([0.0, x_max], [0.0, y_top])
}

impl<'a> Widget for ForecastChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("minutes ahead")
                .y_desc("m/s")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| format!("+{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255);
            let point_color = RGBColor(255, 255, 0);

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;
            // `Pixel` rather than `Circle`: the backend scales circle radii badly.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), point_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
