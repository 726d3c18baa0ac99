//! Layout engines: pure functions from validated data + style + theme to a
//! backend-agnostic [`DrawingPlan`].
//!
//! Layout never touches a drawing backend and never fails once inputs have
//! passed validation, so plans are cheap to unit-test and identical across
//! output formats.

pub mod axes;
pub mod bar;
pub mod line;
pub mod numeric;
pub mod pie;
pub mod rose;
pub mod text;
pub mod timeseries;

use crate::data::ChartData;
use crate::error::{ChartDataError, ChartError};
use crate::plan::DrawingPlan;
use crate::style::Style;
use crate::theme::Theme;

/// Figure-level options, fully resolved (no `None`s left) by the caller.
#[derive(Debug, Clone, Default)]
pub struct FigureOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Figure size in inches; `None` uses the theme default.
    pub figsize: Option<(f64, f64)>,
    /// Raster resolution; `None` uses the theme default.
    pub dpi: Option<u32>,
    /// Settings fallback for styles without an explicit threshold.
    pub downsample_threshold: usize,
}

impl FigureOptions {
    /// Canvas size in pixels and the point-to-pixel scale for a theme.
    pub fn canvas(&self, theme: &Theme) -> (u32, u32, u32, f64) {
        let (w_in, h_in) = self.figsize.unwrap_or(theme.figsize);
        let dpi = self.dpi.unwrap_or(theme.dpi);
        let width = (w_in * dpi as f64).round() as u32;
        let height = (h_in * dpi as f64).round() as u32;
        (width.max(1), height.max(1), dpi, dpi as f64 / 72.0)
    }
}

/// Dispatch to the engine matching the data/style pair.
pub fn layout_chart(
    data: &ChartData,
    style: &Style,
    theme: &Theme,
    opts: &FigureOptions,
) -> Result<DrawingPlan, ChartError> {
    match (data, style) {
        (ChartData::Bar { labels, series }, Style::Bar(s)) => {
            Ok(bar::layout(labels, series, s, theme, opts))
        }
        (
            ChartData::Pie {
                labels,
                values,
                colors,
                subtitle,
                center_title,
            },
            Style::Pie(s),
        ) => Ok(pie::layout(
            labels,
            values,
            colors.as_deref(),
            subtitle.as_deref(),
            center_title.as_deref(),
            s,
            theme,
            opts,
        )),
        (ChartData::Line { x, series }, Style::Line(s)) => {
            Ok(line::layout(x, series, s, theme, opts))
        }
        (
            ChartData::Timeseries {
                dates,
                series,
                upper,
                lower,
            },
            Style::Timeseries(s),
        ) => Ok(timeseries::layout(
            dates,
            series,
            upper.as_deref(),
            lower.as_deref(),
            s,
            theme,
            opts,
        )),
        (ChartData::Rose { labels, values }, Style::Rose(s)) => {
            Ok(rose::layout(labels, values, s, theme, opts))
        }
        (_, style) => Err(ChartError::Data(ChartDataError::new(
            "(root)",
            format!("data does not match a {} chart", style.chart_type()),
        ))),
    }
}
