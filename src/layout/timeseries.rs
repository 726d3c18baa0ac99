//! Time series layout: date axis, area fills, least-squares trend lines,
//! range bands and automatic downsampling for large inputs.

use chrono::NaiveDateTime;
use log::warn;

use crate::data::SeriesData;
use crate::layout::axes::{AxisKind, Frame, FrameSpec};
use crate::layout::numeric::{linear_regression, lttb};
use crate::layout::FigureOptions;
use crate::plan::{Color, DrawOp, DrawingPlan, LinePattern, Stroke};
use crate::style::TimeSeriesStyle;
use crate::theme::Theme;

const SECS_PER_DAY: f64 = 86_400.0;

/// Fractional days since the Unix epoch; the unit the date axis works in.
fn to_days(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 / SECS_PER_DAY
}

#[allow(clippy::too_many_arguments)]
pub fn layout(
    dates: &[NaiveDateTime],
    series: &SeriesData,
    upper: Option<&[f64]>,
    lower: Option<&[f64]>,
    style: &TimeSeriesStyle,
    theme: &Theme,
    opts: &FigureOptions,
) -> DrawingPlan {
    let (width, height, dpi, scale) = opts.canvas(theme);
    let mut plan = DrawingPlan::new(width, height, dpi, theme.background_color, &theme.font_family);
    plan.push(DrawOp::Rect {
        x0: 0.0,
        y0: 0.0,
        x1: width as f64,
        y1: height as f64,
        fill: Some(theme.background_color),
        stroke: None,
    });

    let days: Vec<f64> = dates.iter().map(to_days).collect();
    let x_min = days.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = days.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let (y_min, y_max) = y_domain(series, upper, lower, style.fill_area);

    let mut legend: Vec<(String, Color)> = match series {
        SeriesData::Single(_) => Vec::new(),
        SeriesData::Multi(s) => s
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), theme.color(i)))
            .collect(),
    };
    let trend_color = theme.color(series.series_count());
    if style.show_trend {
        legend.push(("Trend".to_string(), trend_color));
    }

    let spec = FrameSpec {
        theme,
        width: width as f64,
        height: height as f64,
        scale,
        title: opts.title.as_deref(),
        xlabel: opts.xlabel.as_deref(),
        ylabel: opts.ylabel.as_deref(),
        x: AxisKind::Date {
            min: x_min,
            max: x_max,
            format: &style.date_format,
        },
        y: AxisKind::Linear {
            min: y_min,
            max: y_max,
        },
        legend: &legend,
        show_grid: style.show_grid,
    };
    let (frame, chrome) = spec.build();
    plan.ops.extend(chrome);

    if style.range_bands {
        match (upper, lower) {
            (Some(up), Some(lo)) => {
                let mut poly: Vec<(f64, f64)> = days
                    .iter()
                    .zip(up)
                    .map(|(&d, &v)| (frame.x_px(d), frame.y_px(v)))
                    .collect();
                poly.extend(
                    days.iter()
                        .zip(lo)
                        .rev()
                        .map(|(&d, &v)| (frame.x_px(d), frame.y_px(v))),
                );
                plan.push(DrawOp::Path {
                    points: poly,
                    fill: Some(theme.color(0).with_alpha(style.band_alpha)),
                    stroke: None,
                });
            }
            _ => warn!("range band style requested but 'upper'/'lower' bounds are missing"),
        }
    }

    let threshold = style
        .downsample_threshold
        .unwrap_or(opts.downsample_threshold.max(2));

    for (si, (_, values)) in series.iter().enumerate() {
        let color = theme.color(si);
        let mut points: Vec<(f64, f64)> =
            days.iter().copied().zip(values.iter().copied()).collect();
        if style.downsample && points.len() > threshold {
            points = lttb(&points, threshold);
        }
        emit_series(&mut plan, &frame, &points, color, style, theme, scale);

        if style.show_trend {
            if let Some((slope, intercept)) = linear_regression(&points) {
                let y0 = (slope * frame.x_min + intercept).clamp(frame.y_min, frame.y_max);
                let y1 = (slope * frame.x_max + intercept).clamp(frame.y_min, frame.y_max);
                plan.push(DrawOp::Path {
                    points: vec![
                        (frame.x_px(frame.x_min), frame.y_px(y0)),
                        (frame.x_px(frame.x_max), frame.y_px(y1)),
                    ],
                    fill: None,
                    stroke: Some(Stroke {
                        color: trend_color,
                        width: theme.line_width * scale * 0.8,
                        pattern: LinePattern::Dashed,
                    }),
                });
            }
        }
    }

    plan
}

fn y_domain(
    series: &SeriesData,
    upper: Option<&[f64]>,
    lower: Option<&[f64]>,
    fill_area: bool,
) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut feed = |vals: &[f64]| {
        for &v in vals {
            min = min.min(v);
            max = max.max(v);
        }
    };
    for (_, values) in series.iter() {
        feed(values);
    }
    if let Some(up) = upper {
        feed(up);
    }
    if let Some(lo) = lower {
        feed(lo);
    }
    if fill_area {
        min = min.min(0.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (if fill_area && min == 0.0 { 0.0 } else { min - pad }, max + pad)
}

fn emit_series(
    plan: &mut DrawingPlan,
    frame: &Frame,
    points: &[(f64, f64)],
    color: Color,
    style: &TimeSeriesStyle,
    theme: &Theme,
    scale: f64,
) {
    let px: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| (frame.x_px(x), frame.y_px(y)))
        .collect();

    if style.fill_area {
        let baseline = frame.y_px(0.0f64.clamp(frame.y_min, frame.y_max));
        let mut poly = px.clone();
        if let (Some(&(x_last, _)), Some(&(x_first, _))) = (px.last(), px.first()) {
            poly.push((x_last, baseline));
            poly.push((x_first, baseline));
        }
        plan.push(DrawOp::Path {
            points: poly,
            fill: Some(color.with_alpha(style.fill_alpha)),
            stroke: None,
        });
    }

    plan.push(DrawOp::Path {
        points: px.clone(),
        fill: None,
        stroke: Some(Stroke {
            color,
            width: theme.line_width * scale,
            pattern: style.line_pattern,
        }),
    });

    if style.show_points {
        for &(x, y) in &px {
            plan.push(DrawOp::Circle {
                cx: x,
                cy: y,
                r: 3.0 * scale,
                fill: Some(color),
                stroke: None,
            });
        }
    }
}
