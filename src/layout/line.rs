//! Line chart layout: plain, smoothed, stepped, area-filled, dashed and
//! marker variants over a numeric or categorical x domain.

use crate::data::{LineDomain, SeriesData};
use crate::layout::axes::{AxisKind, Frame, FrameSpec};
use crate::layout::numeric::{catmull_rom, stepped_points};
use crate::layout::FigureOptions;
use crate::plan::{Color, DrawOp, DrawingPlan, Stroke};
use crate::style::LineStyle;
use crate::theme::Theme;

const SPLINE_SAMPLES: usize = 10;

pub fn layout(
    x: &LineDomain,
    series: &SeriesData,
    style: &LineStyle,
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

    let xs: Vec<f64> = match x {
        LineDomain::Numeric(v) => v.clone(),
        LineDomain::Categorical(labels) => (0..labels.len()).map(|i| i as f64).collect(),
    };
    let (y_min, y_max) = y_domain(series, style.fill_area);

    let legend: Vec<(String, Color)> = match series {
        SeriesData::Single(_) => Vec::new(),
        SeriesData::Multi(s) => s
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), theme.color(i)))
            .collect(),
    };

    let x_axis = match x {
        LineDomain::Numeric(v) => AxisKind::Linear {
            min: v.iter().cloned().fold(f64::INFINITY, f64::min),
            max: v.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        },
        LineDomain::Categorical(labels) => AxisKind::Categorical(labels),
    };
    let spec = FrameSpec {
        theme,
        width: width as f64,
        height: height as f64,
        scale,
        title: opts.title.as_deref(),
        xlabel: opts.xlabel.as_deref(),
        ylabel: opts.ylabel.as_deref(),
        x: x_axis,
        y: AxisKind::Linear {
            min: y_min,
            max: y_max,
        },
        legend: &legend,
        show_grid: true,
    };
    let (frame, chrome) = spec.build();
    plan.ops.extend(chrome);

    for (si, (_, values)) in series.iter().enumerate() {
        let color = theme.color(si);
        emit_series(&mut plan, &frame, &xs, values, color, style, theme, scale);
    }

    plan
}

fn y_domain(series: &SeriesData, fill_area: bool) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, values) in series.iter() {
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if fill_area {
        // Area fills run down to the zero baseline.
        min = min.min(0.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (if fill_area && min == 0.0 { 0.0 } else { min - pad }, max + pad)
}

#[allow(clippy::too_many_arguments)]
fn emit_series(
    plan: &mut DrawingPlan,
    frame: &Frame,
    xs: &[f64],
    values: &[f64],
    color: Color,
    style: &LineStyle,
    theme: &Theme,
    scale: f64,
) {
    let data_points: Vec<(f64, f64)> = xs.iter().copied().zip(values.iter().copied()).collect();
    let shaped = if style.stepped {
        stepped_points(&data_points)
    } else {
        data_points.clone()
    };
    let mut px: Vec<(f64, f64)> = shaped
        .iter()
        .map(|&(x, y)| (frame.x_px(x), frame.y_px(y)))
        .collect();
    if style.smooth {
        px = catmull_rom(&px, SPLINE_SAMPLES);
    }

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
        points: px,
        fill: None,
        stroke: Some(Stroke {
            color,
            width: theme.line_width * scale,
            pattern: style.line_pattern,
        }),
    });

    if style.show_points {
        for &(x, y) in &data_points {
            plan.push(DrawOp::Circle {
                cx: frame.x_px(x),
                cy: frame.y_px(y),
                r: style.marker_size * scale,
                fill: Some(color),
                stroke: None,
            });
        }
    }
}
