//! Bar chart layout: vertical/horizontal, grouped, stacked, outlined and
//! value-labelled variants.

use crate::data::SeriesData;
use crate::layout::axes::{AxisKind, FrameSpec};
use crate::layout::numeric::format_tick;
use crate::layout::FigureOptions;
use crate::plan::{Color, DrawOp, DrawingPlan, HAlign, Stroke, TextRotation, VAlign};
use crate::style::{BarStyle, Orientation};
use crate::theme::Theme;

pub fn layout(
    labels: &[String],
    series: &SeriesData,
    style: &BarStyle,
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

    let (v_min, v_max) = value_domain(series, style.stacked);
    // Headroom so value labels and bar tops stay inside the frame.
    let pad = (v_max - v_min) * if style.show_values { 0.12 } else { 0.05 };
    let v_max = v_max + pad;
    let v_min = if v_min < 0.0 { v_min - pad } else { v_min };

    let legend: Vec<(String, Color)> = match series {
        SeriesData::Single(_) => Vec::new(),
        SeriesData::Multi(s) => s
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), theme.color(i)))
            .collect(),
    };

    let value_axis = AxisKind::Linear {
        min: v_min,
        max: v_max,
    };
    let (x, y) = match style.orientation {
        Orientation::Vertical => (AxisKind::Categorical(labels), value_axis),
        Orientation::Horizontal => (value_axis, AxisKind::Categorical(labels)),
    };
    let spec = FrameSpec {
        theme,
        width: width as f64,
        height: height as f64,
        scale,
        title: opts.title.as_deref(),
        xlabel: opts.xlabel.as_deref(),
        ylabel: opts.ylabel.as_deref(),
        x,
        y,
        legend: &legend,
        show_grid: true,
    };
    let (frame, chrome) = spec.build();
    plan.ops.extend(chrome);

    let n_series = series.series_count();
    // Multiple unstacked series always sit side by side.
    let side_by_side = n_series > 1 && !style.stacked;
    // bar_width is the whole group's share of a label slot; side-by-side
    // bars split it so a group never spills into the next category.
    let slot_width = if side_by_side {
        style.bar_width / n_series as f64
    } else {
        style.bar_width
    };

    let outline = style
        .outlined
        .then(|| Stroke::solid(theme.text_color, style.outline_width.max(0.5) * scale));
    let value_px = theme.value_font_size * scale;

    let mut stack_base = vec![0.0f64; labels.len()];
    for (si, (_, values)) in series.iter().enumerate() {
        let color = match series {
            SeriesData::Single(_) => None, // per-category colors below
            SeriesData::Multi(_) => Some(theme.color(si)),
        };
        for (ci, &v) in values.iter().enumerate() {
            let fill = color
                .unwrap_or_else(|| theme.color(ci))
                .with_alpha(style.alpha);
            let slot = ci as f64;
            let (lo, hi) = if style.stacked {
                let base = stack_base[ci];
                stack_base[ci] += v;
                (base, base + v)
            } else {
                (0.0, v)
            };
            let center = if side_by_side {
                slot + (si as f64 - n_series as f64 / 2.0 + 0.5) * slot_width
            } else {
                slot
            };
            let half = slot_width / 2.0;
            match style.orientation {
                Orientation::Vertical => {
                    let x0 = frame.x_px(center - half);
                    let x1 = frame.x_px(center + half);
                    let y_lo = frame.y_px(lo);
                    let y_hi = frame.y_px(hi);
                    plan.push(DrawOp::Rect {
                        x0,
                        y0: y_hi.min(y_lo),
                        x1,
                        y1: y_hi.max(y_lo),
                        fill: Some(fill),
                        stroke: outline,
                    });
                    if style.show_values && !style.stacked {
                        let above = v >= 0.0;
                        plan.push(DrawOp::Text {
                            x: (x0 + x1) / 2.0,
                            y: if above { y_hi - 3.0 } else { y_hi + 3.0 },
                            text: format_tick(v),
                            size: value_px,
                            color: theme.text_color,
                            h_align: HAlign::Center,
                            v_align: if above { VAlign::Bottom } else { VAlign::Top },
                            bold: false,
                            italic: false,
                            rotation: TextRotation::Horizontal,
                        });
                    }
                }
                Orientation::Horizontal => {
                    let y0 = frame.y_px(center + half);
                    let y1 = frame.y_px(center - half);
                    let x_lo = frame.x_px(lo);
                    let x_hi = frame.x_px(hi);
                    plan.push(DrawOp::Rect {
                        x0: x_lo.min(x_hi),
                        y0,
                        x1: x_lo.max(x_hi),
                        y1,
                        fill: Some(fill),
                        stroke: outline,
                    });
                    if style.show_values && !style.stacked {
                        let right = v >= 0.0;
                        plan.push(DrawOp::Text {
                            x: if right { x_hi + 3.0 } else { x_hi - 3.0 },
                            y: (y0 + y1) / 2.0,
                            text: format_tick(v),
                            size: value_px,
                            color: theme.text_color,
                            h_align: if right { HAlign::Left } else { HAlign::Right },
                            v_align: VAlign::Middle,
                            bold: false,
                            italic: false,
                            rotation: TextRotation::Horizontal,
                        });
                    }
                }
            }
        }
    }

    plan
}

/// Value-axis extent: zero-anchored, widened by negatives, and by stacked
/// cumulative totals when stacking.
fn value_domain(series: &SeriesData, stacked: bool) -> (f64, f64) {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    if stacked && series.series_count() > 1 {
        if let SeriesData::Multi(all) = series {
            let len = all.first().map(|(_, v)| v.len()).unwrap_or(0);
            for ci in 0..len {
                let total: f64 = all.iter().map(|(_, v)| v[ci]).sum();
                min = min.min(total);
                max = max.max(total);
            }
        }
    } else {
        for (_, values) in series.iter() {
            for &v in values {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }
    (min, max)
}
