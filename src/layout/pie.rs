//! Pie and donut chart layout.
//!
//! Covers plain pies, donuts, exploded and shadowed slices, outside labels
//! with leader lines, center titles and the table-legend panel. Slices with
//! an empty label are gaps: they consume their proportional angle but get no
//! label or percentage text.

use std::f64::consts::PI;

use crate::layout::text::{estimate_text_width_px, line_height_px};
use crate::layout::FigureOptions;
use crate::plan::{Color, DrawOp, DrawingPlan, HAlign, Stroke, TextRotation, VAlign};
use crate::style::PieStyle;
use crate::theme::Theme;

const PAD: f64 = 8.0;
const SHADOW_OFFSET: f64 = 3.0;

#[allow(clippy::too_many_arguments)]
pub fn layout(
    labels: &[String],
    values: &[f64],
    colors: Option<&[Color]>,
    subtitle: Option<&str>,
    center_title: Option<&str>,
    style: &PieStyle,
    theme: &Theme,
    opts: &FigureOptions,
) -> DrawingPlan {
    let (width, height, dpi, scale) = opts.canvas(theme);
    let mut plan = DrawingPlan::new(width, height, dpi, theme.background_color, &theme.font_family);
    plan.transparent = style.transparent_background;
    if !plan.transparent {
        plan.push(DrawOp::Rect {
            x0: 0.0,
            y0: 0.0,
            x1: width as f64,
            y1: height as f64,
            fill: Some(theme.background_color),
            stroke: None,
        });
    }

    let title_px = theme.title_font_size * scale;
    let label_px = theme.label_font_size * scale;
    let mut top = PAD;
    if let Some(title) = &opts.title {
        plan.push(DrawOp::Text {
            x: width as f64 / 2.0,
            y: top,
            text: title.clone(),
            size: title_px,
            color: theme.title_color,
            h_align: HAlign::Center,
            v_align: VAlign::Top,
            bold: true,
            italic: false,
            rotation: TextRotation::Horizontal,
        });
        top += line_height_px(title_px);
        if let Some(sub) = subtitle {
            plan.push(DrawOp::Text {
                x: width as f64 / 2.0,
                y: top,
                text: sub.to_string(),
                size: label_px,
                color: theme.text_color,
                h_align: HAlign::Center,
                v_align: VAlign::Top,
                bold: false,
                italic: true,
                rotation: TextRotation::Horizontal,
            });
            top += line_height_px(label_px);
        }
        top += PAD;
    }

    // The pie shares the canvas with an optional table-legend panel.
    let pie_right = if style.table_legend {
        width as f64 * 0.62
    } else {
        width as f64
    };
    let avail_w = pie_right - PAD * 2.0;
    let avail_h = height as f64 - top - PAD * 2.0;
    let room = avail_w.min(avail_h) / 2.0;
    // Outside labels need space for leader lines and text.
    let r = room
        * if style.outside_labels {
            0.62
        } else if style.show_labels {
            0.74
        } else {
            0.88
        };
    let cx = PAD + avail_w / 2.0;
    let cy = top + PAD + avail_h / 2.0;
    let r_inner = if style.donut { r * style.donut_ratio } else { 0.0 };

    let sum: f64 = values.iter().sum();
    let dir = if style.counter_clockwise { 1.0 } else { -1.0 };
    let mut angle = style.start_angle;

    struct Slice {
        start: f64,
        end: f64,
        mid: f64,
        frac: f64,
        color: Color,
        gap: bool,
        offset: (f64, f64),
    }
    let mut slices = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let frac = v / sum;
        let sweep = 360.0 * frac;
        let start = angle;
        let end = angle + dir * sweep;
        let mid = (start + end) / 2.0;
        let color = colors
            .and_then(|c| c.get(i).copied())
            .unwrap_or_else(|| theme.color(i));
        let offset = if style.explode {
            let rad = mid * PI / 180.0;
            let d = style.explode_amount * r;
            (rad.cos() * d, -rad.sin() * d)
        } else {
            (0.0, 0.0)
        };
        slices.push(Slice {
            start,
            end,
            mid,
            frac,
            color,
            gap: labels.get(i).is_none_or(|l| l.is_empty()),
            offset,
        });
        angle = end;
    }

    if style.shadow {
        for s in &slices {
            plan.push(DrawOp::Wedge {
                cx: cx + s.offset.0 + SHADOW_OFFSET,
                cy: cy + s.offset.1 + SHADOW_OFFSET,
                r_outer: r,
                r_inner,
                start_deg: s.start,
                end_deg: s.end,
                fill: Color::rgba(0, 0, 0, 0.25),
                stroke: None,
            });
        }
    }

    for s in &slices {
        plan.push(DrawOp::Wedge {
            cx: cx + s.offset.0,
            cy: cy + s.offset.1,
            r_outer: r,
            r_inner,
            start_deg: s.start,
            end_deg: s.end,
            fill: s.color,
            stroke: Some(Stroke::solid(theme.background_color, 1.0 * scale)),
        });
    }

    let tick_px = theme.tick_font_size * scale;
    let value_px = theme.value_font_size * scale;
    for (i, s) in slices.iter().enumerate() {
        if s.gap {
            continue;
        }
        let rad = s.mid * PI / 180.0;
        let (ux, uy) = (rad.cos(), -rad.sin());

        if style.show_percentages {
            // Midway across the visible ring for donuts, 0.6 r for pies.
            let pr = if style.donut {
                r * (style.donut_ratio + 1.0) / 2.0
            } else {
                r * 0.6
            };
            plan.push(DrawOp::Text {
                x: cx + s.offset.0 + ux * pr,
                y: cy + s.offset.1 + uy * pr,
                text: format_percent(s.frac),
                size: value_px,
                color: theme.background_color,
                h_align: HAlign::Center,
                v_align: VAlign::Middle,
                bold: true,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }

        if style.show_labels && !style.table_legend {
            let lr = r * style.label_distance;
            let x = cx + s.offset.0 + ux * lr;
            plan.push(DrawOp::Text {
                x,
                y: cy + s.offset.1 + uy * lr,
                text: labels[i].clone(),
                size: tick_px,
                color: theme.text_color,
                h_align: side_align(ux),
                v_align: VAlign::Middle,
                bold: false,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }

        if style.outside_labels {
            emit_outside_label(
                &mut plan, style, theme, cx, cy, r, s.offset, rad, &labels[i], s.frac, tick_px,
            );
        }
    }

    if style.center_title {
        if let Some(text) = center_title {
            let size = label_px * 1.1;
            if style.center_title_box {
                let w = estimate_text_width_px(text, size) + PAD * 2.0;
                let h = line_height_px(size) + PAD;
                plan.push(DrawOp::Rect {
                    x0: cx - w / 2.0,
                    y0: cy - h / 2.0,
                    x1: cx + w / 2.0,
                    y1: cy + h / 2.0,
                    fill: Some(theme.text_color.with_alpha(0.85)),
                    stroke: None,
                });
            }
            plan.push(DrawOp::Text {
                x: cx,
                y: cy,
                text: text.to_string(),
                size,
                color: if style.center_title_box {
                    theme.background_color
                } else {
                    theme.title_color
                },
                h_align: HAlign::Center,
                v_align: VAlign::Middle,
                bold: true,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
    }

    if style.table_legend {
        emit_table_legend(
            &mut plan, style, theme, labels, values, &slices.iter().map(|s| s.color).collect::<Vec<_>>(),
            pie_right, top, height as f64, scale,
        );
    }

    plan
}

fn format_percent(frac: f64) -> String {
    format!("{:.1}%", frac * 100.0)
}

fn side_align(ux: f64) -> HAlign {
    if ux > 0.15 {
        HAlign::Left
    } else if ux < -0.15 {
        HAlign::Right
    } else {
        HAlign::Center
    }
}

/// Two-segment leader line from the rim to a horizontal run, with the label
/// (and optional background box) at its end.
#[allow(clippy::too_many_arguments)]
fn emit_outside_label(
    plan: &mut DrawingPlan,
    style: &PieStyle,
    theme: &Theme,
    cx: f64,
    cy: f64,
    r: f64,
    offset: (f64, f64),
    rad: f64,
    label: &str,
    frac: f64,
    tick_px: f64,
) {
    let (ux, uy) = (rad.cos(), -rad.sin());
    let x0 = cx + offset.0 + ux * r;
    let y0 = cy + offset.1 + uy * r;
    let x1 = cx + offset.0 + ux * r * 1.15;
    let y1 = cy + offset.1 + uy * r * 1.15;
    let rightward = ux >= 0.0;
    let x2 = if rightward {
        cx + r * 1.35
    } else {
        cx - r * 1.35
    };
    plan.push(DrawOp::Path {
        points: vec![(x0, y0), (x1, y1), (x2, y1)],
        fill: None,
        stroke: Some(Stroke::solid(theme.axis_color, 1.0)),
    });

    let text = if style.outside_label_percent {
        format!("{label}, {}", format_percent(frac))
    } else {
        label.to_string()
    };
    let tx = if rightward { x2 + 4.0 } else { x2 - 4.0 };
    if style.label_box {
        let w = estimate_text_width_px(&text, tick_px) + PAD;
        let h = line_height_px(tick_px) + 4.0;
        let bx0 = if rightward { tx - PAD / 2.0 } else { tx - w + PAD / 2.0 };
        plan.push(DrawOp::Rect {
            x0: bx0,
            y0: y1 - h / 2.0,
            x1: bx0 + w,
            y1: y1 + h / 2.0,
            fill: Some(theme.background_color.with_alpha(0.85)),
            stroke: Some(Stroke::solid(theme.grid_color, 1.0)),
        });
    }
    plan.push(DrawOp::Text {
        x: tx,
        y: y1,
        text,
        size: tick_px,
        color: theme.text_color,
        h_align: if rightward { HAlign::Left } else { HAlign::Right },
        v_align: VAlign::Middle,
        bold: false,
        italic: false,
        rotation: TextRotation::Horizontal,
    });
}

/// Swatch / label / value / percent rows in a panel right of the pie.
#[allow(clippy::too_many_arguments)]
fn emit_table_legend(
    plan: &mut DrawingPlan,
    style: &PieStyle,
    theme: &Theme,
    labels: &[String],
    values: &[f64],
    colors: &[Color],
    panel_left: f64,
    top: f64,
    height: f64,
    scale: f64,
) {
    let legend_px = theme.legend_font_size * scale;
    let row_h = line_height_px(legend_px) * 1.4;
    let sum: f64 = values.iter().sum();

    let visible: Vec<usize> = (0..labels.len()).filter(|&i| !labels[i].is_empty()).collect();
    let mut n_rows = visible.len();
    if style.table_header {
        n_rows += 1;
    }
    let total_h = n_rows as f64 * row_h;
    let mut y = (top + (height - top - total_h) / 2.0).max(top);

    let x_swatch = panel_left + PAD;
    let x_label = x_swatch + legend_px + PAD;
    let panel_width = plan.width as f64 - panel_left - PAD * 2.0;
    let x_value = panel_left + panel_width * 0.62;
    let x_pct = panel_left + panel_width * 0.88;

    let mut text_row = |plan: &mut DrawingPlan,
                        y: f64,
                        label: &str,
                        value: Option<&str>,
                        pct: Option<&str>,
                        bold: bool| {
        plan.push(DrawOp::Text {
            x: x_label,
            y: y + row_h / 2.0,
            text: label.to_string(),
            size: legend_px,
            color: theme.text_color,
            h_align: HAlign::Left,
            v_align: VAlign::Middle,
            bold,
            italic: false,
            rotation: TextRotation::Horizontal,
        });
        if let Some(v) = value {
            plan.push(DrawOp::Text {
                x: x_value,
                y: y + row_h / 2.0,
                text: v.to_string(),
                size: legend_px,
                color: theme.text_color,
                h_align: HAlign::Right,
                v_align: VAlign::Middle,
                bold,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
        if let Some(p) = pct {
            plan.push(DrawOp::Text {
                x: x_pct,
                y: y + row_h / 2.0,
                text: p.to_string(),
                size: legend_px,
                color: theme.text_color,
                h_align: HAlign::Right,
                v_align: VAlign::Middle,
                bold,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
    };

    if style.table_header {
        text_row(
            plan,
            y,
            "Label",
            style.table_show_value.then_some("Value"),
            style.table_show_percent.then_some("%"),
            true,
        );
        y += row_h;
    }

    for &i in &visible {
        plan.push(DrawOp::Rect {
            x0: x_swatch,
            y0: y + (row_h - legend_px) / 2.0,
            x1: x_swatch + legend_px,
            y1: y + (row_h + legend_px) / 2.0,
            fill: Some(colors[i]),
            stroke: None,
        });
        let value = style
            .table_show_value
            .then(|| crate::layout::numeric::format_tick(values[i]));
        let pct = style
            .table_show_percent
            .then(|| format_percent(values[i] / sum));
        text_row(plan, y, &labels[i], value.as_deref(), pct.as_deref(), false);
        y += row_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeRegistry;

    fn theme() -> Theme {
        ThemeRegistry::with_builtins().get("default").unwrap()
    }

    fn wedges(plan: &DrawingPlan) -> Vec<(f64, f64, f64)> {
        plan.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Wedge {
                    start_deg,
                    end_deg,
                    fill,
                    ..
                } if fill.a == 1.0 => Some((*start_deg, *end_deg, (*end_deg - *start_deg).abs())),
                _ => None,
            })
            .collect()
    }

    fn strings(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sweeps_are_proportional_and_sum_to_a_full_turn() {
        let labels = strings(&["a", "b", "c"]);
        let values = vec![50.0, 40.0, 10.0];
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &PieStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let w = wedges(&plan);
        assert_eq!(w.len(), 3);
        assert!((w[0].2 - 180.0).abs() < 1e-9);
        assert!((w[1].2 - 144.0).abs() < 1e-9);
        assert!((w[2].2 - 36.0).abs() < 1e-9);
        let total: f64 = w.iter().map(|s| s.2).sum();
        assert!((total - 360.0).abs() < 1e-9);
    }

    #[test]
    fn slices_start_at_twelve_oclock_and_run_clockwise() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 1.0];
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &PieStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let w = wedges(&plan);
        assert_eq!(w[0].0, 90.0);
        // clockwise slices decrease in math-convention degrees
        assert!(w[0].1 < w[0].0);
        assert_eq!(w[1].0, w[0].1);
    }

    #[test]
    fn gap_slices_consume_angle_but_suppress_text() {
        let labels = strings(&["visible", ""]);
        let values = vec![3.0, 1.0];
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &PieStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let w = wedges(&plan);
        assert_eq!(w.len(), 2);
        assert!((w[1].2 - 90.0).abs() < 1e-9);
        // one label + one percentage, both for the visible slice
        let texts: Vec<&String> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.iter().any(|t| *t == "visible"));
        assert_eq!(texts.iter().filter(|t| t.contains('%')).count(), 1);
    }

    #[test]
    fn donut_has_a_hole() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 2.0];
        let style = PieStyle {
            name: "donut".into(),
            donut: true,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        for op in &plan.ops {
            if let DrawOp::Wedge { r_outer, r_inner, .. } = op {
                assert!((r_inner / r_outer - 0.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn custom_colors_override_the_palette() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 1.0];
        let colors = vec![Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)];
        let plan = layout(
            &labels,
            &values,
            Some(&colors),
            None,
            None,
            &PieStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let fills: Vec<Color> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Wedge { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, colors);
    }

    #[test]
    fn shadow_doubles_the_wedge_count() {
        let labels = strings(&["a", "b", "c"]);
        let values = vec![1.0, 1.0, 1.0];
        let style = PieStyle {
            name: "shadow".into(),
            shadow: true,
            explode: true,
            explode_amount: 0.02,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        let all: usize = plan
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Wedge { .. }))
            .count();
        assert_eq!(all, 6);
    }

    #[test]
    fn table_legend_lists_values_and_percentages() {
        let labels = strings(&["alpha", "beta"]);
        let values = vec![30.0, 70.0];
        let style = PieStyle {
            name: "table_legend".into(),
            table_legend: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        let texts: Vec<&String> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.iter().any(|t| *t == "alpha"));
        assert!(texts.iter().any(|t| *t == "70.0%"));
        assert!(texts.iter().any(|t| *t == "30"));
    }

    #[test]
    fn transparent_style_marks_the_plan() {
        let labels = strings(&["a"]);
        let values = vec![1.0];
        let style = PieStyle {
            name: "transparent_donut".into(),
            donut: true,
            transparent_background: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        assert!(plan.transparent);
        assert!(!plan
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Rect { x0, y0, .. } if *x0 == 0.0 && *y0 == 0.0)));
    }

    #[test]
    fn center_title_lands_at_the_centroid() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 1.0];
        let style = PieStyle {
            name: "annotated".into(),
            donut: true,
            center_title: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            Some("Total"),
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        assert!(plan.ops.iter().any(
            |op| matches!(op, DrawOp::Text { text, bold: true, .. } if text == "Total")
        ));
    }

    #[test]
    fn counter_clockwise_reverses_direction() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 1.0];
        let style = PieStyle {
            name: "ccw".into(),
            counter_clockwise: true,
            ..Default::default()
        };
        let plan = layout(
            &labels,
            &values,
            None,
            None,
            None,
            &style,
            &theme(),
            &FigureOptions::default(),
        );
        let w = wedges(&plan);
        assert!(w[0].1 > w[0].0);
    }
}
