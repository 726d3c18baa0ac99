//! Nightingale rose chart layout: equal-angle petals whose radius encodes
//! the value, over concentric grid circles.

use std::f64::consts::PI;

use crate::layout::numeric::{format_tick, nice_ticks};
use crate::layout::text::line_height_px;
use crate::layout::FigureOptions;
use crate::plan::{DrawOp, DrawingPlan, HAlign, Stroke, TextRotation, VAlign};
use crate::style::{RoseKind, RoseStyle};
use crate::theme::Theme;

const PAD: f64 = 8.0;

pub fn layout(
    labels: &[String],
    values: &[f64],
    style: &RoseStyle,
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

    let title_px = theme.title_font_size * scale;
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
        top += line_height_px(title_px) + PAD;
    }

    let avail = (width as f64 - PAD * 2.0).min(height as f64 - top - PAD * 2.0);
    let r_max = avail / 2.0
        * if style.show_labels {
            1.0 / style.label_distance.max(1.0) * 0.95
        } else {
            0.95
        };
    let cx = width as f64 / 2.0;
    let cy = top + PAD + (height as f64 - top - PAD * 2.0) / 2.0;

    let v_max = values.iter().cloned().fold(0.0, f64::max);
    let radius_of = |v: f64| -> f64 {
        if v_max <= 0.0 {
            return 0.0;
        }
        match style.kind {
            RoseKind::Radius => r_max * (v / v_max),
            // Constant-angle petals: area tracks r^2, so r scales with sqrt.
            RoseKind::Area => r_max * (v / v_max).sqrt(),
        }
    };

    // Concentric reference circles at nice radial ticks.
    let tick_px = theme.tick_font_size * scale;
    for t in nice_ticks(0.0, v_max, 4) {
        if t <= 0.0 || t > v_max {
            continue;
        }
        let rr = radius_of(t);
        plan.push(DrawOp::Circle {
            cx,
            cy,
            r: rr,
            fill: None,
            stroke: Some(Stroke {
                color: theme.grid(),
                width: 1.0,
                pattern: theme.grid_style,
            }),
        });
        plan.push(DrawOp::Text {
            x: cx + 3.0,
            y: cy - rr - 2.0,
            text: format_tick(t),
            size: tick_px * 0.9,
            color: theme.axis_color,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            bold: false,
            italic: false,
            rotation: TextRotation::Horizontal,
        });
    }

    let n = values.len();
    let sweep = 360.0 / n as f64;
    let dir = if style.counter_clockwise { 1.0 } else { -1.0 };
    let sum: f64 = values.iter().sum();
    let label_px = theme.label_font_size * scale;

    for (i, &v) in values.iter().enumerate() {
        let start = style.start_angle + dir * sweep * i as f64;
        let end = start + dir * sweep;
        let r = radius_of(v);
        plan.push(DrawOp::Wedge {
            cx,
            cy,
            r_outer: r,
            r_inner: 0.0,
            start_deg: start,
            end_deg: end,
            fill: theme.color(i).with_alpha(style.alpha),
            stroke: Some(Stroke::solid(theme.background_color, 1.0 * scale)),
        });

        // Gap petals (empty label) keep their slot but get no text.
        if style.show_labels && !labels[i].is_empty() {
            let mid = (start + end) / 2.0 * PI / 180.0;
            let lr = r_max * style.label_distance;
            let x = cx + mid.cos() * lr;
            let y = cy - mid.sin() * lr;
            plan.push(DrawOp::Text {
                x,
                y,
                text: labels[i].clone(),
                size: label_px,
                color: theme.text_color,
                h_align: HAlign::Center,
                v_align: VAlign::Middle,
                bold: false,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
            if style.show_percentages {
                plan.push(DrawOp::Text {
                    x,
                    y: y + line_height_px(label_px) * 0.8,
                    text: format!("{:.1}%", v / sum * 100.0),
                    size: label_px * 0.85,
                    color: theme.text_color,
                    h_align: HAlign::Center,
                    v_align: VAlign::Middle,
                    bold: false,
                    italic: false,
                    rotation: TextRotation::Horizontal,
                });
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeRegistry;

    fn theme() -> Theme {
        ThemeRegistry::with_builtins().get("default").unwrap()
    }

    fn strings(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn petal_radii(plan: &DrawingPlan) -> Vec<f64> {
        plan.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Wedge { r_outer, .. } => Some(*r_outer),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn petals_share_equal_angles() {
        let labels = strings(&["n", "e", "s", "w"]);
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let plan = layout(
            &labels,
            &values,
            &RoseStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let sweeps: Vec<f64> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Wedge {
                    start_deg, end_deg, ..
                } => Some((end_deg - start_deg).abs()),
                _ => None,
            })
            .collect();
        assert_eq!(sweeps.len(), 4);
        for s in sweeps {
            assert!((s - 90.0).abs() < 1e-9);
        }
    }

    #[test]
    fn radius_mode_scales_linearly() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 4.0];
        let plan = layout(
            &labels,
            &values,
            &RoseStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let r = petal_radii(&plan);
        assert!((r[1] / r[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn area_mode_scales_with_square_root() {
        let labels = strings(&["a", "b"]);
        let values = vec![1.0, 4.0];
        let style = RoseStyle {
            name: "area".into(),
            kind: RoseKind::Area,
            ..Default::default()
        };
        let plan = layout(&labels, &values, &style, &theme(), &FigureOptions::default());
        let r = petal_radii(&plan);
        assert!((r[1] / r[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn labels_and_percentages_follow_the_style() {
        let labels = strings(&["north", "south"]);
        let values = vec![1.0, 3.0];
        let style = RoseStyle {
            name: "labeled".into(),
            show_percentages: true,
            ..Default::default()
        };
        let plan = layout(&labels, &values, &style, &theme(), &FigureOptions::default());
        let texts: Vec<&String> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.iter().any(|t| *t == "north"));
        assert!(texts.iter().any(|t| *t == "75.0%"));
    }

    #[test]
    fn gap_petals_keep_their_slot_but_stay_unlabeled() {
        let labels = strings(&["a", "", "c"]);
        let values = vec![1.0, 2.0, 3.0];
        let plan = layout(
            &labels,
            &values,
            &RoseStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        assert_eq!(
            plan.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Wedge { .. }))
                .count(),
            3
        );
        assert!(!plan.ops.iter().any(
            |op| matches!(op, DrawOp::Text { text, .. } if text.is_empty())
        ));
    }

    #[test]
    fn grid_circles_are_drawn() {
        let labels = strings(&["a", "b", "c"]);
        let values = vec![10.0, 20.0, 30.0];
        let plan = layout(
            &labels,
            &values,
            &RoseStyle::default(),
            &theme(),
            &FigureOptions::default(),
        );
        let circles = plan
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { fill: None, .. }))
            .count();
        assert!(circles >= 2, "expected reference circles, got {circles}");
    }
}
