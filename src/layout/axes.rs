//! Cartesian frame layout: margins, titles, axes, grid and legend.
//!
//! [`FrameSpec::build`] turns a theme plus axis descriptions into the chrome
//! every cartesian chart shares (background, title, axis labels, ticks, grid
//! lines, spines, bottom legend) and a [`Frame`] that maps data coordinates
//! into the remaining plot rectangle.

use chrono::DateTime;

use crate::layout::numeric::{format_tick, nice_ticks};
use crate::layout::text::{estimate_text_width_px, line_height_px, truncate_to_width};
use crate::plan::{Color, DrawOp, HAlign, Stroke, TextRotation, VAlign};
use crate::theme::Theme;

/// One axis of a cartesian chart.
#[derive(Debug, Clone)]
pub enum AxisKind<'a> {
    /// Continuous numeric axis over `min..=max`.
    Linear { min: f64, max: f64 },
    /// One slot per category, centered at integer positions; the domain runs
    /// from -0.5 to n - 0.5.
    Categorical(&'a [String]),
    /// Date axis in fractional days since the Unix epoch, labelled with a
    /// chrono format string.
    Date { min: f64, max: f64, format: &'a str },
}

impl AxisKind<'_> {
    fn domain(&self) -> (f64, f64) {
        match self {
            AxisKind::Linear { min, max } | AxisKind::Date { min, max, .. } => {
                if (max - min).abs() < f64::EPSILON {
                    // Degenerate span; pad so the point sits mid-axis.
                    (min - 1.0, max + 1.0)
                } else {
                    (*min, *max)
                }
            }
            AxisKind::Categorical(labels) => (-0.5, labels.len() as f64 - 0.5),
        }
    }

    fn is_categorical(&self) -> bool {
        matches!(self, AxisKind::Categorical(_))
    }
}

/// Everything the frame builder needs to lay out chart chrome.
pub struct FrameSpec<'a> {
    pub theme: &'a Theme,
    pub width: f64,
    pub height: f64,
    /// Pixels-per-point scale (`dpi / 72`).
    pub scale: f64,
    pub title: Option<&'a str>,
    pub xlabel: Option<&'a str>,
    pub ylabel: Option<&'a str>,
    pub x: AxisKind<'a>,
    pub y: AxisKind<'a>,
    /// Legend entries drawn in wrapped rows below the plot.
    pub legend: &'a [(String, Color)],
    pub show_grid: bool,
}

/// The plot rectangle with its data-to-pixel mapping.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Frame {
    /// Map a data x value to pixels.
    pub fn x_px(&self, v: f64) -> f64 {
        self.left + (v - self.x_min) / (self.x_max - self.x_min) * (self.right - self.left)
    }

    /// Map a data y value to pixels (y grows upward in data space).
    pub fn y_px(&self, v: f64) -> f64 {
        self.bottom - (v - self.y_min) / (self.y_max - self.y_min) * (self.bottom - self.top)
    }

    pub fn plot_width(&self) -> f64 {
        self.right - self.left
    }

    pub fn plot_height(&self) -> f64 {
        self.bottom - self.top
    }
}

const TICK_MARK_PX: f64 = 4.0;
const PAD: f64 = 8.0;

impl<'a> FrameSpec<'a> {
    /// Compute margins and emit the chart chrome.
    pub fn build(&self) -> (Frame, Vec<DrawOp>) {
        let theme = self.theme;
        let title_px = theme.title_font_size * self.scale;
        let label_px = theme.label_font_size * self.scale;
        let tick_px = theme.tick_font_size * self.scale;
        let legend_px = theme.legend_font_size * self.scale;

        let (x_min, x_max) = self.x.domain();
        let (y_min, y_max) = self.y.domain();

        let x_tick_labels = self.tick_labels(&self.x, x_min, x_max, true);
        let y_tick_labels = self.tick_labels(&self.y, y_min, y_max, false);

        // Margins grow with whatever has to fit in them.
        let mut top = PAD;
        if self.title.is_some() {
            top += line_height_px(title_px) + PAD;
        }
        let widest_y_label = y_tick_labels
            .iter()
            .map(|(_, t)| estimate_text_width_px(t, tick_px))
            .fold(0.0, f64::max);
        let mut left = PAD + widest_y_label + TICK_MARK_PX + 4.0;
        if self.ylabel.is_some() {
            left += line_height_px(label_px) + PAD;
        }
        let mut bottom_margin = PAD + line_height_px(tick_px) + TICK_MARK_PX;
        if self.xlabel.is_some() {
            bottom_margin += line_height_px(label_px) + PAD;
        }
        let legend_rows = self.legend_rows(legend_px);
        if !legend_rows.is_empty() {
            bottom_margin += legend_rows.len() as f64 * line_height_px(legend_px) + PAD;
        }
        let right_margin = PAD * 2.0;

        let frame = Frame {
            left,
            top,
            right: self.width - right_margin,
            bottom: self.height - bottom_margin,
            x_min,
            x_max,
            y_min,
            y_max,
        };

        let mut ops = Vec::new();

        if let Some(title) = self.title {
            ops.push(DrawOp::Text {
                x: self.width / 2.0,
                y: PAD,
                text: title.to_string(),
                size: title_px,
                color: theme.title_color,
                h_align: HAlign::Center,
                v_align: VAlign::Top,
                bold: true,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
        if let Some(xlabel) = self.xlabel {
            ops.push(DrawOp::Text {
                x: (frame.left + frame.right) / 2.0,
                y: self.height - PAD
                    - if legend_rows.is_empty() {
                        0.0
                    } else {
                        legend_rows.len() as f64 * line_height_px(legend_px) + PAD
                    },
                text: xlabel.to_string(),
                size: label_px,
                color: theme.text_color,
                h_align: HAlign::Center,
                v_align: VAlign::Bottom,
                bold: false,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
        if let Some(ylabel) = self.ylabel {
            ops.push(DrawOp::Text {
                x: PAD,
                y: (frame.top + frame.bottom) / 2.0,
                text: ylabel.to_string(),
                size: label_px,
                color: theme.text_color,
                h_align: HAlign::Center,
                v_align: VAlign::Top,
                bold: false,
                italic: false,
                rotation: TextRotation::Vertical,
            });
        }

        self.emit_x_axis(&frame, &x_tick_labels, tick_px, &mut ops);
        self.emit_y_axis(&frame, &y_tick_labels, tick_px, &mut ops);

        if theme.spine_visible {
            let spine = Stroke::solid(theme.axis_color, 1.0);
            ops.push(DrawOp::Path {
                points: vec![(frame.left, frame.top), (frame.left, frame.bottom)],
                fill: None,
                stroke: Some(spine),
            });
            ops.push(DrawOp::Path {
                points: vec![(frame.left, frame.bottom), (frame.right, frame.bottom)],
                fill: None,
                stroke: Some(spine),
            });
        }

        self.emit_legend(&legend_rows, legend_px, &mut ops);

        (frame, ops)
    }

    /// Tick positions and labels for one axis. Horizontal categorical labels
    /// are truncated to their slot width.
    fn tick_labels(
        &self,
        axis: &AxisKind<'_>,
        min: f64,
        max: f64,
        horizontal: bool,
    ) -> Vec<(f64, String)> {
        let tick_px = self.theme.tick_font_size * self.scale;
        match axis {
            AxisKind::Linear { .. } => nice_ticks(min, max, 5)
                .into_iter()
                .map(|t| (t, format_tick(t)))
                .collect(),
            AxisKind::Categorical(labels) => {
                let slot = if horizontal {
                    (self.width * 0.8) / labels.len() as f64
                } else {
                    self.width * 0.2
                };
                labels
                    .iter()
                    .enumerate()
                    .map(|(i, l)| (i as f64, truncate_to_width(l, tick_px, slot)))
                    .collect()
            }
            AxisKind::Date { format, .. } => {
                // Fewer ticks than a numeric axis: date labels are wide and
                // always drawn horizontally.
                nice_ticks(min, max, 4)
                    .into_iter()
                    .filter(|t| *t >= min && *t <= max)
                    .map(|t| (t, format_days(t, format)))
                    .collect()
            }
        }
    }

    fn emit_x_axis(
        &self,
        frame: &Frame,
        ticks: &[(f64, String)],
        tick_px: f64,
        ops: &mut Vec<DrawOp>,
    ) {
        let grid = self.show_grid && !self.x.is_categorical();
        for (pos, label) in ticks {
            let x = frame.x_px(*pos);
            if x < frame.left - 0.5 || x > frame.right + 0.5 {
                continue;
            }
            if grid {
                ops.push(DrawOp::Path {
                    points: vec![(x, frame.top), (x, frame.bottom)],
                    fill: None,
                    stroke: Some(Stroke {
                        color: self.theme.grid(),
                        width: 1.0,
                        pattern: self.theme.grid_style,
                    }),
                });
            }
            ops.push(DrawOp::Path {
                points: vec![(x, frame.bottom), (x, frame.bottom + TICK_MARK_PX)],
                fill: None,
                stroke: Some(Stroke::solid(self.theme.axis_color, 1.0)),
            });
            ops.push(DrawOp::Text {
                x,
                y: frame.bottom + TICK_MARK_PX + 2.0,
                text: label.clone(),
                size: tick_px,
                color: self.theme.text_color,
                h_align: HAlign::Center,
                v_align: VAlign::Top,
                bold: false,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
    }

    fn emit_y_axis(
        &self,
        frame: &Frame,
        ticks: &[(f64, String)],
        tick_px: f64,
        ops: &mut Vec<DrawOp>,
    ) {
        let grid = self.show_grid && !self.y.is_categorical();
        for (pos, label) in ticks {
            let y = frame.y_px(*pos);
            if y < frame.top - 0.5 || y > frame.bottom + 0.5 {
                continue;
            }
            if grid {
                ops.push(DrawOp::Path {
                    points: vec![(frame.left, y), (frame.right, y)],
                    fill: None,
                    stroke: Some(Stroke {
                        color: self.theme.grid(),
                        width: 1.0,
                        pattern: self.theme.grid_style,
                    }),
                });
            }
            ops.push(DrawOp::Path {
                points: vec![(frame.left - TICK_MARK_PX, y), (frame.left, y)],
                fill: None,
                stroke: Some(Stroke::solid(self.theme.axis_color, 1.0)),
            });
            ops.push(DrawOp::Text {
                x: frame.left - TICK_MARK_PX - 4.0,
                y,
                text: label.clone(),
                size: tick_px,
                color: self.theme.text_color,
                h_align: HAlign::Right,
                v_align: VAlign::Middle,
                bold: false,
                italic: false,
                rotation: TextRotation::Horizontal,
            });
        }
    }

    /// Break legend entries into rows that fit the canvas width.
    fn legend_rows(&self, legend_px: f64) -> Vec<Vec<(String, Color)>> {
        if self.legend.is_empty() {
            return Vec::new();
        }
        let swatch = legend_px;
        let max_width = self.width - PAD * 4.0;
        let mut rows: Vec<Vec<(String, Color)>> = vec![Vec::new()];
        let mut row_width = 0.0;
        for (name, color) in self.legend {
            let entry_width =
                swatch + 4.0 + estimate_text_width_px(name, legend_px) + PAD * 2.0;
            if row_width + entry_width > max_width && !rows[rows.len() - 1].is_empty() {
                rows.push(Vec::new());
                row_width = 0.0;
            }
            let last = rows.len() - 1;
            rows[last].push((name.clone(), *color));
            row_width += entry_width;
        }
        rows
    }

    fn emit_legend(
        &self,
        rows: &[Vec<(String, Color)>],
        legend_px: f64,
        ops: &mut Vec<DrawOp>,
    ) {
        if rows.is_empty() {
            return;
        }
        let swatch = legend_px;
        let row_h = line_height_px(legend_px);
        let total_h = rows.len() as f64 * row_h;
        let mut y = self.height - PAD - total_h;
        for row in rows {
            let row_width: f64 = row
                .iter()
                .map(|(name, _)| swatch + 4.0 + estimate_text_width_px(name, legend_px) + PAD * 2.0)
                .sum();
            let mut x = (self.width - row_width) / 2.0;
            for (name, color) in row {
                ops.push(DrawOp::Rect {
                    x0: x,
                    y0: y + (row_h - swatch) / 2.0,
                    x1: x + swatch,
                    y1: y + (row_h + swatch) / 2.0,
                    fill: Some(*color),
                    stroke: None,
                });
                ops.push(DrawOp::Text {
                    x: x + swatch + 4.0,
                    y: y + row_h / 2.0,
                    text: name.clone(),
                    size: legend_px,
                    color: self.theme.text_color,
                    h_align: HAlign::Left,
                    v_align: VAlign::Middle,
                    bold: false,
                    italic: false,
                    rotation: TextRotation::Horizontal,
                });
                x += swatch + 4.0 + estimate_text_width_px(name, legend_px) + PAD * 2.0;
            }
            y += row_h;
        }
    }
}

/// Format fractional days since the epoch with a chrono format string.
pub fn format_days(days: f64, format: &str) -> String {
    let secs = (days * 86_400.0).round() as i64;
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.naive_utc().format(format).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeRegistry;

    fn theme() -> Theme {
        ThemeRegistry::with_builtins().get("default").unwrap()
    }

    fn spec<'a>(theme: &'a Theme, x: AxisKind<'a>, y: AxisKind<'a>) -> FrameSpec<'a> {
        FrameSpec {
            theme,
            width: 1000.0,
            height: 600.0,
            scale: 150.0 / 72.0,
            title: Some("Title"),
            xlabel: None,
            ylabel: None,
            x,
            y,
            legend: &[],
            show_grid: true,
        }
    }

    #[test]
    fn frame_maps_domain_corners_to_plot_corners() {
        let theme = theme();
        let s = spec(
            &theme,
            AxisKind::Linear { min: 0.0, max: 10.0 },
            AxisKind::Linear { min: 0.0, max: 100.0 },
        );
        let (frame, _) = s.build();
        assert!((frame.x_px(0.0) - frame.left).abs() < 1e-9);
        assert!((frame.x_px(10.0) - frame.right).abs() < 1e-9);
        assert!((frame.y_px(0.0) - frame.bottom).abs() < 1e-9);
        assert!((frame.y_px(100.0) - frame.top).abs() < 1e-9);
        // y axis is inverted: larger values sit higher on the canvas
        assert!(frame.y_px(80.0) < frame.y_px(20.0));
    }

    #[test]
    fn categorical_axis_centers_slots_at_integers() {
        let theme = theme();
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let s = spec(
            &theme,
            AxisKind::Categorical(&labels),
            AxisKind::Linear { min: 0.0, max: 1.0 },
        );
        let (frame, _) = s.build();
        assert_eq!(frame.x_min, -0.5);
        assert_eq!(frame.x_max, 3.5);
        let x0 = frame.x_px(0.0);
        let x1 = frame.x_px(1.0);
        let x2 = frame.x_px(2.0);
        assert!((x1 - x0 - (x2 - x1)).abs() < 1e-9);
    }

    #[test]
    fn title_and_grid_are_emitted() {
        let theme = theme();
        let s = spec(
            &theme,
            AxisKind::Linear { min: 0.0, max: 10.0 },
            AxisKind::Linear { min: 0.0, max: 10.0 },
        );
        let (_, ops) = s.build();
        assert!(ops.iter().any(
            |op| matches!(op, DrawOp::Text { text, bold: true, .. } if text == "Title")
        ));
        let grid_lines = ops
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::Path { stroke: Some(st), .. }
                    if st.color.a < 1.0)
            })
            .count();
        assert!(grid_lines > 4, "expected grid lines, got {grid_lines}");
    }

    #[test]
    fn legend_reserves_bottom_space() {
        let theme = theme();
        let legend = vec![
            ("alpha".to_string(), theme.color(0)),
            ("beta".to_string(), theme.color(1)),
        ];
        let mut s = spec(
            &theme,
            AxisKind::Linear { min: 0.0, max: 1.0 },
            AxisKind::Linear { min: 0.0, max: 1.0 },
        );
        s.legend = &legend;
        let (with_legend, ops) = s.build();
        let plain = spec(
            &theme,
            AxisKind::Linear { min: 0.0, max: 1.0 },
            AxisKind::Linear { min: 0.0, max: 1.0 },
        );
        let (without_legend, _) = plain.build();
        assert!(with_legend.bottom < without_legend.bottom);
        assert!(ops.iter().any(
            |op| matches!(op, DrawOp::Text { text, .. } if text == "alpha")
        ));
    }

    #[test]
    fn degenerate_domain_is_padded() {
        let theme = theme();
        let s = spec(
            &theme,
            AxisKind::Linear { min: 5.0, max: 5.0 },
            AxisKind::Linear { min: 0.0, max: 1.0 },
        );
        let (frame, _) = s.build();
        assert!(frame.x_max > frame.x_min);
        let mid = frame.x_px(5.0);
        assert!(mid > frame.left && mid < frame.right);
    }

    #[test]
    fn date_formatting_round_trips() {
        // 2026-01-01 is 20454 days after the epoch
        assert_eq!(format_days(20454.0, "%Y-%m-%d"), "2026-01-01");
    }
}
