//! Rendering: paint a [`DrawingPlan`] into bytes for one output format.
//!
//! SVG and the raster formats go through plotters (`SVGBackend` and
//! `BitMapBackend`); raster pixels are then encoded with the `image` crate.
//! PDF has no plotters backend and uses the small writer in [`pdf`].

mod pdf;

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Once;

use image::{ImageFormat, RgbImage};
use log::warn;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
// The plan's `Color` struct shadows the glob-imported plotters trait of the
// same name; re-import the trait anonymously so `.filled()`/`.stroke_width()`
// still resolve on `RGBAColor`.
use plotters::style::Color as _;
use plotters::style::{register_font, FontStyle, FontTransform, RGBAColor};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use crate::error::RenderError;
use crate::plan::{Color, DrawOp, DrawingPlan, HAlign, LinePattern, Stroke, TextRotation, VAlign};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Pdf,
    Jpeg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Png,
        OutputFormat::Svg,
        OutputFormat::Pdf,
        OutputFormat::Jpeg,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Render a plan into the bytes of the requested format.
pub fn render_to_bytes(plan: &DrawingPlan, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
    match format {
        OutputFormat::Svg => {
            ensure_fonts();
            let mut svg = String::new();
            {
                let root =
                    SVGBackend::with_string(&mut svg, (plan.width, plan.height)).into_drawing_area();
                paint(&root, plan)?;
                root.present()
                    .map_err(|e| RenderError::Backend(e.to_string()))?;
            }
            Ok(svg.into_bytes())
        }
        OutputFormat::Png | OutputFormat::Jpeg => {
            ensure_fonts();
            let mut buf = vec![0u8; plan.width as usize * plan.height as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut buf, (plan.width, plan.height))
                    .into_drawing_area();
                // The buffer starts out black; a transparent plan skips its
                // background op, so fill unconditionally on raster targets.
                root.fill(&to_rgba(plan.background))
                    .map_err(|e| RenderError::Backend(e.to_string()))?;
                paint(&root, plan)?;
                root.present()
                    .map_err(|e| RenderError::Backend(e.to_string()))?;
            }
            let img = RgbImage::from_raw(plan.width, plan.height, buf)
                .ok_or_else(|| RenderError::Backend("pixel buffer size mismatch".into()))?;
            let mut out = Cursor::new(Vec::new());
            let fmt = match format {
                OutputFormat::Png => ImageFormat::Png,
                _ => ImageFormat::Jpeg,
            };
            img.write_to(&mut out, fmt)?;
            Ok(out.into_inner())
        }
        OutputFormat::Pdf => pdf::render(plan),
    }
}

static FONT_INIT: Once = Once::new();

const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

/// Register a system sans-serif font with plotters once per process.
/// Without one, text ops fail on raster backends; those failures are logged
/// per op and the rest of the chart still renders.
fn ensure_fonts() {
    FONT_INIT.call_once(|| {
        for path in FONT_CANDIDATES {
            if let Ok(bytes) = std::fs::read(path) {
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                for style in [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic] {
                    if register_font("sans-serif", style, bytes).is_err() {
                        warn!("font file {path} could not be parsed");
                        return;
                    }
                }
                return;
            }
        }
        warn!("no usable sans-serif font found; text may be missing from raster output");
    });
}

fn to_rgba(c: Color) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

fn stroke_width(s: &Stroke) -> u32 {
    (s.width.round() as u32).max(1)
}

/// Approximate a wedge with a polygon; 2-degree steps keep arcs smooth at
/// chart sizes without ballooning the op count.
fn wedge_points(
    cx: f64,
    cy: f64,
    r_outer: f64,
    r_inner: f64,
    start_deg: f64,
    end_deg: f64,
) -> Vec<(i32, i32)> {
    let steps = ((end_deg - start_deg).abs() / 2.0).ceil().max(1.0) as usize;
    let at = |deg: f64, r: f64| -> (i32, i32) {
        let rad = deg.to_radians();
        (
            (cx + rad.cos() * r).round() as i32,
            (cy - rad.sin() * r).round() as i32,
        )
    };
    let mut pts = Vec::with_capacity(steps * 2 + 3);
    for i in 0..=steps {
        let deg = start_deg + (end_deg - start_deg) * i as f64 / steps as f64;
        pts.push(at(deg, r_outer));
    }
    if r_inner > 0.0 {
        for i in (0..=steps).rev() {
            let deg = start_deg + (end_deg - start_deg) * i as f64 / steps as f64;
            pts.push(at(deg, r_inner));
        }
    } else {
        pts.push((cx.round() as i32, cy.round() as i32));
    }
    pts
}

/// Expand a polyline into dash segments. Plotters path elements are solid,
/// so dash patterns are materialized here.
fn dash_segments(points: &[(f64, f64)], on: f64, off: f64) -> Vec<Vec<(i32, i32)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut pen_down = true;
    let mut remaining = on;
    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        if len <= f64::EPSILON {
            continue;
        }
        let (ux, uy) = ((x1 - x0) / len, (y1 - y0) / len);
        let mut pos = 0.0;
        if pen_down && current.is_empty() {
            current.push((x0, y0));
        }
        while pos + remaining < len {
            pos += remaining;
            let p = (x0 + ux * pos, y0 + uy * pos);
            if pen_down {
                current.push(p);
                segments.push(std::mem::take(&mut current));
            } else {
                current.push(p);
            }
            pen_down = !pen_down;
            remaining = if pen_down { on } else { off };
            if !pen_down {
                current.clear();
            }
        }
        remaining -= len - pos;
        if pen_down {
            current.push((x1, y1));
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
        .into_iter()
        .map(|seg| {
            seg.into_iter()
                .map(|(x, y)| (x.round() as i32, y.round() as i32))
                .collect()
        })
        .collect()
}

fn stroke_path<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    stroke: &Stroke,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = to_rgba(stroke.color).stroke_width(stroke_width(stroke));
    match stroke.pattern {
        LinePattern::Solid => {
            let pts: Vec<(i32, i32)> = points
                .iter()
                .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                .collect();
            root.draw(&PathElement::new(pts, style))
        }
        LinePattern::Dashed => {
            for seg in dash_segments(points, 8.0, 5.0) {
                root.draw(&PathElement::new(seg, style))?;
            }
            Ok(())
        }
        LinePattern::Dotted => {
            for seg in dash_segments(points, 1.5, 4.0) {
                root.draw(&PathElement::new(seg, style))?;
            }
            Ok(())
        }
    }
}

fn paint<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &DrawingPlan,
) -> Result<(), RenderError> {
    let err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Backend(e.to_string());
    for op in &plan.ops {
        match op {
            DrawOp::Rect {
                x0,
                y0,
                x1,
                y1,
                fill,
                stroke,
            } => {
                let corners = [
                    (x0.round() as i32, y0.round() as i32),
                    (x1.round() as i32, y1.round() as i32),
                ];
                if let Some(c) = fill {
                    root.draw(&Rectangle::new(
                        corners,
                        to_rgba(*c).filled(),
                    ))
                    .map_err(err)?;
                }
                if let Some(s) = stroke {
                    root.draw(&Rectangle::new(
                        corners,
                        to_rgba(s.color).stroke_width(stroke_width(s)),
                    ))
                    .map_err(err)?;
                }
            }
            DrawOp::Wedge {
                cx,
                cy,
                r_outer,
                r_inner,
                start_deg,
                end_deg,
                fill,
                stroke,
            } => {
                let pts = wedge_points(*cx, *cy, *r_outer, *r_inner, *start_deg, *end_deg);
                root.draw(&Polygon::new(
                    pts.clone(),
                    to_rgba(*fill).filled(),
                ))
                .map_err(err)?;
                if let Some(s) = stroke {
                    let mut outline = pts;
                    if let Some(&first) = outline.first() {
                        outline.push(first);
                    }
                    let fpts: Vec<(f64, f64)> = outline
                        .iter()
                        .map(|&(x, y)| (x as f64, y as f64))
                        .collect();
                    stroke_path(root, &fpts, s).map_err(err)?;
                }
            }
            DrawOp::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
            } => {
                let center = (cx.round() as i32, cy.round() as i32);
                let radius = r.round().max(1.0) as i32;
                if let Some(c) = fill {
                    root.draw(&Circle::new(
                        center,
                        radius,
                        to_rgba(*c).filled(),
                    ))
                    .map_err(err)?;
                }
                if let Some(s) = stroke {
                    match s.pattern {
                        LinePattern::Solid => {
                            root.draw(&Circle::new(
                                center,
                                radius,
                                to_rgba(s.color).stroke_width(stroke_width(s)),
                            ))
                            .map_err(err)?;
                        }
                        _ => {
                            // Dashed circles are approximated by a sampled ring.
                            let pts: Vec<(f64, f64)> = (0..=180)
                                .map(|i| {
                                    let a = i as f64 * 2.0f64.to_radians();
                                    (cx + a.cos() * r, cy + a.sin() * r)
                                })
                                .collect();
                            stroke_path(root, &pts, s).map_err(err)?;
                        }
                    }
                }
            }
            DrawOp::Path {
                points,
                fill,
                stroke,
            } => {
                if let Some(c) = fill {
                    let pts: Vec<(i32, i32)> = points
                        .iter()
                        .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                        .collect();
                    root.draw(&Polygon::new(pts, to_rgba(*c).filled()))
                        .map_err(err)?;
                }
                if let Some(s) = stroke {
                    stroke_path(root, points, s).map_err(err)?;
                }
            }
            DrawOp::Text {
                x,
                y,
                text,
                size,
                color,
                h_align,
                v_align,
                bold,
                italic,
                rotation,
            } => {
                let font_style = if *bold {
                    FontStyle::Bold
                } else if *italic {
                    FontStyle::Italic
                } else {
                    FontStyle::Normal
                };
                let pos = Pos::new(
                    match h_align {
                        HAlign::Left => HPos::Left,
                        HAlign::Center => HPos::Center,
                        HAlign::Right => HPos::Right,
                    },
                    match v_align {
                        VAlign::Top => VPos::Top,
                        VAlign::Middle => VPos::Center,
                        VAlign::Bottom => VPos::Bottom,
                    },
                );
                let rgba = to_rgba(*color);
                let mut style = TextStyle::from((plan.font_family.as_str(), *size, font_style))
                    .color(&rgba)
                    .pos(pos);
                if *rotation == TextRotation::Vertical {
                    style = style.transform(FontTransform::Rotate270);
                }
                let pos_px = (x.round() as i32, y.round() as i32);
                // A missing font must not sink the whole chart.
                if let Err(e) = root.draw(&Text::new(text.clone(), pos_px, style)) {
                    warn!("skipping text '{text}': {e}");
                }
            }
        }
    }
    Ok(())
}
