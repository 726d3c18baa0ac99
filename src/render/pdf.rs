//! Minimal PDF 1.4 writer.
//!
//! One page, one content stream, the three Helvetica variants as built-in
//! fonts. Coordinates are converted from canvas pixels (top-left origin) to
//! PDF points (bottom-left origin). PDF has no per-op alpha in this subset,
//! so translucent colors are composited against the plan background first.

use std::fmt::Write as _;

use crate::error::RenderError;
use crate::plan::{
    Color, DrawOp, DrawingPlan, HAlign, LinePattern, Stroke, TextRotation, VAlign,
};

pub fn render(plan: &DrawingPlan) -> Result<Vec<u8>, RenderError> {
    let scale = 72.0 / plan.dpi as f64;
    let w_pt = plan.width as f64 * scale;
    let h_pt = plan.height as f64 * scale;
    let content = content_stream(plan, scale, h_pt);

    let mut body = Vec::new();
    let mut offsets = Vec::new();
    let mut push = |body: &mut Vec<u8>, offsets: &mut Vec<usize>, obj: String| {
        offsets.push(body.len());
        body.extend_from_slice(obj.as_bytes());
    };

    push(
        &mut body,
        &mut offsets,
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
    );
    push(
        &mut body,
        &mut offsets,
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
    );
    push(
        &mut body,
        &mut offsets,
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w_pt:.2} {h_pt:.2}] \
             /Resources << /Font << /F1 5 0 R /F2 6 0 R /F3 7 0 R >> >> \
             /Contents 4 0 R >>\nendobj\n"
        ),
    );
    push(
        &mut body,
        &mut offsets,
        format!(
            "4 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
            content.len(),
            content
        ),
    );
    for (idx, name) in [
        (5, "Helvetica"),
        (6, "Helvetica-Bold"),
        (7, "Helvetica-Oblique"),
    ] {
        push(
            &mut body,
            &mut offsets,
            format!(
                "{idx} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{name} >>\nendobj\n"
            ),
        );
    }

    let header = b"%PDF-1.4\n";
    let mut out = Vec::with_capacity(header.len() + body.len() + 512);
    out.extend_from_slice(header);
    out.extend_from_slice(&body);

    let xref_start = out.len();
    let mut xref = String::from("xref\n0 8\n0000000000 65535 f \n");
    for off in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", header.len() + off);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size 8 /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n"
    );
    out.extend_from_slice(xref.as_bytes());
    Ok(out)
}

/// Flatten alpha against the plan background; PDF ops here are opaque.
fn flatten(plan: &DrawingPlan, c: Color) -> Color {
    if c.a >= 1.0 {
        c
    } else {
        c.over(plan.background)
    }
}

fn color_triplet(c: Color) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        c.r as f64 / 255.0,
        c.g as f64 / 255.0,
        c.b as f64 / 255.0
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 256 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn dash_setting(pattern: LinePattern, width: f64) -> String {
    let unit = width.max(1.0);
    match pattern {
        LinePattern::Solid => "[] 0 d\n".to_string(),
        LinePattern::Dashed => format!("[{:.2} {:.2}] 0 d\n", unit * 5.0, unit * 3.0),
        LinePattern::Dotted => format!("[{:.2} {:.2}] 0 d\n", unit, unit * 2.5),
    }
}

fn stroke_setup(plan: &DrawingPlan, s: &Stroke, scale: f64, out: &mut String) {
    let _ = write!(out, "{} RG\n", color_triplet(flatten(plan, s.color)));
    let _ = write!(out, "{:.2} w\n", (s.width * scale).max(0.25));
    out.push_str(&dash_setting(s.pattern, s.width * scale));
}

fn content_stream(plan: &DrawingPlan, scale: f64, h_pt: f64) -> String {
    let px = |x: f64| x * scale;
    let py = |y: f64| h_pt - y * scale;
    let mut s = String::new();

    if !plan.transparent {
        let _ = write!(
            s,
            "{} rg\n0 0 {:.2} {:.2} re f\n",
            color_triplet(plan.background),
            plan.width as f64 * scale,
            h_pt
        );
    }

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
                let (rx, ry) = (px(x0.min(*x1)), py(y0.max(*y1)));
                let (rw, rh) = (px((x1 - x0).abs()), (y1 - y0).abs() * scale);
                if let Some(c) = fill {
                    let _ = write!(
                        s,
                        "{} rg\n{rx:.2} {ry:.2} {rw:.2} {rh:.2} re f\n",
                        color_triplet(flatten(plan, *c))
                    );
                }
                if let Some(st) = stroke {
                    stroke_setup(plan, st, scale, &mut s);
                    let _ = write!(s, "{rx:.2} {ry:.2} {rw:.2} {rh:.2} re S\n");
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
                let pts = wedge_outline(*cx, *cy, *r_outer, *r_inner, *start_deg, *end_deg);
                emit_polygon(plan, &pts, Some(*fill), stroke.as_ref(), scale, px, py, &mut s);
            }
            DrawOp::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
            } => {
                // Four Bezier arcs approximate a circle to well under a pixel.
                let k = 0.5523 * r;
                let (x, y) = (px(*cx), py(*cy));
                let rp = r * scale;
                let kp = k * scale;
                let path = format!(
                    "{:.2} {:.2} m\n\
                     {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n\
                     {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n\
                     {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n\
                     {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                    x + rp,
                    y,
                    x + rp,
                    y + kp,
                    x + kp,
                    y + rp,
                    x,
                    y + rp,
                    x - kp,
                    y + rp,
                    x - rp,
                    y + kp,
                    x - rp,
                    y,
                    x - rp,
                    y - kp,
                    x - kp,
                    y - rp,
                    x,
                    y - rp,
                    x + kp,
                    y - rp,
                    x + rp,
                    y - kp,
                    x + rp,
                    y
                );
                if let Some(c) = fill {
                    let _ = write!(s, "{} rg\n{path}f\n", color_triplet(flatten(plan, *c)));
                }
                if let Some(st) = stroke {
                    stroke_setup(plan, st, scale, &mut s);
                    let _ = write!(s, "{path}S\n");
                }
            }
            DrawOp::Path {
                points,
                fill,
                stroke,
            } => {
                emit_polyline(plan, points, *fill, stroke.as_ref(), scale, px, py, &mut s);
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
                let size_pt = size * scale;
                let font = if *bold {
                    "/F2"
                } else if *italic {
                    "/F3"
                } else {
                    "/F1"
                };
                let est_width = text.chars().count() as f64 * size_pt * 0.6;
                let dx = match h_align {
                    HAlign::Left => 0.0,
                    HAlign::Center => -est_width / 2.0,
                    HAlign::Right => -est_width,
                };
                let dy = match v_align {
                    VAlign::Top => -size_pt * 0.75,
                    VAlign::Middle => -size_pt * 0.3,
                    VAlign::Bottom => 0.0,
                };
                let _ = write!(
                    s,
                    "BT\n{} rg\n{font} {size_pt:.2} Tf\n",
                    color_triplet(flatten(plan, *color))
                );
                match rotation {
                    TextRotation::Horizontal => {
                        let _ = write!(s, "{:.2} {:.2} Td\n", px(*x) + dx, py(*y) + dy);
                    }
                    TextRotation::Vertical => {
                        // 90-degree CCW text matrix; the along-text offset now
                        // runs upward and the baseline offset to the right.
                        let _ = write!(
                            s,
                            "0 1 -1 0 {:.2} {:.2} Tm\n",
                            px(*x) - dy,
                            py(*y) + dx
                        );
                    }
                }
                let _ = write!(s, "({}) Tj\nET\n", escape_text(text));
            }
        }
    }
    s
}

fn wedge_outline(
    cx: f64,
    cy: f64,
    r_outer: f64,
    r_inner: f64,
    start_deg: f64,
    end_deg: f64,
) -> Vec<(f64, f64)> {
    let steps = ((end_deg - start_deg).abs() / 2.0).ceil().max(1.0) as usize;
    let at = |deg: f64, r: f64| {
        let rad = deg.to_radians();
        (cx + rad.cos() * r, cy - rad.sin() * r)
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
        pts.push((cx, cy));
    }
    pts
}

#[allow(clippy::too_many_arguments)]
fn emit_polygon(
    plan: &DrawingPlan,
    points: &[(f64, f64)],
    fill: Option<Color>,
    stroke: Option<&Stroke>,
    scale: f64,
    px: impl Fn(f64) -> f64,
    py: impl Fn(f64) -> f64,
    s: &mut String,
) {
    if points.len() < 2 {
        return;
    }
    let mut path = String::new();
    let _ = write!(path, "{:.2} {:.2} m\n", px(points[0].0), py(points[0].1));
    for &(x, y) in &points[1..] {
        let _ = write!(path, "{:.2} {:.2} l\n", px(x), py(y));
    }
    path.push_str("h\n");
    if let Some(c) = fill {
        let _ = write!(s, "{} rg\n{path}f\n", color_triplet(flatten(plan, c)));
    }
    if let Some(st) = stroke {
        stroke_setup(plan, st, scale, s);
        let _ = write!(s, "{path}S\n");
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_polyline(
    plan: &DrawingPlan,
    points: &[(f64, f64)],
    fill: Option<Color>,
    stroke: Option<&Stroke>,
    scale: f64,
    px: impl Fn(f64) -> f64,
    py: impl Fn(f64) -> f64,
    s: &mut String,
) {
    if points.len() < 2 {
        return;
    }
    let mut path = String::new();
    let _ = write!(path, "{:.2} {:.2} m\n", px(points[0].0), py(points[0].1));
    for &(x, y) in &points[1..] {
        let _ = write!(path, "{:.2} {:.2} l\n", px(x), py(y));
    }
    if let Some(c) = fill {
        let _ = write!(s, "{} rg\n{path}h f\n", color_triplet(flatten(plan, c)));
    }
    if let Some(st) = stroke {
        stroke_setup(plan, st, scale, s);
        let _ = write!(s, "{path}S\n");
    }
}
