//! Backend-agnostic drawing plan.
//!
//! A [`DrawingPlan`] is the sole output of the layout engines: an ordered list
//! of primitive instructions (rect / wedge / path / text) with resolved
//! colors and absolute pixel geometry. The rendering adapter consumes it once
//! and paints it; nothing downstream knows which chart type produced it.

/// RGB color with an alpha channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RGB` (case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            3 => {
                let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
                let (r, g, b) = (d(0)?, d(1)?, d(2)?);
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Alpha-composite `self` over an opaque backdrop.
    /// Used by backends without native transparency (PDF).
    pub fn over(self, backdrop: Color) -> Color {
        let blend = |fg: u8, bg: u8| -> u8 {
            (fg as f64 * self.a + bg as f64 * (1.0 - self.a)).round() as u8
        };
        Color::rgb(
            blend(self.r, backdrop.r),
            blend(self.g, backdrop.g),
            blend(self.b, backdrop.b),
        )
    }
}

/// Stroke pattern for paths and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Stroke description: color, width in pixels, dash pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub pattern: LinePattern,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            pattern: LinePattern::Solid,
        }
    }
}

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Text orientation. Plotters only supports quarter-turn transforms, so the
/// plan does not carry arbitrary angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRotation {
    #[default]
    Horizontal,
    /// Rotated 90 degrees counter-clockwise (vertical axis titles).
    Vertical,
}

/// A single primitive draw instruction. Coordinates are absolute canvas
/// pixels with the origin at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Annular sector. `start_deg`/`end_deg` use math convention (0 = east,
    /// counter-clockwise positive); a clockwise slice has `end_deg < start_deg`.
    /// `r_inner == 0` yields a full wedge, `r_inner > 0` a donut segment.
    Wedge {
        cx: f64,
        cy: f64,
        r_outer: f64,
        r_inner: f64,
        start_deg: f64,
        end_deg: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Polyline; closed + filled when `fill` is set (area fills, bands).
    Path {
        points: Vec<(f64, f64)>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        /// Font size in pixels (already DPI-scaled by the layout engine).
        size: f64,
        color: Color,
        h_align: HAlign,
        v_align: VAlign,
        bold: bool,
        italic: bool,
        rotation: TextRotation,
    },
}

/// Fully resolved, backend-agnostic figure: canvas size, figure-level
/// settings, and the ordered draw instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingPlan {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    pub background: Color,
    /// Vector backends skip the background fill entirely when set.
    pub transparent: bool,
    pub font_family: String,
    pub ops: Vec<DrawOp>,
}

impl DrawingPlan {
    pub fn new(width: u32, height: u32, dpi: u32, background: Color, font_family: &str) -> Self {
        Self {
            width,
            height,
            dpi,
            background,
            transparent: false,
            font_family: font_family.to_string(),
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_round_trips() {
        assert_eq!(Color::from_hex("#4C72B0"), Some(Color::rgb(76, 114, 176)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("4C72B0"), None);
        assert_eq!(Color::from_hex("#GGHHII"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn alpha_compositing_blends_toward_backdrop() {
        let red = Color::rgba(255, 0, 0, 0.5);
        let over_white = red.over(Color::rgb(255, 255, 255));
        assert_eq!(over_white, Color::rgb(255, 128, 128));
        let opaque = Color::rgb(1, 2, 3).over(Color::rgb(200, 200, 200));
        assert_eq!(opaque, Color::rgb(1, 2, 3));
    }
}
