//! Text measurement and truncation utilities.
//!
//! Layout runs before any backend exists, so widths are estimated with a
//! character-count heuristic rather than measured glyph metrics.

/// Heuristic: estimate pixel width of text at a given font pixel size.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.60
}

/// Estimated line height for a font pixel size.
pub fn line_height_px(font_px: f64) -> f64 {
    font_px * 1.25
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: f64, max_px: f64) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if estimate_text_width_px(&next, font_px) > max_px {
            if !out.is_empty() {
                if estimate_text_width_px(&format!("{out}…"), font_px) <= max_px {
                    out.push('…');
                } else if out.chars().count() > 1 {
                    out.pop();
                    out.push('…');
                }
            }
            return out;
        }
        out = next;
    }
    out
}
