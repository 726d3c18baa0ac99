//! Runtime settings, loaded from `CHARTER_`-prefixed environment variables.
//!
//! Every field has a sensible default, so charts can be produced with zero
//! configuration. Unparseable values fall back to the default rather than
//! aborting, matching how other defaults (theme figsize, DPI) degrade.

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::render::OutputFormat;

/// Default point count above which time series are downsampled.
pub const DEFAULT_DOWNSAMPLE_THRESHOLD: usize = 5_000;

const ENV_PREFIX: &str = "CHARTER_";

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory chart files are written into; created on demand.
    pub output_dir: PathBuf,
    pub default_format: OutputFormat,
    pub default_theme: String,
    pub default_style: String,
    pub default_dpi: u32,
    /// Default figure size in inches (width, height).
    pub default_figsize: (f64, f64),
    /// Embed a `%Y%m%d_%H%M%S` timestamp in generated filenames.
    pub include_timestamp: bool,
    /// Append a 6-hex-digit random suffix to generated filenames.
    pub include_random_suffix: bool,
    pub downsample_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            default_format: OutputFormat::Png,
            default_theme: "default".into(),
            default_style: "default".into(),
            default_dpi: 150,
            default_figsize: (10.0, 6.0),
            include_timestamp: true,
            include_random_suffix: true,
            downsample_threshold: DEFAULT_DOWNSAMPLE_THRESHOLD,
        }
    }
}

impl Settings {
    /// Read settings from the environment, falling back to defaults for
    /// missing or malformed variables.
    pub fn from_env() -> Self {
        let mut s = Settings::default();
        if let Some(v) = env_var("OUTPUT_DIR") {
            s.output_dir = PathBuf::from(v);
        }
        if let Some(v) = env_var("DEFAULT_FORMAT") {
            match v.parse::<OutputFormat>() {
                Ok(fmt) => s.default_format = fmt,
                Err(_) => warn!("ignoring unrecognized {ENV_PREFIX}DEFAULT_FORMAT '{v}'"),
            }
        }
        if let Some(v) = env_var("DEFAULT_THEME") {
            s.default_theme = v;
        }
        if let Some(v) = env_var("DEFAULT_STYLE") {
            s.default_style = v;
        }
        if let Some(v) = env_var("DEFAULT_DPI") {
            match v.parse::<u32>() {
                Ok(dpi) if dpi > 0 => s.default_dpi = dpi,
                _ => warn!("ignoring unrecognized {ENV_PREFIX}DEFAULT_DPI '{v}'"),
            }
        }
        if let Some(v) = env_var("DEFAULT_FIGSIZE") {
            match parse_figsize(&v) {
                Some(figsize) => s.default_figsize = figsize,
                None => warn!("ignoring unrecognized {ENV_PREFIX}DEFAULT_FIGSIZE '{v}'"),
            }
        }
        if let Some(v) = env_var("INCLUDE_TIMESTAMP") {
            if let Some(b) = parse_bool(&v) {
                s.include_timestamp = b;
            }
        }
        if let Some(v) = env_var("INCLUDE_RANDOM_SUFFIX") {
            if let Some(b) = parse_bool(&v) {
                s.include_random_suffix = b;
            }
        }
        if let Some(v) = env_var("DOWNSAMPLE_THRESHOLD") {
            match v.parse::<usize>() {
                Ok(n) if n >= 2 => s.downsample_threshold = n,
                _ => warn!("ignoring unrecognized {ENV_PREFIX}DOWNSAMPLE_THRESHOLD '{v}'"),
            }
        }
        s
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Comma-separated `width,height` in inches.
fn parse_figsize(s: &str) -> Option<(f64, f64)> {
    let (w, h) = s.split_once(',')?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0).then_some((w, h))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
