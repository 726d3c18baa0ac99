//! Output file naming and writing.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::Settings;
use crate::error::RenderError;
use crate::render::OutputFormat;
use crate::style::ChartType;

/// Build the output filename for a chart.
///
/// The base is the custom name when given, otherwise the chart type. A
/// timestamp and a short random suffix are appended per settings so repeated
/// runs never clobber each other.
pub fn build_filename(
    settings: &Settings,
    chart_type: ChartType,
    custom: Option<&str>,
    format: OutputFormat,
) -> String {
    let base = custom
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| chart_type.as_str().to_string());
    let mut name = base;
    if settings.include_timestamp {
        name.push_str(&Local::now().format("_%Y%m%d_%H%M%S").to_string());
    }
    if settings.include_random_suffix {
        name.push('_');
        name.push_str(&random_suffix());
    }
    name.push('.');
    name.push_str(format.extension());
    name
}

/// Strip path separators and other filesystem-hostile characters.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect::<String>()
        .trim_matches([' ', '.'])
        .to_string()
}

/// Six hex characters from the std random hasher; enough to disambiguate
/// charts generated within the same second.
fn random_suffix() -> String {
    let hash = RandomState::new().build_hasher().finish();
    format!("{:06x}", hash & 0xFF_FFFF)
}

/// Write bytes to `dir/filename` through a temp file in the same directory,
/// so readers never observe a half-written chart. Creates `dir` on demand.
pub fn write_atomic(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    let target = dir.join(filename);
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}
