//! Error types for chart generation.

use std::io;

use thiserror::Error;

use crate::style::ChartType;

/// Top-level error returned by the public API and the CLI.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("unknown style '{name}' for {chart_type} charts (available: {available})")]
    UnknownStyle {
        chart_type: ChartType,
        name: String,
        available: String,
    },

    #[error(transparent)]
    Data(#[from] ChartDataError),

    #[error("rendering {chart_type} chart (style '{style}', theme '{theme}') failed")]
    Render {
        chart_type: ChartType,
        style: String,
        theme: String,
        #[source]
        source: RenderError,
    },
}

/// Validation failure, pointing at the offending input field.
#[derive(Debug, Error)]
#[error("invalid chart data at '{field}': {reason}")]
pub struct ChartDataError {
    pub field: String,
    pub reason: String,
}

impl ChartDataError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while painting or encoding an already laid-out figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("image encoding failed")]
    Encode(#[from] image::ImageError),

    #[error("writing output file failed")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_names_the_field() {
        let err = ChartDataError::new("values[2]", "must be numeric");
        assert_eq!(
            err.to_string(),
            "invalid chart data at 'values[2]': must be numeric"
        );
    }

    #[test]
    fn unknown_style_lists_alternatives() {
        let err = ChartError::UnknownStyle {
            chart_type: ChartType::Pie,
            name: "swirl".into(),
            available: "default, donut".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'swirl'"));
        assert!(msg.contains("pie"));
        assert!(msg.contains("default, donut"));
    }
}
