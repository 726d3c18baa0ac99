//! Top-level chart generation facade.
//!
//! [`Charter`] owns the theme and style registries plus runtime settings and
//! drives the full pipeline: validate the input, resolve style and theme,
//! lay out the drawing plan, render it, and write the file.

use std::path::PathBuf;

use log::info;
use serde_json::Value;

use crate::config::Settings;
use crate::data;
use crate::error::ChartError;
use crate::layout::{self, FigureOptions};
use crate::output;
use crate::plan::DrawingPlan;
use crate::render::{self, OutputFormat};
use crate::style::{ChartType, StyleRegistry};
use crate::theme::ThemeRegistry;

/// Per-chart options; any `None` falls back to settings or theme defaults.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    pub style: Option<String>,
    pub theme: Option<String>,
    pub output_format: Option<OutputFormat>,
    /// Output filename without extension; a sanitized version is used.
    pub filename: Option<String>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub dpi: Option<u32>,
    pub figsize: Option<(f64, f64)>,
}

/// Chart generator. Cheap to construct; registries start populated with the
/// built-in themes and styles and accept custom registrations at runtime.
pub struct Charter {
    pub themes: ThemeRegistry,
    pub styles: StyleRegistry,
    pub settings: Settings,
}

impl Charter {
    /// Generator with settings from the environment.
    pub fn new() -> Self {
        Self::with_settings(Settings::from_env())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            themes: ThemeRegistry::with_builtins(),
            styles: StyleRegistry::with_builtins(),
            settings,
        }
    }

    /// Validate `data`, lay out and render a chart, and write it under the
    /// configured output directory. Returns the path of the written file.
    pub fn generate_chart(
        &self,
        chart_type: ChartType,
        data: &Value,
        opts: &ChartOptions,
    ) -> Result<PathBuf, ChartError> {
        let style_name = opts.style.as_deref().unwrap_or(&self.settings.default_style);
        let theme_name = opts.theme.as_deref().unwrap_or(&self.settings.default_theme);
        let format = opts.output_format.unwrap_or(self.settings.default_format);

        let plan = self.layout(chart_type, data, style_name, theme_name, opts)?;
        let bytes =
            render::render_to_bytes(&plan, format).map_err(|source| ChartError::Render {
                chart_type,
                style: style_name.to_string(),
                theme: theme_name.to_string(),
                source,
            })?;

        let filename =
            output::build_filename(&self.settings, chart_type, opts.filename.as_deref(), format);
        let path = output::write_atomic(&self.settings.output_dir, &filename, &bytes).map_err(
            |source| ChartError::Render {
                chart_type,
                style: style_name.to_string(),
                theme: theme_name.to_string(),
                source,
            },
        )?;
        info!(
            "generated {} chart (style={}, theme={}) at {}",
            chart_type,
            style_name,
            theme_name,
            path.display()
        );
        Ok(path)
    }

    /// Validate and lay out without rendering. Useful for inspecting plans.
    pub fn layout(
        &self,
        chart_type: ChartType,
        data: &Value,
        style_name: &str,
        theme_name: &str,
        opts: &ChartOptions,
    ) -> Result<DrawingPlan, ChartError> {
        let chart_data = data::validate(chart_type, data)?;
        let style = self.styles.get(chart_type, style_name)?;
        let theme = self.themes.get(theme_name)?;
        let figure = FigureOptions {
            title: opts.title.clone(),
            xlabel: opts.xlabel.clone(),
            ylabel: opts.ylabel.clone(),
            figsize: opts.figsize.or(Some(self.settings.default_figsize)),
            dpi: opts.dpi.or(Some(self.settings.default_dpi)),
            downsample_threshold: self.settings.downsample_threshold,
        };
        layout::layout_chart(&chart_data, &style, &theme, &figure)
    }
}

impl Default for Charter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn charter() -> Charter {
        Charter::with_settings(Settings::default())
    }

    #[test]
    fn unknown_style_is_reported_with_alternatives() {
        let data = json!({"labels": ["a"], "values": [1.0]});
        let err = charter()
            .layout(ChartType::Bar, &data, "nope", "default", &ChartOptions::default())
            .unwrap_err();
        match err {
            ChartError::UnknownStyle { chart_type, name, available } => {
                assert_eq!(chart_type, ChartType::Bar);
                assert_eq!(name, "nope");
                assert!(available.contains("stacked"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_theme_is_reported() {
        let data = json!({"labels": ["a"], "values": [1.0]});
        let err = charter()
            .layout(ChartType::Bar, &data, "default", "nope", &ChartOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::UnknownTheme(_)));
    }

    #[test]
    fn invalid_data_is_rejected_before_style_resolution() {
        let data = json!({"labels": ["a"]});
        let err = charter()
            .layout(ChartType::Bar, &data, "default", "default", &ChartOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::Data(_)));
    }

    #[test]
    fn layout_honors_explicit_dpi_and_figsize() {
        let data = json!({"labels": ["a", "b"], "values": [1.0, 2.0]});
        let opts = ChartOptions {
            dpi: Some(72),
            figsize: Some((4.0, 3.0)),
            ..ChartOptions::default()
        };
        let plan = charter()
            .layout(ChartType::Bar, &data, "default", "default", &opts)
            .unwrap();
        assert_eq!((plan.width, plan.height, plan.dpi), (288, 216, 72));
    }

    #[test]
    fn settings_defaults_fill_in_when_options_are_empty() {
        let data = json!({"labels": ["a"], "values": [1.0]});
        let plan = charter()
            .layout(ChartType::Bar, &data, "default", "default", &ChartOptions::default())
            .unwrap();
        // 10x6 inches at 150 dpi
        assert_eq!((plan.width, plan.height), (1500, 900));
    }
}
