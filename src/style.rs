//! Chart styles: per-chart-type structural presets.
//!
//! A style decides the *shape* of a chart (grouped vs stacked bars, donut vs
//! full pie, stepped vs smooth lines) and never carries a concrete color;
//! anything visible derives from the active [`Theme`](crate::theme::Theme).

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::error::ChartError;
use crate::plan::LinePattern;

/// The five supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    Bar,
    Pie,
    Line,
    Timeseries,
    Rose,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Bar,
        ChartType::Pie,
        ChartType::Line,
        ChartType::Timeseries,
        ChartType::Rose,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Line => "line",
            ChartType::Timeseries => "timeseries",
            ChartType::Rose => "rose",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Bar chart structure. Outlines use the theme text color.
#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    pub name: String,
    pub orientation: Orientation,
    /// Side-by-side placement of multiple series.
    pub grouped: bool,
    /// Cumulative stacking of multiple series.
    pub stacked: bool,
    /// Bar width as a fraction of the category slot.
    pub bar_width: f64,
    pub outlined: bool,
    pub outline_width: f64,
    /// Numeric value labels at the bar extremity.
    pub show_values: bool,
    pub alpha: f64,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            name: "default".into(),
            orientation: Orientation::Vertical,
            grouped: false,
            stacked: false,
            bar_width: 0.8,
            outlined: false,
            outline_width: 0.5,
            show_values: false,
            alpha: 1.0,
        }
    }
}

fn bar_styles() -> Vec<BarStyle> {
    vec![
        BarStyle::default(),
        BarStyle {
            name: "grouped".into(),
            grouped: true,
            bar_width: 0.35,
            ..Default::default()
        },
        BarStyle {
            name: "stacked".into(),
            stacked: true,
            ..Default::default()
        },
        BarStyle {
            name: "horizontal".into(),
            orientation: Orientation::Horizontal,
            ..Default::default()
        },
        BarStyle {
            name: "outlined".into(),
            outlined: true,
            outline_width: 1.0,
            ..Default::default()
        },
        BarStyle {
            name: "labeled".into(),
            show_values: true,
            ..Default::default()
        },
    ]
}

/// Pie chart structure: donut geometry, slice separation, label placement.
/// Label boxes and leader lines take their colors from the theme.
#[derive(Debug, Clone, PartialEq)]
pub struct PieStyle {
    pub name: String,
    pub donut: bool,
    /// Inner radius as a fraction of the outer radius.
    pub donut_ratio: f64,
    pub explode: bool,
    /// Radial offset of exploded slices, as a fraction of the radius.
    pub explode_amount: f64,
    /// First slice edge, degrees in math convention (90 = 12 o'clock).
    pub start_angle: f64,
    pub counter_clockwise: bool,
    /// Category labels just outside the rim.
    pub show_labels: bool,
    /// Percentage labels inside the slices.
    pub show_percentages: bool,
    /// Rim label distance as a multiple of the radius.
    pub label_distance: f64,
    pub shadow: bool,
    /// Labels outside the pie connected by two-segment leader lines.
    pub outside_labels: bool,
    /// Append the percentage to outside labels.
    pub outside_label_percent: bool,
    /// Background box behind outside labels.
    pub label_box: bool,
    /// Title text in the donut hole.
    pub center_title: bool,
    pub center_title_box: bool,
    pub transparent_background: bool,
    /// Tabular legend panel beside the pie instead of slice labels.
    pub table_legend: bool,
    pub table_show_value: bool,
    pub table_show_percent: bool,
    pub table_header: bool,
}

impl Default for PieStyle {
    fn default() -> Self {
        Self {
            name: "default".into(),
            donut: false,
            donut_ratio: 0.5,
            explode: false,
            explode_amount: 0.05,
            start_angle: 90.0,
            counter_clockwise: false,
            show_labels: true,
            show_percentages: true,
            label_distance: 1.1,
            shadow: false,
            outside_labels: false,
            outside_label_percent: true,
            label_box: false,
            center_title: false,
            center_title_box: false,
            transparent_background: false,
            table_legend: false,
            table_show_value: true,
            table_show_percent: true,
            table_header: false,
        }
    }
}

fn pie_styles() -> Vec<PieStyle> {
    vec![
        PieStyle::default(),
        PieStyle {
            name: "donut".into(),
            donut: true,
            ..Default::default()
        },
        PieStyle {
            name: "exploded".into(),
            explode: true,
            ..Default::default()
        },
        PieStyle {
            name: "minimal".into(),
            show_percentages: false,
            ..Default::default()
        },
        PieStyle {
            name: "detailed".into(),
            show_labels: true,
            show_percentages: true,
            ..Default::default()
        },
        PieStyle {
            name: "shadow".into(),
            shadow: true,
            explode: true,
            explode_amount: 0.02,
            ..Default::default()
        },
        PieStyle {
            name: "infographic".into(),
            donut: true,
            donut_ratio: 0.65,
            outside_labels: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        },
        PieStyle {
            name: "annotated".into(),
            donut: true,
            donut_ratio: 0.6,
            center_title: true,
            outside_labels: true,
            label_box: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        },
        PieStyle {
            name: "transparent_donut".into(),
            donut: true,
            donut_ratio: 0.55,
            center_title: true,
            center_title_box: true,
            outside_labels: true,
            label_box: true,
            show_labels: false,
            show_percentages: false,
            transparent_background: true,
            ..Default::default()
        },
        PieStyle {
            name: "table_legend".into(),
            table_legend: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        },
        PieStyle {
            name: "table_legend_donut".into(),
            donut: true,
            table_legend: true,
            center_title: true,
            center_title_box: true,
            show_labels: false,
            show_percentages: false,
            ..Default::default()
        },
    ]
}

/// Line chart structure.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub name: String,
    /// Catmull-Rom interpolation through the data points.
    pub smooth: bool,
    /// Horizontal-then-vertical step segments.
    pub stepped: bool,
    pub fill_area: bool,
    pub fill_alpha: f64,
    pub show_points: bool,
    /// Marker radius in points.
    pub marker_size: f64,
    pub line_pattern: LinePattern,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            name: "default".into(),
            smooth: false,
            stepped: false,
            fill_area: false,
            fill_alpha: 0.3,
            show_points: false,
            marker_size: 3.0,
            line_pattern: LinePattern::Solid,
        }
    }
}

fn line_styles() -> Vec<LineStyle> {
    vec![
        LineStyle::default(),
        LineStyle {
            name: "smooth".into(),
            smooth: true,
            ..Default::default()
        },
        LineStyle {
            name: "stepped".into(),
            stepped: true,
            ..Default::default()
        },
        LineStyle {
            name: "area".into(),
            fill_area: true,
            ..Default::default()
        },
        LineStyle {
            name: "dotted".into(),
            line_pattern: LinePattern::Dotted,
            show_points: true,
            ..Default::default()
        },
        LineStyle {
            name: "dashed".into(),
            line_pattern: LinePattern::Dashed,
            ..Default::default()
        },
        LineStyle {
            name: "markers".into(),
            show_points: true,
            marker_size: 4.0,
            ..Default::default()
        },
    ]
}

/// Time series structure. The trend line uses a theme palette color.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesStyle {
    pub name: String,
    /// chrono format string for date tick labels.
    pub date_format: String,
    pub show_grid: bool,
    pub fill_area: bool,
    pub fill_alpha: f64,
    /// Least-squares trend line over each series.
    pub show_trend: bool,
    /// Shaded band between the `upper` and `lower` inputs.
    pub range_bands: bool,
    pub band_alpha: f64,
    pub show_points: bool,
    pub line_pattern: LinePattern,
    /// Largest-triangle-three-buckets reduction beyond the threshold.
    pub downsample: bool,
    /// Point-count threshold; `None` falls back to the settings default.
    pub downsample_threshold: Option<usize>,
}

impl Default for TimeSeriesStyle {
    fn default() -> Self {
        Self {
            name: "default".into(),
            date_format: "%Y-%m-%d".into(),
            show_grid: true,
            fill_area: false,
            fill_alpha: 0.2,
            show_trend: false,
            range_bands: false,
            band_alpha: 0.15,
            show_points: false,
            line_pattern: LinePattern::Solid,
            downsample: true,
            downsample_threshold: None,
        }
    }
}

fn timeseries_styles() -> Vec<TimeSeriesStyle> {
    vec![
        TimeSeriesStyle::default(),
        TimeSeriesStyle {
            name: "area".into(),
            fill_area: true,
            ..Default::default()
        },
        TimeSeriesStyle {
            name: "trend".into(),
            show_trend: true,
            ..Default::default()
        },
        TimeSeriesStyle {
            name: "range".into(),
            range_bands: true,
            ..Default::default()
        },
        TimeSeriesStyle {
            name: "minimal".into(),
            show_grid: false,
            ..Default::default()
        },
        TimeSeriesStyle {
            name: "large_dataset".into(),
            date_format: "%Y-%m-%d %H:%M".into(),
            downsample: true,
            ..Default::default()
        },
    ]
}

/// Petal sizing for rose (Nightingale) charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoseKind {
    /// Radius proportional to the value.
    #[default]
    Radius,
    /// Area proportional to the value (radius scales with the square root).
    Area,
}

/// Rose chart structure: equal-angle petals with value-scaled radii.
#[derive(Debug, Clone, PartialEq)]
pub struct RoseStyle {
    pub name: String,
    pub kind: RoseKind,
    pub start_angle: f64,
    pub counter_clockwise: bool,
    pub show_labels: bool,
    pub show_percentages: bool,
    /// Label distance as a multiple of the largest petal radius.
    pub label_distance: f64,
    pub alpha: f64,
}

impl Default for RoseStyle {
    fn default() -> Self {
        Self {
            name: "default".into(),
            kind: RoseKind::Radius,
            start_angle: 90.0,
            counter_clockwise: false,
            show_labels: true,
            show_percentages: false,
            label_distance: 1.15,
            alpha: 0.9,
        }
    }
}

fn rose_styles() -> Vec<RoseStyle> {
    vec![
        RoseStyle::default(),
        RoseStyle {
            name: "radius".into(),
            kind: RoseKind::Radius,
            ..Default::default()
        },
        RoseStyle {
            name: "area".into(),
            kind: RoseKind::Area,
            ..Default::default()
        },
        RoseStyle {
            name: "labeled".into(),
            show_percentages: true,
            ..Default::default()
        },
    ]
}

/// A style of any chart type.
#[derive(Debug, Clone, PartialEq)]
pub enum Style {
    Bar(BarStyle),
    Pie(PieStyle),
    Line(LineStyle),
    Timeseries(TimeSeriesStyle),
    Rose(RoseStyle),
}

impl Style {
    pub fn chart_type(&self) -> ChartType {
        match self {
            Style::Bar(_) => ChartType::Bar,
            Style::Pie(_) => ChartType::Pie,
            Style::Line(_) => ChartType::Line,
            Style::Timeseries(_) => ChartType::Timeseries,
            Style::Rose(_) => ChartType::Rose,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Style::Bar(s) => &s.name,
            Style::Pie(s) => &s.name,
            Style::Line(s) => &s.name,
            Style::Timeseries(s) => &s.name,
            Style::Rose(s) => &s.name,
        }
    }
}

/// Registry of styles per chart type, preserving registration order for
/// listing. Lookup is by lowercase name.
#[derive(Debug)]
pub struct StyleRegistry {
    inner: RwLock<HashMap<ChartType, StyleTable>>,
}

#[derive(Debug, Default)]
struct StyleTable {
    map: HashMap<String, Style>,
    order: Vec<String>,
}

impl StyleTable {
    fn insert(&mut self, style: Style) {
        let key = style.name().to_lowercase();
        if self.map.insert(key.clone(), style).is_none() {
            self.order.push(key);
        }
    }
}

impl StyleRegistry {
    pub fn with_builtins() -> Self {
        let mut tables: HashMap<ChartType, StyleTable> = HashMap::new();
        for ct in ChartType::ALL {
            tables.insert(ct, StyleTable::default());
        }
        if let Some(table) = tables.get_mut(&ChartType::Bar) {
            for s in bar_styles() {
                table.insert(Style::Bar(s));
            }
        }
        if let Some(table) = tables.get_mut(&ChartType::Pie) {
            for s in pie_styles() {
                table.insert(Style::Pie(s));
            }
        }
        if let Some(table) = tables.get_mut(&ChartType::Line) {
            for s in line_styles() {
                table.insert(Style::Line(s));
            }
        }
        if let Some(table) = tables.get_mut(&ChartType::Timeseries) {
            for s in timeseries_styles() {
                table.insert(Style::Timeseries(s));
            }
        }
        if let Some(table) = tables.get_mut(&ChartType::Rose) {
            for s in rose_styles() {
                table.insert(Style::Rose(s));
            }
        }
        Self {
            inner: RwLock::new(tables),
        }
    }

    /// Look up a style by chart type and name (case-insensitive).
    pub fn get(&self, chart_type: ChartType, name: &str) -> Result<Style, ChartError> {
        let tables = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let table = &tables[&chart_type];
        table
            .map
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ChartError::UnknownStyle {
                chart_type,
                name: name.to_string(),
                available: table.order.join(", "),
            })
    }

    /// Register a style under its chart type. Replaces an existing style
    /// with the same name, keeping its listing position.
    pub fn register(&self, style: Style) {
        let mut tables = self.inner.write().unwrap_or_else(|e| e.into_inner());
        tables.entry(style.chart_type()).or_default().insert(style);
    }

    /// Style names for one chart type, in registration order.
    pub fn names(&self, chart_type: ChartType) -> Vec<String> {
        let tables = self.inner.read().unwrap_or_else(|e| e.into_inner());
        tables[&chart_type].order.clone()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chart_type_has_a_default_style() {
        let reg = StyleRegistry::with_builtins();
        for ct in ChartType::ALL {
            let style = reg.get(ct, "default").unwrap();
            assert_eq!(style.chart_type(), ct);
            assert_eq!(style.name(), "default");
        }
    }

    #[test]
    fn builtin_inventories_are_complete() {
        let reg = StyleRegistry::with_builtins();
        let bars = reg.names(ChartType::Bar);
        for name in ["default", "grouped", "stacked", "horizontal", "outlined", "labeled"] {
            assert!(bars.iter().any(|n| n == name), "bar missing {name}");
        }
        let pies = reg.names(ChartType::Pie);
        for name in [
            "default",
            "donut",
            "exploded",
            "minimal",
            "detailed",
            "shadow",
            "infographic",
            "annotated",
            "transparent_donut",
            "table_legend",
            "table_legend_donut",
        ] {
            assert!(pies.iter().any(|n| n == name), "pie missing {name}");
        }
        let lines = reg.names(ChartType::Line);
        for name in ["default", "smooth", "stepped", "area", "dotted", "dashed", "markers"] {
            assert!(lines.iter().any(|n| n == name), "line missing {name}");
        }
        let ts = reg.names(ChartType::Timeseries);
        for name in ["default", "area", "trend", "range", "minimal", "large_dataset"] {
            assert!(ts.iter().any(|n| n == name), "timeseries missing {name}");
        }
        let roses = reg.names(ChartType::Rose);
        for name in ["default", "radius", "area", "labeled"] {
            assert!(roses.iter().any(|n| n == name), "rose missing {name}");
        }
    }

    #[test]
    fn unknown_style_error_names_alternatives() {
        let reg = StyleRegistry::with_builtins();
        let err = reg.get(ChartType::Line, "zigzag").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("zigzag"));
        assert!(msg.contains("line"));
        assert!(msg.contains("smooth"));
    }

    #[test]
    fn custom_styles_can_replace_builtins() {
        let reg = StyleRegistry::with_builtins();
        let before = reg.names(ChartType::Bar).len();
        reg.register(Style::Bar(BarStyle {
            name: "labeled".into(),
            show_values: true,
            bar_width: 0.5,
            ..Default::default()
        }));
        assert_eq!(reg.names(ChartType::Bar).len(), before);
        match reg.get(ChartType::Bar, "labeled").unwrap() {
            Style::Bar(s) => assert_eq!(s.bar_width, 0.5),
            other => panic!("unexpected style {other:?}"),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = StyleRegistry::with_builtins();
        assert!(reg.get(ChartType::Pie, "Donut").is_ok());
    }
}
