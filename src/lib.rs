//! charter
//!
//! A chart generation library: turn JSON data into bar, pie, line, time
//! series, and rose charts as PNG, SVG, PDF, or JPEG files. Appearance is
//! split into *themes* (colors, fonts, canvas defaults) and per-chart-type
//! *styles* (shape variants like stacked bars or donut pies), both held in
//! runtime registries that accept custom entries.
//!
//! ### Example
//! ```no_run
//! use charter::{Charter, ChartOptions, ChartType};
//! use serde_json::json;
//!
//! let charter = Charter::new();
//! let data = json!({
//!     "labels": ["Q1", "Q2", "Q3", "Q4"],
//!     "values": [120.0, 95.0, 140.0, 160.0],
//! });
//! let opts = ChartOptions {
//!     theme: Some("dark".into()),
//!     title: Some("Revenue".into()),
//!     ..ChartOptions::default()
//! };
//! let path = charter.generate_chart(ChartType::Bar, &data, &opts)?;
//! println!("wrote {}", path.display());
//! # Ok::<(), charter::ChartError>(())
//! ```

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod layout;
pub mod output;
pub mod plan;
pub mod render;
pub mod style;
pub mod theme;

pub use api::{ChartOptions, Charter};
pub use config::Settings;
pub use data::ChartData;
pub use error::{ChartDataError, ChartError, RenderError};
pub use plan::{Color, DrawOp, DrawingPlan};
pub use render::OutputFormat;
pub use style::{ChartType, Style, StyleRegistry};
pub use theme::{Theme, ThemeRegistry};
