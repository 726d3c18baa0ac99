use anyhow::{Context, Result};
use charter::{ChartOptions, ChartType, Charter, OutputFormat};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(
    name = "charter",
    version,
    about = "Render themed, styled chart images from JSON data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bar chart (vertical, horizontal, grouped, stacked, ...).
    Bar(ChartArgs),
    /// Pie or donut chart.
    Pie(ChartArgs),
    /// Line chart over numeric or categorical x values.
    Line(ChartArgs),
    /// Time series chart over dates or timestamps.
    Timeseries(ChartArgs),
    /// Rose (polar area) chart.
    Rose(ChartArgs),
    /// List available themes, styles, and output formats.
    List,
    /// Render one dataset across many style/theme combinations.
    Gallery(GalleryArgs),
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Chart data as inline JSON, or @path to read a JSON file.
    #[arg(short, long)]
    data: String,
    /// Style name for this chart type (see `charter list`).
    #[arg(short, long)]
    style: Option<String>,
    /// Theme name (see `charter list`).
    #[arg(short, long)]
    theme: Option<String>,
    /// Output format: png, svg, pdf, or jpeg.
    #[arg(short, long)]
    format: Option<String>,
    /// Output filename (without extension).
    #[arg(short, long)]
    output: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    xlabel: Option<String>,
    #[arg(long)]
    ylabel: Option<String>,
    /// Raster resolution in dots per inch.
    #[arg(long)]
    dpi: Option<u32>,
}

#[derive(Args, Debug)]
struct GalleryArgs {
    /// Chart type to render; omit for all five.
    #[arg(long)]
    chart: Option<String>,
    /// Output format for the gallery images.
    #[arg(short, long, default_value = "png")]
    format: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let charter = Charter::new();
    match cli.cmd {
        Command::Bar(args) => generate(&charter, ChartType::Bar, args),
        Command::Pie(args) => generate(&charter, ChartType::Pie, args),
        Command::Line(args) => generate(&charter, ChartType::Line, args),
        Command::Timeseries(args) => generate(&charter, ChartType::Timeseries, args),
        Command::Rose(args) => generate(&charter, ChartType::Rose, args),
        Command::List => list(&charter),
        Command::Gallery(args) => gallery(&charter, args),
    }
}

/// `@file.json` reads from disk, anything else is parsed inline.
fn load_data(arg: &str) -> Result<Value> {
    let text = if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("reading data file {path}"))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).context("parsing chart data as JSON")
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    s.parse::<OutputFormat>().map_err(anyhow::Error::msg)
}

fn generate(charter: &Charter, chart_type: ChartType, args: ChartArgs) -> Result<()> {
    let data = load_data(&args.data)?;
    let output_format = args.format.as_deref().map(parse_format).transpose()?;
    let opts = ChartOptions {
        style: args.style,
        theme: args.theme,
        output_format,
        filename: args.output,
        title: args.title,
        xlabel: args.xlabel,
        ylabel: args.ylabel,
        dpi: args.dpi,
        figsize: None,
    };
    let path = charter.generate_chart(chart_type, &data, &opts)?;
    println!("{}", path.display());
    Ok(())
}

fn list(charter: &Charter) -> Result<()> {
    println!("Themes:");
    for name in charter.themes.names() {
        println!("  {name}");
    }
    for chart_type in ChartType::ALL {
        println!("\n{chart_type} styles:");
        for name in charter.styles.names(chart_type) {
            println!("  {name}");
        }
    }
    println!("\nFormats:");
    for format in OutputFormat::ALL {
        println!("  {format}");
    }
    Ok(())
}

fn sample_data(chart_type: ChartType) -> Value {
    match chart_type {
        ChartType::Bar => serde_json::json!({
            "labels": ["Q1", "Q2", "Q3", "Q4"],
            "series": {
                "North": [120.0, 95.0, 140.0, 160.0],
                "South": [80.0, 105.0, 90.0, 120.0],
            },
        }),
        ChartType::Pie => serde_json::json!({
            "labels": ["Product", "Services", "Licensing", "Other"],
            "values": [45.0, 30.0, 15.0, 10.0],
        }),
        ChartType::Line => serde_json::json!({
            "x": [0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            "series": {
                "Observed": [3.0, 5.0, 4.0, 7.0, 6.0, 9.0],
                "Forecast": [2.5, 4.0, 5.0, 6.0, 7.0, 8.0],
            },
        }),
        ChartType::Timeseries => serde_json::json!({
            "dates": ["2025-01-01", "2025-02-01", "2025-03-01", "2025-04-01", "2025-05-01"],
            "values": [10.0, 14.0, 12.0, 18.0, 16.0],
        }),
        ChartType::Rose => serde_json::json!({
            "labels": ["N", "NE", "E", "SE", "S", "SW", "W", "NW"],
            "values": [12.0, 7.0, 9.0, 4.0, 8.0, 11.0, 6.0, 10.0],
        }),
    }
}

fn gallery(charter: &Charter, args: GalleryArgs) -> Result<()> {
    let format = parse_format(&args.format)?;
    // Gallery renders land in their own subdirectory, away from normal output.
    let mut settings = charter.settings.clone();
    settings.output_dir = settings.output_dir.join("gallery");
    let charter = Charter::with_settings(settings);
    let types: Vec<ChartType> = match args.chart.as_deref() {
        Some(name) => {
            let lower = name.to_lowercase();
            let found = ChartType::ALL
                .into_iter()
                .find(|t| t.as_str() == lower)
                .with_context(|| format!("unknown chart type '{name}'"))?;
            vec![found]
        }
        None => ChartType::ALL.to_vec(),
    };
    let themes = ["default", "dark", "plotly_dark"];
    let mut count = 0usize;
    for chart_type in types {
        let data = sample_data(chart_type);
        for style in charter.styles.names(chart_type) {
            for theme in themes {
                let opts = ChartOptions {
                    style: Some(style.clone()),
                    theme: Some(theme.to_string()),
                    output_format: Some(format),
                    filename: Some(format!("gallery_{chart_type}_{style}_{theme}")),
                    title: Some(format!("{chart_type} / {style} / {theme}")),
                    ..ChartOptions::default()
                };
                let path = charter.generate_chart(chart_type, &data, &opts)?;
                println!("{}", path.display());
                count += 1;
            }
        }
    }
    println!("{count} charts written to {}", charter.settings.output_dir.display());
    Ok(())
}
