use charter::{ChartOptions, ChartType, Charter, OutputFormat, Settings};
use serde_json::json;
use tempfile::tempdir;

fn charter_in(dir: &std::path::Path) -> Charter {
    Charter::with_settings(Settings {
        output_dir: dir.to_path_buf(),
        include_timestamp: false,
        include_random_suffix: false,
        ..Settings::default()
    })
}

#[test]
fn bar_chart_lands_in_the_output_directory() {
    let dir = tempdir().unwrap();
    let charter = charter_in(dir.path());
    let data = json!({"labels": ["a", "b", "c"], "values": [1.0, 4.0, 2.0]});
    let opts = ChartOptions {
        output_format: Some(OutputFormat::Svg),
        dpi: Some(72),
        ..ChartOptions::default()
    };
    let path = charter.generate_chart(ChartType::Bar, &data, &opts).unwrap();
    assert_eq!(path, dir.path().join("bar.svg"));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn custom_filename_and_format_are_honored() {
    let dir = tempdir().unwrap();
    let charter = charter_in(dir.path());
    let data = json!({"labels": ["x", "y"], "values": [30.0, 70.0]});
    let opts = ChartOptions {
        style: Some("donut".into()),
        theme: Some("dark".into()),
        output_format: Some(OutputFormat::Pdf),
        filename: Some("share".into()),
        dpi: Some(72),
        ..ChartOptions::default()
    };
    let path = charter.generate_chart(ChartType::Pie, &data, &opts).unwrap();
    assert_eq!(path, dir.path().join("share.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn unique_suffixes_keep_repeated_charts_apart() {
    let dir = tempdir().unwrap();
    let charter = Charter::with_settings(Settings {
        output_dir: dir.path().to_path_buf(),
        include_timestamp: false,
        include_random_suffix: true,
        ..Settings::default()
    });
    let data = json!({"labels": ["a"], "values": [1.0]});
    let opts = ChartOptions {
        output_format: Some(OutputFormat::Svg),
        dpi: Some(72),
        ..ChartOptions::default()
    };
    let first = charter.generate_chart(ChartType::Bar, &data, &opts).unwrap();
    let second = charter.generate_chart(ChartType::Bar, &data, &opts).unwrap();
    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
}

#[test]
fn invalid_data_produces_no_file() {
    let dir = tempdir().unwrap();
    let charter = charter_in(dir.path());
    let data = json!({"labels": ["a", "b"], "values": [1.0]});
    let err = charter
        .generate_chart(ChartType::Bar, &data, &ChartOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("length"));
    // the output dir is only created once a chart succeeds
    let produced = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(produced, 0);
}

#[test]
fn registered_custom_theme_is_usable_immediately() {
    let dir = tempdir().unwrap();
    let charter = charter_in(dir.path());
    let mut theme = charter.themes.get("default").unwrap();
    theme.name = "corporate".into();
    charter.themes.register(theme);
    let data = json!({"labels": ["a", "b"], "values": [2.0, 3.0]});
    let opts = ChartOptions {
        theme: Some("corporate".into()),
        output_format: Some(OutputFormat::Svg),
        dpi: Some(72),
        ..ChartOptions::default()
    };
    assert!(charter.generate_chart(ChartType::Bar, &data, &opts).is_ok());
}
