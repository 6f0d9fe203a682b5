//! # Songchart Command Line
//!
//! Thin shell around the library: reads chart data from a JSON file, builds
//! the chart from `songchart.toml` settings and writes a PNG.
//!
//! ```text
//! songchart bar --input today.json --title "Calls and songs by species" --output bar.png
//! songchart line --input robin-daily.json --title "Robin" --output robin.png
//! songchart heatmap --raw --input detections.json --location 51.5,-0.1 --output heat.png
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use songchart::{
    bar_chart::BarChart,
    canvas::Chart,
    config::Config,
    heatmap::{bucket_timestamps, HeatmapChart},
    line_chart::LineChart,
    BucketObservation, CategoryCount, DailyPoint, GeoPoint,
};

#[derive(Parser, Debug)]
#[command(name = "songchart", version, about = "Render bird-song detection charts as PNG")]
struct Cli {
    /// Configuration file; defaults apply when it is missing
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ranked bar chart from `[{"label": .., "count": ..}]`
    Bar(BarArgs),
    /// Multi-year line chart from `[{"date": "YYYY-MM-DD", "count": n | null}]`
    Line(CommonArgs),
    /// Day × time-of-day heatmap from `[{"timestamp": RFC 3339, "count": n}]`
    Heatmap(HeatmapArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input JSON file
    #[arg(long, short)]
    input: PathBuf,

    /// Output PNG path
    #[arg(long, short)]
    output: PathBuf,

    /// Chart title
    #[arg(long, short, default_value = "")]
    title: String,
}

#[derive(Args, Debug)]
struct BarArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Note printed in the bottom margin
    #[arg(long)]
    footnote: Option<String>,
}

#[derive(Args, Debug)]
struct HeatmapArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Input is a plain list of detection timestamps to bucket first
    #[arg(long)]
    raw: bool,

    /// Draw sunrise/sunset for `LAT,LON`
    #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
    location: Option<GeoPoint>,

    /// Colour-scale exponent in (0, 1]
    #[arg(long)]
    scaling_root: Option<f64>,

    /// Fixed colour-scale ceiling instead of the busiest bucket
    #[arg(long)]
    fixed_max: Option<f64>,
}

fn parse_location(text: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {text:?}"))?;
    let latitude: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let longitude: f64 = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("{latitude},{longitude} is not on Earth"));
    }
    Ok(GeoPoint {
        latitude,
        longitude,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // an explicit path must exist and parse
    let config = match &cli.config {
        Some(path) => Config::read_from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => Config::load(),
    };

    match cli.command {
        Command::Bar(args) => cmd_bar(&config, args),
        Command::Line(args) => cmd_line(&config, args),
        Command::Heatmap(args) => cmd_heatmap(&config, args),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read input '{}'", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse input '{}'", path.display()))
}

fn write_chart(chart: &impl Chart, output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    chart
        .write_png(output)
        .with_context(|| format!("write png '{}'", output.display()))?;
    tracing::info!(path = %output.display(), "wrote chart");
    Ok(())
}

fn cmd_bar(config: &Config, args: BarArgs) -> anyhow::Result<()> {
    let data: Vec<CategoryCount> = read_json(&args.common.input)?;
    let canvas = config.bar.canvas(&config.theme, &args.common.title)?;
    let chart = BarChart::new(canvas, data, config.bar.options(args.footnote));
    write_chart(&chart, &args.common.output)
}

fn cmd_line(config: &Config, args: CommonArgs) -> anyhow::Result<()> {
    let points: Vec<DailyPoint> = read_json(&args.input)?;
    let canvas = config.line.canvas(&config.theme, &args.title)?;
    let chart = LineChart::from_daily(canvas, &points, config.line.options())?;
    write_chart(&chart, &args.output)
}

fn cmd_heatmap(config: &Config, args: HeatmapArgs) -> anyhow::Result<()> {
    let mut settings = config.heatmap.clone();
    if let Some(location) = args.location {
        settings.location = Some(location);
    }
    if let Some(power) = args.scaling_root {
        settings.scaling_power = power;
    }
    if let Some(max) = args.fixed_max {
        settings.fixed_max = Some(max);
    }

    let observations: Vec<BucketObservation> = if args.raw {
        let stamps: Vec<DateTime<FixedOffset>> = read_json(&args.common.input)?;
        bucket_timestamps(&stamps, settings.bucket_minutes)?
    } else {
        read_json(&args.common.input)?
    };
    if observations.is_empty() {
        tracing::warn!(
            path = %args.common.input.display(),
            "no observations, rendering an empty grid"
        );
    }

    let canvas = settings.canvas(&config.theme, &args.common.title)?;
    let chart = HeatmapChart::new(canvas, &observations, settings.options())
        .context("heatmap settings")?;
    write_chart(&chart, &args.common.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let point = parse_location("51.5, -0.1").unwrap();
        assert_eq!(point.latitude, 51.5);
        assert_eq!(point.longitude, -0.1);
        assert!(parse_location("51.5").is_err());
        assert!(parse_location("95,0").is_err());
    }

    #[test]
    fn test_cli_parses_heatmap() {
        let cli = Cli::try_parse_from([
            "songchart",
            "heatmap",
            "--raw",
            "-i",
            "in.json",
            "-o",
            "out.png",
            "--location",
            "-33.9,151.2",
            "--scaling-root",
            "0.5",
        ])
        .unwrap();
        match cli.command {
            Command::Heatmap(args) => {
                assert!(args.raw);
                assert_eq!(args.scaling_root, Some(0.5));
                assert_eq!(args.location.map(|l| l.latitude), Some(-33.9));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bar_command_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bar.json");
        let output = dir.path().join("out/bar.png");
        let data = r#"[{"label": "Robin", "count": 40}, {"label": "Jay", "count": 10}]"#;
        fs::write(&input, data).unwrap();

        let args = BarArgs {
            common: CommonArgs {
                input,
                output: output.clone(),
                title: "Calls and songs by species".into(),
            },
            footnote: Some("Unverified".into()),
        };
        cmd_bar(&Config::default(), args).unwrap();
        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }
}
