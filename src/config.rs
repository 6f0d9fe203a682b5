//! # Configuration Management
//!
//! Chart settings loaded from a TOML file (`songchart.toml` by default). Every
//! field has a default, so a partial file only overrides what it names. Each
//! chart section converts into the canvas and option structs its chart takes.
//!
//! ```toml
//! [theme]
//! background = "rgb(230,230,230)"
//! label_font_size = 12
//!
//! [heatmap]
//! scaling_power = 0.5
//! location = { latitude = 51.5, longitude = -0.1 }
//! ```

use std::fs;
use std::path::Path;

use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bar_chart::BarOptions,
    canvas::{ChartCanvas, FontSpec, Margins, Theme},
    color::{ColorSpec, DEFAULT_PALETTE},
    heatmap::{HeatmapChart, HeatmapOptions},
    line_chart::LineOptions,
    ChartResult, GeoPoint,
};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "songchart.toml";

/// Errors reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("cannot write config: {0}")]
    Write(#[source] std::io::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Colours and font sizes shared by every chart
    pub theme: ThemeConfig,
    pub bar: BarConfig,
    pub line: LineConfig,
    pub heatmap: HeatmapConfig,
}

/// Canvas colours and font sizes
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background: ColorSpec,
    /// Plot frame fill
    pub foreground: ColorSpec,
    pub text: ColorSpec,
    /// Plot frame border
    pub frame: ColorSpec,
    pub title_font_size: u32,
    pub label_font_size: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let theme = Theme::default();
        ThemeConfig {
            background: theme.background.into(),
            foreground: theme.foreground.into(),
            text: theme.text.into(),
            frame: theme.frame.into(),
            title_font_size: 20,
            label_font_size: 12,
        }
    }
}

impl ThemeConfig {
    pub fn theme(&self) -> Theme {
        Theme {
            background: self.background.0,
            foreground: self.foreground.0,
            text: self.text.0,
            frame: self.frame.0,
        }
    }

    /// Canvas with this theme and these fonts applied.
    fn canvas(
        &self,
        width: u32,
        height: u32,
        title: &str,
        margins: Margins,
    ) -> ChartResult<ChartCanvas> {
        Ok(ChartCanvas::new(width, height, title, margins)?
            .with_theme(self.theme())
            .with_title_font(FontSpec::bold(self.title_font_size))
            .with_label_font(FontSpec::regular(self.label_font_size)))
    }
}

/// Ranked species bar chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BarConfig {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    pub max_ticks: u32,
    /// Derive font sizes from the canvas width
    pub scale_fonts_with_width: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        BarConfig {
            width: 800,
            height: 600,
            margins: Margins::new(50, 170, 40, 20),
            max_ticks: 10,
            scale_fonts_with_width: true,
        }
    }
}

impl BarConfig {
    pub fn canvas(&self, theme: &ThemeConfig, title: &str) -> ChartResult<ChartCanvas> {
        theme.canvas(self.width, self.height, title, self.margins)
    }

    pub fn options(&self, footnote: Option<String>) -> BarOptions {
        BarOptions {
            max_ticks: self.max_ticks,
            scale_fonts_with_width: self.scale_fonts_with_width,
            footnote,
            ..BarOptions::default()
        }
    }
}

/// Multi-year daily line chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LineConfig {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    /// Rolling-average window in days
    pub smoothing_window: usize,
    /// Year colours, oldest year first
    pub palette: Vec<ColorSpec>,
}

impl Default for LineConfig {
    fn default() -> Self {
        LineConfig {
            width: 1000,
            height: 600,
            margins: Margins::default(),
            smoothing_window: 7,
            palette: DEFAULT_PALETTE.iter().copied().map(ColorSpec).collect(),
        }
    }
}

impl LineConfig {
    pub fn canvas(&self, theme: &ThemeConfig, title: &str) -> ChartResult<ChartCanvas> {
        theme.canvas(self.width, self.height, title, self.margins)
    }

    pub fn options(&self) -> LineOptions {
        LineOptions {
            smoothing_window: self.smoothing_window,
            palette: self.palette.iter().map(|c| c.0).collect(),
            ..LineOptions::default()
        }
    }
}

/// Day × time-of-day observation heatmap
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub width: u32,
    pub height: u32,
    /// Right and bottom margins are derived so the grid fits the frame
    pub top: u32,
    pub left: u32,
    /// Pixels per cell side
    pub scale: u32,
    pub bucket_minutes: u32,
    pub scaling_power: f64,
    pub fixed_max: Option<f64>,
    /// Enables the sunrise/sunset overlay
    pub location: Option<GeoPoint>,
    pub cell_color: ColorSpec,
    pub sun_color: ColorSpec,
    /// Plot frame fill, overriding the theme
    pub foreground: ColorSpec,
    pub label_font_size: u32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        let options = HeatmapOptions::default();
        HeatmapConfig {
            width: 1000,
            height: 800,
            top: 80,
            left: 160,
            scale: options.scale,
            bucket_minutes: options.bucket_minutes,
            scaling_power: options.scaling_power,
            fixed_max: None,
            location: None,
            cell_color: options.cell_color.into(),
            sun_color: options.sun_color.into(),
            foreground: Rgb888::new(250, 250, 250).into(),
            label_font_size: 16,
        }
    }
}

impl HeatmapConfig {
    pub fn canvas(&self, theme: &ThemeConfig, title: &str) -> ChartResult<ChartCanvas> {
        let margins = HeatmapChart::fitted_margins(
            self.width,
            self.height,
            self.top,
            self.left,
            self.scale,
            self.bucket_minutes,
        )?;
        let mut colors = theme.theme();
        colors.foreground = self.foreground.0;
        Ok(theme
            .canvas(self.width, self.height, title, margins)?
            .with_theme(colors)
            .with_label_font(FontSpec::regular(self.label_font_size)))
    }

    pub fn options(&self) -> HeatmapOptions {
        HeatmapOptions {
            bucket_minutes: self.bucket_minutes,
            scale: self.scale,
            location: self.location,
            fixed_max: self.fixed_max,
            scaling_power: self.scaling_power,
            cell_color: self.cell_color.0,
            sun_color: self.sun_color.0,
        }
    }
}

impl Config {
    /// Load from `songchart.toml` in the working directory, see [`Self::load_from_path`].
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from `path`.
    /// Falls back to the defaults if the file doesn't exist or is invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read_from_path(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(ConfigError::Read(_)) => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, failing on a missing or invalid file.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Write the configuration as pretty TOML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents).map_err(ConfigError::Write)?;
        tracing::info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
