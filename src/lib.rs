//! # Songchart Core Library
//!
//! Raster chart rendering for bird-song detection data. Upstream collaborators
//! fetch and aggregate detections; this crate turns the resulting numbers into
//! fixed-size PNG images for posting.
//!
//! ## Chart Types
//!
//! - [`bar_chart::BarChart`]: one horizontal bar per species, ranked top to
//!   bottom, for a single day's counts
//! - [`line_chart::LineChart`]: daily counts for one or more years overlaid on
//!   a shared January-to-December axis, each with a rolling average
//! - [`heatmap::HeatmapChart`]: day-of-year × time-of-day density grid with an
//!   optional sunrise/sunset overlay
//!
//! Every chart owns a [`canvas::ChartCanvas`] (size, margins, title, colours)
//! and implements [`canvas::Chart`]. Rendering draws background and title,
//! then the plot frame, then the chart's own data, into a
//! [`raster::RasterImage`].
//!
//! ## Missing Data
//!
//! A `None` count means "no data that day" (sensor outage). It is never the
//! same as zero, which means the sensor was up and heard nothing. Smoothing and
//! maximum-finding skip `None` values, and line charts lift the pen across them.
//!
//! ## Example
//! ```
//! use songchart::bar_chart::{BarChart, BarOptions};
//! use songchart::canvas::{Chart, ChartCanvas, Margins};
//! use songchart::CategoryCount;
//!
//! let title = "Calls and songs by species";
//! let canvas = ChartCanvas::new(600, 400, title, Margins::default()).unwrap();
//! let chart = BarChart::new(
//!     canvas,
//!     vec![CategoryCount::new("Robin", 40), CategoryCount::new("Jay", 10)],
//!     BarOptions::default(),
//! );
//! let png = chart.to_png_bytes().unwrap();
//! assert!(!png.is_empty());
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Module declarations
pub mod bar_chart;
pub mod calendar;
pub mod canvas;
pub mod color;
pub mod config;
pub mod heatmap;
pub mod line_chart;
pub mod raster;
pub mod scale;
pub mod solar;

#[cfg(test)]
mod tests;

/// Errors raised while configuring or finishing a chart.
///
/// Configuration variants are caller mistakes caught at construction time.
/// Degenerate data (empty series, all zeros) is never an error.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Canvas width or height is zero
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// Margins leave no room for the plot frame
    #[error("margins {horizontal}x{vertical}px do not fit a {width}x{height} canvas")]
    InvalidMargins {
        horizontal: u32,
        vertical: u32,
        width: u32,
        height: u32,
    },

    /// Heatmap scaling power outside `(0, 1]`
    #[error("scaling power {0} must be in (0, 1]")]
    InvalidScalingPower(f64),

    /// Any other out-of-range chart option
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Outage interval whose start lies after its end
    #[error("outage interval {start}..={end} is reversed")]
    InvalidOutage { start: u32, end: u32 },

    /// Colour string that is neither `rgb(r,g,b)` nor `#rrggbb`
    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    /// PNG encoding failed
    #[error("encode failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the image to disk failed
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub fn option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

/// One bar: a category label and its count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A day's count, `None` when no data exists for that day.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use songchart::DailyPoint;
///
/// let outage = DailyPoint { date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), count: None };
/// let quiet = DailyPoint { date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), count: Some(0.0) };
/// assert_ne!(outage.count, quiet.count);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: Option<f64>,
}

impl DailyPoint {
    pub fn new(date: NaiveDate, count: Option<f64>) -> Self {
        Self { date, count }
    }
}

/// A contiguous run of missing days, in leap-year ordinals (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageInterval {
    pub start_ordinal: u32,
    pub end_ordinal: u32,
}

impl OutageInterval {
    /// Build an interval, rejecting `start > end`.
    pub fn new(start_ordinal: u32, end_ordinal: u32) -> ChartResult<Self> {
        let outage = Self {
            start_ordinal,
            end_ordinal,
        };
        outage.validate()?;
        Ok(outage)
    }

    pub(crate) fn validate(&self) -> ChartResult<()> {
        if self.start_ordinal > self.end_ordinal {
            return Err(ChartError::InvalidOutage {
                start: self.start_ordinal,
                end: self.end_ordinal,
            });
        }
        Ok(())
    }
}

/// Detections counted into one fixed-width time bucket.
///
/// The timestamp's offset is the local time the heatmap plots in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketObservation {
    pub timestamp: DateTime<FixedOffset>,
    pub count: u64,
}

/// A location on Earth in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Degrees north, -90..=90
    pub latitude: f64,
    /// Degrees east, -180..=180
    pub longitude: f64,
}
