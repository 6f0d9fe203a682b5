//! # Observation Heatmap
//!
//! One column per day of the year, one row per time-of-day bucket, each cell
//! shaded by how many detections fell into it. Cells are written straight
//! into a pixel grid copied out of the plot frame, then pasted back.
//!
//! With a location, sunrise and sunset are marked for every day in the
//! observed range, which draws two curves across the year.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, SubsecRound, Timelike, Utc};
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline},
};
use image::Rgba;

use crate::{
    calendar::month_ticks,
    canvas::{draw_line, draw_text, Chart, ChartCanvas, Margins, PlotFrame},
    color::to_raster_color,
    raster::{PixelGrid, RasterImage},
    scale::format_value,
    solar::sunrise_sunset,
    BucketObservation, ChartError, ChartResult, GeoPoint,
};

pub const MINUTES_PER_DAY: u32 = 1440;

/// Columns reserved for day-of-year, enough for a leap year.
const DAY_COLUMNS: u32 = 366;

/// Hours between time-of-day labels.
const HOUR_LABEL_STEP: u32 = 2;

/// Heatmap settings, validated once by [`HeatmapChart::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapOptions {
    /// Width of a time-of-day bucket; must divide a day evenly
    pub bucket_minutes: u32,
    /// Pixels per cell side
    pub scale: u32,
    /// Enables the sunrise/sunset overlay
    pub location: Option<GeoPoint>,
    /// Colour-scale ceiling; the largest cell count when unset
    pub fixed_max: Option<f64>,
    /// Exponent in `(0, 1]`; lower values lift faint cells
    pub scaling_power: f64,
    /// Colour of a saturated cell
    pub cell_color: Rgb888,
    pub sun_color: Rgb888,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            bucket_minutes: 5,
            scale: 2,
            location: None,
            fixed_max: None,
            scaling_power: 1.0,
            cell_color: Rgb888::new(0, 0, 250),
            sun_color: Rgb888::new(220, 120, 90),
        }
    }
}

impl HeatmapOptions {
    pub fn validate(&self) -> ChartResult<()> {
        let power = self.scaling_power;
        if power.is_nan() || power <= 0.0 || power > 1.0 {
            return Err(ChartError::InvalidScalingPower(power));
        }
        if self.bucket_minutes == 0 || MINUTES_PER_DAY % self.bucket_minutes != 0 {
            return Err(ChartError::option(format!(
                "bucket width of {} minutes does not divide a day",
                self.bucket_minutes
            )));
        }
        if self.scale == 0 {
            return Err(ChartError::option("pixel scale must be at least 1"));
        }
        if let Some(max) = self.fixed_max {
            if max.is_nan() || max <= 0.0 {
                return Err(ChartError::option(format!("fixed maximum {max} must be positive")));
            }
        }
        Ok(())
    }

    pub fn buckets_per_day(&self) -> u32 {
        MINUTES_PER_DAY / self.bucket_minutes.max(1)
    }
}

/// `clip(count, 0, ceiling)^power / ceiling^power`, 0 for a non-positive ceiling.
///
/// # Example
/// ```
/// use songchart::heatmap::scaled_intensity;
///
/// assert_eq!(scaled_intensity(10.0, 10.0, 1.0), 1.0);
/// assert!((scaled_intensity(2.5, 10.0, 0.5) - 0.5).abs() < 1e-12);
/// ```
pub fn scaled_intensity(count: f64, ceiling: f64, power: f64) -> f64 {
    if ceiling.is_nan() || ceiling <= 0.0 {
        return 0.0;
    }
    count.clamp(0.0, ceiling).powf(power) / ceiling.powf(power)
}

/// Floor raw detection instants into `minutes`-wide buckets and count them.
///
/// Bucket timestamps keep each instant's UTC offset. Output is ordered by
/// bucket start.
pub fn bucket_timestamps(
    timestamps: &[DateTime<FixedOffset>],
    minutes: u32,
) -> ChartResult<Vec<BucketObservation>> {
    if minutes == 0 {
        return Err(ChartError::option("bucket width must be at least 1 minute"));
    }
    let width = i64::from(minutes) * 60;

    let mut buckets: BTreeMap<DateTime<FixedOffset>, u64> = BTreeMap::new();
    for timestamp in timestamps {
        let seconds = i64::from(timestamp.time().num_seconds_from_midnight());
        let start = timestamp.trunc_subsecs(0) - Duration::seconds(seconds % width);
        *buckets.entry(start).or_default() += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(timestamp, count)| BucketObservation { timestamp, count })
        .collect())
}

/// `HH:00 -`, with 24 shown as midnight.
fn hour_label(hour: u32) -> String {
    format!("{:02}:00 -", hour % 24)
}

/// Frame interior the grid is written into.
fn interior(frame: PlotFrame) -> Rectangle {
    Rectangle::new(
        Point::new(frame.x + 1, frame.y + 1),
        Size::new(frame.width.saturating_sub(2), frame.height.saturating_sub(2)),
    )
}

/// One plotted cell after aggregation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatCell {
    /// Zero-based day of the observation's own year
    pub day: u32,
    /// Time-of-day bucket, 0 at midnight
    pub bucket: u32,
    pub count: u64,
    /// Scaled intensity in `[0, 1]`
    pub intensity: f64,
}

/// Day-of-year × time-of-day density chart.
#[derive(Clone, Debug)]
pub struct HeatmapChart {
    canvas: ChartCanvas,
    cells: Vec<HeatCell>,
    max_count: u64,
    ceiling: f64,
    /// First and last observed dates, in the first observation's offset
    span: Option<(NaiveDate, NaiveDate, FixedOffset)>,
    options: HeatmapOptions,
}

impl HeatmapChart {
    /// Aggregate observations into cells and fix the colour scale.
    ///
    /// Observations landing in the same cell are summed. An empty input gives
    /// a chart with no cells and a ceiling of 1.
    ///
    /// Fails when the options are invalid or the cell grid is larger than the
    /// frame interior; [`Self::fitted_margins`] gives a canvas that fits.
    pub fn new(
        canvas: ChartCanvas,
        observations: &[BucketObservation],
        options: HeatmapOptions,
    ) -> ChartResult<Self> {
        options.validate()?;
        let area = interior(canvas.frame());
        let grid = DAY_COLUMNS
            .checked_mul(options.scale)
            .zip(options.buckets_per_day().checked_mul(options.scale));
        let fits = matches!(grid, Some((w, h)) if w <= area.size.width && h <= area.size.height);
        if !fits {
            return Err(ChartError::option(format!(
                "{DAY_COLUMNS}x{} cells at {} px do not fit a {}x{} plot area",
                options.buckets_per_day(),
                options.scale,
                area.size.width,
                area.size.height
            )));
        }

        let mut sums: BTreeMap<(u32, u32), u64> = BTreeMap::new();
        for observation in observations {
            let timestamp = observation.timestamp;
            let minute = timestamp.time().num_seconds_from_midnight() / 60;
            let key = (timestamp.ordinal0(), minute / options.bucket_minutes);
            *sums.entry(key).or_default() += observation.count;
        }

        let max_count = sums.values().copied().max().unwrap_or(0);
        let ceiling = match options.fixed_max {
            Some(max) => max,
            None if max_count > 0 => max_count as f64,
            None => 1.0,
        };

        let cells = sums
            .into_iter()
            .map(|((day, bucket), count)| HeatCell {
                day,
                bucket,
                count,
                intensity: scaled_intensity(count as f64, ceiling, options.scaling_power),
            })
            .collect::<Vec<_>>();

        let first = observations.iter().min_by_key(|o| o.timestamp);
        let last = observations.iter().max_by_key(|o| o.timestamp);
        let span = first.zip(last).map(|(first, last)| {
            let offset = *first.timestamp.offset();
            (
                first.timestamp.date_naive(),
                last.timestamp.with_timezone(&offset).date_naive(),
                offset,
            )
        });

        tracing::debug!(
            observations = observations.len(),
            cells = cells.len(),
            max_count,
            ceiling,
            "heatmap prepared"
        );

        Ok(Self {
            canvas,
            cells,
            max_count,
            ceiling,
            span,
            options,
        })
    }

    /// Margins that make the frame interior exactly the
    /// `366·scale × buckets_per_day·scale` grid, for a canvas of the given size
    /// with fixed top and left margins.
    ///
    /// # Example
    /// ```
    /// use songchart::heatmap::HeatmapChart;
    ///
    /// let margins = HeatmapChart::fitted_margins(1000, 800, 80, 160, 2, 5).unwrap();
    /// assert_eq!((margins.right, margins.bottom), (106, 142));
    /// ```
    pub fn fitted_margins(
        width: u32,
        height: u32,
        top: u32,
        left: u32,
        scale: u32,
        bucket_minutes: u32,
    ) -> ChartResult<Margins> {
        if bucket_minutes == 0 {
            return Err(ChartError::option("bucket width must be at least 1 minute"));
        }
        let buckets = MINUTES_PER_DAY / bucket_minutes;
        // the frame border takes one pixel on each side
        let right = DAY_COLUMNS
            .checked_mul(scale)
            .and_then(|grid| grid.checked_add(left))
            .and_then(|used| used.checked_add(2))
            .and_then(|used| width.checked_sub(used));
        let bottom = buckets
            .checked_mul(scale)
            .and_then(|grid| grid.checked_add(top))
            .and_then(|used| used.checked_add(2))
            .and_then(|used| height.checked_sub(used));
        match right.zip(bottom) {
            Some((right, bottom)) => Ok(Margins::new(top, left, bottom, right)),
            None => Err(ChartError::option(format!(
                "{DAY_COLUMNS}x{buckets} cells at {scale} px do not fit a {width}x{height} canvas"
            ))),
        }
    }

    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    /// Scale note for the bottom margin.
    pub fn footnote(&self) -> String {
        format!(
            "{}Scale: {} minute buckets, max count/bucket = {}",
            if self.options.location.is_some() {
                "Showing sunrise & sunset times. "
            } else {
                ""
            },
            self.options.bucket_minutes,
            format_value(self.ceiling)
        )
    }

    fn plot_area(&self) -> Rectangle {
        interior(self.canvas.frame())
    }

    /// Fill a `scale × scale` block; returns how many pixels landed.
    fn plot_block(&self, grid: &mut PixelGrid, x: u32, y: u32, value: Rgba<u8>) -> u32 {
        let scale = self.options.scale;
        let mut landed = 0;
        for dx in 0..scale {
            for dy in 0..scale {
                if grid.plot_from_bottom_left(x + dx, y + dy, value) {
                    landed += 1;
                }
            }
        }
        landed
    }

    fn plot_cells(&self, grid: &mut PixelGrid) {
        let foreground = self.canvas.theme().foreground;
        let scale = self.options.scale;
        let mut clipped = 0usize;
        for cell in self.cells.iter().filter(|c| c.count > 0) {
            let value = to_raster_color(self.options.cell_color, cell.intensity, Some(foreground));
            if self.plot_block(grid, cell.day * scale, cell.bucket * scale, value) == 0 {
                clipped += 1;
            }
        }
        if clipped > 0 {
            tracing::debug!(clipped, "heatmap cells outside the plot area");
        }
    }

    fn plot_sun_times(&self, grid: &mut PixelGrid, location: GeoPoint) {
        let Some((first, last, offset)) = self.span else {
            return;
        };
        let color = self.options.sun_color;
        let value = Rgba([color.r(), color.g(), color.b(), 255]);
        let scale = self.options.scale;

        let mut polar_days = 0usize;
        for date in first.iter_days().take_while(|d| *d <= last) {
            let Some(noon) = date
                .and_hms_opt(12, 0, 0)
                .and_then(|n| n.and_local_timezone(offset).single())
            else {
                continue;
            };
            let Some(times) = sunrise_sunset(noon.with_timezone(&Utc), location) else {
                polar_days += 1;
                continue;
            };
            for instant in [times.sunrise, times.sunset] {
                let local = instant.with_timezone(&offset);
                let minute = local.time().num_seconds_from_midnight() / 60;
                // finer than a bucket so the curve stays smooth
                let y = minute * scale / self.options.bucket_minutes;
                for dx in 0..scale {
                    grid.plot_from_bottom_left(local.ordinal0() * scale + dx, y, value);
                }
            }
        }
        if polar_days > 0 {
            tracing::debug!(polar_days, "no sunrise or sunset on some days");
        }
    }

    fn draw_month_labels(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        let text = self.canvas.theme().text;
        let scale = self.options.scale as i32;
        for tick in month_ticks() {
            let x = frame.x + 1 + (tick.ordinal as i32 - 1) * scale + scale / 2;
            draw_line(
                image,
                Point::new(x, frame.bottom()),
                Point::new(x, frame.bottom() + 3),
                text,
                1,
            );
            draw_text(
                image,
                &tick.label,
                Point::new(x, frame.bottom() + 5),
                self.canvas.label_font(),
                text,
                Alignment::Center,
                Baseline::Top,
            );
        }
    }

    /// Canvas row of each labelled hour, midnight at the bottom of the grid.
    fn hour_label_rows(&self) -> Vec<(u32, i32)> {
        let area = self.plot_area();
        let last_row = area.top_left.y + area.size.height as i32 - 1;
        let scale = u64::from(self.options.scale);
        let bucket = u64::from(self.options.bucket_minutes);
        (0..=24)
            .step_by(HOUR_LABEL_STEP as usize)
            .map(|hour| {
                let rows = u64::from(hour) * 60 * scale / bucket;
                (hour, last_row - rows as i32)
            })
            .collect()
    }

    fn draw_hour_labels(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        for (hour, y) in self.hour_label_rows() {
            draw_text(
                image,
                &hour_label(hour),
                Point::new(frame.x - 2, y),
                self.canvas.label_font(),
                self.canvas.theme().text,
                Alignment::Right,
                Baseline::Middle,
            );
        }
    }
}

impl Chart for HeatmapChart {
    fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    fn draw_data(&self, image: &mut RasterImage) {
        self.draw_month_labels(image);
        self.draw_hour_labels(image);

        let area = self.plot_area();
        let mut grid = image.read_region(area);
        self.plot_cells(&mut grid);
        if let Some(location) = self.options.location {
            self.plot_sun_times(&mut grid, location);
        }
        image.write_region(&grid, area.top_left);

        self.canvas.draw_footnote(image, &self.footnote());
    }
}
