//! # Multi-Year Line Chart
//!
//! Daily counts for one or more years, overlaid on a single January-to-December
//! axis. Each year gets a thin translucent line for the raw counts and a
//! thicker, brighter line for a symmetric rolling average.
//!
//! ## Positioning
//! - **x**: each point's leap-year ordinal (see [`crate::calendar`]), centred
//!   in its slot of 366
//! - **y**: `count / max`, where `max` is the largest raw count across all years
//!
//! ## Gaps
//! The pen lifts at every missing day and whenever two plotted points are not
//! on consecutive calendar dates. Outage intervals are painted over in the
//! canvas background colour after the lines, so known gaps always read as
//! "no data".

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Polyline, PrimitiveStyle},
    text::{Alignment, Baseline},
};

use crate::{
    calendar::{is_next_day, leap_year_ordinal, month_ticks, DAYS_IN_LEAP_YEAR},
    canvas::{draw_line, draw_text, fill_rect, rect_between, Chart, ChartCanvas},
    color::{brighten, palette_color, DEFAULT_PALETTE},
    raster::RasterImage,
    scale::{format_value, step_size_for_range, tick_values},
    ChartError, ChartResult, DailyPoint, OutageInterval,
};

/// Gap between the frame and the top of the month labels.
const MONTH_LABEL_GAP: i32 = 5;

/// A day's count positioned on the normalized year axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YearPoint {
    pub date: NaiveDate,
    pub count: Option<f64>,
    /// Leap-year ordinal, 1..=366
    pub x_index: u32,
}

/// Daily points grouped by calendar year.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiYearSeries {
    years: BTreeMap<i32, Vec<YearPoint>>,
}

impl MultiYearSeries {
    /// Group `points` by year, sort each year by date and attach ordinals.
    ///
    /// Missing days stay in the series as `None`; they still occupy a
    /// position for smoothing.
    pub fn from_daily(points: &[DailyPoint]) -> Self {
        let mut years: BTreeMap<i32, Vec<YearPoint>> = BTreeMap::new();
        for point in points {
            years.entry(point.date.year()).or_default().push(YearPoint {
                date: point.date,
                count: point.count,
                x_index: leap_year_ordinal(point.date),
            });
        }
        for year in years.values_mut() {
            year.sort_by_key(|p| p.date);
        }
        Self { years }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn year(&self, year: i32) -> Option<&[YearPoint]> {
        self.years.get(&year).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.years.values().all(Vec::is_empty)
    }

    /// Largest non-null count in any year, 0 if there is none.
    pub fn max_value(&self) -> f64 {
        self.years
            .values()
            .flatten()
            .filter_map(|p| p.count)
            .fold(0.0, f64::max)
    }

    /// Same dates and ordinals, counts replaced by their rolling average.
    pub fn smoothed(&self, window: usize) -> Self {
        let years = self
            .years
            .iter()
            .map(|(year, points)| {
                let counts: Vec<Option<f64>> = points.iter().map(|p| p.count).collect();
                let smoothed = smooth(&counts, window)
                    .into_iter()
                    .zip(points)
                    .map(|(count, p)| YearPoint { count, ..*p })
                    .collect();
                (*year, smoothed)
            })
            .collect();
        Self { years }
    }
}

/// Symmetric rolling average over `[i - window/2, i + window/2]`, clipped to
/// the series.
///
/// Null neighbours are left out of both the sum and the count. A null position
/// stays null.
///
/// # Example
/// ```
/// use songchart::line_chart::smooth;
///
/// let smoothed = smooth(&[Some(2.0), Some(4.0), None, Some(6.0)], 3);
/// assert_eq!(smoothed, vec![Some(3.0), Some(3.0), None, Some(6.0)]);
/// ```
pub fn smooth(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let reach = window / 2;
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value.map(|own| {
                let start = i.saturating_sub(reach);
                let end = (i + reach).min(values.len() - 1);
                let (total, points) = values[start..=end]
                    .iter()
                    .flatten()
                    .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
                if points == 0 {
                    own
                } else {
                    total / points as f64
                }
            })
        })
        .collect()
}

/// Runs of consecutive missing days as outage intervals.
///
/// A run crossing New Year is split so each interval stays within one year's
/// ordinals.
pub fn outages_from_daily(points: &[DailyPoint]) -> Vec<OutageInterval> {
    let mut missing: Vec<NaiveDate> = points
        .iter()
        .filter(|p| p.count.is_none())
        .map(|p| p.date)
        .collect();
    missing.sort();
    missing.dedup();

    let mut outages: Vec<OutageInterval> = Vec::new();
    let mut previous: Option<NaiveDate> = None;
    for date in missing {
        let ordinal = leap_year_ordinal(date);
        let extends = previous
            .map(|p| is_next_day(p, date) && p.year() == date.year())
            .unwrap_or(false);
        match outages.last_mut() {
            Some(last) if extends => last.end_ordinal = ordinal,
            _ => outages.push(OutageInterval {
                start_ordinal: ordinal,
                end_ordinal: ordinal,
            }),
        }
        previous = Some(date);
    }
    outages
}

/// Line chart settings.
#[derive(Clone, Debug, PartialEq)]
pub struct LineOptions {
    /// Rolling-average window in days
    pub smoothing_window: usize,
    /// Year colours, cycled
    pub palette: Vec<Rgb888>,
    pub raw_opacity: f64,
    pub raw_width: u32,
    pub average_opacity: f64,
    pub average_width: u32,
    /// How much lighter the average line is than the year colour, in percent
    pub average_brighten: f64,
    /// Upper bound on the number of value-axis ticks
    pub max_ticks: u32,
    pub legend_bar_length: u32,
}

impl Default for LineOptions {
    fn default() -> Self {
        LineOptions {
            smoothing_window: 7,
            palette: DEFAULT_PALETTE.to_vec(),
            raw_opacity: 0.4,
            raw_width: 1,
            average_opacity: 0.6,
            average_width: 5,
            average_brighten: 10.0,
            max_ticks: 10,
            legend_bar_length: 60,
        }
    }
}

/// Daily counts for one or more years on a shared calendar axis.
#[derive(Clone, Debug)]
pub struct LineChart {
    canvas: ChartCanvas,
    daily: MultiYearSeries,
    smoothed: MultiYearSeries,
    outages: Vec<OutageInterval>,
    max_value: f64,
    options: LineOptions,
}

impl LineChart {
    /// Build a chart from an already grouped series and explicit outages.
    pub fn new(
        canvas: ChartCanvas,
        daily: MultiYearSeries,
        outages: Vec<OutageInterval>,
        options: LineOptions,
    ) -> ChartResult<Self> {
        if options.smoothing_window == 0 {
            return Err(ChartError::option("smoothing window must be at least 1 day"));
        }
        for outage in &outages {
            outage.validate()?;
            if outage.start_ordinal == 0 || outage.end_ordinal > DAYS_IN_LEAP_YEAR {
                return Err(ChartError::option(format!(
                    "outage {}..={} is outside 1..={}",
                    outage.start_ordinal, outage.end_ordinal, DAYS_IN_LEAP_YEAR
                )));
            }
        }

        if daily.is_empty() {
            tracing::info!("no daily counts, drawing an empty line chart");
        }
        let smoothed = daily.smoothed(options.smoothing_window);
        let max_value = daily.max_value();
        tracing::debug!(
            years = daily.years.len(),
            max_value,
            outages = outages.len(),
            "line chart prepared"
        );

        Ok(Self {
            canvas,
            daily,
            smoothed,
            outages,
            max_value,
            options,
        })
    }

    /// Build from flat daily points, deriving outages from the missing days.
    pub fn from_daily(
        canvas: ChartCanvas,
        points: &[DailyPoint],
        options: LineOptions,
    ) -> ChartResult<Self> {
        let outages = outages_from_daily(points);
        Self::new(canvas, MultiYearSeries::from_daily(points), outages, options)
    }

    pub fn daily(&self) -> &MultiYearSeries {
        &self.daily
    }

    pub fn smoothed(&self) -> &MultiYearSeries {
        &self.smoothed
    }

    pub fn outages(&self) -> &[OutageInterval] {
        &self.outages
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Canvas x of the centre of ordinal slot `ordinal`.
    pub fn x_for(&self, ordinal: f64) -> f64 {
        let frame = self.canvas.frame();
        f64::from(frame.x) + (ordinal - 0.5) / f64::from(DAYS_IN_LEAP_YEAR) * f64::from(frame.width)
    }

    /// Rows a line centre may occupy: the frame interior, inset by half the
    /// widest stroke so no line bleeds onto the border.
    fn y_range(&self) -> (i32, i32) {
        let frame = self.canvas.frame();
        let widest = self.options.average_width.max(self.options.raw_width);
        let inset = i32::try_from(widest / 2).unwrap_or(0);
        let top = frame.y + 1 + inset;
        let baseline = (frame.bottom() - 2 - inset).max(top);
        (top, baseline)
    }

    /// Canvas y for a count; everything sits on the baseline when `max` is 0.
    pub fn y_for(&self, value: f64) -> f64 {
        let (top, baseline) = self.y_range();
        let baseline = f64::from(baseline);
        if self.max_value <= 0.0 {
            return baseline;
        }
        baseline - value / self.max_value * (baseline - f64::from(top))
    }

    fn to_point(&self, point: &YearPoint, count: f64) -> Point {
        Point::new(
            self.x_for(f64::from(point.x_index)).round() as i32,
            self.y_for(count).round() as i32,
        )
    }

    /// Split a year's points into pen-down runs of consecutive plotted days.
    fn runs(&self, points: &[YearPoint]) -> Vec<Vec<Point>> {
        let mut runs: Vec<Vec<Point>> = Vec::new();
        let mut last_date: Option<NaiveDate> = None;
        for point in points {
            let Some(count) = point.count else {
                continue;
            };
            let joined = last_date.map(|d| is_next_day(d, point.date)).unwrap_or(false);
            let position = self.to_point(point, count);
            match runs.last_mut() {
                Some(run) if joined => run.push(position),
                _ => runs.push(vec![position]),
            }
            last_date = Some(point.date);
        }
        runs
    }

    fn plot_points(
        &self,
        image: &mut RasterImage,
        points: &[YearPoint],
        color: Rgb888,
        width: u32,
        opacity: f64,
    ) {
        let style = PrimitiveStyle::with_stroke(color, width);
        let mut target = image.translucent(opacity);
        for run in self.runs(points) {
            if let [only] = run.as_slice() {
                // a lone day still gets a visible mark
                draw_line(&mut target, *only, *only + Point::new(1, 0), color, width);
            } else {
                Polyline::new(&run).into_styled(style).draw(&mut target).ok();
            }
        }
    }

    fn draw_value_labels(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        let step = step_size_for_range(self.max_value, self.options.max_ticks);
        for value in tick_values(self.max_value, step) {
            draw_text(
                image,
                &format!("{} -", format_value(value)),
                Point::new(frame.x - 2, self.y_for(value).round() as i32),
                self.canvas.label_font(),
                self.canvas.theme().text,
                Alignment::Right,
                Baseline::Middle,
            );
        }
    }

    fn draw_month_labels(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        let text = self.canvas.theme().text;
        for tick in month_ticks() {
            let x = self.x_for(f64::from(tick.ordinal)).round() as i32;
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
                Point::new(x, frame.bottom() + MONTH_LABEL_GAP),
                self.canvas.label_font(),
                text,
                Alignment::Center,
                Baseline::Top,
            );
        }
    }

    /// Legend rows: year, daily sample, average sample. They start below the
    /// month labels and step by one label line.
    fn legend_rows(&self) -> [i32; 3] {
        let font = self.canvas.label_font();
        let step = font.line_height() as i32 + 4;
        let first = self.canvas.frame().bottom() + MONTH_LABEL_GAP + step + step / 2;
        [first, first + step, first + 2 * step]
    }

    fn draw_legend(
        &self,
        image: &mut RasterImage,
        (index, year_count): (usize, usize),
        year: i32,
        raw: Rgb888,
        average: Rgb888,
    ) {
        let frame = self.canvas.frame();
        let font = self.canvas.label_font();
        let text = self.canvas.theme().text;
        let left = frame.x + (index as i64 * i64::from(frame.width) / year_count as i64) as i32;
        let bar = self.options.legend_bar_length as i32;
        let [year_row, raw_row, average_row] = self.legend_rows();

        draw_text(
            image,
            &year.to_string(),
            Point::new(left, year_row),
            font,
            text,
            Alignment::Left,
            Baseline::Middle,
        );

        let samples = [
            (
                raw_row,
                raw,
                self.options.raw_width,
                self.options.raw_opacity,
                "daily".to_string(),
            ),
            (
                average_row,
                average,
                self.options.average_width,
                self.options.average_opacity,
                format!("{}-day avg", self.options.smoothing_window),
            ),
        ];
        for (y, color, width, opacity, label) in samples {
            draw_line(
                &mut image.translucent(opacity),
                Point::new(left, y),
                Point::new(left + bar, y),
                color,
                width,
            );
            draw_text(
                image,
                &label,
                Point::new(left + bar + 5, y),
                font,
                text,
                Alignment::Left,
                Baseline::Middle,
            );
        }
    }

    fn draw_outages(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        let background = self.canvas.theme().background;
        for outage in &self.outages {
            let left = self.x_for(f64::from(outage.start_ordinal) - 0.5).round() as i32;
            let right = self.x_for(f64::from(outage.end_ordinal) + 0.5).round() as i32 - 1;
            // stay inside the frame border
            let area = rect_between(
                Point::new(left.max(frame.x + 1), frame.y + 1),
                Point::new(right.min(frame.right() - 2), frame.bottom() - 2),
            );
            fill_rect(image, area, background);
        }
    }
}

impl Chart for LineChart {
    fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    fn draw_data(&self, image: &mut RasterImage) {
        self.draw_value_labels(image);

        let years: Vec<i32> = self.daily.years().collect();
        for (index, year) in years.iter().enumerate() {
            let base = palette_color(&self.options.palette, index);
            let average = brighten(base, self.options.average_brighten);

            if let Some(points) = self.smoothed.year(*year) {
                let (width, opacity) = (self.options.average_width, self.options.average_opacity);
                self.plot_points(image, points, average, width, opacity);
            }
            if let Some(points) = self.daily.year(*year) {
                let (width, opacity) = (self.options.raw_width, self.options.raw_opacity);
                self.plot_points(image, points, base, width, opacity);
            }
            self.draw_legend(image, (index, years.len()), *year, base, average);
        }

        self.draw_month_labels(image);
        self.draw_outages(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Margins;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn canvas() -> ChartCanvas {
        ChartCanvas::new(800, 600, "Robin", Margins::default()).unwrap()
    }

    fn days(start: NaiveDate, counts: &[Option<f64>]) -> Vec<DailyPoint> {
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| DailyPoint::new(start + chrono::Duration::days(i as i64), *c))
            .collect()
    }

    #[test]
    fn test_smooth_constant_series() {
        let values = vec![Some(4.0); 20];
        assert!(smooth(&values, 7).iter().all(|v| *v == Some(4.0)));
    }

    #[test]
    fn test_smooth_skips_nulls() {
        assert_eq!(
            smooth(&[Some(1.0), None, Some(3.0)], 3),
            vec![Some(1.0), None, Some(3.0)]
        );
        assert_eq!(smooth(&[None, None], 7), vec![None, None]);
        assert!(smooth(&[], 7).is_empty());
    }

    #[test]
    fn test_smooth_window_is_symmetric_and_clipped() {
        let values: Vec<Option<f64>> = (1..=5).map(|v| Some(v as f64)).collect();
        let smoothed = smooth(&values, 3);
        assert_eq!(smoothed[0], Some(1.5));
        assert_eq!(smoothed[2], Some(3.0));
        assert_eq!(smoothed[4], Some(4.5));
    }

    #[test]
    fn test_series_groups_by_year() {
        let points = days(date(2023, 12, 30), &[Some(1.0), Some(2.0), Some(3.0), None]);
        let series = MultiYearSeries::from_daily(&points);
        assert_eq!(series.years().collect::<Vec<_>>(), vec![2023, 2024]);
        let y2023 = series.year(2023).unwrap();
        assert_eq!(y2023.iter().map(|p| p.x_index).collect::<Vec<_>>(), vec![365, 366]);
        assert_eq!(series.year(2024).unwrap()[0].x_index, 1);
        assert_eq!(series.max_value(), 3.0);
        assert!(!series.is_empty());
        assert!(MultiYearSeries::from_daily(&[]).is_empty());
    }

    #[test]
    fn test_outages_from_daily() {
        let points = days(
            date(2023, 12, 29),
            &[Some(1.0), None, None, None, Some(2.0), None],
        );
        let outages = outages_from_daily(&points);
        assert_eq!(
            outages,
            vec![
                OutageInterval { start_ordinal: 365, end_ordinal: 366 },
                OutageInterval { start_ordinal: 1, end_ordinal: 1 },
                OutageInterval { start_ordinal: 3, end_ordinal: 3 },
            ]
        );
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let series = MultiYearSeries::default();
        let zero_window = LineOptions {
            smoothing_window: 0,
            ..LineOptions::default()
        };
        assert!(LineChart::new(canvas(), series.clone(), vec![], zero_window).is_err());

        let reversed = vec![OutageInterval { start_ordinal: 10, end_ordinal: 3 }];
        assert!(matches!(
            LineChart::new(canvas(), series.clone(), reversed, LineOptions::default()),
            Err(ChartError::InvalidOutage { .. })
        ));

        let past_year_end = vec![OutageInterval { start_ordinal: 360, end_ordinal: 367 }];
        assert!(LineChart::new(canvas(), series, past_year_end, LineOptions::default()).is_err());
    }

    #[test]
    fn test_runs_lift_pen_across_gaps() {
        let points = days(
            date(2023, 2, 26),
            &[Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0), None, None, Some(9.0)],
        );
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        let runs = chart.runs(chart.daily().year(2023).unwrap());
        // Feb 26..28 then Mar 1 is null, Mar 2..3, then Mar 6 alone
        assert_eq!(runs.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_feb_28_to_mar_1_stays_connected() {
        let points = days(date(2023, 2, 27), &[Some(1.0), Some(1.0), Some(1.0)]);
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        let runs = chart.runs(chart.daily().year(2023).unwrap());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn test_zero_max_sits_on_baseline() {
        let points = days(date(2024, 1, 1), &[Some(0.0), Some(0.0), None]);
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        assert_eq!(chart.max_value(), 0.0);
        let (_, baseline) = chart.y_range();
        assert_eq!(chart.y_for(0.0), f64::from(baseline));
        assert_eq!(chart.y_for(5.0), f64::from(baseline));
        chart.render();
    }

    #[test]
    fn test_y_stays_inside_frame_border() {
        let points = days(date(2024, 1, 1), &[Some(0.0), Some(8.0)]);
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        let frame = chart.canvas().frame();
        let half_stroke = f64::from(chart.options.average_width / 2);

        let peak = chart.y_for(8.0);
        let floor = chart.y_for(0.0);
        assert!(peak - half_stroke >= f64::from(frame.y + 1));
        assert!(floor + half_stroke <= f64::from(frame.bottom() - 2));
        assert!(peak < floor);
    }

    #[test]
    fn test_peak_line_stays_out_of_title_margin() {
        let points = days(date(2024, 3, 1), &[Some(10.0); 30]);
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        let image = chart.render();
        let frame = chart.canvas().frame();
        let theme = chart.canvas().theme();
        let x = chart.x_for(f64::from(leap_year_ordinal(date(2024, 3, 15)))).round() as u32;

        let border = [theme.frame.r(), theme.frame.g(), theme.frame.b(), 255];
        assert_eq!(image.pixel(x, frame.y as u32).map(|p| p.0), Some(border));
        let above = image.pixel(x, frame.y as u32 - 1).map(|p| p.0);
        let background = [theme.background.r(), theme.background.g(), theme.background.b(), 255];
        assert_eq!(above, Some(background));
    }

    #[test]
    fn test_legend_stays_below_plot() {
        let cramped = ChartCanvas::new(800, 600, "Robin", Margins::new(60, 60, 20, 40)).unwrap();
        let points = days(date(2024, 12, 1), &[Some(3.0); 10]);
        let chart = LineChart::from_daily(cramped, &points, LineOptions::default()).unwrap();
        let frame = chart.canvas().frame();
        let [year_row, _, _] = chart.legend_rows();
        let line_height = chart.canvas().label_font().line_height() as i32;
        let label_bottom = frame.bottom() + MONTH_LABEL_GAP + line_height;
        assert!(year_row - line_height / 2 > label_bottom);

        // the December data sits far right, so the left of the plot stays untouched
        let image = chart.render();
        let foreground = chart.canvas().theme().foreground;
        let untouched = [foreground.r(), foreground.g(), foreground.b(), 255];
        let bar = chart.options.legend_bar_length as i32;
        for x in frame.x + 1..frame.x + bar {
            for y in frame.y + 1..frame.bottom() - 1 {
                assert_eq!(image.pixel(x as u32, y as u32).map(|p| p.0), Some(untouched));
            }
        }
    }

    #[test]
    fn test_x_positions_span_frame() {
        let chart = LineChart::from_daily(canvas(), &[], LineOptions::default()).unwrap();
        let frame = chart.canvas().frame();
        assert!(chart.x_for(1.0) > f64::from(frame.x));
        assert!(chart.x_for(366.0) < f64::from(frame.right()));
        assert_eq!(chart.x_for(0.5), f64::from(frame.x));
    }

    #[test]
    fn test_outage_is_blanked_after_lines() {
        let mut counts = vec![Some(10.0); 40];
        for count in &mut counts[19..22] {
            *count = None;
        }
        let points = days(date(2024, 1, 1), &counts);
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        assert_eq!(chart.outages(), &[OutageInterval { start_ordinal: 20, end_ordinal: 22 }]);

        let image = chart.render();
        let frame = chart.canvas().frame();
        let background = chart.canvas().theme().background;
        let blank = Some([background.r(), background.g(), background.b(), 255]);
        let x = chart.x_for(21.0).round() as u32;
        // the peak row carries the smoothed line either side of the gap
        let peak = chart.y_for(10.0).round() as u32;
        assert!(peak > frame.y as u32);
        assert_eq!(image.pixel(x, peak).map(|p| p.0), blank);
        assert_eq!(image.pixel(x, (frame.bottom() - 2) as u32).map(|p| p.0), blank);
    }

    #[test]
    fn test_lines_reach_the_plot() {
        let mut points = days(date(2024, 6, 1), &[Some(5.0); 30]);
        points.push(DailyPoint::new(date(2024, 9, 1), Some(10.0)));
        let chart = LineChart::from_daily(canvas(), &points, LineOptions::default()).unwrap();
        let image = chart.render();
        let foreground = chart.canvas().theme().foreground;
        let x = chart.x_for(f64::from(leap_year_ordinal(date(2024, 6, 15)))).round() as u32;
        let y = chart.y_for(5.0).round() as u32;
        assert_ne!(
            image.pixel(x, y).map(|p| p.0),
            Some([foreground.r(), foreground.g(), foreground.b(), 255])
        );
    }
}
