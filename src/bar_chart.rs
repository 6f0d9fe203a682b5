//! # Ranked Bar Chart
//!
//! One horizontal bar per category, top to bottom in the order given, with
//! the category name right-aligned in the left margin and the count printed
//! inside the bar. A count axis with round-number ticks runs along the bottom.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Alignment, Baseline},
};

use crate::{
    canvas::{draw_line, draw_text, Chart, ChartCanvas, FontSpec},
    raster::RasterImage,
    scale::{format_value, step_size_for_range, tick_values},
    CategoryCount,
};

/// Width of the plot frame border the bars sit inside.
const FRAME_STROKE: f64 = 1.0;

/// Length of the count-axis tick marks below the frame.
const TICK_LENGTH: i32 = 4;

/// Bar chart settings.
#[derive(Clone, Debug, PartialEq)]
pub struct BarOptions {
    /// Upper bound on the number of count-axis ticks
    pub max_ticks: u32,
    /// Size fonts from the canvas width (labels at width/50, title to fill
    /// roughly the width) instead of using the canvas fonts
    pub scale_fonts_with_width: bool,
    pub bar_fill: Rgb888,
    pub bar_stroke: Rgb888,
    /// Optional note drawn right-aligned in the bottom margin
    pub footnote: Option<String>,
}

impl Default for BarOptions {
    fn default() -> Self {
        BarOptions {
            max_ticks: 10,
            scale_fonts_with_width: true,
            bar_fill: Rgb888::new(240, 240, 240),
            bar_stroke: Rgb888::new(200, 200, 200),
            footnote: None,
        }
    }
}

/// Where one bar lands, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub label: String,
    pub count: u64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Horizontal bar chart of category counts.
#[derive(Clone, Debug)]
pub struct BarChart {
    canvas: ChartCanvas,
    data: Vec<CategoryCount>,
    max_count: u64,
    options: BarOptions,
}

impl BarChart {
    pub fn new(canvas: ChartCanvas, data: Vec<CategoryCount>, options: BarOptions) -> Self {
        let max_count = data.iter().map(|c| c.count).max().unwrap_or(0);

        let canvas = if options.scale_fonts_with_width {
            let width = canvas.width();
            let title_chars = canvas.title().chars().count().max(1) as u32;
            let title_size = (3 * width) / (2 * title_chars);
            canvas
                .with_label_font(FontSpec::regular(width / 50))
                .with_title_font(FontSpec::bold(title_size))
        } else {
            canvas
        };

        tracing::debug!(
            categories = data.len(),
            max_count,
            label_font = canvas.label_font().size,
            "bar chart prepared"
        );

        Self {
            canvas,
            data,
            max_count,
            options,
        }
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn options(&self) -> &BarOptions {
        &self.options
    }

    /// Gap around each bar, a quarter of the label font size.
    fn padding(&self) -> f64 {
        (f64::from(self.canvas.label_font().size) / 4.0).ceil()
    }

    /// Pixels per count unit; zero when every count is zero.
    fn width_scale(&self) -> f64 {
        if self.max_count == 0 {
            return 0.0;
        }
        let frame = self.canvas.frame();
        let usable = f64::from(frame.width) - 2.0 * self.padding() - 2.0 * FRAME_STROKE;
        usable.max(0.0) / self.max_count as f64
    }

    /// Bar rectangles in display order.
    pub fn layout(&self) -> Vec<BarGeometry> {
        if self.data.is_empty() {
            return Vec::new();
        }
        let frame = self.canvas.frame();
        let padding = self.padding();
        let scale = self.width_scale();

        // full slot height includes one padding gap
        let usable = f64::from(frame.height) - padding - 2.0 * FRAME_STROKE;
        let slot = usable / self.data.len() as f64;
        let height = (slot - padding).max(0.0);
        let left = f64::from(frame.x) + FRAME_STROKE + padding;

        self.data
            .iter()
            .enumerate()
            .map(|(i, category)| BarGeometry {
                label: category.label.clone(),
                count: category.count,
                left,
                top: f64::from(frame.y) + FRAME_STROKE + i as f64 * slot + padding,
                width: category.count as f64 * scale,
                height,
            })
            .collect()
    }

    /// Tick step along the count axis.
    pub fn tick_step(&self) -> f64 {
        step_size_for_range(self.max_count as f64, self.options.max_ticks)
    }

    /// Count-axis tick values, starting at zero.
    pub fn tick_values(&self) -> Vec<f64> {
        tick_values(self.max_count as f64, self.tick_step())
    }

    fn draw_bars(&self, image: &mut RasterImage) {
        let theme = self.canvas.theme();
        let font = self.canvas.label_font();
        let padding = self.padding();
        let bar_style = PrimitiveStyleBuilder::new()
            .fill_color(self.options.bar_fill)
            .stroke_color(self.options.bar_stroke)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();

        for bar in self.layout() {
            let width = bar.width.round() as u32;
            if width > 0 {
                Rectangle::new(
                    Point::new(bar.left.round() as i32, bar.top.round() as i32),
                    Size::new(width, bar.height.round() as u32),
                )
                .into_styled(bar_style)
                .draw(image)
                .ok();
            }

            let middle = (bar.top + bar.height / 2.0).round() as i32;
            draw_text(
                image,
                &bar.label,
                Point::new((f64::from(self.canvas.frame().x) - padding) as i32, middle),
                font,
                theme.text,
                Alignment::Right,
                Baseline::Middle,
            );
            draw_text(
                image,
                &bar.count.to_string(),
                Point::new((bar.left + padding) as i32, middle),
                font,
                theme.text,
                Alignment::Left,
                Baseline::Middle,
            );
        }
    }

    fn draw_ticks(&self, image: &mut RasterImage) {
        let frame = self.canvas.frame();
        let theme = self.canvas.theme();
        let font = self.canvas.label_font();
        let origin = f64::from(frame.x) + FRAME_STROKE + self.padding();
        let scale = self.width_scale();

        tracing::debug!(step = self.tick_step(), "bar chart ticks");
        for value in self.tick_values() {
            let x = (origin + scale * value).round() as i32;
            draw_line(
                image,
                Point::new(x, frame.bottom()),
                Point::new(x, frame.bottom() + TICK_LENGTH),
                theme.text,
                1,
            );
            draw_text(
                image,
                &format_value(value),
                Point::new(x, frame.bottom() + TICK_LENGTH + 2),
                font,
                theme.text,
                Alignment::Center,
                Baseline::Top,
            );
        }
    }
}

impl Chart for BarChart {
    fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    fn draw_data(&self, image: &mut RasterImage) {
        if let Some(note) = &self.options.footnote {
            self.canvas.draw_footnote(image, note);
        }
        if self.data.is_empty() {
            return;
        }
        self.draw_bars(image);
        self.draw_ticks(image);
    }
}
