//! # Chart Canvas
//!
//! Shared state and drawing steps for every chart type. A [`ChartCanvas`]
//! holds the canvas size, margins, the derived plot frame, the title and the
//! colour theme. Concrete charts hold one and implement [`Chart`]; the default
//! [`Chart::render`] runs the two shared steps (background + title, then the
//! inner frame) before handing over to the chart's own data drawing.

use std::convert::Infallible;
use std::path::Path;

use embedded_graphics::{
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use serde::{Deserialize, Serialize};

use crate::{raster::RasterImage, ChartError, ChartResult};

/// Pixel insets from each canvas edge to the plot frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl Margins {
    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::new(60, 60, 90, 40)
    }
}

/// The inner rectangle data is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotFrame {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PlotFrame {
    pub fn rectangle(&self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    /// First row below the frame.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// First column right of the frame.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }
}

/// Canvas colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Whole-canvas fill behind everything
    pub background: Rgb888,
    /// Plot frame fill
    pub foreground: Rgb888,
    pub text: Rgb888,
    /// Plot frame border
    pub frame: Rgb888,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Rgb888::new(230, 230, 230),
            foreground: Rgb888::new(245, 245, 230),
            text: Rgb888::BLACK,
            frame: Rgb888::new(100, 100, 100),
        }
    }
}

/// Requested text size. The family is always the built-in bitmap mono font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Maximum glyph height in pixels
    pub size: u32,
    #[serde(default)]
    pub bold: bool,
}

/// Regular bitmap fonts by glyph height, ascending.
const REGULAR_FONTS: [(u32, &MonoFont<'static>); 11] = [
    (6, &ascii::FONT_4X6),
    (7, &ascii::FONT_5X7),
    (8, &ascii::FONT_5X8),
    (9, &ascii::FONT_6X9),
    (10, &ascii::FONT_6X10),
    (12, &ascii::FONT_6X12),
    (13, &ascii::FONT_7X13),
    (14, &ascii::FONT_7X14),
    (15, &ascii::FONT_9X15),
    (18, &ascii::FONT_9X18),
    (20, &ascii::FONT_10X20),
];

const BOLD_FONTS: [(u32, &MonoFont<'static>); 4] = [
    (13, &ascii::FONT_7X13_BOLD),
    (14, &ascii::FONT_7X14_BOLD),
    (15, &ascii::FONT_9X15_BOLD),
    (18, &ascii::FONT_9X18_BOLD),
];

impl FontSpec {
    pub const fn regular(size: u32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: u32) -> Self {
        Self { size, bold: true }
    }

    /// Largest bitmap font whose glyphs are no taller than `size`.
    ///
    /// Bold falls back to regular at sizes with no bold cut.
    pub fn mono_font(&self) -> &'static MonoFont<'static> {
        let pick = |fonts: &[(u32, &'static MonoFont<'static>)]| {
            fonts
                .iter()
                .rev()
                .find(|(height, _)| *height <= self.size)
                .map(|(_, font)| *font)
        };

        let bold = if self.bold && self.size < 20 {
            pick(&BOLD_FONTS[..])
        } else {
            None
        };
        bold.or_else(|| pick(&REGULAR_FONTS[..]))
            .unwrap_or(REGULAR_FONTS[0].1)
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        let font = self.mono_font();
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        count * font.character_size.width + (count - 1) * font.character_spacing
    }

    /// Rendered glyph height in pixels.
    pub fn line_height(&self) -> u32 {
        self.mono_font().character_size.height
    }
}

/// Canvas state shared by every chart type.
#[derive(Clone, Debug)]
pub struct ChartCanvas {
    width: u32,
    height: u32,
    title: String,
    margins: Margins,
    frame: PlotFrame,
    theme: Theme,
    title_font: FontSpec,
    label_font: FontSpec,
}

impl ChartCanvas {
    /// Validate the geometry and derive the plot frame.
    ///
    /// Fails when either dimension is zero or the margins leave no room.
    ///
    /// # Example
    /// ```
    /// use songchart::canvas::{ChartCanvas, Margins};
    ///
    /// let canvas = ChartCanvas::new(800, 600, "Robin", Margins::default()).unwrap();
    /// assert_eq!(canvas.frame().width, 700);
    /// assert!(ChartCanvas::new(100, 100, "x", Margins::new(0, 60, 0, 40)).is_err());
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        title: impl Into<String>,
        margins: Margins,
    ) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidCanvas { width, height });
        }
        let horizontal = margins.left.saturating_add(margins.right);
        let vertical = margins.top.saturating_add(margins.bottom);
        if horizontal >= width || vertical >= height {
            return Err(ChartError::InvalidMargins {
                horizontal,
                vertical,
                width,
                height,
            });
        }

        let frame = PlotFrame {
            x: margins.left as i32,
            y: margins.top as i32,
            width: width - horizontal,
            height: height - vertical,
        };

        Ok(Self {
            width,
            height,
            title: title.into(),
            margins,
            frame,
            theme: Theme::default(),
            title_font: FontSpec::bold(20),
            label_font: FontSpec::regular(12),
        })
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_title_font(mut self, font: FontSpec) -> Self {
        self.title_font = font;
        self
    }

    pub fn with_label_font(mut self, font: FontSpec) -> Self {
        self.label_font = font;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn frame(&self) -> PlotFrame {
        self.frame
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn title_font(&self) -> FontSpec {
        self.title_font
    }

    pub fn label_font(&self) -> FontSpec {
        self.label_font
    }

    /// Fresh image of the canvas size, filled with the background colour.
    pub fn blank_image(&self) -> RasterImage {
        RasterImage::new(self.width, self.height, self.theme.background)
    }

    /// Fill the background and centre the title in the top margin.
    pub fn draw_title_and_background(&self, image: &mut RasterImage) {
        fill_rect(
            image,
            Rectangle::new(Point::zero(), Size::new(self.width, self.height)),
            self.theme.background,
        );
        draw_text(
            image,
            &self.title,
            Point::new(self.width as i32 / 2, self.margins.top as i32 / 2),
            self.title_font,
            self.theme.text,
            Alignment::Center,
            Baseline::Middle,
        );
    }

    /// Fill the plot frame and draw its 1px border inside the frame rectangle.
    pub fn draw_inner_frame(&self, image: &mut RasterImage) {
        let style = PrimitiveStyleBuilder::new()
            .fill_color(self.theme.foreground)
            .stroke_color(self.theme.frame)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        self.frame.rectangle().into_styled(style).draw(image).ok();
    }

    /// Right-aligned note in the middle of the bottom margin.
    pub fn draw_footnote(&self, image: &mut RasterImage, note: &str) {
        let y = self.height as i32 - self.margins.bottom as i32 / 2;
        draw_text(
            image,
            note,
            Point::new(self.width as i32 - self.margins.right as i32, y),
            self.label_font,
            self.theme.text,
            Alignment::Right,
            Baseline::Middle,
        );
    }
}

/// A renderable chart.
///
/// Implementors provide their canvas and the data-drawing step; rendering and
/// encoding come for free.
pub trait Chart {
    fn canvas(&self) -> &ChartCanvas;

    /// Draw the chart's data, axes and labels onto an image that already has
    /// its background, title and plot frame.
    fn draw_data(&self, image: &mut RasterImage);

    /// Render the complete chart into a new image.
    fn render(&self) -> RasterImage {
        let canvas = self.canvas();
        let mut image = canvas.blank_image();
        canvas.draw_title_and_background(&mut image);
        canvas.draw_inner_frame(&mut image);
        self.draw_data(&mut image);
        tracing::debug!(
            title = canvas.title(),
            width = canvas.width(),
            height = canvas.height(),
            "rendered chart"
        );
        image
    }

    /// Render and encode as PNG bytes.
    fn to_png_bytes(&self) -> ChartResult<Vec<u8>> {
        self.render().to_png_bytes()
    }

    /// Render and write a PNG file.
    fn write_png(&self, path: &Path) -> ChartResult<()> {
        self.render().write_png(path)
    }
}

/// Draw `text` anchored at `position` with the given alignment and baseline.
pub(crate) fn draw_text<D>(
    target: &mut D,
    text: &str,
    position: Point,
    font: FontSpec,
    color: Rgb888,
    alignment: Alignment,
    baseline: Baseline,
) where
    D: DrawTarget<Color = Rgb888, Error = Infallible>,
{
    let character_style = MonoTextStyle::new(font.mono_font(), color);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    Text::with_text_style(text, position, character_style, text_style)
        .draw(target)
        .ok();
}

pub(crate) fn fill_rect<D>(target: &mut D, area: Rectangle, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888, Error = Infallible>,
{
    area.into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
        .ok();
}

pub(crate) fn draw_line<D>(target: &mut D, from: Point, to: Point, color: Rgb888, width: u32)
where
    D: DrawTarget<Color = Rgb888, Error = Infallible>,
{
    Line::new(from, to)
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)
        .ok();
}

/// Rectangle spanning two corners given in any order, both inclusive.
pub(crate) fn rect_between(a: Point, b: Point) -> Rectangle {
    Rectangle::with_corners(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn rgba(color: Rgb888) -> Rgba<u8> {
        Rgba([color.r(), color.g(), color.b(), 255])
    }

    #[test]
    fn test_frame_from_margins() {
        let canvas = ChartCanvas::new(800, 600, "t", Margins::new(50, 170, 40, 20)).unwrap();
        assert_eq!(
            canvas.frame(),
            PlotFrame {
                x: 170,
                y: 50,
                width: 610,
                height: 510
            }
        );
        assert_eq!(canvas.frame().bottom(), 560);
        assert_eq!(canvas.frame().right(), 780);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(matches!(
            ChartCanvas::new(0, 10, "t", Margins::new(0, 0, 0, 0)),
            Err(ChartError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            ChartCanvas::new(100, 100, "t", Margins::new(10, 50, 10, 50)),
            Err(ChartError::InvalidMargins { .. })
        ));
        assert!(matches!(
            ChartCanvas::new(100, 100, "t", Margins::new(60, 10, 40, 10)),
            Err(ChartError::InvalidMargins { .. })
        ));
    }

    #[test]
    fn test_font_selection() {
        assert_eq!(FontSpec::regular(12).line_height(), 12);
        assert_eq!(FontSpec::regular(11).line_height(), 10);
        assert_eq!(FontSpec::regular(2).line_height(), 6);
        assert_eq!(FontSpec::regular(64).line_height(), 20);
        assert_eq!(FontSpec::bold(16).line_height(), 15);
        assert_eq!(FontSpec::bold(10).line_height(), 10);
        assert_eq!(FontSpec::regular(10).text_width("abc"), 18);
        assert_eq!(FontSpec::regular(10).text_width(""), 0);
    }

    struct FrameOnly(ChartCanvas);

    impl Chart for FrameOnly {
        fn canvas(&self) -> &ChartCanvas {
            &self.0
        }

        fn draw_data(&self, _image: &mut RasterImage) {}
    }

    #[test]
    fn test_shared_steps() {
        let canvas = ChartCanvas::new(200, 120, "Title", Margins::new(30, 20, 20, 10)).unwrap();
        let theme = *canvas.theme();
        let image = FrameOnly(canvas).render();

        assert_eq!(image.pixel(0, 119), Some(rgba(theme.background)));
        // border on the frame edge, fill inside
        assert_eq!(image.pixel(20, 30), Some(rgba(theme.frame)));
        assert_eq!(image.pixel(189, 99), Some(rgba(theme.frame)));
        assert_eq!(image.pixel(100, 60), Some(rgba(theme.foreground)));
        assert_eq!(image.pixel(190, 60), Some(rgba(theme.background)));

        // some title text landed in the top margin
        let title_pixels = (0..200)
            .flat_map(|x| (0..30).map(move |y| (x, y)))
            .filter(|(x, y)| image.pixel(*x, *y) == Some(rgba(theme.text)))
            .count();
        assert!(title_pixels > 0);
    }
}
