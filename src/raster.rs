//! # Raster Image Buffer
//!
//! The pixel surface every chart renders into. [`RasterImage`] owns an 8-bit
//! RGBA buffer, acts as an `embedded-graphics` draw target, and encodes itself
//! as PNG.
//!
//! Heatmap cells are written straight into pixel memory with a bottom-left
//! origin (row 0 is the *latest* time of day, drawn at the top). That flip
//! lives in [`pixel_index_for`] and nowhere else.

use std::convert::Infallible;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::Rectangle};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::{color::to_raster_color, ChartResult};

/// Bytes per RGBA pixel.
const CHANNELS: usize = 4;

/// An owned RGBA pixel buffer of fixed size.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// A `width × height` image filled with an opaque colour.
    pub fn new(width: u32, height: u32, fill: Rgb888) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([fill.r(), fill.g(), fill.b(), 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at top-left-origin coordinates, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Borrow the underlying `image` buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Write one pixel; points outside the image are dropped.
    pub fn put_pixel(&mut self, point: Point, value: Rgba<u8>) {
        if let Some((x, y)) = self.checked(point) {
            self.pixels.put_pixel(x, y, value);
        }
    }

    fn checked(&self, point: Point) -> Option<(u32, u32)> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    /// A draw target that blends everything drawn through it over the current
    /// pixels at `opacity`.
    pub fn translucent(&mut self, opacity: f64) -> Translucent<'_> {
        Translucent {
            image: self,
            opacity,
        }
    }

    /// Copy `area` out into a standalone grid. Parts of `area` outside the
    /// image come back transparent black.
    pub fn read_region(&self, area: Rectangle) -> PixelGrid {
        let mut grid = PixelGrid::new(area.size.width, area.size.height);
        for row in 0..area.size.height {
            for column in 0..area.size.width {
                let source = area.top_left + Point::new(column as i32, row as i32);
                if let Some((x, y)) = self.checked(source) {
                    let start = (row as usize * grid.width as usize + column as usize) * CHANNELS;
                    let value = &self.pixels.get_pixel(x, y).0;
                    grid.data[start..start + CHANNELS].copy_from_slice(value);
                }
            }
        }
        grid
    }

    /// Paste `grid` back with its top-left corner at `top_left`.
    pub fn write_region(&mut self, grid: &PixelGrid, top_left: Point) {
        for row in 0..grid.height {
            for column in 0..grid.width {
                let start = (row as usize * grid.width as usize + column as usize) * CHANNELS;
                let mut value = [0u8; CHANNELS];
                value.copy_from_slice(&grid.data[start..start + CHANNELS]);
                self.put_pixel(top_left + Point::new(column as i32, row as i32), Rgba(value));
            }
        }
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn to_png_bytes(&self) -> ChartResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    /// Encode as PNG and write to `path`.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> ChartResult<()> {
        let bytes = self.to_png_bytes()?;
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.as_ref().display(), "wrote chart image");
        Ok(())
    }
}

impl OriginDimensions for RasterImage {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for RasterImage {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put_pixel(point, Rgba([color.r(), color.g(), color.b(), 255]));
        }
        Ok(())
    }
}

/// Blending view over a [`RasterImage`], see [`RasterImage::translucent`].
pub struct Translucent<'a> {
    image: &'a mut RasterImage,
    opacity: f64,
}

impl OriginDimensions for Translucent<'_> {
    fn size(&self) -> Size {
        self.image.size()
    }
}

impl DrawTarget for Translucent<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let Some((x, y)) = self.image.checked(point) else {
                continue;
            };
            let [r, g, b, _] = self.image.pixels.get_pixel(x, y).0;
            let blended = to_raster_color(color, self.opacity, Some(Rgb888::new(r, g, b)));
            self.image.pixels.put_pixel(x, y, blended);
        }
        Ok(())
    }
}

/// Byte offset of pixel `(x, y)` in a `width × height` RGBA buffer stored
/// top row first, where `(0, 0)` is the **bottom-left** pixel.
///
/// Returns `None` for coordinates outside the buffer.
///
/// # Example
/// ```
/// use songchart::raster::pixel_index_for;
///
/// // Bottom-left pixel of a 3x2 buffer lives at the start of the last row.
/// assert_eq!(pixel_index_for(0, 0, 3, 2), Some(12));
/// assert_eq!(pixel_index_for(0, 1, 3, 2), Some(0));
/// assert_eq!(pixel_index_for(3, 0, 3, 2), None);
/// ```
pub fn pixel_index_for(x: u32, y: u32, width: u32, height: u32) -> Option<usize> {
    if x >= width || y >= height {
        return None;
    }
    let row = (height - 1 - y) as usize;
    Some((row * width as usize + x as usize) * CHANNELS)
}

/// A detached block of RGBA pixels, addressed from the bottom-left.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the pixel `x` columns right and `y` rows up from the bottom-left
    /// corner. Returns false (and writes nothing) outside the grid.
    pub fn plot_from_bottom_left(&mut self, x: u32, y: u32, value: Rgba<u8>) -> bool {
        match pixel_index_for(x, y, self.width, self.height) {
            Some(start) => {
                self.data[start..start + CHANNELS].copy_from_slice(&value.0);
                true
            }
            None => false,
        }
    }

    /// Read back a pixel with the same addressing as [`Self::plot_from_bottom_left`].
    pub fn get_from_bottom_left(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let start = pixel_index_for(x, y, self.width, self.height)?;
        let mut value = [0u8; CHANNELS];
        value.copy_from_slice(&self.data[start..start + CHANNELS]);
        Some(Rgba(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_new_image_is_filled() {
        let image = RasterImage::new(4, 3, Rgb888::new(1, 2, 3));
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.pixel(3, 2), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn test_draw_clips_out_of_bounds() {
        let mut image = RasterImage::new(5, 5, Rgb888::WHITE);
        Line::new(Point::new(-3, 2), Point::new(10, 2))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::BLACK, 1))
            .draw(&mut image)
            .ok();
        for x in 0..5 {
            assert_eq!(image.pixel(x, 2), Some(Rgba([0, 0, 0, 255])));
        }
        assert_eq!(image.pixel(0, 1), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_translucent_blends_over_existing_pixels() {
        let mut image = RasterImage::new(3, 3, Rgb888::WHITE);
        Pixel(Point::new(1, 1), Rgb888::BLACK)
            .draw(&mut image.translucent(0.5))
            .ok();
        assert_eq!(image.pixel(1, 1), Some(Rgba([128, 128, 128, 255])));
        assert_eq!(image.pixel(0, 0), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_pixel_index_flips_rows() {
        // 2x3 buffer: y=0 is the last row
        assert_eq!(pixel_index_for(0, 0, 2, 3), Some(16));
        assert_eq!(pixel_index_for(1, 0, 2, 3), Some(20));
        assert_eq!(pixel_index_for(1, 2, 2, 3), Some(4));
        assert_eq!(pixel_index_for(0, 3, 2, 3), None);
    }

    #[test]
    fn test_region_roundtrip_keeps_orientation() {
        let mut image = RasterImage::new(6, 6, Rgb888::WHITE);
        let area = Rectangle::new(Point::new(1, 1), Size::new(4, 4));
        let mut grid = image.read_region(area);
        assert!(grid.plot_from_bottom_left(0, 0, Rgba([9, 9, 9, 255])));
        assert!(!grid.plot_from_bottom_left(4, 0, Rgba([9, 9, 9, 255])));
        assert_eq!(grid.get_from_bottom_left(0, 0), Some(Rgba([9, 9, 9, 255])));
        assert_eq!(grid.get_from_bottom_left(0, 3), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(grid.get_from_bottom_left(0, 4), None);
        image.write_region(&grid, area.top_left);

        // bottom-left of the region is canvas (1, 4)
        assert_eq!(image.pixel(1, 4), Some(Rgba([9, 9, 9, 255])));
        assert_eq!(image.pixel(1, 1), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let image = RasterImage::new(7, 5, Rgb888::new(10, 20, 30));
        let bytes = image.to_png_bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 7);
        assert_eq!(decoded.height(), 5);
        assert!(decoded.color().has_alpha());
    }
}
