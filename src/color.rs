//! # Colour Blending
//!
//! Turns a colour plus a fractional opacity into raster-ready 8-bit RGBA,
//! optionally flattened over a background. Also holds the colour-string parsing
//! used by the configuration file and the default year palette.

use std::fmt;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::{ChartError, ChartResult};

/// Year colours for multi-year line charts, cycled when there are more years.
pub const DEFAULT_PALETTE: [Rgb888; 3] = [
    Rgb888::new(223, 193, 98),
    Rgb888::new(100, 200, 100),
    Rgb888::new(100, 150, 220),
];

/// Convert `color` at `opacity` into 0..=255 RGBA channels.
///
/// With a `background`, the colour is composited over it (alpha over opaque)
/// and the result is fully opaque. Without one, the colour keeps its channels
/// and `a = round(opacity × 255)`. Opacity is clamped to `[0, 1]`; NaN counts
/// as fully transparent.
///
/// # Example
/// ```
/// use embedded_graphics::pixelcolor::Rgb888;
/// use songchart::color::to_raster_color;
///
/// let px = to_raster_color(Rgb888::new(0, 0, 0), 0.5, Some(Rgb888::new(255, 255, 255)));
/// assert_eq!(px.0, [128, 128, 128, 255]);
/// ```
pub fn to_raster_color(color: Rgb888, opacity: f64, background: Option<Rgb888>) -> Rgba<u8> {
    let alpha = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };

    match background {
        Some(bg) => {
            let over =
                |fg: u8, bg: u8| channel(f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha));
            Rgba([
                over(color.r(), bg.r()),
                over(color.g(), bg.g()),
                over(color.b(), bg.b()),
                255,
            ])
        }
        None => Rgba([color.r(), color.g(), color.b(), channel(alpha * 255.0)]),
    }
}

/// Round and clamp a channel value into `0..=255`.
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Lighten every channel by `percent` of full scale, saturating at 255.
pub fn brighten(color: Rgb888, percent: f64) -> Rgb888 {
    let delta = (255.0 * percent / 100.0).round();
    let lift = |c: u8| channel(f64::from(c) + delta);
    Rgb888::new(lift(color.r()), lift(color.g()), lift(color.b()))
}

/// Colour for the `index`-th series, cycling through `palette`.
///
/// An empty palette falls back to [`DEFAULT_PALETTE`].
pub fn palette_color(palette: &[Rgb888], index: usize) -> Rgb888 {
    if palette.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
    } else {
        palette[index % palette.len()]
    }
}

/// Parse `"rgb(r,g,b)"` or `"#rrggbb"`.
pub fn parse_color(text: &str) -> ChartResult<Rgb888> {
    let trimmed = text.trim();
    let invalid = || ChartError::InvalidColor(text.to_string());

    if let Some(hex) = trimmed.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let part = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        return Ok(Rgb888::new(part(0..2)?, part(2..4)?, part(4..6)?));
    }

    let inner = trimmed
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let channels = inner
        .split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    match channels.as_slice() {
        [r, g, b] => Ok(Rgb888::new(*r, *g, *b)),
        _ => Err(invalid()),
    }
}

/// A colour as written in the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorSpec(pub Rgb888);

impl TryFrom<String> for ColorSpec {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_color(&value).map(ColorSpec)
    }
}

impl From<ColorSpec> for String {
    fn from(value: ColorSpec) -> Self {
        value.to_string()
    }
}

impl From<Rgb888> for ColorSpec {
    fn from(value: Rgb888) -> Self {
        ColorSpec(value)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0.r(), self.0.g(), self.0.b())
    }
}
