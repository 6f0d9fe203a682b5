//! Sunrise & sunset from the low-precision solar position
//!
//! Standard sunrise equation: mean anomaly → equation of centre → ecliptic
//! longitude → declination → hour angle at the horizon, with the usual
//! -0.833° correction for refraction and the solar disc.
//! Accuracy: about a minute at mid latitudes, worse close to the polar circles.

use core::f64::consts::PI;

use chrono::{DateTime, Utc};

use crate::GeoPoint;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Julian date of the Unix epoch
const J1970: f64 = 2_440_588.0;
/// Julian date of 2000-01-01 12:00 TT
const J2000: f64 = 2_451_545.0;
/// Fractional day offset of the mean solar transit
const J0: f64 = 0.0009;
/// Obliquity of the ecliptic
const OBLIQUITY_DEG: f64 = 23.4397;
/// Sun altitude at apparent sunrise/sunset
const HORIZON_DEG: f64 = -0.833;

/// Sunrise and sunset instants for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Sunrise and sunset for the solar day nearest `instant` at `location`.
///
/// Returns `None` when the sun never crosses the horizon that day (polar day
/// or polar night).
pub fn sunrise_sunset(instant: DateTime<Utc>, location: GeoPoint) -> Option<SunTimes> {
    let rad = PI / 180.0;
    let lw = -location.longitude * rad; // west longitude
    let phi = location.latitude * rad;

    // ---------- 1. Days since J2000 and the nearest Julian cycle -------------
    let julian = instant.timestamp_millis() as f64 / MILLIS_PER_DAY - 0.5 + J1970;
    let d = julian - J2000;
    let cycle = (d - J0 - lw / (2.0 * PI)).round();
    let ds = approx_transit(0.0, lw, cycle);

    // ---------- 2. Mean anomaly & ecliptic longitude --------------------------
    let m = (357.5291 + 0.985_600_28 * ds) * rad;
    let centre = (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()) * rad;
    let perihelion = 102.9372 * rad;
    let l = m + centre + perihelion + PI;

    // ---------- 3. Declination (ecliptic latitude taken as zero) --------------
    let dec = ((OBLIQUITY_DEG * rad).sin() * l.sin()).asin();

    // ---------- 4. Solar noon, then the hour angle at the horizon -------------
    let transit = |day: f64| J2000 + day + 0.0053 * m.sin() - 0.0069 * (2.0 * l).sin();
    let noon = transit(ds);

    let cos_w = ((HORIZON_DEG * rad).sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());
    if !(-1.0..=1.0).contains(&cos_w) {
        return None; // sun stays above or below the horizon
    }
    let w = cos_w.acos();

    // ---------- 5. Set from the hour angle, rise mirrored around noon ---------
    let set = transit(approx_transit(w, lw, cycle));
    let rise = noon - (set - noon);

    Some(SunTimes {
        sunrise: from_julian(rise)?,
        sunset: from_julian(set)?,
    })
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let millis = ((julian + 0.5 - J1970) * MILLIS_PER_DAY).round();
    DateTime::from_timestamp_millis(millis as i64)
}
