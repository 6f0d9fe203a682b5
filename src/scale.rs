//! # Axis Step Selection
//!
//! Picks "nice" tick spacing for value axes. Steps are always drawn from the
//! sequence `1, 2, 5, 10, 20, 50, 100, ...` so labels stay round numbers no
//! matter how large the counts get.

/// Multiples tried within each power of ten, smallest first.
const STEP_MULTIPLES: [f64; 3] = [1.0, 2.0, 5.0];

/// Smallest step from `{1, 2, 5} × 10^k` such that `ceil(range / step) <= max_steps`.
///
/// A zero (or non-finite, or negative) range gets step `1`. A `max_steps` of
/// zero is treated as one step.
///
/// # Example
/// ```
/// use songchart::scale::step_size_for_range;
///
/// assert_eq!(step_size_for_range(40.0, 5), 10.0);
/// assert_eq!(step_size_for_range(0.0, 10), 1.0);
/// ```
pub fn step_size_for_range(range: f64, max_steps: u32) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }
    let max_steps = f64::from(max_steps.max(1));

    let mut exponent = 0;
    loop {
        let magnitude = 10f64.powi(exponent);
        for multiple in STEP_MULTIPLES {
            let step = multiple * magnitude;
            if (range / step).ceil() <= max_steps {
                return step;
            }
        }
        exponent += 1;
    }
}

/// Tick values `0, step, 2·step, ...` up to and including `range`.
///
/// Always yields at least the zero tick.
pub fn tick_values(range: f64, step: f64) -> Vec<f64> {
    let mut ticks = vec![0.0];
    if step.is_nan() || step <= 0.0 || !range.is_finite() {
        return ticks;
    }
    let mut index = 1u32;
    loop {
        let value = f64::from(index) * step;
        if value > range {
            break;
        }
        ticks.push(value);
        index += 1;
    }
    ticks
}

/// Format an axis or bar value: whole numbers without decimals, anything else
/// with one decimal place.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The candidate sequence in ascending order, for checking minimality.
    fn candidates() -> Vec<f64> {
        let mut steps = Vec::new();
        for exponent in 0..8 {
            for multiple in STEP_MULTIPLES {
                steps.push(multiple * 10f64.powi(exponent));
            }
        }
        steps
    }

    #[test]
    fn test_known_steps() {
        assert_eq!(step_size_for_range(40.0, 5), 10.0);
        assert_eq!(step_size_for_range(40.0, 10), 5.0);
        assert_eq!(step_size_for_range(9.0, 10), 1.0);
        assert_eq!(step_size_for_range(11.0, 10), 2.0);
        assert_eq!(step_size_for_range(1234.0, 10), 200.0);
        assert_eq!(step_size_for_range(0.5, 10), 1.0);
    }

    #[test]
    fn test_zero_range() {
        assert_eq!(step_size_for_range(0.0, 10), 1.0);
        assert_eq!(step_size_for_range(f64::NAN, 10), 1.0);
    }

    #[test]
    fn test_step_is_smallest_valid_candidate() {
        let candidates = candidates();
        for range in [1.0, 3.0, 7.5, 19.0, 20.0, 21.0, 99.0, 101.0, 4999.0, 123_456.0] {
            for max_steps in [1, 2, 3, 5, 7, 10] {
                let step = step_size_for_range(range, max_steps);
                let position = candidates
                    .iter()
                    .position(|c| *c == step)
                    .expect("step must come from the 1-2-5 sequence");

                assert!((range / step).ceil() <= f64::from(max_steps));
                if position > 0 {
                    let smaller = candidates[position - 1];
                    assert!(
                        (range / smaller).ceil() > f64::from(max_steps),
                        "range {} max_steps {}: {} would also fit",
                        range,
                        max_steps,
                        smaller
                    );
                }
            }
        }
    }

    #[test]
    fn test_tick_values() {
        assert_eq!(tick_values(40.0, 10.0), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(tick_values(39.0, 10.0), vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(tick_values(0.0, 1.0), vec![0.0]);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.0), "0");
    }
}
