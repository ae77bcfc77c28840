//! Value-axis tick generation.

use crate::model::{AxisConfig, TickInfo};

/// Multipliers a "nice" step may take within one decade.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Share of sample values that must be whole numbers before a fractional
/// step is replaced by an integer one.
pub const INTEGER_PREFERENCE_THRESHOLD: f64 = 0.75;

/// Upper bound on generated ticks.
const MAX_TICKS: usize = 100;

const EPSILON: f64 = 1e-9;

/// Round `raw` to the nearest of {1, 2, 2.5, 5, 10} × 10ⁿ.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let base = 10f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nearest = NICE_STEPS
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - fraction)
                .abs()
                .partial_cmp(&(b - fraction).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(1.0);
    nearest * base
}

/// An integer step to use instead of a fractional `step`, when most of
/// `values` are whole numbers.
pub fn detect_step_preference(values: &[f64], step: f64) -> Option<f64> {
    if values.is_empty() || (step - step.round()).abs() < EPSILON {
        return None;
    }
    let whole = values
        .iter()
        .filter(|v| v.is_finite() && (*v - v.round()).abs() < 1e-3)
        .count();
    let ratio = whole as f64 / values.len() as f64;
    (ratio >= INTEGER_PREFERENCE_THRESHOLD).then(|| step.ceil().max(1.0))
}

fn snap(v: f64) -> f64 {
    let snapped = (v * 1e10).round() / 1e10;
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// Ticks for a value axis covering `data_min..=data_max`.
pub fn compute_value_ticks(axis: &AxisConfig, data_min: f64, data_max: f64, desired: usize) -> TickInfo {
    compute_ticks_with_samples(axis, data_min, data_max, desired, &[])
}

/// Like [`compute_value_ticks`], letting `samples` steer the step towards
/// integers (see [`detect_step_preference`]).
pub fn compute_ticks_with_samples(
    axis: &AxisConfig,
    data_min: f64,
    data_max: f64,
    desired: usize,
    samples: &[f64],
) -> TickInfo {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let (data_min, data_max) = (finite(data_min), finite(data_max));
    let desired = desired.max(2);

    // Auto-zero: positive data starts at 0; negative data keeps its minimum.
    let mut min = axis
        .min
        .unwrap_or(if data_min > 0.0 { 0.0 } else { data_min });
    let mut max = axis.max.unwrap_or(data_max);
    if max < min {
        std::mem::swap(&mut min, &mut max);
    }
    if (max - min).abs() < EPSILON {
        max = if min == 0.0 { 1.0 } else { min + min.abs() };
    }

    let mut step = match axis.major_unit.filter(|u| *u > 0.0 && u.is_finite()) {
        Some(unit) => unit,
        None => {
            let step = nice_step((max - min) / desired as f64);
            match detect_step_preference(samples, step) {
                Some(int_step) if int_step <= max - min => int_step,
                _ => step,
            }
        }
    };
    if (max - min) / step > (MAX_TICKS - 3) as f64 {
        step = nice_step((max - min) / desired as f64);
    }

    let start = if axis.min.is_some() {
        min
    } else {
        (min / step).floor() * step
    };
    // Stepping is anchored at `start`, which sits off the zero-based grid
    // when the minimum is explicit.
    let end = if axis.max.is_some() {
        max
    } else {
        start + ((max - start) / step - EPSILON).ceil() * step
    };

    let mut ticks = Vec::new();
    let mut i = 0usize;
    while i < MAX_TICKS {
        let value = start + step * i as f64;
        if value > end + step * EPSILON.max(1e-6) {
            break;
        }
        ticks.push(snap(value));
        i += 1;
    }
    // An explicit maximum off the step grid closes the axis itself.
    if ticks.last().is_some_and(|last| *last < max - step * 1e-6) {
        if ticks.len() >= MAX_TICKS {
            ticks.pop();
        }
        ticks.push(snap(max));
    }
    while ticks.len() < 2 {
        let next = ticks.last().map(|v| v + step).unwrap_or(start);
        ticks.push(snap(next));
    }

    let first = ticks[0];
    let last = ticks[ticks.len() - 1];
    TickInfo {
        min: first,
        max: last,
        step,
        span: last - first,
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto() -> AxisConfig {
        AxisConfig::default()
    }

    fn assert_covers(info: &TickInfo, lo: f64, hi: f64) {
        assert!(info.ticks.len() >= 2);
        assert!(info.ticks.iter().all(|t| t.is_finite()));
        assert!(info.ticks[0] <= lo + 1e-9, "{:?} does not cover {}", info.ticks, lo);
        assert!(*info.ticks.last().unwrap() >= hi - 1e-9, "{:?} does not cover {}", info.ticks, hi);
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.45), 0.5);
        assert_eq!(nice_step(1.4), 1.0);
        assert_eq!(nice_step(2.3), 2.5);
        assert_eq!(nice_step(17.0), 20.0);
        assert_eq!(nice_step(80.0), 100.0);
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(f64::NAN), 1.0);
    }

    #[test]
    fn test_bar_scenario() {
        let values = [4.3, 2.5, 3.5, 4.5];
        let info = compute_ticks_with_samples(&auto(), 2.5, 4.5, 10, &values);
        assert_eq!(info.step, 0.5);
        assert_eq!(info.ticks[0], 0.0);
        assert_eq!(*info.ticks.last().unwrap(), 4.5);
        assert_covers(&info, 0.0, 4.5);
    }

    #[test]
    fn test_integer_preference() {
        assert_eq!(detect_step_preference(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(1.0));
        assert_eq!(detect_step_preference(&[1.0, 2.5, 3.5, 4.5], 0.5), None);
        assert_eq!(detect_step_preference(&[1.0, 2.0], 2.0), None);

        let info = compute_ticks_with_samples(&auto(), 1.0, 5.0, 10, &[1.0, 3.0, 5.0]);
        assert_eq!(info.step, 1.0);
        assert_eq!(info.ticks, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_explicit_bounds() {
        let axis = AxisConfig {
            min: Some(10.0),
            max: Some(50.0),
            major_unit: Some(10.0),
            ..Default::default()
        };
        let info = compute_value_ticks(&axis, 12.0, 48.0, 10);
        assert_eq!(info.ticks, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(info.span, 40.0);
    }

    #[test]
    fn test_explicit_min_off_grid() {
        let axis = AxisConfig {
            min: Some(0.3),
            ..Default::default()
        };
        let info = compute_value_ticks(&axis, 1.0, 9.5, 10);
        assert_eq!(info.ticks[0], 0.3);
        assert_eq!(*info.ticks.last().unwrap(), 10.3);
        assert_covers(&info, 0.3, 9.5);
    }

    #[test]
    fn test_explicit_max_off_grid() {
        let axis = AxisConfig {
            min: Some(0.0),
            max: Some(10.0),
            major_unit: Some(3.0),
            ..Default::default()
        };
        let info = compute_value_ticks(&axis, 1.0, 8.0, 10);
        assert_eq!(info.ticks, vec![0.0, 3.0, 6.0, 9.0, 10.0]);
        assert_eq!(info.max, 10.0);
        assert_eq!(info.span, 10.0);
    }

    #[test]
    fn test_negative_data_keeps_minimum() {
        let info = compute_value_ticks(&auto(), -3.2, 7.9, 10);
        assert_covers(&info, -3.2, 7.9);
        assert!(info.ticks[0] < 0.0);
    }

    #[test]
    fn test_degenerate_ranges() {
        assert_covers(&compute_value_ticks(&auto(), 0.0, 0.0, 10), 0.0, 0.0);
        assert_covers(&compute_value_ticks(&auto(), 5.0, 5.0, 10), 0.0, 5.0);
        assert_covers(&compute_value_ticks(&auto(), f64::NAN, f64::INFINITY, 10), 0.0, 0.0);
        assert_covers(&compute_value_ticks(&auto(), -5.0, -5.0, 10), -5.0, -5.0);
    }

    #[test]
    fn test_tiny_major_unit_capped() {
        let axis = AxisConfig {
            major_unit: Some(0.001),
            ..Default::default()
        };
        let info = compute_value_ticks(&axis, 0.0, 1000.0, 10);
        assert!(info.ticks.len() <= MAX_TICKS);
        assert_covers(&info, 0.0, 1000.0);
    }

    #[test]
    fn test_ticks_cover_many_ranges() {
        let ranges = [(0.1, 0.7), (3.0, 97.0), (0.0, 1e6), (-1e-3, 1e-3), (12.5, 12.75), (-100.0, -1.0)];
        for (lo, hi) in ranges {
            for desired in [2, 5, 10] {
                let info = compute_value_ticks(&auto(), lo, hi, desired);
                assert_covers(&info, lo.min(0.0), hi);
            }
        }
    }
}
