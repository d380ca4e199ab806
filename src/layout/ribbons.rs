use crate::ir::Label;

use super::bands::BandLayout;
use super::transitions::TransitionMatrix;
use super::{Band, Point, Ribbon};

/// Samples held at each end of the step before smoothing.
pub const STEP_SAMPLES: usize = 50;
/// Width of the box kernel; each weight is `1 / KERNEL_WIDTH`.
pub const KERNEL_WIDTH: usize = 20;
pub const SMOOTHING_PASSES: usize = 2;
/// 100 -> 81 -> 62.
pub const CENTERLINE_POINTS: usize = 2 * STEP_SAMPLES - SMOOTHING_PASSES * (KERNEL_WIDTH - 1);

/// Per-band consumption cursors for one ribbon pass.
///
/// Starts at the centered sub-bar origins and moves up by each ribbon's
/// thickness as flows are placed, so ribbons stack bottom-up in partner order.
struct Cursors {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Cursors {
    fn new<L>(bands: &[Band<L>]) -> Self {
        Self {
            left: bands.iter().map(|band| band.left_bottom).collect(),
            right: bands.iter().map(|band| band.right_bottom).collect(),
        }
    }

    /// Returns the current origins for `from -> to` and advances both.
    fn take(&mut self, from_idx: usize, to_idx: usize, thickness: f64) -> (f64, f64) {
        let origins = (self.left[from_idx], self.right[to_idx]);
        self.left[from_idx] += thickness;
        self.right[to_idx] += thickness;
        origins
    }
}

/// Builds one ribbon per nonzero transition.
///
/// Cells are visited row by row in label order. `right_color` keys each
/// ribbon's color on its target label instead of its source.
pub fn generate_ribbons<L: Label>(
    matrix: &TransitionMatrix<L>,
    layout: &BandLayout<L>,
    right_color: bool,
) -> Vec<Ribbon<L>> {
    let labels = matrix.labels();
    let mut cursors = Cursors::new(&layout.bands);
    let mut ribbons = Vec::new();

    for (from_idx, to_idx, count) in matrix.nonzero() {
        let thickness = count as f64;
        let (left_origin, right_origin) = cursors.take(from_idx, to_idx, thickness);
        let ys = smooth_step(left_origin + 0.5 * thickness, right_origin + 0.5 * thickness);
        let centerline = spread_over(&ys, layout.x_max);
        let source = labels[from_idx].clone();
        let target = labels[to_idx].clone();
        let color_key = if right_color {
            target.clone()
        } else {
            source.clone()
        };
        tracing::trace!(
            source = %source,
            target = %target,
            count,
            left_origin,
            right_origin,
            "placed ribbon"
        );
        ribbons.push(Ribbon {
            source,
            target,
            count,
            thickness,
            left_origin,
            right_origin,
            color_key,
            color: None,
            centerline,
        });
    }

    ribbons
}

/// Two box-filter passes over a step from `left` to `right`.
///
/// A single pass turns the step into a linear ramp with hard corners; the
/// second rounds those corners into an S-curve.
pub fn smooth_step(left: f64, right: f64) -> Vec<f64> {
    let mut ys = Vec::with_capacity(2 * STEP_SAMPLES);
    ys.extend(std::iter::repeat_n(left, STEP_SAMPLES));
    ys.extend(std::iter::repeat_n(right, STEP_SAMPLES));
    let kernel = [1.0 / KERNEL_WIDTH as f64; KERNEL_WIDTH];
    for _ in 0..SMOOTHING_PASSES {
        ys = convolve_valid(&ys, &kernel);
    }
    ys
}

/// Discrete convolution restricted to full kernel overlap.
///
/// Output length is `signal.len() - kernel.len() + 1`, or empty when the
/// kernel does not fit.
pub fn convolve_valid(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if kernel.is_empty() || signal.len() < kernel.len() {
        return Vec::new();
    }
    signal
        .windows(kernel.len())
        .map(|window| {
            window
                .iter()
                .zip(kernel.iter().rev())
                .map(|(sample, weight)| sample * weight)
                .sum()
        })
        .collect()
}

/// Pairs samples with evenly spaced x positions over `[0, x_max]`.
fn spread_over(ys: &[f64], x_max: f64) -> Vec<Point> {
    let last = ys.len().saturating_sub(1);
    if last == 0 {
        return ys.iter().map(|&y| (0.0, y)).collect();
    }
    let step = x_max / last as f64;
    ys.iter()
        .enumerate()
        .map(|(idx, &y)| {
            let x = if idx == last { x_max } else { idx as f64 * step };
            (x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Observations;
    use crate::layout::bands::layout_bands;

    fn ribbons_for(
        before: Vec<&'static str>,
        after: Vec<&'static str>,
        order: &[&'static str],
        right_color: bool,
    ) -> (BandLayout<&'static str>, Vec<Ribbon<&'static str>>) {
        let obs = Observations::new(before, after).unwrap();
        let matrix = TransitionMatrix::aggregate(&obs, order).unwrap();
        let layout = layout_bands(&matrix, 4.0);
        let ribbons = generate_ribbons(&matrix, &layout, right_color);
        (layout, ribbons)
    }

    #[test]
    fn valid_convolution_shrinks_by_kernel_minus_one() {
        let out = convolve_valid(&[1.0, 2.0, 3.0, 4.0], &[0.5, 0.5]);
        assert_eq!(out, vec![1.5, 2.5, 3.5]);
        assert!(convolve_valid(&[1.0], &[0.5, 0.5]).is_empty());
    }

    #[test]
    fn convolution_flips_the_kernel() {
        let out = convolve_valid(&[1.0, 0.0, 0.0], &[1.0, 2.0]);
        assert_eq!(out, vec![2.0, 0.0]);
    }

    #[test]
    fn smoothed_step_has_62_monotone_samples() {
        let ys = smooth_step(0.0, 10.0);
        assert_eq!(ys.len(), CENTERLINE_POINTS);
        assert_eq!(ys.len(), 62);
        assert!((ys[0] - 0.0).abs() < 1e-9);
        assert!((ys[61] - 10.0).abs() < 1e-9);
        for pair in ys.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9);
        }
        // symmetric S-curve crosses the midpoint halfway
        assert!((ys[30] + ys[31] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn interior_samples_follow_the_box_kernel() {
        // first pass: a ramp of 0.5 per sample over indices 31..50
        let ys = smooth_step(0.0, 10.0);
        let expected = [(10, 0.0), (12, 0.025), (20, 1.125), (25, 2.625), (30, 4.75), (41, 8.875)];
        for (idx, value) in expected {
            assert!(
                (ys[idx] - value).abs() < 1e-9,
                "sample {idx}: {} != {value}",
                ys[idx]
            );
        }
    }

    #[test]
    fn flat_step_stays_flat() {
        let ys = smooth_step(3.5, 3.5);
        assert!(ys.iter().all(|y| (y - 3.5).abs() < 1e-9));
    }

    #[test]
    fn centerline_spans_zero_to_x_max() {
        let (layout, ribbons) = ribbons_for(vec!["a", "b"], vec!["b", "a"], &["a", "b"], false);
        for ribbon in &ribbons {
            assert_eq!(ribbon.centerline.len(), 62);
            assert_eq!(ribbon.centerline[0].0, 0.0);
            assert_eq!(ribbon.centerline[61].0, layout.x_max);
            for pair in ribbon.centerline.windows(2) {
                assert!(pair[1].0 > pair[0].0);
            }
        }
    }

    #[test]
    fn ribbons_stack_bottom_up_by_partner_order() {
        let (layout, ribbons) = ribbons_for(
            vec!["a", "a", "a", "b"],
            vec!["a", "b", "b", "a"],
            &["a", "b"],
            false,
        );
        assert_eq!(ribbons.len(), 3);
        let a = &layout.bands[0];
        // a -> a first, then a -> b directly above it on the left bar
        assert_eq!((ribbons[0].source, ribbons[0].target), ("a", "a"));
        assert_eq!(ribbons[0].left_origin, a.left_bottom);
        assert_eq!((ribbons[1].source, ribbons[1].target), ("a", "b"));
        assert_eq!(ribbons[1].left_origin, a.left_bottom + 1.0);
        assert_eq!(ribbons[1].thickness, 2.0);
        // b -> a lands above a -> a on a's right bar
        assert_eq!((ribbons[2].source, ribbons[2].target), ("b", "a"));
        assert_eq!(ribbons[2].right_origin, a.right_bottom + 1.0);
    }

    #[test]
    fn ribbon_thickness_matches_band_sides() {
        let before = vec!["x", "y", "z", "x", "x", "z", "y", "y", "x"];
        let after = vec!["z", "z", "x", "x", "y", "y", "y", "x", "z"];
        let (layout, ribbons) = ribbons_for(before, after, &["x", "y", "z"], false);
        for band in &layout.bands {
            let out: f64 = ribbons
                .iter()
                .filter(|r| r.source == band.label)
                .map(|r| r.thickness)
                .sum();
            let incoming: f64 = ribbons
                .iter()
                .filter(|r| r.target == band.label)
                .map(|r| r.thickness)
                .sum();
            assert_eq!(out, band.left_count as f64);
            assert_eq!(incoming, band.right_count as f64);
        }
    }

    #[test]
    fn centerline_runs_between_strip_centers() {
        let (_, ribbons) = ribbons_for(vec!["a", "b", "b"], vec!["b", "b", "a"], &["a", "b"], false);
        for ribbon in &ribbons {
            let half = 0.5 * ribbon.thickness;
            assert!((ribbon.centerline[0].1 - (ribbon.left_origin + half)).abs() < 1e-9);
            assert!((ribbon.centerline[61].1 - (ribbon.right_origin + half)).abs() < 1e-9);
        }
    }

    #[test]
    fn color_key_follows_right_color_flag() {
        let (_, left_keyed) = ribbons_for(vec!["a"], vec!["b"], &["a", "b"], false);
        let (_, right_keyed) = ribbons_for(vec!["a"], vec!["b"], &["a", "b"], true);
        assert_eq!(left_keyed[0].color_key, "a");
        assert_eq!(right_keyed[0].color_key, "b");
    }

    #[test]
    fn zero_count_pairs_are_skipped() {
        let (_, ribbons) = ribbons_for(vec!["a", "b"], vec!["a", "b"], &["a", "b", "c"], false);
        assert_eq!(ribbons.len(), 2);
        assert!(ribbons.iter().all(|r| r.source == r.target));
    }
}
