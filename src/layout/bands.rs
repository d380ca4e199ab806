use crate::ir::Label;

use super::transitions::TransitionMatrix;
use super::{Band, BarRect};

/// Gap between consecutive bands, as a fraction of the observation count.
pub const GAP_FRACTION: f64 = 0.02;

/// Stacked bands plus the diagram extents derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BandLayout<L> {
    pub bands: Vec<Band<L>>,
    pub gap: f64,
    /// Top of the last band; zero when there are no bands.
    pub top_edge: f64,
    /// Horizontal extent of the ribbon area, `top_edge / aspect`.
    pub x_max: f64,
}

/// Stacks one band per label, bottom to top, `gap` apart.
///
/// Each band is as tall as the larger of its two sides; the left and right
/// sub-bars are centered inside it.
pub fn layout_bands<L: Label>(matrix: &TransitionMatrix<L>, aspect: f64) -> BandLayout<L> {
    let gap = GAP_FRACTION * matrix.total() as f64;
    let mut bands: Vec<Band<L>> = Vec::with_capacity(matrix.labels().len());

    for (idx, label) in matrix.labels().iter().enumerate() {
        let left_count = matrix.left_counts()[idx];
        let right_count = matrix.right_counts()[idx];
        let total_height = left_count.max(right_count) as f64;
        let bottom = match bands.last() {
            Some(previous) => previous.top + gap,
            None => 0.0,
        };
        let top = bottom + total_height;
        let middle = 0.5 * (top + bottom);
        bands.push(Band {
            label: label.clone(),
            left_count,
            right_count,
            total_height,
            bottom,
            top,
            left_bottom: middle - 0.5 * left_count as f64,
            right_bottom: middle - 0.5 * right_count as f64,
        });
    }

    let top_edge = bands.last().map(|band| band.top).unwrap_or(0.0);
    BandLayout {
        bands,
        gap,
        top_edge,
        x_max: top_edge / aspect,
    }
}

/// Left sub-bar, drawn just outside the ribbon area at `x <= 0`.
pub fn left_bar<L>(band: &Band<L>, x_max: f64, bar_width: f64) -> BarRect {
    BarRect {
        x0: -bar_width * x_max,
        x1: 0.0,
        y0: band.left_bottom,
        y1: band.left_bottom + band.left_count as f64,
    }
}

/// Right sub-bar, drawn just outside the ribbon area at `x >= x_max`.
pub fn right_bar<L>(band: &Band<L>, x_max: f64, bar_width: f64) -> BarRect {
    BarRect {
        x0: x_max,
        x1: (1.0 + bar_width) * x_max,
        y0: band.right_bottom,
        y1: band.right_bottom + band.right_count as f64,
    }
}
