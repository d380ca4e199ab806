mod anchors;
mod bands;
mod order;
mod ribbons;
mod transitions;
pub(crate) mod types;
pub use types::*;

pub use anchors::{band_anchors, percentage_text, side_caption_anchors, validate_side_captions};
pub use bands::{BandLayout, GAP_FRACTION, layout_bands, left_bar, right_bar};
pub use order::resolve_label_order;
pub use ribbons::{
    CENTERLINE_POINTS, KERNEL_WIDTH, SMOOTHING_PASSES, STEP_SAMPLES, convolve_valid,
    generate_ribbons, smooth_step,
};
pub use transitions::TransitionMatrix;

use crate::error::{Error, Result};
use crate::ir::{Label, Observations};
use crate::theme::{ColorMap, ColorSource};

/// Caller-tunable knobs for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions<L: Label> {
    /// Height-to-width ratio of the ribbon area; `x_max = top_edge / aspect`.
    pub aspect: f64,
    /// Color ribbons by their target label instead of their source.
    pub right_color: bool,
    /// Bottom-to-top label order; must cover every label in the data.
    pub ordered_labels: Option<Vec<L>>,
    /// Left and right column captions.
    pub side_captions: Option<Vec<String>>,
    pub xshift: f64,
    pub yshift: f64,
    pub color_assignment: Option<ColorMap<L>>,
    /// Bar width as a fraction of `x_max`.
    pub bar_width: f64,
    /// Gap between a bar and its label text as a fraction of `x_max`.
    pub label_offset: f64,
    pub opacity: Opacity,
}

impl<L: Label> Default for LayoutOptions<L> {
    fn default() -> Self {
        Self {
            aspect: 4.0,
            right_color: false,
            ordered_labels: None,
            side_captions: None,
            xshift: 0.04,
            yshift: 0.5,
            color_assignment: None,
            bar_width: 0.02,
            label_offset: 0.05,
            opacity: Opacity::default(),
        }
    }
}

/// Lays out a before/after flow diagram.
///
/// Colors come from `options.color_assignment` when present; otherwise
/// bands and ribbons carry only their color keys.
pub fn compute_layout<L: Label>(
    before: &[L],
    after: &[L],
    options: &LayoutOptions<L>,
) -> Result<DiagramGeometry<L>> {
    let observations = Observations::new(before.to_vec(), after.to_vec())?;
    let colors = options
        .color_assignment
        .as_ref()
        .map(|map| map as &dyn ColorSource<L>);
    layout_observations(&observations, options, colors)
}

/// Same as [`compute_layout`] but paints with an arbitrary color source,
/// ignoring `options.color_assignment`.
pub fn compute_layout_with_colors<L: Label>(
    before: &[L],
    after: &[L],
    options: &LayoutOptions<L>,
    colors: &dyn ColorSource<L>,
) -> Result<DiagramGeometry<L>> {
    let observations = Observations::new(before.to_vec(), after.to_vec())?;
    layout_observations(&observations, options, Some(colors))
}

/// Runs ordering, aggregation, band stacking, ribbons and anchors in turn.
///
/// All validation happens before any geometry is built.
pub fn layout_observations<L: Label>(
    observations: &Observations<L>,
    options: &LayoutOptions<L>,
    colors: Option<&dyn ColorSource<L>>,
) -> Result<DiagramGeometry<L>> {
    if !(options.aspect.is_finite() && options.aspect > 0.0) {
        return Err(Error::InvalidAspect {
            aspect: options.aspect,
        });
    }
    validate_side_captions(options.side_captions.as_deref())?;
    let labels = resolve_label_order(observations, options.ordered_labels.as_deref())?;
    let palette = match colors {
        Some(source) => Some(resolve_colors(&labels, source)?),
        None => None,
    };
    let matrix = TransitionMatrix::aggregate(observations, &labels)?;
    tracing::debug!(
        labels = labels.len(),
        observations = matrix.total(),
        "aggregated transitions"
    );

    let band_layout = layout_bands(&matrix, options.aspect);
    tracing::debug!(
        top_edge = band_layout.top_edge,
        x_max = band_layout.x_max,
        gap = band_layout.gap,
        "stacked bands"
    );

    let mut ribbons = generate_ribbons(&matrix, &band_layout, options.right_color);
    if let Some(palette) = &palette {
        for ribbon in &mut ribbons {
            ribbon.color = palette.color_of(&labels, &ribbon.color_key);
        }
    }
    tracing::debug!(ribbons = ribbons.len(), "generated ribbons");

    let side_captions = side_caption_anchors(
        options.side_captions.as_deref(),
        band_layout.top_edge,
        band_layout.x_max,
        options.xshift,
        options.yshift,
    )?;

    let BandLayout {
        bands,
        gap,
        top_edge,
        x_max,
    } = band_layout;
    let total = matrix.total();
    let bands = bands
        .into_iter()
        .enumerate()
        .map(|(idx, band)| {
            let (left_anchor, right_anchor) =
                band_anchors(&band, total, x_max, options.label_offset);
            BandGeometry {
                left_bar: left_bar(&band, x_max, options.bar_width),
                right_bar: right_bar(&band, x_max, options.bar_width),
                left_anchor,
                right_anchor,
                color: palette.as_ref().map(|palette| palette.colors[idx].clone()),
                band,
            }
        })
        .collect();

    Ok(DiagramGeometry {
        labels,
        bands,
        ribbons,
        total,
        gap,
        x_max,
        top_edge,
        side_captions,
        opacity: options.opacity,
    })
}

/// Colors resolved once per label, indexed like the label order.
struct ResolvedColors {
    colors: Vec<String>,
}

impl ResolvedColors {
    fn color_of<L: Label>(&self, labels: &[L], label: &L) -> Option<String> {
        labels
            .iter()
            .position(|candidate| candidate == label)
            .map(|idx| self.colors[idx].clone())
    }
}

fn resolve_colors<L: Label>(labels: &[L], source: &dyn ColorSource<L>) -> Result<ResolvedColors> {
    let colors = labels
        .iter()
        .map(|label| {
            source.color_for(label).ok_or_else(|| Error::MissingColor {
                label: label.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ResolvedColors { colors })
}
