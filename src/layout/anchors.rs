use std::fmt::Display;

use crate::error::{Error, Result};

use super::{Band, HAlign, SideCaptions, TextAnchor};

/// Text shown beside a bar: the label and its share of all observations.
pub fn percentage_text(label: &impl Display, count: usize, total: usize) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{label}\n{percent:.2}%")
}

/// Anchors beside the left and right sub-bars of `band`.
///
/// `label_offset` is the horizontal clearance from the ribbon area as a
/// fraction of `x_max`.
pub fn band_anchors<L: Display>(
    band: &Band<L>,
    total: usize,
    x_max: f64,
    label_offset: f64,
) -> (TextAnchor, TextAnchor) {
    let offset = label_offset * x_max;
    let left = TextAnchor {
        x: -offset,
        y: band.left_center(),
        text: percentage_text(&band.label, band.left_count, total),
        h_align: HAlign::Right,
    };
    let right = TextAnchor {
        x: x_max + offset,
        y: band.right_center(),
        text: percentage_text(&band.label, band.right_count, total),
        h_align: HAlign::Left,
    };
    (left, right)
}

/// Checks that captions, when given, come as exactly one pair.
pub fn validate_side_captions(captions: Option<&[String]>) -> Result<()> {
    match captions {
        Some(captions) if captions.len() != 2 => Err(Error::SideCaptionCount {
            count: captions.len(),
        }),
        _ => Ok(()),
    }
}

/// Column captions placed above the diagram, `yshift` over the top edge.
pub fn side_caption_anchors(
    captions: Option<&[String]>,
    top_edge: f64,
    x_max: f64,
    xshift: f64,
    yshift: f64,
) -> Result<Option<SideCaptions>> {
    validate_side_captions(captions)?;
    let Some([left, right]) = captions else {
        return Ok(None);
    };
    let y = top_edge + yshift;
    Ok(Some(SideCaptions {
        left: TextAnchor {
            x: -xshift,
            y,
            text: left.clone(),
            h_align: HAlign::Left,
        },
        right: TextAnchor {
            x: x_max + xshift,
            y,
            text: right.clone(),
            h_align: HAlign::Right,
        },
    }))
}
