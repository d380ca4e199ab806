use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::ir::{Label, Observations};

/// Resolves the bottom-to-top label sequence for a layout pass.
///
/// An explicit order is taken verbatim but must cover every label present in
/// the data and list each label once. Without one, labels are collected in
/// first-occurrence order from `before`, then from `after`.
pub fn resolve_label_order<L: Label>(
    observations: &Observations<L>,
    explicit: Option<&[L]>,
) -> Result<Vec<L>> {
    let Some(explicit) = explicit else {
        return Ok(first_occurrence_order(observations));
    };

    let mut seen: HashSet<&L> = HashSet::with_capacity(explicit.len());
    for label in explicit {
        if !seen.insert(label) {
            return Err(Error::DuplicateInOrder {
                label: label.to_string(),
            });
        }
    }
    for label in observations.before().iter().chain(observations.after()) {
        if !seen.contains(label) {
            return Err(Error::MissingFromOrder {
                label: label.to_string(),
            });
        }
    }
    Ok(explicit.to_vec())
}

fn first_occurrence_order<L: Label>(observations: &Observations<L>) -> Vec<L> {
    let mut seen: HashSet<&L> = HashSet::new();
    let mut order = Vec::new();
    for label in observations.before().iter().chain(observations.after()) {
        if seen.insert(label) {
            order.push(label.clone());
        }
    }
    order
}
