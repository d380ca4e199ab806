use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ir::{Label, Observations};

/// Pair counts over a fixed label order, with row and column sums.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix<L: Label> {
    labels: Vec<L>,
    index: HashMap<L, usize>,
    // Row-major: counts[from * len + to].
    counts: Vec<usize>,
    left: Vec<usize>,
    right: Vec<usize>,
    total: usize,
}

impl<L: Label> TransitionMatrix<L> {
    /// Counts exact `(before, after)` matches for every label pair in `labels`.
    pub fn aggregate(observations: &Observations<L>, labels: &[L]) -> Result<Self> {
        let len = labels.len();
        let index: HashMap<L, usize> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect();
        let mut counts = vec![0usize; len * len];
        let mut left = vec![0usize; len];
        let mut right = vec![0usize; len];

        for (from, to) in observations.pairs() {
            let from_idx = lookup(&index, from)?;
            let to_idx = lookup(&index, to)?;
            counts[from_idx * len + to_idx] += 1;
            left[from_idx] += 1;
            right[to_idx] += 1;
        }

        Ok(Self {
            labels: labels.to_vec(),
            index,
            counts,
            left,
            right,
            total: observations.len(),
        })
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, from: &L, to: &L) -> usize {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from_idx), Some(&to_idx)) => self.count_at(from_idx, to_idx),
            _ => 0,
        }
    }

    pub fn count_at(&self, from_idx: usize, to_idx: usize) -> usize {
        self.counts[from_idx * self.labels.len() + to_idx]
    }

    /// Observations whose `before` is `label`.
    pub fn left_count(&self, label: &L) -> usize {
        self.index.get(label).map(|&idx| self.left[idx]).unwrap_or(0)
    }

    /// Observations whose `after` is `label`.
    pub fn right_count(&self, label: &L) -> usize {
        self.index.get(label).map(|&idx| self.right[idx]).unwrap_or(0)
    }

    pub fn left_counts(&self) -> &[usize] {
        &self.left
    }

    pub fn right_counts(&self) -> &[usize] {
        &self.right
    }

    /// Nonzero cells as `(from_idx, to_idx, count)`, outer loop over the
    /// source label and inner loop over the target label, both in label order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let len = self.labels.len();
        (0..len)
            .flat_map(move |from_idx| (0..len).map(move |to_idx| (from_idx, to_idx)))
            .filter_map(move |(from_idx, to_idx)| {
                let count = self.count_at(from_idx, to_idx);
                (count > 0).then_some((from_idx, to_idx, count))
            })
    }
}

#[cfg(test)]
impl<L: Label> Default for TransitionMatrix<L> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            index: HashMap::new(),
            counts: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
            total: 0,
        }
    }
}

fn lookup<L: Label>(index: &HashMap<L, usize>, label: &L) -> Result<usize> {
    index
        .get(label)
        .copied()
        .ok_or_else(|| Error::MissingFromOrder {
            label: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_the_reference_scenario() {
        let obs = Observations::new(vec![1, 1, 2], vec![2, 2, 1]).unwrap();
        let matrix = TransitionMatrix::aggregate(&obs, &[1, 2]).unwrap();
        assert_eq!(matrix.count(&1, &2), 2);
        assert_eq!(matrix.count(&1, &1), 0);
        assert_eq!(matrix.count(&2, &1), 1);
        assert_eq!(matrix.count(&2, &2), 0);
        assert_eq!(matrix.left_count(&1), 2);
        assert_eq!(matrix.right_count(&1), 1);
        assert_eq!(matrix.left_count(&2), 1);
        assert_eq!(matrix.right_count(&2), 2);
    }

    #[test]
    fn counts_sum_to_observation_total() {
        let before = vec!["a", "b", "c", "a", "a", "c", "b"];
        let after = vec!["b", "b", "a", "c", "a", "c", "a"];
        let obs = Observations::new(before, after).unwrap();
        let matrix = TransitionMatrix::aggregate(&obs, &["a", "b", "c"]).unwrap();
        let sum: usize = matrix.nonzero().map(|(_, _, count)| count).sum();
        assert_eq!(sum, 7);
        assert_eq!(matrix.total(), 7);
        assert_eq!(matrix.left_counts().iter().sum::<usize>(), 7);
        assert_eq!(matrix.right_counts().iter().sum::<usize>(), 7);
    }

    #[test]
    fn nonzero_walks_rows_then_columns_in_label_order() {
        let obs = Observations::new(vec!["y", "x", "y", "x"], vec!["x", "y", "y", "x"]).unwrap();
        let matrix = TransitionMatrix::aggregate(&obs, &["x", "y"]).unwrap();
        let cells: Vec<_> = matrix.nonzero().collect();
        assert_eq!(cells, vec![(0, 0, 1), (0, 1, 1), (1, 0, 1), (1, 1, 1)]);
    }

    #[test]
    fn unknown_label_is_reported() {
        let obs = Observations::new(vec!["a"], vec!["z"]).unwrap();
        let err = TransitionMatrix::aggregate(&obs, &["a"]).unwrap_err();
        assert_eq!(
            err,
            Error::MissingFromOrder {
                label: "z".to_string()
            }
        );
    }
}
