use std::fmt::Display;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Anything usable as a category on either side of the diagram.
///
/// `Display` provides the anchor text; identity comes from `Eq`/`Hash`.
pub trait Label: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> Label for T {}

/// Paired categorical observations: `before[i]` became `after[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations<L> {
    before: Vec<L>,
    after: Vec<L>,
}

impl<L: Label> Observations<L> {
    pub fn new(before: Vec<L>, after: Vec<L>) -> Result<Self> {
        if before.len() != after.len() {
            return Err(Error::LengthMismatch {
                before: before.len(),
                after: after.len(),
            });
        }
        if before.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self { before, after })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, L)>,
    {
        let (before, after) = pairs.into_iter().unzip();
        Self::new(before, after)
    }

    pub fn before(&self) -> &[L] {
        &self.before
    }

    pub fn after(&self) -> &[L] {
        &self.after
    }

    pub fn len(&self) -> usize {
        self.before.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&L, &L)> {
        self.before.iter().zip(self.after.iter())
    }
}
