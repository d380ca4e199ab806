use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ir::Label;

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Pluggable color lookup used to paint bands and ribbons.
pub trait ColorSource<L> {
    fn color_for(&self, label: &L) -> Option<String>;
}

/// Explicit label to color assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap<L: Label> {
    colors: HashMap<L, String>,
}

impl<L: Label> ColorMap<L> {
    pub fn new() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    pub fn insert(&mut self, label: L, color: impl Into<String>) {
        self.colors.insert(label, color.into());
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<L: Label> Default for ColorMap<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> FromIterator<(L, String)> for ColorMap<L> {
    fn from_iter<I: IntoIterator<Item = (L, String)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

impl<L: Label> ColorSource<L> for ColorMap<L> {
    fn color_for(&self, label: &L) -> Option<String> {
        self.colors.get(label).cloned()
    }
}

/// A fixed list of colors handed out in label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    pub fn tableau() -> Self {
        Self::new(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Cycles the palette over `labels`; an empty palette assigns nothing.
    pub fn assign<L: Label>(&self, labels: &[L]) -> ColorMap<L> {
        if self.colors.is_empty() {
            return ColorMap::new();
        }
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), self.colors[idx % self.colors.len()].clone()))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tableau()
    }
}
