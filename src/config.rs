use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ir::Observations;
use crate::layout::{LayoutOptions, Opacity, resolve_label_order};
use crate::theme::{ColorMap, Palette};

/// File/CLI-level settings for string-labelled diagrams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SankeyConfig {
    pub aspect: f64,
    pub right_color: bool,
    pub ordered_labels: Option<Vec<String>>,
    pub side_captions: Option<Vec<String>>,
    pub xshift: f64,
    pub yshift: f64,
    /// Explicit colors; takes precedence over `palette`.
    pub colors: Option<BTreeMap<String, String>>,
    pub palette: Palette,
    pub bar_width: f64,
    pub label_offset: f64,
    pub ribbon_opacity: f64,
    pub bar_opacity: f64,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        let opacity = Opacity::default();
        Self {
            aspect: 4.0,
            right_color: false,
            ordered_labels: None,
            side_captions: None,
            xshift: 0.04,
            yshift: 0.5,
            colors: None,
            palette: Palette::default(),
            bar_width: 0.02,
            label_offset: 0.05,
            ribbon_opacity: opacity.ribbon,
            bar_opacity: opacity.bar,
        }
    }
}

/// Partial overrides, as read from a config file or an init directive.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    aspect: Option<f64>,
    right_color: Option<bool>,
    ordered_labels: Option<Vec<String>>,
    side_captions: Option<Vec<String>>,
    xshift: Option<f64>,
    yshift: Option<f64>,
    colors: Option<BTreeMap<String, String>>,
    palette: Option<Vec<String>>,
    bar_width: Option<f64>,
    label_offset: Option<f64>,
    ribbon_opacity: Option<f64>,
    bar_opacity: Option<f64>,
}

impl SankeyConfig {
    pub fn merge(&mut self, file: ConfigFile) {
        if let Some(v) = file.aspect {
            self.aspect = v;
        }
        if let Some(v) = file.right_color {
            self.right_color = v;
        }
        if let Some(v) = file.ordered_labels {
            self.ordered_labels = Some(v);
        }
        if let Some(v) = file.side_captions {
            self.side_captions = Some(v);
        }
        if let Some(v) = file.xshift {
            self.xshift = v;
        }
        if let Some(v) = file.yshift {
            self.yshift = v;
        }
        if let Some(v) = file.colors {
            self.colors = Some(v);
        }
        if let Some(v) = file.palette {
            self.palette = Palette::new(v);
        }
        if let Some(v) = file.bar_width {
            self.bar_width = v;
        }
        if let Some(v) = file.label_offset {
            self.label_offset = v;
        }
        if let Some(v) = file.ribbon_opacity {
            self.ribbon_opacity = v;
        }
        if let Some(v) = file.bar_opacity {
            self.bar_opacity = v;
        }
    }

    /// Applies overrides carried as a JSON value (e.g. an init directive).
    pub fn merge_value(&mut self, value: serde_json::Value) -> anyhow::Result<()> {
        let file: ConfigFile = serde_json::from_value(value)?;
        self.merge(file);
        Ok(())
    }

    /// Color assignment for `observations`: explicit colors if configured,
    /// otherwise the palette cycled over the resolved label order.
    pub fn color_assignment(
        &self,
        observations: &Observations<String>,
    ) -> Result<Option<ColorMap<String>>> {
        if let Some(colors) = &self.colors {
            let map: ColorMap<String> = colors
                .iter()
                .map(|(label, color)| (label.clone(), color.clone()))
                .collect();
            return Ok(Some(map));
        }
        if self.palette.colors().is_empty() {
            return Ok(None);
        }
        let labels = resolve_label_order(observations, self.ordered_labels.as_deref())?;
        Ok(Some(self.palette.assign(&labels)))
    }

    pub fn to_options(&self, observations: &Observations<String>) -> Result<LayoutOptions<String>> {
        Ok(LayoutOptions {
            aspect: self.aspect,
            right_color: self.right_color,
            ordered_labels: self.ordered_labels.clone(),
            side_captions: self.side_captions.clone(),
            xshift: self.xshift,
            yshift: self.yshift,
            color_assignment: self.color_assignment(observations)?,
            bar_width: self.bar_width,
            label_offset: self.label_offset,
            opacity: Opacity {
                bar: self.bar_opacity,
                ribbon: self.ribbon_opacity,
            },
        })
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<SankeyConfig> {
    let mut config = SankeyConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    config.merge(parsed);
    Ok(config)
}
