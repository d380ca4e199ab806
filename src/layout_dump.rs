use crate::ir::Label;
use crate::layout::{BarRect, DiagramGeometry, HAlign, TextAnchor};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Geometry flattened to plain JSON for a rendering layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub labels: Vec<String>,
    pub total: usize,
    pub gap: f64,
    pub x_max: f64,
    pub top_edge: f64,
    pub bar_opacity: f64,
    pub ribbon_opacity: f64,
    pub bands: Vec<BandDump>,
    pub ribbons: Vec<RibbonDump>,
    pub side_captions: Option<[TextDump; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandDump {
    pub label: String,
    pub left_count: usize,
    pub right_count: usize,
    pub bottom: f64,
    pub top: f64,
    pub left_bar: [f64; 4],
    pub right_bar: [f64; 4],
    pub left_text: TextDump,
    pub right_text: TextDump,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RibbonDump {
    pub source: String,
    pub target: String,
    pub count: usize,
    pub color_key: String,
    pub color: Option<String>,
    pub centerline: Vec<[f64; 2]>,
    pub outline: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct TextDump {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub align: &'static str,
}

impl LayoutDump {
    pub fn from_geometry<L: Label>(geometry: &DiagramGeometry<L>) -> Self {
        let bands = geometry
            .bands
            .iter()
            .map(|geom| BandDump {
                label: geom.band.label.to_string(),
                left_count: geom.band.left_count,
                right_count: geom.band.right_count,
                bottom: geom.band.bottom,
                top: geom.band.top,
                left_bar: rect(&geom.left_bar),
                right_bar: rect(&geom.right_bar),
                left_text: text(&geom.left_anchor),
                right_text: text(&geom.right_anchor),
                color: geom.color.clone(),
            })
            .collect();

        let ribbons = geometry
            .ribbons
            .iter()
            .map(|ribbon| RibbonDump {
                source: ribbon.source.to_string(),
                target: ribbon.target.to_string(),
                count: ribbon.count,
                color_key: ribbon.color_key.to_string(),
                color: ribbon.color.clone(),
                centerline: points(&ribbon.centerline),
                outline: points(&ribbon.outline()),
            })
            .collect();

        LayoutDump {
            labels: geometry.labels.iter().map(|label| label.to_string()).collect(),
            total: geometry.total,
            gap: geometry.gap,
            x_max: geometry.x_max,
            top_edge: geometry.top_edge,
            bar_opacity: geometry.opacity.bar,
            ribbon_opacity: geometry.opacity.ribbon,
            bands,
            ribbons,
            side_captions: geometry
                .side_captions
                .as_ref()
                .map(|captions| [text(&captions.left), text(&captions.right)]),
        }
    }
}

fn rect(bar: &BarRect) -> [f64; 4] {
    [bar.x0, bar.y0, bar.x1, bar.y1]
}

fn points(points: &[(f64, f64)]) -> Vec<[f64; 2]> {
    points.iter().map(|(x, y)| [*x, *y]).collect()
}

fn text(anchor: &TextAnchor) -> TextDump {
    TextDump {
        x: anchor.x,
        y: anchor.y,
        text: anchor.text.clone(),
        align: match anchor.h_align {
            HAlign::Left => "left",
            HAlign::Right => "right",
        },
    }
}

pub fn to_json_string<L: Label>(geometry: &DiagramGeometry<L>) -> anyhow::Result<String> {
    let dump = LayoutDump::from_geometry(geometry);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump<L: Label>(path: &Path, geometry: &DiagramGeometry<L>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_geometry(geometry);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
