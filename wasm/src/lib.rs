use sankey_layout::{SankeyConfig, compute_layout, parse_pairs, to_json_string};
use std::collections::BTreeMap;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SankeyLayoutOptions {
    aspect: Option<f64>,
    right_color: Option<bool>,
    ordered_labels: Option<Vec<String>>,
    side_captions: Option<Vec<String>>,
    xshift: Option<f64>,
    yshift: Option<f64>,
    colors: Option<BTreeMap<String, String>>,
    palette: Option<Vec<String>>,
}

fn build_config(options: SankeyLayoutOptions) -> SankeyConfig {
    let mut config = SankeyConfig::default();
    if let Some(aspect) = options.aspect {
        config.aspect = aspect;
    }
    if let Some(right_color) = options.right_color {
        config.right_color = right_color;
    }
    if options.ordered_labels.is_some() {
        config.ordered_labels = options.ordered_labels;
    }
    if options.side_captions.is_some() {
        config.side_captions = options.side_captions;
    }
    if let Some(xshift) = options.xshift {
        config.xshift = xshift;
    }
    if let Some(yshift) = options.yshift {
        config.yshift = yshift;
    }
    if options.colors.is_some() {
        config.colors = options.colors;
    }
    if let Some(palette) = options.palette {
        config.palette = sankey_layout::Palette::new(palette);
    }
    config
}

fn layout_to_json(input: &str, options: SankeyLayoutOptions) -> Result<String, String> {
    let parsed = parse_pairs(input).map_err(|error| error.to_string())?;
    let config = parsed
        .configure(&build_config(options))
        .map_err(|error| error.to_string())?;
    let layout_options = config
        .to_options(&parsed.observations)
        .map_err(|error| error.to_string())?;
    let geometry = compute_layout(
        parsed.observations.before(),
        parsed.observations.after(),
        &layout_options,
    )
    .map_err(|error| error.to_string())?;
    to_json_string(&geometry).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn compute_sankey_layout_json(
    input: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<SankeyLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        SankeyLayoutOptions::default()
    };

    layout_to_json(input, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{SankeyLayoutOptions, layout_to_json};

    #[test]
    fn lays_out_pairs_with_options() {
        let input = "sankey-pairs\nstay,stay\nstay,leave\nleave,leave";
        let options: SankeyLayoutOptions =
            serde_json::from_str(r#"{"aspect": 2, "sideCaptions": ["Q1", "Q2"]}"#).unwrap();

        let json = layout_to_json(input, options).expect("pairs should lay out");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["labels"], serde_json::json!(["stay", "leave"]));
        assert_eq!(value["sideCaptions"][0]["text"], "Q1");
    }

    #[test]
    fn routes_caption_shifts_and_colors() {
        let input = "a,b\nb,a";
        let options: SankeyLayoutOptions = serde_json::from_str(
            r##"{
                "sideCaptions": ["L", "R"],
                "xshift": 0.25,
                "yshift": 2,
                "colors": {"a": "#111111", "b": "#222222"}
            }"##,
        )
        .unwrap();

        let json = layout_to_json(input, options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sideCaptions"][0]["x"], -0.25);
        assert_eq!(value["sideCaptions"][0]["y"], value["topEdge"].as_f64().unwrap() + 2.0);
        assert_eq!(value["bands"][1]["color"], "#222222");
    }

    #[test]
    fn reports_bad_caption_count() {
        let options: SankeyLayoutOptions =
            serde_json::from_str(r#"{"sideCaptions": ["only"]}"#).unwrap();
        let error = layout_to_json("a,b", options).unwrap_err();
        assert!(error.contains("exactly two"));
    }
}
