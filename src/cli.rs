use crate::config::{SankeyConfig, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::to_json_string;
use crate::parser::parse_pairs;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sankey-layout",
    version,
    about = "Lay out a two-column Sankey diagram from before/after pairs"
)]
pub struct Args {
    /// Input file (one `before,after` pair per line, or Markdown) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output JSON file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Height-to-width ratio of the ribbon area
    #[arg(short = 'a', long = "aspect")]
    pub aspect: Option<f64>,

    /// Color ribbons by their right-hand label (`--rightColor=false` undoes a config file)
    #[arg(
        long = "rightColor",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub right_color: Option<bool>,

    /// Log layout stages to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut base_config = load_config(args.config.as_deref())?;
    apply_overrides(&args, &mut base_config);

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let diagrams = if is_markdown {
        extract_pair_blocks(&input)
    } else {
        vec![input]
    };

    if diagrams.is_empty() {
        return Err(anyhow::anyhow!("No sankey-pairs blocks found in input"));
    }

    if diagrams.len() == 1 {
        let json = layout_json(&diagrams[0], &base_config)?;
        return write_output(&json, args.output.as_deref());
    }

    // Multiple diagrams (Markdown input)
    let outputs = resolve_multi_outputs(args.output.as_deref(), diagrams.len())?;
    for (idx, diagram) in diagrams.iter().enumerate() {
        let json = layout_json(diagram, &base_config)?;
        write_output(&json, Some(outputs[idx].as_path()))?;
    }

    Ok(())
}

fn apply_overrides(args: &Args, config: &mut SankeyConfig) {
    if let Some(aspect) = args.aspect {
        config.aspect = aspect;
    }
    if let Some(right_color) = args.right_color {
        config.right_color = right_color;
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn layout_json(source: &str, base_config: &SankeyConfig) -> Result<String> {
    let parsed = parse_pairs(source)?;
    let config = parsed.configure(base_config)?;
    let options = config.to_options(&parsed.observations)?;
    let geometry = compute_layout(
        parsed.observations.before(),
        parsed.observations.after(),
        &options,
    )?;
    to_json_string(&geometry)
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Input text and whether it is Markdown. No path, or `-`, reads stdin.
fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    match path.filter(|path| *path != Path::new("-")) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let is_markdown = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("md" | "markdown")
            );
            Ok((text, is_markdown))
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok((text, false))
        }
    }
}

fn extract_pair_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_pairs_fence(trimmed) {
                in_block = true;
                fence = start_fence;
            }
            continue;
        }
        if is_fence_end(trimmed, &fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }
        current.push(line.to_string());
    }

    blocks
}

fn detect_pairs_fence(line: &str) -> Option<String> {
    for fence_char in ['`', '~'] {
        let fence: String = std::iter::repeat_n(fence_char, 3).collect();
        if line.starts_with(&fence) {
            let rest = line.trim_start_matches(fence_char).trim();
            if rest.starts_with("sankey-pairs") {
                return Some(fence);
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.trim().is_empty())
}

fn resolve_multi_outputs(output: Option<&Path>, count: usize) -> Result<Vec<PathBuf>> {
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("diagram-{}.json", idx + 1)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.json", stem, idx + 1)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pair_blocks() {
        let input = r#"
text
``` sankey-pairs
a,b
```
more
~~~sankey-pairs
x,y
y,y
~~~
```rust
fn main() {}
```
"#;
        let blocks = extract_pair_blocks(input);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "a,b");
        assert!(blocks[1].contains("y,y"));
    }

    #[test]
    fn numbers_outputs_next_to_base_path() {
        let outputs = resolve_multi_outputs(Some(Path::new("out/flows.json")), 2).unwrap();
        assert_eq!(outputs[0], Path::new("out/flows-1.json"));
        assert_eq!(outputs[1], Path::new("out/flows-2.json"));
        assert!(resolve_multi_outputs(None, 2).is_err());
    }

    #[test]
    fn right_color_flag_can_turn_config_off() {
        let mut config = SankeyConfig {
            right_color: true,
            ..SankeyConfig::default()
        };
        let args = Args::try_parse_from(["sankey-layout", "--rightColor=false"]).unwrap();
        assert_eq!(args.right_color, Some(false));
        apply_overrides(&args, &mut config);
        assert!(!config.right_color);

        let args = Args::try_parse_from(["sankey-layout", "--rightColor", "-a", "2"]).unwrap();
        apply_overrides(&args, &mut config);
        assert!(config.right_color);
        assert_eq!(config.aspect, 2.0);

        let args = Args::try_parse_from(["sankey-layout"]).unwrap();
        assert_eq!(args.right_color, None);
        apply_overrides(&args, &mut config);
        assert!(config.right_color);
    }

    #[test]
    fn fence_end_needs_a_bare_fence() {
        assert!(is_fence_end("```", "```"));
        assert!(is_fence_end("```  ", "```"));
        assert!(!is_fence_end("```rust", "```"));
        assert!(!is_fence_end("~~~", "```"));
    }

    #[test]
    fn layout_json_applies_inline_config() {
        let json = layout_json("order: b, a\na,b\nb,b", &SankeyConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["labels"], serde_json::json!(["b", "a"]));
        assert_eq!(value["bands"][0]["color"], "#4e79a7");
    }
}
