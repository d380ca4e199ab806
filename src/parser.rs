use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SankeyConfig;
use crate::ir::Observations;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)sankey-pairs\s*$").unwrap());
static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?P<key>order|captions)\s*:\s*(?P<value>.*)$").unwrap());

/// Observation text: one `before,after` pair per line plus optional
/// `order:` / `captions:` directives and a `%%{init: ...}%%` block.
#[derive(Debug)]
pub struct ParseOutput {
    pub observations: Observations<String>,
    pub ordered_labels: Option<Vec<String>>,
    pub side_captions: Option<Vec<String>>,
    pub init_config: Option<serde_json::Value>,
}

impl ParseOutput {
    /// `base` with the init block applied, then the in-text directives.
    pub fn configure(&self, base: &SankeyConfig) -> Result<SankeyConfig> {
        let mut config = base.clone();
        if let Some(init) = self.init_config.clone() {
            config.merge_value(init)?;
        }
        if let Some(order) = &self.ordered_labels {
            config.ordered_labels = Some(order.clone());
        }
        if let Some(captions) = &self.side_captions {
            config.side_captions = Some(captions.clone());
        }
        Ok(config)
    }
}

pub fn parse_pairs(input: &str) -> Result<ParseOutput> {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut ordered_labels = None;
    let mut side_captions = None;
    let mut init_config = None;

    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    for (line_idx, raw_line) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(trimmed) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                init_config = Some(parse_init(json_str, line_no)?);
            }
            continue;
        }
        let line = without_comment(trimmed).trim_end();
        if line.is_empty() || HEADER_RE.is_match(line) {
            continue;
        }
        if let Some(caps) = DIRECTIVE_RE.captures(line) {
            let values = fields(&caps["value"]);
            if caps["key"].eq_ignore_ascii_case("order") {
                ordered_labels = Some(values);
            } else {
                side_captions = Some(values);
            }
            continue;
        }

        let [from, to] = match <[String; 2]>::try_from(fields(line)) {
            Ok(pair) => pair,
            Err(parts) => bail!(
                "line {line_no}: expected `before,after`, found {} field(s)",
                parts.len()
            ),
        };
        before.push(from);
        after.push(to);
    }

    tracing::debug!(pairs = before.len(), "parsed observation pairs");
    let observations = Observations::new(before, after)?;
    Ok(ParseOutput {
        observations,
        ordered_labels,
        side_captions,
        init_config,
    })
}

fn parse_init(json_str: &str, line_no: usize) -> Result<serde_json::Value> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
        return Ok(value);
    }
    match json5::from_str::<serde_json::Value>(json_str) {
        Ok(value) => Ok(value),
        Err(err) => bail!("line {line_no}: invalid init block: {err}"),
    }
}

/// `line` up to a `%%` comment that starts outside quotes.
fn without_comment(line: &str) -> &str {
    let mut quote = None;
    for (idx, ch) in line.char_indices() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '%') if line[idx..].starts_with("%%") => return &line[..idx],
            (None, _) => {}
        }
    }
    line
}

/// Comma-separated fields with surrounding quotes removed. Commas inside
/// quotes do not split, and blank fields are dropped.
fn fields(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (idx, ch) in line.char_indices() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ',') => {
                push_field(&mut out, &line[start..idx]);
                start = idx + 1;
            }
            (None, _) => {}
        }
    }
    push_field(&mut out, &line[start..]);
    out
}

fn push_field(out: &mut Vec<String>, raw: &str) {
    let raw = raw.trim();
    if !raw.is_empty() {
        out.push(unquote(raw).to_string());
    }
}

fn unquote(field: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| field.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(field)
}
