//! Pulling a JSON document out of a model's free-text reply.
//!
//! Models wrap their answer in prose and markdown, so extraction runs in tiers:
//! a fenced ```` ```json ```` block first, then the span from the first line
//! that opens with `{` to the first line at or after it that closes with `}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fence pattern is valid"));

/// Which extraction tier produced the candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTier {
    Fenced,
    BraceLines,
}

impl ExtractionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionTier::Fenced => "fenced json block",
            ExtractionTier::BraceLines => "brace-delimited lines",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Parsed { tier: ExtractionTier, value: Value },
    /// A candidate span was found but is not valid JSON.
    Malformed { tier: ExtractionTier, error: String },
    NotFound,
}

/// Contents of the first ```` ```json ```` fenced block, if any.
pub fn find_fenced_json(reply: &str) -> Option<&str> {
    JSON_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Lines from the first one starting with `{` through the first one (at or
/// after it) ending with `}`, joined back together.
pub fn find_brace_span(reply: &str) -> Option<String> {
    let lines: Vec<&str> = reply.lines().collect();
    let start = lines.iter().position(|line| line.trim_start().starts_with('{'))?;
    let end = lines[start..]
        .iter()
        .position(|line| line.trim_end().ends_with('}'))
        .map(|offset| start + offset)?;
    Some(lines[start..=end].join("\n"))
}

/// Run the extraction tiers against `reply`.
pub fn extract_json(reply: &str) -> Extraction {
    let (tier, candidate) = match find_fenced_json(reply) {
        Some(block) => (ExtractionTier::Fenced, block.to_string()),
        None => match find_brace_span(reply) {
            Some(span) => (ExtractionTier::BraceLines, span),
            None => return Extraction::NotFound,
        },
    };

    match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => Extraction::Parsed { tier, value },
        Err(e) => Extraction::Malformed {
            tier,
            error: e.to_string(),
        },
    }
}
