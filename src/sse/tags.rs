//! Embedded tag extraction.
//!
//! The backend layers two in-band tag grammars on top of the content
//! channel: `<think>…</think>` for reasoning and `<tool>…</tool>` for tool
//! invocations. Extraction runs over the full accumulated raw content on
//! every update, so a tag split across chunk boundaries is handled once both
//! halves have arrived. Only balanced pairs are extracted; an opening tag
//! that never closes stays in the text as literal markup.

use once_cell::sync::Lazy;
use regex::Regex;

static THINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("Invalid think tag regex"));

static TOOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<tool>(.*?)</tool>").expect("Invalid tool tag regex"));

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagExtraction {
    /// Text with all matched tag regions removed.
    pub display: String,
    /// Inner texts of every `<think>` pair, concatenated in document order
    /// with no separator.
    pub thinking: String,
    /// Tool names from every `<tool>` pair: split by line, trimmed, empties
    /// dropped, deduplicated by first occurrence.
    pub tool_names: Vec<String>,
}

/// Extract thinking and tool regions from accumulated raw content.
pub fn extract_tags(raw: &str) -> TagExtraction {
    let mut thinking = String::new();
    for cap in THINK_RE.captures_iter(raw) {
        thinking.push_str(&cap[1]);
    }
    let without_think = THINK_RE.replace_all(raw, "");

    let mut tool_names: Vec<String> = Vec::new();
    for cap in TOOL_RE.captures_iter(&without_think) {
        for line in cap[1].lines() {
            let name = line.trim();
            if !name.is_empty() && !tool_names.iter().any(|n| n == name) {
                tool_names.push(name.to_string());
            }
        }
    }
    let display = TOOL_RE.replace_all(&without_think, "").into_owned();

    TagExtraction {
        display,
        thinking,
        tool_names,
    }
}
