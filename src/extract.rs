//! Result extraction
//!
//! The agent is told to answer with a bare JSON array, but it often wraps the
//! array in prose or a markdown fence. Each strategy below is a pure function
//! that either recovers an array or gives up; `extract_jobs` takes the first
//! one that succeeds and falls back to an empty list.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

lazy_static! {
    static ref FENCED_BLOCK: Regex =
        Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?\s*```").unwrap();
}

/// A single way of pulling a JSON array out of free text.
pub type Strategy = fn(&str) -> Option<Vec<Value>>;

/// Strategies in the order they are attempted
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("whole", parse_whole),
    ("fenced", parse_fenced),
    ("bracketed", parse_bracketed),
];

/// Recover job records from agent text. Never fails.
pub fn extract_jobs(text: &str) -> Vec<Value> {
    for (name, strategy) in STRATEGIES {
        if let Some(jobs) = strategy(text) {
            debug!(strategy = *name, count = jobs.len(), "Extracted job array");
            return jobs;
        }
    }

    debug!(text_length = text.chars().count(), "No JSON array found in agent text");
    Vec::new()
}

/// The whole text is a JSON array.
pub fn parse_whole(text: &str) -> Option<Vec<Value>> {
    parse_array(text)
}

/// The interior of the first fenced code block is a JSON array.
pub fn parse_fenced(text: &str) -> Option<Vec<Value>> {
    let captures = FENCED_BLOCK.captures(text)?;
    parse_array(captures.get(1)?.as_str())
}

/// The span from the first `[` to the last `]` is a JSON array.
pub fn parse_bracketed(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    parse_array(&text[start..=end])
}

fn parse_array(candidate: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(candidate).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}
