//! Core data models for the job search service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of characters of agent text echoed back in diagnostics
pub const RAW_PREVIEW_CHARS: usize = 500;

//
// ================= Job Listing =================
//

/// One role as the agent is asked to report it.
///
/// Records coming back from the agent are only loosely schema-conforming, so
/// every field defaults when missing. The HTTP surface passes the raw records
/// through untouched; this type is a typed view for callers that want one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct JobListing {
    pub company: String,
    pub stage: String,
    pub title: String,
    pub url: String,
    pub location: String,
    pub compensation: String,
    pub date_posted: String,
    pub source: String,
    /// Posted within the 14-day freshness window
    pub is_new: bool,
}

impl JobListing {
    /// Lenient typed view of a raw record. Returns `None` for non-objects or
    /// records whose fields have the wrong JSON types.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

//
// ================= Search Result =================
//

/// Troubleshooting metadata for a search, mostly useful when `jobs` is empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchDebug {
    pub stop_reason: Option<String>,
    pub block_types: Vec<String>,
    pub text_length: usize,
    pub raw_preview: String,
}

impl SearchDebug {
    pub fn new(stop_reason: Option<String>, block_types: Vec<String>, text: &str) -> Self {
        Self {
            stop_reason,
            block_types,
            text_length: text.chars().count(),
            raw_preview: text.chars().take(RAW_PREVIEW_CHARS).collect(),
        }
    }
}

/// Response envelope for `POST /search-jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Records in the order the agent produced them
    pub jobs: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<SearchDebug>,
}

impl SearchResult {
    /// Typed views of the records that fit the listing shape.
    pub fn listings(&self) -> Vec<JobListing> {
        self.jobs.iter().filter_map(JobListing::from_value).collect()
    }

    /// Count of listings flagged as inside the freshness window.
    pub fn new_count(&self) -> usize {
        self.listings().iter().filter(|l| l.is_new).count()
    }
}
