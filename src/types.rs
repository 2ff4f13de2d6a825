use serde::{Deserialize, Serialize};

/// One normalized job listing, regardless of which feed it came from.
///
/// Every field is set by the adapter that builds the record; absent source
/// fields default to an empty string rather than leaving the record partially
/// populated. `matched_keywords` stays empty until the filter stage, and a
/// record only survives filtering if it is non-empty afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Job {
    pub source: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub remote_policy: String,
    /// Source-specific date/time prefix, compared lexicographically for
    /// ordering. Never parsed as a real date.
    pub posted: String,
    pub link: String,
    /// Free text searched by the keyword matcher (tags or summary).
    pub notes: String,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}
