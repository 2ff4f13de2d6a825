use reqwest::blocking::Client;
use serde::Deserialize;

use crate::errors::SourceError;
use crate::types::Job;

pub const API_URL: &str = "https://remotive.com/api/remote-jobs";

pub const SOURCE_NAME: &str = "Remotive";

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    jobs: Vec<RawJob>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default = "worldwide")]
    candidate_required_location: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    publication_date: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

fn worldwide() -> String {
    "Worldwide".to_string()
}

/// Fetch the Remotive job listing. The URL is a parameter so tests can point
/// it at a local server; production callers pass [`API_URL`].
pub fn fetch(client: &Client, url: &str) -> Result<Vec<Job>, SourceError> {
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(SourceError::Status(response.status()));
    }
    let body = response.text()?;
    parse_payload(&body)
}

pub fn parse_payload(body: &str) -> Result<Vec<Job>, SourceError> {
    let payload: Payload =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;
    Ok(payload.jobs.into_iter().map(normalize).collect())
}

fn normalize(raw: RawJob) -> Job {
    Job {
        source: SOURCE_NAME.to_string(),
        title: raw.title,
        company: raw.company_name,
        location: raw.candidate_required_location,
        remote_policy: "Worldwide".to_string(),
        // Date-only prefix so Remotive rows order consistently.
        posted: truncate_chars(&raw.publication_date, 10),
        link: raw.url,
        notes: raw.tags.unwrap_or_default().join(" "),
        matched_keywords: vec![],
    }
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
