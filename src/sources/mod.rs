pub mod remotive;
pub mod wwr;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::types::Job;

/// Fetch every source in turn, tolerating individual failures: a failed
/// source logs a warning and contributes zero records while the rest proceed.
pub fn fetch_all(client: &Client) -> Vec<Job> {
    let mut jobs = Vec::new();

    let fetches = [
        (remotive::SOURCE_NAME, remotive::fetch(client, remotive::API_URL)),
        (wwr::SOURCE_NAME, wwr::fetch(client, &wwr::CHANNEL_FEEDS)),
    ];

    for (name, result) in fetches {
        match result {
            Ok(mut fetched) => {
                info!(source = name, count = fetched.len(), "fetched jobs");
                jobs.append(&mut fetched);
            }
            Err(e) => warn!(source = name, error = %e, "source failed"),
        }
    }

    jobs
}
