use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use search_jobs::config::Config;
use search_jobs::{filter, sheets, sorter, sources};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fail fast: missing sheet ID or credentials aborts before any fetch.
    let config = Config::from_env()?;

    let client = Client::builder()
        .user_agent("Mozilla/5.0 (compatible; JobSearchBot/1.0)")
        .timeout(Duration::from_secs(40))
        .build()?;

    // Fetch both sources, tolerating individual failures.
    let all_jobs = sources::fetch_all(&client);
    info!(total = all_jobs.len(), "merged source records");

    // Keyword filter, then rank newest-first and cap at max_total.
    let matched = filter::filter_jobs(all_jobs, &config.keywords);
    let ranked = sorter::rank(matched, config.max_total);

    // Publish: clear the worksheet, rewrite header + ranked rows.
    let token = sheets::access_token(&client, &config.credentials)?;
    let publisher = sheets::SheetsClient::new(client, token, config.sheet_id.clone());
    let week_of = sheets::monday_of_week(chrono::Utc::now().date_naive());
    publisher.publish(&config.worksheet, week_of, &ranked)?;

    info!(
        rows = ranked.len(),
        sheet = %config.sheet_id,
        worksheet = %config.worksheet,
        "wrote weekly results"
    );
    Ok(())
}
