use thiserror::Error;

/// Fatal configuration failures. The run aborts before any network fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_SHEET_ID is not set")]
    MissingSheetId,
    #[error("service account key missing: set GOOGLE_SERVICE_ACCOUNT_JSON or provide service_account.json")]
    MissingCredentials,
    #[error("invalid service account JSON: {0}")]
    InvalidCredentials(#[source] serde_json::Error),
    #[error("MAX_TOTAL must be an integer, got '{0}'")]
    InvalidMaxTotal(String),
}

/// Recoverable per-source failures. The orchestrator logs a warning and the
/// source contributes zero records; the run continues.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("all {count} feed channels failed, last error: {last}")]
    AllChannelsFailed { count: usize, last: String },
}

/// Fatal publish failures after the data is ready. No retries.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to sign service account assertion: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange failed ({status}): {body}")]
    TokenExchange {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("sheets API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("worksheet '{0}' not found in spreadsheet")]
    WorksheetNotFound(String),
}
