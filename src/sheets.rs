use chrono::{Datelike, Duration, NaiveDate};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::errors::PublishError;
use crate::types::Job;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

pub const HEADER_ROW: [&str; 10] = [
    "Week Of (Mon)",
    "Source",
    "Job Title",
    "Company",
    "Location",
    "Remote Policy",
    "Posted Date",
    "Link",
    "Notes",
    "Matched Keywords",
];

/// Service-account key material, held in memory for the whole run. Nothing is
/// ever written back to disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Exchange a signed RS256 assertion for an OAuth access token at the key's
/// token endpoint.
pub fn access_token(client: &Client, key: &ServiceAccountKey) -> Result<String, PublishError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat: now,
        exp: now + 3600,
    };
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ])
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(PublishError::TokenExchange {
            status,
            body: response.text().unwrap_or_default(),
        });
    }

    #[derive(Deserialize)]
    struct TokenResponse {
        access_token: String,
    }
    let token: TokenResponse = response.json()?;
    Ok(token.access_token)
}

pub struct SheetsClient {
    http: Client,
    base: String,
    token: String,
    sheet_id: String,
}

impl SheetsClient {
    pub fn new(http: Client, token: String, sheet_id: String) -> Self {
        Self::with_base(http, SHEETS_API_BASE.to_string(), token, sheet_id)
    }

    /// Base URL override for tests against a local server.
    pub fn with_base(http: Client, base: String, token: String, sheet_id: String) -> Self {
        SheetsClient {
            http,
            base,
            token,
            sheet_id,
        }
    }

    /// Overwrite the worksheet: clear everything, write the fixed header row,
    /// then one row per job in ranked order.
    pub fn publish(
        &self,
        worksheet: &str,
        week_of: NaiveDate,
        jobs: &[Job],
    ) -> Result<(), PublishError> {
        self.ensure_worksheet(worksheet)?;
        self.clear(worksheet)?;
        self.write_rows(worksheet, week_of, jobs)
    }

    fn ensure_worksheet(&self, worksheet: &str) -> Result<(), PublishError> {
        #[derive(Deserialize)]
        struct Meta {
            #[serde(default)]
            sheets: Vec<Sheet>,
        }
        #[derive(Deserialize)]
        struct Sheet {
            properties: Properties,
        }
        #[derive(Deserialize)]
        struct Properties {
            #[serde(default)]
            title: String,
        }

        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.base, self.sheet_id
        );
        let response = check(self.http.get(&url).bearer_auth(&self.token).send()?)?;
        let meta: Meta = response.json()?;

        if meta.sheets.iter().any(|s| s.properties.title == worksheet) {
            Ok(())
        } else {
            Err(PublishError::WorksheetNotFound(worksheet.to_string()))
        }
    }

    fn clear(&self, worksheet: &str) -> Result<(), PublishError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:clear",
            self.base, self.sheet_id, worksheet
        );
        check(
            self.http
                .post(&url)
                .bearer_auth(&self.token)
                .json(&serde_json::json!({}))
                .send()?,
        )?;
        Ok(())
    }

    fn write_rows(
        &self,
        worksheet: &str,
        week_of: NaiveDate,
        jobs: &[Job],
    ) -> Result<(), PublishError> {
        let week = week_of.format("%Y-%m-%d").to_string();
        let mut values: Vec<Vec<String>> = Vec::with_capacity(jobs.len() + 1);
        values.push(HEADER_ROW.iter().map(|h| h.to_string()).collect());
        for job in jobs {
            values.push(job_row(&week, job));
        }

        let range = format!("{}!A1", worksheet);
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?valueInputOption=RAW",
            self.base, self.sheet_id, range
        );
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        check(
            self.http
                .put(&url)
                .bearer_auth(&self.token)
                .json(&body)
                .send()?,
        )?;
        Ok(())
    }
}

fn check(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PublishError::Api {
            status,
            body: response.text().unwrap_or_default(),
        })
    }
}

/// One spreadsheet row in publish order.
pub fn job_row(week_of: &str, job: &Job) -> Vec<String> {
    vec![
        week_of.to_string(),
        job.source.clone(),
        job.title.clone(),
        job.company.clone(),
        job.location.clone(),
        job.remote_policy.clone(),
        job.posted.clone(),
        job.link.clone(),
        job.notes.clone(),
        job.matched_keywords.join(", "),
    ]
}

/// Monday of the week containing `date`, used as the batch label.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
