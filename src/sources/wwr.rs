use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::warn;

use crate::errors::SourceError;
use crate::sources::remotive::truncate_chars;
use crate::types::Job;

pub const CHANNEL_FEEDS: [&str; 3] = [
    "https://weworkremotely.com/categories/remote-programming-jobs.rss",
    "https://weworkremotely.com/categories/remote-data-jobs.rss",
    "https://weworkremotely.com/categories/remote-sales-and-marketing-jobs.rss",
];

pub const SOURCE_NAME: &str = "WeWorkRemotely";

/// Fetch every channel feed, isolating failures per channel: one bad channel
/// logs a warning and contributes zero records while the others proceed.
/// Only when every channel fails does the whole source count as unavailable.
pub fn fetch(client: &Client, feeds: &[&str]) -> Result<Vec<Job>, SourceError> {
    let mut jobs = Vec::new();
    let mut failed = 0;
    let mut last = String::new();

    for url in feeds {
        match fetch_channel(client, url) {
            Ok(mut channel_jobs) => jobs.append(&mut channel_jobs),
            Err(e) => {
                warn!(channel = url, error = %e, "feed channel failed");
                failed += 1;
                last = e.to_string();
            }
        }
    }

    if !feeds.is_empty() && failed == feeds.len() {
        return Err(SourceError::AllChannelsFailed {
            count: failed,
            last,
        });
    }
    Ok(jobs)
}

fn fetch_channel(client: &Client, url: &str) -> Result<Vec<Job>, SourceError> {
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(SourceError::Status(response.status()));
    }
    let body = response.text()?;
    parse_channel(&body)
}

#[derive(Default)]
struct RawEntry {
    title: String,
    link: String,
    summary: String,
    published: String,
}

enum Field {
    Title,
    Link,
    Summary,
    Published,
}

/// Pull `<item>` entries out of one RSS channel document.
pub fn parse_channel(xml: &str) -> Result<Vec<Job>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut jobs = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut entry = RawEntry::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    field = None;
                    entry = RawEntry::default();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"link" if in_item => field = Some(Field::Link),
                b"description" if in_item => field = Some(Field::Summary),
                b"pubDate" if in_item => field = Some(Field::Published),
                _ => field = None,
            },
            Ok(Event::Text(e)) => {
                if in_item {
                    if let Some(target) = field.as_ref() {
                        let raw = String::from_utf8_lossy(e.as_ref());
                        push_text(&mut entry, target, &decode_entities(&raw));
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    if let Some(target) = field.as_ref() {
                        let raw = String::from_utf8_lossy(e.as_ref());
                        push_text(&mut entry, target, &raw);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if in_item {
                        jobs.push(normalize(std::mem::take(&mut entry)));
                    }
                    in_item = false;
                    field = None;
                }
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SourceError::Malformed(e.to_string())),
        }
    }

    Ok(jobs)
}

fn push_text(entry: &mut RawEntry, field: &Field, text: &str) {
    let slot = match field {
        Field::Title => &mut entry.title,
        Field::Link => &mut entry.link,
        Field::Summary => &mut entry.summary,
        Field::Published => &mut entry.published,
    };
    slot.push_str(text);
}

fn normalize(entry: RawEntry) -> Job {
    // Feed entries carry HTML-escaped text; one more decode pass matches what
    // a browser would display.
    let title = decode_entities(entry.title.trim());
    let summary = decode_entities(entry.summary.trim());
    let company = extract_company(&summary);

    Job {
        source: SOURCE_NAME.to_string(),
        title,
        company,
        // The feed has no structured location; everything is remote.
        location: "Worldwide".to_string(),
        remote_policy: "Worldwide".to_string(),
        // Date+time prefix of the RFC 2822 timestamp, e.g. "Thu, 21 Aug 2025".
        posted: truncate_chars(entry.published.trim(), 16),
        link: entry.link.trim().to_string(),
        notes: summary,
        matched_keywords: vec![],
    }
}

/// The company name is conventionally the bold/strong prefix of the summary.
fn extract_company(summary: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)<(?:strong|b)>(.*?)</").expect("literal pattern"));
    if let Some(caps) = re.captures(summary) {
        return caps[1].trim().to_string();
    }
    String::new()
}

/// Decode XML/HTML character references leniently, one reference at a time.
/// A bare `&` or an unknown entity stays literal; every valid reference
/// around it still decodes.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';') {
            Some(end) => {
                if let Some(decoded) = resolve_reference(&tail[..end]) {
                    out.push_str(&decoded);
                    rest = &tail[end + 1..];
                } else {
                    out.push('&');
                    rest = tail;
                }
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve one `&...;` reference body, named or numeric.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(numeric) = name.strip_prefix('#') {
        let hex = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        let code = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_entity(name).map(String::from)
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        "nbsp" => Some(" "),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201C}"),
        "rdquo" => Some("\u{201D}"),
        "hellip" => Some("\u{2026}"),
        _ => None,
    }
}
