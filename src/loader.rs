//! Reading the injected report payload
//!
//! The reporting backend hands over a report either as a bare JSON document
//! or embedded in an HTML page as `window.REPORT_DATA = {...};`. Whatever
//! arrives is turned into an immutable [`Report`]; malformed nodes degrade
//! to empty ones instead of failing the load.

use crate::format::IdGenerator;
use crate::{lenient, Report, Status, Summary, TestSuite};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment/platform used when neither the node nor the summary has one
pub const UNKNOWN: &str = "Unknown";

/// Errors reading a payload from disk. Problems inside the payload are
/// never errors; they degrade the report instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read report {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report path is a directory: {}", .0.display())]
    Directory(PathBuf),
}

/// What the host page injected
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Nothing was injected (absent, empty, or `null`)
    Missing,
    Present(Value),
    /// Something was injected but it is not JSON
    Unparseable(String),
}

impl Payload {
    pub fn is_missing(&self) -> bool {
        matches!(self, Payload::Missing)
    }
}

/// Parse a bare JSON payload
pub fn parse_payload(text: &str) -> Payload {
    let text = text.trim();
    if text.is_empty() {
        return Payload::Missing;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Payload::Missing,
        Ok(value) => Payload::Present(value),
        Err(err) => Payload::Unparseable(err.to_string()),
    }
}

fn injection_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"window\.REPORT_DATA\s*=\s*").unwrap())
}

/// Find the `window.REPORT_DATA = ...;` assignment in an HTML report page
pub fn extract_injected(page: &str) -> Payload {
    let Some(marker) = injection_marker().find(page) else {
        return Payload::Missing;
    };
    let rest = page[marker.end()..].trim_start();
    if rest.is_empty() || rest.starts_with(';') || rest.starts_with("null") {
        return Payload::Missing;
    }

    // Only the first JSON value after the marker; the `;</script>` tail is ignored
    let mut de = serde_json::Deserializer::from_str(rest);
    match Value::deserialize(&mut de) {
        Ok(Value::Null) => Payload::Missing,
        Ok(value) => Payload::Present(value),
        Err(err) => Payload::Unparseable(err.to_string()),
    }
}

/// Read a payload from a file: `.json` files are the payload itself, any
/// other file is scanned for the injected assignment.
pub fn read_payload(path: &Path) -> Result<Payload, LoadError> {
    if path.is_dir() {
        return Err(LoadError::Directory(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    Ok(if is_json {
        parse_payload(&content)
    } else {
        extract_injected(&content)
    })
}

/// Turn a payload into a report. `None` means no report was injected.
pub fn load_report(payload: Payload, ids: &mut dyn IdGenerator) -> Option<Report> {
    match payload {
        Payload::Missing => None,
        Payload::Present(value) => Some(Report::from_value(value, ids)),
        Payload::Unparseable(reason) => {
            tracing::warn!(%reason, "injected report is not valid JSON, showing zero suites");
            Some(Report::empty())
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawReport {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(deserialize_with = "lenient::list")]
    suites: Vec<TestSuite>,
    #[serde(deserialize_with = "lenient::optional")]
    summary: Option<Summary>,
}

impl Report {
    /// Build a report from an injected JSON value, filling in whatever the
    /// backend left out. Never fails: a non-object yields zero suites.
    pub fn from_value(value: Value, ids: &mut dyn IdGenerator) -> Report {
        if !value.is_object() {
            tracing::warn!("injected report is not an object, showing zero suites");
            return Report::empty();
        }
        let raw: RawReport = serde_json::from_value(value).unwrap_or_default();

        let environment = raw
            .summary
            .as_ref()
            .map(|s| s.environment.clone())
            .filter(|v| !v.is_empty());
        let platform = raw
            .summary
            .as_ref()
            .map(|s| s.platform.clone())
            .filter(|v| !v.is_empty());

        let mut seen = HashSet::new();
        let mut suites = Vec::with_capacity(raw.suites.len());
        for suite in raw.suites {
            let mut suite =
                normalize_suite(suite, environment.as_deref(), platform.as_deref(), ids);
            if !seen.insert(suite.id.clone()) {
                tracing::debug!(id = %suite.id, "duplicate suite id replaced");
                suite.id = ids.next_id();
                seen.insert(suite.id.clone());
            }
            suites.push(suite);
        }

        let summary = raw.summary.unwrap_or_else(|| {
            Summary::from_suites(
                &suites,
                environment.as_deref().unwrap_or(UNKNOWN),
                platform.as_deref().unwrap_or(UNKNOWN),
            )
        });

        Report {
            id: if raw.id.is_empty() { ids.next_id() } else { raw.id },
            suites,
            summary,
        }
    }
}

/// The value every case agrees on, if any
fn shared<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut shared: Option<&str> = None;
    for value in values {
        if value.is_empty() {
            return None;
        }
        match shared {
            None => shared = Some(value),
            Some(s) if s == value => {}
            Some(_) => return None,
        }
    }
    shared.map(str::to_string)
}

fn normalize_suite(
    mut suite: TestSuite,
    environment: Option<&str>,
    platform: Option<&str>,
    ids: &mut dyn IdGenerator,
) -> TestSuite {
    if suite.id.is_empty() {
        suite.id = ids.next_id();
    }
    if suite.status == Status::Missing {
        suite.status = suite.derived_status();
    }
    if suite.environment.is_empty() {
        suite.environment = shared(suite.test_cases.iter().map(|c| c.environment.as_str()))
            .or_else(|| environment.map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string());
    }
    if suite.platform.is_empty() {
        suite.platform = shared(suite.test_cases.iter().map(|c| c.platform.as_str()))
            .or_else(|| platform.map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string());
    }
    let mut seen = HashSet::new();
    for case in &mut suite.test_cases {
        if case.id.is_empty() || !seen.insert(case.id.clone()) {
            case.id = ids.next_id();
            seen.insert(case.id.clone());
        }
        if case.environment.is_empty() {
            case.environment = suite.environment.clone();
        }
        if case.platform.is_empty() {
            case.platform = suite.platform.clone();
        }
        if case.duration == 0 && case.start_time > 0 && case.end_time > case.start_time {
            case.duration = (case.end_time - case.start_time) as u64;
        }
        for step in &mut case.steps {
            if step.id.is_empty() {
                step.id = ids.next_id();
            }
        }
    }

    if suite.duration == 0 {
        suite.duration = if suite.start_time > 0 && suite.end_time > suite.start_time {
            (suite.end_time - suite.start_time) as u64
        } else {
            suite
                .test_cases
                .iter()
                .fold(0u64, |acc, c| acc.saturating_add(c.duration))
        };
    }
    suite
}
