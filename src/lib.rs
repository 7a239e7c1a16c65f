//! Suitescope: interactive viewer for pre-computed test execution reports
//!
//! A report is produced elsewhere, injected once, and never mutated. This
//! library loads it leniently, keeps the filter and expansion state of the
//! viewer, and derives a view model that the reporters render.

pub mod config;
pub mod format;
mod lenient;
pub mod loader;
pub mod reporter;
pub mod view;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Outcome of a suite, test case, or step
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    Pass,
    Fail,
    Skip,
    Error,
    /// Aggregate bucket used by summaries and charts
    Total,
    /// Anything else the backend emitted, kept verbatim (e.g. "No Tests")
    Other(String),
    #[default]
    Missing,
}

impl Status {
    /// Statuses a user can filter on, in display order
    pub const FILTERABLE: [Status; 4] = [Status::Pass, Status::Fail, Status::Skip, Status::Error];

    pub fn parse(value: &str) -> Self {
        match value {
            "Pass" => Status::Pass,
            "Fail" => Status::Fail,
            "Skip" => Status::Skip,
            "Error" => Status::Error,
            "Total" => Status::Total,
            "" => Status::Missing,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
            Status::Skip => "Skip",
            Status::Error => "Error",
            Status::Total => "Total",
            Status::Other(s) => s,
            Status::Missing => "",
        }
    }

    /// Fail and Error both fail the enclosing suite
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(|s| Status::parse(&s))
    }
}

/// A loaded report: immutable once built by the loader
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub suites: Vec<TestSuite>,
    pub summary: Summary,
}

impl Report {
    /// A report with zero suites, used when the payload cannot be read
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            suites: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn suite(&self, id: &str) -> Option<&TestSuite> {
        self.suites.iter().find(|s| s.id == id)
    }

    pub fn total_test_cases(&self) -> usize {
        self.suites.iter().map(|s| s.test_cases.len()).sum()
    }
}

/// Aggregate numbers for the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    #[serde(deserialize_with = "lenient::count")]
    pub total_suites: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub total_test_cases: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub pass: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub fail: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub skip: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub error: u64,
    /// Wall time of the whole run in milliseconds
    #[serde(deserialize_with = "lenient::millis")]
    pub total_execution_time: u64,
    /// Unix timestamp in milliseconds
    #[serde(deserialize_with = "lenient::timestamp")]
    pub start_time: i64,
    /// Unix timestamp in milliseconds
    #[serde(deserialize_with = "lenient::timestamp")]
    pub end_time: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub environment: String,
    #[serde(deserialize_with = "lenient::string")]
    pub platform: String,
}

impl Summary {
    /// Recompute a summary from suites when the payload carried none
    pub fn from_suites(suites: &[TestSuite], environment: &str, platform: &str) -> Self {
        let mut summary = Summary {
            total_suites: suites.len() as u64,
            environment: environment.to_string(),
            platform: platform.to_string(),
            ..Summary::default()
        };

        let mut start: Option<i64> = None;
        let mut end: Option<i64> = None;
        for case in suites.iter().flat_map(|s| &s.test_cases) {
            summary.total_test_cases += 1;
            match case.status {
                Status::Pass => summary.pass += 1,
                Status::Fail => summary.fail += 1,
                Status::Skip => summary.skip += 1,
                Status::Error => summary.error += 1,
                _ => {}
            }
            if case.start_time > 0 {
                start = Some(start.map_or(case.start_time, |s| s.min(case.start_time)));
            }
            if case.end_time > 0 {
                end = Some(end.map_or(case.end_time, |e| e.max(case.end_time)));
            }
        }

        summary.start_time = start.unwrap_or_default();
        summary.end_time = end.unwrap_or_default();
        summary.total_execution_time = match (start, end) {
            (Some(s), Some(e)) if e >= s => (e - s) as u64,
            _ => suites
                .iter()
                .fold(0u64, |acc, s| acc.saturating_add(s.duration)),
        };
        summary
    }
}

/// A named group of test cases with an aggregate status and duration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestSuite {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    pub status: Status,
    #[serde(deserialize_with = "lenient::string")]
    pub environment: String,
    #[serde(deserialize_with = "lenient::string")]
    pub platform: String,
    /// Duration in milliseconds
    #[serde(deserialize_with = "lenient::millis")]
    pub duration: u64,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub start_time: i64,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub end_time: i64,
    #[serde(deserialize_with = "lenient::list")]
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// Status implied by the contained cases
    pub fn derived_status(&self) -> Status {
        if self.test_cases.is_empty() {
            Status::Other("No Tests".to_string())
        } else if self.test_cases.iter().any(|c| c.status.is_failure()) {
            Status::Fail
        } else {
            Status::Pass
        }
    }
}

/// An individual test result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCase {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub status: Status,
    /// Duration in milliseconds
    #[serde(deserialize_with = "lenient::millis")]
    pub duration: u64,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub start_time: i64,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub end_time: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub environment: String,
    #[serde(deserialize_with = "lenient::string")]
    pub platform: String,
    #[serde(deserialize_with = "lenient::list")]
    pub steps: Vec<TestStep>,
    #[serde(deserialize_with = "lenient::strings")]
    pub logs: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub events: Vec<TestEvent>,
}

/// One step inside a test case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestStep {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub status: Status,
    #[serde(deserialize_with = "lenient::millis")]
    pub duration: u64,
}

/// Something noteworthy that happened during a test case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestEvent {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub timestamp: i64,
    /// Info, Warning, Debug or Error
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub message: String,
}
