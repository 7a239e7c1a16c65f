//! View model: everything a renderer needs, derived from scratch
//!
//! `derive` is a pure function of the report, the filters and the two
//! expansion stores. Renderers never look at the report directly.

use super::expansion::ExpansionState;
use super::filter::{self, FilterState, FilterValue};
use super::ViewOptions;
use crate::format::{format_date_time, format_duration, status_color};
use crate::{Report, Status, TestCase, TestSuite};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewModel {
    /// No report has been injected yet
    Loading,
    Ready(ReadyView),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyView {
    pub summary: SummaryCards,
    /// Whole-run status split from the summary; empty buckets are dropped
    pub status_distribution: Vec<StatusSlice>,
    /// Visible suites ranked by duration, longest first
    pub top_suites: Vec<SuiteBar>,
    /// Status counts over visible test cases
    pub filtered_counts: StatusCounts,
    pub filters_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_panel: Option<FilterPanel>,
    pub suites: Vec<SuiteRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCards {
    pub total_test_cases: u64,
    pub total_suites: u64,
    pub total_execution_time: String,
    pub start_time: String,
    pub end_time: String,
    pub environment: String,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    pub label: &'static str,
    pub status: Status,
    pub count: u64,
    /// Rounded share of the four buckets
    pub percent: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteBar {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pass: u64,
    pub fail: u64,
    pub skip: u64,
    pub error: u64,
    pub total: u64,
}

impl StatusCounts {
    fn record(&mut self, status: &Status) {
        self.total += 1;
        match status {
            Status::Pass => self.pass += 1,
            Status::Fail => self.fail += 1,
            Status::Skip => self.skip += 1,
            Status::Error => self.error += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPanel {
    pub search: String,
    pub status: FilterValue,
    pub environment: FilterValue,
    pub platform: FilterValue,
    pub status_options: Vec<String>,
    pub environment_options: Vec<String>,
    pub platform_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteRow {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub color: &'static str,
    /// Visible cases, whether or not the suite is expanded
    pub case_count: usize,
    pub duration: String,
    pub expanded: bool,
    /// Only filled when the suite is expanded
    pub test_cases: Vec<CaseRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRow {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub color: &'static str,
    pub duration: String,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<CaseDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub environment: String,
    pub platform: String,
    pub steps: Vec<StepRow>,
    pub logs: Vec<String>,
    pub events: Vec<EventRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRow {
    pub status: Status,
    pub color: &'static str,
    pub description: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub time: String,
    pub kind: String,
    pub message: String,
}

/// Build the ready view for the current state
pub fn derive(
    report: &Report,
    filters: &FilterState,
    expanded_suites: &ExpansionState,
    expanded_cases: &ExpansionState,
    options: &ViewOptions,
) -> ReadyView {
    let visible: Vec<&TestSuite> = filter::visible_suites(&report.suites, filters).collect();

    let mut filtered_counts = StatusCounts::default();
    let suites = visible
        .iter()
        .map(|suite| {
            let cases: Vec<&TestCase> = filter::visible_test_cases(suite, filters).collect();
            for case in &cases {
                filtered_counts.record(&case.status);
            }
            suite_row(suite, &cases, expanded_suites, expanded_cases, options)
        })
        .collect();

    let mut ranked = visible.clone();
    ranked.sort_by(|a, b| b.duration.cmp(&a.duration));
    let top_suites = ranked
        .into_iter()
        .take(options.top_suites)
        .map(|s| SuiteBar {
            id: s.id.clone(),
            name: s.name.clone(),
            duration_ms: s.duration,
            duration: format_duration(s.duration),
        })
        .collect();

    let filter_panel = filters.show_filters().then(|| FilterPanel {
        search: filters.search_term().to_string(),
        status: filters.status().clone(),
        environment: filters.environment().clone(),
        platform: filters.platform().clone(),
        status_options: filter::status_options(),
        environment_options: filter::environment_options(report),
        platform_options: filter::platform_options(report),
    });

    ReadyView {
        summary: summary_cards(report, options),
        status_distribution: status_distribution(report),
        top_suites,
        filtered_counts,
        filters_active: filters.is_active(),
        filter_panel,
        suites,
    }
}

fn summary_cards(report: &Report, options: &ViewOptions) -> SummaryCards {
    let summary = &report.summary;
    SummaryCards {
        total_test_cases: summary.total_test_cases,
        total_suites: summary.total_suites,
        total_execution_time: format_duration(summary.total_execution_time),
        start_time: format_date_time(summary.start_time, options.time_zone),
        end_time: format_date_time(summary.end_time, options.time_zone),
        environment: summary.environment.clone(),
        platform: summary.platform.clone(),
    }
}

fn status_distribution(report: &Report) -> Vec<StatusSlice> {
    let summary = &report.summary;
    let buckets = [
        ("Passed", Status::Pass, summary.pass),
        ("Failed", Status::Fail, summary.fail),
        ("Skipped", Status::Skip, summary.skip),
        ("Errors", Status::Error, summary.error),
    ];
    let total = buckets
        .iter()
        .fold(0u64, |acc, (_, _, count)| acc.saturating_add(*count));

    buckets
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(label, status, count)| StatusSlice {
            label,
            color: status_color(&status),
            status,
            count,
            percent: percent_of(count, total),
        })
        .collect()
}

/// Rounded share in whole percent, never above 100
fn percent_of(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (u128::from(count), u128::from(total));
    ((count * 100 + total / 2) / total).min(100) as u64
}

fn suite_row(
    suite: &TestSuite,
    cases: &[&TestCase],
    expanded_suites: &ExpansionState,
    expanded_cases: &ExpansionState,
    options: &ViewOptions,
) -> SuiteRow {
    let expanded = expanded_suites.is_expanded(&suite.id);
    let test_cases = if expanded {
        cases
            .iter()
            .map(|case| case_row(case, expanded_cases.is_expanded(&case.id), options))
            .collect()
    } else {
        Vec::new()
    };

    SuiteRow {
        id: suite.id.clone(),
        name: suite.name.clone(),
        color: status_color(&suite.status),
        status: suite.status.clone(),
        case_count: cases.len(),
        duration: format_duration(suite.duration),
        expanded,
        test_cases,
    }
}

fn case_row(case: &TestCase, expanded: bool, options: &ViewOptions) -> CaseRow {
    let detail = expanded.then(|| CaseDetail {
        description: case.description.clone(),
        start_time: format_date_time(case.start_time, options.time_zone),
        end_time: format_date_time(case.end_time, options.time_zone),
        environment: case.environment.clone(),
        platform: case.platform.clone(),
        steps: case
            .steps
            .iter()
            .map(|step| StepRow {
                color: status_color(&step.status),
                status: step.status.clone(),
                description: step.description.clone(),
                duration: format_duration(step.duration),
            })
            .collect(),
        logs: case.logs.clone(),
        events: case
            .events
            .iter()
            .map(|event| EventRow {
                time: format_date_time(event.timestamp, options.time_zone),
                kind: event.kind.clone(),
                message: event.message.clone(),
            })
            .collect(),
    });

    CaseRow {
        id: case.id.clone(),
        name: case.name.clone(),
        color: status_color(&case.status),
        status: case.status.clone(),
        duration: format_duration(case.duration),
        expanded,
        detail,
    }
}
