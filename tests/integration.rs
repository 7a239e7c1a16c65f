//! Integration tests: load fixture reports and drive the view like a user would

use std::collections::HashSet;
use std::path::PathBuf;
use suitescope::format::{RandomIds, TimeZoneMode};
use suitescope::loader::{read_payload, Payload, UNKNOWN};
use suitescope::view::{ReportView, ViewModel, ViewOptions};
use suitescope::Status;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn open(name: &str) -> ReportView {
    let payload = read_payload(&fixture(name))
        .unwrap_or_else(|e| panic!("read_payload({}) failed: {}", name, e));
    let mut view = ReportView::new(ViewOptions {
        time_zone: TimeZoneMode::Utc,
        top_suites: 5,
    });
    view.receive(payload, &mut RandomIds::seeded(42));
    view
}

fn visible(view: &ReportView) -> Vec<String> {
    view.visible_suites().map(|s| s.id.clone()).collect()
}

fn is_uuid(id: &str) -> bool {
    id.len() == 36 && id.as_bytes()[14] == b'4' && id.chars().filter(|c| *c == '-').count() == 4
}

// --- Loading ---

#[test]
fn json_report_loads_all_suites() {
    let view = open("report.json");
    assert!(view.is_ready());
    assert_eq!(visible(&view), vec!["suite-login", "suite-search", "suite-profile"]);
    let report = view.report().unwrap();
    assert_eq!(report.total_test_cases(), 5);
    assert_eq!(report.summary.environment, "Staging");
}

#[test]
fn html_report_matches_json_report() {
    let from_json = open("report.json");
    let from_html = open("report.html");
    let a = serde_json::to_value(from_json.report().unwrap()).unwrap();
    let b = serde_json::to_value(from_html.report().unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_placeholder_stays_loading() {
    let payload = read_payload(&fixture("placeholder.html")).unwrap();
    assert_eq!(payload, Payload::Missing);

    let mut view = ReportView::default();
    view.receive(payload, &mut RandomIds::seeded(1));
    assert!(!view.is_ready());
    assert!(matches!(view.view_model(), ViewModel::Loading));
}

#[test]
fn missing_file_is_an_error() {
    let err = read_payload(&fixture("does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read report"));
}

#[test]
fn directory_is_an_error() {
    assert!(read_payload(&fixture("")).is_err());
}

// --- Sparse data ---

#[test]
fn sparse_report_is_completed() {
    let view = open("sparse.json");
    let report = view.report().unwrap();
    assert_eq!(report.suites.len(), 3);
    assert!(is_uuid(&report.id));

    let checkout = &report.suites[0];
    assert_eq!(checkout.name, "Checkout");
    assert_eq!(checkout.status, Status::Fail);
    // the non-object case has no environment, so the cases disagree
    assert_eq!(checkout.environment, UNKNOWN);
    assert_eq!(checkout.test_cases.len(), 3);
    assert_eq!(checkout.test_cases[0].duration, 2_000);
    assert_eq!(checkout.test_cases[0].environment, "QA");
    assert_eq!(checkout.test_cases[2].environment, UNKNOWN);
    assert_eq!(checkout.duration, 2_000);

    assert_eq!(report.suites[1].status, Status::Other("No Tests".into()));
    assert_eq!(report.suites[2].name, "");
}

#[test]
fn sparse_report_ids_are_unique() {
    let view = open("sparse.json");
    let report = view.report().unwrap();
    let mut ids = HashSet::new();
    for suite in &report.suites {
        assert!(is_uuid(&suite.id), "suite id {}", suite.id);
        assert!(ids.insert(suite.id.clone()));
        for case in &suite.test_cases {
            assert!(ids.insert(case.id.clone()));
        }
    }
}

#[test]
fn sparse_report_summary_is_computed() {
    let view = open("sparse.json");
    let summary = &view.report().unwrap().summary;
    assert_eq!(summary.total_suites, 3);
    assert_eq!(summary.total_test_cases, 3);
    assert_eq!(summary.pass, 1);
    assert_eq!(summary.error, 1);
    assert_eq!(summary.total_execution_time, 2_000);
    assert_eq!(summary.environment, UNKNOWN);
}

// --- Interaction ---

#[test]
fn status_then_environment_narrows() {
    let mut view = open("report.json");
    view.set_status_filter("Pass");
    assert_eq!(visible(&view), vec!["suite-search", "suite-profile"]);
    view.set_environment_filter("Staging");
    assert_eq!(visible(&view), vec!["suite-profile"]);
    view.set_platform_filter("Firefox");
    assert!(visible(&view).is_empty());
}

#[test]
fn search_narrows_cases_inside_matching_suite() {
    let mut view = open("report.json");
    view.set_search_term("invalid");
    assert_eq!(visible(&view), vec!["suite-login"]);

    let suite = view.report().unwrap().suite("suite-login").unwrap();
    let cases: Vec<_> = view.visible_test_cases(suite).map(|c| c.id.as_str()).collect();
    assert_eq!(cases, vec!["case-invalid"]);
}

#[test]
fn whole_session() {
    let mut view = open("report.json");
    view.toggle_filters_panel();
    view.set_status_filter("Fail");
    view.expand_all();

    let ViewModel::Ready(ready) = view.view_model() else {
        panic!("expected ready view");
    };
    assert!(ready.filters_active);
    assert_eq!(ready.suites.len(), 1);
    assert_eq!(ready.filtered_counts.fail, 1);
    assert_eq!(ready.filtered_counts.total, 1);

    let login = &ready.suites[0];
    assert!(login.expanded);
    let detail = login.test_cases[0].detail.as_ref().unwrap();
    assert_eq!(detail.events[0].message, "Assertion failed: banner not visible");
    assert_eq!(detail.events[0].time, "Jan 5, 2024, 03:04:09 PM");
    assert_eq!(detail.steps[0].duration, "800ms");

    let panel = ready.filter_panel.as_ref().unwrap();
    assert_eq!(panel.environment_options, vec!["All", "Production", "Staging"]);
    assert_eq!(panel.platform_options, vec!["All", "Chrome", "Firefox"]);

    view.reset();
    assert!(!view.is_suite_expanded("suite-login"));
    assert_eq!(visible(&view).len(), 3);
}

#[test]
fn summary_cards_and_ranking() {
    let view = open("report.json");
    let ViewModel::Ready(ready) = view.view_model() else {
        panic!("expected ready view");
    };
    assert_eq!(ready.summary.total_execution_time, "2m 5s");
    assert_eq!(ready.summary.start_time, "Jan 5, 2024, 03:04:05 PM");
    assert_eq!(ready.summary.end_time, "Jan 5, 2024, 03:06:10 PM");
    let ranked: Vec<_> = ready.top_suites.iter().map(|s| s.duration.as_str()).collect();
    assert_eq!(ranked, vec!["1m 5s", "45s", "15s"]);
    let labels: Vec<_> = ready.status_distribution.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["Passed", "Failed", "Skipped"]);
    assert_eq!(ready.status_distribution[0].percent, 60);
}
