//! JSON reporter for machine-readable output

use crate::view::ViewModel;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serialize the derived view
    pub fn report(&self, view: &ViewModel) -> String {
        if self.pretty {
            serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(view).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RandomIds;
    use crate::loader::Payload;
    use crate::view::ReportView;
    use serde_json::{json, Value};

    fn ready_view() -> ReportView {
        let mut view = ReportView::default();
        view.receive(
            Payload::Present(json!({
                "suites": [{"id": "s1", "name": "Checkout", "status": "Pass",
                            "testCases": [{"id": "c1", "name": "pay", "status": "Pass", "duration": 1200}]}]
            })),
            &mut RandomIds::seeded(7),
        );
        view
    }

    #[test]
    fn test_loading_state() {
        let out = JsonReporter::new().report(&ReportView::default().view_model());
        assert_eq!(out, r#"{"state":"loading"}"#);
    }

    #[test]
    fn test_ready_state_fields() {
        let mut view = ready_view();
        view.toggle_suite("s1");
        let out = JsonReporter::new().report(&view.view_model());
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["state"], "ready");
        assert_eq!(value["summary"]["totalTestCases"], 1);
        assert_eq!(value["suites"][0]["caseCount"], 1);
        assert_eq!(value["suites"][0]["testCases"][0]["duration"], "1s");
        assert_eq!(value["filteredCounts"]["pass"], 1);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let out = JsonReporter::new().pretty().report(&ready_view().view_model());
        assert!(out.contains('\n'));
        assert!(out.contains("  \"state\": \"ready\""));
    }
}
