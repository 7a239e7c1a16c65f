//! Report view controller: Loading/Ready state machine plus interactions

use super::expansion::ExpansionState;
use super::filter::{self, FilterState};
use super::model::{self, ViewModel};
use super::ViewOptions;
use crate::format::IdGenerator;
use crate::loader::{load_report, Payload};
use crate::{Report, TestCase, TestSuite};

/// Where the controller is in its lifecycle. There is no way back from
/// `Ready` to `Loading`.
#[derive(Debug, Clone)]
pub enum ViewState {
    Loading,
    Ready(Report),
}

/// Owns the loaded report and all interaction state. Every mutation goes
/// through its methods; `view_model` recomputes the full view each time.
#[derive(Debug, Clone)]
pub struct ReportView {
    state: ViewState,
    filters: FilterState,
    expanded_suites: ExpansionState,
    expanded_cases: ExpansionState,
    options: ViewOptions,
}

impl ReportView {
    /// A controller still waiting for its report
    pub fn new(options: ViewOptions) -> Self {
        Self {
            state: ViewState::Loading,
            filters: FilterState::new(),
            expanded_suites: ExpansionState::new(),
            expanded_cases: ExpansionState::new(),
            options,
        }
    }

    /// A controller that is ready from the start
    pub fn with_report(report: Report, options: ViewOptions) -> Self {
        Self {
            state: ViewState::Ready(report),
            ..Self::new(options)
        }
    }

    /// Handle the one-time data injection. Returns true when this call moved
    /// the view to `Ready`. A missing payload leaves it loading; anything
    /// arriving after the report was received is ignored.
    pub fn receive(&mut self, payload: Payload, ids: &mut dyn IdGenerator) -> bool {
        if self.is_ready() {
            tracing::debug!("report already received, ignoring injection");
            return false;
        }
        match load_report(payload, ids) {
            Some(report) => {
                tracing::debug!(suites = report.suites.len(), "report received");
                self.state = ViewState::Ready(report);
                true
            }
            None => {
                tracing::debug!("no report injected, still loading");
                false
            }
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ViewState::Ready(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            ViewState::Ready(report) => Some(report),
            ViewState::Loading => None,
        }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.set_search_term(term);
    }

    pub fn set_status_filter(&mut self, value: &str) {
        self.filters.set_status(value);
    }

    pub fn set_environment_filter(&mut self, value: &str) {
        self.filters.set_environment(value);
    }

    pub fn set_platform_filter(&mut self, value: &str) {
        self.filters.set_platform(value);
    }

    pub fn toggle_filters_panel(&mut self) -> bool {
        self.filters.toggle_panel()
    }

    pub fn toggle_suite(&mut self, suite_id: &str) -> bool {
        self.expanded_suites.toggle(suite_id)
    }

    pub fn toggle_test_case(&mut self, test_case_id: &str) -> bool {
        self.expanded_cases.toggle(test_case_id)
    }

    /// Expand without toggling; returns false when no suite has this id
    pub fn expand_suite(&mut self, suite_id: &str) -> bool {
        let known = self.report().is_some_and(|r| r.suite(suite_id).is_some());
        if known {
            self.expanded_suites.expand(suite_id);
        }
        known
    }

    /// Expand a case and the suite holding it; returns false when no case has this id
    pub fn expand_test_case(&mut self, test_case_id: &str) -> bool {
        let owner = self.report().and_then(|r| {
            r.suites
                .iter()
                .find(|s| s.test_cases.iter().any(|c| c.id == test_case_id))
                .map(|s| s.id.clone())
        });
        match owner {
            Some(suite_id) => {
                self.expanded_suites.expand(&suite_id);
                self.expanded_cases.expand(test_case_id);
                true
            }
            None => false,
        }
    }

    pub fn is_suite_expanded(&self, suite_id: &str) -> bool {
        self.expanded_suites.is_expanded(suite_id)
    }

    pub fn is_test_case_expanded(&self, test_case_id: &str) -> bool {
        self.expanded_cases.is_expanded(test_case_id)
    }

    /// Expand every visible suite and every visible case inside it
    pub fn expand_all(&mut self) {
        let Some(report) = self.report() else {
            return;
        };
        let mut suite_ids = Vec::new();
        let mut case_ids = Vec::new();
        for suite in filter::visible_suites(&report.suites, &self.filters) {
            suite_ids.push(suite.id.clone());
            case_ids.extend(filter::visible_test_cases(suite, &self.filters).map(|c| c.id.clone()));
        }
        for id in &suite_ids {
            self.expanded_suites.expand(id);
        }
        for id in &case_ids {
            self.expanded_cases.expand(id);
        }
    }

    /// Clear the search, every filter and all expansion. The report stays.
    pub fn reset(&mut self) {
        self.filters.reset();
        self.expanded_suites.clear();
        self.expanded_cases.clear();
    }

    /// Suites passing the current filters; empty while loading
    pub fn visible_suites(&self) -> impl Iterator<Item = &TestSuite> + '_ {
        self.report()
            .into_iter()
            .flat_map(move |report| filter::visible_suites(&report.suites, &self.filters))
    }

    /// Cases of `suite` passing the current filters
    pub fn visible_test_cases<'a>(
        &'a self,
        suite: &'a TestSuite,
    ) -> impl Iterator<Item = &'a TestCase> + 'a {
        filter::visible_test_cases(suite, &self.filters)
    }

    pub fn status_options(&self) -> Vec<String> {
        filter::status_options()
    }

    pub fn environment_options(&self) -> Vec<String> {
        self.report()
            .map(filter::environment_options)
            .unwrap_or_default()
    }

    pub fn platform_options(&self) -> Vec<String> {
        self.report().map(filter::platform_options).unwrap_or_default()
    }

    /// Derive the full view from the current state
    pub fn view_model(&self) -> ViewModel {
        match &self.state {
            ViewState::Loading => ViewModel::Loading,
            ViewState::Ready(report) => ViewModel::Ready(model::derive(
                report,
                &self.filters,
                &self.expanded_suites,
                &self.expanded_cases,
                &self.options,
            )),
        }
    }
}

impl Default for ReportView {
    fn default() -> Self {
        Self::new(ViewOptions::default())
    }
}
