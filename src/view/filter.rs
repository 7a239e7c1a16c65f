//! Search term and filter selections, and the predicates they imply

use crate::{Report, Status, TestCase, TestSuite};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// The filter value that imposes no constraint
pub const ALL: &str = "All";

/// A single filter dimension: either unconstrained or one exact value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    /// Any string is accepted; only "All" means unconstrained
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            FilterValue::All
        } else {
            FilterValue::Only(value.to_string())
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(value) => value == candidate,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterValue::All => ALL,
            FilterValue::Only(value) => value,
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Current search term and filter selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    status: FilterValue,
    environment: FilterValue,
    platform: FilterValue,
    show_filters: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_status(&mut self, value: &str) {
        self.status = FilterValue::parse(value);
    }

    pub fn set_environment(&mut self, value: &str) {
        self.environment = FilterValue::parse(value);
    }

    pub fn set_platform(&mut self, value: &str) {
        self.platform = FilterValue::parse(value);
    }

    /// Show or hide the filter panel; filter values are untouched
    pub fn toggle_panel(&mut self) -> bool {
        self.show_filters = !self.show_filters;
        self.show_filters
    }

    /// Back to no search and every filter on "All". The panel stays as is.
    pub fn reset(&mut self) {
        let show_filters = self.show_filters;
        *self = Self {
            show_filters,
            ..Self::default()
        };
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> &FilterValue {
        &self.status
    }

    pub fn environment(&self) -> &FilterValue {
        &self.environment
    }

    pub fn platform(&self) -> &FilterValue {
        &self.platform
    }

    pub fn show_filters(&self) -> bool {
        self.show_filters
    }

    /// Whether anything narrows the report at all
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || !self.status.is_all()
            || !self.environment.is_all()
            || !self.platform.is_all()
    }

    /// Case-insensitive substring match; an empty term matches everything
    pub fn search_matches(&self, text: &str) -> bool {
        self.search.is_empty() || text.to_lowercase().contains(&self.search.to_lowercase())
    }

    /// Suite-level visibility: the search hits the suite name or one of its
    /// case names, and every non-"All" filter equals the suite's value.
    pub fn matches_suite(&self, suite: &TestSuite) -> bool {
        let search_hit = self.search_matches(&suite.name)
            || suite.test_cases.iter().any(|c| self.search_matches(&c.name));
        search_hit
            && self.status.matches(suite.status.as_str())
            && self.environment.matches(&suite.environment)
            && self.platform.matches(&suite.platform)
    }

    /// Case-level visibility inside a visible suite. The search term is not
    /// applied to cases when the suite name already matched it.
    pub fn matches_case(&self, suite: &TestSuite, case: &TestCase) -> bool {
        let search_hit = self.search.is_empty()
            || self.search_matches(&suite.name)
            || self.search_matches(&case.name)
            || self.search_matches(&case.description)
            || case.steps.iter().any(|s| self.search_matches(&s.description));
        search_hit
            && self.status.matches(case.status.as_str())
            && self.environment.matches(&case.environment)
            && self.platform.matches(&case.platform)
    }
}

/// Suites passing the filters, in report order
pub fn visible_suites<'a>(
    suites: &'a [TestSuite],
    filters: &'a FilterState,
) -> impl Iterator<Item = &'a TestSuite> + 'a {
    suites.iter().filter(move |s| filters.matches_suite(s))
}

/// Cases of a suite passing the filters, in report order
pub fn visible_test_cases<'a>(
    suite: &'a TestSuite,
    filters: &'a FilterState,
) -> impl Iterator<Item = &'a TestCase> + 'a {
    suite
        .test_cases
        .iter()
        .filter(move |c| filters.matches_case(suite, c))
}

/// "All" followed by the filterable statuses
pub fn status_options() -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(Status::FILTERABLE.iter().map(|s| s.as_str().to_string()))
        .collect()
}

/// "All" followed by every suite environment in the report, sorted.
/// Suites are matched on their own value, so case-only values are left out.
pub fn environment_options(report: &Report) -> Vec<String> {
    collect_options(report, |s| &s.environment)
}

/// "All" followed by every suite platform in the report, sorted
pub fn platform_options(report: &Report) -> Vec<String> {
    collect_options(report, |s| &s.platform)
}

fn collect_options(report: &Report, suite_value: impl Fn(&TestSuite) -> &String) -> Vec<String> {
    let mut values: BTreeSet<&str> = report
        .suites
        .iter()
        .map(|s| suite_value(s).as_str())
        .collect();
    values.remove("");
    values.remove(ALL);
    std::iter::once(ALL.to_string())
        .chain(values.into_iter().map(str::to_string))
        .collect()
}
