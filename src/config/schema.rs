//! Config schema and deserialization

use crate::format::TimeZoneMode;
use crate::view::{ReportView, ViewOptions, DEFAULT_TOP_SUITES};
use serde::{Deserialize, Serialize};

/// Filter values applied when the report is opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// "All", "Pass", "Fail", "Skip" or "Error"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl FilterDefaults {
    fn merge_from(&mut self, base: FilterDefaults) {
        if self.search.is_none() {
            self.search = base.search;
        }
        if self.status.is_none() {
            self.status = base.status;
        }
        if self.environment.is_none() {
            self.environment = base.environment;
        }
        if self.platform.is_none() {
            self.platform = base.platform;
        }
    }
}

/// Root config structure for .suitescoperc.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Initial filters
    #[serde(default)]
    pub filters: FilterDefaults,

    /// Render timestamps in local time (default) or UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZoneMode>,

    /// Length of the duration ranking. Default: 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_suites: Option<usize>,

    /// Colored console output. Default: true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,

    /// Open with every visible suite and case expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_all: Option<bool>,
}

impl Config {
    /// Merge another config into this one. Values already set here win.
    pub fn merge_from(&mut self, base: Config) {
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        self.filters.merge_from(base.filters);
        if self.time_zone.is_none() {
            self.time_zone = base.time_zone;
        }
        if self.top_suites.is_none() {
            self.top_suites = base.top_suites;
        }
        if self.colors.is_none() {
            self.colors = base.colors;
        }
        if self.expand_all.is_none() {
            self.expand_all = base.expand_all;
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            time_zone: self.time_zone.unwrap_or_default(),
            top_suites: self.top_suites.unwrap_or(DEFAULT_TOP_SUITES),
        }
    }

    pub fn use_colors(&self) -> bool {
        self.colors.unwrap_or(true)
    }

    pub fn expand_all(&self) -> bool {
        self.expand_all.unwrap_or(false)
    }

    /// Push the configured filters into a view
    pub fn apply_filters(&self, view: &mut ReportView) {
        if let Some(search) = &self.filters.search {
            view.set_search_term(search.as_str());
        }
        if let Some(status) = &self.filters.status {
            view.set_status_filter(status);
        }
        if let Some(environment) = &self.filters.environment {
            view.set_environment_filter(environment);
        }
        if let Some(platform) = &self.filters.platform {
            view.set_platform_filter(platform);
        }
    }
}
