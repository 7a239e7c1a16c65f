//! Interactive view over a loaded report

pub mod controller;
pub mod expansion;
pub mod filter;
pub mod model;

pub use controller::{ReportView, ViewState};
pub use expansion::ExpansionState;
pub use filter::{FilterState, FilterValue, ALL};
pub use model::ViewModel;

use crate::format::TimeZoneMode;

/// How many suites the duration ranking shows by default
pub const DEFAULT_TOP_SUITES: usize = 5;

/// Presentation settings that do not change what is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub time_zone: TimeZoneMode,
    pub top_suites: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            time_zone: TimeZoneMode::Local,
            top_suites: DEFAULT_TOP_SUITES,
        }
    }
}
