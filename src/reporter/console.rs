//! Console reporter with colored output

use crate::view::model::{CaseRow, ReadyView, StatusCounts, SuiteRow};
use crate::view::ViewModel;
use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 60;
const BAR_WIDTH: usize = 20;

/// Appends one line to the output buffer
macro_rules! emit {
    ($out:expr) => {
        $out.push('\n')
    };
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}

/// Renders a view model for the terminal
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Print the rendered view to stdout
    pub fn report(&self, view: &ViewModel) {
        print!("{}", self.render(view));
    }

    /// Render the view to a string
    pub fn render(&self, view: &ViewModel) -> String {
        let mut out = String::new();
        match view {
            ViewModel::Loading => {
                emit!(out, "{}", self.paint("⏳ Loading Report...", |s| s.dimmed()));
            }
            ViewModel::Ready(ready) => self.render_ready(&mut out, ready),
        }
        out
    }

    fn render_ready(&self, out: &mut String, view: &ReadyView) {
        self.write_header(out, view);
        self.write_distribution(out, view);
        self.write_top_suites(out, view);
        self.write_filter_panel(out, view);
        self.write_filtered_counts(out, &view.filtered_counts);
        self.write_suites(out, view);
    }

    fn write_header(&self, out: &mut String, view: &ReadyView) {
        let s = &view.summary;
        emit!(out);
        emit!(out, "{}", self.paint("📊 Test Automation Execution Report", |s| s.bold()));
        emit!(out, "   Environment: {} | Platform: {}", s.environment, s.platform);
        emit!(out, "   Start: {} | End: {}", s.start_time, s.end_time);
        emit!(out);
        emit!(
            out,
            "   Test Cases: {}   Suites: {}   Execution Time: {}",
            self.paint(&s.total_test_cases.to_string(), |s| s.bold()),
            self.paint(&s.total_suites.to_string(), |s| s.bold()),
            self.paint(&s.total_execution_time, |s| s.bold()),
        );
        emit!(out);
    }

    fn write_distribution(&self, out: &mut String, view: &ReadyView) {
        if view.status_distribution.is_empty() {
            return;
        }
        emit!(out, "   {}", self.paint("Status Distribution:", |s| s.bold()));
        for slice in &view.status_distribution {
            emit!(
                out,
                "   {} {:<8} {:>4} ({}%)",
                self.paint_hex(&percent_bar(slice.percent), slice.color),
                slice.label,
                slice.count,
                slice.percent
            );
        }
        emit!(out);
    }

    fn write_top_suites(&self, out: &mut String, view: &ReadyView) {
        if view.top_suites.is_empty() {
            return;
        }
        let title = format!("Top {} Suites by Execution Time:", view.top_suites.len());
        emit!(out, "   {}", self.paint(&title, |s| s.bold()));
        let width = view
            .top_suites
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        for bar in &view.top_suites {
            emit!(out, "   {:<width$}  {}", bar.name, bar.duration, width = width);
        }
        emit!(out);
    }

    fn write_filter_panel(&self, out: &mut String, view: &ReadyView) {
        let Some(panel) = &view.filter_panel else {
            return;
        };
        let options = |values: &[String]| self.paint(&format!("({})", values.join(", ")), |s| s.dimmed());
        emit!(out, "   {}", self.paint("Filters:", |s| s.bold()));
        emit!(out, "   Search:      \"{}\"", panel.search);
        emit!(out, "   Status:      {} {}", panel.status.as_str(), options(&panel.status_options));
        emit!(
            out,
            "   Environment: {} {}",
            panel.environment.as_str(),
            options(&panel.environment_options)
        );
        emit!(out, "   Platform:    {} {}", panel.platform.as_str(), options(&panel.platform_options));
        emit!(out);
    }

    fn write_filtered_counts(&self, out: &mut String, counts: &StatusCounts) {
        if counts.total == 0 {
            return;
        }
        emit!(
            out,
            "   Passed: {} | Failed: {} | Skipped: {} | Errors: {}",
            self.paint(&counts.pass.to_string(), |s| s.green()),
            self.paint(&counts.fail.to_string(), |s| s.red()),
            self.paint(&counts.skip.to_string(), |s| s.yellow()),
            self.paint(&counts.error.to_string(), |s| s.purple()),
        );
        emit!(out);
    }

    fn write_suites(&self, out: &mut String, view: &ReadyView) {
        emit!(out, "{}", "─".repeat(RULE_WIDTH));
        emit!(out, "{}", self.paint("Test Case Details", |s| s.bold()));
        emit!(out, "{}", "─".repeat(RULE_WIDTH));

        if view.suites.is_empty() {
            let message = "No test suites or test cases match your current filters.";
            emit!(out, "   {}", self.paint(message, |s| s.dimmed()));
            return;
        }
        for suite in &view.suites {
            self.write_suite(out, suite);
        }
    }

    fn write_suite(&self, out: &mut String, suite: &SuiteRow) {
        let chevron = if suite.expanded { "▾" } else { "▸" };
        let stats = format!("Cases: {}  Duration: {}", suite.case_count, suite.duration);
        emit!(
            out,
            "{} {} [{}]  {}",
            chevron,
            self.paint(&suite.name, |s| s.bold()),
            self.paint_hex(suite.status.as_str(), suite.color),
            self.paint(&stats, |s| s.dimmed())
        );
        if !suite.expanded {
            return;
        }
        if suite.test_cases.is_empty() {
            let message = "No test cases in this suite match the filters.";
            emit!(out, "    {}", self.paint(message, |s| s.dimmed()));
            return;
        }
        for case in &suite.test_cases {
            self.write_case(out, case);
        }
    }

    fn write_case(&self, out: &mut String, case: &CaseRow) {
        let chevron = if case.expanded { "▾" } else { "▸" };
        emit!(
            out,
            "    {} {} {}  {}",
            chevron,
            self.paint_hex(case.status.as_str(), case.color),
            case.name,
            self.paint(&format!("Duration: {}", case.duration), |s| s.dimmed())
        );
        let Some(detail) = &case.detail else {
            return;
        };

        let label = |text: &str| self.paint(text, |s| s.bold());
        emit!(out, "        {} {}", label("Description:"), detail.description);
        emit!(out, "        {} {}", label("Start Time:"), detail.start_time);
        emit!(out, "        {} {}", label("End Time:"), detail.end_time);
        emit!(out, "        {} {}", label("Environment:"), detail.environment);
        emit!(out, "        {} {}", label("Platform:"), detail.platform);

        if !detail.steps.is_empty() {
            emit!(out, "        {}", label("Steps:"));
            for step in &detail.steps {
                emit!(
                    out,
                    "          • {}: {} ({})",
                    self.paint_hex(step.status.as_str(), step.color),
                    step.description,
                    step.duration
                );
            }
        }
        if !detail.logs.is_empty() {
            emit!(out, "        {}", label("Logs:"));
            for line in &detail.logs {
                emit!(out, "          {}", line);
            }
        }
        if !detail.events.is_empty() {
            emit!(out, "        {}", label("Events:"));
            for event in &detail.events {
                let kind = format!("[{}]", event.kind);
                let kind = match event.kind.as_str() {
                    "Error" => self.paint(&kind, |s| s.red().bold()),
                    "Warning" => self.paint(&kind, |s| s.yellow().bold()),
                    _ => self.paint(&kind, |s| s.blue().bold()),
                };
                emit!(
                    out,
                    "          {} {} {}",
                    self.paint(&event.time, |s| s.dimmed()),
                    kind,
                    event.message
                );
            }
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_hex(&self, text: &str, hex: &str) -> String {
        match hex_rgb(hex) {
            Some((r, g, b)) if self.use_colors => text.truecolor(r, g, b).bold().to_string(),
            _ => text.to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-width bar; percentages above 100 fill it
fn percent_bar(percent: u64) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// "#RRGGBB" to its components
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TimeZoneMode;
    use crate::view::{ReportView, ViewOptions};
    use crate::{Report, Status, Summary, TestCase, TestStep, TestSuite};

    fn view() -> ReportView {
        let report = Report {
            id: "r".into(),
            suites: vec![
                TestSuite {
                    id: "s1".into(),
                    name: "Login".into(),
                    status: Status::Fail,
                    environment: "QA".into(),
                    platform: "Linux".into(),
                    duration: 65_000,
                    test_cases: vec![TestCase {
                        id: "c1".into(),
                        name: "wrong password".into(),
                        description: "rejects bad credentials".into(),
                        status: Status::Fail,
                        duration: 400,
                        environment: "QA".into(),
                        platform: "Linux".into(),
                        steps: vec![TestStep {
                            id: "st".into(),
                            description: "submit form".into(),
                            status: Status::Fail,
                            duration: 120,
                        }],
                        logs: vec!["expected 401".into()],
                        ..TestCase::default()
                    }],
                    ..TestSuite::default()
                },
                TestSuite {
                    id: "s2".into(),
                    name: "Search".into(),
                    status: Status::Pass,
                    environment: "QA".into(),
                    platform: "Linux".into(),
                    ..TestSuite::default()
                },
            ],
            summary: Summary {
                total_suites: 2,
                total_test_cases: 1,
                fail: 1,
                total_execution_time: 65_000,
                environment: "QA".into(),
                platform: "Linux".into(),
                ..Summary::default()
            },
        };
        ReportView::with_report(
            report,
            ViewOptions {
                time_zone: TimeZoneMode::Utc,
                top_suites: 5,
            },
        )
    }

    fn render(view: &ReportView) -> String {
        ConsoleReporter::new().without_colors().render(&view.view_model())
    }

    #[test]
    fn test_loading_indicator() {
        let out = render(&ReportView::default());
        assert!(out.contains("Loading Report..."));
    }

    #[test]
    fn test_summary_and_collapsed_suites() {
        let out = render(&view());
        assert!(out.contains("Test Cases: 1   Suites: 2   Execution Time: 1m 5s"));
        assert!(out.contains("▸ Login [Fail]"));
        assert!(out.contains("Cases: 1  Duration: 1m 5s"));
        assert!(!out.contains("wrong password"));
        assert!(out.contains("Failed   "));
        assert!(out.contains("(100%)"));
    }

    #[test]
    fn test_expanded_case_details() {
        let mut v = view();
        v.toggle_suite("s1");
        v.toggle_test_case("c1");
        let out = render(&v);
        assert!(out.contains("▾ Login [Fail]"));
        assert!(out.contains("▾ Fail wrong password  Duration: 400ms"));
        assert!(out.contains("Description: rejects bad credentials"));
        assert!(out.contains("• Fail: submit form (120ms)"));
        assert!(out.contains("expected 401"));
    }

    #[test]
    fn test_expanded_suite_without_matching_cases() {
        let mut v = view();
        v.toggle_suite("s2");
        let out = render(&v);
        assert!(out.contains("No test cases in this suite match the filters."));
    }

    #[test]
    fn test_no_matches_message() {
        let mut v = view();
        v.set_search_term("nothing-matches");
        let out = render(&v);
        assert!(out.contains("No test suites or test cases match your current filters."));
    }

    #[test]
    fn test_filter_panel_lists_options() {
        let mut v = view();
        v.toggle_filters_panel();
        v.set_status_filter("Fail");
        let out = render(&v);
        assert!(out.contains("Status:      Fail (All, Pass, Fail, Skip, Error)"));
        assert!(out.contains("Environment: All (All, QA)"));
    }

    #[test]
    fn test_percent_bar_is_clamped() {
        assert_eq!(percent_bar(0), format!("[{}]", "░".repeat(BAR_WIDTH)));
        assert_eq!(percent_bar(50).matches('█').count(), BAR_WIDTH / 2);
        assert_eq!(percent_bar(100), format!("[{}]", "█".repeat(BAR_WIDTH)));
        assert_eq!(percent_bar(250), percent_bar(100));
        assert_eq!(percent_bar(u64::MAX), percent_bar(100));
    }

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#4CAF50"), Some((0x4c, 0xaf, 0x50)));
        assert_eq!(hex_rgb("4CAF50"), None);
        assert_eq!(hex_rgb("#zzzzzz"), None);
    }
}
