//! Dashboard counts and the QA report document.

use crate::domain::{Bug, BugStatus, Scenario, Severity, TestCase};
use crate::store::Collections;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Headline counts over the three collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of scenarios
    pub total_scenarios: usize,
    /// Number of test cases
    pub total_test_cases: usize,
    /// Number of bugs
    pub total_bugs: usize,
    /// Bugs with status `Open`
    pub open_bugs: usize,
    /// Bugs with status `Closed`
    pub closed_bugs: usize,
    /// Bugs with severity `Critical`
    pub critical_bugs: usize,
}

impl Summary {
    /// Count the records in `collections`.
    #[must_use]
    pub fn of(collections: &Collections) -> Self {
        let bugs = collections.bugs();
        let count_bugs = |pred: fn(&Bug) -> bool| bugs.iter().filter(|b| pred(b)).count();

        Self {
            total_scenarios: collections.scenarios().len(),
            total_test_cases: collections.test_cases().len(),
            total_bugs: bugs.len(),
            open_bugs: count_bugs(|b| b.status == BugStatus::Open),
            closed_bugs: count_bugs(|b| b.status == BugStatus::Closed),
            critical_bugs: count_bugs(|b| b.severity == Severity::Critical),
        }
    }
}

/// The QA report: a timestamped summary followed by every record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Headline counts
    pub summary: Summary,
    /// All scenarios
    pub scenarios: &'a [Scenario],
    /// All test cases
    pub test_cases: &'a [TestCase],
    /// All bugs
    pub bugs: &'a [Bug],
}

impl<'a> Report<'a> {
    /// Build a report over `collections`.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, collections: &'a Collections) -> Self {
        Self {
            timestamp,
            summary: Summary::of(collections),
            scenarios: collections.scenarios(),
            test_cases: collections.test_cases(),
            bugs: collections.bugs(),
        }
    }

    /// Suggested file name for the report, dated by its timestamp.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("test_report_{}.json", self.timestamp.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bug(id: &str, severity: Severity, status: BugStatus) -> Bug {
        let mut bug = Bug::new(id, "Summary", "Module");
        bug.severity = severity;
        bug.status = status;
        bug
    }

    fn sample() -> Collections {
        Collections {
            scenarios: vec![Scenario::new("TS-1", "Login", "Auth")],
            test_cases: vec![
                TestCase::new("TC-1", "TS-1", "a", "b"),
                TestCase::new("TC-2", "TS-1", "c", "d"),
            ],
            bugs: vec![
                bug("BUG-1", Severity::Critical, BugStatus::Open),
                bug("BUG-2", Severity::Low, BugStatus::Closed),
                bug("BUG-3", Severity::Critical, BugStatus::InProgress),
                bug("BUG-4", Severity::from("Blocker"), BugStatus::from("Deferred")),
            ],
        }
    }

    #[test]
    fn summary_counts_by_status_and_severity() {
        let summary = Summary::of(&sample());
        assert_eq!(
            summary,
            Summary {
                total_scenarios: 1,
                total_test_cases: 2,
                total_bugs: 4,
                open_bugs: 1,
                closed_bugs: 1,
                critical_bugs: 2,
            }
        );
    }

    #[test]
    fn report_serializes_summary_and_records() {
        let collections = sample();
        let timestamp = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let report = Report::new(timestamp, &collections);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["timestamp"], "2026-03-14T09:30:00Z");
        assert_eq!(value["summary"]["criticalBugs"], 2);
        assert_eq!(value["summary"]["totalTestCases"], 2);
        assert_eq!(value["testCases"][1]["testCaseId"], "TC-2");
        assert_eq!(report.file_name(), "test_report_2026-03-14.json");
    }

    #[test]
    fn empty_store_summary_is_zero() {
        assert_eq!(Summary::of(&Collections::default()), Summary::default());
    }
}
