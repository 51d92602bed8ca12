//! Domain types for QA tracking.
//!
//! This module contains the three record kinds managed by the store
//! ([`Scenario`], [`TestCase`], [`Bug`]) and the small vocabulary used to
//! address them ([`CollectionKind`], [`Direction`], the [`Record`] trait).
//!
//! Field names serialize in camelCase (`scenarioId`, `expectedResult`), which
//! is the persisted format of the durable slots and the shape of import
//! documents.

mod bug_fields;
pub(crate) mod lenient;

pub use bug_fields::{BugStatus, Priority, Severity};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record stored in one of the collections.
///
/// Every record carries a caller-assigned unique key, fixed at creation.
/// The key identifies the record for update, delete, and reorder.
pub trait Record: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    /// The collection this record type lives in.
    const KIND: CollectionKind;

    /// The record's unique key within its collection.
    fn key(&self) -> &str;
}

/// One of the three named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    /// Test scenarios
    Scenarios,
    /// Test cases
    TestCases,
    /// Bugs
    Bugs,
}

impl CollectionKind {
    /// All collections in display order.
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Scenarios,
        CollectionKind::TestCases,
        CollectionKind::Bugs,
    ];

    /// Name of the durable slot within the store's namespace.
    ///
    /// These names are a storage contract and must never change.
    #[must_use]
    pub fn slot_name(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarios",
            Self::TestCases => "testcases",
            Self::Bugs => "bugs",
        }
    }

    /// Name of the collection in bundle documents and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarios",
            Self::TestCases => "testCases",
            Self::Bugs => "bugs",
        }
    }

    /// Name of the unique key field of the collection's records.
    #[must_use]
    pub fn key_field(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarioId",
            Self::TestCases => "testCaseId",
            Self::Bugs => "bugId",
        }
    }

    /// Human-readable singular name, as used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Scenarios => "Scenario",
            Self::TestCases => "Test Case",
            Self::Bugs => "Bug",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of a reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the front of the collection
    Up,
    /// Towards the end of the collection
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A test scenario: a named area of behavior that test cases exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Unique key (e.g. `TS-1`)
    #[serde(deserialize_with = "lenient::key")]
    pub scenario_id: String,

    /// Scenario title
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    /// Free-form grouping label
    #[serde(default, deserialize_with = "lenient::string")]
    pub module: String,

    /// Longer description (optional)
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Scenario {
    /// Create a scenario without a description.
    pub fn new(
        scenario_id: impl Into<String>,
        title: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            title: title.into(),
            module: module.into(),
            description: None,
        }
    }
}

impl Record for Scenario {
    const KIND: CollectionKind = CollectionKind::Scenarios;

    fn key(&self) -> &str {
        &self.scenario_id
    }
}

/// A test case belonging (by reference only) to a scenario.
///
/// `scenario_id` is a relation, not ownership: it may name a scenario that
/// was never created or has since been deleted. Resolve it through the store
/// rather than assuming the scenario exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Unique key (e.g. `TC-1`)
    #[serde(deserialize_with = "lenient::key")]
    pub test_case_id: String,

    /// Key of the scenario this case exercises
    #[serde(default, deserialize_with = "lenient::string")]
    pub scenario_id: String,

    /// Steps to execute, one per line
    #[serde(default, deserialize_with = "lenient::string")]
    pub steps: String,

    /// Input data for the steps (optional)
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub test_data: Option<String>,

    /// What should happen
    #[serde(default, deserialize_with = "lenient::string")]
    pub expected_result: String,

    /// What did happen; `None` until the case has been executed
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_result: Option<String>,
}

impl TestCase {
    /// Create a test case that has not been executed yet.
    pub fn new(
        test_case_id: impl Into<String>,
        scenario_id: impl Into<String>,
        steps: impl Into<String>,
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            scenario_id: scenario_id.into(),
            steps: steps.into(),
            test_data: None,
            expected_result: expected_result.into(),
            actual_result: None,
        }
    }

    /// Whether the case has a recorded actual result.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.actual_result.is_some()
    }
}

impl Record for TestCase {
    const KIND: CollectionKind = CollectionKind::TestCases;

    fn key(&self) -> &str {
        &self.test_case_id
    }
}

/// A reported defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// Unique key (e.g. `BUG-1`)
    #[serde(deserialize_with = "lenient::key")]
    pub bug_id: String,

    /// One-line summary
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,

    /// Free-form grouping label
    #[serde(default, deserialize_with = "lenient::string")]
    pub module: String,

    /// Steps to reproduce
    #[serde(default, deserialize_with = "lenient::string")]
    pub steps: String,

    /// What should happen
    #[serde(default, deserialize_with = "lenient::string")]
    pub expected_result: String,

    /// What happens instead
    #[serde(default, deserialize_with = "lenient::string")]
    pub actual_result: String,

    /// Impact
    #[serde(default)]
    pub severity: Severity,

    /// Scheduling priority
    #[serde(default)]
    pub priority: Priority,

    /// Workflow state
    #[serde(default)]
    pub status: BugStatus,

    /// Embedded image payload, typically a data URL (opaque to the store)
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub screenshot: Option<String>,

    /// Display name of the screenshot (optional)
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub screenshot_name: Option<String>,
}

impl Bug {
    /// Create an open bug with default severity and priority and empty
    /// reproduction fields.
    pub fn new(
        bug_id: impl Into<String>,
        summary: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            bug_id: bug_id.into(),
            summary: summary.into(),
            module: module.into(),
            steps: String::new(),
            expected_result: String::new(),
            actual_result: String::new(),
            severity: Severity::default(),
            priority: Priority::default(),
            status: BugStatus::default(),
            screenshot: None,
            screenshot_name: None,
        }
    }

    /// Short description of the attached screenshot for listings: its
    /// display name, `"Attached"` when unnamed, or `None` without one.
    #[must_use]
    pub fn screenshot_label(&self) -> Option<&str> {
        match (&self.screenshot, &self.screenshot_name) {
            (Some(_), Some(name)) if !name.is_empty() => Some(name),
            (Some(_), _) => Some("Attached"),
            (None, _) => None,
        }
    }
}

impl Record for Bug {
    const KIND: CollectionKind = CollectionKind::Bugs;

    fn key(&self) -> &str {
        &self.bug_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scenario_serializes_camel_case_without_empty_optionals() {
        let scenario = Scenario::new("TS-1", "Login", "Auth");
        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(
            value,
            json!({"scenarioId": "TS-1", "title": "Login", "module": "Auth"})
        );
    }

    #[test]
    fn missing_non_key_fields_default() {
        let tc: TestCase = serde_json::from_value(json!({"testCaseId": "TC-1"})).unwrap();
        assert_eq!(tc.test_case_id, "TC-1");
        assert_eq!(tc.scenario_id, "");
        assert!(!tc.is_executed());

        let bug: Bug = serde_json::from_value(json!({"bugId": "BUG-1"})).unwrap();
        assert_eq!(bug.severity, Severity::Medium);
        assert_eq!(bug.status, BugStatus::Open);
    }

    #[test]
    fn missing_key_is_rejected() {
        let result: Result<Scenario, _> = serde_json::from_value(json!({"title": "No key"}));
        assert!(result.is_err());

        let result: Result<Scenario, _> =
            serde_json::from_value(json!({"scenarioId": null, "title": "Null key"}));
        assert!(result.is_err());
    }

    #[test]
    fn numeric_cells_decode_as_text() {
        let tc: TestCase = serde_json::from_value(json!({
            "testCaseId": 101,
            "scenarioId": 7,
            "testData": 3.5,
            "expectedResult": true
        }))
        .unwrap();
        assert_eq!(tc.test_case_id, "101");
        assert_eq!(tc.scenario_id, "7");
        assert_eq!(tc.test_data.as_deref(), Some("3.5"));
        assert_eq!(tc.expected_result, "true");
    }

    #[test]
    fn null_optional_decodes_as_none() {
        let tc: TestCase =
            serde_json::from_value(json!({"testCaseId": "TC-1", "actualResult": null})).unwrap();
        assert_eq!(tc.actual_result, None);
    }

    #[test]
    fn bug_roundtrips_with_screenshot_and_unknown_enum() {
        let mut bug = Bug::new("BUG-1", "Crash on save", "Editor");
        bug.severity = Severity::from("Blocker");
        bug.status = BugStatus::InProgress;
        bug.screenshot = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
        bug.screenshot_name = Some("crash.png".to_string());

        let text = serde_json::to_string(&bug).unwrap();
        assert!(text.contains("\"screenshotName\":\"crash.png\""));
        assert!(text.contains("\"status\":\"In Progress\""));
        assert!(text.contains("\"severity\":\"Blocker\""));

        let back: Bug = serde_json::from_str(&text).unwrap();
        assert_eq!(back, bug);
    }

    #[test]
    fn screenshot_label_prefers_name() {
        let mut bug = Bug::new("BUG-1", "s", "m");
        assert_eq!(bug.screenshot_label(), None);

        bug.screenshot = Some("data:".to_string());
        assert_eq!(bug.screenshot_label(), Some("Attached"));

        bug.screenshot_name = Some("shot.png".to_string());
        assert_eq!(bug.screenshot_label(), Some("shot.png"));
    }

    #[test]
    fn collection_kind_names() {
        assert_eq!(CollectionKind::TestCases.slot_name(), "testcases");
        assert_eq!(CollectionKind::TestCases.as_str(), "testCases");
        assert_eq!(CollectionKind::TestCases.key_field(), "testCaseId");
        assert_eq!(CollectionKind::TestCases.to_string(), "Test Case");
        assert_eq!(<Bug as Record>::KIND, CollectionKind::Bugs);
    }
}
