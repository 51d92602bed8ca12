//! Multi-collection documents for moving records in and out of the store.
//!
//! A bundle is a JSON object with any of the keys `scenarios`, `testCases`,
//! and `bugs`, each holding an array of records:
//!
//! ```json
//! {
//!   "scenarios": [{"scenarioId": "TS-1", "title": "Login", "module": "Auth"}],
//!   "testCases": [{"testCaseId": "TC-1", "scenarioId": "TS-1"}]
//! }
//! ```
//!
//! Export writes a [`Bundle`]. Import reads an [`ImportDocument`], which
//! keeps entries as raw JSON so each can be checked on its own. Other keys
//! are ignored, so a QA report can be imported as well.

use crate::domain::{Bug, CollectionKind, Scenario, TestCase};
use crate::error::{Error, Result};
use crate::store::Collections;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A snapshot of all three collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Scenarios in display order
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    /// Test cases in display order
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    /// Bugs in display order
    #[serde(default)]
    pub bugs: Vec<Bug>,
}

impl Bundle {
    /// Drop embedded screenshot payloads, keeping their display names.
    ///
    /// Screenshots are usually the bulk of a bundle; sharing a document
    /// without them keeps it small.
    pub fn strip_screenshots(&mut self) {
        for bug in &mut self.bugs {
            if bug.screenshot.take().is_some() && bug.screenshot_name.is_none() {
                bug.screenshot_name = Some("Attached".to_string());
            }
        }
    }

    /// Number of records in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len() + self.test_cases.len() + self.bugs.len()
    }

    /// Whether the bundle holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw values for one collection, for writing a bare array.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if a record fails to serialize.
    pub fn collection_value(&self, kind: CollectionKind) -> Result<Value> {
        let value = match kind {
            CollectionKind::Scenarios => serde_json::to_value(&self.scenarios)?,
            CollectionKind::TestCases => serde_json::to_value(&self.test_cases)?,
            CollectionKind::Bugs => serde_json::to_value(&self.bugs)?,
        };
        Ok(value)
    }
}

impl From<&Collections> for Bundle {
    fn from(collections: &Collections) -> Self {
        Self {
            scenarios: collections.scenarios().to_vec(),
            test_cases: collections.test_cases().to_vec(),
            bugs: collections.bugs().to_vec(),
        }
    }
}

/// An import document with its entries still undecoded.
///
/// A `None` collection was not present in the document and is left alone
/// by the import; `Some(vec![])` was present but empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportDocument {
    /// Raw scenario entries
    pub scenarios: Option<Vec<Value>>,
    /// Raw test case entries
    pub test_cases: Option<Vec<Value>>,
    /// Raw bug entries
    pub bugs: Option<Vec<Value>>,
}

impl ImportDocument {
    /// Interpret a parsed JSON document.
    ///
    /// An object is read as a bundle; keys whose value is not an array are
    /// ignored. A bare array is accepted only with a target collection.
    /// With `only` set, collections other than the target are dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDocument` for a bare array without a target,
    /// for a scalar document, or when no collection remains.
    pub fn from_value(value: Value, only: Option<CollectionKind>) -> Result<Self> {
        let mut document = match value {
            Value::Array(entries) => {
                let kind = only.ok_or_else(|| {
                    Error::InvalidDocument(
                        "a bare array needs a target collection".to_string(),
                    )
                })?;
                let mut document = Self::default();
                *document.batch_mut(kind) = Some(entries);
                document
            }
            Value::Object(mut map) => {
                let mut document = Self::default();
                for kind in CollectionKind::ALL {
                    if let Some(Value::Array(entries)) = map.remove(kind.as_str()) {
                        *document.batch_mut(kind) = Some(entries);
                    }
                }
                document
            }
            other => {
                return Err(Error::InvalidDocument(format!(
                    "expected an object or an array, found {}",
                    json_type_name(&other)
                )));
            }
        };

        if let Some(kind) = only {
            for other in CollectionKind::ALL.into_iter().filter(|k| *k != kind) {
                *document.batch_mut(other) = None;
            }
        }

        if document.is_empty() {
            return Err(Error::InvalidDocument(
                "no scenarios, testCases, or bugs arrays found".to_string(),
            ));
        }

        Ok(document)
    }

    /// Parse and interpret a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if `text` is not JSON, otherwise as
    /// [`from_value`](Self::from_value).
    pub fn from_json(text: &str, only: Option<CollectionKind>) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value, only)
    }

    /// Raw entries for one collection, if present.
    #[must_use]
    pub fn batch(&self, kind: CollectionKind) -> Option<&[Value]> {
        match kind {
            CollectionKind::Scenarios => self.scenarios.as_deref(),
            CollectionKind::TestCases => self.test_cases.as_deref(),
            CollectionKind::Bugs => self.bugs.as_deref(),
        }
    }

    fn batch_mut(&mut self, kind: CollectionKind) -> &mut Option<Vec<Value>> {
        match kind {
            CollectionKind::Scenarios => &mut self.scenarios,
            CollectionKind::TestCases => &mut self.test_cases,
            CollectionKind::Bugs => &mut self.bugs,
        }
    }

    fn is_empty(&self) -> bool {
        CollectionKind::ALL
            .into_iter()
            .all(|kind| self.batch(kind).is_none())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn bundle_serializes_with_collection_names() {
        let bundle = Bundle {
            scenarios: vec![Scenario::new("TS-1", "Login", "Auth")],
            ..Bundle::default()
        };
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["scenarios"][0]["scenarioId"], "TS-1");
        assert_eq!(value["testCases"], json!([]));
        assert_eq!(value["bugs"], json!([]));
    }

    #[test]
    fn strip_screenshots_keeps_a_label() {
        let mut named = Bug::new("BUG-1", "s", "m");
        named.screenshot = Some("data:image/png;base64,AAAA".to_string());
        named.screenshot_name = Some("crash.png".to_string());
        let mut unnamed = Bug::new("BUG-2", "s", "m");
        unnamed.screenshot = Some("data:image/png;base64,BBBB".to_string());

        let mut bundle = Bundle {
            bugs: vec![named, unnamed, Bug::new("BUG-3", "s", "m")],
            ..Bundle::default()
        };
        bundle.strip_screenshots();

        assert!(bundle.bugs.iter().all(|b| b.screenshot.is_none()));
        assert_eq!(bundle.bugs[0].screenshot_name.as_deref(), Some("crash.png"));
        assert_eq!(bundle.bugs[1].screenshot_name.as_deref(), Some("Attached"));
        assert_eq!(bundle.bugs[2].screenshot_name, None);
    }

    #[test]
    fn object_document_picks_known_arrays() {
        let document = ImportDocument::from_value(
            json!({
                "timestamp": "2026-01-01T00:00:00Z",
                "summary": {"totalBugs": 1},
                "testCases": [{"testCaseId": "TC-1"}],
                "bugs": "not an array"
            }),
            None,
        )
        .unwrap();

        assert_eq!(document.scenarios, None);
        assert_eq!(document.batch(CollectionKind::TestCases).map(<[Value]>::len), Some(1));
        assert_eq!(document.bugs, None);
    }

    #[test]
    fn target_filters_object_document() {
        let document = ImportDocument::from_value(
            json!({"scenarios": [{"scenarioId": "TS-1"}], "bugs": [{"bugId": "B-1"}]}),
            Some(CollectionKind::Bugs),
        )
        .unwrap();

        assert_eq!(document.scenarios, None);
        assert!(document.bugs.is_some());
    }

    #[test]
    fn bare_array_goes_to_target() {
        let document =
            ImportDocument::from_value(json!([{"bugId": "B-1"}]), Some(CollectionKind::Bugs))
                .unwrap();
        assert_eq!(document.bugs.map(|b| b.len()), Some(1));
    }

    #[rstest]
    #[case::bare_array_without_target(json!([{"bugId": "B-1"}]), None)]
    #[case::scalar(json!(42), None)]
    #[case::no_collections(json!({"other": []}), None)]
    #[case::target_absent(json!({"scenarios": []}), Some(CollectionKind::Bugs))]
    fn unusable_documents_are_rejected(
        #[case] value: Value,
        #[case] only: Option<CollectionKind>,
    ) {
        let result = ImportDocument::from_value(value, only);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn from_json_reports_syntax_errors() {
        let result = ImportDocument::from_json("{not json", None);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
