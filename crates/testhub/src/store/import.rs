//! Turning raw JSON values into records for bulk import.
//!
//! Import documents come from outside the tool (hand-written JSON, converted
//! spreadsheets), so every entry is checked on its own. Entries that cannot
//! become a record are reported and skipped rather than failing the batch.

use crate::domain::{CollectionKind, Record};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Why an import entry was skipped before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ImportWarning {
    /// The entry is not a JSON object.
    NotAnObject {
        /// Target collection
        collection: CollectionKind,
        /// Zero-based position in the batch
        index: usize,
    },

    /// The entry has no unique-key field, or it is `null`.
    MissingKey {
        /// Target collection
        collection: CollectionKind,
        /// Zero-based position in the batch
        index: usize,
    },

    /// The unique key is empty or whitespace.
    BlankKey {
        /// Target collection
        collection: CollectionKind,
        /// Zero-based position in the batch
        index: usize,
    },

    /// A field has a shape the record cannot hold (an array, say).
    Invalid {
        /// Target collection
        collection: CollectionKind,
        /// Zero-based position in the batch
        index: usize,
        /// Decoder error
        error: String,
    },
}

impl ImportWarning {
    /// Position of the skipped entry in its batch.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::NotAnObject { index, .. }
            | Self::MissingKey { index, .. }
            | Self::BlankKey { index, .. }
            | Self::Invalid { index, .. } => *index,
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { collection, index } => {
                write!(f, "{collection} entry {index} is not an object")
            }
            Self::MissingKey { collection, index } => write!(
                f,
                "{collection} entry {index} has no {}",
                collection.key_field()
            ),
            Self::BlankKey { collection, index } => write!(
                f,
                "{collection} entry {index} has a blank {}",
                collection.key_field()
            ),
            Self::Invalid {
                collection,
                index,
                error,
            } => write!(f, "{collection} entry {index} is invalid: {error}"),
        }
    }
}

/// Decode a batch of raw values into records of type `R`.
///
/// Returns the decoded records in input order together with a warning for
/// each entry that was skipped. Key uniqueness is not checked here; that is
/// [`RecordStore::import_merge`]'s job.
///
/// [`RecordStore::import_merge`]: super::RecordStore::import_merge
pub fn decode_batch<R: Record>(values: Vec<Value>) -> (Vec<R>, Vec<ImportWarning>) {
    let collection = R::KIND;
    let key_field = collection.key_field();
    let mut records = Vec::with_capacity(values.len());
    let mut warnings = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        let Some(object) = value.as_object() else {
            warnings.push(ImportWarning::NotAnObject { collection, index });
            continue;
        };

        match object.get(key_field) {
            None | Some(Value::Null) => {
                warnings.push(ImportWarning::MissingKey { collection, index });
                continue;
            }
            Some(Value::String(key)) if key.trim().is_empty() => {
                warnings.push(ImportWarning::BlankKey { collection, index });
                continue;
            }
            Some(_) => {}
        }

        match serde_json::from_value::<R>(value) {
            Ok(record) => records.push(record),
            Err(e) => warnings.push(ImportWarning::Invalid {
                collection,
                index,
                error: e.to_string(),
            }),
        }
    }

    if !warnings.is_empty() {
        tracing::debug!(%collection, skipped = warnings.len(), "Skipped import entries");
    }

    (records, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bug, Scenario, TestCase};
    use serde_json::json;

    #[test]
    fn decodes_valid_entries_in_order() {
        let values = vec![
            json!({"scenarioId": "TS-2", "title": "Two"}),
            json!({"scenarioId": "TS-1", "title": "One"}),
        ];

        let (records, warnings) = decode_batch::<Scenario>(values);

        assert!(warnings.is_empty());
        let keys: Vec<&str> = records.iter().map(Record::key).collect();
        assert_eq!(keys, ["TS-2", "TS-1"]);
    }

    #[test]
    fn rejects_entries_that_cannot_be_records() {
        let values = vec![
            json!("TC-1"),
            json!({"steps": "no key"}),
            json!({"testCaseId": null}),
            json!({"testCaseId": "   "}),
            json!({"testCaseId": "TC-5", "steps": ["a", "b"]}),
            json!({"testCaseId": "TC-6"}),
        ];

        let (records, warnings) = decode_batch::<TestCase>(values);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].test_case_id, "TC-6");
        assert!(matches!(warnings[0], ImportWarning::NotAnObject { index: 0, .. }));
        assert!(matches!(warnings[1], ImportWarning::MissingKey { index: 1, .. }));
        assert!(matches!(warnings[2], ImportWarning::MissingKey { index: 2, .. }));
        assert!(matches!(warnings[3], ImportWarning::BlankKey { index: 3, .. }));
        assert!(matches!(warnings[4], ImportWarning::Invalid { index: 4, .. }));
    }

    #[test]
    fn numeric_keys_are_accepted() {
        let (records, warnings) = decode_batch::<Bug>(vec![json!({"bugId": 42})]);
        assert!(warnings.is_empty());
        assert_eq!(records[0].bug_id, "42");
    }

    #[test]
    fn warning_mentions_key_field() {
        let warning = ImportWarning::MissingKey {
            collection: CollectionKind::Bugs,
            index: 3,
        };
        assert_eq!(warning.to_string(), "Bug entry 3 has no bugId");
        assert_eq!(warning.index(), 3);
    }
}
