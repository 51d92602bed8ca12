//! The record store: three ordered collections kept in durable slots.
//!
//! [`RecordStore`] owns the scenarios, test cases, and bugs in memory and
//! writes a collection's whole sequence back to its slot after every change.
//! All operations are synchronous; when one returns, memory and (barring a
//! write failure) the slot agree.
//!
//! # Persistence failures
//!
//! A failed slot write does not fail the operation. The in-memory change is
//! kept, a warning is logged, and the collection is remembered as pending.
//! Every later mutation first retries all pending collections, and
//! [`RecordStore::flush`] retries them on demand and reports the error.
//!
//! # Example
//!
//! ```
//! use testhub::domain::{Direction, Scenario, TestCase};
//! use testhub::store::RecordStore;
//!
//! let mut store = RecordStore::in_memory();
//! store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();
//! store.add(TestCase::new("TC-1", "TS-1", "Open login page", "Form shown")).unwrap();
//!
//! assert_eq!(store.linked_test_cases("TS-1").len(), 1);
//! assert!(!store.reorder::<TestCase>("TC-1", Direction::Up));
//! ```

mod collections;
mod import;
mod persistence;

pub use collections::{Collections, ImportSummary, StoredRecord};
pub use import::{ImportWarning, decode_batch};
pub use persistence::LoadWarning;

use crate::bundle::{Bundle, ImportDocument};
use crate::domain::{Bug, BugStatus, CollectionKind, Direction, Record, Scenario, TestCase};
use crate::error::{Error, Result};
use crate::report::{Report, Summary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use testhub_slots::{MemorySlotStore, Namespace, SlotStore};

/// Result of importing a multi-collection document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleImport {
    /// One summary per collection present in the document
    pub summaries: Vec<ImportSummary>,
    /// Entries skipped before merging
    pub warnings: Vec<ImportWarning>,
}

impl BundleImport {
    /// Total records appended across all collections.
    #[must_use]
    pub fn appended(&self) -> usize {
        self.summaries.iter().map(|s| s.appended).sum()
    }

    /// Total records skipped, whether for a taken key or an undecodable entry.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.summaries.iter().map(|s| s.skipped).sum::<usize>() + self.warnings.len()
    }
}

/// QA records held in memory and mirrored to durable slots.
pub struct RecordStore {
    collections: Collections,
    slots: Box<dyn SlotStore>,
    namespace: Namespace,
    pending: BTreeSet<CollectionKind>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("namespace", &self.namespace)
            .field("scenarios", &self.collections.scenarios.len())
            .field("test_cases", &self.collections.test_cases.len())
            .field("bugs", &self.collections.bugs.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Open a store over `slots`, loading all three collections.
    ///
    /// Never fails. Absent slots load as empty collections; unreadable or
    /// corrupt data is skipped and described in the returned warnings, each
    /// of which is also logged.
    pub fn open(slots: Box<dyn SlotStore>, namespace: Namespace) -> (Self, Vec<LoadWarning>) {
        let (collections, warnings) = persistence::load_all(slots.as_ref(), &namespace);

        for warning in &warnings {
            tracing::warn!(namespace = %namespace, "{warning}");
        }

        let store = Self {
            collections,
            slots,
            namespace,
            pending: BTreeSet::new(),
        };
        (store, warnings)
    }

    /// An empty store over fresh in-memory slots.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemorySlotStore::new()), Namespace::default()).0
    }

    /// The namespace prefixing this store's slots.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// All three collections.
    #[must_use]
    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Records of type `R` in display order.
    #[must_use]
    pub fn list<R: StoredRecord>(&self) -> &[R] {
        R::records(&self.collections)
    }

    /// The record of type `R` with `key`.
    #[must_use]
    pub fn get<R: StoredRecord>(&self, key: &str) -> Option<&R> {
        self.list::<R>().iter().find(|r| r.key() == key)
    }

    /// Whether a record of type `R` with `key` exists.
    #[must_use]
    pub fn contains<R: StoredRecord>(&self, key: &str) -> bool {
        self.get::<R>(key).is_some()
    }

    /// Append a new record to the end of its collection.
    ///
    /// Unlike [`import_merge`](Self::import_merge), a taken key is an error
    /// the caller must handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if a record with the same key exists;
    /// the collection is left unchanged.
    pub fn add<R: StoredRecord>(&mut self, record: R) -> Result<&R> {
        if self.contains::<R>(record.key()) {
            return Err(Error::DuplicateKey {
                collection: R::KIND,
                key: record.key().to_string(),
            });
        }

        tracing::debug!(collection = %R::KIND, key = record.key(), "Adding record");
        let records = R::records_mut(&mut self.collections);
        records.push(record);
        let index = records.len() - 1;

        self.persist(R::KIND);
        Ok(&self.list::<R>()[index])
    }

    /// Replace the record with the same key, keeping its position.
    ///
    /// Returns `false` and changes nothing when no record has the key.
    pub fn update<R: StoredRecord>(&mut self, record: R) -> bool {
        let records = R::records_mut(&mut self.collections);
        let Some(index) = collections::position(records, record.key()) else {
            return false;
        };
        if records[index] == record {
            return true;
        }

        records[index] = record;
        self.persist(R::KIND);
        true
    }

    /// Remove the record with `key` and return it.
    ///
    /// Never cascades: deleting a scenario leaves its test cases in place,
    /// orphaned. Returns `None` when no record has the key.
    pub fn delete<R: StoredRecord>(&mut self, key: &str) -> Option<R> {
        let records = R::records_mut(&mut self.collections);
        let index = collections::position(records, key)?;
        let removed = records.remove(index);

        tracing::debug!(collection = %R::KIND, key, "Deleted record");
        self.persist(R::KIND);
        Some(removed)
    }

    /// Move the record with `key` one position up or down.
    ///
    /// Returns `false`, without touching the slot, when the key is absent or
    /// the record is already first (moving up) or last (moving down).
    pub fn reorder<R: StoredRecord>(&mut self, key: &str, direction: Direction) -> bool {
        let records = R::records_mut(&mut self.collections);
        if !collections::swap_with_neighbour(records, key, direction) {
            return false;
        }

        self.persist(R::KIND);
        true
    }

    /// Append every record whose key is not already taken.
    ///
    /// Records colliding with an existing key, or with a record appended
    /// earlier in the same batch, are dropped without error; existing
    /// records are never modified. The summary says how many went each way.
    pub fn import_merge<R, I>(&mut self, records: I) -> ImportSummary
    where
        R: StoredRecord,
        I: IntoIterator<Item = R>,
    {
        let summary = collections::merge_absent(R::records_mut(&mut self.collections), records);

        tracing::info!(
            collection = %R::KIND,
            appended = summary.appended,
            skipped = summary.skipped,
            "Merged import batch"
        );
        if summary.appended > 0 {
            self.persist(R::KIND);
        }
        summary
    }

    /// Decode raw values with [`decode_batch`] and merge the result.
    pub fn import_values<R: StoredRecord>(
        &mut self,
        values: Vec<serde_json::Value>,
    ) -> (ImportSummary, Vec<ImportWarning>) {
        let (records, warnings) = decode_batch::<R>(values);
        (self.import_merge(records), warnings)
    }

    /// Merge every collection present in `document`.
    pub fn import_bundle(&mut self, document: ImportDocument) -> BundleImport {
        let mut outcome = BundleImport::default();
        let ImportDocument {
            scenarios,
            test_cases,
            bugs,
        } = document;

        if let Some(values) = scenarios {
            self.import_into::<Scenario>(values, &mut outcome);
        }
        if let Some(values) = test_cases {
            self.import_into::<TestCase>(values, &mut outcome);
        }
        if let Some(values) = bugs {
            self.import_into::<Bug>(values, &mut outcome);
        }

        outcome
    }

    fn import_into<R: StoredRecord>(
        &mut self,
        values: Vec<serde_json::Value>,
        outcome: &mut BundleImport,
    ) {
        let (summary, warnings) = self.import_values::<R>(values);
        outcome.summaries.push(summary);
        outcome.warnings.extend(warnings);
    }

    /// Test cases whose `scenario_id` is `scenario_id`, in collection order.
    ///
    /// Works whether or not the scenario exists, which is how callers find
    /// the cases a scenario deletion would orphan.
    #[must_use]
    pub fn linked_test_cases(&self, scenario_id: &str) -> Vec<&TestCase> {
        self.collections
            .test_cases
            .iter()
            .filter(|tc| tc.scenario_id == scenario_id)
            .collect()
    }

    /// Test cases whose scenario does not exist, in collection order.
    #[must_use]
    pub fn orphaned_test_cases(&self) -> Vec<&TestCase> {
        let scenario_ids: HashSet<&str> = self
            .collections
            .scenarios
            .iter()
            .map(|s| s.scenario_id.as_str())
            .collect();

        self.collections
            .test_cases
            .iter()
            .filter(|tc| !scenario_ids.contains(tc.scenario_id.as_str()))
            .collect()
    }

    /// Change only the status of the bug with `bug_id`.
    ///
    /// Returns `false` when no bug has the key.
    pub fn set_bug_status(&mut self, bug_id: &str, status: BugStatus) -> bool {
        let Some(bug) = self
            .collections
            .bugs
            .iter_mut()
            .find(|b| b.bug_id == bug_id)
        else {
            return false;
        };
        if bug.status == status {
            return true;
        }

        bug.status = status;
        self.persist(CollectionKind::Bugs);
        true
    }

    /// Remove every record of type `R`, returning how many there were.
    pub fn clear<R: StoredRecord>(&mut self) -> usize {
        let records = R::records_mut(&mut self.collections);
        let removed = records.len();
        records.clear();

        if removed > 0 {
            self.persist(R::KIND);
        }
        removed
    }

    /// Empty every collection, returning the number of records removed.
    pub fn clear_all(&mut self) -> usize {
        self.clear::<Scenario>() + self.clear::<TestCase>() + self.clear::<Bug>()
    }

    /// Dashboard counts over the current collections.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.collections)
    }

    /// A snapshot of all three collections.
    #[must_use]
    pub fn export(&self) -> Bundle {
        Bundle::from(&self.collections)
    }

    /// The QA report, stamped with `timestamp`.
    #[must_use]
    pub fn report(&self, timestamp: DateTime<Utc>) -> Report<'_> {
        Report::new(timestamp, &self.collections)
    }

    /// Collections whose slot does not reflect memory because a write failed.
    #[must_use]
    pub fn pending_writes(&self) -> Vec<CollectionKind> {
        self.pending.iter().copied().collect()
    }

    /// Retry every pending slot write.
    ///
    /// # Errors
    ///
    /// Returns the first write error if any collection still cannot be
    /// written; those collections stay pending.
    pub fn flush(&mut self) -> Result<()> {
        self.write_pending()
    }

    fn persist(&mut self, kind: CollectionKind) {
        self.pending.insert(kind);
        // Failures are logged and stay pending; flush() surfaces them.
        let _ = self.write_pending();
    }

    fn write_pending(&mut self) -> Result<()> {
        let mut first_error = None;

        for kind in self.pending.clone() {
            match persistence::write_collection(
                self.slots.as_mut(),
                &self.namespace,
                &self.collections,
                kind,
            ) {
                Ok(()) => {
                    self.pending.remove(&kind);
                }
                Err(e) => {
                    tracing::warn!(
                        collection = %kind,
                        namespace = %self.namespace,
                        error = %e,
                        "Failed to persist collection; change kept in memory"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_stored_record() {
        let mut store = RecordStore::in_memory();
        let added = store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();
        assert_eq!(added.title, "Login");
    }

    #[test]
    fn update_with_identical_record_reports_found() {
        let mut store = RecordStore::in_memory();
        let scenario = Scenario::new("TS-1", "Login", "Auth");
        store.add(scenario.clone()).unwrap();
        assert!(store.update(scenario));
    }

    #[test]
    fn set_bug_status_only_touches_status() {
        let mut store = RecordStore::in_memory();
        let mut bug = Bug::new("BUG-1", "Crash", "Editor");
        bug.steps = "Open file".to_string();
        store.add(bug).unwrap();

        assert!(store.set_bug_status("BUG-1", BugStatus::Fixed));
        assert!(!store.set_bug_status("BUG-2", BugStatus::Fixed));

        let stored = store.get::<Bug>("BUG-1").unwrap();
        assert_eq!(stored.status, BugStatus::Fixed);
        assert_eq!(stored.steps, "Open file");
    }

    #[test]
    fn bundle_import_counts_warnings_as_skipped() {
        let mut store = RecordStore::in_memory();
        store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();

        let document = ImportDocument {
            scenarios: Some(vec![
                serde_json::json!({"scenarioId": "TS-1"}),
                serde_json::json!({"scenarioId": "TS-2"}),
                serde_json::json!(17),
            ]),
            ..ImportDocument::default()
        };
        let outcome = store.import_bundle(document);

        assert_eq!(outcome.appended(), 1);
        assert_eq!(outcome.skipped(), 2);
        assert_eq!(outcome.summaries.len(), 1);
    }

    #[test]
    fn debug_output_shows_counts_not_records() {
        let mut store = RecordStore::in_memory();
        store.add(Bug::new("BUG-1", "Crash", "Editor")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("bugs: 1"));
        assert!(!debug.contains("Crash"));
    }
}
