//! Integration tests for resilient loading and soft persistence failures.
//!
//! # Test Coverage
//!
//! - Corrupt, partially valid, and duplicated slot contents
//! - Warning reporting without failing `open`
//! - Write failures: in-memory change kept, collection pending, retried
//!   on the next mutation and on `flush`

use std::cell::RefCell;
use std::rc::Rc;
use testhub::domain::{Bug, CollectionKind, Scenario, TestCase};
use testhub::store::{LoadWarning, RecordStore};
use testhub_slots::{MemorySlotStore, Namespace, SlotStore};

// =============================================================================
// Test Helpers
// =============================================================================

/// A slot store the test keeps a handle to after giving it to the store.
#[derive(Clone, Default)]
struct SharedSlots(Rc<RefCell<MemorySlotStore>>);

impl SharedSlots {
    fn with(slots: &[(&str, &str)]) -> Self {
        let shared = Self::default();
        for (name, value) in slots {
            shared.0.borrow_mut().set(name, value).unwrap();
        }
        shared
    }

    fn read(&self, slot: &str) -> Option<String> {
        self.0.borrow().get(slot).unwrap()
    }

    fn set_quota(&self, quota: Option<usize>) {
        self.0.borrow_mut().set_quota(quota);
    }
}

impl SlotStore for SharedSlots {
    fn get(&self, slot: &str) -> testhub_slots::Result<Option<String>> {
        self.0.borrow().get(slot)
    }

    fn set(&mut self, slot: &str, value: &str) -> testhub_slots::Result<()> {
        self.0.borrow_mut().set(slot, value)
    }

    fn remove(&mut self, slot: &str) -> testhub_slots::Result<()> {
        self.0.borrow_mut().remove(slot)
    }

    fn keys(&self) -> testhub_slots::Result<Vec<String>> {
        self.0.borrow().keys()
    }
}

fn open(slots: &SharedSlots) -> (RecordStore, Vec<LoadWarning>) {
    RecordStore::open(Box::new(slots.clone()), Namespace::default())
}

fn scenario_keys(store: &RecordStore) -> Vec<&str> {
    store
        .list::<Scenario>()
        .iter()
        .map(|s| s.scenario_id.as_str())
        .collect()
}

// =============================================================================
// Loading
// =============================================================================

mod loading {
    use super::*;

    #[test]
    fn absent_slots_load_empty_without_warnings() {
        let (store, warnings) = open(&SharedSlots::default());
        assert!(warnings.is_empty());
        assert_eq!(store.summary().total_scenarios, 0);
    }

    #[test]
    fn corrupt_slot_loads_empty_and_others_survive() {
        let slots = SharedSlots::with(&[
            ("testhub_bugs", "{\"bugId\": \"BUG-1\""),
            ("testhub_scenarios", r#"[{"scenarioId": "TS-1", "title": "Login"}]"#),
        ]);

        let (store, warnings) = open(&slots);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            LoadWarning::Malformed { collection: CollectionKind::Bugs, .. }
        ));
        assert!(store.list::<Bug>().is_empty());
        assert_eq!(scenario_keys(&store), ["TS-1"]);
    }

    #[test]
    fn non_array_slot_is_malformed() {
        let slots = SharedSlots::with(&[("testhub_testcases", r#"{"testCaseId": "TC-1"}"#)]);
        let (store, warnings) = open(&slots);
        assert_eq!(warnings[0].collection(), CollectionKind::TestCases);
        assert!(matches!(warnings[0], LoadWarning::Malformed { .. }));
        assert!(store.list::<TestCase>().is_empty());
    }

    #[test]
    fn invalid_entries_are_skipped_individually() {
        let slots = SharedSlots::with(&[(
            "testhub_scenarios",
            r#"[{"scenarioId": "TS-1"}, {"title": "no key"}, 17, {"scenarioId": "TS-2"}]"#,
        )]);

        let (store, warnings) = open(&slots);
        assert_eq!(scenario_keys(&store), ["TS-1", "TS-2"]);
        let indices: Vec<usize> = warnings
            .iter()
            .map(|w| match w {
                LoadWarning::InvalidRecord { index, .. } => *index,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(indices, [1, 2]);
    }

    #[test]
    fn duplicate_keys_keep_the_first_entry() {
        let slots = SharedSlots::with(&[(
            "testhub_scenarios",
            r#"[{"scenarioId": "TS-1", "title": "First"},
                {"scenarioId": "TS-1", "title": "Second"},
                {"scenarioId": "TS-2"}]"#,
        )]);

        let (store, warnings) = open(&slots);
        assert_eq!(scenario_keys(&store), ["TS-1", "TS-2"]);
        assert_eq!(store.get::<Scenario>("TS-1").unwrap().title, "First");
        assert_eq!(
            warnings,
            [LoadWarning::DuplicateKey {
                collection: CollectionKind::Scenarios,
                key: "TS-1".to_string(),
                index: 1,
            }]
        );
    }

    #[test]
    fn next_write_replaces_corrupt_slot_with_recovered_data() {
        let slots = SharedSlots::with(&[(
            "testhub_scenarios",
            r#"[{"scenarioId": "TS-1"}, "garbage"]"#,
        )]);

        let (mut store, warnings) = open(&slots);
        assert_eq!(warnings.len(), 1);
        store.add(Scenario::new("TS-2", "Cart", "Shop")).unwrap();

        let (reloaded, warnings) = open(&slots);
        assert!(warnings.is_empty());
        assert_eq!(scenario_keys(&reloaded), ["TS-1", "TS-2"]);
    }
}

// =============================================================================
// Persistence failures
// =============================================================================

mod write_failures {
    use super::*;

    #[test]
    fn failed_write_keeps_change_in_memory() {
        let slots = SharedSlots::default();
        let (mut store, _) = open(&slots);
        slots.set_quota(Some(0));

        store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();

        assert_eq!(scenario_keys(&store), ["TS-1"]);
        assert_eq!(store.pending_writes(), [CollectionKind::Scenarios]);
        assert_eq!(slots.read("testhub_scenarios"), None);
        assert!(store.flush().is_err());
        assert_eq!(store.pending_writes(), [CollectionKind::Scenarios]);
    }

    #[test]
    fn flush_retries_after_space_frees_up() {
        let slots = SharedSlots::default();
        let (mut store, _) = open(&slots);
        slots.set_quota(Some(0));
        store.add(Bug::new("BUG-1", "Crash", "Editor")).unwrap();

        slots.set_quota(None);
        store.flush().unwrap();

        assert!(store.pending_writes().is_empty());
        let (reloaded, _) = open(&slots);
        assert_eq!(reloaded.list::<Bug>().len(), 1);
    }

    #[test]
    fn next_mutation_retries_pending_collections() {
        let slots = SharedSlots::default();
        let (mut store, _) = open(&slots);
        slots.set_quota(Some(0));
        store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();

        slots.set_quota(None);
        store.add(Bug::new("BUG-1", "Crash", "Editor")).unwrap();

        assert!(store.pending_writes().is_empty());
        let (reloaded, _) = open(&slots);
        assert_eq!(scenario_keys(&reloaded), ["TS-1"]);
        assert_eq!(reloaded.list::<Bug>().len(), 1);
    }

    #[test]
    fn quota_blocks_only_the_collection_that_grows() {
        let slots = SharedSlots::default();
        let (mut store, _) = open(&slots);
        store.add(Scenario::new("TS-1", "Login", "Auth")).unwrap();

        let mut bug = Bug::new("BUG-1", "Crash", "Editor");
        bug.screenshot = Some(format!("data:image/png;base64,{}", "A".repeat(4096)));
        let used = slots.0.borrow().used_bytes();
        slots.set_quota(Some(used + 512));

        store.add(bug).unwrap();
        assert_eq!(store.pending_writes(), [CollectionKind::Bugs]);

        assert!(store.delete::<Scenario>("TS-1").is_some());
        assert_eq!(store.pending_writes(), [CollectionKind::Bugs]);
        let (reloaded, _) = open(&slots);
        assert!(reloaded.list::<Scenario>().is_empty());
        assert!(reloaded.list::<Bug>().is_empty());
    }
}
