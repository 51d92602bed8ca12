//! The three collections and the order-preserving operations on them.
//!
//! The functions here work on plain slices and vectors so the ordering and
//! uniqueness rules can be tested without any persistence in the way.

use crate::domain::{Bug, CollectionKind, Direction, Record, Scenario, TestCase};
use serde::Serialize;
use std::collections::HashSet;

/// The in-memory state of the store: one ordered sequence per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) test_cases: Vec<TestCase>,
    pub(crate) bugs: Vec<Bug>,
}

impl Collections {
    /// Scenarios in display order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Test cases in display order.
    #[must_use]
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Bugs in display order.
    #[must_use]
    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    /// Number of records in the named collection.
    #[must_use]
    pub fn len_of(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Scenarios => self.scenarios.len(),
            CollectionKind::TestCases => self.test_cases.len(),
            CollectionKind::Bugs => self.bugs.len(),
        }
    }
}

/// A record type the store keeps a collection of.
///
/// Maps each record type to its sequence inside [`Collections`], which lets
/// the store's operations be written once, generically.
pub trait StoredRecord: Record {
    /// The collection holding records of this type.
    fn records(collections: &Collections) -> &Vec<Self>;

    /// Mutable access to the collection holding records of this type.
    fn records_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

impl StoredRecord for Scenario {
    fn records(collections: &Collections) -> &Vec<Self> {
        &collections.scenarios
    }

    fn records_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.scenarios
    }
}

impl StoredRecord for TestCase {
    fn records(collections: &Collections) -> &Vec<Self> {
        &collections.test_cases
    }

    fn records_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.test_cases
    }
}

impl StoredRecord for Bug {
    fn records(collections: &Collections) -> &Vec<Self> {
        &collections.bugs
    }

    fn records_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.bugs
    }
}

/// Outcome of merging a batch into a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Collection the batch was merged into
    pub collection: CollectionKind,
    /// Records appended
    pub appended: usize,
    /// Records dropped because their key was already taken
    pub skipped: usize,
}

/// Index of the record with `key`, if any.
pub(crate) fn position<R: Record>(records: &[R], key: &str) -> Option<usize> {
    records.iter().position(|r| r.key() == key)
}

/// Swap the record with `key` and its neighbour in `direction`.
///
/// Returns `false`, leaving the slice untouched, when the key is absent or
/// the record already sits at the boundary it would move past.
pub(crate) fn swap_with_neighbour<R: Record>(
    records: &mut [R],
    key: &str,
    direction: Direction,
) -> bool {
    let Some(index) = position(records, key) else {
        return false;
    };

    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&t| t < records.len()),
    };

    match target {
        Some(target) => {
            records.swap(index, target);
            true
        }
        None => false,
    }
}

/// Append the records of `incoming` whose keys are not yet taken.
///
/// Keys are checked against the collection as it stood before the call and
/// against records appended earlier in the same batch, so the first
/// occurrence of a key within a batch wins and later ones are dropped.
pub(crate) fn merge_absent<R, I>(records: &mut Vec<R>, incoming: I) -> ImportSummary
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut taken: HashSet<String> = records.iter().map(|r| r.key().to_string()).collect();
    let mut summary = ImportSummary {
        collection: R::KIND,
        appended: 0,
        skipped: 0,
    };

    for record in incoming {
        if taken.insert(record.key().to_string()) {
            records.push(record);
            summary.appended += 1;
        } else {
            summary.skipped += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scenarios(keys: &[&str]) -> Vec<Scenario> {
        keys.iter()
            .map(|k| Scenario::new(*k, format!("Title {k}"), "Module"))
            .collect()
    }

    fn keys(records: &[Scenario]) -> Vec<&str> {
        records.iter().map(Record::key).collect()
    }

    #[test]
    fn position_finds_key() {
        let records = scenarios(&["a", "b", "c"]);
        assert_eq!(position(&records, "b"), Some(1));
        assert_eq!(position(&records, "z"), None);
    }

    #[rstest]
    #[case::middle_up("b", Direction::Up, true, &["b", "a", "c"])]
    #[case::middle_down("b", Direction::Down, true, &["a", "c", "b"])]
    #[case::first_up("a", Direction::Up, false, &["a", "b", "c"])]
    #[case::last_down("c", Direction::Down, false, &["a", "b", "c"])]
    #[case::first_down("a", Direction::Down, true, &["b", "a", "c"])]
    #[case::last_up("c", Direction::Up, true, &["a", "c", "b"])]
    #[case::missing("z", Direction::Up, false, &["a", "b", "c"])]
    fn swap_with_neighbour_cases(
        #[case] key: &str,
        #[case] direction: Direction,
        #[case] moved: bool,
        #[case] expected: &[&str],
    ) {
        let mut records = scenarios(&["a", "b", "c"]);
        assert_eq!(swap_with_neighbour(&mut records, key, direction), moved);
        assert_eq!(keys(&records), expected);
    }

    #[rstest]
    #[case::up(Direction::Up)]
    #[case::down(Direction::Down)]
    fn single_record_never_moves(#[case] direction: Direction) {
        let mut records = scenarios(&["only"]);
        assert!(!swap_with_neighbour(&mut records, "only", direction));
    }

    #[test]
    fn merge_absent_skips_existing_and_in_batch_duplicates() {
        let mut records = scenarios(&["a", "b"]);
        let mut incoming = scenarios(&["b", "c", "c", "d"]);
        incoming[2].title = "second c".to_string();

        let summary = merge_absent(&mut records, incoming);

        assert_eq!(keys(&records), ["a", "b", "c", "d"]);
        assert_eq!(records[2].title, "Title c");
        assert_eq!(
            summary,
            ImportSummary {
                collection: CollectionKind::Scenarios,
                appended: 2,
                skipped: 2
            }
        );
    }

    #[test]
    fn merge_absent_keeps_existing_record_untouched() {
        let mut records = scenarios(&["a"]);
        let mut replacement = Scenario::new("a", "Replaced", "Other");
        replacement.description = Some("should not land".to_string());

        merge_absent(&mut records, vec![replacement]);

        assert_eq!(records, scenarios(&["a"]));
    }

    #[test]
    fn collections_report_lengths() {
        let collections = Collections {
            scenarios: scenarios(&["a", "b"]),
            ..Collections::default()
        };
        assert_eq!(collections.len_of(CollectionKind::Scenarios), 2);
        assert_eq!(collections.len_of(CollectionKind::Bugs), 0);
    }
}
