//! Loading collections from durable slots and writing them back.
//!
//! Each collection lives in one slot as a single JSON array. Loading never
//! fails: whatever cannot be recovered is dropped and reported as a
//! [`LoadWarning`], so a corrupt slot degrades to an empty collection instead
//! of making the store unusable.

use super::collections::{Collections, StoredRecord};
use crate::domain::{Bug, CollectionKind, Record, Scenario, TestCase};
use crate::error::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use testhub_slots::{Namespace, SlotStore};

/// Non-fatal problems found while loading the collections.
///
/// The store is still constructed when these occur; the affected data is
/// skipped. The next write of the collection replaces the slot with what
/// was recovered, so callers should surface these to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The slot could not be read at all.
    ///
    /// **Effect**: The collection starts empty.
    Unreadable {
        /// Collection the slot belongs to
        collection: CollectionKind,
        /// Full slot name
        slot: String,
        /// Underlying error
        error: String,
    },

    /// The slot content is not a JSON array.
    ///
    /// **Effect**: The collection starts empty.
    /// **Common causes**: Manual editing, a truncated write by another tool.
    Malformed {
        /// Collection the slot belongs to
        collection: CollectionKind,
        /// Full slot name
        slot: String,
        /// Parser error
        error: String,
    },

    /// One entry of the array could not be decoded as a record.
    ///
    /// **Effect**: The entry is skipped; the rest of the collection loads.
    InvalidRecord {
        /// Collection the slot belongs to
        collection: CollectionKind,
        /// Zero-based position of the entry in the slot
        index: usize,
        /// Decoder error
        error: String,
    },

    /// An entry repeats the key of an earlier entry.
    ///
    /// **Effect**: The later entry is skipped so keys stay unique.
    DuplicateKey {
        /// Collection the slot belongs to
        collection: CollectionKind,
        /// The repeated key
        key: String,
        /// Zero-based position of the skipped entry
        index: usize,
    },
}

impl LoadWarning {
    /// Collection the warning concerns.
    #[must_use]
    pub fn collection(&self) -> CollectionKind {
        match self {
            Self::Unreadable { collection, .. }
            | Self::Malformed { collection, .. }
            | Self::InvalidRecord { collection, .. }
            | Self::DuplicateKey { collection, .. } => *collection,
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { slot, error, .. } => {
                write!(f, "could not read slot '{slot}': {error}")
            }
            Self::Malformed { slot, error, .. } => {
                write!(f, "slot '{slot}' is not a record list: {error}")
            }
            Self::InvalidRecord {
                collection,
                index,
                error,
            } => write!(f, "skipped invalid {collection} at position {index}: {error}"),
            Self::DuplicateKey {
                collection,
                key,
                index,
            } => write!(
                f,
                "skipped duplicate {collection} ID \"{key}\" at position {index}"
            ),
        }
    }
}

/// Load all three collections from their slots.
pub(super) fn load_all(
    slots: &dyn SlotStore,
    namespace: &Namespace,
) -> (Collections, Vec<LoadWarning>) {
    let mut warnings = Vec::new();
    let collections = Collections {
        scenarios: load_collection::<Scenario>(slots, namespace, &mut warnings),
        test_cases: load_collection::<TestCase>(slots, namespace, &mut warnings),
        bugs: load_collection::<Bug>(slots, namespace, &mut warnings),
    };
    (collections, warnings)
}

fn load_collection<R: Record>(
    slots: &dyn SlotStore,
    namespace: &Namespace,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<R> {
    let collection = R::KIND;
    let slot = namespace.slot(collection.slot_name());

    let content = match slots.get(&slot) {
        Ok(Some(content)) => content,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warnings.push(LoadWarning::Unreadable {
                collection,
                slot,
                error: e.to_string(),
            });
            return Vec::new();
        }
    };

    let entries: Vec<Value> = match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warnings.push(LoadWarning::Malformed {
                collection,
                slot,
                error: e.to_string(),
            });
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let record: R = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(e) => {
                warnings.push(LoadWarning::InvalidRecord {
                    collection,
                    index,
                    error: e.to_string(),
                });
                continue;
            }
        };

        if !seen.insert(record.key().to_string()) {
            warnings.push(LoadWarning::DuplicateKey {
                collection,
                key: record.key().to_string(),
                index,
            });
            continue;
        }

        records.push(record);
    }

    tracing::debug!(%collection, slot = %slot, count = records.len(), "Loaded collection");
    records
}

/// Write one collection's whole sequence to its slot.
pub(super) fn write_collection(
    slots: &mut dyn SlotStore,
    namespace: &Namespace,
    collections: &Collections,
    kind: CollectionKind,
) -> Result<()> {
    match kind {
        CollectionKind::Scenarios => write_records::<Scenario>(slots, namespace, collections),
        CollectionKind::TestCases => write_records::<TestCase>(slots, namespace, collections),
        CollectionKind::Bugs => write_records::<Bug>(slots, namespace, collections),
    }
}

fn write_records<R: StoredRecord>(
    slots: &mut dyn SlotStore,
    namespace: &Namespace,
    collections: &Collections,
) -> Result<()> {
    let slot = namespace.slot(R::KIND.slot_name());
    testhub_slots::write_json(slots, &slot, R::records(collections))?;
    Ok(())
}
