//! Ephemeral slot store backed by a `BTreeMap`.
//!
//! Used for tests and for projects configured without on-disk persistence.
//! An optional quota caps the total size of all slot contents, mirroring the
//! fixed storage budget a browser grants each origin.

use crate::slot::validate_slot_name;
use crate::{Error, Result, SlotStore};
use std::collections::BTreeMap;

/// In-memory slot store.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemorySlotStore {
    /// Create an empty store without a size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose slots may hold at most `bytes` in total.
    ///
    /// Sizes are measured as the byte length of names plus contents.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    /// Change or lift the quota. Existing contents are kept even if they
    /// exceed the new limit; only later writes are checked.
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Total bytes currently used by names and contents.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of slots present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        validate_slot_name(slot)?;
        Ok(self.slots.get(slot).cloned())
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        validate_slot_name(slot)?;

        if let Some(quota) = self.quota {
            let previous = self.slots.get(slot).map_or(0, |v| slot.len() + v.len());
            let available = quota.saturating_sub(self.used_bytes() - previous);
            let needed = slot.len() + value.len();
            if needed > available {
                return Err(Error::QuotaExceeded {
                    slot: slot.to_string(),
                    needed,
                    available,
                });
            }
        }

        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<()> {
        validate_slot_name(slot)?;
        self.slots.remove(slot);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.slots.keys().cloned().collect())
    }
}
