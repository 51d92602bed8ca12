//! The slot store abstraction and slot naming.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Maximum length of a slot name.
pub const MAX_SLOT_NAME_LENGTH: usize = 128;

/// Separator between the namespace and the slot's own name.
pub const NAMESPACE_SEPARATOR: char = '_';

/// A durable mapping from slot names to string contents.
///
/// Implementations hold whole values per slot. A `set` replaces the previous
/// contents entirely, and a successful `set` must be visible to the next
/// `get` from the same process.
pub trait SlotStore {
    /// Read a slot. Returns `Ok(None)` when the slot has never been written
    /// or has been removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSlotName` for names rejected by
    /// [`validate_slot_name`], or a backend error if the slot exists but
    /// cannot be read.
    fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Overwrite a slot with `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSlotName`, `Error::QuotaExceeded`, or a backend
    /// IO error. On error the previous contents are left in place.
    fn set(&mut self, slot: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSlotName` or a backend IO error.
    fn remove(&mut self, slot: &str) -> Result<()>;

    /// List the names of all slots currently present, sorted.
    ///
    /// # Errors
    ///
    /// Returns a backend IO error if the listing cannot be produced.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        (**self).get(slot)
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        (**self).set(slot, value)
    }

    fn remove(&mut self, slot: &str) -> Result<()> {
        (**self).remove(slot)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// Validate a slot name.
///
/// Requirements:
/// - 1-128 characters
/// - ASCII alphanumerics, `_`, `-`, and `.` only
/// - Must not start with `.`
///
/// These rules keep every slot name usable as a plain file name, so a file
/// backend can never be pointed outside its directory.
///
/// # Errors
///
/// Returns `Error::InvalidSlotName` describing the first violated rule.
pub fn validate_slot_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSlotName(
            "slot name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_SLOT_NAME_LENGTH {
        return Err(Error::InvalidSlotName(format!(
            "slot name cannot exceed {MAX_SLOT_NAME_LENGTH} characters"
        )));
    }

    if name.starts_with('.') {
        return Err(Error::InvalidSlotName(format!(
            "'{name}': slot name cannot start with '.'"
        )));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(Error::InvalidSlotName(format!(
            "'{name}': character {bad:?} is not allowed"
        )));
    }

    Ok(())
}

/// Prefix used by [`Namespace::default`].
pub const DEFAULT_NAMESPACE: &str = "testhub";

/// A prefix shared by a group of related slots.
///
/// Slots are named `{namespace}_{name}`, so `Namespace::new("testhub")`
/// maps `"bugs"` to `"testhub_bugs"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl Namespace {
    /// Create a namespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSlotName` if `prefix` is not itself a valid
    /// slot name.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_slot_name(&prefix)?;
        Ok(Self(prefix))
    }

    /// The raw prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full slot name for `name` within this namespace.
    #[must_use]
    pub fn slot(&self, name: &str) -> String {
        format!("{}{NAMESPACE_SEPARATOR}{name}", self.0)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read a slot and decode its contents as JSON.
///
/// Returns `Ok(None)` when the slot is absent.
///
/// # Errors
///
/// Returns the backend's read error, or `Error::Json` if the contents do
/// not decode as `T`.
pub fn read_json<T, S>(store: &S, slot: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: SlotStore + ?Sized,
{
    match store.get(slot)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and overwrite the slot with it.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails, or the backend's write
/// error.
pub fn write_json<T, S>(store: &mut S, slot: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: SlotStore + ?Sized,
{
    let text = serde_json::to_string(value)?;
    store.set(slot, &text)
}
