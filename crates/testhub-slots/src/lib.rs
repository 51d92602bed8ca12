//! Durable key-value string slots.
//!
//! A slot store is a flat mapping from slot names to string contents, the
//! same shape as a browser profile's local storage. Each slot is read and
//! overwritten as a whole; there are no partial or delta writes.
//!
//! Two backends are provided:
//!
//! - [`MemorySlotStore`]: ephemeral, with an optional byte quota
//! - [`DirSlotStore`]: one file per slot, written atomically
//!
//! # Examples
//!
//! ```
//! use testhub_slots::{MemorySlotStore, Namespace, SlotStore};
//!
//! let namespace = Namespace::new("testhub").unwrap();
//! let mut slots = MemorySlotStore::new();
//!
//! let slot = namespace.slot("scenarios");
//! slots.set(&slot, "[]").unwrap();
//! assert_eq!(slots.get("testhub_scenarios").unwrap().as_deref(), Some("[]"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod dir;
pub mod error;
pub mod memory;
pub mod slot;

pub use dir::DirSlotStore;
pub use error::{Error, Result};
pub use memory::MemorySlotStore;
pub use slot::{
    read_json, validate_slot_name, write_json, Namespace, SlotStore, DEFAULT_NAMESPACE,
};
