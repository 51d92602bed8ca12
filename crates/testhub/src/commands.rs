//! Command implementations that work outside an opened store.

pub mod init;
