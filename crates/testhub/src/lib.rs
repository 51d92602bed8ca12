//! TestHub - a QA record store for test scenarios, test cases, and bugs.
//!
//! This crate provides both a CLI application and a library. The library
//! centers on [`store::RecordStore`], which keeps three ordered collections
//! in memory and writes each one through to a durable key-value slot after
//! every change.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod bundle;
pub mod domain;
pub mod error;
pub mod report;
pub mod store;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;

// Command implementations
pub mod commands;

pub mod config;
