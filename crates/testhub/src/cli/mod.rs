//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for testhub using clap's
//! derive API. Each command has its own argument struct with validation and
//! helpful error messages.
//!
//! # Commands
//!
//! - `init`: Initialize a new testhub project
//! - `info`: Show project and storage information
//! - `summary`: Show dashboard counts
//! - `scenario`, `test-case`, `bug`: Add, list, show, update, delete, and
//!   move records of one collection
//! - `linked`: List the test cases linked to a scenario
//! - `orphans`: List test cases whose scenario does not exist
//! - `import`: Merge records from a JSON file
//! - `export`: Write all records as a JSON bundle
//! - `report`: Write a timestamped QA report
//! - `clear`: Remove every record of one or all collections
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `-C <DIR>`: Run as if started in `<DIR>`
//!
//! # Example
//!
//! ```bash
//! testhub scenario add TS-1 --title "Login" --module Auth
//! testhub tc add TC-1 --scenario TS-1 --steps "Open login page" --expected "Form shown"
//! testhub bug add BUG-1 --summary "Crash on save" --severity critical -p p1
//! testhub bug status BUG-1 in_progress
//! testhub linked TS-1
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{
    BugAction, BugAddArgs, BugArgs, BugListArgs, BugStatusArgs, BugUpdateArgs, ClearArgs,
    DeleteArgs, ExportArgs, ImportArgs, InfoArgs, InitArgs, KeyArgs, LinkedArgs, MoveArgs,
    OrphansArgs, ReportArgs, ScenarioAction, ScenarioAddArgs, ScenarioArgs, ScenarioListArgs,
    ScenarioUpdateArgs, SummaryArgs, TestCaseAction, TestCaseAddArgs, TestCaseArgs,
    TestCaseListArgs, TestCaseUpdateArgs,
};

// Re-export types
pub use types::{BugStatusArg, CollectionArg, DirectionArg, PriorityArg, SeverityArg};

// Re-export validators for external use
pub use validators::{validate_key, validate_namespace, validate_required_text};

/// TestHub - QA records for scenarios, test cases, and bugs
///
/// Keeps three ordered collections in durable slots under `.testhub/`.
/// Every change is written through immediately.
#[derive(Parser, Debug)]
#[command(name = "testhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if testhub was started in this directory
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new testhub project
    ///
    /// Creates the `.testhub/` directory with configuration and a slot
    /// directory. Run this once in your project root.
    Init(InitArgs),

    /// Show project information
    ///
    /// Displays the storage backend, namespace, record counts, and any
    /// problems found while loading.
    Info(InfoArgs),

    /// Show dashboard counts
    ///
    /// Totals per collection plus open, closed, and critical bugs.
    Summary(SummaryArgs),

    /// Manage test scenarios
    Scenario(ScenarioArgs),

    /// Manage test cases
    #[command(name = "test-case", alias = "tc")]
    TestCase(TestCaseArgs),

    /// Manage bugs
    Bug(BugArgs),

    /// List test cases linked to a scenario
    ///
    /// Works whether or not the scenario itself exists.
    Linked(LinkedArgs),

    /// List test cases whose scenario does not exist
    Orphans(OrphansArgs),

    /// Import records from a JSON file
    ///
    /// Records whose ID is already present are skipped; existing records
    /// are never modified.
    Import(ImportArgs),

    /// Export records as JSON
    Export(ExportArgs),

    /// Write a timestamped QA report
    Report(ReportArgs),

    /// Remove all records of one or all collections
    ///
    /// Use `--yes` to skip confirmation.
    Clear(ClearArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails, or if a change could not be
    /// written to the slots.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let base_dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let Some(command) = &self.command else {
            println!("TestHub QA record store");
            println!("Use --help for more information");
            return Ok(());
        };

        let mut app = match command {
            Commands::Init(args) => return execute::execute_init(&base_dir, args).await,
            _ => App::from_directory(&base_dir).await?,
        };

        match command {
            Commands::Init(_) => {}
            Commands::Info(args) => execute::execute_info(&app, args, output_mode)?,
            Commands::Summary(args) => execute::execute_summary(&app, args, output_mode)?,
            Commands::Scenario(args) => execute::execute_scenario(&mut app, args, output_mode)?,
            Commands::TestCase(args) => execute::execute_test_case(&mut app, args, output_mode)?,
            Commands::Bug(args) => execute::execute_bug(&mut app, args, output_mode)?,
            Commands::Linked(args) => execute::execute_linked(&app, args, output_mode)?,
            Commands::Orphans(args) => execute::execute_orphans(&app, args, output_mode)?,
            Commands::Import(args) => execute::execute_import(&mut app, args, output_mode).await?,
            Commands::Export(args) => execute::execute_export(&app, args, output_mode).await?,
            Commands::Report(args) => {
                execute::execute_report(&app, &base_dir, args, output_mode).await?;
            }
            Commands::Clear(args) => execute::execute_clear(&mut app, args, output_mode)?,
        }

        // Retry any slot write that failed during the command
        app.finish()?;
        Ok(())
    }
}
