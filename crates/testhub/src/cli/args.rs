//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation. Record commands are grouped under one
//! subcommand per collection (`scenario`, `test-case`, `bug`).
//!
//! On update, an option given as an empty string clears an optional field.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::{BugStatusArg, CollectionArg, DirectionArg, PriorityArg, SeverityArg};
use super::validators::{validate_key, validate_namespace, validate_required_text};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Slot namespace (e.g., "qa" for slots named "qa_bugs")
    ///
    /// Letters, digits, '_', '-', and '.', at most 32 characters.
    #[arg(short, long, value_parser = validate_namespace)]
    pub namespace: Option<String>,

    /// Keep records in memory only; nothing is written to disk
    ///
    /// Every command runs in its own process, so records added from the
    /// command line are gone as soon as that command exits. Meant for
    /// trying out commands and for embedding the library.
    #[arg(long)]
    pub memory: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {}

/// Arguments naming a single record
#[derive(Parser, Debug, Clone)]
pub struct KeyArgs {
    /// Record ID
    #[arg(value_parser = validate_key)]
    pub key: String,
}

/// Arguments for deleting a record
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Record ID to delete
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for moving a record one position
#[derive(Parser, Debug, Clone)]
pub struct MoveArgs {
    /// Record ID to move
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// Direction to move in
    #[arg(value_enum)]
    pub direction: DirectionArg,
}

// ============================================================================
// Scenarios
// ============================================================================

/// Arguments for the `scenario` command
#[derive(Parser, Debug, Clone)]
pub struct ScenarioArgs {
    /// Scenario subcommand
    #[command(subcommand)]
    pub action: ScenarioAction,
}

/// Scenario actions
#[derive(Subcommand, Debug, Clone)]
pub enum ScenarioAction {
    /// Add a scenario
    Add(ScenarioAddArgs),
    /// List scenarios in stored order
    List(ScenarioListArgs),
    /// Show a scenario and its linked test cases
    Show(KeyArgs),
    /// Replace fields of an existing scenario
    Update(ScenarioUpdateArgs),
    /// Delete a scenario (its test cases are kept)
    Delete(DeleteArgs),
    /// Move a scenario up or down one position
    Move(MoveArgs),
}

/// Arguments for `scenario add`
#[derive(Parser, Debug, Clone)]
pub struct ScenarioAddArgs {
    /// Unique scenario ID (e.g., TS-1)
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// Scenario title
    #[arg(short, long, value_parser = validate_required_text)]
    pub title: String,

    /// Module the scenario belongs to
    #[arg(short, long, default_value = "")]
    pub module: String,

    /// Longer description
    #[arg(short = 'D', long)]
    pub description: Option<String>,
}

/// Arguments for `scenario update`
#[derive(Parser, Debug, Clone)]
pub struct ScenarioUpdateArgs {
    /// Scenario ID to update
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// New title
    #[arg(short, long, value_parser = validate_required_text)]
    pub title: Option<String>,

    /// New module
    #[arg(short, long)]
    pub module: Option<String>,

    /// New description (empty string clears it)
    #[arg(short = 'D', long)]
    pub description: Option<String>,
}

/// Arguments for `scenario list`
#[derive(Parser, Debug, Clone)]
pub struct ScenarioListArgs {
    /// Only scenarios in this module
    #[arg(short, long)]
    pub module: Option<String>,
}

// ============================================================================
// Test Cases
// ============================================================================

/// Arguments for the `test-case` command
#[derive(Parser, Debug, Clone)]
pub struct TestCaseArgs {
    /// Test case subcommand
    #[command(subcommand)]
    pub action: TestCaseAction,
}

/// Test case actions
#[derive(Subcommand, Debug, Clone)]
pub enum TestCaseAction {
    /// Add a test case
    Add(TestCaseAddArgs),
    /// List test cases in stored order
    List(TestCaseListArgs),
    /// Show a test case and its scenario
    Show(KeyArgs),
    /// Replace fields of an existing test case
    Update(TestCaseUpdateArgs),
    /// Delete a test case
    Delete(DeleteArgs),
    /// Move a test case up or down one position
    Move(MoveArgs),
}

/// Arguments for `test-case add`
#[derive(Parser, Debug, Clone)]
pub struct TestCaseAddArgs {
    /// Unique test case ID (e.g., TC-1)
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// Scenario the case exercises (need not exist yet)
    #[arg(short, long, value_parser = validate_key)]
    pub scenario: String,

    /// Steps to execute
    #[arg(long, default_value = "")]
    pub steps: String,

    /// Input data for the steps
    #[arg(short = 'd', long)]
    pub test_data: Option<String>,

    /// Expected result
    #[arg(short, long, default_value = "")]
    pub expected: String,

    /// Actual result, if already executed
    #[arg(short, long)]
    pub actual: Option<String>,
}

/// Arguments for `test-case update`
#[derive(Parser, Debug, Clone)]
pub struct TestCaseUpdateArgs {
    /// Test case ID to update
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// New scenario link
    #[arg(short, long, value_parser = validate_key)]
    pub scenario: Option<String>,

    /// New steps
    #[arg(long)]
    pub steps: Option<String>,

    /// New test data (empty string clears it)
    #[arg(short = 'd', long)]
    pub test_data: Option<String>,

    /// New expected result
    #[arg(short, long)]
    pub expected: Option<String>,

    /// New actual result (empty string marks the case not executed)
    #[arg(short, long)]
    pub actual: Option<String>,
}

/// Arguments for `test-case list`
#[derive(Parser, Debug, Clone)]
pub struct TestCaseListArgs {
    /// Only cases linked to this scenario
    #[arg(short, long, value_parser = validate_key)]
    pub scenario: Option<String>,

    /// Only cases without an actual result
    #[arg(long)]
    pub pending: bool,
}

// ============================================================================
// Bugs
// ============================================================================

/// Arguments for the `bug` command
#[derive(Parser, Debug, Clone)]
pub struct BugArgs {
    /// Bug subcommand
    #[command(subcommand)]
    pub action: BugAction,
}

/// Bug actions
#[derive(Subcommand, Debug, Clone)]
pub enum BugAction {
    /// Report a bug
    Add(BugAddArgs),
    /// List bugs in stored order
    List(BugListArgs),
    /// Show a bug with all fields
    Show(KeyArgs),
    /// Replace fields of an existing bug
    Update(BugUpdateArgs),
    /// Change a bug's status
    Status(BugStatusArgs),
    /// Delete a bug
    Delete(DeleteArgs),
    /// Move a bug up or down one position
    Move(MoveArgs),
}

/// Arguments for `bug add`
#[derive(Parser, Debug, Clone)]
pub struct BugAddArgs {
    /// Unique bug ID (e.g., BUG-1)
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// One-line summary
    #[arg(long, value_parser = validate_required_text)]
    pub summary: String,

    /// Module the bug was found in
    #[arg(short, long, default_value = "")]
    pub module: String,

    /// Steps to reproduce
    #[arg(long, default_value = "")]
    pub steps: String,

    /// Expected result
    #[arg(short, long, default_value = "")]
    pub expected: String,

    /// Actual result
    #[arg(short, long, default_value = "")]
    pub actual: String,

    /// Severity
    #[arg(long, value_enum, default_value = "medium")]
    pub severity: SeverityArg,

    /// Priority
    #[arg(short, long, value_enum, default_value = "p2")]
    pub priority: PriorityArg,

    /// Initial status
    #[arg(long, value_enum, default_value = "open")]
    pub status: BugStatusArg,
}

/// Arguments for `bug update`
#[derive(Parser, Debug, Clone)]
pub struct BugUpdateArgs {
    /// Bug ID to update
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// New summary
    #[arg(long, value_parser = validate_required_text)]
    pub summary: Option<String>,

    /// New module
    #[arg(short, long)]
    pub module: Option<String>,

    /// New steps to reproduce
    #[arg(long)]
    pub steps: Option<String>,

    /// New expected result
    #[arg(short, long)]
    pub expected: Option<String>,

    /// New actual result
    #[arg(short, long)]
    pub actual: Option<String>,

    /// New severity
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,

    /// New priority
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// New status
    #[arg(long, value_enum)]
    pub status: Option<BugStatusArg>,

    /// Drop the attached screenshot
    #[arg(long)]
    pub remove_screenshot: bool,
}

/// Arguments for `bug status`
#[derive(Parser, Debug, Clone)]
pub struct BugStatusArgs {
    /// Bug ID
    #[arg(value_parser = validate_key)]
    pub key: String,

    /// New status
    #[arg(value_enum)]
    pub status: BugStatusArg,
}

/// Arguments for `bug list`
#[derive(Parser, Debug, Clone)]
pub struct BugListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<BugStatusArg>,

    /// Filter by severity
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,

    /// Filter by module
    #[arg(short, long)]
    pub module: Option<String>,
}

// ============================================================================
// Cross-collection commands
// ============================================================================

/// Arguments for the `linked` command
#[derive(Parser, Debug, Clone)]
pub struct LinkedArgs {
    /// Scenario ID to look up (need not exist)
    #[arg(value_parser = validate_key)]
    pub scenario: String,
}

/// Arguments for the `orphans` command
#[derive(Parser, Debug, Clone)]
pub struct OrphansArgs {}

/// Arguments for the `import` command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// JSON file to import: a bundle object or a bare array of records
    pub file: PathBuf,

    /// Collection a bare array belongs to, or the only collection to take
    /// from a bundle
    #[arg(long, value_enum)]
    pub into: Option<CollectionArg>,
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export a single collection as a bare array
    #[arg(long, value_enum)]
    pub only: Option<CollectionArg>,

    /// Leave screenshot payloads out of the export
    #[arg(long)]
    pub strip_screenshots: bool,
}

/// Arguments for the `report` command
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// Write to this file (default: test_report_YYYY-MM-DD.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the report to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Arguments for the `summary` command
#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {}

/// Arguments for the `clear` command
#[derive(Parser, Debug, Clone)]
pub struct ClearArgs {
    /// Collection to clear (default: all three)
    #[arg(value_enum)]
    pub collection: Option<CollectionArg>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
