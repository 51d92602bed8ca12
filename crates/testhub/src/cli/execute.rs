//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Commands
//! that only touch the store are synchronous; the ones that read or write
//! files outside the slots use `tokio::fs`.

use anyhow::Result;
use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::path::Path;

use super::args::{
    BugAction, BugAddArgs, BugArgs, BugListArgs, BugStatusArgs, BugUpdateArgs, ClearArgs,
    DeleteArgs, ExportArgs, ImportArgs, InfoArgs, InitArgs, KeyArgs, LinkedArgs, MoveArgs,
    OrphansArgs, ReportArgs, ScenarioAction, ScenarioAddArgs, ScenarioArgs, ScenarioListArgs,
    ScenarioUpdateArgs, SummaryArgs, TestCaseAction, TestCaseAddArgs, TestCaseArgs,
    TestCaseListArgs, TestCaseUpdateArgs,
};
use crate::app::App;
use crate::bundle::ImportDocument;
use crate::domain::{
    Bug, BugStatus, CollectionKind, Direction, Priority, Record, Scenario, Severity, TestCase,
};
use crate::error::Error;
use crate::output::{self, OutputConfig, OutputMode};
use crate::store::StoredRecord;

// ============================================================================
// Helpers
// ============================================================================

/// Ask a yes/no question on stderr. Anything but "y" or "yes" declines,
/// including end of input.
fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{prompt} [y/N]: ");
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// An empty option value clears an optional field.
fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn not_found(collection: CollectionKind, key: &str) -> Error {
    Error::NotFound {
        collection,
        key: key.to_string(),
    }
}

fn lookup<'a, R: StoredRecord>(app: &'a App, key: &str) -> Result<&'a R> {
    Ok(app
        .store()
        .get::<R>(key)
        .ok_or_else(|| not_found(R::KIND, key))?)
}

/// Print the outcome of a single-record mutation.
fn print_record_result<R: Record>(
    action: &str,
    record: &R,
    output_mode: OutputMode,
) -> Result<()> {
    match output_mode {
        OutputMode::Json => output::print_json(record)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&format!(
                "{} {}: {}",
                output::success(action, &config),
                R::KIND.label().to_lowercase(),
                output::info(record.key(), &config)
            ))?;
        }
    }
    Ok(())
}

fn add_record<R: StoredRecord>(app: &mut App, record: R, output_mode: OutputMode) -> Result<()> {
    let added = app.store_mut().add(record)?;
    print_record_result("Added", added, output_mode)
}

fn update_record<R: StoredRecord>(app: &mut App, record: R, output_mode: OutputMode) -> Result<()> {
    let key = record.key().to_string();
    if !app.store_mut().update(record) {
        return Err(not_found(R::KIND, &key).into());
    }
    let updated = lookup::<R>(app, &key)?;
    print_record_result("Updated", updated, output_mode)
}

/// Delete a record after confirmation. `detail` adds context to the prompt.
fn delete_record<R: StoredRecord>(
    app: &mut App,
    args: &DeleteArgs,
    output_mode: OutputMode,
    detail: &str,
) -> Result<()> {
    let kind = R::KIND;
    lookup::<R>(app, &args.key)?;

    if !args.force && !confirm(&format!("Delete {} '{}'{detail}?", kind.label(), args.key))? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let removed = app
        .store_mut()
        .delete::<R>(&args.key)
        .ok_or_else(|| not_found(kind, &args.key))?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "deleted": removed.key(),
                "collection": kind.as_str(),
                "status": "success"
            }))?;
        }
        OutputMode::Text => {
            println!("Deleted {}: {}", kind.label().to_lowercase(), removed.key());
        }
    }
    Ok(())
}

fn move_record<R: StoredRecord>(app: &mut App, args: &MoveArgs, output_mode: OutputMode) -> Result<()> {
    let kind = R::KIND;
    lookup::<R>(app, &args.key)?;

    let direction = Direction::from(args.direction);
    let moved = app.store_mut().reorder::<R>(&args.key, direction);
    let position = app
        .store()
        .list::<R>()
        .iter()
        .position(|r| r.key() == args.key)
        .map_or(0, |i| i + 1);

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "key": args.key,
                "collection": kind.as_str(),
                "direction": direction,
                "moved": moved,
                "position": position
            }))?;
        }
        OutputMode::Text if moved => {
            println!(
                "Moved {} {} {direction} to position {position}",
                kind.label().to_lowercase(),
                args.key
            );
        }
        OutputMode::Text => {
            let edge = match direction {
                Direction::Up => "top",
                Direction::Down => "bottom",
            };
            println!("{} {} is already at the {edge}", kind.label(), args.key);
        }
    }
    Ok(())
}

// ============================================================================
// Project commands
// ============================================================================

/// Execute the init command
pub async fn execute_init(base_dir: &Path, args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    if !args.quiet {
        println!(
            "Initializing testhub project{}...",
            args.namespace
                .as_ref()
                .map(|ns| format!(" with namespace '{ns}'"))
                .unwrap_or_default()
        );
    }

    let result = init::init(base_dir, args.namespace.as_deref(), args.memory).await?;

    if !args.quiet {
        println!("Initialized testhub in {}", result.testhub_dir.display());
        println!("  Config:    {}", result.config_file.display());
        match &result.data_dir {
            Some(dir) => println!("  Slots:     {}", dir.display()),
            None => println!("  Slots:     in memory (records are not kept)"),
        }
        println!("  Namespace: {}", result.namespace);
    }

    Ok(())
}

/// Execute the info command
pub fn execute_info(app: &App, _args: &InfoArgs, output_mode: OutputMode) -> Result<()> {
    let store = app.store();
    let collections = store.collections();
    let warnings: Vec<String> = app.load_warnings().iter().map(ToString::to_string).collect();
    let pending: Vec<&str> = store.pending_writes().into_iter().map(CollectionKind::as_str).collect();

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "testhubDir": app.testhub_dir().display().to_string(),
                "backend": app.backend().to_string(),
                "persistent": app.backend().is_persistent(),
                "namespace": store.namespace().as_str(),
                "records": {
                    "scenarios": collections.scenarios().len(),
                    "testCases": collections.test_cases().len(),
                    "bugs": collections.bugs().len()
                },
                "loadWarnings": warnings,
                "pendingWrites": pending
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!("TestHub Project Information");
            println!("===========================");
            println!();
            println!("Directory: {}", app.testhub_dir().display());
            println!("Backend:   {}", app.backend());
            if !app.backend().is_persistent() {
                println!(
                    "           {}",
                    output::warning("records are discarded when each command exits", &config)
                );
            }
            println!("Namespace: {}", store.namespace());
            println!();
            for kind in CollectionKind::ALL {
                println!(
                    "{:<10} {}",
                    format!("{}:", kind.as_str()),
                    collections.len_of(kind)
                );
            }
            if !warnings.is_empty() {
                println!();
                println!("{}", output::warning("Problems found while loading:", &config));
                for warning in &warnings {
                    println!("  {warning}");
                }
            }
            if !pending.is_empty() {
                println!();
                println!(
                    "{} {}",
                    output::error("Unsaved collections:", &config),
                    pending.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Execute the summary command
pub fn execute_summary(app: &App, _args: &SummaryArgs, output_mode: OutputMode) -> Result<()> {
    output::print_summary(&app.store().summary(), output_mode)?;
    Ok(())
}

// ============================================================================
// Scenario commands
// ============================================================================

/// Execute a scenario subcommand
pub fn execute_scenario(app: &mut App, args: &ScenarioArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        ScenarioAction::Add(add) => execute_scenario_add(app, add, output_mode),
        ScenarioAction::List(list) => execute_scenario_list(app, list, output_mode),
        ScenarioAction::Show(show) => execute_scenario_show(app, show, output_mode),
        ScenarioAction::Update(update) => execute_scenario_update(app, update, output_mode),
        ScenarioAction::Delete(delete) => {
            let linked = app.store().linked_test_cases(&delete.key).len();
            let detail = match linked {
                0 => String::new(),
                1 => " (1 linked test case will be kept)".to_string(),
                n => format!(" ({n} linked test cases will be kept)"),
            };
            delete_record::<Scenario>(app, delete, output_mode, &detail)
        }
        ScenarioAction::Move(mv) => move_record::<Scenario>(app, mv, output_mode),
    }
}

fn execute_scenario_add(app: &mut App, args: &ScenarioAddArgs, output_mode: OutputMode) -> Result<()> {
    let mut scenario = Scenario::new(&args.key, &args.title, &args.module);
    scenario.description = args.description.as_deref().and_then(optional_text);
    add_record(app, scenario, output_mode)
}

fn execute_scenario_list(app: &App, args: &ScenarioListArgs, output_mode: OutputMode) -> Result<()> {
    let scenarios: Vec<&Scenario> = app
        .store()
        .list::<Scenario>()
        .iter()
        .filter(|s| args.module.as_ref().is_none_or(|m| &s.module == m))
        .collect();
    output::print_scenarios(&scenarios, output_mode)?;
    Ok(())
}

fn execute_scenario_show(app: &App, args: &KeyArgs, output_mode: OutputMode) -> Result<()> {
    let scenario = lookup::<Scenario>(app, &args.key)?;
    let linked = app.store().linked_test_cases(&args.key);
    output::print_scenario_details(scenario, &linked, output_mode)?;
    Ok(())
}

fn execute_scenario_update(
    app: &mut App,
    args: &ScenarioUpdateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut scenario = lookup::<Scenario>(app, &args.key)?.clone();
    if let Some(title) = &args.title {
        scenario.title.clone_from(title);
    }
    if let Some(module) = &args.module {
        scenario.module.clone_from(module);
    }
    if let Some(description) = &args.description {
        scenario.description = optional_text(description);
    }
    update_record(app, scenario, output_mode)
}

// ============================================================================
// Test case commands
// ============================================================================

/// Execute a test case subcommand
pub fn execute_test_case(app: &mut App, args: &TestCaseArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        TestCaseAction::Add(add) => execute_test_case_add(app, add, output_mode),
        TestCaseAction::List(list) => execute_test_case_list(app, list, output_mode),
        TestCaseAction::Show(show) => execute_test_case_show(app, show, output_mode),
        TestCaseAction::Update(update) => execute_test_case_update(app, update, output_mode),
        TestCaseAction::Delete(delete) => delete_record::<TestCase>(app, delete, output_mode, ""),
        TestCaseAction::Move(mv) => move_record::<TestCase>(app, mv, output_mode),
    }
}

fn execute_test_case_add(app: &mut App, args: &TestCaseAddArgs, output_mode: OutputMode) -> Result<()> {
    if !app.store().contains::<Scenario>(&args.scenario) {
        tracing::warn!(
            test_case = %args.key,
            scenario = %args.scenario,
            "Scenario does not exist; the test case will be orphaned"
        );
    }

    let mut test_case = TestCase::new(&args.key, &args.scenario, &args.steps, &args.expected);
    test_case.test_data = args.test_data.as_deref().and_then(optional_text);
    test_case.actual_result = args.actual.as_deref().and_then(optional_text);
    add_record(app, test_case, output_mode)
}

fn execute_test_case_list(app: &App, args: &TestCaseListArgs, output_mode: OutputMode) -> Result<()> {
    let store = app.store();
    let base: Vec<&TestCase> = match &args.scenario {
        Some(scenario) => store.linked_test_cases(scenario),
        None => store.list::<TestCase>().iter().collect(),
    };
    let test_cases: Vec<&TestCase> = base
        .into_iter()
        .filter(|tc| !args.pending || !tc.is_executed())
        .collect();
    output::print_test_cases(&test_cases, output_mode)?;
    Ok(())
}

fn execute_test_case_show(app: &App, args: &KeyArgs, output_mode: OutputMode) -> Result<()> {
    let test_case = lookup::<TestCase>(app, &args.key)?;
    let scenario = app.store().get::<Scenario>(&test_case.scenario_id);
    output::print_test_case_details(test_case, scenario, output_mode)?;
    Ok(())
}

fn execute_test_case_update(
    app: &mut App,
    args: &TestCaseUpdateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut test_case = lookup::<TestCase>(app, &args.key)?.clone();
    if let Some(scenario) = &args.scenario {
        test_case.scenario_id.clone_from(scenario);
    }
    if let Some(steps) = &args.steps {
        test_case.steps.clone_from(steps);
    }
    if let Some(test_data) = &args.test_data {
        test_case.test_data = optional_text(test_data);
    }
    if let Some(expected) = &args.expected {
        test_case.expected_result.clone_from(expected);
    }
    if let Some(actual) = &args.actual {
        test_case.actual_result = optional_text(actual);
    }
    update_record(app, test_case, output_mode)
}

// ============================================================================
// Bug commands
// ============================================================================

/// Execute a bug subcommand
pub fn execute_bug(app: &mut App, args: &BugArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        BugAction::Add(add) => execute_bug_add(app, add, output_mode),
        BugAction::List(list) => execute_bug_list(app, list, output_mode),
        BugAction::Show(show) => {
            let bug = lookup::<Bug>(app, &show.key)?;
            output::print_bug_details(bug, output_mode)?;
            Ok(())
        }
        BugAction::Update(update) => execute_bug_update(app, update, output_mode),
        BugAction::Status(status) => execute_bug_status(app, status, output_mode),
        BugAction::Delete(delete) => delete_record::<Bug>(app, delete, output_mode, ""),
        BugAction::Move(mv) => move_record::<Bug>(app, mv, output_mode),
    }
}

fn execute_bug_add(app: &mut App, args: &BugAddArgs, output_mode: OutputMode) -> Result<()> {
    let mut bug = Bug::new(&args.key, &args.summary, &args.module);
    bug.steps.clone_from(&args.steps);
    bug.expected_result.clone_from(&args.expected);
    bug.actual_result.clone_from(&args.actual);
    bug.severity = args.severity.into();
    bug.priority = args.priority.into();
    bug.status = args.status.into();
    add_record(app, bug, output_mode)
}

fn execute_bug_list(app: &App, args: &BugListArgs, output_mode: OutputMode) -> Result<()> {
    let status = args.status.map(BugStatus::from);
    let severity = args.severity.map(Severity::from);

    let bugs: Vec<&Bug> = app
        .store()
        .list::<Bug>()
        .iter()
        .filter(|b| status.as_ref().is_none_or(|s| &b.status == s))
        .filter(|b| severity.as_ref().is_none_or(|s| &b.severity == s))
        .filter(|b| args.module.as_ref().is_none_or(|m| &b.module == m))
        .collect();
    output::print_bugs(&bugs, output_mode)?;
    Ok(())
}

fn execute_bug_update(app: &mut App, args: &BugUpdateArgs, output_mode: OutputMode) -> Result<()> {
    let mut bug = lookup::<Bug>(app, &args.key)?.clone();
    if let Some(summary) = &args.summary {
        bug.summary.clone_from(summary);
    }
    if let Some(module) = &args.module {
        bug.module.clone_from(module);
    }
    if let Some(steps) = &args.steps {
        bug.steps.clone_from(steps);
    }
    if let Some(expected) = &args.expected {
        bug.expected_result.clone_from(expected);
    }
    if let Some(actual) = &args.actual {
        bug.actual_result.clone_from(actual);
    }
    if let Some(severity) = args.severity {
        bug.severity = Severity::from(severity);
    }
    if let Some(priority) = args.priority {
        bug.priority = Priority::from(priority);
    }
    if let Some(status) = args.status {
        bug.status = BugStatus::from(status);
    }
    if args.remove_screenshot {
        bug.screenshot = None;
        bug.screenshot_name = None;
    }
    update_record(app, bug, output_mode)
}

fn execute_bug_status(app: &mut App, args: &BugStatusArgs, output_mode: OutputMode) -> Result<()> {
    let status = BugStatus::from(args.status);
    if !app.store_mut().set_bug_status(&args.key, status.clone()) {
        return Err(not_found(CollectionKind::Bugs, &args.key).into());
    }

    match output_mode {
        OutputMode::Json => {
            output::print_json(lookup::<Bug>(app, &args.key)?)?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "Bug {} is now {}",
                output::info(&args.key, &config),
                crate::output::color::colorize_status(&status, &config)
            );
        }
    }
    Ok(())
}

// ============================================================================
// Cross-collection commands
// ============================================================================

/// Execute the linked command
pub fn execute_linked(app: &App, args: &LinkedArgs, output_mode: OutputMode) -> Result<()> {
    let linked = app.store().linked_test_cases(&args.scenario);
    output::print_test_cases(&linked, output_mode)?;
    Ok(())
}

/// Execute the orphans command
pub fn execute_orphans(app: &App, _args: &OrphansArgs, output_mode: OutputMode) -> Result<()> {
    let orphans = app.store().orphaned_test_cases();
    output::print_test_cases(&orphans, output_mode)?;
    Ok(())
}

/// Execute the import command
pub async fn execute_import(app: &mut App, args: &ImportArgs, output_mode: OutputMode) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file).await?;
    let document = ImportDocument::from_json(&text, args.into.map(CollectionKind::from))?;
    let result = app.store_mut().import_bundle(document);

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "file": args.file.display().to_string(),
                "appended": result.appended(),
                "skipped": result.skipped(),
                "collections": result.summaries,
                "warnings": result.warnings
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            for summary in &result.summaries {
                println!(
                    "{:<10} {} added, {} skipped",
                    format!("{}:", summary.collection.as_str()),
                    summary.appended,
                    summary.skipped
                );
            }
            for warning in &result.warnings {
                println!("{}", output::warning(&warning.to_string(), &config));
            }
            println!(
                "{} {} records from {}",
                output::success("Imported", &config),
                result.appended(),
                args.file.display()
            );
        }
    }
    Ok(())
}

/// Execute the export command
pub async fn execute_export(app: &App, args: &ExportArgs, output_mode: OutputMode) -> Result<()> {
    let mut bundle = app.store().export();
    if args.strip_screenshots {
        bundle.strip_screenshots();
    }

    let records = match args.only {
        Some(only) => app.store().collections().len_of(only.into()),
        None => bundle.len(),
    };
    let value = match args.only {
        Some(only) => bundle.collection_value(only.into())?,
        None => serde_json::to_value(&bundle)?,
    };

    let Some(path) = &args.output else {
        output::print_json(&value)?;
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&value)?;
    tokio::fs::write(path, format!("{json}\n")).await?;
    tracing::info!(path = %path.display(), records, "Exported records");

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "exported": path.display().to_string(),
                "records": records
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "{} {records} records to {}",
                output::success("Exported", &config),
                path.display()
            );
        }
    }
    Ok(())
}

/// Execute the report command
pub async fn execute_report(
    app: &App,
    base_dir: &Path,
    args: &ReportArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let report = app.store().report(Utc::now());

    if args.stdout {
        output::print_json(&report)?;
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| base_dir.join(report.file_name()));
    let json = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&path, format!("{json}\n")).await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "report": path.display().to_string(),
                "summary": report.summary
            }))?;
        }
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            println!(
                "{} report to {}",
                output::success("Wrote", &config),
                path.display()
            );
        }
    }
    Ok(())
}

/// Execute the clear command
pub fn execute_clear(app: &mut App, args: &ClearArgs, output_mode: OutputMode) -> Result<()> {
    let kind = args.collection.map(CollectionKind::from);
    let target = kind.map_or_else(
        || "all scenarios, test cases, and bugs".to_string(),
        |k| format!("all {}", k.as_str()),
    );

    if !args.yes && !confirm(&format!("Remove {target}? This cannot be undone."))? {
        println!("Clear cancelled.");
        return Ok(());
    }

    let store = app.store_mut();
    let removed = match kind {
        Some(CollectionKind::Scenarios) => store.clear::<Scenario>(),
        Some(CollectionKind::TestCases) => store.clear::<TestCase>(),
        Some(CollectionKind::Bugs) => store.clear::<Bug>(),
        None => store.clear_all(),
    };

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "cleared": kind.map_or("all", CollectionKind::as_str),
                "removed": removed
            }))?;
        }
        OutputMode::Text => println!("Removed {removed} records"),
    }
    Ok(())
}
