//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)
//! - `json`: JSON shapes for detail views

pub mod color;
mod json;

use crate::domain::{Bug, Scenario, TestCase};
use crate::report::Summary;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{
    bold, colored_status_icon, colorize_key, colorize_module, colorize_priority,
    colorize_severity, colorize_status, dimmed, execution_marker,
};
use json::{print_scenario_details_json, print_test_case_details_json, write_json};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `TESTHUB_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `TESTHUB_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TESTHUB_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build a configuration from a variable lookup.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match var("TESTHUB_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "TESTHUB_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match var("TESTHUB_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "TESTHUB_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR (https://no-color.org/), then TESTHUB_COLOR
        let use_colors = var("NO_COLOR").is_none()
            && var("TESTHUB_COLOR").is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    fn content_width(&self) -> usize {
        get_terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Terminal Width Detection
// ============================================================================

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size().map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| {
        usize::from(w.0)
    })
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.trim().is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Print an optional text section (only if Some and non-empty).
fn print_optional_section<W: Write>(
    w: &mut W,
    title: &str,
    content: Option<&str>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if let Some(text) = content {
        print_text_section(w, title, text, width, config)?;
    }
    Ok(())
}

/// First line of a multi-line field, for one-line listings.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a list of scenarios in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_scenarios(scenarios: &[&Scenario], mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_scenarios_text(&mut handle, scenarios, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, scenarios),
    }
}

/// Print a scenario with its linked test cases (for show command)
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_scenario_details(
    scenario: &Scenario,
    linked: &[&TestCase],
    mode: OutputMode,
) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_scenario_details_text(
            &mut handle,
            scenario,
            linked,
            &OutputConfig::from_env(),
        ),
        OutputMode::Json => print_scenario_details_json(&mut handle, scenario, linked),
    }
}

/// Print a list of test cases in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_test_cases(test_cases: &[&TestCase], mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => {
            print_test_cases_text(&mut handle, test_cases, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(&mut handle, test_cases),
    }
}

/// Print a test case with its scenario (for show command)
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_test_case_details(
    test_case: &TestCase,
    scenario: Option<&Scenario>,
    mode: OutputMode,
) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_test_case_details_text(
            &mut handle,
            test_case,
            scenario,
            &OutputConfig::from_env(),
        ),
        OutputMode::Json => print_test_case_details_json(&mut handle, test_case, scenario),
    }
}

/// Print a list of bugs in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_bugs(bugs: &[&Bug], mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_bugs_text(&mut handle, bugs, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, bugs),
    }
}

/// Print a bug with full details (for show command)
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_bug_details(bug: &Bug, mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_bug_details_text(&mut handle, bug, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, bug),
    }
}

/// Print dashboard counts
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_summary(summary: &Summary, mode: OutputMode) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => print_summary_text(&mut handle, summary, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

/// Print a simple message
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_message(msg: &str) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    write_json(&mut handle, value)
}

// ============================================================================
// Text Formatting
// ============================================================================

fn scenario_line(scenario: &Scenario, config: &OutputConfig) -> String {
    let mut line = format!(
        "{}  {}",
        colorize_key(&scenario.scenario_id, config),
        scenario.title
    );
    if !scenario.module.is_empty() {
        line.push_str(&format!("  [{}]", colorize_module(&scenario.module, config)));
    }
    line
}

fn test_case_line(test_case: &TestCase, config: &OutputConfig) -> String {
    let arrow = if config.use_ascii { "->" } else { "→" };
    format!(
        "{} {}  {} {}  {}",
        execution_marker(test_case.is_executed(), config),
        colorize_key(&test_case.test_case_id, config),
        dimmed(arrow, config),
        test_case.scenario_id,
        first_line(&test_case.steps)
    )
}

fn bug_line(bug: &Bug, config: &OutputConfig) -> String {
    let mut line = format!(
        "{} {}  {}  {}  {}",
        colored_status_icon(&bug.status, config),
        colorize_key(&bug.bug_id, config),
        colorize_severity(&bug.severity, config),
        colorize_priority(&bug.priority, config),
        bug.summary
    );
    if !bug.module.is_empty() {
        line.push_str(&format!("  [{}]", colorize_module(&bug.module, config)));
    }
    line
}

fn print_scenarios_text<W: Write>(
    w: &mut W,
    scenarios: &[&Scenario],
    config: &OutputConfig,
) -> io::Result<()> {
    if scenarios.is_empty() {
        writeln!(w, "No scenarios found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} scenario(s):", scenarios.len())?;
    writeln!(w)?;
    for scenario in scenarios {
        writeln!(w, "{}", scenario_line(scenario, config))?;
    }
    Ok(())
}

fn print_test_cases_text<W: Write>(
    w: &mut W,
    test_cases: &[&TestCase],
    config: &OutputConfig,
) -> io::Result<()> {
    if test_cases.is_empty() {
        writeln!(w, "No test cases found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} test case(s):", test_cases.len())?;
    writeln!(w)?;
    for test_case in test_cases {
        writeln!(w, "{}", test_case_line(test_case, config))?;
    }
    Ok(())
}

fn print_bugs_text<W: Write>(w: &mut W, bugs: &[&Bug], config: &OutputConfig) -> io::Result<()> {
    if bugs.is_empty() {
        writeln!(w, "No bugs found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} bug(s):", bugs.len())?;
    writeln!(w)?;
    for bug in bugs {
        writeln!(w, "{}", bug_line(bug, config))?;
    }
    Ok(())
}

fn print_scenario_details_text<W: Write>(
    w: &mut W,
    scenario: &Scenario,
    linked: &[&TestCase],
    config: &OutputConfig,
) -> io::Result<()> {
    let width = config.content_width();

    writeln!(
        w,
        "{}: {}",
        colorize_key(&scenario.scenario_id, config),
        scenario.title
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Module:", config),
        colorize_module(&scenario.module, config)
    )?;
    print_optional_section(
        w,
        "Description",
        scenario.description.as_deref(),
        width,
        config,
    )?;

    writeln!(w)?;
    if linked.is_empty() {
        writeln!(w, "{}", dimmed("No linked test cases.", config))?;
    } else {
        writeln!(w, "{} ({}):", bold("Test Cases", config), linked.len())?;
        for test_case in linked {
            writeln!(w, "  {}", test_case_line(test_case, config))?;
        }
    }
    Ok(())
}

fn print_test_case_details_text<W: Write>(
    w: &mut W,
    test_case: &TestCase,
    scenario: Option<&Scenario>,
    config: &OutputConfig,
) -> io::Result<()> {
    let width = config.content_width();

    writeln!(
        w,
        "{} {}",
        execution_marker(test_case.is_executed(), config),
        colorize_key(&test_case.test_case_id, config)
    )?;
    let scenario_display = match scenario {
        Some(s) => format!("{} ({})", colorize_key(&s.scenario_id, config), s.title),
        None => format!(
            "{} {}",
            test_case.scenario_id,
            color::warning("(orphaned: scenario does not exist)", config)
        ),
    };
    writeln!(w, "{} {}", dimmed("Scenario:", config), scenario_display)?;

    print_text_section(w, "Steps", &test_case.steps, width, config)?;
    print_optional_section(w, "Test Data", test_case.test_data.as_deref(), width, config)?;
    print_text_section(w, "Expected Result", &test_case.expected_result, width, config)?;
    match test_case.actual_result.as_deref() {
        Some(actual) => print_text_section(w, "Actual Result", actual, width, config)?,
        None => {
            writeln!(w)?;
            writeln!(w, "{}", dimmed("Not executed yet.", config))?;
        }
    }
    Ok(())
}

fn print_bug_details_text<W: Write>(w: &mut W, bug: &Bug, config: &OutputConfig) -> io::Result<()> {
    let width = config.content_width();

    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(&bug.status, config),
        colorize_key(&bug.bug_id, config),
        bug.summary
    )?;
    writeln!(
        w,
        "{}  {}    {}  {}    {}  {}",
        dimmed("Status:", config),
        colorize_status(&bug.status, config),
        dimmed("Severity:", config),
        colorize_severity(&bug.severity, config),
        dimmed("Priority:", config),
        colorize_priority(&bug.priority, config)
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Module:", config),
        colorize_module(&bug.module, config)
    )?;
    if let Some(label) = bug.screenshot_label() {
        writeln!(w, "{} {}", dimmed("Screenshot:", config), label)?;
    }

    print_text_section(w, "Steps to Reproduce", &bug.steps, width, config)?;
    print_text_section(w, "Expected Result", &bug.expected_result, width, config)?;
    print_text_section(w, "Actual Result", &bug.actual_result, width, config)?;
    Ok(())
}

fn print_summary_text<W: Write>(
    w: &mut W,
    summary: &Summary,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        dimmed("Scenarios: ", config),
        summary.total_scenarios
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Test cases:", config),
        summary.total_test_cases
    )?;
    writeln!(
        w,
        "{} {} ({} open, {} closed, {} critical)",
        dimmed("Bugs:      ", config),
        summary.total_bugs,
        summary.open_bugs,
        summary.closed_bugs,
        color::error(&summary.critical_bugs.to_string(), config)
    )?;
    Ok(())
}
