//! JSON shapes for detail views.
//!
//! Lists and single records serialize as themselves; detail views wrap the
//! record together with the related records shown alongside it.

use crate::domain::{Scenario, TestCase};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioDetails<'a> {
    scenario: &'a Scenario,
    linked_test_cases: &'a [&'a TestCase],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TestCaseDetails<'a> {
    test_case: &'a TestCase,
    scenario: Option<&'a Scenario>,
    orphaned: bool,
}

pub(super) fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

pub(super) fn print_scenario_details_json<W: Write>(
    w: &mut W,
    scenario: &Scenario,
    linked: &[&TestCase],
) -> io::Result<()> {
    write_json(
        w,
        &ScenarioDetails {
            scenario,
            linked_test_cases: linked,
        },
    )
}

pub(super) fn print_test_case_details_json<W: Write>(
    w: &mut W,
    test_case: &TestCase,
    scenario: Option<&Scenario>,
) -> io::Result<()> {
    write_json(
        w,
        &TestCaseDetails {
            test_case,
            scenario,
            orphaned: scenario.is_none(),
        },
    )
}
