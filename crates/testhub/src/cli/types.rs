//! CLI value enums and domain type conversions.
//!
//! This module contains the value enums used for CLI argument parsing
//! and their conversions to domain types. The CLI only offers the known
//! values; records imported from files may still carry others.

use clap::ValueEnum;

use crate::domain::{BugStatus, CollectionKind, Direction, Priority, Severity};

// ============================================================================
// Value Enums
// ============================================================================

/// Bug severity for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityArg {
    /// Cosmetic or minor
    Low,
    /// Noticeable, has a workaround
    #[default]
    Medium,
    /// Major functionality affected
    High,
    /// Blocks use of the product
    Critical,
}

impl std::fmt::Display for SeverityArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Bug priority for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityArg {
    /// Fix immediately
    #[value(name = "p1", alias = "P1")]
    P1,
    /// Fix soon
    #[default]
    #[value(name = "p2", alias = "P2")]
    P2,
    /// Normal
    #[value(name = "p3", alias = "P3")]
    P3,
    /// Whenever convenient
    #[value(name = "p4", alias = "P4")]
    P4,
}

impl std::fmt::Display for PriorityArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P1 => write!(f, "p1"),
            Self::P2 => write!(f, "p2"),
            Self::P3 => write!(f, "p3"),
            Self::P4 => write!(f, "p4"),
        }
    }
}

/// Bug status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BugStatusArg {
    /// Reported, not yet picked up
    #[default]
    Open,
    /// Being worked on
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Fix delivered, awaiting verification
    Fixed,
    /// Verified or dismissed
    Closed,
}

impl std::fmt::Display for BugStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Fixed => write!(f, "fixed"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Reorder direction for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Towards the top of the list
    Up,
    /// Towards the bottom of the list
    Down,
}

impl std::fmt::Display for DirectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Collection name for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionArg {
    /// Test scenarios
    #[value(alias = "scenario")]
    Scenarios,
    /// Test cases
    #[value(name = "test-cases", alias = "testcases", alias = "test-case")]
    TestCases,
    /// Bugs
    #[value(alias = "bug")]
    Bugs,
}

impl std::fmt::Display for CollectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scenarios => write!(f, "scenarios"),
            Self::TestCases => write!(f, "test-cases"),
            Self::Bugs => write!(f, "bugs"),
        }
    }
}

// ============================================================================
// Domain Type Conversions
// ============================================================================

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::P1 => Priority::P1,
            PriorityArg::P2 => Priority::P2,
            PriorityArg::P3 => Priority::P3,
            PriorityArg::P4 => Priority::P4,
        }
    }
}

impl From<BugStatusArg> for BugStatus {
    fn from(arg: BugStatusArg) -> Self {
        match arg {
            BugStatusArg::Open => BugStatus::Open,
            BugStatusArg::InProgress => BugStatus::InProgress,
            BugStatusArg::Fixed => BugStatus::Fixed,
            BugStatusArg::Closed => BugStatus::Closed,
        }
    }
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

impl From<CollectionArg> for CollectionKind {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Scenarios => CollectionKind::Scenarios,
            CollectionArg::TestCases => CollectionKind::TestCases,
            CollectionArg::Bugs => CollectionKind::Bugs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bug_field_conversions() {
        assert_eq!(Severity::from(SeverityArg::Critical), Severity::Critical);
        assert_eq!(Priority::from(PriorityArg::P4), Priority::P4);
        assert_eq!(BugStatus::from(BugStatusArg::InProgress), BugStatus::InProgress);
    }

    #[test]
    fn test_defaults_match_domain_defaults() {
        assert_eq!(Severity::from(SeverityArg::default()), Severity::default());
        assert_eq!(Priority::from(PriorityArg::default()), Priority::default());
        assert_eq!(BugStatus::from(BugStatusArg::default()), BugStatus::default());
    }

    #[test]
    fn test_collection_conversion() {
        assert_eq!(
            CollectionKind::from(CollectionArg::TestCases),
            CollectionKind::TestCases
        );
        assert_eq!(Direction::from(DirectionArg::Down), Direction::Down);
    }

    #[test]
    fn test_display_implementations() {
        assert_eq!(format!("{}", BugStatusArg::InProgress), "in_progress");
        assert_eq!(format!("{}", PriorityArg::P1), "p1");
        assert_eq!(format!("{}", CollectionArg::TestCases), "test-cases");
    }
}
