//! Classification fields carried by bugs.
//!
//! Each enum serializes as its display text (`"In Progress"`, `"P1"`).
//! Only the exact display text decodes to a known variant. Anything else,
//! including other spellings such as `"critical"` or `" Open"`, is kept
//! verbatim in `Other` so stored data is written back byte for byte.
//!
//! Two values are equal when their display text is equal, so
//! `Other("Critical")` and `Critical` compare and hash the same.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Equality and hashing by display text.
macro_rules! text_identity {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.as_str() == other.as_str()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.as_str().hash(state);
            }
        }
    };
}

/// How badly a bug affects the product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Cosmetic or minor
    Low,
    /// Noticeable, has a workaround
    #[default]
    Medium,
    /// Major functionality affected
    High,
    /// Blocks use of the product
    Critical,
    /// A value outside the known set, kept as written
    Other(String),
}

impl Severity {
    /// All known severities, least severe first.
    pub const KNOWN: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Display text of the severity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            "Critical" => Self::Critical,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

text_identity!(Severity);

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority of a bug, `P1` being the most urgent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Fix immediately
    P1,
    /// Fix soon
    #[default]
    P2,
    /// Normal
    P3,
    /// Whenever convenient
    P4,
    /// A value outside the known set, kept as written
    Other(String),
}

impl Priority {
    /// All known priorities, most urgent first.
    pub const KNOWN: [Priority; 4] = [Priority::P1, Priority::P2, Priority::P3, Priority::P4];

    /// Display text of the priority.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "P1" => Self::P1,
            "P2" => Self::P2,
            "P3" => Self::P3,
            "P4" => Self::P4,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

text_identity!(Priority);

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of a bug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BugStatus {
    /// Reported, not yet picked up
    #[default]
    Open,
    /// Being worked on
    InProgress,
    /// Fix delivered, awaiting verification
    Fixed,
    /// Verified or dismissed
    Closed,
    /// A value outside the known set, kept as written
    Other(String),
}

impl BugStatus {
    /// All known statuses in workflow order.
    pub const KNOWN: [BugStatus; 4] = [
        BugStatus::Open,
        BugStatus::InProgress,
        BugStatus::Fixed,
        BugStatus::Closed,
    ];

    /// Display text of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Fixed => "Fixed",
            Self::Closed => "Closed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BugStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Open" => Self::Open,
            "In Progress" => Self::InProgress,
            "Fixed" => Self::Fixed,
            "Closed" => Self::Closed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for BugStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<BugStatus> for String {
    fn from(s: BugStatus) -> Self {
        match s {
            BugStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

text_identity!(BugStatus);

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::open("Open", BugStatus::Open)]
    #[case::in_progress("In Progress", BugStatus::InProgress)]
    #[case::fixed("Fixed", BugStatus::Fixed)]
    #[case::closed("Closed", BugStatus::Closed)]
    fn status_decodes_display_text(#[case] input: &str, #[case] expected: BugStatus) {
        let status = BugStatus::from(input);
        assert!(!matches!(status, BugStatus::Other(_)));
        assert_eq!(status, expected);
    }

    #[rstest]
    #[case::lower_severity("critical")]
    #[case::padded_severity(" High")]
    #[case::upper_severity("LOW")]
    fn other_spellings_of_severity_stay_verbatim(#[case] input: &str) {
        let severity = Severity::from(input);
        assert!(matches!(&severity, Severity::Other(s) if s == input));
        assert_eq!(serde_json::to_string(&severity).unwrap(), format!("\"{input}\""));
    }

    #[rstest]
    #[case::lower("in progress")]
    #[case::snake("in_progress")]
    #[case::padded(" Open")]
    fn other_spellings_of_status_stay_verbatim(#[case] input: &str) {
        let status: BugStatus = serde_json::from_value(serde_json::json!(input)).unwrap();
        assert_eq!(status.as_str(), input);
        assert_ne!(status, BugStatus::Open);
        assert_eq!(serde_json::to_value(&status).unwrap(), input);
    }

    #[test]
    fn other_with_display_text_equals_known_variant() {
        assert_eq!(Severity::Other("Critical".to_string()), Severity::Critical);
        assert_eq!(Priority::Other("P1".to_string()), Priority::P1);
        assert_ne!(Severity::Other("critical".to_string()), Severity::Critical);
        assert_ne!(Priority::Other("p1".to_string()), Priority::P1);

        let mut seen = std::collections::HashSet::new();
        seen.insert(BugStatus::Other("Closed".to_string()));
        assert!(seen.contains(&BugStatus::Closed));
    }

    #[test]
    fn unknown_values_are_preserved_verbatim() {
        assert_eq!(
            Severity::from("Blocker"),
            Severity::Other("Blocker".to_string())
        );
        assert_eq!(String::from(Severity::from("Blocker")), "Blocker");
        assert_eq!(String::from(Priority::from("P0")), "P0");
        assert_eq!(String::from(BugStatus::from("Won't Fix")), "Won't Fix");
    }

    #[test]
    fn serializes_as_display_text() {
        let json = serde_json::to_string(&BugStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let parsed: Priority = serde_json::from_str("\"P2\"").unwrap();
        assert!(matches!(parsed, Priority::P2));
    }

    #[test]
    fn defaults_match_new_bug_form() {
        assert_eq!(Severity::default(), Severity::Medium);
        assert_eq!(Priority::default(), Priority::P2);
        assert_eq!(BugStatus::default(), BugStatus::Open);
    }

    #[test]
    fn known_lists_are_ordered() {
        let names: Vec<&str> = Severity::KNOWN.iter().map(Severity::as_str).collect();
        assert_eq!(names, ["Low", "Medium", "High", "Critical"]);
    }
}
