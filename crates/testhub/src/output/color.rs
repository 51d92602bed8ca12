//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:   green   (fixed and closed bugs, completed actions)
//!   - Warning/Active: yellow  (in-progress bugs, high severity, P2)
//!   - Error/Urgent:   red     (open bugs, critical severity, P1)
//!   - Info/Reference: cyan    (record IDs)
//!   - Accent:         magenta (modules)
//!   - Muted:          dimmed  (field labels, low severity, unknown values)
//!   - Emphasis:       bold    (section headers)

use crate::domain::{BugStatus, Priority, Severity};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
#[must_use]
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
#[must_use]
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
#[must_use]
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
#[must_use]
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply color to a bug status.
pub(crate) fn colorize_status(status: &BugStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        BugStatus::Open => text.red().to_string(),
        BugStatus::InProgress => text.yellow().to_string(),
        BugStatus::Fixed | BugStatus::Closed => text.green().to_string(),
        BugStatus::Other(_) => text.dimmed().to_string(),
    }
}

/// Apply color to a severity.
pub(crate) fn colorize_severity(severity: &Severity, config: &OutputConfig) -> String {
    let text = severity.to_string();
    if !config.use_colors {
        return text;
    }
    match severity {
        Severity::Critical => text.red().bold().to_string(),
        Severity::High => text.yellow().to_string(),
        Severity::Medium => text,
        Severity::Low | Severity::Other(_) => text.dimmed().to_string(),
    }
}

/// Apply color to a priority.
pub(crate) fn colorize_priority(priority: &Priority, config: &OutputConfig) -> String {
    let text = priority.to_string();
    if !config.use_colors {
        return text;
    }
    match priority {
        Priority::P1 => text.red().bold().to_string(),
        Priority::P2 => text.yellow().to_string(),
        Priority::P3 | Priority::P4 => text,
        Priority::Other(_) => text.dimmed().to_string(),
    }
}

/// Colorize a record ID (cyan).
pub(crate) fn colorize_key(key: &str, config: &OutputConfig) -> String {
    info(key, config)
}

/// Colorize a module label (magenta).
pub(crate) fn colorize_module(module: &str, config: &OutputConfig) -> String {
    if module.is_empty() || !config.use_colors {
        return module.to_string();
    }
    module.magenta().to_string()
}

/// Get a colored bug status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: &BugStatus, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match status {
            BugStatus::Open => "o",
            BugStatus::InProgress => ">",
            BugStatus::Fixed => "+",
            BugStatus::Closed => "x",
            BugStatus::Other(_) => "?",
        }
    } else {
        match status {
            BugStatus::Open => "○",
            BugStatus::InProgress => "▶",
            BugStatus::Fixed => "✓",
            BugStatus::Closed => "✔",
            BugStatus::Other(_) => "?",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        BugStatus::Open => icon.red().to_string(),
        BugStatus::InProgress => icon.yellow().to_string(),
        BugStatus::Fixed | BugStatus::Closed => icon.green().to_string(),
        BugStatus::Other(_) => icon.dimmed().to_string(),
    }
}

/// Marker for whether a test case has been executed.
pub(crate) fn execution_marker(executed: bool, config: &OutputConfig) -> String {
    let icon = match (executed, config.use_ascii) {
        (true, true) => "+",
        (true, false) => "✓",
        (false, true) => "-",
        (false, false) => "·",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    if executed {
        icon.green().to_string()
    } else {
        icon.dimmed().to_string()
    }
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
