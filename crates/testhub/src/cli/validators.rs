//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Maximum length of a record key
pub const MAX_KEY_LENGTH: usize = 64;

/// Validate the slot namespace.
///
/// Delegates to the domain validator in `commands::init` to maintain
/// a single source of truth for validation rules.
pub fn validate_namespace(s: &str) -> Result<String, String> {
    use crate::commands::init;

    let trimmed = s.trim();
    init::validate_namespace(trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Validate a record key (scenario, test case, or bug ID).
///
/// Keys are caller-assigned and otherwise free-form: any non-empty text
/// without control characters, at most 64 characters. Surrounding
/// whitespace is trimmed.
pub fn validate_key(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("ID cannot be empty".to_string());
    }

    if s.chars().count() > MAX_KEY_LENGTH {
        return Err(format!("ID cannot exceed {MAX_KEY_LENGTH} characters"));
    }

    if s.chars().any(char::is_control) {
        return Err("ID cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate a required text field such as a title or summary.
pub fn validate_required_text(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::simple("TS-1")]
    #[case::numeric("101")]
    #[case::spaces_inside("Login flow 2")]
    #[case::unicode("BUG-ä")]
    fn test_validate_key_accepts(#[case] key: &str) {
        assert_eq!(validate_key(key).unwrap(), key);
    }

    #[test]
    fn test_validate_key_trims() {
        assert_eq!(validate_key("  TC-7 ").unwrap(), "TC-7");
    }

    #[rstest]
    #[case::empty("", "cannot be empty")]
    #[case::whitespace("   ", "cannot be empty")]
    #[case::control("TC\u{7}1", "control characters")]
    fn test_validate_key_rejects(#[case] key: &str, #[case] expected: &str) {
        let err = validate_key(key).unwrap_err();
        assert!(err.contains(expected), "{err}");
    }

    #[test]
    fn test_validate_key_too_long() {
        let key = "K".repeat(MAX_KEY_LENGTH + 1);
        assert!(validate_key(&key).unwrap_err().contains("exceed"));
    }

    #[test]
    fn test_validate_namespace() {
        assert_eq!(validate_namespace(" qa ").unwrap(), "qa");
        assert!(validate_namespace(".hidden").is_err());
        assert!(validate_namespace("a/b").is_err());
    }

    #[test]
    fn test_validate_required_text() {
        assert_eq!(validate_required_text(" Login ").unwrap(), "Login");
        assert!(validate_required_text("  ").is_err());
    }
}
