//! Required-field checks shared by every service.
//!
//! Inputs arrive with every field optional so that a missing field and an
//! empty one are reported the same way, as a validation error naming it.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Require a non-blank string, returning it trimmed.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Require that an optional value is present.
pub fn require<T>(field: &str, value: Option<T>) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

/// Trim an optional free-text field, mapping blank text to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Require a syntactically valid e-mail address.
pub fn require_email(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    let email = require_text(field, value)?;
    if email.validate_email() {
        Ok(email)
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a valid e-mail address"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_and_blank_are_both_rejected() {
        assert_matches!(require_text("name", None), Err(CoreError::Validation(m)) if m == "name is required");
        assert_matches!(require_text("name", Some("   ")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn present_text_is_trimmed() {
        assert_eq!(require_text("name", Some("  Apollo ")).unwrap(), "Apollo");
    }

    #[test]
    fn optional_blank_text_becomes_none() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(" notes ")).as_deref(), Some("notes"));
    }

    #[test]
    fn require_reports_the_field() {
        assert_eq!(require("milestone_id", Some(4)).unwrap(), 4);
        assert_matches!(
            require::<i64>("milestone_id", None),
            Err(CoreError::Validation(m)) if m.contains("milestone_id")
        );
    }

    #[test]
    fn email_must_be_well_formed() {
        assert!(require_email("recipient_email", Some("ops@example.com")).is_ok());
        assert_matches!(
            require_email("recipient_email", Some("not-an-email")),
            Err(CoreError::Validation(m)) if m.contains("valid e-mail")
        );
    }
}
