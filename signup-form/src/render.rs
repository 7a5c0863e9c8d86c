//! Plain-text rendering of the registration form
//!
//! Produces what a terminal user sees: every input with its current value,
//! the error under each failing field, and the outcome banner of the last
//! submit. Password values are masked.

use signup_common::{Field, RegistrationRecord, SubmissionStatus};

use crate::session::{ControllerPhase, FormSnapshot};
use crate::validator::FieldErrors;

pub const FORM_TITLE: &str = "Create User Account";
pub const SUCCESS_BANNER: &str = "User account successfully created.";
pub const ERROR_BANNER: &str = "There was an error creating the account";
const SUBMITTING_NOTICE: &str = "Submitting...";

/// Banner text for a submission status, if any
pub fn banner(status: SubmissionStatus) -> Option<&'static str> {
    match status {
        SubmissionStatus::None => None,
        SubmissionStatus::Success => Some(SUCCESS_BANNER),
        SubmissionStatus::Error => Some(ERROR_BANNER),
    }
}

/// Render a full form snapshot
pub fn render_snapshot(snapshot: &FormSnapshot) -> String {
    let mut out = render_form(&snapshot.record, &snapshot.errors, snapshot.status);
    if snapshot.phase == ControllerPhase::Submitting {
        out.push_str(SUBMITTING_NOTICE);
        out.push('\n');
    }
    out
}

/// Render the form for a record, its errors and the last status
pub fn render_form(
    record: &RegistrationRecord,
    errors: &FieldErrors,
    status: SubmissionStatus,
) -> String {
    let mut out = String::new();
    out.push_str(FORM_TITLE);
    out.push_str("\n\n");

    for field in [Field::FullName, Field::ContactNumber, Field::Email] {
        write_field(&mut out, record, errors, field);
    }

    out.push_str(&format!(
        "Birthday: {} / {} / {}\n",
        or_placeholder(&record.day, "Select Day"),
        or_placeholder(&record.month, "Select Month"),
        or_placeholder(&record.year, "Select Year"),
    ));
    for field in [Field::Day, Field::Month, Field::Year] {
        write_error(&mut out, errors, field);
    }

    for field in [Field::Password, Field::ConfirmPassword] {
        write_field(&mut out, record, errors, field);
    }

    out.push('\n');
    out.push_str("[Cancel] [Submit]\n");

    if let Some(text) = banner(status) {
        out.push_str(&format!("{}\n", text));
    }
    out
}

fn write_field(out: &mut String, record: &RegistrationRecord, errors: &FieldErrors, field: Field) {
    let value = record.get(field);
    let shown = if field.is_secret() {
        mask(value)
    } else {
        value.to_string()
    };
    out.push_str(&format!("{}: {}\n", field.label(), shown));
    write_error(out, errors, field);
}

fn write_error(out: &mut String, errors: &FieldErrors, field: Field) {
    if let Some(message) = errors.get(field) {
        out.push_str(&format!("  ! {}\n", message));
    }
}

fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{validate, CONTACT_NUMBER_INVALID, DAY_REQUIRED};

    fn record() -> RegistrationRecord {
        RegistrationRecord {
            full_name: "Ada Lovelace".to_string(),
            contact_number: "12345".to_string(),
            email: "ada@example.com".to_string(),
            day: String::new(),
            month: "Dec".to_string(),
            year: "1990".to_string(),
            password: "Abcdefg1".to_string(),
            confirm_password: "Abcdefg1".to_string(),
        }
    }

    #[test]
    fn test_render_shows_errors_under_fields() {
        let record = record();
        let errors = validate(&record, 2026);
        let text = render_form(&record, &errors, SubmissionStatus::None);

        assert!(text.starts_with(FORM_TITLE));
        assert!(text.contains("Full Name: Ada Lovelace\n"));
        assert!(text.contains(&format!("Contact Number: 12345\n  ! {}\n", CONTACT_NUMBER_INVALID)));
        assert!(text.contains("Birthday: Select Day / Dec / 1990\n"));
        assert!(text.contains(&format!("  ! {}\n", DAY_REQUIRED)));
    }

    #[test]
    fn test_render_masks_passwords() {
        let record = record();
        let text = render_form(&record, &FieldErrors::new(), SubmissionStatus::None);

        assert!(!text.contains("Abcdefg1"));
        assert!(text.contains("Password: ********\n"));
        assert!(text.contains("Confirm Password: ********\n"));
    }

    #[test]
    fn test_banner_per_status() {
        let record = RegistrationRecord::default();
        let errors = FieldErrors::new();

        let none = render_form(&record, &errors, SubmissionStatus::None);
        assert!(!none.contains(SUCCESS_BANNER));
        assert!(!none.contains(ERROR_BANNER));

        let success = render_form(&record, &errors, SubmissionStatus::Success);
        assert!(success.trim_end().ends_with(SUCCESS_BANNER));

        let error = render_form(&record, &errors, SubmissionStatus::Error);
        assert!(error.trim_end().ends_with(ERROR_BANNER));
    }

    #[test]
    fn test_snapshot_shows_submitting_notice() {
        let snapshot = FormSnapshot {
            record: RegistrationRecord::default(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::None,
            phase: ControllerPhase::Submitting,
        };
        assert!(render_snapshot(&snapshot).ends_with("Submitting...\n"));
    }
}
