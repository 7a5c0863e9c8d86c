//! Field validation for the registration draft
//!
//! `validate` is a pure function: the same record and year always produce
//! the same [`FieldErrors`]. Every rule runs on every call; a record may
//! carry errors on several fields at once, but never more than one message
//! per field. The map is rebuilt from scratch on each pass.
//!
//! # Rules
//!
//! | Field | Accepted |
//! |---|---|
//! | full_name | anything non-blank |
//! | contact_number | exactly 10 digits |
//! | email | `\S+@\S+\.\S+` somewhere in the value |
//! | day | 1 or 2 digits, 1..=31 |
//! | month | `Jan` .. `Dec` |
//! | year | integer, not after the current year (no lower bound) |
//! | password | 8+ chars, one lowercase, one uppercase, one digit, no line break |
//! | confirm_password | identical to password |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use signup_common::{Field, Month, RegistrationRecord};
use std::collections::BTreeMap;

pub const FULL_NAME_REQUIRED: &str = "Full name is required";
pub const CONTACT_NUMBER_REQUIRED: &str = "Contact number is required";
pub const CONTACT_NUMBER_INVALID: &str = "Please enter a valid Canadian phone number";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const DAY_REQUIRED: &str = "Day is required";
pub const DAY_INVALID: &str = "Please enter a valid day between 1 and 31";
pub const MONTH_REQUIRED: &str = "Please select a month";
pub const MONTH_INVALID: &str = "Please select a valid month";
pub const YEAR_REQUIRED: &str = "Please enter a year";
pub const YEAR_INVALID: &str = "Please enter a valid year";
pub const YEAR_IN_FUTURE: &str = "Please enter a past year";
pub const PASSWORD_REQUIRED: &str = "Please enter a password";
pub const PASSWORD_WEAK: &str = "Password must contain at least one lowercase letter, one uppercase letter, one number, and be at least 8 characters long";
pub const CONFIRM_PASSWORD_REQUIRED: &str = "Please confirm your password";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

const MIN_PASSWORD_CHARS: usize = 8;

// ASCII classes only; `\d` in the regex crate would also accept other scripts' digits.
static CONTACT_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("contact number pattern is valid"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));
static DAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}$").expect("day pattern is valid"));

/// Per-field validation messages, in form order
///
/// An empty map means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any previous one
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Fields that have an error, in form order
    pub fn fields(&self) -> Vec<Field> {
        self.0.keys().copied().collect()
    }
}

/// Validate a record against the given current year
pub fn validate(record: &RegistrationRecord, current_year: i32) -> FieldErrors {
    let checks: [(Field, Option<&'static str>); 8] = [
        (Field::FullName, check_full_name(&record.full_name)),
        (Field::ContactNumber, check_contact_number(&record.contact_number)),
        (Field::Email, check_email(&record.email)),
        (Field::Day, check_day(&record.day)),
        (Field::Month, check_month(&record.month)),
        (Field::Year, check_year(&record.year, current_year)),
        (Field::Password, check_password(&record.password)),
        (
            Field::ConfirmPassword,
            check_confirm_password(&record.password, &record.confirm_password),
        ),
    ];

    let mut errors = FieldErrors::new();
    for (field, message) in checks {
        if let Some(message) = message {
            errors.insert(field, message);
        }
    }
    errors
}

/// Validate a record against the local calendar year
pub fn validate_now(record: &RegistrationRecord) -> FieldErrors {
    validate(record, signup_common::time::current_year())
}

fn check_full_name(value: &str) -> Option<&'static str> {
    value.trim().is_empty().then_some(FULL_NAME_REQUIRED)
}

fn check_contact_number(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(CONTACT_NUMBER_REQUIRED)
    } else if !CONTACT_NUMBER_PATTERN.is_match(value) {
        Some(CONTACT_NUMBER_INVALID)
    } else {
        None
    }
}

fn check_email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !EMAIL_PATTERN.is_match(value) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

fn check_day(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some(DAY_REQUIRED);
    }
    if !DAY_PATTERN.is_match(value) {
        return Some(DAY_INVALID);
    }
    match value.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => None,
        _ => Some(DAY_INVALID),
    }
}

fn check_month(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(MONTH_REQUIRED)
    } else if value.parse::<Month>().is_err() {
        Some(MONTH_INVALID)
    } else {
        None
    }
}

fn check_year(value: &str, current_year: i32) -> Option<&'static str> {
    if value.is_empty() {
        return Some(YEAR_REQUIRED);
    }
    match value.trim().parse::<i32>() {
        Ok(year) if year > current_year => Some(YEAR_IN_FUTURE),
        Ok(_) => None,
        Err(_) => Some(YEAR_INVALID),
    }
}

fn check_password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if !is_strong_password(value) {
        Some(PASSWORD_WEAK)
    } else {
        None
    }
}

fn check_confirm_password(password: &str, confirm: &str) -> Option<&'static str> {
    if confirm.is_empty() {
        Some(CONFIRM_PASSWORD_REQUIRED)
    } else if confirm != password {
        Some(PASSWORDS_DO_NOT_MATCH)
    } else {
        None
    }
}

/// Length is counted in characters, not bytes.
fn is_strong_password(value: &str) -> bool {
    let is_line_break = |c: char| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}');

    value.chars().count() >= MIN_PASSWORD_CHARS
        && !value.chars().any(is_line_break)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2026;

    fn valid_record() -> RegistrationRecord {
        RegistrationRecord {
            full_name: "A".to_string(),
            contact_number: "1234567890".to_string(),
            email: "a@b.com".to_string(),
            day: "15".to_string(),
            month: "Jan".to_string(),
            year: "2000".to_string(),
            password: "Abcdefg1".to_string(),
            confirm_password: "Abcdefg1".to_string(),
        }
    }

    fn with(field: Field, value: &str) -> RegistrationRecord {
        let mut record = valid_record();
        record.set(field, value);
        record
    }

    fn only_error(record: &RegistrationRecord) -> (Field, String) {
        let errors = validate(record, YEAR);
        assert_eq!(errors.len(), 1, "expected exactly one error, got {:?}", errors);
        let (field, message) = errors.iter().next().unwrap();
        (field, message.to_string())
    }

    #[test]
    fn test_valid_record_has_no_errors() {
        let errors = validate(&valid_record(), YEAR);
        assert!(errors.is_valid());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn test_empty_record_flags_every_field() {
        let errors = validate(&RegistrationRecord::default(), YEAR);

        assert_eq!(errors.fields(), Field::ALL.to_vec());
        assert_eq!(errors.get(Field::FullName), Some(FULL_NAME_REQUIRED));
        assert_eq!(errors.get(Field::ContactNumber), Some(CONTACT_NUMBER_REQUIRED));
        assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(Field::Day), Some(DAY_REQUIRED));
        assert_eq!(errors.get(Field::Month), Some(MONTH_REQUIRED));
        assert_eq!(errors.get(Field::Year), Some(YEAR_REQUIRED));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_REQUIRED));
        assert_eq!(errors.get(Field::ConfirmPassword), Some(CONFIRM_PASSWORD_REQUIRED));
    }

    #[test]
    fn test_blank_full_name_is_required() {
        assert_eq!(
            only_error(&with(Field::FullName, "   ")),
            (Field::FullName, FULL_NAME_REQUIRED.to_string())
        );
    }

    #[test]
    fn test_short_contact_number_only_flags_contact_number() {
        assert_eq!(
            only_error(&with(Field::ContactNumber, "12345")),
            (Field::ContactNumber, CONTACT_NUMBER_INVALID.to_string())
        );
    }

    #[test]
    fn test_contact_number_rejects_separators_and_padding() {
        for value in ["416-555-0100", "12345678901", " 1234567890", "123456789a"] {
            let errors = validate(&with(Field::ContactNumber, value), YEAR);
            assert_eq!(errors.get(Field::ContactNumber), Some(CONTACT_NUMBER_INVALID), "{value}");
        }
    }

    #[test]
    fn test_contact_number_rejects_non_ascii_digits() {
        // Arabic-Indic digits
        let errors = validate(&with(Field::ContactNumber, "١٢٣٤٥٦٧٨٩٠"), YEAR);
        assert_eq!(errors.get(Field::ContactNumber), Some(CONTACT_NUMBER_INVALID));
    }

    #[test]
    fn test_email_shape() {
        for value in ["a@b.co", "first.last@mail.example.org", "x y@b.com"] {
            assert!(!validate(&with(Field::Email, value), YEAR).contains(Field::Email), "{value}");
        }
        for value in ["ab.com", "a@bcom", "a@.com", "@b.com"] {
            assert_eq!(
                validate(&with(Field::Email, value), YEAR).get(Field::Email),
                Some(EMAIL_INVALID),
                "{value}"
            );
        }
        assert_eq!(
            validate(&with(Field::Email, "  "), YEAR).get(Field::Email),
            Some(EMAIL_REQUIRED)
        );
    }

    #[test]
    fn test_day_range() {
        for value in ["1", "01", "9", "31"] {
            assert!(!validate(&with(Field::Day, value), YEAR).contains(Field::Day), "{value}");
        }
        for value in ["0", "00", "32", "99", "100", "1.5", "-1", "x"] {
            assert_eq!(
                validate(&with(Field::Day, value), YEAR).get(Field::Day),
                Some(DAY_INVALID),
                "{value}"
            );
        }
    }

    #[test]
    fn test_month_must_be_a_selector_value() {
        assert_eq!(
            validate(&with(Field::Month, ""), YEAR).get(Field::Month),
            Some(MONTH_REQUIRED)
        );
        assert_eq!(
            validate(&with(Field::Month, "January"), YEAR).get(Field::Month),
            Some(MONTH_INVALID)
        );
        for month in Month::ALL {
            assert!(!validate(&with(Field::Month, month.as_str()), YEAR).contains(Field::Month));
        }
    }

    #[test]
    fn test_year_upper_bound_is_current_year() {
        let next = (YEAR + 1).to_string();
        assert_eq!(
            only_error(&with(Field::Year, &next)),
            (Field::Year, YEAR_IN_FUTURE.to_string())
        );

        let current = YEAR.to_string();
        assert!(validate(&with(Field::Year, &current), YEAR).is_valid());
    }

    #[test]
    fn test_year_has_no_lower_bound() {
        assert!(validate(&with(Field::Year, "1"), YEAR).is_valid());
        assert!(validate(&with(Field::Year, "1850"), YEAR).is_valid());
    }

    #[test]
    fn test_year_must_be_numeric() {
        assert_eq!(
            validate(&with(Field::Year, "last year"), YEAR).get(Field::Year),
            Some(YEAR_INVALID)
        );
    }

    #[test]
    fn test_weak_password_without_mismatch_error() {
        let mut record = valid_record();
        record.password = "abcdefgh".to_string();
        record.confirm_password = "abcdefgh".to_string();

        let errors = validate(&record, YEAR);
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_WEAK));
        assert!(!errors.contains(Field::ConfirmPassword));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_password_composition() {
        assert!(is_strong_password("Abcdefg1"));
        assert!(is_strong_password("ÄbcdefG1"));
        assert!(!is_strong_password("Abcdef1"));
        assert!(!is_strong_password("ABCDEFG1"));
        assert!(!is_strong_password("abcdefg1"));
        assert!(!is_strong_password("Abcdefgh"));
        assert!(!is_strong_password("Abcd\nefg1"));
    }

    #[test]
    fn test_confirm_password_mismatch() {
        assert_eq!(
            only_error(&with(Field::ConfirmPassword, "Abcdefg2")),
            (Field::ConfirmPassword, PASSWORDS_DO_NOT_MATCH.to_string())
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let record = with(Field::Email, "broken");
        assert_eq!(validate(&record, YEAR), validate(&record, YEAR));

        let empty = RegistrationRecord::default();
        assert_eq!(validate(&empty, YEAR), validate(&empty, YEAR));
    }

    #[test]
    fn test_validate_now_accepts_current_year() {
        let mut record = valid_record();
        record.year = signup_common::time::current_year().to_string();
        assert!(validate_now(&record).is_valid());
    }

    #[test]
    fn test_field_errors_serialize_as_wire_keyed_map() {
        let errors = validate(&with(Field::ContactNumber, "12345"), YEAR);
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, serde_json::json!({ "contact_number": CONTACT_NUMBER_INVALID }));
    }
}
