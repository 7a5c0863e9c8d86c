//! Registration wire types
//!
//! Types exchanged with the create-user endpoint and shared by the
//! validator, the submission session and the rendering surface.
//!
//! # Wire format
//!
//! The request body is the draft record with its field names verbatim:
//!
//! ```json
//! {
//!   "full_name": "Ada Lovelace",
//!   "contact_number": "4165550100",
//!   "email": "ada@example.com",
//!   "day": "10",
//!   "month": "Dec",
//!   "year": "1990",
//!   "password": "Abcdefg1",
//!   "confirm_password": "Abcdefg1"
//! }
//! ```
//!
//! The response is a JSON object whose `title` is the outcome discriminator
//! (`"Success"` or `"Error"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ========================================
// Field keys
// ========================================

/// One attribute of the registration record
///
/// Variants are declared in form order, so ordered collections keyed by
/// `Field` iterate the way the form is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    ContactNumber,
    Email,
    Day,
    Month,
    Year,
    Password,
    ConfirmPassword,
}

impl Field {
    /// Every field in form order
    pub const ALL: [Field; 8] = [
        Field::FullName,
        Field::ContactNumber,
        Field::Email,
        Field::Day,
        Field::Month,
        Field::Year,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::ContactNumber => "contact_number",
            Field::Email => "email",
            Field::Day => "day",
            Field::Month => "month",
            Field::Year => "year",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm_password",
        }
    }

    /// Human-readable label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::ContactNumber => "Contact Number",
            Field::Email => "Email",
            Field::Day => "Day",
            Field::Month => "Month",
            Field::Year => "Year",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
        }
    }

    /// Whether the value must be masked when displayed
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown field: {}", s)))
    }
}

// ========================================
// Month selection
// ========================================

/// Birth month as offered by the month selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Accepts exactly the selector values (`"Jan"` .. `"Dec"`), case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .iter()
            .copied()
            .find(|month| month.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown month: {}", s)))
    }
}

// ========================================
// Draft registration record
// ========================================

/// In-progress registration values, exactly as entered
///
/// All fields are kept as raw strings; interpretation (numbers, months,
/// password rules) belongs to the validator. `Default` is the empty draft a
/// session starts with and returns to on cancel.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegistrationRecord {
    /// Read a field by key
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::ContactNumber => &self.contact_number,
            Field::Email => &self.email,
            Field::Day => &self.day,
            Field::Month => &self.month,
            Field::Year => &self.year,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    /// Overwrite a field by key
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FullName => self.full_name = value,
            Field::ContactNumber => self.contact_number = value,
            Field::Email => self.email = value,
            Field::Day => self.day = value,
            Field::Month => self.month = value,
            Field::Year => self.year = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }

    /// True when every field is an empty string
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

// Passwords must never reach a log line, so Debug is written by hand.
impl fmt::Debug for RegistrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("RegistrationRecord")
            .field("full_name", &self.full_name)
            .field("contact_number", &self.contact_number)
            .field("email", &self.email)
            .field("day", &self.day)
            .field("month", &self.month)
            .field("year", &self.year)
            .field("password", &redact(&self.password))
            .field("confirm_password", &redact(&self.confirm_password))
            .finish()
    }
}

// ========================================
// Submission outcome
// ========================================

/// Outcome of the most recent submit attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// No submit attempt has reached the server yet
    #[default]
    None,
    Success,
    Error,
}

/// Response body of `POST /api/users/create`
///
/// Only `title` is interpreted. Anything else the server sends is kept for
/// diagnostics but never shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Outcome discriminator ("Success" or "Error")
    #[serde(default)]
    pub title: Option<String>,

    /// Free-form server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CreateUserResponse {
    pub const SUCCESS_TITLE: &'static str = "Success";

    /// Map the discriminator to a submission status
    ///
    /// Only an exact `"Success"` counts as success; a missing or unexpected
    /// title is reported as an error.
    pub fn status(&self) -> SubmissionStatus {
        match self.title.as_deref() {
            Some(Self::SUCCESS_TITLE) => SubmissionStatus::Success,
            _ => SubmissionStatus::Error,
        }
    }
}
