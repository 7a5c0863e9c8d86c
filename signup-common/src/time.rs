//! Calendar helpers

use chrono::{Datelike, Local};

/// Current calendar year in the local time zone
///
/// Year checks compare against the user's wall clock, so a birth year entered
/// just after local midnight on January 1st is accepted even while UTC is
/// still in the previous year.
pub fn current_year() -> i32 {
    Local::now().year()
}
