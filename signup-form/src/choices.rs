//! Option lists offered by the birthday selectors

use signup_common::Month;

/// Number of years offered by the year selector
pub const YEAR_CHOICES: i32 = 100;

/// Days offered by the day selector (1 through 31)
pub fn day_options() -> Vec<u8> {
    (1..=31).collect()
}

/// Months offered by the month selector, January first
pub fn month_options() -> &'static [Month] {
    &Month::ALL
}

/// Years offered by the year selector, newest first
///
/// The selector only offers the last hundred years, but the validator does
/// not enforce that floor on typed-in values.
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_CHOICES).map(|offset| current_year - offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_options() {
        let days = day_options();
        assert_eq!(days.len(), 31);
        assert_eq!(days.first(), Some(&1));
        assert_eq!(days.last(), Some(&31));
    }

    #[test]
    fn test_month_options_in_calendar_order() {
        let months = month_options();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month::Jan);
        assert_eq!(months[11], Month::Dec);
    }

    #[test]
    fn test_year_options_count_down_from_current() {
        let years = year_options(2026);
        assert_eq!(years.len(), 100);
        assert_eq!(years[0], 2026);
        assert_eq!(years[99], 1927);
    }
}
