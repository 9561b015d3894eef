use std::fmt;

use chrono::{Months, NaiveDate};

/// Calendar distance between two dates in whole years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Elapsed {
    /// `None` when `from` is after `to`.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from > to {
            return None;
        }

        // Whole months first; adding months clamps to the end of short months.
        let mut months = month_index(to) - month_index(from);
        while months > 0 && add_months(from, months).is_none_or(|d| d > to) {
            months -= 1;
        }
        let anchor = add_months(from, months)?;
        let days = (to - anchor).num_days();

        Some(Self {
            years: (months / 12) as u32,
            months: (months % 12) as u32,
            days: days as u32,
        })
    }
}

fn month_index(date: NaiveDate) -> i64 {
    use chrono::Datelike;
    date.year() as i64 * 12 + date.month0() as i64
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.years, self.months) {
            (0, 0) => write!(f, "{} ago", plural(self.days, "day")),
            (0, months) => write!(f, "{} ago", plural(months, "month")),
            (years, 0) => write!(f, "{} ago", plural(years, "year")),
            (years, months) => write!(f, "{}, {} ago", plural(years, "year"), plural(months, "month")),
        }
    }
}

/// Popup text for a planned date as seen from `today`.
pub fn describe(planned: NaiveDate, today: NaiveDate) -> String {
    match Elapsed::between(planned, today) {
        Some(elapsed) => elapsed.to_string(),
        None => "in the future".to_string(),
    }
}
