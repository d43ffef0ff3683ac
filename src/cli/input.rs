//! Parsing of command-line input
//!
//! Turns the loose strings users type (months, dates, amounts, categories)
//! into model values, resolving relative forms against the clock.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, Money, Month, UnknownCategory};
use crate::time::Clock;

/// Parses user input relative to a clock
pub struct InputParser<'a> {
    clock: &'a dyn Clock,
}

impl<'a> InputParser<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Parse a month argument, or use the current month
    pub fn month_or_current(&self, input: Option<&str>) -> ExpenseResult<Month> {
        match input {
            Some(s) => self.month(s),
            None => Ok(self.clock.current_month()),
        }
    }

    /// Parse a month
    ///
    /// Formats supported: "2025-01", "current", "last"/"prev", "next", and
    /// month names ("January", "jan") meaning that month of the current year.
    pub fn month(&self, input: &str) -> ExpenseResult<Month> {
        let current = self.clock.current_month();
        let lower = input.trim().to_lowercase();

        match lower.as_str() {
            "current" | "this" | "now" => return Ok(current),
            "last" | "prev" | "previous" => return Ok(current.prev()),
            "next" => return Ok(current.next()),
            _ => {}
        }

        if let Some(number) = month_number(&lower) {
            if let Some(month) = Month::new(current.year(), number) {
                return Ok(month);
            }
        }

        Month::parse(input.trim())
            .map_err(|e| ExpenseError::Validation(format!("Invalid month '{}': {}", input, e)))
    }

    /// Parse a calendar day: "2025-01-15", "today" or "yesterday"
    pub fn day(&self, input: &str) -> ExpenseResult<NaiveDate> {
        let today = self.clock.today();
        match input.trim().to_lowercase().as_str() {
            "today" => Ok(today),
            "yesterday" => today
                .pred_opt()
                .ok_or_else(|| ExpenseError::Validation("Date out of range".into())),
            trimmed => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
                ExpenseError::Validation(format!(
                    "Invalid date '{}': expected YYYY-MM-DD",
                    input
                ))
            }),
        }
    }

    /// Parse an expense timestamp, or use the clock's time
    ///
    /// A bare day keeps the clock's time of day so same-day entries stay in
    /// the order they were recorded.
    pub fn timestamp_or_now(&self, input: Option<&str>) -> ExpenseResult<NaiveDateTime> {
        let Some(input) = input else {
            return Ok(self.clock.now());
        };

        let trimmed = input.trim();
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
            if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(timestamp);
            }
        }

        let day = self.day(trimmed)?;
        Ok(day.and_time(self.clock.now().time()))
    }

    /// Parse an amount such as "45.99" or "$45.99"
    pub fn amount(&self, input: &str) -> ExpenseResult<Money> {
        Money::parse(input)
            .map_err(|e| ExpenseError::Validation(format!("Invalid amount '{}': {}", input, e)))
    }

    pub fn category(&self, input: &str) -> ExpenseResult<Category> {
        input
            .parse()
            .map_err(|e: UnknownCategory| ExpenseError::Validation(e.to_string()))
    }
}

fn month_number(name: &str) -> Option<u32> {
    const NAMES: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];

    if name.len() < 3 {
        return None;
    }
    NAMES
        .iter()
        .position(|full| full.starts_with(name))
        .map(|index| index as u32 + 1)
}
