//! Expense model
//!
//! A single recorded spending transaction.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::ExpenseId;
use super::money::Money;
use super::month::Month;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, fixed at creation
    pub id: ExpenseId,

    /// Amount spent (never negative)
    pub amount: Money,

    pub category: Category,

    /// Local timestamp; only the calendar day and month are queried
    pub date: NaiveDateTime,

    #[serde(default)]
    pub note: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Expense {
    /// Create a new expense with a fresh id and no note or tags
    pub fn new(amount: Money, category: Category, date: NaiveDateTime) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            category,
            date,
            note: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Calendar day of the expense
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Calendar month of the expense
    pub fn month(&self) -> Month {
        Month::of(self.date.date())
    }

    pub fn is_in_month(&self, month: Month) -> bool {
        month.contains(self.date.date())
    }

    pub fn is_on_day(&self, day: NaiveDate) -> bool {
        self.date.date() == day
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }

        if !self.amount.is_storable() {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }

        if Month::new(self.date.year(), self.date.month()).is_none() {
            return Err(ExpenseValidationError::DateOutOfRange(self.date));
        }

        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ExpenseValidationError::BlankTag);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )
    }
}

/// Split comma-separated tag input into trimmed, non-empty tags
///
/// ```
/// use expense_tracker::models::parse_tags;
/// assert_eq!(parse_tags("dining, work,,"), vec!["dining", "work"]);
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NegativeAmount(Money),
    AmountTooLarge(Money),
    DateOutOfRange(NaiveDateTime),
    BlankTag,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Expense amount must not be negative: {}", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Expense amount {} exceeds the maximum of {}",
                amount,
                Money::MAX_AMOUNT
            ),
            Self::DateOutOfRange(date) => write!(
                f,
                "Expense date {} is outside years {}..={}",
                date.format("%Y-%m-%d"),
                Month::MIN_YEAR,
                Month::MAX_YEAR
            ),
            Self::BlankTag => write!(f, "Tags must not be blank"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
