//! Expense aggregation service
//!
//! Keeps an in-memory mirror of the stored expenses together with the
//! user's current view (selected month, optional category and day filters)
//! and the per-month totals derived from them. Every mutation goes through
//! the store, then the mirror is reloaded and the totals recomputed before
//! observers are notified.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::audit::EntityType;
use crate::error::ExpenseResult;
use crate::models::{Category, Expense, ExpenseId, Money, Month};
use crate::storage::Storage;
use crate::time::Clock;

/// Whether a persisted collection could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataState {
    Ready,
    /// The stored collection exists but could not be decoded
    Unavailable { reason: String },
}

impl DataState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for DataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Unavailable { reason } => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Read-only copy of everything the aggregator exposes
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSnapshot {
    pub expenses: Vec<Expense>,
    pub selected_month: Month,
    pub selected_category: Option<Category>,
    pub selected_date: Option<NaiveDate>,
    pub total_for_selected_month: Money,
    /// Every category, zero-valued ones included
    pub totals_by_category: BTreeMap<Category, Money>,
    pub data_state: DataState,
}

type Observer<'a> = Box<dyn FnMut(&ExpenseSnapshot) + 'a>;

/// Groups expenses by category and month
pub struct ExpenseAggregator<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
    expenses: Vec<Expense>,
    selected_month: Month,
    selected_category: Option<Category>,
    selected_date: Option<NaiveDate>,
    total_for_selected_month: Money,
    totals_by_category: BTreeMap<Category, Money>,
    data_state: DataState,
    observers: Vec<Observer<'a>>,
}

impl<'a> ExpenseAggregator<'a> {
    /// Create an aggregator viewing the clock's current month
    ///
    /// A corrupt store does not fail construction: the aggregator starts
    /// empty and reports [`DataState::Unavailable`].
    pub fn new(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        let mut aggregator = Self {
            storage,
            clock,
            expenses: Vec::new(),
            selected_month: clock.current_month(),
            selected_category: None,
            selected_date: None,
            total_for_selected_month: Money::zero(),
            totals_by_category: zero_totals(),
            data_state: DataState::Ready,
            observers: Vec::new(),
        };
        // Failure is recorded in data_state
        let _ = aggregator.load();
        aggregator
    }

    /// Re-read the store and recompute
    pub fn load(&mut self) -> ExpenseResult<()> {
        let result = self.storage.expenses.list();

        let outcome = match result {
            Ok(expenses) => {
                self.expenses = expenses;
                self.data_state = DataState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "expenses unavailable");
                self.expenses.clear();
                self.data_state = DataState::Unavailable {
                    reason: e.to_string(),
                };
                Err(e)
            }
        };

        self.recompute();
        outcome
    }

    /// Record a new expense
    pub fn add(&mut self, expense: Expense) -> ExpenseResult<()> {
        self.storage.expenses.add(expense.clone())?;
        if let Err(e) = self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()
    }

    /// Replace the stored expense with the same id
    ///
    /// Returns `false` if no such expense exists.
    pub fn update(&mut self, expense: Expense) -> ExpenseResult<bool> {
        let Some(before) = self.storage.expenses.get(expense.id)? else {
            return Ok(false);
        };
        if !self.storage.expenses.update(expense.clone())? {
            return Ok(false);
        }

        if let Err(e) = self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &before,
            &expense,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()?;
        Ok(true)
    }

    /// Delete an expense, `false` if it was not there
    pub fn delete(&mut self, id: ExpenseId) -> ExpenseResult<bool> {
        let Some(existing) = self.storage.expenses.get(id)? else {
            return Ok(false);
        };
        if !self.storage.expenses.remove(id)? {
            return Ok(false);
        }

        if let Err(e) = self.storage.log_delete(
            EntityType::Expense,
            id.to_string(),
            Some(existing.to_string()),
            &existing,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()?;
        Ok(true)
    }

    /// Every loaded expense, in stored order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Find a loaded expense from user input (full id, display id or prefix)
    pub fn find(&self, input: &str) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| e.id.matches(input)).collect()
    }

    /// Expenses in the selected month, narrowed by the category and day
    /// filters when set, newest first
    pub fn filtered(&self) -> Vec<&Expense> {
        let mut filtered: Vec<_> = self
            .expenses
            .iter()
            .filter(|e| e.is_in_month(self.selected_month))
            .filter(|e| self.selected_category.map_or(true, |c| e.category == c))
            .filter(|e| self.selected_date.map_or(true, |d| e.is_on_day(d)))
            .collect();
        sort_newest_first(&mut filtered);
        filtered
    }

    /// All expenses of a calendar month, newest first
    pub fn expenses_for_month(&self, month: Month) -> Vec<&Expense> {
        let mut matching: Vec<_> = self
            .expenses
            .iter()
            .filter(|e| e.is_in_month(month))
            .collect();
        sort_newest_first(&mut matching);
        matching
    }

    /// Sum spent in a category during a month
    pub fn total_for_category(&self, category: Category, month: Month) -> Money {
        self.expenses
            .iter()
            .filter(|e| e.category == category && e.is_in_month(month))
            .map(|e| e.amount)
            .sum()
    }

    /// Total spent in the selected month
    pub fn monthly_total(&self) -> Money {
        self.total_for_selected_month
    }

    /// Per-category totals for the selected month
    pub fn totals_by_category(&self) -> &BTreeMap<Category, Money> {
        &self.totals_by_category
    }

    pub fn transaction_count_for_selected_month(&self) -> usize {
        self.expenses
            .iter()
            .filter(|e| e.is_in_month(self.selected_month))
            .count()
    }

    /// The newest `limit` expenses across all months
    pub fn recent(&self, limit: usize) -> Vec<&Expense> {
        let mut all: Vec<_> = self.expenses.iter().collect();
        sort_newest_first(&mut all);
        all.truncate(limit);
        all
    }

    pub fn selected_month(&self) -> Month {
        self.selected_month
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn data_state(&self) -> &DataState {
        &self.data_state
    }

    pub fn previous_month(&mut self) {
        self.set_selected_month(self.selected_month.prev());
    }

    pub fn next_month(&mut self) {
        self.set_selected_month(self.selected_month.next());
    }

    /// Jump back to the clock's month
    pub fn current_month(&mut self) {
        self.set_selected_month(self.clock.current_month());
    }

    /// View another month
    ///
    /// A selected day outside the new month is dropped.
    pub fn set_selected_month(&mut self, month: Month) {
        self.selected_month = month;
        if self.selected_date.is_some_and(|d| !month.contains(d)) {
            self.selected_date = None;
        }
        self.recompute();
    }

    pub fn select_category(&mut self, category: Option<Category>) {
        self.selected_category = category;
        self.recompute();
    }

    /// Narrow the view to one day; the selected month follows the day
    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        if let Some(day) = date {
            self.selected_month = Month::of(day);
        }
        self.selected_date = date;
        self.recompute();
    }

    /// Drop the category and day filters, keeping the selected month
    pub fn clear_filters(&mut self) {
        self.selected_category = None;
        self.selected_date = None;
        self.recompute();
    }

    /// e.g. "December 2024"
    pub fn selected_month_label(&self) -> String {
        self.selected_month.label()
    }

    pub fn is_viewing_current_month(&self) -> bool {
        self.selected_month == self.clock.current_month()
    }

    pub fn snapshot(&self) -> ExpenseSnapshot {
        ExpenseSnapshot {
            expenses: self.expenses.clone(),
            selected_month: self.selected_month,
            selected_category: self.selected_category,
            selected_date: self.selected_date,
            total_for_selected_month: self.total_for_selected_month,
            totals_by_category: self.totals_by_category.clone(),
            data_state: self.data_state.clone(),
        }
    }

    /// Register an observer called with a fresh snapshot after every recompute
    pub fn subscribe(&mut self, observer: impl FnMut(&ExpenseSnapshot) + 'a) {
        self.observers.push(Box::new(observer));
    }

    fn recompute(&mut self) {
        let month = self.selected_month;
        let mut totals = zero_totals();
        for expense in self.expenses.iter().filter(|e| e.is_in_month(month)) {
            if let Some(total) = totals.get_mut(&expense.category) {
                *total += expense.amount;
            }
        }

        self.total_for_selected_month = totals.values().sum();
        self.totals_by_category = totals;
        debug!(
            %month,
            total = %self.total_for_selected_month,
            count = self.expenses.len(),
            "expense totals recomputed"
        );

        self.notify();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

fn zero_totals() -> BTreeMap<Category, Money> {
    Category::ALL
        .iter()
        .map(|&c| (c, Money::zero()))
        .collect()
}

/// Newest first; equal timestamps fall back to id order so output is stable
fn sort_newest_first(expenses: &mut [&Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
}
