//! Expense repository
//!
//! The whole expense collection lives in the `expenses` slot. Every call
//! re-reads the slot, so a corrupt blob is reported on each access and a
//! mutation never writes over it.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::ExpenseError;
use crate::models::{Category, Expense, ExpenseId};

use super::backend::KeyValueStore;
use super::slot::{read_collection, write_collection};

/// Slot key holding the expense collection
pub const EXPENSES_KEY: &str = "expenses";

/// Repository for expense persistence
pub struct ExpenseRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ExpenseRepository {
    /// Create a repository over a backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All expenses in stored order
    pub fn list(&self) -> Result<Vec<Expense>, ExpenseError> {
        read_collection(self.store.as_ref(), EXPENSES_KEY)
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), ExpenseError> {
        write_collection(self.store.as_ref(), EXPENSES_KEY, expenses)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Append a new expense
    pub fn add(&self, expense: Expense) -> Result<(), ExpenseError> {
        expense
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let mut expenses = self.list()?;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(ExpenseError::Duplicate {
                entity_type: "Expense",
                identifier: expense.id.to_string(),
            });
        }

        expenses.push(expense);
        self.save(&expenses)
    }

    /// Replace the expense with the same ID
    ///
    /// Returns `false` without writing if no such expense exists.
    pub fn update(&self, expense: Expense) -> Result<bool, ExpenseError> {
        expense
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let mut expenses = self.list()?;
        let Some(slot) = expenses.iter_mut().find(|e| e.id == expense.id) else {
            return Ok(false);
        };

        *slot = expense;
        self.save(&expenses)?;
        Ok(true)
    }

    /// Remove an expense, `false` if it was not there
    pub fn remove(&self, id: ExpenseId) -> Result<bool, ExpenseError> {
        let mut expenses = self.list()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);

        if expenses.len() == before {
            return Ok(false);
        }

        self.save(&expenses)?;
        Ok(true)
    }

    /// Expenses in a category
    pub fn by_category(&self, category: Category) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.category == category)
            .collect())
    }

    /// Expenses on a calendar day, at any time of that day
    pub fn by_day(&self, day: NaiveDate) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.is_on_day(day))
            .collect())
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, ExpenseError> {
        Ok(self.list()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::backend::{FileKeyValueStore, MemoryKeyValueStore};
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn create_test_repo() -> ExpenseRepository {
        ExpenseRepository::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn test_empty_list() {
        let repo = create_test_repo();
        assert!(repo.list().unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let repo = create_test_repo();
        let expense = Expense::new(Money::from_cents(5000), Category::Food, at(2025, 1, 15, 12));
        let id = expense.id;

        repo.add(expense.clone()).unwrap();

        assert_eq!(repo.get(id).unwrap(), Some(expense));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let repo = create_test_repo();
        let expense = Expense::new(Money::from_cents(5000), Category::Food, at(2025, 1, 15, 12));

        repo.add(expense.clone()).unwrap();
        let err = repo.add(expense).unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_add_rejects_negative_amount() {
        let repo = create_test_repo();
        let expense = Expense::new(Money::from_cents(-1), Category::Food, at(2025, 1, 15, 12));

        assert!(repo.add(expense).unwrap_err().is_validation());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let repo = create_test_repo();
        let expense = Expense::new(Money::from_cents(5000), Category::Food, at(2025, 1, 15, 12));
        repo.add(expense.clone()).unwrap();

        let edited = Expense {
            amount: Money::from_cents(7500),
            note: "dinner".into(),
            ..expense.clone()
        };
        assert!(repo.update(edited.clone()).unwrap());
        assert_eq!(repo.get(expense.id).unwrap(), Some(edited));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let repo = create_test_repo();
        let stored = Expense::new(Money::from_cents(100), Category::Food, at(2025, 1, 1, 9));
        repo.add(stored.clone()).unwrap();

        let stranger = Expense::new(Money::from_cents(200), Category::Bills, at(2025, 1, 2, 9));
        assert!(!repo.update(stranger).unwrap());
        assert_eq!(repo.list().unwrap(), vec![stored]);
    }

    #[test]
    fn test_remove() {
        let repo = create_test_repo();
        let expense = Expense::new(Money::from_cents(5000), Category::Food, at(2025, 1, 15, 12));
        let id = expense.id;
        repo.add(expense).unwrap();

        assert!(repo.remove(id).unwrap());
        assert!(!repo.remove(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_by_category_and_day() {
        let repo = create_test_repo();
        repo.add(Expense::new(Money::from_cents(100), Category::Food, at(2025, 1, 15, 8)))
            .unwrap();
        repo.add(Expense::new(Money::from_cents(200), Category::Food, at(2025, 1, 15, 22)))
            .unwrap();
        repo.add(Expense::new(Money::from_cents(300), Category::Transport, at(2025, 1, 16, 8)))
            .unwrap();

        assert_eq!(repo.by_category(Category::Food).unwrap().len(), 2);
        assert_eq!(repo.by_category(Category::Health).unwrap().len(), 0);

        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let on_day = repo.by_day(day).unwrap();
        assert_eq!(on_day.len(), 2);
        assert!(on_day.iter().all(|e| e.category == Category::Food));
    }

    #[test]
    fn test_corrupt_slot_is_never_overwritten() {
        let backend = Arc::new(MemoryKeyValueStore::with_slot(EXPENSES_KEY, "[{broken"));
        let repo = ExpenseRepository::new(backend.clone());

        assert!(repo.list().unwrap_err().is_storage_unavailable());

        let expense = Expense::new(Money::from_cents(100), Category::Food, at(2025, 1, 1, 9));
        assert!(repo.add(expense.clone()).unwrap_err().is_storage_unavailable());
        assert!(repo.update(expense.clone()).unwrap_err().is_storage_unavailable());
        assert!(repo.remove(expense.id).unwrap_err().is_storage_unavailable());

        assert_eq!(backend.get(EXPENSES_KEY).unwrap().as_deref(), Some("[{broken"));
    }

    #[test]
    fn test_file_backend_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let expense = Expense::new(Money::from_cents(4599), Category::Food, at(2025, 1, 15, 12))
            .with_tags(["dining"]);

        let repo = ExpenseRepository::new(Arc::new(FileKeyValueStore::new(
            temp_dir.path().to_path_buf(),
        )));
        repo.add(expense.clone()).unwrap();

        let reopened = ExpenseRepository::new(Arc::new(FileKeyValueStore::new(
            temp_dir.path().to_path_buf(),
        )));
        assert_eq!(reopened.list().unwrap(), vec![expense]);
    }

    #[test]
    fn test_non_utf8_file_is_unavailable_and_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        std::fs::write(&path, [0xff, 0xfe]).unwrap();

        let repo = ExpenseRepository::new(Arc::new(FileKeyValueStore::new(
            temp_dir.path().to_path_buf(),
        )));
        assert!(repo.list().unwrap_err().is_storage_unavailable());

        let expense = Expense::new(Money::from_cents(100), Category::Food, at(2025, 1, 2, 9));
        assert!(repo.add(expense).unwrap_err().is_storage_unavailable());
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xfe]);
    }

    #[test]
    fn test_largest_amount_survives_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let expense = Expense::new(Money::MAX_AMOUNT, Category::Bills, at(2025, 1, 15, 12));

        let repo = ExpenseRepository::new(Arc::new(FileKeyValueStore::new(
            temp_dir.path().to_path_buf(),
        )));
        repo.add(expense.clone()).unwrap();

        assert_eq!(repo.list().unwrap(), vec![expense]);
    }
}
