use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn expense(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expense").unwrap();
    cmd.env("EXPENSE_TRACKER_DATA_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn add_list_and_summarize_a_month() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .args(["add", "45.99", "food", "--date", "2025-01-15", "--note", "Lunch"])
        .assert()
        .success()
        .stdout(contains("Recorded $45.99 (Food) on 2025-01-15"));
    expense(&dir)
        .args(["add", "12.50", "transport", "--date", "2025-01-16T08:30"])
        .assert()
        .success();
    expense(&dir)
        .args(["add", "20", "food", "--date", "2025-02-01"])
        .assert()
        .success();

    expense(&dir)
        .args(["list", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(contains("Expenses for January 2025"))
        .stdout(contains("Lunch"))
        .stdout(contains("2 expense(s), total $58.49"));

    expense(&dir)
        .args(["list", "--month", "2025-01", "--category", "transport"])
        .assert()
        .success()
        .stdout(contains("1 expense(s), total $12.50"));

    expense(&dir)
        .args(["summary", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(contains("Spending for January 2025"))
        .stdout(contains("Expenses: 2"));

    let stored = std::fs::read_to_string(dir.path().join("data").join("expenses.json")).unwrap();
    assert!(stored.contains("45.99"));
}

#[test]
fn rejects_bad_amount_and_category() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .args(["add", "4.999", "food"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));
    expense(&dir)
        .args(["add", "10", "rent"])
        .assert()
        .failure()
        .stderr(contains("rent"));
    expense(&dir)
        .args(["add", "-5", "food"])
        .assert()
        .failure();
    expense(&dir)
        .args(["add", "90000000000000000", "food"])
        .assert()
        .failure()
        .stderr(contains("exceeds the maximum"));

    assert!(!dir.path().join("data").join("expenses.json").exists());
}

#[test]
fn budget_status_flags_overspending() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .args(["budget", "set", "food", "50", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(contains("Budget set: Food January 2025"));
    expense(&dir)
        .args(["budget", "set", "bills", "200", "--month", "2025-01"])
        .assert()
        .success();
    expense(&dir)
        .args(["add", "45.99", "food", "--date", "2025-01-15"])
        .assert()
        .success();
    expense(&dir)
        .args(["add", "30", "food", "--date", "2025-01-20"])
        .assert()
        .success();

    expense(&dir)
        .args(["budget", "status", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(contains("Budget status for January 2025"))
        .stdout(contains("OVER"))
        .stdout(contains("1 category over budget"));

    expense(&dir)
        .args(["budget", "list", "--month", "2025-02"])
        .assert()
        .success()
        .stdout(contains("No budgets for February 2025."));
}

#[test]
fn duplicate_budget_is_an_error() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .args(["budget", "set", "food", "300", "--month", "2025-01"])
        .assert()
        .success();
    expense(&dir)
        .args(["budget", "set", "Food", "400", "--month", "2025-01"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn delete_by_id_prefix() {
    let dir = TempDir::new().unwrap();

    let output = expense(&dir)
        .args(["add", "9.99", "entertainment", "--date", "2025-03-02"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID: "))
        .unwrap()
        .to_string();

    expense(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(contains("Deleted expense"));
    expense(&dir)
        .args(["list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(contains("No expenses found."));
    expense(&dir)
        .args(["delete", &id])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn corrupt_expenses_file_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    let path = data_dir.join("expenses.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    expense(&dir)
        .args(["list"])
        .assert()
        .failure()
        .stderr(contains("Storage unavailable"));
    expense(&dir)
        .args(["add", "10", "food"])
        .assert()
        .failure();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ this is not json");
}

#[test]
fn lists_categories() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(contains("Food"))
        .stdout(contains("Education"))
        .stdout(contains("Other"));
}

#[test]
fn audit_log_records_changes() {
    let dir = TempDir::new().unwrap();

    expense(&dir)
        .args(["add", "5", "health", "--date", "2025-01-05"])
        .assert()
        .success();
    expense(&dir)
        .args(["audit"])
        .assert()
        .success()
        .stdout(contains("CREATE Expense"))
        .stdout(contains("Health"));
}
