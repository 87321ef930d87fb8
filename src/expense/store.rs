//! The in-memory expense collection and the JSON file that mirrors it.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use time::Date;

use crate::{Error, expense::Expense};

/// The default location of the expenses file, relative to the working directory.
pub const DEFAULT_EXPENSES_PATH: &str = "expenses.json";

/// An insertion ordered list of expenses that is written to a JSON file after
/// every change.
///
/// The in-memory list is the source of truth. The file is rewritten in full on
/// each save and is only read once, in [ExpenseStore::load].
#[derive(Debug)]
pub struct ExpenseStore {
    path: PathBuf,
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    /// Load the expenses stored in the file at `path`.
    ///
    /// This never fails. If the file does not exist, cannot be read, or does
    /// not contain a JSON array of expenses, the store starts empty and the
    /// file is overwritten with an empty array. Any problems are logged.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let expenses = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<Expense>>(&text) {
                Ok(expenses) => Some(expenses),
                Err(error) => {
                    tracing::warn!(
                        "Expenses file {} is corrupt, overwriting: {error}",
                        path.display()
                    );
                    None
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "Expenses file {} not found. Creating new file.",
                    path.display()
                );
                None
            }
            Err(error) => {
                tracing::warn!(
                    "Could not read expenses file {}, overwriting: {error}",
                    path.display()
                );
                None
            }
        };

        if let Some(expenses) = expenses {
            tracing::info!(
                "Loaded {} expenses from {}",
                expenses.len(),
                path.display()
            );
            return Self { path, expenses };
        }

        let store = Self {
            path,
            expenses: Vec::new(),
        };

        // A failed write is logged by `save`, the store is still usable.
        let _ = store.save();

        store
    }

    /// The path of the file the expenses are saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All expenses in the order they were added.
    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    /// Write all expenses to the expenses file, replacing its contents.
    ///
    /// # Errors
    /// Returns [Error::SaveFailed] if the file could not be written. The
    /// in-memory expenses are not changed.
    pub fn save(&self) -> Result<(), Error> {
        let result = to_pretty_json(&self.expenses)
            .and_then(|json| fs::write(&self.path, json).map_err(serde_json::Error::io));

        if let Err(error) = result {
            tracing::error!(
                "Could not save expenses to {}: {error}",
                self.path.display()
            );
            return Err(Error::SaveFailed(error.to_string()));
        }

        tracing::debug!(
            "Saved {} expenses to {}",
            self.expenses.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Append `expense` and save.
    ///
    /// # Errors
    /// Returns [Error::SaveFailed] if the file could not be written. The
    /// expense stays in memory regardless.
    pub fn add(&mut self, expense: Expense) -> Result<(), Error> {
        self.expenses.push(expense);
        self.save()
    }

    /// Remove every expense with exactly this date, description and amount, then save.
    ///
    /// Removing nothing is not an error. Returns the number of expenses removed.
    ///
    /// # Errors
    /// Returns [Error::SaveFailed] if the file could not be written. The
    /// expenses stay removed from memory regardless.
    pub fn remove(&mut self, date: Date, description: &str, amount: f64) -> Result<usize, Error> {
        let count_before = self.expenses.len();
        self.expenses
            .retain(|expense| !expense.matches(date, description, amount));
        let removed = count_before - self.expenses.len();

        self.save()?;

        Ok(removed)
    }
}

/// Run `update` on the locked store in tokio's blocking pool.
///
/// The lock is held for the whole of `update`, including the file write, so
/// concurrent updates are applied and saved one at a time.
///
/// # Errors
/// Returns [Error::StoreLockError] if the lock is poisoned,
/// [Error::StoreTaskFailed] if `update` panics, or the error `update` returns.
pub async fn update_store<T, F>(expense_store: Arc<Mutex<ExpenseStore>>, update: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&mut ExpenseStore) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut store = expense_store.lock().map_err(|error| {
            tracing::error!("could not acquire expense store lock: {error}");
            Error::StoreLockError
        })?;

        update(&mut store)
    })
    .await?
}

fn to_pretty_json(expenses: &[Expense]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    expenses.serialize(&mut serializer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::{Arc, Mutex},
    };

    use tempfile::TempDir;
    use time::macros::date;

    use crate::{Error, expense::Expense};

    use super::{ExpenseStore, update_store};

    fn coffee() -> Expense {
        Expense::new(date!(2024 - 01 - 01), "coffee", 4.5)
    }

    fn lunch() -> Expense {
        Expense::new(date!(2024 - 01 - 02), "lunch", 12.0)
    }

    fn read_file(store: &ExpenseStore) -> serde_json::Value {
        let text = fs::read_to_string(store.path()).expect("could not read expenses file");
        serde_json::from_str(&text).expect("expenses file is not valid JSON")
    }

    #[test]
    fn missing_file_starts_empty_and_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");

        let store = ExpenseStore::load(&path);

        assert!(store.list().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn corrupt_file_is_reset_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(&path, "[{\"date\": \"2024-01-01\", \"descr").unwrap();

        let store = ExpenseStore::load(&path);

        assert!(store.list().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn file_with_invalid_date_is_treated_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(
            &path,
            r#"[{"date": "01/01/2024", "description": "coffee", "amount": 4.5}]"#,
        )
        .unwrap();

        let store = ExpenseStore::load(&path);

        assert!(store.list().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn file_with_day_past_end_of_month_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(
            &path,
            r#"[
    {"date": "2023-02-30", "description": "rent", "amount": 1200},
    {"date": "2024-01-02", "description": "lunch", "amount": 12.0}
]"#,
        )
        .unwrap();

        let store = ExpenseStore::load(&path);

        assert_eq!(
            store.list(),
            &[
                Expense::new(date!(2023 - 02 - 28), "rent", 1200.0),
                lunch()
            ]
        );
    }

    #[test]
    fn save_then_load_preserves_expenses_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        let mut store = ExpenseStore::load(&path);
        let want = vec![lunch(), coffee(), Expense::new(date!(2023 - 12 - 31), "", -3.0)];
        for expense in &want {
            store.add(expense.clone()).unwrap();
        }

        let reloaded = ExpenseStore::load(&path);

        assert_eq!(reloaded.list(), want.as_slice());
    }

    #[test]
    fn saved_file_is_pretty_printed_json_array() {
        let dir = TempDir::new().unwrap();
        let mut store = ExpenseStore::load(dir.path().join("expenses.json"));

        store.add(coffee()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    {"), "expected indented JSON, got {text}");
        assert_eq!(
            read_file(&store),
            serde_json::json!([{"date": "2024-01-01", "description": "coffee", "amount": 4.5}])
        );
    }

    #[test]
    fn add_then_list_returns_expense() {
        let dir = TempDir::new().unwrap();
        let mut store = ExpenseStore::load(dir.path().join("expenses.json"));

        store.add(coffee()).unwrap();

        assert_eq!(store.list(), &[coffee()]);
    }

    #[test]
    fn remove_deletes_all_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut store = ExpenseStore::load(dir.path().join("expenses.json"));
        store.add(coffee()).unwrap();
        store.add(coffee()).unwrap();
        store.add(lunch()).unwrap();

        let removed = store.remove(date!(2024 - 01 - 01), "coffee", 4.5).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.list(), &[lunch()]);
        assert_eq!(ExpenseStore::load(store.path()).list(), &[lunch()]);
    }

    #[test]
    fn remove_keeps_order_of_remaining_expenses() {
        let dir = TempDir::new().unwrap();
        let mut store = ExpenseStore::load(dir.path().join("expenses.json"));
        let taxi = Expense::new(date!(2024 - 01 - 03), "taxi", 20.0);
        store.add(lunch()).unwrap();
        store.add(coffee()).unwrap();
        store.add(taxi.clone()).unwrap();

        store.remove(date!(2024 - 01 - 01), "coffee", 4.5).unwrap();

        assert_eq!(store.list(), &[lunch(), taxi]);
    }

    #[test]
    fn remove_with_no_match_succeeds_and_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = ExpenseStore::load(dir.path().join("expenses.json"));
        store.add(coffee()).unwrap();

        let removed = store.remove(date!(2024 - 01 - 01), "coffee", 4.0).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(store.list(), &[coffee()]);
    }

    #[test]
    fn failed_save_keeps_in_memory_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("expenses.json");
        let mut store = ExpenseStore::load(&path);

        let result = store.add(coffee());

        assert!(matches!(result, Err(Error::SaveFailed(_))));
        assert_eq!(store.list(), &[coffee()]);
    }

    #[tokio::test]
    async fn update_store_applies_update_and_saves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        let expense_store = Arc::new(Mutex::new(ExpenseStore::load(&path)));

        update_store(expense_store.clone(), |store| store.add(coffee()))
            .await
            .unwrap();

        assert_eq!(expense_store.lock().unwrap().list(), &[coffee()]);
        assert_eq!(ExpenseStore::load(&path).list(), &[coffee()]);
    }

    #[tokio::test]
    async fn update_store_reports_poisoned_lock() {
        let dir = TempDir::new().unwrap();
        let expense_store = Arc::new(Mutex::new(ExpenseStore::load(
            dir.path().join("expenses.json"),
        )));
        let poisoner = expense_store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let result = update_store(expense_store, |store| store.add(coffee())).await;

        assert_eq!(result, Err(Error::StoreLockError));
    }

    #[tokio::test]
    async fn update_store_reports_panicking_update() {
        let dir = TempDir::new().unwrap();
        let expense_store = Arc::new(Mutex::new(ExpenseStore::load(
            dir.path().join("expenses.json"),
        )));

        let result: Result<(), Error> =
            update_store(expense_store, |_| panic!("update failed")).await;

        assert!(matches!(result, Err(Error::StoreTaskFailed(_))));
    }
}
