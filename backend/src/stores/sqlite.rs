//! Implements a SQLite backed expense store.
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension, Row};

use common::{CategorySummary, DatabaseID, Expense, NewExpense, TOTAL_CATEGORY};

use crate::{
    stores::{ExpenseFilter, ExpenseStore, ExpenseUpdate},
    Error,
};

const EXPENSE_COLUMNS: &str = "id, date, amount, category, description, created_at";

/// Stores expenses in a SQLite database.
///
/// Holds the process-wide connection: it is opened once at startup and every
/// operation is a single statement executed behind the mutex.
#[derive(Debug, Clone)]
pub struct SqliteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
        Ok(Expense {
            id: row.get(0)?,
            date: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// Wrap a rusqlite fault into [Error::Store], tagged with the name of the
/// store operation that failed. A query that found no rows maps to
/// [Error::NotFound] instead.
fn store_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |error| match error {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
        error => Error::Store {
            operation,
            message: error.to_string(),
        },
    }
}

impl ExpenseStore for SqliteExpenseStore {
    fn get_all(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, Error> {
        let mut query_string_parts = vec![format!("SELECT {EXPENSE_COLUMNS} FROM expense")];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(category) = &filter.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.clone()));
        }

        // The amount bounds only form a range filter when both are present.
        // A lone bound is ignored, matching the documented API behaviour.
        if let (Some(min_amount), Some(max_amount)) = (filter.min_amount, filter.max_amount) {
            where_clause_parts.push(format!(
                "amount BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Real(min_amount));
            query_parameters.push(Value::Real(max_amount));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        // Ascending id is insertion order, which breaks date ties stably.
        query_string_parts.push("ORDER BY date DESC, id ASC".to_string());

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)
            .map_err(store_error("get_all"))?
            .query_map(params, Self::map_row)
            .map_err(store_error("get_all"))?
            .map(|maybe_expense| maybe_expense.map_err(store_error("get_all")))
            .collect()
    }

    fn get(&self, id: DatabaseID) -> Result<Option<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"
            ))
            .map_err(store_error("get"))?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
            .map_err(store_error("get"))
    }

    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO expense (date, amount, category, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {EXPENSE_COLUMNS}"
            ))
            .map_err(store_error("create"))?
            .query_row(
                (
                    expense.date,
                    expense.amount,
                    expense.category,
                    expense.description,
                    Utc::now(),
                ),
                Self::map_row,
            )
            .map_err(store_error("create"))
    }

    fn update(&mut self, id: DatabaseID, update: &ExpenseUpdate) -> Result<Expense, Error> {
        if update.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        let mut set_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(date) = update.date {
            set_clause_parts.push(format!("date = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(date.format("%Y-%m-%d").to_string()));
        }

        if let Some(amount) = update.amount {
            set_clause_parts.push(format!("amount = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(amount));
        }

        if let Some(category) = &update.category {
            set_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.clone()));
        }

        if let Some(description) = &update.description {
            set_clause_parts.push(format!("description = ?{}", query_parameters.len() + 1));
            query_parameters.push(match description {
                Some(text) => Value::Text(text.clone()),
                None => Value::Null,
            });
        }

        let query_string = format!(
            "UPDATE expense SET {} WHERE id = ?{} RETURNING {EXPENSE_COLUMNS}",
            set_clause_parts.join(", "),
            query_parameters.len() + 1,
        );
        query_parameters.push(Value::Integer(id));

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)
            .map_err(store_error("update"))?
            .query_row(params_from_iter(query_parameters.iter()), Self::map_row)
            .map_err(store_error("update"))
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense WHERE id = ?1", [id])
            .map_err(store_error("delete"))?;

        if rows_affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }

    fn summary(&self) -> Result<Vec<CategorySummary>, Error> {
        let connection = self.connection.lock().unwrap();

        let mut rows: Vec<CategorySummary> = connection
            .prepare(
                "SELECT category, COUNT(id), ROUND(SUM(amount), 2)
                 FROM expense
                 GROUP BY category
                 ORDER BY category ASC",
            )
            .map_err(store_error("summary"))?
            .query_map([], |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    total_count: row.get(1)?,
                    category_total: row.get(2)?,
                })
            })
            .map_err(store_error("summary"))?
            .collect::<Result<_, _>>()
            .map_err(store_error("summary"))?;

        let grand_total = connection
            .query_row(
                "SELECT COUNT(id), ROUND(COALESCE(SUM(amount), 0), 2) FROM expense",
                [],
                |row| {
                    Ok(CategorySummary {
                        category: TOTAL_CATEGORY.to_string(),
                        total_count: row.get(0)?,
                        category_total: row.get(1)?,
                    })
                },
            )
            .map_err(store_error("summary"))?;

        rows.push(grand_total);

        Ok(rows)
    }
}

#[cfg(test)]
mod sqlite_expense_store_tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use rusqlite::Connection;

    use common::{NewExpense, TOTAL_CATEGORY};

    use crate::{
        db::initialize,
        stores::{ExpenseFilter, ExpenseStore, ExpenseUpdate},
        Error,
    };

    use super::SqliteExpenseStore;

    fn get_test_store() -> SqliteExpenseStore {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        SqliteExpenseStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_expense(date: &str, amount: f64, category: &str) -> NewExpense {
        NewExpense {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            category: category.to_string(),
            description: None,
        }
    }

    #[test]
    fn create_assigns_id_and_created_at_and_round_trips() {
        let mut store = get_test_store();
        let want = NewExpense {
            description: Some("weekly shop".to_string()),
            ..new_expense("2024-01-15", 42.5, "Food")
        };

        let created = store.create(want.clone()).unwrap();

        assert_eq!(created.date, want.date);
        assert_eq!(created.amount, want.amount);
        assert_eq!(created.category, want.category);
        assert_eq!(created.description, want.description);

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let store = get_test_store();

        let result = store.get(999).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn ids_are_not_reused_after_deletion() {
        let mut store = get_test_store();
        let first = store.create(new_expense("2024-01-01", 1.0, "Food")).unwrap();
        let second = store.create(new_expense("2024-01-02", 2.0, "Food")).unwrap();

        store.delete(second.id).unwrap();
        let third = store.create(new_expense("2024-01-03", 3.0, "Food")).unwrap();

        assert!(third.id > second.id, "deleted id {} was reused", second.id);
        assert!(first.id < second.id);
    }

    #[test]
    fn get_all_orders_by_date_descending_with_insertion_order_ties() {
        let mut store = get_test_store();
        let older = store.create(new_expense("2024-01-01", 1.0, "Food")).unwrap();
        let newest = store
            .create(new_expense("2024-03-01", 2.0, "Transport"))
            .unwrap();
        let tied_first = store.create(new_expense("2024-02-01", 3.0, "Other")).unwrap();
        let tied_second = store.create(new_expense("2024-02-01", 4.0, "Other")).unwrap();

        let got = store.get_all(&ExpenseFilter::default()).unwrap();

        let want_ids = [newest.id, tied_first.id, tied_second.id, older.id];
        let got_ids: Vec<_> = got.iter().map(|expense| expense.id).collect();
        assert_eq!(got_ids, want_ids);
    }

    #[test]
    fn get_all_filters_by_category() {
        let mut store = get_test_store();
        let food = store.create(new_expense("2024-01-01", 1.0, "Food")).unwrap();
        store
            .create(new_expense("2024-01-02", 2.0, "Transport"))
            .unwrap();

        let got = store
            .get_all(&ExpenseFilter {
                category: Some("Food".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, vec![food]);
    }

    #[test]
    fn get_all_applies_amount_range_only_when_both_bounds_present() {
        let mut store = get_test_store();
        store.create(new_expense("2024-01-01", 5.0, "Food")).unwrap();
        let in_range = store.create(new_expense("2024-01-02", 15.0, "Food")).unwrap();
        store.create(new_expense("2024-01-03", 50.0, "Food")).unwrap();

        let both_bounds = store
            .get_all(&ExpenseFilter {
                min_amount: Some(10.0),
                max_amount: Some(20.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(both_bounds, vec![in_range]);

        // A lone bound does not filter.
        let lone_bound = store
            .get_all(&ExpenseFilter {
                min_amount: Some(10.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(lone_bound.len(), 3);
    }

    #[test]
    fn get_all_returns_empty_vec_when_nothing_matches() {
        let store = get_test_store();

        let got = store.get_all(&ExpenseFilter::default()).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let mut store = get_test_store();
        let created = store
            .create(NewExpense {
                description: Some("weekly shop".to_string()),
                ..new_expense("2024-01-15", 42.5, "Food")
            })
            .unwrap();

        let updated = store
            .update(
                created.id,
                &ExpenseUpdate {
                    amount: Some(19.25),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, 19.25);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn update_can_clear_the_description() {
        let mut store = get_test_store();
        let created = store
            .create(NewExpense {
                description: Some("weekly shop".to_string()),
                ..new_expense("2024-01-15", 42.5, "Food")
            })
            .unwrap();

        let updated = store
            .update(
                created.id,
                &ExpenseUpdate {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.description, None);
    }

    #[test]
    fn update_rejects_empty_field_set_before_any_mutation() {
        let mut store = get_test_store();
        let created = store.create(new_expense("2024-01-15", 42.5, "Food")).unwrap();

        let result = store.update(created.id, &ExpenseUpdate::default());

        assert_eq!(result, Err(Error::EmptyUpdate));
        assert_eq!(store.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn update_fails_on_unknown_id() {
        let mut store = get_test_store();

        let result = store.update(
            999,
            &ExpenseUpdate {
                amount: Some(1.0),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_unknown_id() {
        let mut store = get_test_store();

        let result = store.delete(999);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_the_row() {
        let mut store = get_test_store();
        let created = store.create(new_expense("2024-01-15", 42.5, "Food")).unwrap();

        store.delete(created.id).unwrap();

        assert_eq!(store.get(created.id).unwrap(), None);
    }

    #[test]
    fn summary_groups_by_category_with_total_row() {
        let mut store = get_test_store();
        store.create(new_expense("2024-01-01", 10.25, "Food")).unwrap();
        store.create(new_expense("2024-01-02", 5.5, "Food")).unwrap();
        store
            .create(new_expense("2024-01-03", 20.0, "Transport"))
            .unwrap();

        let got = store.summary().unwrap();

        assert_eq!(got.len(), 3);

        assert_eq!(got[0].category, "Food");
        assert_eq!(got[0].total_count, 2);
        assert_eq!(got[0].category_total, 15.75);

        assert_eq!(got[1].category, "Transport");
        assert_eq!(got[1].total_count, 1);
        assert_eq!(got[1].category_total, 20.0);

        assert_eq!(got[2].category, TOTAL_CATEGORY);
        assert_eq!(got[2].total_count, 3);
        assert_eq!(got[2].category_total, 35.75);
    }

    #[test]
    fn summary_totals_match_listing() {
        let mut store = get_test_store();
        store.create(new_expense("2024-01-01", 12.25, "Food")).unwrap();
        store.create(new_expense("2024-01-02", 7.5, "Shopping")).unwrap();
        store.create(new_expense("2024-01-03", 3.25, "Food")).unwrap();

        let all = store.get_all(&ExpenseFilter::default()).unwrap();
        let summary = store.summary().unwrap();

        for row in &summary {
            let want: f64 = if row.category == TOTAL_CATEGORY {
                all.iter().map(|expense| expense.amount).sum()
            } else {
                all.iter()
                    .filter(|expense| expense.category == row.category)
                    .map(|expense| expense.amount)
                    .sum()
            };

            assert_eq!(row.category_total, want, "mismatch for {}", row.category);
        }
    }

    #[test]
    fn summary_of_empty_store_is_a_single_zero_total() {
        let store = get_test_store();

        let got = store.summary().unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, TOTAL_CATEGORY);
        assert_eq!(got[0].total_count, 0);
        assert_eq!(got[0].category_total, 0.0);
    }

    #[test]
    fn summary_omits_absent_categories() {
        let mut store = get_test_store();
        store.create(new_expense("2024-01-01", 1.0, "Food")).unwrap();

        let got = store.summary().unwrap();

        assert!(got.iter().all(|row| row.category != "Transport"));
    }
}
