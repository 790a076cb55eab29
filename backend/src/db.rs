//! Database schema setup for the expense tracker.
//!
//! The whole application persists to a single `expense` table. The
//! connection is opened once at startup and shared behind an
//! `Arc<Mutex<Connection>>` for the life of the process; each store
//! operation is a single atomic statement, so no further transaction
//! discipline is needed.

use rusqlite::Connection;

/// Create the expense table if it does not exist.
///
/// `AUTOINCREMENT` keeps SQLite from reusing the id of a deleted row, so ids
/// stay unique across the lifetime of the database.
///
/// Validation is enforced in the request pipeline before any insert or
/// update, not as table constraints.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_expense_table() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database.");

        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'expense'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 1);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        let result = initialize(&connection);

        assert!(result.is_ok());
    }
}
