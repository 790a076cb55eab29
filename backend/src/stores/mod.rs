//! Defines the interface for the expense store and its SQLite implementation.

mod sqlite;

use chrono::NaiveDate;
use common::{sanitize, CategorySummary, DatabaseID, Expense, ExpenseDraft, NewExpense};

pub use sqlite::SqliteExpenseStore;

use crate::Error;

/// Optional criteria for narrowing an expense listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Keep only expenses with exactly this category.
    pub category: Option<String>,
    /// Lower bound (inclusive) on the amount.
    pub min_amount: Option<f64>,
    /// Upper bound (inclusive) on the amount.
    pub max_amount: Option<f64>,
}

/// The fields a partial update may set.
///
/// Only this fixed allow-list of fields can change after creation; `id` and
/// `created_at` are immutable. `description` is a double `Option` so an
/// update can clear it (`Some(None)`) as well as replace it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// Replace the date.
    pub date: Option<NaiveDate>,
    /// Replace the amount.
    pub amount: Option<f64>,
    /// Replace the category.
    pub category: Option<String>,
    /// Replace (`Some(text)`) or clear (`None`) the description.
    pub description: Option<Option<String>>,
}

impl ExpenseUpdate {
    /// Collect the fields supplied by `draft`, sanitized to canonical types.
    ///
    /// Callers validate the merged record first, so every field the draft
    /// supplies is known to sanitize to a usable value by the time the
    /// update reaches the store.
    pub fn from_draft(draft: &ExpenseDraft) -> Self {
        let sanitized = sanitize(draft);

        Self {
            date: sanitized
                .date
                .as_deref()
                .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()),
            amount: sanitized.amount.filter(|amount| amount.is_finite()),
            category: sanitized.category,
            description: draft
                .description
                .as_ref()
                .map(|_| sanitized.description.clone()),
        }
    }

    /// Whether the update sets no fields at all.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Handles the persistence of [Expense] records and derived aggregates.
pub trait ExpenseStore {
    /// Retrieve the expenses matching `filter`, ordered by date descending
    /// with ties broken by insertion order.
    ///
    /// The amount bounds only act as a range filter when both are present;
    /// a lone bound is ignored.
    ///
    /// An empty result is `Ok`, never an error.
    ///
    /// # Errors
    /// Returns an [Error::Store] if the underlying query fails.
    fn get_all(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expense with `id`, or `None` if there is no such row.
    /// Absence is a normal outcome at this layer, not an error.
    ///
    /// # Errors
    /// Returns an [Error::Store] if the underlying query fails.
    fn get(&self, id: DatabaseID) -> Result<Option<Expense>, Error>;

    /// Insert a new expense, assigning the next id and stamping
    /// `created_at` with the current time. Returns the stored row.
    ///
    /// The caller is responsible for having validated `expense`.
    ///
    /// # Errors
    /// Returns an [Error::Store] if the underlying insert fails.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error>;

    /// Set the supplied fields on the expense with `id` and return the row
    /// after the update.
    ///
    /// Performs no validation; the caller validates the merged record
    /// upstream.
    ///
    /// # Errors
    /// This function will return:
    /// - [Error::EmptyUpdate] if `update` sets no fields, before any row
    ///   mutation,
    /// - [Error::NotFound] if `id` does not refer to an expense,
    /// - or [Error::Store] if the underlying update fails.
    fn update(&mut self, id: DatabaseID, update: &ExpenseUpdate) -> Result<Expense, Error>;

    /// Remove the expense with `id`.
    ///
    /// # Errors
    /// This function will return:
    /// - [Error::NotFound] if no row was affected,
    /// - or [Error::Store] if the underlying delete fails.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// The count and rounded amount total per category present in the data,
    /// ordered by category, followed by one synthetic
    /// [TOTAL](common::TOTAL_CATEGORY) row aggregating across all rows.
    ///
    /// Categories with no expenses are absent, not zero-filled. An empty
    /// store yields a single all-zero total row.
    ///
    /// # Errors
    /// Returns an [Error::Store] if the underlying query fails.
    fn summary(&self) -> Result<Vec<CategorySummary>, Error>;
}
