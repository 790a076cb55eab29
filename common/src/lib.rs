//! Types and rules shared between the expense tracker's REST backend and its
//! browser client.
//!
//! The backend compiles this crate natively and the frontend compiles it to
//! wasm, so the sanitization and validation applied in the browser are the
//! exact same functions that guard the server.

mod api;
mod category;
mod expense;
mod validation;

pub use api::{
    CategoriesResponse, CategorySummary, DeleteResponse, ErrorBody, ErrorResponse,
    ExpenseListResponse, ExpenseResponse, SummaryResponse, TOTAL_CATEGORY,
};
pub use category::{category_list, is_valid_category, CATEGORIES};
pub use expense::{Expense, ExpenseDraft, NewExpense, RawAmount};
pub use validation::{sanitize, validate, FieldError, SanitizedExpense, ValidationResult};

/// An alias for the integer type used for database primary keys.
pub type DatabaseID = i64;
