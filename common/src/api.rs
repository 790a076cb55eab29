//! The JSON envelopes exchanged between the REST backend and the client.
//!
//! Every response is wrapped: successes carry `success: true` plus the
//! payload, failures carry `success: false` plus a coded error body. Keeping
//! these types here lets the backend serialize and the frontend deserialize
//! the exact same shapes.

use serde::{Deserialize, Serialize};

use crate::{expense::Expense, validation::FieldError, DatabaseID};

/// The category name of the synthetic grand-total row in summaries.
pub const TOTAL_CATEGORY: &str = "TOTAL";

/// Envelope for `GET /api/expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub success: bool,
    pub data: Vec<Expense>,
    pub count: usize,
}

/// Envelope for endpoints returning a single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub success: bool,
    pub data: Expense,
}

/// Envelope for `GET /api/expenses/categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub data: Vec<String>,
}

/// One row of the per-category summary.
///
/// The rounded total and count per category present in the data, plus a
/// final row with category [TOTAL_CATEGORY] aggregating across all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
    #[serde(rename = "categoryTotal")]
    pub category_total: f64,
}

/// Envelope for `GET /api/expenses/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub data: Vec<CategorySummary>,
}

/// Envelope for `DELETE /api/expenses/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(rename = "deletedId")]
    pub deleted_id: DatabaseID,
}

/// The error half of the envelope: `{code, message, details?}`.
///
/// `details` carries the per-field messages for validation failures and is
/// omitted entirely when there is nothing to add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The field errors in `details`, when the error is a validation failure.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.details
            .clone()
            .and_then(|details| serde_json::from_value(details).ok())
            .unwrap_or_default()
    }
}

/// Envelope for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}
