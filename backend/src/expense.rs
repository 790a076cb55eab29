//! Route handlers for the expense endpoints.
//!
//! Every write goes through the same pipeline: sanitize the raw payload,
//! validate it with the shared rules, then call the store and wrap the
//! outcome in the JSON envelope. Validation failures carry the full list of
//! field errors so a client can surface them all at once.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use common::{
    sanitize, validate, CategoriesResponse, DatabaseID, DeleteResponse, ExpenseDraft,
    ExpenseListResponse, ExpenseResponse, NewExpense, SanitizedExpense, SummaryResponse,
    CATEGORIES,
};

use crate::{
    routes::AppState,
    stores::{ExpenseFilter, ExpenseStore, ExpenseUpdate},
    Error,
};

/// The supported query parameters for the expense listing.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListParams {
    category: Option<String>,
    #[serde(rename = "minAmount")]
    min_amount: Option<f64>,
    #[serde(rename = "maxAmount")]
    max_amount: Option<f64>,
}

/// A route handler for listing expenses, optionally narrowed by category
/// and/or an amount range (applied only when both bounds are given).
pub async fn get_expenses<E>(
    State(state): State<AppState<E>>,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<ExpenseListResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    let filter = ExpenseFilter {
        category: params.category,
        min_amount: params.min_amount,
        max_amount: params.max_amount,
    };

    let data = state.expense_store.get_all(&filter)?;

    Ok(Json(ExpenseListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// A route handler for the fixed category list.
pub async fn get_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        success: true,
        data: CATEGORIES.iter().map(|name| name.to_string()).collect(),
    })
}

/// A route handler for the per-category summary.
pub async fn get_summary<E>(
    State(state): State<AppState<E>>,
) -> Result<Json<SummaryResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    let data = state.expense_store.summary()?;

    Ok(Json(SummaryResponse {
        success: true,
        data,
    }))
}

/// A route handler for creating a new expense.
///
/// The payload is sanitized and validated before it reaches the store;
/// an invalid record is rejected with the full list of field errors and no
/// store mutation.
pub async fn create_expense<E>(
    State(state): State<AppState<E>>,
    Json(draft): Json<ExpenseDraft>,
) -> Result<impl IntoResponse, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    let candidate = sanitize(&draft);
    let outcome = validate(&candidate, Utc::now().date_naive());

    match NewExpense::from_sanitized(&candidate) {
        Some(new_expense) if outcome.is_valid => {
            let mut store = state.expense_store;
            let data = store.create(new_expense)?;

            Ok((
                StatusCode::CREATED,
                Json(ExpenseResponse {
                    success: true,
                    data,
                }),
            ))
        }
        _ => Err(Error::Validation(outcome.errors)),
    }
}

/// A route handler for partially updating an expense.
///
/// The supplied fields are overlaid onto the stored record and the merged
/// result is re-validated in full, so an update that would leave a
/// previously valid record in violation of a rule is rejected even if the
/// violating field was not part of the payload.
///
/// The existence check and the update are separate statements; a concurrent
/// delete of the same id between them surfaces as a 404 from the update.
pub async fn update_expense<E>(
    State(state): State<AppState<E>>,
    Path(id): Path<DatabaseID>,
    Json(draft): Json<ExpenseDraft>,
) -> Result<Json<ExpenseResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    let mut store = state.expense_store;

    let existing = store.get(id)?.ok_or(Error::NotFound)?;

    let merged = SanitizedExpense::merged(&existing, &draft);
    let outcome = validate(&merged, Utc::now().date_naive());
    if !outcome.is_valid {
        return Err(Error::Validation(outcome.errors));
    }

    let data = store.update(id, &ExpenseUpdate::from_draft(&draft))?;

    Ok(Json(ExpenseResponse {
        success: true,
        data,
    }))
}

/// A route handler for deleting an expense.
///
/// This function will return the status code 404 if the id does not refer
/// to an existing expense; a delete is never a silent no-op.
pub async fn delete_expense<E>(
    State(state): State<AppState<E>>,
    Path(id): Path<DatabaseID>,
) -> Result<Json<DeleteResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    let mut store = state.expense_store;
    store.delete(id)?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted_id: id,
    }))
}
