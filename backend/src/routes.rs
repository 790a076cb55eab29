//! Application router configuration and server state.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::{
    endpoints,
    expense::{
        create_expense, delete_expense, get_categories, get_expenses, get_summary,
        update_expense,
    },
    stores::ExpenseStore,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<E>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    /// The store for persisting [expenses](common::Expense).
    pub expense_store: E,
}

impl<E> AppState<E>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(expense_store: E) -> Self {
        Self { expense_store }
    }
}

/// Return a router with all the app's routes.
pub fn build_router<E>(state: AppState<E>) -> Router
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(get_expenses::<E>).post(create_expense::<E>),
        )
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(endpoints::SUMMARY, get(get_summary::<E>))
        .route(
            endpoints::EXPENSE,
            axum::routing::put(update_expense::<E>).delete(delete_expense::<E>),
        )
        .fallback(get_unmatched_route)
        .with_state(state)
}

/// The handler for any route the router does not know, returning the same
/// JSON envelope shape as every other failure.
async fn get_unmatched_route() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": {
                "code": "NOT_FOUND",
                "message": "The requested resource could not be found.",
            },
        })),
    )
}
