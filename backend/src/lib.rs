//! The REST backend for the expense tracker.
//!
//! Exposes a JSON API for creating, querying, updating and deleting expense
//! records backed by a single SQLite table, plus a per-category summary.
//! Request bodies are sanitized and validated with the rules from the
//! `common` crate before they reach the store.

#![warn(missing_docs)]

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_server::Handle;
use common::FieldError;
use serde_json::json;
use tokio::signal;

pub mod db;
pub mod endpoints;
mod expense;
mod routes;
pub mod stores;

pub use routes::{build_router, AppState};

/// The errors that may occur while handling an expense request.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The submitted record broke one or more field rules. Carries the full
    /// list so the client can surface every problem at once.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// An update payload supplied none of the updatable fields.
    #[error("no updatable fields were provided")]
    EmptyUpdate,

    /// The requested expense could not be found. For id-addressed
    /// operations the client should check that the id is correct and that
    /// the expense has not been deleted.
    #[error("the requested expense could not be found")]
    NotFound,

    /// An underlying store fault (I/O, constraint violation). Carries the
    /// name of the store operation that failed and the underlying message.
    /// Never retried.
    #[error("{operation} failed: {message}")]
    Store {
        /// The store operation that was executing when the fault occurred.
        operation: &'static str,
        /// The message reported by the storage layer.
        message: String,
    },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                error_body("VALIDATION_ERROR", "Validation failed", Some(json!(errors))),
            ),
            Error::EmptyUpdate => (
                StatusCode::BAD_REQUEST,
                error_body("VALIDATION_ERROR", "No updatable fields provided", None),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                error_body("NOT_FOUND", "Expense not found", None),
            ),
            Error::Store { .. } => {
                tracing::error!("{self}");

                // The underlying message is only exposed in debug builds.
                let details = cfg!(debug_assertions).then(|| json!(self.to_string()));

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("INTERNAL_SERVER_ERROR", "Internal server error", details),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(code: &str, message: &str, details: Option<serde_json::Value>) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message,
    });

    if let Some(details) = details {
        error["details"] = details;
    }

    json!({
        "success": false,
        "error": error,
    })
}

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
