//! The client-side wrapper around the expense API.
//!
//! Each function wraps one server endpoint and splits failures into
//! application errors (the server answered with a non-2xx status and an
//! error envelope) and transport errors (the request never got a response).
//! Calls are not retried and carry no timeout: a hung request hangs.

use common::{
    CategoriesResponse, CategorySummary, DatabaseID, DeleteResponse, ErrorBody, ErrorResponse,
    Expense, ExpenseDraft, ExpenseListResponse, ExpenseResponse, SummaryResponse,
};
use gloo_net::http::{Request, Response};

const EXPENSES_URL: &str = "/api/expenses";

/// A failed API call, as seen by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server responded with an error envelope.
    Api(ErrorBody),
    /// The request failed before any response was obtained, e.g. the
    /// network dropped or the server is unreachable.
    Network(String),
}

impl ApiError {
    /// A short human-readable description for the message area.
    pub fn message(&self) -> String {
        match self {
            ApiError::Api(body) => {
                let field_errors = body.field_errors();
                if field_errors.is_empty() {
                    body.message.clone()
                } else {
                    field_errors
                        .iter()
                        .map(|error| error.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ")
                }
            }
            ApiError::Network(_) => "Network error, please check your connection".to_string(),
        }
    }
}

/// The optional criteria for a listing request. Mirrors the server's query
/// parameters, including the quirk that the amount bounds only filter when
/// both are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub category: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

/// Fetch the expenses matching `filter`.
pub async fn list_expenses(filter: &ListFilter) -> Result<Vec<Expense>, ApiError> {
    let mut query = Vec::new();

    if let Some(category) = &filter.category {
        query.push(("category", category.clone()));
    }
    if let Some(min_amount) = filter.min_amount {
        query.push(("minAmount", min_amount.to_string()));
    }
    if let Some(max_amount) = filter.max_amount {
        query.push(("maxAmount", max_amount.to_string()));
    }

    let request = Request::get(EXPENSES_URL)
        .query(query.iter().map(|(key, value)| (*key, value.as_str())));

    let response = request.send().await.map_err(network_error)?;
    let body: ExpenseListResponse = decode(response).await?;

    Ok(body.data)
}

/// Fetch the fixed category list.
pub async fn get_categories() -> Result<Vec<String>, ApiError> {
    let response = Request::get(&format!("{EXPENSES_URL}/categories"))
        .send()
        .await
        .map_err(network_error)?;
    let body: CategoriesResponse = decode(response).await?;

    Ok(body.data)
}

/// Fetch the per-category summary, including the grand-total row.
pub async fn get_summary() -> Result<Vec<CategorySummary>, ApiError> {
    let response = Request::get(&format!("{EXPENSES_URL}/summary"))
        .send()
        .await
        .map_err(network_error)?;
    let body: SummaryResponse = decode(response).await?;

    Ok(body.data)
}

/// Create a new expense from `draft` and return the stored record.
pub async fn create_expense(draft: &ExpenseDraft) -> Result<Expense, ApiError> {
    let response = Request::post(EXPENSES_URL)
        .json(draft)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;
    let body: ExpenseResponse = decode(response).await?;

    Ok(body.data)
}

/// Apply the fields in `draft` to the expense with `id` and return the
/// updated record.
pub async fn update_expense(id: DatabaseID, draft: &ExpenseDraft) -> Result<Expense, ApiError> {
    let response = Request::put(&format!("{EXPENSES_URL}/{id}"))
        .json(draft)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;
    let body: ExpenseResponse = decode(response).await?;

    Ok(body.data)
}

/// Delete the expense with `id`.
pub async fn delete_expense(id: DatabaseID) -> Result<DatabaseID, ApiError> {
    let response = Request::delete(&format!("{EXPENSES_URL}/{id}"))
        .send()
        .await
        .map_err(network_error)?;
    let body: DeleteResponse = decode(response).await?;

    Ok(body.deleted_id)
}

fn network_error(error: gloo_net::Error) -> ApiError {
    ApiError::Network(error.to_string())
}

/// Decode a response: a 2xx body parses as the success envelope, anything
/// else parses as the error envelope.
async fn decode<T>(response: Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    if response.ok() {
        response.json::<T>().await.map_err(network_error)
    } else {
        let error = match response.json::<ErrorResponse>().await {
            Ok(body) => ApiError::Api(body.error),
            // A non-2xx response that is not our envelope, e.g. a proxy
            // error page.
            Err(_) => ApiError::Api(ErrorBody {
                code: "INTERNAL_SERVER_ERROR".to_string(),
                message: format!("Request failed with status {}", response.status()),
                details: None,
            }),
        };

        Err(error)
    }
}
