use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::DatabaseID;

/// A single expense record, i.e. an event where money was spent.
///
/// Instances come from the store: `id` and `created_at` are assigned at
/// insertion and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: DatabaseID,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The data for creating a new expense, with canonical field types.
///
/// Produced from a [SanitizedExpense](crate::SanitizedExpense) that has
/// passed validation; the store fills in `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

impl NewExpense {
    /// Convert a sanitized candidate into the typed record the store inserts.
    ///
    /// Returns `None` when a required field is absent or unparseable, which
    /// cannot happen for a candidate that passed
    /// [validate](crate::validate); callers check validity first and treat
    /// `None` as a validation failure.
    pub fn from_sanitized(candidate: &crate::SanitizedExpense) -> Option<Self> {
        let date = NaiveDate::parse_from_str(candidate.date.as_deref()?, "%Y-%m-%d").ok()?;
        let amount = candidate.amount.filter(|amount| amount.is_finite())?;

        Some(Self {
            date,
            amount,
            category: candidate.category.clone()?,
            description: candidate.description.clone(),
        })
    }
}

/// An amount as it arrives off the wire, before sanitization.
///
/// Clients may send the amount either as a JSON number or as the raw text of
/// an input field (`42.5` or `"42.50"`); both forms are accepted and coerced
/// by the sanitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// A candidate expense as submitted by a client, before sanitization and
/// validation.
///
/// Every field is optional so the same type serves both creation payloads
/// (where missing required fields become validation errors) and partial
/// update payloads (where a missing field means "leave unchanged").
///
/// `description` is a double `Option` so a partial update can distinguish
/// "not supplied" (`None`) from "explicitly cleared" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<RawAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub description: Option<Option<String>>,
}

impl ExpenseDraft {
    /// Whether the draft supplies none of the updatable fields.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Deserializes a field that was present in the payload as `Some(value)`,
/// where `value` itself may be JSON `null`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
