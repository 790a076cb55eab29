//! Sanitization and validation of candidate expense records.
//!
//! Both run on the server for every create and update, and in the browser
//! before a request is sent. [validate] checks every field rule independently
//! so a single submission surfaces all of its errors at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    category::{category_list, is_valid_category},
    expense::{Expense, ExpenseDraft, RawAmount},
};

/// A validation failure scoped to a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The outcome of validating a sanitized expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

/// A candidate expense with canonical field types, ready for validation.
///
/// `amount` keeps `f64::NAN` as the marker for text that failed numeric
/// coercion, which the validator reports as a non-numeric amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedExpense {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl SanitizedExpense {
    /// Overlay the fields supplied by `draft` onto `existing` and sanitize
    /// the combined record.
    ///
    /// Partial updates go through here so they are validated as complete
    /// records: an update that would leave a previously valid record in
    /// violation of a rule is rejected even when the violating field was not
    /// part of the update payload.
    pub fn merged(existing: &Expense, draft: &ExpenseDraft) -> Self {
        let merged_draft = ExpenseDraft {
            date: draft
                .date
                .clone()
                .or_else(|| Some(existing.date.format("%Y-%m-%d").to_string())),
            amount: draft
                .amount
                .clone()
                .or(Some(RawAmount::Number(existing.amount))),
            category: draft
                .category
                .clone()
                .or_else(|| Some(existing.category.clone())),
            description: draft
                .description
                .clone()
                .or_else(|| Some(existing.description.clone())),
        };

        sanitize(&merged_draft)
    }
}

/// Normalize a raw draft into canonical field types.
///
/// String fields are trimmed and empty strings are treated as absent. The
/// amount is coerced to `f64`; text that does not parse as a number becomes
/// `f64::NAN` so the validator can report it.
pub fn sanitize(draft: &ExpenseDraft) -> SanitizedExpense {
    SanitizedExpense {
        date: trim_to_option(draft.date.as_deref()),
        amount: draft.amount.as_ref().and_then(coerce_amount),
        category: trim_to_option(draft.category.as_deref()),
        description: draft
            .description
            .as_ref()
            .and_then(|inner| trim_to_option(inner.as_deref())),
    }
}

fn trim_to_option(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn coerce_amount(raw: &RawAmount) -> Option<f64> {
    match raw {
        RawAmount::Number(value) => Some(*value),
        RawAmount::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.parse().unwrap_or(f64::NAN))
            }
        }
    }
}

/// The largest amount a single expense may have.
pub const MAX_AMOUNT: f64 = 999_999.0;

/// The longest description a single expense may have, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Check a sanitized expense against the field rules.
///
/// `today` is the current calendar date from the caller's clock, normalized
/// to a date-only value so the future-date check cannot trip on
/// time-of-day skew between client and server.
///
/// Every rule is evaluated, never short-circuited across fields, and the
/// errors come back ordered date, amount, category, description. This
/// function never fails: an unvalidatable record is a result, not an error.
pub fn validate(candidate: &SanitizedExpense, today: NaiveDate) -> ValidationResult {
    let mut errors = Vec::new();

    match &candidate.date {
        None => errors.push(FieldError::new("date", "Date is required")),
        Some(text) => match parse_strict_date(text) {
            None => errors.push(FieldError::new(
                "date",
                "Date must be a valid date in YYYY-MM-DD format",
            )),
            Some(date) if date > today => {
                errors.push(FieldError::new("date", "Date cannot be in the future"))
            }
            Some(_) => {}
        },
    }

    match candidate.amount {
        None => errors.push(FieldError::new("amount", "Amount is required")),
        Some(amount) if !amount.is_finite() => {
            errors.push(FieldError::new("amount", "Amount must be a valid number"))
        }
        Some(amount) if amount <= 0.0 => {
            errors.push(FieldError::new("amount", "Amount must be greater than 0"))
        }
        Some(amount) if amount > MAX_AMOUNT => {
            errors.push(FieldError::new("amount", "Amount must not exceed 999999"))
        }
        Some(_) => {}
    }

    match &candidate.category {
        None => errors.push(FieldError::new("category", "Category is required")),
        Some(category) if !is_valid_category(category) => errors.push(FieldError::new(
            "category",
            format!("Category must be one of: {}", category_list()),
        )),
        Some(_) => {}
    }

    if let Some(description) = &candidate.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(FieldError::new(
                "description",
                "Description must not exceed 255 characters",
            ));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Parse `text` as a calendar date, accepting only the exact `YYYY-MM-DD`
/// shape (four digits, dash, two digits, dash, two digits).
fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();

    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());

    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod sanitize_tests {
    use super::{sanitize, ExpenseDraft, RawAmount};

    #[test]
    fn trims_string_fields() {
        let draft = ExpenseDraft {
            date: Some("  2024-01-15  ".to_string()),
            amount: None,
            category: Some(" Food ".to_string()),
            description: Some(Some("  coffee  ".to_string())),
        };

        let sanitized = sanitize(&draft);

        assert_eq!(sanitized.date.as_deref(), Some("2024-01-15"));
        assert_eq!(sanitized.category.as_deref(), Some("Food"));
        assert_eq!(sanitized.description.as_deref(), Some("coffee"));
    }

    #[test]
    fn coerces_amount_text_to_number() {
        let draft = ExpenseDraft {
            amount: Some(RawAmount::Text("42.50".to_string())),
            ..Default::default()
        };

        assert_eq!(sanitize(&draft).amount, Some(42.5));
    }

    #[test]
    fn non_numeric_amount_becomes_nan() {
        let draft = ExpenseDraft {
            amount: Some(RawAmount::Text("a lot".to_string())),
            ..Default::default()
        };

        let amount = sanitize(&draft).amount.unwrap();
        assert!(amount.is_nan());
    }

    #[test]
    fn empty_amount_text_is_absent() {
        let draft = ExpenseDraft {
            amount: Some(RawAmount::Text("   ".to_string())),
            ..Default::default()
        };

        assert_eq!(sanitize(&draft).amount, None);
    }

    #[test]
    fn empty_description_becomes_none() {
        let draft = ExpenseDraft {
            description: Some(Some("   ".to_string())),
            ..Default::default()
        };

        assert_eq!(sanitize(&draft).description, None);
    }
}

#[cfg(test)]
mod validate_tests {
    use chrono::NaiveDate;

    use super::{sanitize, validate, ExpenseDraft, SanitizedExpense};
    use crate::expense::Expense;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_candidate() -> SanitizedExpense {
        SanitizedExpense {
            date: Some("2024-01-15".to_string()),
            amount: Some(42.5),
            category: Some("Food".to_string()),
            description: Some("coffee".to_string()),
        }
    }

    #[test]
    fn accepts_valid_record() {
        let result = validate(&valid_candidate(), today());

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn accepts_record_without_description() {
        let candidate = SanitizedExpense {
            description: None,
            ..valid_candidate()
        };

        assert!(validate(&candidate, today()).is_valid);
    }

    #[test]
    fn rejects_missing_date() {
        let candidate = SanitizedExpense {
            date: None,
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "date");
        assert_eq!(result.errors[0].message, "Date is required");
    }

    #[test]
    fn rejects_malformed_date() {
        for bad_date in ["15/01/2024", "2024-1-5", "2024-13-01", "2024-02-30", "yesterday"] {
            let candidate = SanitizedExpense {
                date: Some(bad_date.to_string()),
                ..valid_candidate()
            };

            let result = validate(&candidate, today());

            assert!(!result.is_valid, "{bad_date} should be rejected");
            assert_eq!(result.errors[0].field, "date");
            assert_eq!(
                result.errors[0].message,
                "Date must be a valid date in YYYY-MM-DD format"
            );
        }
    }

    #[test]
    fn rejects_future_date() {
        let candidate = SanitizedExpense {
            date: Some("2024-06-02".to_string()),
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert!(!result.is_valid);
        assert_eq!(result.errors[0].message, "Date cannot be in the future");
    }

    #[test]
    fn accepts_date_equal_to_today() {
        let candidate = SanitizedExpense {
            date: Some("2024-06-01".to_string()),
            ..valid_candidate()
        };

        assert!(validate(&candidate, today()).is_valid);
    }

    #[test]
    fn rejects_missing_amount() {
        let candidate = SanitizedExpense {
            amount: None,
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert_eq!(result.errors[0].field, "amount");
        assert_eq!(result.errors[0].message, "Amount is required");
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let candidate = SanitizedExpense {
            amount: Some(f64::NAN),
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert_eq!(result.errors[0].message, "Amount must be a valid number");
    }

    #[test]
    fn rejects_amount_out_of_range() {
        for (amount, message) in [
            (0.0, "Amount must be greater than 0"),
            (-1.0, "Amount must be greater than 0"),
            (999_999.01, "Amount must not exceed 999999"),
        ] {
            let candidate = SanitizedExpense {
                amount: Some(amount),
                ..valid_candidate()
            };

            let result = validate(&candidate, today());

            assert!(!result.is_valid, "{amount} should be rejected");
            assert_eq!(result.errors[0].message, message);
        }
    }

    #[test]
    fn accepts_amount_at_upper_bound() {
        let candidate = SanitizedExpense {
            amount: Some(999_999.0),
            ..valid_candidate()
        };

        assert!(validate(&candidate, today()).is_valid);
    }

    #[test]
    fn rejects_unknown_category_with_full_list() {
        let candidate = SanitizedExpense {
            category: Some("food".to_string()),
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert_eq!(result.errors[0].field, "category");
        assert_eq!(
            result.errors[0].message,
            "Category must be one of: Food, Transport, Entertainment, Utilities, Healthcare, Shopping, Other"
        );
    }

    #[test]
    fn rejects_overlong_description() {
        let candidate = SanitizedExpense {
            description: Some("x".repeat(256)),
            ..valid_candidate()
        };

        let result = validate(&candidate, today());

        assert_eq!(result.errors[0].field, "description");
        assert_eq!(
            result.errors[0].message,
            "Description must not exceed 255 characters"
        );
    }

    #[test]
    fn accepts_description_at_length_limit() {
        let candidate = SanitizedExpense {
            description: Some("é".repeat(255)),
            ..valid_candidate()
        };

        assert!(validate(&candidate, today()).is_valid);
    }

    #[test]
    fn reports_all_field_errors_at_once() {
        let candidate = SanitizedExpense {
            date: None,
            amount: Some(-5.0),
            category: Some("Snacks".to_string()),
            description: Some("x".repeat(300)),
        };

        let result = validate(&candidate, today());

        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["date", "amount", "category", "description"]);
    }

    #[test]
    fn merged_update_is_validated_as_a_complete_record() {
        let existing = Expense {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: 42.5,
            category: "Food".to_string(),
            description: Some("coffee".to_string()),
            created_at: chrono::DateTime::UNIX_EPOCH,
        };

        // The payload only touches the amount, but the merged record keeps
        // the rest of the stored fields so they are re-checked too.
        let draft: ExpenseDraft = serde_json::from_str(r#"{"amount": "19.99"}"#).unwrap();
        let merged = SanitizedExpense::merged(&existing, &draft);

        assert_eq!(merged.date.as_deref(), Some("2024-01-15"));
        assert_eq!(merged.amount, Some(19.99));
        assert_eq!(merged.category.as_deref(), Some("Food"));
        assert_eq!(merged.description.as_deref(), Some("coffee"));
        assert!(validate(&merged, today()).is_valid);
    }

    #[test]
    fn merged_update_can_clear_the_description() {
        let existing = Expense {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: 42.5,
            category: "Food".to_string(),
            description: Some("coffee".to_string()),
            created_at: chrono::DateTime::UNIX_EPOCH,
        };

        let draft: ExpenseDraft = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let merged = SanitizedExpense::merged(&existing, &draft);

        assert_eq!(merged.description, None);
    }

    #[test]
    fn merged_update_rejects_stale_invalid_fields() {
        // A record stored before the rules changed (or corrupted out of
        // band) must not survive a partial update that leaves the bad field
        // untouched.
        let existing = Expense {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: 42.5,
            category: "Snacks".to_string(),
            description: None,
            created_at: chrono::DateTime::UNIX_EPOCH,
        };

        let draft: ExpenseDraft = serde_json::from_str(r#"{"amount": 10}"#).unwrap();
        let merged = SanitizedExpense::merged(&existing, &draft);
        let result = validate(&merged, today());

        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "category");
    }

    #[test]
    fn sanitize_then_validate_accepts_text_amount() {
        let draft: ExpenseDraft = serde_json::from_str(
            r#"{"date": "2024-01-15", "amount": "42.50", "category": "Food"}"#,
        )
        .unwrap();

        let result = validate(&sanitize(&draft), today());

        assert!(result.is_valid);
    }
}
