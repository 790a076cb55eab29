//! The paths for the API routes.

/// The expense collection: list (GET) and create (POST).
pub const EXPENSES: &str = "/api/expenses";

/// A single expense addressed by id: update (PUT) and delete (DELETE).
pub const EXPENSE: &str = "/api/expenses/:id";

/// The fixed list of expense categories.
pub const CATEGORIES: &str = "/api/expenses/categories";

/// The per-category summary with the grand-total row.
pub const SUMMARY: &str = "/api/expenses/summary";
