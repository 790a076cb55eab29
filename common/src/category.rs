//! The fixed set of expense categories.

/// The categories an expense may belong to.
///
/// The set is fixed: there is no user-defined category management, and
/// matching is case-sensitive.
pub const CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

/// Whether `name` is an exact, case-sensitive match for one of [CATEGORIES].
pub fn is_valid_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

/// The category names joined as `"Food, Transport, ..."`.
///
/// Used verbatim in the category validation message so the server and the
/// browser client always present the same list.
pub fn category_list() -> String {
    CATEGORIES.join(", ")
}
