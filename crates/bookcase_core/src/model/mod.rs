//! Catalog entity types.
//!
//! Every field setter normalizes its input instead of rejecting it: blank
//! names fall back to a default, negative numbers clamp to zero and scores
//! outside `[0, 5]` become zero. Each kind comes with a draft type (the
//! arguments of `create`) and a patch type (the arguments of `update`, one
//! optional field per mutable attribute).

mod book;
mod category;
mod review;
mod shelf;
mod user;

pub use book::{Book, BookPatch, NewBook, DEFAULT_AUTHOR, DEFAULT_BOOK_NAME, DEFAULT_PUBLISHER};
pub use category::{Category, CategoryPatch, NewCategory, DEFAULT_CATEGORY_NAME};
pub use review::{AuthorRef, Review, ReviewBuilder, ReviewPatch, MAX_SCORE, MIN_SCORE};
pub use shelf::{NewShelf, Shelf, ShelfPatch};
pub use user::{NewUser, User, UserPatch, DEFAULT_USERNAME};

/// Trims `value`, substituting `default` when the result is empty.
pub(crate) fn non_blank(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => default.to_string(),
    }
}

/// Trims `value`; absent input becomes the empty string.
pub(crate) fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Clamps a non-negative float; negative, NaN and absent values become zero.
pub(crate) fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v >= 0.0 && v.is_finite() => v,
        _ => 0.0,
    }
}

/// Clamps a count into `u32`; negative and absent values become zero.
pub(crate) fn count(value: Option<i64>) -> u32 {
    match value {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_defaults() {
        assert_eq!(non_blank(Some("  Dune  "), "x"), "Dune");
        assert_eq!(non_blank(Some("   "), "x"), "x");
        assert_eq!(non_blank(None, "x"), "x");
    }

    #[test]
    fn trimmed_allows_empty() {
        assert_eq!(trimmed(Some(" a ")), "a");
        assert_eq!(trimmed(Some("  ")), "");
        assert_eq!(trimmed(None), "");
    }

    #[test]
    fn non_negative_clamps() {
        assert_eq!(non_negative(Some(9.99)), 9.99);
        assert_eq!(non_negative(Some(-1.0)), 0.0);
        assert_eq!(non_negative(Some(f64::NAN)), 0.0);
        assert_eq!(non_negative(Some(f64::INFINITY)), 0.0);
        assert_eq!(non_negative(None), 0.0);
    }

    #[test]
    fn count_clamps() {
        assert_eq!(count(Some(320)), 320);
        assert_eq!(count(Some(-5)), 0);
        assert_eq!(count(None), 0);
        assert_eq!(count(Some(i64::MAX)), u32::MAX);
    }
}
