//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub category: String,
    pub publication_year: Option<i32>,
    pub copies_available: i32,
    pub total_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    pub publisher: Option<String>,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub publication_year: Option<i32>,
    /// Defaults to 1 when omitted
    pub copies_available: Option<i32>,
    /// Defaults to 1 when omitted
    pub total_copies: Option<i32>,
}

/// Update book request (full replacement, as served by PUT)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    pub publisher: Option<String>,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub publication_year: Option<i32>,
    pub copies_available: i32,
    pub total_copies: i32,
}

/// Sortable columns for the advanced book search.
///
/// This is the whitelist for anything interpolated into ORDER BY; query
/// values outside it fall back to the default rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookSortBy {
    Title,
    Author,
    PublicationYear,
    Category,
    CopiesAvailable,
}

impl BookSortBy {
    /// Map a raw query parameter onto the whitelist, defaulting to title.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("author") => BookSortBy::Author,
            Some("publication_year") => BookSortBy::PublicationYear,
            Some("category") => BookSortBy::Category,
            Some("copies_available") => BookSortBy::CopiesAvailable,
            _ => BookSortBy::Title,
        }
    }

    pub fn as_column(&self) -> &'static str {
        match self {
            BookSortBy::Title => "title",
            BookSortBy::Author => "author",
            BookSortBy::PublicationYear => "publication_year",
            BookSortBy::Category => "category",
            BookSortBy::CopiesAvailable => "copies_available",
        }
    }
}

/// Sort direction, whitelisted before interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Availability filter for the advanced book search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// copies_available > 0
    Available,
    /// copies_available = 0
    Borrowed,
    All,
}

impl Availability {
    /// Map a raw query parameter onto the filter, ignoring unknown values.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("available") => Availability::Available,
            Some("borrowed") => Availability::Borrowed,
            _ => Availability::All,
        }
    }
}

/// Query parameters for GET /books/advanced-search
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookSearchQuery {
    /// Free-text match across title, author, isbn, category and publisher
    pub search: Option<String>,
    /// Exact category filter
    pub category: Option<String>,
    /// Exact author filter
    pub author: Option<String>,
    /// Exact publisher filter
    pub publisher: Option<String>,
    /// Lower bound on publication year (inclusive)
    pub year_from: Option<i32>,
    /// Upper bound on publication year (inclusive)
    pub year_to: Option<i32>,
    /// available, borrowed or all; unknown values are ignored
    pub availability: Option<String>,
    /// Sort column; unknown values fall back to title
    pub sort_by: Option<String>,
    /// asc or desc; unknown values fall back to asc
    pub sort_order: Option<String>,
    /// Page size, capped at 100 (default 50)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Hard cap on advanced-search page size
pub const MAX_SEARCH_LIMIT: i64 = 100;

impl BookSearchQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, MAX_SEARCH_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Autocomplete suggestions grouped by column
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SearchSuggestions {
    pub titles: Vec<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
}

/// Distinct values offered as advanced-search filters
#[derive(Debug, Serialize, ToSchema)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub year_range: YearRange,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct YearRange {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_field_falls_back_to_title() {
        assert_eq!(BookSortBy::from_param(None), BookSortBy::Title);
        assert_eq!(
            BookSortBy::from_param(Some("id; DROP TABLE books")),
            BookSortBy::Title
        );
        assert_eq!(
            BookSortBy::from_param(Some("copies_available")),
            BookSortBy::CopiesAvailable
        );
    }

    #[test]
    fn sort_order_defaults_to_asc() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
    }

    #[test]
    fn unknown_availability_is_ignored() {
        assert_eq!(Availability::from_param(None), Availability::All);
        assert_eq!(
            Availability::from_param(Some("available")),
            Availability::Available
        );
        assert_eq!(
            Availability::from_param(Some("misplaced")),
            Availability::All
        );
    }

    #[test]
    fn limit_is_capped() {
        let query = BookSearchQuery {
            limit: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), MAX_SEARCH_LIMIT);

        let query = BookSearchQuery::default();
        assert_eq!(query.effective_limit(), 50);
        assert_eq!(query.effective_offset(), 0);
    }
}
