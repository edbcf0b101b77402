//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Availability, Book, BookSearchQuery, BookSortBy, CreateBook, FilterOptions,
        SearchSuggestions, SortOrder, UpdateBook, YearRange,
    },
};

/// Minimum query length for autocomplete suggestions; shorter inputs get an
/// empty result instead of a broad scan.
const SUGGESTION_MIN_QUERY_LEN: usize = 2;
const SUGGESTION_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books
    pub async fn find_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Check if ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (
                isbn, title, author, publisher, category, publication_year,
                copies_available, total_copies
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(book.copies_available.unwrap_or(1))
        .bind(book.total_copies.unwrap_or(1))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "A book with this ISBN already exists"))?;

        self.get_by_id(id).await
    }

    /// Update an existing book (full replacement)
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                isbn = $1, title = $2, author = $3, publisher = $4,
                category = $5, publication_year = $6,
                copies_available = $7, total_copies = $8,
                updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.category)
        .bind(book.publication_year)
        .bind(book.copies_available)
        .bind(book.total_copies)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "A book with this ISBN already exists"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete a book; loans referencing it are removed by the cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Simple substring search over title, author, isbn and category
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", query);
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1 OR category ILIKE $1
            ORDER BY title
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Advanced search with filters, whitelisted sorting and pagination.
    ///
    /// All values are bound parameters; the only interpolated fragments are
    /// the sort column and direction, which come from the whitelist enums.
    pub async fn advanced_search(&self, query: &BookSearchQuery) -> AppResult<Vec<Book>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();
        let mut year_params: Vec<i32> = Vec::new();

        if let Some(ref search) = query.search {
            let term = search.trim();
            if !term.is_empty() {
                params.push(format!("%{}%", term));
                let n = params.len();
                conditions.push(format!(
                    "(title ILIKE ${n} OR author ILIKE ${n} OR isbn ILIKE ${n} \
                     OR category ILIKE ${n} OR publisher ILIKE ${n})"
                ));
            }
        }

        if let Some(ref category) = query.category {
            params.push(category.trim().to_string());
            conditions.push(format!("category = ${}", params.len()));
        }

        if let Some(ref author) = query.author {
            params.push(author.trim().to_string());
            conditions.push(format!("author = ${}", params.len()));
        }

        if let Some(ref publisher) = query.publisher {
            params.push(publisher.trim().to_string());
            conditions.push(format!("publisher = ${}", params.len()));
        }

        if let Some(year_from) = query.year_from {
            year_params.push(year_from);
            conditions.push(format!(
                "publication_year >= ${}",
                params.len() + year_params.len()
            ));
        }

        if let Some(year_to) = query.year_to {
            year_params.push(year_to);
            conditions.push(format!(
                "publication_year <= ${}",
                params.len() + year_params.len()
            ));
        }

        match Availability::from_param(query.availability.as_deref()) {
            Availability::Available => conditions.push("copies_available > 0".to_string()),
            Availability::Borrowed => conditions.push("copies_available = 0".to_string()),
            Availability::All => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sort_by = BookSortBy::from_param(query.sort_by.as_deref());
        let sort_order = SortOrder::from_param(query.sort_order.as_deref());

        let select_query = format!(
            "SELECT * FROM books {} ORDER BY {} {} LIMIT {} OFFSET {}",
            where_clause,
            sort_by.as_column(),
            sort_order.as_sql(),
            query.effective_limit(),
            query.effective_offset(),
        );

        let mut builder = sqlx::query_as::<_, Book>(&select_query);
        for param in &params {
            builder = builder.bind(param);
        }
        for param in &year_params {
            builder = builder.bind(param);
        }

        let books = builder.fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Autocomplete suggestions for titles, authors and categories.
    /// Queries shorter than two characters return empty sets.
    pub async fn suggestions(&self, query: &str) -> AppResult<SearchSuggestions> {
        if query.trim().chars().count() < SUGGESTION_MIN_QUERY_LEN {
            return Ok(SearchSuggestions::default());
        }

        let pattern = format!("%{}%", query.trim());

        let titles: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT title FROM books WHERE title ILIKE $1 ORDER BY title LIMIT $2",
        )
        .bind(&pattern)
        .bind(SUGGESTION_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let authors: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT author FROM books WHERE author ILIKE $1 ORDER BY author LIMIT $2",
        )
        .bind(&pattern)
        .bind(SUGGESTION_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM books WHERE category ILIKE $1 ORDER BY category LIMIT $2",
        )
        .bind(&pattern)
        .bind(SUGGESTION_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(SearchSuggestions {
            titles,
            authors,
            categories,
        })
    }

    /// Distinct filter values for the advanced-search form
    pub async fn filter_options(&self) -> AppResult<FilterOptions> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM books ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        let authors: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT author FROM books ORDER BY author")
                .fetch_all(&self.pool)
                .await?;

        let publishers: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT publisher FROM books WHERE publisher IS NOT NULL ORDER BY publisher",
        )
        .fetch_all(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT MIN(publication_year) as min_year, MAX(publication_year) as max_year FROM books",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(FilterOptions {
            categories,
            authors,
            publishers,
            year_range: YearRange {
                min_year: row.get("min_year"),
                max_year: row.get("max_year"),
            },
        })
    }
}
