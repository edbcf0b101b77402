//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookSearchQuery, CreateBook, FilterOptions, SearchSuggestions, UpdateBook,
    },
};

use super::{CreatedResponse, MessageResponse};

#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_books().await?;
    Ok(Json(books))
}

/// Search books by title, author, ISBN or category
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Missing search query")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Book>>> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let books = state.services.books.search_books(&query).await?;
    Ok(Json(books))
}

/// Advanced search with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/books/advanced-search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Filtered books", body = Vec<Book>)
    )
)]
pub async fn advanced_search(
    State(state): State<crate::AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.advanced_search(&query).await?;
    Ok(Json(books))
}

/// Autocomplete suggestions; queries under two characters return empty sets
#[utoipa::path(
    get,
    path = "/books/suggestions",
    tag = "books",
    params(SearchParams),
    responses(
        (status = 200, description = "Suggestions grouped by column", body = SearchSuggestions)
    )
)]
pub async fn suggestions(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchSuggestions>> {
    let suggestions = state
        .services
        .books
        .suggestions(params.q.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(suggestions))
}

/// Distinct filter values for the advanced-search form
#[utoipa::path(
    get,
    path = "/books/filter-options",
    tag = "books",
    responses(
        (status = 200, description = "Available filter values", body = FilterOptions)
    )
)]
pub async fn filter_options(
    State(state): State<crate::AppState>,
) -> AppResult<Json<FilterOptions>> {
    let options = state.services.books.filter_options().await?;
    Ok(Json(options))
}

/// Get a single book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = CreatedResponse),
        (status = 400, description = "Missing fields or duplicate ISBN")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state.services.books.create_book(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: book.id,
            message: "Book created successfully".to_string(),
        }),
    ))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.services.books.update_book(id, request).await?;

    Ok(Json(MessageResponse {
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book (loan history is removed by the cascade)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete_book(id).await?;

    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
