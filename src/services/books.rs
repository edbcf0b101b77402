//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookSearchQuery, CreateBook, FilterOptions, SearchSuggestions, UpdateBook,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.find_all().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book, rejecting duplicate ISBNs up front
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let copies_available = book.copies_available.unwrap_or(1);
        let total_copies = book.total_copies.unwrap_or(1);
        if copies_available < 0 || total_copies < 1 {
            return Err(AppError::Validation(
                "Copy counts must not be negative".to_string(),
            ));
        }
        if copies_available > total_copies {
            return Err(AppError::Validation(
                "copies_available cannot exceed total_copies".to_string(),
            ));
        }
        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists".to_string(),
            ));
        }
        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        if book.copies_available < 0 || book.total_copies < 1 {
            return Err(AppError::Validation(
                "Copy counts must not be negative".to_string(),
            ));
        }
        if book.copies_available > book.total_copies {
            return Err(AppError::Validation(
                "copies_available cannot exceed total_copies".to_string(),
            ));
        }
        if self.repository.books.isbn_exists(&book.isbn, Some(id)).await? {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists".to_string(),
            ));
        }
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    pub async fn advanced_search(&self, query: &BookSearchQuery) -> AppResult<Vec<Book>> {
        self.repository.books.advanced_search(query).await
    }

    pub async fn suggestions(&self, query: &str) -> AppResult<SearchSuggestions> {
        self.repository.books.suggestions(query).await
    }

    pub async fn filter_options(&self) -> AppResult<FilterOptions> {
        self.repository.books.filter_options().await
    }
}
