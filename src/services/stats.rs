//! Dashboard statistics service

use crate::{api::stats::StatsResponse, error::AppResult, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counters, computed directly from current table contents.
    /// Every figure degrades to zero on empty tables.
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let total_members: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE membership_status = 'Active'",
        )
        .fetch_one(pool)
        .await?;

        let new_members_this_week: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE membership_date >= CURRENT_DATE - INTERVAL '7 days'",
        )
        .fetch_one(pool)
        .await?;

        let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;

        let categories_count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT category) FROM books")
                .fetch_one(pool)
                .await?;

        // Open loans; overdue is the derived subset past its due date
        let active_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_loans WHERE return_date IS NULL")
                .fetch_one(pool)
                .await?;

        let overdue_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_loans \
             WHERE return_date IS NULL AND due_date < CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let available_books: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(copies_available), 0) FROM books")
                .fetch_one(pool)
                .await?;

        let returned_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_loans WHERE return_date IS NOT NULL")
                .fetch_one(pool)
                .await?;

        let borrowed_count = active_loans - overdue_loans;

        Ok(StatsResponse {
            total_members,
            new_members_this_week,
            total_books,
            categories_count,
            active_loans,
            overdue_loans,
            available_books,
            returned_count,
            borrowed_count,
            overdue_count: overdue_loans,
        })
    }
}
