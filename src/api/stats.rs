//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Dashboard statistics response. Overdue figures are derived from due
/// dates at query time, not from a stored status transition.
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Members with an Active membership
    pub total_members: i64,
    /// Members whose membership started in the last 7 days
    pub new_members_this_week: i64,
    /// Total catalog entries
    pub total_books: i64,
    /// Distinct book categories
    pub categories_count: i64,
    /// Open loans (not yet returned)
    pub active_loans: i64,
    /// Open loans past their due date
    pub overdue_loans: i64,
    /// Sum of copies_available across all books
    pub available_books: i64,
    /// Closed loans
    pub returned_count: i64,
    /// Open loans within their due date
    pub borrowed_count: i64,
    /// Same as overdue_loans, kept for dashboard card symmetry
    pub overdue_count: i64,
}

/// Library dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Aggregate library statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
