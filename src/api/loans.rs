//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails},
};

use super::{CreatedResponse, MessageResponse};

/// Create loan request. All fields are required; missing ones are rejected
/// before any repository call.
#[derive(Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    pub book_id: Option<i32>,
    pub member_id: Option<i32>,
    pub borrow_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

/// Fine update request
#[derive(Deserialize, ToSchema)]
pub struct UpdateFineRequest {
    #[schema(value_type = f64)]
    pub amount: Option<Decimal>,
}

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "List of loans", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(State(state): State<crate::AppState>) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}

/// List overdue loans (open loans past their due date)
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Overdue loans", body = Vec<LoanDetails>)
    )
)]
pub async fn overdue_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.overdue_loans().await?;
    Ok(Json(loans))
}

/// Get loans for a specific member
#[utoipa::path(
    get,
    path = "/loans/member/{member_id}",
    tag = "loans",
    params(("member_id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member's loans", body = Vec<LoanDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn member_loans(
    State(state): State<crate::AppState>,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.member_loans(member_id).await?;
    Ok(Json(loans))
}

/// Get a single loan
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created", body = CreatedResponse),
        (status = 400, description = "Missing fields, inactive member or unavailable book"),
        (status = 404, description = "Member or book not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let (Some(book_id), Some(member_id), Some(borrow_date), Some(due_date)) = (
        request.book_id,
        request.member_id,
        request.borrow_date,
        request.due_date,
    ) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let loan_id = state
        .services
        .loans
        .create_loan(CreateLoan {
            book_id,
            member_id,
            borrow_date,
            due_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: loan_id,
            message: "Loan created successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Book returned", body = MessageResponse),
        (status = 404, description = "Loan not found or already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.loans.return_loan(id).await?;

    Ok(Json(MessageResponse {
        message: "Book returned successfully".to_string(),
    }))
}

/// Set the fine amount for a loan
#[utoipa::path(
    patch,
    path = "/loans/{id}/fine",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = UpdateFineRequest,
    responses(
        (status = 200, description = "Fine updated", body = MessageResponse),
        (status = 400, description = "Missing or negative amount"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn update_fine(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateFineRequest>,
) -> AppResult<Json<MessageResponse>> {
    let amount = request
        .amount
        .ok_or_else(|| AppError::Validation("Invalid fine amount".to_string()))?;

    state.services.loans.update_fine(id, amount).await?;

    Ok(Json(MessageResponse {
        message: "Fine amount updated successfully".to_string(),
    }))
}
