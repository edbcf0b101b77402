//! Loans repository: joined reads and the transactional borrow/return
//! workflow that keeps book availability consistent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails, LoanStatus},
};

const LOAN_DETAILS_SELECT: &str = r#"
    SELECT bl.id, bl.book_id, bl.member_id,
           b.title as book_title, b.isbn,
           m.name as member_name,
           bl.borrow_date, bl.due_date, bl.return_date,
           bl.status, bl.fine_amount
    FROM book_loans bl
    JOIN books b ON bl.book_id = b.id
    JOIN members m ON bl.member_id = m.id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all loans with book and member context
    pub async fn find_all(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} ORDER BY bl.borrow_date DESC, bl.id DESC",
            LOAN_DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LoanDetails> {
        sqlx::query_as::<_, LoanDetails>(&format!("{} WHERE bl.id = $1", LOAN_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loans for a member
    pub async fn find_by_member(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE bl.member_id = $1 ORDER BY bl.borrow_date DESC, bl.id DESC",
            LOAN_DETAILS_SELECT
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Loans that are open past their due date. Overdue is evaluated here
    /// at read time; no stored status transition is involved.
    pub async fn find_overdue(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} WHERE bl.return_date IS NULL AND bl.due_date < CURRENT_DATE \
             ORDER BY bl.due_date, bl.id",
            LOAN_DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Borrow a book: create the loan and decrement availability in one
    /// transaction. The row lock taken by FOR UPDATE serializes concurrent
    /// borrow attempts against the same book, so availability never goes
    /// negative.
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let copies_available: Option<i32> =
            sqlx::query_scalar("SELECT copies_available FROM books WHERE id = $1 FOR UPDATE")
                .bind(loan.book_id)
                .fetch_optional(&mut *tx)
                .await?;

        // Early returns roll the transaction back on drop.
        let copies_available = copies_available.ok_or_else(|| {
            AppError::NotFound(format!("Book with id {} not found", loan.book_id))
        })?;

        if copies_available <= 0 {
            return Err(AppError::Conflict(
                "Book is not available for loan".to_string(),
            ));
        }

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO book_loans (book_id, member_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.member_id)
        .bind(loan.borrow_date)
        .bind(loan.due_date)
        .bind(LoanStatus::Borrowed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE books SET copies_available = copies_available - 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan_id)
    }

    /// Return a loan: close the loan row and increment availability in one
    /// transaction. A loan that is missing or already returned matches no
    /// row and fails NotFound.
    pub async fn return_loan(&self, loan_id: i32, return_date: NaiveDate) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let book_id: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE book_loans
            SET status = $1, return_date = $2, updated_at = NOW()
            WHERE id = $3 AND return_date IS NULL
            RETURNING book_id
            "#,
        )
        .bind(LoanStatus::Returned.as_str())
        .bind(return_date)
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?;

        let book_id = book_id.ok_or_else(|| {
            AppError::NotFound(format!(
                "Loan with id {} not found or already returned",
                loan_id
            ))
        })?;

        sqlx::query(
            "UPDATE books SET copies_available = copies_available + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Set the stored fine amount for a loan
    pub async fn update_fine(&self, loan_id: i32, amount: Decimal) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE book_loans SET fine_amount = $1, updated_at = NOW() WHERE id = $2")
                .bind(amount)
                .bind(loan_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Loan with id {} not found",
                loan_id
            )));
        }

        Ok(())
    }
}
