//! Loan management service

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    fine_per_day: Decimal,
}

impl LoansService {
    pub fn new(repository: Repository, config: &LoansConfig) -> Self {
        Self {
            repository,
            fine_per_day: Decimal::try_from(config.fine_per_day).unwrap_or_default(),
        }
    }

    fn with_derived(&self, loans: Vec<LoanDetails>) -> Vec<LoanDetails> {
        let today = Utc::now().date_naive();
        loans
            .into_iter()
            .map(|loan| loan.with_derived(today, self.fine_per_day))
            .collect()
    }

    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.loans.find_all().await?;
        Ok(self.with_derived(loans))
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.get_by_id(id).await?;
        Ok(loan.with_derived(Utc::now().date_naive(), self.fine_per_day))
    }

    pub async fn member_loans(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify the member exists so an unknown id is a 404, not []
        self.repository.members.get_by_id(member_id).await?;
        let loans = self.repository.loans.find_by_member(member_id).await?;
        Ok(self.with_derived(loans))
    }

    pub async fn overdue_loans(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.loans.find_overdue().await?;
        Ok(self.with_derived(loans))
    }

    /// Borrow a book. The member must exist and be active; availability is
    /// checked and decremented atomically by the repository transaction.
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<i32> {
        let member = self.repository.members.get_by_id(loan.member_id).await?;

        if !member.is_active() {
            return Err(AppError::Validation("Member is not active".to_string()));
        }

        if loan.due_date < loan.borrow_date {
            return Err(AppError::Validation(
                "due_date must not precede borrow_date".to_string(),
            ));
        }

        self.repository.loans.create(&loan).await
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<()> {
        self.repository
            .loans
            .return_loan(loan_id, Utc::now().date_naive())
            .await
    }

    /// Set the stored fine amount for a loan
    pub async fn update_fine(&self, loan_id: i32, amount: Decimal) -> AppResult<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "Fine amount must not be negative".to_string(),
            ));
        }
        self.repository.loans.update_fine(loan_id, amount).await
    }
}
