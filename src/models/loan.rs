//! Loan model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan lifecycle status as stored. The application only ever writes
/// Borrowed and Returned; overdue is a read-time predicate on due_date
/// (`Overdue` remains in the value space for rows imported from the
/// previous system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Borrowed,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Borrowed => "Borrowed",
            LoanStatus::Returned => "Returned",
            LoanStatus::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Loan joined with book and member context for display
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub book_title: String,
    pub isbn: String,
    pub member_name: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
    /// Derived: the loan is open and its due date has passed
    #[sqlx(default)]
    pub is_overdue: bool,
    /// Derived: days overdue times the configured per-day rate; zero for
    /// loans that are not overdue. Stored fine_amount is only changed by
    /// the explicit fine endpoint.
    #[sqlx(default)]
    #[schema(value_type = f64)]
    pub accrued_fine: Decimal,
}

impl LoanDetails {
    /// Fill the derived overdue fields against the given reference date.
    pub fn with_derived(mut self, today: NaiveDate, fine_per_day: Decimal) -> Self {
        self.is_overdue = self.return_date.is_none() && self.due_date < today;
        self.accrued_fine = if self.is_overdue {
            accrued_fine(self.due_date, today, fine_per_day)
        } else {
            Decimal::ZERO
        };
        self
    }
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub member_id: i32,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Fine for a loan overdue since `due_date`, evaluated at `today`.
/// Monotonic in days overdue; zero when the due date has not passed.
pub fn accrued_fine(due_date: NaiveDate, today: NaiveDate, fine_per_day: Decimal) -> Decimal {
    let days_overdue = (today - due_date).num_days();
    if days_overdue <= 0 {
        return Decimal::ZERO;
    }
    fine_per_day * Decimal::from(days_overdue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fine_is_zero_until_due_date_passes() {
        let rate = dec("0.50");
        assert_eq!(
            accrued_fine(date(2024, 6, 15), date(2024, 6, 15), rate),
            Decimal::ZERO
        );
        assert_eq!(
            accrued_fine(date(2024, 6, 15), date(2024, 6, 1), rate),
            Decimal::ZERO
        );
    }

    #[test]
    fn fine_grows_linearly_with_days_overdue() {
        let rate = dec("0.50");
        assert_eq!(
            accrued_fine(date(2024, 6, 15), date(2024, 6, 16), rate),
            dec("0.50")
        );
        assert_eq!(
            accrued_fine(date(2024, 6, 15), date(2024, 6, 25), rate),
            dec("5.00")
        );
    }

    #[test]
    fn derived_fields_follow_return_date() {
        let details = LoanDetails {
            id: 1,
            book_id: 1,
            member_id: 1,
            book_title: "1984".into(),
            isbn: "9780451524935".into(),
            member_name: "Jane Smith".into(),
            borrow_date: date(2024, 6, 1),
            due_date: date(2024, 6, 15),
            return_date: None,
            status: LoanStatus::Borrowed.as_str().into(),
            fine_amount: Decimal::ZERO,
            is_overdue: false,
            accrued_fine: Decimal::ZERO,
        };

        let open = details.clone().with_derived(date(2024, 6, 20), dec("0.50"));
        assert!(open.is_overdue);
        assert_eq!(open.accrued_fine, dec("2.50"));

        let mut returned = details;
        returned.return_date = Some(date(2024, 6, 14));
        let returned = returned.with_derived(date(2024, 6, 20), dec("0.50"));
        assert!(!returned.is_overdue);
        assert_eq!(returned.accrued_fine, Decimal::ZERO);
    }
}
