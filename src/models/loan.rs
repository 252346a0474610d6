//! Loan model and the due-date rules of the loan lifecycle

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Standard loan period in days
pub const STANDARD_LOAN_DAYS: i64 = 30;
/// Loan period for periodicals in days
pub const PERIODICAL_LOAN_DAYS: i64 = 15;
/// Days added by a single extension
pub const EXTENSION_DAYS: i64 = 15;
/// Window for the expiring-soon report
pub const EXPIRING_WINDOW_DAYS: i64 = 7;
/// Loans longer than this show up in the alerts report
pub const UNUSUAL_DURATION_DAYS: i64 = 90;

/// Due date for a fresh checkout. Periodicals get the short period.
pub fn due_date(checkout_date: NaiveDate, periodical: bool) -> NaiveDate {
    let days = if periodical {
        PERIODICAL_LOAN_DAYS
    } else {
        STANDARD_LOAN_DAYS
    };
    checkout_date + Duration::days(days)
}

/// Due date after an extension.
pub fn extended_due_date(current_due: NaiveDate) -> NaiveDate {
    current_due + Duration::days(EXTENSION_DAYS)
}

/// A loan due exactly today is not overdue.
pub fn is_overdue(due_date: NaiveDate, returned: bool, today: NaiveDate) -> bool {
    !returned && due_date < today
}

/// Due within the next week, today included.
pub fn is_expiring(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date >= today && due_date <= today + Duration::days(EXPIRING_WINDOW_DAYS)
}

/// Loan record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
    pub closed: bool,
    pub returned: bool,
    pub extended: bool,
}

/// Loan with book and member context for display
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub member_id: i32,
    pub member_name: String,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
    pub closed: bool,
    pub returned: bool,
    pub extended: bool,
}

/// Loan list entry with days remaining until the due date.
/// `days_remaining` is absent for closed loans.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanWithRemaining {
    #[serde(flatten)]
    pub loan: LoanDetails,
    pub days_remaining: Option<i64>,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    /// Title substring; must resolve to exactly one book
    pub title: String,
    /// Checkout date (YYYY-MM-DD)
    pub checkout_date: NaiveDate,
}

/// Aggregate loan statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanStats {
    pub total: i64,
    pub average_duration_days: f64,
    pub overdue: i64,
    pub current: i64,
}

/// Loans needing attention
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanAlerts {
    /// Open for more than [`UNUSUAL_DURATION_DAYS`]
    pub unusual_duration: Vec<LoanDetails>,
    pub overdue: Vec<LoanDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_standard_due_date() {
        assert_eq!(due_date(d("2024-01-01"), false), d("2024-01-31"));
    }

    #[test]
    fn test_periodical_due_date() {
        assert_eq!(due_date(d("2024-01-01"), true), d("2024-01-16"));
    }

    #[test]
    fn test_extension_adds_fifteen_days() {
        assert_eq!(extended_due_date(d("2024-01-31")), d("2024-02-15"));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = d("2024-03-10");
        assert!(!is_overdue(today, false, today));
        assert!(is_overdue(d("2024-03-09"), false, today));
        assert!(!is_overdue(d("2024-03-09"), true, today));
    }

    #[test]
    fn test_expiring_window_is_inclusive() {
        let today = d("2024-03-10");
        assert!(is_expiring(today, today));
        assert!(is_expiring(d("2024-03-17"), today));
        assert!(!is_expiring(d("2024-03-18"), today));
        assert!(!is_expiring(d("2024-03-09"), today));
    }
}
